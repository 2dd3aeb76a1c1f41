//! Catalog Service - 商品目录修改与实时广播
//!
//! HTTP 处理器和 WebSocket 入站消息都通过这里修改商品目录，
//! 保证两条入口共用同一条 "修改 → 广播" 路径：
//!
//! ```text
//! HTTP POST/PUT/DELETE ──┐
//!                        ├──▶ mutate_then_broadcast ──▶ ProductRepository
//! ws createProduct ──────┤            │
//! ws deleteProduct ──────┘            └──▶ MessageBus::notify_all(snapshot)
//! ```
//!
//! 广播使用仓库写入后返回的快照，不再重新读取文件。
//! 修改和广播在同一把目录锁内完成，客户端收到快照的顺序与写入顺序一致。

use std::future::Future;
use std::sync::Arc;

use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::db::repository::product::CatalogChange;
use crate::db::repository::{ProductRepository, RepoResult};
use tokio::sync::Mutex;

use crate::message::MessageBus;

#[derive(Clone, Debug)]
pub struct CatalogService {
    products: ProductRepository,
    bus: MessageBus,
    /// 修改 + 广播 的串行锁
    publish_lock: Arc<Mutex<()>>,
}

impl CatalogService {
    pub fn new(products: ProductRepository, bus: MessageBus) -> Self {
        Self {
            products,
            bus,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 执行目录修改，成功且目录发生变化时广播修改后的快照
    ///
    /// 修改失败或目录未变化 (目标不存在) 时不广播。
    pub async fn mutate_then_broadcast<T, F, Fut>(&self, mutation: F) -> RepoResult<T>
    where
        F: FnOnce(ProductRepository) -> Fut,
        Fut: Future<Output = RepoResult<CatalogChange<T>>>,
    {
        let _guard = self.publish_lock.lock().await;
        let change = mutation(self.products.clone()).await?;

        if let Some(snapshot) = change.snapshot {
            let count = snapshot.len();
            let receivers = self.bus.notify_all(snapshot);
            tracing::debug!(products = count, receivers, "Catalog snapshot broadcast");
        }

        Ok(change.outcome)
    }

    pub async fn create_product(&self, data: ProductCreate) -> RepoResult<Product> {
        self.mutate_then_broadcast(|repo| async move { repo.create_with_snapshot(data).await })
            .await
    }

    pub async fn update_product(&self, id: u64, data: ProductUpdate) -> RepoResult<Option<Product>> {
        self.mutate_then_broadcast(|repo| async move { repo.update_with_snapshot(id, data).await })
            .await
    }

    pub async fn delete_product(&self, id: u64) -> RepoResult<bool> {
        self.mutate_then_broadcast(|repo| async move { repo.delete_with_snapshot(id).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::RecordStore;
    use shared::message::ServerEvent;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::broadcast::error::TryRecvError;

    fn service(dir: &TempDir) -> (CatalogService, MessageBus) {
        let repo = ProductRepository::new(RecordStore::new(dir.path().join("products.json")));
        let bus = MessageBus::new();
        (CatalogService::new(repo, bus.clone()), bus)
    }

    fn input(code: &str) -> ProductCreate {
        ProductCreate {
            title: Some("A".into()),
            description: Some("d".into()),
            price: Some(10.0),
            thumbnail: Some("t".into()),
            code: Some(code.into()),
            stock: Some(5),
            ..Default::default()
        }
    }

    fn ids(event: ServerEvent) -> Vec<u64> {
        match event {
            ServerEvent::UpdateProducts(list) => list.iter().map(|p| p.id).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_broadcasts_full_catalog() {
        let dir = TempDir::new().unwrap();
        let (catalog, bus) = service(&dir);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        catalog.create_product(input("c1")).await.unwrap();
        catalog.create_product(input("c2")).await.unwrap();

        for rx in [&mut a, &mut b] {
            assert_eq!(ids(rx.try_recv().unwrap()), vec![1]);
            assert_eq!(ids(rx.try_recv().unwrap()), vec![1, 2]);
            assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_broadcast() {
        let dir = TempDir::new().unwrap();
        let (catalog, bus) = service(&dir);
        catalog.create_product(input("c1")).await.unwrap();

        let mut rx = bus.subscribe();

        // 重复 code
        assert!(catalog.create_product(input("c1")).await.is_err());
        // 缺少字段
        assert!(catalog.create_product(ProductCreate::default()).await.is_err());
        // 删除不存在的商品
        assert!(!catalog.delete_product(99).await.unwrap());
        // 更新不存在的商品
        assert!(
            catalog
                .update_product(99, ProductUpdate::default())
                .await
                .unwrap()
                .is_none()
        );

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_update_and_delete_broadcast() {
        let dir = TempDir::new().unwrap();
        let (catalog, bus) = service(&dir);
        catalog.create_product(input("c1")).await.unwrap();
        catalog.create_product(input("c2")).await.unwrap();

        let mut rx = bus.subscribe();

        let update = ProductUpdate {
            stock: Some(0),
            ..Default::default()
        };
        let updated = catalog.update_product(2, update).await.unwrap().unwrap();
        assert_eq!(updated.stock, 0);
        match rx.try_recv().unwrap() {
            ServerEvent::UpdateProducts(list) => assert_eq!(list[1].stock, 0),
        }

        assert!(catalog.delete_product(1).await.unwrap());
        assert_eq!(ids(rx.try_recv().unwrap()), vec![2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_mutations_broadcast_in_commit_order() {
        let dir = TempDir::new().unwrap();
        let (catalog, bus) = service(&dir);
        let mut rx = bus.subscribe();

        // 第一次修改写入后延迟返回，第二次修改在此期间发起
        let slow = {
            let catalog = catalog.clone();
            tokio::spawn(async move {
                catalog
                    .mutate_then_broadcast(|repo| async move {
                        let change = repo.create_with_snapshot(input("c1")).await;
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        change
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        catalog.create_product(input("c2")).await.unwrap();
        slow.await.unwrap().unwrap();

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(ids(event));
        }
        let stored: Vec<u64> = catalog.products.find_all().await.iter().map(|p| p.id).collect();
        assert_eq!(stored.len(), 2);
        assert_eq!(last, Some(stored));
    }
}
