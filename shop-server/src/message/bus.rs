//! 消息总线核心实现
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     MessageBus                           │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │  broadcast::Sender<ServerEvent>                   │  │
//! │  └───────────────────────────────────────────────────┘  │
//! │  clients: DashMap<client_id, ConnectedClient>           │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ subscribe()
//!     ┌────────────────────┼────────────────────┐
//!     ▼                    ▼                    ▼
//!  ws session          ws session           ws session
//! ```
//!
//! 每个 WebSocket 会话持有自己的 `broadcast::Receiver`，
//! 由会话任务把事件写入各自的 socket。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::message::ServerEvent;
use shared::models::Product;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 默认广播通道容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// 已连接客户端信息
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    pub id: String,
    pub connected_at: DateTime<Utc>,
}

/// 消息总线 - 负责把目录快照推送给所有实时连接
///
/// # 职责
///
/// - 广播 (notify_all, publish)
/// - 客户端登记 (register_client, unregister_client, client_count)
/// - 生命周期 (shutdown)
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// 服务器到客户端的广播通道
    tx: broadcast::Sender<ServerEvent>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 已连接的客户端 (Client ID -> ConnectedClient)
    clients: Arc<DashMap<String, ConnectedClient>>,
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
            clients: Arc::new(DashMap::new()),
        }
    }

    /// 推送全量商品目录到所有订阅者
    ///
    /// 返回收到消息的订阅者数量，没有订阅者时为 0。
    pub fn notify_all(&self, snapshot: Vec<Product>) -> usize {
        self.publish(ServerEvent::UpdateProducts(snapshot))
    }

    /// 发布事件 (服务器 -> 所有订阅者)
    pub fn publish(&self, event: ServerEvent) -> usize {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(event = name, receivers, "Event broadcast");
                receivers
            }
            // 没有订阅者
            Err(_) => 0,
        }
    }

    /// 订阅服务器广播
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// 登记新连接，返回分配的客户端 ID
    pub fn register_client(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.clients.insert(
            id.clone(),
            ConnectedClient {
                id: id.clone(),
                connected_at: Utc::now(),
            },
        );
        id
    }

    /// 注销连接，返回被移除的客户端
    pub fn unregister_client(&self, client_id: &str) -> Option<ConnectedClient> {
        let (_, client) = self.clients.remove(client_id)?;
        let secs = (Utc::now() - client.connected_at).num_seconds();
        tracing::debug!(client_id, connected_secs = secs, "Client unregistered");
        Some(client)
    }

    /// 已连接客户端数量
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭消息总线
    ///
    /// 通知所有 WebSocket 会话退出
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn product(id: u64) -> Product {
        Product {
            id,
            title: "A".into(),
            description: "d".into(),
            price: 1.0,
            thumbnail: "t".into(),
            code: format!("c{id}"),
            stock: 1,
            status: true,
            category: shared::models::DEFAULT_CATEGORY.into(),
            thumbnails: vec![],
        }
    }

    #[test]
    fn test_notify_without_subscribers_is_noop() {
        let bus = MessageBus::new();
        assert_eq!(bus.notify_all(vec![product(1)]), 0);
    }

    #[test]
    fn test_every_subscriber_gets_exactly_one_copy() {
        let bus = MessageBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.notify_all(vec![product(1), product(2)]), 2);

        for rx in [&mut a, &mut b] {
            match rx.try_recv().unwrap() {
                ServerEvent::UpdateProducts(list) => {
                    assert_eq!(list.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
                }
            }
            assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[test]
    fn test_client_registry() {
        let bus = MessageBus::new();
        let first = bus.register_client();
        let second = bus.register_client();
        assert_ne!(first, second);
        assert_eq!(bus.client_count(), 2);

        let removed = bus.unregister_client(&first).unwrap();
        assert_eq!(removed.id, first);
        assert_eq!(bus.client_count(), 1);

        // 重复注销是无操作
        assert!(bus.unregister_client(&first).is_none());
        assert!(bus.unregister_client(&second).is_some());
        assert_eq!(bus.client_count(), 0);
    }

    #[test]
    fn test_shutdown_cancels_token() {
        let bus = MessageBus::new();
        let token = bus.shutdown_token().clone();
        bus.shutdown();
        assert!(token.is_cancelled());
    }
}
