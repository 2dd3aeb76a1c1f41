//! Cart Repository
//!
//! 购物车不校验商品是否存在，可以引用任意商品 id。

use shared::models::Cart;

use super::RepoResult;
use crate::db::store::RecordStore;

#[derive(Clone, Debug)]
pub struct CartRepository {
    store: RecordStore<Cart>,
}

impl CartRepository {
    pub fn new(store: RecordStore<Cart>) -> Self {
        Self { store }
    }

    /// Find all carts
    pub async fn find_all(&self) -> Vec<Cart> {
        self.store.load().await
    }

    /// Find cart by id
    pub async fn find_by_id(&self, id: u64) -> Option<Cart> {
        self.store.load().await.into_iter().find(|c| c.id == id)
    }

    /// Create an empty cart
    pub async fn create(&self) -> RepoResult<Cart> {
        let _guard = self.store.lock().await;
        let mut carts = self.store.load().await;

        let cart = Cart::new(self.store.next_id(&carts));
        carts.push(cart.clone());
        self.store.save(&carts).await?;

        tracing::debug!(id = cart.id, "Cart created");
        Ok(cart)
    }

    /// Add one unit of a product to a cart
    ///
    /// Returns `None` without writing when the cart does not exist.
    pub async fn add_product(&self, cart_id: u64, product_id: u64) -> RepoResult<Option<Cart>> {
        let _guard = self.store.lock().await;
        let mut carts = self.store.load().await;

        let Some(cart) = carts.iter_mut().find(|c| c.id == cart_id) else {
            return Ok(None);
        };

        cart.add_product(product_id);
        let updated = cart.clone();
        self.store.save(&carts).await?;

        tracing::debug!(cart_id, product_id, "Product added to cart");
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::CartItem;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> CartRepository {
        CartRepository::new(RecordStore::new(dir.path().join("carts.json")))
    }

    #[tokio::test]
    async fn test_cart_scenario() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let cart = repo.create().await.unwrap();
        assert_eq!(cart.id, 1);
        assert!(cart.products.is_empty());

        let cart = repo.add_product(1, 42).await.unwrap().unwrap();
        assert_eq!(
            cart.products,
            vec![CartItem {
                product: 42,
                quantity: 1
            }]
        );

        let cart = repo.add_product(1, 42).await.unwrap().unwrap();
        assert_eq!(
            cart.products,
            vec![CartItem {
                product: 42,
                quantity: 2
            }]
        );

        assert!(repo.add_product(99, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_cart_does_not_write() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        assert!(repo.add_product(1, 1).await.unwrap().is_none());
        assert!(!dir.path().join("carts.json").exists());
    }

    #[tokio::test]
    async fn test_carts_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        repo(&dir).create().await.unwrap();
        repo(&dir).create().await.unwrap();
        repo(&dir).add_product(2, 7).await.unwrap();

        let carts = repo(&dir).find_all().await;
        assert_eq!(carts.len(), 2);
        assert_eq!(carts[1].products[0].product, 7);
        assert_eq!(repo(&dir).find_by_id(2).await.unwrap(), carts[1]);
    }
}
