//! Product Repository

use shared::models::{DEFAULT_CATEGORY, Product, ProductCreate, ProductUpdate};

use super::{RepoError, RepoResult};
use crate::db::store::RecordStore;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, require_text,
    validate_optional_text, validate_price, validate_stock, validate_thumbnails,
};

/// 目录修改结果
///
/// `snapshot` 为修改后的全量目录；目录未发生变化 (例如目标不存在) 时为 `None`。
#[derive(Debug, Clone)]
pub struct CatalogChange<T> {
    pub outcome: T,
    pub snapshot: Option<Vec<Product>>,
}

impl<T> CatalogChange<T> {
    fn changed(outcome: T, snapshot: Vec<Product>) -> Self {
        Self {
            outcome,
            snapshot: Some(snapshot),
        }
    }

    fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            snapshot: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProductRepository {
    store: RecordStore<Product>,
}

impl ProductRepository {
    pub fn new(store: RecordStore<Product>) -> Self {
        Self { store }
    }

    /// Find all products in stored order
    pub async fn find_all(&self) -> Vec<Product> {
        self.store.load().await
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: u64) -> Option<Product> {
        self.store.load().await.into_iter().find(|p| p.id == id)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        self.create_with_snapshot(data).await.map(|c| c.outcome)
    }

    /// Create a new product, returning the catalog after the write
    pub async fn create_with_snapshot(
        &self,
        data: ProductCreate,
    ) -> RepoResult<CatalogChange<Product>> {
        let mut product = validate_create(data)?;

        let _guard = self.store.lock().await;
        let mut products = self.store.load().await;

        if products.iter().any(|p| p.code == product.code) {
            return Err(RepoError::DuplicateCode(product.code));
        }

        product.id = self.store.next_id(&products);
        products.push(product.clone());
        self.store.save(&products).await?;

        tracing::debug!(id = product.id, code = %product.code, "Product created");
        Ok(CatalogChange::changed(product, products))
    }

    /// Merge provided fields onto an existing product
    ///
    /// Returns `None` without writing when no product has this id.
    pub async fn update(&self, id: u64, data: ProductUpdate) -> RepoResult<Option<Product>> {
        self.update_with_snapshot(id, data).await.map(|c| c.outcome)
    }

    /// Update a product, returning the catalog after the write
    pub async fn update_with_snapshot(
        &self,
        id: u64,
        data: ProductUpdate,
    ) -> RepoResult<CatalogChange<Option<Product>>> {
        validate_update(&data)?;

        let _guard = self.store.lock().await;
        let mut products = self.store.load().await;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(CatalogChange::unchanged(None));
        };

        if let Some(code) = &data.code
            && products.iter().any(|p| p.id != id && &p.code == code)
        {
            return Err(RepoError::DuplicateCode(code.clone()));
        }

        data.apply_to(&mut products[index]);
        let updated = products[index].clone();
        self.store.save(&products).await?;

        tracing::debug!(id, "Product updated");
        Ok(CatalogChange::changed(Some(updated), products))
    }

    /// Hard delete a product
    ///
    /// Returns `false` without writing when no product has this id.
    pub async fn delete(&self, id: u64) -> RepoResult<bool> {
        self.delete_with_snapshot(id).await.map(|c| c.outcome)
    }

    /// Delete a product, returning the catalog after the write
    pub async fn delete_with_snapshot(&self, id: u64) -> RepoResult<CatalogChange<bool>> {
        let _guard = self.store.lock().await;
        let mut products = self.store.load().await;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(CatalogChange::unchanged(false));
        };

        products.remove(index);
        self.store.save(&products).await?;

        tracing::debug!(id, "Product deleted");
        Ok(CatalogChange::changed(true, products))
    }
}

/// 校验创建请求并填充默认值，id 由调用方在锁内分配
fn validate_create(data: ProductCreate) -> RepoResult<Product> {
    let title = require_text(&data.title, "title", MAX_NAME_LEN)?;
    let description = require_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    let thumbnail = require_text(&data.thumbnail, "thumbnail", MAX_URL_LEN)?;
    let code = require_text(&data.code, "code", MAX_SHORT_TEXT_LEN)?;
    let price = data
        .price
        .ok_or_else(|| RepoError::Validation("price is required".into()))?;
    let stock = data
        .stock
        .ok_or_else(|| RepoError::Validation("stock is required".into()))?;
    validate_price(price)?;
    validate_stock(stock)?;
    validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
    if let Some(thumbnails) = &data.thumbnails {
        validate_thumbnails(thumbnails)?;
    }

    Ok(Product {
        id: 0,
        title: title.to_string(),
        description: description.to_string(),
        price,
        thumbnail: thumbnail.to_string(),
        code: code.to_string(),
        stock,
        status: data.status.unwrap_or(true),
        category: data
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        thumbnails: data.thumbnails.unwrap_or_default(),
    })
}

fn validate_update(data: &ProductUpdate) -> RepoResult<()> {
    validate_optional_text(&data.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.thumbnail, "thumbnail", MAX_URL_LEN)?;
    validate_optional_text(&data.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
    if let Some(price) = data.price {
        validate_price(price)?;
    }
    if let Some(stock) = data.stock {
        validate_stock(stock)?;
    }
    if let Some(thumbnails) = &data.thumbnails {
        validate_thumbnails(thumbnails)?;
    }
    Ok(())
}
