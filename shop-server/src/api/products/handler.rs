//! Product API Handlers
//!
//! 所有修改操作经由 [`CatalogService`](crate::services::CatalogService)，
//! 成功后自动广播全量目录。

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::extract::{ApiJson, ApiPath};
use crate::core::ServerState;

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Product>> {
    Json(state.products.find_all().await)
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
) -> AppResult<Json<Product>> {
    let product = state
        .products
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::product_not_found(id))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product(payload).await?;
    tracing::info!(id = product.id, code = %product.code, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(payload): ApiJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let product = state
        .catalog
        .update_product(id, payload)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;
    tracing::info!(id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<u64>,
) -> AppResult<ApiResponse<u64>> {
    if !state.catalog.delete_product(id).await? {
        return Err(AppError::product_not_found(id));
    }
    tracing::info!(id, "Product deleted");
    Ok(ApiResponse::success_with_message(
        format!("Product {id} deleted"),
        id,
    ))
}
