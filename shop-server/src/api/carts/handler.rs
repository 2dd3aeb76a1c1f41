//! Cart API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use shared::error::{AppError, AppResult};
use shared::models::{Cart, CartItem};

use crate::api::extract::ApiPath;
use crate::core::ServerState;

/// GET /api/carts - 获取所有购物车
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Cart>> {
    Json(state.carts.find_all().await)
}

/// POST /api/carts - 创建空购物车
pub async fn create(State(state): State<ServerState>) -> AppResult<(StatusCode, Json<Cart>)> {
    let cart = state.carts.create().await?;
    tracing::info!(id = cart.id, "Cart created");
    Ok((StatusCode::CREATED, Json(cart)))
}

/// GET /api/carts/:cid - 获取购物车中的商品列表
pub async fn get_products(
    State(state): State<ServerState>,
    ApiPath(cid): ApiPath<u64>,
) -> AppResult<Json<Vec<CartItem>>> {
    let cart = state
        .carts
        .find_by_id(cid)
        .await
        .ok_or_else(|| AppError::cart_not_found(cid))?;
    Ok(Json(cart.products))
}

/// POST /api/carts/:cid/product/:pid - 添加一件商品
pub async fn add_product(
    State(state): State<ServerState>,
    ApiPath((cid, pid)): ApiPath<(u64, u64)>,
) -> AppResult<Json<Cart>> {
    let cart = state
        .carts
        .add_product(cid, pid)
        .await?
        .ok_or_else(|| AppError::cart_not_found(cid))?;
    Ok(Json(cart))
}
