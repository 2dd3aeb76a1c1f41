//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品管理接口
//! - [`carts`] - 购物车接口
//! - [`ws`] - 实时通道 (WebSocket)
//! - [`extract`] - 统一错误体的 Json / Path 提取器

pub mod carts;
pub mod extract;
pub mod health;
pub mod products;
pub mod ws;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// 实时通道路由
pub fn ws_router() -> Router<ServerState> {
    Router::new().route("/ws", get(ws::handle_ws))
}
