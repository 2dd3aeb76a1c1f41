//! 实时通道消息类型定义
//!
//! 浏览器通过 WebSocket 与 shop-server 交换 JSON 文本帧，
//! 每一帧都是 `{"event": "<name>", "data": <payload>}` 信封。
//!
//! ```text
//! Client ──▶ createProduct / deleteProduct ──▶ shop-server
//!                                                  │
//! Client ◀── updateProducts (全量商品列表) ◀────────┘ (广播到所有连接)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Product, ProductCreate};

/// Client → Server 事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// 创建商品，载荷与 `POST /api/products` 相同
    CreateProduct(ProductCreate),
    /// 按 id 删除商品
    DeleteProduct(u64),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateProduct(_) => "createProduct",
            ClientEvent::DeleteProduct(_) => "deleteProduct",
        }
    }
}

/// Server → Client 推送
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// 商品目录全量快照，客户端整体替换本地列表
    UpdateProducts(Vec<Product>),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UpdateProducts(_) => "updateProducts",
        }
    }
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
