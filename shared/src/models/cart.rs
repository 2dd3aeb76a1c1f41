//! Cart Model

use serde::{Deserialize, Serialize};

/// 购物车行项目
///
/// `product` 只是商品 id，不校验商品是否存在。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: u64,
    pub quantity: u32,
}

/// Cart entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: u64,
    #[serde(default)]
    pub products: Vec<CartItem>,
}

impl Cart {
    /// 创建空购物车
    pub fn new(id: u64) -> Self {
        Self {
            id,
            products: Vec::new(),
        }
    }

    /// 添加一件商品
    ///
    /// 同一商品只保留一行，重复添加累加数量。
    pub fn add_product(&mut self, product_id: u64) {
        match self.products.iter_mut().find(|item| item.product == product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.products.push(CartItem {
                product: product_id,
                quantity: 1,
            }),
        }
    }
}
