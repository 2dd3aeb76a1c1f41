//! Product Model

use serde::{Deserialize, Serialize};

/// 未指定分类时使用的分类名
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Product entity
///
/// `id` 由存储层分配 (max + 1)，创建后不可修改，删除后不复用。
/// `code` 在整个商品目录中唯一。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: i64,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Create product payload
///
/// 所有字段均为可选，缺失的必填字段由仓库层校验后返回验证错误，
/// 而不是在反序列化阶段失败。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<bool>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

/// Update product payload
///
/// 没有 `id` 字段：请求体里携带的 id 在反序列化时被丢弃，
/// 存储中的 id 永远保持不变。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<i64>,
    pub status: Option<bool>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

impl ProductUpdate {
    /// 将已提供的字段合并到商品上
    pub fn apply_to(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(thumbnail) = self.thumbnail {
            product.thumbnail = thumbnail;
        }
        if let Some(code) = self.code {
            product.code = code;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(thumbnails) = self.thumbnails {
            product.thumbnails = thumbnails;
        }
    }
}
