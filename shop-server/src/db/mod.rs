//! 存储层
//!
//! - [`store`] - 单文件 JSON 集合存储
//! - [`repository`] - 商品、购物车仓库

pub mod repository;
pub mod store;

pub use repository::{CartRepository, ProductRepository, RepoError, RepoResult};
pub use store::{Record, RecordStore, StoreError, StoreResult};
