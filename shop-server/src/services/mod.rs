//! 业务服务层
//!
//! - [`CatalogService`] - 商品目录修改 + 实时广播

pub mod catalog_service;

pub use catalog_service::CatalogService;
