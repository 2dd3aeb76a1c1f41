//! 统一错误体系
//!
//! - [`ErrorCode`]: u16 错误码，前后端共用
//! - [`ErrorCategory`]: 按错误码区间分类
//! - [`AppError`]: 错误码 + 消息 + 附加信息
//! - [`ApiResponse`]: 统一响应体
//!
//! 错误码区间: 0xxx 通用 / 1xxx 商品 / 2xxx 购物车 / 9xxx 系统
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::duplicate_code("mate-01");
//! assert_eq!(err.code, ErrorCode::ProductCodeExists);
//!
//! let body: ApiResponse<()> = err.into();
//! assert_eq!(body.code, 1002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, Details};
