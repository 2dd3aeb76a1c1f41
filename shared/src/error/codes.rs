//! Unified error codes for Crab Shop
//!
//! 错误码按区间分类:
//! - 0xxx: 通用
//! - 1xxx: 商品
//! - 2xxx: 购物车
//! - 9xxx: 系统

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误码
///
/// 以 u16 序列化，前端按数值判断错误类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    /// 请求体或路径参数不合法
    ValidationFailed = 2,

    // ==================== 1xxx: Product ====================
    ProductNotFound = 1001,
    /// code 已被其他商品使用
    ProductCodeExists = 1002,

    // ==================== 2xxx: Cart ====================
    CartNotFound = 2001,

    // ==================== 9xxx: System ====================
    /// 处理器 panic 等意外错误
    InternalError = 9001,
    /// 集合文件写入失败
    StorageError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// 默认错误消息
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductCodeExists => "A product with this code already exists",
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// 未知的错误码数值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            2 => ErrorCode::ValidationFailed,
            1001 => ErrorCode::ProductNotFound,
            1002 => ErrorCode::ProductCodeExists,
            2001 => ErrorCode::CartNotFound,
            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::StorageError,
            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
