//! AppError 和统一响应体

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// 错误附加信息 (字段名 → 值)
pub type Details = Map<String, Value>;

/// 应用错误
///
/// `code` 决定 HTTP 状态和错误分类，`message` 直接返回给调用方，
/// `details` 携带出错的字段或 ID 等上下文。
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Details>,
}

impl AppError {
    /// 使用错误码的默认消息
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Details::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// 是否为服务端故障 (9xxx)
    pub fn is_system(&self) -> bool {
        self.code.category() == ErrorCategory::System
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// 集合文件写入失败
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    pub fn product_not_found(id: u64) -> Self {
        Self::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
            .with_detail("id", id)
    }

    pub fn cart_not_found(id: u64) -> Self {
        Self::with_message(ErrorCode::CartNotFound, format!("Cart {id} not found"))
            .with_detail("id", id)
    }

    /// 商品 code 已被其他商品占用
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self::with_message(
            ErrorCode::ProductCodeExists,
            format!("Product code '{code}' already exists"),
        )
        .with_detail("code", code)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// 统一响应体
///
/// 成功: `{"code": 0, "message": "...", "data": ...}`
/// 失败: `{"code": 1002, "message": "...", "details": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.code()
    }

    /// 根据 code 推导 HTTP 状态，未知 code 视为 500
    pub fn http_status(&self) -> StatusCode {
        ErrorCode::try_from(self.code)
            .map(|c| c.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

/// 请求体无法解析 (非 JSON、缺少 Content-Type、字段类型不符)
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// 路径参数无法解析 (例如非数字 ID)
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_system() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed with system error");
        }
        ApiResponse::<()>::from(self).into_response()
    }
}
