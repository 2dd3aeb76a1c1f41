//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::ProductNotFound | Self::CartNotFound => StatusCode::NOT_FOUND,

            // 400 Bad Request
            Self::ValidationFailed | Self::ProductCodeExists => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
