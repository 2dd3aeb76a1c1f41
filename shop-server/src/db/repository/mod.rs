//! Repository Module
//!
//! 基于 [`RecordStore`](crate::db::store::RecordStore) 的集合仓库。
//! 每个修改操作都遵循同一流程：加锁 → 加载 → 计算 → 写回 → 返回。

pub mod cart;
pub mod product;

// Re-exports
pub use cart::CartRepository;
pub use product::ProductRepository;

use shared::error::AppError;
use thiserror::Error;

use crate::db::store::StoreError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::DuplicateCode(code) => AppError::duplicate_code(code),
            RepoError::Storage(e) => AppError::storage(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_repo_error_to_app_error() {
        let err: AppError = RepoError::Validation("price is required".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "price is required");

        let err: AppError = RepoError::DuplicateCode("c1".into()).into();
        assert_eq!(err.code, ErrorCode::ProductCodeExists);

        let io = std::io::Error::other("disk full");
        let err: AppError = RepoError::Storage(StoreError::Io {
            path: "products.json".into(),
            source: io,
        })
        .into();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
