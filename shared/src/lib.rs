//! Shared types for Crab Shop
//!
//! Types used by the shop server and by any client speaking to it:
//! data models, the unified error system and the real-time protocol.

pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{ClientEvent, ServerEvent};
