//! Data models
//!
//! Shared between shop-server and frontend (via API and WebSocket).
//! All IDs are `u64`, assigned by the server-side record store.

pub mod cart;
pub mod product;

// Re-exports
pub use cart::*;
pub use product::*;
