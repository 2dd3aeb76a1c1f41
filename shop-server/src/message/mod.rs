//! 实时消息总线
//!
//! 协议类型定义在 [`shared::message`]，这里只负责分发。

pub mod bus;

pub use bus::{ConnectedClient, MessageBus};
pub use shared::message::{ClientEvent, ServerEvent};
