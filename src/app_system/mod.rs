//! System orchestration, startup, and shutdown logic.

pub mod error;
pub mod order_system;
pub mod tracing;

pub use self::error::*;
pub use self::order_system::*;
pub use self::tracing::*;
