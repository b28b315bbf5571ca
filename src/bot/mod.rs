//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod gateway;
mod runtime;
pub mod webhook;

pub use dispatcher::{AppState, build_dispatcher};
pub use gateway::TelegramGateway;
pub use runtime::run;
