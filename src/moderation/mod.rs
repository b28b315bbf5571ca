//! Moderation core: classification, escalation and cleanup.

pub mod engine;
pub mod ports;
pub mod sweeper;

pub use engine::{InboundMessage, ModerationEngine, Verdict};
pub use ports::{Membership, Notice, Notifier};
pub use sweeper::Sweeper;
