//! Cache module - typed caches on top of Moka.
//!
//! Used for lookups that would otherwise hit the Telegram API on every
//! command, such as admin status.

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
