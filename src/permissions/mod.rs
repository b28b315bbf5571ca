//! Permission system for admin-only commands.
//!
//! A user may run admin commands if they are a bot owner (OWNER_IDS) or an
//! administrator of the chat. Chat lookups are cached for a few minutes.

mod checker;

pub use checker::Permissions;
