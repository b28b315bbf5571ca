//! Database module exports.

pub mod json_store;
pub mod models;
mod repository;

pub use json_store::{Flushed, JsonFile};
pub use models::*;
pub use repository::{OffenseRepository, SettingsRepository};
