//! Repository module - data access layer over the JSON stores.

mod offense_repository;
mod settings_repository;

pub use offense_repository::OffenseRepository;
pub use settings_repository::SettingsRepository;
