//! Database layer for Jejak Langkah

mod connection;
mod migrations;
mod repository;
mod settings_repository;

pub use connection::Database;
pub use repository::{LibSqlRegistrationRepository, RegistrationRepository};
pub use settings_repository::{LibSqlSettingsRepository, SettingsRepository};
