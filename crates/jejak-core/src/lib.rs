//! jejak-core - Core library for Jejak Langkah
//!
//! This crate contains the shared models, local storage layer, and
//! cloud-reconciliation logic used by the operator tooling (currently the
//! CLI; any future admin shell shares the same services).

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod reconciler;
pub mod services;
pub mod state;
pub mod stats;
pub mod util;

pub use error::{Error, Result};
pub use models::{PersonalData, Registration, RegistrationId, Settings, Status};
pub use state::SyncState;
