//! Data models for Jejak Langkah

mod registration;
mod settings;
mod status;

pub use registration::{PersonalData, Registration, RegistrationId};
pub use settings::{FetchTarget, Settings};
pub use status::Status;
