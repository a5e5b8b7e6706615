//! Registration model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Status;
use crate::util::timestamp_millis_now;

/// A unique identifier for a registration.
///
/// Assigned from the submission instant in Unix milliseconds, so identifiers
/// are unique in practice and sort newest-first by numeric value. The id is
/// also the booking number printed on e-tickets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RegistrationId(i64);

impl RegistrationId {
    /// Create a new identifier from the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self(timestamp_millis_now())
    }

    /// Wrap a raw millisecond value (remote rows, tests).
    #[must_use]
    pub const fn from_millis(value: i64) -> Self {
        Self(value)
    }

    /// Raw millisecond value.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Creation instant encoded in the identifier.
    #[must_use]
    pub fn created_at(self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.0)
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegistrationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// The completed booking form value.
///
/// Personal fields (name, phone, email, address) and trip fields
/// (destination, category, package, start date) are opaque strings to the
/// reconciler. Field names follow the spreadsheet wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub full_name: String,
    pub whatsapp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    /// Destination mountain.
    pub mountain: String,
    pub package_category: String,
    pub trip_package: String,
    pub start_date: String,
    /// Destination-specific permit code (currently Merbabu only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climber_code: Option<String>,
    /// Identity document payload as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_image: Option<String>,
}

/// One booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Unique identifier (creation-time milliseconds).
    pub id: RegistrationId,
    #[serde(flatten)]
    pub data: PersonalData,
    #[serde(default)]
    pub status: Status,
    /// Whether the remote source has been observed to contain this id.
    #[serde(default)]
    pub synced: bool,
}

impl Registration {
    /// Create a registration from a submitted form value.
    ///
    /// Assigns a fresh identifier and starts the lifecycle at
    /// [`Status::Pending`].
    #[must_use]
    pub fn new(data: PersonalData) -> Self {
        Self {
            id: RegistrationId::new(),
            data,
            status: Status::Pending,
            synced: false,
        }
    }

    /// Substring match across name, phone, email, and destination.
    ///
    /// `needle` must already be lowercased; matching is case-insensitive on
    /// the record side.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.data.full_name.to_lowercase().contains(needle)
            || self.data.whatsapp.to_lowercase().contains(needle)
            || self.data.email.to_lowercase().contains(needle)
            || self.data.mountain.to_lowercase().contains(needle)
    }
}
