//! Booking status model

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Verification status of a registration.
///
/// A closed set: anything outside it is rejected at parse time. Parsing also
/// accepts the legacy labels still stored in older spreadsheet rows
/// (`Menunggu Verifikasi`, `Terverifikasi`, `Dibatalkan`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Awaiting verification by an administrator.
    #[default]
    Pending,
    /// Verified and cleared for the expedition.
    Verified,
    /// Canceled by an administrator.
    Canceled,
}

impl Status {
    /// Canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Canceled => "Canceled",
        }
    }

    /// Quick-toggle transition used by the admin table: verified records drop
    /// back to pending, everything else becomes verified.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Verified => Self::Pending,
            Self::Pending | Self::Canceled => Self::Verified,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" | "menunggu verifikasi" => Ok(Self::Pending),
            "verified" | "terverifikasi" => Ok(Self::Verified),
            "canceled" | "cancelled" | "dibatalkan" => Ok(Self::Canceled),
            other => Err(Error::InvalidInput(format!(
                "Unrecognized status value: '{other}'"
            ))),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
