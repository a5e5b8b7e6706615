//! Operator settings model

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

/// Cloud-sync and contact configuration.
///
/// An explicit value: loaded from the settings repository at startup, handed
/// to the reconciler, and replaced wholesale through its update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Apps Script endpoint fronting the spreadsheet.
    pub script_url: Option<String>,
    /// Target spreadsheet identifier.
    pub spreadsheet_id: Option<String>,
    /// Official WhatsApp contact printed on tickets.
    pub admin_phone: String,
    /// Official email contact printed on tickets.
    pub admin_email: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            script_url: None,
            spreadsheet_id: None,
            admin_phone: "+62 812-3456-7890".to_string(),
            admin_email: "jejaklangkah.nusantara.id@gmail.com".to_string(),
        }
    }
}

/// Normalized remote fetch endpoint derived from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub script_url: String,
    pub spreadsheet_id: String,
}

impl Settings {
    /// Resolve the remote fetch target.
    ///
    /// Returns `None` unless the script URL is a non-empty http(s) URL and a
    /// spreadsheet id is present; a `None` target makes every refresh a
    /// no-op.
    #[must_use]
    pub fn fetch_target(&self) -> Option<FetchTarget> {
        let script_url = normalize_text_option(self.script_url.clone())?;
        if !is_http_url(&script_url) {
            return None;
        }
        let spreadsheet_id = normalize_text_option(self.spreadsheet_id.clone())?;

        Some(FetchTarget {
            script_url: script_url.trim_end_matches('/').to_string(),
            spreadsheet_id,
        })
    }

    /// Whether the sync endpoint is fully configured.
    #[must_use]
    pub fn is_sync_configured(&self) -> bool {
        self.fetch_target().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_not_sync_configured() {
        let settings = Settings::default();
        assert!(!settings.is_sync_configured());
        assert_eq!(settings.fetch_target(), None);
    }

    #[test]
    fn fetch_target_requires_both_values() {
        let settings = Settings {
            script_url: Some("https://script.google.com/macros/s/abc/exec".to_string()),
            spreadsheet_id: None,
            ..Settings::default()
        };
        assert_eq!(settings.fetch_target(), None);
    }

    #[test]
    fn fetch_target_rejects_non_http_endpoints() {
        let settings = Settings {
            script_url: Some("script.google.com/macros/s/abc".to_string()),
            spreadsheet_id: Some("sheet-1".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.fetch_target(), None);
    }

    #[test]
    fn fetch_target_normalizes_whitespace_and_trailing_slash() {
        let settings = Settings {
            script_url: Some(" https://script.google.com/macros/s/abc/exec/ ".to_string()),
            spreadsheet_id: Some(" sheet-1 ".to_string()),
            ..Settings::default()
        };
        let target = settings.fetch_target().unwrap();
        assert_eq!(
            target.script_url,
            "https://script.google.com/macros/s/abc/exec"
        );
        assert_eq!(target.spreadsheet_id, "sheet-1");
    }
}
