//! Settings repository implementation

use libsql::Connection;

use crate::error::Result;
use crate::models::Settings;
use crate::util::normalize_text_option;

/// Trait for settings storage operations (async)
#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Load settings from the database
    async fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    async fn save(&self, settings: &Settings) -> Result<()>;
}

/// libSQL implementation of `SettingsRepository`
pub struct LibSqlSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for LibSqlSettingsRepository<'_> {
    async fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        // Load each setting individually; absent keys keep their defaults
        if let Ok(value) = self.get_setting("script_url").await {
            settings.script_url = normalize_text_option(Some(value));
        }

        if let Ok(value) = self.get_setting("spreadsheet_id").await {
            settings.spreadsheet_id = normalize_text_option(Some(value));
        }

        if let Ok(value) = self.get_setting("admin_phone").await {
            settings.admin_phone = value;
        }

        if let Ok(value) = self.get_setting("admin_email").await {
            settings.admin_email = value;
        }

        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        self.set_setting("script_url", settings.script_url.as_deref().unwrap_or(""))
            .await?;
        self.set_setting(
            "spreadsheet_id",
            settings.spreadsheet_id.as_deref().unwrap_or(""),
        )
        .await?;
        self.set_setting("admin_phone", &settings.admin_phone).await?;
        self.set_setting("admin_email", &settings.admin_email).await?;
        Ok(())
    }
}

impl LibSqlSettingsRepository<'_> {
    async fn get_setting(&self, key: &str) -> Result<String> {
        let mut rows = self
            .conn
            .query("SELECT value FROM settings WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(value)
        } else {
            Err(crate::error::Error::NotFound(key.to_string()))
        }
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
                [key, value],
            )
            .await?;
        Ok(())
    }
}
