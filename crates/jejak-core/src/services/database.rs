//! Shared database service wrapper used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{
    Database, LibSqlRegistrationRepository, LibSqlSettingsRepository, RegistrationRepository,
    SettingsRepository,
};
use crate::models::{PersonalData, Registration, RegistrationId, Settings, Status};
use crate::Result;

/// Thread-safe service for DB and repository operations.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path).await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Create a registration from a submitted form value.
    pub async fn create_registration(&self, data: &PersonalData) -> Result<Registration> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.create(data).await
    }

    /// Fetch a registration by id.
    pub async fn get_registration(&self, id: RegistrationId) -> Result<Option<Registration>> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.get(id).await
    }

    /// List registrations newest-first.
    pub async fn list_registrations(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Registration>> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.list(limit, offset).await
    }

    /// List every stored registration, newest-first.
    pub async fn list_all_registrations(&self) -> Result<Vec<Registration>> {
        const PAGE_SIZE: usize = 500;

        let mut registrations = Vec::new();
        let mut offset = 0usize;

        loop {
            let batch = self.list_registrations(PAGE_SIZE, offset).await?;
            let count = batch.len();
            registrations.extend(batch);

            if count < PAGE_SIZE {
                break;
            }
            offset += count;
        }

        Ok(registrations)
    }

    /// Apply a status transition.
    pub async fn update_status(
        &self,
        id: RegistrationId,
        status: Status,
    ) -> Result<Registration> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.update_status(id, status).await
    }

    /// Quick-toggle a record between verified and pending.
    pub async fn toggle_status(&self, id: RegistrationId) -> Result<Registration> {
        let current = self
            .get_registration(id)
            .await?
            .ok_or_else(|| crate::Error::NotFound(id.to_string()))?;
        self.update_status(id, current.status.toggled()).await
    }

    /// Mark records as confirmed present in the remote set.
    pub async fn mark_synced(&self, ids: &[RegistrationId]) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.mark_synced(ids).await
    }

    /// Booking lookup by id, id suffix, or WhatsApp substring.
    pub async fn find_ticket(&self, query: &str) -> Result<Option<Registration>> {
        let db = self.db.lock().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());
        repo.find_ticket(query).await
    }

    /// Load settings.
    pub async fn load_settings(&self) -> Result<Settings> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.load().await
    }

    /// Save settings.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let db = self.db.lock().await;
        let repo = LibSqlSettingsRepository::new(db.connection());
        repo.save(settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(name: &str) -> PersonalData {
        PersonalData {
            full_name: name.to_string(),
            whatsapp: "081234567890".to_string(),
            mountain: "Gunung Prau".to_string(),
            package_category: "OPEN TRIP".to_string(),
            trip_package: "REGULER".to_string(),
            start_date: "2026-09-01".to_string(),
            ..PersonalData::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_create_and_list_roundtrip() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        service.create_registration(&sample_data("Budi Santoso")).await.unwrap();
        let registrations = service.list_registrations(10, 0).await.unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].data.full_name, "Budi Santoso");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_status_roundtrips() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        let created = service.create_registration(&sample_data("Budi Santoso")).await.unwrap();
        assert_eq!(created.status, Status::Pending);

        let verified = service.toggle_status(created.id).await.unwrap();
        assert_eq!(verified.status, Status::Verified);

        let pending = service.toggle_status(created.id).await.unwrap();
        assert_eq!(pending.status, Status::Pending);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn settings_roundtrip_through_service() {
        let service = DatabaseService::open_in_memory().await.unwrap();

        let mut settings = service.load_settings().await.unwrap();
        settings.spreadsheet_id = Some("sheet-1".to_string());
        service.save_settings(&settings).await.unwrap();

        let loaded = service.load_settings().await.unwrap();
        assert_eq!(loaded.spreadsheet_id.as_deref(), Some("sheet-1"));
    }
}
