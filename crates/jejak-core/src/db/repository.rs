//! Registration repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use libsql::{Connection, Value};

use crate::error::{Error, Result};
use crate::models::{PersonalData, Registration, RegistrationId, Status};

const REGISTRATION_COLUMNS: &str = "id, full_name, whatsapp, email, address, mountain, \
     package_category, trip_package, start_date, climber_code, identity_image, status, synced";

/// Trait for registration storage operations (async)
#[allow(async_fn_in_trait)]
pub trait RegistrationRepository {
    /// Create a new registration from a submitted form value.
    ///
    /// Assigns the identifier and starts the record at `Pending`; storage
    /// failures surface as errors.
    async fn create(&self, data: &PersonalData) -> Result<Registration>;

    /// Get a registration by id
    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>>;

    /// List registrations, newest first
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Registration>>;

    /// Apply a status transition to the matching record
    async fn update_status(&self, id: RegistrationId, status: Status) -> Result<Registration>;

    /// Mark records as confirmed present in the remote set
    async fn mark_synced(&self, ids: &[RegistrationId]) -> Result<()>;

    /// Booking lookup: exact id, id suffix, or WhatsApp substring
    async fn find_ticket(&self, query: &str) -> Result<Option<Registration>>;
}

/// libSQL implementation of `RegistrationRepository`
pub struct LibSqlRegistrationRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlRegistrationRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_registration(row: &libsql::Row) -> Result<Registration> {
        let id: i64 = row.get(0)?;
        let status: String = row.get(11)?;

        Ok(Registration {
            id: RegistrationId::from_millis(id),
            data: PersonalData {
                full_name: row.get(1)?,
                whatsapp: row.get(2)?,
                email: row.get(3)?,
                address: row.get(4)?,
                mountain: row.get(5)?,
                package_category: row.get(6)?,
                trip_package: row.get(7)?,
                start_date: row.get(8)?,
                climber_code: text_or_none(row.get_value(9)?),
                identity_image: text_or_none(row.get_value(10)?),
            },
            status: status.parse()?,
            synced: row.get::<i32>(12)? != 0,
        })
    }
}

fn text_or_none(value: Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text),
        _ => None,
    }
}

fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_string()))
}

impl RegistrationRepository for LibSqlRegistrationRepository<'_> {
    async fn create(&self, data: &PersonalData) -> Result<Registration> {
        let registration = Registration::new(data.clone());

        let params: Vec<Value> = vec![
            Value::Integer(registration.id.as_millis()),
            Value::Text(registration.data.full_name.clone()),
            Value::Text(registration.data.whatsapp.clone()),
            Value::Text(registration.data.email.clone()),
            Value::Text(registration.data.address.clone()),
            Value::Text(registration.data.mountain.clone()),
            Value::Text(registration.data.package_category.clone()),
            Value::Text(registration.data.trip_package.clone()),
            Value::Text(registration.data.start_date.clone()),
            opt_text(registration.data.climber_code.as_deref()),
            opt_text(registration.data.identity_image.as_deref()),
            Value::Text(registration.status.to_string()),
            Value::Integer(i64::from(registration.synced)),
        ];

        self.conn
            .execute(
                "INSERT INTO registrations (id, full_name, whatsapp, email, address, mountain, \
                 package_category, trip_package, start_date, climber_code, identity_image, \
                 status, synced) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params,
            )
            .await?;

        Ok(registration)
    }

    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = ?"),
                [Value::Integer(id.as_millis())],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_registration(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Registration>> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                     ORDER BY id DESC LIMIT ? OFFSET ?"
                ),
                [
                    Value::Integer(limit as i64),
                    Value::Integer(offset as i64),
                ],
            )
            .await?;

        let mut registrations = Vec::new();
        while let Some(row) = rows.next().await? {
            registrations.push(Self::parse_registration(&row)?);
        }
        Ok(registrations)
    }

    async fn update_status(&self, id: RegistrationId, status: Status) -> Result<Registration> {
        let changed = self
            .conn
            .execute(
                "UPDATE registrations SET status = ? WHERE id = ?",
                [
                    Value::Text(status.to_string()),
                    Value::Integer(id.as_millis()),
                ],
            )
            .await?;

        if changed == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn mark_synced(&self, ids: &[RegistrationId]) -> Result<()> {
        for id in ids {
            self.conn
                .execute(
                    "UPDATE registrations SET synced = 1 WHERE id = ?",
                    [Value::Integer(id.as_millis())],
                )
                .await?;
        }
        Ok(())
    }

    async fn find_ticket(&self, query: &str) -> Result<Option<Registration>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput(
                "Ticket lookup query cannot be empty".to_string(),
            ));
        }

        // Matches the booking-number lookup the registration form offers:
        // exact id, id suffix, or WhatsApp substring, newest match first.
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                     WHERE CAST(id AS TEXT) = ?1 \
                        OR substr(CAST(id AS TEXT), -length(?1)) = ?1 \
                        OR instr(whatsapp, ?1) > 0 \
                     ORDER BY id DESC LIMIT 1"
                ),
                [Value::Text(query.to_string())],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_registration(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::Database;

    fn sample_data(name: &str, whatsapp: &str) -> PersonalData {
        PersonalData {
            full_name: name.to_string(),
            whatsapp: whatsapp.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            address: "Jakarta".to_string(),
            mountain: "Gunung Semeru".to_string(),
            package_category: "OPEN TRIP".to_string(),
            trip_package: "REGULER".to_string(),
            start_date: "2026-09-01".to_string(),
            climber_code: None,
            identity_image: None,
        }
    }

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_and_get_roundtrip() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let created = repo.create(&sample_data("Budi Santoso", "0811111111")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.status, Status::Pending);
        assert!(!fetched.synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_preserves_optional_fields() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let mut data = sample_data("Siti Rahma", "0822222222");
        data.mountain = "Gunung Merbabu".to_string();
        data.climber_code = Some("MB-2026-0042".to_string());
        data.identity_image = Some("data:image/png;base64,aGVsbG8=".to_string());

        let created = repo.create(&data).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.data.climber_code.as_deref(), Some("MB-2026-0042"));
        assert_eq!(
            fetched.data.identity_image.as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_returns_newest_first() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        // Ids are millisecond stamps; creations in the same millisecond are
        // possible under test, so seed distinct records sequentially.
        let first = repo.create(&sample_data("First Climber", "0811")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create(&sample_data("Second Climber", "0812")).await.unwrap();

        let listed = repo.list(10, 0).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_status_applies_transition() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let created = repo.create(&sample_data("Budi Santoso", "0811111111")).await.unwrap();
        let updated = repo.update_status(created.id, Status::Verified).await.unwrap();

        assert_eq!(updated.status, Status::Verified);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_status_rejects_unknown_id() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let missing = RegistrationId::from_millis(42);
        let error = repo.update_status(missing, Status::Verified).await.unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mark_synced_flags_records() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let created = repo.create(&sample_data("Budi Santoso", "0811111111")).await.unwrap();
        repo.mark_synced(&[created.id]).await.unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert!(fetched.synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn find_ticket_matches_id_suffix_and_whatsapp() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        let created = repo.create(&sample_data("Budi Santoso", "081234567890")).await.unwrap();
        let id_text = created.id.to_string();
        let suffix = &id_text[id_text.len() - 4..];

        let by_exact = repo.find_ticket(&id_text).await.unwrap().unwrap();
        assert_eq!(by_exact.id, created.id);

        let by_suffix = repo.find_ticket(suffix).await.unwrap().unwrap();
        assert_eq!(by_suffix.id, created.id);

        let by_whatsapp = repo.find_ticket("34567").await.unwrap().unwrap();
        assert_eq!(by_whatsapp.id, created.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn find_ticket_misses_cleanly() {
        let db = setup().await;
        let repo = LibSqlRegistrationRepository::new(db.connection());

        repo.create(&sample_data("Budi Santoso", "0811111111")).await.unwrap();

        assert_eq!(repo.find_ticket("999999999").await.unwrap(), None);
        assert!(repo.find_ticket("   ").await.is_err());
    }
}
