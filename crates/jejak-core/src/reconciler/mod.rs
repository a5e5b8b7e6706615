//! Client/cloud reconciliation for registration records.
//!
//! Periodically fetches the remote record set, merges it with locally created
//! records, and surfaces newly-arrived remote records as transient
//! notifications. Failures are swallowed and logged: the cached remote set is
//! only ever replaced by a well-formed success response.

mod client;
mod poller;

pub use client::{parse_fetch_response, FetchError, FetchResult, SheetClient};
pub use poller::{spawn_poller, PollerHandle};

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{Registration, RegistrationId, Settings};
use crate::state::SyncState;
use crate::util::{compact_text, timestamp_millis_now};

/// Default polling period for the background refresh task.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Transient notification for a newly-arrived remote record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArrival {
    pub id: RegistrationId,
    pub full_name: String,
}

/// Observable sync diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub state: SyncState,
    /// Unix ms of the last successful fetch.
    pub last_sync: Option<i64>,
    /// Message from the most recent failed fetch, cleared on success.
    pub last_error: Option<String>,
}

#[derive(Default)]
struct CacheState {
    remote: Vec<Registration>,
    last_sync: Option<i64>,
    last_error: Option<String>,
    state: SyncState,
    pending_arrival: Option<NewArrival>,
}

/// Maintains an eventually-consistent merged view of remote and local
/// registration sets.
///
/// Shared behind an `Arc`: overlapping refreshes are not serialized, and a
/// response resolving after the owning view is gone lands in a cache with no
/// remaining readers. Both are safe because every success is an idempotent
/// replacement of the whole cache (last write wins).
pub struct Reconciler {
    client: SheetClient,
    settings: Mutex<Settings>,
    cache: Mutex<CacheState>,
}

impl Reconciler {
    pub fn new(settings: Settings) -> FetchResult<Self> {
        Ok(Self {
            client: SheetClient::new()?,
            settings: Mutex::new(settings),
            cache: Mutex::new(CacheState::default()),
        })
    }

    /// Current settings value.
    pub async fn settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    /// Replace the settings value.
    ///
    /// The cached remote set is kept; the next successful refresh against the
    /// new endpoint replaces it.
    pub async fn update_settings(&self, settings: Settings) {
        *self.settings.lock().await = settings;
    }

    /// Fetch the remote record set and replace the cache on success.
    ///
    /// No-op when the sync endpoint is not configured. Failures leave the
    /// cache untouched and are recorded in [`SyncStatus::last_error`] only —
    /// fire-and-forget semantics for the polling path.
    pub async fn refresh(&self) {
        let target = { self.settings.lock().await.fetch_target() };
        let Some(target) = target else {
            debug!("Refresh skipped: sync endpoint not configured");
            return;
        };

        {
            let mut cache = self.cache.lock().await;
            cache.state = SyncState::Syncing;
        }

        match self.client.fetch_all(&target).await {
            Ok(records) => self.apply_snapshot(records).await,
            Err(error) => {
                warn!("Cloud fetch failed: {error}");
                let mut cache = self.cache.lock().await;
                cache.last_error = Some(compact_text(&error.to_string()));
                cache.state = SyncState::Error;
            }
        }
    }

    /// Manual refresh that surfaces the failure instead of swallowing it.
    pub async fn try_refresh(&self) -> FetchResult<Vec<Registration>> {
        let target = { self.settings.lock().await.fetch_target() };
        let Some(target) = target else {
            return Err(FetchError::Api(
                "sync endpoint not configured".to_string(),
            ));
        };

        {
            let mut cache = self.cache.lock().await;
            cache.state = SyncState::Syncing;
        }

        match self.client.fetch_all(&target).await {
            Ok(records) => {
                self.apply_snapshot(records.clone()).await;
                Ok(records)
            }
            Err(error) => {
                let mut cache = self.cache.lock().await;
                cache.last_error = Some(compact_text(&error.to_string()));
                cache.state = SyncState::Error;
                drop(cache);
                Err(error)
            }
        }
    }

    async fn apply_snapshot(&self, records: Vec<Registration>) {
        let mut cache = self.cache.lock().await;

        // Arrival detection compares snapshot sizes: a previous non-empty set
        // plus a strictly larger new one means "something arrived", and the
        // first element of the new set is reported. Same-size replacements go
        // unnoticed and the attribution can be wrong.
        // TODO: compute the identifier-set difference between snapshots and
        // notify once per newly-seen id instead.
        if !cache.remote.is_empty() && records.len() > cache.remote.len() {
            if let Some(first) = records.first() {
                cache.pending_arrival = Some(NewArrival {
                    id: first.id,
                    full_name: first.data.full_name.clone(),
                });
            }
        }

        cache.remote = records;
        cache.last_sync = Some(timestamp_millis_now());
        cache.last_error = None;
        cache.state = SyncState::Synced;
    }

    /// Snapshot of the cached remote record set.
    pub async fn remote_records(&self) -> Vec<Registration> {
        self.cache.lock().await.remote.clone()
    }

    /// Identifiers present in the cached remote set.
    pub async fn remote_ids(&self) -> HashSet<RegistrationId> {
        self.cache
            .lock()
            .await
            .remote
            .iter()
            .map(|record| record.id)
            .collect()
    }

    /// Observable sync diagnostics.
    pub async fn status(&self) -> SyncStatus {
        let cache = self.cache.lock().await;
        SyncStatus {
            state: cache.state,
            last_sync: cache.last_sync,
            last_error: cache.last_error.clone(),
        }
    }

    /// Take the pending new-arrival notification, if one fired.
    ///
    /// Notifications are transient: taking one clears it.
    pub async fn take_arrival(&self) -> Option<NewArrival> {
        self.cache.lock().await.pending_arrival.take()
    }

    /// Merge the cached remote set with the given local records.
    pub async fn merged_with(&self, local: &[Registration]) -> Vec<Registration> {
        let remote = self.remote_records().await;
        merge(&remote, local)
    }
}

/// Merge remote and local record sets into the display sequence.
///
/// Pure and idempotent: the remote set comes first, then every local record
/// whose id the remote set doesn't contain, sorted by id descending (newest
/// first). A remote record always supersedes a local record with the same id.
#[must_use]
pub fn merge(remote: &[Registration], local: &[Registration]) -> Vec<Registration> {
    let remote_ids: HashSet<RegistrationId> = remote.iter().map(|record| record.id).collect();

    let mut combined: Vec<Registration> = remote.to_vec();
    combined.extend(
        local
            .iter()
            .filter(|record| !remote_ids.contains(&record.id))
            .cloned(),
    );
    combined.sort_by(|a, b| b.id.cmp(&a.id));
    combined
}

/// Filter a record sequence by a case-insensitive substring query.
///
/// Matches against name, phone, email, and destination. An empty query is the
/// order-preserving identity.
#[must_use]
pub fn filter(records: &[Registration], query: &str) -> Vec<Registration> {
    if query.is_empty() {
        return records.to_vec();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{PersonalData, Status};

    fn record(id: i64, name: &str, status: Status) -> Registration {
        Registration {
            id: RegistrationId::from_millis(id),
            data: PersonalData {
                full_name: name.to_string(),
                whatsapp: "081234567890".to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                mountain: "Gunung Semeru".to_string(),
                package_category: "OPEN TRIP".to_string(),
                trip_package: "REGULER".to_string(),
                start_date: "2026-09-01".to_string(),
                ..PersonalData::default()
            },
            status,
            synced: false,
        }
    }

    #[test]
    fn merge_prefers_remote_for_shared_ids() {
        let remote = vec![record(5, "Remote Copy", Status::Verified)];
        let local = vec![
            record(5, "Local Copy", Status::Pending),
            record(7, "Local Only", Status::Pending),
        ];

        let merged = merge(&remote, &local);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, RegistrationId::from_millis(7));
        assert_eq!(merged[0].data.full_name, "Local Only");
        assert_eq!(merged[1].id, RegistrationId::from_millis(5));
        assert_eq!(merged[1].data.full_name, "Remote Copy");
        assert_eq!(merged[1].status, Status::Verified);
    }

    #[test]
    fn merge_sorts_by_id_descending() {
        let remote = vec![
            record(3, "C", Status::Pending),
            record(9, "A", Status::Pending),
        ];
        let local = vec![record(6, "B", Status::Pending)];

        let ids: Vec<i64> = merge(&remote, &local)
            .iter()
            .map(|r| r.id.as_millis())
            .collect();
        assert_eq!(ids, vec![9, 6, 3]);
    }

    #[test]
    fn merge_is_idempotent() {
        let remote = vec![
            record(5, "Remote", Status::Verified),
            record(3, "Older Remote", Status::Pending),
        ];
        let local = vec![record(7, "Local", Status::Pending)];

        let once = merge(&remote, &local);
        let twice = merge(&once, &[]);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_empty_query_is_identity() {
        let records = vec![
            record(2, "Budi", Status::Pending),
            record(1, "Siti", Status::Pending),
        ];
        assert_eq!(filter(&records, ""), records);
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let mut siti = record(2, "Siti Rahma", Status::Pending);
        siti.data.mountain = "Gunung Rinjani".to_string();
        let records = vec![siti, record(1, "Budi Santoso", Status::Pending)];

        let by_name = filter(&records, "BUDI");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].data.full_name, "Budi Santoso");

        let by_mountain = filter(&records, "rinjani");
        assert_eq!(by_mountain.len(), 1);
        assert_eq!(by_mountain[0].data.full_name, "Siti Rahma");

        assert!(filter(&records, "no such climber").is_empty());
    }

    fn remote_set(ids: &[i64]) -> Vec<Registration> {
        ids.iter()
            .map(|id| record(*id, &format!("Climber {id}"), Status::Pending))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn growth_fires_one_arrival_for_first_element() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();

        reconciler.apply_snapshot(remote_set(&[30, 20, 10])).await;
        assert_eq!(reconciler.take_arrival().await, None);

        reconciler.apply_snapshot(remote_set(&[40, 30, 20, 10])).await;

        let arrival = reconciler.take_arrival().await.unwrap();
        assert_eq!(arrival.id, RegistrationId::from_millis(40));
        assert_eq!(arrival.full_name, "Climber 40");

        // Transient: taking the notification clears it.
        assert_eq!(reconciler.take_arrival().await, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn same_size_replacement_fires_no_arrival() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();

        reconciler.apply_snapshot(remote_set(&[30, 20, 10])).await;
        reconciler.apply_snapshot(remote_set(&[40, 30, 20])).await;

        assert_eq!(reconciler.take_arrival().await, None);
        assert_eq!(reconciler.remote_records().await.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn first_fetch_fires_no_arrival() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();

        reconciler.apply_snapshot(remote_set(&[30, 20, 10])).await;
        assert_eq!(reconciler.take_arrival().await, None);

        let status = reconciler.status().await;
        assert_eq!(status.state, SyncState::Synced);
        assert!(status.last_sync.is_some());
        assert_eq!(status.last_error, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unconfigured_refresh_is_a_no_op() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();

        reconciler.refresh().await;

        let status = reconciler.status().await;
        assert_eq!(status.state, SyncState::Offline);
        assert_eq!(status.last_sync, None);
        assert!(reconciler.remote_records().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_refresh_keeps_stale_cache_and_records_error() {
        // Unroutable endpoint: the request fails fast and the cache survives.
        let settings = Settings {
            script_url: Some("http://127.0.0.1:1/exec".to_string()),
            spreadsheet_id: Some("sheet-1".to_string()),
            ..Settings::default()
        };
        let reconciler = Reconciler::new(settings).unwrap();

        reconciler.apply_snapshot(remote_set(&[30, 20, 10])).await;
        reconciler.refresh().await;

        let status = reconciler.status().await;
        assert_eq!(status.state, SyncState::Error);
        assert!(status.last_error.is_some());
        assert_eq!(reconciler.remote_records().await.len(), 3);
        assert_eq!(reconciler.take_arrival().await, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_settings_gates_the_refresh() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();
        assert!(!reconciler.settings().await.is_sync_configured());

        let configured = Settings {
            script_url: Some("http://127.0.0.1:1/exec".to_string()),
            spreadsheet_id: Some("sheet-1".to_string()),
            ..Settings::default()
        };
        reconciler.update_settings(configured.clone()).await;
        assert_eq!(reconciler.settings().await, configured);

        // Configured now, so the refresh actually attempts the fetch (and
        // records the failure against the unroutable endpoint).
        reconciler.refresh().await;
        assert_eq!(reconciler.status().await.state, SyncState::Error);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn merged_with_uses_cached_remote_set() {
        let reconciler = Reconciler::new(Settings::default()).unwrap();
        reconciler
            .apply_snapshot(vec![record(5, "Remote Copy", Status::Verified)])
            .await;

        let local = vec![
            record(5, "Local Copy", Status::Pending),
            record(7, "Local Only", Status::Pending),
        ];
        let merged = reconciler.merged_with(&local).await;

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].data.full_name, "Local Only");
        assert_eq!(merged[1].data.full_name, "Remote Copy");
    }
}
