//! Shared cross-client state types.

/// Unified cloud-sync state shown by the CLI and any future admin shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    /// No remote endpoint configured, or no fetch attempted yet.
    #[default]
    Offline,
    /// A fetch is in flight.
    Syncing,
    /// The last fetch replaced the cached remote set.
    Synced,
    /// The last fetch failed; the stale cache is still served.
    Error,
}
