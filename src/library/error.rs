use thiserror::Error;

/// Failure modes of a single sync run.
///
/// These never escape to the HTTP layer as faults: the coordinator folds them
/// into a [`crate::types::SyncOutcome`] so the library page can always render
/// whatever the store currently holds.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Folder id or API key is absent; checked before any network call.
    #[error("library sync is not configured (set library.folder_id and library.api_key)")]
    ConfigMissing,

    /// The Drive listing fetch failed; `status` is absent for transport errors.
    #[error("Google Drive API error{}: {message}", status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    RemoteUnavailable { status: Option<u16>, message: String },

    /// An upsert or delete failed; earlier writes of the run are kept.
    #[error("library store write failed: {0}")]
    StoreWrite(#[from] sqlx::Error),
}

impl SyncError {
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        SyncError::RemoteUnavailable { status, message: message.into() }
    }
}
