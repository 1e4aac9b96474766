//! Refresh coordinator for the library mirror.
//!
//! Owns the sync timestamps and the in-flight handle behind one mutex-guarded
//! state struct. At most one reconciliation run executes at a time; concurrent
//! callers join the running one through a broadcast channel and observe the
//! same outcome. Runs are spawned on the runtime so a disconnecting HTTP
//! caller cannot abort a run that has started.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::config::LibraryConfig;
use crate::library::drive::{DriveClient, RemoteLister};
use crate::library::error::SyncError;
use crate::library::{normalize, overrides, store};
use crate::metrics::Metrics;
use crate::types::{SyncOutcome, SyncStatus};

struct SyncState {
    last_attempt_at: Option<Instant>,
    last_success_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    /// Present only while a run is executing; waiters subscribe here.
    in_flight: Option<broadcast::Sender<SyncOutcome>>,
}

struct SyncInner {
    db: SqlitePool,
    config: LibraryConfig,
    metrics: Metrics,
    /// `None` when folder id / API key are not configured; every run then
    /// short-circuits to `NotConfigured` before any network call.
    lister: Option<Arc<dyn RemoteLister>>,
    state: Mutex<SyncState>,
}

/// Cheap-to-clone handle on the one sync coordinator of the process.
#[derive(Clone)]
pub struct LibrarySync {
    inner: Arc<SyncInner>,
}

impl LibrarySync {
    pub fn new(db: SqlitePool, config: LibraryConfig, metrics: Metrics) -> anyhow::Result<Self> {
        let lister: Option<Arc<dyn RemoteLister>> = match (&config.folder_id, &config.api_key) {
            (Some(folder), Some(key)) if !folder.is_empty() && !key.is_empty() => {
                Some(Arc::new(DriveClient::new(folder.clone(), key.clone())?))
            }
            _ => {
                info!("Library sync not configured; /library serves stored items only");
                None
            }
        };
        Ok(Self::with_lister(db, config, metrics, lister))
    }

    /// Constructor with an injected lister, used by tests to drive the
    /// coordinator without the network.
    pub fn with_lister(
        db: SqlitePool,
        config: LibraryConfig,
        metrics: Metrics,
        lister: Option<Arc<dyn RemoteLister>>,
    ) -> Self {
        Self {
            inner: Arc::new(SyncInner {
                db,
                config,
                metrics,
                lister,
                state: Mutex::new(SyncState {
                    last_attempt_at: None,
                    last_success_at: None,
                    last_error: None,
                    in_flight: None,
                }),
            }),
        }
    }

    /// Ensures the mirror is fresh: joins an in-flight run, skips inside the
    /// refresh interval (unless forced), or starts a new run. Every caller
    /// that joined the same run gets a clone of the same outcome.
    pub async fn ensure_synced(&self, force: bool) -> SyncOutcome {
        let mut rx = {
            let mut st = self.inner.state.lock().await;
            match &st.in_flight {
                // A run is executing; join it. `force` never starts a second run.
                Some(tx) => tx.subscribe(),
                None => {
                    let due = force
                        || st
                            .last_attempt_at
                            .map_or(true, |t| t.elapsed() >= self.inner.config.sync_interval());
                    if !due {
                        self.inner.metrics.inc_syncs_skipped();
                        return SyncOutcome::Skipped {
                            last_success_at: st.last_success_at,
                            last_error: st.last_error.clone(),
                        };
                    }

                    st.last_attempt_at = Some(Instant::now());
                    let (tx, rx) = broadcast::channel(1);
                    st.in_flight = Some(tx);

                    // Spawned, not awaited inline: a run always completes even
                    // if the caller that started it goes away.
                    let this = self.clone();
                    tokio::spawn(async move {
                        this.complete_run().await;
                    });
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            // The run task panicked or was torn down with the runtime.
            Err(_) => SyncOutcome::Failed { message: "sync run ended without a result".to_string() },
        }
    }

    pub async fn status(&self) -> SyncStatus {
        let st = self.inner.state.lock().await;
        SyncStatus { last_success_at: st.last_success_at, last_error: st.last_error.clone() }
    }

    async fn complete_run(&self) {
        let outcome = self.run_once().await;

        // Record the result and clear the handle before releasing waiters, so
        // a caller arriving after the broadcast sees up-to-date status.
        let tx = {
            let mut st = self.inner.state.lock().await;
            match &outcome {
                SyncOutcome::Synced { .. } => {
                    st.last_success_at = Some(Utc::now());
                    st.last_error = None;
                }
                SyncOutcome::Failed { message } => {
                    st.last_error = Some(message.clone());
                }
                _ => {}
            }
            st.in_flight.take()
        };

        if let Some(tx) = tx {
            // No receivers is fine: the caller that started the run may be gone.
            let _ = tx.send(outcome);
        }
    }

    async fn run_once(&self) -> SyncOutcome {
        match self.reconcile().await {
            Ok(count) => {
                self.inner.metrics.inc_syncs_completed();
                info!("Library sync completed. Synced {} items.", count);
                SyncOutcome::Synced { count }
            }
            Err(SyncError::ConfigMissing) => {
                warn!("{}", SyncError::ConfigMissing);
                SyncOutcome::NotConfigured
            }
            Err(e) => {
                self.inner.metrics.inc_syncs_failed();
                error!("Library sync failed: {}", e);
                SyncOutcome::Failed { message: e.to_string() }
            }
        }
    }

    /// One reconciliation run: full listing -> overrides -> normalize ->
    /// upsert everything -> delete what disappeared. A listing failure leaves
    /// the store untouched; a write failure keeps the writes already applied.
    async fn reconcile(&self) -> Result<usize, SyncError> {
        let lister = self.inner.lister.as_ref().ok_or(SyncError::ConfigMissing)?;
        self.inner.metrics.inc_syncs_started();

        let files = lister.list_files().await?;
        let overrides = overrides::load(Path::new(&self.inner.config.overrides_path)).await;

        let mut items: Vec<_> =
            files.iter().map(|f| normalize::normalize_file(f, &overrides)).collect();
        normalize::sort_items(&mut items);

        store::upsert_many(&self.inner.db, &items).await?;
        self.inner.metrics.add_items_upserted(items.len() as u64);

        let ids: Vec<&str> = items.iter().map(|i| i.drive_file_id.as_str()).collect();
        let deleted = store::delete_missing(&self.inner.db, &ids).await?;
        self.inner.metrics.add_items_deleted(deleted);

        Ok(items.len())
    }
}
