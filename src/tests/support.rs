//! Shared fixtures for the test modules.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::{AdminConfig, AppConfig, LibraryConfig};
use crate::library::drive::{DriveFile, RemoteLister};
use crate::library::error::SyncError;
use crate::library::sync::LibrarySync;
use crate::metrics::Metrics;
use crate::routes::admin::AdminAttempts;
use crate::state::AppState;

/// In-memory SQLite with the full schema applied. A single connection keeps
/// every query on the same in-memory database.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    pool
}

pub fn library_config(sync_interval_minutes: u64) -> LibraryConfig {
    LibraryConfig {
        folder_id: Some("test-folder".to_string()),
        api_key: Some("test-key".to_string()),
        sync_interval_minutes,
        overrides_path: "does-not-exist/library-metadata.json".to_string(),
    }
}

pub fn drive_file(id: &str, name: &str) -> DriveFile {
    DriveFile {
        id: id.to_string(),
        name: name.to_string(),
        web_view_link: format!("https://drive.google.com/file/d/{}/view", id),
        thumbnail_link: None,
        owners: vec![],
        mime_type: Some("application/pdf".to_string()),
        modified_time: Some("2024-05-01T12:00:00.000Z".to_string()),
        size: Some("1024".to_string()),
    }
}

/// Scriptable in-process lister: counts fetches, optionally sleeps to keep a
/// run in flight, optionally fails.
pub struct FakeLister {
    pub files: Mutex<Vec<DriveFile>>,
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub fail: AtomicBool,
}

impl FakeLister {
    pub fn new(files: Vec<DriveFile>) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: AtomicBool::new(false),
        })
    }

    pub fn with_delay(files: Vec<DriveFile>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(files),
            calls: AtomicUsize::new(0),
            delay,
            fail: AtomicBool::new(false),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_files(&self, files: Vec<DriveFile>) {
        *self.files.lock().unwrap() = files;
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteLister for FakeLister {
    async fn list_files(&self) -> Result<Vec<DriveFile>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::remote(Some(500), "listing backend unavailable"));
        }
        Ok(self.files.lock().unwrap().clone())
    }
}

/// App state wired to the given lister (`None` = library sync unconfigured).
pub async fn setup_state(lister: Option<Arc<FakeLister>>) -> AppState {
    setup_state_with_admin(lister, AdminConfig::default()).await
}

pub async fn setup_state_with_admin(
    lister: Option<Arc<FakeLister>>,
    admin: AdminConfig,
) -> AppState {
    let pool = setup_db().await;
    let metrics = Metrics::new();
    let mut config = AppConfig::default();
    config.admin = admin;
    let lister = lister.map(|l| l as Arc<dyn RemoteLister>);
    let library =
        LibrarySync::with_lister(pool.clone(), library_config(60), metrics.clone(), lister);
    AppState {
        db: pool,
        config: Arc::new(config),
        metrics,
        library,
        admin_attempts: AdminAttempts::new(),
    }
}
