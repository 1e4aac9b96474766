use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Operational counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub syncs_started: Arc<AtomicUsize>,
    pub syncs_completed: Arc<AtomicUsize>,
    pub syncs_failed: Arc<AtomicUsize>,
    pub syncs_skipped: Arc<AtomicUsize>,
    pub items_upserted: Arc<AtomicU64>,
    pub items_deleted: Arc<AtomicU64>,
    pub submissions_recorded: Arc<AtomicUsize>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            syncs_started: Arc::new(AtomicUsize::new(0)),
            syncs_completed: Arc::new(AtomicUsize::new(0)),
            syncs_failed: Arc::new(AtomicUsize::new(0)),
            syncs_skipped: Arc::new(AtomicUsize::new(0)),
            items_upserted: Arc::new(AtomicU64::new(0)),
            items_deleted: Arc::new(AtomicU64::new(0)),
            submissions_recorded: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_syncs_started(&self) {
        self.syncs_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_syncs_completed(&self) {
        self.syncs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_syncs_failed(&self) {
        self.syncs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_syncs_skipped(&self) {
        self.syncs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_items_upserted(&self, count: u64) {
        self.items_upserted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_items_deleted(&self, count: u64) {
        self.items_deleted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_submissions_recorded(&self) {
        self.submissions_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            syncs_started: self.syncs_started.load(Ordering::Relaxed),
            syncs_completed: self.syncs_completed.load(Ordering::Relaxed),
            syncs_failed: self.syncs_failed.load(Ordering::Relaxed),
            syncs_skipped: self.syncs_skipped.load(Ordering::Relaxed),
            items_upserted: self.items_upserted.load(Ordering::Relaxed),
            items_deleted: self.items_deleted.load(Ordering::Relaxed),
            submissions_recorded: self.submissions_recorded.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub syncs_started: usize,
    pub syncs_completed: usize,
    pub syncs_failed: usize,
    pub syncs_skipped: usize,
    pub items_upserted: u64,
    pub items_deleted: u64,
    pub submissions_recorded: usize,
    pub uptime_seconds: u64,
}
