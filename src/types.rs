use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the local library mirror.
///
/// `drive_file_id` identifies the same logical document across sync runs;
/// every other field is replaced wholesale on each reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LibraryItem {
    pub drive_file_id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub web_view_link: String,
    pub mime_type: Option<String>,
    pub modified_time: Option<String>,
    pub file_size: Option<i64>,
    pub sort_order: Option<i64>,
}

/// Result of one `ensure_synced` call, shared by every caller that joined
/// the same run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncOutcome {
    Synced {
        count: usize,
    },
    Skipped {
        last_success_at: Option<DateTime<Utc>>,
        last_error: Option<String>,
    },
    NotConfigured,
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryPageResponse {
    pub items: Vec<LibraryItem>,
    pub sync: SyncOutcome,
    pub status: SyncStatus,
}

// Writing gate DTOs

#[derive(Debug, Clone, Deserialize)]
pub struct UnlockRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Honeypot field; a filled value means a bot submitted the form.
    #[serde(default)]
    pub riddle_answer: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WritingSubmission {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}
