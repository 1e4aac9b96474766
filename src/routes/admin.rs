//! Admin export of writing submissions (JSON and CSV).
//!
//! Basic-auth protected with constant-time credential comparison, an optional
//! IP allowlist, and per-IP failed-attempt limiting. Stays disabled (503)
//! until credentials are configured.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use base64::prelude::*;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::ip::extract_ip_from_headers;
use crate::state::AppState;
use crate::types::WritingSubmission;

const AUTH_WINDOW: Duration = Duration::from_secs(15 * 60);
const AUTH_MAX_ATTEMPTS: u32 = 10;

struct AttemptState {
    attempts: u32,
    first_attempt_at: Instant,
}

/// Per-IP failed-authentication tracking for the admin endpoints.
#[derive(Clone, Default)]
pub struct AdminAttempts {
    inner: Arc<Mutex<HashMap<String, AttemptState>>>,
}

impl AdminAttempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ok when the IP may attempt authentication; Err carries retry-after seconds.
    fn check(&self, ip: &str) -> Result<(), u64> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(state) = map.get(ip) {
            let elapsed = state.first_attempt_at.elapsed();
            if elapsed > AUTH_WINDOW {
                map.remove(ip);
            } else if state.attempts >= AUTH_MAX_ATTEMPTS {
                return Err(AUTH_WINDOW.saturating_sub(elapsed).as_secs().max(1));
            }
        }
        Ok(())
    }

    fn register_failure(&self, ip: &str) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match map.get_mut(ip) {
            Some(state) if state.first_attempt_at.elapsed() <= AUTH_WINDOW => {
                state.attempts += 1;
            }
            _ => {
                map.insert(
                    ip.to_string(),
                    AttemptState { attempts: 1, first_attempt_at: Instant::now() },
                );
            }
        }
    }

    fn clear(&self, ip: &str) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(ip);
    }
}

// Constant-time comparison to prevent timing attacks on the credentials.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn unauthorized(message: &str) -> Response {
    let mut res = AppError::Unauthorized(message.to_string()).into_response();
    res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"Writing Admin\", charset=\"UTF-8\""),
    );
    res
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let (expected_user, expected_pass) =
        match (&state.config.admin.username, &state.config.admin.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => (user, pass),
            _ => {
                return Err(AppError::ServiceUnavailable(
                    "Admin endpoint is not configured.".to_string(),
                )
                .into_response())
            }
        };

    let ip = extract_ip_from_headers(headers).to_string();

    let allowed = &state.config.admin.allowed_ips;
    if !allowed.is_empty() && !allowed.iter().any(|a| a == &ip) {
        return Err(AppError::Forbidden("Forbidden.".to_string()).into_response());
    }

    if let Err(retry_after_seconds) = state.admin_attempts.check(&ip) {
        return Err(AppError::RateLimited { retry_after_seconds }.into_response());
    }

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let Some(encoded) = auth.strip_prefix("Basic ") else {
        state.admin_attempts.register_failure(&ip);
        return Err(unauthorized("Authentication required."));
    };

    let decoded = BASE64_STANDARD
        .decode(encoded.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    let Some(decoded) = decoded else {
        state.admin_attempts.register_failure(&ip);
        return Err(unauthorized("Invalid authentication header."));
    };
    let Some((username, password)) = decoded.split_once(':') else {
        state.admin_attempts.register_failure(&ip);
        return Err(unauthorized("Invalid authentication header."));
    };

    if !constant_time_eq(username.as_bytes(), expected_user.as_bytes())
        || !constant_time_eq(password.as_bytes(), expected_pass.as_bytes())
    {
        state.admin_attempts.register_failure(&ip);
        return Err(unauthorized("Invalid credentials."));
    }

    state.admin_attempts.clear(&ip);
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, 1000)
}

async fn find_recent(db: &sqlx::SqlitePool, limit: i64) -> Result<Vec<WritingSubmission>, sqlx::Error> {
    sqlx::query_as::<_, WritingSubmission>(
        r#"SELECT id, first_name, last_name, email, source_ip, user_agent, created_at
           FROM writing_submissions
           ORDER BY datetime(created_at) DESC, id DESC
           LIMIT ?1"#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn list_submissions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    if let Err(denied) = require_admin(&state, &headers) {
        return Ok(denied);
    }

    let limit = clamp_limit(query.limit, 250);
    let submissions = find_recent(&state.db, limit).await?;
    Ok(Json(json!({ "total": submissions.len(), "submissions": submissions })).into_response())
}

fn escape_csv(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or("").replace('"', "\"\""))
}

pub async fn export_submissions_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    if let Err(denied) = require_admin(&state, &headers) {
        return Ok(denied);
    }

    let limit = clamp_limit(query.limit, 1000);
    let submissions = find_recent(&state.db, limit).await?;

    let mut lines = vec![
        ["id", "created_at", "first_name", "last_name", "email", "source_ip", "user_agent"]
            .map(|col| escape_csv(Some(col)))
            .join(","),
    ];
    for row in &submissions {
        let id = row.id.to_string();
        lines.push(
            [
                Some(id.as_str()),
                Some(row.created_at.as_str()),
                Some(row.first_name.as_str()),
                Some(row.last_name.as_str()),
                Some(row.email.as_str()),
                row.source_ip.as_deref(),
                row.user_agent.as_deref(),
            ]
            .map(escape_csv)
            .join(","),
        );
    }

    let filename = format!("writing-submissions-{}.csv", Utc::now().format("%Y-%m-%d"));
    let response = (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        lines.join("\n"),
    );
    Ok(response.into_response())
}
