//! The lead-capture gate in front of the writing section: a valid submission
//! sets a 30-day access cookie; a filled honeypot field is dropped silently.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::ip::extract_ip_from_headers;
use crate::state::AppState;
use crate::types::UnlockRequest;

const ACCESS_COOKIE: &str = "writing_access";
const COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 30; // 30 days

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let raw = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()).unwrap_or("");
    raw.split(';')
        .filter_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn has_writing_access(headers: &HeaderMap) -> bool {
    parse_cookies(headers).get(ACCESS_COOKIE).map(String::as_str) == Some("granted")
}

fn access_cookie(grant: bool) -> String {
    let (value, max_age) = if grant { ("granted", COOKIE_MAX_AGE_SECONDS) } else { ("", 0) };
    let mut cookie =
        format!("{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax", ACCESS_COOKIE, value, max_age);
    if !cfg!(debug_assertions) {
        cookie.push_str("; Secure");
    }
    cookie
}

// Mirrors the pattern local@domain.tld: no whitespace, one '@', a dot with
// characters on both sides in the domain part.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    matches!(domain.split_once('.'), Some((head, tail)) if !head.is_empty() && !tail.is_empty())
}

pub async fn writing_status(headers: HeaderMap) -> Json<serde_json::Value> {
    Json(json!({ "unlocked": has_writing_access(&headers) }))
}

pub async fn unlock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(req): Form<UnlockRequest>,
) -> AppResult<Response> {
    // Bots fill every field; real visitors never see this one.
    if !req.riddle_answer.trim().is_empty() {
        return Ok(Json(json!({ "unlocked": false })).into_response());
    }

    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    let email = req.email.trim().to_lowercase();

    if first_name.is_empty() {
        return Err(AppError::ValidationError {
            field: "first_name".to_string(),
            message: "First name is required".to_string(),
        });
    }
    if last_name.is_empty() {
        return Err(AppError::ValidationError {
            field: "last_name".to_string(),
            message: "Last name is required".to_string(),
        });
    }
    if !is_valid_email(&email) {
        return Err(AppError::ValidationError {
            field: "email".to_string(),
            message: "A valid email address is required".to_string(),
        });
    }

    let source_ip = extract_ip_from_headers(&headers).to_string();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    sqlx::query(
        r#"INSERT INTO writing_submissions (first_name, last_name, email, source_ip, user_agent)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(&email)
    .bind(&source_ip)
    .bind(&user_agent)
    .execute(&state.db)
    .await?;
    state.metrics.inc_submissions_recorded();

    let mut res = Json(json!({ "unlocked": true })).into_response();
    if let Ok(value) = HeaderValue::from_str(&access_cookie(true)) {
        res.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(res)
}

pub async fn reset() -> Response {
    let mut res = Json(json!({ "unlocked": false })).into_response();
    if let Ok(value) = HeaderValue::from_str(&access_cookie(false)) {
        res.headers_mut().append(header::SET_COOKIE, value);
    }
    res
}
