//! Manually curated metadata overrides, keyed by Drive file id.
//!
//! The override document is read fresh on every sync run. A missing or
//! malformed document degrades to "no overrides" — a corrupt metadata file
//! must never block the live mirror from refreshing.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Sparse per-file override; any absent field falls back to the remote value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Override {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_image_url: Option<String>,
    pub web_view_link: Option<String>,
    #[serde(default, deserialize_with = "finite_number")]
    pub sort_order: Option<f64>,
}

pub type OverrideMap = HashMap<String, Override>;

// Accepts only finite JSON numbers; anything else (strings, bool, null)
// degrades to None instead of failing the whole document.
fn finite_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
}

pub async fn load(path: &Path) -> OverrideMap {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return OverrideMap::new(),
        Err(e) => {
            warn!("Failed to read library metadata overrides at {}: {}", path.display(), e);
            return OverrideMap::new();
        }
    };

    match serde_json::from_str::<OverrideMap>(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!("Failed to parse library metadata overrides. Continuing without overrides: {}", e);
            OverrideMap::new()
        }
    }
}
