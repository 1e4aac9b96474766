//! Merges raw Drive files with their overrides into canonical library items
//! and defines the canonical ordering.

use std::cmp::Ordering;

use crate::library::drive::DriveFile;
use crate::library::overrides::{Override, OverrideMap};
use crate::types::LibraryItem;

const UNTITLED: &str = "Untitled";

/// Strips a trailing `.pdf` (case-insensitive) and surrounding whitespace.
pub fn strip_pdf_extension(name: &str) -> String {
    let trimmed = name.trim();
    let n = trimmed.len();
    if n >= 4 && trimmed.is_char_boundary(n - 4) && trimmed[n - 4..].eq_ignore_ascii_case(".pdf") {
        trimmed[..n - 4].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty()).map(|s| s.to_string())
}

/// Builds the canonical record for one remote file. Override fields win,
/// remote fields fill the gaps, and the title falls back to a fixed
/// placeholder when both sources are empty.
pub fn normalize_file(file: &DriveFile, overrides: &OverrideMap) -> LibraryItem {
    let fallback = Override::default();
    let ov = overrides.get(&file.id).unwrap_or(&fallback);

    let stripped = strip_pdf_extension(&file.name);
    let title = non_empty(ov.title.as_ref())
        .or_else(|| if stripped.is_empty() { None } else { Some(stripped) })
        .unwrap_or_else(|| UNTITLED.to_string());

    let owner_name = file.owners.first().and_then(|o| o.display_name.clone());

    LibraryItem {
        drive_file_id: file.id.clone(),
        title,
        author: non_empty(ov.author.as_ref()).or(owner_name),
        cover_image_url: non_empty(ov.cover_image_url.as_ref()).or_else(|| file.thumbnail_link.clone()),
        web_view_link: non_empty(ov.web_view_link.as_ref()).unwrap_or_else(|| file.web_view_link.clone()),
        mime_type: file.mime_type.clone(),
        modified_time: file.modified_time.clone(),
        file_size: file.size.as_ref().and_then(|s| s.parse::<i64>().ok()),
        sort_order: ov.sort_order.filter(|n| n.is_finite()).map(|n| n as i64),
    }
}

/// Canonical ordering: positioned items first ascending, then unpositioned
/// items by title (case-insensitive); ties fall back to the file id so the
/// sequence is deterministic.
pub fn sort_items(items: &mut [LibraryItem]) {
    items.sort_by(compare_items);
}

fn compare_items(a: &LibraryItem, b: &LibraryItem) -> Ordering {
    match (a.sort_order, b.sort_order) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.drive_file_id.cmp(&b.drive_file_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.drive_file_id.cmp(&b.drive_file_id)),
    }
}
