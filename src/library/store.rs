//! Keyed store for library items: upsert-by-unique-key, delete-by-negated-key-set.
//!
//! Each statement is individually atomic; the batch is deliberately not one
//! transaction, so a crash mid-run leaves valid (possibly stale) rows and a
//! retry converges. The deletion sweep runs after the upserts: a successful
//! run leaves the stored id set exactly equal to the listed id set.

use sqlx::SqlitePool;

use crate::library::error::SyncError;
use crate::types::LibraryItem;

const ITEM_COLUMNS: &str = "drive_file_id, title, author, cover_image_url, web_view_link, \
     mime_type, modified_time, file_size, sort_order";

// Positioned items first ascending, then by author and title; matches the
// in-memory ordering in `normalize::sort_items` closely enough for display.
const CANONICAL_ORDER: &str = "CASE WHEN sort_order IS NULL THEN 1 ELSE 0 END ASC, \
     sort_order ASC, COALESCE(author, '') ASC, title ASC, drive_file_id ASC";

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<LibraryItem>, sqlx::Error> {
    let sql = format!("SELECT {} FROM library_items ORDER BY {}", ITEM_COLUMNS, CANONICAL_ORDER);
    sqlx::query_as::<_, LibraryItem>(&sql).fetch_all(pool).await
}

/// Upserts every record keyed by `drive_file_id`, replacing all mutable
/// fields. The change guard on the `DO UPDATE` keeps `updated_at` stable when
/// nothing changed, so re-syncing an unchanged listing is idempotent.
pub async fn upsert_many(pool: &SqlitePool, items: &[LibraryItem]) -> Result<(), SyncError> {
    for item in items {
        upsert(pool, item).await?;
    }
    Ok(())
}

async fn upsert(pool: &SqlitePool, item: &LibraryItem) -> Result<(), SyncError> {
    sqlx::query(
        r#"INSERT INTO library_items (
            drive_file_id, title, author, cover_image_url, web_view_link,
            mime_type, modified_time, file_size, sort_order
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(drive_file_id) DO UPDATE SET
            title = excluded.title,
            author = excluded.author,
            cover_image_url = excluded.cover_image_url,
            web_view_link = excluded.web_view_link,
            mime_type = excluded.mime_type,
            modified_time = excluded.modified_time,
            file_size = excluded.file_size,
            sort_order = excluded.sort_order,
            updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')
        WHERE title IS NOT excluded.title
           OR author IS NOT excluded.author
           OR cover_image_url IS NOT excluded.cover_image_url
           OR web_view_link IS NOT excluded.web_view_link
           OR mime_type IS NOT excluded.mime_type
           OR modified_time IS NOT excluded.modified_time
           OR file_size IS NOT excluded.file_size
           OR sort_order IS NOT excluded.sort_order"#,
    )
    .bind(&item.drive_file_id)
    .bind(&item.title)
    .bind(&item.author)
    .bind(&item.cover_image_url)
    .bind(&item.web_view_link)
    .bind(&item.mime_type)
    .bind(&item.modified_time)
    .bind(item.file_size)
    .bind(item.sort_order)
    .execute(pool)
    .await?;
    Ok(())
}

/// Deletes every stored row whose id is not in the current listing.
/// An empty listing deletes everything; zero-result protection belongs to a
/// higher layer if anyone wants it.
pub async fn delete_missing(pool: &SqlitePool, ids: &[&str]) -> Result<u64, SyncError> {
    if ids.is_empty() {
        let result = sqlx::query("DELETE FROM library_items").execute(pool).await?;
        return Ok(result.rows_affected());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("DELETE FROM library_items WHERE drive_file_id NOT IN ({})", placeholders);
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
