use sqlx::SqlitePool;

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance (best-effort, logged on failure)
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA temp_store=MEMORY;").execute(pool).await {
        tracing::warn!("Failed to set temp_store: {}", e);
    }

    // library_items: the local mirror of the Drive folder. drive_file_id is
    // the stable key across sync runs; rows have no life outside a run.
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS library_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            drive_file_id TEXT UNIQUE NOT NULL,
            title TEXT NOT NULL,
            author TEXT,
            cover_image_url TEXT,
            web_view_link TEXT NOT NULL,
            mime_type TEXT,
            modified_time TEXT,
            file_size INTEGER,
            sort_order INTEGER,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        )"#,
    )
    .execute(pool)
    .await?;

    // writing_submissions: lead-capture rows from the writing gate
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS writing_submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            source_ip TEXT,
            user_agent TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        )"#,
    )
    .execute(pool)
    .await?;

    // Additive migration: sort_order arrived after the first deployments.
    // A duplicate-column error means the column is already there.
    let query = "ALTER TABLE library_items ADD COLUMN sort_order INTEGER";
    if let Err(e) = sqlx::query(query).execute(pool).await {
        match &e {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_lowercase();
                if !msg.contains("duplicate") && !msg.contains("already exists") {
                    tracing::error!("Failed to add sort_order column to library_items: {}", e);
                    return Err(anyhow::anyhow!("Migration failed: {}", e));
                }
            }
            _ => {
                tracing::error!("Unexpected error adding sort_order to library_items: {}", e);
                return Err(anyhow::anyhow!("Migration failed: {}", e));
            }
        }
    }

    let indexes = [
        (
            "idx_library_items_sort",
            "CREATE INDEX IF NOT EXISTS idx_library_items_sort ON library_items(sort_order, title)",
        ),
        (
            "idx_writing_submissions_created",
            "CREATE INDEX IF NOT EXISTS idx_writing_submissions_created ON writing_submissions(created_at DESC)",
        ),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            match &e {
                sqlx::Error::Database(db_err) => {
                    let msg = db_err.message().to_lowercase();
                    if msg.contains("already exists") || msg.contains("duplicate") {
                        tracing::debug!("Index {} already exists, skipping", name);
                    } else {
                        tracing::warn!("Failed to create index {}: {}", name, e);
                    }
                }
                _ => {
                    tracing::warn!("Failed to create index {}: {}", name, e);
                }
            }
        }
    }

    Ok(())
}
