use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leseregal::state::AppState;
use leseregal::{config, db, middleware, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (stdout + daily file rotation under ./logs)
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "leseregal.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Keep the guards alive so the non-blocking writers flush on shutdown
    let _log_guards = (stdout_guard, file_guard);

    // Load configuration (embedded defaults -> leseregal.toml -> env/.env)
    let app_cfg = config::load()?;

    // Prepare data dir (if sqlite)
    let db_url = &app_cfg.database.url;
    config::ensure_sqlite_parent_dir(db_url)?;
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("Creating SQLite database at {}", db_url);
        Sqlite::create_database(db_url).await?;
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                let _ = sqlx::query("PRAGMA foreign_keys=ON;").execute(&mut *conn).await;
                let _ = sqlx::query("PRAGMA busy_timeout=10000;").execute(&mut *conn).await;
                Ok(())
            })
        })
        .connect(db_url)
        .await?;

    // Initialize DB schema
    db::init_db(&pool).await?;

    // App state (includes the library sync coordinator)
    let state = AppState::new(pool.clone(), app_cfg.clone())?;

    // Static assets of the site (fallback behind the API routes)
    let static_service = ServeDir::new("public");

    let app = Router::new()
        .route("/healthz", get(routes::health::healthz))
        .route("/readyz", get(routes::health::readyz))
        .route("/metrics", get(routes::health::metrics))
        .route("/metrics/prometheus", get(routes::health::metrics_prometheus))
        .route("/version", get(routes::health::version))
        .route("/library", get(routes::library::get_library))
        .route("/library/status", get(routes::library::sync_status))
        .route("/writing", get(routes::writing::writing_status))
        .route("/writing/unlock", post(routes::writing::unlock))
        .route("/writing/reset", get(routes::writing::reset))
        .route("/admin/writing-submissions", get(routes::admin::list_submissions))
        .route("/admin/writing-submissions.csv", get(routes::admin::export_submissions_csv))
        .fallback_service(static_service)
        .with_state(state)
        // Global body limit - the unlock form is tiny
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::security_headers::security_headers_middleware));

    // CORS: permissive in debug for local development, same-origin in release
    let app = if cfg!(debug_assertions) { app.layer(CorsLayer::permissive()) } else { app };

    // Server listen addr (from config)
    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Leseregal listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
