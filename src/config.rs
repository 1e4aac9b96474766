use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Settings for the Google Drive library mirror.
///
/// `folder_id` and `api_key` are optional on purpose: without them the sync
/// engine reports "not configured" on every run instead of refusing to start.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    pub folder_id: Option<String>,
    pub api_key: Option<String>,
    pub sync_interval_minutes: u64,
    pub overrides_path: String,
}

impl LibraryConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_minutes * 60)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub library: LibraryConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: leseregal.toml (in CWD)
        .add_source(::config::File::with_name("leseregal").required(false));

    if let Ok(custom_path) = std::env::var("LESEREGAL_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("LESEREGAL").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Library sync
    if cfg.library.sync_interval_minutes == 0 {
        return Err(anyhow::anyhow!("library.sync_interval_minutes must be > 0"));
    }
    if cfg.library.overrides_path.trim().is_empty() {
        return Err(anyhow::anyhow!("library.overrides_path must not be empty"));
    }
    match (&cfg.library.folder_id, &cfg.library.api_key) {
        (Some(_), Some(_)) | (None, None) => {}
        _ => tracing::warn!(
            "Only one of library.folder_id / library.api_key is set; library sync stays disabled"
        ),
    }

    // Admin export: either both credentials or none
    if cfg.admin.username.is_some() != cfg.admin.password.is_some() {
        return Err(anyhow::anyhow!("admin.username and admin.password must be set together"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
