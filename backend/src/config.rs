//! Process configuration, read once from the environment at startup.

use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Optional JSON seed file, loaded at startup when the database is empty.
    pub seed_path: Option<String>,
    /// When set, internal error details are included in 5xx response bodies.
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "reviews.sqlite".to_string());
        let seed_path = env::var("SEED_PATH").ok().filter(|p| !p.is_empty());
        let dev_mode = env::var("DEV_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Config {
            host,
            port,
            database_path,
            seed_path,
            dev_mode,
        }
    }
}

static DEV_MODE: OnceLock<bool> = OnceLock::new();

/// Records the dev-mode flag for the lifetime of the process. Later calls
/// are no-ops; the first write wins.
pub fn set_dev_mode(enabled: bool) {
    let _ = DEV_MODE.set(enabled);
}

pub fn dev_mode() -> bool {
    DEV_MODE.get().copied().unwrap_or(false)
}
