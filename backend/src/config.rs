//! Process configuration read from the environment at startup.
//!
//! These are the settings that need a restart to change. Limits an operator
//! tunes at runtime live in the `SystemSettings` document instead.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PATH: &str = "charts.sqlite";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
const DEFAULT_RETENTION_SWEEP_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub admin_email: String,
    /// Bootstrap admin is only created when a password is configured.
    pub admin_password: Option<String>,
    pub retention_sweep: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT),
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            admin_email: lookup("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()),
            retention_sweep: Duration::from_secs(parse_or_default(
                &lookup,
                "RETENTION_SWEEP_SECS",
                DEFAULT_RETENTION_SWEEP_SECS,
            )),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T: FromStr + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {}='{}', using default", key, raw);
            default
        }),
        None => default,
    }
}
