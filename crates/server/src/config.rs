use std::{env, path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/nodekb.db";
const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE))
}

/// Defaults, then the settings file at `path`, then `SERVER_BIND` /
/// `DATABASE_URL`, then `APP__*` variables.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Config::builder()
        .set_default("bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("request_timeout_secs", 30)?
        .set_default("max_body_bytes", 64 * 1024)?
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(Config::try_deserialize::<Settings>)
        .with_context(|| format!("failed to load settings from '{}'", path.display()))?;

    if env::var_os("APP__BIND_ADDR").is_none() {
        if let Ok(v) = env::var("SERVER_BIND") {
            settings.bind_addr = v;
        }
    }
    if env::var_os("APP__DATABASE_URL").is_none() {
        if let Ok(v) = env::var("DATABASE_URL") {
            settings.database_url = v;
        }
    }

    Ok(settings)
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    if database_url.starts_with("sqlite:") {
        return Ok(database_url);
    }
    anyhow::bail!("unsupported database url '{database_url}': only sqlite is available")
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
