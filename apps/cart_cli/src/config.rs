use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

pub const SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub cart_key: String,
    pub currency_symbol: String,
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/storefront.db".into(),
            cart_key: cart_core::DEFAULT_CART_KEY.into(),
            currency_symbol: "R".into(),
            catalog_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    cart_key: Option<String>,
    currency_symbol: Option<String>,
    catalog_path: Option<PathBuf>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file if it exists and parses, then the
/// environment.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable settings file")
            }
        }
    }

    apply_env_overrides(&mut settings, env);
    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.cart_key {
        settings.cart_key = v;
    }
    if let Some(v) = file_cfg.currency_symbol {
        settings.currency_symbol = v;
    }
    if let Some(v) = file_cfg.catalog_path {
        settings.catalog_path = Some(v);
    }
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("CART_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__CART_KEY") {
        settings.cart_key = v;
    }

    if let Some(v) = env("APP__CURRENCY_SYMBOL") {
        settings.currency_symbol = v;
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v));
    }
}

/// Turns a bare file path into a `sqlite://` url. The database directory
/// itself is created when the store opens.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
