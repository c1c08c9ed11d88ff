// src/config/settings.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::state::Locale;

pub const ENV_PREFIX: &str = "FINHEALTH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where `/analyze` and `/export` live.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Overall request deadline. `None` waits for as long as the service takes.
    pub request_timeout_secs: Option<u64>,
    pub default_locale: Locale,
    pub show_pending_indicator: bool,
    pub currency_symbol: String,
    /// Extra font appended to the egui families, e.g. a Devanagari face.
    pub font_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: None,
            default_locale: Locale::En,
            show_pending_indicator: false,
            currency_symbol: "₹".to_string(),
            font_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("finhealth").join("settings.ron"))
    }

    /// Defaults, then the RON file at `path` if it exists, then `FINHEALTH_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Ron)
                    .required(false)
            );
        }

        builder
            .add_source(env)
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_with_env(Some(&dir.path().join("settings.ron")), no_env()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.show_pending_indicator);
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn file_overrides_only_what_it_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, r#"(base_url: "http://10.0.0.2:9000", default_locale: "hi")"#).unwrap();

        let settings = Settings::load_with_env(Some(&path), no_env()).unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.2:9000");
        assert_eq!(settings.default_locale, Locale::Hi);
        assert_eq!(settings.currency_symbol, "₹");
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, r#"(base_url: "http://10.0.0.2:9000")"#).unwrap();

        let mut vars = HashMap::new();
        vars.insert("FINHEALTH_BASE_URL".to_string(), "http://svc:8000".to_string());
        vars.insert("FINHEALTH_SHOW_PENDING_INDICATOR".to_string(), "true".to_string());
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let settings = Settings::load_with_env(Some(&path), env).unwrap();
        assert_eq!(settings.base_url, "http://svc:8000");
        assert!(settings.show_pending_indicator);
    }

    #[test]
    fn bad_locale_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, r#"(default_locale: "fr")"#).unwrap();
        assert!(Settings::load_with_env(Some(&path), no_env()).is_err());
    }
}
