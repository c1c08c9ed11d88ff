// src/file/settings.rs
use super::FileHandler;
use crate::config::Settings;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

#[derive(Debug)]
pub struct SettingsFileHandler;

impl SettingsFileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Writes the default settings so users have a file to edit. Existing
    /// files are left alone. Returns whether a file was written.
    pub fn ensure_default(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        self.save(&Settings::default(), path)?;
        Ok(true)
    }
}

impl FileHandler<Settings> for SettingsFileHandler {
    fn load(&self, path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)?;
        ron::from_str(&content).context("Failed to parse settings file")
    }

    fn save(&self, data: &Settings, path: &Path) -> Result<()> {
        let content = ron::ser::to_string_pretty(
            data,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(2)
        )?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::ENV_PREFIX;
    use crate::state::Locale;
    use ::config::Environment;
    use std::collections::HashMap;

    #[test]
    fn default_file_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finhealth").join("settings.ron");
        let handler = SettingsFileHandler::new();

        assert!(handler.ensure_default(&path).unwrap());
        assert!(!handler.ensure_default(&path).unwrap());
        assert_eq!(handler.load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn saved_settings_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let handler = SettingsFileHandler::new();
        let settings = Settings {
            default_locale: Locale::Hi,
            request_timeout_secs: Some(60),
            font_path: Some("/usr/share/fonts/NotoSansDevanagari.ttf".into()),
            ..Settings::default()
        };

        handler.save(&settings, &path).unwrap();
        assert_eq!(handler.load(&path).unwrap(), settings);
    }

    #[test]
    fn written_file_is_readable_by_layered_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let handler = SettingsFileHandler::new();
        let settings = Settings {
            base_url: "http://reports.local:8000".to_string(),
            show_pending_indicator: true,
            ..Settings::default()
        };
        handler.save(&settings, &path).unwrap();

        let env = Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()));
        let loaded = Settings::load_with_env(Some(&path), env).unwrap();
        assert_eq!(loaded.base_url, "http://reports.local:8000");
        assert!(loaded.show_pending_indicator);
    }
}
