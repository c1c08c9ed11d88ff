// src/file/mod.rs
use anyhow::Result;
use std::path::Path;

pub mod selection;
pub mod settings;

pub use selection::{load_selection, selection_from_drop};
pub use settings::SettingsFileHandler;

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}
