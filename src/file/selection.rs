// src/file/selection.rs
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use eframe::egui::DroppedFile;

use crate::state::Selection;

pub fn load_selection(path: &Path) -> Result<Selection> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Not a file: {}", path.display()))?
        .to_string_lossy()
        .into_owned();
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(Selection::new(file_name, bytes))
}

/// Native drops carry a path, web drops carry the bytes.
pub fn selection_from_drop(file: &DroppedFile) -> Result<Selection> {
    if let Some(bytes) = &file.bytes {
        return Ok(Selection::new(file.name.clone(), bytes.clone()));
    }
    match &file.path {
        Some(path) => load_selection(path),
        None => Err(anyhow!("Dropped file '{}' has no contents", file.name)),
    }
}
