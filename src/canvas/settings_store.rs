use crate::canvas::settings::CanvasSettings;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const CANVAS_SETTINGS_FILE_NAME: &str = "canvas_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(CANVAS_SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads settings stored next to the executable, falling back to defaults
/// when no file exists yet.
pub fn load() -> Result<CanvasSettings> {
    let path = resolve_settings_path()?;
    Ok(load_from_path(&path)?.unwrap_or_default())
}

pub fn save(settings: &CanvasSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

pub fn load_from_path(path: &Path) -> Result<Option<CanvasSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read canvas settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Some(CanvasSettings::default()));
    }

    let mut loaded: CanvasSettings = serde_json::from_str(&content)
        .with_context(|| format!("deserialize canvas settings file {}", path.display()))?;
    if loaded.sanitize() {
        tracing::warn!(path = %path.display(), "canvas settings contained out-of-range values");
    }
    Ok(Some(loaded))
}

pub fn save_to_path(path: &Path, settings: &CanvasSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create canvas settings folder {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings).context("serialize canvas settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write canvas settings file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_is_sibling_of_exe() {
        let exe = Path::new("/opt/tutor/bin/tutor");
        let path = settings_path_from_exe_path(exe).expect("settings path");
        assert_eq!(path, Path::new("/opt/tutor/bin").join(CANVAS_SETTINGS_FILE_NAME));
    }

    #[test]
    fn root_path_has_no_parent() {
        assert!(settings_path_from_exe_path(Path::new("/")).is_err());
    }
}
