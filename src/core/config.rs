//! Application configuration management

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bookshelf: project root directories
    pub projects: Vec<PathBuf>,
    /// Editor settings
    pub editor: EditorConfig,
    /// Title formatting for new volumes and chapters
    pub numbering: NumberingConfig,
}

/// Editor-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Theme name (light/dark)
    pub theme: String,
    /// Editor font family
    pub font_family: String,
    /// Font size in points
    pub font_size: f32,
    /// Line spacing in percent of the font height
    pub line_spacing_percent: u32,
    /// Auto-save debounce interval in milliseconds (0 = disabled)
    pub auto_save_interval: u64,
    /// Show a line count in the status line
    pub show_line_numbers: bool,
    /// Optional background image; kept so existing settings files round-trip
    pub background_image_path: Option<PathBuf>,
    /// Background opacity in percent; kept alongside the image path
    pub background_opacity: u8,
}

/// Prefix/suffix/padding used when titling new items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    pub chapter_prefix: String,
    pub chapter_suffix: String,
    /// Zero-padding width of chapter numbers
    pub chapter_padding: usize,
    pub volume_prefix: String,
    pub volume_suffix: String,
    /// Use 一, 二, 三... for volume numerals
    pub volume_cjk_numerals: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font_family: "Microsoft YaHei".to_string(),
            font_size: 16.0,
            line_spacing_percent: 150,
            auto_save_interval: 3000,
            show_line_numbers: false,
            background_image_path: None,
            background_opacity: 80,
        }
    }
}

impl EditorConfig {
    /// Anything but "light" renders dark
    pub fn is_dark(&self) -> bool {
        !self.theme.eq_ignore_ascii_case("light")
    }

    /// Row height in points; never tighter than single spacing
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing_percent.max(100) as f32 / 100.0
    }
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            chapter_prefix: "第".to_string(),
            chapter_suffix: "章".to_string(),
            chapter_padding: 3,
            volume_prefix: "第".to_string(),
            volume_suffix: "卷".to_string(),
            volume_cjk_numerals: true,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "inkstone", "Inkstone")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file yields defaults. A corrupt file is replaced with
    /// defaults so the next start is clean.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Corrupt config {} ({}), resetting", path.display(), e);
                let config = Self::default();
                config.save_to(path)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Add a project to the bookshelf; returns false if already present
    pub fn add_project(&mut self, path: &Path) -> bool {
        let path = normalize_path(path);
        if self.projects.contains(&path) {
            return false;
        }
        self.projects.push(path);
        true
    }

    /// Remove a project from the bookshelf; files on disk are untouched
    pub fn remove_project(&mut self, path: &Path) -> bool {
        let path = normalize_path(path);
        let before = self.projects.len();
        self.projects.retain(|p| p != &path);
        self.projects.len() != before
    }
}

/// Lexically normalize a path (drops `.` and resolves `..`)
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"editor":{"font_size":20.0}}"#).unwrap();
        assert_eq!(config.editor.font_size, 20.0);
        assert_eq!(config.editor.auto_save_interval, 3000);
        assert_eq!(config.numbering.chapter_padding, 3);
        assert!(config.projects.is_empty());
    }

    #[test]
    fn test_corrupt_config_is_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        let reread: AppConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, AppConfig::default());
    }

    #[test]
    fn test_bookshelf_dedup() {
        let mut config = AppConfig::default();
        assert!(config.add_project(Path::new("/books/a")));
        assert!(!config.add_project(Path::new("/books/./a")));
        assert!(!config.add_project(Path::new("/books/b/../a")));
        assert_eq!(config.projects.len(), 1);
        assert!(config.remove_project(Path::new("/books/a")));
        assert!(!config.remove_project(Path::new("/books/a")));
    }

    #[test]
    fn test_theme_and_line_height() {
        let mut editor = EditorConfig::default();
        assert!(editor.is_dark());
        assert_eq!(editor.line_height(), 24.0);

        editor.theme = "Light".to_string();
        editor.line_spacing_percent = 50;
        assert!(!editor.is_dark());
        assert_eq!(editor.line_height(), 16.0);
    }
}
