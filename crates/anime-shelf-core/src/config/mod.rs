//! Organizer configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Configuration for anime-shelf
///
/// Every field has a default, so a config file only needs the keys it wants
/// to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Library root that organized files are placed under
    pub output_directory: PathBuf,
    /// File name template for episodes (without extension)
    pub naming_template: String,
    /// File name template for subtitles, falls back to `naming_template`
    pub subtitle_template: Option<String>,
    /// Per-show folder template
    pub folder_template: String,
    /// Season subfolder template
    pub season_folder_template: String,
    /// Put seasons after the first into their own subfolder
    pub organize_by_season: bool,
    /// Default log filter for the CLI
    pub log_level: String,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            naming_template: "{title_romaji} - S{season}E{episode:02}".to_string(),
            subtitle_template: Some("{title_romaji} - S{season}E{episode:02}.chs".to_string()),
            folder_template: "{title_romaji} ({year})".to_string(),
            season_folder_template: "Season {season}".to_string(),
            organize_by_season: true,
            log_level: "info".to_string(),
        }
    }
}

fn default_output_directory() -> PathBuf {
    dirs::video_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join("AnimeLibrary")
}

impl OrganizerConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("anime-shelf").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(Error::ConfigNotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(Error::NoConfigDir)?;
        self.save_to(path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Template to use for a file with the given extension
    pub fn template_for_extension(&self, ext: &str) -> &str {
        if is_subtitle_extension(ext) {
            if let Some(template) = &self.subtitle_template {
                return template;
            }
        }
        &self.naming_template
    }
}

/// Whether `ext` (with or without its dot) is a subtitle format
pub fn is_subtitle_extension(ext: &str) -> bool {
    matches!(
        ext.trim_start_matches('.').to_lowercase().as_str(),
        "ass" | "ssa" | "srt" | "sub" | "vtt"
    )
}
