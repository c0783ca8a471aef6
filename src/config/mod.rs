//! Configuration management for chatmap

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::SyncConfig;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sync: SyncSettings,
    pub minimap: MinimapConfig,
    pub transcript: TranscriptConfig,
    pub ui: UiConfig,
}

/// Timings of the sync controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Echo suppression window after a programmatic scroll
    pub guard_window_ms: u64,
    pub rebuild_debounce_ms: u64,
    pub ready_poll_ms: u64,
    /// Delay before rebuilding after switching conversations
    pub reinit_delay_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            guard_window_ms: 100,
            rebuild_debounce_ms: 100,
            ready_poll_ms: 500,
            reinit_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Terminal width (columns) under which the minimap is hidden
    pub min_width: u16,
    pub column_width: u16,
    pub preview_chars: usize,
    pub block_preview_chars: usize,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            min_width: 100,
            column_width: 28,
            preview_chars: 50,
            block_preview_chars: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub poll_interval_ms: u64,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    /// Duration of animated scrolls; 0 jumps instantly
    pub smooth_scroll_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            smooth_scroll_ms: 180,
        }
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "chatmap") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Directory for the log file
    pub fn data_dir() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "chatmap") {
            let data_dir = proj_dirs.data_dir();
            std::fs::create_dir_all(data_dir)?;
            Ok(data_dir.to_path_buf())
        } else {
            Ok(std::env::temp_dir())
        }
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Controller tunables; widths are in terminal columns
    pub fn to_sync_config(&self) -> SyncConfig {
        SyncConfig {
            guard_window: Duration::from_millis(self.sync.guard_window_ms),
            rebuild_debounce: Duration::from_millis(self.sync.rebuild_debounce_ms),
            ready_poll: Duration::from_millis(self.sync.ready_poll_ms),
            reinit_delay: Duration::from_millis(self.sync.reinit_delay_ms),
            min_viewport_width: f64::from(self.minimap.min_width),
            preview_chars: self.minimap.preview_chars,
            block_preview_chars: self.minimap.block_preview_chars,
            ..SyncConfig::default()
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(1))
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.ui.smooth_scroll_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.transcript.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[minimap]\nmin_width = 80\n").unwrap();
        assert_eq!(config.minimap.min_width, 80);
        assert_eq!(config.minimap.column_width, 28);
        assert_eq!(config.sync, SyncSettings::default());
    }

    #[test]
    fn test_sync_config_conversion() {
        let sync = Config::default().to_sync_config();
        assert_eq!(sync.guard_window, Duration::from_millis(100));
        assert_eq!(sync.reinit_delay, Duration::from_millis(1000));
        assert_eq!(sync.min_viewport_width, 100.0);
        assert_eq!(sync.preview_chars, 50);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.ui.smooth_scroll_ms = 0;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
