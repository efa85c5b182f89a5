//! Tool configuration.
//!
//! Defaults for detection and auto-generation, loaded from and saved to a
//! TOML file. Command-line flags override individual values.

use serde::{Deserialize, Serialize};
use spritecut_atlas::{AutoGenOptions, SortOrder, DEFAULT_ALPHA_CUT, DEFAULT_FPS, MAX_FPS};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "spritecut.toml";

/// Largest accepted sort margin in pixels.
const MAX_MARGIN: u32 = 4096;

/// Tool configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritecutConfig {
    // === Detection ===
    /// Pixels with alpha above this count as foreground
    pub alpha_cut: u8,

    // === Auto-generate ===
    /// Primary axis for ordering generated cells
    pub sort_order: SortOrder,
    /// Pixel tolerance for sharing a row/column
    pub margin: u32,
    /// Base name for generated cells
    pub atlas_name: String,

    // === Clips ===
    /// Playback rate for new clips
    pub clip_fps: u32,

    // === Logging ===
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for SpritecutConfig {
    fn default() -> Self {
        let autogen = AutoGenOptions::default();
        Self {
            alpha_cut: DEFAULT_ALPHA_CUT,
            sort_order: autogen.sort_order,
            margin: autogen.margin,
            atlas_name: "atlas".to_string(),
            clip_fps: DEFAULT_FPS,
            log_filter: "spritecut=info".to_string(),
        }
    }
}

impl SpritecutConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(mut config) => {
                        config.validate();
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> io::Result<String> {
        toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("spritecut").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.margin = self.margin.min(MAX_MARGIN);
        self.clip_fps = self.clip_fps.clamp(1, MAX_FPS);
        if self.atlas_name.trim().is_empty() {
            self.atlas_name = Self::default().atlas_name;
        }
    }

    /// Auto-generate parameters derived from this config.
    #[must_use]
    pub fn autogen_options(&self) -> AutoGenOptions {
        AutoGenOptions {
            alpha_cut: self.alpha_cut,
            sort_order: self.sort_order,
            margin: self.margin,
        }
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SpritecutConfig::default();
        assert_eq!(config.alpha_cut, 10);
        assert_eq!(config.sort_order, SortOrder::Rows);
        assert_eq!(config.clip_fps, 30);
        assert_eq!(config.atlas_name, "atlas");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SpritecutConfig {
            margin: 100_000,
            clip_fps: 0,
            atlas_name: "  ".to_string(),
            ..SpritecutConfig::default()
        };

        config.validate();

        assert_eq!(config.margin, MAX_MARGIN);
        assert_eq!(config.clip_fps, 1);
        assert_eq!(config.atlas_name, "atlas");
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("spritecut.toml");

        let config = SpritecutConfig {
            alpha_cut: 64,
            sort_order: SortOrder::Columns,
            atlas_name: "slime".to_string(),
            ..SpritecutConfig::default()
        };
        config.save_to(&config_path).expect("Failed to save config");

        let loaded = SpritecutConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SpritecutConfig::load_from("/nonexistent/path/spritecut.toml");
        assert_eq!(config, SpritecutConfig::default());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("spritecut.toml");
        fs::write(&config_path, "sort_order = \"columns\"\nmargin = 7\n").expect("write");

        let loaded = SpritecutConfig::load_from(&config_path);
        assert_eq!(loaded.sort_order, SortOrder::Columns);
        assert_eq!(loaded.margin, 7);
        assert_eq!(loaded.alpha_cut, DEFAULT_ALPHA_CUT);
    }

    #[test]
    fn test_config_invalid_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("spritecut.toml");
        fs::write(&config_path, "alpha_cut = \"lots\"").expect("write");

        assert_eq!(SpritecutConfig::load_from(&config_path), SpritecutConfig::default());
    }

    #[test]
    fn test_autogen_options_from_config() {
        let config = SpritecutConfig {
            alpha_cut: 1,
            margin: 9,
            ..SpritecutConfig::default()
        };
        let options = config.autogen_options();
        assert_eq!(options.alpha_cut, 1);
        assert_eq!(options.margin, 9);
        assert_eq!(options.sort_order, SortOrder::Rows);
    }
}
