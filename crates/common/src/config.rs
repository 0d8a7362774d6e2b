//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlidecutError, SlidecutResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory under which per-job working directories are created.
    pub work_dir: PathBuf,

    /// Default render settings.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default render parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Exact number of images a job must provide.
    pub image_count: usize,

    /// Output frame width in pixels.
    pub width: u32,

    /// Output frame height in pixels.
    pub height: u32,

    /// Canvas color behind letterboxed images (any ffmpeg color spec).
    pub background: String,

    /// Seconds each image is on screen, including its outgoing transition.
    pub segment_secs: f64,

    /// Seconds each transition overlaps two adjacent images.
    pub transition_secs: f64,

    /// Output frame rate.
    pub fps: u32,

    /// Video codec passed to the encoder.
    pub video_codec: String,

    /// Output pixel format.
    pub pixel_format: String,

    /// Encoder binary name or path.
    pub ffmpeg_binary: String,

    /// Kill the encoder after this many seconds.
    pub timeout_secs: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidecut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("slidecut"),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            image_count: 10,
            width: 1080,
            height: 1920,
            background: "black".to_string(),
            segment_secs: 3.0,
            transition_secs: 1.0,
            fps: 30,
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            ffmpeg_binary: "ffmpeg".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl RenderDefaults {
    /// Check the invariants every render job relies on.
    pub fn validate(&self) -> SlidecutResult<()> {
        if self.image_count < 2 {
            return Err(SlidecutError::config(format!(
                "image_count must be at least 2, got {}",
                self.image_count
            )));
        }
        if self.width == 0 || self.height == 0 || self.width % 2 != 0 || self.height % 2 != 0 {
            // yuv420p needs even dimensions
            return Err(SlidecutError::config(format!(
                "frame size must be non-zero and even, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(SlidecutError::config("fps must be greater than zero"));
        }
        if !(self.transition_secs > 0.0 && self.segment_secs > self.transition_secs) {
            return Err(SlidecutError::invalid_timing(format!(
                "segment ({}s) must be longer than transition ({}s) and both positive",
                self.segment_secs, self.transition_secs
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidecut").join("config.json")
}
