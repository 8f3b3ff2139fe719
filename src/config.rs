use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    styles::StylePreset,
};

/// Main configuration for deadcase-director
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shot segmentation settings
    pub analysis: AnalysisConfig,

    /// Edit rule settings
    pub director: DirectorConfig,

    /// Timeline marker planning settings
    pub timeline: TimelineConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.director.validate()?;
        self.timeline.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Shot segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Histogram dissimilarity above which a cut is declared (0.0-2.0)
    pub cut_threshold: f64,

    /// Shortest shot the segmenter will close, in seconds
    pub min_shot_duration: f64,

    /// Frame rate assumed when the source does not declare one
    pub default_fps: f64,

    /// Number of intensity bins in the comparison histogram
    pub histogram_bins: usize,

    /// Image files decoded in parallel per chunk by the image-sequence source
    pub decode_chunk_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cut_threshold: 0.45,
            min_shot_duration: 0.5,
            default_fps: 24.0,
            histogram_bins: 32,
            decode_chunk_size: num_cpus::get(),
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.cut_threshold) {
            return Err(invalid("analysis.cut_threshold", self.cut_threshold).into());
        }

        if !(self.min_shot_duration >= 0.0) {
            return Err(invalid("analysis.min_shot_duration", self.min_shot_duration).into());
        }

        if !(self.default_fps > 0.0) {
            return Err(invalid("analysis.default_fps", self.default_fps).into());
        }

        if self.histogram_bins == 0 || self.histogram_bins > 256 {
            return Err(invalid("analysis.histogram_bins", self.histogram_bins).into());
        }

        if self.decode_chunk_size == 0 {
            return Err(invalid("analysis.decode_chunk_size", self.decode_chunk_size).into());
        }

        Ok(())
    }

    /// Resolve a declared frame rate, falling back to `default_fps` for missing or unusable values
    pub fn effective_fps(&self, declared: Option<f64>) -> f64 {
        match declared {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => self.default_fps,
        }
    }

    /// Minimum shot length in frames at the given frame rate (never below one)
    pub fn min_shot_frames(&self, fps: f64) -> usize {
        ((fps * self.min_shot_duration).round() as usize).max(1)
    }
}

/// Edit rule engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Style preset name; unknown names fall back to the default preset
    pub style: String,

    /// Shots at least this long (seconds) get a cut at their midpoint
    pub long_shot_min_duration: f64,

    /// Shots darker than this count as dark
    pub dark_brightness: f64,

    /// Shots with more motion than this count as chaotic
    pub chaotic_motion: f64,

    /// Brightness increase between adjacent shots that triggers a flash
    pub flash_jump: f64,

    /// Spacing of periodic beat markers, in seconds
    pub beat_interval: f64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            style: StylePreset::default().name().to_string(),
            long_shot_min_duration: 5.0,
            dark_brightness: 0.3,
            chaotic_motion: 0.6,
            flash_jump: 0.35,
            beat_interval: 10.0,
        }
    }
}

impl DirectorConfig {
    fn validate(&self) -> Result<()> {
        if !(self.long_shot_min_duration > 0.0) {
            return Err(invalid("director.long_shot_min_duration", self.long_shot_min_duration).into());
        }

        for (key, value) in [
            ("director.dark_brightness", self.dark_brightness),
            ("director.chaotic_motion", self.chaotic_motion),
            ("director.flash_jump", self.flash_jump),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(key, value).into());
            }
        }

        // A zero interval would never advance the beat cursor
        if !(self.beat_interval > 0.0) {
            return Err(invalid("director.beat_interval", self.beat_interval).into());
        }

        Ok(())
    }

    /// The configured preset, resolved leniently
    pub fn style_preset(&self) -> StylePreset {
        StylePreset::from_name_lenient(&self.style)
    }
}

/// Timeline marker planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Frame rate of the host project the markers are placed in
    pub project_fps: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self { project_fps: 24.0 }
    }
}

impl TimelineConfig {
    fn validate(&self) -> Result<()> {
        if !(self.project_fps > 0.0) {
            return Err(invalid("timeline.project_fps", self.project_fps).into());
        }
        Ok(())
    }
}
