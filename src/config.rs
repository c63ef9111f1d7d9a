//! Configuration management for the drawing engine

use crate::constants::{
    DEFAULT_ANALYSIS_ENDPOINT, DEFAULT_ANALYSIS_MODEL, DEFAULT_ANALYSIS_TIMEOUT_SECS,
    DEFAULT_API_KEY_ENV, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_SMOOTHING_ALPHA,
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Drawing canvas configuration
    pub canvas: CanvasConfig,

    /// Stroke appearance
    pub stroke: StrokeConfig,

    /// Debug overlay toggles
    pub overlay: OverlayConfig,

    /// Cursor smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Drawing analysis service configuration
    pub analysis: AnalysisConfig,
}

/// Canvas dimensions and coordinate handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels, matching the video frame
    pub width: u32,

    /// Canvas height in pixels, matching the video frame
    pub height: u32,

    /// Mirror the horizontal axis when mapping landmarks to the canvas.
    /// The video is presented mirrored, so this defaults to true.
    pub mirror_x: bool,
}

/// Stroke color and width
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Stroke color as RGBA
    pub color: [u8; 4],

    /// Stroke width in pixels
    pub width: u32,
}

/// Debug overlay toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Draw the hand skeleton
    pub skeleton: bool,

    /// Draw a crosshair at the cursor
    pub crosshair: bool,

    /// Draw the current gesture label
    pub label: bool,
}

/// Cursor smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Enable exponential cursor smoothing. Off by default: raw cursor
    /// positions are the reference behavior.
    pub enabled: bool,

    /// Smoothing factor in (0, 1]; closer to 1 follows the raw signal
    pub alpha: f32,
}

/// Drawing analysis service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model identifier used by the service
    pub model: String,

    /// Service base endpoint
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            mirror_x: true,
        }
    }
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            skeleton: true,
            crosshair: true,
            label: true,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field found.
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(Error::Config("Canvas dimensions must be non-zero".to_string()));
        }
        if self.stroke.width == 0 || self.stroke.width > MAX_STROKE_WIDTH {
            return Err(Error::Config(format!(
                "Stroke width must be between 1 and {MAX_STROKE_WIDTH}"
            )));
        }
        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return Err(Error::Config("Smoothing alpha must be in (0, 1]".to_string()));
        }
        if self.analysis.timeout_secs == 0 {
            return Err(Error::Config("Analysis timeout must be greater than 0".to_string()));
        }
        if self.analysis.model.is_empty() || self.analysis.endpoint.is_empty() {
            return Err(Error::Config("Analysis model and endpoint must be set".to_string()));
        }
        if self.analysis.api_key_env.is_empty() {
            return Err(Error::Config("Analysis API key variable must be set".to_string()));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture drawing engine configuration

# Canvas dimensions and coordinate handling
canvas:
  width: 640
  height: 480
  mirror_x: true

# Stroke appearance (RGBA color, width in pixels)
stroke:
  color: [64, 156, 255, 255]
  width: 4

# Debug overlays
overlay:
  skeleton: true
  crosshair: true
  label: true

# Cursor smoothing (state classification is never smoothed)
smoothing:
  enabled: false
  alpha: 0.5

# Drawing analysis service
analysis:
  model: "gemini-1.5-pro"
  endpoint: "https://generativelanguage.googleapis.com/v1beta"
  timeout_secs: 60
  api_key_env: "GEMINI_API_KEY"
"#;
