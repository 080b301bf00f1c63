//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FlowsteerError, FlowsteerResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Direction classifier settings.
    pub classifier: ClassifierConfig,

    /// Dense optical-flow estimator tuning.
    pub farneback: FarnebackParams,

    /// Text overlay placement and style.
    pub overlay: OverlayConfig,

    /// Output encoding settings.
    pub output: OutputConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Direction classifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum horizontal displacement (same units as the flow vectors)
    /// before a turn is reported.
    pub threshold: f64,
}

/// Tuning knobs for a Farneback-style dense flow estimator.
///
/// These are passed through to the estimator untouched; the classifier
/// never looks at them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarnebackParams {
    pub pyr_scale: f64,
    pub levels: i32,
    pub winsize: i32,
    pub iterations: i32,
    pub poly_n: i32,
    pub poly_sigma: f64,
    pub flags: i32,
}

/// Overlay text placement and style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Text origin in pixels (bottom-left of the first glyph).
    pub x: i32,
    pub y: i32,

    /// Font scale factor.
    pub font_scale: f64,

    /// Colour as blue, green, red.
    pub color_bgr: [u8; 3],

    /// Stroke thickness in pixels.
    pub thickness: i32,
}

/// Output encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Four-character codec code for the writer (e.g. "mp4v", "MJPG").
    pub fourcc: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "flowsteer=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            farneback: FarnebackParams::default(),
            overlay: OverlayConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { threshold: 1.0 }
    }
}

impl Default for FarnebackParams {
    fn default() -> Self {
        Self {
            pyr_scale: 0.5,
            levels: 5,
            winsize: 20,
            iterations: 10,
            poly_n: 5,
            poly_sigma: 1.5,
            flags: 0,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            x: 50,
            y: 100,
            font_scale: 1.0,
            color_bgr: [0, 0, 255],
            thickness: 2,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fourcc: "mp4v".to_string(),
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

impl OutputConfig {
    /// The fourcc as four chars, or a config error if it is not exactly four ASCII chars.
    pub fn fourcc_chars(&self) -> FlowsteerResult<[char; 4]> {
        let chars: Vec<char> = self.fourcc.chars().collect();
        match chars.as_slice() {
            [a, b, c, d] if chars.iter().all(char::is_ascii) => Ok([*a, *b, *c, *d]),
            _ => Err(FlowsteerError::config(format!(
                "fourcc must be four ASCII characters, got {:?}",
                self.fourcc
            ))),
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> FlowsteerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values no collaborator can work with.
    pub fn validate(&self) -> FlowsteerResult<()> {
        if !self.classifier.threshold.is_finite() || self.classifier.threshold < 0.0 {
            return Err(FlowsteerError::config(format!(
                "classifier.threshold must be a finite non-negative number, got {}",
                self.classifier.threshold
            )));
        }
        if self.farneback.levels < 0 || self.farneback.winsize <= 0 {
            return Err(FlowsteerError::config(
                "farneback.levels must be >= 0 and farneback.winsize > 0",
            ));
        }
        self.output.fourcc_chars()?;
        Ok(())
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
    base.join("flowsteer").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_pipeline() {
        let config = AppConfig::default();
        assert_eq!(config.classifier.threshold, 1.0);
        assert_eq!(config.farneback.levels, 5);
        assert_eq!(config.farneback.winsize, 20);
        assert_eq!(config.overlay.color_bgr, [0, 0, 255]);
        assert_eq!(config.output.fourcc, "mp4v");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "classifier": { "threshold": 2.5 } }"#).unwrap();
        assert_eq!(config.classifier.threshold, 2.5);
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn test_fourcc_chars() {
        let output = OutputConfig::default();
        assert_eq!(output.fourcc_chars().unwrap(), ['m', 'p', '4', 'v']);

        let bad = OutputConfig {
            fourcc: "h264x".to_string(),
        };
        assert!(bad.fourcc_chars().is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = AppConfig::default();
        config.classifier.threshold = -1.0;
        assert!(matches!(
            config.validate(),
            Err(FlowsteerError::Config { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("flowsteer-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "output": { "fourcc": "MJPG" } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.output.fourcc, "MJPG");

        std::fs::remove_dir_all(&dir).ok();
    }
}
