//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote correction provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat endpoint receiving the correction request.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Prefix placed before the user's text in the prompt.
    #[serde(default = "default_instruction")]
    pub instruction: String,

    /// Optional URL probed with GET to decide whether the service is usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            instruction: default_instruction(),
            readiness_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8787/v1/chat".to_string()
}

fn default_model() -> String {
    "default".to_string()
}

fn default_instruction() -> String {
    "correct grammar, output only corrected text:".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Overlay behaviour and geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Minimum whitespace-delimited words before text is submitted.
    #[serde(default = "default_min_words")]
    pub min_words: usize,

    /// Delay before the correct/error states revert.
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,

    /// Period of the position refresh timer.
    #[serde(default = "default_position_refresh_ms")]
    pub position_refresh_ms: u64,

    #[serde(default = "default_z_index")]
    pub z_index: i32,

    #[serde(default = "default_button_size")]
    pub button_size: f64,

    /// Distance between the button and the target's bottom-right corner.
    #[serde(default = "default_button_inset")]
    pub button_inset: f64,

    /// Minimum distance between the tooltip and the viewport edges.
    #[serde(default = "default_tooltip_padding")]
    pub tooltip_padding: f64,

    #[serde(default = "default_tooltip_max")]
    pub tooltip_max_width: f64,

    #[serde(default = "default_tooltip_max")]
    pub tooltip_max_height: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            reset_delay_ms: default_reset_delay_ms(),
            position_refresh_ms: default_position_refresh_ms(),
            z_index: default_z_index(),
            button_size: default_button_size(),
            button_inset: default_button_inset(),
            tooltip_padding: default_tooltip_padding(),
            tooltip_max_width: default_tooltip_max(),
            tooltip_max_height: default_tooltip_max(),
        }
    }
}

impl OverlayConfig {
    /// Get the correct/error revert delay as Duration.
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Get the position refresh period as Duration.
    pub fn position_refresh(&self) -> Duration {
        Duration::from_millis(self.position_refresh_ms)
    }
}

fn default_min_words() -> usize {
    2
}

fn default_reset_delay_ms() -> u64 {
    1500
}

fn default_position_refresh_ms() -> u64 {
    60
}

fn default_z_index() -> i32 {
    2_147_483_646
}

fn default_button_size() -> f64 {
    24.0
}

fn default_button_inset() -> f64 {
    8.0
}

fn default_tooltip_padding() -> f64 {
    5.0
}

fn default_tooltip_max() -> f64 {
    300.0
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily rolling log files; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.overlay.min_words, 2);
        assert_eq!(config.overlay.reset_delay_ms, 1500);
        assert_eq!(config.overlay.position_refresh_ms, 60);
        assert_eq!(config.overlay.button_size, 24.0);
        assert_eq!(config.overlay.tooltip_padding, 5.0);
        assert_eq!(config.provider.timeout_seconds, 30);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overlay_durations() {
        let overlay = OverlayConfig::default();
        assert_eq!(overlay.reset_delay(), Duration::from_millis(1500));
        assert_eq!(overlay.position_refresh(), Duration::from_millis(60));
    }

    #[test]
    fn test_partial_overlay_section_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [overlay]
            min_words = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.overlay.min_words, 3);
        assert_eq!(config.overlay.reset_delay_ms, 1500);
        assert_eq!(config.overlay.tooltip_max_width, 300.0);
    }

    #[test]
    fn test_config_roundtrip_skips_unset_options() {
        let serialized = toml::to_string(&Config::default()).unwrap();
        assert!(!serialized.contains("api_key"));
        assert!(!serialized.contains("readiness_url"));
        assert!(serialized.contains("[overlay]"));
    }
}
