//! Serializable runner configuration.
//!
//! A TOML file supplies defaults for every recognized parameter; explicit
//! CLI flags win over the file, and every section falls back to the
//! built-in defaults when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use highlab_core::annotate::DEFAULT_SPAN_DAYS;
use highlab_core::decode::DecoderKind;
use highlab_core::screen::{
    DEFAULT_MIN_APPEARANCE, DEFAULT_PAST_HIGH_THRESHOLD_DAYS, DEFAULT_PERIOD,
};
use highlab_core::simulate::DEFAULT_HOLD_DAYS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunnerConfig {
    pub data: DataConfig,
    pub annotate: AnnotateConfig,
    pub trade: TradeConfig,
    pub screen: ScreenConfig,
}

impl RunnerConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Decoder applied to per-security price files.
    pub decoder: DecoderKind,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { decoder: DecoderKind::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Forward window span in calendar days.
    pub span_days: i64,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self { span_days: DEFAULT_SPAN_DAYS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Holding period in calendar days.
    pub hold_days: i64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self { hold_days: DEFAULT_HOLD_DAYS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Trailing snapshot count.
    pub period: usize,
    /// Minimum age of the prior year-to-date high, in days.
    pub past_high_threshold_days: i64,
    /// Minimum appearances across the trailing window.
    pub min_appearance: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            past_high_threshold_days: DEFAULT_PAST_HIGH_THRESHOLD_DAYS,
            min_appearance: DEFAULT_MIN_APPEARANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_recognized_parameters() {
        let config = RunnerConfig::default();
        assert_eq!(config.annotate.span_days, 364);
        assert_eq!(config.trade.hold_days, 7);
        assert_eq!(config.screen.period, 10);
        assert_eq!(config.screen.past_high_threshold_days, 30);
        assert_eq!(config.screen.min_appearance, 8);
        assert_eq!(config.data.decoder, DecoderKind::AdjustedYmd);
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config: RunnerConfig = toml::from_str(
            r#"
            [screen]
            min_appearance = 9

            [data]
            decoder = "iso_plain"
            "#,
        )
        .unwrap();
        assert_eq!(config.screen.min_appearance, 9);
        assert_eq!(config.screen.period, 10);
        assert_eq!(config.data.decoder, DecoderKind::IsoPlain);
        assert_eq!(config.annotate.span_days, 364);
    }
}
