//! Simulation tunables, read from a RON file at startup.
//!
//! ```ron
//! (
//!     day_length: 16,
//!     days: 7,
//!     score_weights: (energy: 1.2, study: 2.0, happiness: 1.0),
//!     penalty: (max_days_not_studied: 1, score: 39.0),
//!     level_path: "assets/levels/campus.json",
//! )
//! ```
//!
//! Every field is optional; omitted fields take the built-in defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scoring::{ScorePenalty, ScoreWeights};
use crate::shared::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub day_length: u32,
    pub days: u32,
    pub score_weights: ScoreWeights,
    pub penalty: ScorePenalty,
    pub level_path: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            day_length: DAY_LENGTH,
            days: DAYS,
            score_weights: ScoreWeights::default(),
            penalty: ScorePenalty::default(),
            level_path: "assets/levels/campus.json".to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_length == 0 {
            return Err(ConfigError::Invalid("day_length must be at least 1"));
        }
        if self.days == 0 {
            return Err(ConfigError::Invalid("days must be at least 1"));
        }
        let weights = &self.score_weights;
        if [weights.energy, weights.study, weights.happiness]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigError::Invalid("score weights must be finite and non-negative"));
        }
        if weights.sum() <= 0.0 {
            return Err(ConfigError::Invalid("score weights must not all be zero"));
        }
        Ok(())
    }
}

pub fn parse_config(text: &str) -> Result<SimulationConfig, ConfigError> {
    let config: SimulationConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads and validates `path`. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            "[Config] {} not found — using built-in defaults",
            path.display()
        );
        return Ok(SimulationConfig::default());
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Loads the config file and inserts `SimulationConfig`. Errors fall back to
/// the defaults so a bad file never stops the game from starting.
pub struct ConfigPlugin {
    pub path: PathBuf,
}

impl Default for ConfigPlugin {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CONFIG_PATH),
        }
    }
}

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(err) => {
                warn!("[Config] {} — using built-in defaults", err);
                SimulationConfig::default()
            }
        };
        info!(
            "[Config] {} day(s) of {} hour(s), weights {:?}",
            config.days, config.day_length, config.score_weights
        );
        app.insert_resource(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("()").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config("(days: 5, penalty: (max_days_not_studied: 2, score: 30.0))")
            .unwrap();
        assert_eq!(config.days, 5);
        assert_eq!(config.day_length, DAY_LENGTH);
        assert_eq!(config.penalty.max_days_not_studied, 2);
        assert_eq!(config.score_weights, ScoreWeights::default());
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            parse_config("(days: \"seven\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_days_rejected() {
        assert!(matches!(
            parse_config("(days: 0)"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let err = parse_config(
            "(score_weights: (energy: 0.0, study: 0.0, happiness: 0.0))",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid config: score weights must not all be zero");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config("definitely/not/here.ron").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_shipped_config_parses() {
        let text = include_str!("../../assets/config/simulation.ron");
        assert_eq!(parse_config(text).unwrap(), SimulationConfig::default());
    }
}
