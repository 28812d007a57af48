// Simulation parameter loading (config/sim.toml).
//
// Every knob has a default matching the published model, so the config
// file is optional: a missing file at the default location means defaults,
// while an explicitly requested file must exist and parse.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/sim.toml";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Rating-update parameters (`[elo]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// K-factor for bulk simulated play.
    pub k_sim: f64,
    /// K-factor for manual corrections and results taken from the
    /// schedule file.
    pub k_manual: f64,
    /// Base of the margin-of-victory multiplier.
    pub mov_base: f64,
    /// Scaling applied to the pregame rating gap inside the multiplier.
    pub mov_scale: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            k_sim: 4.0,
            k_manual: 20.0,
            mov_base: 2.2,
            mov_scale: 0.001,
        }
    }
}

/// Pregame win-probability parameters (`[odds]`), in Elo points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OddsConfig {
    /// Flat home-field edge.
    pub home_field_base: f64,
    /// Additional edge per 1,000 miles the away team travels.
    pub travel_points_per_1000_miles: f64,
    /// Edge for a team coming off a bye week.
    pub rest_bonus: f64,
}

impl Default for OddsConfig {
    fn default() -> Self {
        OddsConfig {
            home_field_base: 48.0,
            travel_points_per_1000_miles: 4.0,
            rest_bonus: 25.0,
        }
    }
}

/// Simulated-score generator parameters (`[outcome]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    /// Chance a simulated regular-season game ends in a tie.
    pub tie_probability: f64,
    /// Minimum drawn score.
    pub score_base: f64,
    /// Spread of the log-skewed score draw.
    pub score_scale: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        OutcomeConfig {
            tie_probability: 0.01,
            score_base: 3.0,
            score_scale: 30.0,
        }
    }
}

/// All simulation parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub elo: EloConfig,
    pub odds: OddsConfig,
    pub outcome: OutcomeConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load simulation parameters.
///
/// With an explicit path the file must exist. With `None`, the default
/// location is used when present and built-in defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<SimConfig, ConfigError> {
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::FileNotFound {
                    path: p.to_path_buf(),
                });
            }
            load_file(p)
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_file(default_path)
            } else {
                Ok(SimConfig::default())
            }
        }
    }
}

fn load_file(path: &Path) -> Result<SimConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: SimConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &SimConfig) -> Result<(), ConfigError> {
    let positive = |field: &str, value: f64| -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: format!("must be a positive number, got {value}"),
            });
        }
        Ok(())
    };
    let finite = |field: &str, value: f64| -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must be finite".to_string(),
            });
        }
        Ok(())
    };

    positive("elo.k_sim", config.elo.k_sim)?;
    positive("elo.k_manual", config.elo.k_manual)?;
    positive("elo.mov_base", config.elo.mov_base)?;
    finite("elo.mov_scale", config.elo.mov_scale)?;

    finite("odds.home_field_base", config.odds.home_field_base)?;
    finite(
        "odds.travel_points_per_1000_miles",
        config.odds.travel_points_per_1000_miles,
    )?;
    finite("odds.rest_bonus", config.odds.rest_bonus)?;

    if !(0.0..=1.0).contains(&config.outcome.tie_probability) {
        return Err(ConfigError::ValidationError {
            field: "outcome.tie_probability".to_string(),
            message: format!(
                "must be within [0, 1], got {}",
                config.outcome.tie_probability
            ),
        });
    }
    finite("outcome.score_base", config.outcome.score_base)?;
    positive("outcome.score_scale", config.outcome.score_scale)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_model() {
        let config = SimConfig::default();
        assert_eq!(config.elo.k_sim, 4.0);
        assert_eq!(config.elo.k_manual, 20.0);
        assert_eq!(config.elo.mov_base, 2.2);
        assert_eq!(config.elo.mov_scale, 0.001);
        assert_eq!(config.odds.home_field_base, 48.0);
        assert_eq!(config.odds.travel_points_per_1000_miles, 4.0);
        assert_eq!(config.odds.rest_bonus, 25.0);
        assert_eq!(config.outcome.tie_probability, 0.01);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            [elo]
            k_sim = 8.0

            [outcome]
            tie_probability = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.elo.k_sim, 8.0);
        assert_eq!(config.elo.k_manual, 20.0);
        assert_eq!(config.outcome.tie_probability, 0.0);
        assert_eq!(config.odds.home_field_base, 48.0);
    }

    #[test]
    fn tie_probability_out_of_range_rejected() {
        let config: SimConfig = toml::from_str(
            r#"
            [outcome]
            tie_probability = 1.5
            "#,
        )
        .unwrap();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn non_positive_k_rejected() {
        let config: SimConfig = toml::from_str(
            r#"
            [elo]
            k_sim = 0.0
            "#,
        )
        .unwrap();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
