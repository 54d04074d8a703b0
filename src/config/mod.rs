//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::game::context::{DuelMode, Environment};
use crate::game::duel::DuelSettings;
use crate::game::weapon::{WeaponKind, Wind};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,

    /// Who drives side Two
    pub mode: DuelMode,
    /// Rounds per match, at least one
    pub rounds: u32,
    pub weapon: WeaponKind,
    pub environment: Environment,
    /// Seed for the duel's random stream
    pub seed: u64,
    pub wind: Wind,

    /// Simulation seconds per wall-clock second
    pub time_scale: f32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rounds: u32 = parse_or(&lookup, "DUEL_ROUNDS", 5)?;
        if rounds == 0 {
            return Err(ConfigError::Invalid {
                key: "DUEL_ROUNDS",
                value: rounds.to_string(),
            });
        }

        let time_scale: f32 = parse_or(&lookup, "TIME_SCALE", 1.0)?;
        if !(time_scale.is_finite() && time_scale > 0.0) {
            return Err(ConfigError::Invalid {
                key: "TIME_SCALE",
                value: time_scale.to_string(),
            });
        }

        let wind_x = finite_or(&lookup, "WIND_X", 1.5)?;
        let wind_z = finite_or(&lookup, "WIND_Z", 0.0)?;

        let defaults = Environment::default();

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,

            mode: parse_or(&lookup, "DUEL_MODE", DuelMode::Ai)?,
            rounds,
            weapon: parse_or(&lookup, "DUEL_WEAPON", WeaponKind::Heavy)?,
            environment: Environment {
                map: lookup("DUEL_MAP").unwrap_or(defaults.map),
                time_of_day: lookup("DUEL_TIME").unwrap_or(defaults.time_of_day),
                weather: lookup("DUEL_WEATHER").unwrap_or(defaults.weather),
            },
            seed: match lookup("DUEL_SEED") {
                Some(raw) => parse(&raw, "DUEL_SEED")?,
                None => rand::random(),
            },
            wind: Wind::new(wind_x, wind_z),

            time_scale,
        })
    }

    pub fn duel_settings(&self) -> DuelSettings {
        DuelSettings {
            weapon: self.weapon,
            rounds: self.rounds,
            mode: self.mode,
            wind: self.wind,
            environment: self.environment.clone(),
            seed: self.seed,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse(&raw, key),
        None => Ok(default),
    }
}

/// Parse an `f32` that must be finite (no NaN or infinity)
fn finite_or<F>(lookup: &F, key: &'static str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f32 = parse_or(lookup, key, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

fn parse<T: FromStr>(raw: &str, key: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}
