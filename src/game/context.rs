//! Match-wide read-only configuration handed to every component call

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::weapon::{WeaponKind, WeaponProfile, Wind};

/// Who controls side Two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelMode {
    /// The opposing agent drives side Two
    #[default]
    Ai,
    /// Both sides fire only on external requests
    Local,
}

impl FromStr for DuelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" => Ok(DuelMode::Ai),
            "local" => Ok(DuelMode::Local),
            other => Err(format!("unknown mode '{other}'")),
        }
    }
}

impl fmt::Display for DuelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelMode::Ai => f.write_str("ai"),
            DuelMode::Local => f.write_str("local"),
        }
    }
}

/// Presentation identifiers passed through untouched (fog, lighting)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub map: String,
    pub time_of_day: String,
    pub weather: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            map: "rooftops".to_string(),
            time_of_day: "day".to_string(),
            weather: "clear".to_string(),
        }
    }
}

/// Read-only state shared by the integrator, agent and tick driver
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub weapon_kind: WeaponKind,
    pub weapon: &'static WeaponProfile,
    pub wind: Wind,
    pub mode: DuelMode,
    pub environment: Environment,
}

impl SimulationContext {
    pub fn new(weapon_kind: WeaponKind, wind: Wind, mode: DuelMode, environment: Environment) -> Self {
        Self {
            weapon_kind,
            weapon: weapon_kind.profile(),
            wind,
            mode,
            environment,
        }
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(
            WeaponKind::default(),
            Wind::new(1.5, 0.0),
            DuelMode::default(),
            Environment::default(),
        )
    }
}
