//! Weapon profiles and the wind environment

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rifle selectable at match configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Hard-hitting, slow to reload
    Heavy,
    /// Balanced stats
    Marksman,
    /// Large magazine, light rounds
    Scout,
}

impl Default for WeaponKind {
    fn default() -> Self {
        Self::Heavy
    }
}

impl WeaponKind {
    pub fn profile(self) -> &'static WeaponProfile {
        match self {
            WeaponKind::Heavy => &HEAVY,
            WeaponKind::Marksman => &MARKSMAN,
            WeaponKind::Scout => &SCOUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeaponKind::Heavy => "heavy",
            WeaponKind::Marksman => "marksman",
            WeaponKind::Scout => "scout",
        }
    }
}

impl FromStr for WeaponKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heavy" => Ok(WeaponKind::Heavy),
            "marksman" => Ok(WeaponKind::Marksman),
            "scout" => Ok(WeaponKind::Scout),
            other => Err(format!("unknown weapon '{other}'")),
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable rifle tuning, shared by reference for the whole match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub name: &'static str,
    /// Rounds per magazine
    pub magazine_size: u32,
    /// Raw damage of a body hit
    pub body_damage: f32,
    /// Raw damage of a head hit
    pub head_damage: f32,
    /// Muzzle velocity (m/s)
    pub muzzle_velocity: f32,
    /// Downward acceleration applied to rounds (m/s^2)
    pub gravity: f32,
    /// Aim sway magnitude, scales shot spread
    pub sway: f32,
    /// Recoil impulse handed to the camera layer (radians)
    pub recoil: f32,
    /// Reload duration (seconds)
    pub reload_secs: f32,
}

impl WeaponProfile {
    /// Raw damage for a hit on the given volume
    pub fn damage_for(&self, location: super::hitbox::HitLocation) -> f32 {
        match location {
            super::hitbox::HitLocation::Head => self.head_damage,
            super::hitbox::HitLocation::Body => self.body_damage,
        }
    }
}

pub static HEAVY: WeaponProfile = WeaponProfile {
    name: "Heavy Sniper",
    magazine_size: 5,
    body_damage: 60.0,
    head_damage: 200.0,
    muzzle_velocity: 900.0,
    gravity: 9.81,
    sway: 0.35,
    recoil: 0.004,
    reload_secs: 2.5,
};

pub static MARKSMAN: WeaponProfile = WeaponProfile {
    name: "Marksman Rifle",
    magazine_size: 8,
    body_damage: 45.0,
    head_damage: 140.0,
    muzzle_velocity: 750.0,
    gravity: 9.81,
    sway: 0.28,
    recoil: 0.003,
    reload_secs: 2.0,
};

pub static SCOUT: WeaponProfile = WeaponProfile {
    name: "Scout Sniper",
    magazine_size: 10,
    body_damage: 38.0,
    head_damage: 120.0,
    muzzle_velocity: 650.0,
    gravity: 9.81,
    sway: 0.22,
    recoil: 0.0025,
    reload_secs: 1.8,
};

/// Horizontal wind vector (m/s). The vertical component is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    x: f32,
    z: f32,
}

impl Wind {
    #[cfg(test)]
    pub const CALM: Wind = Wind { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// Wind speed (m/s)
    pub fn speed(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}
