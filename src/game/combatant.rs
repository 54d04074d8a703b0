//! Per-side combatant state: vitals, magazine, timers, position

use std::fmt;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weapon::WeaponProfile;

pub const MAX_HEALTH: f32 = 100.0;
pub const MAX_ARMOR: f32 = 50.0;

/// Head volume centre above the combatant's position
pub const HEAD_OFFSET: f32 = 1.3;
pub const HEAD_RADIUS: f32 = 0.35;
pub const BODY_RADIUS: f32 = 0.7;

/// Height of the muzzle and of the point opponents aim at
pub const AIM_HEIGHT: f32 = 1.35;

/// Minimum time between two shots from the same side (seconds)
pub const FIRE_INTERVAL: f32 = 0.35;

/// Strafing speed on the rooftop (m/s)
pub const MOVE_SPEED: f32 = 3.2;

/// Full width of the x jitter applied when a round resets
const RESET_JITTER: f32 = 6.0;

/// One of the two duelling sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::One, Side::Two];

    /// Index into per-side arrays (scores, combatants)
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::One => f.write_str("Player 1"),
            Side::Two => f.write_str("Player 2"),
        }
    }
}

/// The rooftop a combatant is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rooftop {
    pub center_x: f32,
    pub center_z: f32,
    /// Height the combatant stands at
    pub stand_height: f32,
    /// Half extent of the walkable area on x and z
    pub half_extent: f32,
}

impl Rooftop {
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::One => Self {
                center_x: -80.0,
                center_z: 0.0,
                stand_height: 25.6,
                half_extent: 12.0,
            },
            Side::Two => Self {
                center_x: 80.0,
                center_z: 0.0,
                stand_height: 29.6,
                half_extent: 12.0,
            },
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(self.center_x, self.stand_height, self.center_z)
    }

    /// Clamp a horizontal position into the walkable area
    pub fn clamp(&self, x: f32, z: f32) -> Vec3 {
        Vec3::new(
            x.clamp(self.center_x - self.half_extent, self.center_x + self.half_extent),
            self.stand_height,
            z.clamp(self.center_z - self.half_extent, self.center_z + self.half_extent),
        )
    }
}

/// A spherical hit-volume in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    pub center: Vec3,
    pub radius: f32,
}

/// Aiming posture held by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimPosture {
    pub scoped: bool,
    pub holding_breath: bool,
}

impl AimPosture {
    /// Multiplier applied to weapon sway when computing shot spread
    pub fn sway_factor(&self) -> f32 {
        let breath = if self.holding_breath { 0.15 } else { 1.0 };
        let scope = if self.scoped { 0.5 } else { 1.0 };
        breath * scope
    }
}

/// Per-match combat statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub headshots: u32,
    pub damage_dealt: f32,
    pub kills: u32,
}

/// Result of a fire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round left the magazine
    Fired,
    /// Magazine was empty; a reload began instead
    ReloadStarted,
    /// Reloading or still inside the fire interval; nothing changed
    Suppressed,
}

/// Mutable state of one duellist
#[derive(Debug, Clone)]
pub struct Combatant {
    pub side: Side,

    // Vitals
    pub health: f32,
    pub armor: f32,

    // Magazine
    pub ammo: u32,
    pub magazine_size: u32,
    pub reloading: bool,
    pub reload_remaining: f32,
    pub fire_cooldown: f32,
    reload_secs: f32,

    // Placement
    pub position: Vec3,
    pub rooftop: Rooftop,
    pub posture: AimPosture,

    pub stats: CombatStats,
}

impl Combatant {
    /// Create a fully equipped combatant standing at its rooftop centre
    pub fn new(side: Side, weapon: &WeaponProfile) -> Self {
        let rooftop = Rooftop::for_side(side);
        Self {
            side,
            health: MAX_HEALTH,
            armor: MAX_ARMOR,
            ammo: weapon.magazine_size,
            magazine_size: weapon.magazine_size,
            reloading: false,
            reload_remaining: 0.0,
            fire_cooldown: 0.0,
            reload_secs: weapon.reload_secs,
            position: rooftop.center(),
            rooftop,
            posture: AimPosture::default(),
            stats: CombatStats::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn head_volume(&self) -> HitVolume {
        HitVolume {
            center: self.position + Vec3::Y * HEAD_OFFSET,
            radius: HEAD_RADIUS,
        }
    }

    pub fn body_volume(&self) -> HitVolume {
        HitVolume {
            center: self.position,
            radius: BODY_RADIUS,
        }
    }

    /// Where this combatant's shots leave from, and where opponents aim
    pub fn aim_point(&self) -> Vec3 {
        self.position + Vec3::Y * AIM_HEIGHT
    }

    /// Gate a shot: fire interval, reload state, then ammo
    pub fn try_fire(&mut self) -> FireOutcome {
        if self.fire_cooldown > 0.0 || self.reloading {
            return FireOutcome::Suppressed;
        }

        if self.ammo == 0 {
            return if self.begin_reload() {
                FireOutcome::ReloadStarted
            } else {
                FireOutcome::Suppressed
            };
        }

        self.ammo -= 1;
        self.fire_cooldown = FIRE_INTERVAL;
        self.stats.shots_fired += 1;
        FireOutcome::Fired
    }

    /// Start a reload. No-op (returns false) if full or already reloading.
    pub fn begin_reload(&mut self) -> bool {
        if self.ammo >= self.magazine_size || self.reloading {
            return false;
        }
        self.reloading = true;
        self.reload_remaining = self.reload_secs;
        true
    }

    /// Count down reload and fire interval. Returns true when a reload completes.
    pub fn tick_timers(&mut self, dt: f32) -> bool {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        if !self.reloading {
            return false;
        }

        self.reload_remaining -= dt;
        if self.reload_remaining <= 0.0 {
            self.reload_remaining = 0.0;
            self.reloading = false;
            self.ammo = self.magazine_size;
            return true;
        }
        false
    }

    /// Strafe by a movement intent, clamped to the rooftop
    pub fn move_by(&mut self, dx: f32, dz: f32, dt: f32) {
        let len = (dx * dx + dz * dz).sqrt();
        if len <= f32::EPSILON {
            return;
        }
        let step = MOVE_SPEED * dt / len;
        self.position = self
            .rooftop
            .clamp(self.position.x + dx * step, self.position.z + dz * step);
    }

    /// Place at an absolute horizontal position, clamped to the rooftop
    pub fn place_at(&mut self, x: f32, z: f32) {
        self.position = self.rooftop.clamp(x, z);
    }

    /// Restore vitals and reposition for a new round
    pub fn reset_for_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.health = MAX_HEALTH;
        self.armor = MAX_ARMOR;
        self.reloading = false;
        self.reload_remaining = 0.0;
        self.fire_cooldown = 0.0;

        let jitter = (rng.gen::<f32>() - 0.5) * RESET_JITTER;
        self.place_at(self.rooftop.center_x + jitter, self.rooftop.center_z);
    }

    /// Refill the magazine and clear match statistics
    pub fn reequip(&mut self) {
        self.ammo = self.magazine_size;
        self.stats = CombatStats::default();
    }
}
