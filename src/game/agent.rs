//! Opposing agent - timed behaviour loop and lead-compensated aim

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::combatant::Combatant;
use super::context::SimulationContext;
use super::weapon::{WeaponProfile, Wind};

/// Shortest time a behaviour is held (seconds)
pub const DECISION_MIN_SECS: f32 = 0.6;
/// Random extra hold time on top of the minimum (seconds)
pub const DECISION_SPREAD_SECS: f32 = 1.2;
/// Chance of firing on any single tick while attempting a shot
pub const FIRE_CHANCE_PER_TICK: f64 = 0.015;
/// Aim nudge per m/s of wind per second of flight
pub const WIND_COMPENSATION: f32 = 0.0006;
/// Width of the symmetric miss term added to the aim direction
pub const MISS_SPREAD: f32 = 0.0035;

const LATERAL_AMPLITUDE: f32 = 3.0;
const LATERAL_FREQUENCY: f32 = 1.0;
const DEPTH_AMPLITUDE: f32 = 4.0;
const DEPTH_FREQUENCY: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentBehavior {
    /// Sway along z across the rooftop
    LateralReposition,
    /// Sway along x toward and away from the opponent
    DepthReposition,
    Idle,
    /// Roll for a shot every tick
    AttemptShot,
}

impl AgentBehavior {
    pub const ALL: [AgentBehavior; 4] = [
        AgentBehavior::LateralReposition,
        AgentBehavior::DepthReposition,
        AgentBehavior::Idle,
        AgentBehavior::AttemptShot,
    ];
}

/// What the agent wants done this tick. The tick driver applies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentIntent {
    Hold,
    /// Move to an absolute horizontal position on its rooftop
    Reposition { x: f32, z: f32 },
    /// Fire along an already normalised direction
    Fire { direction: Vec3 },
}

/// Decision loop for the computer-controlled side
#[derive(Debug, Clone)]
pub struct AgentController {
    behavior: AgentBehavior,
    decision_remaining: f32,
    /// Simulated seconds since the controller started
    clock: f32,
}

impl AgentController {
    pub fn new() -> Self {
        Self {
            behavior: AgentBehavior::LateralReposition,
            decision_remaining: 0.0,
            clock: 0.0,
        }
    }

    pub fn behavior(&self) -> AgentBehavior {
        self.behavior
    }

    /// Advance the loop by `dt` and return this tick's intent
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        me: &Combatant,
        target: &Combatant,
        ctx: &SimulationContext,
        dt: f32,
        rng: &mut R,
    ) -> AgentIntent {
        self.clock += dt;
        self.decision_remaining -= dt;

        if self.decision_remaining <= 0.0 {
            self.decision_remaining = DECISION_MIN_SECS + rng.gen::<f32>() * DECISION_SPREAD_SECS;
            self.behavior = AgentBehavior::ALL[rng.gen_range(0..AgentBehavior::ALL.len())];
            trace!(
                side = %me.side,
                behavior = ?self.behavior,
                hold_secs = self.decision_remaining,
                "Agent picked behaviour"
            );
        }

        let roof = &me.rooftop;
        match self.behavior {
            AgentBehavior::LateralReposition => AgentIntent::Reposition {
                x: me.position.x,
                z: roof.center_z + (self.clock * LATERAL_FREQUENCY).sin() * LATERAL_AMPLITUDE,
            },
            AgentBehavior::DepthReposition => AgentIntent::Reposition {
                x: roof.center_x + (self.clock * DEPTH_FREQUENCY).sin() * DEPTH_AMPLITUDE,
                z: me.position.z,
            },
            AgentBehavior::Idle => AgentIntent::Hold,
            AgentBehavior::AttemptShot => {
                if roll_fire(rng) {
                    AgentIntent::Fire {
                        direction: lead_aim(me.aim_point(), target.aim_point(), ctx.weapon, ctx.wind, rng),
                    }
                } else {
                    AgentIntent::Hold
                }
            }
        }
    }
}

impl Default for AgentController {
    fn default() -> Self {
        Self::new()
    }
}

/// Independent per-tick fire roll
pub fn roll_fire<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_bool(FIRE_CHANCE_PER_TICK)
}

/// Aim from `muzzle` at `target` with drop and wind compensation plus a
/// random miss term. Returns a normalised direction.
pub fn lead_aim<R: Rng + ?Sized>(
    muzzle: Vec3,
    target: Vec3,
    weapon: &WeaponProfile,
    wind: Wind,
    rng: &mut R,
) -> Vec3 {
    let mut dir = compensated_direction(muzzle, target, weapon, wind);

    let miss = MISS_SPREAD * (rng.gen::<f32>() - 0.5);
    dir += Vec3::new(miss, miss * 0.6, miss * 0.2);
    dir.normalize_or_zero()
}

/// Lead direction before the miss term is applied (not renormalised)
fn compensated_direction(muzzle: Vec3, target: Vec3, weapon: &WeaponProfile, wind: Wind) -> Vec3 {
    let distance = (target - muzzle).length();
    let flight_time = distance / weapon.muzzle_velocity;

    let drop = 0.5 * weapon.gravity * flight_time * flight_time;
    let aim = target + Vec3::Y * drop;

    let mut dir = (aim - muzzle).normalize_or_zero();
    dir.x += wind.x() * WIND_COMPENSATION * flight_time;
    dir.z += wind.z() * WIND_COMPENSATION * flight_time;
    dir
}
