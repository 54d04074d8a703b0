//! Periodic state snapshots for HUD and observers

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::AgentBehavior;
use super::combatant::{AimPosture, Combatant, Side};
use super::context::{DuelMode, Environment};
use super::duel::Duel;
use super::round::RoundPhase;
use super::weapon::{WeaponKind, Wind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub side: Side,
    pub position: Vec3,
    pub health: f32,
    pub armor: f32,
    pub ammo: u32,
    pub magazine_size: u32,
    pub reloading: bool,
    /// Seconds left on the current reload, zero when idle
    pub reload_remaining: f32,
    pub posture: AimPosture,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(c: &Combatant) -> Self {
        Self {
            side: c.side,
            position: c.position,
            health: c.health,
            armor: c.armor,
            ammo: c.ammo,
            magazine_size: c.magazine_size,
            reloading: c.reloading,
            reload_remaining: c.reload_remaining,
            posture: c.posture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: Uuid,
    pub owner: Side,
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub duel_id: Uuid,
    /// Seed of the duel's random stream, for replays
    pub seed: u64,
    pub tick: u64,
    pub round: u32,
    pub total_rounds: u32,
    pub score: [u32; 2],
    pub phase: RoundPhase,
    /// The final round has been resolved
    pub match_complete: bool,
    pub paused: bool,
    pub kill_cam: bool,
    pub mode: DuelMode,
    pub weapon: WeaponKind,
    pub wind: Wind,
    pub environment: Environment,
    /// Wind speed readout (m/s)
    pub wind_speed: f32,
    /// Range between the duellists (m)
    pub distance: f32,
    /// Present only when the agent drives side Two
    pub agent_behavior: Option<AgentBehavior>,
    pub combatants: [CombatantSnapshot; 2],
    pub projectiles: Vec<ProjectileSnapshot>,
}

/// Decides when to emit a snapshot and builds it
pub struct SnapshotBuilder {
    /// Tick counter since last snapshot
    ticks_since_snapshot: u32,
    /// Snapshot interval in ticks
    snapshot_interval: u32,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            ticks_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
        }
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.ticks_since_snapshot += 1;
        if self.ticks_since_snapshot >= self.snapshot_interval {
            self.ticks_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (round transitions, pause)
    pub fn force_next(&mut self) {
        self.ticks_since_snapshot = self.snapshot_interval;
    }

    pub fn build(&self, duel: &Duel) -> DuelSnapshot {
        let round = duel.round();
        let ctx = duel.context();

        DuelSnapshot {
            duel_id: duel.id(),
            seed: duel.seed(),
            tick: duel.tick_count(),
            round: round.round(),
            total_rounds: round.total_rounds(),
            score: round.score(),
            phase: round.phase(),
            match_complete: round.is_match_complete(),
            paused: round.is_paused(),
            kill_cam: round.kill_cam_active(),
            mode: ctx.mode,
            weapon: ctx.weapon_kind,
            wind: ctx.wind,
            environment: ctx.environment.clone(),
            wind_speed: ctx.wind.speed(),
            distance: duel.range(),
            agent_behavior: duel.agent_behavior(),
            combatants: [
                duel.combatant(Side::One).into(),
                duel.combatant(Side::Two).into(),
            ],
            projectiles: duel
                .projectiles()
                .iter()
                .map(|p| ProjectileSnapshot {
                    id: p.id,
                    owner: p.owner,
                    position: p.position,
                    velocity: p.velocity,
                })
                .collect(),
        }
    }
}
