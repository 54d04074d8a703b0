//! Presentation events, emitted after the simulation has committed state

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::combatant::{CombatStats, Side};
use super::context::Environment;
use super::hitbox::HitLocation;
use super::weapon::Wind;

/// One-way notifications for tracers, VFX, audio, HUD bars and scoreboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuelEvent {
    /// Projectile spawned
    ShotFired {
        projectile_id: Uuid,
        shooter: Side,
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        /// Camera kick for the shooter's view
        recoil: f32,
    },

    ReloadStarted {
        side: Side,
        duration_secs: f32,
    },

    ReloadFinished {
        side: Side,
        ammo: u32,
    },

    /// Projectile aged out without hitting anything
    ProjectileExpired {
        projectile_id: Uuid,
    },

    /// Hit registered
    Impact {
        projectile_id: Uuid,
        shooter: Side,
        target: Side,
        location: HitLocation,
        point: Vec3,
        damage: f32,
        /// Distance from the muzzle to the impact point
        distance: f32,
    },

    /// Health or armor changed
    VitalsChanged {
        side: Side,
        health: f32,
        armor: f32,
    },

    Kill {
        killer: Side,
        victim: Side,
        location: HitLocation,
    },

    KillCamEnded,

    RoundResolved {
        round: u32,
        total_rounds: u32,
        winner: Side,
        score: [u32; 2],
    },

    /// The final round was resolved
    MatchComplete {
        /// `None` on a tied score
        winner: Option<Side>,
        score: [u32; 2],
        stats: [CombatStats; 2],
    },

    RoundStarted {
        round: u32,
        total_rounds: u32,
        wind: Wind,
        /// Map, time of day and weather for the scene layer
        environment: Environment,
    },

    /// Scores and round index wrapped to a fresh match
    MatchReset {
        total_rounds: u32,
    },
}

impl DuelEvent {
    /// Kill-feed line for kill events
    pub fn kill_feed_text(&self) -> Option<String> {
        match self {
            DuelEvent::Kill {
                killer,
                victim,
                location,
            } => Some(match location {
                HitLocation::Head => format!("{killer} HEADSHOT {victim}"),
                HitLocation::Body => format!("{killer} killed {victim}"),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_feed_distinguishes_headshots() {
        let head = DuelEvent::Kill {
            killer: Side::One,
            victim: Side::Two,
            location: HitLocation::Head,
        };
        let body = DuelEvent::Kill {
            killer: Side::Two,
            victim: Side::One,
            location: HitLocation::Body,
        };

        assert_eq!(head.kill_feed_text().as_deref(), Some("Player 1 HEADSHOT Player 2"));
        assert_eq!(body.kill_feed_text().as_deref(), Some("Player 2 killed Player 1"));
        assert!(DuelEvent::KillCamEnded.kill_feed_text().is_none());
    }

    #[test]
    fn test_events_are_tagged() {
        let json = serde_json::to_value(DuelEvent::ReloadFinished {
            side: Side::Two,
            ammo: 5,
        })
        .expect("serializable");
        assert_eq!(json["event"], "reload_finished");
        assert_eq!(json["side"], "two");
    }
}
