//! Round and match lifecycle

use serde::{Deserialize, Serialize};

use super::combatant::Side;

/// Simulation stays frozen this long after a lethal hit (seconds)
pub const KILL_CAM_SECS: f32 = 1.8;

/// Round phase. Match completion is implied by a resolved final round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoundPhase {
    /// Gameplay runs
    Active,
    /// A combatant fell; simulation is frozen until the continue signal
    RoundResolved { winner: Side },
}

/// Summary of a round that just ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: u32,
    pub total_rounds: u32,
    pub winner: Side,
    pub score: [u32; 2],
    /// The resolved round was the last of the match
    pub match_complete: bool,
}

/// What the continue signal did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextRound { round: u32 },
    /// Past the final round: index and scores wrapped to a fresh match
    NewMatch,
}

/// Round index, score and freeze flags for one match
#[derive(Debug, Clone)]
pub struct RoundState {
    round: u32,
    total_rounds: u32,
    score: [u32; 2],
    phase: RoundPhase,
    paused: bool,
    kill_cam_remaining: f32,
}

impl RoundState {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            round: 1,
            total_rounds: total_rounds.max(1),
            score: [0, 0],
            phase: RoundPhase::Active,
            paused: false,
            kill_cam_remaining: 0.0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn score(&self) -> [u32; 2] {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn kill_cam_active(&self) -> bool {
        self.kill_cam_remaining > 0.0
    }

    /// Resolved on the final round
    pub fn is_match_complete(&self) -> bool {
        !self.is_active() && self.round >= self.total_rounds
    }

    /// Whether ballistics, AI and damage may run this tick
    pub fn simulating(&self) -> bool {
        self.is_active() && !self.paused && !self.kill_cam_active()
    }

    /// Side ahead on score, if any
    pub fn leader(&self) -> Option<Side> {
        match self.score[0].cmp(&self.score[1]) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// End the active round in favour of `winner`.
    /// Returns `None` if the round was already resolved.
    pub fn resolve(&mut self, winner: Side) -> Option<RoundOutcome> {
        if !self.is_active() {
            return None;
        }

        self.score[winner.index()] += 1;
        self.phase = RoundPhase::RoundResolved { winner };

        Some(RoundOutcome {
            round: self.round,
            total_rounds: self.total_rounds,
            winner,
            score: self.score,
            match_complete: self.round >= self.total_rounds,
        })
    }

    /// Continue signal. Returns `None` while a round is still active.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.is_active() {
            return None;
        }

        self.phase = RoundPhase::Active;
        self.round += 1;
        if self.round > self.total_rounds {
            self.round = 1;
            self.score = [0, 0];
            return Some(Advance::NewMatch);
        }
        Some(Advance::NextRound { round: self.round })
    }

    pub fn start_kill_cam(&mut self) {
        self.kill_cam_remaining = KILL_CAM_SECS;
    }

    /// Count the kill cam down. Returns true on the tick it ends.
    pub fn tick_kill_cam(&mut self, dt: f32) -> bool {
        if !self.kill_cam_active() {
            return false;
        }
        self.kill_cam_remaining = (self.kill_cam_remaining - dt).max(0.0);
        !self.kill_cam_active()
    }
}
