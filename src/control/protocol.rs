//! Control protocol message definitions
//! These are the JSON-lines types exchanged with the driving harness

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::combatant::Side;
use crate::game::events::DuelEvent;
use crate::game::snapshot::DuelSnapshot;

/// Commands sent from the harness to the duel session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelCommand {
    /// Pull the trigger for a side
    Fire { side: Side },

    Reload { side: Side },

    /// Movement intent, each axis in -1.0..=1.0. Held until replaced.
    Move { side: Side, dx: f32, dz: f32 },

    /// Scope in or out
    Scope { side: Side, on: bool },

    HoldBreath { side: Side, on: bool },

    /// Start the next round once the current one is resolved
    Continue,

    Pause,
    Resume,

    /// Stop the session loop
    Shutdown,
}

/// A command stamped with its arrival time
#[derive(Debug, Clone)]
pub struct DuelInput {
    pub command: DuelCommand,
    pub received_at: u64,
}

/// Items leaving the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelFeed {
    /// Presentation event raised on a given tick
    Event { tick: u64, event: DuelEvent },

    /// Periodic full state
    Snapshot(DuelSnapshot),
}

/// A feed item as written to the harness
#[derive(Debug, Clone, Serialize)]
pub struct FeedLine<'a> {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub feed: &'a DuelFeed,
}

impl<'a> FeedLine<'a> {
    pub fn now(feed: &'a DuelFeed) -> Self {
        Self { at: Utc::now(), feed }
    }
}
