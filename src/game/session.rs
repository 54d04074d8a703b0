//! Real-time session loop around a `Duel`

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::control::protocol::{DuelCommand, DuelFeed, DuelInput};
use crate::util::time::{clamp_delta, unix_millis, Timer, SIMULATION_TPS, SNAPSHOT_TPS};

use super::duel::Duel;
use super::events::DuelEvent;
use super::snapshot::SnapshotBuilder;

/// Handle to a running session
#[derive(Clone)]
pub struct DuelHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<DuelInput>,
    pub feed_tx: broadcast::Sender<DuelFeed>,
}

impl DuelHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<DuelFeed> {
        self.feed_tx.subscribe()
    }

    /// Stamp and queue a command. Returns false once the session has stopped.
    pub async fn send(&self, command: DuelCommand) -> bool {
        let input = DuelInput {
            command,
            received_at: unix_millis(),
        };
        self.command_tx.send(input).await.is_ok()
    }
}

/// Why a drain pass stopped the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Running,
    Stop,
}

/// Drives a duel at the simulation rate from wall-clock time
pub struct DuelSession {
    duel: Duel,
    time_scale: f32,
    command_rx: mpsc::Receiver<DuelInput>,
    feed_tx: broadcast::Sender<DuelFeed>,
    snapshot_builder: SnapshotBuilder,
}

impl DuelSession {
    pub fn new(duel: Duel, time_scale: f32) -> (Self, DuelHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (feed_tx, _) = broadcast::channel(256);

        let handle = DuelHandle {
            id: duel.id(),
            command_tx,
            feed_tx: feed_tx.clone(),
        };

        let session = Self {
            duel,
            time_scale,
            command_rx,
            feed_tx,
            snapshot_builder: SnapshotBuilder::new(SIMULATION_TPS / SNAPSHOT_TPS),
        };

        (session, handle)
    }

    /// Run the tick loop until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!(duel_id = %self.duel.id(), time_scale = self.time_scale, "Duel session started");

        let tick_duration = Duration::from_micros(1_000_000 / SIMULATION_TPS as u64);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let opening = self.duel.opening_events();
        self.publish_events(opening);
        self.snapshot_builder.force_next();

        let mut timer = Timer::new();
        loop {
            tick_interval.tick().await;

            // Drain command queue
            if self.process_commands() == Control::Stop {
                break;
            }

            let dt = clamp_delta(timer.lap(), self.time_scale);
            let events = self.duel.tick(dt);
            self.publish_events(events);

            if self.snapshot_builder.should_send() {
                let snapshot = self.snapshot_builder.build(&self.duel);
                let _ = self.feed_tx.send(DuelFeed::Snapshot(snapshot));
            }
        }

        info!(
            duel_id = %self.duel.id(),
            ticks = self.duel.tick_count(),
            score = ?self.duel.round().score(),
            "Duel session stopped"
        );
    }

    fn process_commands(&mut self) -> Control {
        loop {
            match self.command_rx.try_recv() {
                Ok(input) => {
                    if self.apply(input) == Control::Stop {
                        return Control::Stop;
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => return Control::Running,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    info!(duel_id = %self.duel.id(), "All command senders dropped");
                    return Control::Stop;
                }
            }
        }
    }

    fn apply(&mut self, input: DuelInput) -> Control {
        trace!(
            duel_id = %self.duel.id(),
            command = ?input.command,
            queued_ms = unix_millis().saturating_sub(input.received_at),
            "Command received"
        );

        let events = match input.command {
            DuelCommand::Fire { side } => self.duel.request_fire(side),
            DuelCommand::Reload { side } => self.duel.request_reload(side),
            DuelCommand::Move { side, dx, dz } => {
                self.duel.set_movement(side, dx, dz);
                Vec::new()
            }
            DuelCommand::Scope { side, on } => {
                self.duel.set_scoped(side, on);
                Vec::new()
            }
            DuelCommand::HoldBreath { side, on } => {
                self.duel.set_holding_breath(side, on);
                Vec::new()
            }
            DuelCommand::Continue => {
                self.snapshot_builder.force_next();
                self.duel.continue_round()
            }
            DuelCommand::Pause => {
                self.snapshot_builder.force_next();
                self.duel.set_paused(true);
                Vec::new()
            }
            DuelCommand::Resume => {
                self.snapshot_builder.force_next();
                self.duel.set_paused(false);
                Vec::new()
            }
            DuelCommand::Shutdown => {
                info!(duel_id = %self.duel.id(), "Shutdown requested");
                return Control::Stop;
            }
        };

        self.publish_events(events);
        Control::Running
    }

    fn publish_events(&mut self, events: Vec<DuelEvent>) {
        let tick = self.duel.tick_count();
        for event in events {
            if matches!(event, DuelEvent::RoundResolved { .. } | DuelEvent::KillCamEnded) {
                self.snapshot_builder.force_next();
            }
            if let Some(line) = event.kill_feed_text() {
                info!(duel_id = %self.duel.id(), tick, "{}", line);
            }
            // No subscribers is not an error
            if self.feed_tx.send(DuelFeed::Event { tick, event }).is_err() {
                debug!(duel_id = %self.duel.id(), "No feed subscribers");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::combatant::Side;
    use crate::game::context::DuelMode;
    use crate::game::duel::DuelSettings;
    use tokio_test::assert_ok;

    fn local_session() -> (DuelSession, DuelHandle) {
        let duel = Duel::new(DuelSettings {
            mode: DuelMode::Local,
            seed: 3,
            ..DuelSettings::default()
        });
        DuelSession::new(duel, 1.0)
    }

    async fn next_event(rx: &mut broadcast::Receiver<DuelFeed>) -> DuelEvent {
        loop {
            if let DuelFeed::Event { event, .. } = assert_ok!(rx.recv().await) {
                return event;
            }
        }
    }

    #[tokio::test]
    async fn test_session_opens_with_round_start() {
        let (session, handle) = local_session();
        let mut feed = handle.subscribe();
        let task = tokio::spawn(session.run());

        let first = next_event(&mut feed).await;
        assert!(matches!(first, DuelEvent::RoundStarted { round: 1, total_rounds: 5, .. }));

        assert!(handle.send(DuelCommand::Shutdown).await);
        assert_ok!(task.await);
    }

    #[tokio::test]
    async fn test_fire_command_reaches_duel() {
        let (session, handle) = local_session();
        let mut feed = handle.subscribe();
        let task = tokio::spawn(session.run());

        assert!(handle.send(DuelCommand::Fire { side: Side::One }).await);

        let fired = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let DuelEvent::ShotFired { shooter, .. } = next_event(&mut feed).await {
                    return shooter;
                }
            }
        })
        .await;
        assert_eq!(assert_ok!(fired), Side::One);

        assert!(handle.send(DuelCommand::Shutdown).await);
        assert_ok!(task.await);
    }

    #[tokio::test]
    async fn test_session_stops_when_handles_drop() {
        let (session, handle) = local_session();
        let task = tokio::spawn(session.run());
        drop(handle);

        let joined = tokio::time::timeout(Duration::from_secs(5), task).await;
        assert_ok!(assert_ok!(joined));
    }

    #[tokio::test]
    async fn test_snapshots_are_broadcast() {
        let (session, handle) = local_session();
        let mut feed = handle.subscribe();
        let task = tokio::spawn(session.run());

        let snapshot = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let DuelFeed::Snapshot(snapshot) = assert_ok!(feed.recv().await) {
                    return snapshot;
                }
            }
        })
        .await;
        let snapshot = assert_ok!(snapshot);
        assert_eq!(snapshot.duel_id, handle.id);
        assert_eq!(snapshot.round, 1);

        assert!(handle.send(DuelCommand::Shutdown).await);
        assert_ok!(task.await);
    }
}
