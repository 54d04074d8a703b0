//! Duel state and the per-tick simulation order

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::agent::{AgentBehavior, AgentController, AgentIntent};
use super::ballistics::{self, Projectile, Step};
use super::combatant::{Combatant, FireOutcome, Side};
use super::context::{DuelMode, Environment, SimulationContext};
use super::damage;
use super::events::DuelEvent;
use super::hitbox::{self, Hit};
use super::round::{Advance, RoundState};
use super::weapon::{WeaponKind, Wind};

/// Scales weapon sway into per-axis aim error for requested shots
const SPREAD_SCALE: f32 = 0.003;

/// Match configuration
#[derive(Debug, Clone)]
pub struct DuelSettings {
    pub weapon: WeaponKind,
    pub rounds: u32,
    pub mode: DuelMode,
    pub wind: Wind,
    pub environment: Environment,
    pub seed: u64,
}

impl Default for DuelSettings {
    fn default() -> Self {
        Self {
            weapon: WeaponKind::Heavy,
            rounds: 5,
            mode: DuelMode::Ai,
            wind: Wind::new(1.5, 0.0),
            environment: Environment::default(),
            seed: 0,
        }
    }
}

/// Horizontal movement intent held by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MoveIntent {
    dx: f32,
    dz: f32,
}

/// Owns every piece of mutable duel state and sequences each tick
pub struct Duel {
    id: Uuid,
    seed: u64,
    tick: u64,
    ctx: SimulationContext,
    round: RoundState,
    combatants: [Combatant; 2],
    projectiles: Vec<Projectile>,
    movement: [MoveIntent; 2],
    agent: AgentController,
    rng: ChaCha8Rng,
}

impl Duel {
    pub fn new(settings: DuelSettings) -> Self {
        let ctx = SimulationContext::new(
            settings.weapon,
            settings.wind,
            settings.mode,
            settings.environment,
        );
        let combatants = [
            Combatant::new(Side::One, ctx.weapon),
            Combatant::new(Side::Two, ctx.weapon),
        ];
        let id = Uuid::new_v4();

        info!(
            duel_id = %id,
            seed = settings.seed,
            weapon = %ctx.weapon_kind,
            mode = %ctx.mode,
            rounds = settings.rounds,
            "Duel created"
        );

        Self {
            id,
            seed: settings.seed,
            tick: 0,
            ctx,
            round: RoundState::new(settings.rounds),
            combatants,
            projectiles: Vec::new(),
            movement: [MoveIntent::default(); 2],
            agent: AgentController::new(),
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Current agent behaviour, when the agent drives side Two
    pub fn agent_behavior(&self) -> Option<AgentBehavior> {
        (self.ctx.mode == DuelMode::Ai).then(|| self.agent.behavior())
    }

    /// Straight-line distance between the two combatants
    pub fn range(&self) -> f32 {
        self.combatants[0].position.distance(self.combatants[1].position)
    }

    /// Events describing the opening state, for a freshly attached observer
    pub fn opening_events(&self) -> Vec<DuelEvent> {
        let mut events = vec![self.round_started()];
        self.push_vitals(&mut events);
        events
    }

    /// Trigger pull for `side`. Aim, gating and spawn geometry are applied here.
    pub fn request_fire(&mut self, side: Side) -> Vec<DuelEvent> {
        let mut events = Vec::new();
        if !self.round.simulating() {
            return events;
        }

        let direction = self.requested_direction(side);
        self.fire_along(side, direction, &mut events);
        events
    }

    pub fn request_reload(&mut self, side: Side) -> Vec<DuelEvent> {
        let mut events = Vec::new();
        if !self.round.is_active() {
            return events;
        }

        let combatant = &mut self.combatants[side.index()];
        if combatant.begin_reload() {
            events.push(DuelEvent::ReloadStarted {
                side,
                duration_secs: combatant.reload_remaining,
            });
        }
        events
    }

    pub fn set_movement(&mut self, side: Side, dx: f32, dz: f32) {
        self.movement[side.index()] = MoveIntent {
            dx: dx.clamp(-1.0, 1.0),
            dz: dz.clamp(-1.0, 1.0),
        };
    }

    pub fn set_scoped(&mut self, side: Side, scoped: bool) {
        self.combatants[side.index()].posture.scoped = scoped;
    }

    pub fn set_holding_breath(&mut self, side: Side, holding: bool) {
        self.combatants[side.index()].posture.holding_breath = holding;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.round.set_paused(paused);
        info!(duel_id = %self.id, paused, "Pause toggled");
    }

    /// Continue signal: start the next round, or a new match after the last one
    pub fn continue_round(&mut self) -> Vec<DuelEvent> {
        let mut events = Vec::new();
        let Some(advance) = self.round.advance() else {
            debug!(duel_id = %self.id, "Continue ignored, round still active");
            return events;
        };

        self.projectiles.clear();
        for combatant in self.combatants.iter_mut() {
            combatant.reset_for_round(&mut self.rng);
        }

        if advance == Advance::NewMatch {
            for combatant in self.combatants.iter_mut() {
                combatant.reequip();
            }
            info!(duel_id = %self.id, total_rounds = self.round.total_rounds(), "Match reset");
            events.push(DuelEvent::MatchReset {
                total_rounds: self.round.total_rounds(),
            });
        }

        info!(
            duel_id = %self.id,
            round = self.round.round(),
            total_rounds = self.round.total_rounds(),
            "Round started"
        );
        events.push(self.round_started());
        self.push_vitals(&mut events);
        events
    }

    /// Run a single simulation tick of `dt` seconds.
    ///
    /// Order: timers, movement, agent, projectile advance, hit resolution,
    /// damage, round observation. Nothing but the kill cam advances while
    /// paused, frozen by the kill cam, or between rounds.
    pub fn tick(&mut self, dt: f32) -> Vec<DuelEvent> {
        let mut events = Vec::new();
        self.tick += 1;

        if self.round.tick_kill_cam(dt) {
            events.push(DuelEvent::KillCamEnded);
        }

        if !self.round.simulating() {
            return events;
        }

        self.step_timers(dt, &mut events);
        self.step_movement(dt);
        self.step_agent(dt, &mut events);
        self.step_projectiles(dt, &mut events);

        events
    }

    fn step_timers(&mut self, dt: f32, events: &mut Vec<DuelEvent>) {
        for combatant in self.combatants.iter_mut() {
            if combatant.tick_timers(dt) {
                events.push(DuelEvent::ReloadFinished {
                    side: combatant.side,
                    ammo: combatant.ammo,
                });
            }
        }
    }

    fn step_movement(&mut self, dt: f32) {
        for side in Side::ALL {
            if self.agent_controls(side) {
                continue;
            }
            let intent = self.movement[side.index()];
            self.combatants[side.index()].move_by(intent.dx, intent.dz, dt);
        }
    }

    fn step_agent(&mut self, dt: f32, events: &mut Vec<DuelEvent>) {
        if self.ctx.mode != DuelMode::Ai {
            return;
        }

        let intent = self.agent.step(
            &self.combatants[Side::Two.index()],
            &self.combatants[Side::One.index()],
            &self.ctx,
            dt,
            &mut self.rng,
        );

        match intent {
            AgentIntent::Hold => {}
            AgentIntent::Reposition { x, z } => {
                self.combatants[Side::Two.index()].place_at(x, z);
            }
            AgentIntent::Fire { direction } => {
                self.fire_along(Side::Two, direction, events);
            }
        }
    }

    fn step_projectiles(&mut self, dt: f32, events: &mut Vec<DuelEvent>) {
        debug_assert!(
            self.round.is_active(),
            "projectiles stepped while the round is resolved"
        );
        if !self.round.is_active() {
            error!(duel_id = %self.id, "Projectile step requested between rounds, skipping");
            return;
        }

        let wind = self.ctx.wind;
        let mut idx = 0;
        while idx < self.projectiles.len() {
            // A lethal hit earlier in this tick freezes the rest
            if !self.round.is_active() {
                break;
            }

            match ballistics::advance(&mut self.projectiles[idx], wind, dt) {
                Step::Expired => {
                    let projectile = self.projectiles.swap_remove(idx);
                    events.push(DuelEvent::ProjectileExpired {
                        projectile_id: projectile.id,
                    });
                }
                Step::Moved { from, to } => {
                    let target = self.projectiles[idx].owner.opponent();
                    match hitbox::resolve(from, to, &self.combatants[target.index()]) {
                        Some(hit) => {
                            let projectile = self.projectiles.swap_remove(idx);
                            self.apply_hit(projectile, hit, events);
                        }
                        None => idx += 1,
                    }
                }
            }
        }
    }

    fn apply_hit(&mut self, projectile: Projectile, hit: Hit, events: &mut Vec<DuelEvent>) {
        let shooter = projectile.owner;
        let target = shooter.opponent();
        let raw = projectile.weapon.damage_for(hit.location);

        let Some(report) = damage::apply_damage(&mut self.combatants[target.index()], raw) else {
            debug!(duel_id = %self.id, target = %target, "Hit on a downed combatant ignored");
            return;
        };

        let distance = projectile.origin.distance(hit.point);
        let stats = &mut self.combatants[shooter.index()].stats;
        stats.shots_hit += 1;
        stats.damage_dealt += raw;
        if hit.location == hitbox::HitLocation::Head {
            stats.headshots += 1;
        }

        debug!(
            duel_id = %self.id,
            shooter = %shooter,
            location = ?hit.location,
            damage = raw,
            health = report.health,
            armor = report.armor,
            distance,
            "Impact"
        );

        events.push(DuelEvent::Impact {
            projectile_id: projectile.id,
            shooter,
            target,
            location: hit.location,
            point: hit.point,
            damage: raw,
            distance,
        });
        events.push(DuelEvent::VitalsChanged {
            side: target,
            health: report.health,
            armor: report.armor,
        });

        if report.lethal {
            self.on_lethal_hit(target, hit, events);
        }
    }

    fn on_lethal_hit(&mut self, victim: Side, hit: Hit, events: &mut Vec<DuelEvent>) {
        let winner = victim.opponent();
        self.combatants[winner.index()].stats.kills += 1;

        events.push(DuelEvent::Kill {
            killer: winner,
            victim,
            location: hit.location,
        });
        self.round.start_kill_cam();

        let Some(outcome) = self.round.resolve(winner) else {
            return;
        };

        info!(
            duel_id = %self.id,
            round = outcome.round,
            winner = %outcome.winner,
            score = ?outcome.score,
            "Round resolved"
        );
        events.push(DuelEvent::RoundResolved {
            round: outcome.round,
            total_rounds: outcome.total_rounds,
            winner: outcome.winner,
            score: outcome.score,
        });

        if outcome.match_complete {
            let leader = self.round.leader();
            info!(duel_id = %self.id, winner = ?leader, score = ?outcome.score, "Match complete");
            events.push(DuelEvent::MatchComplete {
                winner: leader,
                score: outcome.score,
                stats: [
                    self.combatants[0].stats.clone(),
                    self.combatants[1].stats.clone(),
                ],
            });
        }
    }

    /// Gate and spawn a shot. Shared by requested and agent shots.
    fn fire_along(&mut self, side: Side, direction: Vec3, events: &mut Vec<DuelEvent>) {
        let shooter = &mut self.combatants[side.index()];
        match shooter.try_fire() {
            FireOutcome::Fired => {
                let origin = shooter.aim_point();
                let Some(projectile) =
                    ballistics::spawn(side, origin, direction, self.ctx.weapon, self.ctx.wind)
                else {
                    return;
                };

                debug!(duel_id = %self.id, shooter = %side, ammo = shooter.ammo, "Shot fired");
                events.push(DuelEvent::ShotFired {
                    projectile_id: projectile.id,
                    shooter: side,
                    origin,
                    direction: direction.normalize_or_zero(),
                    speed: self.ctx.weapon.muzzle_velocity,
                    recoil: self.ctx.weapon.recoil,
                });
                self.projectiles.push(projectile);
            }
            FireOutcome::ReloadStarted => {
                events.push(DuelEvent::ReloadStarted {
                    side,
                    duration_secs: shooter.reload_remaining,
                });
            }
            FireOutcome::Suppressed => {}
        }
    }

    /// Aim at the opponent's head-height point with sway-driven spread
    fn requested_direction(&mut self, side: Side) -> Vec3 {
        let shooter = &self.combatants[side.index()];
        let target = &self.combatants[side.opponent().index()];

        let mut dir = (target.aim_point() - shooter.aim_point()).normalize_or_zero();
        let spread = self.ctx.weapon.sway * shooter.posture.sway_factor() * SPREAD_SCALE;

        dir.x += (self.rng.gen::<f32>() - 0.5) * spread;
        dir.y += (self.rng.gen::<f32>() - 0.5) * spread;
        dir.z += (self.rng.gen::<f32>() - 0.5) * spread;
        dir.normalize_or_zero()
    }

    fn round_started(&self) -> DuelEvent {
        DuelEvent::RoundStarted {
            round: self.round.round(),
            total_rounds: self.round.total_rounds(),
            wind: self.ctx.wind,
            environment: self.ctx.environment.clone(),
        }
    }

    fn agent_controls(&self, side: Side) -> bool {
        self.ctx.mode == DuelMode::Ai && side == Side::Two
    }

    fn push_vitals(&self, events: &mut Vec<DuelEvent>) {
        for combatant in &self.combatants {
            events.push(DuelEvent::VitalsChanged {
                side: combatant.side,
                health: combatant.health,
                armor: combatant.armor,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::combatant::{MAX_ARMOR, MAX_HEALTH};
    use crate::game::hitbox::HitLocation;
    use crate::game::round::RoundPhase;

    const DT: f32 = 1.0 / 60.0;

    fn local_duel(rounds: u32) -> Duel {
        Duel::new(DuelSettings {
            rounds,
            mode: DuelMode::Local,
            seed: 42,
            ..DuelSettings::default()
        })
    }

    /// Fire from `side` and tick until the round resolves
    fn win_round(duel: &mut Duel, side: Side) -> Vec<DuelEvent> {
        let mut events = duel.request_fire(side);
        for _ in 0..10 {
            events.extend(duel.tick(DT));
            if !duel.round.is_active() {
                break;
            }
        }
        events
    }

    /// Climbs away from both rooftops, never hits anything
    fn stray_projectile(owner: Side) -> Projectile {
        ballistics::spawn(owner, Vec3::new(0.0, 60.0, 0.0), Vec3::Y, &crate::game::weapon::HEAVY, Wind::CALM)
            .expect("valid direction")
    }

    #[test]
    fn test_requested_shot_kills_with_headshot() {
        let mut duel = local_duel(5);
        let events = win_round(&mut duel, Side::One);

        assert!(events.iter().any(|e| matches!(e, DuelEvent::ShotFired { shooter: Side::One, .. })));
        let kill = events
            .iter()
            .find(|e| matches!(e, DuelEvent::Kill { .. }))
            .expect("kill event");
        assert_eq!(kill.kill_feed_text().as_deref(), Some("Player 1 HEADSHOT Player 2"));

        assert_eq!(duel.round.phase(), RoundPhase::RoundResolved { winner: Side::One });
        assert_eq!(duel.round.score(), [1, 0]);
        assert_eq!(duel.combatant(Side::Two).health, 0.0);
        assert_eq!(duel.combatant(Side::One).ammo, 4);

        let stats = &duel.combatant(Side::One).stats;
        assert_eq!((stats.shots_fired, stats.shots_hit, stats.headshots, stats.kills), (1, 1, 1, 1));
    }

    #[test]
    fn test_round_three_of_five_transition() {
        let mut duel = local_duel(5);
        for _ in 0..2 {
            duel.round.resolve(Side::Two);
            duel.continue_round();
        }
        assert_eq!(duel.round.round(), 3);

        duel.projectiles.push(stray_projectile(Side::Two));
        win_round(&mut duel, Side::One);
        assert_eq!(duel.round.score(), [1, 2]);
        assert!(!duel.projectiles.is_empty());

        let events = duel.continue_round();
        assert_eq!(duel.round.round(), 4);
        assert_eq!(duel.round.score(), [1, 2]);
        assert!(duel.projectiles.is_empty());
        for side in Side::ALL {
            assert_eq!(duel.combatant(side).health, MAX_HEALTH);
            assert_eq!(duel.combatant(side).armor, MAX_ARMOR);
        }
        assert!(events.contains(&DuelEvent::RoundStarted {
            round: 4,
            total_rounds: 5,
            wind: duel.ctx.wind,
            environment: Environment::default(),
        }));
    }

    #[test]
    fn test_final_round_completes_and_wraps() {
        let mut duel = local_duel(1);
        let events = win_round(&mut duel, Side::One);

        let complete = events
            .iter()
            .find_map(|e| match e {
                DuelEvent::MatchComplete { winner, score, stats } => Some((*winner, *score, stats.clone())),
                _ => None,
            })
            .expect("match complete event");
        assert_eq!(complete.0, Some(Side::One));
        assert_eq!(complete.1, [1, 0]);
        assert_eq!(complete.2[0].kills, 1);

        let events = duel.continue_round();
        assert!(events.contains(&DuelEvent::MatchReset { total_rounds: 1 }));
        assert_eq!(duel.round.round(), 1);
        assert_eq!(duel.round.score(), [0, 0]);
        assert_eq!(duel.combatant(Side::One).ammo, 5);
        assert_eq!(duel.combatant(Side::One).stats.shots_fired, 0);
    }

    #[test]
    fn test_nothing_steps_between_rounds() {
        let mut duel = local_duel(5);
        duel.round.resolve(Side::One);
        duel.projectiles.push(stray_projectile(Side::One));
        duel.combatants[0].ammo = 0;
        duel.combatants[0].begin_reload();

        let events = duel.tick(DT);
        assert!(events.is_empty());
        assert_eq!(duel.projectiles[0].age, 0.0);
        assert!(duel.combatants[0].reloading);
        assert!(duel.request_fire(Side::Two).is_empty());
    }

    #[test]
    fn test_kill_cam_freezes_after_continue() {
        let mut duel = local_duel(5);
        win_round(&mut duel, Side::One);
        duel.continue_round();

        assert!(duel.round.is_active());
        assert!(duel.request_fire(Side::Two).is_empty());

        assert!(duel.tick(1.0).is_empty());
        let events = duel.tick(1.0);
        assert_eq!(events.first(), Some(&DuelEvent::KillCamEnded));
        assert!(!duel.request_fire(Side::Two).is_empty());
    }

    #[test]
    fn test_empty_magazine_reloads_instead_of_firing() {
        let mut duel = local_duel(5);
        duel.combatants[0].ammo = 0;

        let events = duel.request_fire(Side::One);
        assert_eq!(
            events,
            vec![DuelEvent::ReloadStarted {
                side: Side::One,
                duration_secs: 2.5,
            }]
        );
        assert!(duel.projectiles.is_empty());

        let mut finished = false;
        for _ in 0..3 {
            finished |= duel
                .tick(1.0)
                .contains(&DuelEvent::ReloadFinished { side: Side::One, ammo: 5 });
        }
        assert!(finished);
    }

    #[test]
    fn test_stray_projectile_expires() {
        let mut duel = local_duel(5);
        duel.projectiles.push(stray_projectile(Side::One));

        let mut expired = 0;
        for _ in 0..17 {
            expired += duel
                .tick(0.25)
                .iter()
                .filter(|e| matches!(e, DuelEvent::ProjectileExpired { .. }))
                .count();
            if duel.tick_count() == 16 {
                assert_eq!(duel.projectiles.len(), 1);
            }
        }
        assert_eq!(expired, 1);
        assert!(duel.projectiles.is_empty());
    }

    #[test]
    fn test_hit_on_downed_target_is_noop() {
        let mut duel = local_duel(5);
        duel.combatants[1].health = 0.0;
        let armor = duel.combatants[1].armor;

        let events = win_round(&mut duel, Side::One);
        assert!(!events.iter().any(|e| matches!(e, DuelEvent::Impact { .. })));
        assert!(duel.round.is_active());
        assert_eq!(duel.round.score(), [0, 0]);
        assert_eq!(duel.combatants[1].armor, armor);
        assert!(duel.projectiles.is_empty());
    }

    #[test]
    fn test_agent_shots_use_shared_gating() {
        let mut duel = Duel::new(DuelSettings {
            seed: 8,
            ..DuelSettings::default()
        });

        let mut agent_shot = None;
        for _ in 0..20_000 {
            let events = duel.tick(DT);
            if let Some(event) = events
                .into_iter()
                .find(|e| matches!(e, DuelEvent::ShotFired { shooter: Side::Two, .. }))
            {
                agent_shot = Some(event);
                break;
            }
        }

        assert!(agent_shot.is_some());
        assert_eq!(duel.combatant(Side::Two).ammo, 4);
        assert_eq!(duel.combatant(Side::Two).stats.shots_fired, 1);
    }

    #[test]
    fn test_agent_shot_damages_side_one() {
        let mut duel = Duel::new(DuelSettings {
            seed: 21,
            ..DuelSettings::default()
        });

        let mut impact_events = None;
        for _ in 0..60_000 {
            let events = duel.tick(DT);
            if events
                .iter()
                .any(|e| matches!(e, DuelEvent::Impact { shooter: Side::Two, .. }))
            {
                impact_events = Some(events);
                break;
            }
        }
        let events = impact_events.expect("agent landed a hit");

        let (target, damage) = events
            .iter()
            .find_map(|e| match e {
                DuelEvent::Impact { target, damage, .. } => Some((*target, *damage)),
                _ => None,
            })
            .expect("impact");
        assert_eq!(target, Side::One);
        assert!(damage > 0.0);

        let one = duel.combatant(Side::One);
        assert!(one.health < MAX_HEALTH);
        assert!(events.contains(&DuelEvent::VitalsChanged {
            side: Side::One,
            health: one.health,
            armor: one.armor,
        }));

        let stats = &duel.combatant(Side::Two).stats;
        assert_eq!(stats.shots_hit, 1);
        assert_eq!(stats.damage_dealt, damage);
        assert_eq!(duel.combatant(Side::Two).health, MAX_HEALTH);

        if !one.is_alive() {
            assert_eq!(duel.round.phase(), RoundPhase::RoundResolved { winner: Side::Two });
        }
    }

    #[test]
    fn test_agent_repositions_within_rooftop() {
        let mut duel = Duel::new(DuelSettings {
            seed: 17,
            ..DuelSettings::default()
        });

        for _ in 0..600 {
            duel.tick(DT);
            if !duel.round.is_active() {
                break;
            }
            let p = duel.combatant(Side::Two).position;
            assert!((p.x - 80.0).abs() <= 4.0 + 1e-4);
            assert!(p.z.abs() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_movement_intent_applied_per_tick() {
        let mut duel = local_duel(5);
        duel.set_movement(Side::One, 1.0, 0.0);
        duel.tick(0.5);
        assert!((duel.combatant(Side::One).position.x - (-80.0 + 1.6)).abs() < 1e-4);

        duel.set_paused(true);
        duel.tick(0.5);
        assert!((duel.combatant(Side::One).position.x - (-80.0 + 1.6)).abs() < 1e-4);
    }

    #[test]
    fn test_body_hit_through_armor() {
        let mut duel = local_duel(5);
        // Aim square at the body volume
        let origin = duel.combatant(Side::One).aim_point();
        let body = duel.combatant(Side::Two).body_volume().center;
        let mut events = Vec::new();
        duel.fire_along(Side::One, body - origin, &mut events);
        for _ in 0..5 {
            events.extend(duel.tick(DT));
        }

        let impact = events
            .iter()
            .find_map(|e| match e {
                DuelEvent::Impact { location, damage, .. } => Some((*location, *damage)),
                _ => None,
            })
            .expect("impact");
        assert_eq!(impact, (HitLocation::Body, 60.0));
        assert!((duel.combatant(Side::Two).health - 65.2).abs() < 1e-3);
        assert!((duel.combatant(Side::Two).armor - 8.0).abs() < 1e-3);
        assert!(duel.round.is_active());
    }
}
