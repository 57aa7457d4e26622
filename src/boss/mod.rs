//! Boss combat state machine.
//!
//! `CombatActor` owns targeting, movement gating, attack execution, damage
//! response and the death sequence of one boss. Collaborators (health,
//! animation, defeat listeners, the target world) are injected; nothing is
//! looked up globally.
//!
//! Per-tick order is fixed:
//! 1. death check
//! 2. cooldown update
//! 3. attack phase timeline (scheduler) and spawned motion
//! 4. hurt recovery
//! 5. target re-selection
//! 6. state dispatch
//! 7. movement integration
//!
//! A death found in step 1 therefore prevents step 6 from starting an attack.

use std::collections::HashSet;

use bevy::math::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collab::{AnimationDriver, DefeatListener, Health, ShapeOwner, TargetView, TargetWorld};
use crate::combat::{AttackInstance, ContactShape, HitValidator, InstanceId};
use crate::config::{BossConfig, DetectionMode};
use crate::targeting::{Candidate, TargetId, TargetLocator};
use crate::timer::{CooldownBank, CooldownTimer, Scheduler};

mod attacks;
mod death;
pub mod events;
mod hurt;
mod state;

pub use attacks::ZoneContact;
pub use events::{BossEvent, HitReport, ZoneEnd};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossState {
    #[default]
    Idle,
    Combat,
    Attacking,
    Cooldown,
    Hurt,
    Dead,
}

impl BossState {
    /// The full transition table. Dead is terminal; every live state may
    /// fall back to Idle (lost target or reset) or die.
    pub fn can_transition_to(self, to: BossState) -> bool {
        use BossState::*;
        match (self, to) {
            (Dead, _) => false,
            (from, to) if from == to => false,
            (_, Dead) | (_, Idle) => true,
            (Idle, Combat | Hurt) => true,
            (Combat, Attacking | Hurt) => true,
            (Attacking, Cooldown | Combat) => true,
            (Cooldown, Combat | Attacking | Hurt) => true,
            (Hurt, Combat | Attacking) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Entered,
    Stayed,
    Exited,
}

/// Contact of a tagged actor with the boss's detection zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionEvent {
    pub target: TargetId,
    pub phase: ContactPhase,
}

/// Delayed continuations driven by the actor's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BossTask {
    Activate(InstanceId),
    Pulse(InstanceId),
    Expire(InstanceId),
    Complete(InstanceId),
    Remove,
}

impl BossTask {
    fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Activate(id) | Self::Pulse(id) | Self::Expire(id) | Self::Complete(id) => Some(*id),
            Self::Remove => None,
        }
    }
}

pub struct CombatActor {
    config: BossConfig,
    position: Vec2,
    velocity: Vec2,
    facing: f32,
    state: BossState,
    previous_state: BossState,
    battle_started: bool,

    target: Option<TargetId>,
    target_position: Option<Vec2>,
    target_distance: f32,
    detected: HashSet<TargetId>,
    locator: TargetLocator,
    validator: HitValidator,

    health: Box<dyn Health>,
    animator: Option<Box<dyn AnimationDriver>>,
    listeners: Vec<Box<dyn DefeatListener>>,

    cooldowns: CooldownBank,
    disabled_slots: HashSet<usize>,
    hurt_timer: CooldownTimer,
    scheduler: Scheduler<BossTask>,
    instances: Vec<AttackInstance>,
    current_attack: Option<(InstanceId, usize)>,
    next_instance: u64,
    rng: Xoshiro256PlusPlus,

    detection_enabled: bool,
    body_enabled: bool,
    moving: bool,
    active: bool,
    defeat_notified: bool,
    events: Vec<BossEvent>,
}

impl std::fmt::Debug for CombatActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatActor")
            .field("name", &self.config.name)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("target", &self.target)
            .field("health", &self.health.current_health())
            .finish_non_exhaustive()
    }
}

impl CombatActor {
    pub fn new(config: BossConfig, health: Box<dyn Health>) -> Self {
        if config.attacks.is_empty() {
            warn!(boss = %config.name, "Boss configured without attacks, it will never attack");
        }
        for attack in config.attacks.iter().filter(|a| a.zone.is_none()) {
            warn!(boss = %config.name, attack = %attack.name, "Attack has no damage zone, slot disabled");
        }

        Self {
            locator: TargetLocator::new(config.target_policy.clone(), config.detection_range),
            validator: HitValidator::new(config.strictness),
            cooldowns: CooldownBank::new(config.attacks.len()),
            rng: Xoshiro256PlusPlus::seed_from_u64(config.rng_seed),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            facing: 1.0,
            state: BossState::Idle,
            previous_state: BossState::Idle,
            battle_started: false,
            target: None,
            target_position: None,
            target_distance: f32::INFINITY,
            detected: HashSet::new(),
            health,
            animator: None,
            listeners: Vec::new(),
            disabled_slots: HashSet::new(),
            hurt_timer: CooldownTimer::new(),
            scheduler: Scheduler::new(),
            instances: Vec::new(),
            current_attack: None,
            next_instance: 0,
            detection_enabled: true,
            body_enabled: true,
            moving: false,
            active: true,
            defeat_notified: false,
            events: Vec::new(),
            config,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_animator(mut self, animator: Box<dyn AnimationDriver>) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn DefeatListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn add_defeat_listener(&mut self, listener: Box<dyn DefeatListener>) {
        self.listeners.push(listener);
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn config(&self) -> &BossConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    /// The state Hurt will resume from (Idle or Combat)
    pub fn previous_state(&self) -> BossState {
        self.previous_state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Hosts with their own physics may write the resolved position back
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub fn target_distance(&self) -> Option<f32> {
        self.target_position.map(|_| self.target_distance)
    }

    pub fn current_health(&self) -> i32 {
        self.health.current_health()
    }

    pub fn is_alive(&self) -> bool {
        self.state != BossState::Dead && self.health.is_alive()
    }

    /// False once the death sequence has removed the boss
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn battle_started(&self) -> bool {
        self.battle_started
    }

    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    pub fn body_enabled(&self) -> bool {
        self.body_enabled
    }

    pub fn instances(&self) -> &[AttackInstance] {
        &self.instances
    }

    pub fn cooldowns(&self) -> &CooldownBank {
        &self.cooldowns
    }

    pub fn hurt_time_left(&self) -> f32 {
        self.hurt_timer.remaining()
    }

    /// Number of queued phase/death continuations
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn events(&self) -> &[BossEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BossEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------

    pub fn tick(&mut self, dt: f32, world: &mut dyn TargetWorld) {
        if !self.active {
            return;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if self.state != BossState::Dead && !self.health.is_alive() {
            self.enter_dead();
        }
        if self.state == BossState::Dead {
            self.advance_death(dt);
            return;
        }

        self.cooldowns.tick(dt);
        self.advance_attacks(dt);
        self.hurt_timer.tick(dt);
        self.refresh_target(&*world);
        self.dispatch();
        self.position += self.velocity * dt;
    }

    /// Feed a detection-zone contact. Only consulted in `DetectionMode::Contact`.
    pub fn on_detection(&mut self, event: DetectionEvent) {
        if !self.detection_enabled {
            return;
        }
        match event.phase {
            ContactPhase::Entered | ContactPhase::Stayed => {
                self.detected.insert(event.target);
            }
            ContactPhase::Exited => {
                self.detected.remove(&event.target);
            }
        }
    }

    // ---------------------------------------------------------------
    // Targeting & facing
    // ---------------------------------------------------------------

    fn refresh_target(&mut self, world: &dyn TargetWorld) {
        let candidates = self.collect_candidates(world);
        let selection = self.locator.select(self.target, &candidates);

        if let Some(reason) = selection.cleared {
            debug!(boss = %self.config.name, ?reason, "Target cleared");
        }
        if selection.changed {
            let from = self.target;
            self.target = selection.target;
            self.events.push(BossEvent::TargetChanged {
                from,
                to: self.target,
            });
        }

        match self.target.and_then(|id| world.target(id)) {
            Some(view) => {
                self.target_position = Some(view.position);
                self.target_distance = self.position.distance(view.position);
                if selection.changed {
                    self.face_toward(view.position);
                }
            }
            None => {
                self.target_position = None;
                self.target_distance = f32::INFINITY;
            }
        }
    }

    fn collect_candidates(&self, world: &dyn TargetWorld) -> Vec<Candidate> {
        let views: Vec<TargetView> = match self.config.detection {
            DetectionMode::Radius => world.targets(),
            DetectionMode::Contact => self
                .detected
                .iter()
                .copied()
                .chain(self.target.filter(|t| !self.detected.contains(t)))
                .filter_map(|id| world.target(id))
                .collect(),
        };

        views
            .into_iter()
            .map(|view| {
                let distance = self.position.distance(view.position);
                let detected = match self.config.detection {
                    DetectionMode::Radius => distance <= self.config.detection_range,
                    DetectionMode::Contact => self.detected.contains(&view.id),
                };
                Candidate {
                    id: view.id,
                    kind: view.kind,
                    distance,
                    alive: view.alive,
                    detected,
                    chase_eligible: self.config.chase_targets.contains(&view.kind),
                }
            })
            .collect()
    }

    fn face_toward(&mut self, point: Vec2) {
        let dir = (point - self.position).normalize_or_zero();
        self.face_direction(dir.x);
    }

    /// Facing flips only when the horizontal component clears the dead zone
    fn face_direction(&mut self, dx: f32) {
        if dx.abs() <= self.config.facing_dead_zone {
            return;
        }
        let facing = dx.signum();
        if facing != self.facing {
            self.facing = facing;
            self.events.push(BossEvent::FacingChanged { facing });
        }
    }

    // ---------------------------------------------------------------
    // Animation
    // ---------------------------------------------------------------

    fn fire_trigger(&mut self, name: &str) {
        match self.animator.as_mut() {
            Some(anim) if anim.has_trigger(name) => anim.fire_trigger(name),
            Some(_) => {
                warn!(boss = %self.config.name, trigger = name, "Animation trigger not defined, skipping")
            }
            None => debug!(boss = %self.config.name, trigger = name, "No animation driver"),
        }
    }

    fn set_moving(&mut self, moving: bool) {
        if self.moving == moving {
            return;
        }
        self.moving = moving;
        let param = self.config.animation.moving.clone();
        if let Some(anim) = self.animator.as_mut() {
            if anim.has_parameter(&param) {
                anim.set_bool(&param, moving);
            }
        }
    }
}

impl ShapeOwner for CombatActor {
    fn owner_name(&self) -> &str {
        &self.config.name
    }

    fn is_body_collider(&self, shape: &ContactShape) -> Option<bool> {
        Some(self.body_enabled && shape.name == self.config.body_shape)
    }

    fn is_detection_collider(&self, shape: &ContactShape) -> Option<bool> {
        Some(shape.name == self.config.detection_shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::TargetRoster;
    use crate::combat::SimpleHealth;

    fn actor() -> CombatActor {
        CombatActor::new(BossConfig::default(), Box::new(SimpleHealth::new(100)))
    }

    #[test]
    fn test_transition_table() {
        use BossState::*;
        assert!(Idle.can_transition_to(Combat));
        assert!(!Idle.can_transition_to(Attacking));
        assert!(Combat.can_transition_to(Attacking));
        assert!(!Attacking.can_transition_to(Hurt));
        assert!(Hurt.can_transition_to(Attacking));
        assert!(Cooldown.can_transition_to(Idle));
        for to in [Idle, Combat, Attacking, Cooldown, Hurt, Dead] {
            assert!(!Dead.can_transition_to(to));
        }
    }

    #[test]
    fn test_new_actor_defaults() {
        let boss = actor();
        assert_eq!(boss.state(), BossState::Idle);
        assert_eq!(boss.facing(), 1.0);
        assert!(boss.is_alive());
        assert!(boss.is_active());
        assert_eq!(boss.target_distance(), None);
    }

    #[test]
    fn test_facing_dead_zone() {
        let mut boss = actor();
        boss.face_direction(-0.05);
        assert_eq!(boss.facing(), 1.0);
        boss.face_direction(-0.5);
        assert_eq!(boss.facing(), -1.0);
        assert_eq!(boss.drain_events(), vec![BossEvent::FacingChanged { facing: -1.0 }]);
    }

    #[test]
    fn test_shape_owner_answers() {
        let boss = actor();
        assert_eq!(boss.is_body_collider(&ContactShape::body("BossBody")), Some(true));
        assert_eq!(boss.is_body_collider(&ContactShape::body("BossDetection")), Some(false));
        assert_eq!(
            boss.is_detection_collider(&ContactShape::detection("BossDetection")),
            Some(true)
        );
    }

    #[test]
    fn test_inactive_tick_noop() {
        let mut boss = actor();
        boss.active = false;
        let mut world = TargetRoster::new();
        boss.tick(1.0, &mut world);
        assert!(boss.events().is_empty());
    }

    #[test]
    fn test_contact_detection_set() {
        let config = BossConfig {
            detection: DetectionMode::Contact,
            ..Default::default()
        };
        let mut boss = CombatActor::new(config, Box::new(SimpleHealth::new(10)));
        let id = TargetId(3);
        boss.on_detection(DetectionEvent {
            target: id,
            phase: ContactPhase::Entered,
        });
        assert!(boss.detected.contains(&id));
        boss.on_detection(DetectionEvent {
            target: id,
            phase: ContactPhase::Exited,
        });
        assert!(boss.detected.is_empty());
    }
}
