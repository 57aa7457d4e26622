//! State handlers and transitions.

use bevy::math::Vec2;
use tracing::debug;

use super::{BossEvent, BossState, CombatActor, ZoneEnd};
use crate::config::ChaseMode;

impl CombatActor {
    /// Move to `to` if the transition table allows it
    pub(super) fn transition(&mut self, to: BossState) -> bool {
        let from = self.state;
        if !from.can_transition_to(to) {
            debug!(boss = %self.config.name, ?from, ?to, "Transition ignored");
            return false;
        }
        self.state = to;
        debug!(boss = %self.config.name, ?from, ?to, "State changed");
        self.events.push(BossEvent::StateChanged { from, to });
        true
    }

    pub(super) fn dispatch(&mut self) {
        match self.state {
            BossState::Idle => self.handle_idle(),
            BossState::Combat => self.handle_combat(),
            BossState::Attacking => self.hold_position(),
            BossState::Cooldown => self.handle_cooldown(),
            BossState::Hurt => self.handle_hurt(),
            BossState::Dead => {}
        }
    }

    fn engage_allowed(&self) -> bool {
        self.target.is_some() && (!self.config.require_battle_start || self.battle_started)
    }

    fn in_attack_range(&self) -> bool {
        self.target_position.is_some() && self.target_distance <= self.config.attack_range
    }

    fn handle_idle(&mut self) {
        self.hold_position();
        if self.engage_allowed() && self.transition(BossState::Combat) {
            self.handle_combat();
        }
    }

    fn handle_combat(&mut self) {
        if !self.engage_allowed() {
            self.hold_position();
            self.transition(BossState::Idle);
            return;
        }
        if self.in_attack_range() && self.begin_attack() {
            return;
        }
        self.chase();
    }

    fn handle_cooldown(&mut self) {
        if self.cooldowns.global().is_ready() {
            self.resume();
            return;
        }
        match self.config.chase_mode {
            ChaseMode::Continuous if self.engage_allowed() => self.chase(),
            _ => self.hold_position(),
        }
    }

    fn handle_hurt(&mut self) {
        self.hold_position();
        if self.hurt_timer.is_ready() {
            self.resume();
        }
    }

    /// Re-derive the next state after Cooldown or Hurt: attack straight away
    /// when possible, otherwise Combat if engaged, otherwise Idle.
    fn resume(&mut self) {
        if !self.engage_allowed() {
            self.hold_position();
            self.transition(BossState::Idle);
            return;
        }
        if self.in_attack_range() && self.begin_attack() {
            return;
        }
        if self.transition(BossState::Combat) {
            self.chase();
        }
    }

    /// Straight-line pursuit; stops inside attack range and keeps facing
    fn chase(&mut self) {
        let Some(goal) = self.target_position else {
            self.hold_position();
            return;
        };
        if self.in_attack_range() {
            self.hold_position();
            self.face_toward(goal);
            return;
        }

        let mut delta = goal - self.position;
        if self.config.horizontal_only {
            delta.y = 0.0;
        }
        let dir = delta.normalize_or_zero();
        self.velocity = dir * self.config.move_speed;
        self.face_direction(dir.x);
        self.set_moving(self.velocity != Vec2::ZERO);
    }

    pub(super) fn hold_position(&mut self) {
        self.velocity = Vec2::ZERO;
        self.set_moving(false);
    }

    // ---------------------------------------------------------------
    // External control
    // ---------------------------------------------------------------

    /// Release the battle gate
    pub fn start_battle(&mut self) {
        if self.battle_started || self.state == BossState::Dead {
            return;
        }
        self.battle_started = true;
        self.events.push(BossEvent::BattleStarted);
    }

    /// Exclude a slot from attack selection
    pub fn disable_slot(&mut self, slot: usize) {
        self.disabled_slots.insert(slot);
    }

    pub fn enable_slot(&mut self, slot: usize) {
        self.disabled_slots.remove(&slot);
    }

    pub fn is_slot_disabled(&self, slot: usize) -> bool {
        self.disabled_slots.contains(&slot)
    }

    /// Cancel every attack and timer and return to Idle. Ignored once dead.
    pub fn reset(&mut self) {
        if self.state == BossState::Dead {
            debug!(boss = %self.config.name, "Reset ignored, boss is dead");
            return;
        }
        self.cancel_all_attacks(ZoneEnd::Cancelled);
        self.hurt_timer.clear();
        self.cooldowns.clear();
        self.target = None;
        self.target_position = None;
        self.target_distance = f32::INFINITY;
        self.hold_position();
        self.transition(BossState::Idle);
        self.previous_state = BossState::Idle;
    }
}
