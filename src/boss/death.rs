//! Death sequence: disable, cancel, notify once, then remove after a delay.

use bevy::math::Vec2;
use tracing::{error, info};

use super::{BossEvent, BossState, BossTask, CombatActor, ZoneEnd};
use crate::config::DespawnMode;

impl CombatActor {
    pub(super) fn enter_dead(&mut self) {
        if self.state == BossState::Dead {
            return;
        }
        self.transition(BossState::Dead);
        info!(boss = %self.config.name, "Boss defeated");

        self.detection_enabled = false;
        self.body_enabled = false;
        self.detected.clear();
        self.target = None;
        self.target_position = None;
        self.target_distance = f32::INFINITY;
        self.hold_position();

        self.cancel_all_attacks(ZoneEnd::Cancelled);
        self.hurt_timer.clear();

        let trigger = self.config.animation.death.clone();
        self.fire_trigger(&trigger);
        self.notify_defeat();

        self.scheduler.schedule(self.config.death_delay, BossTask::Remove);
    }

    /// Listeners are told exactly once; a failing listener is logged and
    /// the rest still run.
    fn notify_defeat(&mut self) {
        if self.defeat_notified {
            return;
        }
        self.defeat_notified = true;
        for listener in &mut self.listeners {
            if let Err(e) = listener.on_boss_defeated(&self.config.name) {
                error!(boss = %self.config.name, "Defeat listener failed: {}", e);
            }
        }
        self.events.push(BossEvent::Defeated);
    }

    pub(super) fn advance_death(&mut self, dt: f32) {
        for task in self.scheduler.advance(dt) {
            if matches!(task, BossTask::Remove) {
                self.run_task(task);
            }
        }
    }

    pub(super) fn finish_removal(&mut self) {
        if !self.active {
            return;
        }
        match self.config.despawn {
            DespawnMode::Deactivate { park_at } => {
                self.position = Vec2::from(park_at);
            }
            DespawnMode::Despawn => {}
        }
        self.velocity = Vec2::ZERO;
        self.active = false;
        info!(boss = %self.config.name, mode = ?self.config.despawn, "Boss removed from simulation");
        self.events.push(BossEvent::Removed);
    }
}
