//! Incoming damage and hurt-lock.

use tracing::{debug, info};

use super::{BossEvent, BossState, CombatActor};
use crate::combat::apply_damage;
use crate::config::HurtPolicy;

impl CombatActor {
    /// Damage entry point for attacks landing on the boss.
    ///
    /// Returns whether the boss is alive afterwards. A running attack is never
    /// interrupted: the hurt animation still plays but the state stays
    /// Attacking. Hits landing during hurt-lock follow `hurt_policy`.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.state == BossState::Dead || !self.active {
            return false;
        }
        if amount <= 0 {
            return self.health.is_alive();
        }
        if self.state == BossState::Hurt && self.config.hurt_policy == HurtPolicy::IgnoreHits {
            debug!(boss = %self.config.name, amount, "Hit ignored during hurt-lock");
            return true;
        }

        let alive = apply_damage(self.health.as_mut(), amount);
        let remaining = self.health.current_health();
        self.events.push(BossEvent::Damaged { amount, remaining });
        debug!(boss = %self.config.name, amount, remaining, "Boss damaged");

        if !alive {
            info!(boss = %self.config.name, "Health depleted");
            self.enter_dead();
            return false;
        }

        match self.state {
            BossState::Attacking => {
                let trigger = self.config.animation.hurt.clone();
                self.fire_trigger(&trigger);
                self.events.push(BossEvent::HurtSignalled { locked: false });
            }
            BossState::Hurt => {}
            BossState::Idle | BossState::Combat | BossState::Cooldown => self.enter_hurt(),
            BossState::Dead => {}
        }
        true
    }

    fn enter_hurt(&mut self) {
        let resume = match self.state {
            BossState::Idle => BossState::Idle,
            _ => BossState::Combat,
        };
        if !self.transition(BossState::Hurt) {
            return;
        }
        self.previous_state = resume;
        self.hold_position();
        self.hurt_timer.start(self.config.hurt_recovery);

        let trigger = self.config.animation.hurt.clone();
        self.fire_trigger(&trigger);
        self.events.push(BossEvent::HurtSignalled { locked: true });
    }
}
