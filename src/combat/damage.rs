//! Damage pipeline and a plain health pool.

use serde::{Deserialize, Serialize};

use crate::collab::Health;

/// Apply `amount` to `health` and report whether the target is still alive.
///
/// Non-positive amounts and already-dead targets are left untouched.
pub fn apply_damage(health: &mut dyn Health, amount: i32) -> bool {
    if !health.is_alive() {
        return false;
    }
    if amount > 0 {
        health.take_damage(amount);
    }
    health.is_alive()
}

/// Health component usable for players, NPCs and the boss itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleHealth {
    pub current: i32,
    pub max: i32,
}

impl SimpleHealth {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

impl Health for SimpleHealth {
    fn is_alive(&self) -> bool {
        self.current > 0
    }

    fn take_damage(&mut self, amount: i32) {
        self.current = self.current.saturating_sub(amount.max(0)).max(0);
    }

    fn current_health(&self) -> i32 {
        self.current
    }
}
