//! Cooldown bookkeeping and the deadline scheduler.
//!
//! Every duration in the boss core is measured in seconds of simulation
//! time and advanced by the `dt` passed to the tick, so behavior does not
//! depend on frame rate.

use serde::{Deserialize, Serialize};

use crate::constants::TIME_EPSILON;

pub mod scheduler;

pub use scheduler::{Scheduler, TaskHandle};

/// Remaining time before an attack slot may be used again. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownTimer {
    remaining: f32,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Restart the timer. Negative or NaN durations count as zero.
    pub fn start(&mut self, duration: f32) {
        self.remaining = if duration > 0.0 { duration } else { 0.0 };
    }

    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 || self.remaining <= 0.0 {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= TIME_EPSILON {
            self.remaining = 0.0;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// Per-slot cooldowns plus the actor-wide pause between attacks.
#[derive(Debug, Clone, Default)]
pub struct CooldownBank {
    slots: Vec<CooldownTimer>,
    global: CooldownTimer,
}

impl CooldownBank {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![CooldownTimer::new(); slot_count],
            global: CooldownTimer::new(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, slot: usize) -> Option<&CooldownTimer> {
        self.slots.get(slot)
    }

    pub fn global(&self) -> &CooldownTimer {
        &self.global
    }

    pub fn tick(&mut self, dt: f32) {
        for timer in &mut self.slots {
            timer.tick(dt);
        }
        self.global.tick(dt);
    }

    /// A slot is eligible only when its own timer and the global timer are both spent.
    pub fn is_eligible(&self, slot: usize) -> bool {
        self.global.is_ready() && self.slots.get(slot).is_some_and(CooldownTimer::is_ready)
    }

    pub fn eligible_slots(&self) -> impl Iterator<Item = usize> + '_ {
        let global_ready = self.global.is_ready();
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, t)| global_ready && t.is_ready())
            .map(|(i, _)| i)
    }

    pub fn start_slot(&mut self, slot: usize, duration: f32) {
        if let Some(timer) = self.slots.get_mut(slot) {
            timer.start(duration);
        }
    }

    pub fn start_global(&mut self, duration: f32) {
        self.global.start(duration);
    }

    pub fn clear(&mut self) {
        for timer in &mut self.slots {
            timer.clear();
        }
        self.global.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_never_negative() {
        let mut t = CooldownTimer::new();
        t.start(0.3);
        t.tick(1.0);
        assert_eq!(t.remaining(), 0.0);
        assert!(t.is_ready());
    }

    #[test]
    fn test_cooldown_negative_duration() {
        let mut t = CooldownTimer::new();
        t.start(-2.0);
        assert!(t.is_ready());
        t.start(f32::NAN);
        assert!(t.is_ready());
    }

    #[test]
    fn test_cooldown_exact_ticks() {
        let mut t = CooldownTimer::new();
        t.start(1.0);
        for _ in 0..9 {
            t.tick(0.1);
            assert!(!t.is_ready());
        }
        t.tick(0.1);
        assert!(t.is_ready(), "float residue should not delay readiness");
    }

    #[test]
    fn test_bank_requires_global() {
        let mut bank = CooldownBank::new(2);
        assert!(bank.is_eligible(0));
        bank.start_global(0.5);
        assert!(!bank.is_eligible(0));
        assert!(!bank.is_eligible(1));
        bank.tick(0.5);
        assert!(bank.is_eligible(0));
    }

    #[test]
    fn test_bank_eligible_slots() {
        let mut bank = CooldownBank::new(3);
        bank.start_slot(1, 2.0);
        let eligible: Vec<_> = bank.eligible_slots().collect();
        assert_eq!(eligible, vec![0, 2]);
        assert!(!bank.is_eligible(7), "unknown slot is never eligible");
    }

    #[test]
    fn test_bank_clear() {
        let mut bank = CooldownBank::new(2);
        bank.start_slot(0, 5.0);
        bank.start_global(5.0);
        bank.clear();
        assert_eq!(bank.eligible_slots().count(), 2);
    }
}
