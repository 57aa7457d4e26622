//! Attack configuration and execution.
//!
//! An `AttackDefinition` is immutable configuration. Every time the boss
//! uses it an `AttackInstance` is created that owns one damage zone and
//! walks it through Delay -> Active -> Settle. Melee strikes and spawned
//! entities (projectiles, delayed hand strikes) share that lifecycle.

use serde::{Deserialize, Serialize};

use crate::constants::WARNING_PULSE_INTERVAL;
use crate::targeting::TargetKind;

pub mod attack;
pub mod damage;
pub mod hitbox;
pub mod validator;

pub use attack::{AttackInstance, AttackTimeline, InstanceId};
pub use damage::{apply_damage, SimpleHealth};
pub use hitbox::{DamageZone, ZoneShape};
pub use validator::{ClassificationRule, ContactShape, HitValidator, ShapeKind, ValidatorStrictness};

/// Phase of one attack instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    Delay,  // zone disabled, warning may pulse
    Active, // zone enabled, one hit allowed
    Settle, // zone disabled, awaiting removal
}

/// Extra parameters of an attack that detaches from the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    /// Travel speed along the facing direction (0 for stationary strikes)
    pub speed: f32,
    /// Seconds the zone stays live once spawned
    pub lifetime: f32,
    pub destroy_on_hit: bool,
    /// Emit warning pulses while in Delay
    pub warning_pulse: bool,
    /// Seconds between two warning pulses
    #[serde(default = "default_pulse_interval")]
    pub pulse_interval: f32,
}

fn default_pulse_interval() -> f32 {
    WARNING_PULSE_INTERVAL
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Spawned(SpawnSpec),
}

/// Static description of one attack slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub name: String,
    pub animation_trigger: Option<String>,
    pub damage: i32,
    pub total_duration: f32, // full animation, seconds
    pub delay: f32,          // before the zone activates
    pub active_duration: f32,
    pub zone: Option<ZoneShape>,
    pub zone_offset: [f32; 2], // forward, up (forward is mirrored by facing)
    pub cooldown: f32,
    pub kind: AttackKind,
    /// Target kinds this attack may damage
    pub hits: Vec<TargetKind>,
}

impl AttackDefinition {
    pub fn melee(name: &str, damage: i32) -> Self {
        Self {
            name: name.into(),
            animation_trigger: Some(name.into()),
            damage,
            total_duration: 0.8,
            delay: 0.3,
            active_duration: 0.15,
            zone: Some(ZoneShape::Circle { radius: 1.2 }),
            zone_offset: [1.0, 0.0],
            cooldown: 1.5,
            kind: AttackKind::Melee,
            hits: vec![TargetKind::Player, TargetKind::Npc],
        }
    }

    pub fn projectile(name: &str, damage: i32, speed: f32, lifetime: f32) -> Self {
        Self {
            name: name.into(),
            animation_trigger: Some(name.into()),
            damage,
            total_duration: 0.6,
            delay: 0.2,
            active_duration: 0.0,
            zone: Some(ZoneShape::Circle { radius: 0.4 }),
            zone_offset: [0.8, 0.0],
            cooldown: 3.0,
            kind: AttackKind::Spawned(SpawnSpec {
                speed,
                lifetime,
                destroy_on_hit: true,
                warning_pulse: false,
                pulse_interval: WARNING_PULSE_INTERVAL,
            }),
            hits: vec![TargetKind::Player, TargetKind::Npc],
        }
    }

    pub fn is_spawned(&self) -> bool {
        matches!(self.kind, AttackKind::Spawned(_))
    }

    pub fn can_hit(&self, kind: TargetKind) -> bool {
        self.hits.contains(&kind)
    }

    pub fn with_timing(mut self, total: f32, delay: f32, active: f32) -> Self {
        self.total_duration = total;
        self.delay = delay;
        self.active_duration = active;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_zone(mut self, zone: Option<ZoneShape>, offset: [f32; 2]) -> Self {
        self.zone = zone;
        self.zone_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_preset() {
        let def = AttackDefinition::melee("Slam", 25);
        assert_eq!(def.damage, 25);
        assert!(!def.is_spawned());
        assert!(def.delay + def.active_duration <= def.total_duration);
        assert!(def.can_hit(TargetKind::Npc));
    }

    #[test]
    fn test_projectile_preset() {
        let def = AttackDefinition::projectile("Orb", 15, 6.0, 2.0);
        assert!(def.is_spawned());
        match def.kind {
            AttackKind::Spawned(spec) => {
                assert!(spec.destroy_on_hit);
                assert_eq!(spec.lifetime, 2.0);
            }
            AttackKind::Melee => panic!("expected spawned"),
        }
    }

    #[test]
    fn test_builders() {
        let def = AttackDefinition::melee("Jab", 5)
            .with_timing(1.0, 0.5, 0.2)
            .with_cooldown(0.0)
            .with_zone(None, [0.0, 0.0]);
        assert_eq!(def.total_duration, 1.0);
        assert_eq!(def.cooldown, 0.0);
        assert!(def.zone.is_none());
    }
}
