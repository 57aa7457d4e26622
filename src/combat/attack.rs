//! Runtime attack instances and their phase timeline.

use bevy::math::Vec2;

use super::{AttackDefinition, AttackKind, AttackPhase, DamageZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Phase boundaries of one instance, in seconds from its start.
///
/// `activate_at <= expire_at`, and for melee attacks `expire_at <=
/// complete_at`, so the zone never outlives the animation. The stretch
/// between `expire_at` and `complete_at` is idle wait that keeps the boss
/// in sync with the animation end. Spawned zones are detached and may
/// expire after the owner's animation completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTimeline {
    pub activate_at: f32,
    pub expire_at: f32,
    pub complete_at: f32,
}

impl AttackTimeline {
    pub fn for_definition(def: &AttackDefinition) -> Self {
        let total = def.total_duration.max(0.0);
        let activate_at = def.delay.clamp(0.0, total);
        let expire_at = match &def.kind {
            AttackKind::Melee => (activate_at + def.active_duration.max(0.0)).min(total),
            AttackKind::Spawned(spec) => activate_at + spec.lifetime.max(0.0),
        };
        Self {
            activate_at,
            expire_at,
            complete_at: total,
        }
    }

    pub fn active_window(&self) -> f32 {
        self.expire_at - self.activate_at
    }
}

#[derive(Debug, Clone)]
pub struct AttackInstance {
    pub id: InstanceId,
    pub slot: usize,
    pub definition: AttackDefinition,
    pub phase: AttackPhase,
    pub zone: DamageZone,
    pub has_hit: bool,
    pub facing: f32,
    pub timeline: AttackTimeline,
}

impl AttackInstance {
    /// Create an instance in Delay. Returns `None` when the definition has
    /// no damage zone configured.
    pub fn start(
        id: InstanceId,
        slot: usize,
        definition: &AttackDefinition,
        origin: Vec2,
        facing: f32,
    ) -> Option<Self> {
        let shape = definition.zone?;
        let facing = if facing < 0.0 { -1.0 } else { 1.0 };
        Some(Self {
            id,
            slot,
            definition: definition.clone(),
            phase: AttackPhase::Delay,
            zone: DamageZone::placed(origin, definition.zone_offset, facing, shape),
            has_hit: false,
            facing,
            timeline: AttackTimeline::for_definition(definition),
        })
    }

    pub fn is_spawned(&self) -> bool {
        self.definition.is_spawned()
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, AttackPhase::Delay | AttackPhase::Active)
    }

    pub fn can_hit(&self) -> bool {
        self.phase == AttackPhase::Active && self.zone.active && !self.has_hit
    }

    pub fn activate(&mut self) {
        if self.phase == AttackPhase::Delay {
            self.phase = AttackPhase::Active;
            self.zone.active = true;
        }
    }

    /// Disable the zone. Used for expiry, replacement and cancellation alike.
    pub fn settle(&mut self) {
        self.phase = AttackPhase::Settle;
        self.zone.active = false;
    }

    /// Claim the single hit of this activation. Returns false if already used
    /// or the zone is not live.
    pub fn register_hit(&mut self) -> bool {
        if !self.can_hit() {
            return false;
        }
        self.has_hit = true;
        true
    }

    pub fn destroys_on_hit(&self) -> bool {
        matches!(&self.definition.kind, AttackKind::Spawned(spec) if spec.destroy_on_hit)
    }

    /// Keep a melee zone attached to its owner
    pub fn follow(&mut self, origin: Vec2) {
        if !self.is_spawned() {
            self.zone.center = DamageZone::anchor(origin, self.definition.zone_offset, self.facing);
        }
    }

    /// Move a spawned zone along its facing
    pub fn advance_motion(&mut self, dt: f32) {
        if self.phase != AttackPhase::Active {
            return;
        }
        if let AttackKind::Spawned(spec) = &self.definition.kind {
            self.zone.center.x += spec.speed * self.facing * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{SpawnSpec, ZoneShape};

    #[test]
    fn test_timeline_melee_within_animation() {
        let def = AttackDefinition::melee("Slam", 10).with_timing(1.0, 0.4, 0.3);
        let t = AttackTimeline::for_definition(&def);
        assert_eq!(t.activate_at, 0.4);
        assert!((t.expire_at - 0.7).abs() < 1e-6);
        assert_eq!(t.complete_at, 1.0);
    }

    #[test]
    fn test_timeline_clamped_to_total() {
        let def = AttackDefinition::melee("Slam", 10).with_timing(0.5, 0.4, 0.3);
        let t = AttackTimeline::for_definition(&def);
        assert_eq!(t.expire_at, 0.5);
        assert!(t.active_window() <= 0.5);

        let late = AttackDefinition::melee("Late", 10).with_timing(0.5, 0.9, 0.3);
        let t = AttackTimeline::for_definition(&late);
        assert_eq!(t.activate_at, 0.5);
        assert_eq!(t.active_window(), 0.0);
    }

    #[test]
    fn test_timeline_spawned_outlives_animation() {
        let def = AttackDefinition::projectile("Orb", 10, 5.0, 3.0);
        let t = AttackTimeline::for_definition(&def);
        assert!(t.expire_at > t.complete_at);
    }

    #[test]
    fn test_start_requires_zone() {
        let def = AttackDefinition::melee("Slam", 10).with_zone(None, [0.0, 0.0]);
        assert!(AttackInstance::start(InstanceId(1), 0, &def, Vec2::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_single_hit_guard() {
        let def = AttackDefinition::melee("Slam", 10);
        let mut inst = AttackInstance::start(InstanceId(1), 0, &def, Vec2::ZERO, 1.0).unwrap();
        assert!(!inst.register_hit(), "no hit during delay");
        inst.activate();
        assert!(inst.register_hit());
        assert!(!inst.register_hit());
        assert!(inst.has_hit);
    }

    #[test]
    fn test_settle_disables_zone() {
        let def = AttackDefinition::melee("Slam", 10);
        let mut inst = AttackInstance::start(InstanceId(1), 0, &def, Vec2::ZERO, -1.0).unwrap();
        inst.activate();
        inst.settle();
        assert!(!inst.zone.active);
        assert!(!inst.is_live());
        inst.activate();
        assert_eq!(inst.phase, AttackPhase::Settle, "settled instances stay settled");
    }

    #[test]
    fn test_projectile_moves_with_facing() {
        let def = AttackDefinition::projectile("Orb", 10, 4.0, 2.0);
        let mut inst = AttackInstance::start(InstanceId(2), 1, &def, Vec2::ZERO, -1.0).unwrap();
        let start_x = inst.zone.center.x;
        inst.advance_motion(0.5);
        assert_eq!(inst.zone.center.x, start_x, "no motion before activation");
        inst.activate();
        inst.advance_motion(0.5);
        assert!((inst.zone.center.x - (start_x - 2.0)).abs() < 1e-5);
        assert!(inst.destroys_on_hit());
    }

    #[test]
    fn test_melee_follows_owner() {
        let def = AttackDefinition::melee("Slam", 10)
            .with_zone(Some(ZoneShape::Circle { radius: 1.0 }), [1.5, 0.0]);
        let mut inst = AttackInstance::start(InstanceId(3), 0, &def, Vec2::ZERO, 1.0).unwrap();
        inst.follow(Vec2::new(2.0, 1.0));
        assert_eq!(inst.zone.center, Vec2::new(3.5, 1.0));
    }

    #[test]
    fn test_stationary_spawn_keeps_hitting_guarded() {
        let mut def = AttackDefinition::projectile("Hand", 20, 0.0, 1.0);
        def.kind = AttackKind::Spawned(SpawnSpec {
            speed: 0.0,
            lifetime: 1.0,
            destroy_on_hit: false,
            warning_pulse: true,
            pulse_interval: 0.2,
        });
        let mut inst = AttackInstance::start(InstanceId(4), 0, &def, Vec2::ZERO, 1.0).unwrap();
        inst.activate();
        assert!(!inst.destroys_on_hit());
        assert!(inst.register_hit());
        assert!(!inst.can_hit());
        assert!(inst.zone.active, "zone stays up until lifetime ends");
    }
}
