//! Attack start, phase timeline and damage-zone contacts.

use rand::Rng;
use tracing::{debug, trace, warn};

use super::{BossEvent, BossState, BossTask, CombatActor, HitReport, ZoneEnd};
use crate::collab::TargetWorld;
use crate::combat::{apply_damage, AttackInstance, AttackKind, AttackPhase, ContactShape, DamageZone, InstanceId};
use crate::config::{AttackSelection, PostAttack};
use crate::targeting::TargetId;

/// A damage zone touching some target's shape
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneContact {
    pub target: TargetId,
    pub shape: ContactShape,
}

impl CombatActor {
    /// Start one attack if the state and cooldowns allow it
    pub(super) fn begin_attack(&mut self) -> bool {
        if matches!(self.state, BossState::Attacking | BossState::Dead) {
            debug!(boss = %self.config.name, state = ?self.state, "Attack request ignored");
            return false;
        }
        let Some(slot) = self.pick_slot() else {
            return false;
        };

        if let Some(goal) = self.target_position {
            self.face_toward(goal);
        }
        let id = InstanceId(self.next_instance);
        let Some(instance) =
            AttackInstance::start(id, slot, &self.config.attacks[slot], self.position, self.facing)
        else {
            warn!(boss = %self.config.name, slot, "Attack has no damage zone, skipped");
            return false;
        };
        if !self.transition(BossState::Attacking) {
            return false;
        }

        self.next_instance += 1;
        self.hold_position();
        self.replace_slot_instance(slot);
        self.schedule_instance(&instance);

        let definition = &self.config.attacks[slot];
        let name = definition.name.clone();
        let trigger = definition.animation_trigger.clone();
        self.cooldowns.start_slot(slot, definition.cooldown);
        self.current_attack = Some((id, slot));
        self.instances.push(instance);

        if let Some(trigger) = trigger {
            self.fire_trigger(&trigger);
        }
        debug!(boss = %self.config.name, attack = %name, slot, "Attack started");
        self.events.push(BossEvent::AttackStarted {
            instance: id,
            slot,
            name,
        });
        true
    }

    fn pick_slot(&mut self) -> Option<usize> {
        let eligible: Vec<usize> = self
            .cooldowns
            .eligible_slots()
            .filter(|slot| {
                !self.disabled_slots.contains(slot)
                    && self.config.attacks.get(*slot).is_some_and(|a| a.zone.is_some())
            })
            .collect();

        match (self.config.attack_selection, eligible.len()) {
            (_, 0) => None,
            (AttackSelection::FirstAvailable, _) | (_, 1) => eligible.first().copied(),
            (AttackSelection::UniformRandom, n) => Some(eligible[self.rng.gen_range(0..n)]),
        }
    }

    fn schedule_instance(&mut self, instance: &AttackInstance) {
        let id = instance.id;
        let timeline = instance.timeline;

        if let AttackKind::Spawned(spec) = &instance.definition.kind {
            if spec.warning_pulse && spec.pulse_interval > 0.0 {
                let mut at = 0.0;
                while at < timeline.activate_at {
                    self.scheduler.schedule(at, BossTask::Pulse(id));
                    at += spec.pulse_interval;
                }
            }
        }
        self.scheduler.schedule(timeline.activate_at, BossTask::Activate(id));
        self.scheduler.schedule(timeline.expire_at, BossTask::Expire(id));
        self.scheduler.schedule(timeline.complete_at, BossTask::Complete(id));
    }

    /// Keep at most one live zone per slot
    fn replace_slot_instance(&mut self, slot: usize) {
        let stale: Vec<InstanceId> = self
            .instances
            .iter()
            .filter(|i| i.slot == slot)
            .map(|i| i.id)
            .collect();
        for id in stale {
            self.end_instance(id, ZoneEnd::Replaced);
        }
    }

    /// Run the due phase tasks. A zone that activates during this step stays
    /// live until the next one, so hosts get at least one contact pass even
    /// when a single `dt` spans the whole active window.
    pub(super) fn advance_attacks(&mut self, dt: f32) {
        let mut activated: Vec<InstanceId> = Vec::new();
        for task in self.scheduler.advance(dt) {
            match task {
                BossTask::Activate(id) => {
                    self.run_task(task);
                    activated.push(id);
                }
                BossTask::Expire(id) | BossTask::Complete(id) if activated.contains(&id) => {
                    trace!(boss = %self.config.name, ?task, "Deferred past contact pass");
                    self.scheduler.schedule(0.0, task);
                }
                _ => self.run_task(task),
            }
        }
        let origin = self.position;
        for instance in &mut self.instances {
            instance.follow(origin);
            instance.advance_motion(dt);
        }
    }

    pub(super) fn run_task(&mut self, task: BossTask) {
        match task {
            BossTask::Activate(id) => self.activate_instance(id),
            BossTask::Pulse(id) => {
                if self
                    .instances
                    .iter()
                    .any(|i| i.id == id && i.phase == AttackPhase::Delay)
                {
                    self.events.push(BossEvent::WarningPulse { instance: id });
                }
            }
            BossTask::Expire(id) => self.end_instance(id, ZoneEnd::Expired),
            BossTask::Complete(id) => self.complete_attack(id),
            BossTask::Remove => self.finish_removal(),
        }
    }

    fn activate_instance(&mut self, id: InstanceId) {
        let origin = self.position;
        let Some(instance) = self.instances.iter_mut().find(|i| i.id == id) else {
            return;
        };
        instance.zone.center = DamageZone::anchor(origin, instance.definition.zone_offset, instance.facing);
        instance.activate();
        let slot = instance.slot;
        trace!(boss = %self.config.name, slot, "Damage zone active");
        self.events.push(BossEvent::ZoneActivated { instance: id, slot });
    }

    /// Disable and drop one instance along with its pending phase tasks.
    /// The attack's completion task is left alone so the animation timing
    /// of the owner is unaffected.
    pub(super) fn end_instance(&mut self, id: InstanceId, reason: ZoneEnd) {
        let Some(idx) = self.instances.iter().position(|i| i.id == id) else {
            return;
        };
        let mut instance = self.instances.remove(idx);
        instance.settle();
        self.scheduler
            .cancel_where(|t| t.instance() == Some(id) && !matches!(t, BossTask::Complete(_)));
        self.events.push(BossEvent::ZoneDeactivated {
            instance: id,
            slot: instance.slot,
            reason,
        });
    }

    fn complete_attack(&mut self, id: InstanceId) {
        let Some((current, slot)) = self.current_attack else {
            return;
        };
        if current != id || self.state != BossState::Attacking {
            return;
        }
        self.current_attack = None;

        let melee_leftover = self
            .instances
            .iter()
            .any(|i| i.id == id && !i.is_spawned());
        if melee_leftover {
            self.end_instance(id, ZoneEnd::Expired);
        }

        self.events.push(BossEvent::AttackCompleted { instance: id, slot });
        self.cooldowns.start_global(self.config.global_cooldown);
        let next = match self.config.post_attack {
            PostAttack::Cooldown => BossState::Cooldown,
            PostAttack::Combat => BossState::Combat,
        };
        self.transition(next);
    }

    /// Cancel every instance and queued continuation
    pub(super) fn cancel_all_attacks(&mut self, reason: ZoneEnd) {
        for mut instance in std::mem::take(&mut self.instances) {
            instance.settle();
            self.events.push(BossEvent::ZoneDeactivated {
                instance: instance.id,
                slot: instance.slot,
                reason,
            });
        }
        self.scheduler.cancel_all();
        self.current_attack = None;
    }

    // ---------------------------------------------------------------
    // Contacts
    // ---------------------------------------------------------------

    /// A live damage zone touched a target shape. Applies damage at most once
    /// per activation and returns the hit when one was dealt.
    pub fn on_zone_contact(
        &mut self,
        instance: InstanceId,
        contact: &ZoneContact,
        world: &mut dyn TargetWorld,
    ) -> Option<HitReport> {
        if !self.active || self.state == BossState::Dead {
            return None;
        }
        let idx = self.instances.iter().position(|i| i.id == instance)?;
        if !self.instances[idx].can_hit() {
            return None;
        }

        let view = world.target(contact.target)?;
        if !view.alive || !self.instances[idx].definition.can_hit(view.kind) {
            return None;
        }
        if !self
            .validator
            .is_valid_body_hit(&contact.shape, world.shape_owner(contact.target))
        {
            trace!(boss = %self.config.name, shape = %contact.shape.name, "Contact is not a body");
            return None;
        }

        let damage = self.instances[idx].definition.damage;
        let Some(health) = world.health_mut(contact.target) else {
            warn!(boss = %self.config.name, target = ?contact.target, "Target has no health, hit skipped");
            return None;
        };
        if !self.instances[idx].register_hit() {
            return None;
        }
        let target_alive = apply_damage(health, damage);

        let slot = self.instances[idx].slot;
        let report = HitReport {
            instance,
            slot,
            target: contact.target,
            damage,
            target_alive,
        };
        debug!(boss = %self.config.name, target = ?contact.target, damage, target_alive, "Hit");
        self.events.push(BossEvent::Hit(report));

        if self.instances[idx].destroys_on_hit() {
            self.end_instance(instance, ZoneEnd::Hit);
        }
        Some(report)
    }

    /// Resolve zone overlaps against target body circles, for hosts without
    /// a physics engine. Nearest bodies are tried first.
    pub fn resolve_overlaps(&mut self, world: &mut dyn TargetWorld) -> Vec<HitReport> {
        if !self.active || self.state == BossState::Dead {
            return Vec::new();
        }
        let live: Vec<(InstanceId, DamageZone)> = self
            .instances
            .iter()
            .filter(|i| i.can_hit())
            .map(|i| (i.id, i.zone))
            .collect();

        let targets = world.targets();
        let mut reports = Vec::new();
        for (id, zone) in live {
            let mut touching: Vec<_> = targets
                .iter()
                .filter(|t| t.alive && zone.overlaps_circle(t.position, t.body_radius))
                .collect();
            touching.sort_by(|a, b| {
                zone.center
                    .distance(a.position)
                    .total_cmp(&zone.center.distance(b.position))
            });

            for view in touching {
                let contact = ZoneContact {
                    target: view.id,
                    shape: world.body_shape(view.id),
                };
                if let Some(report) = self.on_zone_contact(id, &contact, world) {
                    reports.push(report);
                    break;
                }
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{RosterEntry, TargetRoster};
    use crate::combat::{AttackDefinition, SimpleHealth};
    use crate::config::BossConfig;
    use crate::targeting::TargetKind;
    use bevy::math::Vec2;

    fn attacking_boss(attacks: Vec<AttackDefinition>) -> (CombatActor, TargetRoster) {
        let config = BossConfig {
            attacks,
            ..Default::default()
        };
        let mut boss = CombatActor::new(config, Box::new(SimpleHealth::new(100)));
        let mut world = TargetRoster::new();
        world.insert(RosterEntry::new(1, "Hero", TargetKind::Player, Vec2::new(2.0, 0.0), 100));
        boss.tick(0.01, &mut world);
        (boss, world)
    }

    #[test]
    fn test_begin_attack_schedules_phases() {
        let (boss, _) = attacking_boss(vec![AttackDefinition::melee("Slam", 10)]);
        assert_eq!(boss.state, BossState::Attacking);
        assert_eq!(boss.pending_tasks(), 3);
        assert!(!boss.cooldowns.is_eligible(0));
        assert!(matches!(boss.current_attack, Some((_, 0))));
    }

    #[test]
    fn test_second_begin_ignored_while_attacking() {
        let (mut boss, _) = attacking_boss(vec![AttackDefinition::melee("Slam", 10)]);
        assert!(!boss.begin_attack());
        assert_eq!(boss.instances.len(), 1);
    }

    #[test]
    fn test_end_instance_keeps_completion() {
        let (mut boss, _) = attacking_boss(vec![AttackDefinition::melee("Slam", 10)]);
        let id = boss.instances[0].id;
        boss.end_instance(id, ZoneEnd::Hit);
        assert!(boss.instances.is_empty());
        assert_eq!(boss.pending_tasks(), 1);
        assert!(boss.scheduler.pending().all(|t| matches!(t, BossTask::Complete(_))));
    }

    #[test]
    fn test_step_over_active_window_keeps_zone_live() {
        let (mut boss, _) = attacking_boss(vec![AttackDefinition::melee("Slam", 10)]);
        boss.advance_attacks(5.0);
        assert_eq!(boss.instances.len(), 1);
        assert!(boss.instances[0].can_hit());
        assert_eq!(boss.pending_tasks(), 2);

        boss.advance_attacks(0.0);
        assert!(boss.instances.is_empty());
        assert_eq!(boss.pending_tasks(), 0);
    }

    #[test]
    fn test_pick_slot_skips_disabled() {
        let (mut boss, _) = attacking_boss(vec![
            AttackDefinition::melee("Slam", 10),
            AttackDefinition::melee("Jab", 5),
        ]);
        boss.cooldowns.clear();
        assert_eq!(boss.pick_slot(), Some(0));
        boss.disable_slot(0);
        assert_eq!(boss.pick_slot(), Some(1));
        boss.disable_slot(1);
        assert_eq!(boss.pick_slot(), None);
    }

    #[test]
    fn test_spawned_instance_outlives_attack() {
        let (mut boss, mut world) = attacking_boss(vec![AttackDefinition::projectile("Orb", 10, 0.5, 3.0)]);
        world.remove(crate::targeting::TargetId(1));
        for _ in 0..8 {
            boss.tick(0.1, &mut world);
        }
        assert_ne!(boss.state, BossState::Attacking);
        assert_eq!(boss.instances.len(), 1, "projectile still in flight");
        assert!(boss.instances[0].can_hit());
    }
}
