//! Bevy integration: runs every `BossController` once per frame against the
//! `CombatTarget` entities in the world.

use bevy::prelude::*;
use tracing::debug;

use crate::boss::{BossEvent, BossState, CombatActor, HitReport};
use crate::collab::{Health, TargetView, TargetWorld};
use crate::combat::SimpleHealth;
use crate::config::DespawnMode;
use crate::targeting::{TargetId, TargetKind};

pub struct BossCombatPlugin;

impl Plugin for BossCombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BossDamageEvent>()
            .add_event::<StartBattleEvent>()
            .add_event::<BossHitEvent>()
            .add_event::<BossStateEvent>()
            .add_event::<BossDefeatedEvent>()
            .add_systems(
                Update,
                (
                    apply_boss_commands,
                    tick_bosses,
                    sync_boss_transforms,
                    despawn_removed_bosses,
                )
                    .chain(),
            );
    }
}

/// Damage dealt to a boss by something outside it (usually the player)
#[derive(Event, Debug, Clone, Copy)]
pub struct BossDamageEvent {
    pub boss: Entity,
    pub amount: i32,
}

/// Release a boss's battle gate
#[derive(Event, Debug, Clone, Copy)]
pub struct StartBattleEvent {
    pub boss: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BossHitEvent {
    pub boss: Entity,
    pub target: Entity,
    pub report: HitReport,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BossStateEvent {
    pub boss: Entity,
    pub from: BossState,
    pub to: BossState,
}

/// Sent once per boss, when it dies
#[derive(Event, Debug, Clone)]
pub struct BossDefeatedEvent {
    pub boss: Entity,
    pub name: String,
}

#[derive(Component, Debug)]
pub struct BossController {
    actor: CombatActor,
}

impl BossController {
    pub fn new(actor: CombatActor) -> Self {
        Self { actor }
    }

    pub fn actor(&self) -> &CombatActor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut CombatActor {
        &mut self.actor
    }
}

/// Anything a boss may chase and hit
#[derive(Component, Debug, Clone)]
pub struct CombatTarget {
    pub kind: TargetKind,
    pub health: SimpleHealth,
    pub body_radius: f32,
}

impl CombatTarget {
    pub fn new(kind: TargetKind, max_health: i32) -> Self {
        Self {
            kind,
            health: SimpleHealth::new(max_health),
            body_radius: 0.5,
        }
    }
}

pub fn target_id(entity: Entity) -> TargetId {
    TargetId(entity.to_bits())
}

pub fn target_entity(id: TargetId) -> Option<Entity> {
    Entity::try_from_bits(id.0).ok()
}

type TargetQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static Transform, &'static mut CombatTarget), Without<BossController>>;

/// `TargetWorld` over the ECS target query
struct QueryWorld<'a, 'w, 's> {
    targets: &'a mut TargetQuery<'w, 's>,
}

fn view(entity: Entity, transform: &Transform, target: &CombatTarget) -> TargetView {
    TargetView {
        id: target_id(entity),
        kind: target.kind,
        position: transform.translation.truncate(),
        alive: target.health.is_alive(),
        body_radius: target.body_radius,
    }
}

impl TargetWorld for QueryWorld<'_, '_, '_> {
    fn targets(&self) -> Vec<TargetView> {
        self.targets
            .iter()
            .map(|(entity, transform, target)| view(entity, transform, target))
            .collect()
    }

    fn target(&self, id: TargetId) -> Option<TargetView> {
        let entity = target_entity(id)?;
        let (entity, transform, target) = self.targets.get(entity).ok()?;
        Some(view(entity, transform, target))
    }

    fn health_mut(&mut self, id: TargetId) -> Option<&mut dyn Health> {
        let entity = target_entity(id)?;
        let (_, _, target) = self.targets.get_mut(entity).ok()?;
        Some(&mut target.into_inner().health as &mut dyn Health)
    }
}

fn apply_boss_commands(
    mut damage: EventReader<BossDamageEvent>,
    mut start: EventReader<StartBattleEvent>,
    mut bosses: Query<&mut BossController>,
) {
    for event in start.read() {
        if let Ok(mut controller) = bosses.get_mut(event.boss) {
            controller.actor.start_battle();
        }
    }
    for event in damage.read() {
        match bosses.get_mut(event.boss) {
            Ok(mut controller) => {
                controller.actor.take_damage(event.amount);
            }
            Err(_) => debug!(boss = ?event.boss, "Damage for unknown boss dropped"),
        }
    }
}

fn tick_bosses(
    time: Res<Time>,
    mut bosses: Query<(Entity, &mut BossController)>,
    mut targets: TargetQuery,
    mut hits: EventWriter<BossHitEvent>,
    mut states: EventWriter<BossStateEvent>,
    mut defeated: EventWriter<BossDefeatedEvent>,
) {
    let dt = time.delta_secs();
    for (boss, mut controller) in &mut bosses {
        let actor = &mut controller.actor;
        let mut world = QueryWorld {
            targets: &mut targets,
        };
        actor.tick(dt, &mut world);
        actor.resolve_overlaps(&mut world);

        for event in actor.drain_events() {
            match event {
                BossEvent::Hit(report) => {
                    if let Some(target) = target_entity(report.target) {
                        hits.send(BossHitEvent {
                            boss,
                            target,
                            report,
                        });
                    }
                }
                BossEvent::StateChanged { from, to } => {
                    states.send(BossStateEvent { boss, from, to });
                }
                BossEvent::Defeated => {
                    defeated.send(BossDefeatedEvent {
                        boss,
                        name: actor.name().to_string(),
                    });
                }
                _ => {}
            }
        }
    }
}

fn sync_boss_transforms(mut bosses: Query<(&BossController, &mut Transform)>) {
    for (controller, mut transform) in &mut bosses {
        let position = controller.actor.position();
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

fn despawn_removed_bosses(mut commands: Commands, bosses: Query<(Entity, &BossController)>) {
    for (entity, controller) in &bosses {
        let actor = &controller.actor;
        if !actor.is_active() && actor.config().despawn == DespawnMode::Despawn {
            debug!(boss = %actor.name(), "Despawning boss entity");
            commands.entity(entity).despawn();
        }
    }
}
