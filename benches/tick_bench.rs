use bevy::math::Vec2;
use boss_core::collab::{RosterEntry, TargetRoster};
use boss_core::combat::{AttackDefinition, SimpleHealth};
use boss_core::targeting::{Candidate, TargetId, TargetKind, TargetLocator, TargetPolicy};
use boss_core::timer::Scheduler;
use boss_core::{BossConfig, CombatActor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn crowded_roster(count: u64) -> TargetRoster {
    let mut roster = TargetRoster::new();
    for i in 0..count {
        let kind = if i % 4 == 0 { TargetKind::Player } else { TargetKind::Npc };
        let x = (i as f32 * 1.7) % 24.0 - 12.0;
        roster.insert(RosterEntry::new(i, "Target", kind, Vec2::new(x, 0.0), 1_000_000));
    }
    roster
}

fn bench_boss_tick(c: &mut Criterion) {
    let config = BossConfig {
        attacks: vec![
            AttackDefinition::melee("Cleave", 5),
            AttackDefinition::projectile("Ember", 3, 6.0, 1.5),
        ],
        ..Default::default()
    };

    c.bench_function("boss_tick_1_target", |b| {
        let mut boss = CombatActor::new(config.clone(), Box::new(SimpleHealth::new(i32::MAX)));
        let mut world = crowded_roster(1);
        b.iter(|| {
            boss.tick(black_box(1.0 / 60.0), &mut world);
            boss.resolve_overlaps(&mut world);
            boss.drain_events();
        })
    });

    c.bench_function("boss_tick_32_targets", |b| {
        let mut boss = CombatActor::new(config.clone(), Box::new(SimpleHealth::new(i32::MAX)));
        let mut world = crowded_roster(32);
        b.iter(|| {
            boss.tick(black_box(1.0 / 60.0), &mut world);
            boss.resolve_overlaps(&mut world);
            boss.drain_events();
        })
    });
}

fn bench_target_selection(c: &mut Criterion) {
    let candidates: Vec<Candidate> = (0..64)
        .map(|i| Candidate {
            id: TargetId(i),
            kind: if i % 3 == 0 { TargetKind::Player } else { TargetKind::Npc },
            distance: (i as f32 * 0.37) % 15.0,
            alive: i % 5 != 0,
            detected: i % 2 == 0,
            chase_eligible: true,
        })
        .collect();

    let nearest = TargetLocator::new(TargetPolicy::default(), 10.0);
    c.bench_function("select_nearest_64", |b| {
        b.iter(|| nearest.select(black_box(Some(TargetId(7))), black_box(&candidates)))
    });

    let priority = TargetLocator::new(TargetPolicy::player_first(), 10.0);
    c.bench_function("select_priority_64", |b| {
        b.iter(|| priority.select(black_box(None), black_box(&candidates)))
    });
}

fn bench_scheduler(c: &mut Criterion) {
    c.bench_function("scheduler_100_tasks", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new();
            for i in 0..100u32 {
                scheduler.schedule((i % 17) as f32 * 0.05, i);
            }
            let mut fired = 0;
            while !scheduler.is_empty() {
                fired += scheduler.advance(black_box(0.05)).len();
            }
            fired
        })
    });
}

criterion_group!(benches, bench_boss_tick, bench_target_selection, bench_scheduler);
criterion_main!(benches);
