//! Headless arena: one boss against a player and a villager, fixed timestep.
//!
//! Usage: `boss-arena [config.ron]`. Without an argument a two-attack
//! default boss is used.

use anyhow::{Context, Result};
use bevy::math::Vec2;
use tracing::{info, warn};

use boss_core::collab::{DefeatListener, ListenerError, RosterEntry, TargetRoster};
use boss_core::combat::{AttackDefinition, SimpleHealth};
use boss_core::logging::{init_tracing_default, TimingSpan};
use boss_core::targeting::{TargetId, TargetKind};
use boss_core::{BossConfig, BossEvent, CombatActor};

const DT: f32 = 1.0 / 60.0;
const MAX_SECONDS: f32 = 60.0;
const PLAYER_HIT_INTERVAL: f32 = 1.2;
const PLAYER_DAMAGE: i32 = 25;
const PLAYER: TargetId = TargetId(1);

struct Announcer;

impl DefeatListener for Announcer {
    fn on_boss_defeated(&mut self, boss: &str) -> Result<(), ListenerError> {
        info!("The arena falls silent: {} is defeated", boss);
        Ok(())
    }
}

fn load_config() -> Result<BossConfig> {
    match std::env::args().nth(1) {
        Some(path) => BossConfig::load_ron(&path).with_context(|| format!("loading boss config {path}")),
        None => Ok(BossConfig {
            name: "Warden".into(),
            attacks: vec![
                AttackDefinition::melee("Cleave", 15),
                AttackDefinition::projectile("Ember", 8, 6.0, 1.5),
            ],
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    init_tracing_default();
    let config = load_config()?;
    info!(boss = %config.name, attacks = config.attacks.len(), "Arena starting");

    let mut roster = TargetRoster::new();
    roster.insert(RosterEntry::new(PLAYER.0, "Hero", TargetKind::Player, Vec2::new(8.0, 0.0), 100));
    roster.insert(RosterEntry::new(2, "Villager", TargetKind::Npc, Vec2::new(-6.0, 0.0), 40));

    let mut boss = CombatActor::new(config, Box::new(SimpleHealth::new(100))).with_listener(Box::new(Announcer));
    boss.start_battle();

    let _span = TimingSpan::new("arena");
    let mut elapsed = 0.0;
    let mut next_player_hit = PLAYER_HIT_INTERVAL;
    while boss.is_active() && elapsed < MAX_SECONDS {
        boss.tick(DT, &mut roster);
        boss.resolve_overlaps(&mut roster);
        elapsed += DT;

        // The hero fights back whenever the boss is close
        let hero_alive = roster.health_of(PLAYER).is_some_and(|h| h > 0);
        let close = boss.target_distance().is_some_and(|d| d < 3.5);
        if hero_alive && close && elapsed >= next_player_hit {
            boss.take_damage(PLAYER_DAMAGE);
            next_player_hit = elapsed + PLAYER_HIT_INTERVAL;
        }

        for event in boss.drain_events() {
            log_event(elapsed, &event);
        }
    }

    if boss.is_active() {
        warn!(elapsed, state = ?boss.state(), "Arena timed out");
    }
    info!(
        elapsed,
        boss_health = boss.current_health(),
        hero_health = roster.health_of(PLAYER).unwrap_or(0),
        "Arena finished"
    );
    Ok(())
}

fn log_event(t: f32, event: &BossEvent) {
    match event {
        BossEvent::StateChanged { from, to } => info!(t, ?from, ?to, "state"),
        BossEvent::TargetChanged { to, .. } => info!(t, target = ?to, "target"),
        BossEvent::AttackStarted { name, .. } => info!(t, attack = %name, "attack"),
        BossEvent::Hit(report) => info!(t, target = ?report.target, damage = report.damage, "hit"),
        BossEvent::Damaged { remaining, .. } => info!(t, remaining, "boss damaged"),
        BossEvent::Removed => info!(t, "boss removed"),
        _ => {}
    }
}
