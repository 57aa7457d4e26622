//! Boss Combat Core
//!
//! Real-time combat controller for hostile boss actors in a 2D action game:
//! - Target selection (nearest-wins with disengage hysteresis, or priority order)
//! - Parametrized state machine (Idle, Combat, Attacking, Cooldown, Hurt, Dead)
//! - Attack instances with Delay/Active/Settle phase timing
//! - Hit validation and a single-hit-per-activation damage pipeline
//! - Death lifecycle with one-shot defeat notification
//! - Bevy plugin for ECS hosts, plus an in-memory roster for headless use

pub mod boss;
pub mod collab;
pub mod combat;
pub mod config;
pub mod constants;
pub mod logging;
pub mod plugin;
pub mod targeting;
pub mod timer;

pub use boss::{BossEvent, BossState, CombatActor, ContactPhase, DetectionEvent, HitReport, ZoneContact, ZoneEnd};
pub use config::{BossConfig, ConfigError};
