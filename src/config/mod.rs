//! Boss configuration: tuning numbers and behavior knobs.
//!
//! One parametrized state machine serves every boss variant; the knobs
//! below select target arbitration, chase behavior, what happens after an
//! attack, and how repeated hits during hurt-lock are treated.
//! Configs are plain serde data, loadable from RON or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{AttackDefinition, AttackKind, ValidatorStrictness};
use crate::constants::*;
use crate::targeting::{TargetKind, TargetPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("boss {0} has no attacks")]
    NoAttacks(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("attack {name}: delay + active ({used}s) exceeds animation ({total}s)")]
    TimelineOverrun { name: String, used: f32, total: f32 },
    #[error("attack {0} has no damage zone")]
    MissingZone(String),
}

/// Whether the boss keeps moving toward its target while cooling down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaseMode {
    /// Chase in Combat and Cooldown
    #[default]
    Continuous,
    /// Chase in Combat only, hold position during Cooldown
    Gated,
}

/// State entered when an attack's animation completes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostAttack {
    #[default]
    Cooldown,
    Combat,
}

/// Treatment of a hit that lands while already hurt-locked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HurtPolicy {
    /// Ignore the hit entirely
    #[default]
    IgnoreHits,
    /// Apply damage without replaying the hurt animation or restarting recovery
    DamageWithoutReplay,
}

/// What happens at the end of the death sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DespawnMode {
    /// Teleport to `park_at` and stop simulating
    Deactivate { park_at: [f32; 2] },
    /// Remove the actor from the host entirely
    Despawn,
}

impl Default for DespawnMode {
    fn default() -> Self {
        Self::Deactivate {
            park_at: [-1000.0, -1000.0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackSelection {
    /// Lowest-numbered eligible slot
    #[default]
    FirstAvailable,
    /// Uniform pick among eligible slots
    UniformRandom,
}

/// Source of the detected-target set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Anything within the detection range counts as detected
    #[default]
    Radius,
    /// Only targets reported through detection contact events count
    Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationNames {
    pub hurt: String,
    pub death: String,
    pub moving: String,
}

impl Default for AnimationNames {
    fn default() -> Self {
        Self {
            hurt: ANIM_HURT_TRIGGER.into(),
            death: ANIM_DEATH_TRIGGER.into(),
            moving: ANIM_MOVING_BOOL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub name: String,
    pub move_speed: f32,
    pub attack_range: f32,
    pub detection_range: f32,
    pub horizontal_only: bool,
    pub target_policy: TargetPolicy,
    pub chase_targets: Vec<TargetKind>,
    pub detection: DetectionMode,
    pub chase_mode: ChaseMode,
    pub post_attack: PostAttack,
    pub attack_selection: AttackSelection,
    pub global_cooldown: f32,
    pub hurt_recovery: f32,
    pub hurt_policy: HurtPolicy,
    pub death_delay: f32,
    pub despawn: DespawnMode,
    pub require_battle_start: bool,
    pub facing_dead_zone: f32,
    pub strictness: ValidatorStrictness,
    pub rng_seed: u64,
    pub body_shape: String,
    pub detection_shape: String,
    pub animation: AnimationNames,
    pub attacks: Vec<AttackDefinition>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            name: "Boss".into(),
            move_speed: DEFAULT_MOVE_SPEED,
            attack_range: DEFAULT_ATTACK_RANGE,
            detection_range: DEFAULT_DETECTION_RANGE,
            horizontal_only: true,
            target_policy: TargetPolicy::default(),
            chase_targets: vec![TargetKind::Player, TargetKind::Npc],
            detection: DetectionMode::default(),
            chase_mode: ChaseMode::default(),
            post_attack: PostAttack::default(),
            attack_selection: AttackSelection::default(),
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN,
            hurt_recovery: DEFAULT_HURT_RECOVERY,
            hurt_policy: HurtPolicy::default(),
            death_delay: DEFAULT_DEATH_DELAY,
            despawn: DespawnMode::default(),
            require_battle_start: false,
            facing_dead_zone: FACING_DEAD_ZONE,
            strictness: ValidatorStrictness::default(),
            rng_seed: DEFAULT_RNG_SEED,
            body_shape: "BossBody".into(),
            detection_shape: "BossDetection".into(),
            animation: AnimationNames::default(),
            attacks: vec![AttackDefinition::melee("Strike", 10)],
        }
    }
}

impl BossConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attacks.is_empty() {
            return Err(ConfigError::NoAttacks(self.name.clone()));
        }

        let positive = [
            ("attack_range", self.attack_range),
            ("detection_range", self.detection_range),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let non_negative = [
            ("move_speed", self.move_speed),
            ("global_cooldown", self.global_cooldown),
            ("hurt_recovery", self.hurt_recovery),
            ("death_delay", self.death_delay),
            ("facing_dead_zone", self.facing_dead_zone),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if let TargetPolicy::NearestWins {
            disengage_multiplier,
        } = self.target_policy
        {
            if !(disengage_multiplier >= 1.0) {
                return Err(ConfigError::InvalidValue {
                    field: "disengage_multiplier",
                    value: disengage_multiplier,
                });
            }
        }

        for attack in &self.attacks {
            validate_attack(attack)?;
        }
        Ok(())
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn validate_attack(attack: &AttackDefinition) -> Result<(), ConfigError> {
    if attack.zone.is_none() {
        return Err(ConfigError::MissingZone(attack.name.clone()));
    }
    let timings = [
        ("total_duration", attack.total_duration),
        ("delay", attack.delay),
        ("active_duration", attack.active_duration),
        ("cooldown", attack.cooldown),
    ];
    for (field, value) in timings {
        if !(value >= 0.0) {
            return Err(ConfigError::InvalidValue { field, value });
        }
    }
    let used = match &attack.kind {
        AttackKind::Melee => attack.delay + attack.active_duration,
        AttackKind::Spawned(spec) => {
            if !(spec.lifetime > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "lifetime",
                    value: spec.lifetime,
                });
            }
            if spec.warning_pulse && !(spec.pulse_interval > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: "pulse_interval",
                    value: spec.pulse_interval,
                });
            }
            attack.delay
        }
    };
    if used > attack.total_duration + TIME_EPSILON {
        return Err(ConfigError::TimelineOverrun {
            name: attack.name.clone(),
            used,
            total: attack.total_duration,
        });
    }
    Ok(())
}
