//! Centralized combat constants for the boss core.
//!
//! Defaults used by `BossConfig::default()` and by the timeline and
//! targeting code. Per-attack numbers (damage, durations, zone shapes)
//! live in the attack definitions themselves.

// =====================================================
// Movement & Facing
// =====================================================

/// Default boss movement speed (units per second)
pub const DEFAULT_MOVE_SPEED: f32 = 3.0;

/// Horizontal direction component below which facing is left unchanged
pub const FACING_DEAD_ZONE: f32 = 0.1;

// =====================================================
// Targeting
// =====================================================

/// Default detection radius of the boss's detection zone
pub const DEFAULT_DETECTION_RANGE: f32 = 10.0;

/// Default distance at which the boss may start an attack
pub const DEFAULT_ATTACK_RANGE: f32 = 3.0;

/// A chased target is dropped once it is farther than this multiple of the
/// detection radius (nearest-wins policy)
pub const DISENGAGE_MULTIPLIER: f32 = 2.0;

// =====================================================
// Timers (seconds of simulation time)
// =====================================================

/// Global pause between two attacks, shared by all slots
pub const DEFAULT_GLOBAL_COOLDOWN: f32 = 1.0;

/// Time the boss stays hurt-locked after taking a hit
pub const DEFAULT_HURT_RECOVERY: f32 = 0.5;

/// Delay between entering Dead and being removed from the simulation
pub const DEFAULT_DEATH_DELAY: f32 = 2.0;

/// Default interval of warning pulses emitted while a spawned strike is in Delay
pub const WARNING_PULSE_INTERVAL: f32 = 0.25;

/// Comparison slack for timer deadlines
pub const TIME_EPSILON: f32 = 1e-5;

// =====================================================
// Animation parameter names
// =====================================================

pub const ANIM_HURT_TRIGGER: &str = "Hurt";
pub const ANIM_DEATH_TRIGGER: &str = "Die";
pub const ANIM_MOVING_BOOL: &str = "IsMoving";

// =====================================================
// Hit validation name conventions
// =====================================================

/// Shape or owner names containing any of these are never treated as bodies
pub const NON_BODY_NAME_MARKERS: [&str; 3] = ["detection", "trigger", "ui"];

/// Default deterministic seed for attack selection
pub const DEFAULT_RNG_SEED: u64 = 42;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disengage_exceeds_detection() {
        assert!(DEFAULT_DETECTION_RANGE * DISENGAGE_MULTIPLIER > DEFAULT_DETECTION_RANGE);
    }

    #[test]
    fn test_attack_range_inside_detection() {
        assert!(DEFAULT_ATTACK_RANGE < DEFAULT_DETECTION_RANGE);
    }
}
