//! Hit validation: decide whether a contacted shape is a damageable body.
//!
//! Heuristics are applied in priority order:
//! 1. the owner's explicit body/detection query
//! 2. shape kind and solidity
//! 3. name convention ("detection", "trigger", "ui")
//! 4. fallback: accept with a warning (lenient) or reject (strict)
//!
//! The same validator classifies contacts in both directions: the boss's
//! zones hitting players and NPCs, and a player's zone hitting the boss.

use serde::{Deserialize, Serialize};

use crate::collab::ShapeOwner;
use crate::constants::NON_BODY_NAME_MARKERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Capsule,
    Rectangle,
    Circle,
    Polygon,
}

/// The collision shape reported by a contact event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactShape {
    pub name: String,
    pub kind: ShapeKind,
    pub is_trigger: bool,
}

impl ContactShape {
    pub fn body(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Capsule,
            is_trigger: false,
        }
    }

    pub fn detection(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: ShapeKind::Circle,
            is_trigger: true,
        }
    }
}

/// What to do when no heuristic applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorStrictness {
    #[default]
    Lenient,
    Strict,
}

/// Which heuristic produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    OwnerQuery,
    ShapeKind,
    NameConvention,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub valid: bool,
    pub rule: ClassificationRule,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HitValidator {
    pub strictness: ValidatorStrictness,
}

impl HitValidator {
    pub fn new(strictness: ValidatorStrictness) -> Self {
        Self { strictness }
    }

    pub fn is_valid_body_hit(&self, shape: &ContactShape, owner: Option<&dyn ShapeOwner>) -> bool {
        self.classify(shape, owner).valid
    }

    pub fn classify(&self, shape: &ContactShape, owner: Option<&dyn ShapeOwner>) -> Classification {
        if let Some(owner) = owner {
            if let Some(is_body) = owner.is_body_collider(shape) {
                return verdict(is_body, ClassificationRule::OwnerQuery);
            }
            if owner.is_detection_collider(shape) == Some(true) {
                return verdict(false, ClassificationRule::OwnerQuery);
            }
        }

        match (shape.kind, shape.is_trigger) {
            (ShapeKind::Capsule | ShapeKind::Rectangle, false) => {
                return verdict(true, ClassificationRule::ShapeKind);
            }
            (ShapeKind::Circle, true) => return verdict(false, ClassificationRule::ShapeKind),
            _ => {}
        }

        let owner_name = owner.map(|o| o.owner_name()).unwrap_or_default();
        if has_non_body_marker(&shape.name) || has_non_body_marker(owner_name) {
            return verdict(false, ClassificationRule::NameConvention);
        }

        match self.strictness {
            ValidatorStrictness::Lenient => {
                tracing::warn!(
                    shape = %shape.name,
                    owner = owner_name,
                    "Unclassified contact shape, accepting as body"
                );
                verdict(true, ClassificationRule::Fallback)
            }
            ValidatorStrictness::Strict => {
                tracing::debug!(shape = %shape.name, "Unclassified contact shape rejected");
                verdict(false, ClassificationRule::Fallback)
            }
        }
    }
}

fn verdict(valid: bool, rule: ClassificationRule) -> Classification {
    Classification { valid, rule }
}

fn has_non_body_marker(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    NON_BODY_NAME_MARKERS.iter().any(|m| lower.contains(m))
}
