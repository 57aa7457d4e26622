//! Interfaces to systems outside the combat core.
//!
//! Everything here is injected into the boss at construction time: the
//! core never reaches for global managers. Hosts implement these traits
//! over their own health components, animation players and entity stores.

use bevy::math::Vec2;

use crate::combat::ContactShape;
use crate::targeting::{TargetId, TargetKind};

pub mod roster;

pub use roster::{RosterEntry, TargetRoster};

/// Health of any damageable actor
pub trait Health: Send + Sync {
    fn is_alive(&self) -> bool;
    fn take_damage(&mut self, amount: i32);
    fn current_health(&self) -> i32;
}

/// Animation parameter sink. The core checks `has_trigger` before firing.
pub trait AnimationDriver: Send + Sync {
    fn has_trigger(&self, name: &str) -> bool;
    fn fire_trigger(&mut self, name: &str);
    fn set_bool(&mut self, name: &str, value: bool);

    fn has_parameter(&self, name: &str) -> bool {
        self.has_trigger(name)
    }
}

/// Lets a hit validator ask the owner of a contacted shape what it is.
/// `None` means the owner does not know.
pub trait ShapeOwner {
    fn owner_name(&self) -> &str {
        ""
    }

    fn is_body_collider(&self, _shape: &ContactShape) -> Option<bool> {
        None
    }

    fn is_detection_collider(&self, _shape: &ContactShape) -> Option<bool> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("listener {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

/// Receives the one-shot defeat notification
pub trait DefeatListener: Send + Sync {
    fn on_boss_defeated(&mut self, boss: &str) -> Result<(), ListenerError>;
}

/// What the boss can see of a target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub id: TargetId,
    pub kind: TargetKind,
    pub position: Vec2,
    pub alive: bool,
    /// Radius used by hosts that resolve zone overlaps without physics
    pub body_radius: f32,
}

/// The boss's window onto the actors it can fight
pub trait TargetWorld {
    fn targets(&self) -> Vec<TargetView>;

    fn target(&self, id: TargetId) -> Option<TargetView> {
        self.targets().into_iter().find(|t| t.id == id)
    }

    fn health_mut(&mut self, id: TargetId) -> Option<&mut dyn Health>;

    fn shape_owner(&self, _id: TargetId) -> Option<&dyn ShapeOwner> {
        None
    }

    /// Shape reported when a zone overlaps this target's body circle
    fn body_shape(&self, _id: TargetId) -> ContactShape {
        ContactShape::body("Body")
    }
}
