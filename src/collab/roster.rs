//! In-memory target store for headless hosts, the arena demo and tests.

use bevy::math::Vec2;

use super::{Health, ShapeOwner, TargetView, TargetWorld};
use crate::combat::{ContactShape, SimpleHealth};
use crate::targeting::{TargetId, TargetKind};

#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub id: TargetId,
    pub name: String,
    pub kind: TargetKind,
    pub position: Vec2,
    pub health: SimpleHealth,
    pub body_radius: f32,
    /// Name of the shape this actor reports as its body, if it answers queries
    pub body_shape: Option<String>,
}

impl RosterEntry {
    pub fn new(id: u64, name: &str, kind: TargetKind, position: Vec2, max_health: i32) -> Self {
        Self {
            id: TargetId(id),
            name: name.into(),
            kind,
            position,
            health: SimpleHealth::new(max_health),
            body_radius: 0.5,
            body_shape: None,
        }
    }

    pub fn with_body_shape(mut self, shape: &str) -> Self {
        self.body_shape = Some(shape.into());
        self
    }

    fn view(&self) -> TargetView {
        TargetView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            alive: self.health.is_alive(),
            body_radius: self.body_radius,
        }
    }
}

impl ShapeOwner for RosterEntry {
    fn owner_name(&self) -> &str {
        &self.name
    }

    fn is_body_collider(&self, shape: &ContactShape) -> Option<bool> {
        self.body_shape.as_ref().map(|body| *body == shape.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetRoster {
    entries: Vec<RosterEntry>,
}

impl TargetRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RosterEntry) -> TargetId {
        let id = entry.id;
        self.entries.retain(|e| e.id != id);
        self.entries.push(entry);
        id
    }

    pub fn remove(&mut self, id: TargetId) -> Option<RosterEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, id: TargetId) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut RosterEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn set_position(&mut self, id: TargetId, position: Vec2) {
        if let Some(entry) = self.get_mut(id) {
            entry.position = position;
        }
    }

    pub fn health_of(&self, id: TargetId) -> Option<i32> {
        self.get(id).map(|e| e.health.current)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TargetWorld for TargetRoster {
    fn targets(&self) -> Vec<TargetView> {
        self.entries.iter().map(RosterEntry::view).collect()
    }

    fn target(&self, id: TargetId) -> Option<TargetView> {
        self.get(id).map(RosterEntry::view)
    }

    fn health_mut(&mut self, id: TargetId) -> Option<&mut dyn Health> {
        self.get_mut(id).map(|e| &mut e.health as &mut dyn Health)
    }

    fn shape_owner(&self, id: TargetId) -> Option<&dyn ShapeOwner> {
        self.get(id).map(|e| e as &dyn ShapeOwner)
    }

    fn body_shape(&self, id: TargetId) -> ContactShape {
        let name = self
            .get(id)
            .and_then(|e| e.body_shape.as_deref())
            .unwrap_or("Body");
        ContactShape::body(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_same_id() {
        let mut roster = TargetRoster::new();
        roster.insert(RosterEntry::new(1, "Hero", TargetKind::Player, Vec2::ZERO, 100));
        roster.insert(RosterEntry::new(1, "Hero", TargetKind::Player, Vec2::X, 50));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.health_of(TargetId(1)), Some(50));
    }

    #[test]
    fn test_world_views() {
        let mut roster = TargetRoster::new();
        roster.insert(RosterEntry::new(1, "Hero", TargetKind::Player, Vec2::new(3.0, 0.0), 100));
        let view = roster.target(TargetId(1)).unwrap();
        assert_eq!(view.position, Vec2::new(3.0, 0.0));
        assert!(view.alive);

        let health = roster.health_mut(TargetId(1)).unwrap();
        health.take_damage(100);
        assert!(!roster.target(TargetId(1)).unwrap().alive);
        assert!(roster.health_mut(TargetId(2)).is_none());
    }

    #[test]
    fn test_shape_owner_query() {
        let entry = RosterEntry::new(1, "Hero", TargetKind::Player, Vec2::ZERO, 10).with_body_shape("HeroBody");
        assert_eq!(entry.is_body_collider(&ContactShape::body("HeroBody")), Some(true));
        assert_eq!(entry.is_body_collider(&ContactShape::body("Sword")), Some(false));

        let silent = RosterEntry::new(2, "Villager", TargetKind::Npc, Vec2::ZERO, 10);
        assert_eq!(silent.is_body_collider(&ContactShape::body("Any")), None);
    }
}
