//! Target selection for the boss.
//!
//! The locator is stateless: it receives the currently selected target
//! and a snapshot of every candidate, and answers which one the boss
//! should pursue. Two arbitration policies are supported:
//! - nearest-wins: smallest distance among detected, alive, chase-eligible
//!   candidates; the current target is kept while it stays inside the
//!   disengage distance even if it left the detection zone
//! - priority-wins: a fixed order of target kinds, nearest within a kind

use serde::{Deserialize, Serialize};

use crate::constants::DISENGAGE_MULTIPLIER;

/// Opaque handle of an external actor. Never owns the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Player,
    Npc,
}

/// Arbitration policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetPolicy {
    NearestWins { disengage_multiplier: f32 },
    PriorityWins { order: Vec<TargetKind> },
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self::NearestWins {
            disengage_multiplier: DISENGAGE_MULTIPLIER,
        }
    }
}

impl TargetPolicy {
    pub fn player_first() -> Self {
        Self::PriorityWins {
            order: vec![TargetKind::Player, TargetKind::Npc],
        }
    }
}

/// One candidate as seen from the boss this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: TargetId,
    pub kind: TargetKind,
    pub distance: f32,
    pub alive: bool,
    /// Inside the boss's detection zone right now
    pub detected: bool,
    pub chase_eligible: bool,
}

/// Why a previously selected target was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Dead,
    Disengaged,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub target: Option<TargetId>,
    pub changed: bool,
    pub cleared: Option<ClearReason>,
}

#[derive(Debug, Clone)]
pub struct TargetLocator {
    policy: TargetPolicy,
    detection_radius: f32,
}

impl TargetLocator {
    pub fn new(policy: TargetPolicy, detection_radius: f32) -> Self {
        Self {
            policy,
            detection_radius,
        }
    }

    pub fn policy(&self) -> &TargetPolicy {
        &self.policy
    }

    pub fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Distance beyond which the current target is dropped
    pub fn disengage_distance(&self) -> f32 {
        match &self.policy {
            TargetPolicy::NearestWins {
                disengage_multiplier,
            } => self.detection_radius * disengage_multiplier,
            TargetPolicy::PriorityWins { .. } => self.detection_radius * DISENGAGE_MULTIPLIER,
        }
    }

    pub fn select(&self, current: Option<TargetId>, candidates: &[Candidate]) -> Selection {
        let mut cleared = None;
        let retained = current.and_then(|id| {
            let Some(c) = candidates.iter().find(|c| c.id == id) else {
                cleared = Some(ClearReason::Missing);
                return None;
            };
            if !c.alive {
                cleared = Some(ClearReason::Dead);
                None
            } else if c.distance > self.disengage_distance() || !c.chase_eligible {
                cleared = Some(ClearReason::Disengaged);
                None
            } else {
                Some(id)
            }
        });

        let eligible = candidates.iter().filter(|c| {
            c.alive && c.chase_eligible && (c.detected || Some(c.id) == retained)
        });

        let target = match &self.policy {
            TargetPolicy::NearestWins { .. } => nearest(eligible),
            TargetPolicy::PriorityWins { order } => {
                let pool: Vec<&Candidate> = eligible.collect();
                order
                    .iter()
                    .find_map(|kind| nearest(pool.iter().copied().filter(|c| c.kind == *kind)))
                    // Kinds missing from the order rank after every listed kind
                    .or_else(|| nearest(pool.iter().copied().filter(|c| !order.contains(&c.kind))))
            }
        };

        Selection {
            target,
            changed: target != current,
            cleared,
        }
    }
}

fn nearest<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> Option<TargetId> {
    candidates
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|c| c.id)
}
