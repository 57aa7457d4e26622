//! Outgoing notifications, drained by the host once per tick.

use crate::combat::InstanceId;
use crate::targeting::TargetId;

use super::BossState;

/// Why a damage zone went down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEnd {
    Expired,
    Hit,
    Replaced,
    Cancelled,
}

/// Result of one damage application by a boss attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    pub instance: InstanceId,
    pub slot: usize,
    pub target: TargetId,
    pub damage: i32,
    pub target_alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BossEvent {
    StateChanged { from: BossState, to: BossState },
    TargetChanged { from: Option<TargetId>, to: Option<TargetId> },
    FacingChanged { facing: f32 },
    AttackStarted { instance: InstanceId, slot: usize, name: String },
    WarningPulse { instance: InstanceId },
    ZoneActivated { instance: InstanceId, slot: usize },
    ZoneDeactivated { instance: InstanceId, slot: usize, reason: ZoneEnd },
    AttackCompleted { instance: InstanceId, slot: usize },
    Hit(HitReport),
    Damaged { amount: i32, remaining: i32 },
    /// Hurt animation played; `locked` is false when an attack kept running
    HurtSignalled { locked: bool },
    BattleStarted,
    Defeated,
    Removed,
}
