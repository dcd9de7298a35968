//! Game state snapshot: the complete visible state handed to the front end each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, SceneEvent, UiEvent};
use crate::types::{SimTime, Vec3};

/// Complete game state broadcast after each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Whose turn it is. `None` outside a round.
    pub turn: Option<TurnSlot>,
    pub outcome: Option<Outcome>,
    pub tanks: Vec<TankView>,
    pub projectiles: Vec<ProjectileView>,
    pub obstacles: Vec<ObstacleView>,
    /// Bumped every time the heightfield is deformed.
    pub terrain_revision: u64,
    pub camera_shake: Option<CameraShakeView>,
    pub audio_events: Vec<AudioEvent>,
    pub ui_events: Vec<UiEvent>,
    pub scene_events: Vec<SceneEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankView {
    pub slot: TurnSlot,
    pub position: Vec3,
    pub body_yaw: f64,
    pub turret_yaw: f64,
    pub elevation: f64,
    pub health: i32,
    pub max_health: i32,
    pub fuel: f64,
    pub max_fuel: f64,
    pub power: f64,
    pub has_fired: bool,
    pub destroyed: bool,
    /// Wreck opacity while sinking, 1.0 otherwise.
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub fired_by_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub scale: f64,
    pub radius: f64,
    pub health: i32,
    pub destroyed: bool,
    pub stage: Option<DestructionStage>,
    /// Progress through `stage`, 0..=1.
    pub stage_progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraShakeView {
    /// Current intensity, decaying linearly to zero.
    pub intensity: f64,
    pub remaining_secs: f64,
}
