//! Rejection reasons for tank actions.

use thiserror::Error;

/// Why a tank action was refused. A refused action leaves the tank untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ActionRejected {
    /// The tank has been destroyed.
    #[error("tank is destroyed")]
    Destroyed,
    /// The fuel tank is empty.
    #[error("out of fuel")]
    OutOfFuel,
    /// Not enough fuel for the requested step.
    #[error("insufficient fuel: need {required:.2}, have {available:.2}")]
    InsufficientFuel { required: f64, available: f64 },
    /// The destination lies outside the drivable area.
    #[error("destination ({x:.1}, {z:.1}) is out of bounds")]
    OutOfBounds { x: f64, z: f64 },
    /// The destination overlaps a standing obstacle.
    #[error("path blocked by obstacle {obstacle_id}")]
    Blocked { obstacle_id: u32 },
    /// The gun has already been fired this turn.
    #[error("already fired this turn")]
    AlreadyFired,
    /// The action is reserved for the human-controlled tank.
    #[error("action is only available to the player tank")]
    NotPlayerControlled,
}
