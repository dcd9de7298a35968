//! Held-control input for the human tank.
//!
//! Intents are sampled once per tick while it is the player's turn. Each
//! held intent maps to one tank action scaled by `DT`.

use hecs::World;
use tracing::trace;

use barrage_core::components::{PlayerControlled, Tank};
use barrage_core::constants::*;
use barrage_core::enums::Intent;
use barrage_core::events::UiEvent;
use barrage_core::types::heading_vector;
use barrage_terrain::Heightfield;

use crate::actions::{self, Blocker};
use crate::outbox::Outbox;

/// Controls currently held down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: Vec<Intent>,
}

impl InputState {
    pub fn set(&mut self, intent: Intent, active: bool) {
        if active {
            if !self.held.contains(&intent) {
                self.held.push(intent);
            }
        } else {
            self.held.retain(|&held| held != intent);
        }
    }

    pub fn is_held(&self, intent: Intent) -> bool {
        self.held.contains(&intent)
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Apply held intents to the player's tank for one tick.
pub fn run(
    world: &mut World,
    terrain: &Heightfield,
    blockers: &[Blocker],
    input: &InputState,
    outbox: &mut Outbox,
    dt: f64,
) {
    if input.is_idle() {
        return;
    }
    let Some((_, (_, tank))) = world
        .query_mut::<(&PlayerControlled, &mut Tank)>()
        .into_iter()
        .next()
    else {
        return;
    };

    let fuel_before = tank.fuel;
    let power_before = tank.power;

    // Opposing controls cancel out.
    let drive = axis(input, Intent::MoveForward, Intent::MoveBackward);
    let turn = axis(input, Intent::RotateLeft, Intent::RotateRight);
    let traverse = axis(input, Intent::TurretLeft, Intent::TurretRight);
    let elevate = axis(input, Intent::BarrelUp, Intent::BarrelDown);
    let power = axis(input, Intent::PowerUp, Intent::PowerDown);

    let mut results = Vec::new();
    if drive != 0.0 {
        let direction = heading_vector(tank.body_yaw) * drive;
        results.push(actions::move_by(tank, direction, dt, terrain, blockers));
    }
    if turn != 0.0 {
        results.push(actions::rotate_body(tank, turn * TANK_BODY_ROTATE_SPEED * dt));
    }
    if traverse != 0.0 {
        results.push(actions::rotate_turret(
            tank,
            traverse * TANK_TURRET_ROTATE_SPEED * dt,
        ));
    }
    if elevate != 0.0 {
        results.push(actions::elevate_barrel(
            tank,
            elevate * TANK_BARREL_ELEVATE_SPEED * dt,
        ));
    }
    if power != 0.0 {
        results.push(actions::adjust_power(tank, power * POWER_STEP));
    }

    for rejection in results.into_iter().filter_map(Result::err) {
        trace!(%rejection, "player action rejected");
    }

    if tank.fuel != fuel_before {
        outbox.ui(UiEvent::FuelChanged {
            current: tank.fuel,
            max: tank.max_fuel,
        });
    }
    if tank.power != power_before {
        outbox.ui(UiEvent::PowerChanged { power: tank.power });
    }
}

fn axis(input: &InputState, positive: Intent, negative: Intent) -> f64 {
    match (input.is_held(positive), input.is_held(negative)) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
