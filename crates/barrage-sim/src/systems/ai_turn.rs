//! Computer-controlled turns.
//!
//! A turn waits out the profile's reaction time, decides once, acts, and
//! then holds for the post-decision delay. Movement orders are driven one
//! tick at a time during that hold; the turn ends only when both the delay
//! and any move have finished.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use barrage_ai::fire_control::{aim_step, plan_move, plan_shot};
use barrage_ai::{decide, AiDecision, DifficultyProfile, Situation};
use barrage_core::components::{AiMemory, Obstacle, Tank};
use barrage_core::constants::TANK_MOVE_SPEED;
use barrage_core::enums::TurnSlot;
use barrage_core::error::ActionRejected;
use barrage_core::events::UiEvent;
use barrage_core::types::{horizontal_distance, Vec3};
use barrage_terrain::Heightfield;

use crate::actions::{self, Blocker};
use crate::outbox::Outbox;
use crate::systems::{projectiles, tank_entity};

/// A drive in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOrder {
    pub destination: Vec3,
    pub direction: Vec3,
    /// Distance still allowed this turn.
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiPhase {
    Reacting { remaining_secs: f64 },
    Acting {
        remaining_secs: f64,
        move_order: Option<MoveOrder>,
    },
}

/// Timer state for the tank whose turn is being played by the computer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiTurn {
    pub slot: TurnSlot,
    pub phase: AiPhase,
}

impl AiTurn {
    pub fn new(slot: TurnSlot, reaction_secs: f64) -> Self {
        Self {
            slot,
            phase: AiPhase::Reacting {
                remaining_secs: reaction_secs,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTurnStatus {
    Running,
    Finished,
}

/// Everything an AI turn touches besides its own timers.
pub struct AiContext<'a> {
    pub world: &'a mut World,
    pub terrain: &'a Heightfield,
    pub rng: &'a mut ChaCha8Rng,
    pub profile: &'a DifficultyProfile,
    pub outbox: &'a mut Outbox,
    pub next_projectile_id: &'a mut u32,
}

/// Advance the AI turn by `dt`.
pub fn run(ctx: &mut AiContext, turn: &mut AiTurn, dt: f64) -> AiTurnStatus {
    match &mut turn.phase {
        AiPhase::Reacting { remaining_secs } => {
            *remaining_secs -= dt;
            if *remaining_secs <= 0.0 {
                let move_order = execute(ctx, turn.slot);
                turn.phase = AiPhase::Acting {
                    remaining_secs: ctx.profile.turn_delay_secs(),
                    move_order,
                };
            }
            AiTurnStatus::Running
        }
        AiPhase::Acting {
            remaining_secs,
            move_order,
        } => {
            if let Some(order) = move_order {
                if !drive(ctx, turn.slot, order, dt) {
                    *move_order = None;
                }
            }
            *remaining_secs -= dt;
            if *remaining_secs <= 0.0 && move_order.is_none() {
                AiTurnStatus::Finished
            } else {
                AiTurnStatus::Running
            }
        }
    }
}

/// Target for `slot`: the player for enemies, the nearest live enemy for
/// an autopiloted player.
fn find_target(world: &World, slot: TurnSlot, from: Vec3) -> Option<Vec3> {
    world
        .query::<&Tank>()
        .iter()
        .filter(|(_, t)| !t.destroyed && t.slot.is_player() != slot.is_player())
        .map(|(_, t)| t.position)
        .min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)))
}

/// Decide and act once. Returns a move order when the decision is a drive.
fn execute(ctx: &mut AiContext, slot: TurnSlot) -> Option<MoveOrder> {
    let entity = tank_entity(ctx.world, slot)?;
    let tank = Tank::clone(&*ctx.world.get::<&Tank>(entity).ok()?);
    if tank.destroyed {
        return None;
    }
    let target = find_target(ctx.world, slot, tank.position)?;

    if let Ok(mut memory) = ctx.world.get::<&mut AiMemory>(entity) {
        memory.last_known_target = Some(target);
        memory.turns_since_last_shot += 1;
    }

    let obstacles: Vec<Obstacle> = ctx
        .world
        .query::<&Obstacle>()
        .iter()
        .map(|(_, o)| o.clone())
        .collect();
    let situation = Situation {
        position: tank.position,
        target,
        health: tank.health,
        max_health: tank.max_health,
        has_fired: tank.has_fired_this_turn,
        obstacles: &obstacles,
        profile: ctx.profile,
    };
    let decision = decide(&situation, ctx.rng);

    let actor = if slot.is_player() { "Autopilot" } else { "Enemy" };
    ctx.outbox
        .action_text(format!("{actor} is {}...", decision.label()));
    debug!(?slot, ?decision, "ai acting");

    match decision {
        AiDecision::Shoot { accuracy } => {
            if let Err(rejection) = take_shot(ctx, slot, target, accuracy) {
                trace!(?slot, %rejection, "ai shot rejected");
            } else if let Ok(mut memory) = ctx.world.get::<&mut AiMemory>(entity) {
                memory.turns_since_last_shot = 0;
            }
            None
        }
        AiDecision::Aim => {
            if let Ok(mut tank) = ctx.world.get::<&mut Tank>(entity) {
                let result = actions::aim_towards(&mut tank, target).and_then(|()| {
                    let step = aim_step(&tank, target);
                    actions::elevate_barrel(&mut tank, step)
                });
                if let Err(rejection) = result {
                    trace!(?slot, %rejection, "ai aim rejected");
                }
            }
            None
        }
        _ => {
            let destination = decision.move_target()?;
            plan_move(&tank, destination, ctx.profile).map(|plan| MoveOrder {
                destination: plan.destination,
                direction: plan.direction,
                remaining: plan.budget,
            })
        }
    }
}

/// Face the target, apply the fire-control solution and shoot.
fn take_shot(
    ctx: &mut AiContext,
    slot: TurnSlot,
    target: Vec3,
    accuracy: f64,
) -> Result<(), ActionRejected> {
    let entity = tank_entity(ctx.world, slot).ok_or(ActionRejected::Destroyed)?;
    {
        let mut tank = ctx
            .world
            .get::<&mut Tank>(entity)
            .map_err(|_| ActionRejected::Destroyed)?;
        actions::aim_towards(&mut tank, target)?;
        let plan = plan_shot(&tank, target, accuracy, ctx.rng);
        let delta = plan.elevation - tank.elevation;
        actions::elevate_barrel(&mut tank, delta)?;
        actions::set_power(&mut tank, plan.power)?;
        actions::rotate_turret(&mut tank, plan.turret_scatter)?;
    }
    if slot.is_player() {
        if let Ok(tank) = ctx.world.get::<&Tank>(entity) {
            ctx.outbox.ui(UiEvent::PowerChanged { power: tank.power });
        }
    }
    projectiles::fire(ctx.world, slot, ctx.next_projectile_id, ctx.outbox).map(|_| ())
}

/// Drive one tick of a move order. Returns false once the order is over.
fn drive(ctx: &mut AiContext, slot: TurnSlot, order: &mut MoveOrder, dt: f64) -> bool {
    if order.remaining <= 0.0 {
        return false;
    }
    let blockers: Vec<Blocker> = actions::standing_blockers(ctx.world);
    let Some(entity) = tank_entity(ctx.world, slot) else {
        return false;
    };
    let Ok(mut tank) = ctx.world.get::<&mut Tank>(entity) else {
        return false;
    };

    let to_go = horizontal_distance(tank.position, order.destination);
    let step = (TANK_MOVE_SPEED * dt).min(order.remaining).min(to_go);
    if step <= 1e-9 {
        return false;
    }

    let fuel_before = tank.fuel;
    match actions::move_by(
        &mut tank,
        order.direction,
        step / TANK_MOVE_SPEED,
        ctx.terrain,
        &blockers,
    ) {
        Ok(()) => {
            order.remaining -= step;
            if slot.is_player() && tank.fuel != fuel_before {
                ctx.outbox.ui(UiEvent::FuelChanged {
                    current: tank.fuel,
                    max: tank.max_fuel,
                });
            }
            order.remaining > 1e-9 && to_go - step > 1e-9
        }
        Err(rejection) => {
            trace!(?slot, %rejection, "ai move stopped");
            false
        }
    }
}
