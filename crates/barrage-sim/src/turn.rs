//! Turn order and the end of the match.
//!
//! The player moves first, then each surviving enemy in index order, then
//! back to the player. The match ends exactly once: when the player's tank
//! is destroyed or when no enemy is left.

use tracing::info;

use barrage_core::components::Tank;
use barrage_core::enums::{GamePhase, Outcome, TurnSlot};
use barrage_core::events::UiEvent;

use crate::actions;
use crate::engine::SimulationEngine;
use crate::systems::ai_turn::AiTurn;
use crate::systems::{projectiles, tank_entity};

impl SimulationEngine {
    /// Hand the turn to the next tank still in the fight.
    ///
    /// Ignored once the match is over or before a round exists.
    pub(crate) fn next_turn(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let Some(current) = self.turn else {
            return;
        };
        if let Some(outcome) = self.decided_outcome() {
            self.game_over(outcome);
            return;
        }

        self.ai_turn = None;
        self.input.clear();
        self.with_slot(current, |tank| tank.has_fired_this_turn = false);

        let mut slot = current;
        // One lap is always enough: at least one enemy is alive here.
        for _ in 0..=self.enemy_count {
            slot = self.slot_after(slot);
            match slot {
                TurnSlot::Player => {
                    if !self.is_alive(TurnSlot::Player) {
                        self.game_over(Outcome::Defeat);
                        return;
                    }
                    break;
                }
                TurnSlot::Enemy(_) => {
                    if self.is_alive(slot) {
                        break;
                    }
                }
            }
        }
        self.begin_turn(slot);
    }

    /// Start `slot`'s turn: refuel, re-arm and tell the HUD.
    pub(crate) fn begin_turn(&mut self, slot: TurnSlot) {
        self.turn = Some(slot);
        self.phase = if slot.is_player() {
            GamePhase::PlayerTurn
        } else {
            GamePhase::EnemyTurn
        };
        self.input.clear();
        self.with_slot(slot, actions::reset_turn_stats);

        let text = match slot {
            TurnSlot::Player => format!("{} - Player's Turn", self.profile.name),
            TurnSlot::Enemy(index) => {
                format!("{} - Enemy {}'s Turn", self.profile.name, index + 1)
            }
        };
        info!(?slot, "turn started");
        self.outbox.ui(UiEvent::TurnIndicator { text });
        self.outbox.ui(UiEvent::EndTurnEnabled {
            enabled: slot.is_player() && !self.config.autopilot,
        });

        if let Some(tank) = self.tank(slot) {
            self.outbox.ui(UiEvent::FuelChanged {
                current: tank.fuel,
                max: tank.max_fuel,
            });
            self.outbox.ui(UiEvent::HealthChanged {
                slot,
                current: tank.health,
                max: tank.max_health,
            });
            self.outbox.ui(UiEvent::PowerChanged { power: tank.power });
        }

        let computer_driven = !slot.is_player() || self.config.autopilot;
        if computer_driven {
            self.outbox.action_text(if slot.is_player() {
                "Autopilot is analyzing battlefield..."
            } else {
                "Enemy is analyzing battlefield..."
            });
            self.ai_turn = Some(AiTurn::new(slot, self.profile.reaction_secs));
        } else {
            self.outbox.action_text("Move / Aim / Fire / Adjust Power");
        }
    }

    /// End the match if either side has been wiped out.
    pub(crate) fn check_game_over(&mut self) {
        if self.phase == GamePhase::GameOver || self.turn.is_none() {
            return;
        }
        if let Some(outcome) = self.decided_outcome() {
            self.game_over(outcome);
        }
    }

    /// Enter GameOver. Runs once per round.
    pub(crate) fn game_over(&mut self, outcome: Outcome) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.outcome = Some(outcome);
        self.ai_turn = None;
        self.input.clear();
        projectiles::expire_all(&mut self.world);

        let message = match outcome {
            Outcome::Victory => format!(
                "Victory on {} Difficulty! All Enemies Destroyed!",
                self.profile.name
            ),
            Outcome::Defeat => format!(
                "Defeat on {} Difficulty! Your Tank Was Destroyed!",
                self.profile.name
            ),
        };
        info!(?outcome, tick = self.time.tick, "game over");
        self.outbox.ui(UiEvent::GameOver { outcome, message });
        self.outbox.ui(UiEvent::EndTurnEnabled { enabled: false });
    }

    /// Defeat if the player is down, victory if every enemy is.
    fn decided_outcome(&self) -> Option<Outcome> {
        if !self.is_alive(TurnSlot::Player) {
            return Some(Outcome::Defeat);
        }
        let any_enemy = (0..self.enemy_count).any(|i| self.is_alive(TurnSlot::Enemy(i)));
        if !any_enemy {
            return Some(Outcome::Victory);
        }
        None
    }

    fn slot_after(&self, slot: TurnSlot) -> TurnSlot {
        match slot {
            TurnSlot::Player if self.enemy_count > 0 => TurnSlot::Enemy(0),
            TurnSlot::Player => TurnSlot::Player,
            TurnSlot::Enemy(index) if index + 1 < self.enemy_count => TurnSlot::Enemy(index + 1),
            TurnSlot::Enemy(_) => TurnSlot::Player,
        }
    }

    fn is_alive(&self, slot: TurnSlot) -> bool {
        tank_entity(&self.world, slot)
            .and_then(|entity| self.world.get::<&Tank>(entity).ok().map(|t| !t.destroyed))
            .unwrap_or(false)
    }

    fn with_slot(&mut self, slot: TurnSlot, f: impl FnOnce(&mut Tank)) {
        if let Some(entity) = tank_entity(&self.world, slot) {
            if let Ok(mut tank) = self.world.get::<&mut Tank>(entity) {
                f(&mut tank);
            }
        }
    }
}
