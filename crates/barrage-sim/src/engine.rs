//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the terrain, processes
//! player commands, runs all systems, and produces `GameStateSnapshot`s.
//! Completely headless, so whole matches can be replayed in tests.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use barrage_ai::{get_profile, DifficultyProfile};
use barrage_core::commands::PlayerCommand;
use barrage_core::components::Tank;
use barrage_core::constants::*;
use barrage_core::enums::{Difficulty, GamePhase, Outcome, TurnSlot};
use barrage_core::events::SceneEvent;
use barrage_core::state::GameStateSnapshot;
use barrage_core::types::SimTime;
use barrage_terrain::Heightfield;

use crate::actions;
use crate::outbox::Outbox;
use crate::systems;
use crate::systems::ai_turn::{AiContext, AiTurn, AiTurnStatus};
use crate::systems::effects::CameraShake;
use crate::systems::input::InputState;
use crate::systems::snapshot::RoundView;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and commands = same match.
    pub seed: u64,
    /// Difficulty a front end should offer first.
    pub difficulty: Difficulty,
    pub enemy_count: usize,
    pub building_count: usize,
    pub tree_count: usize,
    /// Let the AI play the human tank too.
    pub autopilot: bool,
    /// Replaces the built-in profile for whichever difficulty is picked.
    pub profile: Option<DifficultyProfile>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::default(),
            enemy_count: ENEMY_COUNT,
            building_count: BUILDING_COUNT,
            tree_count: TREE_COUNT,
            autopilot: false,
            profile: None,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    pub(crate) world: World,
    pub(crate) terrain: Heightfield,
    pub(crate) time: SimTime,
    pub(crate) phase: GamePhase,
    pub(crate) difficulty: Difficulty,
    pub(crate) profile: DifficultyProfile,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) turn: Option<TurnSlot>,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) enemy_count: usize,
    pub(crate) ai_turn: Option<AiTurn>,
    pub(crate) input: InputState,
    pub(crate) next_projectile_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    pub(crate) outbox: Outbox,
    pub(crate) camera_shake: CameraShake,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let difficulty = config.difficulty;
        let profile = config
            .profile
            .clone()
            .unwrap_or_else(|| get_profile(difficulty));
        Self {
            world: World::new(),
            terrain: Heightfield::default(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            difficulty,
            profile,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            turn: None,
            outcome: None,
            enemy_count: 0,
            ai_turn: None,
            input: InputState::default(),
            next_projectile_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            outbox: Outbox::default(),
            camera_shake: CameraShake::default(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.round_in_progress() {
            self.run_systems();
            self.time.advance();
        }

        let (audio, ui, scene) = self.outbox.drain();
        systems::snapshot::build_snapshot(
            &self.world,
            RoundView {
                time: self.time,
                phase: self.phase,
                difficulty: self.difficulty,
                turn: self.turn,
                outcome: self.outcome,
                terrain_revision: self.terrain.revision(),
                camera_shake: self.camera_shake.view(),
            },
            audio,
            ui,
            scene,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Whose turn it is, if a round is running.
    pub fn turn(&self) -> Option<TurnSlot> {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Profile driving the AI this round.
    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the heightfield.
    pub fn terrain(&self) -> &Heightfield {
        &self.terrain
    }

    /// Copy of the tank in `slot`.
    pub fn tank(&self, slot: TurnSlot) -> Option<Tank> {
        self.world
            .query::<&Tank>()
            .iter()
            .find(|(_, tank)| tank.slot == slot)
            .map(|(_, tank)| tank.clone())
    }

    /// Mutate the tank in `slot` directly (for tests).
    #[cfg(test)]
    pub fn with_tank_mut<R>(&mut self, slot: TurnSlot, f: impl FnOnce(&mut Tank) -> R) -> Option<R> {
        self.world
            .query_mut::<&mut Tank>()
            .into_iter()
            .find(|(_, tank)| tank.slot == slot)
            .map(|(_, tank)| f(tank))
    }

    /// Get a mutable reference to the ECS world (for tests).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Replace the heightfield (for tests needing flat ground).
    #[cfg(test)]
    pub fn set_terrain(&mut self, terrain: Heightfield) {
        self.terrain = terrain;
    }

    fn round_in_progress(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::PlayerTurn | GamePhase::EnemyTurn | GamePhase::GameOver
        )
    }

    fn human_in_control(&self) -> bool {
        self.phase == GamePhase::PlayerTurn && !self.config.autopilot
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SelectDifficulty { difficulty } => {
                if self.phase == GamePhase::DifficultySelection {
                    self.start_round(difficulty);
                }
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase == GamePhase::GameOver {
                    self.reset_round();
                }
            }
            PlayerCommand::SetIntent { intent, active } => {
                if !active {
                    self.input.set(intent, false);
                } else if self.human_in_control() {
                    self.input.set(intent, true);
                } else {
                    trace!(?intent, phase = ?self.phase, "intent ignored outside player turn");
                }
            }
            PlayerCommand::Fire => {
                if self.human_in_control() {
                    if let Err(rejection) = systems::projectiles::fire(
                        &mut self.world,
                        TurnSlot::Player,
                        &mut self.next_projectile_id,
                        &mut self.outbox,
                    ) {
                        trace!(%rejection, "fire rejected");
                    }
                }
            }
            PlayerCommand::EndTurn => {
                if self.human_in_control() {
                    self.next_turn();
                }
            }
        }
    }

    /// Generate a round for `difficulty` and hand the first turn to the player.
    fn start_round(&mut self, difficulty: Difficulty) {
        self.phase = GamePhase::Initializing;
        self.difficulty = difficulty;
        self.profile = self
            .config
            .profile
            .clone()
            .unwrap_or_else(|| get_profile(difficulty));
        self.clear_round();

        let round = world_setup::setup_round(
            &mut self.world,
            &mut self.rng,
            &self.config,
            &self.profile,
        );
        self.terrain = round.terrain;
        self.enemy_count = round.enemy_count;

        info!(difficulty = %self.profile.name, seed = self.config.seed, "round started");
        self.begin_turn(TurnSlot::Player);
    }

    /// Drop the finished round and go back to difficulty selection.
    fn reset_round(&mut self) {
        self.clear_round();
        self.terrain = Heightfield::default();
        self.phase = GamePhase::DifficultySelection;
        info!("returned to difficulty selection");
    }

    fn clear_round(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.turn = None;
        self.outcome = None;
        self.enemy_count = 0;
        self.ai_turn = None;
        self.input.clear();
        self.next_projectile_id = 0;
        self.camera_shake = CameraShake::default();
        self.despawn_buffer.clear();
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        self.despawn_buffer.clear();

        if self.phase != GamePhase::GameOver {
            // 1. Shell flight
            systems::projectiles::run(&mut self.world, DT);
            // 2. Collisions (tanks, buildings, trees, ground)
            systems::collision::run(
                &mut self.world,
                &mut self.terrain,
                &mut self.outbox,
                &mut self.camera_shake,
            );
            // 3. A hit may have decided the match
            self.check_game_over();
        }

        // 4. Held player controls
        if self.human_in_control() {
            let blockers = actions::standing_blockers(&self.world);
            systems::input::run(
                &mut self.world,
                &self.terrain,
                &blockers,
                &self.input,
                &mut self.outbox,
                DT,
            );
        }

        // 5. Computer-controlled turn timers
        if let Some(mut ai_turn) = self.ai_turn.take() {
            let mut ctx = AiContext {
                world: &mut self.world,
                terrain: &self.terrain,
                rng: &mut self.rng,
                profile: &self.profile,
                outbox: &mut self.outbox,
                next_projectile_id: &mut self.next_projectile_id,
            };
            match systems::ai_turn::run(&mut ctx, &mut ai_turn, DT) {
                AiTurnStatus::Running => self.ai_turn = Some(ai_turn),
                AiTurnStatus::Finished => self.next_turn(),
            }
        }

        // 6. Destruction countdowns and camera shake
        systems::effects::run(
            &mut self.world,
            &mut self.outbox,
            &mut self.despawn_buffer,
            DT,
        );
        self.camera_shake.update(DT);

        // 7. Despawn retired shells and cleared obstacles
        systems::cleanup::run(&mut self.world, &mut self.outbox, &mut self.despawn_buffer);

        // 8. Terrain normals need recomputing after craters
        if self.terrain.take_dirty() {
            self.outbox.scene(SceneEvent::TerrainDeformed {
                revision: self.terrain.revision(),
            });
        }

        // 9. Final end-of-tick check
        self.check_game_over();
    }
}
