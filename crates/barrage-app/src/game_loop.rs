//! Game loop thread: runs the simulation engine and streams snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via an `mpsc` channel, snapshots go back out over another one.
//! The loop ends on game over, on the tick limit, on `Shutdown`, or when
//! the command channel disconnects.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use barrage_core::commands::PlayerCommand;
use barrage_core::constants::TICK_RATE;
use barrage_core::enums::GamePhase;
use barrage_core::events::{SceneEvent, UiEvent};
use barrage_core::state::GameStateSnapshot;
use barrage_sim::SimulationEngine;

use crate::config::RunConfig;
use crate::state::{GameLoopCommand, MatchSummary};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Handles for talking to a running game loop.
pub struct GameLoopHandle {
    pub commands: mpsc::Sender<GameLoopCommand>,
    pub snapshots: mpsc::Receiver<GameStateSnapshot>,
    pub thread: JoinHandle<MatchSummary>,
}

/// Spawn the game loop in a new thread and start a match right away.
///
/// Snapshots are only forwarded when `config.run.json` is set.
pub fn spawn_game_loop(config: RunConfig) -> std::io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let (snap_tx, snap_rx) = mpsc::channel::<GameStateSnapshot>();

    cmd_tx
        .send(GameLoopCommand::PlayerCommand(
            PlayerCommand::SelectDifficulty {
                difficulty: config.sim.difficulty,
            },
        ))
        .map_err(|_| std::io::Error::other("game loop command channel closed"))?;

    let thread = std::thread::Builder::new()
        .name("barrage-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, snap_tx))?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        thread,
    })
}

/// The game loop. Returns a summary of the match when it stops.
pub fn run_game_loop(
    config: RunConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: mpsc::Sender<GameStateSnapshot>,
) -> MatchSummary {
    let stream = config.run.json;
    let realtime = config.run.realtime;
    let max_ticks = config.run.max_ticks;
    let mut engine = SimulationEngine::new(config.sim);
    let mut summary = MatchSummary {
        difficulty: engine.difficulty(),
        outcome: None,
        ticks: 0,
        elapsed_secs: 0.0,
        shots_fired: 0,
        message: None,
    };
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => {
                    debug!("game loop shutdown requested");
                    return finish(summary, &engine);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return finish(summary, &engine),
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();
        record(&mut summary, &snapshot);

        // 3. Stream it; a closed receiver just means nobody is listening
        let over = snapshot.phase == GamePhase::GameOver;
        if stream {
            let _ = snap_tx.send(snapshot);
        }

        if over || engine.time().tick >= max_ticks {
            return finish(summary, &engine);
        }

        // 4. Sleep until next tick
        if realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }
}

fn record(summary: &mut MatchSummary, snapshot: &GameStateSnapshot) {
    for event in &snapshot.scene_events {
        if matches!(event, SceneEvent::ProjectileSpawned { .. }) {
            summary.shots_fired += 1;
        }
    }
    for event in &snapshot.ui_events {
        if let UiEvent::GameOver { message, .. } = event {
            summary.message = Some(message.clone());
        }
    }
}

fn finish(mut summary: MatchSummary, engine: &SimulationEngine) -> MatchSummary {
    summary.difficulty = engine.difficulty();
    summary.outcome = engine.outcome();
    summary.ticks = engine.time().tick;
    summary.elapsed_secs = engine.time().elapsed_secs;
    info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        shots = summary.shots_fired,
        "match finished"
    );
    summary
}
