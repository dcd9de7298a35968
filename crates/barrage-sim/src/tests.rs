use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use barrage_ai::fire_control::ideal_elevation;
use barrage_core::ballistics::{elevation_for_range, speed_from_power, GunSpec};
use barrage_core::commands::PlayerCommand;
use barrage_core::components::{Obstacle, Tank};
use barrage_core::constants::*;
use barrage_core::enums::{Difficulty, GamePhase, Intent, Outcome, TurnSlot};
use barrage_core::events::{SceneEvent, UiEvent};
use barrage_core::state::GameStateSnapshot;
use barrage_core::types::{horizontal_distance, Vec3};
use barrage_terrain::Heightfield;

use crate::actions::{self, Blocker, DamageOutcome};
use crate::engine::{SimConfig, SimulationEngine};
use crate::systems::projectiles;

fn started(config: SimConfig, difficulty: Difficulty) -> (SimulationEngine, GameStateSnapshot) {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::SelectDifficulty { difficulty });
    let snap = engine.tick();
    (engine, snap)
}

fn kill(engine: &mut SimulationEngine, slot: TurnSlot) {
    engine.with_tank_mut(slot, |tank| actions::take_damage(tank, 1_000));
}

fn enemies(engine: &SimulationEngine) -> Vec<Tank> {
    (0..ENEMY_COUNT)
        .filter_map(|i| engine.tank(TurnSlot::Enemy(i)))
        .collect()
}

// ---- Round setup ----

#[test]
fn test_select_difficulty_starts_player_turn() {
    let (engine, snap) = started(SimConfig::default(), Difficulty::Beginner);
    assert_eq!(snap.phase, GamePhase::PlayerTurn);
    assert_eq!(snap.turn, Some(TurnSlot::Player));
    assert_eq!(snap.tanks.len(), ENEMY_COUNT + 1);
    assert_eq!(snap.tanks[0].slot, TurnSlot::Player);
    assert!(snap.obstacles.len() <= BUILDING_COUNT + TREE_COUNT);
    assert!(!snap.obstacles.is_empty(), "island should have obstacles");

    let player = engine.tank(TurnSlot::Player).unwrap();
    assert_eq!(player.max_health, 150, "beginner gets a health bonus");
    assert_eq!(player.max_fuel, 150.0);
    assert_eq!(enemies(&engine)[0].max_health, TANK_MAX_HEALTH);

    assert!(snap.ui_events.contains(&UiEvent::TurnIndicator {
        text: "New Player - Player's Turn".into()
    }));
    assert!(snap
        .ui_events
        .contains(&UiEvent::EndTurnEnabled { enabled: true }));
    assert!(snap.ui_events.contains(&UiEvent::ActionIndicator {
        text: "Move / Aim / Fire / Adjust Power".into()
    }));
}

#[test]
fn test_nothing_runs_before_difficulty_selected() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Fire);
    engine.queue_command(PlayerCommand::SetIntent {
        intent: Intent::MoveForward,
        active: true,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::DifficultySelection);
    assert_eq!(snap.time.tick, 0);
    assert!(snap.tanks.is_empty());
    assert!(engine.input.is_idle());
}

#[test]
fn test_same_seed_same_match() {
    let config = SimConfig {
        seed: 7,
        autopilot: true,
        ..SimConfig::default()
    };
    let (mut a, first_a) = started(config.clone(), Difficulty::Veteran);
    let (mut b, first_b) = started(config, Difficulty::Veteran);
    assert_eq!(first_a, first_b);

    for _ in 0..1_200 {
        let sa = serde_json::to_string(&a.tick()).unwrap();
        let sb = serde_json::to_string(&b.tick()).unwrap();
        assert_eq!(sa, sb, "engines with the same seed diverged");
    }
}

#[test]
fn test_tanks_never_spawn_inside_obstacles() {
    for seed in 0..12 {
        let (engine, _) = started(
            SimConfig {
                seed,
                ..SimConfig::default()
            },
            Difficulty::Professional,
        );
        let obstacles: Vec<Obstacle> = engine
            .world()
            .query::<&Obstacle>()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        for (_, tank) in engine.world().query::<&Tank>().iter() {
            for o in &obstacles {
                assert!(
                    horizontal_distance(tank.position, o.position) >= o.radius + TANK_COLLISION_RADIUS,
                    "seed {seed}: {:?} spawned inside obstacle {}",
                    tank.slot,
                    o.id
                );
            }
        }
    }
}

#[test]
fn test_different_seeds_different_islands() {
    let (a, _) = started(
        SimConfig {
            seed: 1,
            ..SimConfig::default()
        },
        Difficulty::Professional,
    );
    let (b, _) = started(
        SimConfig {
            seed: 2,
            ..SimConfig::default()
        },
        Difficulty::Professional,
    );
    assert_ne!(a.terrain().heights(), b.terrain().heights());
}

// ---- Ballistics in flight ----

/// Fire `tank` through `actions::shoot` and fly the shell until it comes
/// down to ground level.
fn landing_point(tank: &mut Tank) -> Vec3 {
    let mut shell = actions::shoot(tank, 0).unwrap();
    while shell.is_live() {
        projectiles::advance(&mut shell, DT);
        if shell.velocity.y < 0.0 && shell.position.y <= 0.0 {
            break;
        }
    }
    shell.position
}

#[test]
fn test_power_50_lands_near_thirty() {
    let gun = GunSpec::default();
    let speed = speed_from_power(50.0, &gun);
    assert!((elevation_for_range(30.0, 0.0, speed, &gun).to_degrees() - 29.85).abs() < 0.1);

    let target = Vec3::new(30.0, 0.0, 0.0);
    let mut tank = Tank::new(
        TurnSlot::Player,
        Vec3::new(0.0, TANK_RIDE_HEIGHT, 0.0),
        TANK_MAX_HEALTH,
        TANK_MAX_FUEL,
    );
    tank.body_yaw = std::f64::consts::FRAC_PI_2;
    tank.power = 50.0;
    tank.elevation = ideal_elevation(&tank, target);

    let landed = landing_point(&mut tank);
    assert!((landed.x - 30.0).abs() < 1.5, "landed at x = {}", landed.x);
    assert!(landed.z.abs() < 1e-6);
}

#[test]
fn test_solved_shots_land_on_target_in_any_direction() {
    for target in [
        Vec3::new(0.0, 0.0, -25.0),
        Vec3::new(-20.0, 0.0, 20.0),
        Vec3::new(12.0, 0.0, 9.0),
    ] {
        let mut tank = Tank::new(
            TurnSlot::Enemy(0),
            Vec3::new(0.0, TANK_RIDE_HEIGHT, 0.0),
            TANK_MAX_HEALTH,
            TANK_MAX_FUEL,
        );
        actions::aim_towards(&mut tank, target).unwrap();
        tank.elevation = ideal_elevation(&tank, target);
        let landed = landing_point(&mut tank);
        assert!(
            horizontal_distance(landed, target) < 1.5,
            "aimed at {target:?}, landed at {landed:?}"
        );
    }
}

// ---- Firing ----

#[test]
fn test_second_shot_in_a_turn_is_refused() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    let spawned = |s: &GameStateSnapshot| {
        s.scene_events
            .iter()
            .filter(|e| matches!(e, SceneEvent::ProjectileSpawned { .. }))
            .count()
    };
    assert_eq!(spawned(&snap), 1);

    let before = engine.tank(TurnSlot::Player).unwrap();
    assert!(before.has_fired_this_turn);
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(spawned(&snap), 0);
    assert_eq!(engine.tank(TurnSlot::Player).unwrap(), before);
}

#[test]
fn test_ground_shot_deforms_terrain() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    engine.set_terrain(Heightfield::flat(TERRAIN_SIZE, TERRAIN_SEGMENTS, 0.0));
    let obstacles: Vec<_> = engine
        .world()
        .query::<&Obstacle>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in obstacles {
        engine.world_mut().despawn(entity).unwrap();
    }
    for i in 0..ENEMY_COUNT {
        engine.with_tank_mut(TurnSlot::Enemy(i), |t| {
            t.position = Vec3::new(-60.0 + 10.0 * i as f64, 0.5, -60.0)
        });
    }
    engine.with_tank_mut(TurnSlot::Player, |t| {
        t.position = Vec3::new(0.0, 0.5, 0.0);
        t.body_yaw = 0.0;
        t.turret_yaw = 0.0;
        t.elevation = ELEVATION_MIN;
    });

    engine.queue_command(PlayerCommand::Fire);
    let mut deformed = false;
    let mut impact = false;
    for _ in 0..60 {
        let snap = engine.tick();
        deformed |= snap
            .scene_events
            .iter()
            .any(|e| matches!(e, SceneEvent::TerrainDeformed { revision: 1 }));
        impact |= snap
            .scene_events
            .iter()
            .any(|e| matches!(e, SceneEvent::GroundImpact { .. }));
    }
    assert!(impact && deformed);
    assert_eq!(engine.terrain().revision(), 1);
    assert!(engine.terrain().heights().iter().all(|&h| h >= 0.0));
}

// ---- Player input ----

#[test]
fn test_held_intent_moves_and_release_stops() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    let start = engine.tank(TurnSlot::Player).unwrap();
    engine.queue_command(PlayerCommand::SetIntent {
        intent: Intent::TurretLeft,
        active: true,
    });
    for _ in 0..30 {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::SetIntent {
        intent: Intent::TurretLeft,
        active: false,
    });
    engine.tick();
    let turned = engine.tank(TurnSlot::Player).unwrap();
    for _ in 0..30 {
        engine.tick();
    }
    let after = engine.tank(TurnSlot::Player).unwrap();
    assert!((turned.turret_yaw - start.turret_yaw - 30.0 * TANK_TURRET_ROTATE_SPEED * DT).abs() < 1e-9);
    assert_eq!(after.turret_yaw, turned.turret_yaw);
    assert_eq!(after.fuel, start.fuel, "turret traverse is free");
}

#[test]
fn test_intents_ignored_on_enemy_turn() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    engine.queue_command(PlayerCommand::EndTurn);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::EnemyTurn);
    assert!(snap
        .ui_events
        .contains(&UiEvent::EndTurnEnabled { enabled: false }));

    engine.queue_command(PlayerCommand::SetIntent {
        intent: Intent::PowerUp,
        active: true,
    });
    engine.queue_command(PlayerCommand::Fire);
    engine.queue_command(PlayerCommand::EndTurn);
    let snap = engine.tick();
    assert!(engine.input.is_idle());
    assert_eq!(snap.turn, Some(TurnSlot::Enemy(0)));
    assert!(!engine.tank(TurnSlot::Player).unwrap().has_fired_this_turn);
}

// ---- Turn order ----

#[test]
fn test_turn_order_skips_destroyed_and_wins_after_last() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    assert_eq!(engine.turn(), Some(TurnSlot::Player));

    kill(&mut engine, TurnSlot::Enemy(1));
    engine.next_turn();
    assert_eq!(engine.turn(), Some(TurnSlot::Enemy(0)));
    engine.next_turn();
    assert_eq!(engine.turn(), Some(TurnSlot::Enemy(2)), "dead enemy is skipped");
    engine.next_turn();
    assert_eq!(engine.turn(), Some(TurnSlot::Player));

    engine.tick();
    assert_eq!(engine.outcome(), None);
    kill(&mut engine, TurnSlot::Enemy(0));
    engine.tick();
    assert_eq!(engine.outcome(), None);
    assert_ne!(engine.phase(), GamePhase::GameOver);

    kill(&mut engine, TurnSlot::Enemy(2));
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.outcome, Some(Outcome::Victory));
    assert!(snap.ui_events.contains(&UiEvent::GameOver {
        outcome: Outcome::Victory,
        message: "Victory on Professional Difficulty! All Enemies Destroyed!".into(),
    }));

    // Further turn changes are ignored.
    engine.next_turn();
    engine.queue_command(PlayerCommand::EndTurn);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(!snap
        .ui_events
        .iter()
        .any(|e| matches!(e, UiEvent::GameOver { .. })));
}

#[test]
fn test_turn_start_refuels_and_rearms() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    engine.with_tank_mut(TurnSlot::Enemy(0), |t| {
        t.fuel = 3.0;
        t.has_fired_this_turn = true;
        t.power = 77.0;
    });
    engine.next_turn();
    let enemy = engine.tank(TurnSlot::Enemy(0)).unwrap();
    assert_eq!(enemy.fuel, enemy.max_fuel);
    assert!(!enemy.has_fired_this_turn);
    assert_eq!(enemy.power, 77.0, "power carries over between turns");
}

#[test]
fn test_player_killed_mid_enemy_turn() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Veteran);
    engine.queue_command(PlayerCommand::EndTurn);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::EnemyTurn);
    assert!(engine.ai_turn.is_some());
    let frozen = enemies(&engine);

    kill(&mut engine, TurnSlot::Player);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.outcome, Some(Outcome::Defeat));
    assert!(snap.ui_events.contains(&UiEvent::GameOver {
        outcome: Outcome::Defeat,
        message: "Defeat on Veteran Difficulty! Your Tank Was Destroyed!".into(),
    }));
    assert!(engine.ai_turn.is_none());

    for _ in 0..300 {
        engine.tick();
    }
    assert_eq!(enemies(&engine), frozen, "no enemy acts after game over");
}

#[test]
fn test_return_to_menu_after_game_over() {
    let (mut engine, _) = started(SimConfig::default(), Difficulty::Professional);
    engine.queue_command(PlayerCommand::ReturnToMenu);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::PlayerTurn, "only from game over");

    for i in 0..ENEMY_COUNT {
        kill(&mut engine, TurnSlot::Enemy(i));
    }
    engine.tick();
    assert_eq!(engine.outcome(), Some(Outcome::Victory));

    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::DifficultySelection);
    assert!(snap.tanks.is_empty());
    assert_eq!(snap.outcome, None);

    engine.queue_command(PlayerCommand::SelectDifficulty {
        difficulty: Difficulty::Veteran,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::PlayerTurn);
    assert_eq!(snap.difficulty, Difficulty::Veteran);
}

#[test]
fn test_autopilot_keeps_invariants() {
    let config = SimConfig {
        seed: 11,
        autopilot: true,
        ..SimConfig::default()
    };
    let (mut engine, first) = started(config, Difficulty::Professional);
    let mut last_health: Vec<i32> = first.tanks.iter().map(|t| t.health).collect();
    let mut saw_enemy_turn = false;
    let mut game_overs = 0;

    for _ in 0..6_000 {
        let snap = engine.tick();
        saw_enemy_turn |= matches!(snap.turn, Some(TurnSlot::Enemy(_)));
        game_overs += snap
            .ui_events
            .iter()
            .filter(|e| matches!(e, UiEvent::GameOver { .. }))
            .count();
        for (tank, last) in snap.tanks.iter().zip(last_health.iter_mut()) {
            assert!(tank.health <= *last, "health never rises");
            assert!(tank.health >= 0 && tank.health <= tank.max_health);
            assert!(tank.fuel >= 0.0 && tank.fuel <= tank.max_fuel);
            assert!(tank.power >= POWER_MIN && tank.power <= POWER_MAX);
            assert!(tank.elevation >= ELEVATION_MIN - 1e-12 && tank.elevation <= ELEVATION_MAX + 1e-12);
            assert_eq!(tank.destroyed, tank.health == 0);
            *last = tank.health;
        }
    }
    assert!(saw_enemy_turn || engine.outcome().is_some());
    assert!(game_overs <= 1, "game over is entered at most once");
}

// ---- Tank invariants ----

#[test]
fn test_move_never_ends_inside_an_obstacle() {
    let terrain = Heightfield::flat(TERRAIN_SIZE, TERRAIN_SEGMENTS, 0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..50 {
        let blockers: Vec<Blocker> = (0..20)
            .map(|id| Blocker {
                id,
                position: Vec3::new(rng.gen_range(-60.0..60.0), 0.0, rng.gen_range(-60.0..60.0)),
                radius: rng.gen_range(1.0..4.0),
            })
            .collect();
        let clear = |p: Vec3| {
            blockers
                .iter()
                .all(|b| horizontal_distance(p, b.position) >= b.radius + TANK_COLLISION_RADIUS)
        };

        let mut start = Vec3::new(0.0, 0.5, 0.0);
        while !clear(start) {
            start = Vec3::new(rng.gen_range(-60.0..60.0), 0.5, rng.gen_range(-60.0..60.0));
        }
        let mut tank = Tank::new(TurnSlot::Player, start, TANK_MAX_HEALTH, 10_000.0);

        for _ in 0..500 {
            let angle = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
            let direction = Vec3::new(angle.sin(), 0.0, angle.cos());
            let before = tank.clone();
            match actions::move_by(&mut tank, direction, DT * 6.0, &terrain, &blockers) {
                Ok(()) => assert!(clear(tank.position), "tank moved into an obstacle"),
                Err(_) => assert_eq!(tank, before),
            }
            assert!(tank.position.x.abs() <= TANK_MOVE_LIMIT);
            assert!(tank.position.z.abs() <= TANK_MOVE_LIMIT);
        }
    }
}

#[test]
fn test_health_monotone_and_destroyed_once() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..200 {
        let mut tank = Tank::new(TurnSlot::Enemy(0), Vec3::ZERO, TANK_MAX_HEALTH, TANK_MAX_FUEL);
        let mut destroyed_events = 0;
        let mut last = tank.health;
        for _ in 0..20 {
            let amount = rng.gen_range(-30..60);
            if actions::take_damage(&mut tank, amount) == DamageOutcome::Destroyed {
                destroyed_events += 1;
            }
            assert!(tank.health <= last);
            assert!(tank.health >= 0 && tank.health <= tank.max_health);
            last = tank.health;
        }
        assert!(destroyed_events <= 1);
        assert_eq!(destroyed_events == 1, tank.destroyed);
    }
}
