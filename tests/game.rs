use glam::IVec2;
use pacman_core::config::{GameConfig, GameVariant};
use pacman_core::constants::{durations, sec_to_ticks};
use pacman_core::entity::bonus::BonusState;
use pacman_core::entity::ghost::{GhostId, GhostState};
use pacman_core::error::{GameError, StateError};
use pacman_core::events::{EventQueue, GameEvent};
use pacman_core::game::hunting::HuntingMode;
use pacman_core::game::state::GameState;
use pacman_core::game::Game;
use pacman_core::map::direction::Direction;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

#[test]
fn test_new_game_waits_in_ready() {
    let game = common::seeded_game(1);
    assert_eq!(game.state(), GameState::Ready);
    assert_eq!(game.state_timer().duration(), durations::READY_GAME_START);
    assert_eq!(game.level().number, 1);
    assert_eq!(game.score().lives, 3);
    assert_eq!(game.sink().events(), &[GameEvent::LevelStarted { level: 1 }]);
    for ghost in game.ghosts() {
        assert_eq!(ghost.state, GhostState::Locked);
    }
}

#[test]
fn test_ready_lasts_exactly_its_countdown() {
    let mut game = common::seeded_game(1);
    for _ in 0..durations::READY_GAME_START {
        game.tick().unwrap();
    }
    assert_eq!(game.state(), GameState::Ready);

    game.tick().unwrap();
    assert_eq!(game.state(), GameState::Hunting);
    assert_eq!(game.hunting_schedule().mode(), HuntingMode::Scatter);
    assert_eq!(
        &game.sink().events()[1..],
        &[
            GameEvent::StateChanged {
                from: GameState::Ready,
                to: GameState::Hunting,
            },
            GameEvent::ScatterPhaseStarted { phase: 0 },
        ]
    );
}

#[test]
fn test_self_loop_is_an_error() {
    let mut game = common::seeded_game(1);
    let result = game.change_state(GameState::Ready);
    assert!(matches!(result, Err(GameError::State(StateError::SelfLoop(GameState::Ready)))));
    assert_eq!(game.state(), GameState::Ready);
}

#[test]
fn test_nothing_to_resume_at_start() {
    let mut game = common::seeded_game(1);
    let result = game.resume_previous_state();
    assert!(matches!(
        result,
        Err(GameError::State(StateError::NothingToResume(GameState::Ready)))
    ));
}

#[test]
fn test_resume_skips_entry_hook() {
    let mut game = common::seeded_game(1);
    game.change_state(GameState::Hunting).unwrap();
    game.change_state(GameState::GhostDying).unwrap();
    assert_that(&game.pac().body.visible).is_false();

    game.resume_previous_state().unwrap();
    assert_eq!(game.state(), GameState::Hunting);
    assert_that(&game.pac().body.visible).is_true();
    assert_that(&game.state_timer().is_indefinite()).is_true();
}

#[test]
fn test_hunting_ghost_kills_pac() {
    let mut game = common::seeded_game(4);
    game.change_state(GameState::Hunting).unwrap();
    let pac_tile = game.pac().tile();
    let blinky = game.ghost_mut(GhostId::Blinky);
    blinky.state = GhostState::Hunting;
    blinky.body.place_at(pac_tile, 4.0, 0.0);
    blinky.body.set_direction(Direction::Left);

    game.tick().unwrap();
    assert_eq!(game.state(), GameState::PacmanDying);
    assert_that(&game.pac().dead).is_true();
    assert_that(&game.sink().events().contains(&GameEvent::PacDied { tile: game.pac().tile() })).is_true();

    let ticks = common::tick_until(&mut game, durations::PACMAN_DYING + 2, |game| game.state() != GameState::PacmanDying);
    assert_that(&ticks).is_some();
    assert_eq!(game.state(), GameState::Ready);
    assert_eq!(game.score().lives, 2);
    assert_that(&game.house_rules().global_counter_enabled()).is_true();
}

#[test]
fn test_last_life_ends_the_game() {
    let config = GameConfig {
        initial_lives: 1,
        rng_seed: Some(9),
        ..GameConfig::default()
    };
    let mut game = Game::new(config, common::classic_world(), EventQueue::new());
    game.change_state(GameState::PacmanDying).unwrap();

    common::tick_until(&mut game, durations::PACMAN_DYING + 2, |game| game.state() == GameState::GameOver)
        .expect("game should end");
    assert_eq!(game.score().lives, 0);

    game.restart().unwrap();
    assert_eq!(game.state(), GameState::Ready);
    assert_eq!(game.score().lives, 1);
    assert_eq!(game.score().points, 0);
    assert_eq!(game.state_timer().duration(), durations::READY_GAME_START);
}

#[test]
fn test_eating_frightened_ghost_pauses_the_game() {
    let mut game = common::seeded_game(4);
    game.change_state(GameState::Hunting).unwrap();
    let pac_tile = game.pac().tile();
    let pinky = game.ghost_mut(GhostId::Pinky);
    pinky.state = GhostState::Frightened;
    pinky.frightened_ticks_left = 100;
    pinky.body.place_at(pac_tile, 4.0, 0.0);

    game.tick().unwrap();
    assert_eq!(game.state(), GameState::GhostDying);
    assert_eq!(game.ghost(GhostId::Pinky).state, GhostState::Dead);
    assert_eq!(game.ghost(GhostId::Pinky).bounty, 200);
    assert_eq!(game.score().points, 200);

    // The eaten ghost stays in place during the pause
    let frozen = game.ghost(GhostId::Pinky).body.position;
    common::tick_until(&mut game, durations::GHOST_DYING + 2, |game| game.state() == GameState::Hunting)
        .expect("pause should end");
    assert_eq!(game.ghost(GhostId::Pinky).body.position, frozen);
    assert_that(&game.pac().body.visible).is_true();
}

#[test]
fn test_energizer_frightens_and_bounties_double() {
    let mut game = common::seeded_game(4);
    game.change_state(GameState::Hunting).unwrap();
    let energizer = IVec2::new(26, 26);
    let pac = game.pac_mut();
    pac.body.place_at(energizer, 4.0, 0.0);
    pac.body.set_direction(Direction::Left);

    for id in GhostId::ALL {
        let ghost = game.ghost_mut(id);
        ghost.state = GhostState::Hunting;
        ghost.body.place_at(IVec2::new(6, 8), 0.0, 0.0);
    }
    game.tick().unwrap();

    assert_that(&game.pac().has_power()).is_true();
    assert_eq!(game.score().points, 50);
    for ghost in game.ghosts() {
        assert_eq!(ghost.state, GhostState::Frightened);
    }
    let events = game.sink_mut().drain();
    assert_that(&events.contains(&GameEvent::PacGainsPower)).is_true();
    assert_that(&events.contains(&GameEvent::PacFoundFood {
        tile: energizer,
        energizer: true,
    }))
    .is_true();
}

#[test]
fn test_clearing_the_maze_completes_the_level() {
    let mut game = common::seeded_game(4);
    game.change_state(GameState::Hunting).unwrap();
    let world = game.world().clone();
    let last = IVec2::new(1, 4);
    let food: Vec<IVec2> = game.level().remaining_food(&world).filter(|&tile| tile != last).collect();
    for tile in food {
        game.level_mut().eat(&world, tile);
    }
    assert_eq!(game.level().food_remaining(), 1);

    let pac = game.pac_mut();
    pac.body.place_at(IVec2::new(2, 4), 0.0, 0.0);
    pac.body.set_direction(Direction::Left);

    common::tick_until(&mut game, 30, |game| game.state() == GameState::LevelComplete)
        .expect("level should complete");
    assert_eq!(game.bonus().state, BonusState::Inactive);

    let flashes = game.level().data.maze_flashes as u64;
    common::tick_until(&mut game, durations::LEVEL_COMPLETE_PAUSE + flashes * durations::MAZE_FLASH + 2, |game| {
        game.state() == GameState::Ready
    })
    .expect("next level should start");
    assert_eq!(game.level().number, 2);
    assert_eq!(game.level().food_remaining(), world.food_count());
    assert_eq!(game.state_timer().duration(), durations::READY);
}

#[test]
fn test_extra_life_awarded_once() {
    let config = GameConfig {
        extra_life_score: 100,
        pac_immune: true,
        rng_seed: Some(4),
        ..GameConfig::default()
    };
    let mut game = Game::new(config, common::classic_world(), EventQueue::new());
    game.change_state(GameState::Hunting).unwrap();
    let pac = game.pac_mut();
    pac.body.place_at(IVec2::new(1, 8), 0.0, 0.0);
    pac.body.set_direction(Direction::Right);

    common::tick_until(&mut game, 600, |game| game.score().points >= 200).expect("pac should eat");
    assert_eq!(game.score().lives, 4);
    let awards = game
        .sink()
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::ExtraLife { .. }))
        .count();
    assert_eq!(awards, 1);
}

#[test]
fn test_demo_plays_without_dying() {
    let mut game = common::demo_game(77);
    for _ in 0..6000 {
        game.tick().unwrap();
        assert_that(&game.state()).is_not_equal_to(GameState::PacmanDying);
    }
    assert_that(&game.score().points).is_greater_than(0);
    assert_that(&game.level().eaten_count()).is_greater_than(0);
}

#[test]
fn test_ms_pacman_variant_has_no_upward_block() {
    let config = GameConfig {
        variant: GameVariant::MsPacMan,
        rng_seed: Some(1),
        ..GameConfig::default()
    };
    let game = Game::new(config, common::classic_world(), EventQueue::new());
    assert_that(&game.world().is_upward_blocked(IVec2::new(12, 26))).is_false();
}

fn immune_hunting_game(seed: u64) -> Game<EventQueue> {
    let config = GameConfig {
        pac_immune: true,
        rng_seed: Some(seed),
        ..GameConfig::default()
    };
    let mut game = Game::new(config, common::classic_world(), EventQueue::new());
    game.change_state(GameState::Hunting).unwrap();
    game
}

#[test]
fn test_phase_flip_reverses_hunting_ghosts() {
    let mut game = immune_hunting_game(6);
    let scatter = game.hunting_schedule().timer().duration();
    for _ in 0..scatter - 1 {
        game.tick().unwrap();
    }
    assert_eq!(game.hunting_schedule().phase(), 0);
    game.sink_mut().drain();

    let before: Vec<_> = game
        .ghosts()
        .iter()
        .filter(|ghost| ghost.is(GhostState::Hunting))
        .map(|ghost| (ghost.id, ghost.body.dir))
        .collect();
    assert_that(&before.is_empty()).is_false();

    game.tick().unwrap();
    assert_eq!(game.hunting_schedule().phase(), 1);
    assert_eq!(game.hunting_schedule().mode(), HuntingMode::Chase);
    assert_that(&game.sink().events().contains(&GameEvent::ChasingPhaseStarted { phase: 1 })).is_true();

    // The forced reversal is taken on the very move of the flip tick
    for (id, dir) in before {
        let ghost = game.ghost(id);
        assert_eq!(ghost.body.dir, dir.opposite());
        assert_that(&ghost.body.forced_direction).is_false();
    }
}

#[test]
fn test_power_pauses_the_phase_timer() {
    let mut game = immune_hunting_game(6);
    common::tick_until(&mut game, 1000, |game| game.hunting_schedule().phase() == 1).expect("chase should start");
    for _ in 0..100 {
        game.tick().unwrap();
    }

    let energizer = IVec2::new(26, 26);
    let pac = game.pac_mut();
    pac.body.place_at(energizer, 4.0, 0.0);
    pac.body.set_direction(Direction::Left);
    game.tick().unwrap();
    assert_that(&game.pac().has_power()).is_true();

    let elapsed = game.hunting_schedule().timer().elapsed();
    let mut power_ticks = 0;
    while game.pac().has_power() && power_ticks < 5000 {
        game.tick().unwrap();
        power_ticks += 1;
        assert_eq!(game.hunting_schedule().phase(), 1);
        assert_eq!(game.hunting_schedule().timer().elapsed(), elapsed);
    }
    assert_that(&power_ticks).is_greater_than_or_equal_to(sec_to_ticks(game.level().data.frightened_seconds));

    game.tick().unwrap();
    assert_eq!(game.hunting_schedule().phase(), 1);
    assert_eq!(game.hunting_schedule().timer().elapsed(), elapsed + 1);
    for ghost in game.ghosts() {
        assert_that(&ghost.is(GhostState::Frightened)).is_false();
    }
}
