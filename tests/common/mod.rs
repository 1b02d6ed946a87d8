#![allow(dead_code)]

use glam::IVec2;
use pacman_core::config::GameConfig;
use pacman_core::entity::ghost::{Ghost, GhostContext, GhostId, GhostState};
use pacman_core::entity::pac::Pac;
use pacman_core::events::EventQueue;
use pacman_core::game::hunting::HuntingMode;
use pacman_core::game::level::LevelData;
use pacman_core::game::Game;
use pacman_core::map::direction::Direction;
use pacman_core::map::world::World;

pub fn classic_world() -> World {
    World::classic().expect("classic maze should parse")
}

/// Pac-Man standing exactly on the top-left corner of `tile`.
pub fn pac_at(tile: IVec2, dir: Direction, speed: f32) -> Pac {
    let mut pac = Pac::new(false);
    pac.body.place_at(tile, 0.0, 0.0);
    pac.body.set_direction(dir);
    pac.body.speed = speed;
    pac
}

pub fn ghost_at(world: &World, id: GhostId, tile: IVec2, state: GhostState) -> Ghost {
    let mut ghost = Ghost::new(id, world);
    ghost.body.place_at(tile, 0.0, 0.0);
    ghost.state = state;
    ghost
}

pub fn context<'a>(world: &'a World, level: &'a LevelData, pac_tile: IVec2) -> GhostContext<'a> {
    GhostContext {
        world,
        level,
        mode: HuntingMode::Scatter,
        pac_tile,
        pac_dir: Direction::Left,
        blinky_tile: world.house().entry,
    }
}

pub fn demo_game(seed: u64) -> Game<EventQueue> {
    Game::new(GameConfig::demo(Some(seed)), classic_world(), EventQueue::new())
}

pub fn seeded_game(seed: u64) -> Game<EventQueue> {
    let config = GameConfig {
        rng_seed: Some(seed),
        ..GameConfig::default()
    };
    Game::new(config, classic_world(), EventQueue::new())
}

/// Ticks until `done` holds, at most `limit` times. Returns the ticks taken.
pub fn tick_until(game: &mut Game<EventQueue>, limit: u64, done: impl Fn(&Game<EventQueue>) -> bool) -> Option<u64> {
    for ticks in 0..limit {
        if done(game) {
            return Some(ticks);
        }
        game.tick().expect("tick should not fail");
    }
    done(game).then_some(limit)
}
