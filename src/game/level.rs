//! Per-level parameters and the food eaten so far.

use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::GameVariant;
use crate::entity::bonus::BonusSymbol;
use crate::map::world::World;

/// Parameters of a single level, speeds relative to [`crate::constants::BASE_PIXELS_PER_TICK`].
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    pub bonus_symbol: BonusSymbol,
    pub bonus_points: u32,
    pub pac_speed: f32,
    pub ghost_speed: f32,
    pub ghost_tunnel_speed: f32,
    pub elroy1_dots_left: usize,
    pub elroy1_speed: f32,
    pub elroy2_dots_left: usize,
    pub elroy2_speed: f32,
    pub pac_powered_speed: f32,
    pub ghost_frightened_speed: f32,
    pub frightened_seconds: u32,
    pub maze_flashes: u32,
}

struct LevelRow(BonusSymbol, u32, [u8; 3], [u8; 4], [u8; 2], u32, u32);

use BonusSymbol::*;

#[rustfmt::skip]
const LEVELS: [LevelRow; 21] = [
    LevelRow(Cherries,    100, [ 80, 75, 40], [ 20,  80, 10,  85], [ 90, 50], 6, 5),
    LevelRow(Strawberry,  300, [ 90, 85, 45], [ 30,  90, 15,  95], [ 95, 55], 5, 5),
    LevelRow(Peach,       500, [ 90, 85, 45], [ 40,  90, 20,  95], [ 95, 55], 4, 5),
    LevelRow(Peach,       500, [ 90, 85, 45], [ 40,  90, 20,  95], [ 95, 55], 3, 5),
    LevelRow(Apple,       700, [100, 95, 50], [ 40, 100, 20, 105], [100, 60], 2, 5),
    LevelRow(Apple,       700, [100, 95, 50], [ 50, 100, 25, 105], [100, 60], 5, 5),
    LevelRow(Grapes,     1000, [100, 95, 50], [ 50, 100, 25, 105], [100, 60], 2, 5),
    LevelRow(Grapes,     1000, [100, 95, 50], [ 50, 100, 25, 105], [100, 60], 2, 5),
    LevelRow(Galaxian,   2000, [100, 95, 50], [ 60, 100, 30, 105], [100, 60], 1, 3),
    LevelRow(Galaxian,   2000, [100, 95, 50], [ 60, 100, 30, 105], [100, 60], 5, 5),
    LevelRow(Bell,       3000, [100, 95, 50], [ 60, 100, 30, 105], [100, 60], 2, 5),
    LevelRow(Bell,       3000, [100, 95, 50], [ 80, 100, 40, 105], [100, 60], 1, 3),
    LevelRow(Key,        5000, [100, 95, 50], [ 80, 100, 40, 105], [100, 60], 1, 3),
    LevelRow(Key,        5000, [100, 95, 50], [ 80, 100, 40, 105], [100, 60], 3, 5),
    LevelRow(Key,        5000, [100, 95, 50], [100, 100, 50, 105], [100, 60], 1, 3),
    LevelRow(Key,        5000, [100, 95, 50], [100, 100, 50, 105], [100, 60], 1, 3),
    LevelRow(Key,        5000, [100, 95, 50], [100, 100, 50, 105], [100, 60], 0, 0),
    LevelRow(Key,        5000, [100, 95, 50], [100, 100, 50, 105], [100, 60], 1, 3),
    LevelRow(Key,        5000, [100, 95, 50], [120, 100, 60, 105], [100, 60], 0, 0),
    LevelRow(Key,        5000, [100, 95, 50], [120, 100, 60, 105], [100, 60], 0, 0),
    LevelRow(Key,        5000, [ 90, 95, 50], [120, 100, 60, 105], [100, 60], 0, 0),
];

/// Ms. Pac-Man's bonus symbols for levels 1 to 7; later levels pick one at random.
const MS_PACMAN_BONUS: [(BonusSymbol, u32); 7] = [
    (Cherries, 100),
    (Strawberry, 200),
    (Orange, 500),
    (Pretzel, 700),
    (Apple, 1000),
    (Pear, 2000),
    (Banana, 5000),
];

fn percent(value: u8) -> f32 {
    value as f32 / 100.0
}

impl LevelData {
    /// Parameters for a level number starting at 1. Levels past the table reuse its last row.
    pub fn for_level(number: u32) -> Self {
        let index = (number.max(1) as usize - 1).min(LEVELS.len() - 1);
        let LevelRow(symbol, points, [pac, ghost, tunnel], [elroy1_dots, elroy1, elroy2_dots, elroy2], [powered, frightened], seconds, flashes) =
            &LEVELS[index];
        Self {
            bonus_symbol: *symbol,
            bonus_points: *points,
            pac_speed: percent(*pac),
            ghost_speed: percent(*ghost),
            ghost_tunnel_speed: percent(*tunnel),
            elroy1_dots_left: *elroy1_dots as usize,
            elroy1_speed: percent(*elroy1),
            elroy2_dots_left: *elroy2_dots as usize,
            elroy2_speed: percent(*elroy2),
            pac_powered_speed: percent(*powered),
            ghost_frightened_speed: percent(*frightened),
            frightened_seconds: *seconds,
            maze_flashes: *flashes,
        }
    }

    /// Same speeds, with the variant's own bonus symbol.
    pub fn for_variant(variant: GameVariant, number: u32, rng: &mut impl Rng) -> Self {
        let mut data = Self::for_level(number);
        if variant == GameVariant::MsPacMan {
            let index = number.max(1) as usize - 1;
            let (symbol, points) = match MS_PACMAN_BONUS.get(index) {
                Some(bonus) => *bonus,
                None => *MS_PACMAN_BONUS.choose(rng).unwrap_or(&MS_PACMAN_BONUS[0]),
            };
            data.bonus_symbol = symbol;
            data.bonus_points = points;
        }
        data
    }
}

/// Progress through the current level: which food is gone and how many ghosts were eaten.
#[derive(Debug, Clone)]
pub struct Level {
    pub number: u32,
    pub data: LevelData,
    eaten: Vec<bool>,
    food_remaining: usize,
    eaten_count: usize,
    /// Ghosts eaten with the current energizer.
    pub ghosts_killed_by_energizer: u32,
    /// Ghosts eaten during the whole level.
    pub ghosts_killed: u32,
}

impl Level {
    pub fn new(number: u32, data: LevelData, world: &World) -> Self {
        let size = world.size();
        Self {
            number,
            data,
            eaten: vec![false; (size.x * size.y) as usize],
            food_remaining: world.food_count(),
            eaten_count: 0,
            ghosts_killed_by_energizer: 0,
            ghosts_killed: 0,
        }
    }

    pub fn has_food(&self, world: &World, tile: IVec2) -> bool {
        world.is_food(tile) && world.tile_index(tile).is_ok_and(|index| !self.eaten[index])
    }

    /// Removes the food on `tile`. Returns whether it was an energizer, `None` if there was no food.
    pub fn eat(&mut self, world: &World, tile: IVec2) -> Option<bool> {
        if !self.has_food(world, tile) {
            return None;
        }
        let index = world.tile_index(tile).ok()?;
        self.eaten[index] = true;
        self.food_remaining -= 1;
        self.eaten_count += 1;
        Some(world.is_energizer(tile))
    }

    pub fn food_remaining(&self) -> usize {
        self.food_remaining
    }

    /// Food eaten so far in this level.
    pub fn eaten_count(&self) -> usize {
        self.eaten_count
    }

    /// Tiles still holding food.
    pub fn remaining_food<'a>(&'a self, world: &'a World) -> impl Iterator<Item = IVec2> + 'a {
        world.food_tiles().filter(move |&tile| self.has_food(world, tile))
    }
}
