//! Rule-based steering of Pac-Man in demo mode.

use glam::IVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::durations;
use crate::entity::bonus::Bonus;
use crate::entity::ghost::{Ghost, GhostState};
use crate::entity::pac::Pac;
use crate::entity::steering::{accessible_directions, choose_direction};
use crate::game::level::Level;
use crate::map::direction::Direction;
use crate::map::world::World;

/// Everything the autopilot looks at besides Pac-Man itself.
pub struct Surroundings<'a> {
    pub world: &'a World,
    pub level: &'a Level,
    pub ghosts: &'a [Ghost],
    pub bonus: &'a Bonus,
}

impl Surroundings<'_> {
    fn hunting_ghost_at(&self, tile: IVec2) -> bool {
        self.ghosts.iter().any(|ghost| ghost.is(GhostState::Hunting) && ghost.tile() == tile)
    }
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autopilot {
    /// Tiles scanned ahead for hunting ghosts.
    pub ahead_dist: i32,
    /// Tiles scanned behind for hunting ghosts.
    pub behind_dist: i32,
    /// Manhattan distance within which frightened ghosts are chased.
    pub chase_dist: i32,
    /// Manhattan distance within which an edible bonus is collected.
    pub harvest_dist: i32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            ahead_dist: 4,
            behind_dist: 1,
            chase_dist: 10,
            harvest_dist: 20,
        }
    }
}

impl Autopilot {
    /// Sets Pac-Man's wished direction. Only acts when Pac-Man changed tile or got stuck.
    pub fn steer(&self, pac: &mut Pac, env: &Surroundings, rng: &mut impl Rng) {
        let body = &pac.body;
        if !(body.changed_tile || !body.could_move) || env.world.is_portal(body.tile()) {
            return;
        }

        let threatened_behind = self.ghost_behind(pac, env);
        if let Some(threat) = self.ghost_ahead(pac, env) {
            trace!(threat = ?threat, threatened_behind, "Autopilot escaping");
            self.escape(pac, env.world, threatened_behind, rng);
            return;
        }

        let tile = pac.tile();
        if pac.body.could_move && !env.world.is_intersection(tile) {
            return;
        }

        let target = self
            .frightened_ghost_target(pac, env)
            .or_else(|| self.bonus_target(pac, env))
            .or_else(|| self.food_target(pac, env));
        pac.body.target_tile = target;
        if target.is_none() {
            return;
        }
        let choice = choose_direction(&*pac, env.world, true).or_else(|| choose_direction(&*pac, env.world, false));
        if let Some(dir) = choice {
            trace!(tile = ?tile, target = ?target, dir = dir.as_ref(), "Autopilot steering");
            pac.body.wish_dir = dir;
        }
    }

    /// The first tile ahead with a hunting ghost on it or next to it.
    ///
    /// An uneaten energizer on the way cancels the threat: eating it comes first.
    pub fn ghost_ahead(&self, pac: &Pac, env: &Surroundings) -> Option<IVec2> {
        let dir = pac.body.dir;
        for distance in 1..=self.ahead_dist {
            let scanned = pac.body.tiles_ahead(distance);
            if !env.world.is_accessible(scanned, false) {
                break;
            }
            if env.world.is_energizer(scanned) && env.level.has_food(env.world, scanned) {
                return None;
            }
            let sides = [
                scanned,
                scanned + dir.turn_left().as_ivec2(),
                scanned + dir.turn_right().as_ivec2(),
            ];
            if let Some(&tile) = sides.iter().find(|&&tile| env.hunting_ghost_at(tile)) {
                return Some(tile);
            }
        }
        None
    }

    pub fn ghost_behind(&self, pac: &Pac, env: &Surroundings) -> bool {
        let dir = pac.body.dir.opposite();
        let start = pac.tile();
        for distance in 1..=self.behind_dist {
            let scanned = start + dir.as_ivec2() * distance;
            if !env.world.is_accessible(scanned, false) {
                break;
            }
            if env.hunting_ghost_at(scanned) {
                return true;
            }
        }
        false
    }

    fn escape(&self, pac: &mut Pac, world: &World, threatened_behind: bool, rng: &mut impl Rng) {
        let dir = pac.body.dir;
        let mut excluded: SmallVec<[Direction; 2]> = SmallVec::new();
        excluded.push(dir);
        if threatened_behind {
            excluded.push(dir.opposite());
        }
        let mut options = accessible_directions(&*pac, world, &excluded);
        options.shuffle(rng);

        let tile = pac.tile();
        let escape = options
            .iter()
            .find(|option| world.is_tunnel(tile + option.as_ivec2()))
            .or_else(|| options.first());
        if let Some(&escape) = escape {
            pac.body.wish_dir = escape;
        }
    }

    fn frightened_ghost_target(&self, pac: &Pac, env: &Surroundings) -> Option<IVec2> {
        if pac.power_ticks_left < durations::AUTOPILOT_SAFE_CHASE {
            return None;
        }
        let tile = pac.tile();
        env.ghosts
            .iter()
            .filter(|ghost| ghost.is(GhostState::Frightened))
            .map(|ghost| ghost.tile())
            .filter(|&ghost_tile| manhattan(tile, ghost_tile) <= self.chase_dist)
            .min_by_key(|&ghost_tile| manhattan(tile, ghost_tile))
    }

    fn bonus_target(&self, pac: &Pac, env: &Surroundings) -> Option<IVec2> {
        let bonus_tile = env.bonus.tile();
        (env.bonus.is_edible() && manhattan(pac.tile(), bonus_tile) <= self.harvest_dist).then_some(bonus_tile)
    }

    /// The nearest food, ties broken in favor of the tile farthest from hunting ghosts.
    ///
    /// Energizers are skipped while Pac-Man has power and other food is left.
    fn food_target(&self, pac: &Pac, env: &Surroundings) -> Option<IVec2> {
        let tile = pac.tile();
        let ghost_distance = |food: IVec2| {
            env.ghosts
                .iter()
                .filter(|ghost| ghost.is(GhostState::Hunting))
                .map(|ghost| (ghost.tile() - food).length_squared())
                .min()
                .unwrap_or(i32::MAX)
        };
        let nearest = |skip_energizers: bool| {
            env.level
                .remaining_food(env.world)
                .filter(|&food| !(skip_energizers && env.world.is_energizer(food)))
                .min_by(|&a, &b| {
                    (a - tile)
                        .length_squared()
                        .cmp(&(b - tile).length_squared())
                        .then_with(|| ghost_distance(b).cmp(&ghost_distance(a)))
                })
        };

        let skip_energizers = pac.has_power() && env.level.food_remaining() > 1;
        nearest(skip_energizers).or_else(|| nearest(false))
    }
}
