//! The target-direction selector and random direction choice.

use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::entity::movement::Mover;
use crate::map::direction::Direction;
use crate::map::world::World;

/// Greedy choice of the neighbor tile closest to the mover's target tile.
///
/// Directions are evaluated in [`Direction::PRIORITY`] order and the first one wins a
/// tie. Returns `None` when the mover has no target or no candidate exists; the
/// caller decides whether to reverse or to stop.
pub fn choose_direction<M: Mover + ?Sized>(mover: &M, world: &World, exclude_reverse: bool) -> Option<Direction> {
    let body = mover.body();
    let target = body.target_tile?;
    let tile = body.tile();
    let reverse = body.dir.opposite();

    let mut best: Option<(Direction, i32)> = None;
    for dir in Direction::PRIORITY {
        if exclude_reverse && dir == reverse {
            continue;
        }
        if dir == Direction::Up && mover.respects_upward_block() && world.is_upward_blocked(tile) {
            continue;
        }
        let neighbor = tile + dir.as_ivec2();
        if !mover.can_access(world, neighbor) {
            continue;
        }
        let distance = (neighbor - target).length_squared();
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((dir, distance));
        }
    }
    best.map(|(dir, _)| dir)
}

/// Directions leading to an accessible neighbor, in [`Direction::DIRECTIONS`] order.
pub fn accessible_directions<M: Mover + ?Sized>(
    mover: &M,
    world: &World,
    excluded: &[Direction],
) -> SmallVec<[Direction; 4]> {
    let tile = mover.body().tile();
    Direction::DIRECTIONS
        .into_iter()
        .filter(|dir| !excluded.contains(dir))
        .filter(|dir| mover.can_access(world, tile + dir.as_ivec2()))
        .collect()
}

/// Picks uniformly among the accessible directions.
pub fn random_accessible_direction<M: Mover + ?Sized>(
    mover: &M,
    world: &World,
    exclude_reverse: bool,
    rng: &mut impl Rng,
) -> Option<Direction> {
    let reverse = mover.body().dir.opposite();
    let excluded: &[Direction] = if exclude_reverse { &[reverse] } else { &[] };
    accessible_directions(mover, world, excluded).choose(rng).copied()
}

/// Whether the mover is at a point where it should reconsider its direction.
pub fn at_decision_point<M: Mover + ?Sized>(mover: &M, world: &World) -> bool {
    let body = mover.body();
    !body.forced_direction && !world.is_portal(body.tile()) && (body.changed_tile || !body.could_move)
}

/// Points `wish_dir` at the target tile, reversing only when cornered.
pub fn steer_towards_target<M: Mover + ?Sized>(mover: &mut M, world: &World) {
    if !at_decision_point(&*mover, world) {
        return;
    }
    let choice = choose_direction(&*mover, world, true).or_else(|| choose_direction(&*mover, world, false));
    if let Some(dir) = choice {
        trace!(tile = ?mover.body().tile(), target = ?mover.body().target_tile, dir = dir.as_ref(), "Steering");
        mover.body_mut().wish_dir = dir;
    }
}

/// Points `wish_dir` at a random non-reversing neighbor, reversing only when cornered.
pub fn steer_randomly<M: Mover + ?Sized>(mover: &mut M, world: &World, rng: &mut impl Rng) {
    if !at_decision_point(&*mover, world) {
        return;
    }
    let choice = random_accessible_direction(&*mover, world, true, rng)
        .or_else(|| random_accessible_direction(&*mover, world, false, rng));
    if let Some(dir) = choice {
        mover.body_mut().wish_dir = dir;
    }
}
