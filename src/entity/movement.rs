//! The movement kernel shared by Pac-Man, the ghosts and the bonus.

use glam::IVec2;
use tracing::trace;

use crate::constants::BASE_PIXELS_PER_TICK;
use crate::entity::body::MobileBody;
use crate::map::direction::Direction;
use crate::map::world::World;

/// Narrow capability interface the movement kernel and the selector work through.
pub trait Mover {
    fn body(&self) -> &MobileBody;

    fn body_mut(&mut self) -> &mut MobileBody;

    /// Whether this creature may occupy the tile in its current state.
    fn can_access(&self, world: &World, tile: IVec2) -> bool;

    /// Hunting ghosts may not choose to turn up on upward-blocked tiles.
    fn respects_upward_block(&self) -> bool {
        false
    }
}

fn blocked(body: &mut MobileBody) -> bool {
    body.could_move = false;
    body.changed_tile = false;
    false
}

/// Attempts to move one tick's worth of pixels in `dir`.
///
/// Returns whether the creature moved. `could_move` and `changed_tile` are updated
/// either way.
pub fn try_move<M: Mover + ?Sized>(mover: &mut M, world: &World, dir: Direction) -> bool {
    let tile = mover.body().tile();
    let pixels = mover.body().speed * BASE_PIXELS_PER_TICK;

    if let Some(partner) = world.portal_partner(tile) {
        let outward = if tile.x < 0 { Direction::Left } else { Direction::Right };
        if dir == outward {
            let body = mover.body_mut();
            body.place_at(partner, 0.0, 0.0);
            body.changed_tile = true;
            trace!(from = ?tile, to = ?partner, "Portal jump");
            return true;
        }
    }

    let ahead = tile + dir.as_ivec2();
    let ahead_accessible = mover.can_access(world, ahead);
    let tile_origin = World::tile_position(tile);
    let body = mover.body_mut();

    if body.forced_on_track && ahead_accessible {
        let offset = body.offset();
        if dir.is_horizontal() {
            if offset.y > pixels {
                return blocked(body);
            }
            body.position.y = tile_origin.y;
        } else {
            if offset.x > pixels {
                return blocked(body);
            }
            body.position.x = tile_origin.x;
        }
    }

    if !ahead_accessible {
        // Stop flush against the wall edge
        let along = if dir.is_horizontal() { body.offset().x } else { body.offset().y };
        if along <= 0.0 {
            return blocked(body);
        }
        match dir {
            Direction::Left => body.position.x = (body.position.x - pixels).max(tile_origin.x),
            Direction::Up => body.position.y = (body.position.y - pixels).max(tile_origin.y),
            Direction::Right => {
                body.position.x = tile_origin.x;
                return blocked(body);
            }
            Direction::Down => {
                body.position.y = tile_origin.y;
                return blocked(body);
            }
        }
        body.could_move = true;
        body.changed_tile = false;
        return true;
    }

    let new_position = body.position + dir.as_ivec2().as_vec2() * pixels;
    let new_tile = (new_position / crate::constants::TILE_SIZE).floor().as_ivec2();
    if new_tile != tile && new_tile != ahead {
        // Never skip a tile, whatever the speed
        return blocked(body);
    }

    body.position = new_position;
    body.could_move = true;
    body.changed_tile = new_tile != tile;
    if body.changed_tile {
        trace!(from = ?tile, to = ?new_tile, "Entered tile");
    }
    true
}

/// Moves towards `wish_dir` if possible, otherwise keeps going in the current direction.
///
/// Taking the wished direction makes it the current one. This two-step protocol is
/// what lets a creature turn slightly before it reaches a corner.
pub fn try_moving<M: Mover + ?Sized>(mover: &mut M, world: &World) -> bool {
    let wish_dir = mover.body().wish_dir;
    if try_move(mover, world, wish_dir) {
        let body = mover.body_mut();
        body.dir = wish_dir;
        body.forced_direction = false;
        return true;
    }

    let dir = mover.body().dir;
    if dir != wish_dir {
        return try_move(mover, world, dir);
    }
    false
}
