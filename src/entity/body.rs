use glam::{IVec2, Vec2};

use crate::constants::TILE_SIZE;
use crate::map::direction::Direction;
use crate::map::world::World;

/// Position and movement bookkeeping shared by every creature.
///
/// `position` is the top-left pixel of the creature's collision square. The occupied
/// tile is `floor(position / TILE_SIZE)` and the offset inside it always stays in
/// `[0, TILE_SIZE)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileBody {
    pub position: Vec2,
    /// The direction of the last successful move.
    pub dir: Direction,
    /// The direction the creature wants to take as soon as possible.
    pub wish_dir: Direction,
    pub target_tile: Option<IVec2>,
    /// Relative speed, 1.0 being [`crate::constants::BASE_PIXELS_PER_TICK`].
    pub speed: f32,
    pub visible: bool,
    /// Result of the last movement attempt.
    pub could_move: bool,
    /// Whether the last movement entered a new tile.
    pub changed_tile: bool,
    /// The next move must take `wish_dir`, even away from an intersection.
    pub forced_direction: bool,
    /// Turns are only allowed once aligned with the tile grid.
    pub forced_on_track: bool,
}

impl Default for MobileBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            dir: Direction::Left,
            wish_dir: Direction::Left,
            target_tile: None,
            speed: 0.0,
            visible: false,
            could_move: true,
            changed_tile: false,
            forced_direction: false,
            forced_on_track: true,
        }
    }
}

impl MobileBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile(&self) -> IVec2 {
        (self.position / TILE_SIZE).floor().as_ivec2()
    }

    /// Pixel offset inside the current tile.
    pub fn offset(&self) -> Vec2 {
        self.position - World::tile_position(self.tile())
    }

    /// Places the creature on a tile with the given pixel offset and clears movement flags.
    pub fn place_at(&mut self, tile: IVec2, offset_x: f32, offset_y: f32) {
        self.position = World::tile_position(tile) + Vec2::new(offset_x, offset_y);
        self.changed_tile = false;
        self.could_move = true;
    }

    /// Sets both the current and the wished direction.
    pub fn set_direction(&mut self, dir: Direction) {
        self.dir = dir;
        self.wish_dir = dir;
    }

    /// Requests a reversal that is taken on the next move, wherever the creature is.
    pub fn reverse_asap(&mut self) {
        self.wish_dir = self.dir.opposite();
        self.forced_direction = true;
    }

    /// The tile `n` tiles ahead in the current direction.
    pub fn tiles_ahead(&self, n: i32) -> IVec2 {
        self.tile() + self.dir.as_ivec2() * n
    }
}
