//! The immutable per-level grid world.
//!
//! A [`World`] is built once from a [`ParsedMap`] and never mutated afterwards. Food
//! that Pac-Man eats is tracked by [`crate::game::level::Level`], not here.

use std::collections::VecDeque;

use bitflags::bitflags;
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{tiles, HALF_TILE, RAW_BOARD, TILE_SIZE};
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::{MapTile, MapTileParser, ParsedMap, Portal};

bitflags! {
    /// Static classification of a single tile.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        const WALL = 1 << 0;
        const DOOR = 1 << 1;
        const TUNNEL = 1 << 2;
        const FOOD = 1 << 3;
        const ENERGIZER = 1 << 4;
        const INTERSECTION = 1 << 5;
        const HOUSE = 1 << 6;
    }
}

/// The coarse kind of a tile, as seen by movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Floor,
    Tunnel,
    Door,
}

/// Geometry of the ghost house, derived from the door position.
#[derive(Debug, Clone, PartialEq)]
pub struct House {
    /// The two door tiles.
    pub door: [IVec2; 2],
    /// The tile directly above the left door tile.
    pub entry: IVec2,
    /// Left, center and right seat tiles inside the house.
    pub seats: [IVec2; 3],
}

impl House {
    fn from_door(door: [IVec2; 2]) -> Self {
        let entry = door[0] + Direction::Up.as_ivec2();
        let center = door[0] + IVec2::new(0, 2);
        Self {
            door,
            entry,
            seats: [center - IVec2::new(2, 0), center, center + IVec2::new(2, 0)],
        }
    }

    /// Pixel position of a creature standing on the house entry, centered over the door.
    pub fn entry_position(&self) -> Vec2 {
        World::tile_position(self.entry) + Vec2::new(HALF_TILE, 0.0)
    }

    /// Pixel position of a creature sitting on the given seat.
    pub fn seat_position(&self, seat: usize) -> Vec2 {
        World::tile_position(self.seats[seat]) + Vec2::new(HALF_TILE, 0.0)
    }
}

/// The static map of a level.
#[derive(Debug, Clone)]
pub struct World {
    size: IVec2,
    flags: Vec<TileFlags>,
    portals: SmallVec<[Portal; 2]>,
    house: House,
    upward_blocked: SmallVec<[IVec2; 4]>,
    food_count: usize,
}

impl World {
    /// Builds a world from an already validated map.
    pub fn new(parsed: &ParsedMap) -> Self {
        let size = parsed.size;
        let mut flags: Vec<TileFlags> = parsed
            .tiles
            .iter()
            .map(|tile| match tile {
                MapTile::Wall => TileFlags::WALL,
                MapTile::Door => TileFlags::DOOR,
                MapTile::Tunnel => TileFlags::TUNNEL,
                MapTile::Pellet => TileFlags::FOOD,
                MapTile::Energizer => TileFlags::FOOD | TileFlags::ENERGIZER,
                MapTile::Floor => TileFlags::empty(),
            })
            .collect();

        let house = House::from_door(parsed.house_door);
        let mut world = Self {
            size,
            food_count: flags.iter().filter(|f| f.contains(TileFlags::FOOD)).count(),
            flags: Vec::new(),
            portals: parsed.portals.iter().copied().collect(),
            house,
            upward_blocked: SmallVec::new(),
        };

        // Flood the house interior starting below the door, never crossing walls or the door
        let mut queue = VecDeque::from([parsed.house_door[0] + Direction::Down.as_ivec2()]);
        while let Some(tile) = queue.pop_front() {
            let Some(index) = world.index(tile) else { continue };
            if flags[index].intersects(TileFlags::WALL | TileFlags::DOOR | TileFlags::HOUSE) {
                continue;
            }
            flags[index] |= TileFlags::HOUSE;
            queue.extend(Direction::DIRECTIONS.iter().map(|dir| tile + dir.as_ivec2()));
        }
        world.flags = flags;

        let intersections: Vec<usize> = world
            .tiles()
            .filter(|&tile| world.counts_as_intersection(tile))
            .filter_map(|tile| world.index(tile))
            .collect();
        for index in intersections {
            world.flags[index] |= TileFlags::INTERSECTION;
        }

        debug!(
            size = ?world.size,
            food = world.food_count,
            portals = world.portals.len(),
            "World built"
        );
        world
    }

    /// Builds the classic Pac-Man world, including the upward-blocked tiles.
    pub fn classic() -> GameResult<Self> {
        let parsed = MapTileParser::parse_board(&RAW_BOARD)?;
        Ok(Self::new(&parsed).with_upward_blocked(&tiles::UPWARD_BLOCKED))
    }

    /// Declares tiles where hunting ghosts may not turn upwards.
    pub fn with_upward_blocked(mut self, blocked: &[IVec2]) -> Self {
        self.upward_blocked = blocked.iter().copied().collect();
        self
    }

    fn counts_as_intersection(&self, tile: IVec2) -> bool {
        if !self.is_accessible(tile, false) || self.is_house_interior(tile) || self.is_portal(tile) {
            return false;
        }
        Direction::DIRECTIONS
            .iter()
            .filter(|dir| self.is_accessible(tile + dir.as_ivec2(), false))
            .count()
            >= 3
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        self.contains(tile).then(|| (tile.y * self.size.x + tile.x) as usize)
    }

    fn flags(&self, tile: IVec2) -> TileFlags {
        self.index(tile).map_or(TileFlags::empty(), |index| self.flags[index])
    }

    /// Row-major index of a tile inside the board.
    pub fn tile_index(&self, tile: IVec2) -> GameResult<usize> {
        Ok(self.index(tile).ok_or(MapError::OutOfBounds(tile))?)
    }

    /// The top-left pixel position of a tile.
    pub fn tile_position(tile: IVec2) -> Vec2 {
        tile.as_vec2() * TILE_SIZE
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// Iterates over all board tiles, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.size.y).flat_map(move |y| (0..self.size.x).map(move |x| IVec2::new(x, y)))
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.size.x && tile.y < self.size.y
    }

    /// Classifies a tile, failing for tiles outside the board.
    pub fn tile_kind(&self, tile: IVec2) -> GameResult<TileKind> {
        let flags = self.flags[self.tile_index(tile)?];
        Ok(if flags.contains(TileFlags::WALL) {
            TileKind::Wall
        } else if flags.contains(TileFlags::DOOR) {
            TileKind::Door
        } else if flags.contains(TileFlags::TUNNEL) {
            TileKind::Tunnel
        } else {
            TileKind::Floor
        })
    }

    /// Whether a creature may occupy the tile.
    ///
    /// Walls always block, the door only lets through ghosts that are entering or
    /// leaving the house (`door_open`), and portal tiles are always accessible.
    pub fn is_accessible(&self, tile: IVec2, door_open: bool) -> bool {
        if self.is_portal(tile) {
            return true;
        }
        if !self.contains(tile) {
            return false;
        }
        let flags = self.flags(tile);
        if flags.contains(TileFlags::WALL) {
            return false;
        }
        if flags.contains(TileFlags::DOOR) {
            return door_open;
        }
        true
    }

    pub fn is_wall(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::WALL)
    }

    pub fn is_door(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::DOOR)
    }

    pub fn is_tunnel(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::TUNNEL)
    }

    pub fn is_intersection(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::INTERSECTION)
    }

    pub fn is_house_interior(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::HOUSE)
    }

    /// Whether the tile initially holds a pellet or an energizer.
    pub fn is_food(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::FOOD)
    }

    pub fn is_energizer(&self, tile: IVec2) -> bool {
        self.flags(tile).contains(TileFlags::ENERGIZER)
    }

    pub fn is_upward_blocked(&self, tile: IVec2) -> bool {
        self.upward_blocked.contains(&tile)
    }

    pub fn is_portal(&self, tile: IVec2) -> bool {
        self.portal_partner(tile).is_some()
    }

    /// The tile on the other side of a portal.
    pub fn portal_partner(&self, tile: IVec2) -> Option<IVec2> {
        self.portals.iter().find_map(|portal| {
            if portal.left == tile {
                Some(portal.right)
            } else if portal.right == tile {
                Some(portal.left)
            } else {
                None
            }
        })
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    /// Number of food tiles (pellets and energizers) in a fresh maze.
    pub fn food_count(&self) -> usize {
        self.food_count
    }

    /// Iterates over all tiles that initially hold food.
    pub fn food_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles().filter(move |&tile| self.is_food(tile))
    }
}
