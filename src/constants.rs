//! This module contains all the constants used by the simulation.

use glam::IVec2;

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// The size of each tile, in pixels.
pub const TILE_SIZE: f32 = 8.0;
/// Half a tile, in pixels.
pub const HALF_TILE: f32 = TILE_SIZE / 2.0;

/// Pixels moved per tick at relative speed 1.0 (75 px/s at 60 Hz).
///
/// Changing [`TICKS_PER_SECOND`] requires rescaling this value to keep real-world speeds.
pub const BASE_PIXELS_PER_TICK: f32 = 1.25;

/// The size of the classic board, in tiles.
pub const BOARD_TILES: IVec2 = IVec2::new(28, 36);

/// Converts seconds into simulation ticks.
pub const fn sec_to_ticks(seconds: u32) -> u64 {
    seconds as u64 * TICKS_PER_SECOND as u64
}

/// The classic arcade maze, three header rows and two footer rows included.
///
/// Alphabet: `#` wall, `.` pellet, `o` energizer, ` ` floor, `T` tunnel, `=` ghost house door.
pub const RAW_BOARD: [&str; BOARD_TILES.y as usize] = [
    "############################",
    "############################",
    "############################",
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###==### ##.######",
    "######.## #      # ##.######",
    "TTTTTT.   #      #   .TTTTTT",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
    "############################",
    "############################",
];

/// Home tiles and fixed targets on the classic board.
pub mod tiles {
    use glam::IVec2;

    /// Pac-Man's home tile (placed half a tile to the right).
    pub const PAC_HOME: IVec2 = IVec2::new(13, 26);
    /// The tile directly above the ghost house door; Blinky's home.
    pub const HOUSE_ENTRY: IVec2 = IVec2::new(13, 14);
    pub const SEAT_LEFT: IVec2 = IVec2::new(11, 17);
    pub const SEAT_CENTER: IVec2 = IVec2::new(13, 17);
    pub const SEAT_RIGHT: IVec2 = IVec2::new(15, 17);
    /// Where the static bonus appears (placed half a tile to the right).
    pub const BONUS: IVec2 = IVec2::new(13, 20);

    pub const BLINKY_CORNER: IVec2 = IVec2::new(25, 0);
    pub const PINKY_CORNER: IVec2 = IVec2::new(2, 0);
    pub const INKY_CORNER: IVec2 = IVec2::new(27, 35);
    pub const CLYDE_CORNER: IVec2 = IVec2::new(0, 35);

    /// Tiles where hunting ghosts may not choose to move up.
    pub const UPWARD_BLOCKED: [IVec2; 4] = [
        IVec2::new(12, 14),
        IVec2::new(15, 14),
        IVec2::new(12, 26),
        IVec2::new(15, 26),
    ];
}

/// Relative speeds that do not come from the level table.
pub mod speed {
    pub const GHOST_DEAD: f32 = 2.0;
    pub const GHOST_INSIDE_HOUSE: f32 = 0.5;
    pub const BONUS_WANDERING: f32 = 0.5;
}

/// Durations of the top-level states, in ticks.
pub mod durations {
    use super::sec_to_ticks;

    pub const READY_GAME_START: u64 = sec_to_ticks(4);
    pub const READY: u64 = sec_to_ticks(2);
    pub const PACMAN_DYING: u64 = sec_to_ticks(4);
    pub const GHOST_DYING: u64 = sec_to_ticks(1);
    pub const LEVEL_COMPLETE_PAUSE: u64 = sec_to_ticks(1);
    pub const MAZE_FLASH: u64 = 30;
    pub const BONUS_EATEN: u64 = sec_to_ticks(2);
    /// Remaining power below which frightened ghosts start flashing.
    pub const POWER_FADING: u64 = sec_to_ticks(2);
    /// Minimum remaining power for the autopilot to chase a frightened ghost.
    pub const AUTOPILOT_SAFE_CHASE: u64 = sec_to_ticks(1);
    pub const PAC_REST_PELLET: u32 = 1;
    pub const PAC_REST_ENERGIZER: u32 = 3;
}

/// Point values.
pub mod points {
    pub const PELLET: u32 = 10;
    pub const ENERGIZER: u32 = 50;
    pub const FIRST_GHOST_BOUNTY: u32 = 200;
    pub const ALL_GHOSTS_BONUS: u32 = 12_000;
    /// Pellets eaten at which the bonus becomes active.
    pub const BONUS_TRIGGERS: [usize; 2] = [70, 170];
    pub const EXTRA_LIFE: u32 = 10_000;
}
