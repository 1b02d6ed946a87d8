//! Map parsing functionality for converting raw board layouts into structured data.
//!
//! This is the map supplier: it validates the character grid once, up front, so
//! that a [`crate::map::world::World`] never has to deal with malformed input.

use glam::IVec2;

use crate::error::ParseError;

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// An empty, walkable tile.
    Floor,
    /// A wall tile.
    Wall,
    /// A regular pellet (walkable).
    Pellet,
    /// An energizer (walkable).
    Energizer,
    /// A tunnel tile (walkable, slows ghosts down).
    Tunnel,
    /// A ghost house door tile.
    Door,
}

/// A pair of portal tiles just outside the left and right board edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub left: IVec2,
    pub right: IVec2,
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMap {
    /// Board size in tiles.
    pub size: IVec2,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<MapTile>,
    /// The positions of the house door tiles.
    pub house_door: [IVec2; 2],
    /// One portal per tunnel row.
    pub portals: Vec<Portal>,
}

impl ParsedMap {
    /// Returns the tile at the given position. The position must be inside the board.
    pub fn tile(&self, position: IVec2) -> MapTile {
        self.tiles[(position.y * self.size.x + position.x) as usize]
    }
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Wall),
            '.' => Ok(MapTile::Pellet),
            'o' => Ok(MapTile::Energizer),
            ' ' => Ok(MapTile::Floor),
            'T' => Ok(MapTile::Tunnel),
            '=' => Ok(MapTile::Door),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty or ragged, contains unknown characters,
    /// does not define the house door with exactly two `=` characters, or has a tunnel
    /// row that only reaches one edge of the board.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().map(|row| row.chars().count()).ok_or(ParseError::EmptyBoard)?;
        if width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut house_door = Vec::with_capacity(2);
        let mut portals = Vec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                if tile == MapTile::Door {
                    house_door.push(IVec2::new(x as i32, y as i32));
                }
                tiles.push(tile);
            }

            // Tunnels that touch the board edges form a portal pair
            let row_start = y * width;
            let left_open = tiles[row_start] == MapTile::Tunnel;
            let right_open = tiles[row_start + width - 1] == MapTile::Tunnel;
            match (left_open, right_open) {
                (true, true) => portals.push(Portal {
                    left: IVec2::new(-1, y as i32),
                    right: IVec2::new(width as i32, y as i32),
                }),
                (false, false) => {}
                _ => return Err(ParseError::UnpairedTunnel(y as i32)),
            }
        }

        let house_door: [IVec2; 2] = house_door
            .as_slice()
            .try_into()
            .map_err(|_| ParseError::InvalidHouseDoorCount(house_door.len()))?;

        Ok(ParsedMap {
            size: IVec2::new(width as i32, raw_board.len() as i32),
            tiles,
            house_door,
            portals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BOARD_TILES, RAW_BOARD};

    #[test]
    fn test_parse_character() {
        assert_eq!(MapTileParser::parse_character('#'), Ok(MapTile::Wall));
        assert_eq!(MapTileParser::parse_character('.'), Ok(MapTile::Pellet));
        assert_eq!(MapTileParser::parse_character('o'), Ok(MapTile::Energizer));
        assert_eq!(MapTileParser::parse_character(' '), Ok(MapTile::Floor));
        assert_eq!(MapTileParser::parse_character('T'), Ok(MapTile::Tunnel));
        assert_eq!(MapTileParser::parse_character('='), Ok(MapTile::Door));
        assert_eq!(MapTileParser::parse_character('Z'), Err(ParseError::UnknownCharacter('Z')));
    }

    #[test]
    fn test_parse_classic_board() {
        let parsed = MapTileParser::parse_board(&RAW_BOARD).unwrap();

        assert_eq!(parsed.size, BOARD_TILES);
        assert_eq!(parsed.tiles.len(), (BOARD_TILES.x * BOARD_TILES.y) as usize);
        assert_eq!(parsed.house_door, [IVec2::new(13, 15), IVec2::new(14, 15)]);
        assert_eq!(
            parsed.portals,
            vec![Portal {
                left: IVec2::new(-1, 17),
                right: IVec2::new(28, 17),
            }]
        );
        assert_eq!(parsed.tile(IVec2::new(1, 6)), MapTile::Energizer);
    }

    #[test]
    fn test_parse_board_invalid_character() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[0] = "###########################Z";

        let result = MapTileParser::parse_board(&invalid_board);
        assert!(matches!(result, Err(ParseError::UnknownCharacter('Z'))));
    }

    #[test]
    fn test_parse_board_ragged_row() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[4] = "#....#";

        let result = MapTileParser::parse_board(&invalid_board);
        assert!(matches!(result, Err(ParseError::RaggedRow { row: 4, .. })));
    }

    #[test]
    fn test_parse_board_missing_door() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[15] = "######.## ######## ##.######";

        let result = MapTileParser::parse_board(&invalid_board);
        assert!(matches!(result, Err(ParseError::InvalidHouseDoorCount(0))));
    }

    #[test]
    fn test_parse_board_unpaired_tunnel() {
        let mut invalid_board = RAW_BOARD;
        invalid_board[17] = "TTTTTT.   #      #   .     #";

        let result = MapTileParser::parse_board(&invalid_board);
        assert!(matches!(result, Err(ParseError::UnpairedTunnel(17))));
    }

    #[test]
    fn test_parse_empty_board() {
        assert!(matches!(MapTileParser::parse_board(&[]), Err(ParseError::EmptyBoard)));
    }
}
