//! Map parsing functionality for converting raw board layouts into structured data.

use glam::{IVec2, UVec2};

use crate::error::ParseError;

/// The classification of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Path,
    PowerPellet,
    /// Both the house interior and its door.
    GhostHouse,
    Teleport,
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug)]
pub struct ParsedMap {
    pub size: UVec2,
    /// The parsed tile layout, row-major.
    pub tiles: Vec<Tile>,
    /// Tiles that start with a regular pellet.
    pub pellets: Vec<IVec2>,
    /// Tiles that start with a power pellet.
    pub power_pellets: Vec<IVec2>,
    /// The positions of the house door tiles, left to right.
    pub house_door: [IVec2; 2],
    /// The positions of the teleport tiles, if the board has a pair.
    pub tunnel_ends: Option<[IVec2; 2]>,
    pub player_start: IVec2,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a map tile.
    pub fn parse_character(c: char) -> Result<Tile, ParseError> {
        match c {
            '#' => Ok(Tile::Wall),
            '.' | ' ' | '0' => Ok(Tile::Path),
            'o' => Ok(Tile::PowerPellet),
            'T' => Ok(Tile::Teleport),
            '=' | 'H' => Ok(Tile::GhostHouse),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board contains unknown characters, has rows of differing width,
    /// lacks a player start, has an unpaired teleport, or if the house door is not defined
    /// by exactly two '=' characters.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let width = raw_board.first().map(|row| row.chars().count()).ok_or(ParseError::EmptyBoard)?;
        if width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut tiles = Vec::with_capacity(width * raw_board.len());
        let mut pellets = Vec::new();
        let mut power_pellets = Vec::new();
        let mut house_door = Vec::with_capacity(2);
        let mut tunnel_ends = Vec::with_capacity(2);
        let mut player_start = None;

        for (y, line) in raw_board.iter().enumerate() {
            let row_width = line.chars().count();
            if row_width != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    width: row_width,
                    expected: width,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let position = IVec2::new(x as i32, y as i32);

                match character {
                    '.' => pellets.push(position),
                    'o' => power_pellets.push(position),
                    '=' => house_door.push(position),
                    'T' => tunnel_ends.push(position),
                    '0' => player_start = Some(position),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        let house_door: [IVec2; 2] = house_door
            .as_slice()
            .try_into()
            .map_err(|_| ParseError::InvalidHouseDoorCount(house_door.len()))?;

        let tunnel_ends = match tunnel_ends.as_slice() {
            [] => None,
            [a, b] => Some([*a, *b]),
            other => return Err(ParseError::InvalidTeleportCount(other.len())),
        };

        Ok(ParsedMap {
            size: UVec2::new(width as u32, raw_board.len() as u32),
            tiles,
            pellets,
            power_pellets,
            house_door,
            tunnel_ends,
            player_start: player_start.ok_or(ParseError::MissingPlayerStart)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BOARD_CELL_SIZE, RAW_BOARD};

    #[test]
    fn test_parse_character() {
        assert_eq!(MapTileParser::parse_character('#'), Ok(Tile::Wall));
        assert_eq!(MapTileParser::parse_character('.'), Ok(Tile::Path));
        assert_eq!(MapTileParser::parse_character(' '), Ok(Tile::Path));
        assert_eq!(MapTileParser::parse_character('0'), Ok(Tile::Path));
        assert_eq!(MapTileParser::parse_character('o'), Ok(Tile::PowerPellet));
        assert_eq!(MapTileParser::parse_character('T'), Ok(Tile::Teleport));
        assert_eq!(MapTileParser::parse_character('='), Ok(Tile::GhostHouse));
        assert_eq!(MapTileParser::parse_character('H'), Ok(Tile::GhostHouse));

        assert_eq!(MapTileParser::parse_character('Z'), Err(ParseError::UnknownCharacter('Z')));
    }

    #[test]
    fn test_parse_board() {
        let parsed = MapTileParser::parse_board(&RAW_BOARD).unwrap();

        assert_eq!(parsed.size, BOARD_CELL_SIZE);
        assert_eq!(parsed.tiles.len(), (BOARD_CELL_SIZE.x * BOARD_CELL_SIZE.y) as usize);
        assert_eq!(parsed.house_door, [IVec2::new(13, 12), IVec2::new(14, 12)]);
        assert_eq!(parsed.tunnel_ends, Some([IVec2::new(0, 14), IVec2::new(27, 14)]));
        assert_eq!(parsed.player_start, IVec2::new(13, 23));
        assert_eq!(parsed.power_pellets.len(), 4);
        assert!(!parsed.pellets.is_empty());
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
        let board = ["#####", "#0==#", "####"];
        let result = MapTileParser::parse_board(&board);
        assert!(matches!(result, Err(ParseError::RaggedRow { row: 2, width: 4, expected: 5 })));
    }

    #[test]
    fn test_parse_board_house_door_count() {
        let board = ["#####", "#0=.#", "#####"];
        let result = MapTileParser::parse_board(&board);
        assert!(matches!(result, Err(ParseError::InvalidHouseDoorCount(1))));
    }

    #[test]
    fn test_parse_board_unpaired_teleport() {
        let board = ["#####", "T0==#", "#####"];
        let result = MapTileParser::parse_board(&board);
        assert!(matches!(result, Err(ParseError::InvalidTeleportCount(1))));
    }

    #[test]
    fn test_parse_board_missing_player_start() {
        let board = ["#####", "#.==#", "#####"];
        let result = MapTileParser::parse_board(&board);
        assert!(matches!(result, Err(ParseError::MissingPlayerStart)));
    }

    #[test]
    fn test_parse_board_empty() {
        let result = MapTileParser::parse_board(&[]);
        assert!(matches!(result, Err(ParseError::EmptyBoard)));
    }
}
