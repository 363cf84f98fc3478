// Game boundary types
// Coordinates, sides, wall descriptors and the live-game snapshot accepted from the caller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tiles per board edge
pub const BOARD_SIZE: i32 = 9;

/// Number of tiles on the board
pub const TILE_COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// Longest wall a side may hold
pub const MAX_WALL_LENGTH: u8 = 3;

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// True when the coordinate lies on the 9x9 grid
    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }

    /// Row-major tile index; only meaningful for in-bounds coordinates
    pub fn index(&self) -> usize {
        (self.y * BOARD_SIZE + self.x) as usize
    }

    pub fn from_index(idx: usize) -> Self {
        Coord {
            x: idx as i32 % BOARD_SIZE,
            y: idx as i32 / BOARD_SIZE,
        }
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Represents the four possible movement directions for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }
}

/// One of the two competing players, numbered 1 and 2 on the wire
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn both() -> [Side; 2] {
        [Side::One, Side::Two]
    }

    /// Array slot used by every per-side table
    pub fn index(&self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Row this side must reach to win
    pub fn goal_row(&self) -> i32 {
        match self {
            Side::One => BOARD_SIZE - 1,
            Side::Two => 0,
        }
    }

    pub fn start_position(&self) -> Coord {
        match self {
            Side::One => Coord::new(BOARD_SIZE / 2, 0),
            Side::Two => Coord::new(BOARD_SIZE / 2, BOARD_SIZE - 1),
        }
    }

    /// Rows left between `coord` and this side's goal row
    pub fn rows_to_goal(&self, coord: Coord) -> i32 {
        (self.goal_row() - coord.y).abs()
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> u8 {
        match side {
            Side::One => 1,
            Side::Two => 2,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::One),
            2 => Ok(Side::Two),
            other => Err(format!("Invalid side: {} (expected 1 or 2)", other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Wall orientation
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn all() -> [Orientation; 2] {
        [Orientation::Horizontal, Orientation::Vertical]
    }
}

/// Wall descriptor: anchor tile, length in segments and orientation
///
/// A horizontal wall blocks the edges between (x+i, y) and (x+i, y+1);
/// a vertical wall blocks the edges between (x, y+i) and (x+1, y+i).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallPlacement {
    pub x: i32,
    pub y: i32,
    pub length: u8,
    pub orientation: Orientation,
}

impl WallPlacement {
    pub fn new(x: i32, y: i32, length: u8, orientation: Orientation) -> Self {
        WallPlacement {
            x,
            y,
            length,
            orientation,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }
}

impl fmt::Display for WallPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = match self.orientation {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        };
        write!(f, "{}{}@({},{})", o, self.length, self.x, self.y)
    }
}

/// A single ply: move the token or place a wall
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Move { x: i32, y: i32 },
    Wall(WallPlacement),
}

impl Action {
    pub fn move_to(coord: Coord) -> Self {
        Action::Move {
            x: coord.x,
            y: coord.y,
        }
    }

    /// Destination of a token move
    pub fn destination(&self) -> Option<Coord> {
        match self {
            Action::Move { x, y } => Some(Coord::new(*x, *y)),
            Action::Wall(_) => None,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Action::Wall(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { x, y } => write!(f, "move({},{})", x, y),
            Action::Wall(wall) => write!(f, "wall {}", wall),
        }
    }
}

/// Per-player part of the live-game snapshot
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PlayerState {
    pub side: Side,
    pub position: Coord,
    /// Remaining walls of length 1, 2 and 3
    pub walls: [u8; 3],
}

/// Live-game snapshot sent by the caller for every decision request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game_id: String,
    pub turn: u32,
    pub to_move: Side,
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub walls: Vec<WallPlacement>,
}

impl GameState {
    pub fn player(&self, side: Side) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.side == side)
    }
}
