// Board state model
//
// A BoardState is a plain value: both token positions, both wall inventories and
// the two edge-blocked grids. The search copies it on every branch and mutates
// only its own copy, so there is no undo stack anywhere in the engine.

use log::error;
use std::fmt;

use crate::types::{
    Action, Coord, Direction, GameState, Orientation, Side, WallPlacement, BOARD_SIZE,
    MAX_WALL_LENGTH,
};

const N: usize = BOARD_SIZE as usize;

/// Most walls of one length a snapshot may hand a side
pub const MAX_WALLS_PER_LENGTH: u8 = 20;

/// Snapshot of everything the engine needs to reason about a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    tokens: [Coord; 2],
    wall_counts: [[u8; 3]; 2],
    walls_remaining: [u8; 2],
    /// `horizontal[y][x]` blocks the edge between (x, y) and (x, y + 1)
    horizontal: [[bool; N]; N - 1],
    /// `vertical[y][x]` blocks the edge between (x, y) and (x + 1, y)
    vertical: [[bool; N - 1]; N],
}

impl BoardState {
    /// Fresh game: tokens on their start tiles, no walls on the board
    pub fn new_game(wall_inventory: [u8; 3]) -> Self {
        BoardState {
            tokens: [Side::One.start_position(), Side::Two.start_position()],
            wall_counts: [wall_inventory, wall_inventory],
            walls_remaining: [Self::sum(&wall_inventory); 2],
            horizontal: [[false; N]; N - 1],
            vertical: [[false; N - 1]; N],
        }
    }

    /// Builds a state from explicit token positions and inventories, with an empty board
    pub fn with_tokens(one: Coord, two: Coord, inventories: [[u8; 3]; 2]) -> Self {
        BoardState {
            tokens: [one, two],
            wall_counts: inventories,
            walls_remaining: [Self::sum(&inventories[0]), Self::sum(&inventories[1])],
            horizontal: [[false; N]; N - 1],
            vertical: [[false; N - 1]; N],
        }
    }

    /// Captures the live game into a value the search can copy freely
    ///
    /// Placed walls are marked on the grids without touching inventories; the
    /// inventories come straight from the snapshot.
    pub fn snapshot(game: &GameState) -> Result<Self, String> {
        let mut tokens = [Coord::new(0, 0); 2];
        let mut inventories = [[0u8; 3]; 2];

        for side in Side::both() {
            let player = game
                .player(side)
                .ok_or_else(|| format!("Snapshot is missing side {}", side))?;

            if !player.position.in_bounds() {
                return Err(format!(
                    "Side {} token {} is out of bounds",
                    side, player.position
                ));
            }

            if let Some(count) = player.walls.iter().find(|&&n| n > MAX_WALLS_PER_LENGTH) {
                return Err(format!(
                    "Side {} holds {} walls of one length (max {})",
                    side, count, MAX_WALLS_PER_LENGTH
                ));
            }

            tokens[side.index()] = player.position;
            inventories[side.index()] = player.walls;
        }

        if tokens[0] == tokens[1] {
            return Err(format!("Both tokens occupy {}", tokens[0]));
        }

        let mut state = Self::with_tokens(tokens[0], tokens[1], inventories);

        for wall in &game.walls {
            if !state.is_structurally_legal(wall) {
                return Err(format!("Placed wall {} is out of bounds or overlapping", wall));
            }
            state.mark_segments(wall);
        }

        Ok(state)
    }

    fn sum(inventory: &[u8; 3]) -> u8 {
        inventory.iter().sum()
    }

    pub fn token(&self, side: Side) -> Coord {
        self.tokens[side.index()]
    }

    /// Which side, if any, stands on `coord`
    pub fn occupant(&self, coord: Coord) -> Option<Side> {
        Side::both().into_iter().find(|s| self.token(*s) == coord)
    }

    /// Remaining walls of the given length (1..=3)
    pub fn wall_count(&self, side: Side, length: u8) -> u8 {
        if length == 0 || length > MAX_WALL_LENGTH {
            return 0;
        }
        self.wall_counts[side.index()][(length - 1) as usize]
    }

    pub fn walls_remaining(&self, side: Side) -> u8 {
        self.walls_remaining[side.index()]
    }

    pub fn horizontal_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= BOARD_SIZE || y < 0 || y >= BOARD_SIZE - 1 {
            return false;
        }
        self.horizontal[y as usize][x as usize]
    }

    pub fn vertical_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= BOARD_SIZE - 1 || y < 0 || y >= BOARD_SIZE {
            return false;
        }
        self.vertical[y as usize][x as usize]
    }

    /// True when stepping from `from` in `dir` crosses a wall or leaves the board
    pub fn is_edge_blocked(&self, from: Coord, dir: Direction) -> bool {
        let to = dir.apply(&from);
        if !from.in_bounds() || !to.in_bounds() {
            return true;
        }

        match dir {
            Direction::Up => self.horizontal[from.y as usize][from.x as usize],
            Direction::Down => self.horizontal[to.y as usize][to.x as usize],
            Direction::Right => self.vertical[from.y as usize][from.x as usize],
            Direction::Left => self.vertical[to.y as usize][to.x as usize],
        }
    }

    /// Overwrites the side's token coordinate
    ///
    /// Legality is the caller's job; this only writes the position.
    pub fn apply_move(&mut self, side: Side, to: Coord) {
        self.tokens[side.index()] = to;
    }

    /// Blocks every segment of `wall` and spends one wall of that length
    ///
    /// Refuses (and logs) a length outside 1..=3, an empty inventory slot, or a
    /// wall that does not fit; under correct use none of these fire.
    pub fn apply_wall(&mut self, side: Side, wall: &WallPlacement) -> bool {
        if wall.length == 0 || wall.length > MAX_WALL_LENGTH {
            error!("Refusing wall {} for side {}: invalid length", wall, side);
            return false;
        }

        let slot = (wall.length - 1) as usize;
        if self.wall_counts[side.index()][slot] == 0 {
            error!(
                "Refusing wall {} for side {}: no length-{} walls left",
                wall, side, wall.length
            );
            return false;
        }

        if !self.fits(wall) {
            error!("Refusing wall {} for side {}: out of bounds", wall, side);
            return false;
        }

        self.mark_segments(wall);
        self.wall_counts[side.index()][slot] -= 1;
        self.walls_remaining[side.index()] -= 1;
        true
    }

    /// Copy-on-branch: the state after `side` plays `action`
    pub fn after(&self, side: Side, action: &Action) -> BoardState {
        let mut next = *self;
        match action {
            Action::Move { x, y } => next.apply_move(side, Coord::new(*x, *y)),
            Action::Wall(wall) => {
                next.apply_wall(side, wall);
            }
        }
        next
    }

    /// Every wall anchor in range for the given length and orientation
    pub fn wall_anchors(length: u8, orientation: Orientation) -> impl Iterator<Item = WallPlacement> {
        let len = length as i32;
        let (max_x, max_y) = match orientation {
            Orientation::Horizontal => (BOARD_SIZE - len, BOARD_SIZE - 2),
            Orientation::Vertical => (BOARD_SIZE - 2, BOARD_SIZE - len),
        };
        (0..=max_y).flat_map(move |y| {
            (0..=max_x).map(move |x| WallPlacement::new(x, y, length, orientation))
        })
    }

    fn fits(&self, wall: &WallPlacement) -> bool {
        if wall.length == 0 || wall.length > MAX_WALL_LENGTH || wall.x < 0 || wall.y < 0 {
            return false;
        }
        let len = wall.length as i32;
        match wall.orientation {
            Orientation::Horizontal => wall.x + len <= BOARD_SIZE && wall.y < BOARD_SIZE - 1,
            Orientation::Vertical => wall.x < BOARD_SIZE - 1 && wall.y + len <= BOARD_SIZE,
        }
    }

    /// In bounds, no segment already blocked, and no straight cross through an
    /// existing perpendicular wall at any of its interior junctions
    pub fn is_structurally_legal(&self, wall: &WallPlacement) -> bool {
        if !self.fits(wall) {
            return false;
        }

        let len = wall.length as i32;
        match wall.orientation {
            Orientation::Horizontal => {
                let y = wall.y;
                if (0..len).any(|i| self.horizontal_blocked(wall.x + i, y)) {
                    return false;
                }
                // Junction between segment i-1 and i sits on the column line right of x+i-1
                (1..len).all(|i| {
                    let col = wall.x + i - 1;
                    !(self.vertical_blocked(col, y) && self.vertical_blocked(col, y + 1))
                })
            }
            Orientation::Vertical => {
                let x = wall.x;
                if (0..len).any(|i| self.vertical_blocked(x, wall.y + i)) {
                    return false;
                }
                (1..len).all(|i| {
                    let row = wall.y + i - 1;
                    !(self.horizontal_blocked(x, row) && self.horizontal_blocked(x + 1, row))
                })
            }
        }
    }

    /// Marks the wall's segments as blocked without touching inventories
    pub fn mark_segments(&mut self, wall: &WallPlacement) {
        for i in 0..wall.length as usize {
            match wall.orientation {
                Orientation::Horizontal => {
                    self.horizontal[wall.y as usize][wall.x as usize + i] = true
                }
                Orientation::Vertical => self.vertical[wall.y as usize + i][wall.x as usize] = true,
            }
        }
    }

    /// Blocked edges on the line a side must cross to step onto its goal row
    pub fn goal_line_blocks(&self, side: Side) -> i32 {
        let line = match side {
            Side::One => BOARD_SIZE - 2,
            Side::Two => 0,
        };
        (0..BOARD_SIZE)
            .filter(|&x| self.horizontal_blocked(x, line))
            .count() as i32
    }
}

impl fmt::Display for BoardState {
    /// ASCII board, top row first. `1`/`2` are tokens, `-` and `|` are walls.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..BOARD_SIZE).rev() {
            let mut row = String::new();
            for x in 0..BOARD_SIZE {
                let c = Coord::new(x, y);
                row.push(match self.occupant(c) {
                    Some(Side::One) => '1',
                    Some(Side::Two) => '2',
                    None => '.',
                });
                if x < BOARD_SIZE - 1 {
                    row.push(if self.vertical_blocked(x, y) { '|' } else { ' ' });
                }
            }
            writeln!(f, "{} {}", y, row)?;

            if y > 0 {
                let mut line = String::from("  ");
                for x in 0..BOARD_SIZE {
                    line.push(if self.horizontal_blocked(x, y - 1) { '-' } else { ' ' });
                    if x < BOARD_SIZE - 1 {
                        line.push(' ');
                    }
                }
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        write!(f, "  0 1 2 3 4 5 6 7 8  walls: {} / {}", self.walls_remaining[0], self.walls_remaining[1])
    }
}
