use serde::{Deserialize, Serialize};

pub type ConnectionId = u32;
pub type RoomId = u32;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// A player slot within a room, fixed for the room's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    One,
    Two,
}

impl Cell {
    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::One => 1,
            Cell::Two => 2,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::One,
            Player::Two => Cell::Two,
        }
    }
}
