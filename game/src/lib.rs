pub extern crate serde;
pub extern crate serde_json;

mod board;
mod message;
mod state;
mod types;

pub use board::{Board, Coord, MoveError};
pub use message::{
    ClientCommand, GameSnapshot, PlayerSlots, RematchVotes, ServerEvent,
};
pub use state::{GameState, Outcome};
pub use types::{Cell, ConnectionId, Player, RoomId, COLS, ROWS};
