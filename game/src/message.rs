use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::types::{ConnectionId, Player, RoomId};

/// Commands a client may send over its connection. On the wire:
/// `{"type": "makeMove", "payload": {"col": 3, "room": 7}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientCommand {
    MakeMove { col: usize, room: RoomId },
    RequestRematch { room: RoomId },
}

/// Events the server pushes to clients. Variant names serialize to the
/// event names the browser client listens for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerEvent {
    WaitingForPlayer,
    GameStart {
        room: RoomId,
        players: PlayerSlots,
        #[serde(rename = "initialState")]
        initial_state: GameSnapshot,
    },
    UpdateGame(GameSnapshot),
    RestartGame(GameSnapshot),
    PlayerLeft,
}

/// Connection ids keyed by slot, as the client sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlots {
    #[serde(rename = "1")]
    pub one: ConnectionId,
    #[serde(rename = "2")]
    pub two: ConnectionId,
}

impl PlayerSlots {
    pub fn get(&self, slot: Player) -> ConnectionId {
        match slot {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RematchVotes {
    #[serde(rename = "1")]
    pub one: bool,
    #[serde(rename = "2")]
    pub two: bool,
}

/// The full authoritative view of one room, broadcast after every
/// accepted move and on rematch restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Vec<Vec<u8>>,
    pub current_player: u8,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<u8>,
    pub is_draw: bool,
    pub winning_line: Vec<Coord>,
    pub players: PlayerSlots,
    pub rematch_votes: RematchVotes,
}
