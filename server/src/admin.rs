use game::{ConnectionId, PlayerSlots, RoomId};
use serde::Serialize;
use tokio::sync::oneshot::Sender;

use crate::session::Room;

#[derive(Debug)]
pub enum AdminCommand {
    ListRooms { tx: Sender<ServerDescription> },
}

#[derive(Debug, Serialize)]
pub struct ServerDescription {
    pub waiting: Option<ConnectionId>,
    pub rooms: Vec<RoomDescription>,
}

#[derive(Debug, Serialize)]
pub struct RoomDescription {
    pub room_id: RoomId,
    pub players: PlayerSlots,
    pub phase: String,
}

impl RoomDescription {
    pub fn of(room: &Room) -> Self {
        let snapshot = room.snapshot();
        let phase = if let Some(winner) = snapshot.winner {
            format!("won by player {}", winner)
        } else if snapshot.is_draw {
            "drawn".to_string()
        } else {
            format!("in progress, player {} to move", snapshot.current_player)
        };

        Self {
            room_id: room.room_id(),
            players: room.players(),
            phase,
        }
    }
}
