use std::collections::HashMap;
use std::num::Wrapping;

use game::{ConnectionId, Player, RoomId};
use rand::Rng;

use crate::config::FirstTurn;
use crate::session::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Waiting,
    Paired(RoomId),
}

/// All matchmaking and room state, owned by the single server task.
/// The event loop serializes every mutation, so plain maps suffice.
pub struct ServerState {
    connection_id_source: Wrapping<ConnectionId>,
    waiting: Option<ConnectionId>,

    room_id_source: Wrapping<RoomId>,
    pub rooms: HashMap<RoomId, Room>,
    connection_rooms: HashMap<ConnectionId, RoomId>,

    first_turn: FirstTurn,
}

impl ServerState {
    pub fn new(first_turn: FirstTurn) -> Self {
        Self {
            connection_id_source: Wrapping(0),
            waiting: None,
            room_id_source: Wrapping(0),
            rooms: HashMap::new(),
            connection_rooms: HashMap::new(),
            first_turn,
        }
    }

    pub fn create_connection(&mut self) -> ConnectionId {
        self.connection_id_source += Wrapping(1);
        self.connection_id_source.0
    }

    pub fn waiting(&self) -> Option<ConnectionId> {
        self.waiting
    }

    /// A connection enters matchmaking: either it takes the waiting slot
    /// or it is paired with the connection already holding it. The first
    /// waiter gets slot 1.
    pub fn arrive(&mut self, connection_id: ConnectionId) -> Arrival {
        match self.waiting.take() {
            None => {
                self.waiting = Some(connection_id);
                Arrival::Waiting
            }
            Some(opponent) => {
                let room_id = self.new_room_id();
                let room = Room::new(room_id, opponent, connection_id, self.first_player());
                self.rooms.insert(room_id, room);
                self.connection_rooms.insert(opponent, room_id);
                self.connection_rooms.insert(connection_id, room_id);
                log::info!(
                    "Room {} started with connections {} and {}",
                    room_id,
                    opponent,
                    connection_id
                );
                Arrival::Paired(room_id)
            }
        }
    }

    /// Clear the waiting slot iff it holds this connection.
    pub fn cancel_waiting(&mut self, connection_id: ConnectionId) {
        if self.waiting == Some(connection_id) {
            self.waiting = None;
        }
    }

    pub fn room_mut(&mut self, room_id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&room_id)
    }

    /// Tear down the room this connection plays in, if any. Returns the
    /// room id and the opponent that should be told the player left.
    pub fn remove_room_of(
        &mut self,
        connection_id: ConnectionId,
    ) -> Option<(RoomId, Option<ConnectionId>)> {
        let room_id = self.connection_rooms.remove(&connection_id)?;
        let room = self.rooms.remove(&room_id)?;

        let opponent = room
            .slot_of(connection_id)
            .map(|slot| room.players().get(slot.other()));
        if let Some(opponent) = opponent {
            self.connection_rooms.remove(&opponent);
        }

        log::info!("Room {} torn down", room_id);
        Some((room_id, opponent))
    }

    /// Starting player for a fresh game, per the configured policy.
    pub fn first_player(&self) -> Player {
        match self.first_turn {
            FirstTurn::PlayerOne => Player::One,
            FirstTurn::Random => {
                if rand::thread_rng().gen::<bool>() {
                    Player::One
                } else {
                    Player::Two
                }
            }
        }
    }

    fn new_room_id(&mut self) -> RoomId {
        self.room_id_source += Wrapping(1);
        self.room_id_source.0
    }
}
