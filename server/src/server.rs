use tokio::sync::mpsc::{channel, Sender};

use game::{ClientCommand, ConnectionId, RoomId, ServerEvent};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::admin::{AdminCommand, RoomDescription, ServerDescription};
use crate::config::ServerConfig;
use crate::connection_tx_storage::ConnectionTxStorage;
use crate::server_state::{Arrival, ServerState};
use crate::session::{IllegalAction, RematchVote};

#[derive(Debug)]
pub enum ServerCommand {
    Connection(ConnectionCommand),
    Admin(AdminCommand),
}

pub type ServerTx = Sender<ServerCommand>;

struct Server {
    server_state: ServerState,
    connections: ConnectionTxStorage,
}

impl Server {
    fn new(config: &ServerConfig) -> Self {
        Self {
            server_state: ServerState::new(config.first_turn),
            connections: ConnectionTxStorage::new(),
        }
    }

    async fn handle_command(&mut self, command: ServerCommand) {
        match command {
            ServerCommand::Connection(command) => self.handle_connection_command(command).await,
            ServerCommand::Admin(command) => self.handle_admin_command(command),
        }
    }

    async fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => {
                let connection_id = self.server_state.create_connection();
                self.connections.insert(connection_id, tx);
                self.connections
                    .send(connection_id, ConnectionEvent::Connected { connection_id })
                    .await;
                log::info!("Connection {} arrived", connection_id);

                match self.server_state.arrive(connection_id) {
                    Arrival::Waiting => {
                        log::info!("Connection {} is waiting for an opponent", connection_id);
                        self.connections
                            .send(
                                connection_id,
                                ConnectionEvent::Event(ServerEvent::WaitingForPlayer),
                            )
                            .await;
                    }
                    Arrival::Paired(room_id) => {
                        let (event, players) = {
                            let room = self
                                .server_state
                                .room_mut(room_id)
                                .expect("room was just created");
                            (
                                ServerEvent::GameStart {
                                    room: room_id,
                                    players: room.players(),
                                    initial_state: room.snapshot(),
                                },
                                room.players(),
                            )
                        };
                        self.connections
                            .send(players.one, ConnectionEvent::Event(event.clone()))
                            .await;
                        self.connections
                            .send(players.two, ConnectionEvent::Event(event))
                            .await;
                    }
                }
            }
            ConnectionCommand::Disconnect { from } => {
                log::info!("Connection {} left", from);
                self.server_state.cancel_waiting(from);

                if let Some((_room_id, opponent)) = self.server_state.remove_room_of(from) {
                    if let Some(opponent) = opponent {
                        self.connections
                            .send(opponent, ConnectionEvent::Event(ServerEvent::PlayerLeft))
                            .await;
                    }
                }

                self.connections.remove(from);
            }
            ConnectionCommand::Command { from, command } => {
                self.handle_client_command(from, command).await
            }
        }
    }

    async fn handle_client_command(&mut self, from: ConnectionId, command: ClientCommand) {
        match command {
            ClientCommand::MakeMove { col, room } => {
                let result = match self.server_state.room_mut(room) {
                    Some(r) => r.apply_move(from, col),
                    None => Err(IllegalAction::NotInRoom),
                };
                match result {
                    Ok(()) => {
                        let snapshot = self
                            .server_state
                            .room_mut(room)
                            .expect("room still exists")
                            .snapshot();
                        self.broadcast_room(room, ServerEvent::UpdateGame(snapshot))
                            .await;
                    }
                    Err(reason) => {
                        // Rejected moves change nothing and answer nothing.
                        log::debug!(
                            "Dropped move from {} in room {}: {:?}",
                            from,
                            room,
                            reason
                        );
                    }
                }
            }
            ClientCommand::RequestRematch { room } => {
                let first = self.server_state.first_player();
                let result = match self.server_state.room_mut(room) {
                    Some(r) => r.vote_rematch(from, first),
                    None => Err(IllegalAction::NotInRoom),
                };
                match result {
                    Ok(RematchVote::Restarted) => {
                        let snapshot = self
                            .server_state
                            .room_mut(room)
                            .expect("room still exists")
                            .snapshot();
                        self.broadcast_room(room, ServerEvent::RestartGame(snapshot))
                            .await;
                    }
                    Ok(RematchVote::Recorded) => {
                        log::debug!("Rematch vote recorded for {} in room {}", from, room);
                    }
                    Err(reason) => {
                        log::debug!(
                            "Dropped rematch vote from {} in room {}: {:?}",
                            from,
                            room,
                            reason
                        );
                    }
                }
            }
        }
    }

    fn handle_admin_command(&mut self, command: AdminCommand) {
        match command {
            AdminCommand::ListRooms { tx } => {
                let rooms = self
                    .server_state
                    .rooms
                    .values()
                    .map(RoomDescription::of)
                    .collect();
                let description = ServerDescription {
                    waiting: self.server_state.waiting(),
                    rooms,
                };
                if tx.send(description).is_err() {
                    log::warn!("Admin query abandoned before the reply");
                }
            }
        }
    }

    async fn broadcast_room(&mut self, room_id: RoomId, event: ServerEvent) {
        let players = match self.server_state.room_mut(room_id) {
            Some(room) => room.players(),
            None => return,
        };
        self.connections
            .send(players.one, ConnectionEvent::Event(event.clone()))
            .await;
        self.connections
            .send(players.two, ConnectionEvent::Event(event))
            .await;
    }
}

pub fn spawn_server(config: &ServerConfig) -> ServerTx {
    let (srv_tx, mut srv_rx) = channel::<ServerCommand>(16);

    let mut server = Box::new(Server::new(config));
    tokio::spawn(async move {
        while let Some(command) = srv_rx.recv().await {
            server.handle_command(command).await;
        }
    });

    srv_tx
}
