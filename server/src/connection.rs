use actix::{Actor, ActorContext, AsyncContext, Handler, Message, Running, StreamHandler};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use actix_web_actors::ws::{CloseCode, CloseReason};

use game::{serde_json, ClientCommand, ConnectionId, ServerEvent};

use crate::connection_tx_storage::ConnectionTx;
use crate::server::{ServerCommand, ServerTx};

#[derive(Debug)]
pub enum ConnectionCommand {
    Connect { tx: ConnectionTx },
    Disconnect { from: ConnectionId },
    Command { from: ConnectionId, command: ClientCommand },
}

#[derive(Debug)]
pub enum ConnectionEvent {
    Connected { connection_id: ConnectionId },
    Event(ServerEvent),
}

#[derive(Message)]
#[rtype(result = "()")]
struct ConnectionActorMessage(ConnectionEvent);

enum ConnectionState {
    Idle,
    Connected(ConnectionId),
}

struct ConnectionActor {
    state: ConnectionState,
    srv_tx: ServerTx,
}

impl Actor for ConnectionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<ConnectionEvent>(32);

        self.srv_tx
            .try_send(ServerCommand::Connection(ConnectionCommand::Connect { tx }))
            .expect("server must not be not closed yet");

        let addr = ctx.address().recipient();

        tokio::spawn(async move {
            let addr = addr;
            log::debug!("connection green thread - started");
            while let Some(msg) = rx.recv().await {
                addr.try_send(ConnectionActorMessage(msg))
                    .expect("should have enough buffer")
            }
            log::debug!("connection green thread - terminated");
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let ConnectionState::Connected(id) = self.state {
            self.srv_tx
                .try_send(ServerCommand::Connection(ConnectionCommand::Disconnect {
                    from: id,
                }))
                .expect("should have enough buffer");
        }

        Running::Stop
    }
}

/// Ingress
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ConnectionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Text(text)) => {
                if let ConnectionState::Connected(from) = self.state {
                    if let Ok(command) = serde_json::from_str::<ClientCommand>(&text) {
                        log::debug!("Ingress from {}: {:?}", from, command);
                        self.srv_tx
                            .try_send(ServerCommand::Connection(ConnectionCommand::Command {
                                from,
                                command,
                            }))
                            .expect("should have enough buffer");
                    } else {
                        // Malformed frames never reach the game core.
                        log::warn!("Closing connection {} on malformed frame", from);
                        ctx.close(Some(CloseReason {
                            code: CloseCode::Invalid,
                            description: None,
                        }));
                    }
                }
            }
            Ok(ws::Message::Close(_)) => {
                if let ConnectionState::Connected(id) = self.state {
                    self.state = ConnectionState::Idle;
                    self.srv_tx
                        .try_send(ServerCommand::Connection(ConnectionCommand::Disconnect {
                            from: id,
                        }))
                        .expect("should have enough buffer");
                }
                ctx.stop();
            }
            _ => (),
        }
    }
}

/// Egress
impl Handler<ConnectionActorMessage> for ConnectionActor {
    type Result = ();

    fn handle(
        &mut self,
        msg: ConnectionActorMessage,
        ctx: &mut ws::WebsocketContext<Self>,
    ) -> Self::Result {
        let connection_event = &msg.0;
        log::debug!("Egress {:?}", connection_event);
        match connection_event {
            ConnectionEvent::Connected { connection_id } => {
                self.state = ConnectionState::Connected(*connection_id);
            }
            ConnectionEvent::Event(event) => {
                let serialized = serde_json::to_string(event).expect("must succeed");
                ctx.text(serialized);
            }
        }
    }
}

pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    srv_tx: web::Data<ServerTx>,
) -> Result<HttpResponse, Error> {
    ws::start(
        ConnectionActor {
            srv_tx: srv_tx.get_ref().clone(),
            state: ConnectionState::Idle,
        },
        &req,
        stream,
    )
}
