use game::{ClientCommand, ConnectionId, ServerEvent};
use server::admin::{AdminCommand, ServerDescription};
use server::config::{FirstTurn, ServerConfig};
use server::connection::{ConnectionCommand, ConnectionEvent};
use server::server::{spawn_server, ServerCommand, ServerTx};
use tokio::sync::{mpsc, oneshot};

fn config() -> ServerConfig {
    ServerConfig::default()
}

async fn connect(srv_tx: &mut ServerTx) -> (ConnectionId, mpsc::Receiver<ConnectionEvent>) {
    let (tx, mut rx) = mpsc::channel::<ConnectionEvent>(32);
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Connect { tx }))
        .await
        .expect("server task is running");

    match rx.recv().await.expect("handshake") {
        ConnectionEvent::Connected { connection_id } => (connection_id, rx),
        other => panic!("expected the connected handshake, got {:?}", other),
    }
}

async fn next_event(rx: &mut mpsc::Receiver<ConnectionEvent>) -> ServerEvent {
    match rx.recv().await.expect("an event") {
        ConnectionEvent::Event(event) => event,
        other => panic!("expected a protocol event, got {:?}", other),
    }
}

async fn send(srv_tx: &mut ServerTx, from: ConnectionId, command: ClientCommand) {
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Command {
            from,
            command,
        }))
        .await
        .expect("server task is running");
}

async fn disconnect(srv_tx: &mut ServerTx, from: ConnectionId) {
    srv_tx
        .send(ServerCommand::Connection(ConnectionCommand::Disconnect {
            from,
        }))
        .await
        .expect("server task is running");
}

/// Round-trips an admin query. Because the server task handles commands
/// strictly in order, the reply doubles as a barrier: every earlier
/// command has been fully processed once it resolves.
async fn describe(srv_tx: &mut ServerTx) -> ServerDescription {
    let (tx, rx) = oneshot::channel();
    srv_tx
        .send(ServerCommand::Admin(AdminCommand::ListRooms { tx }))
        .await
        .expect("server task is running");
    rx.await.expect("admin reply")
}

fn assert_idle(rx: &mut mpsc::Receiver<ConnectionEvent>) {
    if let Ok(event) = rx.try_recv() {
        panic!("expected no event, got {:?}", event);
    }
}

#[tokio::test]
async fn pairing_assigns_slots_in_arrival_order() {
    let mut srv_tx = spawn_server(&config());

    let (a, mut rx_a) = connect(&mut srv_tx).await;
    assert!(matches!(
        next_event(&mut rx_a).await,
        ServerEvent::WaitingForPlayer
    ));

    let (b, mut rx_b) = connect(&mut srv_tx).await;

    let (room_a, players_a) = match next_event(&mut rx_a).await {
        ServerEvent::GameStart { room, players, .. } => (room, players),
        other => panic!("expected gameStart, got {:?}", other),
    };
    let (room_b, players_b) = match next_event(&mut rx_b).await {
        ServerEvent::GameStart { room, players, .. } => (room, players),
        other => panic!("expected gameStart, got {:?}", other),
    };

    assert_eq!(room_a, room_b);
    assert_eq!(players_a, players_b);
    assert_eq!(players_a.one, a);
    assert_eq!(players_a.two, b);
}

#[tokio::test]
async fn accepted_moves_broadcast_rejected_moves_stay_silent() {
    let mut srv_tx = spawn_server(&config());

    let (a, mut rx_a) = connect(&mut srv_tx).await;
    next_event(&mut rx_a).await; // waitingForPlayer
    let (b, mut rx_b) = connect(&mut srv_tx).await;

    let room = match next_event(&mut rx_a).await {
        ServerEvent::GameStart { room, .. } => room,
        other => panic!("expected gameStart, got {:?}", other),
    };
    next_event(&mut rx_b).await; // gameStart

    // B moving first is not B's turn; nothing may be broadcast.
    send(&mut srv_tx, b, ClientCommand::MakeMove { col: 0, room }).await;
    describe(&mut srv_tx).await;
    assert_idle(&mut rx_a);
    assert_idle(&mut rx_b);

    // A's move lands and both players get the same snapshot.
    send(&mut srv_tx, a, ClientCommand::MakeMove { col: 3, room }).await;
    let snapshot = match next_event(&mut rx_a).await {
        ServerEvent::UpdateGame(snapshot) => snapshot,
        other => panic!("expected updateGame, got {:?}", other),
    };
    assert_eq!(snapshot.board[5][3], 1);
    assert_eq!(snapshot.current_player, 2);
    assert!(matches!(
        next_event(&mut rx_b).await,
        ServerEvent::UpdateGame(_)
    ));

    // Unknown rooms are ignored outright.
    send(
        &mut srv_tx,
        a,
        ClientCommand::MakeMove {
            col: 0,
            room: room + 999,
        },
    )
    .await;
    describe(&mut srv_tx).await;
    assert_idle(&mut rx_a);
    assert_idle(&mut rx_b);
}

#[tokio::test]
async fn rematch_requires_both_votes_then_restarts() {
    let mut srv_tx = spawn_server(&config());

    let (a, mut rx_a) = connect(&mut srv_tx).await;
    next_event(&mut rx_a).await;
    let (b, mut rx_b) = connect(&mut srv_tx).await;

    let room = match next_event(&mut rx_a).await {
        ServerEvent::GameStart { room, .. } => room,
        other => panic!("expected gameStart, got {:?}", other),
    };
    next_event(&mut rx_b).await;

    // A wins with a stack in column 0 while B plays column 1.
    let script: &[(ConnectionId, usize)] =
        &[(a, 0), (b, 1), (a, 0), (b, 1), (a, 0), (b, 1), (a, 0)];
    for &(mover, col) in script {
        send(&mut srv_tx, mover, ClientCommand::MakeMove { col, room }).await;
        let snapshot = match next_event(&mut rx_a).await {
            ServerEvent::UpdateGame(snapshot) => snapshot,
            other => panic!("expected updateGame, got {:?}", other),
        };
        next_event(&mut rx_b).await;
        if mover == a && col == 0 && snapshot.game_over {
            assert_eq!(snapshot.winner, Some(1));
            assert_eq!(snapshot.winning_line.len(), 4);
        }
    }

    // One vote alone changes nothing visible.
    send(&mut srv_tx, a, ClientCommand::RequestRematch { room }).await;
    describe(&mut srv_tx).await;
    assert_idle(&mut rx_a);
    assert_idle(&mut rx_b);

    // The second vote resets the room and announces a fresh board.
    send(&mut srv_tx, b, ClientCommand::RequestRematch { room }).await;
    let snapshot = match next_event(&mut rx_b).await {
        ServerEvent::RestartGame(snapshot) => snapshot,
        other => panic!("expected restartGame, got {:?}", other),
    };
    assert!(!snapshot.game_over);
    assert_eq!(snapshot.winner, None);
    assert!(snapshot.board.iter().flatten().all(|&c| c == 0));
    assert!(!snapshot.rematch_votes.one && !snapshot.rematch_votes.two);
    assert!(matches!(
        next_event(&mut rx_a).await,
        ServerEvent::RestartGame(_)
    ));
}

#[tokio::test]
async fn disconnect_notifies_the_opponent_and_buries_the_room() {
    let mut srv_tx = spawn_server(&config());

    let (a, mut rx_a) = connect(&mut srv_tx).await;
    next_event(&mut rx_a).await;
    let (b, mut rx_b) = connect(&mut srv_tx).await;

    let room = match next_event(&mut rx_a).await {
        ServerEvent::GameStart { room, .. } => room,
        other => panic!("expected gameStart, got {:?}", other),
    };
    next_event(&mut rx_b).await;

    disconnect(&mut srv_tx, a).await;
    assert!(matches!(
        next_event(&mut rx_b).await,
        ServerEvent::PlayerLeft
    ));

    let description = describe(&mut srv_tx).await;
    assert!(description.rooms.is_empty());

    // Late events for the buried room are no-ops.
    send(&mut srv_tx, b, ClientCommand::MakeMove { col: 0, room }).await;
    send(&mut srv_tx, b, ClientCommand::RequestRematch { room }).await;
    describe(&mut srv_tx).await;
    assert_idle(&mut rx_b);
}

#[tokio::test]
async fn waiting_disconnect_leaves_the_next_arrival_waiting() {
    let mut srv_tx = spawn_server(&config());

    let (a, mut rx_a) = connect(&mut srv_tx).await;
    assert!(matches!(
        next_event(&mut rx_a).await,
        ServerEvent::WaitingForPlayer
    ));

    disconnect(&mut srv_tx, a).await;

    let (_b, mut rx_b) = connect(&mut srv_tx).await;
    assert!(matches!(
        next_event(&mut rx_b).await,
        ServerEvent::WaitingForPlayer
    ));
}

#[tokio::test]
async fn random_first_turn_still_pairs() {
    let mut srv_tx = spawn_server(&ServerConfig {
        port: 0,
        first_turn: FirstTurn::Random,
    });

    let (_a, mut rx_a) = connect(&mut srv_tx).await;
    next_event(&mut rx_a).await;
    let (_b, mut rx_b) = connect(&mut srv_tx).await;

    let snapshot = match next_event(&mut rx_a).await {
        ServerEvent::GameStart { initial_state, .. } => initial_state,
        other => panic!("expected gameStart, got {:?}", other),
    };
    next_event(&mut rx_b).await;

    assert!(snapshot.current_player == 1 || snapshot.current_player == 2);
    assert!(!snapshot.game_over);
}
