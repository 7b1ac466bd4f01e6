use std::collections::HashMap;

use game::ConnectionId;

use crate::connection::ConnectionEvent;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ConnectionEvent>;

pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    /// Fire-and-forget: a vanished or saturated receiver must not stall
    /// the server task.
    pub async fn send(&mut self, to: ConnectionId, message: ConnectionEvent) {
        if let Some(tx) = self.connection_txs.get_mut(&to) {
            if tx.send(message).await.is_err() {
                log::warn!("Dropped an event for closed connection {}", to);
            }
        } else {
            log::warn!("No open channel for connection {}", to);
        }
    }

    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(&connection_id)
    }
}
