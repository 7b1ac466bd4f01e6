use std::env;

/// Who takes the first move of a fresh game (including rematch resets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTurn {
    PlayerOne,
    Random,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub first_turn: FirstTurn,
}

impl ServerConfig {
    /// Read configuration from the environment: `PORT` (default 3333) and
    /// `FIRST_TURN` (`player1` or `random`). Unparseable values fall back
    /// to the default with a warning.
    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(value) => match value.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    log::warn!("Ignoring unparseable PORT value {:?}", value);
                    3333
                }
            },
            Err(_) => 3333,
        };

        let first_turn = match env::var("FIRST_TURN") {
            Ok(value) => match value.as_str() {
                "player1" => FirstTurn::PlayerOne,
                "random" => FirstTurn::Random,
                other => {
                    log::warn!("Ignoring unknown FIRST_TURN value {:?}", other);
                    FirstTurn::PlayerOne
                }
            },
            Err(_) => FirstTurn::PlayerOne,
        };

        Self { port, first_turn }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3333,
            first_turn: FirstTurn::PlayerOne,
        }
    }
}
