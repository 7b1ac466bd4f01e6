use game::{
    ConnectionId, GameSnapshot, GameState, Outcome, Player, PlayerSlots, RematchVotes, RoomId,
};

/// Reasons a move or rematch vote is dropped. None of these reach the
/// client; the absence of a broadcast is the whole signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalAction {
    NotInRoom,
    NotYourTurn,
    GameOver,
    GameNotOver,
    InvalidColumn,
    ColumnFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RematchVote {
    Recorded,
    Restarted,
}

/// One room: two fixed player slots, the authoritative game state, and
/// the rematch votes for the current conclusion.
pub struct Room {
    room_id: RoomId,
    players: [ConnectionId; 2],
    game: GameState,
    rematch_votes: [bool; 2],
}

impl Room {
    /// Slot 1 goes to the player who was waiting first.
    pub fn new(
        room_id: RoomId,
        slot_one: ConnectionId,
        slot_two: ConnectionId,
        first: Player,
    ) -> Self {
        Self {
            room_id,
            players: [slot_one, slot_two],
            game: GameState::new(first),
            rematch_votes: [false, false],
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn players(&self) -> PlayerSlots {
        PlayerSlots {
            one: self.players[0],
            two: self.players[1],
        }
    }

    pub fn slot_of(&self, connection_id: ConnectionId) -> Option<Player> {
        if self.players[0] == connection_id {
            Some(Player::One)
        } else if self.players[1] == connection_id {
            Some(Player::Two)
        } else {
            None
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Validate and apply a move from `from`. The game state advances
    /// (including win/draw detection and the turn flip) on success.
    pub fn apply_move(&mut self, from: ConnectionId, col: usize) -> Result<(), IllegalAction> {
        let slot = self.slot_of(from).ok_or(IllegalAction::NotInRoom)?;
        if self.game.is_over() {
            return Err(IllegalAction::GameOver);
        }
        if slot != self.game.current_player() {
            return Err(IllegalAction::NotYourTurn);
        }

        self.game.play(col).map(|_| ()).map_err(|e| match e {
            game::MoveError::InvalidColumn(_) => IllegalAction::InvalidColumn,
            game::MoveError::ColumnFull(_) => IllegalAction::ColumnFull,
            game::MoveError::GameOver => IllegalAction::GameOver,
        })
    }

    /// Record a rematch vote. Voting twice from the same slot is a no-op;
    /// once both slots have voted the room resets to a fresh game with
    /// `first` to move and both votes cleared.
    pub fn vote_rematch(
        &mut self,
        from: ConnectionId,
        first: Player,
    ) -> Result<RematchVote, IllegalAction> {
        let slot = self.slot_of(from).ok_or(IllegalAction::NotInRoom)?;
        if !self.game.is_over() {
            return Err(IllegalAction::GameNotOver);
        }

        self.rematch_votes[slot.index()] = true;
        if self.rematch_votes == [true, true] {
            self.game = GameState::new(first);
            self.rematch_votes = [false, false];
            Ok(RematchVote::Restarted)
        } else {
            Ok(RematchVote::Recorded)
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let (winner, winning_line) = match self.game.outcome() {
            Some(Outcome::Won { winner, line }) => (Some(winner.as_u8()), line.to_vec()),
            _ => (None, Vec::new()),
        };

        GameSnapshot {
            board: self.game.board().grid(),
            current_player: self.game.current_player().as_u8(),
            game_over: self.game.is_over(),
            winner,
            is_draw: matches!(self.game.outcome(), Some(Outcome::Draw)),
            winning_line,
            players: self.players(),
            rematch_votes: RematchVotes {
                one: self.rematch_votes[0],
                two: self.rematch_votes[1],
            },
        }
    }
}
