use crate::board::{Board, Coord, MoveError};
use crate::types::Player;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Won { winner: Player, line: [Coord; 4] },
    Draw,
}

/// One game of drop-four: the board plus whose turn it is and whether the
/// game has concluded. Exactly one of in-progress / won / draw holds at
/// any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<Outcome>,
}

impl GameState {
    pub fn new(first: Player) -> Self {
        GameState {
            board: Board::new(),
            current_player: first,
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Apply a move for the player whose turn it is. Win detection runs
    /// only against the mover; the turn passes to the other player only
    /// when the move does not end the game.
    pub fn play(&mut self, col: usize) -> Result<Coord, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        let mover = self.current_player;
        let landed = self.board.drop_disc(col, mover)?;

        if let Some(line) = self.board.winning_line(mover) {
            self.outcome = Some(Outcome::Won {
                winner: mover,
                line,
            });
        } else if self.board.is_full() {
            self.outcome = Some(Outcome::Draw);
        } else {
            self.current_player = mover.other();
        }

        Ok(landed)
    }
}
