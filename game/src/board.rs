use serde::{Deserialize, Serialize};

use crate::types::{Cell, Player, COLS, ROWS};

/// Position on the board. Row 0 is the top row, row 5 the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a disc into a column. The disc lands on the lowest empty cell
    /// of the column; the landing position is returned.
    pub fn drop_disc(&mut self, col: usize, player: Player) -> Result<Coord, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }

        for row in (0..ROWS).rev() {
            if self.cells[row][col] == Cell::Empty {
                self.cells[row][col] = Cell::from(player);
                return Ok(Coord { row, col });
            }
        }

        Err(MoveError::ColumnFull(col))
    }

    /// True iff no column admits a further drop. Under gravity it is
    /// enough to look at the top row.
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.cells[0][col] != Cell::Empty)
    }

    /// Find four in a row for `player`. Scans horizontals row-major, then
    /// verticals, then both diagonal sweeps, and returns the first run
    /// found; if one move completed two lines at once only the first in
    /// scan order is reported.
    pub fn winning_line(&self, player: Player) -> Option<[Coord; 4]> {
        let cell = Cell::from(player);

        // Horizontal
        for row in 0..ROWS {
            for col in 0..=COLS - 4 {
                if (0..4).all(|i| self.cells[row][col + i] == cell) {
                    return Some(Self::line(|i| Coord { row, col: col + i }));
                }
            }
        }

        // Vertical
        for row in 0..=ROWS - 4 {
            for col in 0..COLS {
                if (0..4).all(|i| self.cells[row + i][col] == cell) {
                    return Some(Self::line(|i| Coord { row: row + i, col }));
                }
            }
        }

        // Diagonal, descending to the right
        for row in 0..=ROWS - 4 {
            for col in 0..=COLS - 4 {
                if (0..4).all(|i| self.cells[row + i][col + i] == cell) {
                    return Some(Self::line(|i| Coord {
                        row: row + i,
                        col: col + i,
                    }));
                }
            }
        }

        // Diagonal, ascending to the right
        for row in 3..ROWS {
            for col in 0..=COLS - 4 {
                if (0..4).all(|i| self.cells[row - i][col + i] == cell) {
                    return Some(Self::line(|i| Coord {
                        row: row - i,
                        col: col + i,
                    }));
                }
            }
        }

        None
    }

    /// The grid as small integers (0 empty, 1/2 players), row 0 first.
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_u8()).collect())
            .collect()
    }

    fn line(coord: impl Fn(usize) -> Coord) -> [Coord; 4] {
        [coord(0), coord(1), coord(2), coord(3)]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
