use serde::{Deserialize, Serialize};

/// Number of cells on the grid.
pub const CELL_COUNT: usize = 9;

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A participant's symbol. `X` belongs to the room creator and always moves
/// first; `O` belongs to the joiner.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    /// The opposing marker.
    pub fn other(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }
}

/// Result of evaluating a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Marker),
    Draw,
    Ongoing,
}

/// A 3x3 grid, indexed row-major 0..9. A cell, once set, is never
/// overwritten; callers go through `is_legal_move` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Marker>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, index: usize) -> Option<Marker> {
        self.cells[index]
    }

    /// A move is legal iff the index is on the grid, the cell is empty, and
    /// the mover actually holds the turn.
    pub fn is_legal_move(&self, index: usize, marker: Marker, turn_marker: Marker) -> bool {
        index < CELL_COUNT && self.cells[index].is_none() && marker == turn_marker
    }

    /// Sets a cell. The caller guarantees legality; there is no internal
    /// validation failure path.
    pub fn apply_move(&mut self, index: usize, marker: Marker) {
        self.cells[index] = Some(marker);
    }

    /// Checks all 8 lines for three equal markers, then falls back to a
    /// draw check. Deterministic, no side effects.
    pub fn evaluate(&self) -> Outcome {
        for line in LINES {
            if let Some(marker) = self.cells[line[0]] {
                if self.cells[line[1]] == Some(marker) && self.cells[line[2]] == Some(marker) {
                    return Outcome::Win(marker);
                }
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empties every cell for a new round.
    pub fn clear(&mut self) {
        self.cells = [None; CELL_COUNT];
    }
}
