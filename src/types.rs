//! Newtype wrappers for board coordinates and state identities.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    error::MoveRejection,
    tictactoe::{Board, Cell},
};

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// A cell to fill, addressed by `(row, col)`.
///
/// Ordering is row-major: lower rows first, then lower columns. Greedy
/// selection relies on this order to break ties between equal Q-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    row: usize,
    col: usize,
}

impl Action {
    /// Create an action, validating that both coordinates are on the board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if either coordinate is >= 3.
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Action { row, col })
        } else {
            Err(crate::Error::IllegalMove {
                row,
                col,
                reason: MoveRejection::OutOfRange,
            })
        }
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Action {
            row: index / BOARD_SIZE,
            col: index % BOARD_SIZE,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Row-major cell index (0-8).
    pub fn index(&self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// All nine actions in row-major order.
    pub fn all() -> impl Iterator<Item = Action> {
        (0..BOARD_SIZE * BOARD_SIZE).map(Action::from_index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    /// Parse `"row,col"` or `"row col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::Error::InvalidAction {
            input: s.to_string(),
        };

        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());
        let row = parts.next().ok_or_else(invalid)?;
        let col = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let row: usize = row.parse().map_err(|_| invalid())?;
        let col: usize = col.parse().map_err(|_| invalid())?;
        Action::new(row, col)
    }
}

// Actions are map keys inside the value table, so they travel as strings in
// every serialization format.
impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Canonical identity of a board: its nine cells in row-major order.
///
/// Encodes `X`, `O` and `.` for empty. Keys are order-sensitive and are not
/// normalised for symmetry, so two boards share a key only when every cell
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    pub(crate) fn from_cells(cells: &[Cell; 9]) -> Self {
        StateKey(cells.iter().map(|&c| c.to_char()).collect())
    }

    /// Parse and validate a key string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is exactly nine of `X`, `O`, `.`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let count = s.chars().count();
        if count != BOARD_SIZE * BOARD_SIZE {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_SIZE * BOARD_SIZE,
                got: count,
                context: s.to_string(),
            });
        }
        // Keys use the canonical alphabet only, so two spellings of one
        // board can never collide in a loaded table.
        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|&(_, c)| !matches!(c, 'X' | 'O' | '.'))
        {
            return Err(crate::Error::InvalidCellCharacter {
                character,
                position,
                context: s.to_string(),
            });
        }
        Ok(StateKey(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rebuild the board this key was derived from.
    pub fn to_board(&self) -> Board {
        // Keys are only built from boards or validated strings.
        Board::from_string(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateKey::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}
