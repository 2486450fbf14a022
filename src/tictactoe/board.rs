//! Board representation and rule checks

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::MoveRejection,
    types::{Action, StateKey},
};

/// Cell indices of the three rows, three columns and two diagonals
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

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// A 3x3 grid of cells, stored row-major.
///
/// `Board` is `Copy`; applying a move returns a new board and leaves the
/// original untouched, so snapshots for key derivation are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board from a string of nine cells.
    ///
    /// Accepts `X`/`O` (any case, `0` for O) and `.`/`_` for empty cells.
    /// Whitespace is ignored, so multi-line layouts parse as well.
    ///
    /// # Errors
    ///
    /// Returns error if the string does not hold exactly nine cells or any
    /// character is not a valid cell.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(Board { cells })
    }

    /// Get the cell addressed by an action
    pub fn cell(&self, action: Action) -> Cell {
        self.cells[action.index()]
    }

    /// Check if the cell addressed by an action is empty
    pub fn is_empty(&self, action: Action) -> bool {
        self.cell(action) == Cell::Empty
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Place `player`'s mark at `(row, col)` and return the new board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if the coordinates are off the
    /// board or the cell is already occupied.
    #[must_use = "place returns a new board; the original is unchanged"]
    pub fn place(&self, row: usize, col: usize, player: Player) -> Result<Board, crate::Error> {
        self.apply(Action::new(row, col)?, player)
    }

    /// Apply an action for `player` and return the new board.
    ///
    /// Exactly one cell differs between `self` and the result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IllegalMove`] if the target cell is occupied.
    #[must_use = "apply returns a new board; the original is unchanged"]
    pub fn apply(&self, action: Action, player: Player) -> Result<Board, crate::Error> {
        if !self.is_empty(action) {
            return Err(crate::Error::IllegalMove {
                row: action.row(),
                col: action.col(),
                reason: MoveRejection::Occupied,
            });
        }

        let mut next = *self;
        next.cells[action.index()] = player.to_cell();
        Ok(next)
    }

    /// Get all empty cells in row-major order
    pub fn empty_actions(&self) -> Vec<Action> {
        Action::all().filter(|&a| self.is_empty(a)).collect()
    }

    /// Legal actions: empty cells, or nothing once the game is over
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_actions()
    }

    /// Check if a player owns a full row, column, or diagonal
    pub fn is_win(&self, player: Player) -> bool {
        let mark = player.to_cell();
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == mark))
    }

    /// Check if every cell is filled.
    ///
    /// Only meaningful once neither player has won; callers check wins first.
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the game is over (win or full board)
    pub fn is_terminal(&self) -> bool {
        self.is_win(Player::X) || self.is_win(Player::O) || self.is_draw()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.is_win(Player::X) {
            Some(Player::X)
        } else if self.is_win(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Player whose turn it is, assuming X opened
    pub fn to_move(&self) -> Player {
        let x = self.cells.iter().filter(|&&c| c == Cell::X).count();
        let o = self.cells.iter().filter(|&&c| c == Cell::O).count();
        if x > o { Player::O } else { Player::X }
    }

    /// Canonical key used as the value table identity
    pub fn key(&self) -> StateKey {
        StateKey::from_cells(&self.cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(row: usize, col: usize) -> Action {
        Action::new(row, col).unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.legal_actions().len(), 9);
        assert_eq!(board.to_move(), Player::X);
    }

    #[test]
    fn test_apply_changes_one_cell() {
        let board = Board::new();
        let next = board.apply(action(1, 1), Player::X).unwrap();

        assert_eq!(next.cell(action(1, 1)), Cell::X);
        assert_eq!(board.cell(action(1, 1)), Cell::Empty);
        let changed = Action::all()
            .filter(|&a| board.cell(a) != next.cell(a))
            .count();
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_apply_rejects_occupied() {
        let board = Board::new().apply(action(0, 0), Player::X).unwrap();
        let err = board.apply(action(0, 0), Player::O).unwrap_err();
        assert!(err.to_string().contains("occupied"));
    }

    #[test]
    fn test_place_rejects_out_of_range() {
        let err = Board::new().place(3, 1, Player::X).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::IllegalMove {
                row: 3,
                col: 1,
                reason: MoveRejection::OutOfRange
            }
        ));
    }

    #[test]
    fn test_legal_actions() {
        let mut board = Board::new();
        board = board.apply(action(0, 0), Player::X).unwrap();
        assert_eq!(board.legal_actions().len(), 8);
        assert!(!board.legal_actions().contains(&action(0, 0)));

        board = board.apply(action(1, 1), Player::O).unwrap();
        assert_eq!(board.legal_actions().len(), 7);
        assert_eq!(board.legal_actions()[0], action(0, 1));
    }

    #[test]
    fn test_legal_actions_empty_when_won() {
        let board = Board::from_string("XXX OO. ...").unwrap();
        assert!(board.legal_actions().is_empty());
        assert_eq!(board.empty_actions().len(), 4);
    }

    #[test]
    fn test_win_detection_vertical() {
        let board = Board::from_string("XO. XO. .O.").unwrap();
        assert!(board.is_win(Player::O));
        assert!(!board.is_win(Player::X));
        assert_eq!(board.winner(), Some(Player::O));
    }

    #[test]
    fn test_win_detection_row_and_diagonal() {
        let row = Board::from_string("... OOO XX.").unwrap();
        assert_eq!(row.winner(), Some(Player::O));

        let diagonal = Board::from_string("XO. OX. ..X").unwrap();
        assert_eq!(diagonal.winner(), Some(Player::X));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::from_string("XOX ... ...").unwrap();
        assert!(!board.is_win(Player::X));
        assert!(!board.is_win(Player::O));
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_win_detection_anti_diagonal() {
        let board = Board::from_string("OOX .X. X..").unwrap();
        assert!(board.is_win(Player::X));
        assert!(board.is_terminal());
    }

    #[test]
    fn test_key_matches_cells() {
        let board = Board::from_string("X.. .O. ..X").unwrap();
        assert_eq!(board.key().as_str(), "X...O...X");
        assert_eq!(board.key().to_board(), board);
    }

    #[test]
    fn test_to_move_alternates() {
        let board = Board::new().apply(action(0, 0), Player::X).unwrap();
        assert_eq!(board.to_move(), Player::O);
        let board = board.apply(action(0, 1), Player::O).unwrap();
        assert_eq!(board.to_move(), Player::X);
    }

    #[test]
    fn test_from_string_errors() {
        assert!(Board::from_string("XO").is_err());
        assert!(Board::from_string("XOZ......").is_err());
        assert!(Board::from_string("XO.......X").is_err());
    }

    #[test]
    fn test_display() {
        let board = Board::from_string("XOX.O.X..").unwrap();
        let display = format!("{board}");
        assert_eq!(display, "XOX\n.O.\nX..");
    }
}
