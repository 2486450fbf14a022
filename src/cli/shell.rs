//! Interactive human-vs-agent shell
//!
//! Generic over its input and output so games can be scripted in tests.

use std::io::{BufRead, Write};

use crate::{
    Error, Result,
    ports::MoveSelector,
    q_learning::GameStatus,
    tictactoe::{Board, Player},
    types::Action,
};

/// Line-oriented game front-end
pub struct InteractiveShell<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print the board with row and column labels.
    pub fn render(&mut self, board: &Board) -> Result<()> {
        writeln!(self.output, "  0 1 2")?;
        for (row, line) in board.to_string().lines().enumerate() {
            let cells: Vec<String> = line.chars().map(String::from).collect();
            writeln!(self.output, "{row} {}", cells.join(" "))?;
        }
        Ok(())
    }

    /// Prompt until the human enters a legal move for `board`.
    ///
    /// Accepts `row col` or `row,col`. Malformed, out-of-range and occupied
    /// choices print `Invalid move. Try again.` and prompt again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputClosed`] when input ends before a legal move.
    pub fn read_human_move(&mut self, board: &Board) -> Result<Action> {
        loop {
            write!(self.output, "Enter your move as 'row col' (0-2): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed);
            }

            match line.trim().parse::<Action>() {
                Ok(action) if board.is_empty(action) => return Ok(action),
                Ok(action) => {
                    log::debug!("rejected occupied cell {action}");
                }
                Err(err) => {
                    log::debug!("rejected input: {err}");
                }
            }
            writeln!(self.output, "Invalid move. Try again.")?;
        }
    }

    /// Play one game from the empty board. X opens; the human plays `human`
    /// and `agent` plays the other side.
    pub fn play_game(&mut self, agent: &mut dyn MoveSelector, human: Player) -> Result<GameStatus> {
        let mut board = Board::new();
        let mut player = Player::X;

        writeln!(
            self.output,
            "You are {human}; {} plays {}. X moves first.",
            agent.name(),
            human.opponent()
        )?;

        loop {
            writeln!(self.output)?;
            self.render(&board)?;

            let action = if player == human {
                writeln!(self.output, "\nHuman's move:")?;
                self.read_human_move(&board)?
            } else {
                let action = agent.select_move(&board, player)?;
                writeln!(self.output, "\nAI's move: {action}")?;
                action
            };

            board = board.apply(action, player)?;
            let status = GameStatus::after_move(&board, player);
            if status.is_over() {
                writeln!(self.output)?;
                self.render(&board)?;
                let verdict = match status {
                    GameStatus::Win(winner) if winner == human => "Human wins!",
                    GameStatus::Win(_) => "AI wins!",
                    _ => "It's a draw!",
                };
                writeln!(self.output, "{verdict}")?;
                self.output.flush()?;
                return Ok(status);
            }
            player = player.opponent();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Plays the first empty cell in row-major order.
    struct FirstEmpty;

    impl MoveSelector for FirstEmpty {
        fn select_move(&mut self, board: &Board, _player: Player) -> Result<Action> {
            board
                .legal_actions()
                .first()
                .copied()
                .ok_or_else(|| Error::NoLegalActions {
                    state: board.key().to_string(),
                })
        }

        fn name(&self) -> &str {
            "first-empty"
        }
    }

    fn shell(input: &str) -> InteractiveShell<Cursor<Vec<u8>>, Vec<u8>> {
        InteractiveShell::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_render_labels_rows_and_columns() {
        let mut shell = shell("");
        let board = Board::from_string("X.O......").unwrap();
        shell.render(&board).unwrap();

        let text = String::from_utf8(shell.into_output()).unwrap();
        assert_eq!(text, "  0 1 2\n0 X . O\n1 . . .\n2 . . .\n");
    }

    #[test]
    fn test_read_move_reprompts_until_legal() {
        let board = Board::from_string("X........").unwrap();
        let mut shell = shell("banana\n3 1\n0 0\n1,2\n");

        let action = shell.read_human_move(&board).unwrap();
        assert_eq!(action, Action::new(1, 2).unwrap());

        let text = String::from_utf8(shell.into_output()).unwrap();
        assert_eq!(text.matches("Invalid move. Try again.").count(), 3);
    }

    #[test]
    fn test_read_move_eof_is_input_closed() {
        let mut shell = shell("7 7\n");
        let err = shell.read_human_move(&Board::new()).unwrap_err();
        assert!(matches!(err, Error::InputClosed));
    }

    #[test]
    fn test_agent_win() {
        let mut shell = shell("1 0\n1 1\n1 2\n");
        let status = shell.play_game(&mut FirstEmpty, Player::O).unwrap();

        // X: 0,0  O: 1,0  X: 0,1  O: 1,1  X: 0,2 wins first
        assert_eq!(status, GameStatus::Win(Player::X));
        let text = String::from_utf8(shell.into_output()).unwrap();
        assert!(text.ends_with("AI wins!\n"));
    }

    #[test]
    fn test_human_opening_as_x() {
        let mut shell = shell("2 0\n2 1\n2 2\n");
        let status = shell.play_game(&mut FirstEmpty, Player::X).unwrap();

        // X: 2,0  O: 0,0  X: 2,1  O: 0,1  X: 2,2
        assert_eq!(status, GameStatus::Win(Player::X));
        let text = String::from_utf8(shell.into_output()).unwrap();
        assert!(text.ends_with("Human wins!\n"));
    }
}
