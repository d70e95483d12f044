//! Line-oriented command parsing.

use thiserror::Error;
use tileshift_core::{CellCoord, Direction};
use tileshift_system_movement::SwipeDelta;

/// Instruction read from the command stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Input {
    /// Rotate the line through `cell` in `direction`.
    Move {
        direction: Direction,
        cell: CellCoord,
    },
    /// Classify a swipe that started on `cell`.
    Swipe { cell: CellCoord, delta: SwipeDelta },
    /// Print the board.
    Show,
    /// Print goal progress.
    Goals,
    /// End the session.
    Quit,
}

/// Reasons a command line is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected} arguments, got {actual}")]
    Arity {
        command: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
}

/// Parses one line; blank lines and `#` comments yield `None`.
pub(crate) fn parse(line: &str) -> Result<Option<Input>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let head = head.to_ascii_lowercase();

    let input = match head.as_str() {
        "left" | "right" | "up" | "down" => {
            let direction = match head.as_str() {
                "left" => Direction::Left,
                "right" => Direction::Right,
                "up" => Direction::Up,
                _ => Direction::Down,
            };
            expect_arity("move", &args, 2)?;
            Input::Move {
                direction,
                cell: CellCoord::new(number(args[0])?, number(args[1])?),
            }
        }
        "swipe" => {
            expect_arity("swipe", &args, 4)?;
            Input::Swipe {
                cell: CellCoord::new(number(args[0])?, number(args[1])?),
                delta: SwipeDelta::new(number(args[2])?, number(args[3])?),
            }
        }
        "show" => {
            expect_arity("show", &args, 0)?;
            Input::Show
        }
        "goals" => {
            expect_arity("goals", &args, 0)?;
            Input::Goals
        }
        "quit" | "exit" => Input::Quit,
        _ => return Err(CommandError::Unknown(head)),
    };
    Ok(Some(input))
}

fn expect_arity(command: &'static str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() == expected {
        return Ok(());
    }
    Err(CommandError::Arity {
        command,
        expected,
        actual: args.len(),
    })
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_owned()))
}
