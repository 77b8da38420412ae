use mines_core::{CellIndex, Coord, Level, Money, ParseError, coords_to_index};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  start              place the current bet and start a round
  reveal <index>     reveal cell 0-24 (row by row)
  reveal <x> <y>     reveal the cell at column x, row y
  cashout            take the current winnings
  level <name>       switch to easy, medium or hard
  bet <amount>       set the bet amount
  bet + | bet -      raise or lower the bet by one step
  reset              start over with the initial balance
  state              print the game state as JSON
  help               show this message
  quit               leave the game";

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Start,
    Reveal(CellIndex),
    CashOut,
    Level(Level),
    Bet(Money),
    AdjustBet(bool),
    Reset,
    State,
    Help,
    Quit,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Reveal(_) => "reveal",
            Self::CashOut => "cashout",
            Self::Level(_) => "level",
            Self::Bet(_) | Self::AdjustBet(_) => "bet",
            Self::Reset => "reset",
            Self::State => "state",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Unexpected extra argument {0:?}")]
    ExtraArgument(String),
    #[error("Cell is outside the 5x5 board")]
    InvalidCell,
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::MissingArgument("command"));
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "start" | "s" => Self::Start,
            "reveal" | "r" => Self::Reveal(parse_cell(&args)?),
            "cashout" | "cash" | "c" => Self::CashOut,
            "level" | "l" => Self::Level(single(&args, "level name")?.parse()?),
            "bet" | "b" => match single(&args, "amount, + or -")? {
                "+" => Self::AdjustBet(true),
                "-" => Self::AdjustBet(false),
                amount => Self::Bet(amount.parse()?),
            },
            "reset" => Self::Reset,
            "state" => Self::State,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        let expected_args = match command {
            Self::Reveal(_) => args.len(),
            Self::Level(_) | Self::Bet(_) | Self::AdjustBet(_) => 1,
            _ => 0,
        };
        match args.get(expected_args) {
            Some(extra) => Err(CommandError::ExtraArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn single<'a>(args: &[&'a str], what: &'static str) -> Result<&'a str, CommandError> {
    args.first().copied().ok_or(CommandError::MissingArgument(what))
}

fn parse_cell(args: &[&str]) -> Result<CellIndex, CommandError> {
    match args {
        [] => Err(CommandError::MissingArgument("cell")),
        [index] => {
            let index: CellIndex = index.parse().map_err(|_| CommandError::InvalidCell)?;
            (index < 25).then_some(index).ok_or(CommandError::InvalidCell)
        }
        [x, y] => {
            let x: Coord = x.parse().map_err(|_| CommandError::InvalidCell)?;
            let y: Coord = y.parse().map_err(|_| CommandError::InvalidCell)?;
            coords_to_index((x, y)).ok_or(CommandError::InvalidCell)
        }
        [_, _, extra, ..] => Err(CommandError::ExtraArgument(extra.to_string())),
    }
}
