use thiserror::Error;

/// Reasons an intent is turned away. A rejected intent never modifies the game state.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Invalid cell index")]
    InvalidIndex,
    #[error("Board shape does not match the grid size")]
    InvalidBoardShape,
    #[error("Recorded bomb count does not match the board")]
    BombCountMismatch,
    #[error("Balance is lower than the bet amount")]
    InsufficientBalance,
    #[error("Only allowed between rounds")]
    NotIdle,
    #[error("No round in progress")]
    NotPlaying,
    #[error("Board is being revealed, wait for the round to settle")]
    RevealInProgress,
    #[error("Reveal at least one safe cell before cashing out")]
    NothingRevealed,
    #[error("Bet amount must be positive")]
    InvalidBet,
    #[error("Transition belongs to a round that is no longer current")]
    StaleTransition,
}

pub type Result<T> = core::result::Result<T, RoundError>;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown level, expected one of easy, medium or hard")]
    UnknownLevel,
    #[error("Invalid amount, expected a non-negative number with at most two decimals")]
    InvalidAmount,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Minimum bet must be positive")]
    ZeroMinBet,
    #[error("Bet step must be positive")]
    ZeroBetStep,
    #[error("Default bet is below the minimum bet")]
    DefaultBetBelowMinimum,
}
