use thiserror::Error;

use crate::state::Party;

/// Rejected counterpart input. Always recoverable: the caller re-prompts and
/// the pending commitment stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid guess '{0}', expected 0 or 1")]
    InvalidGuess(String),

    #[error("'{0}' is not a non-negative integer")]
    NotANumber(String),

    #[error("{value} is out of range, expected 0..{bound}")]
    OutOfRange { value: usize, bound: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("max_value must be non-negative, got {max_value}")]
    InvalidRange { max_value: i64 },

    #[error("a die must have at least one face")]
    EmptyDie,

    #[error("at least three dice are required, got {found}")]
    InsufficientDice { found: usize },

    #[error("invalid face list '{0}'")]
    InvalidFaces(String),

    #[error(transparent)]
    MalformedInput(#[from] InputError),

    #[error("HMAC rejected a {len}-byte commitment key")]
    KeyRejected { len: usize },

    #[error("no dice left to choose from")]
    PoolExhausted,

    #[error("input not expected now: waiting for {expected}")]
    OutOfTurn { expected: &'static str },

    #[error("{0} has not chosen a die")]
    NoDieSelected(Party),
}

impl EngineError {
    /// True for failures the shell should answer with a re-prompt.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::MalformedInput(_))
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
