//! Provably fair two-party dice game.
//!
//! The computer commits to every random value with HMAC-SHA256 before the
//! player acts and reveals the key afterwards, so each draw can be checked.

pub mod commitment;
pub mod config;
pub mod die;
pub mod error;
pub mod game;
pub mod probability;
pub mod protocol;
pub mod random;
pub mod simulation;
pub mod state;

pub use commitment::{Commitment, CommitmentDigest, Key, Reveal};
pub use config::{ConfigFormat, GameConfig};
pub use die::Die;
pub use error::{EngineError, InputError};
pub use game::{Game, GameEvent, GameSummary, Prompt, Verdict, MIN_DICE};
pub use probability::{tie_probability, win_probability, Probability, ProbabilityTable};
pub use protocol::{
    combine, parse_index, Contribution, FirstMoveCommitted, FirstMoveOutcome, Guess,
    ThrowCommitted, ThrowOutcome,
};
pub use random::{RandomSource, SeededRandom, SystemRandom};
pub use simulation::{simulate_matchups, MatchupStats};
pub use state::{GameState, Party};
