//! Commit-reveal sub-protocols.
//!
//! Each protocol is a chain of owned states, so the engine's value can only
//! be revealed after the counterpart's input has been accepted:
//!
//! - first move: [`FirstMoveCommitted`] -> [`GuessReceived`] -> [`FirstMoveOutcome`]
//! - throw: [`ThrowCommitted`] -> [`ContributionReceived`] -> [`ThrowOutcome`]
//!
//! Input validation borrows the committed state and never consumes it, so a
//! rejected input leaves the commitment untouched.

use serde::Serialize;

use crate::commitment::{Commitment, CommitmentDigest, Key, Reveal};
use crate::die::Die;
use crate::error::{InputError, Result};
use crate::random::RandomSource;

/// Parse a non-negative integer strictly below `bound`.
pub fn parse_index(raw: &str, bound: usize) -> std::result::Result<usize, InputError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber(raw.to_string()));
    }
    let value = raw
        .parse::<usize>()
        .map_err(|_| InputError::NotANumber(raw.to_string()))?;
    if value >= bound {
        return Err(InputError::OutOfRange { value, bound });
    }
    Ok(value)
}

/// `(contribution + engine_value) mod modulus`
pub fn combine(contribution: usize, engine_value: usize, modulus: usize) -> usize {
    debug_assert!(modulus > 0);
    (contribution % modulus + engine_value % modulus) % modulus
}

/// A validated 0/1 guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Guess(u8);

impl Guess {
    pub fn parse(raw: &str) -> std::result::Result<Self, InputError> {
        match raw.trim() {
            "0" => Ok(Guess(0)),
            "1" => Ok(Guess(1)),
            other => Err(InputError::InvalidGuess(other.to_string())),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Engine has committed to a bit; waiting for the counterpart's guess.
#[derive(Debug)]
pub struct FirstMoveCommitted {
    commitment: Commitment,
}

impl FirstMoveCommitted {
    pub fn commit(rng: &mut impl RandomSource) -> Result<Self> {
        Ok(Self {
            commitment: Commitment::commit(rng, 1)?,
        })
    }

    pub fn digest(&self) -> CommitmentDigest {
        self.commitment.digest()
    }

    pub fn parse_guess(&self, raw: &str) -> std::result::Result<Guess, InputError> {
        Guess::parse(raw)
    }

    /// Whether `guess` wins the counterpart the first pick. Nothing is
    /// disclosed; the commitment stays sealed until [`GuessReceived::reveal`].
    pub fn is_correct(&self, guess: Guess) -> bool {
        self.commitment.matches(i64::from(guess.value()))
    }

    pub fn receive_guess(self, guess: Guess) -> GuessReceived {
        GuessReceived {
            commitment: self.commitment,
            guess,
        }
    }
}

#[derive(Debug)]
pub struct GuessReceived {
    commitment: Commitment,
    guess: Guess,
}

impl GuessReceived {
    pub fn reveal(self) -> FirstMoveOutcome {
        let reveal = self.commitment.reveal();
        let counterpart_first = i64::from(self.guess.value()) == reveal.value;
        tracing::info!(
            guess = self.guess.value(),
            bit = reveal.value,
            counterpart_first,
            "first move decided"
        );
        FirstMoveOutcome {
            guess: self.guess,
            reveal,
            counterpart_first,
        }
    }
}

/// A correct guess gives the counterpart the first pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FirstMoveOutcome {
    pub guess: Guess,
    pub reveal: Reveal,
    pub counterpart_first: bool,
}

/// A counterpart value checked against the die it is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Contribution {
    value: usize,
    modulus: usize,
}

impl Contribution {
    pub fn new(value: usize, modulus: usize) -> std::result::Result<Self, InputError> {
        if value >= modulus {
            return Err(InputError::OutOfRange {
                value,
                bound: modulus,
            });
        }
        Ok(Self { value, modulus })
    }

    pub fn value(&self) -> usize {
        self.value
    }
}

/// Engine has committed to a value in `0..n` for an `n`-faced die.
#[derive(Debug)]
pub struct ThrowCommitted {
    commitment: Commitment,
    die: Die,
}

impl ThrowCommitted {
    pub fn commit(rng: &mut impl RandomSource, die: &Die) -> Result<Self> {
        Ok(Self {
            commitment: Commitment::commit(rng, die.max_index())?,
            die: die.clone(),
        })
    }

    pub fn digest(&self) -> CommitmentDigest {
        self.commitment.digest()
    }

    pub fn modulus(&self) -> usize {
        self.die.len()
    }

    pub fn parse_contribution(&self, raw: &str) -> std::result::Result<Contribution, InputError> {
        let value = parse_index(raw, self.modulus())?;
        Contribution::new(value, self.modulus())
    }

    pub fn receive(self, contribution: Contribution) -> ContributionReceived {
        debug_assert_eq!(contribution.modulus, self.modulus());
        ContributionReceived {
            commitment: self.commitment,
            die: self.die,
            contribution,
        }
    }
}

#[derive(Debug)]
pub struct ContributionReceived {
    commitment: Commitment,
    die: Die,
    contribution: Contribution,
}

impl ContributionReceived {
    pub fn reveal(self) -> ThrowOutcome {
        let reveal = self.commitment.reveal();
        let modulus = self.die.len();
        let engine_value = reveal.value as usize;
        let index = combine(self.contribution.value, engine_value, modulus);
        let face = self.die.face(index);
        tracing::info!(
            contribution = self.contribution.value,
            engine_value,
            modulus,
            index,
            face,
            "throw resolved"
        );
        ThrowOutcome {
            reveal,
            contribution: self.contribution.value,
            engine_value,
            modulus,
            index,
            face,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ThrowOutcome {
    pub reveal: Reveal,
    pub contribution: usize,
    pub engine_value: usize,
    pub modulus: usize,
    pub index: usize,
    pub face: i64,
}

impl ThrowOutcome {
    pub fn key(&self) -> Key {
        self.reveal.key
    }
}
