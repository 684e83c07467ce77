use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, Result};

/// Entropy capability handed to every component that draws randomness.
///
/// `uniform` reduces a 32-bit draw modulo the range size. The bias this
/// introduces is negligible for ranges the size of a die.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    fn fill_bytes(&mut self, dest: &mut [u8]);

    /// Uniform integer in `0..=max_value`.
    fn uniform(&mut self, max_value: i64) -> Result<i64> {
        if max_value < 0 {
            return Err(EngineError::InvalidRange { max_value });
        }
        let span = max_value as u64 + 1;
        Ok((u64::from(self.next_u32()) % span) as i64)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        (**self).fill_bytes(dest)
    }
}

/// Operating-system entropy. The only source fit for real play.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn next_u32(&mut self) -> u32 {
        OsRng.next_u32()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest)
    }
}

/// Replayable ChaCha8 stream for tests and transcripts.
/// Anyone who knows the seed knows every commitment, so never play with it.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }
}
