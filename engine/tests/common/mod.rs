use engine::RandomSource;
use std::collections::VecDeque;

/// Replays a fixed list of 32-bit draws; keys are a constant byte pattern.
pub struct Scripted {
    draws: VecDeque<u32>,
}

impl Scripted {
    pub fn new(draws: &[u32]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
        }
    }
}

impl RandomSource for Scripted {
    fn next_u32(&mut self) -> u32 {
        self.draws.pop_front().expect("script ran out of draws")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0x5a);
    }
}
