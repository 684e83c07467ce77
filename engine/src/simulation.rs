//! Monte Carlo cross-check of the probability table.

use serde::Serialize;

use crate::die::Die;
use crate::error::Result;
use crate::probability::{tie_probability, win_probability};
use crate::random::RandomSource;

#[derive(Debug, Clone, Serialize)]
pub struct MatchupStats {
    pub row: usize,
    pub col: usize,
    pub trials: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub exact_win_rate: f64,
    pub exact_tie_rate: f64,
}

impl MatchupStats {
    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }

    /// Absolute gap between the observed and the exact win rate.
    pub fn deviation(&self) -> f64 {
        (self.win_rate() - self.exact_win_rate).abs()
    }
}

fn throw(rng: &mut impl RandomSource, die: &Die) -> Result<i64> {
    Ok(die.face(rng.uniform(die.max_index())? as usize))
}

/// Throw every ordered pair of distinct dice `trials` times.
pub fn simulate_matchups(
    dice: &[Die],
    trials: u32,
    rng: &mut impl RandomSource,
) -> Result<Vec<MatchupStats>> {
    let mut out = Vec::with_capacity(dice.len() * dice.len().saturating_sub(1));
    for (row, a) in dice.iter().enumerate() {
        for (col, b) in dice.iter().enumerate() {
            if row == col {
                continue;
            }
            let (mut wins, mut losses, mut ties) = (0u32, 0u32, 0u32);
            for _ in 0..trials {
                let x = throw(rng, a)?;
                let y = throw(rng, b)?;
                match x.cmp(&y) {
                    std::cmp::Ordering::Greater => wins += 1,
                    std::cmp::Ordering::Less => losses += 1,
                    std::cmp::Ordering::Equal => ties += 1,
                }
            }
            tracing::debug!(row, col, wins, losses, ties, "matchup simulated");
            out.push(MatchupStats {
                row,
                col,
                trials,
                wins,
                losses,
                ties,
                exact_win_rate: win_probability(a, b).as_f64(),
                exact_tie_rate: tie_probability(a, b).as_f64(),
            });
        }
    }
    Ok(out)
}
