//! Pairwise win odds for a die set.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::die::Die;

/// Exact ratio `numerator / denominator`, displayed to two decimals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Probability {
    pub numerator: u64,
    pub denominator: u64,
}

impl Probability {
    pub const HALF: Probability = Probability { numerator: 1, denominator: 2 };

    pub fn new(numerator: u64, denominator: u64) -> Self {
        debug_assert!(denominator > 0 && numerator <= denominator);
        Self { numerator, denominator }
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl PartialEq for Probability {
    fn eq(&self, other: &Self) -> bool {
        u128::from(self.numerator) * u128::from(other.denominator)
            == u128::from(other.numerator) * u128::from(self.denominator)
    }
}

impl Eq for Probability {}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        (u128::from(self.numerator) * u128::from(other.denominator))
            .cmp(&(u128::from(other.numerator) * u128::from(self.denominator)))
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

fn count_pairs(a: &Die, b: &Die, keep: impl Fn(i64, i64) -> bool) -> Probability {
    let hits = a
        .faces()
        .iter()
        .flat_map(|&x| b.faces().iter().map(move |&y| (x, y)))
        .filter(|&(x, y)| keep(x, y))
        .count();
    Probability::new(hits as u64, (a.len() * b.len()) as u64)
}

/// Chance that a single throw of `a` shows a strictly higher face than `b`.
pub fn win_probability(a: &Die, b: &Die) -> Probability {
    count_pairs(a, b, |x, y| x > y)
}

/// Chance that both throws show the same face.
pub fn tie_probability(a: &Die, b: &Die) -> Probability {
    count_pairs(a, b, |x, y| x == y)
}

/// Square matrix of win odds, row die against column die. The diagonal is
/// fixed at 0.50 instead of being computed.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityTable {
    cells: Vec<Vec<Probability>>,
}

impl ProbabilityTable {
    pub fn build(dice: &[Die]) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(i, row)| {
                dice.iter()
                    .enumerate()
                    .map(|(j, col)| {
                        if i == j {
                            Probability::HALF
                        } else {
                            win_probability(row, col)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Probability {
        self.cells[row][col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Probability]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Index of each die that no other die beats with probability above 0.50.
    /// Empty for a non-transitive set.
    pub fn undominated(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&j| (0..self.len()).all(|i| i == j || self.get(i, j) <= Probability::HALF))
            .collect()
    }
}
