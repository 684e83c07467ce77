use serde::{Deserialize, Serialize};
use std::fmt;

use crate::die::Die;
use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Player,
    Computer,
}

impl Party {
    pub fn opponent(&self) -> Party {
        match self {
            Party::Player => Party::Computer,
            Party::Computer => Party::Player,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Player => write!(f, "player"),
            Party::Computer => write!(f, "computer"),
        }
    }
}

/// Dice pool and the choices made from it.
///
/// Removal is by structural equality: two dice with the same faces are
/// interchangeable, and the first equal one in the pool is removed.
#[derive(Debug, Clone)]
pub struct GameState {
    original_dice: Vec<Die>,
    available_dice: Vec<Die>,
    player_die: Option<Die>,
    computer_die: Option<Die>,
}

impl GameState {
    pub fn new(dice: Vec<Die>) -> Self {
        Self {
            available_dice: dice.clone(),
            original_dice: dice,
            player_die: None,
            computer_die: None,
        }
    }

    pub fn original_dice(&self) -> &[Die] {
        &self.original_dice
    }

    pub fn available_dice(&self) -> &[Die] {
        &self.available_dice
    }

    pub fn player_die(&self) -> Option<&Die> {
        self.player_die.as_ref()
    }

    pub fn computer_die(&self) -> Option<&Die> {
        self.computer_die.as_ref()
    }

    pub fn die_of(&self, party: Party) -> Option<&Die> {
        match party {
            Party::Player => self.player_die(),
            Party::Computer => self.computer_die(),
        }
    }

    /// Drop `die` from the pool. Absent dice are ignored.
    pub fn select_die(&mut self, die: &Die) -> bool {
        match self.available_dice.iter().position(|d| d == die) {
            Some(index) => {
                self.available_dice.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move the die at `index` of the pool to `party`.
    pub fn assign(&mut self, party: Party, index: usize) -> Result<&Die> {
        if index >= self.available_dice.len() {
            return Err(EngineError::PoolExhausted);
        }
        let die = self.available_dice.remove(index);
        let slot = match party {
            Party::Player => &mut self.player_die,
            Party::Computer => &mut self.computer_die,
        };
        let die: &Die = slot.insert(die);
        Ok(die)
    }

    pub fn reset(&mut self) {
        self.available_dice = self.original_dice.clone();
        self.player_die = None;
        self.computer_die = None;
    }
}
