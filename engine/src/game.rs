//! The full game as an input-driven session.
//!
//! The session never reads or prints anything. The shell calls
//! [`Game::start`], asks [`Game::prompt`] what input is needed, feeds raw
//! lines to [`Game::submit`] and renders the returned [`GameEvent`]s.
//! A recoverable error from `submit` leaves the session exactly where it was.

use serde::Serialize;
use std::cmp::Ordering;

use crate::commitment::CommitmentDigest;
use crate::die::Die;
use crate::error::{EngineError, Result};
use crate::probability::ProbabilityTable;
use crate::protocol::{
    parse_index, Contribution, FirstMoveCommitted, FirstMoveOutcome, Guess, ThrowCommitted,
    ThrowOutcome,
};
use crate::random::RandomSource;
use crate::state::{GameState, Party};

pub const MIN_DICE: usize = 3;

/// What the session is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// `start` has not been called for this round.
    Start,
    /// A `0` or `1` guess of the committed bit.
    Guess,
    /// An index into `GameState::available_dice`.
    ChooseDie { options: usize },
    /// A value in `0..modulus` to add to the committed one.
    Contribution { party: Party, modulus: usize },
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    PlayerWins,
    ComputerWins,
    Tie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub player_score: i64,
    pub computer_score: i64,
    pub verdict: Verdict,
}

impl GameSummary {
    pub fn new(player_score: i64, computer_score: i64) -> Self {
        let verdict = match player_score.cmp(&computer_score) {
            Ordering::Greater => Verdict::PlayerWins,
            Ordering::Less => Verdict::ComputerWins,
            Ordering::Equal => Verdict::Tie,
        };
        Self {
            player_score,
            computer_score,
            verdict,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    FirstMoveCommitted {
        digest: CommitmentDigest,
    },
    FirstMoveRevealed {
        outcome: FirstMoveOutcome,
    },
    DieChosen {
        party: Party,
        die: Die,
    },
    ThrowCommitted {
        party: Party,
        digest: CommitmentDigest,
        modulus: usize,
    },
    ThrowResolved {
        party: Party,
        outcome: ThrowOutcome,
    },
    Finished {
        summary: GameSummary,
    },
}

#[derive(Debug)]
enum Phase {
    Idle,
    FirstMove(FirstMoveCommitted),
    Choosing,
    Throw {
        party: Party,
        protocol: ThrowCommitted,
    },
    Finished(GameSummary),
}

enum Accepted {
    Guess(Guess),
    Die(usize),
    Contribution(Contribution),
}

pub struct Game<R> {
    rng: R,
    state: GameState,
    table: ProbabilityTable,
    phase: Phase,
    player_score: Option<i64>,
}

impl<R: RandomSource> Game<R> {
    pub fn new(dice: Vec<Die>, rng: R) -> Result<Self> {
        if dice.len() < MIN_DICE {
            return Err(EngineError::InsufficientDice { found: dice.len() });
        }
        let table = ProbabilityTable::build(&dice);
        Ok(Self {
            rng,
            state: GameState::new(dice),
            table,
            phase: Phase::Idle,
            player_score: None,
        })
    }

    pub fn from_faces(faces: &[Vec<i64>], rng: R) -> Result<Self> {
        if faces.len() < MIN_DICE {
            return Err(EngineError::InsufficientDice { found: faces.len() });
        }
        let dice = faces
            .iter()
            .map(|f| Die::new(f))
            .collect::<Result<Vec<_>>>()?;
        Self::new(dice, rng)
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        match &self.phase {
            Phase::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Prompt {
        match &self.phase {
            Phase::Idle => Prompt::Start,
            Phase::FirstMove(_) => Prompt::Guess,
            Phase::Choosing => Prompt::ChooseDie {
                options: self.state.available_dice().len(),
            },
            Phase::Throw { party, protocol } => Prompt::Contribution {
                party: *party,
                modulus: protocol.modulus(),
            },
            Phase::Finished(_) => Prompt::Finished,
        }
    }

    /// Commit to the first-move bit.
    pub fn start(&mut self) -> Result<Vec<GameEvent>> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(out_of_turn(&self.phase));
        }
        let committed = FirstMoveCommitted::commit(&mut self.rng)?;
        let digest = committed.digest();
        self.phase = Phase::FirstMove(committed);
        Ok(vec![GameEvent::FirstMoveCommitted { digest }])
    }

    /// Feed one line of counterpart input to whatever the session is waiting for.
    pub fn submit(&mut self, raw: &str) -> Result<Vec<GameEvent>> {
        let accepted = self.accept(raw).inspect_err(|e| {
            if e.is_recoverable() {
                tracing::warn!(input = raw.trim(), error = %e, "input rejected");
            }
        })?;

        let state = self.state.clone();
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match self.advance(phase, accepted) {
            Ok((next, events)) => {
                self.phase = next;
                Ok(events)
            }
            Err((phase, e)) => {
                tracing::error!(error = %e, "step failed, session left unchanged");
                self.phase = phase;
                self.state = state;
                Err(e)
            }
        }
    }

    /// Return the dice to the pool for another round on the same set.
    pub fn reset(&mut self) {
        self.state.reset();
        self.phase = Phase::Idle;
        self.player_score = None;
    }

    /// Run one transition. Every fallible step comes before a commitment is
    /// opened, so a failure hands the untouched phase back.
    fn advance(
        &mut self,
        phase: Phase,
        accepted: Accepted,
    ) -> std::result::Result<(Phase, Vec<GameEvent>), (Phase, EngineError)> {
        match (phase, accepted) {
            (Phase::FirstMove(committed), Accepted::Guess(guess)) => {
                let computer_die = if committed.is_correct(guess) {
                    None
                } else {
                    match self.computer_choose() {
                        Ok(die) => Some(die),
                        Err(e) => return Err((Phase::FirstMove(committed), e)),
                    }
                };
                let outcome = committed.receive_guess(guess).reveal();
                let mut events = vec![GameEvent::FirstMoveRevealed { outcome }];
                events.extend(computer_die.map(|die| GameEvent::DieChosen {
                    party: Party::Computer,
                    die,
                }));
                Ok((Phase::Choosing, events))
            }
            (Phase::Choosing, Accepted::Die(index)) => {
                self.player_choose(index).map_err(|e| (Phase::Choosing, e))
            }
            (
                Phase::Throw {
                    party: Party::Player,
                    protocol,
                },
                Accepted::Contribution(contribution),
            ) => {
                let (next, committed) = match self.begin_throw(Party::Computer) {
                    Ok(step) => step,
                    Err(e) => {
                        let phase = Phase::Throw {
                            party: Party::Player,
                            protocol,
                        };
                        return Err((phase, e));
                    }
                };
                let outcome = protocol.receive(contribution).reveal();
                self.player_score = Some(outcome.face);
                let resolved = GameEvent::ThrowResolved {
                    party: Party::Player,
                    outcome,
                };
                Ok((next, vec![resolved, committed]))
            }
            (
                Phase::Throw {
                    party: Party::Computer,
                    protocol,
                },
                Accepted::Contribution(contribution),
            ) => {
                let Some(player_score) = self.player_score else {
                    let phase = Phase::Throw {
                        party: Party::Computer,
                        protocol,
                    };
                    return Err((phase, EngineError::NoDieSelected(Party::Player)));
                };
                let outcome = protocol.receive(contribution).reveal();
                let summary = GameSummary::new(player_score, outcome.face);
                tracing::info!(
                    player_score,
                    computer_score = outcome.face,
                    verdict = ?summary.verdict,
                    "game finished"
                );
                let events = vec![
                    GameEvent::ThrowResolved {
                        party: Party::Computer,
                        outcome,
                    },
                    GameEvent::Finished { summary },
                ];
                Ok((Phase::Finished(summary), events))
            }
            (phase, _) => {
                let e = out_of_turn(&phase);
                Err((phase, e))
            }
        }
    }

    fn accept(&self, raw: &str) -> Result<Accepted> {
        match &self.phase {
            Phase::FirstMove(committed) => Ok(Accepted::Guess(committed.parse_guess(raw)?)),
            Phase::Choosing => Ok(Accepted::Die(parse_index(
                raw,
                self.state.available_dice().len(),
            )?)),
            Phase::Throw { protocol, .. } => {
                Ok(Accepted::Contribution(protocol.parse_contribution(raw)?))
            }
            Phase::Idle | Phase::Finished(_) => Err(out_of_turn(&self.phase)),
        }
    }

    fn player_choose(&mut self, index: usize) -> Result<(Phase, Vec<GameEvent>)> {
        let die = self.state.assign(Party::Player, index)?.clone();
        tracing::info!(party = %Party::Player, %die, "die chosen");
        let mut events = vec![GameEvent::DieChosen {
            party: Party::Player,
            die,
        }];
        if self.state.computer_die().is_none() {
            let die = self.computer_choose()?;
            events.push(GameEvent::DieChosen {
                party: Party::Computer,
                die,
            });
        }
        let (next, committed) = self.begin_throw(Party::Player)?;
        events.push(committed);
        Ok((next, events))
    }

    fn computer_choose(&mut self) -> Result<Die> {
        let options = self.state.available_dice().len();
        if options == 0 {
            return Err(EngineError::PoolExhausted);
        }
        let index = self.rng.uniform(options as i64 - 1)? as usize;
        let die = self.state.assign(Party::Computer, index)?.clone();
        tracing::info!(party = %Party::Computer, %die, "die chosen");
        Ok(die)
    }

    fn begin_throw(&mut self, party: Party) -> Result<(Phase, GameEvent)> {
        let die = self
            .state
            .die_of(party)
            .ok_or(EngineError::NoDieSelected(party))?;
        let protocol = ThrowCommitted::commit(&mut self.rng, die)?;
        let event = GameEvent::ThrowCommitted {
            party,
            digest: protocol.digest(),
            modulus: protocol.modulus(),
        };
        Ok((Phase::Throw { party, protocol }, event))
    }
}

fn out_of_turn(phase: &Phase) -> EngineError {
    let expected = match phase {
        Phase::Idle => "start",
        Phase::FirstMove(_) => "guess",
        Phase::Choosing => "die choice",
        Phase::Throw { .. } => "contribution",
        Phase::Finished(_) => "reset",
    };
    EngineError::OutOfTurn { expected }
}
