//! Turn/scoring state machine: the single place that mutates match state.
//!
//! Every transition validates against the current state first and only then
//! mutates, so a rejected call leaves the match exactly as it was.

use thiserror::Error;

use crate::category::Category;
use crate::scoring::score_for_category;
use crate::state::{
    MatchOutcome, MatchState, TurnPhase, MAX_ROLLS, NUM_DICE, NUM_ROUNDS, UPPER_BONUS_THRESHOLD,
};

/// Rejected transition. State is unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("match is already over")]
    MatchOver,
    #[error("seat {seat} is not the active player")]
    NotYourTurn { seat: u8 },
    #[error("seat {seat} out of range")]
    BadSeat { seat: u8 },
    #[error("roll limit reached for this turn")]
    RollLimitReached,
    #[error("a roll is already in flight")]
    RollInFlight,
    #[error("no roll is in flight")]
    NoRollInFlight,
    #[error("no roll has been taken this turn")]
    NoRollThisTurn,
    #[error("die index {index} out of range")]
    BadDieIndex { index: usize },
    #[error("roll selection is empty")]
    EmptySelection,
    #[error("category {cat:?} is already filled")]
    CategoryFilled { cat: Category },
    #[error("invalid roll outcome: {msg}")]
    BadOutcome { msg: &'static str },
}

/// Match result as seen from one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatResult {
    Win,
    Lose,
    Tie,
    OpponentLeft,
}

/// What a successful `fill` committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub score: i32,
    /// True if this fill crossed the upper-section threshold.
    pub bonus_awarded: bool,
}

/// The authoritative turn state machine for one match.
#[derive(Debug, Clone)]
pub struct TurnEngine {
    state: MatchState,
}

impl TurnEngine {
    pub fn new() -> Self {
        Self {
            state: MatchState::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    fn check_actor(&self, seat: u8) -> Result<(), TransitionError> {
        if seat > 1 {
            return Err(TransitionError::BadSeat { seat });
        }
        if self.state.is_over() {
            return Err(TransitionError::MatchOver);
        }
        if seat != self.state.active {
            return Err(TransitionError::NotYourTurn { seat });
        }
        Ok(())
    }

    /// Validate and stage a roll for the active player.
    ///
    /// Returns the effective selection: on the first roll of a turn every
    /// die is picked up regardless of `requested`; afterwards the request is
    /// restricted to unlocked dice. The match moves to `Rolling` and no
    /// other transition is accepted until [`TurnEngine::finish_roll`] or
    /// [`TurnEngine::abort_roll`].
    pub fn begin_roll(
        &mut self,
        seat: u8,
        requested: &[usize],
    ) -> Result<[bool; NUM_DICE], TransitionError> {
        self.check_actor(seat)?;
        if self.state.phase == TurnPhase::Rolling {
            return Err(TransitionError::RollInFlight);
        }
        if self.state.rolls_used >= MAX_ROLLS {
            return Err(TransitionError::RollLimitReached);
        }
        for &i in requested {
            if i >= NUM_DICE {
                return Err(TransitionError::BadDieIndex { index: i });
            }
        }

        let selection = if self.state.rolls_used == 0 {
            [true; NUM_DICE]
        } else {
            let mut sel = [false; NUM_DICE];
            for &i in requested {
                if !self.state.locked[i] {
                    sel[i] = true;
                }
            }
            sel
        };
        if !selection.iter().any(|&s| s) {
            return Err(TransitionError::EmptySelection);
        }

        self.state.phase = TurnPhase::Rolling;
        Ok(selection)
    }

    /// Commit a completed roll outcome.
    ///
    /// Dice held during the roll must come back with their previous values;
    /// a mismatch rejects the whole outcome.
    pub fn finish_roll(&mut self, outcome: [u8; NUM_DICE]) -> Result<(), TransitionError> {
        if self.state.is_over() {
            return Err(TransitionError::MatchOver);
        }
        if self.state.phase != TurnPhase::Rolling {
            return Err(TransitionError::NoRollInFlight);
        }
        for &d in &outcome {
            if !(1..=6).contains(&d) {
                return Err(TransitionError::BadOutcome {
                    msg: "die face out of range",
                });
            }
        }
        if self.state.rolls_used > 0 {
            for i in 0..NUM_DICE {
                if self.state.locked[i] && outcome[i] != self.state.dice[i] {
                    return Err(TransitionError::BadOutcome {
                        msg: "held die changed value",
                    });
                }
            }
        }

        self.state.dice = outcome;
        self.state.rolls_used += 1;
        self.state.phase = TurnPhase::AwaitingAction;
        Ok(())
    }

    /// Cancel an in-flight roll without committing anything.
    ///
    /// Used when the simulation is abandoned (match teardown mid-roll).
    pub fn abort_roll(&mut self) -> Result<(), TransitionError> {
        if self.state.phase != TurnPhase::Rolling {
            return Err(TransitionError::NoRollInFlight);
        }
        self.state.phase = if self.state.rolls_used == 0 {
            TurnPhase::AwaitingRoll
        } else {
            TurnPhase::AwaitingAction
        };
        Ok(())
    }

    /// Flip whether die `index` is held out of the next roll.
    ///
    /// Only meaningful after the first roll of the turn; returns the new
    /// lock flag.
    pub fn toggle_lock(&mut self, seat: u8, index: usize) -> Result<bool, TransitionError> {
        self.check_actor(seat)?;
        if index >= NUM_DICE {
            return Err(TransitionError::BadDieIndex { index });
        }
        match self.state.phase {
            TurnPhase::Rolling => return Err(TransitionError::RollInFlight),
            TurnPhase::AwaitingRoll => return Err(TransitionError::NoRollThisTurn),
            TurnPhase::AwaitingAction => {}
        }

        self.state.locked[index] = !self.state.locked[index];
        Ok(self.state.locked[index])
    }

    /// Commit the current hand into `cat` for the active player and advance
    /// the turn (and possibly the round / the match result).
    pub fn fill(&mut self, seat: u8, cat: Category) -> Result<FillReport, TransitionError> {
        self.check_actor(seat)?;
        match self.state.phase {
            TurnPhase::Rolling => return Err(TransitionError::RollInFlight),
            TurnPhase::AwaitingRoll => return Err(TransitionError::NoRollThisTurn),
            TurnPhase::AwaitingAction => {}
        }
        let p = seat as usize;
        if self.state.boards[p].card.is_filled(cat) {
            return Err(TransitionError::CategoryFilled { cat });
        }

        let score = score_for_category(cat, self.state.dice);
        let filled = self.state.boards[p].card.fill(cat, score);
        debug_assert!(filled);

        // Sticky bonus: once the upper total reaches the threshold the flag
        // stays set for the rest of the match.
        let mut bonus_awarded = false;
        if !self.state.boards[p].bonus_awarded
            && self.state.boards[p].card.upper_total() >= UPPER_BONUS_THRESHOLD
        {
            self.state.boards[p].bonus_awarded = true;
            bonus_awarded = true;
        }

        if self.state.boards.iter().all(|b| b.card.is_complete()) {
            self.state.outcome = Some(winner_by_total(&self.state));
            self.state.active = 0;
        } else if self.state.active == 0 {
            self.state.active = 1;
        } else {
            self.state.active = 0;
            if self.state.round < NUM_ROUNDS {
                self.state.round += 1;
            }
        }
        self.state.rolls_used = 0;
        self.state.locked = [false; NUM_DICE];
        self.state.phase = TurnPhase::AwaitingRoll;

        Ok(FillReport {
            score,
            bonus_awarded,
        })
    }

    /// Force the match over because `leaver` dropped. Terminal: accepted
    /// from any non-terminal state, rejected once the match has ended.
    pub fn opponent_disconnect(&mut self, leaver: u8) -> Result<(), TransitionError> {
        if leaver > 1 {
            return Err(TransitionError::BadSeat { seat: leaver });
        }
        if self.state.is_over() {
            return Err(TransitionError::MatchOver);
        }
        self.state.outcome = Some(MatchOutcome::Disconnected { leaver });
        self.state.phase = TurnPhase::AwaitingRoll;
        Ok(())
    }

    /// Terminal result from `seat`'s point of view, if the match is over.
    ///
    /// For a disconnect only the remaining seat is addressed; the leaver
    /// also gets `OpponentLeft` for symmetry (nothing is delivered to them).
    pub fn result_for_seat(&self, seat: u8) -> Option<SeatResult> {
        match self.state.outcome? {
            MatchOutcome::Winner(w) => Some(if w == seat {
                SeatResult::Win
            } else {
                SeatResult::Lose
            }),
            MatchOutcome::Tie => Some(SeatResult::Tie),
            MatchOutcome::Disconnected { .. } => Some(SeatResult::OpponentLeft),
        }
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn winner_by_total(state: &MatchState) -> MatchOutcome {
    let t0 = state.boards[0].total();
    let t1 = state.boards[1].total();
    if t0 > t1 {
        MatchOutcome::Winner(0)
    } else if t1 > t0 {
        MatchOutcome::Winner(1)
    } else {
        MatchOutcome::Tie
    }
}
