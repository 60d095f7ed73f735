//! Authoritative match state: score cards, turn phase, terminal result.

use crate::category::{Category, NUM_CATS};

/// Number of dice in play.
pub const NUM_DICE: usize = 5;
/// Rounds per match; each player fills one category per round.
pub const NUM_ROUNDS: u8 = 13;
/// Maximum rolls per turn.
pub const MAX_ROLLS: u8 = 3;
/// One-time bonus once the upper section reaches the threshold.
pub const UPPER_BONUS: i32 = 35;
/// Upper-section total required for the bonus.
pub const UPPER_BONUS_THRESHOLD: i32 = 63;

/// One player's 13 category slots. `None` = not filled yet.
///
/// Invariant: a filled slot is never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCard {
    slots: [Option<i32>; NUM_CATS],
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, cat: Category) -> Option<i32> {
        self.slots[cat.index()]
    }

    #[inline]
    pub fn is_filled(&self, cat: Category) -> bool {
        self.slots[cat.index()].is_some()
    }

    /// Record a score. Returns false (and leaves the card untouched) if the
    /// slot is already filled.
    pub fn fill(&mut self, cat: Category, score: i32) -> bool {
        debug_assert!(score >= 0, "category scores are never negative");
        if self.is_filled(cat) {
            return false;
        }
        self.slots[cat.index()] = Some(score);
        true
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled_count() == NUM_CATS
    }

    /// Sum of the filled upper-section slots (ones..sixes).
    pub fn upper_total(&self) -> i32 {
        Category::ALL
            .iter()
            .filter(|c| c.is_upper())
            .filter_map(|c| self.get(*c))
            .sum()
    }

    /// Sum of all filled slots, without the bonus.
    pub fn raw_total(&self) -> i32 {
        self.slots.iter().flatten().sum()
    }
}

/// One player's card plus the sticky bonus flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerBoard {
    pub card: ScoreCard,
    /// Set once the upper total reaches 63; never cleared afterwards.
    pub bonus_awarded: bool,
}

impl PlayerBoard {
    /// Grand total including the bonus if awarded.
    pub fn total(&self) -> i32 {
        self.card.raw_total() + if self.bonus_awarded { UPPER_BONUS } else { 0 }
    }
}

/// Where the active player is within their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No roll this turn yet; fill and lock are not allowed.
    AwaitingRoll,
    /// A roll simulation is in flight; every other mutation is rejected.
    Rolling,
    /// At least one roll has landed; the player may reroll, lock, or fill.
    AwaitingAction,
}

/// Terminal result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Seat 0 or 1 won on total score.
    Winner(u8),
    /// Equal totals.
    Tie,
    /// The named seat disconnected before the match finished.
    Disconnected { leaver: u8 },
}

/// The authoritative per-match state. Mutated only through
/// [`crate::engine::TurnEngine`] transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub boards: [PlayerBoard; 2],
    /// Current face values; 0 means "not rolled yet this match".
    /// After the first roll every entry is in 1..=6.
    pub dice: [u8; NUM_DICE],
    /// Dice excluded from the next roll. Meaningful only while
    /// `rolls_used > 0`; cleared at every turn handoff.
    pub locked: [bool; NUM_DICE],
    /// Rolls taken this turn, 0..=3.
    pub rolls_used: u8,
    /// Current round, 1..=13.
    pub round: u8,
    /// Active seat, 0 or 1.
    pub active: u8,
    pub phase: TurnPhase,
    /// `Some` once the match is over; no transition is accepted afterwards.
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            boards: [PlayerBoard::default(); 2],
            dice: [0; NUM_DICE],
            locked: [false; NUM_DICE],
            rolls_used: 0,
            round: 1,
            active: 0,
            phase: TurnPhase::AwaitingRoll,
            outcome: None,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The seat opposing `seat`.
    #[inline]
    pub fn other(seat: u8) -> u8 {
        1u8.saturating_sub(seat)
    }

    /// Dice that a roll would currently pick up (unlocked positions).
    pub fn unlocked_selection(&self) -> [bool; NUM_DICE] {
        let mut sel = [false; NUM_DICE];
        for (i, s) in sel.iter_mut().enumerate() {
            *s = !self.locked[i];
        }
        sel
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
