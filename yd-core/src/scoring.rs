//! Pure dice → category scoring.
//!
//! Everything here is a function of the 5-die hand alone; card state,
//! turn state, and the upper bonus live in the engine.

use crate::category::{Category, NUM_CATS};

/// Score awarded for a full house.
pub const FULL_HOUSE_SCORE: i32 = 25;
/// Score awarded for a small straight (4 consecutive faces).
pub const SMALL_STRAIGHT_SCORE: i32 = 30;
/// Score awarded for a large straight (5 consecutive faces).
pub const LARGE_STRAIGHT_SCORE: i32 = 40;
/// Score awarded for five of a kind.
pub const YAHTZEE_SCORE: i32 = 50;

/// Occurrences of each face; `counts[f - 1]` is the count of face `f`.
///
/// Input dice must be in 1..=6.
pub fn face_counts(dice: [u8; 5]) -> [u8; 6] {
    let mut counts = [0u8; 6];
    for &d in &dice {
        debug_assert!((1..=6).contains(&d), "die face out of range: {}", d);
        counts[(d - 1) as usize] += 1;
    }
    counts
}

fn dice_sum(dice: [u8; 5]) -> i32 {
    dice.iter().map(|&d| d as i32).sum()
}

/// Candidate score for a single category given the current hand.
///
/// Order of the dice does not matter. The result is a raw category value;
/// the upper bonus is applied by the engine when a card crosses 63.
pub fn score_for_category(cat: Category, dice: [u8; 5]) -> i32 {
    let counts = face_counts(dice);
    match cat {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = cat.index() as i32 + 1;
            face * counts[cat.index()] as i32
        }
        Category::ThreeOfAKind => {
            if counts.iter().any(|&c| c >= 3) {
                dice_sum(dice)
            } else {
                0
            }
        }
        Category::FourOfAKind => {
            if counts.iter().any(|&c| c >= 4) {
                dice_sum(dice)
            } else {
                0
            }
        }
        // Exact multiset {3,2}: a five-of-a-kind hand has no distinct pair
        // and must not score here.
        Category::FullHouse => {
            let has_triple = counts.iter().any(|&c| c == 3);
            let has_pair = counts.iter().any(|&c| c == 2);
            if has_triple && has_pair {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            let run = |lo: usize| (lo..lo + 4).all(|f| counts[f] >= 1);
            if run(0) || run(1) || run(2) {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            let run = |lo: usize| (lo..lo + 5).all(|f| counts[f] == 1);
            if run(0) || run(1) {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if counts.iter().any(|&c| c == 5) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => dice_sum(dice),
    }
}

/// Compute the full candidate table for a 5-die hand, indexed by
/// [`Category::index`].
///
/// Deterministic and pure: the same hand always produces the same table,
/// independent of any match state.
pub fn scores_for_dice(dice: [u8; 5]) -> [i32; NUM_CATS] {
    let mut out = [0i32; NUM_CATS];
    for cat in Category::ALL {
        out[cat.index()] = score_for_category(cat, dice);
    }
    out
}
