//! The 13 scoring categories and their fixed wire keys.
//!
//! Wire keys are part of the session protocol and must never change:
//! `"1s".."6s"` for the upper section, hyphenated names for the lower.

use serde::{Deserialize, Serialize};

/// Number of scoring categories on one card.
pub const NUM_CATS: usize = 13;

/// One Yahtzee scoring category.
///
/// Serializes to the protocol's fixed string keys (`"1s"`, `"full-house"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "1s")]
    Ones,
    #[serde(rename = "2s")]
    Twos,
    #[serde(rename = "3s")]
    Threes,
    #[serde(rename = "4s")]
    Fours,
    #[serde(rename = "5s")]
    Fives,
    #[serde(rename = "6s")]
    Sixes,
    #[serde(rename = "3-of-a-kind")]
    ThreeOfAKind,
    #[serde(rename = "4-of-a-kind")]
    FourOfAKind,
    #[serde(rename = "full-house")]
    FullHouse,
    #[serde(rename = "small-straight")]
    SmallStraight,
    #[serde(rename = "large-straight")]
    LargeStraight,
    #[serde(rename = "yahtzee")]
    Yahtzee,
    #[serde(rename = "chance")]
    Chance,
}

impl Category {
    /// All categories in card order (upper section first).
    pub const ALL: [Category; NUM_CATS] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Card slot index, 0..13.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Category::index`]. Returns `None` for out-of-range indices.
    pub fn from_index(idx: usize) -> Option<Category> {
        Category::ALL.get(idx).copied()
    }

    /// True for ones..sixes (the categories feeding the upper bonus).
    #[inline]
    pub fn is_upper(self) -> bool {
        (self as usize) < 6
    }

    /// The protocol string key for this category.
    pub fn wire_key(self) -> &'static str {
        match self {
            Category::Ones => "1s",
            Category::Twos => "2s",
            Category::Threes => "3s",
            Category::Fours => "4s",
            Category::Fives => "5s",
            Category::Sixes => "6s",
            Category::ThreeOfAKind => "3-of-a-kind",
            Category::FourOfAKind => "4-of-a-kind",
            Category::FullHouse => "full-house",
            Category::SmallStraight => "small-straight",
            Category::LargeStraight => "large-straight",
            Category::Yahtzee => "yahtzee",
            Category::Chance => "chance",
        }
    }

    /// Parse a protocol string key.
    pub fn from_wire_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.wire_key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip_and_order() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Category::from_index(i), Some(*c));
        }
        assert_eq!(Category::from_index(NUM_CATS), None);
    }

    #[test]
    fn wire_keys_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::from_wire_key(c.wire_key()), Some(c));
        }
        assert_eq!(Category::from_wire_key("2-of-a-kind"), None);
    }

    #[test]
    fn serde_uses_wire_keys() {
        let s = serde_json::to_string(&Category::FullHouse).unwrap();
        assert_eq!(s, "\"full-house\"");
        let c: Category = serde_json::from_str("\"1s\"").unwrap();
        assert_eq!(c, Category::Ones);
    }

    #[test]
    fn upper_section_is_first_six() {
        for c in Category::ALL {
            assert_eq!(c.is_upper(), c.index() < 6);
        }
    }
}
