//! Session event payloads.
//!
//! Shapes and field names follow the original socket protocol: inbound
//! events are snake_case (`roll`, `fill`, `game_initialize`), outbound
//! events camelCase (`oppoStartRoll`, `gameUpdate`, `gameOver`,
//! `opponentDisconnect`). The transport itself is not part of this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use yd_core::{Category, ScoreCard, NUM_DICE};

/// Protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

/// Wire sentinel for an unfilled category and for a not-yet-rolled die.
/// Legal scores and faces are always >= 0, so the sentinel is unambiguous.
pub const UNFILLED: i32 = -1;

pub type PlayerId = String;
pub type MatchId = String;

/// Full category table as sent on the wire; unfilled slots are `-1`.
pub type ScoreTableV1 = BTreeMap<Category, i32>;

/// Convert a score card to its wire table.
pub fn score_table(card: &ScoreCard) -> ScoreTableV1 {
    Category::ALL
        .iter()
        .map(|&c| (c, card.get(c).unwrap_or(UNFILLED)))
        .collect()
}

/// Dice faces as sent on the wire; unrolled dice (face 0) become `-1`.
pub fn dice_wire(dice: [u8; NUM_DICE]) -> [i32; NUM_DICE] {
    let mut out = [UNFILLED; NUM_DICE];
    for (o, &d) in out.iter_mut().zip(dice.iter()) {
        if d != 0 {
            *o = d as i32;
        }
    }
    out
}

/// Events arriving from a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Request a roll of the dice at `index`.
    Roll {
        game_id: MatchId,
        player_id: PlayerId,
        index: Vec<usize>,
    },
    /// Commit the current hand into the category `key`.
    Fill {
        game_id: MatchId,
        player_id: PlayerId,
        key: Category,
    },
    /// Request the full current snapshot (resume after reload).
    GameInitialize {
        game_id: MatchId,
        player_id: PlayerId,
    },
}

/// Terminal status from one seat's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOverStatus {
    Win,
    Lose,
    Tie,
}

/// Partial or full game state pushed to participants. Only the fields
/// relevant to the triggering event are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameUpdateV1 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<[i32; NUM_DICE]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i_roll: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_player: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_active: Option<ScoreTableV1>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_inactive: Option<ScoreTableV1>,
}

/// Events pushed out to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// The opponent started rolling these dice (drives their animation).
    OppoStartRoll { index: Vec<usize> },
    GameUpdate(GameUpdateV1),
    GameOver { status: GameOverStatus },
    OpponentDisconnect { player_id: PlayerId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_roll_wire_shape() {
        let json = r#"{"event":"roll","data":{"game_id":"g1","player_id":"p1","index":[0,2,4]}}"#;
        let ev: InboundEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            ev,
            InboundEvent::Roll {
                game_id: "g1".to_string(),
                player_id: "p1".to_string(),
                index: vec![0, 2, 4],
            }
        );
    }

    #[test]
    fn inbound_fill_uses_category_wire_keys() {
        let json = r#"{"event":"fill","data":{"game_id":"g1","player_id":"p1","key":"full-house"}}"#;
        let ev: InboundEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            ev,
            InboundEvent::Fill {
                key: Category::FullHouse,
                ..
            }
        ));
    }

    #[test]
    fn outbound_events_use_camel_case_tags() {
        let ev = OutboundEvent::OppoStartRoll { index: vec![1] };
        let v: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["event"], "oppoStartRoll");

        let ev = OutboundEvent::GameOver {
            status: GameOverStatus::Tie,
        };
        let v: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["event"], "gameOver");
        assert_eq!(v["data"]["status"], "tie");
    }

    #[test]
    fn game_update_omits_absent_fields() {
        let update = GameUpdateV1 {
            dice: Some([1, 2, 3, 4, 5]),
            i_roll: Some(1),
            ..GameUpdateV1::default()
        };
        let v: serde_json::Value = serde_json::to_value(&update).unwrap();
        assert_eq!(v["dice"][0], 1);
        assert_eq!(v["i_roll"], 1);
        assert!(v.get("round").is_none());
        assert!(v.get("score_active").is_none());
    }

    #[test]
    fn score_table_marks_unfilled_with_sentinel() {
        let mut card = ScoreCard::new();
        card.fill(Category::Yahtzee, 50);
        card.fill(Category::Ones, 0);
        let table = score_table(&card);
        assert_eq!(table[&Category::Yahtzee], 50);
        assert_eq!(table[&Category::Ones], 0);
        assert_eq!(table[&Category::Chance], UNFILLED);
        assert_eq!(table.len(), 13);

        let v = serde_json::to_value(&table).unwrap();
        assert_eq!(v["yahtzee"], 50);
        assert_eq!(v["chance"], -1);
        assert_eq!(v["1s"], 0);
    }

    #[test]
    fn unrolled_dice_serialize_as_sentinel() {
        assert_eq!(dice_wire([0; 5]), [-1; 5]);
        assert_eq!(dice_wire([1, 6, 0, 3, 2]), [1, 6, -1, 3, 2]);
    }
}
