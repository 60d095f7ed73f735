#[cfg(test)]
mod tests {
    use crate::category::Category;
    use crate::state::{MatchState, PlayerBoard, ScoreCard, UPPER_BONUS};

    #[test]
    fn score_card_fill_is_write_once() {
        let mut card = ScoreCard::new();
        assert!(!card.is_filled(Category::Yahtzee));
        assert!(card.fill(Category::Yahtzee, 50));
        assert!(!card.fill(Category::Yahtzee, 0));
        assert_eq!(card.get(Category::Yahtzee), Some(50));
        assert_eq!(card.filled_count(), 1);
    }

    #[test]
    fn upper_total_ignores_lower_section() {
        let mut card = ScoreCard::new();
        card.fill(Category::Ones, 3);
        card.fill(Category::Sixes, 24);
        card.fill(Category::Chance, 21);
        assert_eq!(card.upper_total(), 27);
        assert_eq!(card.raw_total(), 48);
    }

    #[test]
    fn card_completes_at_thirteen_fills() {
        let mut card = ScoreCard::new();
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert!(!card.is_complete());
            card.fill(*cat, i as i32);
        }
        assert!(card.is_complete());
    }

    #[test]
    fn board_total_includes_bonus_only_when_awarded() {
        let mut board = PlayerBoard::default();
        board.card.fill(Category::Sixes, 30);
        assert_eq!(board.total(), 30);
        board.bonus_awarded = true;
        assert_eq!(board.total(), 30 + UPPER_BONUS);
    }

    #[test]
    fn unlocked_selection_inverts_lock_flags() {
        let mut s = MatchState::new();
        s.locked = [true, false, true, false, false];
        assert_eq!(s.unlocked_selection(), [false, true, false, true, true]);
    }

    #[test]
    fn other_seat() {
        assert_eq!(MatchState::other(0), 1);
        assert_eq!(MatchState::other(1), 0);
    }
}
