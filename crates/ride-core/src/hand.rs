//! Five-card hand evaluation for Let It Ride
//!
//! Only the final rank class matters for payout — there is no opponent, so
//! kickers and tie-breaks are irrelevant. The one wrinkle over standard
//! poker classification is the base-game pair floor: a pair pays only at
//! tens or better, so `TensOrBetter` and `Nothing` split what poker would
//! both call "one pair" (or high card).

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Hand rank classes, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No paying hand (includes pairs below tens)
    Nothing,
    /// Pair of tens, jacks, queens, kings, or aces
    TensOrBetter,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    /// Ten-to-ace straight flush
    RoyalFlush,
}

impl HandRank {
    /// Does this rank pay anything on the base game?
    pub fn is_paying(self) -> bool {
        self != HandRank::Nothing
    }
}

/// Classify a complete 5-card hand.
pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();

    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high_card(&values);

    if flush {
        if let Some(high) = straight_high {
            return if high == Rank::Ace.value() {
                HandRank::RoyalFlush
            } else {
                HandRank::StraightFlush
            };
        }
    }

    // Rank multiplicities, sorted descending: e.g. full house -> [3, 2]
    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(v, &n)| (n, v as u8))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    match (groups[0].0, groups.get(1).map(|g| g.0).unwrap_or(0)) {
        (4, _) => HandRank::FourOfAKind,
        (3, 2) => HandRank::FullHouse,
        (3, _) => HandRank::ThreeOfAKind,
        (2, 2) => HandRank::TwoPair,
        (2, _) => {
            if groups[0].1 >= Rank::Ten.value() {
                HandRank::TensOrBetter
            } else {
                HandRank::Nothing
            }
        }
        _ => {
            if flush {
                HandRank::Flush
            } else if straight_high.is_some() {
                HandRank::Straight
            } else {
                HandRank::Nothing
            }
        }
    }
}

/// High card of a straight formed by `sorted` (ascending, len 5),
/// or `None` if not a straight. The wheel (A-2-3-4-5) reports a
/// high card of 5.
fn straight_high_card(sorted: &[u8]) -> Option<u8> {
    let distinct = sorted.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if sorted[4] - sorted[0] == 4 {
        return Some(sorted[4]);
    }
    // Ace-low: A,2,3,4,5 sorts as [2,3,4,5,14]
    if sorted[..4] == [2, 3, 4, 5] && sorted[4] == Rank::Ace.value() {
        return Some(5);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank::*, Suit::*};

    fn hand(specs: [(crate::cards::Rank, crate::cards::Suit); 5]) -> [Card; 5] {
        specs.map(|(r, s)| Card::new(r, s))
    }

    #[test]
    fn test_royal_flush() {
        let h = hand([
            (Ten, Hearts),
            (Jack, Hearts),
            (Queen, Hearts),
            (King, Hearts),
            (Ace, Hearts),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::RoyalFlush);
    }

    #[test]
    fn test_straight_flush() {
        let h = hand([
            (Five, Spades),
            (Six, Spades),
            (Seven, Spades),
            (Eight, Spades),
            (Nine, Spades),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::StraightFlush);
    }

    #[test]
    fn test_wheel_straight_flush_is_not_royal() {
        let h = hand([
            (Ace, Clubs),
            (Two, Clubs),
            (Three, Clubs),
            (Four, Clubs),
            (Five, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::StraightFlush);
    }

    #[test]
    fn test_four_of_a_kind() {
        let h = hand([
            (Nine, Clubs),
            (Nine, Diamonds),
            (Nine, Hearts),
            (Nine, Spades),
            (Two, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::FourOfAKind);
    }

    #[test]
    fn test_full_house() {
        let h = hand([
            (King, Clubs),
            (King, Diamonds),
            (King, Hearts),
            (Four, Spades),
            (Four, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::FullHouse);
    }

    #[test]
    fn test_flush() {
        let h = hand([
            (Two, Diamonds),
            (Five, Diamonds),
            (Nine, Diamonds),
            (Jack, Diamonds),
            (King, Diamonds),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::Flush);
    }

    #[test]
    fn test_ace_high_straight() {
        let h = hand([
            (Ten, Clubs),
            (Jack, Diamonds),
            (Queen, Hearts),
            (King, Spades),
            (Ace, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::Straight);
    }

    #[test]
    fn test_wheel_straight() {
        let h = hand([
            (Ace, Clubs),
            (Two, Diamonds),
            (Three, Hearts),
            (Four, Spades),
            (Five, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::Straight);
    }

    #[test]
    fn test_three_of_a_kind() {
        let h = hand([
            (Six, Clubs),
            (Six, Diamonds),
            (Six, Hearts),
            (Two, Spades),
            (King, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::ThreeOfAKind);
    }

    #[test]
    fn test_two_pair() {
        let h = hand([
            (Three, Clubs),
            (Three, Diamonds),
            (Eight, Hearts),
            (Eight, Spades),
            (King, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::TwoPair);
    }

    #[test]
    fn test_pair_of_tens_pays() {
        let h = hand([
            (Ten, Clubs),
            (Ten, Diamonds),
            (Three, Hearts),
            (Seven, Spades),
            (King, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::TensOrBetter);
    }

    #[test]
    fn test_pair_of_nines_does_not_pay() {
        let h = hand([
            (Nine, Clubs),
            (Nine, Diamonds),
            (Three, Hearts),
            (Seven, Spades),
            (King, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::Nothing);
    }

    #[test]
    fn test_high_card_nothing() {
        let h = hand([
            (Two, Clubs),
            (Five, Diamonds),
            (Eight, Hearts),
            (Jack, Spades),
            (King, Clubs),
        ]);
        assert_eq!(evaluate_five(&h), HandRank::Nothing);
    }

    #[test]
    fn test_rank_ordering() {
        assert!(HandRank::RoyalFlush > HandRank::StraightFlush);
        assert!(HandRank::TensOrBetter > HandRank::Nothing);
        assert!(HandRank::Flush > HandRank::Straight);
    }
}
