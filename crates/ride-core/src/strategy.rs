//! Play strategies — the ride/pull decision points
//!
//! Let It Ride stakes three equal bets up front. The player sees their
//! three cards and may pull the first bet, then sees the fourth card
//! (first community card) and may pull the second. The third bet always
//! rides. A strategy answers those two questions and nothing else.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// The two possible answers at each decision point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Leave the bet in play
    Ride,
    /// Take the bet back
    Pull,
}

/// A play strategy, consulted twice per hand
pub trait Strategy: Send + Sync {
    /// Decision on the first bet, seeing only the three player cards
    fn decide_bet1(&self, cards: &[Card; 3]) -> Decision;

    /// Decision on the second bet, seeing the first community card too
    fn decide_bet2(&self, cards: &[Card; 4]) -> Decision;

    /// Name for logs and reports
    fn name(&self) -> &'static str;
}

/// Tagged strategy selector; resolved to a boxed object once at session
/// construction, never per hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Basic,
    AlwaysRide,
    NeverRide,
}

impl StrategyKind {
    /// Build the concrete strategy object
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Basic => Box::new(BasicStrategy),
            StrategyKind::AlwaysRide => Box::new(AlwaysRide),
            StrategyKind::NeverRide => Box::new(NeverRide),
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Basic
    }
}

/// The published optimal basic strategy (house edge ~3.51%)
#[derive(Debug, Clone, Copy)]
pub struct BasicStrategy;

impl Strategy for BasicStrategy {
    fn decide_bet1(&self, cards: &[Card; 3]) -> Decision {
        if three_card_rides(cards) {
            Decision::Ride
        } else {
            Decision::Pull
        }
    }

    fn decide_bet2(&self, cards: &[Card; 4]) -> Decision {
        if four_card_rides(cards) {
            Decision::Ride
        } else {
            Decision::Pull
        }
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

/// Rides both bets unconditionally (maximum variance baseline)
#[derive(Debug, Clone, Copy)]
pub struct AlwaysRide;

impl Strategy for AlwaysRide {
    fn decide_bet1(&self, _cards: &[Card; 3]) -> Decision {
        Decision::Ride
    }

    fn decide_bet2(&self, _cards: &[Card; 4]) -> Decision {
        Decision::Ride
    }

    fn name(&self) -> &'static str {
        "always_ride"
    }
}

/// Pulls both bets unconditionally (minimum variance baseline)
#[derive(Debug, Clone, Copy)]
pub struct NeverRide;

impl Strategy for NeverRide {
    fn decide_bet1(&self, _cards: &[Card; 3]) -> Decision {
        Decision::Pull
    }

    fn decide_bet2(&self, _cards: &[Card; 4]) -> Decision {
        Decision::Pull
    }

    fn name(&self) -> &'static str {
        "never_ride"
    }
}

/// Basic strategy, bet 1: ride with a made paying hand, three to a royal,
/// an open three-card straight flush, or a gapped three-card straight
/// flush with enough high cards to compensate.
fn three_card_rides(cards: &[Card; 3]) -> bool {
    if made_paying_hand_3(cards) {
        return true;
    }

    let suited = cards.iter().all(|c| c.suit == cards[0].suit);
    if !suited {
        return false;
    }

    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    let high_cards = values.iter().filter(|&&v| v >= Rank::Ten.value()).count();

    // Three to a royal
    if high_cards == 3 {
        return true;
    }

    let spread = values[2] - values[0];
    if values[0] == values[1] || values[1] == values[2] {
        return false;
    }

    match spread {
        // Open straight flush, except the unplayable low ends (2-3-4, A-2-3)
        2 => values[0] > 2,
        // One gap with at least one high card
        3 => high_cards >= 1,
        // Two gaps with at least two high cards
        4 => high_cards >= 2,
        _ => false,
    }
}

/// Basic strategy, bet 2: ride with a made paying hand, four to a flush,
/// an open four-card straight with a high card, or four high cards.
fn four_card_rides(cards: &[Card; 4]) -> bool {
    if made_paying_hand_4(cards) {
        return true;
    }

    if cards.iter().all(|c| c.suit == cards[0].suit) {
        return true;
    }

    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    let high_cards = values.iter().filter(|&&v| v >= Rank::Ten.value()).count();
    let distinct = values.windows(2).all(|w| w[0] != w[1]);

    if distinct && values[3] - values[0] == 3 && high_cards >= 1 {
        return true;
    }

    high_cards == 4
}

fn made_paying_hand_3(cards: &[Card; 3]) -> bool {
    // Trips always pay; a pair pays at tens or better
    for i in 0..3 {
        for j in (i + 1)..3 {
            if cards[i].rank == cards[j].rank {
                let trips = cards.iter().filter(|c| c.rank == cards[i].rank).count() == 3;
                return trips || cards[i].rank.is_paying_pair_rank();
            }
        }
    }
    false
}

fn made_paying_hand_4(cards: &[Card; 4]) -> bool {
    let mut counts = [0u8; 15];
    for c in cards {
        counts[c.rank.value() as usize] += 1;
    }
    let pairs = counts.iter().filter(|&&n| n == 2).count();
    let trips_or_quads = counts.iter().any(|&n| n >= 3);
    if trips_or_quads || pairs >= 2 {
        return true;
    }
    counts
        .iter()
        .enumerate()
        .any(|(v, &n)| n == 2 && v as u8 >= Rank::Ten.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank::*, Suit::*};

    fn c(r: crate::cards::Rank, s: crate::cards::Suit) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn test_bet1_rides_on_paying_pair() {
        let cards = [c(Jack, Clubs), c(Jack, Hearts), c(Four, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet1_pulls_on_low_pair() {
        let cards = [c(Six, Clubs), c(Six, Hearts), c(Four, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Pull);
    }

    #[test]
    fn test_bet1_rides_on_trips() {
        let cards = [c(Three, Clubs), c(Three, Hearts), c(Three, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet1_rides_on_royal_draw() {
        let cards = [c(Ten, Hearts), c(Queen, Hearts), c(Ace, Hearts)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet1_rides_on_open_straight_flush_draw() {
        let cards = [c(Six, Spades), c(Seven, Spades), c(Eight, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet1_pulls_on_low_end_straight_flush_draw() {
        // 2-3-4 suited is the documented exception
        let cards = [c(Two, Spades), c(Three, Spades), c(Four, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Pull);
    }

    #[test]
    fn test_bet1_pulls_on_unsuited_straight_draw() {
        let cards = [c(Six, Spades), c(Seven, Hearts), c(Eight, Spades)];
        assert_eq!(BasicStrategy.decide_bet1(&cards), Decision::Pull);
    }

    #[test]
    fn test_bet1_gapped_draw_needs_high_card() {
        // 5-6-8 suited, one gap, no high card: pull
        let low = [c(Five, Clubs), c(Six, Clubs), c(Eight, Clubs)];
        assert_eq!(BasicStrategy.decide_bet1(&low), Decision::Pull);

        // 8-9-J suited, one gap, one high card: ride
        let high = [c(Eight, Clubs), c(Nine, Clubs), c(Jack, Clubs)];
        assert_eq!(BasicStrategy.decide_bet1(&high), Decision::Ride);
    }

    #[test]
    fn test_bet2_rides_on_four_flush() {
        let cards = [
            c(Two, Hearts),
            c(Five, Hearts),
            c(Nine, Hearts),
            c(King, Hearts),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet2_rides_on_paying_pair() {
        let cards = [
            c(Queen, Clubs),
            c(Queen, Hearts),
            c(Four, Spades),
            c(Nine, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet2_rides_on_two_low_pairs() {
        let cards = [
            c(Three, Clubs),
            c(Three, Hearts),
            c(Seven, Spades),
            c(Seven, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet2_open_straight_needs_high_card() {
        // 4-5-6-7 rainbow: pull
        let low = [
            c(Four, Clubs),
            c(Five, Hearts),
            c(Six, Spades),
            c(Seven, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&low), Decision::Pull);

        // 8-9-10-J rainbow: ride
        let high = [
            c(Eight, Clubs),
            c(Nine, Hearts),
            c(Ten, Spades),
            c(Jack, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&high), Decision::Ride);
    }

    #[test]
    fn test_bet2_rides_on_four_high_cards() {
        let cards = [
            c(Ten, Clubs),
            c(Jack, Hearts),
            c(Queen, Spades),
            c(Ace, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&cards), Decision::Ride);
    }

    #[test]
    fn test_bet2_pulls_on_junk() {
        let cards = [
            c(Two, Clubs),
            c(Six, Hearts),
            c(Nine, Spades),
            c(King, Diamonds),
        ];
        assert_eq!(BasicStrategy.decide_bet2(&cards), Decision::Pull);
    }

    #[test]
    fn test_fixed_strategies() {
        let three = [c(Two, Clubs), c(Six, Hearts), c(Nine, Spades)];
        let four = [
            c(Two, Clubs),
            c(Six, Hearts),
            c(Nine, Spades),
            c(King, Diamonds),
        ];
        assert_eq!(AlwaysRide.decide_bet1(&three), Decision::Ride);
        assert_eq!(AlwaysRide.decide_bet2(&four), Decision::Ride);
        assert_eq!(NeverRide.decide_bet1(&three), Decision::Pull);
        assert_eq!(NeverRide.decide_bet2(&four), Decision::Pull);
    }

    #[test]
    fn test_kind_builds_named_strategy() {
        assert_eq!(StrategyKind::Basic.build().name(), "basic");
        assert_eq!(StrategyKind::AlwaysRide.build().name(), "always_ride");
        assert_eq!(StrategyKind::NeverRide.build().name(), "never_ride");
    }

    #[test]
    fn test_kind_serde_tag() {
        let json = serde_json::to_string(&StrategyKind::AlwaysRide).unwrap();
        assert_eq!(json, "\"always_ride\"");
    }
}
