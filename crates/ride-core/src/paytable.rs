//! Paytable and payout calculation

use serde::{Deserialize, Serialize};

use crate::hand::HandRank;

/// Pay multipliers per hand rank, expressed as X-to-1
///
/// A riding bet on a paying hand returns `bet * multiplier` profit; a
/// non-paying hand loses the bet. Pulled bets are returned untouched and
/// never consult the paytable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    pub royal_flush: f64,
    pub straight_flush: f64,
    pub four_of_a_kind: f64,
    pub full_house: f64,
    pub flush: f64,
    pub straight: f64,
    pub three_of_a_kind: f64,
    pub two_pair: f64,
    pub tens_or_better: f64,
}

impl PayTable {
    /// The most common house schedule (1000-200-50-11-8-5-3-2-1)
    pub fn standard() -> Self {
        Self {
            royal_flush: 1000.0,
            straight_flush: 200.0,
            four_of_a_kind: 50.0,
            full_house: 11.0,
            flush: 8.0,
            straight: 5.0,
            three_of_a_kind: 3.0,
            two_pair: 2.0,
            tens_or_better: 1.0,
        }
    }

    /// Pay multiplier for a rank (0.0 for non-paying hands)
    pub fn multiplier(&self, rank: HandRank) -> f64 {
        match rank {
            HandRank::RoyalFlush => self.royal_flush,
            HandRank::StraightFlush => self.straight_flush,
            HandRank::FourOfAKind => self.four_of_a_kind,
            HandRank::FullHouse => self.full_house,
            HandRank::Flush => self.flush,
            HandRank::Straight => self.straight,
            HandRank::ThreeOfAKind => self.three_of_a_kind,
            HandRank::TwoPair => self.two_pair,
            HandRank::TensOrBetter => self.tens_or_better,
            HandRank::Nothing => 0.0,
        }
    }

    /// Net result of one riding bet: positive profit on a paying hand,
    /// `-bet` on a loser. Pure lookup.
    pub fn payout(&self, rank: HandRank, bet: f64) -> f64 {
        if rank.is_paying() {
            bet * self.multiplier(rank)
        } else {
            -bet
        }
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schedule() {
        let pt = PayTable::standard();
        assert_eq!(pt.multiplier(HandRank::RoyalFlush), 1000.0);
        assert_eq!(pt.multiplier(HandRank::TensOrBetter), 1.0);
        assert_eq!(pt.multiplier(HandRank::Nothing), 0.0);
    }

    #[test]
    fn test_payout_win() {
        let pt = PayTable::standard();
        assert_eq!(pt.payout(HandRank::Flush, 5.0), 40.0);
        assert_eq!(pt.payout(HandRank::TensOrBetter, 10.0), 10.0);
    }

    #[test]
    fn test_payout_loss() {
        let pt = PayTable::standard();
        assert_eq!(pt.payout(HandRank::Nothing, 5.0), -5.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let pt = PayTable::standard();
        let json = serde_json::to_string(&pt).unwrap();
        let back: PayTable = serde_json::from_str(&json).unwrap();
        assert_eq!(pt, back);
    }
}
