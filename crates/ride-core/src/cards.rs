//! Cards and deck handling

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Card rank, ordered Two < Three < … < King < Ace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    /// All thirteen ranks in ascending order
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value (2-14, ace high)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Pair of this rank or better pays on the base game (tens or better)
    pub fn is_paying_pair_rank(self) -> bool {
        self >= Rank::Ten
    }
}

/// Card suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All four suits
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

/// A single playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

/// A 52-card deck with a dealing cursor
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// Create an unshuffled standard 52-card deck
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards, next: 0 }
    }

    /// Create a freshly shuffled deck using the caller's generator
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        // Fisher-Yates
        for i in (1..deck.cards.len()).rev() {
            let j = rng.random_range(0..=i);
            deck.cards.swap(i, j);
        }
        deck
    }

    /// Cards remaining to be dealt
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }

    /// Deal the next card; `None` when the deck is exhausted
    pub fn deal(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next).copied();
        if card.is_some() {
            self.next += 1;
        }
        card
    }

    /// Deal exactly five cards for one Let It Ride hand
    /// (three player cards plus two community cards)
    pub fn deal_hand(&mut self) -> Option<[Card; 5]> {
        if self.remaining() < 5 {
            return None;
        }
        let mut hand = [Card::new(Rank::Two, Suit::Clubs); 5];
        for slot in &mut hand {
            *slot = self.deal()?;
        }
        Some(hand)
    }
}
