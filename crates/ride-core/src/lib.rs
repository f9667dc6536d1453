//! # ride-core — Let It Ride table mechanics
//!
//! Provides the game-domain collaborators driven by the simulation core:
//! deck handling, 5-card hand evaluation, the house paytable, play
//! strategies, and bet-progression systems.
//!
//! ## Architecture
//!
//! ```text
//! Deck ──deal──▶ [Card; 5]
//!                    │
//!     Strategy ◀─────┼─────▶ HandRank ──▶ PayTable
//!   (ride/pull)      │                     (payout)
//!                    ▼
//!             BettingSystem
//!             (bet sizing)
//! ```
//!
//! All types here are pure table mechanics: no I/O, no shared state, no
//! randomness beyond the `Rng` handed in by the caller.

pub mod betting;
pub mod cards;
pub mod config;
pub mod hand;
pub mod paytable;
pub mod strategy;

pub use betting::*;
pub use cards::*;
pub use config::*;
pub use hand::*;
pub use paytable::*;
pub use strategy::*;
