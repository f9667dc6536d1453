//! Bet-progression systems
//!
//! A betting system sizes the base bet for the next hand from its own
//! progression state and is told the net result after each hand. Push
//! handling (net == 0.0) deliberately differs per system — each system's
//! published progression defines its own treatment, and unifying them
//! would silently change progression outcomes.

use serde::{Deserialize, Serialize};

/// Inputs available when sizing the next bet
#[derive(Debug, Clone, Copy)]
pub struct BetContext {
    /// Configured base bet unit
    pub base_bet: f64,
    /// Current session balance
    pub balance: f64,
}

/// A bet-progression system
pub trait BettingSystem: Send {
    /// Base bet for the next hand
    fn next_bet(&mut self, ctx: &BetContext) -> f64;

    /// Record the net result of the hand just played
    fn record_result(&mut self, net: f64);

    /// Name for logs and reports
    fn name(&self) -> &'static str;
}

/// Tagged system selector; resolved to a boxed object once at session
/// construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "system")]
pub enum BettingKind {
    Flat,
    Martingale {
        /// Progression cap in doublings (0 = uncapped)
        max_doublings: u32,
    },
    Paroli {
        /// Wins before the progression resets
        target_streak: u32,
    },
    DAlembert,
}

impl BettingKind {
    /// Build the concrete betting system
    pub fn build(self) -> Box<dyn BettingSystem> {
        match self {
            BettingKind::Flat => Box::new(FlatBetting),
            BettingKind::Martingale { max_doublings } => {
                Box::new(Martingale::new(max_doublings))
            }
            BettingKind::Paroli { target_streak } => Box::new(Paroli::new(target_streak)),
            BettingKind::DAlembert => Box::new(DAlembert::new()),
        }
    }
}

impl Default for BettingKind {
    fn default() -> Self {
        BettingKind::Flat
    }
}

/// Always bets the base unit
#[derive(Debug, Clone, Copy)]
pub struct FlatBetting;

impl BettingSystem for FlatBetting {
    fn next_bet(&mut self, ctx: &BetContext) -> f64 {
        ctx.base_bet
    }

    fn record_result(&mut self, _net: f64) {}

    fn name(&self) -> &'static str {
        "flat"
    }
}

/// Doubles after every loss, resets after a win.
/// A push counts as a win here: the classic progression resets on any
/// hand that does not lose money.
#[derive(Debug, Clone, Copy)]
pub struct Martingale {
    losses: u32,
    max_doublings: u32,
}

impl Martingale {
    pub fn new(max_doublings: u32) -> Self {
        Self {
            losses: 0,
            max_doublings,
        }
    }
}

impl BettingSystem for Martingale {
    fn next_bet(&mut self, ctx: &BetContext) -> f64 {
        let doublings = if self.max_doublings > 0 {
            self.losses.min(self.max_doublings)
        } else {
            self.losses
        };
        // Whether the bankroll can actually stake this is the engine's
        // call, not the progression's
        ctx.base_bet * f64::from(2u32.saturating_pow(doublings.min(30)))
    }

    fn record_result(&mut self, net: f64) {
        if net < 0.0 {
            self.losses += 1;
        } else {
            self.losses = 0;
        }
    }

    fn name(&self) -> &'static str {
        "martingale"
    }
}

/// Doubles after every win up to a target streak, then resets.
/// A push counts as a loss here: the streak breaks on any hand that
/// fails to win money.
#[derive(Debug, Clone, Copy)]
pub struct Paroli {
    streak: u32,
    target_streak: u32,
}

impl Paroli {
    pub fn new(target_streak: u32) -> Self {
        Self {
            streak: 0,
            target_streak: target_streak.max(1),
        }
    }
}

impl BettingSystem for Paroli {
    fn next_bet(&mut self, ctx: &BetContext) -> f64 {
        ctx.base_bet * f64::from(2u32.saturating_pow(self.streak.min(30)))
    }

    fn record_result(&mut self, net: f64) {
        if net > 0.0 {
            self.streak += 1;
            if self.streak >= self.target_streak {
                self.streak = 0;
            }
        } else {
            self.streak = 0;
        }
    }

    fn name(&self) -> &'static str {
        "paroli"
    }
}

/// Adds a unit after a loss, removes one after a win.
/// A push leaves the unit count unchanged — the progression only moves
/// on decided hands.
#[derive(Debug, Clone, Copy)]
pub struct DAlembert {
    units: u32,
}

impl DAlembert {
    pub fn new() -> Self {
        Self { units: 1 }
    }
}

impl Default for DAlembert {
    fn default() -> Self {
        Self::new()
    }
}

impl BettingSystem for DAlembert {
    fn next_bet(&mut self, ctx: &BetContext) -> f64 {
        ctx.base_bet * f64::from(self.units)
    }

    fn record_result(&mut self, net: f64) {
        if net < 0.0 {
            self.units += 1;
        } else if net > 0.0 {
            self.units = self.units.saturating_sub(1).max(1);
        }
    }

    fn name(&self) -> &'static str {
        "dalembert"
    }
}
