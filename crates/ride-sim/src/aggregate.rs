//! Aggregation of per-session outcomes
//!
//! Runs single-threaded over the merged, session-id-ordered outcome
//! list. `AggregateResults` derives `PartialEq` so equivalence tests can
//! compare whole runs directly.

use serde::{Deserialize, Serialize};

use crate::session::{OutcomeClass, SessionOutcome, StopReason};

/// Summary statistics across all sessions of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub sessions: u32,
    pub total_hands: u64,
    pub total_wagered: f64,
    pub winning_sessions: u32,
    pub losing_sessions: u32,
    pub breakeven_sessions: u32,
    pub mean_final_bankroll: f64,
    pub min_final_bankroll: f64,
    pub max_final_bankroll: f64,
    pub mean_profit: f64,
    pub worst_drawdown: f64,
    pub win_limit_stops: u32,
    pub loss_limit_stops: u32,
    pub max_hands_stops: u32,
    pub insufficient_funds_stops: u32,
}

/// Full result set of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResults {
    /// Per-session outcomes in session-id order
    pub outcomes: Vec<SessionOutcome>,
    pub summary: SummaryStats,
}

impl AggregateResults {
    /// Aggregate merged outcomes (already in session-id order)
    pub fn from_outcomes(outcomes: Vec<SessionOutcome>) -> Self {
        let sessions = outcomes.len() as u32;
        let mut total_hands = 0u64;
        let mut total_wagered = 0.0;
        let mut winning = 0u32;
        let mut losing = 0u32;
        let mut breakeven = 0u32;
        let mut sum_final = 0.0;
        let mut min_final = f64::INFINITY;
        let mut max_final = f64::NEG_INFINITY;
        let mut sum_profit = 0.0;
        let mut worst_drawdown = 0.0f64;
        let mut stops = [0u32; 4];

        for o in &outcomes {
            total_hands += u64::from(o.hands_played);
            total_wagered += o.total_wagered;
            match o.outcome {
                OutcomeClass::Win => winning += 1,
                OutcomeClass::Loss => losing += 1,
                OutcomeClass::Breakeven => breakeven += 1,
            }
            sum_final += o.final_bankroll;
            min_final = min_final.min(o.final_bankroll);
            max_final = max_final.max(o.final_bankroll);
            sum_profit += o.final_bankroll - o.starting_bankroll;
            worst_drawdown = worst_drawdown.max(o.max_drawdown);
            match o.stop_reason {
                StopReason::WinLimit => stops[0] += 1,
                StopReason::LossLimit => stops[1] += 1,
                StopReason::MaxHands => stops[2] += 1,
                StopReason::InsufficientFunds => stops[3] += 1,
            }
        }

        let n = (sessions.max(1)) as f64;
        let summary = SummaryStats {
            sessions,
            total_hands,
            total_wagered,
            winning_sessions: winning,
            losing_sessions: losing,
            breakeven_sessions: breakeven,
            mean_final_bankroll: sum_final / n,
            min_final_bankroll: if sessions == 0 { 0.0 } else { min_final },
            max_final_bankroll: if sessions == 0 { 0.0 } else { max_final },
            mean_profit: sum_profit / n,
            worst_drawdown,
            win_limit_stops: stops[0],
            loss_limit_stops: stops[1],
            max_hands_stops: stops[2],
            insufficient_funds_stops: stops[3],
        };

        Self { outcomes, summary }
    }
}
