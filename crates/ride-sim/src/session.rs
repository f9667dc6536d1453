//! Session state machine
//!
//! One session plays hands from a starting bankroll until a stop
//! condition fires. The engine owns every piece of mutable state for its
//! session — bankroll, progression, generator — and shares nothing, so
//! any number of sessions can run concurrently without coordination.
//!
//! Stop conditions are checked in fixed priority order after every hand:
//! win limit, loss limit, max hands, then insufficient funds. The first
//! one that fires is the session's stop reason; no further hands are
//! played.

use serde::{Deserialize, Serialize};

use ride_core::{
    BetContext, BettingSystem, Card, Decision, Deck, PayTable, SessionConfig, Strategy,
    evaluate_five,
};

use log::debug;

use crate::error::{SimError, SimResult};
use crate::seed::{Prng, stream_for_seed};

/// One pre-seeded unit of work, owned exclusively by the worker that
/// executes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub session_id: u32,
    pub seed: i64,
    pub config: SessionConfig,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    WinLimit,
    LossLimit,
    MaxHands,
    InsufficientFunds,
}

/// How a session ended relative to its starting bankroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeClass {
    Win,
    Loss,
    Breakeven,
}

/// Immutable result of one completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: u32,
    pub hands_played: u32,
    pub starting_bankroll: f64,
    pub final_bankroll: f64,
    pub total_wagered: f64,
    pub peak_bankroll: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub outcome: OutcomeClass,
    pub stop_reason: StopReason,
}

/// Mutable per-session bookkeeping, exclusively owned by one engine run
#[derive(Debug, Clone)]
struct BankrollState {
    balance: f64,
    session_profit: f64,
    streak: i32,
    hands_played: u32,
    peak: f64,
    max_drawdown: f64,
    max_drawdown_pct: f64,
}

impl BankrollState {
    fn new(starting: f64) -> Self {
        Self {
            balance: starting,
            session_profit: 0.0,
            streak: 0,
            hands_played: 0,
            peak: starting,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
        }
    }

    fn apply_hand(&mut self, net: f64) {
        self.balance += net;
        self.session_profit += net;
        self.hands_played += 1;

        if net > 0.0 {
            self.streak = self.streak.max(0) + 1;
        } else if net < 0.0 {
            self.streak = self.streak.min(0) - 1;
        }

        if self.balance > self.peak {
            self.peak = self.balance;
        }
        let drawdown = self.peak - self.balance;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
            self.max_drawdown_pct = if self.peak > 0.0 {
                drawdown / self.peak * 100.0
            } else {
                0.0
            };
        }
    }
}

/// Plays one session to completion
pub struct SessionEngine;

impl SessionEngine {
    /// Run one session. Pure with respect to global state: consumes only
    /// the request's own seed and config.
    pub fn run(request: SessionRequest) -> SimResult<SessionOutcome> {
        let config = &request.config;
        let mut rng = stream_for_seed(request.seed);
        // Collaborators resolved once, not per hand
        let strategy: Box<dyn Strategy> = config.strategy.build();
        let mut betting: Box<dyn BettingSystem> = config.betting.build();
        let paytable = PayTable::standard();

        let mut state = BankrollState::new(config.starting_bankroll);
        let mut total_wagered = 0.0;
        let mut stop_reason: Option<StopReason> = None;

        while stop_reason.is_none() {
            let bet = betting.next_bet(&BetContext {
                base_bet: config.base_bet,
                balance: state.balance,
            });
            if !(bet > 0.0) || !bet.is_finite() {
                return Err(SimError::Internal(format!(
                    "betting system '{}' produced invalid bet {bet}",
                    betting.name()
                )));
            }

            // Three equal bets are staked up front
            let stake = bet * 3.0;
            if state.balance < stake {
                stop_reason = Some(StopReason::InsufficientFunds);
                break;
            }

            let (net, riding) = play_hand(&mut rng, strategy.as_ref(), &paytable, bet)?;
            total_wagered += bet * f64::from(riding);
            betting.record_result(net);
            state.apply_hand(net);

            // Fixed priority: limits before max-hands, funds last (the
            // funds check happens at the top of the next iteration)
            if state.session_profit >= config.win_limit {
                stop_reason = Some(StopReason::WinLimit);
            } else if state.session_profit <= -config.loss_limit {
                stop_reason = Some(StopReason::LossLimit);
            } else if state.hands_played >= config.max_hands {
                stop_reason = Some(StopReason::MaxHands);
            }
        }

        let stop_reason = stop_reason.ok_or_else(|| {
            SimError::Internal(format!(
                "session {} terminated without a stop reason",
                request.session_id
            ))
        })?;

        debug!(
            "session {} stopped: {:?} after {} hands (final streak {})",
            request.session_id, stop_reason, state.hands_played, state.streak
        );

        let outcome = if state.balance > config.starting_bankroll {
            OutcomeClass::Win
        } else if state.balance < config.starting_bankroll {
            OutcomeClass::Loss
        } else {
            OutcomeClass::Breakeven
        };

        Ok(SessionOutcome {
            session_id: request.session_id,
            hands_played: state.hands_played,
            starting_bankroll: config.starting_bankroll,
            final_bankroll: state.balance,
            total_wagered,
            peak_bankroll: state.peak,
            max_drawdown: state.max_drawdown,
            max_drawdown_pct: state.max_drawdown_pct,
            outcome,
            stop_reason,
        })
    }
}

/// Play a single Let It Ride hand. Returns the net result and the number
/// of bets that rode to showdown.
fn play_hand(
    rng: &mut Prng,
    strategy: &dyn Strategy,
    paytable: &PayTable,
    bet: f64,
) -> SimResult<(f64, u32)> {
    let mut deck = Deck::shuffled(rng);
    let cards = deck
        .deal_hand()
        .ok_or_else(|| SimError::Internal("fresh deck exhausted before a full hand".into()))?;

    let player: [Card; 3] = [cards[0], cards[1], cards[2]];
    let with_first_community: [Card; 4] = [cards[0], cards[1], cards[2], cards[3]];

    let first = strategy.decide_bet1(&player);
    let second = strategy.decide_bet2(&with_first_community);

    // Bet three always rides
    let riding = 1
        + u32::from(first == Decision::Ride)
        + u32::from(second == Decision::Ride);

    let rank = evaluate_five(&cards);
    let net = f64::from(riding) * paytable.payout(rank, bet);
    Ok((net, riding))
}
