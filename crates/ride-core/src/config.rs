//! Session and simulation configuration
//!
//! Validation happens here, once, before any simulation work starts.
//! Configuration errors are synchronous and fatal — there is nothing to
//! retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::betting::BettingKind;
use crate::strategy::StrategyKind;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("starting bankroll must be positive, got {0}")]
    NonPositiveBankroll(f64),

    #[error("base bet must be positive, got {0}")]
    NonPositiveBet(f64),

    #[error("bankroll {bankroll} cannot cover the three-bet minimum stake {required}")]
    BankrollBelowMinimumStake { bankroll: f64, required: f64 },

    #[error("win limit must be positive, got {0}")]
    NonPositiveWinLimit(f64),

    #[error("loss limit must be positive, got {0}")]
    NonPositiveLossLimit(f64),

    #[error("max hands must be at least 1")]
    ZeroMaxHands,

    #[error("session count must be at least 1")]
    ZeroSessions,

    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// Configuration for a single session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bankroll at session start
    pub starting_bankroll: f64,
    /// Base bet unit (each hand stakes three of these)
    pub base_bet: f64,
    /// Stop once session profit reaches this
    pub win_limit: f64,
    /// Stop once session loss reaches this (positive number)
    pub loss_limit: f64,
    /// Stop after this many hands
    pub max_hands: u32,
    /// Play strategy
    pub strategy: StrategyKind,
    /// Bet progression
    pub betting: BettingKind,
}

impl SessionConfig {
    /// Validate ranges and internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_bankroll <= 0.0 {
            return Err(ConfigError::NonPositiveBankroll(self.starting_bankroll));
        }
        if self.base_bet <= 0.0 {
            return Err(ConfigError::NonPositiveBet(self.base_bet));
        }
        let required = self.base_bet * 3.0;
        if self.starting_bankroll < required {
            return Err(ConfigError::BankrollBelowMinimumStake {
                bankroll: self.starting_bankroll,
                required,
            });
        }
        if self.win_limit <= 0.0 {
            return Err(ConfigError::NonPositiveWinLimit(self.win_limit));
        }
        if self.loss_limit <= 0.0 {
            return Err(ConfigError::NonPositiveLossLimit(self.loss_limit));
        }
        if self.max_hands == 0 {
            return Err(ConfigError::ZeroMaxHands);
        }
        Ok(())
    }

    /// Minimum stake required to play one hand (three equal bets)
    pub fn minimum_stake(&self) -> f64 {
        self.base_bet * 3.0
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_bankroll: 500.0,
            base_bet: 5.0,
            win_limit: 250.0,
            loss_limit: 250.0,
            max_hands: 500,
            strategy: StrategyKind::Basic,
            betting: BettingKind::Flat,
        }
    }
}

/// Configuration for a whole simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent sessions to simulate
    pub num_sessions: u32,
    /// Worker count; `None` = auto-detect core count
    pub worker_count: Option<u32>,
    /// Base seed; `None` = drawn at run time
    pub base_seed: Option<i64>,
    /// Draw the base seed from a secure entropy source
    /// (always non-reproducible, overrides `base_seed`)
    pub crypto_mode: bool,
    /// Per-session configuration (shared read-only across workers)
    pub session: SessionConfig,
}

impl SimulationConfig {
    /// Validate ranges and the nested session config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_sessions == 0 {
            return Err(ConfigError::ZeroSessions);
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        self.session.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_sessions: 10_000,
            worker_count: None,
            base_seed: None,
            crypto_mode: false,
            session: SessionConfig::default(),
        }
    }
}
