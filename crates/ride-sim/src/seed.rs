//! Seed management — every pseudo-random stream in the system comes
//! from here
//!
//! Determinism rests on two rules:
//!
//! 1. Session seeds are drawn from one master stream, strictly in
//!    session-id order, before any session executes. Partitioning then
//!    only decides *where* a pre-seeded session runs, never what it sees.
//! 2. Worker-level streams are a pure function of `(base_seed,
//!    worker_id)` and never touch the master stream, so scheduling order
//!    cannot perturb them.
//!
//! The checkpoint blob stores the base seed and the draw counter; import
//! reconstructs the master stream and replays the counter, restoring the
//! exact future derivation sequence.

use log::debug;
use rand::{Rng, RngCore, SeedableRng, TryRngCore};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// The pseudo-random generator used for all session and worker streams
pub type Prng = ChaCha12Rng;

/// Checkpoint format version
const SEED_STATE_VERSION: u32 = 1;

/// SplitMix64 golden-gamma increment, also used to spread worker ids
/// before the finalizer
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Documented upper bound for distinct worker streams; the mixer is
/// collision-free in practice well beyond this
pub const MAX_WORKER_STREAMS: u32 = 64;

/// Immutable snapshot of a seed authority for checkpoint/resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedState {
    /// Format version of this blob
    pub version: u32,
    /// Base seed all derivation flows from
    pub base_seed: i64,
    /// Whether the base seed came from a secure entropy source
    pub crypto_mode: bool,
    /// Number of child seeds drawn from the master stream so far
    pub draw_counter: u64,
}

/// Single owner of all seed derivation
#[derive(Debug, Clone)]
pub struct SeedAuthority {
    base_seed: i64,
    crypto_mode: bool,
    draw_counter: u64,
    master: Prng,
}

impl SeedAuthority {
    /// Create a seed authority.
    ///
    /// With `crypto_mode` set, the base seed is always drawn from the
    /// OS entropy source and any supplied `base_seed` is ignored —
    /// crypto mode means non-reproducible by construction. Otherwise a
    /// missing base seed is drawn from the fast thread-local generator.
    pub fn new(base_seed: Option<i64>, crypto_mode: bool) -> SimResult<Self> {
        let base = if crypto_mode {
            let mut os = rand::rngs::OsRng;
            os.try_next_u64()
                .map_err(|e| SimError::EntropyUnavailable(e.to_string()))? as i64
        } else {
            base_seed.unwrap_or_else(|| rand::rng().random::<i64>())
        };

        debug!("seed authority initialized (base_seed={base}, crypto={crypto_mode})");
        Ok(Self {
            base_seed: base,
            crypto_mode,
            draw_counter: 0,
            master: Prng::seed_from_u64(base as u64),
        })
    }

    /// The base seed in effect (what a report should record for replay)
    pub fn base_seed(&self) -> i64 {
        self.base_seed
    }

    /// Whether this authority was seeded from a secure source
    pub fn crypto_mode(&self) -> bool {
        self.crypto_mode
    }

    /// Child seeds drawn so far
    pub fn draw_counter(&self) -> u64 {
        self.draw_counter
    }

    /// Draw the next child seed from the master stream.
    ///
    /// Must be called in session-id order, before any session executes;
    /// this ordering is what makes parallel and sequential runs
    /// bit-identical.
    pub fn next_session_seed(&mut self) -> i64 {
        self.draw_counter += 1;
        self.master.next_u64() as i64
    }

    /// Draw a child seed and construct an independent generator from it
    pub fn next_stream(&mut self) -> Prng {
        stream_for_seed(self.next_session_seed())
    }

    /// Deterministic worker-level stream: a function of `(base_seed,
    /// worker_id)` only. Does not consume the master stream, so it is
    /// reproducible regardless of task-scheduling order. Guaranteed
    /// distinct for worker ids up to [`MAX_WORKER_STREAMS`].
    pub fn derive_worker_stream(&self, worker_id: u32) -> Prng {
        let mixed = splitmix64(
            (self.base_seed as u64) ^ GOLDEN_GAMMA.wrapping_mul(u64::from(worker_id) + 1),
        );
        Prng::seed_from_u64(mixed)
    }

    /// Export a checkpoint snapshot
    pub fn export_state(&self) -> SeedState {
        SeedState {
            version: SEED_STATE_VERSION,
            base_seed: self.base_seed,
            crypto_mode: self.crypto_mode,
            draw_counter: self.draw_counter,
        }
    }

    /// Restore an authority from a checkpoint snapshot.
    ///
    /// Reconstructs the master stream from the stored base seed and
    /// replays the recorded number of draws, so every future
    /// `next_session_seed` call matches what the original authority
    /// would have produced.
    pub fn import_state(state: SeedState) -> SimResult<Self> {
        if state.version != SEED_STATE_VERSION {
            return Err(SimError::Checkpoint(format!(
                "unsupported seed state version {} (expected {})",
                state.version, SEED_STATE_VERSION
            )));
        }

        let mut master = Prng::seed_from_u64(state.base_seed as u64);
        for _ in 0..state.draw_counter {
            master.next_u64();
        }

        Ok(Self {
            base_seed: state.base_seed,
            crypto_mode: state.crypto_mode,
            draw_counter: state.draw_counter,
            master,
        })
    }

    /// Serialize a checkpoint to JSON
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string(&self.export_state())
            .map_err(|e| SimError::Checkpoint(e.to_string()))
    }

    /// Restore from a JSON checkpoint; missing or mistyped fields are
    /// reported by name
    pub fn from_json(json: &str) -> SimResult<Self> {
        let state: SeedState =
            serde_json::from_str(json).map_err(|e| SimError::Checkpoint(e.to_string()))?;
        Self::import_state(state)
    }
}

/// Build a session stream from its pre-drawn seed
pub fn stream_for_seed(seed: i64) -> Prng {
    Prng::seed_from_u64(seed as u64)
}

/// SplitMix64 finalizer — the non-linear mix that keeps nearby inputs
/// from producing nearby seeds
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
