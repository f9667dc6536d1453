//! # ride-sim — deterministic parallel Monte Carlo session simulator
//!
//! Simulates millions of independent Let It Ride sessions and aggregates
//! their outcomes. The core guarantee: given the same base seed,
//! sequential and parallel runs are bit-for-bit identical.
//!
//! ## Architecture
//!
//! ```text
//! SimulationDirector
//!     │
//!     ├── SeedAuthority ── session seeds, drawn in session-id order
//!     │                    BEFORE any dispatch
//!     │
//!     ├── WorkOrchestrator
//!     │       ├── partition → WorkerTask per worker (rayon pool)
//!     │       ├── execute   → N × SessionEngine::run
//!     │       └── merge     → session-id-ordered outcomes,
//!     │                      all worker failures accounted
//!     │
//!     └── AggregateResults (summary statistics)
//! ```
//!
//! No locks anywhere: the only cross-worker state is the read-only
//! config and the pre-drawn seed list. Every mutable piece of a session
//! is exclusively owned by the one `SessionEngine::run` call playing it.

pub mod aggregate;
pub mod director;
pub mod error;
pub mod orchestrator;
pub mod quality;
pub mod seed;
pub mod session;

pub use aggregate::*;
pub use director::*;
pub use error::*;
pub use orchestrator::*;
pub use quality::*;
pub use seed::*;
pub use session::*;
