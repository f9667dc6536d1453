//! Work distribution and result merging
//!
//! The orchestrator never touches randomness: every request arrives with
//! its seed already drawn (in session-id order, by the seed authority).
//! Partitioning therefore only decides which worker executes which
//! pre-seeded request — it can never change what a given session sees,
//! which is the whole determinism guarantee.
//!
//! Workers share nothing mutable. Each one owns its task, produces
//! exactly one `WorkerResult`, and captures any internal panic as an
//! error message instead of letting it escape — a failed session must
//! not lose the outcomes its worker already completed.

use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult, WorkerFailure};
use crate::session::{SessionEngine, SessionOutcome, SessionRequest};

/// Below this many sessions the parallel dispatch overhead is not worth
/// paying; runs are sequential
pub const MIN_PARALLEL_SESSIONS: usize = 50;

/// One worker's batch of pre-seeded requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerTask {
    pub worker_id: u32,
    pub session_requests: Vec<SessionRequest>,
}

/// One worker's complete report: produced exactly once per task, even on
/// failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    pub worker_id: u32,
    pub outcomes: Vec<SessionOutcome>,
    pub error: Option<String>,
}

/// Decides execution strategy and guarantees fully-accounted results
pub struct WorkOrchestrator;

impl WorkOrchestrator {
    /// Should this run be parallelized at all?
    pub fn should_parallelize(session_count: usize, worker_count: usize) -> bool {
        worker_count > 1 && session_count >= MIN_PARALLEL_SESSIONS
    }

    /// Split pre-seeded requests into contiguous per-worker batches.
    /// Empty tasks are not emitted.
    pub fn partition(requests: Vec<SessionRequest>, worker_count: usize) -> Vec<WorkerTask> {
        let workers = worker_count.max(1);
        let chunk = requests.len().div_ceil(workers).max(1);

        requests
            .chunks(chunk)
            .enumerate()
            .map(|(i, batch)| WorkerTask {
                worker_id: i as u32,
                session_requests: batch.to_vec(),
            })
            .collect()
    }

    /// Execute every task on a rayon pool sized to the task count.
    /// Exactly one `WorkerResult` comes back per task.
    pub fn execute(tasks: Vec<WorkerTask>) -> SimResult<Vec<WorkerResult>> {
        let workers = tasks.len().max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| SimError::Internal(format!("thread pool construction: {e}")))?;

        debug!("dispatching {} worker task(s)", tasks.len());
        let results =
            pool.install(|| tasks.into_par_iter().map(Self::run_worker).collect::<Vec<_>>());
        Ok(results)
    }

    /// Execute a single worker's batch inline.
    ///
    /// Each session runs under a panic guard. On any failure the worker
    /// records the error and stops its batch, keeping every outcome it
    /// already completed.
    fn run_worker(task: WorkerTask) -> WorkerResult {
        let worker_id = task.worker_id;
        let mut outcomes = Vec::with_capacity(task.session_requests.len());
        let mut error = None;

        for request in task.session_requests {
            let session_id = request.session_id;
            match catch_unwind(AssertUnwindSafe(|| SessionEngine::run(request))) {
                Ok(Ok(outcome)) => outcomes.push(outcome),
                Ok(Err(e)) => {
                    warn!("worker {worker_id}: session {session_id} failed: {e}");
                    error = Some(format!("session {session_id}: {e}"));
                    break;
                }
                Err(payload) => {
                    let msg = panic_message(payload.as_ref());
                    warn!("worker {worker_id}: session {session_id} panicked: {msg}");
                    error = Some(format!("session {session_id} panicked: {msg}"));
                    break;
                }
            }
        }

        WorkerResult {
            worker_id,
            outcomes,
            error,
        }
    }

    /// Re-sort outcomes into session-id order and verify full accounting.
    ///
    /// Any worker error, or a merged count different from
    /// `expected_count`, fails the whole merge — naming every failing
    /// worker, not just the first. Partial success is never accepted.
    pub fn merge(
        results: Vec<WorkerResult>,
        expected_count: usize,
    ) -> SimResult<Vec<SessionOutcome>> {
        let failures: Vec<WorkerFailure> = results
            .iter()
            .filter_map(|r| {
                r.error.as_ref().map(|msg| WorkerFailure {
                    worker_id: r.worker_id,
                    message: msg.clone(),
                })
            })
            .collect();

        let mut outcomes: Vec<SessionOutcome> = results
            .into_iter()
            .flat_map(|r| r.outcomes)
            .collect();
        outcomes.sort_unstable_by_key(|o| o.session_id);

        if !failures.is_empty() || outcomes.len() != expected_count {
            return Err(SimError::Aggregation {
                merged: outcomes.len(),
                expected: expected_count,
                failures,
            });
        }

        Ok(outcomes)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
