//! Top-level simulation orchestration
//!
//! The director owns the run: it validates configuration, draws every
//! session seed in session-id order before any work is dispatched,
//! chooses sequential or parallel execution, and hands the merged,
//! ordered outcomes to aggregation.
//!
//! Progress reporting differs by mode on purpose: sequential runs fire
//! the callback after every completed session; parallel runs fire it
//! once, after all work completes, with `(total, total)` — per-session
//! completion is not observable across workers without extra plumbing,
//! and callers must not assume uniform granularity across modes.

use log::{debug, info};

use ride_core::SimulationConfig;

use crate::aggregate::AggregateResults;
use crate::error::SimResult;
use crate::orchestrator::{WorkOrchestrator, WorkerResult, WorkerTask};
use crate::seed::SeedAuthority;
use crate::session::{SessionEngine, SessionRequest};

/// Progress callback: `(completed, total)`. May be invoked from worker
/// threads; must not assume a single caller thread.
pub type ProgressFn = dyn Fn(u32, u32) + Send + Sync;

/// Owns configuration and drives a whole simulation run
pub struct SimulationDirector {
    config: SimulationConfig,
    progress: Option<Box<ProgressFn>>,
}

impl SimulationDirector {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Attach a progress callback (see module docs for the granularity
    /// contract)
    pub fn with_progress(mut self, progress: Box<ProgressFn>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Effective worker count: configured value, or all cores (min 1)
    pub fn worker_count(&self) -> usize {
        self.config
            .worker_count
            .map(|w| w as usize)
            .unwrap_or_else(|| num_cpus::get().max(1))
    }

    /// Run the full simulation.
    ///
    /// Any orchestration error aborts the run; partial results are never
    /// returned. Sequential and parallel execution of the same config
    /// and base seed produce identical `AggregateResults`.
    pub fn run(&self) -> SimResult<AggregateResults> {
        self.config.validate()?;

        let mut authority =
            SeedAuthority::new(self.config.base_seed, self.config.crypto_mode)?;
        let requests = self.build_requests(&mut authority);
        let total = self.config.num_sessions;
        let workers = self.worker_count();

        let parallel = WorkOrchestrator::should_parallelize(requests.len(), workers);
        info!(
            "starting run: {} session(s), {} worker(s), base_seed={}, mode={}",
            total,
            workers,
            authority.base_seed(),
            if parallel { "parallel" } else { "sequential" }
        );

        let results = if parallel {
            let tasks = WorkOrchestrator::partition(requests, workers);
            let results = WorkOrchestrator::execute(tasks)?;
            // One shot at completion; per-session progress is not
            // observable across workers
            if let Some(cb) = &self.progress {
                cb(total, total);
            }
            results
        } else {
            self.execute_sequential(requests)
        };

        let outcomes = WorkOrchestrator::merge(results, total as usize)?;
        debug!("run complete: {} outcome(s) merged", outcomes.len());
        Ok(AggregateResults::from_outcomes(outcomes))
    }

    /// Draw seeds strictly in session-id order, before any dispatch
    fn build_requests(&self, authority: &mut SeedAuthority) -> Vec<SessionRequest> {
        (0..self.config.num_sessions)
            .map(|session_id| SessionRequest {
                session_id,
                seed: authority.next_session_seed(),
                config: self.config.session.clone(),
            })
            .collect()
    }

    /// Inline execution path: one synthetic worker, per-session progress
    fn execute_sequential(&self, requests: Vec<SessionRequest>) -> Vec<WorkerResult> {
        let total = self.config.num_sessions;
        let mut outcomes = Vec::with_capacity(requests.len());
        let mut error = None;

        for request in requests {
            let session_id = request.session_id;
            match SessionEngine::run(request) {
                Ok(outcome) => {
                    outcomes.push(outcome);
                    if let Some(cb) = &self.progress {
                        cb(outcomes.len() as u32, total);
                    }
                }
                Err(e) => {
                    error = Some(format!("session {session_id}: {e}"));
                    break;
                }
            }
        }

        vec![WorkerResult {
            worker_id: 0,
            outcomes,
            error,
        }]
    }

    /// Partition without executing (exposed for determinism testing)
    pub fn plan_tasks(&self) -> SimResult<Vec<WorkerTask>> {
        self.config.validate()?;
        let mut authority =
            SeedAuthority::new(self.config.base_seed, self.config.crypto_mode)?;
        let requests = self.build_requests(&mut authority);
        Ok(WorkOrchestrator::partition(requests, self.worker_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use ride_core::{ConfigError, SessionConfig};

    use crate::error::SimError;

    fn config(sessions: u32, workers: Option<u32>, seed: i64) -> SimulationConfig {
        SimulationConfig {
            num_sessions: sessions,
            worker_count: workers,
            base_seed: Some(seed),
            crypto_mode: false,
            session: SessionConfig {
                max_hands: 50,
                ..SessionConfig::default()
            },
        }
    }

    #[test]
    fn test_rejects_invalid_config_before_any_work() {
        let mut cfg = config(0, None, 1);
        cfg.num_sessions = 0;
        let err = SimulationDirector::new(cfg).run().unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig(ConfigError::ZeroSessions)
        ));
    }

    #[test]
    fn test_outcomes_in_session_id_order() {
        let results = SimulationDirector::new(config(60, Some(4), 9)).run().unwrap();
        let ids: Vec<u32> = results.outcomes.iter().map(|o| o.session_id).collect();
        assert_eq!(ids, (0..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_sequential_progress_fires_per_session() {
        let calls = std::sync::Arc::new(Mutex::new(Vec::new()));
        let calls_in_cb = calls.clone();
        // 10 sessions is under the parallel threshold
        let results = SimulationDirector::new(config(10, Some(4), 3))
            .with_progress(Box::new(move |done, total| {
                calls_in_cb.lock().unwrap().push((done, total));
            }))
            .run()
            .unwrap();
        assert_eq!(results.summary.sessions, 10);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls.first(), Some(&(1, 10)));
        assert_eq!(calls.last(), Some(&(10, 10)));
    }

    #[test]
    fn test_parallel_progress_fires_once_at_completion() {
        let count = std::sync::Arc::new(AtomicU32::new(0));
        let last = std::sync::Arc::new(Mutex::new((0u32, 0u32)));
        let (count_cb, last_cb) = (count.clone(), last.clone());

        SimulationDirector::new(config(80, Some(4), 3))
            .with_progress(Box::new(move |done, total| {
                count_cb.fetch_add(1, Ordering::SeqCst);
                *last_cb.lock().unwrap() = (done, total);
            }))
            .run()
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), (80, 80));
    }

    #[test]
    fn test_worker_count_defaults_to_cores() {
        let director = SimulationDirector::new(config(10, None, 1));
        assert!(director.worker_count() >= 1);
    }

    #[test]
    fn test_plan_draws_seeds_before_partitioning() {
        let director = SimulationDirector::new(config(100, Some(4), 77));
        let tasks = director.plan_tasks().unwrap();
        let seeds: Vec<i64> = tasks
            .iter()
            .flat_map(|t| t.session_requests.iter().map(|r| r.seed))
            .collect();

        // Same seeds a single-worker plan would assign, in the same
        // session order
        let single = SimulationDirector::new(config(100, Some(1), 77));
        let single_seeds: Vec<i64> = single
            .plan_tasks()
            .unwrap()
            .into_iter()
            .flat_map(|t| t.session_requests)
            .map(|r| r.seed)
            .collect();
        assert_eq!(seeds, single_seeds);
    }
}
