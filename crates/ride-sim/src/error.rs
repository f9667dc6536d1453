//! Error types for the simulation core

use thiserror::Error;

/// Identity and message of one failed worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    pub worker_id: u32,
    pub message: String,
}

impl std::fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker {}: {}", self.worker_id, self.message)
    }
}

/// Simulation core errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ride_core::ConfigError),

    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("malformed checkpoint state: {0}")]
    Checkpoint(String),

    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("aggregation failed: merged {merged} of {expected} outcomes; {workers}",
        workers = format_failures(.failures))]
    Aggregation {
        failures: Vec<WorkerFailure>,
        expected: usize,
        merged: usize,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

fn format_failures(failures: &[WorkerFailure]) -> String {
    if failures.is_empty() {
        return "no worker errors".to_string();
    }
    let parts: Vec<String> = failures.iter().map(|f| f.to_string()).collect();
    format!("{} failed worker(s): [{}]", failures.len(), parts.join("; "))
}

/// Result type for the simulation core
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_error_names_every_failing_worker() {
        let err = SimError::Aggregation {
            failures: vec![
                WorkerFailure {
                    worker_id: 1,
                    message: "bad table".to_string(),
                },
                WorkerFailure {
                    worker_id: 3,
                    message: "panic: overflow".to_string(),
                },
            ],
            expected: 25,
            merged: 10,
        };
        let text = err.to_string();
        assert!(text.contains("worker 1: bad table"));
        assert!(text.contains("worker 3: panic: overflow"));
        assert!(text.contains("merged 10 of 25"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: SimError = ride_core::ConfigError::ZeroSessions.into();
        assert!(err.to_string().contains("session count"));
    }
}
