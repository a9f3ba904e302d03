//! Error types for the maestro client.
//!
//! Task-level errors (lookup misses, execution failures) are reported to
//! the task service and never escape a poller's loop; transport errors are
//! retried; configuration errors are fatal at registration/startup time.

use thiserror::Error;

/// A task name that has no binding in the executable lookup.
///
/// Reported to the task service as a task failure; distinguishable from an
/// execution failure so callers never confuse "no such executable" with
/// "the executable failed".
#[derive(Debug, Clone, Error)]
#[error("no executable registered under '{name}'")]
pub struct LookupError {
    pub name: String,
}

impl LookupError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An executable raised or returned a failure.
#[derive(Debug, Clone, Error)]
#[error("execution failed: {reason}")]
pub struct ExecutionError {
    pub reason: String,
    pub details: Option<Vec<u8>>,
}

impl ExecutionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: None,
        }
    }

    pub fn with_details(reason: impl Into<String>, details: Vec<u8>) -> Self {
        Self {
            reason: reason.into(),
            details: Some(details),
        }
    }

    /// An execution that panicked rather than returning an error.
    pub fn panicked(message: impl Into<String>) -> Self {
        Self {
            reason: format!("panic: {}", message.into()),
            details: None,
        }
    }
}

/// A long-poll or report call failed at the network layer.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A setup invariant was violated. Fatal at registration/startup time,
/// never produced at runtime.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("registration is not allowed after the worker has started")]
    AlreadyStarted,

    #[error("domain must be a non-empty string")]
    EmptyDomain,

    #[error("task list must be a non-empty string")]
    EmptyTaskList,

    #[error("executable lookup for {domain}/{task_list} is frozen")]
    FrozenLookup { domain: String, task_list: String },
}

/// Main error type encompassing the whole taxonomy.
#[derive(Debug, Clone, Error)]
pub enum MaestroError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type MaestroResult<T> = Result<T, MaestroError>;

/// Helper functions to check error types
pub fn is_lookup_error(err: &MaestroError) -> bool {
    matches!(err, MaestroError::Lookup(_))
}

pub fn is_execution_error(err: &MaestroError) -> bool {
    matches!(err, MaestroError::Execution(_))
}

pub fn is_transport_error(err: &MaestroError) -> bool {
    matches!(err, MaestroError::Transport(_))
}

pub fn is_configuration_error(err: &MaestroError) -> bool {
    matches!(err, MaestroError::Configuration(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_is_distinguishable_from_execution_error() {
        let lookup: MaestroError = LookupError::new("MissingWorkflow").into();
        let execution: MaestroError = ExecutionError::new("boom").into();

        assert!(is_lookup_error(&lookup));
        assert!(!is_execution_error(&lookup));
        assert!(is_execution_error(&execution));
        assert!(!is_lookup_error(&execution));
    }
}
