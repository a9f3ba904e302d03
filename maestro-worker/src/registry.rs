//! Workflow and activity registration.
//!
//! Executables are registered by name into an [`ExecutableLookup`] — one
//! lookup instance per (domain, task list) pair. Registration happens on
//! `&mut Worker` before `start`; at `start` each lookup is frozen behind an
//! `Arc` and shared read-only with the pollers, so no locking is needed on
//! the dispatch path.

use crate::history::History;
use crate::metadata::{ActivityMetadata, DecisionMetadata};
use futures::future::BoxFuture;
use maestro_core::{ExecutionError, LookupError};
use maestro_proto::shared::{Decision, WorkflowExecution};
use std::collections::HashMap;
use std::sync::Arc;

/// One decision task as handed to a workflow executable: the execution
/// identifiers plus the normalized history the replay engine reasons over.
#[derive(Debug)]
pub struct WorkflowTask {
    pub workflow_name: String,
    pub execution: Option<WorkflowExecution>,
    pub task_token: Vec<u8>,
    pub attempt: i32,
    pub previous_started_event_id: i64,
    pub started_event_id: i64,
    pub history: History,
    pub metadata: DecisionMetadata,
}

/// Execution-scoped context handed to an activity executable.
#[derive(Debug, Clone)]
pub struct ActivityContext {
    metadata: ActivityMetadata,
}

impl ActivityContext {
    pub fn new(metadata: ActivityMetadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &ActivityMetadata {
        &self.metadata
    }

    pub fn activity_id(&self) -> &str {
        &self.metadata.id
    }

    pub fn domain(&self) -> &str {
        &self.metadata.domain
    }

    pub fn attempt(&self) -> i32 {
        self.metadata.attempt
    }
}

/// A workflow implementation.
///
/// `name` is the registration default; `execute` receives one decision task
/// and returns the decisions produced by replaying the workflow against the
/// task's history.
pub trait Workflow: Send + Sync {
    fn name(&self) -> &str;

    fn execute(
        &self,
        task: WorkflowTask,
    ) -> BoxFuture<'static, Result<Vec<Decision>, ExecutionError>>;
}

/// An activity implementation.
pub trait Activity: Send + Sync {
    fn name(&self) -> &str;

    fn execute(
        &self,
        ctx: ActivityContext,
        input: Option<Vec<u8>>,
    ) -> BoxFuture<'static, Result<Option<Vec<u8>>, ExecutionError>>;
}

/// Registry mapping a task name to an executable.
///
/// Names are unique within one lookup instance; re-adding a name
/// overwrites the previous binding.
pub struct ExecutableLookup<E: ?Sized> {
    executables: HashMap<String, Arc<E>>,
}

impl<E: ?Sized> ExecutableLookup<E> {
    pub fn new() -> Self {
        Self {
            executables: HashMap::new(),
        }
    }

    /// Register or overwrite a binding.
    pub fn add(&mut self, name: impl Into<String>, executable: Arc<E>) {
        let name = name.into();
        if self.executables.insert(name.clone(), executable).is_some() {
            tracing::debug!(name = %name, "overwrote existing executable registration");
        }
    }

    /// Resolve a name to its executable.
    pub fn find(&self, name: &str) -> Result<Arc<E>, LookupError> {
        self.executables
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError::new(name))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.executables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.executables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executables.is_empty()
    }
}

impl<E: ?Sized> Default for ExecutableLookup<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> std::fmt::Debug for ExecutableLookup<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableLookup")
            .field("names", &self.names())
            .finish()
    }
}
