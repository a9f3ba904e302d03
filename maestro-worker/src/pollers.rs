//! Task pollers.
//!
//! Each (domain, task list) pair gets one workflow poller and one activity
//! poller. A poller long-polls the task service in a loop and dispatches
//! each received task through its handler; execution overlaps the next poll
//! up to a concurrency limit. `stop` prevents new polls but never aborts an
//! in-flight execution; `wait` blocks until the loop has drained and exited.

use crate::handlers::{ActivityTaskHandler, WorkflowTaskHandler};
use crate::DynTaskService;
use async_trait::async_trait;
use maestro_core::{MaestroResult, TransportError};
use maestro_proto::shared::TaskList;
use maestro_proto::task_service::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Tuning knobs for one poller instance.
#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Maximum task executions in flight at once; polling pauses while the
    /// limit is reached.
    pub max_concurrent_tasks: usize,
    /// Delay before re-entering the poll after a transport error.
    pub poll_retry_backoff: Duration,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 20,
            poll_retry_backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerKind {
    Workflow,
    Activity,
}

impl std::fmt::Display for PollerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollerKind::Workflow => f.write_str("workflow"),
            PollerKind::Activity => f.write_str("activity"),
        }
    }
}

/// One long-poll source plus its task processing.
#[async_trait]
pub trait TaskPoller: Send + Sync + 'static {
    type Task: Send + 'static;

    /// Issue one long poll. `None` means the poll timed out with no task
    /// available, which is a normal outcome.
    async fn poll(&self) -> Result<Option<Self::Task>, TransportError>;

    /// Process one task, reporting its outcome to the service.
    async fn process(&self, task: Self::Task) -> MaestroResult<()>;
}

/// Workflow (decision) task poller
pub struct WorkflowTaskPoller {
    service: Arc<DynTaskService>,
    domain: String,
    task_list: String,
    identity: String,
    handler: WorkflowTaskHandler,
}

impl WorkflowTaskPoller {
    pub fn new(
        service: Arc<DynTaskService>,
        domain: impl Into<String>,
        task_list: impl Into<String>,
        identity: impl Into<String>,
        handler: WorkflowTaskHandler,
    ) -> Self {
        Self {
            service,
            domain: domain.into(),
            task_list: task_list.into(),
            identity: identity.into(),
            handler,
        }
    }
}

#[async_trait]
impl TaskPoller for WorkflowTaskPoller {
    type Task = PollForDecisionTaskResponse;

    async fn poll(&self) -> Result<Option<Self::Task>, TransportError> {
        let response = self
            .service
            .poll_for_decision_task(PollForDecisionTaskRequest {
                domain: self.domain.clone(),
                task_list: Some(TaskList::normal(self.task_list.clone())),
                identity: self.identity.clone(),
                binary_checksum: String::new(),
            })
            .await?;

        if response.is_empty() {
            Ok(None)
        } else {
            Ok(Some(response))
        }
    }

    async fn process(&self, task: Self::Task) -> MaestroResult<()> {
        self.handler.handle(task).await
    }
}

/// Activity task poller
pub struct ActivityTaskPoller {
    service: Arc<DynTaskService>,
    domain: String,
    task_list: String,
    identity: String,
    handler: ActivityTaskHandler,
}

impl ActivityTaskPoller {
    pub fn new(
        service: Arc<DynTaskService>,
        domain: impl Into<String>,
        task_list: impl Into<String>,
        identity: impl Into<String>,
        handler: ActivityTaskHandler,
    ) -> Self {
        Self {
            service,
            domain: domain.into(),
            task_list: task_list.into(),
            identity: identity.into(),
            handler,
        }
    }
}

#[async_trait]
impl TaskPoller for ActivityTaskPoller {
    type Task = PollForActivityTaskResponse;

    async fn poll(&self) -> Result<Option<Self::Task>, TransportError> {
        let response = self
            .service
            .poll_for_activity_task(PollForActivityTaskRequest {
                domain: self.domain.clone(),
                task_list: Some(TaskList::normal(self.task_list.clone())),
                identity: self.identity.clone(),
            })
            .await?;

        if response.is_empty() {
            Ok(None)
        } else {
            Ok(Some(response))
        }
    }

    async fn process(&self, task: Self::Task) -> MaestroResult<()> {
        self.handler.handle(task).await
    }
}

/// Handle to one running poller loop.
///
/// The loop runs as its own tokio task. `stop` is a cooperative signal;
/// `wait` observes loop exit and is safe to call any number of times, from
/// any task.
pub struct Poller {
    kind: PollerKind,
    domain: String,
    task_list: String,
    stop_tx: watch::Sender<bool>,
    stopped_rx: watch::Receiver<bool>,
}

impl Poller {
    /// Construct the poller and start its loop immediately.
    pub fn start<P: TaskPoller>(
        kind: PollerKind,
        domain: impl Into<String>,
        task_list: impl Into<String>,
        task_poller: Arc<P>,
        options: PollerOptions,
    ) -> Self {
        let domain = domain.into();
        let task_list = task_list.into();
        let (stop_tx, stop_rx) = watch::channel(false);
        let (stopped_tx, stopped_rx) = watch::channel(false);

        tokio::spawn(poll_loop(
            task_poller,
            kind,
            domain.clone(),
            task_list.clone(),
            options,
            stop_rx,
            stopped_tx,
        ));

        Self {
            kind,
            domain,
            task_list,
            stop_tx,
            stopped_rx,
        }
    }

    /// Signal the loop to exit once its current poll slot settles. Never
    /// aborts an in-flight task execution.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Block until the loop task has drained its in-flight work and exited.
    /// Idempotent; callable concurrently from any task.
    pub async fn wait(&self) {
        let mut stopped_rx = self.stopped_rx.clone();
        // Err here means the loop task is gone without reporting, which
        // still counts as exited.
        let _ = stopped_rx.wait_for(|stopped| *stopped).await;
    }

    pub fn kind(&self) -> PollerKind {
        self.kind
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn task_list(&self) -> &str {
        &self.task_list
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("kind", &self.kind)
            .field("domain", &self.domain)
            .field("task_list", &self.task_list)
            .finish()
    }
}

async fn poll_loop<P: TaskPoller>(
    task_poller: Arc<P>,
    kind: PollerKind,
    domain: String,
    task_list: String,
    options: PollerOptions,
    mut stop_rx: watch::Receiver<bool>,
    stopped_tx: watch::Sender<bool>,
) {
    let semaphore = Arc::new(Semaphore::new(options.max_concurrent_tasks.max(1)));
    let mut in_flight: JoinSet<()> = JoinSet::new();

    info!(%kind, %domain, %task_list, "poller started");

    'poll: while !*stop_rx.borrow_and_update() {
        while in_flight.try_join_next().is_some() {}

        // Hold an execution slot before asking the server for work, so a
        // task is never polled while the worker cannot run it.
        let permit = tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() {
                    break 'poll;
                }
                continue 'poll;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break 'poll,
            },
        };

        let polled = tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() {
                    break 'poll;
                }
                continue 'poll;
            }
            polled = task_poller.poll() => polled,
        };

        match polled {
            Ok(Some(task)) => {
                let task_poller = Arc::clone(&task_poller);
                in_flight.spawn(async move {
                    if let Err(task_error) = task_poller.process(task).await {
                        warn!(error = %task_error, "task processing failed");
                    }
                    drop(permit);
                });
            }
            Ok(None) => drop(permit),
            Err(transport_error) => {
                drop(permit);
                warn!(
                    %kind, %domain, %task_list,
                    error = %transport_error,
                    "poll failed, backing off"
                );
                tokio::select! {
                    changed = stop_rx.changed() => {
                        if changed.is_err() {
                            break 'poll;
                        }
                    }
                    _ = tokio::time::sleep(options.poll_retry_backoff) => {}
                }
            }
        }
    }

    // A stop request only prevents new polls; whatever is already executing
    // finishes and reports before the poller counts as stopped.
    while in_flight.join_next().await.is_some() {}

    info!(%kind, %domain, %task_list, "poller stopped");
    let _ = stopped_tx.send(true);
}
