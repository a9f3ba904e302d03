//! Worker implementation for hosting workflows and activities.
//!
//! The worker owns the registered executables, builds one lookup and one
//! poller pair per distinct (domain, task list) combination, starts and
//! stops them together, and blocks the host process until told to shut
//! down.

use crate::handlers::{ActivityTaskHandler, WorkflowTaskHandler};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::pollers::{ActivityTaskPoller, Poller, PollerKind, PollerOptions, WorkflowTaskPoller};
use crate::registry::{Activity, ExecutableLookup, Workflow};
use crate::DynTaskService;
use maestro_core::{
    ConfigurationError, ExecutableConfig, RegistrationKey, DEFAULT_DOMAIN, DEFAULT_TASK_LIST,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

/// Worker options for configuration
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Identity reported to the task service with every call.
    pub identity: String,
    /// Interval between shutdown-flag re-checks in the supervising loop
    /// (default: 1s). A stop request interrupts the wait immediately, so
    /// this only bounds how often the flag is re-read, not shutdown
    /// latency.
    pub shutdown_poll_interval: Duration,
    /// Concurrent executions per workflow poller.
    pub max_concurrent_workflow_tasks: usize,
    /// Concurrent executions per activity poller.
    pub max_concurrent_activity_tasks: usize,
    /// Delay before a poller retries after a transport error.
    pub poll_retry_backoff: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            identity: format!(
                "maestro-worker@{}-pid-{}",
                std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
                std::process::id()
            ),
            shutdown_poll_interval: Duration::from_secs(1),
            max_concurrent_workflow_tasks: 10,
            max_concurrent_activity_tasks: 20,
            poll_retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Shared shutdown signal: an atomic flag plus a stored-permit notify so a
/// request is never lost to a wakeup race.
#[derive(Debug, Default)]
struct Shutdown {
    requested: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    /// Returns true if this call was the first request.
    fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_one();
        }
        first
    }

    fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    async fn notified(&self) {
        self.notify.notified().await;
    }
}

/// Cloneable trigger for requesting shutdown from outside the worker —
/// the composition layer binds process signals to this.
///
/// `request_stop` only raises the signal; the blocked [`Worker::run`] call
/// performs the actual poller teardown before returning.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<Shutdown>,
}

impl ShutdownHandle {
    pub fn request_stop(&self) {
        self.shutdown.request();
    }
}

/// Hosts workflow and activity implementations and polls the task service
/// for work.
///
/// Registration (`register_workflow`, `register_activity`,
/// `use_middleware`) takes `&mut self` and must complete before `start`;
/// once started, the lookups are frozen and shared read-only with the
/// pollers.
pub struct Worker {
    service: Arc<DynTaskService>,
    options: WorkerOptions,
    workflows: HashMap<RegistrationKey, Arc<ExecutableLookup<dyn Workflow>>>,
    activities: HashMap<RegistrationKey, Arc<ExecutableLookup<dyn Activity>>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    pollers: Mutex<Vec<Poller>>,
    shutdown: Arc<Shutdown>,
    started: AtomicBool,
}

impl Worker {
    pub fn new(service: Arc<DynTaskService>) -> Self {
        Self::with_options(service, WorkerOptions::default())
    }

    pub fn with_options(service: Arc<DynTaskService>, options: WorkerOptions) -> Self {
        Self {
            service,
            options,
            workflows: HashMap::new(),
            activities: HashMap::new(),
            middlewares: Vec::new(),
            pollers: Mutex::new(Vec::new()),
            shutdown: Arc::new(Shutdown::default()),
            started: AtomicBool::new(false),
        }
    }

    /// Register a workflow under its own name on the default domain and
    /// task list.
    pub fn register_workflow(
        &mut self,
        workflow: Arc<dyn Workflow>,
    ) -> Result<(), ConfigurationError> {
        self.register_workflow_with_config(workflow, ExecutableConfig::default())
    }

    /// Register a workflow with explicit name/placement overrides;
    /// unset fields fall back to the workflow's `name()` and the defaults.
    pub fn register_workflow_with_config(
        &mut self,
        workflow: Arc<dyn Workflow>,
        config: ExecutableConfig,
    ) -> Result<(), ConfigurationError> {
        self.ensure_not_started()?;
        let name = config.name.unwrap_or_else(|| workflow.name().to_string());
        let key = registration_key(config.domain, config.task_list)?;
        debug!(workflow = %name, key = %key, "registering workflow");
        add_to_lookup(&mut self.workflows, key, name, workflow)
    }

    /// Register an activity under its own name on the default domain and
    /// task list.
    pub fn register_activity(
        &mut self,
        activity: Arc<dyn Activity>,
    ) -> Result<(), ConfigurationError> {
        self.register_activity_with_config(activity, ExecutableConfig::default())
    }

    /// Register an activity with explicit name/placement overrides.
    pub fn register_activity_with_config(
        &mut self,
        activity: Arc<dyn Activity>,
        config: ExecutableConfig,
    ) -> Result<(), ConfigurationError> {
        self.ensure_not_started()?;
        let name = config.name.unwrap_or_else(|| activity.name().to_string());
        let key = registration_key(config.domain, config.task_list)?;
        debug!(activity = %name, key = %key, "registering activity");
        add_to_lookup(&mut self.activities, key, name, activity)
    }

    /// Append a middleware to the global chain. Order is preserved: the
    /// first registered middleware wraps outermost.
    pub fn use_middleware(
        &mut self,
        middleware: Arc<dyn Middleware>,
    ) -> Result<(), ConfigurationError> {
        self.ensure_not_started()?;
        self.middlewares.push(middleware);
        Ok(())
    }

    /// Start one workflow poller and one activity poller per registered
    /// (domain, task list) combination. Non-blocking; each poller runs as
    /// its own tokio task.
    pub async fn start(&self) -> Result<(), ConfigurationError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ConfigurationError::AlreadyStarted);
        }

        let chain = MiddlewareChain::new(self.middlewares.clone());
        let mut pollers = self.pollers.lock().await;

        for (key, lookup) in &self.workflows {
            let handler = WorkflowTaskHandler::new(
                Arc::clone(&self.service),
                Arc::clone(lookup),
                chain.clone(),
                key.domain(),
                key.task_list(),
                self.options.identity.clone(),
            );
            let task_poller = Arc::new(WorkflowTaskPoller::new(
                Arc::clone(&self.service),
                key.domain(),
                key.task_list(),
                self.options.identity.clone(),
                handler,
            ));
            pollers.push(Poller::start(
                PollerKind::Workflow,
                key.domain(),
                key.task_list(),
                task_poller,
                PollerOptions {
                    max_concurrent_tasks: self.options.max_concurrent_workflow_tasks,
                    poll_retry_backoff: self.options.poll_retry_backoff,
                },
            ));
        }

        for (key, lookup) in &self.activities {
            let handler = ActivityTaskHandler::new(
                Arc::clone(&self.service),
                Arc::clone(lookup),
                chain.clone(),
                key.domain(),
                key.task_list(),
                self.options.identity.clone(),
            );
            let task_poller = Arc::new(ActivityTaskPoller::new(
                Arc::clone(&self.service),
                key.domain(),
                key.task_list(),
                self.options.identity.clone(),
                handler,
            ));
            pollers.push(Poller::start(
                PollerKind::Activity,
                key.domain(),
                key.task_list(),
                task_poller,
                PollerOptions {
                    max_concurrent_tasks: self.options.max_concurrent_activity_tasks,
                    poll_retry_backoff: self.options.poll_retry_backoff,
                },
            ));
        }

        info!(
            poller_count = pollers.len(),
            identity = %self.options.identity,
            "worker started"
        );
        Ok(())
    }

    /// Start the pollers and block until shutdown is requested, then stop
    /// and drain every poller before returning.
    pub async fn run(&self) -> Result<(), ConfigurationError> {
        self.start().await?;

        loop {
            if self.shutdown.is_requested() {
                break;
            }
            tokio::select! {
                _ = self.shutdown.notified() => {}
                _ = tokio::time::sleep(self.options.shutdown_poll_interval) => {}
            }
        }

        self.shutdown_pollers().await;
        Ok(())
    }

    /// Request shutdown, then stop and wait for every poller. Idempotent:
    /// the second call is a no-op. Safe to call from a different task than
    /// the one blocked in `run`, and before any poller exists.
    pub async fn stop(&self) {
        if !self.shutdown.request() {
            return;
        }
        info!("worker stopping");
        self.shutdown_pollers().await;
    }

    /// Cloneable shutdown trigger for the composition layer (e.g. process
    /// signal handlers).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    pub async fn poller_count(&self) -> usize {
        self.pollers.lock().await.len()
    }

    /// Registered workflow names per (domain, task list), for diagnostics.
    pub fn workflow_registrations(&self) -> Vec<(RegistrationKey, Vec<String>)> {
        registrations(&self.workflows)
    }

    /// Registered activity names per (domain, task list), for diagnostics.
    pub fn activity_registrations(&self) -> Vec<(RegistrationKey, Vec<String>)> {
        registrations(&self.activities)
    }

    fn ensure_not_started(&self) -> Result<(), ConfigurationError> {
        if self.started.load(Ordering::SeqCst) {
            Err(ConfigurationError::AlreadyStarted)
        } else {
            Ok(())
        }
    }

    async fn shutdown_pollers(&self) {
        let pollers = self.pollers.lock().await;
        for poller in pollers.iter() {
            poller.stop();
        }
        for poller in pollers.iter() {
            poller.wait().await;
        }
        if !pollers.is_empty() {
            info!(poller_count = pollers.len(), "all pollers stopped");
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("identity", &self.options.identity)
            .field("workflow_keys", &self.workflows.keys().collect::<Vec<_>>())
            .field("activity_keys", &self.activities.keys().collect::<Vec<_>>())
            .field("middleware_count", &self.middlewares.len())
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}

fn registration_key(
    domain: Option<String>,
    task_list: Option<String>,
) -> Result<RegistrationKey, ConfigurationError> {
    RegistrationKey::new(
        domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        task_list.unwrap_or_else(|| DEFAULT_TASK_LIST.to_string()),
    )
}

fn add_to_lookup<E: ?Sized>(
    map: &mut HashMap<RegistrationKey, Arc<ExecutableLookup<E>>>,
    key: RegistrationKey,
    name: String,
    executable: Arc<E>,
) -> Result<(), ConfigurationError> {
    let lookup = map
        .entry(key.clone())
        .or_insert_with(|| Arc::new(ExecutableLookup::new()));

    match Arc::get_mut(lookup) {
        Some(lookup) => {
            lookup.add(name, executable);
            Ok(())
        }
        // A shared lookup means a poller already holds it.
        None => Err(ConfigurationError::FrozenLookup {
            domain: key.domain().to_string(),
            task_list: key.task_list().to_string(),
        }),
    }
}

fn registrations<E: ?Sized>(
    map: &HashMap<RegistrationKey, Arc<ExecutableLookup<E>>>,
) -> Vec<(RegistrationKey, Vec<String>)> {
    let mut entries: Vec<(RegistrationKey, Vec<String>)> = map
        .iter()
        .map(|(key, lookup)| (key.clone(), lookup.names()))
        .collect();
    entries.sort_by(|(a, _), (b, _)| {
        (a.domain(), a.task_list()).cmp(&(b.domain(), b.task_list()))
    });
    entries
}
