//! Middleware interception chain.
//!
//! Every task execution runs through the worker's global middleware list.
//! The chain is assembled once at `start` as an ordered sequence — the
//! first registered middleware wraps outermost — and the same chain is
//! shared by every (domain, task list) poller pair.

use futures::future::BoxFuture;
use maestro_core::MaestroResult;
use maestro_proto::shared::Decision;
use std::sync::Arc;

/// Which kind of task is flowing through the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Workflow,
    Activity,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Workflow => f.write_str("workflow"),
            TaskKind::Activity => f.write_str("activity"),
        }
    }
}

/// The task as middleware sees it: identity and placement, no payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescriptor {
    pub kind: TaskKind,
    pub domain: String,
    pub task_list: String,
    /// Name of the executable resolved for this task.
    pub name: String,
    pub workflow_id: Option<String>,
    pub run_id: Option<String>,
    pub attempt: i32,
}

/// What one task execution produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    /// Decisions emitted by a workflow task.
    Decisions(Vec<Decision>),
    /// Result payload of an activity task.
    Payload(Option<Vec<u8>>),
}

/// An interceptor wrapping task execution.
///
/// `call` must invoke `next.run(task)` exactly once to continue the chain;
/// `Next` is consumed by `run`, so a second invocation is unrepresentable,
/// and dropping it without running skips the executable entirely
/// (implementation-defined misuse).
pub trait Middleware: Send + Sync {
    fn call<'a>(
        &'a self,
        task: &'a TaskDescriptor,
        next: Next<'a>,
    ) -> BoxFuture<'a, MaestroResult<TaskOutput>>;
}

/// The remainder of the chain, terminating in the executable itself.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
    terminal: BoxFuture<'a, MaestroResult<TaskOutput>>,
}

impl<'a> Next<'a> {
    /// Run the rest of the chain.
    pub fn run(self, task: &'a TaskDescriptor) -> BoxFuture<'a, MaestroResult<TaskOutput>> {
        match self.rest.split_first() {
            Some((head, rest)) => head.call(
                task,
                Next {
                    rest,
                    terminal: self.terminal,
                },
            ),
            None => self.terminal,
        }
    }
}

/// The ordered middleware sequence applied to every task execution.
#[derive(Clone)]
pub struct MiddlewareChain {
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl MiddlewareChain {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            middlewares: middlewares.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run `terminal` through the chain for `task`.
    pub async fn run<'a>(
        &'a self,
        task: &'a TaskDescriptor,
        terminal: BoxFuture<'a, MaestroResult<TaskOutput>>,
    ) -> MaestroResult<TaskOutput> {
        Next {
            rest: &self.middlewares[..],
            terminal,
        }
        .run(task)
        .await
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.middlewares.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for Recording {
        fn call<'a>(
            &'a self,
            task: &'a TaskDescriptor,
            next: Next<'a>,
        ) -> BoxFuture<'a, MaestroResult<TaskOutput>> {
            Box::pin(async move {
                self.log.lock().unwrap().push(format!("{}:enter", self.label));
                let result = next.run(task).await;
                self.log.lock().unwrap().push(format!("{}:exit", self.label));
                result
            })
        }
    }

    fn descriptor() -> TaskDescriptor {
        TaskDescriptor {
            kind: TaskKind::Activity,
            domain: "default".to_string(),
            task_list: "default".to_string(),
            name: "TestActivity".to_string(),
            workflow_id: None,
            run_id: None,
            attempt: 0,
        }
    }

    #[tokio::test]
    async fn chain_preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new(vec![
            Arc::new(Recording {
                label: "outer",
                log: log.clone(),
            }),
            Arc::new(Recording {
                label: "inner",
                log: log.clone(),
            }),
        ]);

        let task = descriptor();
        let terminal: BoxFuture<'_, MaestroResult<TaskOutput>> = Box::pin(async {
            log.lock().unwrap().push("execute".to_string());
            Ok(TaskOutput::Payload(None))
        });

        let output = chain.run(&task, terminal).await.unwrap();

        assert_eq!(output, TaskOutput::Payload(None));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer:enter", "inner:enter", "execute", "inner:exit", "outer:exit"]
        );
    }

    #[tokio::test]
    async fn empty_chain_runs_the_terminal_directly() {
        let chain = MiddlewareChain::new(Vec::new());
        let task = descriptor();

        let output = chain
            .run(&task, Box::pin(async { Ok(TaskOutput::Payload(Some(b"ok".to_vec()))) }))
            .await
            .unwrap();

        assert_eq!(output, TaskOutput::Payload(Some(b"ok".to_vec())));
    }
}
