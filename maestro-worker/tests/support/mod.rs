//! Shared fixtures for worker integration tests: a scriptable in-memory
//! task service plus trivial workflow/activity implementations.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::future::BoxFuture;
use maestro_core::{ExecutionError, MaestroResult, TransportError};
use maestro_proto::shared::*;
use maestro_proto::task_service::*;
use maestro_worker::{
    Activity, ActivityContext, Middleware, Next, TaskDescriptor, TaskOutput, Workflow,
    WorkerOptions, WorkflowTask,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// In-memory task service. Queued tasks are served once; an empty queue
/// behaves like a timed-out long poll.
#[derive(Default)]
pub struct MockTaskService {
    decision_tasks: Mutex<VecDeque<PollForDecisionTaskResponse>>,
    activity_tasks: Mutex<VecDeque<PollForActivityTaskResponse>>,
    failing_activity_polls: AtomicUsize,
    pub decision_polls: AtomicUsize,
    pub activity_polls: AtomicUsize,
    pub activity_poll_requests: Mutex<Vec<PollForActivityTaskRequest>>,
    pub completed_decisions: Mutex<Vec<RespondDecisionTaskCompletedRequest>>,
    pub failed_decisions: Mutex<Vec<RespondDecisionTaskFailedRequest>>,
    pub completed_activities: Mutex<Vec<RespondActivityTaskCompletedRequest>>,
    pub failed_activities: Mutex<Vec<RespondActivityTaskFailedRequest>>,
}

impl MockTaskService {
    pub fn queue_decision_task(&self, task: PollForDecisionTaskResponse) {
        self.decision_tasks.lock().unwrap().push_back(task);
    }

    pub fn queue_activity_task(&self, task: PollForActivityTaskResponse) {
        self.activity_tasks.lock().unwrap().push_back(task);
    }

    /// Make the next `count` activity polls fail at the transport layer.
    pub fn fail_next_activity_polls(&self, count: usize) {
        self.failing_activity_polls.store(count, Ordering::SeqCst);
    }

    pub fn completed_activity_count(&self) -> usize {
        self.completed_activities.lock().unwrap().len()
    }

    pub fn failed_activity_count(&self) -> usize {
        self.failed_activities.lock().unwrap().len()
    }

    pub fn completed_decision_count(&self) -> usize {
        self.completed_decisions.lock().unwrap().len()
    }

    pub fn failed_decision_count(&self) -> usize {
        self.failed_decisions.lock().unwrap().len()
    }
}

const LONG_POLL_TIMEOUT: Duration = Duration::from_millis(20);

#[async_trait]
impl TaskService for MockTaskService {
    type Error = TransportError;

    async fn poll_for_decision_task(
        &self,
        _request: PollForDecisionTaskRequest,
    ) -> Result<PollForDecisionTaskResponse, Self::Error> {
        self.decision_polls.fetch_add(1, Ordering::SeqCst);

        let task = self.decision_tasks.lock().unwrap().pop_front();
        match task {
            Some(task) => Ok(task),
            None => {
                tokio::time::sleep(LONG_POLL_TIMEOUT).await;
                Ok(PollForDecisionTaskResponse {
                    task_token: Vec::new(),
                    workflow_execution: None,
                    workflow_type: None,
                    previous_started_event_id: 0,
                    started_event_id: 0,
                    attempt: 0,
                    history: None,
                    next_page_token: None,
                })
            }
        }
    }

    async fn respond_decision_task_completed(
        &self,
        request: RespondDecisionTaskCompletedRequest,
    ) -> Result<RespondDecisionTaskCompletedResponse, Self::Error> {
        self.completed_decisions.lock().unwrap().push(request);
        Ok(RespondDecisionTaskCompletedResponse::default())
    }

    async fn respond_decision_task_failed(
        &self,
        request: RespondDecisionTaskFailedRequest,
    ) -> Result<RespondDecisionTaskFailedResponse, Self::Error> {
        self.failed_decisions.lock().unwrap().push(request);
        Ok(RespondDecisionTaskFailedResponse::default())
    }

    async fn poll_for_activity_task(
        &self,
        request: PollForActivityTaskRequest,
    ) -> Result<PollForActivityTaskResponse, Self::Error> {
        self.activity_polls.fetch_add(1, Ordering::SeqCst);
        self.activity_poll_requests.lock().unwrap().push(request);

        if self
            .failing_activity_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
        {
            return Err(TransportError::Unavailable("scripted poll failure".to_string()));
        }

        let task = self.activity_tasks.lock().unwrap().pop_front();
        match task {
            Some(task) => Ok(task),
            None => {
                tokio::time::sleep(LONG_POLL_TIMEOUT).await;
                Ok(PollForActivityTaskResponse {
                    task_token: Vec::new(),
                    workflow_execution: None,
                    workflow_type: None,
                    workflow_domain: None,
                    activity_id: String::new(),
                    activity_type: None,
                    input: None,
                    scheduled_timestamp: None,
                    started_timestamp: None,
                    schedule_to_close_timeout_seconds: None,
                    start_to_close_timeout_seconds: None,
                    heartbeat_timeout_seconds: None,
                    attempt: 0,
                    header: None,
                })
            }
        }
    }

    async fn respond_activity_task_completed(
        &self,
        request: RespondActivityTaskCompletedRequest,
    ) -> Result<RespondActivityTaskCompletedResponse, Self::Error> {
        self.completed_activities.lock().unwrap().push(request);
        Ok(RespondActivityTaskCompletedResponse::default())
    }

    async fn respond_activity_task_failed(
        &self,
        request: RespondActivityTaskFailedRequest,
    ) -> Result<RespondActivityTaskFailedResponse, Self::Error> {
        self.failed_activities.lock().unwrap().push(request);
        Ok(RespondActivityTaskFailedResponse::default())
    }
}

/// One pollable decision task with a minimal but well-formed history.
pub fn decision_task(workflow_name: &str) -> PollForDecisionTaskResponse {
    let events = vec![
        HistoryEvent {
            event_id: 1,
            timestamp: 0,
            version: 1,
            task_id: 1,
            attributes: EventAttributes::WorkflowExecutionStarted(Box::new(
                WorkflowExecutionStartedEventAttributes {
                    workflow_type: Some(WorkflowType {
                        name: workflow_name.to_string(),
                    }),
                    parent_workflow_execution: None,
                    task_list: Some(TaskList::normal("default")),
                    input: None,
                    execution_start_to_close_timeout_seconds: 60,
                    task_start_to_close_timeout_seconds: 10,
                    identity: "test".to_string(),
                    continued_execution_run_id: None,
                    attempt: 0,
                    cron_schedule: None,
                },
            )),
        },
        HistoryEvent {
            event_id: 2,
            timestamp: 0,
            version: 1,
            task_id: 1,
            attributes: EventAttributes::DecisionTaskScheduled(Box::new(
                DecisionTaskScheduledEventAttributes {
                    task_list: Some(TaskList::normal("default")),
                    start_to_close_timeout_seconds: 10,
                    attempt: 0,
                },
            )),
        },
        HistoryEvent {
            event_id: 3,
            timestamp: 0,
            version: 1,
            task_id: 1,
            attributes: EventAttributes::DecisionTaskStarted(Box::new(
                DecisionTaskStartedEventAttributes {
                    scheduled_event_id: 2,
                    identity: "test".to_string(),
                    request_id: "request-1".to_string(),
                },
            )),
        },
    ];

    PollForDecisionTaskResponse {
        task_token: b"decision-token".to_vec(),
        workflow_execution: Some(WorkflowExecution::new("wf-1", "run-1")),
        workflow_type: Some(WorkflowType {
            name: workflow_name.to_string(),
        }),
        previous_started_event_id: 0,
        started_event_id: 3,
        attempt: 1,
        history: Some(History { events }),
        next_page_token: None,
    }
}

/// One pollable activity task with a JSON input payload.
pub fn activity_task(activity_name: &str, input: &serde_json::Value) -> PollForActivityTaskResponse {
    PollForActivityTaskResponse {
        task_token: b"activity-token".to_vec(),
        workflow_execution: Some(WorkflowExecution::new("wf-1", "run-1")),
        workflow_type: Some(WorkflowType {
            name: "TestWorkflow".to_string(),
        }),
        workflow_domain: None,
        activity_id: "5".to_string(),
        activity_type: Some(ActivityType {
            name: activity_name.to_string(),
        }),
        input: Some(serde_json::to_vec(input).unwrap()),
        scheduled_timestamp: None,
        started_timestamp: None,
        schedule_to_close_timeout_seconds: Some(60),
        start_to_close_timeout_seconds: Some(30),
        heartbeat_timeout_seconds: None,
        attempt: 1,
        header: None,
    }
}

/// Workflow that completes immediately with a single decision.
pub struct EchoWorkflow;

impl Workflow for EchoWorkflow {
    fn name(&self) -> &str {
        "EchoWorkflow"
    }

    fn execute(
        &self,
        _task: WorkflowTask,
    ) -> BoxFuture<'static, Result<Vec<Decision>, ExecutionError>> {
        Box::pin(async move {
            Ok(vec![Decision {
                decision_type: DecisionType::CompleteWorkflowExecution,
                attributes: DecisionAttributes::CompleteWorkflowExecution(Box::new(
                    CompleteWorkflowExecutionDecisionAttributes { result: None },
                )),
            }])
        })
    }
}

/// Workflow that records what it was handed before completing.
pub struct InspectingWorkflow {
    pub seen_history_len: Arc<Mutex<Option<usize>>>,
}

impl Workflow for InspectingWorkflow {
    fn name(&self) -> &str {
        "InspectingWorkflow"
    }

    fn execute(
        &self,
        task: WorkflowTask,
    ) -> BoxFuture<'static, Result<Vec<Decision>, ExecutionError>> {
        let seen = Arc::clone(&self.seen_history_len);
        Box::pin(async move {
            *seen.lock().unwrap() = Some(task.history.len());
            Ok(vec![Decision {
                decision_type: DecisionType::CompleteWorkflowExecution,
                attributes: DecisionAttributes::CompleteWorkflowExecution(Box::new(
                    CompleteWorkflowExecutionDecisionAttributes { result: None },
                )),
            }])
        })
    }
}

/// Activity that returns its input unchanged.
pub struct EchoActivity;

impl Activity for EchoActivity {
    fn name(&self) -> &str {
        "EchoActivity"
    }

    fn execute(
        &self,
        _ctx: ActivityContext,
        input: Option<Vec<u8>>,
    ) -> BoxFuture<'static, Result<Option<Vec<u8>>, ExecutionError>> {
        Box::pin(async move { Ok(input) })
    }
}

/// Activity that takes a while, flagging when execution has entered.
pub struct SlowActivity {
    pub entered: Arc<AtomicBool>,
    pub delay: Duration,
}

impl Activity for SlowActivity {
    fn name(&self) -> &str {
        "SlowActivity"
    }

    fn execute(
        &self,
        _ctx: ActivityContext,
        input: Option<Vec<u8>>,
    ) -> BoxFuture<'static, Result<Option<Vec<u8>>, ExecutionError>> {
        let entered = Arc::clone(&self.entered);
        let delay = self.delay;
        Box::pin(async move {
            entered.store(true, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(input)
        })
    }
}

/// Activity that always fails.
pub struct FailingActivity;

impl Activity for FailingActivity {
    fn name(&self) -> &str {
        "FailingActivity"
    }

    fn execute(
        &self,
        _ctx: ActivityContext,
        _input: Option<Vec<u8>>,
    ) -> BoxFuture<'static, Result<Option<Vec<u8>>, ExecutionError>> {
        Box::pin(async move { Err(ExecutionError::new("boom")) })
    }
}

/// Activity that panics mid-execution.
pub struct PanickyActivity;

impl Activity for PanickyActivity {
    fn name(&self) -> &str {
        "PanickyActivity"
    }

    fn execute(
        &self,
        _ctx: ActivityContext,
        _input: Option<Vec<u8>>,
    ) -> BoxFuture<'static, Result<Option<Vec<u8>>, ExecutionError>> {
        Box::pin(async move { panic!("scripted panic") })
    }
}

/// Middleware that records enter/exit order into a shared log.
pub struct RecordingMiddleware {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl Middleware for RecordingMiddleware {
    fn call<'a>(
        &'a self,
        task: &'a TaskDescriptor,
        next: Next<'a>,
    ) -> BoxFuture<'a, MaestroResult<TaskOutput>> {
        Box::pin(async move {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:enter", self.label));
            let result = next.run(task).await;
            self.log.lock().unwrap().push(format!("{}:exit", self.label));
            result
        })
    }
}

/// Worker options tuned for fast tests.
pub fn fast_options() -> WorkerOptions {
    WorkerOptions {
        shutdown_poll_interval: Duration::from_millis(50),
        poll_retry_backoff: Duration::from_millis(10),
        ..WorkerOptions::default()
    }
}

/// Poll `condition` until it holds or `deadline` elapses.
pub async fn eventually(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
