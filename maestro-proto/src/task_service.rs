//! Task service boundary.
//!
//! The narrow interface the worker uses to talk to the orchestration
//! server: long-poll for decision and activity tasks, and report their
//! outcomes. Implementations wrap the actual transport and carry their own
//! retry/backoff policy; the worker treats every call as a blocking remote
//! call that either succeeds or fails as a unit.

use crate::shared::*;
use serde::{Deserialize, Serialize};

/// Poll for decision task request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForDecisionTaskRequest {
    pub domain: String,
    pub task_list: Option<TaskList>,
    pub identity: String,
    pub binary_checksum: String,
}

/// Poll for decision task response.
///
/// An empty `task_token` means the long poll timed out with no task
/// available; that is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForDecisionTaskResponse {
    pub task_token: Vec<u8>,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub previous_started_event_id: i64,
    pub started_event_id: i64,
    pub attempt: i32,
    pub history: Option<History>,
    pub next_page_token: Option<Vec<u8>>,
}

impl PollForDecisionTaskResponse {
    pub fn is_empty(&self) -> bool {
        self.task_token.is_empty()
    }
}

/// Respond decision task completed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondDecisionTaskCompletedRequest {
    pub task_token: Vec<u8>,
    pub decisions: Vec<Decision>,
    pub execution_context: Option<Vec<u8>>,
    pub identity: String,
    pub binary_checksum: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RespondDecisionTaskCompletedResponse {}

/// Server-recognized causes for a failed decision task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum DecisionTaskFailedCause {
    UnhandledDecision = 0,
    BadScheduleActivityAttributes = 1,
    WorkflowWorkerUnhandledFailure = 23,
}

/// Respond decision task failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondDecisionTaskFailedRequest {
    pub task_token: Vec<u8>,
    pub cause: DecisionTaskFailedCause,
    pub details: Option<Vec<u8>>,
    pub identity: String,
    pub binary_checksum: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RespondDecisionTaskFailedResponse {}

/// Poll for activity task request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForActivityTaskRequest {
    pub domain: String,
    pub task_list: Option<TaskList>,
    pub identity: String,
}

/// Poll for activity task response.
///
/// As with decision tasks, an empty `task_token` signals a timed-out poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollForActivityTaskResponse {
    pub task_token: Vec<u8>,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub workflow_domain: Option<String>,
    pub activity_id: String,
    pub activity_type: Option<ActivityType>,
    pub input: Option<Vec<u8>>,
    pub scheduled_timestamp: Option<i64>,
    pub started_timestamp: Option<i64>,
    pub schedule_to_close_timeout_seconds: Option<i32>,
    pub start_to_close_timeout_seconds: Option<i32>,
    pub heartbeat_timeout_seconds: Option<i32>,
    pub attempt: i32,
    pub header: Option<Header>,
}

impl PollForActivityTaskResponse {
    pub fn is_empty(&self) -> bool {
        self.task_token.is_empty()
    }
}

/// Respond activity task completed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondActivityTaskCompletedRequest {
    pub task_token: Vec<u8>,
    pub result: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RespondActivityTaskCompletedResponse {}

/// Respond activity task failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondActivityTaskFailedRequest {
    pub task_token: Vec<u8>,
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RespondActivityTaskFailedResponse {}

/// Task service trait - the operations the worker calls on the server
#[async_trait::async_trait]
pub trait TaskService: Send + Sync {
    type Error: std::error::Error;

    async fn poll_for_decision_task(
        &self,
        request: PollForDecisionTaskRequest,
    ) -> Result<PollForDecisionTaskResponse, Self::Error>;

    async fn respond_decision_task_completed(
        &self,
        request: RespondDecisionTaskCompletedRequest,
    ) -> Result<RespondDecisionTaskCompletedResponse, Self::Error>;

    async fn respond_decision_task_failed(
        &self,
        request: RespondDecisionTaskFailedRequest,
    ) -> Result<RespondDecisionTaskFailedResponse, Self::Error>;

    async fn poll_for_activity_task(
        &self,
        request: PollForActivityTaskRequest,
    ) -> Result<PollForActivityTaskResponse, Self::Error>;

    async fn respond_activity_task_completed(
        &self,
        request: RespondActivityTaskCompletedRequest,
    ) -> Result<RespondActivityTaskCompletedResponse, Self::Error>;

    async fn respond_activity_task_failed(
        &self,
        request: RespondActivityTaskFailedRequest,
    ) -> Result<RespondActivityTaskFailedResponse, Self::Error>;
}
