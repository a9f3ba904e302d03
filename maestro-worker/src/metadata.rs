//! Task metadata.
//!
//! Immutable views over one polled task, built by the handlers and exposed
//! to executables and middleware. These carry identity and placement only;
//! payloads stay on the task itself.

use maestro_proto::task_service::{PollForActivityTaskResponse, PollForDecisionTaskResponse};
use std::collections::HashMap;
use std::time::Duration;

/// Metadata for one activity task execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityMetadata {
    pub domain: String,
    pub id: String,
    pub name: String,
    pub task_token: Vec<u8>,
    pub attempt: i32,
    pub workflow_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub workflow_name: Option<String>,
    pub headers: HashMap<String, Vec<u8>>,
    pub start_to_close_timeout: Option<Duration>,
    pub schedule_to_close_timeout: Option<Duration>,
    pub heartbeat_timeout: Option<Duration>,
}

impl ActivityMetadata {
    pub fn from_task(domain: &str, task: &PollForActivityTaskResponse) -> Self {
        Self {
            domain: task
                .workflow_domain
                .clone()
                .unwrap_or_else(|| domain.to_string()),
            id: task.activity_id.clone(),
            name: task
                .activity_type
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            task_token: task.task_token.clone(),
            attempt: task.attempt,
            workflow_id: task
                .workflow_execution
                .as_ref()
                .map(|we| we.workflow_id.clone()),
            workflow_run_id: task
                .workflow_execution
                .as_ref()
                .map(|we| we.run_id.clone()),
            workflow_name: task.workflow_type.as_ref().map(|t| t.name.clone()),
            headers: task
                .header
                .as_ref()
                .map(|h| h.fields.clone())
                .unwrap_or_default(),
            start_to_close_timeout: seconds(task.start_to_close_timeout_seconds),
            schedule_to_close_timeout: seconds(task.schedule_to_close_timeout_seconds),
            heartbeat_timeout: seconds(task.heartbeat_timeout_seconds),
        }
    }
}

/// Metadata for one decision task execution.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMetadata {
    pub domain: String,
    pub id: i64,
    pub task_token: Vec<u8>,
    pub attempt: i32,
    pub workflow_id: Option<String>,
    pub workflow_run_id: Option<String>,
    pub workflow_name: Option<String>,
}

impl DecisionMetadata {
    pub fn from_task(domain: &str, task: &PollForDecisionTaskResponse) -> Self {
        Self {
            domain: domain.to_string(),
            id: task.started_event_id,
            task_token: task.task_token.clone(),
            attempt: task.attempt,
            workflow_id: task
                .workflow_execution
                .as_ref()
                .map(|we| we.workflow_id.clone()),
            workflow_run_id: task
                .workflow_execution
                .as_ref()
                .map(|we| we.run_id.clone()),
            workflow_name: task.workflow_type.as_ref().map(|t| t.name.clone()),
        }
    }
}

fn seconds(value: Option<i32>) -> Option<Duration> {
    value.filter(|s| *s > 0).map(|s| Duration::from_secs(s as u64))
}
