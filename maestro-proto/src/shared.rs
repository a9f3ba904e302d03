//! Shared types used across the maestro protocol.
//!
//! These mirror the server's versioned schema and represent the core data
//! structures for workflow execution, history events, and decisions. The
//! event attribute payload is modeled as a tagged union so that every
//! consumer matching on it is checked by the compiler when the protocol
//! grows a new event type.

use serde::{Deserialize, Serialize};

/// Unique identifier for a workflow execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowExecution {
    /// The workflow ID (user-defined or system-generated)
    pub workflow_id: String,
    /// The run ID (unique for each run of a workflow)
    pub run_id: String,
}

impl WorkflowExecution {
    pub fn new(workflow_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
        }
    }
}

/// Workflow type information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowType {
    pub name: String,
}

/// Activity type information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
}

/// Task list identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskList {
    pub name: String,
    pub kind: TaskListKind,
}

impl TaskList {
    pub fn normal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TaskListKind::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum TaskListKind {
    Normal = 0,
    Sticky = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TimeoutType {
    StartToClose = 0,
    ScheduleToStart = 1,
    ScheduleToClose = 2,
    Heartbeat = 3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub fields: std::collections::HashMap<String, Vec<u8>>,
}

/// Represents a single entry in a workflow's append-only history log.
///
/// `timestamp` carries the server's original event time in nanoseconds.
/// The event type is not stored separately; it is derived from the
/// attributes variant, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub event_id: i64,
    pub timestamp: i64,
    pub version: i64,
    pub task_id: i64,
    pub attributes: EventAttributes,
}

impl HistoryEvent {
    pub fn event_type(&self) -> EventType {
        self.attributes.event_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum EventType {
    WorkflowExecutionStarted = 0,
    WorkflowExecutionCompleted = 1,
    WorkflowExecutionFailed = 2,
    WorkflowExecutionTimedOut = 3,
    DecisionTaskScheduled = 4,
    DecisionTaskStarted = 5,
    DecisionTaskCompleted = 6,
    DecisionTaskTimedOut = 7,
    DecisionTaskFailed = 8,
    ActivityTaskScheduled = 9,
    ActivityTaskStarted = 10,
    ActivityTaskCompleted = 11,
    ActivityTaskFailed = 12,
    ActivityTaskTimedOut = 13,
    ActivityTaskCancelRequested = 14,
    ActivityTaskCanceled = 15,
    TimerStarted = 16,
    TimerFired = 17,
    TimerCanceled = 18,
    WorkflowExecutionCancelRequested = 19,
    WorkflowExecutionCanceled = 20,
    RequestCancelExternalWorkflowExecutionInitiated = 21,
    RequestCancelExternalWorkflowExecutionFailed = 22,
    ExternalWorkflowExecutionCancelRequested = 23,
    MarkerRecorded = 24,
    WorkflowExecutionSignaled = 25,
    WorkflowExecutionTerminated = 26,
    SignalExternalWorkflowExecutionInitiated = 27,
    SignalExternalWorkflowExecutionFailed = 28,
    ExternalWorkflowExecutionSignaled = 29,
    StartChildWorkflowExecutionInitiated = 35,
    ChildWorkflowExecutionStarted = 36,
    ChildWorkflowExecutionCompleted = 37,
    ChildWorkflowExecutionFailed = 38,
    ChildWorkflowExecutionTimedOut = 39,
    ChildWorkflowExecutionCanceled = 40,
    ChildWorkflowExecutionTerminated = 41,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventType::WorkflowExecutionStarted => "WorkflowExecutionStarted",
            EventType::WorkflowExecutionCompleted => "WorkflowExecutionCompleted",
            EventType::WorkflowExecutionFailed => "WorkflowExecutionFailed",
            EventType::WorkflowExecutionTimedOut => "WorkflowExecutionTimedOut",
            EventType::DecisionTaskScheduled => "DecisionTaskScheduled",
            EventType::DecisionTaskStarted => "DecisionTaskStarted",
            EventType::DecisionTaskCompleted => "DecisionTaskCompleted",
            EventType::DecisionTaskTimedOut => "DecisionTaskTimedOut",
            EventType::DecisionTaskFailed => "DecisionTaskFailed",
            EventType::ActivityTaskScheduled => "ActivityTaskScheduled",
            EventType::ActivityTaskStarted => "ActivityTaskStarted",
            EventType::ActivityTaskCompleted => "ActivityTaskCompleted",
            EventType::ActivityTaskFailed => "ActivityTaskFailed",
            EventType::ActivityTaskTimedOut => "ActivityTaskTimedOut",
            EventType::ActivityTaskCancelRequested => "ActivityTaskCancelRequested",
            EventType::ActivityTaskCanceled => "ActivityTaskCanceled",
            EventType::TimerStarted => "TimerStarted",
            EventType::TimerFired => "TimerFired",
            EventType::TimerCanceled => "TimerCanceled",
            EventType::WorkflowExecutionCancelRequested => "WorkflowExecutionCancelRequested",
            EventType::WorkflowExecutionCanceled => "WorkflowExecutionCanceled",
            EventType::RequestCancelExternalWorkflowExecutionInitiated => {
                "RequestCancelExternalWorkflowExecutionInitiated"
            }
            EventType::RequestCancelExternalWorkflowExecutionFailed => {
                "RequestCancelExternalWorkflowExecutionFailed"
            }
            EventType::ExternalWorkflowExecutionCancelRequested => {
                "ExternalWorkflowExecutionCancelRequested"
            }
            EventType::MarkerRecorded => "MarkerRecorded",
            EventType::WorkflowExecutionSignaled => "WorkflowExecutionSignaled",
            EventType::WorkflowExecutionTerminated => "WorkflowExecutionTerminated",
            EventType::SignalExternalWorkflowExecutionInitiated => {
                "SignalExternalWorkflowExecutionInitiated"
            }
            EventType::SignalExternalWorkflowExecutionFailed => {
                "SignalExternalWorkflowExecutionFailed"
            }
            EventType::ExternalWorkflowExecutionSignaled => "ExternalWorkflowExecutionSignaled",
            EventType::StartChildWorkflowExecutionInitiated => {
                "StartChildWorkflowExecutionInitiated"
            }
            EventType::ChildWorkflowExecutionStarted => "ChildWorkflowExecutionStarted",
            EventType::ChildWorkflowExecutionCompleted => "ChildWorkflowExecutionCompleted",
            EventType::ChildWorkflowExecutionFailed => "ChildWorkflowExecutionFailed",
            EventType::ChildWorkflowExecutionTimedOut => "ChildWorkflowExecutionTimedOut",
            EventType::ChildWorkflowExecutionCanceled => "ChildWorkflowExecutionCanceled",
            EventType::ChildWorkflowExecutionTerminated => "ChildWorkflowExecutionTerminated",
        };
        f.write_str(name)
    }
}

/// Type-specific payload of a history event.
///
/// One boxed struct per event type; the discriminant doubles as the event
/// type tag (see [`EventAttributes::event_type`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventAttributes {
    WorkflowExecutionStarted(Box<WorkflowExecutionStartedEventAttributes>),
    WorkflowExecutionCompleted(Box<WorkflowExecutionCompletedEventAttributes>),
    WorkflowExecutionFailed(Box<WorkflowExecutionFailedEventAttributes>),
    WorkflowExecutionTimedOut(Box<WorkflowExecutionTimedOutEventAttributes>),
    DecisionTaskScheduled(Box<DecisionTaskScheduledEventAttributes>),
    DecisionTaskStarted(Box<DecisionTaskStartedEventAttributes>),
    DecisionTaskCompleted(Box<DecisionTaskCompletedEventAttributes>),
    DecisionTaskTimedOut(Box<DecisionTaskTimedOutEventAttributes>),
    DecisionTaskFailed(Box<DecisionTaskFailedEventAttributes>),
    ActivityTaskScheduled(Box<ActivityTaskScheduledEventAttributes>),
    ActivityTaskStarted(Box<ActivityTaskStartedEventAttributes>),
    ActivityTaskCompleted(Box<ActivityTaskCompletedEventAttributes>),
    ActivityTaskFailed(Box<ActivityTaskFailedEventAttributes>),
    ActivityTaskTimedOut(Box<ActivityTaskTimedOutEventAttributes>),
    ActivityTaskCancelRequested(Box<ActivityTaskCancelRequestedEventAttributes>),
    ActivityTaskCanceled(Box<ActivityTaskCanceledEventAttributes>),
    TimerStarted(Box<TimerStartedEventAttributes>),
    TimerFired(Box<TimerFiredEventAttributes>),
    TimerCanceled(Box<TimerCanceledEventAttributes>),
    WorkflowExecutionCancelRequested(Box<WorkflowExecutionCancelRequestedEventAttributes>),
    WorkflowExecutionCanceled(Box<WorkflowExecutionCanceledEventAttributes>),
    RequestCancelExternalWorkflowExecutionInitiated(
        Box<RequestCancelExternalWorkflowExecutionInitiatedEventAttributes>,
    ),
    RequestCancelExternalWorkflowExecutionFailed(
        Box<RequestCancelExternalWorkflowExecutionFailedEventAttributes>,
    ),
    ExternalWorkflowExecutionCancelRequested(
        Box<ExternalWorkflowExecutionCancelRequestedEventAttributes>,
    ),
    MarkerRecorded(Box<MarkerRecordedEventAttributes>),
    WorkflowExecutionSignaled(Box<WorkflowExecutionSignaledEventAttributes>),
    WorkflowExecutionTerminated(Box<WorkflowExecutionTerminatedEventAttributes>),
    SignalExternalWorkflowExecutionInitiated(
        Box<SignalExternalWorkflowExecutionInitiatedEventAttributes>,
    ),
    SignalExternalWorkflowExecutionFailed(
        Box<SignalExternalWorkflowExecutionFailedEventAttributes>,
    ),
    ExternalWorkflowExecutionSignaled(Box<ExternalWorkflowExecutionSignaledEventAttributes>),
    StartChildWorkflowExecutionInitiated(
        Box<StartChildWorkflowExecutionInitiatedEventAttributes>,
    ),
    ChildWorkflowExecutionStarted(Box<ChildWorkflowExecutionStartedEventAttributes>),
    ChildWorkflowExecutionCompleted(Box<ChildWorkflowExecutionCompletedEventAttributes>),
    ChildWorkflowExecutionFailed(Box<ChildWorkflowExecutionFailedEventAttributes>),
    ChildWorkflowExecutionTimedOut(Box<ChildWorkflowExecutionTimedOutEventAttributes>),
    ChildWorkflowExecutionCanceled(Box<ChildWorkflowExecutionCanceledEventAttributes>),
    ChildWorkflowExecutionTerminated(Box<ChildWorkflowExecutionTerminatedEventAttributes>),
}

impl EventAttributes {
    /// The event type tag for this payload.
    pub fn event_type(&self) -> EventType {
        match self {
            EventAttributes::WorkflowExecutionStarted(_) => EventType::WorkflowExecutionStarted,
            EventAttributes::WorkflowExecutionCompleted(_) => EventType::WorkflowExecutionCompleted,
            EventAttributes::WorkflowExecutionFailed(_) => EventType::WorkflowExecutionFailed,
            EventAttributes::WorkflowExecutionTimedOut(_) => EventType::WorkflowExecutionTimedOut,
            EventAttributes::DecisionTaskScheduled(_) => EventType::DecisionTaskScheduled,
            EventAttributes::DecisionTaskStarted(_) => EventType::DecisionTaskStarted,
            EventAttributes::DecisionTaskCompleted(_) => EventType::DecisionTaskCompleted,
            EventAttributes::DecisionTaskTimedOut(_) => EventType::DecisionTaskTimedOut,
            EventAttributes::DecisionTaskFailed(_) => EventType::DecisionTaskFailed,
            EventAttributes::ActivityTaskScheduled(_) => EventType::ActivityTaskScheduled,
            EventAttributes::ActivityTaskStarted(_) => EventType::ActivityTaskStarted,
            EventAttributes::ActivityTaskCompleted(_) => EventType::ActivityTaskCompleted,
            EventAttributes::ActivityTaskFailed(_) => EventType::ActivityTaskFailed,
            EventAttributes::ActivityTaskTimedOut(_) => EventType::ActivityTaskTimedOut,
            EventAttributes::ActivityTaskCancelRequested(_) => {
                EventType::ActivityTaskCancelRequested
            }
            EventAttributes::ActivityTaskCanceled(_) => EventType::ActivityTaskCanceled,
            EventAttributes::TimerStarted(_) => EventType::TimerStarted,
            EventAttributes::TimerFired(_) => EventType::TimerFired,
            EventAttributes::TimerCanceled(_) => EventType::TimerCanceled,
            EventAttributes::WorkflowExecutionCancelRequested(_) => {
                EventType::WorkflowExecutionCancelRequested
            }
            EventAttributes::WorkflowExecutionCanceled(_) => EventType::WorkflowExecutionCanceled,
            EventAttributes::RequestCancelExternalWorkflowExecutionInitiated(_) => {
                EventType::RequestCancelExternalWorkflowExecutionInitiated
            }
            EventAttributes::RequestCancelExternalWorkflowExecutionFailed(_) => {
                EventType::RequestCancelExternalWorkflowExecutionFailed
            }
            EventAttributes::ExternalWorkflowExecutionCancelRequested(_) => {
                EventType::ExternalWorkflowExecutionCancelRequested
            }
            EventAttributes::MarkerRecorded(_) => EventType::MarkerRecorded,
            EventAttributes::WorkflowExecutionSignaled(_) => EventType::WorkflowExecutionSignaled,
            EventAttributes::WorkflowExecutionTerminated(_) => {
                EventType::WorkflowExecutionTerminated
            }
            EventAttributes::SignalExternalWorkflowExecutionInitiated(_) => {
                EventType::SignalExternalWorkflowExecutionInitiated
            }
            EventAttributes::SignalExternalWorkflowExecutionFailed(_) => {
                EventType::SignalExternalWorkflowExecutionFailed
            }
            EventAttributes::ExternalWorkflowExecutionSignaled(_) => {
                EventType::ExternalWorkflowExecutionSignaled
            }
            EventAttributes::StartChildWorkflowExecutionInitiated(_) => {
                EventType::StartChildWorkflowExecutionInitiated
            }
            EventAttributes::ChildWorkflowExecutionStarted(_) => {
                EventType::ChildWorkflowExecutionStarted
            }
            EventAttributes::ChildWorkflowExecutionCompleted(_) => {
                EventType::ChildWorkflowExecutionCompleted
            }
            EventAttributes::ChildWorkflowExecutionFailed(_) => {
                EventType::ChildWorkflowExecutionFailed
            }
            EventAttributes::ChildWorkflowExecutionTimedOut(_) => {
                EventType::ChildWorkflowExecutionTimedOut
            }
            EventAttributes::ChildWorkflowExecutionCanceled(_) => {
                EventType::ChildWorkflowExecutionCanceled
            }
            EventAttributes::ChildWorkflowExecutionTerminated(_) => {
                EventType::ChildWorkflowExecutionTerminated
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionStartedEventAttributes {
    pub workflow_type: Option<WorkflowType>,
    pub parent_workflow_execution: Option<WorkflowExecution>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub execution_start_to_close_timeout_seconds: i32,
    pub task_start_to_close_timeout_seconds: i32,
    pub identity: String,
    pub continued_execution_run_id: Option<String>,
    pub attempt: i32,
    pub cron_schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionCompletedEventAttributes {
    pub result: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionFailedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionTimedOutEventAttributes {
    pub timeout_type: TimeoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskScheduledEventAttributes {
    pub task_list: Option<TaskList>,
    pub start_to_close_timeout_seconds: i32,
    pub attempt: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskStartedEventAttributes {
    pub scheduled_event_id: i64,
    pub identity: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskCompletedEventAttributes {
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub identity: String,
    pub binary_checksum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskTimedOutEventAttributes {
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub timeout_type: TimeoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskFailedEventAttributes {
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub cause: Option<String>,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskScheduledEventAttributes {
    pub activity_id: String,
    pub activity_type: Option<ActivityType>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub schedule_to_close_timeout_seconds: Option<i32>,
    pub schedule_to_start_timeout_seconds: Option<i32>,
    pub start_to_close_timeout_seconds: Option<i32>,
    pub heartbeat_timeout_seconds: Option<i32>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskStartedEventAttributes {
    pub scheduled_event_id: i64,
    pub identity: String,
    pub request_id: String,
    pub attempt: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskCompletedEventAttributes {
    pub result: Option<Vec<u8>>,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskFailedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskTimedOutEventAttributes {
    pub details: Option<Vec<u8>>,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub timeout_type: TimeoutType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskCancelRequestedEventAttributes {
    pub activity_id: String,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTaskCanceledEventAttributes {
    pub details: Option<Vec<u8>>,
    pub latest_cancel_requested_event_id: i64,
    pub scheduled_event_id: i64,
    pub started_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerStartedEventAttributes {
    pub timer_id: String,
    pub start_to_fire_timeout_seconds: i64,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerFiredEventAttributes {
    pub timer_id: String,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerCanceledEventAttributes {
    pub timer_id: String,
    pub started_event_id: i64,
    pub decision_task_completed_event_id: i64,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionCancelRequestedEventAttributes {
    pub cause: Option<String>,
    pub external_initiated_event_id: Option<i64>,
    pub external_workflow_execution: Option<WorkflowExecution>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionCanceledEventAttributes {
    pub decision_task_completed_event_id: i64,
    pub details: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCancelExternalWorkflowExecutionInitiatedEventAttributes {
    pub decision_task_completed_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub control: Option<Vec<u8>>,
    pub child_workflow_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCancelExternalWorkflowExecutionFailedEventAttributes {
    pub cause: Option<String>,
    pub decision_task_completed_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub initiated_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalWorkflowExecutionCancelRequestedEventAttributes {
    pub initiated_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecordedEventAttributes {
    pub marker_name: String,
    pub details: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
    pub header: Option<Header>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionSignaledEventAttributes {
    pub signal_name: String,
    pub input: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecutionTerminatedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalExternalWorkflowExecutionInitiatedEventAttributes {
    pub decision_task_completed_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub signal_name: String,
    pub input: Option<Vec<u8>>,
    pub control: Option<Vec<u8>>,
    pub child_workflow_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalExternalWorkflowExecutionFailedEventAttributes {
    pub cause: Option<String>,
    pub decision_task_completed_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub initiated_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalWorkflowExecutionSignaledEventAttributes {
    pub initiated_event_id: i64,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub control: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartChildWorkflowExecutionInitiatedEventAttributes {
    pub domain: String,
    pub workflow_id: String,
    pub workflow_type: Option<WorkflowType>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub decision_task_completed_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionStartedEventAttributes {
    pub domain: String,
    pub initiated_event_id: i64,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionCompletedEventAttributes {
    pub result: Option<Vec<u8>>,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub initiated_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionFailedEventAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub initiated_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionTimedOutEventAttributes {
    pub timeout_type: TimeoutType,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub initiated_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionCanceledEventAttributes {
    pub details: Option<Vec<u8>>,
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub initiated_event_id: i64,
    pub started_event_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildWorkflowExecutionTerminatedEventAttributes {
    pub domain: String,
    pub workflow_execution: Option<WorkflowExecution>,
    pub workflow_type: Option<WorkflowType>,
    pub initiated_event_id: i64,
    pub started_event_id: i64,
}

/// Decision types emitted by a workflow task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum DecisionType {
    ScheduleActivityTask = 0,
    RequestCancelActivityTask = 1,
    StartTimer = 2,
    CompleteWorkflowExecution = 3,
    FailWorkflowExecution = 4,
    CancelTimer = 5,
    CancelWorkflowExecution = 6,
    RecordMarker = 8,
}

/// A decision produced by one workflow task execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub decision_type: DecisionType,
    pub attributes: DecisionAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecisionAttributes {
    ScheduleActivityTask(Box<ScheduleActivityTaskDecisionAttributes>),
    RequestCancelActivityTask(Box<RequestCancelActivityTaskDecisionAttributes>),
    StartTimer(Box<StartTimerDecisionAttributes>),
    CompleteWorkflowExecution(Box<CompleteWorkflowExecutionDecisionAttributes>),
    FailWorkflowExecution(Box<FailWorkflowExecutionDecisionAttributes>),
    CancelTimer(Box<CancelTimerDecisionAttributes>),
    CancelWorkflowExecution(Box<CancelWorkflowExecutionDecisionAttributes>),
    RecordMarker(Box<RecordMarkerDecisionAttributes>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActivityTaskDecisionAttributes {
    pub activity_id: String,
    pub activity_type: Option<ActivityType>,
    pub task_list: Option<TaskList>,
    pub input: Option<Vec<u8>>,
    pub schedule_to_close_timeout_seconds: Option<i32>,
    pub schedule_to_start_timeout_seconds: Option<i32>,
    pub start_to_close_timeout_seconds: Option<i32>,
    pub heartbeat_timeout_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCancelActivityTaskDecisionAttributes {
    pub activity_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartTimerDecisionAttributes {
    pub timer_id: String,
    pub start_to_fire_timeout_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteWorkflowExecutionDecisionAttributes {
    pub result: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailWorkflowExecutionDecisionAttributes {
    pub reason: Option<String>,
    pub details: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelTimerDecisionAttributes {
    pub timer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelWorkflowExecutionDecisionAttributes {
    pub details: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMarkerDecisionAttributes {
    pub marker_name: String,
    pub details: Option<Vec<u8>>,
    pub header: Option<Header>,
}

/// One page of a workflow execution's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub events: Vec<HistoryEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_follows_attributes_variant() {
        let event = HistoryEvent {
            event_id: 7,
            timestamp: 0,
            version: 1,
            task_id: 1,
            attributes: EventAttributes::TimerFired(Box::new(TimerFiredEventAttributes {
                timer_id: "1".to_string(),
                started_event_id: 3,
            })),
        };

        assert_eq!(event.event_type(), EventType::TimerFired);
        assert_eq!(event.event_type().to_string(), "TimerFired");
    }
}
