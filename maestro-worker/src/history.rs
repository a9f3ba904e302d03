//! Normalized history event model.
//!
//! The server's raw log entries ([`maestro_proto::HistoryEvent`]) are
//! wrapped once per decision-processing pass into [`Event`], which exposes
//! the two derivations the replay engine depends on:
//!
//! - [`Event::decision_id`] — the id of the decision that logically caused
//!   this event. Completion-side events carry it in their attributes
//!   (scheduled/started/initiated event id, depending on type); origin and
//!   confirmation events correlate to themselves.
//! - [`Event::target_attributes`] — a normalized mapping used to match a
//!   scheduled action to its eventual completion by identifier. Events with
//!   no replay-matching role yield an empty mapping.
//!
//! Both derivations match exhaustively on the attribute union, so adding an
//! event type to the protocol surfaces every missing rule at compile time.

use chrono::{DateTime, Utc};
use maestro_proto::shared as proto;
use maestro_proto::shared::EventAttributes;
use serde_json::{Map, Value};

/// One normalized history event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: i64,
    timestamp: DateTime<Utc>,
    event_type: proto::EventType,
    attributes: EventAttributes,
}

impl Event {
    /// Wrap one raw log entry.
    pub fn new(raw: proto::HistoryEvent) -> Self {
        Self {
            id: raw.event_id,
            // TODO: carry the server's event time (raw.timestamp) instead of
            // stamping at wrap time, once replay consumers are confirmed not
            // to depend on the wrap-time value.
            timestamp: Utc::now(),
            event_type: raw.attributes.event_type(),
            attributes: raw.attributes,
        }
    }

    /// Monotonic event sequence number assigned by the server.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Time this wrapper was materialized, not the server's event time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn event_type(&self) -> proto::EventType {
        self.event_type
    }

    pub fn attributes(&self) -> &EventAttributes {
        &self.attributes
    }

    /// The id of the decision task whose outcome logically produced this
    /// event.
    ///
    /// Correlation is type-specific: the firing or completion of a
    /// previously scheduled operation points back at the id recorded in its
    /// own attributes, while events that themselves constitute the state
    /// change (including cancellation confirmations such as
    /// `TimerCanceled`) resolve to their own id.
    pub fn decision_id(&self) -> i64 {
        use EventAttributes as A;

        match &self.attributes {
            A::TimerFired(a) => a.started_event_id,

            A::ActivityTaskStarted(a) => a.scheduled_event_id,
            A::ActivityTaskCompleted(a) => a.scheduled_event_id,
            A::ActivityTaskFailed(a) => a.scheduled_event_id,
            A::ActivityTaskTimedOut(a) => a.scheduled_event_id,
            A::ActivityTaskCanceled(a) => a.scheduled_event_id,

            A::DecisionTaskStarted(a) => a.scheduled_event_id,
            A::DecisionTaskCompleted(a) => a.scheduled_event_id,
            A::DecisionTaskTimedOut(a) => a.scheduled_event_id,
            A::DecisionTaskFailed(a) => a.scheduled_event_id,

            A::ChildWorkflowExecutionStarted(a) => a.initiated_event_id,
            A::ChildWorkflowExecutionCompleted(a) => a.initiated_event_id,
            A::ChildWorkflowExecutionFailed(a) => a.initiated_event_id,
            A::ChildWorkflowExecutionTimedOut(a) => a.initiated_event_id,
            A::ChildWorkflowExecutionCanceled(a) => a.initiated_event_id,
            A::ChildWorkflowExecutionTerminated(a) => a.initiated_event_id,

            A::RequestCancelExternalWorkflowExecutionFailed(a) => a.initiated_event_id,
            A::ExternalWorkflowExecutionCancelRequested(a) => a.initiated_event_id,
            A::SignalExternalWorkflowExecutionFailed(a) => a.initiated_event_id,
            A::ExternalWorkflowExecutionSignaled(a) => a.initiated_event_id,

            A::WorkflowExecutionStarted(_)
            | A::WorkflowExecutionCompleted(_)
            | A::WorkflowExecutionFailed(_)
            | A::WorkflowExecutionTimedOut(_)
            | A::WorkflowExecutionCancelRequested(_)
            | A::WorkflowExecutionCanceled(_)
            | A::WorkflowExecutionSignaled(_)
            | A::WorkflowExecutionTerminated(_)
            | A::DecisionTaskScheduled(_)
            | A::ActivityTaskScheduled(_)
            | A::ActivityTaskCancelRequested(_)
            | A::TimerStarted(_)
            | A::TimerCanceled(_)
            | A::MarkerRecorded(_)
            | A::RequestCancelExternalWorkflowExecutionInitiated(_)
            | A::SignalExternalWorkflowExecutionInitiated(_)
            | A::StartChildWorkflowExecutionInitiated(_) => self.id,
        }
    }

    /// Normalized attributes used to match a scheduled action to its
    /// eventual completion event.
    ///
    /// Only events that schedule an asynchronous unit of work expose a
    /// mapping; everything else yields an empty one.
    pub fn target_attributes(&self) -> Map<String, Value> {
        use EventAttributes as A;

        match &self.attributes {
            A::ActivityTaskScheduled(a) => {
                let mut map = Map::new();
                map.insert("activity_id".to_string(), normalize_id(&a.activity_id));
                map.insert(
                    "activity_type".to_string(),
                    a.activity_type
                        .as_ref()
                        .map(|t| Value::String(t.name.clone()))
                        .unwrap_or(Value::Null),
                );
                map.insert("input".to_string(), decode_payload(a.input.as_deref()));
                map
            }
            A::TimerStarted(a) => {
                let mut map = Map::new();
                map.insert("timer_id".to_string(), normalize_id(&a.timer_id));
                map.insert(
                    "timeout_seconds".to_string(),
                    Value::from(a.start_to_fire_timeout_seconds),
                );
                map
            }
            A::StartChildWorkflowExecutionInitiated(a) => {
                let mut map = Map::new();
                map.insert(
                    "workflow_id".to_string(),
                    Value::String(a.workflow_id.clone()),
                );
                map.insert(
                    "workflow_type".to_string(),
                    a.workflow_type
                        .as_ref()
                        .map(|t| Value::String(t.name.clone()))
                        .unwrap_or(Value::Null),
                );
                map.insert("input".to_string(), decode_payload(a.input.as_deref()));
                map
            }
            A::SignalExternalWorkflowExecutionInitiated(a) => {
                let mut map = Map::new();
                map.insert(
                    "signal_name".to_string(),
                    Value::String(a.signal_name.clone()),
                );
                map.insert("input".to_string(), decode_payload(a.input.as_deref()));
                map
            }

            A::WorkflowExecutionStarted(_)
            | A::WorkflowExecutionCompleted(_)
            | A::WorkflowExecutionFailed(_)
            | A::WorkflowExecutionTimedOut(_)
            | A::WorkflowExecutionCancelRequested(_)
            | A::WorkflowExecutionCanceled(_)
            | A::WorkflowExecutionSignaled(_)
            | A::WorkflowExecutionTerminated(_)
            | A::DecisionTaskScheduled(_)
            | A::DecisionTaskStarted(_)
            | A::DecisionTaskCompleted(_)
            | A::DecisionTaskTimedOut(_)
            | A::DecisionTaskFailed(_)
            | A::ActivityTaskStarted(_)
            | A::ActivityTaskCompleted(_)
            | A::ActivityTaskFailed(_)
            | A::ActivityTaskTimedOut(_)
            | A::ActivityTaskCancelRequested(_)
            | A::ActivityTaskCanceled(_)
            | A::TimerFired(_)
            | A::TimerCanceled(_)
            | A::MarkerRecorded(_)
            | A::RequestCancelExternalWorkflowExecutionInitiated(_)
            | A::RequestCancelExternalWorkflowExecutionFailed(_)
            | A::ExternalWorkflowExecutionCancelRequested(_)
            | A::SignalExternalWorkflowExecutionFailed(_)
            | A::ExternalWorkflowExecutionSignaled(_)
            | A::ChildWorkflowExecutionStarted(_)
            | A::ChildWorkflowExecutionCompleted(_)
            | A::ChildWorkflowExecutionFailed(_)
            | A::ChildWorkflowExecutionTimedOut(_)
            | A::ChildWorkflowExecutionCanceled(_)
            | A::ChildWorkflowExecutionTerminated(_) => Map::new(),
        }
    }
}

/// Identifiers follow the platform convention of being the decimal string
/// of the scheduling event id; decimal ids normalize to numbers so replay
/// matching compares by value.
fn normalize_id(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

/// Payloads are JSON-encoded by the client convention; anything that does
/// not decode is treated as absent.
fn decode_payload(payload: Option<&[u8]>) -> Value {
    payload
        .and_then(|bytes| serde_json::from_slice(bytes).ok())
        .unwrap_or(Value::Null)
}

/// All normalized events of one history page, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    events: Vec<Event>,
}

impl History {
    pub fn new(raw: proto::History) -> Self {
        Self {
            events: raw.events.into_iter().map(Event::new).collect(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find_event_by_id(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|event| event.id() == id)
    }

    pub fn last_event(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_proto::shared::{
        ActivityTaskCompletedEventAttributes, ActivityTaskScheduledEventAttributes, ActivityType,
        ChildWorkflowExecutionCompletedEventAttributes, DecisionTaskScheduledEventAttributes,
        EventType, TaskList, TimerCanceledEventAttributes, TimerFiredEventAttributes,
        TimerStartedEventAttributes, WorkflowExecutionStartedEventAttributes, WorkflowType,
    };
    use serde_json::json;

    fn raw_event(event_id: i64, attributes: EventAttributes) -> proto::HistoryEvent {
        proto::HistoryEvent {
            event_id,
            timestamp: 1_500_000_000_000_000_000,
            version: 1,
            task_id: 100,
            attributes,
        }
    }

    #[test]
    fn wraps_id_type_and_attributes() {
        let event = Event::new(raw_event(
            1,
            EventAttributes::WorkflowExecutionStarted(Box::new(
                WorkflowExecutionStartedEventAttributes {
                    workflow_type: Some(WorkflowType {
                        name: "TestWorkflow".to_string(),
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
        ));

        assert_eq!(event.id(), 1);
        assert_eq!(event.event_type(), EventType::WorkflowExecutionStarted);
        assert_eq!(event.event_type().to_string(), "WorkflowExecutionStarted");
    }

    #[test]
    fn timestamp_is_materialized_at_wrap_time() {
        let before = Utc::now();
        let event = Event::new(raw_event(
            1,
            EventAttributes::DecisionTaskScheduled(Box::new(
                DecisionTaskScheduledEventAttributes {
                    task_list: None,
                    start_to_close_timeout_seconds: 10,
                    attempt: 0,
                },
            )),
        ));
        let after = Utc::now();

        assert!(event.timestamp() >= before);
        assert!(event.timestamp() <= after);
    }

    #[test]
    fn timer_fired_correlates_to_its_started_event() {
        let event = Event::new(raw_event(
            42,
            EventAttributes::TimerFired(Box::new(TimerFiredEventAttributes {
                timer_id: "7".to_string(),
                started_event_id: 7,
            })),
        ));

        assert_eq!(event.decision_id(), 7);
    }

    #[test]
    fn timer_canceled_correlates_to_itself() {
        let event = Event::new(raw_event(
            42,
            EventAttributes::TimerCanceled(Box::new(TimerCanceledEventAttributes {
                timer_id: "7".to_string(),
                started_event_id: 7,
                decision_task_completed_event_id: 40,
                identity: "test".to_string(),
            })),
        ));

        assert_eq!(event.decision_id(), 42);
    }

    #[test]
    fn activity_completion_correlates_to_its_scheduled_event() {
        let event = Event::new(raw_event(
            12,
            EventAttributes::ActivityTaskCompleted(Box::new(
                ActivityTaskCompletedEventAttributes {
                    result: None,
                    scheduled_event_id: 9,
                    started_event_id: 11,
                    identity: "test".to_string(),
                },
            )),
        ));

        assert_eq!(event.decision_id(), 9);
    }

    #[test]
    fn child_workflow_completion_correlates_to_its_initiated_event() {
        let event = Event::new(raw_event(
            20,
            EventAttributes::ChildWorkflowExecutionCompleted(Box::new(
                ChildWorkflowExecutionCompletedEventAttributes {
                    result: None,
                    domain: "default".to_string(),
                    workflow_execution: None,
                    workflow_type: None,
                    initiated_event_id: 15,
                    started_event_id: 17,
                },
            )),
        ));

        assert_eq!(event.decision_id(), 15);
    }

    #[test]
    fn activity_task_scheduled_exposes_target_attributes() {
        let input = json!(["foo", "bar", { "foo": "bar" }]);
        let event = Event::new(raw_event(
            42,
            EventAttributes::ActivityTaskScheduled(Box::new(
                ActivityTaskScheduledEventAttributes {
                    activity_id: "42".to_string(),
                    activity_type: Some(ActivityType {
                        name: "TestActivity".to_string(),
                    }),
                    task_list: Some(TaskList::normal("default")),
                    input: Some(serde_json::to_vec(&input).unwrap()),
                    schedule_to_close_timeout_seconds: None,
                    schedule_to_start_timeout_seconds: None,
                    start_to_close_timeout_seconds: None,
                    heartbeat_timeout_seconds: None,
                    decision_task_completed_event_id: 40,
                },
            )),
        ));

        let expected = json!({
            "activity_id": 42,
            "activity_type": "TestActivity",
            "input": ["foo", "bar", { "foo": "bar" }],
        });
        assert_eq!(Value::Object(event.target_attributes()), expected);
    }

    #[test]
    fn decision_task_scheduled_has_no_target_attributes() {
        let event = Event::new(raw_event(
            42,
            EventAttributes::DecisionTaskScheduled(Box::new(
                DecisionTaskScheduledEventAttributes {
                    task_list: None,
                    start_to_close_timeout_seconds: 10,
                    attempt: 0,
                },
            )),
        ));

        assert!(event.target_attributes().is_empty());
    }

    #[test]
    fn timer_started_exposes_timer_target_attributes() {
        let event = Event::new(raw_event(
            8,
            EventAttributes::TimerStarted(Box::new(TimerStartedEventAttributes {
                timer_id: "8".to_string(),
                start_to_fire_timeout_seconds: 30,
                decision_task_completed_event_id: 5,
            })),
        ));

        let expected = json!({ "timer_id": 8, "timeout_seconds": 30 });
        assert_eq!(Value::Object(event.target_attributes()), expected);
    }

    #[test]
    fn history_preserves_order_and_finds_by_id() {
        let history = History::new(proto::History {
            events: vec![
                raw_event(
                    1,
                    EventAttributes::DecisionTaskScheduled(Box::new(
                        DecisionTaskScheduledEventAttributes {
                            task_list: None,
                            start_to_close_timeout_seconds: 10,
                            attempt: 0,
                        },
                    )),
                ),
                raw_event(
                    2,
                    EventAttributes::TimerFired(Box::new(TimerFiredEventAttributes {
                        timer_id: "1".to_string(),
                        started_event_id: 1,
                    })),
                ),
            ],
        });

        assert_eq!(history.len(), 2);
        assert_eq!(history.events()[0].id(), 1);
        assert_eq!(history.find_event_by_id(2).map(|e| e.id()), Some(2));
        assert!(history.find_event_by_id(3).is_none());
    }
}
