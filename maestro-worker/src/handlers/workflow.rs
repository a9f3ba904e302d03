//! Workflow (decision) task handler.

use crate::history::History;
use crate::metadata::DecisionMetadata;
use crate::middleware::{MiddlewareChain, TaskDescriptor, TaskKind, TaskOutput};
use crate::registry::{ExecutableLookup, Workflow, WorkflowTask};
use crate::DynTaskService;
use futures::future::BoxFuture;
use maestro_core::{ExecutionError, MaestroResult};
use maestro_proto::shared as proto;
use maestro_proto::task_service::*;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Processes one decision task: resolve the workflow, replay it through the
/// middleware chain, and report the produced decisions (or the failure).
pub struct WorkflowTaskHandler {
    service: Arc<DynTaskService>,
    lookup: Arc<ExecutableLookup<dyn Workflow>>,
    chain: MiddlewareChain,
    domain: String,
    task_list: String,
    identity: String,
}

impl WorkflowTaskHandler {
    pub fn new(
        service: Arc<DynTaskService>,
        lookup: Arc<ExecutableLookup<dyn Workflow>>,
        chain: MiddlewareChain,
        domain: impl Into<String>,
        task_list: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            service,
            lookup,
            chain,
            domain: domain.into(),
            task_list: task_list.into(),
            identity: identity.into(),
        }
    }

    /// Handle one polled decision task. Task-level failures are reported to
    /// the service and do not surface as errors; only transport failures of
    /// the report itself do.
    pub async fn handle(&self, task: PollForDecisionTaskResponse) -> MaestroResult<()> {
        let workflow_name = match task.workflow_type.as_ref() {
            Some(workflow_type) => workflow_type.name.clone(),
            None => {
                warn!(domain = %self.domain, task_list = %self.task_list, "decision task without workflow type");
                return self
                    .fail_task(task.task_token, b"workflow type missing from task".to_vec())
                    .await;
            }
        };

        let workflow = match self.lookup.find(&workflow_name) {
            Ok(workflow) => workflow,
            Err(lookup_error) => {
                warn!(
                    workflow_type = %workflow_name,
                    domain = %self.domain,
                    task_list = %self.task_list,
                    "workflow not registered"
                );
                return self
                    .fail_task(task.task_token, lookup_error.to_string().into_bytes())
                    .await;
            }
        };

        let metadata = DecisionMetadata::from_task(&self.domain, &task);
        let descriptor = TaskDescriptor {
            kind: TaskKind::Workflow,
            domain: self.domain.clone(),
            task_list: self.task_list.clone(),
            name: workflow_name.clone(),
            workflow_id: metadata.workflow_id.clone(),
            run_id: metadata.workflow_run_id.clone(),
            attempt: task.attempt,
        };

        let PollForDecisionTaskResponse {
            task_token,
            workflow_execution,
            previous_started_event_id,
            started_event_id,
            attempt,
            history,
            ..
        } = task;

        let workflow_task = WorkflowTask {
            workflow_name: workflow_name.clone(),
            execution: workflow_execution,
            task_token: task_token.clone(),
            attempt,
            previous_started_event_id,
            started_event_id,
            history: History::new(history.unwrap_or(proto::History { events: Vec::new() })),
            metadata,
        };

        // Spawned so a panicking workflow is contained and reported as a
        // task failure rather than tearing down the poller.
        let terminal: BoxFuture<'_, MaestroResult<TaskOutput>> = Box::pin(async move {
            match tokio::spawn(workflow.execute(workflow_task)).await {
                Ok(Ok(decisions)) => Ok(TaskOutput::Decisions(decisions)),
                Ok(Err(execution_error)) => Err(execution_error.into()),
                Err(join_error) => Err(ExecutionError::panicked(join_error.to_string()).into()),
            }
        });

        match self.chain.run(&descriptor, terminal).await {
            Ok(TaskOutput::Decisions(decisions)) => {
                info!(
                    workflow_type = %workflow_name,
                    decision_count = decisions.len(),
                    "responding with decisions"
                );
                self.service
                    .respond_decision_task_completed(RespondDecisionTaskCompletedRequest {
                        task_token,
                        decisions,
                        execution_context: None,
                        identity: self.identity.clone(),
                        binary_checksum: String::new(),
                    })
                    .await?;
                Ok(())
            }
            Ok(TaskOutput::Payload(_)) => {
                error!(workflow_type = %workflow_name, "workflow task produced an activity payload");
                self.fail_task(
                    task_token,
                    b"workflow task produced an activity payload".to_vec(),
                )
                .await
            }
            Err(task_error) => {
                error!(workflow_type = %workflow_name, error = %task_error, "workflow task failed");
                self.fail_task(task_token, task_error.to_string().into_bytes())
                    .await
            }
        }
    }

    async fn fail_task(&self, task_token: Vec<u8>, details: Vec<u8>) -> MaestroResult<()> {
        self.service
            .respond_decision_task_failed(RespondDecisionTaskFailedRequest {
                task_token,
                cause: DecisionTaskFailedCause::WorkflowWorkerUnhandledFailure,
                details: Some(details),
                identity: self.identity.clone(),
                binary_checksum: String::new(),
            })
            .await?;
        Ok(())
    }
}
