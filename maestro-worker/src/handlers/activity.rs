//! Activity task handler.

use crate::metadata::ActivityMetadata;
use crate::middleware::{MiddlewareChain, TaskDescriptor, TaskKind, TaskOutput};
use crate::registry::{Activity, ActivityContext, ExecutableLookup};
use crate::DynTaskService;
use futures::future::BoxFuture;
use maestro_core::{ExecutionError, MaestroError, MaestroResult};
use maestro_proto::task_service::*;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Processes one activity task: resolve the activity, execute it through
/// the middleware chain, and report the result (or the failure).
pub struct ActivityTaskHandler {
    service: Arc<DynTaskService>,
    lookup: Arc<ExecutableLookup<dyn Activity>>,
    chain: MiddlewareChain,
    domain: String,
    task_list: String,
    identity: String,
}

impl ActivityTaskHandler {
    pub fn new(
        service: Arc<DynTaskService>,
        lookup: Arc<ExecutableLookup<dyn Activity>>,
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

    /// Handle one polled activity task. Task-level failures are reported to
    /// the service and do not surface as errors; only transport failures of
    /// the report itself do.
    pub async fn handle(&self, task: PollForActivityTaskResponse) -> MaestroResult<()> {
        let activity_name = match task.activity_type.as_ref() {
            Some(activity_type) => activity_type.name.clone(),
            None => {
                warn!(domain = %self.domain, task_list = %self.task_list, "activity task without activity type");
                return self
                    .fail_task(
                        task.task_token,
                        "MalformedTask".to_string(),
                        Some(b"activity type missing from task".to_vec()),
                    )
                    .await;
            }
        };

        let activity = match self.lookup.find(&activity_name) {
            Ok(activity) => activity,
            Err(lookup_error) => {
                warn!(
                    activity_type = %activity_name,
                    domain = %self.domain,
                    task_list = %self.task_list,
                    "activity not registered"
                );
                return self
                    .fail_task(
                        task.task_token,
                        "ActivityNotRegistered".to_string(),
                        Some(lookup_error.to_string().into_bytes()),
                    )
                    .await;
            }
        };

        let metadata = ActivityMetadata::from_task(&self.domain, &task);
        let descriptor = TaskDescriptor {
            kind: TaskKind::Activity,
            domain: self.domain.clone(),
            task_list: self.task_list.clone(),
            name: activity_name.clone(),
            workflow_id: metadata.workflow_id.clone(),
            run_id: metadata.workflow_run_id.clone(),
            attempt: task.attempt,
        };

        let task_token = task.task_token;
        let input = task.input;
        let context = ActivityContext::new(metadata);

        // Spawned so a panicking activity is contained and reported as a
        // task failure rather than tearing down the poller.
        let terminal: BoxFuture<'_, MaestroResult<TaskOutput>> = Box::pin(async move {
            match tokio::spawn(activity.execute(context, input)).await {
                Ok(Ok(result)) => Ok(TaskOutput::Payload(result)),
                Ok(Err(execution_error)) => Err(execution_error.into()),
                Err(join_error) => Err(ExecutionError::panicked(join_error.to_string()).into()),
            }
        });

        match self.chain.run(&descriptor, terminal).await {
            Ok(TaskOutput::Payload(result)) => {
                info!(activity_type = %activity_name, "activity completed");
                self.service
                    .respond_activity_task_completed(RespondActivityTaskCompletedRequest {
                        task_token,
                        result,
                        identity: self.identity.clone(),
                    })
                    .await?;
                Ok(())
            }
            Ok(TaskOutput::Decisions(_)) => {
                error!(activity_type = %activity_name, "activity task produced decisions");
                self.fail_task(
                    task_token,
                    "MalformedTaskOutput".to_string(),
                    Some(b"activity task produced decisions".to_vec()),
                )
                .await
            }
            Err(task_error) => {
                error!(activity_type = %activity_name, error = %task_error, "activity failed");
                let (reason, details) = failure_reason(task_error);
                self.fail_task(task_token, reason, details).await
            }
        }
    }

    async fn fail_task(
        &self,
        task_token: Vec<u8>,
        reason: String,
        details: Option<Vec<u8>>,
    ) -> MaestroResult<()> {
        self.service
            .respond_activity_task_failed(RespondActivityTaskFailedRequest {
                task_token,
                reason: Some(reason),
                details,
                identity: self.identity.clone(),
            })
            .await?;
        Ok(())
    }
}

fn failure_reason(error: MaestroError) -> (String, Option<Vec<u8>>) {
    match error {
        MaestroError::Execution(execution_error) => {
            (execution_error.reason, execution_error.details)
        }
        other => ("TaskFailed".to_string(), Some(other.to_string().into_bytes())),
    }
}
