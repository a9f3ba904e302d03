//! Maestro worker implementation.
//!
//! This crate provides the execution core of the client: the worker that
//! hosts workflow and activity implementations, the per-(domain, task list)
//! executable lookups and pollers, the middleware chain wrapping every task
//! execution, and the normalized history event model consumed during
//! workflow replay.

pub mod handlers;
pub mod history;
pub mod metadata;
pub mod middleware;
pub mod pollers;
pub mod registry;
pub mod worker;

pub use middleware::*;
pub use pollers::{Poller, PollerKind, PollerOptions};
pub use registry::*;
pub use worker::*;

use maestro_core::TransportError;
use maestro_proto::task_service::TaskService;

/// The task service as the worker consumes it: a shared trait object whose
/// transport failures surface as [`TransportError`].
pub type DynTaskService = dyn TaskService<Error = TransportError> + Send + Sync;
