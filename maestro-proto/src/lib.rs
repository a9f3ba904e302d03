//! Protocol types for the maestro orchestration client.
//!
//! This crate holds the client's view of the externally versioned wire
//! schema: workflow history events, decisions, and the request/response
//! messages of the task service boundary. The transport itself (gRPC/Thrift
//! stubs) lives outside this workspace; everything here is plain data plus
//! the `TaskService` trait the worker calls through.

pub mod shared;
pub mod task_service;

pub use shared::*;
