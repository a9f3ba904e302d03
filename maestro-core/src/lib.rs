//! Core types and utilities for the maestro client.
//!
//! This crate provides the error taxonomy and registration configuration
//! shared by the rest of the workspace.

pub mod config;
pub mod error;

pub use config::*;
pub use error::*;
