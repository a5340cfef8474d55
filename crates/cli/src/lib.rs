//! eKYC CLI - pipeline orchestrator
//!
//! This crate provides the `ekyc` binary and command orchestration.

pub mod commands;
pub mod context;

pub use context::{AppContext, EkycConfig};
