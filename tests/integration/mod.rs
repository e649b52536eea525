//! Integration tests for the export-replay pipeline
//!
//! These tests run the pipeline end to end against real git repositories with
//! a shell script standing in for the exporter.

pub mod helpers;
pub mod publish;
pub mod replay_flow;
