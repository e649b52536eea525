//! Replays a range of source commits through an external configuration
//! exporter, producing an export repository with one commit per replayed
//! source commit.

pub mod commands;
pub mod config;
pub mod error;
pub mod exporter;
pub mod git;
pub mod logging;
pub mod models;
pub mod process;
pub mod replay;

pub use error::{CommandError, ExportError, ExportResult};
