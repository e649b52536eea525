//! Git operations for the source and output repositories
//!
//! This module provides:
//! - Construction of git command descriptors
//! - A repository handle exposing history queries, detached checkout,
//!   index and commit operations, notes and force-push

pub mod repo;
pub mod runner;

pub use repo::{CommitOptions, GitRepo};
pub use runner::{git, git_with_config};
