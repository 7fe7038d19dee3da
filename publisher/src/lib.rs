//! swagger-ui SCSS publisher library.
//!
//! This crate stages the stylesheet sources of the newest swagger-ui release
//! as a standalone npm package. It is used by the `swagger-ui-scss-publisher`
//! CLI binary and can be driven programmatically for testing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Fixed package identities and derived paths
//! - [`deps`] - External command execution and dependency installation
//! - [`error`] - Semantic error types
//! - [`gate`] - Publish decision from upstream and registry versions
//! - [`git`] - Remote tag listing, scratch preparation and shallow cloning
//! - [`manifest`] - Staged `package.json` synthesis
//! - [`pipeline`] - Stage orchestration
//! - [`prune`] - Filtered recursive copy of the plugin stylesheets
//! - [`registry`] - npm registry version lookup
//! - [`stager`] - Assembly of the staged package directory
//! - [`status`] - Operator-facing progress reporting
//! - [`tags`] - Release tag filtering and selection

pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod gate;
pub mod git;
pub mod manifest;
pub mod pipeline;
pub mod prune;
pub mod registry;
pub mod stager;
pub mod status;
pub mod tags;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
