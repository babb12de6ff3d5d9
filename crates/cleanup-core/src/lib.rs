//! Decides which ephemeral CI-triggered deployments are safe to delete,
//! and deletes them. Three independent signals — deployment age, associated
//! pull-request state, and explicit exemption — are reconciled into a
//! single deletion decision per deployment; deletions run through the
//! external `rdu` CLI with per-item outcome tracking.

pub mod config;
pub mod delete;
pub mod error;
pub mod exec;
pub mod filter;
pub mod github;
pub mod helm;
pub mod infer;
pub mod kube;
pub mod reconcile;
pub mod record;
pub mod run;
pub mod summary;

pub use error::{CleanupError, Result};
