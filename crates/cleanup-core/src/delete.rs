//! Deletion of one candidate deployment through the `rdu` CLI.

use std::time::Duration;

use tracing::{error, info};

use crate::exec::{self, ExecOutput};
use crate::record::Deployment;

pub const DELETE_TIMEOUT: Duration = Duration::from_secs(900);
const DELETE_TOOL: &str = "rdu";

pub trait DeletionExecutor {
    fn delete(&self, deployment: &Deployment, dry_run: bool) -> ExecOutput;
}

pub struct RduRemover;

impl DeletionExecutor for RduRemover {
    fn delete(&self, deployment: &Deployment, dry_run: bool) -> ExecOutput {
        let namespace = deployment.namespace.as_str();
        let args = [
            "cleanup-deployment",
            "--namespace",
            namespace,
            "--delete-namespace",
            "--yes",
        ];

        if dry_run {
            info!(
                namespace = %namespace,
                command = %format!("{DELETE_TOOL} {}", args.join(" ")),
                "[dry run] would delete namespace"
            );
            return ExecOutput {
                stdout: "Dry run enabled. No action taken.".to_string(),
                stderr: String::new(),
                code: 0,
            };
        }

        info!(namespace = %namespace, "deleting namespace");
        let out = exec::run(DELETE_TOOL, &args, DELETE_TIMEOUT);
        if out.success() {
            info!(namespace = %namespace, "successfully deleted namespace");
        } else {
            error!(
                namespace = %namespace,
                code = out.code,
                stderr = %out.stderr.trim(),
                "failed to delete namespace"
            );
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
