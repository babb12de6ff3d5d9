//! Single-pass orchestration: list, infer, reconcile, delete, summarize.
//!
//! Strictly sequential: deployments are inventoried once, filtered
//! synchronously, and deleted one at a time in reconciled-list order.

use chrono::Local;
use tracing::{debug, info};

use crate::config::Config;
use crate::delete::DeletionExecutor;
use crate::error::Result;
use crate::filter::{ExemptionSource, PrStateSource};
use crate::helm::InventorySource;
use crate::infer;
use crate::reconcile;
use crate::summary::{DeletionFailure, RunSummary};

pub fn run_cleanup(
    config: &Config,
    inventory: &dyn InventorySource,
    pr_source: &dyn PrStateSource,
    exemption_source: &dyn ExemptionSource,
    executor: &dyn DeletionExecutor,
    exclude: &[String],
) -> Result<RunSummary> {
    if config.dry_run {
        info!("DRY RUN MODE: no actual deletions will be performed");
    }

    let mut deployments = inventory.list(config)?;
    debug!(count = deployments.len(), "found CI deployments");

    deployments = reconcile::apply_exclusions(deployments, exclude);
    infer::assign_repos(&mut deployments, &config.repo_map);
    infer::assign_pr_numbers(&mut deployments);

    let now = Local::now().naive_local();
    let candidates = reconcile::reconcile(
        &mut deployments,
        config.max_age_hours,
        now,
        pr_source,
        exemption_source,
    );

    info!(count = candidates.len(), "total CI deployments to delete");
    for dep in &candidates {
        debug!(
            name = %dep.name,
            namespace = %dep.namespace,
            updated = %dep.updated,
            repo = ?dep.repo,
            pr_number = ?dep.pr_number,
            pr_is_open = ?dep.pr_is_open,
            "deletion candidate"
        );
    }

    let mut summary = RunSummary::new(candidates.len());
    for dep in &candidates {
        let out = executor.delete(dep, config.dry_run);
        if out.success() {
            summary.record_success(dep.namespace.clone());
        } else {
            summary.record_failure(DeletionFailure {
                namespace: dep.namespace.clone(),
                code: out.code,
                stderr: out.stderr.clone(),
            });
        }
    }
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
