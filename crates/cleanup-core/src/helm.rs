//! Inventory listing via `helm list`.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::warn;

use crate::config::Config;
use crate::error::{CleanupError, Result};
use crate::exec;
use crate::infer::matches_from_start;
use crate::record::Deployment;

const HELM_TIMEOUT: Duration = Duration::from_secs(120);

pub trait InventorySource {
    fn list(&self, config: &Config) -> Result<Vec<Deployment>>;
}

/// One row of `helm list --output json`. Helm emits `revision` as a string.
#[derive(Debug, Deserialize)]
struct HelmRelease {
    name: String,
    namespace: String,
    revision: String,
    updated: String,
    status: String,
    chart: String,
    app_version: String,
}

pub struct HelmCli;

impl InventorySource for HelmCli {
    fn list(&self, config: &Config) -> Result<Vec<Deployment>> {
        let out = exec::run(
            "helm",
            &["list", "--all-namespaces", "--output", "json"],
            HELM_TIMEOUT,
        );
        if !out.success() {
            return Err(CleanupError::Inventory(format!(
                "helm list exited with code {}: {}",
                out.code,
                out.stderr.trim()
            )));
        }
        if out.stdout.trim().is_empty() {
            return Err(CleanupError::Inventory(format!(
                "helm list returned empty output, stderr: {}",
                out.stderr.trim()
            )));
        }
        let releases: Vec<HelmRelease> = serde_json::from_str(&out.stdout)?;
        Ok(build_deployments(releases, config))
    }
}

/// Keep only releases whose namespace matches at least one configured
/// pattern, and convert them to records. Rows with an unparseable update
/// timestamp are skipped with a warning rather than failing the listing.
fn build_deployments(releases: Vec<HelmRelease>, config: &Config) -> Vec<Deployment> {
    let mut deployments = Vec::new();
    for release in releases {
        let considered = config
            .namespace_patterns
            .iter()
            .any(|re| matches_from_start(re, &release.namespace));
        if !considered {
            continue;
        }
        let Some(updated) = parse_updated(&release.updated) else {
            warn!(
                namespace = %release.namespace,
                updated = %release.updated,
                "unparseable update timestamp, skipping release"
            );
            continue;
        };
        deployments.push(Deployment::new(
            release.name,
            release.namespace,
            release.revision.parse().unwrap_or(0),
            updated,
            release.status,
            release.chart,
            release.app_version,
        ));
    }
    deployments
}

/// Helm's `updated` field carries sub-second precision and a timezone
/// suffix; only the first 19 characters (seconds precision, naive local
/// time) are significant for age comparison.
fn parse_updated(raw: &str) -> Option<NaiveDateTime> {
    let head: String = raw.chars().take(19).collect();
    NaiveDateTime::parse_from_str(&head, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&head, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
