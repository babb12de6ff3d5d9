//! The decision core: turning the raw record list into a reconciled,
//! deduplicated, exemption-filtered deletion set.

use crate::filter::{self, ExemptionSource, PrStateSource};
use crate::record::Deployment;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Manual override, independent of exemption annotations: drop records
/// whose release name is on the explicit exclude list.
pub fn apply_exclusions(records: Vec<Deployment>, exclude: &[String]) -> Vec<Deployment> {
    if exclude.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|dep| !exclude.iter().any(|name| name == &dep.name))
        .collect()
}

/// Compute the final deletion candidates.
///
/// The age and PR-closed filters are both evaluated against the *full*
/// record set, then unioned: either signal qualifies a record on its own.
/// A record with an open PR that is also past the age threshold still
/// qualifies via the age path; a fresh record with a closed PR qualifies
/// via the PR path alone. The union is deduplicated by namespace identity
/// (age-path entries first, insertion order preserved), and the exemption
/// filter gets the last word.
pub fn reconcile(
    records: &mut [Deployment],
    max_age_hours: i64,
    now: NaiveDateTime,
    pr_source: &dyn PrStateSource,
    exemption_source: &dyn ExemptionSource,
) -> Vec<Deployment> {
    let old: Vec<String> = filter::filter_by_age(records, max_age_hours, now)
        .into_iter()
        .map(|dep| dep.namespace)
        .collect();
    let closed_pr: Vec<String> = filter::filter_by_closed_prs(records, pr_source)
        .into_iter()
        .map(|dep| dep.namespace)
        .collect();

    // Identity-keyed dedup: the records were annotated in place above, so
    // the union is rebuilt from the live records rather than from clones
    // taken before the PR filter ran.
    let mut seen: HashSet<String> = HashSet::new();
    let mut union = Vec::new();
    for namespace in old.into_iter().chain(closed_pr) {
        if seen.insert(namespace.clone()) {
            if let Some(dep) = records.iter().find(|d| d.namespace == namespace) {
                union.push(dep.clone());
            }
        }
    }

    filter::filter_exempt(union, exemption_source)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
