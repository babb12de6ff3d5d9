//! Metadata inference: deriving repository and pull-request associations
//! from namespace names. Absent values are a valid, common outcome — this
//! step never reports errors upward.

use crate::config::RepoMap;
use crate::record::Deployment;
use regex::Regex;
use tracing::info;

/// Anchored match: the pattern must match starting at the first byte of
/// `text`. The regex crate has no implicit anchoring, but leftmost-first
/// semantics guarantee that if any match starts at 0, `find` returns it.
pub fn matches_from_start(re: &Regex, text: &str) -> bool {
    re.find(text).is_some_and(|m| m.start() == 0)
}

/// Assign a repository to each record via the ordered pattern map.
/// First match wins; no match leaves `repo` unset.
pub fn assign_repos(records: &mut [Deployment], map: &RepoMap) {
    for dep in records.iter_mut() {
        dep.repo = map.repo_for(&dep.namespace).map(str::to_string);
    }
}

/// Take the segment after the last `-` in the namespace as the PR number,
/// when it parses as one. A non-numeric suffix is expected for namespaces
/// not tied to a PR and is logged at info level only.
pub fn assign_pr_numbers(records: &mut [Deployment]) {
    for dep in records.iter_mut() {
        let suffix = dep.namespace.rsplit('-').next().unwrap_or_default();
        match suffix.parse::<u64>() {
            Ok(number) => dep.pr_number = Some(number),
            Err(_) => {
                info!(
                    namespace = %dep.namespace,
                    "could not parse PR number from namespace, skipping PR assignment"
                );
                dep.pr_number = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
