//! The three deletion signals: age, pull-request state, and exemption.
//!
//! The PR-state and exemption filters consult external collaborators and
//! are fail-closed: a lookup error defaults to the non-destructive outcome
//! (PR assumed open, namespace assumed exempt) rather than aborting the run.

use crate::record::Deployment;
use chrono::{Duration, NaiveDateTime};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Outcome of a fail-closed external lookup. `Defaulted` carries the reason
/// the safe value was assumed, so tests and logs can tell a confirmed
/// verdict apart from one substituted after an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Confirmed(T),
    Defaulted { value: T, reason: String },
}

impl<T: Copy> Lookup<T> {
    pub fn value(&self) -> T {
        match self {
            Lookup::Confirmed(v) => *v,
            Lookup::Defaulted { value, .. } => *value,
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    Open,
    Closed,
}

pub trait PrStateSource {
    fn pr_state(&self, repo: &str, number: u64) -> crate::Result<PrState>;
}

pub trait ExemptionSource {
    fn is_exempt(&self, namespace: &str) -> crate::Result<bool>;
}

// ---------------------------------------------------------------------------
// Age filter
// ---------------------------------------------------------------------------

/// Records last updated strictly before `now − max_age_hours`. A record
/// updated exactly at the threshold is not selected.
pub fn filter_by_age(
    records: &[Deployment],
    max_age_hours: i64,
    now: NaiveDateTime,
) -> Vec<Deployment> {
    let threshold = now - Duration::hours(max_age_hours);
    records
        .iter()
        .filter(|dep| dep.updated < threshold)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// PR-state filter
// ---------------------------------------------------------------------------

/// Records whose associated pull request is closed, plus all records that
/// have no PR association (those are judged by the other filters instead).
///
/// Annotates `pr_is_open` in place on every record it evaluates. A failed
/// lookup treats the PR as open: do not delete on uncertainty.
pub fn filter_by_closed_prs(
    records: &mut [Deployment],
    source: &dyn PrStateSource,
) -> Vec<Deployment> {
    let mut included = Vec::new();
    for dep in records.iter_mut() {
        let (Some(repo), Some(number)) = (dep.repo.clone(), dep.pr_number) else {
            included.push(dep.clone());
            continue;
        };
        let state = match source.pr_state(&repo, number) {
            Ok(state) => Lookup::Confirmed(state),
            Err(e) => {
                warn!(
                    namespace = %dep.namespace,
                    repo = %repo,
                    number,
                    error = %e,
                    "PR state lookup failed, treating PR as open"
                );
                Lookup::Defaulted {
                    value: PrState::Open,
                    reason: e.to_string(),
                }
            }
        };
        match state.value() {
            PrState::Open => dep.pr_is_open = Some(true),
            PrState::Closed => {
                dep.pr_is_open = Some(false);
                included.push(dep.clone());
            }
        }
    }
    included
}

// ---------------------------------------------------------------------------
// Exemption filter
// ---------------------------------------------------------------------------

/// Drop records whose namespace is marked exempt. Runs last and is the
/// final authority: it can veto any candidate regardless of why it
/// qualified. A failed lookup treats the namespace as exempt.
pub fn filter_exempt(
    records: Vec<Deployment>,
    source: &dyn ExemptionSource,
) -> Vec<Deployment> {
    let mut kept = Vec::new();
    for dep in records {
        let exempt = match source.is_exempt(&dep.namespace) {
            Ok(value) => Lookup::Confirmed(value),
            Err(e) => {
                warn!(
                    namespace = %dep.namespace,
                    error = %e,
                    "exemption lookup failed, treating namespace as exempt"
                );
                Lookup::Defaulted {
                    value: true,
                    reason: e.to_string(),
                }
            }
        };
        if exempt.value() {
            info!(namespace = %dep.namespace, "skipping exempt namespace");
        } else {
            kept.push(dep);
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanupError;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn deployment(namespace: &str, updated: NaiveDateTime) -> Deployment {
        Deployment::new("release", namespace, 1, updated, "deployed", "chart", "1.0")
    }

    struct FixedPrState(PrState);

    impl PrStateSource for FixedPrState {
        fn pr_state(&self, _repo: &str, _number: u64) -> crate::Result<PrState> {
            Ok(self.0)
        }
    }

    struct FailingPrState;

    impl PrStateSource for FailingPrState {
        fn pr_state(&self, repo: &str, number: u64) -> crate::Result<PrState> {
            Err(CleanupError::PrLookup {
                repo: repo.to_string(),
                number,
                status: 502,
            })
        }
    }

    struct NoExemptions;

    impl ExemptionSource for NoExemptions {
        fn is_exempt(&self, _namespace: &str) -> crate::Result<bool> {
            Ok(false)
        }
    }

    struct FailingExemptions;

    impl ExemptionSource for FailingExemptions {
        fn is_exempt(&self, namespace: &str) -> crate::Result<bool> {
            Err(CleanupError::Namespace {
                namespace: namespace.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn age_filter_is_strict() {
        let now = at(12);
        let records = vec![
            deployment("exactly-at-threshold", at(10)),
            deployment("older", at(9)),
            deployment("newer", at(11)),
        ];
        let old = filter_by_age(&records, 2, now);
        assert_eq!(old.len(), 1);
        assert_eq!(old[0].namespace, "older");
    }

    #[test]
    fn closed_pr_included_and_annotated() {
        let mut dep = deployment("ci-42-7", at(0));
        dep.repo = Some("org/repo".to_string());
        dep.pr_number = Some(7);
        let mut records = vec![dep];
        let included = filter_by_closed_prs(&mut records, &FixedPrState(PrState::Closed));
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].pr_is_open, Some(false));
        assert_eq!(records[0].pr_is_open, Some(false));
    }

    #[test]
    fn open_pr_excluded_and_annotated() {
        let mut dep = deployment("ci-42-7", at(0));
        dep.repo = Some("org/repo".to_string());
        dep.pr_number = Some(7);
        let mut records = vec![dep];
        let included = filter_by_closed_prs(&mut records, &FixedPrState(PrState::Open));
        assert!(included.is_empty());
        assert_eq!(records[0].pr_is_open, Some(true));
    }

    #[test]
    fn record_without_pr_association_always_included() {
        let mut records = vec![deployment("staging", at(0))];
        let included = filter_by_closed_prs(&mut records, &FailingPrState);
        assert_eq!(included.len(), 1);
        // never evaluated, so the tri-state stays unknown
        assert_eq!(records[0].pr_is_open, None);
    }

    #[test]
    fn pr_lookup_failure_fails_closed_to_open() {
        let mut dep = deployment("ci-42-7", at(0));
        dep.repo = Some("org/repo".to_string());
        dep.pr_number = Some(7);
        let mut records = vec![dep];
        let included = filter_by_closed_prs(&mut records, &FailingPrState);
        assert!(included.is_empty());
        assert_eq!(records[0].pr_is_open, Some(true));
    }

    #[test]
    fn exemption_filter_drops_exempt_namespaces() {
        struct OneExempt;
        impl ExemptionSource for OneExempt {
            fn is_exempt(&self, namespace: &str) -> crate::Result<bool> {
                Ok(namespace == "keep-me")
            }
        }
        let records = vec![deployment("keep-me", at(0)), deployment("ci-1", at(0))];
        let kept = filter_exempt(records, &OneExempt);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].namespace, "ci-1");
    }

    #[test]
    fn exemption_lookup_failure_fails_closed_to_exempt() {
        let records = vec![deployment("ci-1", at(0))];
        let kept = filter_exempt(records, &FailingExemptions);
        assert!(kept.is_empty());
    }

    #[test]
    fn nothing_exempt_keeps_all() {
        let records = vec![deployment("ci-1", at(0)), deployment("ci-2", at(0))];
        let kept = filter_exempt(records, &NoExemptions);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn lookup_distinguishes_confirmed_from_defaulted() {
        let confirmed = Lookup::Confirmed(true);
        let defaulted = Lookup::Defaulted {
            value: true,
            reason: "timeout".to_string(),
        };
        assert_eq!(confirmed.value(), defaulted.value());
        assert_ne!(confirmed, defaulted);
    }
}
