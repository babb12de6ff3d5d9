use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// One live CI-triggered deployment, built fresh from the inventory listing
/// on every run and discarded at the end of it.
///
/// `namespace` is the natural key: two records are equal iff their
/// namespaces are equal, and all dedup and reporting is keyed on it.
/// The `repo` / `pr_number` / `pr_is_open` fields start out empty and are
/// filled in place by metadata inference and the PR-state filter.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    pub revision: u32,
    pub updated: NaiveDateTime,
    pub status: String,
    pub chart: String,
    pub app_version: String,
    pub repo: Option<String>,
    pub pr_number: Option<u64>,
    pub pr_is_open: Option<bool>,
}

impl Deployment {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        revision: u32,
        updated: NaiveDateTime,
        status: impl Into<String>,
        chart: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            revision,
            updated,
            status: status.into(),
            chart: chart.into(),
            app_version: app_version.into(),
            repo: None,
            pr_number: None,
            pr_is_open: None,
        }
    }
}

impl PartialEq for Deployment {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
    }
}

impl Eq for Deployment {}

impl std::hash::Hash for Deployment {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn equality_is_by_namespace_only() {
        let a = Deployment::new("renku-a", "ci-1", 1, at(2024, 1, 1), "deployed", "renku-0.1", "1.0");
        let mut b = Deployment::new("renku-b", "ci-1", 9, at(2025, 6, 1), "failed", "renku-0.2", "2.0");
        b.repo = Some("org/repo".to_string());
        assert_eq!(a, b);

        let c = Deployment::new("renku-a", "ci-2", 1, at(2024, 1, 1), "deployed", "renku-0.1", "1.0");
        assert_ne!(a, c);
    }

    #[test]
    fn derived_fields_start_empty() {
        let dep = Deployment::new("r", "ci-7", 1, at(2024, 1, 1), "deployed", "c", "v");
        assert!(dep.repo.is_none());
        assert!(dep.pr_number.is_none());
        assert!(dep.pr_is_open.is_none());
    }
}
