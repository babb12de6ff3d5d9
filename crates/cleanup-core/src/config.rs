use crate::error::{CleanupError, Result};
use crate::infer::matches_from_start;
use regex::Regex;

pub const DEFAULT_MAX_AGE_HOURS: i64 = 720;
pub const DEFAULT_EXEMPTION_ANNOTATION: &str = "renku.io/cleanup-exempt";

// ---------------------------------------------------------------------------
// RepoMap
// ---------------------------------------------------------------------------

/// Ordered namespace-pattern → repository mapping.
///
/// Insertion order is significant: when inferring the repository for a
/// namespace, entries are tried in order and the first pattern matching
/// from the start of the namespace wins.
#[derive(Debug, Clone, Default)]
pub struct RepoMap {
    entries: Vec<(Regex, String)>,
}

impl RepoMap {
    /// Parse a whitespace-separated list of `regex:repository` mappings.
    /// Entries without a `:` separator are ignored.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for mapping in spec.split_whitespace() {
            let Some((pattern, repo)) = mapping.split_once(':') else {
                continue;
            };
            entries.push((compile(pattern)?, repo.to_string()));
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First matching repository for a namespace, in insertion order.
    pub fn repo_for(&self, namespace: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(re, _)| matches_from_start(re, namespace))
            .map(|(_, repo)| repo.as_str())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Run-wide configuration, constructed once at process start and passed by
/// reference into each component. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only namespaces matching at least one of these are considered.
    pub namespace_patterns: Vec<Regex>,
    pub max_age_hours: i64,
    pub dry_run: bool,
    pub exemption_annotation: String,
    pub repo_map: RepoMap,
    pub github_token: String,
}

impl Config {
    pub fn from_parts(
        namespace_patterns: &str,
        max_age_hours: i64,
        dry_run: bool,
        exemption_label: Option<&str>,
        pr_repositories: &str,
        github_token: String,
    ) -> Result<Self> {
        if github_token.trim().is_empty() {
            return Err(CleanupError::Config(
                "a GitHub token is required (GITHUB_TOKEN)".to_string(),
            ));
        }
        let namespace_patterns = namespace_patterns
            .split_whitespace()
            .map(compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            namespace_patterns,
            max_age_hours,
            dry_run,
            exemption_annotation: exemption_annotation_key(exemption_label),
            repo_map: RepoMap::parse(pr_repositories)?,
            github_token,
        })
    }
}

/// The exemption label is configured as a `key=value` pair; only the key
/// names the namespace annotation. Anything else falls back to the default.
pub fn exemption_annotation_key(label: Option<&str>) -> String {
    match label.and_then(|l| l.split_once('=')) {
        Some((key, _)) => key.to_string(),
        None => DEFAULT_EXEMPTION_ANNOTATION.to_string(),
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| CleanupError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exemption_key_from_label() {
        assert_eq!(
            exemption_annotation_key(Some("renku.io/keep=true")),
            "renku.io/keep"
        );
    }

    #[test]
    fn exemption_key_defaults_without_separator() {
        assert_eq!(
            exemption_annotation_key(Some("no-separator")),
            DEFAULT_EXEMPTION_ANNOTATION
        );
        assert_eq!(exemption_annotation_key(None), DEFAULT_EXEMPTION_ANNOTATION);
    }

    #[test]
    fn repo_map_first_match_wins() {
        let map = RepoMap::parse(r"ci-\d+-:org/first ci-:org/second").unwrap();
        assert_eq!(map.repo_for("ci-42-abc"), Some("org/first"));
        assert_eq!(map.repo_for("ci-main"), Some("org/second"));
        assert_eq!(map.repo_for("prod"), None);
    }

    #[test]
    fn repo_map_matches_from_start_only() {
        let map = RepoMap::parse(r"renku-ci-:org/renku").unwrap();
        assert_eq!(map.repo_for("renku-ci-123"), Some("org/renku"));
        assert_eq!(map.repo_for("old-renku-ci-123"), None);
    }

    #[test]
    fn repo_map_ignores_entries_without_separator() {
        let map = RepoMap::parse("bogus ci-:org/repo").unwrap();
        assert_eq!(map.repo_for("ci-1"), Some("org/repo"));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let err = RepoMap::parse("ci-(:org/repo").unwrap_err();
        assert!(matches!(err, CleanupError::Pattern { .. }));
    }

    #[test]
    fn missing_token_refused() {
        let err =
            Config::from_parts("ci-", 720, false, None, "", "   ".to_string()).unwrap_err();
        assert!(matches!(err, CleanupError::Config(_)));
    }

    #[test]
    fn from_parts_compiles_patterns() {
        let cfg = Config::from_parts(
            r"ci-\d+- renku-ci-",
            48,
            true,
            Some("renku.io/cleanup-exempt=true"),
            r"ci-\d+-:org/repo",
            "token".to_string(),
        )
        .unwrap();
        assert_eq!(cfg.namespace_patterns.len(), 2);
        assert_eq!(cfg.max_age_hours, 48);
        assert!(cfg.dry_run);
        assert_eq!(cfg.exemption_annotation, "renku.io/cleanup-exempt");
        assert!(!cfg.repo_map.is_empty());
    }
}
