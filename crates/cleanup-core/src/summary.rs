//! Per-run outcome bookkeeping and the final report.

const MAX_ERROR_DETAIL: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub namespace: String,
    pub code: i32,
    pub stderr: String,
}

/// Aggregated outcomes of one cleanup pass. Failures are surfaced for
/// operator follow-up only; no retries are attempted.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<DeletionFailure>,
}

impl RunSummary {
    pub fn new(processed: usize) -> Self {
        Self {
            processed,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, namespace: impl Into<String>) {
        self.succeeded.push(namespace.into());
    }

    pub fn record_failure(&mut self, failure: DeletionFailure) {
        self.failed.push(failure);
    }

    pub fn render(&self) -> String {
        let mut report = String::new();
        let rule = "=".repeat(80);
        report.push_str(&rule);
        report.push_str("\nCLEANUP SUMMARY\n");
        report.push_str(&rule);
        report.push('\n');
        report.push_str(&format!(
            "Total CI deployments processed: {}\n",
            self.processed
        ));
        report.push_str(&format!("Successful deletions: {}\n", self.succeeded.len()));
        report.push_str(&format!("Failed deletions: {}\n", self.failed.len()));

        if !self.failed.is_empty() {
            report.push_str("Failed namespaces:\n");
            for failure in &self.failed {
                report.push_str(&format!(
                    "  - {} (exit code: {})\n",
                    failure.namespace, failure.code
                ));
                let detail = truncate_detail(&failure.stderr);
                if !detail.is_empty() {
                    report.push_str(&format!("    Error: {detail}\n"));
                }
            }
        }
        report
    }
}

/// Bound per-failure error text so the report stays readable.
fn truncate_detail(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_DETAIL) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
