//! Namespace exemption lookups via `kubectl`.

use std::time::Duration;

use serde_json::Value;

use crate::error::{CleanupError, Result};
use crate::exec;
use crate::filter::ExemptionSource;

const KUBECTL_TIMEOUT: Duration = Duration::from_secs(60);

/// Reads the exemption annotation off the live namespace object. Any
/// failure (kubectl missing, nonzero exit, malformed JSON) surfaces as an
/// error so the exemption filter's fail-closed policy applies.
pub struct KubectlExemptions {
    annotation: String,
}

impl KubectlExemptions {
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
        }
    }
}

impl ExemptionSource for KubectlExemptions {
    fn is_exempt(&self, namespace: &str) -> Result<bool> {
        let out = exec::run(
            "kubectl",
            &["get", "namespace", namespace, "--output", "json"],
            KUBECTL_TIMEOUT,
        );
        if !out.success() {
            return Err(CleanupError::Namespace {
                namespace: namespace.to_string(),
                reason: format!(
                    "kubectl exited with code {}: {}",
                    out.code,
                    out.stderr.trim()
                ),
            });
        }
        let manifest: Value = serde_json::from_str(&out.stdout)?;
        Ok(annotation_is_true(&manifest, &self.annotation))
    }
}

/// A namespace is exempt iff the annotation value is exactly `"true"`.
fn annotation_is_true(manifest: &Value, annotation: &str) -> bool {
    manifest
        .get("metadata")
        .and_then(|m| m.get("annotations"))
        .and_then(|a| a.get(annotation))
        .and_then(Value::as_str)
        == Some("true")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
