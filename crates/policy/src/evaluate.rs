//! Evaluation: running every applicable rule against resources.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::props::TypeMismatch;
use crate::registry::Registry;
use crate::resource::Resource;
use crate::rule::{CheckContext, Rule};
use crate::violation::Violation;

/// A soft observation attached to a result: a rule asked for a typed
/// property and found a differently shaped value, so it saw the caller's
/// default instead. Worth surfacing, not worth failing the rule over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    rule_id: String,
    #[serde(flatten)]
    mismatch: TypeMismatch,
}

impl Diagnostic {
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    #[must_use]
    pub fn mismatch(&self) -> &TypeMismatch {
        &self.mismatch
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule `{}`: {}", self.rule_id, self.mismatch)
    }
}

/// Everything evaluation produced for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    resource_type: String,
    resource_name: String,
    violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

impl EvaluationResult {
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Violations in rule registration order; a rule that reported several
    /// times appears several times, in report order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Type mismatches observed while rules read properties.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when no rule reported anything.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    /// True when at least one violation is mandatory.
    #[must_use]
    pub fn has_blocking_violations(&self) -> bool {
        self.violations.iter().any(Violation::is_blocking)
    }
}

/// Ordered per-resource results for one batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    results: Vec<EvaluationResult>,
}

impl BatchResult {
    #[must_use]
    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvaluationResult> {
        self.results.iter()
    }

    /// Total violations across the batch.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.results.iter().map(|r| r.violations().len()).sum()
    }

    /// The gating signal: true when any resource in the batch carries a
    /// mandatory violation, in which case the host should refuse to proceed.
    #[must_use]
    pub fn has_blocking_violations(&self) -> bool {
        self.results.iter().any(EvaluationResult::has_blocking_violations)
    }
}

impl FromIterator<EvaluationResult> for BatchResult {
    fn from_iter<I: IntoIterator<Item = EvaluationResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BatchResult {
    type Item = EvaluationResult;
    type IntoIter = std::vec::IntoIter<EvaluationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a EvaluationResult;
    type IntoIter = std::slice::Iter<'a, EvaluationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Runs registered rules against resources.
///
/// Cheap to clone: clones share the frozen registry, so a host that fans a
/// batch out across workers hands each worker its own `Evaluator`.
///
/// ```rust
/// use rampart_policy::evaluate::Evaluator;
/// use rampart_policy::registry::RegistryBuilder;
/// use rampart_policy::resource::Resource;
/// use rampart_policy::rule::FnRule;
///
/// # fn main() -> Result<(), rampart_policy::error::PolicyError> {
/// let registry = RegistryBuilder::new()
///     .register(FnRule::new("volume-encryption", "storage-volume", |cx| {
///         if !cx.props().get_bool("encrypted", false) {
///             cx.report("volume is not encrypted");
///         }
///         Ok(())
///     }))?
///     .build()?;
///
/// let evaluator = Evaluator::new(registry);
/// let result = evaluator.evaluate(&Resource::new("storage-volume", "data"));
/// assert!(result.has_blocking_violations());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Evaluator {
    registry: Arc<Registry>,
}

impl Evaluator {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Evaluates one resource against every applicable rule, in rule
    /// registration order.
    ///
    /// A rule that returns an error or panics contributes exactly one
    /// synthetic mandatory violation and never stops the remaining rules;
    /// one broken rule cannot wave a batch through or take the others down.
    #[must_use]
    pub fn evaluate(&self, resource: &Resource) -> EvaluationResult {
        let _span = tracing::debug_span!(
            "evaluate",
            pack = self.registry.name().unwrap_or(""),
            resource = %resource.name(),
            resource_type = %resource.resource_type(),
        )
        .entered();

        let mut violations = Vec::new();
        let mut diagnostics = Vec::new();
        for rule in self.registry.rules_for(resource.resource_type()) {
            run_rule(rule, resource, &mut violations, &mut diagnostics);
        }

        EvaluationResult {
            resource_type: resource.resource_type().to_string(),
            resource_name: resource.name().to_string(),
            violations,
            diagnostics,
        }
    }

    /// Evaluates each resource independently, preserving input order.
    #[must_use]
    pub fn evaluate_batch<'a, I>(&self, resources: I) -> BatchResult
    where
        I: IntoIterator<Item = &'a Resource>,
    {
        resources.into_iter().map(|r| self.evaluate(r)).collect()
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("registry", &*self.registry)
            .finish()
    }
}

fn run_rule(
    rule: &dyn Rule,
    resource: &Resource,
    violations: &mut Vec<Violation>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut cx = CheckContext::new(resource);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.check(&mut cx)));
    let (messages, mismatches) = cx.into_parts();

    // Mismatches survive even when the rule itself fails; they are often
    // exactly what explains the failure.
    diagnostics.extend(mismatches.into_iter().map(|mismatch| Diagnostic {
        rule_id: rule.id().to_string(),
        mismatch,
    }));

    match outcome {
        Ok(Ok(())) => {
            for message in messages {
                tracing::debug!(rule = %rule.id(), resource = %resource.name(), %message, "violation");
                violations.push(Violation::new(
                    rule.id(),
                    resource.name(),
                    message,
                    rule.severity(),
                ));
            }
        }
        Ok(Err(err)) => {
            // Partial reports from a failed check are unreliable; drop them.
            tracing::warn!(rule = %rule.id(), resource = %resource.name(), error = %err, "rule failed");
            violations.push(Violation::execution_error(
                rule.id(),
                resource.name(),
                err.message(),
            ));
        }
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            tracing::error!(rule = %rule.id(), resource = %resource.name(), %detail, "rule panicked");
            violations.push(Violation::execution_error(rule.id(), resource.name(), detail));
        }
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
