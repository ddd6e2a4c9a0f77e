//! Violations: what rules report and hosts act on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly a violation gates the change being validated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Surfaced to the operator but never blocks the change.
    Advisory,
    /// Blocks the change.
    #[default]
    Mandatory,
}

impl Severity {
    /// True when violations of this severity must stop the change.
    #[must_use]
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Mandatory)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Advisory => "advisory",
            Self::Mandatory => "mandatory",
        };
        f.write_str(s)
    }
}

/// Where a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A rule predicate inspected the resource and found it non-compliant.
    #[default]
    Policy,
    /// A rule failed to run; the evaluator synthesized this entry so the
    /// failure cannot pass silently.
    RuleExecution,
}

/// One finding against one resource.
///
/// Violations are immutable once created; hosts sort, filter, and render
/// them but never change them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    rule_id: String,
    resource_name: String,
    message: String,
    severity: Severity,
    kind: ViolationKind,
}

impl Violation {
    /// A finding reported by a rule predicate.
    pub fn new(
        rule_id: impl Into<String>,
        resource_name: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            resource_name: resource_name.into(),
            message: message.into(),
            severity,
            kind: ViolationKind::Policy,
        }
    }

    /// The synthetic entry recorded when a rule errors or panics. Always
    /// mandatory: a rule that cannot run must not wave the change through.
    pub(crate) fn execution_error(
        rule_id: impl Into<String>,
        resource_name: impl Into<String>,
        detail: impl fmt::Display,
    ) -> Self {
        let rule_id = rule_id.into();
        Self {
            message: format!("rule `{rule_id}` failed to execute: {detail}"),
            rule_id,
            resource_name: resource_name.into(),
            severity: Severity::Mandatory,
            kind: ViolationKind::RuleExecution,
        }
    }

    /// Id of the rule that produced this violation.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Name of the resource the violation is against.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Human-readable description of what is wrong.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// True when this violation alone is enough to stop the change.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} on `{}`: {}",
            self.severity, self.rule_id, self.resource_name, self.message
        )
    }
}
