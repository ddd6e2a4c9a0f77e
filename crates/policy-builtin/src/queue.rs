//! Message queue rules.

use rampart_policy::rule::{CheckContext, Rule, RuleError};
use serde_json::Value;

/// Queue policies must not grant access to the wildcard principal.
///
/// Only the first statement is inspected, and only the bare string `"*"`
/// counts; the object form `{"AWS": "*"}` is out of scope here. A policy
/// that is missing, unparseable or has no statements is an execution error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueNoPublicPrincipal;

impl Rule for QueueNoPublicPrincipal {
    fn id(&self) -> &str {
        "queue-no-public-principal"
    }

    fn description(&self) -> &str {
        "Checks that queue policies do not open the queue to every principal"
    }

    fn applies_to(&self, resource_type: &str) -> bool {
        resource_type == "queue-policy"
    }

    fn check(&self, cx: &mut CheckContext<'_>) -> Result<(), RuleError> {
        let name = cx.resource().name();
        let raw = cx.props().get("policy").and_then(Value::as_str).ok_or_else(|| {
            RuleError::new(format!("queue policy for `{name}` is missing or not a string"))
        })?;
        let document: Value = serde_json::from_str(raw).map_err(|err| {
            RuleError::new(format!("queue policy for `{name}` is not valid JSON: {err}"))
        })?;
        let first = document
            .get("Statement")
            .and_then(|statements| statements.get(0))
            .ok_or_else(|| {
                RuleError::new(format!("queue policy for `{name}` has no statements"))
            })?;
        if first.get("Principal").and_then(Value::as_str) == Some("*") {
            cx.report(format!("Principal in the queue policy cannot be `*` for queue `{name}`"));
        }
        Ok(())
    }
}

/// Creates the [`QueueNoPublicPrincipal`] rule.
#[must_use]
pub const fn queue_no_public_principal() -> QueueNoPublicPrincipal {
    QueueNoPublicPrincipal
}
