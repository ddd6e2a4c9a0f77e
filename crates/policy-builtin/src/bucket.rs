//! Object storage bucket rules.

use rampart_policy::rule::{CheckContext, Rule, RuleError};
use serde_json::Value;

rampart_policy::rule! {
    /// All four block flags must be set; a missing flag counts as unset.
    pub BucketPublicAccessBlock for "bucket-public-access-block";
    id "bucket-public-access-block";
    describe "Checks that every public access block flag is enabled";
    flag(cx) {
        let props = cx.props();
        !props.get_bool("blockPublicAcls", false)
            || !props.get_bool("blockPublicPolicy", false)
            || !props.get_bool("ignorePublicAcls", false)
            || !props.get_bool("restrictPublicBuckets", false)
    }
    message(cx) {
        format!("Public access is not blocked for the bucket `{}`", cx.resource().name())
    }
    fn bucket_public_access_block();
}

rampart_policy::rule! {
    pub BucketDefaultEncryption for "bucket";
    id "bucket-default-encryption";
    describe "Checks that default server-side encryption is configured on buckets";
    flag(cx) {
        cx.props().get("serverSideEncryptionConfiguration").is_none_or(Value::is_null)
    }
    message(cx) {
        format!("Default encryption is not enabled for the bucket `{}`", cx.resource().name())
    }
    fn bucket_default_encryption();
}

/// Bucket policies must deny requests made without secure transport.
///
/// The policy document arrives as a JSON string, so this rule parses it and
/// scans the `Statement` array for a condition pinning `aws:SecureTransport`
/// to the string `"false"`. Statements without a `Condition` block are
/// skipped. A document that cannot be parsed or has a malformed `Statement`
/// is an execution error rather than a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketPolicyRequiresTls;

impl Rule for BucketPolicyRequiresTls {
    fn id(&self) -> &str {
        "bucket-policy-requires-tls"
    }

    fn description(&self) -> &str {
        "Checks that bucket policies deny requests made without TLS"
    }

    fn applies_to(&self, resource_type: &str) -> bool {
        resource_type == "bucket-policy"
    }

    fn check(&self, cx: &mut CheckContext<'_>) -> Result<(), RuleError> {
        let name = cx.resource().name();
        let Some(policy) = cx.props().get("policy") else {
            cx.report(format!("No policy found in `{name}`"));
            return Ok(());
        };
        let Some(raw) = policy.as_str() else {
            return Err(RuleError::new(format!("bucket policy for `{name}` is not a string")));
        };
        let document: Value = serde_json::from_str(raw).map_err(|err| {
            RuleError::new(format!("bucket policy for `{name}` is not valid JSON: {err}"))
        })?;
        let Some(statements) = document.get("Statement") else {
            cx.report(format!("No statements found in policy `{name}`"));
            return Ok(());
        };
        let Some(statements) = statements.as_array() else {
            return Err(RuleError::new(format!(
                "bucket policy `Statement` for `{name}` is not an array"
            )));
        };
        if !statements.iter().any(denies_insecure_transport) {
            cx.report(format!(
                "Secure transport flag is not set in the bucket policy for `{name}`"
            ));
        }
        Ok(())
    }
}

/// Creates the [`BucketPolicyRequiresTls`] rule.
#[must_use]
pub const fn bucket_policy_requires_tls() -> BucketPolicyRequiresTls {
    BucketPolicyRequiresTls
}

fn denies_insecure_transport(statement: &Value) -> bool {
    statement
        .get("Condition")
        .and_then(|condition| condition.get("Bool"))
        .and_then(|flags| flags.get("aws:SecureTransport"))
        .and_then(Value::as_str)
        == Some("false")
}
