//! Full-pack tests: the baseline rules against whole resource stacks.

use pretty_assertions::assert_eq;
use rampart_policy::prelude::*;
use rampart_policy_builtin::{baseline_registry, configured_registry};
use rstest::rstest;
use serde_json::json;

fn evaluator() -> Evaluator {
    Evaluator::new(baseline_registry().unwrap())
}

fn deny_insecure_document() -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Deny",
            "Action": "s3:*",
            "Resource": "*",
            "Condition": {"Bool": {"aws:SecureTransport": "false"}}
        }]
    })
    .to_string()
}

fn named_principal_document() -> String {
    json!({
        "Statement": [{
            "Effect": "Allow",
            "Principal": "arn:iam::123456789012:root",
            "Action": "sqs:SendMessage"
        }]
    })
    .to_string()
}

fn wildcard_principal_document() -> String {
    json!({
        "Statement": [{
            "Effect": "Allow",
            "Principal": "*",
            "Action": "sqs:SendMessage"
        }]
    })
    .to_string()
}

// ============================================================================
// HAPPY PATH: a fully hardened stack sails through every rule
// ============================================================================

#[test]
fn hardened_stack_is_fully_compliant() {
    let resources: Vec<Resource> = serde_json::from_value(json!([
        {"type": "bucket-public-access-block", "name": "assets-block", "properties": {
            "blockPublicAcls": true,
            "blockPublicPolicy": true,
            "ignorePublicAcls": true,
            "restrictPublicBuckets": true
        }},
        {"type": "queue-policy", "name": "jobs-policy", "properties": {
            "policy": named_principal_document()
        }},
        {"type": "kms-key", "name": "signing", "properties": {"enableKeyRotation": true}},
        {"type": "flow-log", "name": "vpc-main", "properties": {"trafficType": "ALL"}},
        {"type": "bucket", "name": "assets", "properties": {
            "serverSideEncryptionConfiguration": {
                "rule": {"applyServerSideEncryptionByDefault": {"sseAlgorithm": "aws:kms"}}
            }
        }},
        {"type": "storage-volume", "name": "data", "properties": {"encrypted": true}},
        {"type": "db-instance", "name": "orders", "properties": {"deletionProtection": true}},
        {"type": "default-security-group", "name": "default"},
        {"type": "security-group", "name": "web", "properties": {
            "ingress": [{"fromPort": 443, "toPort": 443, "cidrBlocks": ["10.0.0.0/8"]}]
        }},
        {"type": "security-group-rule", "name": "https-in", "properties": {
            "type": "ingress", "fromPort": 443, "toPort": 443, "cidrBlocks": ["10.0.0.0/8"]
        }},
        {"type": "bucket-policy", "name": "assets-policy", "properties": {
            "policy": deny_insecure_document()
        }},
        {"type": "managed-cluster", "name": "prod", "properties": {
            "enabledClusterLogTypes": ["api", "audit", "authenticator"],
            "tags": {"Name": "prod", "env": "production"},
            "encryption_config_key_arn": "arn:kms:key/1234"
        }}
    ]))
    .unwrap();

    let batch = evaluator().evaluate_batch(&resources);

    for result in &batch {
        assert!(
            result.is_compliant(),
            "`{}` tripped {:?}",
            result.resource_name(),
            result.violations()
        );
    }
    assert_eq!(batch.violation_count(), 0);
    assert!(!batch.has_blocking_violations());
}

// ============================================================================
// FINDINGS: broken resources report per rule, in pack order
// ============================================================================

#[test]
fn broken_stack_reports_per_resource_in_pack_order() {
    let resources: Vec<Resource> = serde_json::from_value(json!([
        {"type": "default-security-group", "name": "default", "properties": {
            "ingress": [{"fromPort": 22}],
            "egress": [{"toPort": 0}]
        }},
        {"type": "managed-cluster", "name": "prod"},
        {"type": "kms-key", "name": "signing"}
    ]))
    .unwrap();

    let batch = evaluator().evaluate_batch(&resources);

    let per_resource: Vec<Vec<&str>> = batch
        .iter()
        .map(|result| result.violations().iter().map(Violation::rule_id).collect())
        .collect();
    assert_eq!(
        per_resource,
        [
            vec!["security-group-default-no-ingress", "security-group-default-no-egress"],
            vec!["cluster-log-types", "cluster-required-tags", "cluster-kms-encryption"],
            vec!["kms-key-rotation"],
        ]
    );
    assert_eq!(batch.violation_count(), 6);
    assert!(batch.has_blocking_violations());
}

#[rstest]
#[case(
    json!({"type": "storage-volume", "name": "plain-disk"}),
    "volume-encryption",
    "Encryption is not enabled for the storage volume `plain-disk`"
)]
#[case(
    json!({"type": "db-instance", "name": "orders", "properties": {"deletionProtection": "None"}}),
    "rds-deletion-protection",
    "Deletion protection is not enabled for the database instance `orders`"
)]
#[case(
    json!({"type": "flow-log", "name": "vpc-main", "properties": {"trafficType": "ACCEPT"}}),
    "vpc-flow-logs-enabled",
    "Flow logs are not enabled in the expected configuration for `vpc-main`"
)]
#[case(
    json!({"type": "bucket-public-access-block", "name": "assets-block"}),
    "bucket-public-access-block",
    "Public access is not blocked for the bucket `assets-block`"
)]
#[case(
    json!({"type": "security-group", "name": "web", "properties": {
        "ingress": [{"fromPort": 22, "toPort": 22, "cidrBlocks": ["0.0.0.0/0"]}]
    }}),
    "security-group-no-open-ssh",
    "The security group `web` has allowed SSH access from all addresses"
)]
#[case(
    json!({"type": "queue-policy", "name": "jobs", "properties": {
        "policy": wildcard_principal_document()
    }}),
    "queue-no-public-principal",
    "Principal in the queue policy cannot be `*` for queue `jobs`"
)]
fn single_finding_carries_the_expected_message(
    #[case] resource: serde_json::Value,
    #[case] rule_id: &str,
    #[case] message: &str,
) {
    let resource: Resource = serde_json::from_value(resource).unwrap();

    let result = evaluator().evaluate(&resource);

    assert_eq!(result.violations().len(), 1);
    let violation = &result.violations()[0];
    assert_eq!(violation.rule_id(), rule_id);
    assert_eq!(violation.message(), message);
    assert_eq!(violation.severity(), Severity::Mandatory);
    assert_eq!(violation.kind(), ViolationKind::Policy);
}

// ============================================================================
// EXECUTION ERRORS: malformed documents gate instead of crashing the run
// ============================================================================

#[test]
fn malformed_queue_policy_becomes_a_blocking_execution_finding() {
    let queue = Resource::new("queue-policy", "jobs").with_property("policy", "{not json");

    let result = evaluator().evaluate(&queue);

    assert_eq!(result.violations().len(), 1);
    let violation = &result.violations()[0];
    assert_eq!(violation.kind(), ViolationKind::RuleExecution);
    assert_eq!(violation.severity(), Severity::Mandatory);
    assert_eq!(violation.rule_id(), "queue-no-public-principal");
    assert!(violation.message().contains("failed to execute"));
    assert!(result.has_blocking_violations());
}

#[test]
fn non_string_bucket_policy_becomes_a_blocking_execution_finding() {
    let bucket_policy = Resource::new("bucket-policy", "assets-policy")
        .with_property("policy", json!({"Statement": []}));

    let result = evaluator().evaluate(&bucket_policy);

    assert_eq!(result.violations().len(), 1);
    assert_eq!(result.violations()[0].kind(), ViolationKind::RuleExecution);
    assert!(
        result.violations()[0]
            .message()
            .contains("bucket policy for `assets-policy` is not a string")
    );
}

// ============================================================================
// CONFIGURATION: the pack bends to enforcement overrides
// ============================================================================

#[rstest]
#[case(Enforcement::Disabled, 0, false)]
#[case(Enforcement::Advisory, 1, false)]
#[case(Enforcement::Mandatory, 1, true)]
fn overrides_reshape_the_pack(
    #[case] enforcement: Enforcement,
    #[case] expected_violations: usize,
    #[case] expect_gate: bool,
) {
    let config = PackConfig::new("tuned").rule("volume-encryption", enforcement);
    let registry = configured_registry(config).unwrap();
    let evaluator = Evaluator::new(registry);

    let result = evaluator.evaluate(&Resource::new("storage-volume", "plain-disk"));

    assert_eq!(result.violations().len(), expected_violations);
    assert_eq!(result.has_blocking_violations(), expect_gate);
}

#[test]
fn disabling_one_rule_leaves_the_rest_of_the_pack_alone() {
    let config = PackConfig::new("tuned").rule("cluster-required-tags", Enforcement::Disabled);
    let registry = configured_registry(config).unwrap();

    let result = Evaluator::new(registry).evaluate(&Resource::new("managed-cluster", "prod"));

    let ids: Vec<&str> = result.violations().iter().map(Violation::rule_id).collect();
    assert_eq!(ids, ["cluster-log-types", "cluster-kms-encryption"]);
}

#[test]
fn config_referencing_an_unknown_rule_is_rejected() {
    let config = PackConfig::new("typo").rule("volume-encrypton", Enforcement::Disabled);

    let err = configured_registry(config).unwrap_err();

    assert_eq!(err, PolicyError::UnknownRuleId { id: "volume-encrypton".into() });
}
