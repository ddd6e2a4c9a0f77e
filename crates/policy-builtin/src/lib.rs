//! # rampart-policy-builtin
//!
//! The first-party baseline rule pack for Rampart.
//!
//! Every rule here guards one security property of one resource type:
//! encryption at rest, transport security, public exposure, audit logging,
//! deletion protection. The rules only see the generic
//! [`Resource`](rampart_policy::resource::Resource) shape, so any host that
//! can describe its resources as typed property bags can run the pack.
//!
//! # Quick Start
//!
//! ```
//! use rampart_policy::prelude::*;
//! use serde_json::json;
//!
//! let registry = rampart_policy_builtin::baseline_registry()?;
//! let evaluator = Evaluator::new(registry);
//!
//! let volume = Resource::new("storage-volume", "data")
//!     .with_property("encrypted", json!(false));
//!
//! let result = evaluator.evaluate(&volume);
//! assert!(!result.is_compliant());
//! # Ok::<(), PolicyError>(())
//! ```
//!
//! # Picking rules by hand
//!
//! Each rule is also exported on its own, as a unit struct plus a factory
//! function, so hosts can assemble a smaller pack:
//!
//! ```
//! use rampart_policy::prelude::*;
//! use rampart_policy_builtin::{kms_key_rotation, volume_encryption};
//!
//! let registry = Registry::builder()
//!     .register(volume_encryption())?
//!     .register(kms_key_rotation())?
//!     .build()?;
//! assert_eq!(registry.len(), 2);
//! # Ok::<(), PolicyError>(())
//! ```

use rampart_policy::config::PackConfig;
use rampart_policy::error::PolicyError;
use rampart_policy::registry::Registry;
use rampart_policy::rule::Rule;

// Storage rules
pub mod bucket;
pub mod volume;

// Network rules
pub mod flow_log;
pub mod security_group;

// Cluster and database rules
pub mod cluster;
pub mod database;

// Key management and messaging rules
pub mod kms;
pub mod queue;

// ============================================================================
// RE-EXPORTS: Storage rules
// ============================================================================

pub use bucket::{
    BucketDefaultEncryption, BucketPolicyRequiresTls, BucketPublicAccessBlock,
    bucket_default_encryption, bucket_policy_requires_tls, bucket_public_access_block,
};

pub use volume::{VolumeEncryption, volume_encryption};

// ============================================================================
// RE-EXPORTS: Network rules
// ============================================================================

pub use flow_log::{FlowLogsEnabled, vpc_flow_logs_enabled};

pub use security_group::{
    SecurityGroupDefaultNoEgress, SecurityGroupDefaultNoIngress, SecurityGroupNoOpenSsh,
    SecurityGroupRuleNoOpenSsh, security_group_default_no_egress,
    security_group_default_no_ingress, security_group_no_open_ssh,
    security_group_rule_no_open_ssh,
};

// ============================================================================
// RE-EXPORTS: Cluster and database rules
// ============================================================================

pub use cluster::{
    ClusterKmsEncryption, ClusterLogTypes, ClusterRequiredTags, cluster_kms_encryption,
    cluster_log_types, cluster_required_tags,
};

pub use database::{DatabaseDeletionProtection, rds_deletion_protection};

// ============================================================================
// RE-EXPORTS: Key management and messaging rules
// ============================================================================

pub use kms::{KmsKeyRotation, kms_key_rotation};

pub use queue::{QueueNoPublicPrincipal, queue_no_public_principal};

/// Every baseline rule, boxed, in pack order.
///
/// The order is stable and is the order violations appear in when a single
/// resource trips several rules.
#[must_use]
pub fn baseline_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(bucket_public_access_block()),
        Box::new(queue_no_public_principal()),
        Box::new(kms_key_rotation()),
        Box::new(vpc_flow_logs_enabled()),
        Box::new(bucket_default_encryption()),
        Box::new(volume_encryption()),
        Box::new(rds_deletion_protection()),
        Box::new(security_group_default_no_ingress()),
        Box::new(security_group_default_no_egress()),
        Box::new(security_group_no_open_ssh()),
        Box::new(security_group_rule_no_open_ssh()),
        Box::new(bucket_policy_requires_tls()),
        Box::new(cluster_log_types()),
        Box::new(cluster_required_tags()),
        Box::new(cluster_kms_encryption()),
    ]
}

/// Builds a registry holding the full baseline pack at default severities.
pub fn baseline_registry() -> Result<Registry, PolicyError> {
    Registry::builder().register_all(baseline_rules())?.build()
}

/// Builds the baseline pack with enforcement overrides applied.
///
/// The configuration may disable rules or change their severity; referencing
/// a rule id the pack does not contain is an error.
pub fn configured_registry(config: PackConfig) -> Result<Registry, PolicyError> {
    Registry::builder()
        .register_all(baseline_rules())?
        .with_config(config)
        .build()
}
