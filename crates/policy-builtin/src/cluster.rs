//! Managed cluster rules.

use serde_json::Value;

const REQUIRED_LOG_TYPES: [&str; 3] = ["api", "audit", "authenticator"];

rampart_policy::rule! {
    /// Control-plane logging must cover the api, audit and authenticator
    /// streams; extra log types beyond those three are fine.
    pub ClusterLogTypes for "managed-cluster";
    id "cluster-log-types";
    describe "Checks that clusters enable the three default control-plane log types";
    flag(cx) {
        let log_types = cx.props().get_list("enabledClusterLogTypes");
        log_types.len() < REQUIRED_LOG_TYPES.len()
            || REQUIRED_LOG_TYPES.iter().any(|required| {
                !log_types.iter().any(|log_type| log_type.as_str() == Some(*required))
            })
    }
    message(cx) {
        "Managed clusters should have all three log types (api, audit, authenticator) \
         enabled by default"
            .to_string()
    }
    fn cluster_log_types();
}

rampart_policy::rule! {
    pub ClusterRequiredTags for "managed-cluster";
    id "cluster-required-tags";
    describe "Checks that clusters carry non-null Name and env tags";
    flag(cx) {
        let props = cx.props();
        match props.get("tags") {
            None | Some(Value::Null) => true,
            Some(_) => {
                props.get("tags.Name").is_none_or(Value::is_null)
                    || props.get("tags.env").is_none_or(Value::is_null)
            }
        }
    }
    message(cx) { "Managed clusters should have default tags".to_string() }
    fn cluster_required_tags();
}

rampart_policy::rule! {
    pub ClusterKmsEncryption for "managed-cluster";
    id "cluster-kms-encryption";
    describe "Checks that clusters encrypt secrets with a configured KMS key";
    flag(cx) { cx.props().get("encryption_config_key_arn").is_none_or(Value::is_null) }
    message(cx) {
        "Managed clusters should have a KMS key configured for encryption of secrets".to_string()
    }
    fn cluster_kms_encryption();
}
