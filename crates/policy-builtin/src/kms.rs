//! KMS key rules.

rampart_policy::rule! {
    /// Keys without automatic rotation accumulate risk as they age.
    pub KmsKeyRotation for "kms-key";
    id "kms-key-rotation";
    describe "Checks that automatic rotation is enabled on KMS keys";
    flag(cx) { !cx.props().get_bool("enableKeyRotation", false) }
    message(cx) {
        format!(
            "Automatic rotation should be turned on for the KMS key `{}`",
            cx.resource().name()
        )
    }
    fn kms_key_rotation();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_policy::resource::Resource;
    use rampart_policy::rule::{CheckContext, Rule};
    use serde_json::json;

    fn messages(resource: &Resource) -> Vec<String> {
        let mut cx = CheckContext::new(resource);
        kms_key_rotation().check(&mut cx).unwrap();
        cx.messages().to_vec()
    }

    #[test]
    fn rotating_key_passes() {
        let key = Resource::new("kms-key", "signing").with_property("enableKeyRotation", true);
        assert!(messages(&key).is_empty());
    }

    #[test]
    fn explicit_false_is_flagged() {
        let key = Resource::new("kms-key", "signing").with_property("enableKeyRotation", false);
        assert_eq!(
            messages(&key),
            ["Automatic rotation should be turned on for the KMS key `signing`"]
        );
    }

    #[test]
    fn absent_flag_is_flagged() {
        let key = Resource::new("kms-key", "signing");
        assert_eq!(messages(&key).len(), 1);
    }

    #[test]
    fn non_boolean_flag_is_flagged_and_logged() {
        let key = Resource::new("kms-key", "signing")
            .with_property("enableKeyRotation", json!("true"));
        let mut cx = CheckContext::new(&key);
        kms_key_rotation().check(&mut cx).unwrap();
        assert_eq!(cx.messages().len(), 1);

        let mismatches = cx.props().take_mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].path, "enableKeyRotation");
    }
}
