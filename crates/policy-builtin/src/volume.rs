//! Storage volume rules.

rampart_policy::rule! {
    /// Volumes must be encrypted at rest.
    pub VolumeEncryption for "storage-volume";
    id "volume-encryption";
    describe "Checks the encryption configuration on storage volumes";
    flag(cx) { !cx.props().get_bool("encrypted", false) }
    message(cx) {
        format!(
            "Encryption is not enabled for the storage volume `{}`",
            cx.resource().name()
        )
    }
    fn volume_encryption();
}
