//! Database instance rules.

rampart_policy::rule! {
    /// Deletion protection must be switched on. Some hosts serialize the
    /// unset flag as the string `"None"` rather than omitting it, so that
    /// sentinel counts as disabled too. A literal `false` is treated as an
    /// explicit operator decision and left alone.
    pub DatabaseDeletionProtection for "db-instance";
    id "rds-deletion-protection";
    describe "Checks that deletion protection is enabled on database instances";
    flag(cx) {
        match cx.props().get("deletionProtection") {
            None => true,
            Some(value) => value.as_str() == Some("None"),
        }
    }
    message(cx) {
        format!(
            "Deletion protection is not enabled for the database instance `{}`",
            cx.resource().name()
        )
    }
    fn rds_deletion_protection();
}
