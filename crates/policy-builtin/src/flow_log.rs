//! Network flow log rules.

rampart_policy::rule! {
    /// Flow logs must capture all traffic, not just accepted or rejected
    /// packets.
    pub FlowLogsEnabled for "flow-log";
    id "vpc-flow-logs-enabled";
    describe "Checks that flow logs capture all traffic";
    flag(cx) { cx.props().get_str("trafficType", "") != "ALL" }
    message(cx) {
        format!(
            "Flow logs are not enabled in the expected configuration for `{}`",
            cx.resource().name()
        )
    }
    fn vpc_flow_logs_enabled();
}
