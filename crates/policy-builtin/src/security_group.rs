//! Security group rules.

use rampart_policy::props::coerce_i64;
use serde_json::Value;

const SSH_PORT: i64 = 22;
const OPEN_CIDR: &str = "0.0.0.0/0";

/// One ingress entry exposing exactly the SSH port to every address.
/// Port values arrive as numbers or numeric strings depending on the host.
fn opens_ssh_to_world(entry: &Value) -> bool {
    entry.get("fromPort").and_then(coerce_i64) == Some(SSH_PORT)
        && entry.get("toPort").and_then(coerce_i64) == Some(SSH_PORT)
        && entry
            .get("cidrBlocks")
            .and_then(|blocks| blocks.get(0))
            .and_then(Value::as_str)
            == Some(OPEN_CIDR)
}

rampart_policy::rule! {
    /// The default security group of a network should stay empty.
    pub SecurityGroupDefaultNoIngress for "default-security-group";
    id "security-group-default-no-ingress";
    describe "Checks that the default security group carries no ingress rules";
    flag(cx) { !cx.props().get_list("ingress").is_empty() }
    message(cx) {
        format!(
            "There should be no ingress rules in the default security group `{}`",
            cx.resource().name()
        )
    }
    fn security_group_default_no_ingress();
}

rampart_policy::rule! {
    pub SecurityGroupDefaultNoEgress for "default-security-group";
    id "security-group-default-no-egress";
    describe "Checks that the default security group carries no egress rules";
    flag(cx) { !cx.props().get_list("egress").is_empty() }
    message(cx) {
        format!(
            "There should be no egress rules in the default security group `{}`",
            cx.resource().name()
        )
    }
    fn security_group_default_no_egress();
}

rampart_policy::rule! {
    /// Flags groups whose inline ingress list opens SSH to the world.
    /// One violation per group, however many entries match.
    pub SecurityGroupNoOpenSsh for "security-group";
    id "security-group-no-open-ssh";
    describe "Checks whether port 22 is open to all addresses for incoming connections";
    flag(cx) { cx.props().get_list("ingress").iter().any(opens_ssh_to_world) }
    message(cx) {
        format!(
            "The security group `{}` has allowed SSH access from all addresses",
            cx.resource().name()
        )
    }
    fn security_group_no_open_ssh();
}

rampart_policy::rule! {
    /// Standalone rule resources carry their ports at the top level.
    pub SecurityGroupRuleNoOpenSsh for "security-group-rule";
    id "security-group-rule-no-open-ssh";
    describe "Checks whether a standalone ingress rule opens port 22 to all addresses";
    flag(cx) {
        let props = cx.props();
        props.get_str("type", "") == "ingress"
            && props.get_i64("fromPort", -1) == SSH_PORT
            && props.get_i64("toPort", -1) == SSH_PORT
            && props.get_str("cidrBlocks.0", "") == OPEN_CIDR
    }
    message(cx) {
        format!(
            "The security group rule `{}` has allowed SSH access from all addresses",
            cx.resource().name()
        )
    }
    fn security_group_rule_no_open_ssh();
}
