//! Rule registration and the frozen registry evaluations run against.

use std::collections::HashSet;
use std::fmt;

use crate::config::{Enforcement, PackConfig};
use crate::error::PolicyError;
use crate::rule::{CheckContext, Rule, RuleError};
use crate::violation::Severity;

/// Collects rules during the startup registration phase.
///
/// [`build`](Self::build) freezes the set into an immutable [`Registry`];
/// nothing can be added or re-levelled afterwards, which is what lets every
/// evaluation share the registry without locks.
///
/// ```rust
/// use rampart_policy::registry::RegistryBuilder;
/// use rampart_policy::rule::FnRule;
///
/// # fn main() -> Result<(), rampart_policy::error::PolicyError> {
/// let registry = RegistryBuilder::new()
///     .register(FnRule::new("a", "bucket", |_| Ok(())))?
///     .register(FnRule::new("b", "bucket", |_| Ok(())))?
///     .build()?;
/// assert_eq!(registry.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    rules: Vec<Box<dyn Rule>>,
    ids: HashSet<String>,
    config: Option<PackConfig>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Rejects empty ids and ids already registered;
    /// a duplicate never silently shadows the first registration.
    pub fn register(self, rule: impl Rule + 'static) -> Result<Self, PolicyError> {
        self.register_boxed(Box::new(rule))
    }

    /// [`register`](Self::register) for rules that are already boxed.
    pub fn register_boxed(mut self, rule: Box<dyn Rule>) -> Result<Self, PolicyError> {
        let id = rule.id();
        if id.is_empty() {
            return Err(PolicyError::EmptyRuleId);
        }
        if !self.ids.insert(id.to_string()) {
            return Err(PolicyError::DuplicateRuleId { id: id.to_string() });
        }
        self.rules.push(rule);
        Ok(self)
    }

    /// Registers every rule in order, stopping at the first rejection.
    pub fn register_all(
        mut self,
        rules: impl IntoIterator<Item = Box<dyn Rule>>,
    ) -> Result<Self, PolicyError> {
        for rule in rules {
            self = self.register_boxed(rule)?;
        }
        Ok(self)
    }

    /// Attaches a pack configuration to apply at build time.
    #[must_use]
    pub fn with_config(mut self, config: PackConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Freezes the collected rules into a read-only [`Registry`], applying
    /// any attached configuration: disabled rules are dropped, re-levelled
    /// rules report with their configured severity, and an override naming
    /// an unregistered id fails the build.
    pub fn build(self) -> Result<Registry, PolicyError> {
        let Self { rules, ids, config } = self;

        let Some(config) = config else {
            return Ok(Registry { name: None, rules });
        };

        for id in config.rules.keys() {
            if !ids.contains(id) {
                return Err(PolicyError::UnknownRuleId { id: id.clone() });
            }
        }

        let mut kept: Vec<Box<dyn Rule>> = Vec::with_capacity(rules.len());
        for rule in rules {
            match config.rules.get(rule.id()) {
                None => kept.push(rule),
                Some(Enforcement::Disabled) => {
                    tracing::debug!(rule = %rule.id(), "rule disabled by pack configuration");
                }
                Some(Enforcement::Advisory) => kept.push(Box::new(ConfiguredRule {
                    severity: Severity::Advisory,
                    inner: rule,
                })),
                Some(Enforcement::Mandatory) => kept.push(Box::new(ConfiguredRule {
                    severity: Severity::Mandatory,
                    inner: rule,
                })),
            }
        }

        Ok(Registry {
            name: config.name,
            rules: kept,
        })
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("rules", &self.rules.len())
            .field("config", &self.config)
            .finish()
    }
}

/// A registered rule re-levelled by pack configuration.
struct ConfiguredRule {
    inner: Box<dyn Rule>,
    severity: Severity,
}

impl Rule for ConfiguredRule {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn applies_to(&self, resource_type: &str) -> bool {
        self.inner.applies_to(resource_type)
    }

    fn check(&self, cx: &mut CheckContext<'_>) -> Result<(), RuleError> {
        self.inner.check(cx)
    }
}

/// The frozen, ordered rule set evaluations run against.
pub struct Registry {
    name: Option<String>,
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Pack name from configuration, if one was attached.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Rules applicable to `resource_type`, in registration order.
    pub fn rules_for<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a dyn Rule> {
        self.iter().filter(move |rule| rule.applies_to(resource_type))
    }

    /// Looks a rule up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.iter().find(|rule| rule.id() == id)
    }

    /// Registered ids, in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.iter().map(Rule::id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("rules", &self.rule_ids().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FnRule;
    use pretty_assertions::assert_eq;

    fn noop(id: &'static str) -> FnRule {
        FnRule::new(id, "bucket", |_| Ok(()))
    }

    #[test]
    fn preserves_registration_order() {
        let registry = RegistryBuilder::new()
            .register(noop("c"))
            .unwrap()
            .register(noop("a"))
            .unwrap()
            .register(noop("b"))
            .unwrap()
            .build()
            .unwrap();

        let ids: Vec<&str> = registry.rule_ids().collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = RegistryBuilder::new()
            .register(noop("dup"))
            .unwrap()
            .register(noop("dup"))
            .unwrap_err();
        assert_eq!(err, PolicyError::DuplicateRuleId { id: "dup".into() });
    }

    #[test]
    fn rejects_empty_ids() {
        let err = RegistryBuilder::new().register(noop("")).unwrap_err();
        assert_eq!(err, PolicyError::EmptyRuleId);
    }

    #[test]
    fn rules_for_filters_by_type() {
        let registry = RegistryBuilder::new()
            .register(FnRule::new("b1", "bucket", |_| Ok(())))
            .unwrap()
            .register(FnRule::new("q1", "queue-policy", |_| Ok(())))
            .unwrap()
            .register(FnRule::new("b2", "bucket", |_| Ok(())))
            .unwrap()
            .build()
            .unwrap();

        let ids: Vec<&str> = registry.rules_for("bucket").map(Rule::id).collect();
        assert_eq!(ids, ["b1", "b2"]);
        assert_eq!(registry.rules_for("flow-log").count(), 0);
    }

    #[test]
    fn config_disables_and_relevels() {
        use crate::config::{Enforcement, PackConfig};

        let registry = RegistryBuilder::new()
            .register(noop("keep"))
            .unwrap()
            .register(noop("drop"))
            .unwrap()
            .register(noop("soften"))
            .unwrap()
            .with_config(
                PackConfig::new("baseline")
                    .rule("drop", Enforcement::Disabled)
                    .rule("soften", Enforcement::Advisory),
            )
            .build()
            .unwrap();

        assert_eq!(registry.name(), Some("baseline"));
        let ids: Vec<&str> = registry.rule_ids().collect();
        assert_eq!(ids, ["keep", "soften"]);
        assert_eq!(
            registry.get("soften").map(Rule::severity),
            Some(Severity::Advisory)
        );
        assert_eq!(
            registry.get("keep").map(Rule::severity),
            Some(Severity::Mandatory)
        );
    }

    #[test]
    fn config_with_unknown_id_fails_the_build() {
        use crate::config::{Enforcement, PackConfig};

        let err = RegistryBuilder::new()
            .register(noop("real"))
            .unwrap()
            .with_config(PackConfig::default().rule("no-such", Enforcement::Disabled))
            .build()
            .unwrap_err();
        assert_eq!(err, PolicyError::UnknownRuleId { id: "no-such".into() });
    }

    #[test]
    fn relevelled_rule_still_delegates_its_check() {
        use crate::config::{Enforcement, PackConfig};
        use crate::resource::Resource;

        let registry = RegistryBuilder::new()
            .register(FnRule::new("flag", "bucket", |cx| {
                cx.report("flagged");
                Ok(())
            }))
            .unwrap()
            .with_config(PackConfig::default().rule("flag", Enforcement::Advisory))
            .build()
            .unwrap();

        let resource = Resource::new("bucket", "b");
        let mut cx = CheckContext::new(&resource);
        registry.get("flag").unwrap().check(&mut cx).unwrap();
        assert_eq!(cx.messages(), ["flagged"]);
    }
}
