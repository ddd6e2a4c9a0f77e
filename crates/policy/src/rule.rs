//! The rule contract: what a validation rule is and what it may look at.

use std::borrow::Cow;
use std::fmt;

use crate::props::{PropertyAccessor, TypeMismatch};
use crate::resource::Resource;
use crate::violation::Severity;

/// Returned by a rule that could not complete its check.
///
/// The evaluator converts this into a synthetic mandatory violation and
/// moves on to the remaining rules; it never aborts the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for RuleError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for RuleError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Everything a rule may look at while checking one resource, and the only
/// channel it reports through.
///
/// A fresh context is created for every rule invocation, so nothing leaks
/// between rules or between resources.
pub struct CheckContext<'r> {
    resource: &'r Resource,
    props: PropertyAccessor<'r>,
    messages: Vec<String>,
}

impl<'r> CheckContext<'r> {
    #[must_use]
    pub fn new(resource: &'r Resource) -> Self {
        Self {
            resource,
            props: PropertyAccessor::new(resource.properties()),
            messages: Vec::new(),
        }
    }

    /// The resource under check.
    #[must_use]
    pub fn resource(&self) -> &'r Resource {
        self.resource
    }

    /// Typed access into the resource's properties.
    #[must_use]
    pub fn props(&self) -> &PropertyAccessor<'r> {
        &self.props
    }

    /// Records one violation message against the resource under check.
    /// A rule may report any number of times; each becomes one violation.
    pub fn report(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Messages reported so far, in report order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<TypeMismatch>) {
        let mismatches = self.props.take_mismatches();
        (self.messages, mismatches)
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("resource", &self.resource.name())
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

/// A named, pure check over one resource.
///
/// Rules are registered once at startup and shared read-only with every
/// evaluation afterwards; they must not carry per-invocation state. The
/// same inputs always produce the same reports.
pub trait Rule: Send + Sync {
    /// Identifier unique within a registry and stable across runs.
    fn id(&self) -> &str;

    /// One-line description of what the rule enforces.
    fn description(&self) -> &str;

    /// Severity attached to every violation this rule reports.
    fn severity(&self) -> Severity {
        Severity::Mandatory
    }

    /// Whether the rule wants to see resources of this type.
    fn applies_to(&self, resource_type: &str) -> bool;

    /// Inspects the resource and reports findings through the context.
    fn check(&self, cx: &mut CheckContext<'_>) -> Result<(), RuleError>;
}

/// Which resource types a rule applies to: one type tag, or any of a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    One(Cow<'static, str>),
    Any(Vec<Cow<'static, str>>),
}

impl TypeSelector {
    pub fn one(resource_type: impl Into<Cow<'static, str>>) -> Self {
        Self::One(resource_type.into())
    }

    pub fn any<I, T>(resource_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        Self::Any(resource_types.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn matches(&self, resource_type: &str) -> bool {
        match self {
            Self::One(tag) => tag == resource_type,
            Self::Any(tags) => tags.iter().any(|tag| tag == resource_type),
        }
    }
}

impl From<&'static str> for TypeSelector {
    fn from(resource_type: &'static str) -> Self {
        Self::one(resource_type)
    }
}

impl From<String> for TypeSelector {
    fn from(resource_type: String) -> Self {
        Self::one(resource_type)
    }
}

impl<const N: usize> From<[&'static str; N]> for TypeSelector {
    fn from(resource_types: [&'static str; N]) -> Self {
        Self::any(resource_types)
    }
}

type CheckFn = dyn Fn(&mut CheckContext<'_>) -> Result<(), RuleError> + Send + Sync;

/// A rule assembled from parts at runtime.
///
/// This is the extension point for host-defined rules that do not warrant a
/// dedicated type:
///
/// ```rust
/// use rampart_policy::rule::FnRule;
/// use rampart_policy::violation::Severity;
///
/// let rule = FnRule::new("bucket-versioning", "bucket", |cx| {
///     if !cx.props().get_bool("versioned", false) {
///         cx.report(format!(
///             "Versioning is not enabled for the bucket `{}`",
///             cx.resource().name()
///         ));
///     }
///     Ok(())
/// })
/// .describe("Buckets must keep object versions")
/// .with_severity(Severity::Advisory);
/// ```
pub struct FnRule {
    id: Cow<'static, str>,
    description: Cow<'static, str>,
    selector: TypeSelector,
    severity: Severity,
    check: Box<CheckFn>,
}

impl FnRule {
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        applies_to: impl Into<TypeSelector>,
        check: impl Fn(&mut CheckContext<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            description: Cow::Borrowed(""),
            selector: applies_to.into(),
            severity: Severity::Mandatory,
            check: Box::new(check),
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for FnRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn applies_to(&self, resource_type: &str) -> bool {
        self.selector.matches(resource_type)
    }

    fn check(&self, cx: &mut CheckContext<'_>) -> Result<(), RuleError> {
        (self.check)(cx)
    }
}

impl fmt::Debug for FnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("id", &self.id)
            .field("selector", &self.selector)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}
