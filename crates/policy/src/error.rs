//! Registry construction errors.

use thiserror::Error;

/// Startup-time failures while assembling a rule registry.
///
/// Every variant is a misconfiguration the operator has to fix; none of
/// them is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Two rules were registered under the same id. The second registration
    /// is rejected instead of silently shadowing the first.
    #[error("duplicate rule id `{id}`")]
    DuplicateRuleId { id: String },

    /// A rule was registered with an empty id.
    #[error("rule registered with an empty id")]
    EmptyRuleId,

    /// The pack configuration names a rule id that was never registered,
    /// which usually means a typo in the config.
    #[error("pack configuration references unknown rule id `{id}`")]
    UnknownRuleId { id: String },
}
