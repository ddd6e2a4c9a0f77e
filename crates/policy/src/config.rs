//! Host-supplied pack configuration.
//!
//! A pack of rules ships with author-chosen severities; deployments re-level
//! or disable individual rules without forking the pack. Configuration is
//! plain data, so hosts can embed it in whatever config format they already
//! parse:
//!
//! ```rust
//! use rampart_policy::config::PackConfig;
//!
//! let config: PackConfig = serde_json::from_str(
//!     r#"{
//!         "name": "baseline",
//!         "rules": {
//!             "kms-key-rotation": "advisory",
//!             "vpc-flow-logs-enabled": "disabled"
//!         }
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(config.rules.len(), 2);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::violation::Severity;

/// Per-rule enforcement override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Keep the rule, report its violations as advisory.
    Advisory,
    /// Keep the rule, report its violations as mandatory.
    Mandatory,
    /// Drop the rule from the registry entirely.
    Disabled,
}

impl Enforcement {
    /// Severity a kept rule reports with; `None` when the rule is disabled.
    #[must_use]
    pub fn as_severity(self) -> Option<Severity> {
        match self {
            Self::Advisory => Some(Severity::Advisory),
            Self::Mandatory => Some(Severity::Mandatory),
            Self::Disabled => None,
        }
    }
}

/// Deployment-side shaping of a rule pack, applied when the registry is
/// built. Unconfigured rules keep their registered severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Pack label carried into evaluator tracing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rule id to enforcement override, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, Enforcement>,
}

impl PackConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            rules: IndexMap::new(),
        }
    }

    /// Adds one override, replacing any earlier override for the same id.
    #[must_use]
    pub fn rule(mut self, id: impl Into<String>, enforcement: Enforcement) -> Self {
        self.rules.insert(id.into(), enforcement);
        self
    }
}
