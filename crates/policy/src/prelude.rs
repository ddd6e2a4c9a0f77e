//! Prelude module for convenient imports.
//!
//! Provides a single `use rampart_policy::prelude::*;` import that brings in
//! everything a host or a rule pack typically touches.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rampart_policy::prelude::*;
//!
//! let registry = RegistryBuilder::new()
//!     .register(volume_encryption())?
//!     .build()?;
//! let evaluator = Evaluator::new(registry);
//! ```

pub use crate::config::{Enforcement, PackConfig};
pub use crate::error::PolicyError;
pub use crate::evaluate::{BatchResult, Diagnostic, EvaluationResult, Evaluator};
pub use crate::props::{
    PathSegment, PropertyAccessor, PropertyPath, TypeMismatch, coerce_i64, value_type_name,
};
pub use crate::registry::{Registry, RegistryBuilder};
pub use crate::resource::Resource;
pub use crate::rule::{CheckContext, FnRule, Rule, RuleError, TypeSelector};
pub use crate::violation::{Severity, Violation, ViolationKind};
