//! # rampart-policy
//!
//! A policy engine for validating declared infrastructure resources before
//! a provisioning host applies them.
//!
//! Hosts register [`Rule`](rule::Rule)s into a [`Registry`](registry::Registry),
//! freeze it, and run an [`Evaluator`](evaluate::Evaluator) over each batch
//! of resources. The output is per-resource [`Violation`](violation::Violation)s
//! plus one gating signal: does anything mandatory block the change?
//!
//! ## Quick Start
//!
//! ```rust
//! use rampart_policy::prelude::*;
//!
//! # fn main() -> Result<(), PolicyError> {
//! let registry = RegistryBuilder::new()
//!     .register(FnRule::new("volume-encryption", "storage-volume", |cx| {
//!         if !cx.props().get_bool("encrypted", false) {
//!             cx.report(format!(
//!                 "Encryption is not enabled for the storage volume `{}`",
//!                 cx.resource().name()
//!             ));
//!         }
//!         Ok(())
//!     }))?
//!     .build()?;
//!
//! let evaluator = Evaluator::new(registry);
//! let batch = evaluator.evaluate_batch(&[
//!     Resource::new("storage-volume", "data"),
//! ]);
//! assert!(batch.has_blocking_violations());
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing Rules
//!
//! Use the [`rule!`] macro for single-condition rules,
//! [`FnRule`](rule::FnRule) for closures, or implement
//! [`Rule`](rule::Rule) manually for rules with several distinct messages.
//!
//! Rules are isolated: one that returns [`RuleError`](rule::RuleError) or
//! panics becomes a synthetic mandatory violation on the affected resource
//! and the remaining rules still run.

pub mod config;
pub mod error;
pub mod evaluate;
mod macros;
pub mod prelude;
pub mod props;
pub mod registry;
pub mod resource;
pub mod rule;
pub mod violation;
