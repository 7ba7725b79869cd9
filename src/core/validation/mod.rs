//! Validation system
//!
//! Request bodies are checked against a declarative rule set before they
//! reach the handlers. The `Validated<T>` extractor ties the rule set of an
//! input type to the request pipeline.

pub mod extractor;
pub mod rules;
pub mod validators;

pub use extractor::{ValidatableEntity, Validated};
pub use rules::{RuleSet, rule};
pub use validators::Validator;
