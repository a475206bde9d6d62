// Field validation - tagged rules evaluated by a pure validator

pub mod errors;
pub mod format;
pub mod rules;
pub mod validator;

pub use errors::ValidationError;
pub use rules::{Check, Condition, DateAnchor, DateBound, FieldRule, Rule, RuleSet};
pub use validator::{validate, FieldStatus, ValidationReport};
