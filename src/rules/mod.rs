//! Declarative validation rules

mod rule;
mod rule_set;

pub use rule::{Predicate, ValidationRule};
pub use rule_set::{ErrorMap, FieldRules, RuleSet};
