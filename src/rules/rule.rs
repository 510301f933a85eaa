//! Validation rule kinds

use super::rule_set::RuleSet;
use crate::error::{EngineError, Result};
use crate::value::{FieldPath, FormValue};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Email shape accepted by the registration forms
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$")
        .case_insensitive(true)
        .build()
        .expect("email regex is valid")
});

/// Custom check: `(whole tree, value under the rule) -> passes`
pub type Predicate = Arc<dyn Fn(&FormValue, &FormValue) -> bool + Send + Sync>;

/// One declarative constraint; a field holds an ordered list of these
///
/// Rules are evaluated in declaration order and the first failing rule
/// decides the field's message.
#[derive(Clone)]
pub enum ValidationRule {
    /// Text must be non-empty; lists must have at least one element
    Required { message: String },
    /// Text must match `regex`
    Pattern { regex: Regex, message: String },
    /// Text must hold at least `min` code points
    MinLength { min: usize, message: String },
    /// List must hold at least `min` elements
    MinItems { min: usize, message: String },
    /// Value must equal the value at another absolute path
    Matches { other: FieldPath, message: String },
    /// Arbitrary check over the whole tree and the field value
    Custom { check: Predicate, message: String },
    /// Child rules relative to this record; failures land under the child paths
    Nested(RuleSet),
    /// Rules applied to every element of this list
    Each(Vec<ValidationRule>),
}

impl ValidationRule {
    pub fn required(message: impl Into<String>) -> Self {
        ValidationRule::Required {
            message: message.into(),
        }
    }

    /// Whole-value pattern: `pattern` must match the entire text
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self> {
        Self::compile(&format!("^(?:{pattern})$"), pattern, message)
    }

    /// Partial pattern: `pattern` must match somewhere in the text
    pub fn contains(pattern: &str, message: impl Into<String>) -> Result<Self> {
        Self::compile(pattern, pattern, message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        ValidationRule::Pattern {
            regex: EMAIL_REGEX.clone(),
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        ValidationRule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn min_items(min: usize, message: impl Into<String>) -> Self {
        ValidationRule::MinItems {
            min,
            message: message.into(),
        }
    }

    pub fn matches(other: FieldPath, message: impl Into<String>) -> Self {
        ValidationRule::Matches {
            other,
            message: message.into(),
        }
    }

    pub fn custom<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FormValue, &FormValue) -> bool + Send + Sync + 'static,
    {
        ValidationRule::Custom {
            check: Arc::new(check),
            message: message.into(),
        }
    }

    pub fn nested(rules: RuleSet) -> Self {
        ValidationRule::Nested(rules)
    }

    pub fn each(rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        ValidationRule::Each(rules.into_iter().collect())
    }

    fn compile(source: &str, shown: &str, message: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(source).map_err(|e| EngineError::InvalidPattern {
            pattern: shown.to_string(),
            reason: e.to_string(),
        })?;
        Ok(ValidationRule::Pattern {
            regex,
            message: message.into(),
        })
    }

    /// Kind of value this rule can be attached to, `None` when any kind works
    pub(crate) fn expected_kind(&self) -> Option<&'static str> {
        match self {
            ValidationRule::Pattern { .. } | ValidationRule::MinLength { .. } => Some("scalar"),
            ValidationRule::MinItems { .. } | ValidationRule::Each(_) => Some("list"),
            ValidationRule::Nested(_) => Some("record"),
            ValidationRule::Required { .. }
            | ValidationRule::Matches { .. }
            | ValidationRule::Custom { .. } => None,
        }
    }

    /// Evaluate a leaf rule against `value`; `None` means it passed
    ///
    /// `Nested` and `Each` produce errors under child paths and are
    /// interpreted by the rule set instead; here they always pass.
    pub(crate) fn check(&self, root: &FormValue, value: &FormValue) -> Option<&str> {
        let passed = match self {
            ValidationRule::Required { .. } => !value.is_blank(),
            ValidationRule::Pattern { regex, .. } => {
                value.as_text().map_or(true, |text| regex.is_match(text))
            }
            ValidationRule::MinLength { min, .. } => value
                .as_text()
                .map_or(true, |text| text.chars().count() >= *min),
            ValidationRule::MinItems { min, .. } => {
                value.as_list().map_or(true, |items| items.len() >= *min)
            }
            ValidationRule::Matches { other, .. } => {
                crate::value::lookup(root, other).ok().flatten() == Some(value)
            }
            ValidationRule::Custom { check, .. } => check(root, value),
            ValidationRule::Nested(_) | ValidationRule::Each(_) => true,
        };
        if passed {
            None
        } else {
            self.message()
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationRule::Required { message }
            | ValidationRule::Pattern { message, .. }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::MinItems { message, .. }
            | ValidationRule::Matches { message, .. }
            | ValidationRule::Custom { message, .. } => Some(message),
            ValidationRule::Nested(_) | ValidationRule::Each(_) => None,
        }
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationRule::Required { message } => {
                f.debug_struct("Required").field("message", message).finish()
            }
            ValidationRule::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            ValidationRule::MinLength { min, message } => f
                .debug_struct("MinLength")
                .field("min", min)
                .field("message", message)
                .finish(),
            ValidationRule::MinItems { min, message } => f
                .debug_struct("MinItems")
                .field("min", min)
                .field("message", message)
                .finish(),
            ValidationRule::Matches { other, message } => f
                .debug_struct("Matches")
                .field("other", &other.to_string())
                .field("message", message)
                .finish(),
            ValidationRule::Custom { message, .. } => f
                .debug_struct("Custom")
                .field("message", message)
                .finish_non_exhaustive(),
            ValidationRule::Nested(rules) => f.debug_tuple("Nested").field(rules).finish(),
            ValidationRule::Each(rules) => f.debug_tuple("Each").field(rules).finish(),
        }
    }
}
