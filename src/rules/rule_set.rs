//! Rule sets: per-field rule chains and their interpreter

use super::rule::ValidationRule;
use crate::error::{EngineError, Result};
use crate::value::{lookup, FieldPath, FormValue};
use std::collections::BTreeMap;

/// Validation failures keyed by field path; a missing entry means valid
pub type ErrorMap = BTreeMap<FieldPath, String>;

/// The rule chain attached to one field
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub path: FieldPath,
    pub rules: Vec<ValidationRule>,
}

/// Ordered collection of field rule chains
///
/// Paths are relative to the value the set is applied to: the whole form
/// for a top-level set, the record for a set used in
/// [`ValidationRule::Nested`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a rule chain to `path`; each path takes one chain
    pub fn field(
        mut self,
        path: &str,
        rules: impl IntoIterator<Item = ValidationRule>,
    ) -> Result<Self> {
        let path: FieldPath = path.parse()?;
        if self.fields.iter().any(|field| field.path == path) {
            return Err(EngineError::misconfigured(&path, "field already has a rule chain"));
        }
        self.fields.push(FieldRules {
            path,
            rules: rules.into_iter().collect(),
        });
        Ok(self)
    }

    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate the whole tree
    pub fn validate(&self, tree: &FormValue) -> ErrorMap {
        let mut errors = ErrorMap::new();
        self.collect(tree, tree, &FieldPath::root(), None, &mut errors);
        errors
    }

    /// Re-validate a single field
    ///
    /// Only top-level chains whose path lies on the way to `path` (or below
    /// it) are evaluated. Those chains run in full, so a sibling failing
    /// inside a nested or per-element rule still stops the chain and the
    /// answer matches what [`RuleSet::validate`] reports for that path.
    pub fn validate_field(&self, tree: &FormValue, path: &FieldPath) -> Option<String> {
        let mut errors = ErrorMap::new();
        self.collect(tree, tree, &FieldPath::root(), Some(path), &mut errors);
        errors.remove(path)
    }

    /// Every absolute path that carries a rule, expanded over current list elements
    pub fn rule_paths(&self, tree: &FormValue) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        self.gather_paths(tree, &FieldPath::root(), &mut paths);
        paths
    }

    /// Check every rule path and rule kind against the initial snapshot
    pub fn check_against(&self, initial: &FormValue) -> Result<()> {
        self.check_scope(initial, initial, &FieldPath::root())
    }

    fn collect(
        &self,
        root: &FormValue,
        scope: &FormValue,
        base: &FieldPath,
        only: Option<&FieldPath>,
        errors: &mut ErrorMap,
    ) {
        for field in &self.fields {
            let path = base.join(&field.path);
            if only.is_some_and(|target| !path.overlaps(target)) {
                continue;
            }
            // Shapes were checked at construction; a miss here is a removed list element
            let Ok(Some(value)) = lookup(scope, &field.path) else {
                tracing::trace!(%path, "skipping rules for absent value");
                continue;
            };
            run_chain(&field.rules, root, value, &path, errors);
        }
    }

    fn gather_paths(&self, scope: &FormValue, base: &FieldPath, paths: &mut Vec<FieldPath>) {
        for field in &self.fields {
            let path = base.join(&field.path);
            let Ok(Some(value)) = lookup(scope, &field.path) else {
                continue;
            };
            gather_chain(&field.rules, value, &path, paths);
        }
    }

    fn check_scope(&self, root: &FormValue, scope: &FormValue, base: &FieldPath) -> Result<()> {
        for field in &self.fields {
            let path = base.join(&field.path);
            let value = match lookup(scope, &field.path) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    return Err(EngineError::misconfigured(
                        &path,
                        "no such field in the initial value",
                    ))
                }
                Err(err) => return Err(EngineError::misconfigured(&path, err.to_string())),
            };
            check_chain(&field.rules, root, value, &path)?;
        }
        Ok(())
    }
}

/// Run one field's chain; stops at the first rule that reports anything
///
/// An error already recorded for a path is kept.
fn run_chain(
    rules: &[ValidationRule],
    root: &FormValue,
    value: &FormValue,
    path: &FieldPath,
    errors: &mut ErrorMap,
) {
    for rule in rules {
        let mut found = ErrorMap::new();
        match rule {
            ValidationRule::Nested(children) => {
                children.collect(root, value, path, None, &mut found);
            }
            ValidationRule::Each(item_rules) => {
                for (i, item) in value.as_list().unwrap_or_default().iter().enumerate() {
                    run_chain(item_rules, root, item, &path.index(i), &mut found);
                }
            }
            leaf => {
                if let Some(message) = leaf.check(root, value) {
                    found.insert(path.clone(), message.to_string());
                }
            }
        }
        let failed = !found.is_empty();
        for (at, message) in found {
            errors.entry(at).or_insert(message);
        }
        if failed {
            return;
        }
    }
}

fn gather_chain(
    rules: &[ValidationRule],
    value: &FormValue,
    path: &FieldPath,
    paths: &mut Vec<FieldPath>,
) {
    if rules.iter().any(|rule| rule.message().is_some()) {
        paths.push(path.clone());
    }
    for rule in rules {
        match rule {
            ValidationRule::Nested(children) => children.gather_paths(value, path, paths),
            ValidationRule::Each(item_rules) => {
                for (i, item) in value.as_list().unwrap_or_default().iter().enumerate() {
                    gather_chain(item_rules, item, &path.index(i), paths);
                }
            }
            _ => {}
        }
    }
}

fn check_chain(
    rules: &[ValidationRule],
    root: &FormValue,
    value: &FormValue,
    path: &FieldPath,
) -> Result<()> {
    for rule in rules {
        if let Some(expected) = rule.expected_kind() {
            if value.kind() != expected {
                return Err(EngineError::misconfigured(
                    path,
                    format!("rule needs a {expected}, field holds a {}", value.kind()),
                ));
            }
        }
        match rule {
            ValidationRule::Nested(children) => children.check_scope(root, value, path)?,
            ValidationRule::Each(item_rules) => {
                // Elements share a shape, so the first one stands in for all
                if let Some(first) = value.as_list().and_then(<[FormValue]>::first) {
                    check_chain(item_rules, root, first, &path.index(0))?;
                }
            }
            ValidationRule::Matches { other, .. } => {
                if !matches!(lookup(root, other), Ok(Some(_))) {
                    return Err(EngineError::misconfigured(
                        path,
                        format!("compared field `{other}` does not exist"),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
