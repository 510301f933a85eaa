//! Form state store

use super::array::ListTemplates;
use super::field::{ErrorDisplay, FieldStatus, StoreOptions};
use super::submit::FormPhase;
use crate::error::{EngineError, Result};
use crate::rules::{ErrorMap, RuleSet};
use crate::value::{self, FieldPath, FormValue};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Values, touched flags and derived errors for one form session
///
/// Every mutation goes through `&mut self` while rules only ever see
/// `&FormValue`, so a rule cannot feed a change back into the store
/// halfway through recomputing the error map.
#[derive(Debug, Clone)]
pub struct FormStore {
    id: Uuid,
    initial: FormValue,
    pub(super) values: FormValue,
    pub(super) rules: RuleSet,
    pub(super) touched: BTreeSet<FieldPath>,
    /// Paths that went through `apply_change`; never shrinks until reset
    pub(super) changed: BTreeSet<FieldPath>,
    pub(super) templates: ListTemplates,
    errors: ErrorMap,
    pub(super) options: StoreOptions,
    pub(super) phase: FormPhase,
    pub(super) submit_count: u32,
}

impl FormStore {
    /// Create a store with default options
    pub fn new(initial: FormValue, rules: RuleSet) -> Result<Self> {
        Self::with_options(initial, rules, StoreOptions::default())
    }

    /// Create a store; fails if a rule does not fit the initial snapshot
    pub fn with_options(initial: FormValue, rules: RuleSet, options: StoreOptions) -> Result<Self> {
        rules.check_against(&initial)?;
        let templates = ListTemplates::capture(&initial)?;
        let errors = rules.validate(&initial);
        let id = Uuid::new_v4();
        tracing::debug!(form_id = %id, fields = rules.fields().len(), "form store created");
        Ok(Self {
            id,
            values: initial.clone(),
            initial,
            rules,
            touched: BTreeSet::new(),
            changed: BTreeSet::new(),
            templates,
            errors,
            options,
            phase: FormPhase::Editing,
            submit_count: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn values(&self) -> &FormValue {
        &self.values
    }

    pub fn initial(&self) -> &FormValue {
        &self.initial
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Every current validation failure, regardless of display policy
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn touched(&self) -> &BTreeSet<FieldPath> {
        &self.touched
    }

    pub fn is_touched(&self, path: &FieldPath) -> bool {
        self.touched.contains(path)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    pub fn get(&self, path: &FieldPath) -> Result<&FormValue> {
        value::get(&self.values, path)
    }

    /// Replace the value at `path`
    ///
    /// The replacement must keep the form's shape. The touched set is left
    /// alone, the field stops being pristine and errors are recomputed.
    pub fn apply_change(&mut self, path: &FieldPath, new_value: FormValue) -> Result<()> {
        let current = self.get(path)?;
        if !current.same_shape(&new_value) {
            return Err(EngineError::ShapeMismatch {
                path: path.clone(),
                expected: current.kind(),
                found: new_value.kind(),
            });
        }
        self.templates.check(path, &new_value)?;
        self.values = value::set(&self.values, path, new_value)?;
        self.changed.insert(path.clone());
        tracing::debug!(form_id = %self.id, %path, "field changed");
        self.after_edit();
        Ok(())
    }

    /// Mark `path` as touched
    pub fn apply_blur(&mut self, path: &FieldPath) -> Result<()> {
        self.get(path)?;
        if self.touched.insert(path.clone()) {
            tracing::debug!(form_id = %self.id, %path, "field touched");
        }
        Ok(())
    }

    /// Restore the initial snapshot and forget all interaction
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.changed.clear();
        self.phase = FormPhase::Editing;
        self.submit_count = 0;
        self.revalidate();
        tracing::debug!(form_id = %self.id, "form reset");
    }

    /// Error for `path` if the display policy lets it show
    pub fn errors_for(&self, path: &FieldPath) -> Option<&str> {
        if !self.is_visible(path) {
            return None;
        }
        self.errors.get(path).map(String::as_str)
    }

    /// The error map filtered by the display policy
    pub fn visible_errors(&self) -> ErrorMap {
        self.errors
            .iter()
            .filter(|(path, _)| self.is_visible(path))
            .map(|(path, message)| (path.clone(), message.clone()))
            .collect()
    }

    /// Re-run the rules for one field against the current values
    pub fn validate_field(&self, path: &FieldPath) -> Option<String> {
        self.rules.validate_field(&self.values, path)
    }

    /// Pristine until the field (or a value above it) is blurred or changed
    pub fn field_status(&self, path: &FieldPath) -> FieldStatus {
        let changed = self.changed.iter().any(|c| path.starts_with(c));
        if !self.is_touched(path) && !changed {
            FieldStatus::Pristine
        } else if self.errors.contains_key(path) {
            FieldStatus::TouchedInvalid
        } else {
            FieldStatus::TouchedValid
        }
    }

    /// Whether the value at `path` differs from the initial snapshot
    pub fn is_dirty(&self, path: &FieldPath) -> bool {
        let now = value::lookup(&self.values, path).ok().flatten();
        let then = value::lookup(&self.initial, path).ok().flatten();
        now != then
    }

    pub fn is_form_dirty(&self) -> bool {
        self.values != self.initial
    }

    fn is_visible(&self, path: &FieldPath) -> bool {
        match self.options.error_display {
            ErrorDisplay::Always => true,
            ErrorDisplay::Touched => self.touched.contains(path),
        }
    }

    pub(super) fn after_edit(&mut self) {
        self.revalidate();
        if matches!(self.phase, FormPhase::Submitted { .. }) {
            self.phase = FormPhase::Editing;
        }
    }

    pub(super) fn revalidate(&mut self) {
        self.errors = self.rules.validate(&self.values);
    }
}
