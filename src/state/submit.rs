//! Submission gating

use super::form_state::FormStore;
use crate::rules::ErrorMap;
use crate::value::FormValue;
use chrono::{DateTime, Utc};

/// Form-level lifecycle, separate from per-field status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    /// Last submit attempt passed validation; cleared by the next edit
    Submitted { at: DateTime<Utc> },
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// Validation failed; every rule-bearing field is now touched
    Rejected { errors: ErrorMap },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Receives the final values of a form that passed validation
#[cfg_attr(test, mockall::automock)]
pub trait SubmitHandler {
    fn on_submit(&mut self, values: &FormValue);
}

/// Handler that writes submitted values to the log as JSON
#[derive(Debug, Clone)]
pub struct LogSubmitHandler {
    form: String,
}

impl LogSubmitHandler {
    pub fn new(form: impl Into<String>) -> Self {
        Self { form: form.into() }
    }
}

impl SubmitHandler for LogSubmitHandler {
    fn on_submit(&mut self, values: &FormValue) {
        match serde_json::to_string(values) {
            Ok(json) => tracing::info!(form = %self.form, values = %json, "form submitted"),
            Err(e) => tracing::warn!(form = %self.form, "could not encode submitted values: {e}"),
        }
    }
}

impl FormStore {
    /// Validate everything and hand the values to `handler` if clean
    ///
    /// On failure the handler is not called and every field carrying a rule
    /// is marked touched so its error becomes visible.
    pub fn submit(&mut self, handler: &mut dyn SubmitHandler) -> SubmitOutcome {
        self.submit_count += 1;
        self.revalidate();

        if !self.is_valid() {
            let paths = self.rules.rule_paths(&self.values);
            self.touched.extend(paths);
            let errors = self.errors().clone();
            tracing::warn!(
                form_id = %self.id(),
                attempt = self.submit_count,
                errors = errors.len(),
                "submit rejected"
            );
            return SubmitOutcome::Rejected { errors };
        }

        handler.on_submit(&self.values);
        self.phase = FormPhase::Submitted { at: Utc::now() };
        tracing::info!(form_id = %self.id(), attempt = self.submit_count, "submit accepted");
        SubmitOutcome::Submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleSet, ValidationRule};
    use crate::value::FieldPath;
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    fn registration(name: &str, email: &str, password: &str) -> FormValue {
        FormValue::record([
            ("name", FormValue::text(name)),
            ("email", FormValue::text(email)),
            ("password", FormValue::text(password)),
        ])
    }

    fn store(value: FormValue) -> FormStore {
        let rules = RuleSet::new()
            .field("name", [ValidationRule::required("Required")])
            .unwrap()
            .field(
                "email",
                [
                    ValidationRule::required("Required"),
                    ValidationRule::email("Invalid email format"),
                ],
            )
            .unwrap()
            .field("password", [ValidationRule::min_length(8, "too short")])
            .unwrap();
        FormStore::new(value, rules).unwrap()
    }

    #[test]
    fn test_valid_form_calls_handler_once() {
        let value = registration("Ann", "a@b.com", "Abcdef1!");
        let mut store = store(value.clone());
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_on_submit()
            .withf(move |submitted| submitted == &value)
            .times(1)
            .return_const(());

        let outcome = store.submit(&mut handler);

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert!(matches!(store.phase(), FormPhase::Submitted { .. }));
        assert_eq!(store.submit_count(), 1);
    }

    #[test]
    fn test_invalid_form_never_calls_handler() {
        let mut store = store(registration("", "bad", "short"));
        let mut handler = MockSubmitHandler::new();
        handler.expect_on_submit().times(0).return_const(());

        let outcome = store.submit(&mut handler);

        let SubmitOutcome::Rejected { errors } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(store.phase(), &FormPhase::Editing);
    }

    #[test]
    fn test_rejection_touches_every_ruled_field() {
        let mut store = store(registration("", "a@b.com", "longenough"));
        let mut handler = MockSubmitHandler::new();
        handler.expect_on_submit().times(0).return_const(());

        store.submit(&mut handler);

        for p in ["name", "email", "password"] {
            assert!(store.is_touched(&path(p)), "{p}");
        }
        assert_eq!(store.errors_for(&path("name")), Some("Required"));
    }

    #[test]
    fn test_edit_after_submit_returns_to_editing() {
        let mut store = store(registration("Ann", "a@b.com", "Abcdef1!"));
        let mut handler = MockSubmitHandler::new();
        handler.expect_on_submit().times(1).return_const(());
        assert!(store.submit(&mut handler).is_submitted());

        store.apply_change(&path("name"), FormValue::text("Bob")).unwrap();
        assert_eq!(store.phase(), &FormPhase::Editing);
    }

    #[test]
    fn test_submit_count_tracks_attempts_until_reset() {
        let mut store = store(registration("", "", ""));
        let mut handler = MockSubmitHandler::new();
        handler.expect_on_submit().times(0).return_const(());
        store.submit(&mut handler);
        store.submit(&mut handler);
        assert_eq!(store.submit_count(), 2);
        store.reset();
        assert_eq!(store.submit_count(), 0);
    }
}
