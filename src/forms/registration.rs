//! Registration form presets

use crate::error::Result;
use crate::rules::{RuleSet, ValidationRule};
use crate::state::{ErrorDisplay, FormStore, StoreOptions};
use crate::value::FormValue;
use std::fmt;
use std::str::FromStr;

pub const REQUIRED: &str = "Required";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_NEEDS_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_NEEDS_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NEEDS_NUMBER: &str = "Password must contain at least one number";
pub const PASSWORD_NEEDS_SPECIAL: &str = "Password must contain at least one special character";
pub const FRIENDS_EMPTY: &str = "Add at least one friend";

/// The registration forms this crate ships
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormKind {
    /// Hand-written checks, errors shown from the start
    Basic,
    /// Declared rule chains, errors shown once a field is touched
    #[default]
    Schema,
    /// Schema form plus nested socials, phone numbers and a friends list
    Profile,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::Basic, FormKind::Schema, FormKind::Profile];

    pub fn name(self) -> &'static str {
        match self {
            FormKind::Basic => "basic",
            FormKind::Schema => "schema",
            FormKind::Profile => "profile",
        }
    }

    /// Initial values, rules and display options for this form
    pub fn definition(self) -> Result<FormDefinition> {
        let (initial, rules, error_display) = match self {
            FormKind::Basic => (credentials(), credential_rules()?, ErrorDisplay::Always),
            FormKind::Schema => (credentials(), credential_rules()?, ErrorDisplay::Touched),
            FormKind::Profile => (profile(), profile_rules()?, ErrorDisplay::Touched),
        };
        Ok(FormDefinition {
            kind: self,
            initial,
            rules,
            options: StoreOptions {
                error_display,
                ..StoreOptions::default()
            },
        })
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown form `{s}` (expected basic, schema or profile)"))
    }
}

/// Everything needed to open a form session
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub kind: FormKind,
    pub initial: FormValue,
    pub rules: RuleSet,
    pub options: StoreOptions,
}

impl FormDefinition {
    /// Replace the store options, keeping values and rules
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn into_store(self) -> Result<FormStore> {
        FormStore::with_options(self.initial, self.rules, self.options)
    }
}

fn credentials() -> FormValue {
    FormValue::record([
        ("name", FormValue::text("")),
        ("email", FormValue::text("")),
        ("password", FormValue::text("")),
    ])
}

fn profile() -> FormValue {
    FormValue::record([
        ("name", FormValue::text("")),
        ("email", FormValue::text("")),
        ("password", FormValue::text("")),
        (
            "socials",
            FormValue::record([
                ("facebook", FormValue::text("")),
                ("twitter", FormValue::text("")),
            ]),
        ),
        (
            "phonenumbers",
            FormValue::list([FormValue::text(""), FormValue::text("")]),
        ),
        ("friends", FormValue::list([FormValue::text("")])),
    ])
}

fn password_rules() -> Result<Vec<ValidationRule>> {
    Ok(vec![
        ValidationRule::required(REQUIRED),
        ValidationRule::min_length(8, PASSWORD_TOO_SHORT),
        ValidationRule::contains("[A-Z]", PASSWORD_NEEDS_UPPERCASE)?,
        ValidationRule::contains("[a-z]", PASSWORD_NEEDS_LOWERCASE)?,
        ValidationRule::contains("[0-9]", PASSWORD_NEEDS_NUMBER)?,
        ValidationRule::contains("[@$!%*?&]", PASSWORD_NEEDS_SPECIAL)?,
    ])
}

fn credential_rules() -> Result<RuleSet> {
    RuleSet::new()
        .field("name", [ValidationRule::required(REQUIRED)])?
        .field(
            "email",
            [
                ValidationRule::required(REQUIRED),
                ValidationRule::email(INVALID_EMAIL),
            ],
        )?
        .field("password", password_rules()?)
}

fn profile_rules() -> Result<RuleSet> {
    let socials = RuleSet::new()
        .field("facebook", [ValidationRule::required(REQUIRED)])?
        .field("twitter", [ValidationRule::required(REQUIRED)])?;

    credential_rules()?
        .field("socials", [ValidationRule::nested(socials)])?
        .field("phonenumbers[0]", [ValidationRule::required(REQUIRED)])?
        .field(
            "friends",
            [
                ValidationRule::min_items(1, FRIENDS_EMPTY),
                ValidationRule::each([ValidationRule::required(REQUIRED)]),
            ],
        )
}
