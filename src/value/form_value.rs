//! Form value trees

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current form data: text leaves, named records and ordered lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Scalar(String),
    List(Vec<FormValue>),
    Record(BTreeMap<String, FormValue>),
}

impl Default for FormValue {
    fn default() -> Self {
        FormValue::Scalar(String::new())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Scalar(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Scalar(value)
    }
}

impl FormValue {
    /// Create a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Scalar(value.into())
    }

    /// Create a record from `(name, value)` pairs
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FormValue)>,
    {
        FormValue::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a list
    pub fn list(items: impl IntoIterator<Item = FormValue>) -> Self {
        FormValue::List(items.into_iter().collect())
    }

    /// Short name of the variant, used in shape errors
    pub fn kind(&self) -> &'static str {
        match self {
            FormValue::Scalar(_) => "scalar",
            FormValue::List(_) => "list",
            FormValue::Record(_) => "record",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, FormValue>> {
        match self {
            FormValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Empty text or empty list; records are never empty
    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Scalar(s) => s.is_empty(),
            FormValue::List(items) => items.is_empty(),
            FormValue::Record(_) => false,
        }
    }

    /// Whether `other` may replace this value without changing the form's shape
    ///
    /// Scalars accept scalars. Records need the same field names with
    /// compatible children. Lists accept any list whose elements fit the
    /// first existing element.
    pub fn same_shape(&self, other: &FormValue) -> bool {
        match (self, other) {
            (FormValue::Scalar(_), FormValue::Scalar(_)) => true,
            (FormValue::Record(a), FormValue::Record(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_shape(vb))
            }
            (FormValue::List(a), FormValue::List(b)) => match a.first() {
                Some(template) => b.iter().all(|item| template.same_shape(item)),
                None => true,
            },
            _ => false,
        }
    }
}
