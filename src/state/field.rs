//! Per-field status and display policies

use serde::{Deserialize, Serialize};

/// Where a field stands from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// Neither blurred nor edited
    Pristine,
    TouchedValid,
    TouchedInvalid,
}

impl FieldStatus {
    pub fn is_pristine(self) -> bool {
        matches!(self, FieldStatus::Pristine)
    }
}

/// When validation messages become visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    /// Only for fields in the touched set
    #[default]
    Touched,
    /// Always, including before any interaction
    Always,
}

/// What happens to touched entries below a list index that moved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexRekey {
    /// Shift entries along with their elements
    #[default]
    Rekey,
    /// Drop entries at or above the affected index
    Clear,
}

/// Store behaviour knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    #[serde(default)]
    pub error_display: ErrorDisplay,
    #[serde(default)]
    pub index_rekey: IndexRekey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = StoreOptions::default();
        assert_eq!(options.error_display, ErrorDisplay::Touched);
        assert_eq!(options.index_rekey, IndexRekey::Rekey);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(serde_json::to_string(&ErrorDisplay::Always).unwrap(), "\"always\"");
        assert_eq!(
            serde_json::from_str::<IndexRekey>("\"clear\"").unwrap(),
            IndexRekey::Clear
        );
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: StoreOptions = serde_json::from_str(r#"{"error_display": "always"}"#).unwrap();
        assert_eq!(options.error_display, ErrorDisplay::Always);
        assert_eq!(options.index_rekey, IndexRekey::Rekey);
    }

    #[test]
    fn test_is_pristine() {
        assert!(FieldStatus::Pristine.is_pristine());
        assert!(!FieldStatus::TouchedInvalid.is_pristine());
    }
}
