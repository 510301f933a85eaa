//! Form Engine - form state and validation without a UI
//!
//! Holds the values of a form as a tree, tracks which fields the user has
//! touched, runs declarative rule chains and gates submission on the
//! result. Rendering is left to whatever drives the engine.
//!
//! ```rust,ignore
//! use form_engine::forms::FormKind;
//! use form_engine::state::LogSubmitHandler;
//!
//! let mut store = FormKind::Schema.definition()?.into_store()?;
//! store.apply_change(&"name".parse()?, "Ann".into())?;
//! store.apply_blur(&"name".parse()?)?;
//! let outcome = store.submit(&mut LogSubmitHandler::new("schema"));
//! ```

pub mod config;
pub mod error;
pub mod forms;
pub mod rules;
pub mod session;
pub mod state;
pub mod value;

pub use error::{EngineError, Result};
pub use rules::{ErrorMap, RuleSet, ValidationRule};
pub use state::{FormStore, SubmitHandler, SubmitOutcome};
pub use value::{FieldPath, FormValue};
