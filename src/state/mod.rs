//! Form session state

mod array;
mod field;
mod form_state;
mod submit;

pub use field::{ErrorDisplay, FieldStatus, IndexRekey, StoreOptions};
pub use form_state::FormStore;
pub use submit::{FormPhase, LogSubmitHandler, SubmitHandler, SubmitOutcome};

#[cfg(test)]
pub use submit::MockSubmitHandler;
