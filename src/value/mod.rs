//! Value trees and the paths that address them

mod form_value;
mod path;
pub mod resolver;

pub use form_value::FormValue;
pub use path::{FieldPath, PathSegment};
pub use resolver::{get, lookup, set, update};
