//! Ready-made form definitions

mod registration;

pub use registration::*;
