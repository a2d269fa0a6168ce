//! Shared types for the Glossa dictionary lookup engine.
//!
//! Holds the data model exchanged between the search backends and the query
//! controller, the error taxonomy, the persisted configuration and the text
//! normalization helpers the backends and the controller must agree on.

pub mod error;
pub mod text;
pub mod types;

pub use error::{BackendError, Error, Result};
