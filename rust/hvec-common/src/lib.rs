//! Core definitions (errors, results and status codes), relied upon by all hvec-* crates.

pub mod error;
pub mod result;

pub use error::{Error, ErrorKind, Status};
pub use result::Result;
