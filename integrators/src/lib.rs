//! Integrators

#[macro_use]
extern crate log;

mod volpath;

// Re-export.
pub use volpath::*;
