//! Common numeric helpers and the rendering context.

mod common;
mod diagnostics;
mod options;

// Re-export
pub use common::*;
pub use diagnostics::*;
pub use options::*;
