//! Rendering Options

use super::Diagnostics;
use std::fmt;
use std::sync::Arc;

/// Immutable rendering context shared by everything that needs global
/// settings. It is built once at startup and handed to constructors.
#[derive(Debug, Default)]
pub struct Options {
    /// Seed mixed into every deterministic random stream.
    pub seed: i32,

    /// Number of worker threads; 0 means use all available cores.
    pub n_threads: usize,

    /// Suppress warnings.
    pub quiet: bool,

    /// Reduce sample counts and path length for previews.
    pub quick_render: bool,

    /// Output image path.
    pub image_file: Option<String>,

    /// Error reporting channel.
    pub diagnostics: Diagnostics,
}

/// Atomic reference counted `Options`.
pub type ArcOptions = Arc<Options>;

impl Options {
    /// Create a new `Options`.
    ///
    /// * `seed`         - Seed for deterministic random streams.
    /// * `n_threads`    - Number of worker threads (0 for all cores).
    /// * `quiet`        - Suppress warnings.
    /// * `quick_render` - Reduce sample counts for previews.
    /// * `image_file`   - Output image path.
    pub fn new(
        seed: i32,
        n_threads: usize,
        quiet: bool,
        quick_render: bool,
        image_file: Option<String>,
    ) -> Self {
        Self {
            seed,
            n_threads,
            quiet,
            quick_render,
            image_file,
            diagnostics: Diagnostics::new(quiet),
        }
    }

    /// Returns the number of threads to use for rendering.
    pub fn threads(&self) -> usize {
        if self.n_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.n_threads
        }
    }

    /// Report a recoverable problem. Suppressed when `quiet` is set.
    ///
    /// * `msg` - The message.
    pub fn warning(&self, msg: &str) {
        self.diagnostics.warning(msg);
    }

    /// Report an error. Rendering continues with a default value.
    ///
    /// * `msg` - The message.
    pub fn error(&self, msg: &str) {
        self.diagnostics.error(msg);
    }
}

impl fmt::Display for Options {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Options {{ seed: {}, n_threads: {}, quiet: {}, quick_render: {}, image_file: {:?} }}",
            self.seed, self.n_threads, self.quiet, self.quick_render, self.image_file
        )
    }
}
