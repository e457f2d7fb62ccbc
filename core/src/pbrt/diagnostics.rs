//! Diagnostics

use std::sync::Mutex;

/// Reports warnings and errors through `log`, dropping a message when it is
/// identical to the one reported immediately before it.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Suppress warnings.
    quiet: bool,

    /// The last reported message.
    last: Mutex<Option<String>>,
}

impl Diagnostics {
    /// Create a new `Diagnostics`.
    ///
    /// * `quiet` - Suppress warnings.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            last: Mutex::new(None),
        }
    }

    /// Report a warning unless `quiet` is set.
    ///
    /// * `msg` - The message.
    pub fn warning(&self, msg: &str) {
        if !self.quiet && self.is_new(msg) {
            warn!("{}", msg);
        }
    }

    /// Report an error.
    ///
    /// * `msg` - The message.
    pub fn error(&self, msg: &str) {
        if self.is_new(msg) {
            error!("{}", msg);
        }
    }

    /// Records `msg` as the last message and returns `true` if it differs from
    /// the previous one.
    ///
    /// * `msg` - The message.
    fn is_new(&self, msg: &str) -> bool {
        // A poisoned lock only means another thread panicked mid-report.
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last.as_deref() == Some(msg) {
            false
        } else {
            *last = Some(msg.to_string());
            true
        }
    }
}

// ---- Tests ----
