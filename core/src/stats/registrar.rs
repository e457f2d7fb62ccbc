//! Statistics Regisration

use super::StatsAccumulator;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Return the global registrar for statistics.
pub fn stats_registrar() -> &'static Mutex<StatsRegistrar> {
    static DATA: OnceLock<Mutex<StatsRegistrar>> = OnceLock::new();
    DATA.get_or_init(|| Mutex::new(StatsRegistrar::default()))
}

/// Locks the global registrar for statistics, recovering from a poisoned lock.
pub fn lock_stats_registrar() -> MutexGuard<'static, StatsRegistrar> {
    stats_registrar().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers callback functions for statistics.
#[derive(Default)]
pub struct StatsRegistrar {
    /// Callback functions.
    stats_funcs: Vec<fn(&mut StatsAccumulator)>,
}

impl StatsRegistrar {
    /// Register a callback function for reporting statistics.
    ///
    /// * `func` - A callback function that takes a `StatsAccumulator` to report statistics.
    pub fn register_stat_func(&mut self, func: fn(&mut StatsAccumulator)) {
        self.stats_funcs.push(func);
    }

    /// Call all callback functions for reporting statistics.
    ///
    /// * `accum` - Accumulator that receives the thread's statistics.
    pub fn call_stat_funcs(&self, accum: &mut StatsAccumulator) {
        self.stats_funcs.iter().for_each(|func| {
            func(accum);
        });
    }
}
