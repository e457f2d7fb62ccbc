//! Macros

/// Create a thread local variable to track an `i64` counter across threads.
///
/// * `$title`     - Descriptive title of the statistic that uses `/` as a separator for categories.
///                  For example: "Integrator/Surface interactions",
/// * `$var`       - An identifier for the thread local variable.
/// * `stats_func` - An identifier for the callback function used by `StatsRegistrar::call_stats_funcs() to report to
///                 `StatsAccumulator`.
#[macro_export]
macro_rules! stat_counter {
    ($title: expr, $var: ident, $stats_func: ident $(,)?) => {
        thread_local! { pub static $var: std::cell::RefCell<i64> = std::cell::RefCell::new(0); }

        pub fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            // Report thread stats.
            let val = $var.with(|v| v.replace(0));
            accum.report_counter($title, val);
        }
    };
}

/// Create a thread local variable to track an integer distribution across threads.
///
/// * `$title`     - Descriptive title of the statistic that uses `/` as a separator for categories.
///                  For example: "Integrator/Path length",
/// * `$var`       - An identifier for the thread local variable.
/// * `stats_func` - An identifier for the callback function used by `StatsRegistrar::call_stats_funcs() to report to
///                 `StatsAccumulator`.
#[macro_export]
macro_rules! stat_int_distribution {
    ($title: expr, $var: ident, $stats_func: ident $(,)?) => {
        thread_local! {
            pub static $var: std::cell::RefCell<$crate::stats::StatsDistribution<i64>> =
                std::cell::RefCell::new($crate::stats::StatsDistribution::default());
        }

        pub fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            // Report thread stats.
            let val = $var.with(|v| v.replace($crate::stats::StatsDistribution::default()));
            accum.report_int_distribution($title, val);
        }
    };
}

/// Create thread local variables to track an `i64` values for numerator/denominator as percentage across threads.
///
/// * `$title`     - Descriptive title of the statistic that uses `/` as a separator for categories.
///                  For example: "Integrator/Zero-radiance paths",
/// * `$var_num`   - An identifier for the thread local variable for numerator (actual count).
/// * `$var_denom` - An identifier for the thread local variable for denominator (total count).
/// * `stats_func` - An identifier for the callback function used by `StatsRegistrar::call_stats_funcs() to report to
///                 `StatsAccumulator`.
#[macro_export]
macro_rules! stat_percent {
    ($title: expr, $var_num: ident, $var_denom: ident, $stats_func: ident $(,)?) => {
        thread_local! {
            pub static $var_num: std::cell::RefCell<i64> = std::cell::RefCell::new(0);
            pub static $var_denom: std::cell::RefCell<i64> = std::cell::RefCell::new(0);
        }

        pub fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            // Report thread stats.
            let num = $var_num.with(|v| v.replace(0));
            let denom = $var_denom.with(|v| v.replace(0));
            accum.report_percentage($title, num, denom);
        }
    };
}

/// Convenience macro to increment a thread local variable for counter/percent statistics.
#[macro_export]
macro_rules! stat_inc {
    ($var: ident, $e: expr) => {
        $var.with(|v| *v.borrow_mut() += $e);
    };
}

/// Convenience macro to report a thread local variable for int distribution statistics.
#[macro_export]
macro_rules! stat_dist {
    ($var: ident, $e: expr) => {
        $var.with(|v| v.borrow_mut().report($e));
    };
}

/// Convenience macro to register the callback functions for statistics.
///
/// * `$($func: ident),+` - One or more callback functions created by the `stat_*` macros.
#[macro_export]
macro_rules! stat_register_fns {
    ($($stat_func: ident),+ $(,)?) => {
        /// Call this function in a module's top-level constructor to register the statistics. Registration happens
        /// once per module.
        pub fn register_stats() {
            static REGISTERED: std::sync::Once = std::sync::Once::new();
            REGISTERED.call_once(|| {
                let mut sr = $crate::stats::lock_stats_registrar();
                $(
                    sr.register_stat_func($stat_func);
                )+
            });
        }
    };
}

/// Convenience function to accumulate thread local statistics in the global `StatsAccumulator`. This will call the
/// registered callbacks created with `stat_*` macros. This should be called at the end of each spawned thread and at
/// the end of rendering a scene from the main thread.
#[macro_export]
macro_rules! report_stats {
    () => {{
        let mut accum = $crate::stats::lock_stats_accumulator();
        $crate::stats::lock_stats_registrar().call_stat_funcs(&mut accum);
    }};
}

/// Convenience function to print accumulated statistic in the global `StatsAccumulator`.
#[macro_export]
macro_rules! print_stats {
    () => {{
        $crate::stats::lock_stats_accumulator().print();
    }};
}

/// Convenience function to clear accumulated statistic in the global `StatsAccumulator`.
#[macro_export]
macro_rules! clear_stats {
    () => {{
        $crate::stats::lock_stats_accumulator().clear();
    }};
}
