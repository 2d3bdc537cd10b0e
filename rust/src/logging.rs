//! Logging macros for the engine with verbosity level control.
//!
//! Logging is a single integer comparison when disabled (verbosity=0).
//! Levels:
//! - 0: SILENT (only failures)
//! - 1: SUMMARY (one line per pass, cycle and failure reports)
//! - 2: CHECKS (dropped dependencies, defaulted durations, duplicate ids)
//! - 3: DEBUG (every early/late time update)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log an unexpected failure. Printed at every verbosity level.
#[macro_export]
macro_rules! log_failure {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for input normalization: dropped edges, defaulted values.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
