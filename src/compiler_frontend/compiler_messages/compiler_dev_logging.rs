// FILTER LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_filters")]
macro_rules! filter_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_filters"))]
macro_rules! filter_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// Extra timer logging
#[macro_export]
#[cfg(feature = "detailed_timers")]
macro_rules! timer_log {
    ($time:expr, $msg:expr) => {
        saying::say!($msg, Green #$time.elapsed());
    };
}

#[macro_export]
#[cfg(not(feature = "detailed_timers"))]
macro_rules! timer_log {
    ($time:expr, $msg:expr) => {
        // Nothing
    };
}

// COMMAND STREAM LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_commands")]
macro_rules! command_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_commands"))]
macro_rules! command_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// OPTIMIZATION PASS LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_passes")]
macro_rules! pass_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_passes"))]
macro_rules! pass_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// TYPE INFERENCE LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_types")]
macro_rules! type_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_types"))]
macro_rules! type_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}

// SOURCE IDENTIFIER LOGGING MACROS
#[macro_export]
#[cfg(feature = "show_identifiers")]
macro_rules! identifier_log {
    ($($arg:tt)*) => {
        saying::say!($($arg)*);
    };
}

#[macro_export]
#[cfg(not(feature = "show_identifiers"))]
macro_rules! identifier_log {
    ($($arg:tt)*) => {
        // Nothing
    };
}
