use std::sync::OnceLock;

/// Wall-clock stamp shared by every log line.
pub fn stamp() -> String { chrono::Utc::now().format("%H:%M:%S%.3f").to_string() }

/// Whether per-tick event lines are wanted, read once from `LOG_LANDER_EVENTS`.
pub fn events_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("LOG_LANDER_EVENTS").is_some())
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_line {
    ($color:literal, $tag:literal, $($arg:tt)*) => {
        println!(concat!("\x1b[", $color, "m", $tag, "[{}]\x1b[0m {}"), $crate::logger::stamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::log_line!("32", "[INFO] ", $($arg)*) };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => { $crate::log_line!("33", "[LOG]  ", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::log_line!("35", "[WARN] ", $($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::log_line!("31", "[ERROR]", $($arg)*) };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", $crate::logger::stamp(), format!($($arg)*))
    };
}

/// Per-tick diagnostics, silent unless `LOG_LANDER_EVENTS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if $crate::logger::events_enabled() {
            $crate::log_line!("36", "[EVENT]", $($arg)*)
        }
    };
}
