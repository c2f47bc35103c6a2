/// Print an informational message
#[macro_export]
macro_rules! info {
    (no_log, $($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            println!("{} {}", $crate::owo_colors::OwoColorize::yellow(&"[info]"), redacted);
        }
        $crate::print::print_to_memory(&redacted, $crate::print::LogType::Info);
    }};

    ($($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            println!("{} {}", $crate::owo_colors::OwoColorize::yellow(&"[info]"), redacted);
        }
        $crate::print::print_to_file(&redacted, $crate::print::LogType::Info);
    }};
}

/// Print an error message
#[macro_export]
macro_rules! err {
    (no_log, $($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            eprintln!("{} {}", $crate::owo_colors::OwoColorize::red(&"[error]"), redacted);
        }
        $crate::print::print_to_memory(&redacted, $crate::print::LogType::Error);
    }};

    ($($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            eprintln!("{} {}", $crate::owo_colors::OwoColorize::red(&"[error]"), redacted);
        }
        $crate::print::print_to_file(&redacted, $crate::print::LogType::Error);
    }};
}

/// Print a point message, i.e. a small step in some process
#[macro_export]
macro_rules! pt {
    (no_log, $($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            println!("{} {}", $crate::owo_colors::OwoColorize::bold(&"-"), redacted);
        }
        $crate::print::print_to_memory(&redacted, $crate::print::LogType::Point);
    }};

    ($($arg:tt)*) => {{
        let msg = format!("{}", format_args!($($arg)*));
        let redacted = $crate::print::auto_redact(&msg);
        if $crate::print::is_print() {
            println!("{} {}", $crate::owo_colors::OwoColorize::bold(&"-"), redacted);
        }
        $crate::print::print_to_file(&redacted, $crate::print::LogType::Point);
    }};
}
