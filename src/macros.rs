// Every macro takes either `logger; args...` or just `args...`, in which case
// the process-wide logger from `conlog::global()` is used.

#[doc(hidden)]
#[macro_export]
macro_rules! __conlog_dispatch {
    ($method:ident, $logger:expr; $($arg:expr),* $(,)?) => {
        $logger.$method(&[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(debug, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(debug, $crate::global(); $($arg),*)
    };
}

#[macro_export]
macro_rules! debug_separator {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(debug_separator, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(debug_separator, $crate::global(); $($arg),*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(info, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(info, $crate::global(); $($arg),*)
    };
}

#[macro_export]
macro_rules! info_separator {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(info_separator, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(info_separator, $crate::global(); $($arg),*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(warn, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(warn, $crate::global(); $($arg),*)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(error, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(error, $crate::global(); $($arg),*)
    };
}

/// Logs a fatal message and runs the exit hook.
#[macro_export]
macro_rules! fatal {
    ($logger:expr; $($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(fatal, $logger; $($arg),*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__conlog_dispatch!(fatal, $crate::global(); $($arg),*)
    };
}
