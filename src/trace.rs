use std::{backtrace::Backtrace, error::Error};

/// Renders `err` followed by the current call stack.
///
/// When `err` wraps another error, the wrapped error is rendered instead.
/// Only one level is unwrapped.
pub fn formatted_stack_trace(err: &(dyn Error + 'static)) -> String {
    let err = err.source().unwrap_or(err);
    let backtrace = Backtrace::force_capture();

    format!("{}\n{}", err, backtrace).trim().to_string()
}
