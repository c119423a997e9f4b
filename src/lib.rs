//! Console logging with severity labels, optional timestamps and a
//! substitutable exit hook.
//!
//! Lines look like `[<timestamp> ]<LABEL> <message>`. Debug output is gated by
//! debug mode, errors go to stderr and everything else to stdout.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use conlog::{Config, Logger, MemorySink};
//!
//! let stdout = MemorySink::new();
//! let logger = Logger::builder()
//!     .with_config(Config::new().with_debug(true))
//!     .with_stdout_sink(Arc::new(stdout.clone()))
//!     .build();
//!
//! conlog::info!(logger; "listening on", 8080);
//! conlog::debug_separator!(logger; "startup");
//! ```

use std::sync::OnceLock;

pub mod config;
pub mod formatters;
pub mod level;
pub mod logger;
mod macros;
pub mod sinks;
pub mod sql;
pub mod terminator;
pub mod trace;

pub use config::{Config, DEFAULT_TIME_FORMAT, TESTING_TIME_FORMAT};
pub use level::{Level, Stream};
pub use logger::{Builder, Logger};
pub use sinks::{FileSink, LogSink, MemorySink, NullSink, SharedSink, StderrSink, StdoutSink};
pub use sql::{PrettySql, SqlFormatter};
pub use terminator::{ExitRecorder, ProcessExit, SharedTerminator, Terminator};
pub use trace::formatted_stack_trace;

static GLOBAL: OnceLock<&'static Logger> = OnceLock::new();

/// The process-wide logger used by the macros.
///
/// Built with default settings on first use unless [`init`] ran before.
pub fn global() -> &'static Logger {
    *GLOBAL.get_or_init(|| &*Box::leak(Box::new(Logger::default())))
}

/// Installs `logger` as the `log` crate backend and as the process-wide logger.
///
/// Fails when a process-wide logger already exists, including the default one
/// created by an earlier call to [`global`]. Also fails when another `log`
/// backend is registered; the process-wide logger is then left untouched.
pub fn init(logger: Logger) -> eyre::Result<&'static Logger> {
    if GLOBAL.get().is_some() {
        return Err(eyre::eyre!("a global logger is already installed"));
    }

    let logger: &'static Logger = Box::leak(Box::new(logger));
    log::set_logger(logger).map_err(|e| eyre::eyre!("Failed registering logger: {}", e))?;
    log::set_max_level(log::LevelFilter::Trace);

    GLOBAL
        .set(logger)
        .map_err(|_| eyre::eyre!("a global logger is already installed"))?;

    Ok(logger)
}
