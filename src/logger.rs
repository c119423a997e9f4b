use core::fmt;
use std::{
    error::Error,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    config::Config,
    formatters::{
        format_message, format_separator, LineFormatter, SEPARATOR_FILL, SEPARATOR_WIDTH,
    },
    level::{Level, Stream},
    sinks::{SharedSink, StderrSink, StdoutSink},
    sql::{PrettySql, SqlFormatter},
    terminator::{ProcessExit, SharedTerminator},
    trace,
};

/// Writes severity-tagged lines to the stdout and stderr sinks.
///
/// Every entry point reads a snapshot of the configuration when it is called,
/// so the configuration, sinks and exit hook can all be swapped at runtime.
pub struct Logger {
    config: RwLock<Config>,
    stdout: RwLock<SharedSink>,
    stderr: RwLock<SharedSink>,
    terminator: RwLock<SharedTerminator>,
    sql: RwLock<Arc<dyn SqlFormatter>>,
}

impl Default for Logger {
    fn default() -> Self {
        Builder::new().build()
    }
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

impl Logger {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn config(&self) -> Config {
        read(&self.config)
    }

    /// Applies `f` to a copy of the configuration and stores the result.
    ///
    /// No lock is held while `f` runs, so it may log through this logger.
    /// Calls made from other threads in the meantime still see the old values,
    /// and two `configure` calls racing each other keep only one result.
    pub fn configure<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.config();
        f(&mut config);
        replace(&self.config, config);
    }

    pub fn set_stdout(&self, sink: SharedSink) {
        replace(&self.stdout, sink);
    }

    pub fn set_stderr(&self, sink: SharedSink) {
        replace(&self.stderr, sink);
    }

    pub fn set_terminator(&self, terminator: SharedTerminator) {
        replace(&self.terminator, terminator);
    }

    pub fn set_sql_formatter(&self, formatter: Arc<dyn SqlFormatter>) {
        replace(&self.sql, formatter);
    }

    fn sink(&self, stream: Stream) -> SharedSink {
        match stream {
            Stream::Stdout => read(&self.stdout),
            Stream::Stderr => read(&self.stderr),
        }
    }

    fn print_message(&self, config: &Config, level: Level, message: &str) {
        let line = LineFormatter::new(config).format(level, message);

        if let Err(err) = self.sink(level.stream()).write_line(&line) {
            tracing::warn!(target: "conlog", "dropped {} line: {:#}", level.label().trim(), err);
        }
    }

    fn log_args(&self, level: Level, args: &[&dyn fmt::Display]) {
        let config = self.config();
        if level == Level::Debug && !config.debug_mode {
            return;
        }

        self.print_message(&config, level, &format_message(args));
    }

    fn log_separator(&self, level: Level, args: &[&dyn fmt::Display]) {
        let config = self.config();
        if level == Level::Debug && !config.debug_mode {
            return;
        }

        let message = format_separator(&format_message(args), SEPARATOR_FILL, SEPARATOR_WIDTH);
        self.print_message(&config, level, &message);
    }

    fn log_dump<T: fmt::Debug + ?Sized>(&self, level: Level, value: &T, prefix: &str) {
        let message = format!("{:#?}", value);

        if prefix.is_empty() {
            self.log_args(level, &[&message]);
        } else {
            self.log_args(level, &[&prefix, &message]);
        }
    }

    /// Only printed when debug mode is on.
    pub fn debug(&self, args: &[&dyn fmt::Display]) {
        self.log_args(Level::Debug, args);
    }

    /// Only printed when debug mode is on.
    pub fn debug_separator(&self, args: &[&dyn fmt::Display]) {
        self.log_separator(Level::Debug, args);
    }

    /// Pretty-prints `sql` as a debug message.
    ///
    /// Requires both debug mode and SQL debug mode. When the statement can't
    /// be formatted the failure is logged as an error instead.
    pub fn debug_sql(&self, sql: &str) {
        let config = self.config();
        if !(config.debug_mode && config.debug_sql_mode) {
            return;
        }

        match read(&self.sql).format(sql) {
            Ok(formatted) => self.debug(&[&formatted]),
            Err(err) => self.error(&[&err]),
        }
    }

    pub fn debug_dump<T: fmt::Debug + ?Sized>(&self, value: &T, prefix: &str) {
        self.log_dump(Level::Debug, value, prefix);
    }

    pub fn info(&self, args: &[&dyn fmt::Display]) {
        self.log_args(Level::Info, args);
    }

    pub fn info_separator(&self, args: &[&dyn fmt::Display]) {
        self.log_separator(Level::Info, args);
    }

    pub fn info_dump<T: fmt::Debug + ?Sized>(&self, value: &T, prefix: &str) {
        self.log_dump(Level::Info, value, prefix);
    }

    pub fn warn(&self, args: &[&dyn fmt::Display]) {
        self.log_args(Level::Warn, args);
    }

    pub fn warn_dump<T: fmt::Debug + ?Sized>(&self, value: &T, prefix: &str) {
        self.log_dump(Level::Warn, value, prefix);
    }

    /// Written to the stderr sink.
    pub fn error(&self, args: &[&dyn fmt::Display]) {
        self.log_args(Level::Error, args);
    }

    pub fn error_dump<T: fmt::Debug + ?Sized>(&self, value: &T, prefix: &str) {
        self.log_dump(Level::Error, value, prefix);
    }

    /// Logs the stack trace of `err` as an error.
    pub fn stack_trace(&self, err: &(dyn Error + 'static)) {
        self.log_args(Level::Error, &[&self.formatted_stack_trace(err)]);
    }

    pub fn formatted_stack_trace(&self, err: &(dyn Error + 'static)) -> String {
        trace::formatted_stack_trace(err)
    }

    /// Logs a fatal message and exits with status 1.
    ///
    /// Doesn't return unless the exit hook was replaced.
    pub fn fatal(&self, args: &[&dyn fmt::Display]) {
        self.log_args(Level::Fatal, args);
        self.exit(1);
    }

    /// Does nothing for `None`. Otherwise prints the error as a fatal message,
    /// adds its stack trace in debug mode and exits with status 1.
    pub fn check_error(&self, err: Option<&(dyn Error + 'static)>) {
        let Some(err) = err else {
            return;
        };

        let config = self.config();
        self.print_message(&config, Level::Fatal, &err.to_string());
        if config.debug_mode {
            self.stack_trace(err);
        }
        self.exit(1);
    }

    pub fn flush(&self) {
        for stream in [Stream::Stdout, Stream::Stderr] {
            if let Err(err) = self.sink(stream).flush() {
                tracing::warn!(target: "conlog", "failed flushing {:?} sink: {:#}", stream, err);
            }
        }
    }

    fn exit(&self, code: i32) {
        self.flush();
        read(&self.terminator).exit(code);
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match Level::from(metadata.level()) {
            Level::Debug => self.config().debug_mode,
            _ => true,
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.log_args(Level::from(record.level()), &[record.args()]);
        }
    }

    fn flush(&self) {
        Logger::flush(self)
    }
}

pub struct Builder {
    config: Config,
    stdout: SharedSink,
    stderr: SharedSink,
    terminator: SharedTerminator,
    sql: Arc<dyn SqlFormatter>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            stdout: Arc::new(StdoutSink::new()),
            stderr: Arc::new(StderrSink::new()),
            terminator: Arc::new(ProcessExit),
            sql: Arc::new(PrettySql::new()),
        }
    }

    pub fn with_config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    pub fn with_stdout_sink(self, stdout: SharedSink) -> Self {
        Self { stdout, ..self }
    }

    pub fn with_stderr_sink(self, stderr: SharedSink) -> Self {
        Self { stderr, ..self }
    }

    pub fn with_terminator(self, terminator: SharedTerminator) -> Self {
        Self { terminator, ..self }
    }

    pub fn with_sql_formatter(self, sql: Arc<dyn SqlFormatter>) -> Self {
        Self { sql, ..self }
    }

    pub fn build(self) -> Logger {
        Logger {
            config: RwLock::new(self.config),
            stdout: RwLock::new(self.stdout),
            stderr: RwLock::new(self.stderr),
            terminator: RwLock::new(self.terminator),
            sql: RwLock::new(self.sql),
        }
    }
}
