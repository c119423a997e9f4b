//! Output and exit behaviour of the logger entry points, observed through
//! in-memory sinks and a recording exit hook.

use core::fmt;
use std::{collections::BTreeMap, error::Error, sync::Arc};

use conlog::{
    Config, ExitRecorder, LogSink, Logger, MemorySink, SqlFormatter, TESTING_TIME_FORMAT,
};

struct Capture {
    logger: Logger,
    stdout: MemorySink,
    stderr: MemorySink,
    exits: ExitRecorder,
}

impl Capture {
    fn new(config: Config) -> Self {
        let stdout = MemorySink::new();
        let stderr = MemorySink::new();
        let exits = ExitRecorder::new();

        let logger = Logger::builder()
            .with_config(config)
            .with_stdout_sink(Arc::new(stdout.clone()))
            .with_stderr_sink(Arc::new(stderr.clone()))
            .with_terminator(Arc::new(exits.clone()))
            .build();

        Self {
            logger,
            stdout,
            stderr,
            exits,
        }
    }

    fn is_silent(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

fn debug_config() -> Config {
    Config::new().with_debug(true)
}

#[derive(Debug)]
struct Cause;

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("connection refused")
    }
}

impl Error for Cause {}

#[derive(Debug)]
struct Wrapped(Cause);

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("loading settings")
    }
}

impl Error for Wrapped {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

// ============================================================================
// Levels and sinks
// ============================================================================

#[test]
fn info_warn_error_differ_only_by_label_and_sink() {
    let c = Capture::new(Config::new());

    conlog::info!(c.logger; "count", 3, true);
    conlog::warn!(c.logger; "count", 3, true);
    conlog::error!(c.logger; "count", 3, true);

    assert_eq!(c.stdout.lines(), vec!["INFO  count 3 true", "WARN  count 3 true"]);
    assert_eq!(c.stderr.lines(), vec!["ERROR count 3 true"]);
}

#[test]
fn debug_entry_points_are_silent_without_debug_mode() {
    let c = Capture::new(Config::new().with_debug_sql(true));

    conlog::debug!(c.logger; "hidden");
    conlog::debug_separator!(c.logger; "hidden");
    c.logger.debug_dump(&vec![1, 2, 3], "numbers");
    c.logger.debug_sql("select 1");
    c.logger.debug_sql("select (");

    assert!(c.is_silent());
}

#[test]
fn debug_entry_points_print_in_debug_mode() {
    let c = Capture::new(debug_config());

    conlog::debug!(c.logger; "visible");
    conlog::debug_separator!(c.logger; "phase");

    let lines = c.stdout.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "DEBUG visible");
    assert!(lines[1].starts_with("DEBUG ="));
    assert!(lines[1].contains(" phase "));
}

#[test]
fn empty_argument_list_logs_bare_label() {
    let c = Capture::new(Config::new());
    conlog::info!(c.logger;);

    assert_eq!(c.stdout.contents(), "INFO  \n");
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn no_timestamp_segment_when_disabled() {
    let config = Config::new()
        .with_time_format(TESTING_TIME_FORMAT)
        .unwrap()
        .with_time_zone("Asia/Tokyo")
        .unwrap();
    let c = Capture::new(config);

    conlog::info!(c.logger; "plain");

    assert_eq!(c.stdout.contents(), "INFO  plain\n");
}

#[test]
fn testing_time_format_is_printed_literally() {
    let config = Config::new()
        .with_timestamp(true)
        .with_time_format(TESTING_TIME_FORMAT)
        .unwrap();
    let c = Capture::new(config);

    conlog::info!(c.logger; "hello");
    conlog::error!(c.logger; "oops");

    assert_eq!(c.stdout.contents(), "test INFO  hello\n");
    assert_eq!(c.stderr.contents(), "test ERROR oops\n");
}

#[test]
fn default_time_format_has_millisecond_precision() {
    let c = Capture::new(Config::new().with_timestamp(true));
    conlog::info!(c.logger; "tick");

    let line = c.stdout.lines().remove(0);
    // 2024-01-02 03:04:05.678 INFO  tick
    let (timestamp, rest) = line.split_at(23);
    assert_eq!(rest, " INFO  tick");
    assert_eq!(timestamp.as_bytes()[4], b'-');
    assert_eq!(timestamp.as_bytes()[19], b'.');
    assert!(timestamp[20..].chars().all(|c| c.is_ascii_digit()));
}

// ============================================================================
// Dumps
// ============================================================================

#[test]
fn dump_without_prefix_equals_logging_the_dump() {
    let value: BTreeMap<&str, Vec<i32>> =
        [("a", vec![1]), ("b", vec![])].into_iter().collect();

    let dumped = Capture::new(Config::new());
    dumped.logger.info_dump(&value, "");

    let direct = Capture::new(Config::new());
    conlog::info!(direct.logger; format!("{:#?}", value));

    assert_eq!(dumped.stdout.contents(), direct.stdout.contents());
}

#[test]
fn dump_with_prefix_contains_both_parts() {
    let c = Capture::new(Config::new());
    c.logger.warn_dump(&("name", 7), "tuple:");

    let contents = c.stdout.contents();
    assert!(contents.starts_with("WARN  tuple: ("));
    assert!(contents.contains("\"name\""));
    assert!(contents.contains("7"));
}

#[test]
fn error_dump_goes_to_stderr() {
    let c = Capture::new(Config::new());
    c.logger.error_dump(&Some("x"), "");

    assert!(c.stdout.is_empty());
    assert!(c.stderr.contents().starts_with("ERROR Some("));
}

#[test]
fn debug_dump_prints_in_debug_mode() {
    let c = Capture::new(debug_config());
    c.logger.debug_dump(&[1u8, 2], "bytes");

    assert!(c.stdout.contents().starts_with("DEBUG bytes ["));
}

// ============================================================================
// SQL
// ============================================================================

#[test]
fn debug_sql_needs_both_modes() {
    let debug_only = Capture::new(debug_config());
    debug_only.logger.debug_sql("select 1");
    assert!(debug_only.is_silent());

    let sql_only = Capture::new(Config::new().with_debug_sql(true));
    sql_only.logger.debug_sql("select 1");
    assert!(sql_only.is_silent());
}

#[test]
fn debug_sql_logs_formatted_statement_once() {
    let c = Capture::new(debug_config().with_debug_sql(true));
    c.logger.debug_sql("select id from users where id = 1");

    assert!(c.stderr.is_empty());
    let contents = c.stdout.contents();
    assert!(contents.starts_with("DEBUG SELECT"));
    assert_eq!(contents.matches("DEBUG").count(), 1);
}

#[test]
fn debug_sql_failure_is_logged_as_error_only() {
    let c = Capture::new(debug_config().with_debug_sql(true));
    c.logger.debug_sql("select (1");

    assert!(c.stdout.is_empty());
    assert_eq!(c.stderr.lines().len(), 1);
    assert!(c.stderr.contents().starts_with("ERROR "));
}

#[test]
fn custom_sql_formatter_is_used() {
    struct Upper;

    impl SqlFormatter for Upper {
        fn format(&self, sql: &str) -> eyre::Result<String> {
            Ok(sql.to_uppercase())
        }
    }

    let c = Capture::new(debug_config().with_debug_sql(true));
    c.logger.set_sql_formatter(Arc::new(Upper));
    c.logger.debug_sql("select 1");

    assert_eq!(c.stdout.contents(), "DEBUG SELECT 1\n");
}

// ============================================================================
// Stack traces
// ============================================================================

#[test]
fn stack_trace_is_logged_to_stderr() {
    let c = Capture::new(Config::new());
    c.logger.stack_trace(&Cause);

    assert!(c.stdout.is_empty());
    assert!(c.stderr.contents().starts_with("ERROR connection refused"));
}

#[test]
fn formatted_stack_trace_prefers_the_cause() {
    let c = Capture::new(Config::new());

    let own = c.logger.formatted_stack_trace(&Cause);
    let wrapped = c.logger.formatted_stack_trace(&Wrapped(Cause));

    assert!(own.starts_with("connection refused"));
    assert!(wrapped.starts_with("connection refused"));
    assert!(!wrapped.contains("loading settings"));
}

#[test]
fn eyre_reports_can_be_traced() {
    let report = eyre::eyre!("top level");
    let err: &(dyn Error + 'static) = report.as_ref();
    let trace = conlog::formatted_stack_trace(err);

    assert!(trace.starts_with("top level"));
}

// ============================================================================
// Fatal paths
// ============================================================================

#[test]
fn fatal_writes_one_line_then_exits() {
    let c = Capture::new(Config::new());
    conlog::fatal!(c.logger; "x");

    assert_eq!(c.stdout.contents(), "FATAL x\n");
    assert!(c.stderr.is_empty());
    assert_eq!(c.exits.codes(), vec![1]);
}

#[test]
fn check_error_without_error_does_nothing() {
    let c = Capture::new(debug_config());
    c.logger.check_error(None);

    assert!(c.is_silent());
    assert!(c.exits.codes().is_empty());
}

#[test]
fn check_error_prints_raw_message() {
    let c = Capture::new(Config::new());
    c.logger.check_error(Some(&Wrapped(Cause)));

    assert_eq!(c.stdout.contents(), "FATAL loading settings\n");
    assert!(c.stderr.is_empty());
    assert_eq!(c.exits.codes(), vec![1]);
}

#[test]
fn check_error_adds_stack_trace_in_debug_mode() {
    let c = Capture::new(debug_config());
    c.logger.check_error(Some(&Wrapped(Cause)));

    assert_eq!(c.stdout.lines(), vec!["FATAL loading settings"]);
    assert!(c.stderr.contents().starts_with("ERROR connection refused"));
    assert_eq!(c.exits.codes(), vec![1]);
}

// ============================================================================
// Concurrency and failing sinks
// ============================================================================

#[test]
fn concurrent_writers_never_interleave_lines() {
    const THREADS: usize = 8;
    const LINES: usize = 200;

    let c = Capture::new(Config::new());

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let logger = &c.logger;
            scope.spawn(move || {
                for i in 0..LINES {
                    conlog::info!(logger; "t", t, "line", i, "of", LINES);
                }
            });
        }
    });

    let lines = c.stdout.lines();
    assert_eq!(lines.len(), THREADS * LINES);
    for line in &lines {
        let words: Vec<&str> = line.strip_prefix("INFO  t ").unwrap().split(' ').collect();
        assert_eq!(words.len(), 5, "malformed line {:?}", line);
        assert_eq!(words[1], "line");
        assert_eq!(words[3], "of");
        assert_eq!(words[4], LINES.to_string());
    }
    for t in 0..THREADS {
        let prefix = format!("INFO  t {} line ", t);
        assert_eq!(lines.iter().filter(|l| l.starts_with(&prefix)).count(), LINES);
    }
}

struct Broken;

impl LogSink for Broken {
    fn write_line(&self, _line: &str) -> eyre::Result<()> {
        Err(eyre::eyre!("disk full"))
    }

    fn flush(&self) -> eyre::Result<()> {
        Err(eyre::eyre!("disk full"))
    }
}

fn broken_logger(config: Config, exits: &ExitRecorder) -> Logger {
    Logger::builder()
        .with_config(config)
        .with_stdout_sink(Arc::new(Broken))
        .with_stderr_sink(Arc::new(Broken))
        .with_terminator(Arc::new(exits.clone()))
        .build()
}

#[test]
fn failing_sink_does_not_stop_fatal_exit() {
    let exits = ExitRecorder::new();
    let logger = broken_logger(Config::new(), &exits);

    conlog::info!(logger; "dropped");
    conlog::error!(logger; "dropped");
    conlog::fatal!(logger; "x");

    assert_eq!(exits.codes(), vec![1]);
}

#[test]
fn failing_sink_does_not_stop_check_error_exit() {
    let exits = ExitRecorder::new();
    let logger = broken_logger(debug_config(), &exits);

    logger.check_error(Some(&Wrapped(Cause)));
    logger.flush();

    assert_eq!(exits.codes(), vec![1]);
}
