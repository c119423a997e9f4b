use core::fmt::{self, Write};

use chrono::{Local, Utc};
use yansi::{Condition, Paint};

use crate::{
    config::{Config, TESTING_TIME_FORMAT},
    level::{Level, Stream},
};

/// Total width of a separator banner.
pub const SEPARATOR_WIDTH: usize = 80;

/// Fill character of a separator banner.
pub const SEPARATOR_FILL: char = '=';

/// Joins the rendered arguments with single spaces and trims the result.
pub fn format_message(args: &[&dyn fmt::Display]) -> String {
    let mut message = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            message.push(' ');
        }
        // Writing into a String only fails when a Display impl reports an error.
        let _ = write!(message, "{}", arg);
    }

    message.trim().to_string()
}

/// Centres `message` in a banner of `width` columns filled with `fill`.
///
/// An empty message yields a full line of fill. A message that doesn't fit
/// with at least one space on each side is returned unpadded.
pub fn format_separator(message: &str, fill: char, width: usize) -> String {
    if message.is_empty() {
        return fill.to_string().repeat(width);
    }

    let text = format!(" {} ", message);
    let used = text.chars().count();
    if used >= width {
        return message.to_string();
    }

    let rest = width - used;
    let left = rest / 2;
    let right = rest - left;

    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        text,
        fill.to_string().repeat(right)
    )
}

/// Labels are coloured only when the stream they are written to is a terminal.
pub fn color_condition(stream: Stream) -> Condition {
    match stream {
        Stream::Stdout => Condition::STDOUT_IS_TTY,
        Stream::Stderr => Condition::STDERR_IS_TTY,
    }
}

pub struct LineFormatter<'a> {
    config: &'a Config,
}

impl<'a> LineFormatter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Renders the current time, or the testing sentinel literally.
    pub fn timestamp(&self) -> String {
        let pattern = self.config.time_format.as_str();
        if pattern == TESTING_TIME_FORMAT {
            return pattern.to_string();
        }

        let now = Utc::now();
        let mut out = String::new();
        let written = match self.config.time_zone {
            Some(zone) => write!(out, "{}", now.with_timezone(&zone).format(pattern)),
            None => write!(out, "{}", now.with_timezone(&Local).format(pattern)),
        };

        if written.is_err() {
            tracing::debug!(target: "conlog", "time format {:?} could not be rendered", pattern);
            return pattern.to_string();
        }

        out
    }

    fn format_level(&self, level: Level) -> String {
        if !self.config.use_ansi {
            return level.label().to_string();
        }

        let condition = color_condition(level.stream());
        match level {
            Level::Debug => level.label().blue().whenever(condition).to_string(),
            Level::Info => level.label().green().whenever(condition).to_string(),
            Level::Warn => level.label().yellow().whenever(condition).to_string(),
            Level::Error => level.label().red().whenever(condition).to_string(),
            Level::Fatal => level.label().red().bold().whenever(condition).to_string(),
        }
    }

    /// `[<timestamp> ]<LABEL> <message>`, without the line terminator.
    pub fn format(&self, level: Level, message: &str) -> String {
        if self.config.print_timestamp {
            format!(
                "{} {} {}",
                self.timestamp(),
                self.format_level(level),
                message
            )
        } else {
            format!("{} {}", self.format_level(level), message)
        }
    }
}
