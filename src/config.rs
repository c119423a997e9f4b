use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;

/// Millisecond precision, local wall clock.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Time format that is printed as-is, for deterministic output in tests.
pub const TESTING_TIME_FORMAT: &str = "test";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub print_timestamp: bool,
    pub debug_mode: bool,
    pub debug_sql_mode: bool,
    /// `None` renders timestamps in the local time zone.
    pub time_zone: Option<Tz>,
    pub time_format: String,
    pub use_ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            print_timestamp: false,
            debug_mode: false,
            debug_sql_mode: false,
            time_zone: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            use_ansi: false,
        }
    }

    /// Reads the defaults from `CONLOG_*` environment variables.
    ///
    /// Unset variables keep the values of [`Config::new`]. An unknown time zone
    /// or an unusable time format is an error rather than silently ignored.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| parse_flag(key, &v));

        let mut config = Self::new();
        if let Some(value) = flag("CONLOG_TIMESTAMP") {
            config.print_timestamp = value;
        }
        if let Some(value) = flag("CONLOG_DEBUG") {
            config.debug_mode = value;
        }
        if let Some(value) = flag("CONLOG_DEBUG_SQL") {
            config.debug_sql_mode = value;
        }
        if let Some(value) = flag("CONLOG_COLOR") {
            config.use_ansi = value;
        }
        if let Some(zone) = lookup("CONLOG_TIME_ZONE").filter(|z| !z.is_empty()) {
            config = config.with_time_zone(&zone)?;
        }
        if let Some(format) = lookup("CONLOG_TIME_FORMAT").filter(|f| !f.is_empty()) {
            config = config.with_time_format(format)?;
        }

        Ok(config)
    }

    pub fn with_timestamp(self, print_timestamp: bool) -> Self {
        Self {
            print_timestamp,
            ..self
        }
    }

    pub fn with_debug(self, debug_mode: bool) -> Self {
        Self { debug_mode, ..self }
    }

    pub fn with_debug_sql(self, debug_sql_mode: bool) -> Self {
        Self {
            debug_sql_mode,
            ..self
        }
    }

    pub fn with_ansi(self, use_ansi: bool) -> Self {
        Self { use_ansi, ..self }
    }

    /// Sets the zone from an IANA name such as `Europe/Brussels`.
    pub fn with_time_zone(self, name: &str) -> eyre::Result<Self> {
        let zone =
            Tz::from_str(name).map_err(|e| eyre::eyre!("unknown time zone {}: {}", name, e))?;

        Ok(Self {
            time_zone: Some(zone),
            ..self
        })
    }

    /// Sets a chrono strftime pattern, rejecting patterns chrono can't render.
    pub fn with_time_format(self, format: impl Into<String>) -> eyre::Result<Self> {
        let time_format: String = format.into();

        if StrftimeItems::new(&time_format).any(|item| matches!(item, Item::Error)) {
            return Err(eyre::eyre!("invalid time format {:?}", time_format));
        }

        Ok(Self {
            time_format,
            ..self
        })
    }
}

/// Anything that isn't a recognised on/off word counts as off.
fn parse_flag(key: &str, value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "" | "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::debug!(
                target: "conlog",
                "{}={:?} is not a boolean, treating it as off",
                key,
                value
            );
            false
        }
    }
}
