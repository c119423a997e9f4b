use clap::{Parser, Subcommand, ValueEnum};

use conlog::{Config, Level};

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Write a single labelled log line to stdout or stderr.", long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    #[arg(global = true, long, help = "Prefix the line with a timestamp.")]
    pub timestamp: bool,

    #[arg(global = true, long, help = "Show debug messages.")]
    pub debug: bool,

    #[arg(
        global = true,
        long,
        help = "Show formatted SQL statements, requires --debug."
    )]
    pub debug_sql: bool,

    #[arg(
        global = true,
        long,
        value_name = "TZ",
        help = "IANA time zone for timestamps, local time by default."
    )]
    pub time_zone: Option<String>,

    #[arg(
        global = true,
        long,
        value_name = "FMT",
        help = "strftime pattern for timestamps."
    )]
    pub time_format: Option<String>,

    #[arg(global = true, long, help = "Colour the severity labels.")]
    pub color: bool,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Write diagnostics of conlog itself to stderr.",
        display_order = 999
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log the words as one message.
    Log {
        #[arg(value_enum)]
        level: LevelArg,
        words: Vec<String>,
    },

    /// Log the words centred in a banner.
    Separator {
        #[arg(value_enum)]
        level: SeparatorLevel,
        words: Vec<String>,
    },

    /// Log a pretty-printed SQL statement.
    Sql { sql: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LevelArg {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Debug => Level::Debug,
            LevelArg::Info => Level::Info,
            LevelArg::Warn => Level::Warn,
            LevelArg::Error => Level::Error,
            LevelArg::Fatal => Level::Fatal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SeparatorLevel {
    Debug,
    Info,
}

impl Cli {
    /// Environment defaults with the command-line flags applied on top.
    pub fn config(&self) -> eyre::Result<Config> {
        let mut config = Config::from_env()?;

        if self.timestamp {
            config.print_timestamp = true;
        }
        if self.debug {
            config.debug_mode = true;
        }
        if self.debug_sql {
            config.debug_sql_mode = true;
        }
        if self.color {
            config.use_ansi = true;
        }
        if let Some(zone) = &self.time_zone {
            config = config.with_time_zone(zone)?;
        }
        if let Some(format) = &self.time_format {
            config = config.with_time_format(format.as_str())?;
        }

        Ok(config)
    }
}
