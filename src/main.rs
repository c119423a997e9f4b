mod args;

use std::process::ExitCode;

use clap::Parser;
use conlog::{Level, Logger};
use tracing_subscriber::filter::LevelFilter;

use crate::args::{Cli, Command, SeparatorLevel};

fn setup_diagnostics(verbose: u8) {
    let filter = match verbose {
        0 => return,
        1 => LevelFilter::WARN,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> eyre::Result<()> {
    setup_diagnostics(cli.verbose);

    let config = cli.config()?;
    tracing::debug!(target: "conlog", "using {:?}", config);

    let logger = conlog::init(Logger::builder().with_config(config).build())?;

    match cli.cmd {
        Command::Log { level, words } => {
            let message = words.join(" ");
            match Level::from(level) {
                Level::Debug => conlog::debug!(logger; message),
                Level::Info => conlog::info!(logger; message),
                Level::Warn => conlog::warn!(logger; message),
                Level::Error => conlog::error!(logger; message),
                Level::Fatal => conlog::fatal!(logger; message),
            }
        }
        Command::Separator { level, words } => {
            let message = words.join(" ");
            match level {
                SeparatorLevel::Debug => conlog::debug_separator!(logger; message),
                SeparatorLevel::Info => conlog::info_separator!(logger; message),
            }
        }
        Command::Sql { sql } => logger.debug_sql(&sql),
    }

    logger.flush();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Err(err) => {
            let root = err.root_cause();

            eprint!("\x1b[31m");
            eprintln!("Error: {}", err);
            eprintln!();
            eprintln!("Caused by:");
            eprint!("  {}", root);
            eprintln!("\x1b[0m");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}
