//! Demo binary: writes a tour of grovelog output in the selected format.

mod demo;
mod error;

use clap::{Parser, ValueEnum};
use error::{CliError, ExitCode};
use grovelog::{ColorChoice, Format, Level, Logger, Options, load_options_std_env};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Variable holding the filter for the crate's own diagnostics.
const DIAGNOSTICS_ENV: &str = "GROVELOG_DIAG";

#[derive(Debug, Parser)]
#[command(
    name = "grovelog-demo",
    version,
    about = "Show what grovelog records look like",
    long_about = None
)]
struct Cli {
    /// Output format: structured (json), plain (text) or rich.
    #[arg(long)]
    format: Option<String>,
    /// Minimum level, e.g. `debug`, `info`, `warn+2`.
    #[arg(long)]
    level: Option<String>,
    /// chrono strftime string for rich timestamps.
    #[arg(long)]
    time_format: Option<String>,
    /// Also append structured records to this file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Optional config file path (JSON/TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Never emit ANSI colors.
    #[arg(long)]
    no_color: bool,
    /// Include the call site of every record.
    #[arg(long)]
    add_source: bool,
    /// Which part of the tour to run.
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    All,
    Levels,
    Attributes,
    Groups,
    Context,
    Errors,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_diagnostics();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::from(ExitCode::Ok.as_u8()),
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn init_diagnostics() {
    let filter = EnvFilter::try_from_env(DIAGNOSTICS_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let options = resolve_options(cli)?;
    tracing::debug!(format = %options.format, level = %options.level, "demo options resolved");

    let logger = match &cli.file {
        Some(path) => Logger::with_file(path, options)?,
        None => Logger::new(options)?,
    };

    match cli.scenario {
        Scenario::All => demo::run_all(&logger)?,
        Scenario::Levels => demo::levels(&logger),
        Scenario::Attributes => demo::attributes(&logger)?,
        Scenario::Groups => demo::groups(&logger),
        Scenario::Context => demo::context(&logger),
        Scenario::Errors => demo::errors(&logger),
    }
    logger.flush()?;
    Ok(())
}

/// Defaults, then the config file, then `GROVELOG_*` variables, then flags.
fn resolve_options(cli: &Cli) -> Result<Options, CliError> {
    let mut options = load_options_std_env(cli.config.as_deref())?;

    if let Some(format) = &cli.format {
        options = options.with_format(format.parse::<Format>()?);
    }
    if let Some(level) = &cli.level {
        options = options.with_level(level.parse::<Level>()?);
    }
    if let Some(time_format) = &cli.time_format {
        options = options.with_time_format(time_format.as_str());
    }
    if cli.no_color {
        options = options.with_color(ColorChoice::Never);
    }
    if cli.add_source {
        options = options.with_add_source(true);
    }

    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_loaded_options() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from([
            "grovelog-demo",
            "--format",
            "plain",
            "--level",
            "warn+1",
            "--no-color",
            "--add-source",
        ])?;
        let options = resolve_options(&cli)?;
        assert_eq!(options.format, Format::Plain);
        assert_eq!(options.level, Level::new(5));
        assert_eq!(options.color, ColorChoice::Never);
        assert!(options.add_source);
        Ok(())
    }

    #[test]
    fn bad_level_is_invalid_input() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from(["grovelog-demo", "--level", "loud"])?;
        let error = resolve_options(&cli).err().ok_or("expected an error")?;
        assert_eq!(error.exit_code(), ExitCode::InvalidInput);
        Ok(())
    }

    #[test]
    fn scenario_defaults_to_all() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from(["grovelog-demo"])?;
        assert_eq!(cli.scenario, Scenario::All);
        Ok(())
    }
}
