//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Parser, Subcommand};
use commands::{
    RecordCommandInput, run_config_check, run_config_schema, run_info, run_metrics, run_record,
};
use error::{CliError, ExitCode};
use format::{LogArgs, LogFormat, OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Env var holding the `tracing` filter directives.
const LOG_ENV: &str = "MLPM_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(
    name = "mlpm",
    version,
    about = "Record ML model inference data and metrics as telemetry events",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logs: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Settings commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Record one inference batch read as `{"X": .., "y": ..}`.
    Record {
        /// Optional settings file (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Batch file, or `-` for stdin.
        #[arg(long)]
        batch: PathBuf,
        /// Feature column names, comma separated.
        #[arg(long, value_delimiter = ',')]
        features_columns: Vec<String>,
        /// Label column names, comma separated.
        #[arg(long, value_delimiter = ',')]
        labels_columns: Vec<String>,
    },
    /// Record model metrics read as a `name -> number` object.
    Metrics {
        /// Optional settings file (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Metrics file, or `-` for stdin.
        #[arg(long)]
        metrics: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate settings and print them with env overrides applied.
    Check {
        /// Optional settings file (JSON/TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the JSON schema of the settings file.
    Schema,
}

#[derive(Debug)]
pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.logs.log_format);
    let mode = OutputMode::from_args(&cli.output);

    match run(&cli.command, mode, &cli.logs) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(mode, &error),
        },
        Err(error) => exit_with_error(mode, &error),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    let installed = match format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = installed {
        let _ = writeln!(io::stderr(), "tracing setup failed: {error}");
    }
}

fn exit_with_error(mode: OutputMode, error: &CliError) -> std::process::ExitCode {
    let exit_code = error.exit_code();
    let _ = io::stderr().write_all(format_error(mode, error).as_bytes());
    std::process::ExitCode::from(exit_code.as_u8())
}

/// Errors go to stderr so stdout only ever carries records.
fn format_error(mode: OutputMode, error: &CliError) -> String {
    if !mode.is_json() {
        return format!("error: {error}\n");
    }
    let detail = match error {
        CliError::Envelope(envelope) => serde_json::to_value(envelope.clone().redacted())
            .unwrap_or_else(|_| serde_json::Value::String(envelope.to_string())),
        other => serde_json::json!({ "message": other.to_string() }),
    };
    let payload = serde_json::json!({
        "status": "error",
        "exitCode": error.exit_code().as_u8(),
        "error": detail,
    });
    let mut line = payload.to_string();
    line.push('\n');
    line
}

fn run(command: &Commands, mode: OutputMode, logs: &LogArgs) -> Result<CliOutput, CliError> {
    match command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => match command {
            ConfigCommands::Check { config } => run_config_check(mode, config.as_deref()),
            ConfigCommands::Schema => run_config_schema(),
        },
        Commands::Record {
            config,
            batch,
            features_columns,
            labels_columns,
        } => run_record(
            mode,
            logs,
            RecordCommandInput {
                config: config.as_deref(),
                batch,
                features_columns,
                labels_columns,
            },
        ),
        Commands::Metrics { config, metrics } => {
            run_metrics(mode, logs, config.as_deref(), metrics)
        },
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use clap::CommandFactory;
    use mlpm_shared::{ErrorCode, ErrorEnvelope};
    use serde_json::Value;
    use std::error::Error;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn column_flags_split_on_commas() -> Result<(), Box<dyn Error>> {
        let cli = Cli::try_parse_from([
            "mlpm",
            "record",
            "--batch",
            "-",
            "--features-columns",
            "a,b,c,d",
            "--labels-columns",
            "e",
        ])?;
        let Commands::Record {
            features_columns,
            labels_columns,
            batch,
            ..
        } = cli.command
        else {
            return Err("expected the record command".into());
        };
        assert_eq!(features_columns, ["a", "b", "c", "d"]);
        assert_eq!(labels_columns, ["e"]);
        assert_eq!(batch, PathBuf::from("-"));
        Ok(())
    }

    #[test]
    fn record_requires_a_batch() {
        assert!(Cli::try_parse_from(["mlpm", "record"]).is_err());
    }

    #[test]
    fn json_errors_carry_the_envelope() -> Result<(), Box<dyn Error>> {
        let mode = OutputMode {
            format: OutputFormat::Json,
            quiet: false,
        };
        let error = CliError::from(
            ErrorEnvelope::expected(
                ErrorCode::new("validation", "length_mismatch"),
                "X and y must have the same length",
            )
            .with_field("y"),
        );
        let payload: Value = serde_json::from_str(&format_error(mode, &error))?;
        assert_eq!(payload.get("exitCode"), Some(&Value::from(2)));
        assert_eq!(
            payload.pointer("/error/code/namespace"),
            Some(&Value::from("validation"))
        );
        assert_eq!(
            payload.pointer("/error/metadata/field"),
            Some(&Value::from("y"))
        );
        Ok(())
    }

    #[test]
    fn text_errors_are_one_line() {
        let mode = OutputMode {
            format: OutputFormat::Text,
            quiet: false,
        };
        let error = CliError::InvalidInput("stdin is empty".to_owned());
        assert_eq!(format_error(mode, &error), "error: invalid input: stdin is empty\n");
    }
}
