//! Output format helpers for CLI commands.

use clap::{Args, ValueEnum};

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    Text,
    /// Machine-friendly JSON output.
    Json,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command summaries and errors.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
    /// Emit machine-readable JSON output (alias of `--output json`).
    #[arg(long, global = true, hide = true)]
    pub json: bool,
    /// Suppress the summary line written to stderr.
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Log-related CLI flags.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Format of diagnostic logs on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    /// Write pipeline counters and timers as JSON lines to stderr.
    #[arg(long, global = true)]
    pub pipeline_metrics: bool,
}

/// Diagnostic log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `tracing` compact text.
    Text,
    /// One JSON object per event.
    Json,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub const fn from_args(args: &OutputArgs) -> Self {
        let format = match (args.output, args.json) {
            (Some(value), _) => value,
            (None, true) => OutputFormat::Json,
            (None, false) => OutputFormat::Text,
        };

        Self {
            format,
            quiet: args.quiet,
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins_over_json_alias() {
        let args = OutputArgs {
            output: Some(OutputFormat::Text),
            json: true,
            quiet: false,
        };
        assert!(!OutputMode::from_args(&args).is_json());

        let alias = OutputArgs {
            output: None,
            json: true,
            quiet: true,
        };
        let mode = OutputMode::from_args(&alias);
        assert!(mode.is_json());
        assert!(mode.quiet);
    }
}
