//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// NTD Dashboard - partners and disease occurrence
///
/// Loads the partner and disease tables, applies the country, disease and
/// year filters, and writes the dashboard as HTML or JSON.
///
/// Examples:
///   ntd-dashboard
///   ntd-dashboard --countries Kenya,India --from-year 2019 --to-year 2021
///   ntd-dashboard --diseases-filter Malaria --format json --output malaria.json
///   ntd-dashboard --list-options
///   ntd-dashboard --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for ntd_dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Partner CSV (overrides data.partners)
    #[arg(long, value_name = "FILE")]
    pub partners: Option<PathBuf>,

    /// Disease occurrence CSV (overrides data.diseases)
    #[arg(long, value_name = "FILE")]
    pub diseases: Option<PathBuf>,

    /// Countries to include (comma-separated). Default: all partner countries
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Diseases to include (comma-separated). Default: all diseases
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub diseases_filter: Option<Vec<String>>,

    /// First year to include. Default: earliest observed year
    #[arg(long, value_name = "YEAR", allow_negative_numbers = true)]
    pub from_year: Option<i64>,

    /// Last year to include. Default: latest observed year
    #[arg(long, value_name = "YEAR", allow_negative_numbers = true)]
    pub to_year: Option<i64>,

    /// Output file path (overrides output.path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Print the available countries, diseases and years, then exit
    #[arg(long)]
    pub list_options: bool,

    /// Generate a default ntd_dashboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// JSON document with every summary
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        if let (Some(from), Some(to)) = (self.from_year, self.to_year) {
            if from > to {
                return Err(format!(
                    "--from-year ({}) must not be after --to-year ({})",
                    from, to
                ));
            }
        }
        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
