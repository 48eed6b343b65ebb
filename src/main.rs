//! NTD Dashboard - partners and disease occurrence
//!
//! Loads the partner and disease CSVs, filters them by the selection given
//! on the command line, and writes the dashboard page.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Load, config or output error

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use ntd_dashboard::config::DEFAULT_CONFIG_FILE;
use ntd_dashboard::visualization;
use ntd_dashboard::{Config, Dashboard, FilterOptions, FilterSelection, YearRange};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("NTD Dashboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Dashboard failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Handle --init-config: generate a default ntd_dashboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    merge_with_args(&mut config, args);

    let dashboard = Dashboard::from_config(&config.data).with_context(|| {
        format!(
            "Failed to load data from {} and {}",
            config.data.partners.display(),
            config.data.diseases.display()
        )
    })?;
    let options = dashboard.options()?;

    if args.list_options {
        print_options(&options);
        return Ok(());
    }

    let selection = build_selection(&options, args);
    let view = dashboard.render(&selection)?;

    let content = match args.format {
        OutputFormat::Html => visualization::generate_dashboard_html(&view, &config.render)?,
        OutputFormat::Json => visualization::generate_dashboard_json(&view)?,
    };

    let output = &config.output.path;
    std::fs::write(output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Dashboard written to {}", output.display());
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display())),
        None => Ok(Config::load_default()
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG_FILE))?
            .unwrap_or_default()),
    }
}

/// CLI arguments take precedence over config file settings.
fn merge_with_args(config: &mut Config, args: &Args) {
    if let Some(ref partners) = args.partners {
        config.data.partners = partners.clone();
    }
    if let Some(ref diseases) = args.diseases {
        config.data.diseases = diseases.clone();
    }
    if let Some(ref output) = args.output {
        config.output.path = output.clone();
    } else if args.format == OutputFormat::Json {
        config.output.path.set_extension("json");
    }
}

/// Widget defaults, overridden by whatever the command line specifies.
fn build_selection(options: &FilterOptions, args: &Args) -> FilterSelection {
    let mut selection = options.default_selection();

    if let Some(ref countries) = args.countries {
        for c in countries.iter().filter(|c| !options.countries.contains(c)) {
            warn!("Country '{}' does not occur in the partner table", c);
        }
        selection = selection.with_countries(countries.iter().cloned());
    }

    if let Some(ref diseases) = args.diseases_filter {
        for d in diseases.iter().filter(|d| !options.diseases.contains(d)) {
            warn!("Disease '{}' does not occur in the disease table", d);
        }
        selection = selection.with_diseases(diseases.iter().cloned());
    }

    let requested = YearRange::new(
        args.from_year.unwrap_or(selection.years.start),
        args.to_year.unwrap_or(selection.years.end),
    );
    // A request outside the observed years stays as-is and matches nothing.
    selection.with_years(match options.years {
        Some(bounds) if requested.overlaps(bounds) => requested.clamp_to(bounds),
        Some(_) => {
            warn!("Year range {} has no disease records", requested);
            requested
        }
        None => requested,
    })
}

fn print_options(options: &FilterOptions) {
    println!("Countries: {}", options.countries.join(", "));
    println!("Diseases:  {}", options.diseases.join(", "));
    match options.years {
        Some(years) => println!("Years:     {}", years),
        None => println!("Years:     (no disease records)"),
    }
}
