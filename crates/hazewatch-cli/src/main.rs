mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "hazewatch",
    version,
    about = "Air-quality readings scraper with breakpoint AQI computation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the pages come from and which index standard to apply.
#[derive(Args)]
pub struct SourceArgs {
    /// Source configuration JSON (missing fields take their defaults)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Predefined index standard (default: aqi_epa)
    #[arg(short, long, value_name = "NAME", conflicts_with = "standard")]
    pub preset: Option<String>,

    /// Custom index standard JSON file
    #[arg(short, long, value_name = "FILE")]
    pub standard: Option<PathBuf>,

    /// Override the primary page URL
    #[arg(long, value_name = "URL")]
    pub primary_url: Option<String>,

    /// Override the secondary (1-hour PM2.5) page URL
    #[arg(long, value_name = "URL")]
    pub secondary_url: Option<String>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,

    /// Write the readings document as JSON to a file
    #[arg(short = 'O', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Also store the document under DIR/YYYY/MM/DD/HHMM.json
    #[arg(long, value_name = "DIR")]
    pub archive: Option<PathBuf>,

    /// Show per-pollutant index reasoning
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the published pages and build the readings document
    Scrape {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// HTTP timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Build the readings document from saved HTML pages
    Compute {
        /// Saved primary (pollutant concentrations) page
        primary_html: PathBuf,

        /// Saved secondary (1-hour PM2.5) page
        secondary_html: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Inspect index standards
    Standards {
        #[command(subcommand)]
        action: StandardsAction,
    },
    /// Inspect source configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum StandardsAction {
    /// List predefined index standards
    List,
    /// Explain an index standard's breakpoint tables
    Explain {
        /// Preset name (e.g., "aqi_epa")
        preset: String,
    },
    /// Validate a custom index standard file
    Validate {
        /// Path to JSON standard file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as JSON
    Show {
        /// Configuration file to merge over the defaults
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            source,
            output,
            timeout,
        } => commands::scrape::run(&source, &output, timeout).await,
        Commands::Compute {
            primary_html,
            secondary_html,
            source,
            output,
        } => commands::compute::run(primary_html, secondary_html, &source, &output),
        Commands::Standards { action } => match action {
            StandardsAction::List => commands::standards::list(),
            StandardsAction::Explain { preset } => commands::standards::explain(&preset),
            StandardsAction::Validate { file } => commands::standards::validate(&file),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(config.as_deref()),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
