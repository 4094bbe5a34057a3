mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use mobility_core::settings::{load_config, ConnectorConfig};
use mobility_core::template::PairingMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mobility",
    version,
    about = "Recover mobility trend data from the charts of mobility report PDFs"
)]
struct Cli {
    /// Configuration file (TOML); MOBILITY_* environment variables override it
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the reports linked from the index page
    Discover {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Download the linked reports into the download folder
    Download {
        /// Download folder (overrides the configuration)
        #[arg(short, long, value_name = "DIR")]
        folder: Option<PathBuf>,

        /// Fetch reports again even if they are already on disk
        #[arg(long)]
        force: bool,
    },
    /// Extract the chart data of one report already on disk
    Extract {
        /// Path to the report PDF
        input_file: PathBuf,

        /// Two-letter country code of the report
        #[arg(long)]
        country: String,

        /// Report date (YYYY-MM-DD); rows run from the epoch up to it
        #[arg(long)]
        date: String,

        /// Declared region of a sub-national report
        #[arg(long)]
        region: Option<String>,

        /// Fail when a page has a different number of labels and charts
        #[arg(long)]
        strict: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted rows to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Discover, download and extract every published report
    Run {
        /// Download folder (overrides the configuration)
        #[arg(short, long, value_name = "DIR")]
        folder: Option<PathBuf>,

        /// Only extract reports already on disk
        #[arg(long)]
        no_download: bool,

        /// Fetch reports again even if they are already on disk
        #[arg(long)]
        force: bool,

        /// Fail when a page has a different number of labels and charts
        #[arg(long)]
        strict: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted rows to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show the chart points recovered from a decoded content stream
    Stream {
        /// File holding the content stream text
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(
    mut config: ConnectorConfig,
    folder: Option<PathBuf>,
    force: bool,
    strict: bool,
) -> ConnectorConfig {
    if let Some(folder) = folder {
        config.download_folder = folder;
    }
    if force {
        config.skip_downloaded = false;
    }
    if strict {
        config.template.pairing = PairingMode::Strict;
    }
    config
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Discover { output } => commands::discover::run(&config, &output),
        Commands::Download { folder, force } => {
            commands::download::run(&apply_overrides(config, folder, force, false))
        }
        Commands::Extract {
            input_file,
            country,
            date,
            region,
            strict,
            output,
            out,
        } => {
            let config = apply_overrides(config, None, false, strict);
            commands::extract::run(
                input_file,
                &country,
                &date,
                region.as_deref(),
                &config.template,
                &output,
                out,
            )
        }
        Commands::Run {
            folder,
            no_download,
            force,
            strict,
            output,
            out,
        } => {
            let mut config = apply_overrides(config, folder, force, strict);
            if no_download {
                config.download = false;
            }
            commands::run::run(&config, &output, out)
        }
        Commands::Stream { input_file, output } => commands::stream::run(input_file, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
