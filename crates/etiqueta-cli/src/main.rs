mod commands;
mod output;

use clap::{Parser, Subcommand};
use etiqueta_core::model::Market;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "etiqueta",
    version,
    about = "Reconcile UPC assignment PDFs with production planning sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract UPC records from one or more UPC assignment PDFs
    Extract {
        /// Paths to PDF files
        #[arg(required = true)]
        pdf_files: Vec<PathBuf>,

        /// Vertical tolerance in points for grouping words into lines
        #[arg(long, value_name = "POINTS")]
        line_tolerance: Option<f32>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted records to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Normalize a planning workbook into canonical rows
    Sheet {
        /// Path to XLSX file
        xlsx_file: PathBuf,

        /// Predefined profile whose sheet layout to use: upc-sticker, case-content
        #[arg(short, long = "preset", default_value = "upc-sticker")]
        preset: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Build a label report from a planning workbook and UPC PDFs
    Build {
        /// Path to XLSX planning workbook
        xlsx_file: PathBuf,

        /// Paths to PDF files
        #[arg(required = true)]
        pdf_files: Vec<PathBuf>,

        /// Predefined profile: upc-sticker (default), case-content
        #[arg(short, long = "preset", value_name = "NAME")]
        preset: Option<String>,

        /// Custom JSON profile file (overrides --preset)
        #[arg(long = "profile-file", value_name = "FILE")]
        profile_file: Option<PathBuf>,

        /// Market option(s): japan, canada, brazil
        #[arg(short, long = "market", value_name = "MARKET", value_parser = parse_market)]
        market: Vec<Market>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the report to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Manage and inspect report profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Print a predefined profile as JSON
    Show {
        /// Preset name (e.g., "case-content")
        preset: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

fn parse_market(s: &str) -> Result<Market, String> {
    Market::from_str_loose(s)
        .ok_or_else(|| format!("unknown market '{s}' (expected japan, canada or brazil)"))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Extract {
            pdf_files,
            line_tolerance,
            output,
            out,
        } => commands::extract::run(pdf_files, line_tolerance, &output, out),
        Commands::Sheet {
            xlsx_file,
            preset,
            output,
        } => commands::sheet::run(xlsx_file, &preset, &output),
        Commands::Build {
            xlsx_file,
            pdf_files,
            preset,
            profile_file,
            market,
            output,
            out,
        } => commands::build::run(commands::build::BuildArgs {
            xlsx_file,
            pdf_files,
            preset,
            profile_file,
            markets: market,
            output_format: output,
            output_file: out,
        }),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Show { preset } => commands::profiles::show(&preset),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
