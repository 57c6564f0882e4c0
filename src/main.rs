use anyhow::Result;
use aztfmove::commands::{self, SelectionArgs};
use aztfmove::config::{self, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aztfmove")]
#[command(
    about = "Move Azure resources managed by Terraform to another resource group",
    long_about = "aztfmove selects Azure resources from a Terraform state, checks that they can be moved together\nand predicts the IDs they get in the target resource group.\n\nThe plan lists:\n  - resources Azure cannot move\n  - resources blocking the move\n  - resource IDs to submit to the Azure move API\n  - IDs to correct in the Terraform state afterwards"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true)]
    format: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what would be moved and which state IDs would change
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Write a copy of the state with the IDs the resources get after the move
    Correct {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output path for the corrected state
        #[arg(long)]
        out: PathBuf,
    },
    /// Initialize aztfmove configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".aztfmove.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - only warnings and errors unless verbose
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    if cli.no_color || !config.output.color {
        console::set_colors_enabled(false);
    }
    let output_format = cli
        .format
        .clone()
        .unwrap_or_else(|| config.output.format.clone());

    match cli.command {
        Commands::Plan { selection } => {
            commands::handle_plan(&selection, &config, &output_format)?;
        }
        Commands::Correct { selection, out } => {
            commands::handle_correct(&selection, &out, &config, &output_format)?;
        }
        Commands::Init { output } => {
            config::init_config(&output)?;
        }
    }

    Ok(())
}
