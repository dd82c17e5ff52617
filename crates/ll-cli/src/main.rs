//! CLI frontend for Legendlore DPR reports.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use ll_dpr::RollMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ll",
    about = "Legendlore: damage-per-round estimates for creature stat blocks",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show DPR across the AC sweep for creatures in a bestiary
    Dpr {
        /// Creature names (case-insensitive; default: every creature)
        names: Vec<String>,

        /// Target AC to include; repeat for a custom sweep
        #[arg(long = "ac")]
        armor_classes: Vec<f64>,

        /// Decimal places for DPR values
        #[arg(long)]
        decimals: Option<usize>,

        /// Attack roll mode: normal, advantage, disadvantage
        #[arg(short, long)]
        mode: Option<RollMode>,

        /// Bestiary JSON file
        #[arg(short, long, default_value = "bestiary.json")]
        file: PathBuf,
    },

    /// Explain how a creature's multiattack text was classified
    Classify {
        /// Creature name (case-insensitive)
        name: String,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,

        /// Bestiary JSON file
        #[arg(short, long, default_value = "bestiary.json")]
        file: PathBuf,
    },

    /// Aggregate DPR, AC and hit points for a group of creatures
    Stats {
        /// Creature names; repeat a name to add several of it
        #[arg(required = true)]
        names: Vec<String>,

        /// Target AC
        #[arg(long, default_value = "15")]
        ac: f64,

        /// Attack roll mode: normal, advantage, disadvantage
        #[arg(short, long)]
        mode: Option<RollMode>,

        /// Bestiary JSON file
        #[arg(short, long, default_value = "bestiary.json")]
        file: PathBuf,
    },

    /// Compare two groups head to head
    Vs {
        /// Comma-separated creature names of the first group
        #[arg(long, value_delimiter = ',', required = true)]
        ours: Vec<String>,

        /// Comma-separated creature names of the second group
        #[arg(long, value_delimiter = ',', required = true)]
        theirs: Vec<String>,

        /// Attack the plain average AC instead of the hit-point-weighted one
        #[arg(long)]
        average: bool,

        /// Attack roll mode: normal, advantage, disadvantage
        #[arg(short, long)]
        mode: Option<RollMode>,

        /// Bestiary JSON file
        #[arg(short, long, default_value = "bestiary.json")]
        file: PathBuf,
    },

    /// Roll a dice expression such as 2d6+3
    Roll {
        /// Dice expression
        expr: String,

        /// Number of rolls
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dpr {
            names,
            armor_classes,
            decimals,
            mode,
            file,
        } => commands::dpr::run(&file, &names, armor_classes, decimals, mode),
        Commands::Classify { name, json, file } => commands::classify::run(&file, &name, json),
        Commands::Stats {
            names,
            ac,
            mode,
            file,
        } => commands::stats::run(&file, &names, ac, mode),
        Commands::Vs {
            ours,
            theirs,
            average,
            mode,
            file,
        } => commands::vs::run(&file, &ours, &theirs, average, mode),
        Commands::Roll { expr, times, seed } => commands::roll::run(&expr, times, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
