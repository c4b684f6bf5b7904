use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bkt")]
#[command(about = "Bar-driven strategy backtester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured strategy over the configured bars and write artifacts
    Run {
        /// Layered config paths in merge order (later files override earlier)
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Exports root; overrides `exports.dir` from the config
        #[arg(long)]
        out: Option<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Load the config and build every strategy without running
    Validate {
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience, e.g. RUST_LOG).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Run { config_paths, out } => commands::run::run(&config_paths, out.as_deref()),
        Commands::ConfigHash { paths } => commands::config_hash(&paths),
        Commands::Validate { config_paths } => commands::validate(&config_paths),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
