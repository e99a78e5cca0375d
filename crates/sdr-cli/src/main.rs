use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sdr")]
#[command(about = "Service discovery reconciler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the healthy endpoints of the configured application, one JSON object per line
    Resolve {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Override the configured application
        #[arg(long)]
        application: Option<String>,
    },

    /// Print the events that reconcile one registry snapshot into another
    Diff {
        /// Snapshot the view starts from
        #[arg(long)]
        from: String,

        /// Snapshot the view is reconciled against
        #[arg(long)]
        to: String,

        #[arg(long)]
        application: String,
    },

    /// Listen on the configured application and print events until ctrl-c
    Watch {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Exit after the initial refresh
        #[arg(long, default_value_t = false)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let loaded = sdr_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Resolve {
            config_paths,
            application,
        } => {
            commands::resolve::run_resolve(&config_paths, application)?;
        }

        Commands::Diff {
            from,
            to,
            application,
        } => {
            commands::resolve::run_diff(&from, &to, &application)?;
        }

        Commands::Watch { config_paths, once } => {
            commands::watch::run_watch(&config_paths, once).await?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
