// pool-node/src/main.rs
use clap::{Parser, Subcommand};
use pool_node::{LedgerConfig, ScriptRunner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pool-ledger")]
#[command(about = "Pooled deposit ledger", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./ledger.toml")]
        output: String,
    },

    /// Apply a JSON operation script and print the resulting state
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "./ledger.toml")]
        config: String,

        /// Script file path
        #[arg(short, long)]
        script: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "pool_node={0},liquidity={0},rewards={0},ledger_core={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { output } => init_config(&output)?,
        Commands::Run { config, script } => run_script(&config, &script)?,
    }

    Ok(())
}

fn init_config(output: &str) -> anyhow::Result<()> {
    LedgerConfig::default().to_file(output)?;
    tracing::info!("Default configuration written to {}", output);
    Ok(())
}

fn run_script(config_path: &str, script_path: &str) -> anyhow::Result<()> {
    tracing::info!("Loading configuration from {}", config_path);
    let config = LedgerConfig::from_file(config_path)?;
    let operations = ScriptRunner::load_script(script_path)?;
    tracing::info!("Running {} operations from {}", operations.len(), script_path);

    let mut runner = ScriptRunner::new(&config)?;
    let failed = runner.run(operations).iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        tracing::warn!("{} operations were rejected", failed);
    }

    println!("{}", serde_json::to_string_pretty(&runner.report())?);
    Ok(())
}
