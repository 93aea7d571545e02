//! valop - execute named remote operations from the command line
//!
//! Subcommands:
//! - `valop list` - Show the operation table
//! - `valop exec <operation>` - POST a filter and print the decoded result
//! - `valop config` - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use valconf::{ConfigSources, ValopConfig};
use valop::{logging, Dispatcher, HttpTransport, OperationRegistry};

#[derive(Parser)]
#[command(name = "valop")]
#[command(about = "Execute named remote operations")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./valop.toml)
    #[arg(long, global = true, env = "VALOP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered operations
    List,

    /// Execute an operation and print the decoded response
    Exec {
        /// Operation name (case-sensitive), e.g. ValOperations
        operation: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        filter: String,

        /// Override the configured base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = ValopConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Config => print_config(&config, &sources),
        Commands::List => {
            let _log_guard = init_logging(&config)?;
            list(&OperationRegistry::standard());
        }
        Commands::Exec {
            operation,
            filter,
            base_url,
        } => {
            let _log_guard = init_logging(&config)?;
            if let Some(url) = base_url {
                config.client.base_url = url;
            }
            exec(&config, &operation, &filter).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &ValopConfig) -> Result<logging::LogGuard> {
    logging::init(&config.logging).context("Failed to initialize logging")
}

async fn exec(config: &ValopConfig, operation: &str, filter: &str) -> Result<()> {
    let filter: Value = serde_json::from_str(filter)
        .with_context(|| format!("--filter is not valid JSON: {}", filter))?;

    tracing::info!(
        operation = %operation,
        base_url = %config.client.base_url,
        "executing operation"
    );

    let dispatcher = Dispatcher::new(
        OperationRegistry::standard(),
        HttpTransport::from_config(&config.client),
    );
    let result = dispatcher
        .execute_value(operation, &filter)
        .await
        .with_context(|| format!("Operation {} failed", operation))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn list(registry: &OperationRegistry) {
    let name_width = registry.iter().map(|d| d.name().len()).max().unwrap_or(0);
    let path_width = registry.iter().map(|d| d.path().len()).max().unwrap_or(0);

    for descriptor in registry.iter() {
        println!(
            "{:name_width$}  {:path_width$}  {}",
            descriptor.name(),
            descriptor.path(),
            descriptor.shape(),
        );
    }
}

fn print_config(config: &ValopConfig, sources: &ConfigSources) {
    print!("{}", config.to_toml());

    println!();
    if sources.files.is_empty() {
        println!("# sources: defaults only");
    }
    for file in &sources.files {
        println!("# loaded: {}", file.display());
    }
    for var in &sources.env_overrides {
        println!("# env: {}", var);
    }
}
