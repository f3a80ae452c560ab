/// kind-provider - local kind clusters as a declarative resource
///
/// Each lifecycle subcommand reads the resource state as JSON, drives the
/// `kind` executable and prints the resulting state as JSON on stdout.
mod config;
mod error;
mod kind;
mod kubeconfig;
mod resource;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ProviderConfig;
use crate::kind::{KindClient, ProcessRunner};
use crate::resource::{
    kind_cluster_schema, requires_replacement, ClusterState, KindClusterResource,
};

#[derive(Parser)]
#[command(name = "kind-provider")]
#[command(about = "Manage local kind clusters as a declarative resource", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Provider configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the cluster described by a state file
    Create {
        /// Resource state JSON file, `-` for stdin
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Refresh host and credentials of an existing cluster
    Read {
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Apply an in-place update (re-reads the cluster)
    Update {
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Delete the cluster and clear its id
    Delete {
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Report whether moving between two states needs a replacement
    Plan {
        #[arg(long)]
        prior: PathBuf,

        #[arg(long)]
        desired: PathBuf,
    },

    /// Print the resource schema
    Schema,

    /// List the clusters kind knows about
    Clusters,

    /// Generate example configuration file
    Init {
        #[arg(default_value = "kind-provider.yaml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the resource state
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("kind_provider={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted");
            on_signal.cancel();
        }
    });

    // Dropping `run` on cancellation also kills any running kind child
    match until_cancelled(&cancel, run(cli, cancel.clone())).await {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
        None => std::process::exit(130),
    }
}

/// Drive `fut` to completion unless `token` is cancelled first
async fn until_cancelled<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        output = fut => Some(output),
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    match cli.command {
        Commands::Schema => return print_json(&kind_cluster_schema()),
        Commands::Init { ref path } => return init_config(path).await,
        Commands::Plan {
            ref prior,
            ref desired,
        } => return plan(prior, desired).await,
        _ => {}
    }

    let config =
        ProviderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let runner = ProcessRunner::new(&config.kind_path)
        .with_timeout(config.timeout())
        .with_cancellation(cancel);
    let resource = KindClusterResource::new(KindClient::new(runner));

    match cli.command {
        Commands::Create { ref state } => {
            resource
                .client()
                .check_installed()
                .await
                .context("kind is required")?;
            let desired = read_state(state).await?;
            let created = resource.create(&desired).await?;
            print_json(&created)
        }
        Commands::Read { ref state } => {
            let current = read_state(state).await?;
            print_json(&resource.read(&current).await?)
        }
        Commands::Update { ref state } => {
            let current = read_state(state).await?;
            print_json(&resource.update(&current).await?)
        }
        Commands::Delete { ref state } => {
            let current = read_state(state).await?;
            if !current.is_present() {
                warn!("State for {} has no id, deleting by name", current.name);
            }
            print_json(&resource.delete(&current).await?)
        }
        Commands::Clusters => {
            for name in resource.client().list_clusters().await? {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Schema | Commands::Init { .. } | Commands::Plan { .. } => Ok(()),
    }
}

async fn plan(prior: &Path, desired: &Path) -> Result<()> {
    let prior = read_state(prior).await?;
    let desired = read_state(desired).await?;

    let replace = requires_replacement(&prior, &desired);
    if replace {
        info!("Cluster {} must be replaced", prior.name);
    }
    print_json(&serde_json::json!({ "requires_replacement": replace }))
}

/// Initialize example configuration file
async fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration file already exists: {}", path.display());
    }

    let yaml = serde_yaml::to_string(&ProviderConfig::example())?;
    tokio::fs::write(path, yaml)
        .await
        .context("Failed to write configuration file")?;

    info!("Example configuration created: {}", path.display());
    Ok(())
}

async fn read_state(path: &Path) -> Result<ClusterState> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read state from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read state file {}", path.display()))?
    };

    serde_json::from_str(&content).context("Failed to parse resource state")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
