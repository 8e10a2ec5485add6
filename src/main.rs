use anyhow::Result;
use apiweaver::engine::Engine;
use apiweaver::proxy::HttpBrokerProxy;
use apiweaver::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Workspace identifier
    #[arg(short, long, default_value = "1")]
    workspace: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover capabilities for a provider and print the synthesized tools
    Discover {
        /// Provider key known to the connection broker (e.g. "slack")
        provider: String,
    },
    /// Invoke a natural-language action against a provider
    Invoke {
        /// Provider key known to the connection broker
        provider: String,
        /// Free-text action, e.g. "send message"
        action: String,
        /// JSON payload for the call
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// List well-known providers and whether a connection exists
    Services,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = Config::load(&cli.config)?;
    let proxy = Arc::new(HttpBrokerProxy::new(&config.broker)?);
    let engine = Engine::new(proxy, config);

    match cli.command {
        Command::Discover { provider } => {
            let capabilities = engine.discover_capabilities(&provider, &cli.workspace).await;
            info!(
                "{}: {} endpoints, {} tools",
                provider,
                capabilities.endpoints.len(),
                capabilities.tools.len()
            );
            for tool in &capabilities.tools {
                println!(
                    "{}  [{} {}]  {}",
                    tool.name,
                    tool.method,
                    tool.primary_endpoint().path,
                    tool.description
                );
            }
        }
        Command::Invoke {
            provider,
            action,
            data,
        } => {
            let payload = serde_json::from_str(&data)?;
            let outcome = engine
                .invoke(&provider, &cli.workspace, &action, payload)
                .await?;
            if outcome.is_error {
                eprintln!("{}", outcome.text);
                std::process::exit(1);
            }
            println!("{}", outcome.text);
        }
        Command::Services => {
            for status in engine.list_connected_services(&cli.workspace).await {
                println!(
                    "{}  {}",
                    status.name,
                    if status.connected { "connected" } else { "not connected" }
                );
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}
