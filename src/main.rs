mod config;
mod delivery;
mod error;
mod fetch;
mod parser;
mod report;
mod server;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use config::Config;

#[derive(Parser)]
#[command(name = "invoice_relay", about = "Order-export invoice extractor and relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Convert a local HTML export into an invoice report
    Convert {
        /// Path of the exported order listing
        input: PathBuf,
        /// Where to write the rendered report
        #[arg(short, long, default_value = "all_orders.html")]
        output: PathBuf,
        /// Also deliver the report to the configured Telegram chat
        #[arg(long)]
        deliver: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Serve { host, port } => server::run(config, &host, port).await,
        Commands::Convert {
            input,
            output,
            deliver,
        } => convert(config, &input, &output, deliver).await,
    }
}

/// The same extract → render → deliver pipeline as the service, over a local
/// file. Zero orders is a failure here too.
async fn convert(config: Config, input: &PathBuf, output: &PathBuf, deliver: bool) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let orders = parser::parse_orders(&html);
    if orders.is_empty() {
        bail!("No orders found in {}", input.display());
    }

    let rendered = report::render(&orders);
    std::fs::write(output, &rendered)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} orders to {}", orders.len(), output.display());

    if deliver {
        let client = reqwest::Client::new();
        let filename = output
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(server::DEFAULT_FILENAME);
        let outcome = delivery::send_document(
            &client,
            &config,
            rendered.into_bytes(),
            filename,
            delivery::DEFAULT_CAPTION,
        )
        .await;
        if outcome.ok {
            println!("Delivered {} to Telegram.", filename);
        } else {
            println!("Delivery failed: {}", outcome.response);
        }
    }

    Ok(())
}
