//! CSP Violation Report Collector
//!
//! Receives browser security-policy violation reports and writes one
//! structured JSON record per request to a log sink.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────────────┐
//!     POST /report            │                 COLLECTOR                     │
//!     ────────────────────────┼─▶ http server ──▶ RequestEnvelope             │
//!                             │                       │                       │
//!                             │                       ▼                       │
//!                             │   metadata ──▶ classify ──▶ record ──▶ sink ──┼──▶ log lines
//!                             │                       │                       │
//!     200 / 500 ack           │                       ▼                       │
//!     ◀───────────────────────┼── http response ◀── ack response             │
//!                             └──────────────────────────────────────────────┘
//! ```
//!
//! `invoke` runs the same pipeline on one function-runtime event read from a
//! file or stdin.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use csp_report_collector::config::{load_config, CollectorConfig};
use csp_report_collector::observability::{logging, metrics};
use csp_report_collector::{lifecycle, sink, HttpServer, ReportPipeline, Shutdown};

#[derive(Parser)]
#[command(name = "csp-report-collector")]
#[command(about = "Collects CSP violation reports as structured log records", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP collector (default)
    Serve,
    /// Process one API Gateway HTTP event and print the response
    Invoke {
        /// Event JSON file; reads stdin when omitted
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CollectorConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Invoke { event } => invoke(config, event),
    }
}

async fn serve(config: CollectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("csp-report-collector v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        report_path = %config.endpoint.report_path,
        sink = ?config.sink.kind,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let sink = sink::from_config(&config.sink)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, sink);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn invoke(config: CollectorConfig, event: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let pipeline = ReportPipeline::new(sink::from_config(&config.sink)?);
    let response = pipeline.handle_event(&raw);

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
