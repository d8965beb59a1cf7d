use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::{env, net::SocketAddr};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memvault_server::{create_app, MemVaultServer};

/// MemVault Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "memvault-server")]
#[command(about = "Organization-scoped memory API server with ACL enforcement")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose);
    print_startup_banner();

    info!("Starting {}", "MemVault Engine HTTP Server".bright_cyan());
    info!("Version: {}", env!("CARGO_PKG_VERSION").bright_white());

    // Construct all collaborators once; the router shares them read-only
    let server = MemVaultServer::from_env()
        .await
        .context("Failed to initialize server state")?;

    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        "{}",
        format!("MemVault Engine server running on http://{}", addr).bright_green()
    );
    info!(
        "{}",
        format!("Health check available at: http://{}/health", addr).bright_blue()
    );
    info!(
        "{}",
        format!("API v1 available at: http://{}/api/v1", addr).bright_blue()
    );
    info!(
        "{}",
        format!("API docs available at: http://{}/docs", addr).bright_blue()
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "memvault_server={level},auth_acl={level},auth_identity={level},audit_engine={level},tower_http=info",
            level = default_level
        )
        .into()
    });

    let is_development =
        env::var("MEMVAULT_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(verbose),
            )
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .json(),
            )
            .init();
    }
}

fn print_startup_banner() {
    println!("{}", "╔══════════════════════════════════════════════════════════════╗".bright_cyan());
    println!("{}", "║                       MEMVAULT ENGINE                        ║".bright_cyan());
    println!("{}", "║           Organization-Scoped Memory API with ACLs           ║".bright_cyan());
    println!("{}", "╚══════════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}
