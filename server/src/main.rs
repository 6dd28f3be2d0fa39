//! Licensor renewal server
//!
//! Issues license envelopes over HTTP:
//! 1. Loads the issuer private key and certificate once at startup
//! 2. Answers `/v1/renew` with a freshly sealed envelope per request
//!
//! Usage:
//!   licensor-server --port 3000 --private-key private_key.pem --certificate certificate.pem
//!
//! The server is stateless; nothing about issued licenses is stored.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use licensor_envelope::DEFAULT_VALIDITY_YEARS;
use licensor_server::{build_router, load_issuer, IssuerConfig, RENEW_PATH};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// How long in-flight requests may drain after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "licensor-server")]
#[command(about = "Licensor license renewal server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to the issuer RSA private key (PEM)
    #[arg(long, default_value = "private_key.pem")]
    private_key: PathBuf,

    /// Path to the issuer X.509 certificate (PEM)
    #[arg(long, default_value = "certificate.pem")]
    certificate: PathBuf,

    /// Validity window of issued licenses in years
    #[arg(long, default_value_t = DEFAULT_VALIDITY_YEARS)]
    validity_years: u32,

    /// JSON entitlement plan to grant instead of the built-in one
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Licensor server starting...");
    let issuer = Arc::new(load_issuer(&IssuerConfig {
        private_key: args.private_key,
        certificate: args.certificate.clone(),
        validity_years: args.validity_years,
        plan: args.plan,
    })?);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
    let addr = listener.local_addr().context("failed to read listen address")?;
    let shutdown = ShutdownSignal::register()?;

    println!("\n========================================");
    println!("  Licensor Server Running");
    println!("========================================");
    println!("  Listening:   http://{addr}{RENEW_PATH}");
    println!("  Validity:    {} years", issuer.policy().validity_years);
    println!("  Certificate: {}", args.certificate.display());
    println!("========================================\n");

    axum::serve(listener, build_router(issuer))
        .with_graceful_shutdown(shutdown.wait())
        .await
        .context("HTTP server failed")?;

    info!("Licensor server stopped");
    Ok(())
}

/// SIGINT and SIGTERM, registered before the server starts accepting.
struct ShutdownSignal {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    fn register() -> Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                sigterm: signal(SignalKind::terminate()).context("failed to register SIGTERM")?,
                sigint: signal(SignalKind::interrupt()).context("failed to register SIGINT")?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Resolves on the first signal, then arms the drain deadline.
    async fn wait(self) {
        #[cfg(unix)]
        {
            let Self { mut sigterm, mut sigint } = self;
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("Received SIGINT, shutting down"),
            }
        }
        #[cfg(not(unix))]
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
        }

        tokio::spawn(async {
            tokio::time::sleep(DRAIN_TIMEOUT).await;
            error!("Connections did not drain within {:?}, exiting", DRAIN_TIMEOUT);
            std::process::exit(1);
        });
    }
}
