//! wasmbus host daemon.
//!
//! Boots a host supervisor, keeps it alive until SIGINT, then runs the
//! graceful shutdown sequence (purge providers, publish `host_stopped`,
//! drain) and exits the process.
//!
//! # Configuration
//!
//! All host options are read from `WASMBUS_*` environment variables
//! over compile-time defaults; the few flags below override the
//! environment. Host labels come from `HOST_*` variables merged over
//! platform detection.
//!
//! The lattice bus client is wired externally; until one is supplied
//! this binary runs with the no-op client, which drops publishes and
//! answers no requests. That is enough to exercise provider
//! supervision locally.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wasmbus_host::{HostOptions, HostSupervisor, NoopLattice};

/// wasmbus host daemon
#[derive(Parser, Debug)]
#[command(name = "wasmbus-hostd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Lattice namespace prefix (overrides WASMBUS_LATTICE_PREFIX)
    #[arg(long)]
    lattice_prefix: Option<String>,

    /// Host public key (overrides WASMBUS_HOST_KEY; generated if empty)
    #[arg(long)]
    host_key: Option<String>,

    /// Lattice request timeout in milliseconds
    #[arg(long)]
    rpc_timeout_ms: Option<u64>,

    /// Ask the config service for supplemental configuration at boot
    #[arg(long)]
    config_service: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut options = HostOptions::from_env();
    if let Some(prefix) = args.lattice_prefix {
        options.lattice_prefix = prefix;
    }
    if let Some(host_key) = args.host_key {
        options.host_key = host_key;
    }
    if let Some(timeout) = args.rpc_timeout_ms {
        options.rpc_timeout_ms = timeout;
    }
    if args.config_service {
        options.config_service_enabled = true;
    }

    let host = HostSupervisor::start(options, Arc::new(NoopLattice)).await;

    info!(
        host_key = %host.state().host_key(),
        friendly_name = %host.state().friendly_name(),
        "host running, press ctrl-c to stop"
    );

    tokio::signal::ctrl_c().await?;

    host.stop().await;
    std::process::exit(0);
}
