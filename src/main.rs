// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use configdns_sync::{
    client::http::HttpConfigDnsClient,
    codec,
    config::{Declarations, SyncConfig},
    constants::TOKIO_WORKER_THREADS,
    fingerprint::fingerprint,
    locks::LockRegistry,
    metrics,
    recordset::RecordKey,
    state::StateStore,
    sync::{DeleteOutcome, Drift, SyncOrchestrator},
    zone::{ZoneManager, ZoneOutcome},
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Synchronize declared DNS record sets with a remote DNS configuration API
#[derive(Debug, Parser)]
#[command(name = "configdns-sync", version, about)]
struct Cli {
    /// Engine configuration file (YAML). Environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ensure declared zones and synchronize every active record set
    Apply {
        /// Declarations file (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a record set by identifier
    Delete {
        /// `zone#host#type` or legacy `zone-host-type-fingerprint`
        id: String,
    },
    /// Adopt an existing remote record set and print its declaration
    Import {
        /// `zone#host#type` or legacy `zone-host-type-fingerprint`
        id: String,
    },
    /// Compare every synchronized record set with the remote
    Check,
    /// Print rdata and fingerprints of declared record sets without contacting the remote
    Fingerprint {
        /// Declarations file (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print metrics in the Prometheus text format
    Metrics,
}

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("configdns-sync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT (text | json)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    debug!("Logging initialized with file and line number tracking");

    match &cli.command {
        Command::Fingerprint { file } => return fingerprint_declarations(file).await,
        Command::Metrics => return print_metrics(),
        _ => {}
    }

    let config = SyncConfig::load(cli.config.as_deref()).await?;
    info!(endpoint = %config.endpoint, granularity = ?config.lock_granularity, "Starting configdns-sync");

    let client = Arc::new(HttpConfigDnsClient::new(
        &config.endpoint,
        config.access_token.clone(),
        config.request_timeout(),
    )?);
    let orchestrator = SyncOrchestrator::new(
        client.clone(),
        LockRegistry::new(config.lock_granularity),
        config.retry_policy(),
    );
    let mut store = StateStore::load(&config.state_file).await?;

    match cli.command {
        Command::Apply { file } => {
            let zones = ZoneManager::new(client);
            apply(&orchestrator, &zones, &mut store, &file).await
        }
        Command::Delete { id } => delete(&orchestrator, &mut store, &id).await,
        Command::Import { id } => import(&orchestrator, &mut store, &id).await,
        Command::Check => check(&orchestrator, &store).await,
        Command::Fingerprint { .. } | Command::Metrics => Ok(()),
    }
}

async fn apply(
    orchestrator: &SyncOrchestrator,
    zones: &ZoneManager,
    store: &mut StateStore,
    file: &Path,
) -> Result<()> {
    let declarations = Declarations::load(file).await?;

    for zone in &declarations.zones {
        match zones.ensure_zone(zone).await {
            Ok(ZoneOutcome::Created) => println!("zone {} created", zone.zone),
            Ok(ZoneOutcome::Existing) => debug!(zone = %zone.zone, "Zone already exists"),
            Err(e) => {
                error!(zone = %zone.zone, reason = e.status_reason(), error = %e, "Failed to ensure zone");
                bail!("zone {} could not be ensured: {e}", zone.zone);
            }
        }
    }

    let active: Vec<_> = declarations
        .records
        .iter()
        .filter(|set| {
            if !set.active {
                info!(record = %set.id(), "Skipping inactive record set");
            }
            set.active
        })
        .map(|set| (set, store.get(&set.key()).cloned()))
        .collect();

    // The lock registry serializes writers that share a record type
    let results = join_all(
        active
            .iter()
            .map(|(set, previous)| orchestrator.create_or_update(set, previous.as_ref())),
    )
    .await;

    let mut failures = 0usize;
    for ((set, _), result) in active.iter().zip(results) {
        match result {
            Ok(outcome) => {
                println!("{} {}", set.id(), outcome.action.as_str());
                store.put(outcome.state);
            }
            Err(e) => {
                failures += 1;
                println!("{} failed: {} ({e})", set.id(), e.status_reason());
            }
        }
    }

    store.save().await?;

    if failures > 0 {
        bail!("{failures} of {} record sets failed to synchronize", active.len());
    }
    info!(records = active.len(), "All record sets synchronized");
    Ok(())
}

async fn delete(orchestrator: &SyncOrchestrator, store: &mut StateStore, id: &str) -> Result<()> {
    let key: RecordKey = id.parse()?;
    match orchestrator.delete(&key).await? {
        DeleteOutcome::Deleted | DeleteOutcome::AlreadyAbsent => {
            println!("{key} deleted");
        }
        DeleteOutcome::Retained => {
            println!("{key} belongs to the zone and was left in place");
        }
    }
    if store.remove(&key).is_some() {
        store.save().await?;
    }
    Ok(())
}

async fn import(orchestrator: &SyncOrchestrator, store: &mut StateStore, id: &str) -> Result<()> {
    let record = orchestrator.import(id).await?;
    let yaml = serde_yaml::to_string(&record.record_set).context("Failed to render record set")?;
    print!("{yaml}");
    store.put(record.state);
    store.save().await
}

async fn check(orchestrator: &SyncOrchestrator, store: &StateStore) -> Result<()> {
    let mut drifted = 0usize;
    for stored in store.iter() {
        match orchestrator.read(&stored.id, stored).await {
            Ok(outcome) => match outcome.drift {
                Drift::InSync => println!("{} in sync", stored.id),
                Drift::Drifted { changed } => {
                    drifted += 1;
                    println!("{} drifted: {}", stored.id, changed.join(", "));
                }
                Drift::Missing => {
                    drifted += 1;
                    println!("{} missing", stored.id);
                }
            },
            Err(e) => {
                drifted += 1;
                warn!(record = %stored.id, error = %e, "Failed to read record set");
                println!("{} unreadable: {}", stored.id, e.status_reason());
            }
        }
    }
    if drifted > 0 {
        bail!("{drifted} of {} record sets are not in sync", store.len());
    }
    Ok(())
}

async fn fingerprint_declarations(file: &Path) -> Result<()> {
    let declarations = Declarations::load(file).await?;
    for set in &declarations.records {
        codec::validate(set).with_context(|| format!("{} is invalid", set.id()))?;
        let rdata = codec::encode(set).with_context(|| format!("{} does not encode", set.id()))?;
        println!("{} {}", set.id(), fingerprint(set.record_type(), &rdata));
        for token in &rdata {
            println!("  {token}");
        }
    }
    Ok(())
}

fn print_metrics() -> Result<()> {
    let text = metrics::gather_metrics().context("Failed to encode metrics")?;
    print!("{text}");
    Ok(())
}
