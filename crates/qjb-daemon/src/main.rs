// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `qjbd`: the job queue broker daemon.

use anyhow::Context;
use qjb_core::{Clock, SystemClock};
use qjb_daemon::{serve, DaemonConfig, Listener};
use qjb_engine::Broker;
use qjb_store::Store;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn config_path() -> Option<PathBuf> {
    std::env::var("QJB_CONFIG").ok().map(PathBuf::from).or_else(|| std::env::args().nth(1).map(PathBuf::from))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = DaemonConfig::load(config_path().as_deref()).context("loading daemon configuration")?;
    let mut store = qjb_store::MemoryStore::new();
    *store.config_mut() = config.broker.clone();
    let broker = Arc::new(Broker::with_store(store));

    let listener = Listener::bind(&config.bind).await.with_context(|| format!("binding to {}", config.bind))?;
    let started_at_epoch_ms = SystemClock.epoch_ms();
    tracing::info!(addr = %listener.local_addr_display(), started_at_epoch_ms, "qjbd listening");

    serve(listener, broker).await.context("accept loop failed")?;
    Ok(())
}
