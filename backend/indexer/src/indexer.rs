//! Long-running background task that polls the Soroban RPC and writes
//! decoded campaign events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let (mut current_ledger, mut cursor) =
        load_resume_point(&state.pool, state.config.start_ledger).await;

    info!("Resuming from ledger {current_ledger}");

    loop {
        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(
                &state.pool,
                &state.client,
                &state.config,
                current_ledger,
                cursor.as_deref(),
            ) => result,
        };

        match result {
            Ok((next_ledger, next_cursor)) => {
                current_ledger = next_ledger;
                cursor = next_cursor;
            }
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopped at ledger {current_ledger}");
}

/// Load the persisted cursor; fall back to `start_ledger` when it can't be read.
async fn load_resume_point(pool: &SqlitePool, start_ledger: u32) -> (u32, Option<String>) {
    let last_ledger = match db::get_last_ledger(pool).await {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!("Failed to read last ledger, starting from {start_ledger}: {e}");
            0
        }
    };
    let cursor = match db::get_cursor_string(pool).await {
        Ok(cursor) => cursor,
        Err(e) => {
            warn!("Failed to read pagination cursor, starting without one: {e}");
            None
        }
    };
    (resume_ledger(last_ledger, start_ledger), cursor)
}

/// A persisted cursor wins over the configured start ledger.
fn resume_ledger(persisted: i64, configured: u32) -> u32 {
    if persisted > 0 {
        u32::try_from(persisted).unwrap_or(configured)
    } else {
        configured
    }
}

/// Perform a single poll iteration.
///
/// Returns `(next_start_ledger, next_cursor)`.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    start_ledger: u32,
    cursor: Option<&str>,
) -> Result<(u32, Option<String>)> {
    let page = rpc::fetch_events(
        client,
        &config.rpc_url,
        &config.contract_id,
        start_ledger,
        cursor,
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    // With a cursor the next call paginates from it and ignores the ledger;
    // without one it restarts from the latest ledger the RPC reported.
    let next_ledger = page
        .latest_ledger
        .and_then(|l| u32::try_from(l).ok())
        .map(|l| l.max(start_ledger))
        .unwrap_or(start_ledger);

    // Persist cursor so restarts are deterministic.
    db::save_cursor(pool, i64::from(next_ledger), page.cursor.as_deref()).await?;

    Ok((next_ledger, page.cursor))
}
