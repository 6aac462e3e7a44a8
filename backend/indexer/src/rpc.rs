//! Soroban RPC client — polls `getEvents` and decodes campaign events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC codes `-32600` / `-32601` are treated as permanent and returned.
//!
//! ## Decoding
//!
//! Requests ask for `xdrFormat: "json"`, so each event carries `topicJson`
//! and `valueJson` in the stellar-xdr JSON encoding of `ScVal`
//! (`{"symbol":"contrib"}`, `{"address":"G…"}`, `{"i128":"5000"}`,
//! `{"map":[{"key":…,"val":…}]}`). Events that arrive without the JSON form
//! are skipped rather than stored as unknown.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Unique event id assigned by the RPC (`<toid>-<index>`)
    pub id: Option<String>,
    /// Topic list as ScVal JSON
    #[serde(default)]
    pub topic_json: Vec<Value>,
    /// Event data as ScVal JSON
    pub value_json: Option<Value>,
    pub contract_id: Option<String>,
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    pub ledger_closed_at: Option<String>,
    /// Events from reverted invocations are reported too; we skip them.
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger` — the ledger sequence to scan from (inclusive).
/// * `cursor`       — optional opaque pagination cursor from a previous response.
/// * `limit`        — maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let params = build_params(contract_id, start_ledger, cursor, limit);

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                backoff = sleep_and_grow(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {backoff}s)");
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {backoff}s): {} {}",
                err.code, err.message
            );
            backoff = sleep_and_grow(backoff).await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

async fn sleep_and_grow(backoff: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(backoff)).await;
    next_backoff(backoff)
}

fn next_backoff(backoff: u64) -> u64 {
    (backoff * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CampaignEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    let decoded: Vec<CampaignEvent> = raw
        .iter()
        .filter(|e| e.in_successful_contract_call.unwrap_or(true))
        .filter_map(|e| decode_single(e, contract_id))
        .collect();
    if decoded.len() < raw.len() {
        debug!("Skipped {} undecodable events", raw.len() - decoded.len());
    }
    decoded
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CampaignEvent> {
    let event_id = raw.id.clone()?;
    let kind = EventKind::from_topic(&scval_scalar(raw.topic_json.first()?)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let (data_actor, amount) = raw
        .value_json
        .as_ref()
        .map(|value| decode_data(value, kind))
        .unwrap_or((None, None));
    // Topic 1 always carries the triggering address; the payload is a fallback.
    let actor = raw.topic_json.get(1).and_then(scval_scalar).or(data_actor);

    Some(CampaignEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull the actor and amount out of the event's data map for each kind.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => (scval_field(value, "owner"), scval_field(value, "goal")),
        EventKind::ContributionReceived | EventKind::RefundIssued => (
            scval_field(value, "contributor"),
            scval_field(value, "amount"),
        ),
        EventKind::FundsWithdrawn => (scval_field(value, "owner"), scval_field(value, "amount")),
        EventKind::CampaignPaused | EventKind::CampaignUnpaused => {
            (scval_field(value, "owner"), None)
        }
        EventKind::Unknown => (None, None),
    }
}

/// Look up `key` in an `{"map":[{"key":…,"val":…}]}` ScVal.
fn scval_field(value: &Value, key: &str) -> Option<String> {
    value
        .get("map")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("key").and_then(scval_scalar).as_deref() == Some(key))
        .and_then(|entry| entry.get("val"))
        .and_then(scval_scalar)
}

/// Render a scalar ScVal (symbol, string, address or integer) as a string.
fn scval_scalar(value: &Value) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };
    let (tag, inner) = map.iter().next()?;
    match tag.as_str() {
        "symbol" | "string" | "address" => inner.as_str().map(String::from),
        "i128" | "u128" => int128_from_json(inner),
        "u64" | "i64" | "u32" | "i32" | "timepoint" | "duration" => json_number(inner),
        "bool" => inner.as_bool().map(|b| b.to_string()),
        _ => None,
    }
}

/// 128-bit integers come either as a decimal string / number or as
/// `{"hi":…,"lo":…}` parts.
fn int128_from_json(value: &Value) -> Option<String> {
    if let Some(s) = json_number(value) {
        return Some(s);
    }
    let hi = value.get("hi")?;
    let lo = value.get("lo")?.as_u64()?;
    let hi = hi.as_i64().map(i128::from).or_else(|| hi.as_u64().map(i128::from))?;
    Some(((hi << 64) | i128::from(lo)).to_string())
}

fn json_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
