use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use crate::models::ChartEntry;

// Shared client for all backend calls
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    reqwest::ClientBuilder::new()
        .pool_idle_timeout(Duration::from_secs(300))
        .pool_max_idle_per_host(20)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .tcp_keepalive(Duration::from_secs(30))
        .user_agent("validators-health-dashboard/1.0")
        .build()
        .expect("Failed to create HTTP client")
});

async fn get_json<T>(url: &str) -> Result<T, String>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| format!("[{}] {}", request_id, e))?;

    if !response.status().is_success() {
        return Err(format!("[{}] HTTP error: {}", request_id, response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("[{}] {}", request_id, e))?;
    let parsed: T =
        serde_json::from_str(&body).map_err(|e| format!("[{}] parse error: {}", request_id, e))?;

    println!(
        "[{}] [{}] GET {} ({}ms)",
        Utc::now().to_rfc3339(),
        request_id,
        url,
        started.elapsed().as_millis()
    );
    Ok(parsed)
}

/// Fetches the raw validator statuses body. The body stays a `Value`
/// here; the snapshot builder owns the schema gate so a malformed shape
/// degrades to an empty list instead of a failed request.
pub async fn fetch_validator_statuses(
    base_url: &str,
    from: i64,
    to: i64,
    cycle_id: Option<u32>,
) -> Result<Value, String> {
    let mut url = format!(
        "{}/api/validator-statuses?from={}&to={}",
        base_url.trim_end_matches('/'),
        from,
        to
    );
    if let Some(cycle_id) = cycle_id {
        url.push_str(&format!("&cycle_id={}", cycle_id));
    }
    get_json(&url).await
}

pub async fn fetch_chart(
    base_url: &str,
    adnl: &str,
    from: i64,
    to: i64,
) -> Result<Vec<ChartEntry>, String> {
    let url = format!(
        "{}/api/chart?adnl={}&from={}&to={}",
        base_url.trim_end_matches('/'),
        adnl,
        from,
        to
    );
    get_json(&url).await
}

/// Tags navigation-triggered fetches with a monotonic id so a stale
/// response can never overwrite state produced by a newer one
/// (last-request-wins instead of last-response-wins).
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    /// Hands out the next request id.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// True if `seq` is the newest id seen so far; the caller may then
    /// apply the response it tagged. False means a newer response
    /// already landed.
    pub fn commit(&self, seq: u64) -> bool {
        let mut current = self.applied.load(Ordering::Relaxed);
        loop {
            if seq <= current {
                return false;
            }
            match self
                .applied
                .compare_exchange(current, seq, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}
