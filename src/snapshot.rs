use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{StatusSample, ValidatorMeta, ValidatorRecord};

/// Builds the validator list from a raw `/api/validator-statuses`
/// response body. One record per key in `meta`, in the key order the
/// backend sent; keys that only appear in `statuses` are ignored.
///
/// A body without a `meta` object is logged and yields an empty list
/// rather than an error, so a malformed upstream response degrades to
/// an empty table.
pub fn build_validator_records(raw: &Value) -> Vec<ValidatorRecord> {
    let meta = match raw.get("meta").and_then(Value::as_object) {
        Some(meta) => meta,
        None => {
            eprintln!(
                "[{}] validator-statuses response has no 'meta' mapping, rendering empty list",
                Utc::now().to_rfc3339()
            );
            return Vec::new();
        }
    };
    let statuses = raw.get("statuses").and_then(Value::as_object);

    let mut records = Vec::with_capacity(meta.len());
    for (adnl, meta_value) in meta {
        let parsed = match ValidatorMeta::deserialize(meta_value) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!(
                    "[{}] malformed meta entry for {}: {}",
                    Utc::now().to_rfc3339(),
                    adnl,
                    e
                );
                ValidatorMeta::default()
            }
        };

        let samples = statuses
            .and_then(|all| all.get(adnl))
            .and_then(Value::as_object)
            .map(collect_samples)
            .unwrap_or_default();

        records.push(ValidatorRecord {
            adnl: adnl.clone(),
            stake: parsed.stake,
            weight: parsed.weight,
            index: parsed.index,
            wallet_address: parsed.wallet_address,
            // The backend already averages; this only fixes the display
            // precision.
            avg_efficiency: (parsed.avg_efficiency * 100.0).round() / 100.0,
            statuses: samples,
        });
    }
    records
}

fn collect_samples(entries: &serde_json::Map<String, Value>) -> Vec<StatusSample> {
    let mut samples = Vec::with_capacity(entries.len());
    for (timestamp, value) in entries {
        let timestamp = match timestamp.parse::<i64>() {
            Ok(ts) => ts,
            Err(_) => continue,
        };
        // -1 is the backend's "no data" sentinel; anything non-numeric
        // is treated the same way instead of leaking NaN into the UI.
        let status = match value.as_f64() {
            Some(v) if v != -1.0 => Some(v),
            _ => None,
        };
        samples.push(StatusSample { timestamp, status });
    }
    samples
}
