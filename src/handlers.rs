use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;

use crate::annotations::annotate_series;
use crate::models::{Annotation, EfficiencyPoint, TimelineSegment, ValidatorRecord};
use crate::snapshot::build_validator_records;
use crate::table::{format_number_to_text, SortColumn, SortDirection, SortOrder};
use crate::timeline::compress_timeline;
use crate::upstream::{self, RequestSequencer};

/// Missing range bounds fall back to the trailing hour.
const DEFAULT_WINDOW_SECS: i64 = 60 * 60;

pub struct AppState {
    pub upstream_url: String,
    pub sequencer: RequestSequencer,
    pub latest: RwLock<Option<ValidatorsReply>>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRow {
    #[serde(flatten)]
    pub record: ValidatorRecord,
    pub stake_text: String,
    pub weight_text: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ValidatorsReply {
    pub from: i64,
    pub to: i64,
    pub seq: u64,
    pub sort: SortOrder,
    pub validators: Vec<ValidatorRow>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChartReply {
    pub adnl: String,
    pub from: i64,
    pub to: i64,
    pub efficiency: Vec<EfficiencyPoint>,
    pub annotations: Vec<Annotation>,
    pub timeline: Vec<TimelineSegment>,
}

/// Resolves the `from`/`to` view bounds. If either is missing the
/// trailing hour is used and echoed back so the page can write it into
/// the URL; an inverted range is rejected before any backend call.
fn resolve_range(params: &HashMap<String, String>, now: i64) -> Result<(i64, i64), String> {
    let (from, to) = match (params.get("from"), params.get("to")) {
        (Some(from), Some(to)) => {
            let from = from
                .parse::<i64>()
                .map_err(|_| "Invalid param 'from'".to_string())?;
            let to = to
                .parse::<i64>()
                .map_err(|_| "Invalid param 'to'".to_string())?;
            (from, to)
        }
        _ => (now - DEFAULT_WINDOW_SECS, now),
    };

    if from > to {
        return Err("'from' must be earlier than 'to'".to_string());
    }
    Ok((from, to))
}

/// Resolves the table sort from the page's current order plus an
/// optionally clicked header column.
fn resolve_sort(params: &HashMap<String, String>) -> SortOrder {
    let mut order = SortOrder::default();
    if let Some(column) = params.get("sort").and_then(|v| SortColumn::parse(v)) {
        order.column = column;
    }
    if let Some(direction) = params.get("dir").and_then(|v| SortDirection::parse(v)) {
        order.direction = direction;
    }
    match params.get("clicked").and_then(|v| SortColumn::parse(v)) {
        Some(column) => order.toggled(column),
        None => order,
    }
}

pub async fn get_validators(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ValidatorsReply>, (StatusCode, String)> {
    let now = Utc::now().timestamp();
    let (from, to) = resolve_range(&params, now).map_err(|message| (StatusCode::BAD_REQUEST, message))?;
    let cycle_id = params.get("cycle_id").and_then(|v| v.parse::<u32>().ok());
    let sort = resolve_sort(&params);

    let seq = state.sequencer.begin();
    let raw = upstream::fetch_validator_statuses(&state.upstream_url, from, to, cycle_id)
        .await
        .map_err(|e| {
            eprintln!(
                "[{}] validator-statuses fetch failed: {}",
                Utc::now().to_rfc3339(),
                e
            );
            (
                StatusCode::BAD_GATEWAY,
                "Couldn't get validator statuses".to_string(),
            )
        })?;

    let mut records = build_validator_records(&raw);
    sort.apply(&mut records);

    let validators = records
        .into_iter()
        .map(|record| {
            let stake_text = format_number_to_text(record.stake);
            let weight_text = format_number_to_text(record.weight);
            ValidatorRow {
                record,
                stake_text,
                weight_text,
            }
        })
        .collect();

    let reply = ValidatorsReply {
        from,
        to,
        seq,
        sort,
        validators,
    };

    if state.sequencer.commit(seq) {
        *state.latest.write().unwrap() = Some(reply.clone());
    } else {
        println!(
            "[{}] snapshot response {} superseded, not applied",
            Utc::now().to_rfc3339(),
            seq
        );
    }

    Ok(Json(reply))
}

/// The newest committed snapshot, for first paint before a ranged
/// fetch lands.
pub async fn get_latest_validators(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValidatorsReply>, (StatusCode, String)> {
    let latest = state.latest.read().unwrap().clone();
    match latest {
        Some(reply) => Ok(Json(reply)),
        None => Err((StatusCode::NOT_FOUND, "No snapshot fetched yet".to_string())),
    }
}

pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ChartReply>>, (StatusCode, String)> {
    let adnls: Vec<String> = params
        .get("adnl")
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if adnls.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Required param: 'adnl'".to_string()));
    }

    let now = Utc::now().timestamp();
    let (from, to) = resolve_range(&params, now).map_err(|message| (StatusCode::BAD_REQUEST, message))?;

    let fetches = adnls
        .iter()
        .map(|adnl| upstream::fetch_chart(&state.upstream_url, adnl, from, to));
    let results = join_all(fetches).await;

    let mut replies = Vec::with_capacity(adnls.len());
    for (adnl, result) in adnls.into_iter().zip(results) {
        let entries = result.map_err(|e| {
            eprintln!(
                "[{}] chart fetch failed for {}: {}",
                Utc::now().to_rfc3339(),
                adnl,
                e
            );
            (StatusCode::BAD_GATEWAY, "Couldn't get chart data".to_string())
        })?;

        // The backend answers with one entry per requested ADNL; take
        // the matching one, or the first when entries are untagged.
        let efficiency = entries
            .into_iter()
            .find(|entry| match &entry.adnl {
                Some(entry_adnl) => *entry_adnl == adnl,
                None => true,
            })
            .map(|entry| entry.efficiency)
            .unwrap_or_default();
        let annotations = annotate_series(&efficiency);
        let timeline = compress_timeline(&efficiency, now);

        replies.push(ChartReply {
            adnl,
            from,
            to,
            efficiency,
            annotations,
            timeline,
        });
    }
    Ok(Json(replies))
}
