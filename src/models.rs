use serde::{Deserialize, Deserializer, Serialize};

/// One efficiency measurement slot for a validator. `status` is `None`
/// when the backend reported the `-1` "no data" sentinel for the slot,
/// which is distinct from a measured 0.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StatusSample {
    pub timestamp: i64,
    pub status: Option<f64>,
}

/// Per-validator metadata as served by the backend. `stake` and
/// `weight` arrive as JSON strings, `avg_efficiency` as a number; the
/// lenient deserializer accepts either form for all three.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ValidatorMeta {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stake: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_efficiency: f64,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s.trim().parse().unwrap_or(0.0),
    })
}

/// A validator row as rendered by the dashboard, keyed by ADNL.
/// Rebuilt from scratch on every fetch.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorRecord {
    pub adnl: String,
    pub stake: f64,
    pub weight: f64,
    pub index: u32,
    pub wallet_address: String,
    pub avg_efficiency: f64,
    pub statuses: Vec<StatusSample>,
}

/// Cycle identifiers are numeric upstream but the chart payload allows
/// either form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CycleId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleId::Number(n) => write!(f, "{}", n),
            CycleId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One point of a single validator's efficiency series, ascending by
/// timestamp.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EfficiencyPoint {
    pub timestamp: i64,
    pub value: f64,
    pub cycle_id: CycleId,
}

/// One element of the backend `/api/chart` response array.
#[derive(Debug, Deserialize, Clone)]
pub struct ChartEntry {
    #[serde(default)]
    pub adnl: Option<String>,
    #[serde(default)]
    pub efficiency: Vec<EfficiencyPoint>,
}

/// Binary health classification of an efficiency value. The cutoff
/// differs per consumer, so it is an argument rather than baked in.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Fail,
}

impl HealthStatus {
    pub fn from_value(value: f64, cutoff: f64) -> Self {
        if value >= cutoff {
            HealthStatus::Ok
        } else {
            HealthStatus::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "OK",
            HealthStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Status,
    Cycle,
}

/// A vertical marker on the efficiency chart. Keys are unique within
/// one annotation pass and regenerated on every pass.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Annotation {
    pub key: String,
    pub kind: AnnotationKind,
    pub at: i64,
    pub label: String,
}

/// A maximal run of samples sharing one health classification. The
/// newest segment's duration is measured against wall clock, so it
/// grows between recomputations.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub status: HealthStatus,
    pub start_timestamp: i64,
    pub duration_minutes: i64,
}
