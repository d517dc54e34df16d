use crate::annotations::CHART_OK_CUTOFF;
use crate::models::{EfficiencyPoint, HealthStatus, TimelineSegment};

/// Cutoff used while scanning for run boundaries.
pub const TIMELINE_OK_CUTOFF: f64 = 90.0;

/// Run-length encodes an efficiency series into contiguous ok/fail
/// segments, newest first. The last segment is always closed against
/// `now` rather than the last sample, so the "current" segment keeps
/// growing between fetches. Durations are floor minutes; with a skewed
/// clock they can come out non-positive, which is left to the caller to
/// render.
///
/// The seed classification uses the chart's 80 cutoff while the scan
/// below uses 90, and index 0 is scanned redundantly; both quirks are
/// kept as-is for compatibility (see DESIGN.md).
pub fn compress_timeline(series: &[EfficiencyPoint], now: i64) -> Vec<TimelineSegment> {
    let first = match series.first() {
        Some(first) => first,
        None => return Vec::new(),
    };

    let mut previous_status = HealthStatus::from_value(first.value, CHART_OK_CUTOFF);
    let mut previous_timestamp = first.timestamp;
    let mut segments = Vec::new();

    for (index, point) in series.iter().enumerate() {
        let status = HealthStatus::from_value(point.value, TIMELINE_OK_CUTOFF);
        let is_last = index == series.len() - 1;

        if status != previous_status || is_last {
            let boundary = if is_last { now } else { point.timestamp };
            segments.insert(
                0,
                TimelineSegment {
                    status: previous_status,
                    start_timestamp: previous_timestamp,
                    duration_minutes: (boundary - previous_timestamp).div_euclid(60),
                },
            );
            previous_status = status;
            previous_timestamp = point.timestamp;
        }
    }
    segments
}
