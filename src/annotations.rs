use crate::models::{Annotation, AnnotationKind, CycleId, EfficiencyPoint, HealthStatus};

/// Cutoff separating healthy from failing samples on the chart.
pub const CHART_OK_CUTOFF: f64 = 80.0;

/// Walks an efficiency series once and emits a marker wherever the
/// derived ok/fail status or the cycle id changes. Both trackers start
/// out unset, so a non-empty series always gets a status marker and a
/// cycle marker at its first point. Keys share one running counter
/// across both kinds, which keeps them unique within a pass.
pub fn annotate_series(series: &[EfficiencyPoint]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    let mut previous_status: Option<HealthStatus> = None;
    let mut previous_cycle: Option<&CycleId> = None;
    let mut counter = 0usize;

    for point in series {
        let status = HealthStatus::from_value(point.value, CHART_OK_CUTOFF);
        if previous_status != Some(status) {
            annotations.push(Annotation {
                key: format!("statusLine{}", counter),
                kind: AnnotationKind::Status,
                at: point.timestamp,
                label: status.label().to_string(),
            });
            previous_status = Some(status);
            counter += 1;
        }

        if previous_cycle != Some(&point.cycle_id) {
            annotations.push(Annotation {
                key: format!("cycleLine{}", counter),
                kind: AnnotationKind::Cycle,
                at: point.timestamp,
                label: point.cycle_id.to_string(),
            });
            previous_cycle = Some(&point.cycle_id);
            counter += 1;
        }
    }
    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn point(timestamp: i64, value: f64, cycle: i64) -> EfficiencyPoint {
        EfficiencyPoint {
            timestamp,
            value,
            cycle_id: CycleId::Number(cycle),
        }
    }

    #[test]
    fn first_point_emits_both_marker_kinds() {
        let annotations = annotate_series(&[point(100, 95.0, 1)]);
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].kind, AnnotationKind::Status);
        assert_eq!(annotations[0].at, 100);
        assert_eq!(annotations[0].label, "OK");
        assert_eq!(annotations[1].kind, AnnotationKind::Cycle);
        assert_eq!(annotations[1].at, 100);
        assert_eq!(annotations[1].label, "1");
    }

    #[test]
    fn status_and_cycle_changes_each_emit_once() {
        let series = [
            point(100, 95.0, 1),
            point(160, 95.0, 1),
            point(220, 50.0, 1),
            point(280, 50.0, 2),
        ];
        let annotations = annotate_series(&series);

        let status: Vec<_> = annotations
            .iter()
            .filter(|a| a.kind == AnnotationKind::Status)
            .collect();
        assert_eq!(status.len(), 2);
        assert_eq!((status[0].at, status[0].label.as_str()), (100, "OK"));
        assert_eq!((status[1].at, status[1].label.as_str()), (220, "FAIL"));

        let cycles: Vec<_> = annotations
            .iter()
            .filter(|a| a.kind == AnnotationKind::Cycle)
            .collect();
        assert_eq!(cycles.len(), 2);
        assert_eq!((cycles[0].at, cycles[0].label.as_str()), (100, "1"));
        assert_eq!((cycles[1].at, cycles[1].label.as_str()), (280, "2"));
    }

    #[test]
    fn flat_series_only_gets_the_initial_markers() {
        let series = [point(100, 99.0, 7), point(160, 98.0, 7), point(220, 97.0, 7)];
        assert_eq!(annotate_series(&series).len(), 2);
    }

    #[test]
    fn keys_are_unique_within_a_pass() {
        let series = [
            point(100, 95.0, 1),
            point(160, 10.0, 2),
            point(220, 95.0, 3),
            point(280, 10.0, 4),
        ];
        let annotations = annotate_series(&series);
        let keys: HashSet<_> = annotations.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys.len(), annotations.len());
    }

    #[test]
    fn exactly_eighty_counts_as_ok() {
        let annotations = annotate_series(&[point(100, 80.0, 1)]);
        assert_eq!(annotations[0].label, "OK");
    }

    #[test]
    fn empty_series_emits_nothing() {
        assert!(annotate_series(&[]).is_empty());
    }

    #[test]
    fn text_cycle_ids_are_labelled_verbatim() {
        let series = [EfficiencyPoint {
            timestamp: 100,
            value: 95.0,
            cycle_id: CycleId::Text("epoch-9".to_string()),
        }];
        let annotations = annotate_series(&series);
        assert_eq!(annotations[1].label, "epoch-9");
    }
}
