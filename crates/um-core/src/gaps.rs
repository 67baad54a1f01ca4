//! Gap detection: the uncovered residue of the timeline.

use crate::expectation::Expectation;
use crate::types::TimeRange;

/// Computes the maximal disjoint sub-ranges of `bounds` not covered by the
/// union of `ranges`, in ascending order.
///
/// Input ranges may overlap each other; overlap is tolerated, not an
/// error. Only positive-length gaps are emitted.
pub(crate) fn find_empty_ranges(ranges: &[TimeRange], bounds: TimeRange) -> Vec<TimeRange> {
    // Filter degenerate ranges and sort by start time.
    let mut covered: Vec<TimeRange> = ranges.iter().filter(|r| r.max > r.min).copied().collect();
    covered.sort_by(|a, b| a.min.total_cmp(&b.min));

    // Merge overlapping ranges into a disjoint union.
    let mut merged: Vec<TimeRange> = Vec::new();
    for range in covered {
        if let Some(last) = merged.last_mut() {
            if range.min <= last.max {
                last.max = last.max.max(range.max);
            } else {
                merged.push(range);
            }
        } else {
            merged.push(range);
        }
    }

    // Walk the union, collecting what it leaves uncovered inside bounds.
    let mut gaps = Vec::new();
    let mut cursor = bounds.min;
    for range in merged {
        if range.max <= cursor {
            continue;
        }
        if range.min >= bounds.max {
            break;
        }
        if range.min > cursor {
            gaps.push(TimeRange::new(cursor, range.min.min(bounds.max)));
        }
        cursor = range.max;
        if cursor >= bounds.max {
            break;
        }
    }
    if cursor < bounds.max {
        gaps.push(TimeRange::new(cursor, bounds.max));
    }
    gaps
}

/// Turns the timeline residue left by `detected` into idle expectations.
///
/// Gaps of `insignificant_ms` or shorter are dropped so sub-resolution
/// slivers between adjacent detected spans never become expectations.
pub(crate) fn synthesize_idle(
    detected: &[Expectation],
    bounds: TimeRange,
    insignificant_ms: f64,
) -> Vec<Expectation> {
    let ranges: Vec<TimeRange> = detected.iter().map(Expectation::range).collect();
    find_empty_ranges(&ranges, bounds)
        .into_iter()
        .filter(|gap| gap.duration() > insignificant_ms)
        // Surviving gaps have positive length, so construction cannot fail.
        .filter_map(|gap| Expectation::idle(gap).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventSet;
    use crate::expectation::ExpectationKind;

    fn expectation(kind: ExpectationKind, start: f64, end: f64) -> Expectation {
        Expectation::new(kind, start, end, EventSet::new()).unwrap()
    }

    #[test]
    fn empty_input_yields_whole_bounds() {
        let gaps = find_empty_ranges(&[], TimeRange::new(0.0, 100.0));
        assert_eq!(gaps, vec![TimeRange::new(0.0, 100.0)]);
    }

    #[test]
    fn single_range_splits_bounds() {
        let gaps = find_empty_ranges(&[TimeRange::new(10.0, 20.0)], TimeRange::new(0.0, 100.0));
        assert_eq!(
            gaps,
            vec![TimeRange::new(0.0, 10.0), TimeRange::new(20.0, 100.0)]
        );
    }

    #[test]
    fn overlapping_ranges_are_tolerated() {
        let ranges = [
            TimeRange::new(10.0, 30.0),
            TimeRange::new(20.0, 40.0),
            TimeRange::new(60.0, 70.0),
        ];
        let gaps = find_empty_ranges(&ranges, TimeRange::new(0.0, 100.0));
        assert_eq!(
            gaps,
            vec![
                TimeRange::new(0.0, 10.0),
                TimeRange::new(40.0, 60.0),
                TimeRange::new(70.0, 100.0),
            ]
        );
    }

    #[test]
    fn ranges_outside_bounds_leave_no_gap() {
        let ranges = [TimeRange::new(-50.0, 0.0), TimeRange::new(100.0, 150.0)];
        let gaps = find_empty_ranges(&ranges, TimeRange::new(0.0, 100.0));
        assert_eq!(gaps, vec![TimeRange::new(0.0, 100.0)]);
    }

    #[test]
    fn range_straddling_bounds_is_clamped() {
        let ranges = [TimeRange::new(-10.0, 30.0), TimeRange::new(90.0, 120.0)];
        let gaps = find_empty_ranges(&ranges, TimeRange::new(0.0, 100.0));
        assert_eq!(gaps, vec![TimeRange::new(30.0, 90.0)]);
    }

    #[test]
    fn full_coverage_yields_no_gaps() {
        let gaps = find_empty_ranges(&[TimeRange::new(0.0, 100.0)], TimeRange::new(0.0, 100.0));
        assert!(gaps.is_empty());
    }

    #[test]
    fn idle_synthesis_drops_gap_at_exact_threshold() {
        // Gap [10, 11) is exactly 1 ms: dropped. [12, 100) survives.
        let detected = vec![
            expectation(ExpectationKind::Load, 0.0, 10.0),
            expectation(ExpectationKind::Load, 11.0, 12.0),
        ];
        let idles = synthesize_idle(&detected, TimeRange::new(0.0, 100.0), 1.0);

        assert_eq!(idles.len(), 1);
        assert_eq!(idles[0].range(), TimeRange::new(12.0, 100.0));
    }

    #[test]
    fn idle_synthesis_keeps_gap_just_over_threshold() {
        let detected = vec![
            expectation(ExpectationKind::Load, 0.0, 10.0),
            expectation(ExpectationKind::Load, 11.001, 100.0),
        ];
        let idles = synthesize_idle(&detected, TimeRange::new(0.0, 100.0), 1.0);

        assert_eq!(idles.len(), 1);
        assert_eq!(idles[0].range(), TimeRange::new(10.0, 11.001));
        assert_eq!(idles[0].kind, ExpectationKind::Idle);
        assert!(idles[0].source_events.is_empty());
        assert!(idles[0].associated_events.is_empty());
    }

    #[test]
    fn idle_output_is_disjoint_from_input() {
        let detected = vec![
            expectation(ExpectationKind::Startup, 0.0, 25.0),
            expectation(ExpectationKind::Load, 20.0, 50.0),
        ];
        let idles = synthesize_idle(&detected, TimeRange::new(0.0, 100.0), 1.0);

        assert_eq!(idles.len(), 1);
        assert_eq!(idles[0].range(), TimeRange::new(50.0, 100.0));
        for idle in &idles {
            for other in &detected {
                assert!(idle.end <= other.start || idle.start >= other.end);
            }
        }
    }
}
