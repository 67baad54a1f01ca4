//! The association sweep: assigning leftover events to catch-all
//! expectations.

use std::collections::HashSet;

use crate::expectation::Expectation;
use crate::trace::TraceModel;
use crate::types::EventId;

/// Assigns every still-unclaimed top-level event (and its descendants) to
/// the first catch-all expectation containing the event's start time.
///
/// Catch-all expectations are assumed non-overlapping: idle spans are gaps
/// between the others by construction, and load/startup spans are disjoint
/// by their detectors. First-match is a deterministic tie-break, not a
/// load-bearing choice.
pub(crate) fn sweep_unassociated(expectations: &mut [Expectation], trace: &TraceModel) {
    let catch_alls: Vec<usize> = expectations
        .iter()
        .enumerate()
        .filter(|(_, expectation)| expectation.kind.is_catch_all())
        .map(|(index, _)| index)
        .collect();
    let mut swept = 0_usize;
    if !catch_alls.is_empty() {
        debug_assert!(
            catch_alls_disjoint(expectations, &catch_alls),
            "catch-all expectations must not overlap"
        );

        // Everything a detector already claimed, closed over descendants.
        let mut covered: HashSet<EventId> = HashSet::new();
        for expectation in expectations.iter() {
            for id in &expectation.source_events {
                covered.extend(trace.entire_hierarchy(id));
            }
        }

        // Non-top-level events are never direct candidates; they ride
        // along as descendants of whichever top-level event gets assigned.
        for candidate in trace.top_level_events() {
            if covered.contains(&candidate) {
                continue;
            }
            let start = trace.event(candidate).start;
            for &index in &catch_alls {
                if expectations[index].range().contains_start(start) {
                    expectations[index]
                        .associated_events
                        .extend(trace.entire_hierarchy(candidate));
                    swept += 1;
                    break;
                }
            }
            // No containing catch-all: the event stays unassociated.
        }
    }

    // Seeded source events may have descendants of their own; close every
    // associated set over the hierarchy. This runs even with zero
    // catch-alls, so the closure holds on input-only expectation sets.
    for expectation in expectations.iter_mut() {
        let seeds: Vec<EventId> = expectation.associated_events.iter().collect();
        for id in seeds {
            expectation
                .associated_events
                .extend(trace.entire_hierarchy(id));
        }
    }

    tracing::debug!(swept, catch_alls = catch_alls.len(), "association sweep complete");
}

fn catch_alls_disjoint(expectations: &[Expectation], catch_alls: &[usize]) -> bool {
    for (position, &a) in catch_alls.iter().enumerate() {
        for &b in &catch_alls[position + 1..] {
            let (first, second) = (&expectations[a], &expectations[b]);
            if first.start < second.end && second.start < first.end {
                return false;
            }
        }
    }
    true
}
