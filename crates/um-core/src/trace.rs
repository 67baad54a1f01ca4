//! The owning event store for a single trace.

use crate::event::TraceEvent;
use crate::types::{EventId, TimeRange, ValidationError};

/// An immutable-after-ingestion arena of trace events.
///
/// The model owns every event; expectations and event sets refer to events
/// by [`EventId`] only. Ingestion (parsing a trace file into `add_event`
/// calls) lives outside this crate.
#[derive(Debug, Clone, Default)]
pub struct TraceModel {
    events: Vec<TraceEvent>,
    browser_activity: bool,
}

impl TraceModel {
    /// Creates an empty trace model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that browser-activity metadata was found during ingestion.
    ///
    /// The model-building pipeline is a no-op on traces without it.
    pub fn mark_browser_activity(&mut self) {
        self.browser_activity = true;
    }

    /// Whether the trace carries browser-activity metadata.
    #[must_use]
    pub const fn has_browser_activity(&self) -> bool {
        self.browser_activity
    }

    /// Adds a top-of-hierarchy event.
    ///
    /// Returns `ValidationError::EventSpan` if `end < start`.
    pub fn add_event(
        &mut self,
        title: impl Into<String>,
        start: f64,
        end: f64,
        is_top_level: bool,
        args: Option<serde_json::Value>,
    ) -> Result<EventId, ValidationError> {
        self.push(title.into(), start, end, is_top_level, None, args)
    }

    /// Adds an event owned by `parent`. Children are never top-level.
    pub fn add_child(
        &mut self,
        parent: EventId,
        title: impl Into<String>,
        start: f64,
        end: f64,
        args: Option<serde_json::Value>,
    ) -> Result<EventId, ValidationError> {
        let id = self.push(title.into(), start, end, false, Some(parent), args)?;
        self.events[parent.0].children.push(id);
        Ok(id)
    }

    fn push(
        &mut self,
        title: String,
        start: f64,
        end: f64,
        is_top_level: bool,
        parent: Option<EventId>,
        args: Option<serde_json::Value>,
    ) -> Result<EventId, ValidationError> {
        if end < start {
            return Err(ValidationError::EventSpan { title, start, end });
        }
        let id = EventId(self.events.len());
        self.events.push(TraceEvent {
            id,
            title,
            start,
            end,
            is_top_level,
            parent,
            children: Vec::new(),
            args,
        });
        Ok(id)
    }

    /// Looks up an event by id.
    ///
    /// Ids are only valid for the model that minted them; using an id
    /// from a different model is a caller bug.
    #[must_use]
    pub fn event(&self, id: EventId) -> &TraceEvent {
        debug_assert!(id.0 < self.events.len(), "event id from a different trace model");
        &self.events[id.0]
    }

    /// All events in ingestion order.
    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Ids of top-level events, in ingestion order.
    pub fn top_level_events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.events
            .iter()
            .filter(|event| event.is_top_level)
            .map(|event| event.id)
    }

    /// The min/max timestamp over the whole trace, or `None` when the
    /// trace has no events.
    #[must_use]
    pub fn bounds(&self) -> Option<TimeRange> {
        let mut events = self.events.iter();
        let first = events.next()?;
        let mut bounds = TimeRange::new(first.start, first.end);
        for event in events {
            bounds.encompass(TimeRange::new(event.start, event.end));
        }
        Some(bounds)
    }

    /// `id` plus every descendant, preorder.
    #[must_use]
    pub fn entire_hierarchy(&self, id: EventId) -> Vec<EventId> {
        debug_assert!(id.0 < self.events.len(), "event id from a different trace model");
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            // Reverse keeps siblings in insertion order under the pop.
            stack.extend(self.events[next.0].children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_event_rejects_inverted_span() {
        let mut trace = TraceModel::new();
        let err = trace.add_event("Bad", 10.0, 5.0, true, None).unwrap_err();
        assert!(matches!(err, ValidationError::EventSpan { .. }));
        assert!(trace.is_empty());
    }

    #[test]
    fn bounds_cover_all_events() {
        let mut trace = TraceModel::new();
        trace.add_event("A", 5.0, 20.0, true, None).unwrap();
        trace.add_event("B", 1.0, 8.0, true, None).unwrap();
        trace.add_event("C", 15.0, 40.0, false, None).unwrap();

        assert_eq!(trace.bounds(), Some(TimeRange::new(1.0, 40.0)));
    }

    #[test]
    fn bounds_empty_trace_is_none() {
        assert_eq!(TraceModel::new().bounds(), None);
    }

    #[test]
    fn entire_hierarchy_walks_descendants_preorder() {
        let mut trace = TraceModel::new();
        let root = trace.add_event("Task", 0.0, 10.0, true, None).unwrap();
        let a = trace.add_child(root, "ChildA", 1.0, 4.0, None).unwrap();
        let b = trace.add_child(root, "ChildB", 5.0, 9.0, None).unwrap();
        let a1 = trace.add_child(a, "GrandchildA1", 2.0, 3.0, None).unwrap();

        assert_eq!(trace.entire_hierarchy(root), vec![root, a, a1, b]);
        assert_eq!(trace.entire_hierarchy(b), vec![b]);
    }

    #[test]
    #[should_panic(expected = "event id from a different trace model")]
    fn event_lookup_rejects_foreign_id() {
        let mut minting = TraceModel::new();
        minting.add_event("A", 0.0, 1.0, true, None).unwrap();
        let foreign = minting.add_event("B", 1.0, 2.0, true, None).unwrap();

        let mut other = TraceModel::new();
        other.add_event("C", 0.0, 1.0, true, None).unwrap();
        let _ = other.event(foreign);
    }

    #[test]
    fn children_are_never_top_level() {
        let mut trace = TraceModel::new();
        let root = trace.add_event("Task", 0.0, 10.0, true, None).unwrap();
        let child = trace.add_child(root, "Child", 1.0, 2.0, None).unwrap();

        assert!(!trace.event(child).is_top_level);
        assert_eq!(trace.event(child).parent, Some(root));
        let top: Vec<_> = trace.top_level_events().collect();
        assert_eq!(top, vec![root]);
    }
}
