//! Trace events and event sets.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

use crate::types::EventId;

/// A single record from the ingested trace.
///
/// Events are immutable once added to the trace model. Hierarchy is
/// expressed through `parent`/`children` ids rather than nesting, so an
/// event and all of its descendants can be walked without borrowing the
/// whole model mutably.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Arena id assigned by the owning trace model.
    pub id: EventId,
    /// The event's title or kind tag (e.g. a slice name).
    pub title: String,
    /// Start timestamp in trace-relative milliseconds.
    pub start: f64,
    /// End timestamp; always `>= start`.
    pub end: f64,
    /// Whether this event sits at the top of its hierarchy.
    pub is_top_level: bool,
    /// The owning event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EventId>,
    /// Directly owned events, in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EventId>,
    /// Free-form payload carried over from the trace format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

/// An insertion-ordered, deduplicating set of event ids.
///
/// Iteration order is the order ids were first inserted, which keeps
/// downstream reporting stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSet {
    ids: Vec<EventId>,
    seen: HashSet<EventId>,
}

impl EventSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from ids, dropping duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = EventId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Inserts an id; returns whether it was newly added.
    pub fn insert(&mut self, id: EventId) -> bool {
        if self.seen.insert(id) {
            self.ids.push(id);
            true
        } else {
            false
        }
    }

    /// Whether the set contains `id`.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.seen.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = EventId> + '_ {
        self.ids.iter().copied()
    }
}

impl Extend<EventId> for EventSet {
    fn extend<T: IntoIterator<Item = EventId>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = EventId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, EventId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

// Serialized as the plain id sequence; membership state is an internal
// detail.
impl Serialize for EventSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_set_deduplicates_preserving_order() {
        let mut set = EventSet::new();
        assert!(set.insert(EventId(3)));
        assert!(set.insert(EventId(1)));
        assert!(!set.insert(EventId(3)));
        assert!(set.insert(EventId(2)));

        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec![EventId(3), EventId(1), EventId(2)]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn event_set_serializes_as_id_sequence() {
        let set = EventSet::from_ids([EventId(5), EventId(0), EventId(5)]);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[5,0]");
    }

    #[test]
    fn trace_event_serialization_roundtrip() {
        let event = TraceEvent {
            id: EventId(0),
            title: "RunTask".into(),
            start: 12.5,
            end: 14.0,
            is_top_level: true,
            parent: None,
            children: vec![EventId(1)],
            args: Some(serde_json::json!({"src": "timer"})),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: TraceEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.title, event.title);
        assert_eq!(parsed.children, event.children);
    }
}
