//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A trace event ended before it started.
    #[error("event \"{title}\" ends at {end} before its start {start}")]
    EventSpan {
        title: String,
        start: f64,
        end: f64,
    },

    /// An expectation span was empty or inverted.
    #[error("{kind} expectation has degenerate span [{start}, {end})")]
    EmptySpan {
        kind: &'static str,
        start: f64,
        end: f64,
    },
}

/// Index of an event inside its owning [`TraceModel`](crate::TraceModel).
///
/// Events are owned by the trace model; every other structure refers to
/// them by id, never by copy. An id is only meaningful to the model that
/// minted it; looking it up in another model is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub(crate) usize);

impl EventId {
    /// Returns the underlying arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A half-open span of trace time, in trace-relative milliseconds.
///
/// Trace timestamps are `f64` milliseconds; sub-millisecond fractions are
/// real and are the reason gap synthesis carries an insignificance
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl TimeRange {
    /// Creates a range without validation; callers uphold `max >= min`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Length of the range in milliseconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.max - self.min
    }

    /// Half-open containment: `min <= ts < max`.
    ///
    /// An event starting exactly at `max` belongs to the next range, so
    /// boundary events are disambiguated deterministically.
    #[must_use]
    pub fn contains_start(&self, ts: f64) -> bool {
        self.min <= ts && ts < self.max
    }

    /// Extends the range to include `other`.
    pub fn encompass(&mut self, other: Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}
