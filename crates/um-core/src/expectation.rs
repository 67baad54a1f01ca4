//! User expectations: labeled phases of browser activity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::EventSet;
use crate::types::{TimeRange, ValidationError};

/// The closed set of expectation kinds.
///
/// Replaces runtime type probing with an exhaustive enum; every
/// "is this kind eligible for X" question is a match over these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    /// Browser startup.
    Startup,
    /// A page load.
    Load,
    /// Response to a user input.
    Input,
    /// Synthesized from uncovered timeline residue.
    Idle,
}

impl ExpectationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Load => "load",
            Self::Input => "input",
            Self::Idle => "idle",
        }
    }

    /// Whether intervals of this kind absorb events no detector claimed.
    ///
    /// Input expectations are precise responses, not catch-all regions,
    /// so they never receive swept-up events.
    #[must_use]
    pub const fn is_catch_all(&self) -> bool {
        match self {
            Self::Startup | Self::Load | Self::Idle => true,
            Self::Input => false,
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled, bounded time span over the trace.
///
/// Created once per build pass. The only field that grows afterwards is
/// `associated_events`, during the association sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expectation {
    /// What phase of activity this span represents.
    pub kind: ExpectationKind,
    /// Inclusive start, trace-relative milliseconds.
    pub start: f64,
    /// Exclusive end; always `> start`.
    pub end: f64,
    /// The events that caused the detector to emit this expectation.
    /// Populated by the detector, read-only here.
    pub source_events: EventSet,
    /// Source events plus everything the association sweep assigns.
    pub associated_events: EventSet,
}

impl Expectation {
    /// Creates an expectation, seeding `associated_events` from the
    /// source events.
    ///
    /// Returns `ValidationError::EmptySpan` for zero-length or inverted
    /// spans.
    pub fn new(
        kind: ExpectationKind,
        start: f64,
        end: f64,
        source_events: EventSet,
    ) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptySpan {
                kind: kind.as_str(),
                start,
                end,
            });
        }
        let associated_events = source_events.clone();
        Ok(Self {
            kind,
            start,
            end,
            source_events,
            associated_events,
        })
    }

    /// An idle expectation covering `range`, with no source events.
    pub fn idle(range: TimeRange) -> Result<Self, ValidationError> {
        Self::new(ExpectationKind::Idle, range.min, range.max, EventSet::new())
    }

    /// The expectation's span as a range.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}
