//! Core logic for building user-expectation models from browser traces.
//!
//! This crate contains the fundamental types and logic for:
//! - Trace storage: an owning arena of hierarchical trace events
//! - Idle synthesis: turning uncovered timeline residue into idle spans
//! - Association: sweeping leftover events into catch-all expectations
//! - Orchestration: a one-shot build pass over injected detectors

mod associate;
pub mod builder;
pub mod event;
pub mod expectation;
mod gaps;
pub mod trace;
pub mod types;

pub use builder::{
    BuildOutcome, BuilderConfig, DetectorError, ExpectationDetectors, ImportWarning, UserModel,
    UserModelBuilder,
};
pub use event::{EventSet, TraceEvent};
pub use expectation::{Expectation, ExpectationKind};
pub use trace::TraceModel;
pub use types::{EventId, TimeRange, ValidationError};
