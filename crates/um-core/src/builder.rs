//! One-shot orchestration of the expectation-building pipeline.
//!
//! Stages run in strict program order: external detectors, idle synthesis
//! over the residue, the association sweep, then a single hand-off of the
//! finished list. A detector failure aborts the whole pass before anything
//! is committed.

use serde::Serialize;
use thiserror::Error;

use crate::associate::sweep_unassociated;
use crate::expectation::Expectation;
use crate::gaps::synthesize_idle;
use crate::trace::TraceModel;

/// The warning source reported on detector failure.
const WARNING_SOURCE: &str = "UserModelBuilder";

/// Error signaled by an external expectation detector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DetectorError(String);

impl DetectorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// The external heuristic detectors, one per detected expectation kind.
///
/// Each detector scans the same trace snapshot and may fail
/// independently; the detection heuristics themselves live outside this
/// crate.
pub trait ExpectationDetectors {
    /// Detects browser-startup expectations.
    fn detect_startup(&self, trace: &TraceModel) -> Result<Vec<Expectation>, DetectorError>;

    /// Detects page-load expectations.
    fn detect_load(&self, trace: &TraceModel) -> Result<Vec<Expectation>, DetectorError>;

    /// Detects input-response expectations.
    fn detect_input(&self, trace: &TraceModel) -> Result<Vec<Expectation>, DetectorError>;
}

/// Configuration for model building.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Synthesized gaps of this length (milliseconds) or shorter never
    /// become idle expectations. Default: 1.0.
    pub insignificant_gap_ms: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            insignificant_gap_ms: 1.0,
        }
    }
}

/// A non-fatal, user-visible warning emitted on detector failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportWarning {
    /// Component that raised the warning.
    pub source: String,
    /// The underlying detector error, rendered.
    pub message: String,
    /// Whether downstream reporting should surface this to the user.
    pub show_to_user: bool,
}

/// The result of one build pass.
///
/// The builder never mutates the host model; the caller applies the
/// outcome through [`UserModel::apply`], keeping the mutation boundary
/// explicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BuildOutcome {
    /// The finished, ordered expectation list.
    Built(Vec<Expectation>),
    /// The trace lacks browser-activity metadata; nothing to do.
    Unsupported,
    /// A detector failed; nothing was built.
    Failed(ImportWarning),
}

/// The host model's persistent view of build results.
#[derive(Debug, Clone, Default)]
pub struct UserModel {
    /// Committed expectations, in detection order across passes.
    pub expectations: Vec<Expectation>,
    /// Warnings accumulated from failed passes.
    pub import_warnings: Vec<ImportWarning>,
}

impl UserModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a build outcome. This is the only mutation the pipeline
    /// ever causes on the host model.
    pub fn apply(&mut self, outcome: BuildOutcome) {
        match outcome {
            BuildOutcome::Built(expectations) => self.expectations.extend(expectations),
            BuildOutcome::Unsupported => {}
            BuildOutcome::Failed(warning) => self.import_warnings.push(warning),
        }
    }
}

/// Builds the user-expectation model for a single trace.
#[derive(Debug, Clone, Default)]
pub struct UserModelBuilder {
    config: BuilderConfig,
}

impl UserModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Whether the trace exposes the capability set this pipeline needs.
    #[must_use]
    pub const fn supports_trace(trace: &TraceModel) -> bool {
        trace.has_browser_activity()
    }

    /// Runs the full pipeline over `trace`.
    ///
    /// Detection order is fixed: startup, load, input, then synthesized
    /// idle. The committed order is that concatenation, not a sort by
    /// start time; downstream reporting depends on it.
    pub fn build(
        &self,
        trace: &TraceModel,
        detectors: &dyn ExpectationDetectors,
    ) -> BuildOutcome {
        if !Self::supports_trace(trace) {
            tracing::debug!("trace has no browser activity, skipping user model build");
            return BuildOutcome::Unsupported;
        }

        let mut expectations = match Self::find_expectations(trace, detectors) {
            Ok(expectations) => expectations,
            Err((stage, error)) => {
                tracing::warn!(stage, error = %error, "expectation detector failed");
                return BuildOutcome::Failed(ImportWarning {
                    source: WARNING_SOURCE.to_string(),
                    message: error.to_string(),
                    show_to_user: true,
                });
            }
        };

        if let Some(bounds) = trace.bounds() {
            let idles = synthesize_idle(&expectations, bounds, self.config.insignificant_gap_ms);
            tracing::debug!(
                detected = expectations.len(),
                idle = idles.len(),
                "synthesized idle expectations"
            );
            expectations.extend(idles);
        }

        sweep_unassociated(&mut expectations, trace);

        tracing::debug!(expectations = expectations.len(), "user model built");
        BuildOutcome::Built(expectations)
    }

    /// Runs the detectors in fixed order, stopping at the first failure.
    fn find_expectations(
        trace: &TraceModel,
        detectors: &dyn ExpectationDetectors,
    ) -> Result<Vec<Expectation>, (&'static str, DetectorError)> {
        let mut expectations = detectors
            .detect_startup(trace)
            .map_err(|error| ("startup", error))?;
        expectations.extend(detectors.detect_load(trace).map_err(|error| ("load", error))?);
        expectations.extend(
            detectors
                .detect_input(trace)
                .map_err(|error| ("input", error))?,
        );
        Ok(expectations)
    }
}
