//! Per-stage error taxonomy.
//!
//! Every stage returns an explicit `Result`; the engine alone decides whether
//! a failure degrades to a documented zero/default value or aborts the run.
//! No error from here ever escapes the engine boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Irradiance/equipment/tariff file absent or unparseable. Degrades to
    /// zero/default values.
    #[error("missing reference data: {0}")]
    MissingReferenceData(String),

    /// Usage-pattern name not found. The consumption series degrades to zero.
    #[error("unknown usage pattern: {0}")]
    UnknownUsagePattern(String),

    /// Input that cannot be coerced safely. Aborts the run; the engine
    /// returns the canonical all-zero result with the error field set.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}
