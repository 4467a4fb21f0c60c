use thiserror::Error;

use crate::penetration::ElementRef;

/// Top-level error type for the pierce crate.
#[derive(Debug, Error)]
pub enum PierceError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Penetration(#[from] PenetrationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Per-candidate and input failures raised while detecting penetrations.
///
/// `MissingGeometry` and `GeometryQueryFailure` are never returned from batch
/// operations; they are reported to the diagnostic sink and the candidate is
/// skipped. `DegenerateInput` short-circuits an operation to an empty result.
#[derive(Debug, Clone, Error)]
pub enum PenetrationError {
    #[error("no usable solid resolved for element {element}")]
    MissingGeometry { element: ElementRef },

    #[error("geometry query failed for element {element}: {reason}")]
    GeometryQueryFailure { element: ElementRef, reason: String },

    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}

/// Convenience type alias for results using [`PierceError`].
pub type Result<T> = std::result::Result<T, PierceError>;
