//! Error types shared across the crate.

use nalgebra as na;
use num_complex::Complex64 as C64;
use thiserror::Error;

/// Convenience alias for results carrying an [`OpError`].
pub type OpResult<T> = Result<T, OpError>;

/// Failures raised while building or applying an operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("{0}: operation list must be non-empty")]
    Empty(&'static str),

    #[error("invalid weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f64),

    #[error("weights sum to {0}, which exceeds 1")]
    WeightOverflow(f64),

    #[error("invalid probability {0}: must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    #[error("qubit {index} out of bounds for a {num_qubits}-qubit register")]
    IndexOutOfBounds { index: usize, num_qubits: usize },

    #[error("duplicate qubit index found: {0}")]
    DuplicateQubit(usize),

    #[error("expected a {expected}x{expected} matrix, got {rows}x{cols}")]
    DimensionMismatch { expected: usize, rows: usize, cols: usize },

    #[error("{name} was not trace preserving (total branch probability {total} <= draw {draw})")]
    TraceViolation { name: &'static str, total: f64, draw: f64 },

    #[error("{name} received a state with degenerate norm {norm}")]
    DegenerateNorm { name: &'static str, norm: f64 },
}

/// Returned when an operation has no single matrix representation.
///
/// The 1×1 identity carried here is a placeholder only; it does not describe
/// the action of the operation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("gate-matrix of {name} cannot be obtained")]
pub struct NoMatrix {
    name: &'static str,
    placeholder: na::DMatrix<C64>,
}

impl NoMatrix {
    /// Report the incapability through the diagnostic channel and build the
    /// error value.
    pub fn new(name: &'static str) -> Self {
        tracing::warn!(
            op = name,
            "gate-matrix of {} cannot be obtained; identity placeholder returned",
            name
        );
        Self { name, placeholder: na::DMatrix::identity(1, 1) }
    }

    /// Name of the operation that could not produce a matrix.
    pub fn name(&self) -> &'static str { self.name }

    /// The 1×1 identity placeholder.
    pub fn placeholder(&self) -> &na::DMatrix<C64> { &self.placeholder }
}
