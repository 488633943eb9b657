//! The operation capability shared by all gates and channels, and the
//! elementary gates that implement it.
//!
//! See also: <https://en.wikipedia.org/wiki/Quantum_logic_gate>

use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use crate::{
    error::{ NoMatrix, OpError, OpResult },
    state::StateVector,
};

/// A unit of composition in a circuit: something that can be applied to a
/// state of type `S`.
///
/// Operations are exclusively owned by whatever contains them. Deep copies are
/// made through [`Self::box_clone`], which is also what backs the [`Clone`]
/// impl on `Box<dyn QuantumOp<S>>`.
pub trait QuantumOp<S> {
    /// Apply the operation to `state` in place.
    fn apply(&mut self, state: &mut S) -> OpResult<()>;

    /// Produce an independent deep copy of `self`.
    fn box_clone(&self) -> Box<dyn QuantumOp<S>>;

    /// Return the matrix representation of the operation, if it has one.
    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix>;

    /// Short human-readable name, used in diagnostics.
    fn name(&self) -> &'static str;
}

impl<S> Clone for Box<dyn QuantumOp<S>>
where S: 'static
{
    fn clone(&self) -> Self { self.box_clone() }
}

static MAT_H: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    use std::f64::consts::FRAC_1_SQRT_2;
    na::DMatrix::from_row_slice(2, 2, &[
        FRAC_1_SQRT_2.into(),   FRAC_1_SQRT_2.into(),
        FRAC_1_SQRT_2.into(), (-FRAC_1_SQRT_2).into(),
    ])
});

static MAT_X: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    na::DMatrix::from_row_slice(2, 2, &[
        0.0.into(), 1.0.into(),
        1.0.into(), 0.0.into(),
    ])
});

static MAT_Y: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    na::DMatrix::from_row_slice(2, 2, &[
        0.0.into(), -C64::i(),
        C64::i(),   0.0.into(),
    ])
});

static MAT_Z: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    na::DMatrix::from_row_slice(2, 2, &[
        1.0.into(),   0.0.into(),
        0.0.into(), (-1.0).into(),
    ])
});

static MAT_S: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    na::DMatrix::from_row_slice(2, 2, &[
        1.0.into(), 0.0.into(),
        0.0.into(), C64::i(),
    ])
});

// two-qubit matrices are indexed with the control (first) qubit as bit 0
static MAT_CX: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    na::DMatrix::from_row_slice(4, 4, &[
        z1, z0, z0, z0,
        z0, z0, z0, z1,
        z0, z0, z1, z0,
        z0, z1, z0, z0,
    ])
});

static MAT_CZ: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    na::DMatrix::from_row_slice(4, 4, &[
        z1, z0, z0,  z0,
        z0, z1, z0,  z0,
        z0, z0, z1,  z0,
        z0, z0, z0, -z1,
    ])
});

static MAT_SWAP: Lazy<na::DMatrix<C64>> = Lazy::new(|| {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    na::DMatrix::from_row_slice(4, 4, &[
        z1, z0, z0, z0,
        z0, z0, z1, z0,
        z0, z1, z0, z0,
        z0, z0, z0, z1,
    ])
});

/// Description of a single elementary gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Hadamard
    H(usize),
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// π/2 rotation about Z
    S(usize),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
    /// Swap
    Swap(usize, usize),
}

impl Gate {
    /// Return `true` if `self` acts on a single qubit.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::H(..) | Self::X(..) | Self::Y(..) | Self::Z(..) | Self::S(..))
    }

    /// Return the qubit indices acted on, in matrix-bit order.
    pub fn targets(&self) -> Vec<usize> {
        match *self {
            Self::H(k) | Self::X(k) | Self::Y(k) | Self::Z(k) | Self::S(k)
                => vec![k],
            Self::CX(a, b) | Self::CZ(a, b) | Self::Swap(a, b)
                => vec![a, b],
        }
    }

    /// Return the unitary matrix of the gate over its own targets.
    pub fn local_matrix(&self) -> &'static na::DMatrix<C64> {
        match self {
            Self::H(..) => Lazy::force(&MAT_H),
            Self::X(..) => Lazy::force(&MAT_X),
            Self::Y(..) => Lazy::force(&MAT_Y),
            Self::Z(..) => Lazy::force(&MAT_Z),
            Self::S(..) => Lazy::force(&MAT_S),
            Self::CX(..) => Lazy::force(&MAT_CX),
            Self::CZ(..) => Lazy::force(&MAT_CZ),
            Self::Swap(..) => Lazy::force(&MAT_SWAP),
        }
    }
}

impl QuantumOp<StateVector> for Gate {
    fn apply(&mut self, state: &mut StateVector) -> OpResult<()> {
        state.apply_matrix(&self.targets(), self.local_matrix())?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn QuantumOp<StateVector>> { Box::new(*self) }

    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
        Ok(self.local_matrix().clone())
    }

    fn name(&self) -> &'static str {
        match self {
            Self::H(..) => "H",
            Self::X(..) => "X",
            Self::Y(..) => "Y",
            Self::Z(..) => "Z",
            Self::S(..) => "S",
            Self::CX(..) => "CX",
            Self::CZ(..) => "CZ",
            Self::Swap(..) => "Swap",
        }
    }
}

/// An arbitrary, not necessarily unitary, matrix acting on a list of target
/// qubits.
///
/// This is the usual way to express a single Kraus operator or a measurement
/// projector.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    targets: Vec<usize>,
    matrix: na::DMatrix<C64>,
}

impl Dense {
    /// Create a new dense operation, verifying that `matrix` is
    /// `2^k × 2^k` for `k = targets.len()` and that `targets` contains no
    /// duplicates.
    pub fn new(targets: Vec<usize>, matrix: na::DMatrix<C64>) -> OpResult<Self> {
        use itertools::Itertools;
        if let Some(&k) = targets.iter().duplicates().next() {
            return Err(OpError::DuplicateQubit(k));
        }
        let sub = 1_usize << targets.len();
        if matrix.nrows() != sub || matrix.ncols() != sub {
            return Err(OpError::DimensionMismatch {
                expected: sub,
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        Ok(Self { targets, matrix })
    }

    /// Create a new single-qubit operation from its matrix elements in
    /// row-major order.
    pub fn single(k: usize, elems: [C64; 4]) -> Self {
        Self {
            targets: vec![k],
            matrix: na::DMatrix::from_row_slice(2, 2, &elems),
        }
    }

    pub fn targets(&self) -> &[usize] { &self.targets }

    pub fn local_matrix(&self) -> &na::DMatrix<C64> { &self.matrix }

    /// Multiply the matrix by a real factor.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.matrix *= C64::from(factor);
        self
    }
}

impl From<Gate> for Dense {
    fn from(gate: Gate) -> Self {
        Self { targets: gate.targets(), matrix: gate.local_matrix().clone() }
    }
}

impl QuantumOp<StateVector> for Dense {
    fn apply(&mut self, state: &mut StateVector) -> OpResult<()> {
        state.apply_matrix(&self.targets, &self.matrix)?;
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn QuantumOp<StateVector>> {
        Box::new(self.clone())
    }

    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
        Ok(self.matrix.clone())
    }

    fn name(&self) -> &'static str { "Dense" }
}
