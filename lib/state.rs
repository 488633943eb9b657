//! Quantum states as seen by operations, and a dense state-vector
//! implementation.
//!
//! Operations only interact with a state through [`QuantumState`]: they read
//! its (squared) norm, overwrite it from another state, rescale it, and read or
//! write its classical register. [`StateVector`] is the concrete register of
//! qubits used throughout the crate.
//!
//! Basis states are indexed little-endian: qubit `k` corresponds to bit `k` of
//! the basis index.

use std::fmt;
use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::error::{ OpError, OpResult };

/// Capabilities an operation needs from a quantum state.
pub trait QuantumState: Clone {
    /// Return the squared norm (total probability) of the state.
    fn norm(&self) -> f64;

    /// Overwrite the contents of `self` with those of `other`.
    fn load(&mut self, other: &Self) { self.clone_from(other); }

    /// Multiply every amplitude by `factor`.
    fn scale(&mut self, factor: f64);

    /// Divide out a squared norm, so that a state with squared norm `norm` is
    /// returned to unit norm.
    fn normalize(&mut self, norm: f64) { self.scale(norm.sqrt().recip()); }

    /// Return the classical register as an ordered sequence of values.
    fn classical_register(&self) -> &[u64];

    /// Write `value` to the classical register at `address`, growing the
    /// register with zeros if needed.
    fn set_classical_value(&mut self, address: usize, value: u64);
}

/// A pure state of `n` qubits stored as a dense vector of `2^n` amplitudes,
/// along with a classical register.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    pub(crate) n: usize,
    pub(crate) amps: na::DVector<C64>,
    pub(crate) creg: Vec<u64>,
}

impl StateVector {
    /// Create a new `n`-qubit state initialized to ∣0...0⟩ with an empty
    /// classical register.
    pub fn new(n: usize) -> Self {
        let mut amps: na::DVector<C64> = na::DVector::zeros(1 << n);
        amps[0] = C64::from(1.0);
        Self { n, amps, creg: Vec::new() }
    }

    /// Create a new `n`-qubit state initialized to the computational basis
    /// state with index `index`.
    pub fn basis(n: usize, index: usize) -> OpResult<Self> {
        let dim = 1_usize << n;
        if index >= dim {
            return Err(OpError::DimensionMismatch { expected: dim, rows: index, cols: 1 });
        }
        let mut amps: na::DVector<C64> = na::DVector::zeros(dim);
        amps[index] = C64::from(1.0);
        Ok(Self { n, amps, creg: Vec::new() })
    }

    /// Create a state from raw amplitudes. The length must be a power of two;
    /// amplitudes are taken as-is, without normalization.
    pub fn from_amplitudes<I>(amps: I) -> OpResult<Self>
    where I: IntoIterator<Item = C64>
    {
        let amps: Vec<C64> = amps.into_iter().collect();
        let len = amps.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(OpError::DimensionMismatch {
                expected: len.next_power_of_two(),
                rows: len,
                cols: 1,
            });
        }
        let n = len.trailing_zeros() as usize;
        Ok(Self { n, amps: na::DVector::from_vec(amps), creg: Vec::new() })
    }

    /// Return the number of qubits.
    pub fn num_qubits(&self) -> usize { self.n }

    /// Return the dimension of the Hilbert space, `2^n`.
    pub fn dim(&self) -> usize { self.amps.len() }

    pub fn amplitudes(&self) -> &na::DVector<C64> { &self.amps }

    /// Return the probability of observing the basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.amps.get(index).map(|a| a.norm_sqr()).unwrap_or(0.0)
    }

    pub(crate) fn check_targets(&self, targets: &[usize]) -> OpResult<()> {
        if let Some(&index) = targets.iter().find(|&&k| k >= self.n) {
            return Err(OpError::IndexOutOfBounds { index, num_qubits: self.n });
        }
        if let Some(&k) = targets.iter().duplicates().next() {
            return Err(OpError::DuplicateQubit(k));
        }
        Ok(())
    }

    /// Apply an arbitrary (not necessarily unitary) matrix to a set of target
    /// qubits.
    ///
    /// `matrix` must be `2^k × 2^k` for `k = targets.len()`; bit `j` of a
    /// matrix row/column index corresponds to `targets[j]`.
    pub fn apply_matrix(&mut self, targets: &[usize], matrix: &na::DMatrix<C64>)
        -> OpResult<&mut Self>
    {
        self.check_targets(targets)?;
        let sub = 1_usize << targets.len();
        if matrix.nrows() != sub || matrix.ncols() != sub {
            return Err(OpError::DimensionMismatch {
                expected: sub,
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        let mask: usize = targets.iter().fold(0, |acc, &k| acc | (1 << k));
        let offsets: Vec<usize>
            = (0..sub)
            .map(|m| {
                targets.iter().enumerate()
                    .filter(|(j, _)| m >> j & 1 == 1)
                    .fold(0, |acc, (_, &k)| acc | (1 << k))
            })
            .collect();
        let mut buf: na::DVector<C64> = na::DVector::zeros(sub);
        for base in (0..self.dim()).filter(|b| b & mask == 0) {
            for (m, off) in offsets.iter().enumerate() {
                buf[m] = self.amps[base | off];
            }
            let out = matrix * &buf;
            for (m, off) in offsets.iter().enumerate() {
                self.amps[base | off] = out[m];
            }
        }
        Ok(self)
    }
}

impl QuantumState for StateVector {
    fn norm(&self) -> f64 { self.amps.iter().map(|a| a.norm_sqr()).sum() }

    fn load(&mut self, other: &Self) {
        self.n = other.n;
        self.amps.clone_from(&other.amps);
        self.creg.clone_from(&other.creg);
    }

    fn scale(&mut self, factor: f64) {
        self.amps.iter_mut().for_each(|a| { *a *= factor; });
    }

    fn classical_register(&self) -> &[u64] { &self.creg }

    fn set_classical_value(&mut self, address: usize, value: u64) {
        if address >= self.creg.len() {
            self.creg.resize(address + 1, 0);
        }
        self.creg[address] = value;
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (idx, a) in self.amps.iter().enumerate() {
            if a.norm_sqr() == 0.0 { continue; }
            if !first { write!(f, " + ")?; }
            write!(f, "({:+.5}{:+.5}i)∣", a.re, a.im)?;
            for k in (0..self.n).rev() {
                write!(f, "{}", idx >> k & 1)?;
            }
            write!(f, "⟩")?;
            first = false;
        }
        if first { write!(f, "0")?; }
        if !self.creg.is_empty() {
            write!(f, " {:?}", self.creg)?;
        }
        Ok(())
    }
}
