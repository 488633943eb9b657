//! Weighted random choice of a single operation per application.

use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ NoMatrix, OpError, OpResult },
    gate::QuantumOp,
    rng::{ self, Entropy, UniformSource },
    state::QuantumState,
};

/// Amount by which the total weight of a [`Probabilistic`] may exceed 1 before
/// it is rejected.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// A mixture of operations, exactly one of which is applied each time the
/// mixture is applied.
///
/// The `i`-th operation is chosen with probability equal to its weight. If the
/// weights sum to less than 1, the remaining probability mass applies nothing.
pub struct Probabilistic<S> {
    distribution: Vec<f64>,
    cumulative: Vec<f64>,
    ops: Vec<Box<dyn QuantumOp<S>>>,
    rng: Box<dyn UniformSource>,
}

impl<S> Probabilistic<S>
where S: QuantumState + 'static
{
    /// Create a new mixture from `(weight, operation)` pairs, with an
    /// entropy-seeded random source.
    ///
    /// Fails if there are no pairs, if any weight is negative or non-finite,
    /// or if the weights sum to more than 1 (up to [`WEIGHT_TOLERANCE`]).
    /// Weights summing to zero are allowed, and make the mixture an identity.
    pub fn new<I>(weighted: I) -> OpResult<Self>
    where I: IntoIterator<Item = (f64, Box<dyn QuantumOp<S>>)>
    {
        let (distribution, ops): (Vec<f64>, Vec<Box<dyn QuantumOp<S>>>)
            = weighted.into_iter().unzip();
        if ops.is_empty() {
            return Err(OpError::Empty("Probabilistic"));
        }
        if let Some(&w) = distribution.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(OpError::InvalidWeight(w));
        }
        let cumulative: Vec<f64>
            = std::iter::once(0.0)
            .chain(
                distribution.iter()
                    .scan(0.0, |acc, w| { *acc += w; Some(*acc) })
            )
            .collect();
        let total = cumulative[ops.len()];
        if total > 1.0 + WEIGHT_TOLERANCE {
            return Err(OpError::WeightOverflow(total));
        }
        Ok(Self { distribution, cumulative, ops, rng: rng::boxed_default() })
    }

    /// Replace the random source.
    pub fn with_source<R>(mut self, rng: R) -> Self
    where R: UniformSource + 'static
    {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the random source with a seeded [`Entropy`].
    pub fn seeded(self, seed: u64) -> Self { self.with_source(Entropy::seeded(seed)) }

    /// Copy the weights and deep-copy every operation. The copy draws from a
    /// fork of `self`'s random source.
    pub fn deep_copy(&self) -> Self {
        Self {
            distribution: self.distribution.clone(),
            cumulative: self.cumulative.clone(),
            ops: self.ops.iter().map(|op| op.box_clone()).collect(),
            rng: self.rng.fork(),
        }
    }
}

impl<S> Probabilistic<S> {
    /// Return the weights, in order.
    pub fn distribution(&self) -> &[f64] { &self.distribution }

    /// Return the cumulative weights. This has one more element than there are
    /// operations, beginning with 0.
    pub fn cumulative(&self) -> &[f64] { &self.cumulative }

    pub fn ops(&self) -> &[Box<dyn QuantumOp<S>>] { &self.ops }

    pub fn ops_mut(&mut self) -> &mut [Box<dyn QuantumOp<S>>] { &mut self.ops }

    pub fn len(&self) -> usize { self.ops.len() }

    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Return the index of the operation selected by a draw `r`, or `None` if
    /// `r` falls outside the total weight.
    ///
    /// `r` selects index `i` when `cumulative[i] <= r < cumulative[i + 1]`.
    pub fn select(&self, r: f64) -> Option<usize> {
        self.cumulative.partition_point(|c| *c <= r)
            .checked_sub(1)
            .filter(|i| *i < self.ops.len())
    }
}

impl<S> QuantumOp<S> for Probabilistic<S>
where S: QuantumState + 'static
{
    fn apply(&mut self, state: &mut S) -> OpResult<()> {
        let r = self.rng.draw();
        match self.select(r) {
            Some(idx) => {
                tracing::trace!(op = "Probabilistic", draw = r, index = idx);
                self.ops[idx].apply(state)
            },
            None => {
                tracing::trace!(op = "Probabilistic", draw = r, "no operation selected");
                Ok(())
            },
        }
    }

    fn box_clone(&self) -> Box<dyn QuantumOp<S>> { Box::new(self.deep_copy()) }

    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
        Err(NoMatrix::new(self.name()))
    }

    fn name(&self) -> &'static str { "Probabilistic" }
}

/// Return `true` if `cumulative` is non-decreasing and begins at zero.
pub fn is_cumulative(cumulative: &[f64]) -> bool {
    cumulative.first() == Some(&0.0)
        && cumulative.iter().tuple_windows().all(|(a, b)| a <= b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gate::Gate,
        rng::Scripted,
        state::StateVector,
    };

    fn xz(wx: f64, wz: f64) -> Probabilistic<StateVector> {
        Probabilistic::new([
            (wx, Box::new(Gate::X(0)) as Box<dyn QuantumOp<StateVector>>),
            (wz, Box::new(Gate::Z(0))),
        ])
        .unwrap()
    }

    #[test]
    fn cumulative_layout() {
        let p = xz(0.3, 0.7);
        assert_eq!(p.cumulative().len(), 3);
        assert_eq!(p.cumulative()[0], 0.0);
        assert!((p.cumulative()[2] - 1.0).abs() < 1e-15);
        assert!(is_cumulative(p.cumulative()));
    }

    #[test]
    fn select_boundaries() {
        let p = xz(0.3, 0.7);
        assert_eq!(p.select(0.0), Some(0));
        assert_eq!(p.select(0.29999), Some(0));
        assert_eq!(p.select(0.3), Some(1));
        assert_eq!(p.select(0.999), Some(1));
        assert_eq!(p.select(1.0), None);
        assert_eq!(p.select(f64::NAN), None);
        assert_eq!(p.select(-0.1), None);
    }

    #[test]
    fn deficient_weights_leave_remainder() {
        let p = xz(0.2, 0.7);
        assert_eq!(p.select(0.85), Some(1));
        assert_eq!(p.select(0.95), None);
    }

    #[test]
    fn zero_weights_never_select() {
        let p = xz(0.0, 0.0);
        assert_eq!(p.select(0.0), None);
        assert_eq!(p.select(0.5), None);
    }

    #[test]
    fn zero_weight_entry_is_skipped() {
        let p = xz(0.0, 1.0);
        assert_eq!(p.select(0.0), Some(1));
    }

    #[test]
    fn rejects_bad_input() {
        let empty: Vec<(f64, Box<dyn QuantumOp<StateVector>>)> = Vec::new();
        assert!(matches!(Probabilistic::new(empty), Err(OpError::Empty(_))));
        assert!(matches!(
            Probabilistic::<StateVector>::new([
                (-0.1, Box::new(Gate::X(0)) as Box<dyn QuantumOp<StateVector>>),
            ]),
            Err(OpError::InvalidWeight(_))
        ));
        assert!(matches!(
            Probabilistic::<StateVector>::new([
                (f64::NAN, Box::new(Gate::X(0)) as Box<dyn QuantumOp<StateVector>>),
            ]),
            Err(OpError::InvalidWeight(_))
        ));
        assert!(matches!(
            Probabilistic::<StateVector>::new([
                (0.6, Box::new(Gate::X(0)) as Box<dyn QuantumOp<StateVector>>),
                (0.6, Box::new(Gate::Z(0))),
            ]),
            Err(OpError::WeightOverflow(_))
        ));
    }

    #[test]
    fn apply_uses_drawn_value() {
        let mut p = xz(0.5, 0.5).with_source(Scripted::new([0.1, 0.7]));
        let mut s = StateVector::new(1);
        p.apply(&mut s).unwrap(); // X
        assert!((s.probability(1) - 1.0).abs() < 1e-12);
        p.apply(&mut s).unwrap(); // Z
        assert!((s.amplitudes()[1] + C64::from(1.0)).norm() < 1e-12);
    }

    #[test]
    fn matrix_is_unavailable() {
        let p = xz(0.5, 0.5);
        let err = p.matrix().err().unwrap();
        assert_eq!(err.name(), "Probabilistic");
        assert_eq!(err.placeholder().shape(), (1, 1));
    }
}
