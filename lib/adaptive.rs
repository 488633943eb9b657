//! Operations conditioned on the contents of the classical register.

use std::sync::Arc;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ NoMatrix, OpResult },
    gate::QuantumOp,
    state::QuantumState,
};

/// A read-only test on the classical register.
///
/// Predicates are shared, not copied, between an [`Adaptive`] and its deep
/// copies, so they must not carry mutable state.
pub type Predicate = Arc<dyn Fn(&[u64]) -> bool + Send + Sync>;

/// Wraps an operation so that it is applied only when a predicate on the
/// classical register holds.
///
/// This is deterministic in itself: no random draw is made, although the
/// wrapped operation may be stochastic.
pub struct Adaptive<S> {
    op: Box<dyn QuantumOp<S>>,
    predicate: Predicate,
}

impl<S> Adaptive<S>
where S: QuantumState + 'static
{
    /// Create a new conditional operation.
    pub fn new<F>(op: Box<dyn QuantumOp<S>>, predicate: F) -> Self
    where F: Fn(&[u64]) -> bool + Send + Sync + 'static
    {
        Self { op, predicate: Arc::new(predicate) }
    }

    /// Like [`Self::new`], but reusing an existing shared predicate.
    pub fn with_shared(op: Box<dyn QuantumOp<S>>, predicate: Predicate) -> Self {
        Self { op, predicate }
    }

    /// Shorthand for an operation applied when the register value at
    /// `address` equals `value`. Unset addresses read as 0.
    pub fn when_equals(op: Box<dyn QuantumOp<S>>, address: usize, value: u64)
        -> Self
    {
        Self::new(op, move |creg| creg.get(address).copied().unwrap_or(0) == value)
    }

    pub fn op(&self) -> &dyn QuantumOp<S> { self.op.as_ref() }

    pub fn op_mut(&mut self) -> &mut Box<dyn QuantumOp<S>> { &mut self.op }

    pub fn predicate(&self) -> &Predicate { &self.predicate }

    /// Deep-copy the wrapped operation; the predicate is shared.
    pub fn deep_copy(&self) -> Self {
        Self { op: self.op.box_clone(), predicate: Arc::clone(&self.predicate) }
    }
}

impl<S> QuantumOp<S> for Adaptive<S>
where S: QuantumState + 'static
{
    fn apply(&mut self, state: &mut S) -> OpResult<()> {
        if (self.predicate)(state.classical_register()) {
            self.op.apply(state)
        } else {
            Ok(())
        }
    }

    fn box_clone(&self) -> Box<dyn QuantumOp<S>> { Box::new(self.deep_copy()) }

    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
        Err(NoMatrix::new(self.name()))
    }

    fn name(&self) -> &'static str { "Adaptive" }
}
