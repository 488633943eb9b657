//! Sequential execution of operations against a single state.

use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ NoMatrix, OpResult },
    gate::QuantumOp,
    state::QuantumState,
};

/// An ordered list of operations, applied one after another to the same
/// state.
///
/// Cloning a `Circuit` deep-copies every operation, with each stochastic
/// operation in the clone drawing from its own random stream.
pub struct Circuit<S> {
    ops: Vec<Box<dyn QuantumOp<S>>>,
}

impl<S> Default for Circuit<S> {
    fn default() -> Self { Self { ops: Vec::new() } }
}

impl<S> Clone for Circuit<S>
where S: 'static
{
    fn clone(&self) -> Self {
        Self { ops: self.ops.iter().map(|op| op.box_clone()).collect() }
    }
}

impl<S> FromIterator<Box<dyn QuantumOp<S>>> for Circuit<S> {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Box<dyn QuantumOp<S>>>
    {
        Self { ops: iter.into_iter().collect() }
    }
}

impl<S> Circuit<S>
where S: QuantumState + 'static
{
    /// Create a new, empty circuit.
    pub fn new() -> Self { Self::default() }

    /// Append an operation.
    pub fn push<O>(&mut self, op: O) -> &mut Self
    where O: QuantumOp<S> + 'static
    {
        self.ops.push(Box::new(op));
        self
    }

    /// Append an already-boxed operation.
    pub fn push_boxed(&mut self, op: Box<dyn QuantumOp<S>>) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize { self.ops.len() }

    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    pub fn ops(&self) -> &[Box<dyn QuantumOp<S>>] { &self.ops }

    /// Apply every operation in order, stopping at the first error.
    pub fn apply(&mut self, state: &mut S) -> OpResult<()> {
        for op in self.ops.iter_mut() {
            if let Err(err) = op.apply(state) {
                tracing::debug!(op = op.name(), %err, "circuit halted");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Run the circuit `shots` times, each on a fresh copy of `init`, and
    /// return the final classical register of each shot.
    pub fn run_shots(&mut self, init: &S, shots: usize) -> OpResult<Vec<Vec<u64>>> {
        let mut records: Vec<Vec<u64>> = Vec::with_capacity(shots);
        let mut state = init.clone();
        for _ in 0..shots {
            state.load(init);
            self.apply(&mut state)?;
            records.push(state.classical_register().to_vec());
        }
        Ok(records)
    }
}

impl<S> QuantumOp<S> for Circuit<S>
where S: QuantumState + 'static
{
    fn apply(&mut self, state: &mut S) -> OpResult<()> { Circuit::apply(self, state) }

    fn box_clone(&self) -> Box<dyn QuantumOp<S>> { Box::new(self.clone()) }

    fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
        Err(NoMatrix::new(self.name()))
    }

    fn name(&self) -> &'static str { "Circuit" }
}
