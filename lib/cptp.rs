//! Stochastic application of channels given in Kraus form.
//!
//! Both [`Cptp`] and [`Instrument`] hold an ordered list of Kraus operators
//! and, on each application, commit to exactly one of them. Candidates are
//! tried in list order on a scratch copy of the state: the probability of the
//! `i`-th branch is the ratio of the scratch state's norm after applying the
//! `i`-th operator to the original norm, and the first branch at which the
//! running sum of these probabilities exceeds a uniform draw is loaded back
//! into the state and renormalized. An [`Instrument`] additionally writes the
//! index of the committed branch to the classical register.
//!
//! If the running sum never exceeds the draw, the operators do not form a
//! trace-preserving set (or floating-point error left a gap at the top of the
//! interval). What happens then is governed by a [`TracePolicy`].

use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    error::{ NoMatrix, OpError, OpResult },
    gate::QuantumOp,
    rng::{ self, Entropy, UniformSource },
    state::QuantumState,
};

/// Handling of channels whose branch probabilities fall short of the drawn
/// value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TracePolicy {
    /// Emit a warning and leave the state unchanged.
    #[default]
    Lenient,
    /// Leave the state unchanged and return [`OpError::TraceViolation`] (or
    /// [`OpError::DegenerateNorm`]).
    Strict,
}

impl TracePolicy {
    fn violation(self, name: &'static str, total: f64, draw: f64)
        -> OpResult<Option<usize>>
    {
        match self {
            Self::Lenient => {
                tracing::warn!(
                    op = name,
                    total,
                    draw,
                    "{} was not trace preserving; identity-map is applied",
                    name
                );
                Ok(None)
            },
            Self::Strict => Err(OpError::TraceViolation { name, total, draw }),
        }
    }

    fn degenerate(self, name: &'static str, norm: f64)
        -> OpResult<Option<usize>>
    {
        match self {
            Self::Lenient => {
                tracing::warn!(
                    op = name,
                    norm,
                    "{} received a state with degenerate norm; identity-map is applied",
                    name
                );
                Ok(None)
            },
            Self::Strict => Err(OpError::DegenerateNorm { name, norm }),
        }
    }
}

/// Probability of a branch given the ratio of the scratch state's norm to the
/// original norm. Non-finite ratios count as zero.
fn branch_probability(ratio: f64) -> f64 {
    if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
}

// Kraus operators plus the machinery to select among them; shared by `Cptp`
// and `Instrument`.
struct Branches<S> {
    ops: Vec<Box<dyn QuantumOp<S>>>,
    rng: Box<dyn UniformSource>,
    policy: TracePolicy,
}

impl<S> Branches<S>
where S: QuantumState + 'static
{
    fn new(name: &'static str, ops: Vec<Box<dyn QuantumOp<S>>>)
        -> OpResult<Self>
    {
        if ops.is_empty() { return Err(OpError::Empty(name)); }
        Ok(Self { ops, rng: rng::boxed_default(), policy: TracePolicy::default() })
    }

    fn fork(&self) -> Self {
        Self {
            ops: self.ops.iter().map(|op| op.box_clone()).collect(),
            rng: self.rng.fork(),
            policy: self.policy,
        }
    }

    // Returns the index of the committed branch, or `None` if the identity was
    // applied. `state` is only modified on commit.
    fn apply(&mut self, name: &'static str, state: &mut S)
        -> OpResult<Option<usize>>
    {
        let r = self.rng.draw();
        let origin_norm = state.norm();
        if !(origin_norm.is_finite() && origin_norm > 0.0) {
            return self.policy.degenerate(name, origin_norm);
        }

        let mut probe = state.clone();
        let mut total: f64 = 0.0;
        for (idx, op) in self.ops.iter_mut().enumerate() {
            op.apply(&mut probe)?;
            // the running sum uses the clamped value; renormalization divides
            // out the actual change in norm
            let ratio = probe.norm() / origin_norm;
            let p = branch_probability(ratio);
            total += p;
            if p > 0.0 && r < total {
                tracing::trace!(op = name, draw = r, index = idx, prob = p);
                state.load(&probe);
                state.normalize(ratio);
                return Ok(Some(idx));
            }
            probe.load(state);
        }
        self.policy.violation(name, total, r)
    }
}

macro_rules! impl_branch_config {
    ( $name:ident, $label:literal ) => {
        impl<S> $name<S>
        where S: QuantumState + 'static
        {
            /// Replace the random source.
            pub fn with_source<R>(mut self, rng: R) -> Self
            where R: UniformSource + 'static
            {
                self.branches.rng = Box::new(rng);
                self
            }

            /// Replace the random source with a seeded [`Entropy`].
            pub fn seeded(self, seed: u64) -> Self {
                self.with_source(Entropy::seeded(seed))
            }

            /// Set the policy for handling trace-preservation violations.
            pub fn with_policy(mut self, policy: TracePolicy) -> Self {
                self.branches.policy = policy;
                self
            }

            pub fn policy(&self) -> TracePolicy { self.branches.policy }

            /// Return the Kraus operators, in the order they are tried.
            pub fn ops(&self) -> &[Box<dyn QuantumOp<S>>] { &self.branches.ops }

            pub fn ops_mut(&mut self) -> &mut [Box<dyn QuantumOp<S>>] {
                &mut self.branches.ops
            }

            pub fn len(&self) -> usize { self.branches.ops.len() }

            pub fn is_empty(&self) -> bool { self.branches.ops.is_empty() }
        }

        impl<S> QuantumOp<S> for $name<S>
        where S: QuantumState + 'static
        {
            fn apply(&mut self, state: &mut S) -> OpResult<()> {
                self.apply_branch(state).map(|_| ())
            }

            fn box_clone(&self) -> Box<dyn QuantumOp<S>> {
                Box::new(self.deep_copy())
            }

            fn matrix(&self) -> Result<na::DMatrix<C64>, NoMatrix> {
                Err(NoMatrix::new(self.name()))
            }

            fn name(&self) -> &'static str { $label }
        }
    }
}

/// A completely positive, trace-preserving map given as a list of Kraus
/// operators.
pub struct Cptp<S> {
    branches: Branches<S>,
}

impl<S> Cptp<S>
where S: QuantumState + 'static
{
    /// Create a new channel from its Kraus operators, with an entropy-seeded
    /// random source and [`TracePolicy::Lenient`].
    ///
    /// Fails if `ops` is empty. Completeness of the operators is not checked
    /// here; see [`TracePolicy`].
    pub fn new(ops: Vec<Box<dyn QuantumOp<S>>>) -> OpResult<Self> {
        Ok(Self { branches: Branches::new("CPTP-map", ops)? })
    }

    /// Like [`QuantumOp::apply`], but also return the index of the committed
    /// Kraus operator, or `None` if the identity was applied.
    pub fn apply_branch(&mut self, state: &mut S) -> OpResult<Option<usize>> {
        self.branches.apply("CPTP-map", state)
    }

    /// Deep-copy every Kraus operator. The copy draws from a fork of `self`'s
    /// random source.
    pub fn deep_copy(&self) -> Self { Self { branches: self.branches.fork() } }
}

impl_branch_config!(Cptp, "CPTP-map");

/// A channel that also reports which of its Kraus operators occurred, by
/// writing the operator's index into the classical register.
pub struct Instrument<S> {
    branches: Branches<S>,
    address: usize,
}

impl<S> Instrument<S>
where S: QuantumState + 'static
{
    /// Create a new instrument from its Kraus operators, recording outcomes at
    /// `address` in the classical register.
    ///
    /// Fails if `ops` is empty.
    pub fn new(ops: Vec<Box<dyn QuantumOp<S>>>, address: usize)
        -> OpResult<Self>
    {
        Ok(Self { branches: Branches::new("Instrument", ops)?, address })
    }

    /// Return the classical register address written by `self`.
    pub fn address(&self) -> usize { self.address }

    /// Like [`QuantumOp::apply`], but also return the recorded outcome, or
    /// `None` if the identity was applied and nothing was recorded.
    pub fn apply_branch(&mut self, state: &mut S) -> OpResult<Option<usize>> {
        let outcome = self.branches.apply("Instrument", state)?;
        if let Some(idx) = outcome {
            state.set_classical_value(self.address, idx as u64);
        }
        Ok(outcome)
    }

    /// Deep-copy every Kraus operator, keeping the register address. The copy
    /// draws from a fork of `self`'s random source.
    pub fn deep_copy(&self) -> Self {
        Self { branches: self.branches.fork(), address: self.address }
    }
}

impl_branch_config!(Instrument, "Instrument");
