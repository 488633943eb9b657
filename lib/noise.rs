//! Common single-qubit noise channels and measurements, built from the
//! composite operations in this crate.
//!
//! Pauli-type channels are expressed as [`Probabilistic`] mixtures whose
//! weights sum to less than one, leaving the remainder as the identity.
//! Damping channels are given by their Kraus operators as [`Cptp`] maps.

use num_complex::Complex64 as C64;
use crate::{
    cptp::{ Cptp, Instrument },
    error::{ OpError, OpResult },
    gate::{ Dense, Gate, QuantumOp },
    probabilistic::Probabilistic,
    state::StateVector,
};

type BoxOp = Box<dyn QuantumOp<StateVector>>;

fn validate_prob(p: f64) -> OpResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(OpError::InvalidProbability(p));
    }
    Ok(())
}

/// Bit flip: apply X to qubit `k` with probability `p`.
pub fn bit_flip(k: usize, p: f64) -> OpResult<Probabilistic<StateVector>> {
    validate_prob(p)?;
    Probabilistic::new([(p, Box::new(Gate::X(k)) as BoxOp)])
}

/// Phase flip: apply Z to qubit `k` with probability `p`.
pub fn phase_flip(k: usize, p: f64) -> OpResult<Probabilistic<StateVector>> {
    validate_prob(p)?;
    Probabilistic::new([(p, Box::new(Gate::Z(k)) as BoxOp)])
}

/// Bit-phase flip: apply Y to qubit `k` with probability `p`.
pub fn bit_phase_flip(k: usize, p: f64) -> OpResult<Probabilistic<StateVector>> {
    validate_prob(p)?;
    Probabilistic::new([(p, Box::new(Gate::Y(k)) as BoxOp)])
}

/// Depolarizing: with total probability `p`, apply one of X, Y, or Z to qubit
/// `k`, each with probability `p / 3`.
pub fn depolarizing(k: usize, p: f64) -> OpResult<Probabilistic<StateVector>> {
    validate_prob(p)?;
    let w = p / 3.0;
    Probabilistic::new([
        (w, Box::new(Gate::X(k)) as BoxOp),
        (w, Box::new(Gate::Y(k))),
        (w, Box::new(Gate::Z(k))),
    ])
}

/// Amplitude damping (T1 relaxation) on qubit `k` with decay probability
/// `gamma`.
pub fn amplitude_damping(k: usize, gamma: f64) -> OpResult<Cptp<StateVector>> {
    validate_prob(gamma)?;
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    let k0 = Dense::single(k, [z1, z0, z0, (1.0 - gamma).sqrt().into()]);
    let k1 = Dense::single(k, [z0, gamma.sqrt().into(), z0, z0]);
    Cptp::new(vec![Box::new(k0), Box::new(k1)])
}

/// Phase damping (pure dephasing) on qubit `k` with parameter `lambda`.
pub fn phase_damping(k: usize, lambda: f64) -> OpResult<Cptp<StateVector>> {
    validate_prob(lambda)?;
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    let k0 = Dense::single(k, [z1, z0, z0, (1.0 - lambda).sqrt().into()]);
    let k1 = Dense::single(k, [z0, z0, z0, lambda.sqrt().into()]);
    Cptp::new(vec![Box::new(k0), Box::new(k1)])
}

/// Projective Z-basis measurement of qubit `k`, writing the outcome (0 or 1)
/// to `address` in the classical register.
pub fn measurement(k: usize, address: usize) -> OpResult<Instrument<StateVector>>
{
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    let p0 = Dense::single(k, [z1, z0, z0, z0]);
    let p1 = Dense::single(k, [z0, z0, z0, z1]);
    Instrument::new(vec![Box::new(p0), Box::new(p1)], address)
}
