#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Stochastic application of quantum channels to state vectors.
//!
//! Four composite operations sit on top of a common [`QuantumOp`][gate::QuantumOp]
//! capability:
//! - [`Probabilistic`][probabilistic::Probabilistic]: a weighted random choice
//!   of one sub-operation per application.
//! - [`Cptp`][cptp::Cptp]: a channel in Kraus form, of which exactly one branch
//!   is committed per application with probability given by the state's norm.
//! - [`Instrument`][cptp::Instrument]: like `Cptp`, but records the index of
//!   the committed branch in the state's classical register.
//! - [`Adaptive`][adaptive::Adaptive]: an operation applied only when a
//!   predicate over the classical register holds.
//!
//! None of these has a single matrix representation; asking for one yields a
//! [`NoMatrix`][error::NoMatrix] error.
//!
//! Diagnostics are emitted through [`tracing`]; install a subscriber to see
//! them.
//!
//! # Example
//! ```
//! use qchan::{
//!     adaptive::Adaptive,
//!     circuit::Circuit,
//!     gate::Gate,
//!     noise,
//!     state::{ QuantumState, StateVector },
//! };
//!
//! // prepare |+>, measure it, and undo a `1` outcome
//! let mut circ: Circuit<StateVector> = Circuit::new();
//! circ.push(Gate::H(0))
//!     .push(noise::measurement(0, 0).unwrap())
//!     .push(Adaptive::<StateVector>::when_equals(Box::new(Gate::X(0)), 0, 1));
//! let mut state = StateVector::new(1);
//! circ.apply(&mut state).unwrap();
//! assert!((state.probability(0) - 1.0).abs() < 1e-12);
//! assert_eq!(state.classical_register().len(), 1);
//! ```

pub mod error;
pub mod rng;
pub mod state;
pub mod gate;
pub mod probabilistic;
pub mod cptp;
pub mod adaptive;
pub mod noise;
pub mod circuit;

pub use crate::{
    adaptive::{ Adaptive, Predicate },
    circuit::Circuit,
    cptp::{ Cptp, Instrument, TracePolicy },
    error::{ NoMatrix, OpError, OpResult },
    gate::{ Dense, Gate, QuantumOp },
    probabilistic::Probabilistic,
    rng::{ Entropy, Scripted, UniformSource },
    state::{ QuantumState, StateVector },
};
