mod common;

use qchan::{
    noise,
    Circuit,
    Gate,
    QuantumOp,
    QuantumState,
    StateVector,
};
use common::*;

const SHOTS: usize = 5000;

#[test]
fn measurement_follows_born_rule() {
    let mut circ: Circuit<StateVector> = Circuit::new();
    circ.push(noise::measurement(0, 0).unwrap().seeded(31415));
    let records = circ.run_shots(&skewed(), SHOTS).unwrap();
    let ones = records.iter().filter(|r| r[0] == 1).count();
    let freq = ones as f64 / SHOTS as f64;
    assert!((freq - 0.64).abs() < 0.03, "frequency {}", freq);
}

#[test]
fn amplitude_damping_decay_rate() {
    let mut ad = noise::amplitude_damping(0, 0.3).unwrap().seeded(27182);
    let mut decayed = 0;
    for _ in 0..SHOTS {
        let mut s = StateVector::basis(1, 1).unwrap();
        if ad.apply_branch(&mut s).unwrap() == Some(1) {
            assert!((s.probability(0) - 1.0).abs() < EPSILON);
            decayed += 1;
        }
        assert!((s.norm() - 1.0).abs() < 1e-9);
    }
    let freq = decayed as f64 / SHOTS as f64;
    assert!((freq - 0.3).abs() < 0.03, "frequency {}", freq);
}

#[test]
fn depolarizing_error_rate() {
    // X and Y flip |0>, Z does not: flip rate is 2p/3
    let mut dep = noise::depolarizing(0, 0.45).unwrap().seeded(161803);
    let mut flips = 0;
    for _ in 0..SHOTS {
        let mut s = StateVector::new(1);
        dep.apply(&mut s).unwrap();
        if s.probability(1) > 0.5 { flips += 1; }
    }
    let freq = flips as f64 / SHOTS as f64;
    assert!((freq - 0.3).abs() < 0.03, "frequency {}", freq);
}

#[test]
fn bell_pair_outcomes_agree() {
    let mut circ: Circuit<StateVector> = Circuit::new();
    circ.push(Gate::H(0))
        .push(Gate::CX(0, 1))
        .push(noise::measurement(0, 0).unwrap().seeded(1))
        .push(noise::measurement(1, 1).unwrap().seeded(2));
    let records = circ.run_shots(&StateVector::new(2), 500).unwrap();
    assert!(records.iter().all(|r| r[0] == r[1]));
    let ones = records.iter().filter(|r| r[0] == 1).count();
    assert!(ones > 150 && ones < 350);
}
