#![allow(dead_code)]

use std::{
    io,
    sync::{ Arc, Mutex },
};
use num_complex::Complex64 as C64;
use qchan::{ Dense, QuantumOp, StateVector };
use tracing_subscriber::fmt::MakeWriter;

pub const EPSILON: f64 = 1e-12;

pub type BoxOp = Box<dyn QuantumOp<StateVector>>;

/// In-memory sink for formatted log events.
#[derive(Clone, Debug, Default)]
pub struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl LogBuf {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for LogBuf {
    type Writer = LogBuf;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

/// Run `f` with a subscriber installed for the current thread, returning its
/// output along with everything that was logged.
pub fn capture_logs<F, T>(f: F) -> (T, String)
where F: FnOnce() -> T
{
    let buf = LogBuf::default();
    let subscriber
        = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buf.contents())
}

/// Kraus operator `sqrt(w) * |bit><bit|` on qubit `k`.
pub fn weighted_proj(k: usize, bit: usize, w: f64) -> BoxOp {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    let elems = if bit == 0 { [z1, z0, z0, z0] } else { [z0, z0, z0, z1] };
    let mut op = Dense::single(k, elems);
    op.scale(w.sqrt());
    Box::new(op)
}

/// Kraus operator `sqrt(w) * I` on qubit `k`.
pub fn weighted_id(k: usize, w: f64) -> BoxOp {
    let z0 = C64::from(0.0);
    let z1 = C64::from(1.0);
    let mut op = Dense::single(k, [z1, z0, z0, z1]);
    op.scale(w.sqrt());
    Box::new(op)
}

/// A normalized one-qubit state with uneven amplitudes.
pub fn skewed() -> StateVector {
    StateVector::from_amplitudes([C64::new(0.6, 0.0), C64::new(0.0, 0.8)]).unwrap()
}
