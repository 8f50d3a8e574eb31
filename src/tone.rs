//! Single-tone carrier generation.
//!
//! A carrier sits exactly on one FFT bin, so its spectrum is a single line
//! and every other bin measures leakage. Phase is accumulated in `f64` and
//! kept inside `[-π, π)` after every step: evaluating `cos`/`sin` at ever
//! growing arguments loses precision long before the oracle's tolerances.

use core::f64::consts::PI;

use crate::backend::TransformMode;

/// One carrier: bin, amplitude and starting phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carrier {
    pub bin: usize,
    pub amplitude: f32,
    /// Starting phase in radians, within `[0, π/2)`.
    pub phase: f64,
}

impl Carrier {
    pub fn new(bin: usize, amplitude: f32, phase: f64) -> Self {
        Self {
            bin,
            amplitude,
            phase,
        }
    }

    pub fn phase_degrees(&self) -> f64 {
        self.phase.to_degrees()
    }
}

/// Signed normalized frequency of `bin`: bins at or above `n/2` are the
/// negative frequencies of a complex spectrum.
pub fn signed_frequency(bin: usize, n: usize) -> f64 {
    if bin < n / 2 {
        bin as f64 / n as f64
    } else {
        (bin as f64 - n as f64) / n as f64
    }
}

/// Per-sample phase increment for `bin`, mapped into `[0, 2π)`.
pub fn phase_increment(bin: usize, n: usize) -> f64 {
    let dphi = 2.0 * PI * signed_frequency(bin, n);
    if dphi < 0.0 {
        dphi + 2.0 * PI
    } else {
        dphi
    }
}

/// Write `n` samples of `carrier` into `out`.
///
/// Complex mode writes interleaved `(cos φ, sin φ)` pairs, real mode writes
/// `cos φ` only.
///
/// # Panics
///
/// Panics if `out` does not hold `mode.buffer_len(n)` floats or the bin lies
/// outside the spectrum (`bin < n` complex, `bin <= n/2` real).
pub fn generate(n: usize, mode: TransformMode, carrier: &Carrier, out: &mut [f32]) {
    assert_eq!(
        out.len(),
        mode.buffer_len(n),
        "carrier buffer does not match a {mode} transform of size {n}"
    );
    assert!(
        carrier.bin < mode.bin_count(n),
        "bin {} outside a {mode} spectrum of size {n}",
        carrier.bin
    );
    let dphi = phase_increment(carrier.bin, n);
    let amp = carrier.amplitude;
    let mut phi = carrier.phase;
    match mode {
        TransformMode::Complex => {
            for pair in out.chunks_exact_mut(2) {
                pair[0] = amp * phi.cos() as f32;
                pair[1] = amp * phi.sin() as f32;
                phi = advance(phi, dphi);
            }
        }
        TransformMode::Real => {
            for sample in out.iter_mut() {
                *sample = amp * phi.cos() as f32;
                phi = advance(phi, dphi);
            }
        }
    }
}

#[inline]
fn advance(phi: f64, dphi: f64) -> f64 {
    let next = phi + dphi;
    if next >= PI {
        next - 2.0 * PI
    } else {
        next
    }
}
