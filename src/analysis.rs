//! Per-bin power and leakage measurement on a natural-order spectrum.

use crate::backend::TransformMode;

/// Power floor applied before taking logarithms, so a perfectly empty bin
/// reads as -300 dB instead of -inf.
pub const POWER_FLOOR: f64 = 1e-30;

/// Convert a power value to decibels, clamping at [`POWER_FLOOR`].
pub fn power_db(power: f64) -> f64 {
    10.0 * libm::log10(power.max(POWER_FLOOR))
}

/// Power of bin `j` in a natural-order spectrum of size `n`.
///
/// In the packed real layout DC lives at index 0 and the Nyquist bin at
/// index 1, both without an imaginary part.
pub fn bin_power(spectrum: &[f32], mode: TransformMode, n: usize, j: usize) -> f64 {
    let sq = |v: f32| (v as f64) * (v as f64);
    match mode {
        TransformMode::Real if j == 0 => sq(spectrum[0]),
        TransformMode::Real if j == n / 2 => sq(spectrum[1]),
        _ => sq(spectrum[2 * j]) + sq(spectrum[2 * j + 1]),
    }
}

/// Power of every bin, in bin order.
pub fn power_spectrum(
    spectrum: &[f32],
    mode: TransformMode,
    n: usize,
) -> impl Iterator<Item = f64> + '_ {
    (0..mode.bin_count(n)).map(move |j| bin_power(spectrum, mode, n, j))
}

/// Leakage figures for one carrier bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumAnalysis {
    pub carrier_bin: usize,
    pub carrier_power: f64,
    /// Strongest bin other than the carrier; the first one wins ties.
    pub max_other_bin: usize,
    pub max_other_power: f64,
}

impl SpectrumAnalysis {
    pub fn carrier_db(&self) -> f64 {
        power_db(self.carrier_power)
    }

    pub fn max_other_db(&self) -> f64 {
        power_db(self.max_other_power)
    }

    /// Carrier-to-strongest-spur ratio in dB.
    pub fn dynamic_range_db(&self) -> f64 {
        self.carrier_db() - self.max_other_db()
    }

    pub fn carrier_amplitude(&self) -> f64 {
        libm::sqrt(self.carrier_power)
    }

    /// Carrier amplitude divided by the transform size.
    pub fn magnitude(&self, n: usize) -> f64 {
        self.carrier_amplitude() / n as f64
    }
}

/// Measure carrier and strongest-spur power of a natural-order spectrum.
pub fn analyze(spectrum: &[f32], mode: TransformMode, n: usize, carrier_bin: usize) -> SpectrumAnalysis {
    let mut carrier_power = 0.0;
    let mut max_other_bin = 0;
    let mut max_other_power = -1.0;
    for (j, power) in power_spectrum(spectrum, mode, n).enumerate() {
        if j == carrier_bin {
            carrier_power = power;
        } else if power > max_other_power {
            max_other_power = power;
            max_other_bin = j;
        }
    }
    SpectrumAnalysis {
        carrier_bin,
        carrier_power,
        max_other_bin,
        max_other_power,
    }
}

/// Phase of bin `k` in radians. Not meaningful for DC or Nyquist.
pub fn carrier_phase(spectrum: &[f32], k: usize) -> f64 {
    libm::atan2(spectrum[2 * k + 1] as f64, spectrum[2 * k] as f64)
}
