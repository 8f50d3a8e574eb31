//! The four acceptance criteria.
//!
//! Each check returns `Ok(())` or a [`CheckFailure`] holding the measured and
//! expected values; the failure's `Display` is its diagnostic line.

use core::f64::consts::PI;
use core::fmt;

use crate::analysis::{carrier_phase, SpectrumAnalysis};
use crate::backend::TransformMode;
use crate::config::Thresholds;
use crate::tone::Carrier;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckFailure {
    /// Leakage into another bin is too strong.
    DynamicRange {
        analysis: SpectrumAnalysis,
        required_db: f64,
    },
    /// Recovered phase differs from the generated one.
    Phase {
        bin: usize,
        measured_deg: f64,
        expected_deg: f64,
    },
    /// Recovered magnitude differs from the expected scaling.
    Magnitude {
        bin: usize,
        measured: f64,
        expected: f64,
    },
    /// Inverse transform does not reproduce the signal.
    RoundTrip {
        bin: usize,
        error_sum: f64,
        bound: f64,
        samples: usize,
    },
}

impl CheckFailure {
    /// Short criterion name.
    pub fn criterion(&self) -> &'static str {
        match self {
            CheckFailure::DynamicRange { .. } => "dynamic range",
            CheckFailure::Phase { .. } => "phase",
            CheckFailure::Magnitude { .. } => "magnitude",
            CheckFailure::RoundTrip { .. } => "round trip",
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::DynamicRange {
                analysis,
                required_db,
            } => {
                writeln!(
                    f,
                    "carrier power  at bin {}: {:e} == {:.6} dB",
                    analysis.carrier_bin,
                    analysis.carrier_power,
                    analysis.carrier_db()
                )?;
                writeln!(
                    f,
                    "carrier mag || at bin {}: {:e}",
                    analysis.carrier_bin,
                    analysis.carrier_amplitude()
                )?;
                writeln!(
                    f,
                    "max other pwr  at bin {}: {:e} == {:.6} dB",
                    analysis.max_other_bin,
                    analysis.max_other_power,
                    analysis.max_other_db()
                )?;
                write!(
                    f,
                    "dynamic range: {:.6} dB (required {required_db} dB)",
                    analysis.dynamic_range_db()
                )
            }
            CheckFailure::Phase {
                bin,
                measured_deg,
                expected_deg,
            } => write!(
                f,
                "bin {bin}: phase mismatch! phase = {measured_deg:.6} deg   expected = {expected_deg:.6} deg"
            ),
            CheckFailure::Magnitude {
                bin,
                measured,
                expected,
            } => write!(f, "bin {bin}: mag = {measured:e}   expected = {expected:e}"),
            CheckFailure::RoundTrip {
                bin,
                error_sum,
                bound,
                samples,
            } => write!(
                f,
                "bin {bin}: inverse FFT doesn't match original signal! errSum = {error_sum:e} (bound {bound:e}); mean err = {:e}",
                error_sum / *samples as f64
            ),
        }
    }
}

/// Dynamic range must reach `min_dynamic_range_db`.
pub fn check_dynamic_range(
    analysis: &SpectrumAnalysis,
    thresholds: &Thresholds,
) -> Result<(), CheckFailure> {
    if analysis.dynamic_range_db() < thresholds.min_dynamic_range_db {
        Err(CheckFailure::DynamicRange {
            analysis: *analysis,
            required_db: thresholds.min_dynamic_range_db,
        })
    } else {
        Ok(())
    }
}

/// DC and Nyquist carry no usable phase.
pub fn phase_is_checked(n: usize, bin: usize) -> bool {
    bin > 0 && bin != n / 2
}

/// Map an angle difference into `(-π, π]`.
pub fn wrap_phase(delta: f64) -> f64 {
    let wrapped = (delta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// Phase at the carrier bin must match the generated starting phase.
pub fn check_phase(
    spectrum: &[f32],
    n: usize,
    carrier: &Carrier,
    thresholds: &Thresholds,
) -> Result<(), CheckFailure> {
    if !phase_is_checked(n, carrier.bin) {
        return Ok(());
    }
    let measured = carrier_phase(spectrum, carrier.bin);
    let error = wrap_phase(measured - carrier.phase).abs();
    if error > thresholds.max_phase_error_deg.to_radians() {
        Err(CheckFailure::Phase {
            bin: carrier.bin,
            measured_deg: measured.to_degrees(),
            expected_deg: carrier.phase_degrees(),
        })
    } else {
        Ok(())
    }
}

/// Magnitude a correct backend reports for `carrier`.
///
/// A real cosine splits its energy between bin `k` and its mirror, and the
/// packed layout stores only one of them, except at DC and Nyquist where the
/// two coincide.
pub fn expected_magnitude(mode: TransformMode, n: usize, carrier: &Carrier) -> f64 {
    let amp = carrier.amplitude as f64;
    match mode {
        TransformMode::Complex => amp,
        TransformMode::Real if carrier.bin == 0 || carrier.bin == n / 2 => amp,
        TransformMode::Real => amp / 2.0,
    }
}

pub fn check_magnitude(
    analysis: &SpectrumAnalysis,
    mode: TransformMode,
    n: usize,
    carrier: &Carrier,
    thresholds: &Thresholds,
) -> Result<(), CheckFailure> {
    let measured = analysis.magnitude(n);
    let expected = expected_magnitude(mode, n, carrier);
    if (measured - expected).abs() > thresholds.max_magnitude_error {
        Err(CheckFailure::Magnitude {
            bin: carrier.bin,
            measured,
            expected,
        })
    } else {
        Ok(())
    }
}

/// Sum of squared differences between `original` and `reconstructed / n`.
pub fn round_trip_error(original: &[f32], reconstructed: &[f32], n: usize) -> f64 {
    let scale = n as f64;
    original
        .iter()
        .zip(reconstructed)
        .map(|(&x, &z)| {
            let d = x as f64 - z as f64 / scale;
            d * d
        })
        .sum()
}

/// The error bound grows with `n`: rounding accumulates over `n` additions.
pub fn check_round_trip(
    original: &[f32],
    reconstructed: &[f32],
    n: usize,
    bin: usize,
    thresholds: &Thresholds,
) -> Result<(), CheckFailure> {
    let error_sum = round_trip_error(original, reconstructed, n);
    let bound = n as f64 * thresholds.max_round_trip_error;
    if error_sum > bound {
        Err(CheckFailure::RoundTrip {
            bin,
            error_sum,
            bound,
            samples: n,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn phase_skips_dc_and_nyquist() {
        assert!(!phase_is_checked(64, 0));
        assert!(!phase_is_checked(64, 32));
        assert!(phase_is_checked(64, 4));
        assert!(phase_is_checked(64, 60));
    }

    #[test]
    fn wrap_phase_range() {
        assert!((wrap_phase(2.0 * PI - 0.1) + 0.1).abs() < 1e-12);
        assert_eq!(wrap_phase(PI), PI);
        assert_eq!(wrap_phase(-PI), PI);
        assert!((wrap_phase(-0.25) + 0.25).abs() < 1e-15);
    }

    #[test]
    fn expected_magnitudes() {
        let c = |bin| Carrier::new(bin, 1.1, 0.0);
        let amp = 1.1f32 as f64;
        assert_eq!(expected_magnitude(TransformMode::Real, 32, &c(0)), amp);
        assert_eq!(expected_magnitude(TransformMode::Real, 256, &c(128)), amp);
        assert_eq!(expected_magnitude(TransformMode::Real, 256, &c(16)), amp / 2.0);
        assert_eq!(expected_magnitude(TransformMode::Complex, 256, &c(16)), amp);
        assert_eq!(expected_magnitude(TransformMode::Complex, 256, &c(128)), amp);
    }

    #[test]
    fn dynamic_range_boundary() {
        let n = 16;
        let mut spectrum = vec![0.0f32; 2 * n];
        spectrum[2] = 1.0;
        // a spur sitting right at the threshold passes
        spectrum[4] = 1e-7;
        let a = analyze(&spectrum, TransformMode::Complex, n, 1);
        let relaxed = Thresholds {
            min_dynamic_range_db: a.dynamic_range_db(),
            ..thresholds()
        };
        assert!(check_dynamic_range(&a, &relaxed).is_ok());
        spectrum[4] = 1e-6;
        let a = analyze(&spectrum, TransformMode::Complex, n, 1);
        let err = check_dynamic_range(&a, &thresholds()).unwrap_err();
        assert_eq!(err.criterion(), "dynamic range");
        assert!(err.to_string().contains("max other pwr  at bin 2"));
    }

    #[test]
    fn phase_mismatch_is_reported() {
        let n = 64;
        let mut spectrum = vec![0.0f32; 2 * n];
        let phi = 22.5f64.to_radians();
        spectrum[16] = (n as f64 * phi.cos()) as f32;
        spectrum[17] = (n as f64 * phi.sin()) as f32;
        let ok = Carrier::new(8, 1.0, phi);
        assert!(check_phase(&spectrum, n, &ok, &thresholds()).is_ok());
        let off = Carrier::new(8, 1.0, 45f64.to_radians());
        match check_phase(&spectrum, n, &off, &thresholds()) {
            Err(CheckFailure::Phase {
                measured_deg,
                expected_deg,
                ..
            }) => {
                assert!((measured_deg - 22.5).abs() < 1e-4);
                assert!((expected_deg - 45.0).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn magnitude_uses_half_amplitude_for_real_bins() {
        let n = 64;
        let mut spectrum = vec![0.0f32; n];
        spectrum[2 * 4] = n as f32 / 2.0;
        let carrier = Carrier::new(4, 1.0, 0.0);
        let a = analyze(&spectrum, TransformMode::Real, n, 4);
        assert!(check_magnitude(&a, TransformMode::Real, n, &carrier, &thresholds()).is_ok());
        // the same spectrum is half the expected complex magnitude
        let err = check_magnitude(&a, TransformMode::Complex, n, &carrier, &thresholds()).unwrap_err();
        assert_eq!(
            err,
            CheckFailure::Magnitude {
                bin: 4,
                measured: 0.5,
                expected: 1.0
            }
        );
    }

    #[test]
    fn round_trip_bound_scales_with_size() {
        let original = vec![0.5f32; 64];
        let mut reconstructed: Vec<f32> = original.iter().map(|v| v * 64.0).collect();
        assert_eq!(round_trip_error(&original, &reconstructed, 64), 0.0);
        assert!(check_round_trip(&original, &reconstructed, 64, 0, &thresholds()).is_ok());
        reconstructed[3] += 64.0 * 0.01;
        let err = check_round_trip(&original, &reconstructed, 64, 0, &thresholds()).unwrap_err();
        match err {
            CheckFailure::RoundTrip {
                error_sum, bound, ..
            } => {
                assert!((error_sum - 1e-4).abs() < 1e-7);
                assert!((bound - 64.0 * 1e-7).abs() < 1e-18);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
