//! Sweep over sizes, modes, layouts and carrier bins.
//!
//! Every level returns a value describing what happened; pass/fail at a
//! higher level is the OR of the levels below it. Check failures never stop
//! the sweep, setup and transform errors do.

use core::f64::consts::PI;

use log::{debug, log_enabled, trace, warn, Level};

use crate::analysis::{analyze, power_db, power_spectrum, SpectrumAnalysis};
use crate::backend::{FftBackend, TransformMode};
use crate::check::{check_dynamic_range, check_magnitude, check_phase, check_round_trip, CheckFailure};
use crate::config::{SweepConfig, Thresholds};
use crate::driver::{SpectrumLayout, TestCase, TransformDriver};
use crate::error::HarnessError;
use crate::tone::{generate, Carrier};

/// Mode and layout of the four cases run for every size, in run order.
pub const CASE_ORDER: [(TransformMode, SpectrumLayout); 4] = [
    (TransformMode::Complex, SpectrumLayout::Ordered),
    (TransformMode::Real, SpectrumLayout::Ordered),
    (TransformMode::Complex, SpectrumLayout::Reordered),
    (TransformMode::Real, SpectrumLayout::Reordered),
];

/// Carriers tested for one size and mode.
///
/// Bins step by `n / 16` up to the last bin of the spectrum. Amplitude and
/// starting phase cycle with the iteration index so neighbouring bins are
/// not tested with identical signals.
pub fn carrier_schedule(n: usize, mode: TransformMode) -> impl Iterator<Item = Carrier> {
    let step = (n / 16).max(1);
    let bins = mode.bin_count(n);
    (0..bins).step_by(step).enumerate().map(|(m, bin)| {
        let amplitude = if m % 3 == 0 { 1.0 } else { 1.1 };
        let phase = (m % 4) as f64 * 0.125 * PI;
        Carrier::new(bin, amplitude, phase)
    })
}

/// Result of one carrier bin.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOutcome {
    pub carrier: Carrier,
    /// Leakage figures of the attempt that was checked.
    pub analysis: SpectrumAnalysis,
    pub failures: Vec<CheckFailure>,
    /// Dynamic-range failure of a first attempt that passed on retry.
    pub transient: Option<CheckFailure>,
}

impl BinOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn retried(&self) -> bool {
        self.transient.is_some() || self.failures.iter().any(|f| matches!(f, CheckFailure::DynamicRange { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub bins: Vec<BinOutcome>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.bins.iter().all(BinOutcome::passed)
    }

    pub fn failure_count(&self) -> usize {
        self.bins.iter().map(|b| b.failures.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeOutcome {
    pub size: usize,
    pub cases: Vec<CaseOutcome>,
}

impl SizeOutcome {
    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseOutcome::passed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    /// Name of the backend under test.
    pub backend: String,
    pub sizes: Vec<SizeOutcome>,
}

impl SweepOutcome {
    pub fn passed(&self) -> bool {
        self.sizes.iter().all(SizeOutcome::passed)
    }

    pub fn failure_count(&self) -> usize {
        self.sizes
            .iter()
            .flat_map(|s| &s.cases)
            .map(CaseOutcome::failure_count)
            .sum()
    }
}

/// Run every carrier of `case` against a fresh plan.
///
/// The plan and buffers live for this call only and are released before it
/// returns, also on error.
///
/// # Panics
///
/// Panics if `case.size` is not a power of two.
pub fn run_case<B: FftBackend>(
    backend: &B,
    case: TestCase,
    thresholds: &Thresholds,
) -> Result<CaseOutcome, HarnessError> {
    assert!(
        case.size.is_power_of_two(),
        "transform size {} is not a power of two",
        case.size
    );
    debug!("{case}: start");
    let mut driver =
        TransformDriver::new(backend, case).map_err(|source| HarnessError::Setup { case, source })?;
    let bins = carrier_schedule(case.size, case.mode)
        .map(|carrier| run_bin(&mut driver, &carrier, thresholds))
        .collect::<Result<Vec<_>, _>>()?;
    let outcome = CaseOutcome { case, bins };
    debug!(
        "{case}: {} bins, {} failures",
        outcome.bins.len(),
        outcome.failure_count()
    );
    Ok(outcome)
}

/// Dynamic range gets two attempts; every other criterion is checked once,
/// on the attempt that was kept.
fn run_bin<B: FftBackend>(
    driver: &mut TransformDriver<'_, B>,
    carrier: &Carrier,
    thresholds: &Thresholds,
) -> Result<BinOutcome, HarnessError> {
    let case = driver.case();
    let (n, mode) = (case.size, case.mode);
    let transform_err = |source| HarnessError::Transform {
        case,
        bin: carrier.bin,
        source,
    };

    let mut failures = Vec::new();
    let mut transient = None;
    let analysis = loop {
        generate(n, mode, carrier, driver.signal_mut());
        let spectrum = driver.forward().map_err(transform_err)?;
        let analysis = analyze(spectrum, mode, n, carrier.bin);
        match check_dynamic_range(&analysis, thresholds) {
            Ok(()) => break analysis,
            Err(failure) if transient.is_none() => {
                warn!(
                    "{case}: bin {} dynamic range {:.3} dB below {} dB, retrying",
                    carrier.bin,
                    analysis.dynamic_range_db(),
                    thresholds.min_dynamic_range_db
                );
                if log_enabled!(Level::Trace) {
                    for (j, power) in power_spectrum(spectrum, mode, n).enumerate() {
                        trace!("{case}: pwr[j = {j}] = {power:e} == {:.6} dB", power_db(power));
                    }
                }
                transient = Some(failure);
            }
            Err(failure) => {
                failures.push(failure);
                break analysis;
            }
        }
    };
    if !failures.is_empty() {
        // the retry failed as well, the first attempt is not a transient
        transient = None;
    }

    let spectrum = driver.spectrum();
    if let Err(failure) = check_phase(spectrum, n, carrier, thresholds) {
        failures.push(failure);
    }
    if let Err(failure) = check_magnitude(&analysis, mode, n, carrier, thresholds) {
        failures.push(failure);
    }
    driver.inverse().map_err(transform_err)?;
    if let Err(failure) =
        check_round_trip(driver.signal(), driver.reconstructed(), n, carrier.bin, thresholds)
    {
        failures.push(failure);
    }

    Ok(BinOutcome {
        carrier: *carrier,
        analysis,
        failures,
        transient,
    })
}

/// Run the four cases of one size.
pub fn run_size<B: FftBackend>(
    backend: &B,
    size: usize,
    thresholds: &Thresholds,
) -> Result<SizeOutcome, HarnessError> {
    let cases = CASE_ORDER
        .iter()
        .map(|&(mode, layout)| run_case(backend, TestCase::new(size, mode, layout), thresholds))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SizeOutcome { size, cases })
}

/// Run the whole sweep described by `config`.
pub fn run_sweep<B: FftBackend>(
    backend: &B,
    config: &SweepConfig,
) -> Result<SweepOutcome, HarnessError> {
    run_sweep_with(backend, config, |_| {})
}

/// Like [`run_sweep`], calling `on_size` as soon as each size completes.
pub fn run_sweep_with<B, F>(
    backend: &B,
    config: &SweepConfig,
    mut on_size: F,
) -> Result<SweepOutcome, HarnessError>
where
    B: FftBackend,
    F: FnMut(&SizeOutcome),
{
    let name = backend.name();
    debug!(
        "sweeping {name} over sizes {}..={}",
        config.min_size, config.max_size
    );
    let mut sizes = Vec::new();
    for size in config.sizes() {
        let outcome = run_size(backend, size, &config.thresholds)?;
        on_size(&outcome);
        sizes.push(outcome);
    }
    Ok(SweepOutcome {
        backend: name,
        sizes,
    })
}
