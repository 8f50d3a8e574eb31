// Test intent: walks single carriers through the driver and checks by hand,
// covering the complex case and the packed real DC and Nyquist edges.
use tonecheck::analysis::{analyze, carrier_phase};
use tonecheck::check::{
    check_dynamic_range, check_magnitude, check_phase, check_round_trip, expected_magnitude,
    round_trip_error,
};
use tonecheck::{
    generate, Carrier, ReferenceBackend, SpectrumLayout, TestCase, Thresholds, TransformDriver,
    TransformMode,
};

fn thresholds() -> Thresholds {
    Thresholds::default()
}

#[test]
fn complex_tone_at_bin_8_of_64() {
    let backend = ReferenceBackend::new();
    let (n, mode) = (64, TransformMode::Complex);
    let case = TestCase::new(n, mode, SpectrumLayout::Ordered);
    let mut driver = TransformDriver::new(&backend, case).unwrap();
    let carrier = Carrier::new(8, 1.0, 0.0);
    generate(n, mode, &carrier, driver.signal_mut());

    let spectrum = driver.forward().unwrap().to_vec();
    let analysis = analyze(&spectrum, mode, n, 8);
    assert!((analysis.magnitude(n) - 1.0).abs() < 1e-6);
    assert!(analysis.dynamic_range_db() >= 140.0);
    assert!(carrier_phase(&spectrum, 8).abs() < 1e-6);
    assert!(check_dynamic_range(&analysis, &thresholds()).is_ok());
    assert!(check_phase(&spectrum, n, &carrier, &thresholds()).is_ok());
    assert!(check_magnitude(&analysis, mode, n, &carrier, &thresholds()).is_ok());

    driver.inverse().unwrap();
    assert_eq!(driver.reconstructed().len(), 128);
    assert!(check_round_trip(driver.signal(), driver.reconstructed(), n, 8, &thresholds()).is_ok());
    assert!(round_trip_error(driver.signal(), driver.reconstructed(), n) < 1e-10);
}

#[test]
fn real_dc_tone_keeps_full_amplitude() {
    let backend = ReferenceBackend::new();
    let (n, mode) = (32, TransformMode::Real);
    let case = TestCase::new(n, mode, SpectrumLayout::Reordered);
    let mut driver = TransformDriver::new(&backend, case).unwrap();
    let carrier = Carrier::new(0, 1.1, 0.0);
    generate(n, mode, &carrier, driver.signal_mut());

    let spectrum = driver.forward().unwrap().to_vec();
    assert_eq!(expected_magnitude(mode, n, &carrier), 1.1f32 as f64);
    let analysis = analyze(&spectrum, mode, n, 0);
    assert!((analysis.magnitude(n) - 1.1f32 as f64).abs() < 1e-6);
    assert!(check_magnitude(&analysis, mode, n, &carrier, &thresholds()).is_ok());
    // DC carries no phase, nothing to compare
    assert!(check_phase(&spectrum, n, &Carrier::new(0, 1.1, 1.0), &thresholds()).is_ok());
}

#[test]
fn real_nyquist_tone_reads_packed_index_one() {
    let backend = ReferenceBackend::new();
    let (n, mode) = (256, TransformMode::Real);
    let case = TestCase::new(n, mode, SpectrumLayout::Ordered);
    let mut driver = TransformDriver::new(&backend, case).unwrap();
    let carrier = Carrier::new(128, 1.0, 0.0);
    generate(n, mode, &carrier, driver.signal_mut());

    let spectrum = driver.forward().unwrap().to_vec();
    assert!((spectrum[1] - 256.0).abs() < 1e-3);
    assert!(spectrum[0].abs() < 1e-3);
    let analysis = analyze(&spectrum, mode, n, 128);
    assert_eq!(analysis.carrier_power, (spectrum[1] as f64).powi(2));
    assert!((analysis.magnitude(n) - 1.0).abs() < 1e-6);
    assert!(check_dynamic_range(&analysis, &thresholds()).is_ok());

    driver.inverse().unwrap();
    assert!(check_round_trip(driver.signal(), driver.reconstructed(), n, 128, &thresholds()).is_ok());
}

#[test]
fn real_tone_splits_energy_with_its_mirror() {
    let backend = ReferenceBackend::new();
    let (n, mode) = (128, TransformMode::Real);
    let case = TestCase::new(n, mode, SpectrumLayout::Reordered);
    let mut driver = TransformDriver::new(&backend, case).unwrap();
    let carrier = Carrier::new(24, 1.1, 0.25 * std::f64::consts::PI);
    generate(n, mode, &carrier, driver.signal_mut());

    let spectrum = driver.forward().unwrap().to_vec();
    let analysis = analyze(&spectrum, mode, n, 24);
    assert!((analysis.magnitude(n) - 1.1f32 as f64 / 2.0).abs() < 1e-6);
    assert!(check_phase(&spectrum, n, &carrier, &thresholds()).is_ok());
    assert!(check_magnitude(&analysis, mode, n, &carrier, &thresholds()).is_ok());
}
