// Test intent: verifies the reference backend passes the sweep and that both
// spectrum layouts agree across sizes.
use tonecheck::{
    carrier_schedule, generate, run_sweep, ReferenceBackend, SpectrumLayout, SweepConfig,
    TestCase, TransformDriver, TransformMode,
};

#[test]
fn reference_backend_passes_up_to_4096() {
    let backend = ReferenceBackend::new();
    let config = SweepConfig {
        max_size: 4096,
        ..SweepConfig::default()
    };
    let outcome = run_sweep(&backend, &config).unwrap();
    assert_eq!(outcome.sizes.len(), 8);
    for size in &outcome.sizes {
        assert_eq!(size.cases.len(), 4);
        for case in &size.cases {
            assert!(case.passed(), "{}: {:?}", case.case, case.bins);
        }
    }
    assert!(outcome.passed());
    assert_eq!(outcome.backend, "scalar radix-2 (double precision)");
}

#[test]
fn reference_backend_passes_largest_size() {
    let backend = ReferenceBackend::new();
    let config = SweepConfig {
        min_size: 65536,
        ..SweepConfig::default()
    };
    let outcome = run_sweep(&backend, &config).unwrap();
    assert_eq!(outcome.sizes.len(), 1);
    assert!(outcome.passed(), "{:?}", outcome.sizes[0].cases);
}

#[test]
fn dynamic_range_has_margin() {
    let backend = ReferenceBackend::new();
    let config = SweepConfig {
        max_size: 1024,
        ..SweepConfig::default()
    };
    let outcome = run_sweep(&backend, &config).unwrap();
    let worst = outcome
        .sizes
        .iter()
        .flat_map(|s| &s.cases)
        .flat_map(|c| &c.bins)
        .map(|b| b.analysis.dynamic_range_db())
        .fold(f64::INFINITY, f64::min);
    assert!(worst >= 140.0, "worst dynamic range {worst} dB");
}

#[test]
fn layouts_agree_for_every_scheduled_carrier() {
    let backend = ReferenceBackend::new();
    for n in [32usize, 512, 2048] {
        for mode in [TransformMode::Complex, TransformMode::Real] {
            let case = TestCase::new(n, mode, SpectrumLayout::Ordered);
            let mut driver = TransformDriver::new(&backend, case).unwrap();
            for carrier in carrier_schedule(n, mode) {
                generate(n, mode, &carrier, driver.signal_mut());
                let worst = driver.layout_disagreement().unwrap();
                // the reference reorder only permutes, so the paths agree bit for bit
                assert_eq!(worst, 0.0, "{case} bin {}", carrier.bin);
            }
        }
    }
}
