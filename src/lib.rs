//! # tonecheck - accuracy oracle for power-of-two FFT implementations
//!
//! Drives an FFT backend through single-tone signals and checks that it
//! produces correct spectra and invertible transforms to near single
//! precision limits.
//!
//! ## What is checked
//!
//! For every size `N = 32, 64, ..., 65536`, in four configurations
//! (complex and real input, each with a directly ordered spectrum and with a
//! separate reorder step), a carrier is placed on bins `0, N/16, 2N/16, ...`
//! and the forward spectrum must show:
//!
//! - **Dynamic range**: carrier at least 140 dB above the strongest other bin
//! - **Phase**: starting phase recovered within 1e-4 degrees
//! - **Magnitude**: amplitude recovered within 1e-6
//! - **Round trip**: inverse transform reproducing the signal
//!
//! ## Usage
//!
//! ```no_run
//! use tonecheck::{run_sweep, ReferenceBackend, SizeReport, Summary, SweepConfig};
//!
//! let backend = ReferenceBackend::new();
//! let outcome = run_sweep(&backend, &SweepConfig::default()).unwrap();
//! for size in &outcome.sizes {
//!     print!("{}", SizeReport(size));
//! }
//! print!("{}", Summary(&outcome));
//! ```
//!
//! Any implementation of [`FftBackend`] can be checked the same way.
//!
//! ## Logging
//!
//! The library logs through the `log` facade: case boundaries at `debug`,
//! dynamic-range retries at `warn` and the spectrum dump of a retried bin at
//! `trace`.

pub mod analysis;
/// The backend contract and plan ownership.
pub mod backend;
pub mod buffer;
/// Acceptance criteria and their diagnostics.
pub mod check;
pub mod config;
/// Plan and buffers of a single test case.
pub mod driver;
pub mod error;
/// Minimal numeric types for the reference backend.
pub mod num;
pub mod report;
/// Reference radix-2 backend.
pub mod scalar;
/// Size, mode, layout and bin iteration.
pub mod sweep;
pub mod tone;

pub use analysis::{analyze, SpectrumAnalysis};
pub use backend::{BackendError, Direction, FftBackend, PlanGuard, TransformMode};
pub use buffer::AlignedBuffer;
pub use check::CheckFailure;
pub use config::{ConfigError, Precision, SweepConfig, Thresholds};
pub use driver::{SpectrumLayout, TestCase, TransformDriver};
pub use error::HarnessError;
pub use report::{CaseReport, SizeReport, Summary};
pub use scalar::{ReferenceBackend, ScalarBackend, SingleBackend};
pub use sweep::{
    carrier_schedule, run_case, run_size, run_sweep, run_sweep_with, BinOutcome, CaseOutcome,
    SizeOutcome, SweepOutcome,
};
pub use tone::{generate, Carrier};
