//! The contract between the oracle and the FFT implementation under test.
//!
//! The harness never looks inside a backend. It creates one plan per test
//! case, runs forward / reorder / inverse transforms on [`AlignedBuffer`]s,
//! and releases the plan through [`FftBackend::destroy_plan`] exactly once.
//!
//! # Buffer layouts
//!
//! | mode | length | natural-order spectrum |
//! |------|--------|------------------------|
//! | [`TransformMode::Complex`] | `2 * n` | interleaved `[re0, im0, re1, im1, ...]` |
//! | [`TransformMode::Real`] | `n` | packed `[dc, nyquist, re1, im1, ..., re(n/2-1), im(n/2-1)]` |
//!
//! Forward transforms are unnormalized, and so is the inverse: a forward
//! transform followed by an inverse one scales the signal by `n`.

use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use crate::buffer::AlignedBuffer;

/// Input domain of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformMode {
    Real,
    Complex,
}

impl TransformMode {
    /// Number of `f32` values in a signal or spectrum buffer of `n` points.
    pub fn buffer_len(self, n: usize) -> usize {
        match self {
            TransformMode::Real => n,
            TransformMode::Complex => 2 * n,
        }
    }

    /// Number of distinct frequency bins: `n` for complex, `n/2 + 1` for real.
    pub fn bin_count(self, n: usize) -> usize {
        match self {
            TransformMode::Real => n / 2 + 1,
            TransformMode::Complex => n,
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformMode::Real => f.write_str("real"),
            TransformMode::Complex => f.write_str("cplx"),
        }
    }
}

/// Direction of a spectrum reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Internal order to natural order.
    Forward,
    /// Natural order to internal order.
    Backward,
}

/// Errors reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendError {
    /// No plan can be built for this size and mode.
    UnsupportedSize { size: usize, mode: TransformMode },
    /// A buffer handed to a transform has the wrong length.
    MismatchedLengths { expected: usize, actual: usize },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::UnsupportedSize { size, mode } => {
                write!(f, "unsupported {mode} transform size {size}")
            }
            BackendError::MismatchedLengths { expected, actual } => {
                write!(f, "buffer holds {actual} floats, expected {expected}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Check a buffer length against the layout a plan expects.
pub fn expect_len(buf: &[f32], expected: usize) -> Result<(), BackendError> {
    if buf.len() == expected {
        Ok(())
    } else {
        Err(BackendError::MismatchedLengths {
            expected,
            actual: buf.len(),
        })
    }
}

/// A power-of-two FFT implementation that the oracle can drive.
///
/// Plans own whatever scratch memory the transforms need, so a plan is
/// created and released together with the test case that uses it.
pub trait FftBackend {
    type Plan;

    /// Human-readable backend name for reports.
    fn name(&self) -> String;

    fn create_plan(&self, size: usize, mode: TransformMode) -> Result<Self::Plan, BackendError>;

    /// Release every resource held by `plan`.
    fn destroy_plan(&self, plan: Self::Plan) {
        drop(plan);
    }

    /// Forward transform of `input` into `output`.
    ///
    /// With `ordered == false` the spectrum is left in the backend's internal
    /// order and must go through [`FftBackend::reorder`] before analysis.
    fn forward(
        &self,
        plan: &mut Self::Plan,
        input: &[f32],
        output: &mut [f32],
        ordered: bool,
    ) -> Result<(), BackendError>;

    /// Convert between internal and natural spectrum order.
    fn reorder(
        &self,
        plan: &mut Self::Plan,
        input: &[f32],
        output: &mut [f32],
        direction: Direction,
    ) -> Result<(), BackendError>;

    /// Unnormalized inverse transform of a natural-order spectrum.
    fn inverse(
        &self,
        plan: &mut Self::Plan,
        spectrum: &[f32],
        output: &mut [f32],
    ) -> Result<(), BackendError>;

    /// Allocate a zeroed buffer suitable for this backend's transforms.
    fn allocate(&self, len: usize) -> AlignedBuffer {
        AlignedBuffer::zeroed(len)
    }
}

/// Owns a plan and hands it back to its backend when dropped.
pub struct PlanGuard<'b, B: FftBackend + ?Sized> {
    backend: &'b B,
    plan: ManuallyDrop<B::Plan>,
}

impl<'b, B: FftBackend + ?Sized> PlanGuard<'b, B> {
    pub fn new(backend: &'b B, size: usize, mode: TransformMode) -> Result<Self, BackendError> {
        let plan = backend.create_plan(size, mode)?;
        Ok(Self {
            backend,
            plan: ManuallyDrop::new(plan),
        })
    }

    pub fn backend(&self) -> &'b B {
        self.backend
    }
}

impl<B: FftBackend + ?Sized> Deref for PlanGuard<'_, B> {
    type Target = B::Plan;
    fn deref(&self) -> &B::Plan {
        &self.plan
    }
}

impl<B: FftBackend + ?Sized> DerefMut for PlanGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B::Plan {
        &mut self.plan
    }
}

impl<B: FftBackend + ?Sized> Drop for PlanGuard<'_, B> {
    fn drop(&mut self) {
        // SAFETY: `plan` is taken exactly once, here, and never touched again.
        let plan = unsafe { ManuallyDrop::take(&mut self.plan) };
        self.backend.destroy_plan(plan);
    }
}
