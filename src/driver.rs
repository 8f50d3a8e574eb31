//! Buffers and plan for one test case, and the transform calls on them.

use core::fmt;

use crate::backend::{BackendError, Direction, FftBackend, PlanGuard, TransformMode};
use crate::buffer::AlignedBuffer;

/// How the forward transform produces a natural-order spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectrumLayout {
    /// The backend orders the spectrum itself.
    Ordered,
    /// Internal-order output followed by a separate reorder call.
    Reordered,
}

impl fmt::Display for SpectrumLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumLayout::Ordered => f.write_str("ordered"),
            SpectrumLayout::Reordered => f.write_str("reordered"),
        }
    }
}

/// One (size, mode, layout) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TestCase {
    pub size: usize,
    pub mode: TransformMode,
    pub layout: SpectrumLayout,
}

impl TestCase {
    pub fn new(size: usize, mode: TransformMode, layout: SpectrumLayout) -> Self {
        Self { size, mode, layout }
    }

    pub fn buffer_len(&self) -> usize {
        self.mode.buffer_len(self.size)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fft {} ({})", self.mode, self.size, self.layout)
    }
}

/// Owns the plan and every buffer of a test case.
///
/// Fields drop in declaration order, so the plan goes back to the backend
/// before any buffer is freed.
pub struct TransformDriver<'b, B: FftBackend> {
    plan: PlanGuard<'b, B>,
    case: TestCase,
    signal: AlignedBuffer,
    spectrum: AlignedBuffer,
    staging: AlignedBuffer,
    reconstructed: AlignedBuffer,
}

impl<'b, B: FftBackend> TransformDriver<'b, B> {
    pub fn new(backend: &'b B, case: TestCase) -> Result<Self, BackendError> {
        let plan = PlanGuard::new(backend, case.size, case.mode)?;
        let len = case.buffer_len();
        Ok(Self {
            plan,
            case,
            signal: backend.allocate(len),
            spectrum: backend.allocate(len),
            staging: backend.allocate(len),
            reconstructed: backend.allocate(len),
        })
    }

    pub fn case(&self) -> TestCase {
        self.case
    }

    pub fn signal(&self) -> &[f32] {
        &self.signal
    }

    pub fn signal_mut(&mut self) -> &mut [f32] {
        &mut self.signal
    }

    /// Natural-order spectrum of the last [`TransformDriver::forward`].
    pub fn spectrum(&self) -> &[f32] {
        &self.spectrum
    }

    /// Unnormalized output of the last [`TransformDriver::inverse`].
    pub fn reconstructed(&self) -> &[f32] {
        &self.reconstructed
    }

    /// Forward-transform the signal into a natural-order spectrum using the
    /// case's layout.
    pub fn forward(&mut self) -> Result<&[f32], BackendError> {
        self.forward_with(self.case.layout)?;
        Ok(&self.spectrum)
    }

    fn forward_with(&mut self, layout: SpectrumLayout) -> Result<(), BackendError> {
        let backend = self.plan.backend();
        match layout {
            SpectrumLayout::Ordered => {
                backend.forward(&mut *self.plan, &self.signal, &mut self.spectrum, true)
            }
            SpectrumLayout::Reordered => {
                backend.forward(&mut *self.plan, &self.signal, &mut self.staging, false)?;
                backend.reorder(
                    &mut *self.plan,
                    &self.staging,
                    &mut self.spectrum,
                    Direction::Forward,
                )
            }
        }
    }

    /// Inverse-transform the current spectrum. The result is scaled by `n`.
    pub fn inverse(&mut self) -> Result<&[f32], BackendError> {
        let backend = self.plan.backend();
        backend.inverse(&mut *self.plan, &self.spectrum, &mut self.reconstructed)?;
        Ok(&self.reconstructed)
    }

    /// Largest absolute difference between the ordered and the reordered
    /// forward spectra of the current signal.
    ///
    /// Leaves the case's own layout result in the spectrum buffer.
    pub fn layout_disagreement(&mut self) -> Result<f32, BackendError> {
        self.forward_with(SpectrumLayout::Reordered)?;
        let reordered = self.spectrum.to_vec();
        self.forward_with(SpectrumLayout::Ordered)?;
        let worst = self
            .spectrum
            .iter()
            .zip(reordered.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        if self.case.layout == SpectrumLayout::Reordered {
            self.spectrum.copy_from_slice(&reordered);
        }
        Ok(worst)
    }
}
