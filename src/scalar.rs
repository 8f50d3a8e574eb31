//! Scalar radix-2 reference backend.
//!
//! Complex transforms run an in-place decimation-in-frequency pass, whose
//! output is naturally bit-reversed; that bit-reversed spectrum is this
//! backend's internal order. Inverse transforms bit-reverse the natural-order
//! spectrum and run a decimation-in-time pass with conjugated twiddles.
//!
//! Real transforms of length `n` pack the input into `n/2` complex points
//! `z[j] = x[2j] + i*x[2j+1]`, transform those, and split the half-size
//! spectrum `Z` into the packed real layout. The internal order of a real
//! plan is that packed layout with its `(re, im)` pairs bit-reversed, the
//! `(dc, nyquist)` pair staying in front.
//!
//! Reordering is therefore a pure permutation in both modes and loses no
//! precision.
//!
//! The arithmetic precision is the type parameter: [`ReferenceBackend`]
//! computes in `f64`, [`SingleBackend`] in `f32`. Buffers are `f32` either way.

use core::marker::PhantomData;

use crate::backend::{expect_len, BackendError, Direction, FftBackend, TransformMode};
use crate::num::{Complex, Float};

/// Smallest complex transform a plan accepts.
pub const MIN_COMPLEX_SIZE: usize = 16;

/// Smallest real transform a plan accepts.
pub const MIN_REAL_SIZE: usize = 32;

/// Backend computing in `f64`.
pub type ReferenceBackend = ScalarBackend<f64>;

/// Backend computing in `f32`.
pub type SingleBackend = ScalarBackend<f32>;

#[derive(Debug, Clone, Copy)]
pub struct ScalarBackend<T: Float> {
    _precision: PhantomData<T>,
}

impl<T: Float> Default for ScalarBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ScalarBackend<T> {
    pub const fn new() -> Self {
        Self {
            _precision: PhantomData,
        }
    }
}

/// Precomputed tables and scratch space for one transform size and mode.
#[derive(Debug)]
pub struct ScalarPlan<T: Float> {
    n: usize,
    mode: TransformMode,
    /// `log2` of the complex length.
    bits: u32,
    /// `exp(-2πi k / m)` for `k = 0..m/2`, `m` being the complex length.
    twiddles: Vec<Complex<T>>,
    /// `exp(-2πi k / n)` for `k = 0..n/2`; empty for complex plans.
    split_twiddles: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: Float> ScalarPlan<T> {
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    fn buffer_len(&self) -> usize {
        self.mode.buffer_len(self.n)
    }
}

/// Twiddle tables are evaluated directly per entry; recurrences drift by
/// more than the oracle's tolerances at large sizes.
fn twiddle_table<T: Float>(count: usize, period: usize) -> Vec<Complex<T>> {
    let step = -2.0 * core::f64::consts::PI / period as f64;
    (0..count)
        .map(|k| Complex::expi(step * k as f64))
        .collect()
}

#[inline]
fn bit_reverse(i: usize, bits: u32) -> usize {
    i.reverse_bits() >> (usize::BITS - bits)
}

fn bit_reverse_permute<T: Float>(data: &mut [Complex<T>], bits: u32) {
    for i in 0..data.len() {
        let j = bit_reverse(i, bits);
        if i < j {
            data.swap(i, j);
        }
    }
}

/// Swap `(re, im)` pairs of an `f32` buffer into bit-reversed pair order.
fn permute_pairs(buf: &mut [f32], bits: u32) {
    for i in 0..buf.len() / 2 {
        let j = bit_reverse(i, bits);
        if i < j {
            buf.swap(2 * i, 2 * j);
            buf.swap(2 * i + 1, 2 * j + 1);
        }
    }
}

/// Natural order in, bit-reversed order out.
fn dif<T: Float>(data: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    let m = data.len();
    let mut len = m;
    while len >= 2 {
        let half = len / 2;
        let stride = m / len;
        for block in data.chunks_exact_mut(len) {
            let (lo, hi) = block.split_at_mut(half);
            for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let (x, y) = (*a, *b);
                *a = x + y;
                *b = (x - y) * twiddles[j * stride];
            }
        }
        len = half;
    }
}

/// Bit-reversed order in, natural order out, conjugated twiddles.
fn dit_inverse<T: Float>(data: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    let m = data.len();
    let mut len = 2;
    while len <= m {
        let half = len / 2;
        let stride = m / len;
        for block in data.chunks_exact_mut(len) {
            let (lo, hi) = block.split_at_mut(half);
            for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                let x = *a;
                let t = *b * twiddles[j * stride].conj();
                *a = x + t;
                *b = x - t;
            }
        }
        len *= 2;
    }
}

fn load<T: Float>(src: &[f32], dst: &mut [Complex<T>]) {
    for (c, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *c = Complex::new(T::from_f32(pair[0]), T::from_f32(pair[1]));
    }
}

fn store<T: Float>(src: &[Complex<T>], dst: &mut [f32]) {
    for (pair, c) in dst.chunks_exact_mut(2).zip(src) {
        pair[0] = c.re.to_f32();
        pair[1] = c.im.to_f32();
    }
}

/// Turn the natural-order half-size spectrum `z` into the packed real layout.
fn split<T: Float>(z: &[Complex<T>], twiddles: &[Complex<T>], out: &mut [f32]) {
    let m = z.len();
    let half = T::from_f64(0.5);
    out[0] = (z[0].re + z[0].im).to_f32();
    out[1] = (z[0].re - z[0].im).to_f32();
    for k in 1..m {
        let a = z[k];
        let b = z[m - k].conj();
        let x = ((a + b) + (twiddles[k] * (a - b)).mul_neg_i()).scale(half);
        out[2 * k] = x.re.to_f32();
        out[2 * k + 1] = x.im.to_f32();
    }
}

/// Inverse of [`split`] scaled by two: yields `2Z`, which the unnormalized
/// inverse needs.
fn merge<T: Float>(spectrum: &[f32], twiddles: &[Complex<T>], z: &mut [Complex<T>]) {
    let m = z.len();
    let dc = T::from_f32(spectrum[0]);
    let nyquist = T::from_f32(spectrum[1]);
    z[0] = Complex::new(dc + nyquist, dc - nyquist);
    for k in 1..m {
        let a = Complex::new(T::from_f32(spectrum[2 * k]), T::from_f32(spectrum[2 * k + 1]));
        let b = Complex::new(
            T::from_f32(spectrum[2 * (m - k)]),
            -T::from_f32(spectrum[2 * (m - k) + 1]),
        );
        z[k] = (a + b) + (twiddles[k].conj() * (a - b)).mul_i();
    }
}

impl<T: Float> FftBackend for ScalarBackend<T> {
    type Plan = ScalarPlan<T>;

    fn name(&self) -> String {
        format!("scalar radix-2 ({} precision)", T::NAME)
    }

    fn create_plan(&self, size: usize, mode: TransformMode) -> Result<ScalarPlan<T>, BackendError> {
        let min = match mode {
            TransformMode::Real => MIN_REAL_SIZE,
            TransformMode::Complex => MIN_COMPLEX_SIZE,
        };
        if !size.is_power_of_two() || size < min {
            return Err(BackendError::UnsupportedSize { size, mode });
        }
        let m = match mode {
            TransformMode::Real => size / 2,
            TransformMode::Complex => size,
        };
        let split_twiddles = match mode {
            TransformMode::Real => twiddle_table(m, size),
            TransformMode::Complex => Vec::new(),
        };
        Ok(ScalarPlan {
            n: size,
            mode,
            bits: m.trailing_zeros(),
            twiddles: twiddle_table(m / 2, m),
            split_twiddles,
            scratch: vec![Complex::zero(); m],
        })
    }

    fn forward(
        &self,
        plan: &mut ScalarPlan<T>,
        input: &[f32],
        output: &mut [f32],
        ordered: bool,
    ) -> Result<(), BackendError> {
        let len = plan.buffer_len();
        expect_len(input, len)?;
        expect_len(output, len)?;
        load(input, &mut plan.scratch);
        dif(&mut plan.scratch, &plan.twiddles);
        match (plan.mode, ordered) {
            (TransformMode::Complex, false) => store(&plan.scratch, output),
            (TransformMode::Complex, true) => {
                bit_reverse_permute(&mut plan.scratch, plan.bits);
                store(&plan.scratch, output);
            }
            (TransformMode::Real, _) => {
                bit_reverse_permute(&mut plan.scratch, plan.bits);
                split(&plan.scratch, &plan.split_twiddles, output);
                if !ordered {
                    permute_pairs(output, plan.bits);
                }
            }
        }
        Ok(())
    }

    fn reorder(
        &self,
        plan: &mut ScalarPlan<T>,
        input: &[f32],
        output: &mut [f32],
        _direction: Direction,
    ) -> Result<(), BackendError> {
        let len = plan.buffer_len();
        expect_len(input, len)?;
        expect_len(output, len)?;
        // bit reversal is an involution, both directions are the same swap
        output.copy_from_slice(input);
        permute_pairs(output, plan.bits);
        Ok(())
    }

    fn inverse(
        &self,
        plan: &mut ScalarPlan<T>,
        spectrum: &[f32],
        output: &mut [f32],
    ) -> Result<(), BackendError> {
        let len = plan.buffer_len();
        expect_len(spectrum, len)?;
        expect_len(output, len)?;
        match plan.mode {
            TransformMode::Complex => load(spectrum, &mut plan.scratch),
            TransformMode::Real => merge(spectrum, &plan.split_twiddles, &mut plan.scratch),
        }
        bit_reverse_permute(&mut plan.scratch, plan.bits);
        dit_inverse(&mut plan.scratch, &plan.twiddles);
        store(&plan.scratch, output);
        Ok(())
    }
}
