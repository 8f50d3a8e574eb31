//! Minimal numeric types used by the reference backend.
//!
//! Backends exchange `f32` buffers with the harness, but the scalar backend
//! can run its butterflies in either `f32` or `f64`. [`Float`] abstracts over
//! that choice and [`Complex`] is the element type of its scratch storage.

// Minimal float trait for the generic reference backend
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Neg<Output = Self>
    + 'static
{
    /// Short name used in backend diagnostics.
    const NAME: &'static str;

    fn zero() -> Self;
    fn from_f32(x: f32) -> Self;
    fn from_f64(x: f64) -> Self;
    fn to_f32(self) -> f32;
}

impl Float for f32 {
    const NAME: &'static str = "single";

    fn zero() -> Self {
        0.0
    }
    fn from_f32(x: f32) -> Self {
        x
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn to_f32(self) -> f32 {
        self
    }
}

impl Float for f64 {
    const NAME: &'static str = "double";

    fn zero() -> Self {
        0.0
    }
    fn from_f32(x: f32) -> Self {
        x as f64
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn to_f32(self) -> f32 {
        self as f32
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    /// `exp(i * theta)` evaluated in `f64` and rounded once into `T`.
    #[inline]
    pub fn expi(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self {
            re: T::from_f64(cos),
            im: T::from_f64(sin),
        }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    /// Multiply by `-i`.
    #[inline(always)]
    pub fn mul_neg_i(self) -> Self {
        Self {
            re: self.im,
            im: -self.re,
        }
    }
    /// Multiply by `i`.
    #[inline(always)]
    pub fn mul_i(self) -> Self {
        Self {
            re: -self.im,
            im: self.re,
        }
    }
    #[inline(always)]
    pub fn scale(self, k: T) -> Self {
        Self {
            re: self.re * k,
            im: self.im * k,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complex_mul_matches_definition() {
        let a = Complex64::new(1.5, -2.0);
        let b = Complex64::new(-0.5, 3.0);
        let c = a * b;
        assert_eq!(c.re, 1.5 * -0.5 - (-2.0 * 3.0));
        assert_eq!(c.im, 1.5 * 3.0 + (-2.0 * -0.5));
    }

    #[test]
    fn quarter_turns() {
        let z = Complex32::new(2.0, 3.0);
        assert_eq!(z.mul_i(), Complex32::new(-3.0, 2.0));
        assert_eq!(z.mul_neg_i(), Complex32::new(3.0, -2.0));
        assert_eq!(z.mul_i().mul_neg_i(), z);
    }

    #[test]
    fn expi_is_unit() {
        let w = Complex64::expi(0.3);
        assert!((w.re * w.re + w.im * w.im - 1.0).abs() < 1e-15);
        assert_eq!(w.conj().im, -w.im);
    }

    #[test]
    fn precision_round_trip() {
        assert_eq!(<f64 as Float>::from_f32(0.1f32).to_f32(), 0.1f32);
        assert_eq!(<f32 as Float>::from_f64(0.25), 0.25f32);
        assert_eq!(f32::NAME, "single");
        assert_eq!(f64::NAME, "double");
    }
}
