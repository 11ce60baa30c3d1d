use core::fmt;
use core::marker::PhantomData;

use super::Precision;

/// Converts `value` to a raw fixed-point integer: `floor(value * P::SCALE)`.
///
/// The product is formed in `f64`, where scaling an `f32` by a power of two is
/// exact. Values outside the `i32` range saturate; NaN maps to 0.
#[inline]
pub fn fixed_from_float<P: Precision>(value: f32) -> i32 {
    (f64::from(value) * f64::from(P::SCALE)).floor() as i32
}

/// Converts a raw fixed-point integer back to `f32`.
#[inline]
pub fn fixed_to_float<P: Precision>(raw: i32) -> f32 {
    (f64::from(raw) / f64::from(P::SCALE)) as f32
}

/// A fixed-point scalar tagged with its precision profile.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed<P: Precision> {
    raw: i32,
    _profile: PhantomData<P>,
}

impl<P: Precision> Fixed<P> {
    pub const ZERO: Self = Self::from_raw(0);
    pub const ONE: Self = Self::from_raw(P::SCALE);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self {
            raw,
            _profile: PhantomData,
        }
    }

    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self::from_raw(fixed_from_float::<P>(value))
    }

    /// Raw scaled integer, as written to the hardware.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.raw
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        fixed_to_float::<P>(self.raw)
    }
}

impl<P: Precision> From<f32> for Fixed<P> {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl<P: Precision> fmt::Debug for Fixed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} ≈ {})", P::NAME, self.raw, self.to_f32())
    }
}
