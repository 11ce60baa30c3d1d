use core::fmt::Debug;
use core::hash::Hash;

/// Fixed-point precision profile.
///
/// Profiles are zero-sized marker types. Vertices, batch buffers and renderers
/// are generic over one profile, which keeps two scales out of one pipeline.
pub trait Precision: Copy + Debug + Default + Eq + Ord + Hash + Send + Sync + 'static {
    /// Number of fractional bits.
    const FRAC_BITS: u32;

    /// Scale factor, `1 << FRAC_BITS`.
    const SCALE: i32 = 1 << Self::FRAC_BITS;

    /// Display name used in diagnostics.
    const NAME: &'static str;
}

/// 4096x profile (the hardware docs call it Q12.4).
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q12_4;

impl Precision for Q12_4 {
    const FRAC_BITS: u32 = 12;
    const NAME: &'static str = "Q12.4";
}

/// 65536x profile (Q16.16).
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q16_16;

impl Precision for Q16_16 {
    const FRAC_BITS: u32 = 16;
    const NAME: &'static str = "Q16.16";
}

/// Profile used when a type parameter is left at its default.
#[cfg(not(feature = "q16"))]
pub type DefaultPrecision = Q12_4;

/// Profile used when a type parameter is left at its default.
#[cfg(feature = "q16")]
pub type DefaultPrecision = Q16_16;
