//! Fixed-point numbers for the rasterizer boundary.
//!
//! The handheld GPU has no floating-point input path. Every position and
//! texture coordinate crosses the boundary as a scaled integer:
//!
//! - `fixed = floor(value * SCALE)`
//! - `value ≈ fixed / SCALE`, off by at most `1 / SCALE`
//!
//! Two precision profiles exist (`Q12_4` with a 4096x scale, `Q16_16` with a
//! 65536x scale). The profile is a type parameter, so a single pipeline can
//! never mix them; `DefaultPrecision` is chosen per build by the `q16` feature.

mod precision;
mod scalar;

pub use precision::{DefaultPrecision, Precision, Q12_4, Q16_16};
pub use scalar::{fixed_from_float, fixed_to_float, Fixed};
