use crate::coords::{Vec2, Vec3};
use crate::fixed::{DefaultPrecision, Fixed, Precision};
use crate::paint::Color;

/// A textured, colored vertex in the rasterizer's fixed-point format.
///
/// Vertices are plain values. Once appended to a batch they are never edited;
/// fields are read-only outside this module.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vertex<P: Precision = DefaultPrecision> {
    position: [Fixed<P>; 3],
    texcoord: [Fixed<P>; 2],
    color: Color,
}

impl<P: Precision> Vertex<P> {
    pub const ZERO: Self = Self {
        position: [Fixed::ZERO; 3],
        texcoord: [Fixed::ZERO; 2],
        color: Color::BLACK,
    };

    /// Converts float inputs with `floor(value * P::SCALE)` per component.
    #[inline]
    pub fn from_f32(position: Vec3, texcoord: Vec2, color: Color) -> Self {
        Self {
            position: [
                Fixed::from_f32(position.x),
                Fixed::from_f32(position.y),
                Fixed::from_f32(position.z),
            ],
            texcoord: [Fixed::from_f32(texcoord.x), Fixed::from_f32(texcoord.y)],
            color,
        }
    }

    #[inline]
    pub fn position(&self) -> [Fixed<P>; 3] {
        self.position
    }

    #[inline]
    pub fn texcoord(&self) -> [Fixed<P>; 2] {
        self.texcoord
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Q12_4, Q16_16};

    #[test]
    fn from_f32_converts_every_component() {
        let v = Vertex::<Q12_4>::from_f32(
            Vec3::new(1.0, 2.5, -0.25),
            Vec2::new(0.5, 1.0),
            Color::WHITE,
        );
        let p = v.position();
        assert_eq!([p[0].raw(), p[1].raw(), p[2].raw()], [4096, 10240, -1024]);
        let t = v.texcoord();
        assert_eq!([t[0].raw(), t[1].raw()], [2048, 4096]);
        assert_eq!(v.color(), Color::WHITE);
    }

    #[test]
    fn profile_changes_scale() {
        let v = Vertex::<Q16_16>::from_f32(Vec3::new(1.0, 0.0, 0.0), Vec2::zero(), Color::BLACK);
        assert_eq!(v.position()[0].raw(), 65536);
    }
}
