/// 8-bit RGB vertex color.
///
/// Invariant: channels are straight (not premultiplied); translucency is a
/// per-polygon hardware attribute, not a vertex attribute.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpacks an engine color packed as `0xRRGGBB`. Bits above 24 are ignored.
    #[inline]
    pub const fn from_rgb24(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    #[inline]
    pub const fn to_rgb24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Packs into the rasterizer's native 15-bit layout:
    /// red in bits 0..5, green in 5..10, blue in 10..15.
    #[inline]
    pub const fn to_rgb15(self) -> u16 {
        let r = (self.r >> 3) as u16;
        let g = (self.g >> 3) as u16;
        let b = (self.b >> 3) as u16;
        r | (g << 5) | (b << 10)
    }

    /// Expands a native 15-bit color. Bit 15 (the texel alpha bit) is ignored.
    #[inline]
    pub const fn from_rgb15(packed: u16) -> Self {
        Self {
            r: expand5((packed & 0x1F) as u8),
            g: expand5(((packed >> 5) & 0x1F) as u8),
            b: expand5(((packed >> 10) & 0x1F) as u8),
        }
    }

    /// Normalized channels with an opaque alpha, for float-based backends.
    #[inline]
    pub fn to_f32_rgba(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// 5-bit → 8-bit with the high bits replicated, so 31 maps to 255.
#[inline]
const fn expand5(c: u8) -> u8 {
    (c << 3) | (c >> 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb24_unpacks_channels() {
        let c = Color::from_rgb24(0x12_34_56);
        assert_eq!(c, Color::rgb(0x12, 0x34, 0x56));
        assert_eq!(c.to_rgb24(), 0x12_34_56);
    }

    #[test]
    fn rgb24_ignores_high_byte() {
        assert_eq!(Color::from_rgb24(0xFF_00_00_01), Color::rgb(0, 0, 1));
    }

    #[test]
    fn rgb15_layout_is_red_low() {
        assert_eq!(Color::rgb(255, 0, 0).to_rgb15(), 0x001F);
        assert_eq!(Color::rgb(0, 255, 0).to_rgb15(), 0x03E0);
        assert_eq!(Color::rgb(0, 0, 255).to_rgb15(), 0x7C00);
    }

    #[test]
    fn rgb15_expands_full_range() {
        assert_eq!(Color::from_rgb15(0x7FFF), Color::WHITE);
        assert_eq!(Color::from_rgb15(0x8000), Color::BLACK);
        assert_eq!(Color::from_rgb15(Color::WHITE.to_rgb15()), Color::WHITE);
    }
}
