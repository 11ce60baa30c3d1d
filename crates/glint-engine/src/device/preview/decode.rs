use crate::paint::Color;
use crate::texture::{TexelFormat, TextureDesc};

/// Expands a texture region of the emulated banks into RGBA8.
///
/// Direct texels are opaque only with bit 15 set; palette entries are always
/// opaque. Out-of-range indices and truncated regions decode as transparent.
pub(crate) fn decode_rgba8(desc: &TextureDesc, texels: &[u8], palette: &[u8]) -> Vec<u8> {
    let count = desc.width as usize * desc.height as usize;
    let mut out = vec![0u8; count * 4];

    let region = texels
        .get(desc.texel_offset..desc.texel_offset + desc.texel_bytes())
        .unwrap_or(&[]);

    match desc.format {
        TexelFormat::Direct => {
            for (px, raw) in out.chunks_exact_mut(4).zip(region.chunks_exact(2)) {
                let texel = u16::from_ne_bytes([raw[0], raw[1]]);
                write_px(px, texel, texel & 0x8000 != 0);
            }
        }
        TexelFormat::Indexed8 => {
            let pal = palette
                .get(desc.palette_offset..desc.palette_offset + desc.palette_bytes())
                .unwrap_or(&[]);
            for (px, &index) in out.chunks_exact_mut(4).zip(region) {
                let at = index as usize * 2;
                if let Some(raw) = pal.get(at..at + 2) {
                    write_px(px, u16::from_ne_bytes([raw[0], raw[1]]), true);
                }
            }
        }
    }

    out
}

#[inline]
fn write_px(px: &mut [u8], texel: u16, opaque: bool) {
    let c = Color::from_rgb15(texel);
    px.copy_from_slice(&[c.r, c.g, c.b, if opaque { 255 } else { 0 }]);
}

/// Largest rectangle of `screen`'s aspect ratio centered in `surface`,
/// as `(x, y, width, height)` in physical pixels.
pub(crate) fn letterbox(surface: (u32, u32), screen: (f32, f32)) -> (f32, f32, f32, f32) {
    let (sw, sh) = (surface.0 as f32, surface.1 as f32);
    if sw <= 0.0 || sh <= 0.0 || screen.0 <= 0.0 || screen.1 <= 0.0 {
        return (0.0, 0.0, sw.max(1.0), sh.max(1.0));
    }

    let scale = (sw / screen.0).min(sh / screen.1);
    let (w, h) = (screen.0 * scale, screen.1 * scale);
    ((sw - w) * 0.5, (sh - h) * 0.5, w, h)
}
