use crate::paint::Color;

pub const MIN_TEXTURE_SIZE: u32 = 8;
pub const MAX_TEXTURE_SIZE: u32 = 1024;
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// Texel encodings understood by the rasterizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    /// 16-bit direct color: native 15-bit RGB plus an opacity bit (bit 15).
    Direct,
    /// 8-bit index into a palette of 16-bit direct colors.
    Indexed8,
}

impl TexelFormat {
    #[inline]
    pub const fn bytes_per_texel(self) -> usize {
        match self {
            TexelFormat::Direct => 2,
            TexelFormat::Indexed8 => 1,
        }
    }
}

/// Where a texture lives in the banks and how to read it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    /// Byte offset into the texel bank.
    pub texel_offset: usize,
    /// Byte offset into the palette bank (unused for `Direct`).
    pub palette_offset: usize,
    /// Palette entries (0 for `Direct`).
    pub palette_len: usize,
}

impl TextureDesc {
    #[inline]
    pub fn texel_bytes(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_texel()
    }

    #[inline]
    pub fn palette_bytes(&self) -> usize {
        self.palette_len * 2
    }
}

/// CPU-side texel data handed to an upload.
///
/// 16-bit values are copied in native byte order, which matches the
/// little-endian handheld and every desktop the preview runs on.
#[derive(Debug, Copy, Clone)]
pub enum PixelSource<'a> {
    Direct(&'a [u16]),
    Indexed { texels: &'a [u8], palette: &'a [u16] },
}

impl<'a> PixelSource<'a> {
    #[inline]
    pub fn format(&self) -> TexelFormat {
        match self {
            PixelSource::Direct(_) => TexelFormat::Direct,
            PixelSource::Indexed { .. } => TexelFormat::Indexed8,
        }
    }

    #[inline]
    pub fn texel_count(&self) -> usize {
        match self {
            PixelSource::Direct(t) => t.len(),
            PixelSource::Indexed { texels, .. } => texels.len(),
        }
    }

    #[inline]
    pub fn palette(&self) -> &'a [u16] {
        match *self {
            PixelSource::Direct(_) => &[],
            PixelSource::Indexed { palette, .. } => palette,
        }
    }

    #[inline]
    pub(crate) fn texel_bytes(&self) -> &'a [u8] {
        match *self {
            PixelSource::Direct(t) => bytemuck::cast_slice(t),
            PixelSource::Indexed { texels, .. } => texels,
        }
    }

    #[inline]
    pub(crate) fn palette_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.palette())
    }
}

/// Power of two within `MIN_TEXTURE_SIZE..=MAX_TEXTURE_SIZE`.
#[inline]
pub fn is_supported_size(n: u32) -> bool {
    n.is_power_of_two() && (MIN_TEXTURE_SIZE..=MAX_TEXTURE_SIZE).contains(&n)
}

/// Encodes one direct-color texel. Transparent texels are skipped by the
/// rasterizer's alpha test.
#[inline]
pub const fn direct_texel(color: Color, opaque: bool) -> u16 {
    color.to_rgb15() | if opaque { 0x8000 } else { 0 }
}
