use std::collections::HashMap;

use crate::device::Rasterizer;

use super::{
    is_supported_size, PixelSource, TextureDesc, TextureError, TextureId, MAX_PALETTE_ENTRIES,
};

/// Allocation state of the device's texel and palette banks.
///
/// Regions are bump-allocated in upload order. Re-uploading an id whose new
/// data fits its previous region updates it in place, and a larger re-upload
/// of the most recent allocation grows it in place. Otherwise a fresh region
/// is taken and the old one stays unused until [`TextureMemory::clear`].
#[derive(Debug, Default)]
pub struct TextureMemory {
    slots: HashMap<TextureId, TextureDesc>,
    texel_cursor: usize,
    palette_cursor: usize,
}

impl TextureMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureDesc> {
        self.slots.get(&id)
    }

    pub fn texel_bytes_used(&self) -> usize {
        self.texel_cursor
    }

    pub fn palette_bytes_used(&self) -> usize {
        self.palette_cursor
    }

    /// Forgets every allocation. Bank contents are left as they are.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.texel_cursor = 0;
        self.palette_cursor = 0;
    }

    /// Copies `pixels` into the device's banks and declares the texture.
    ///
    /// Validation happens before the first byte is written: on any error the
    /// banks are untouched.
    pub fn upload<R: Rasterizer>(
        &mut self,
        device: &mut R,
        id: TextureId,
        width: u32,
        height: u32,
        pixels: PixelSource<'_>,
    ) -> Result<TextureDesc, TextureError> {
        if !is_supported_size(width) || !is_supported_size(height) {
            return Err(TextureError::UnsupportedSize { width, height });
        }

        let expected = width as usize * height as usize;
        if pixels.texel_count() != expected {
            return Err(TextureError::SourceLength {
                expected,
                actual: pixels.texel_count(),
            });
        }

        let palette = pixels.palette();
        if palette.len() > MAX_PALETTE_ENTRIES {
            return Err(TextureError::PaletteTooLarge {
                entries: palette.len(),
            });
        }

        let format = pixels.format();
        let texel_bytes = expected * format.bytes_per_texel();
        let palette_bytes = palette.len() * 2;

        let prev = self.slots.get(&id);
        let texel = place(
            prev.map(|d| (d.texel_offset, d.texel_bytes())),
            texel_bytes,
            self.texel_cursor,
        );
        let pal = place(
            prev.map(|d| (d.palette_offset, d.palette_bytes())),
            palette_bytes,
            self.palette_cursor,
        );
        let (texel_offset, palette_offset) = (texel.offset, pal.offset);

        let bank_len = device.texture_memory().len();
        if texel_offset + texel_bytes > bank_len {
            return Err(TextureError::BankOverflow {
                id,
                required: texel_bytes,
                available: bank_len.saturating_sub(texel_offset),
            });
        }

        let palette_bank_len = device.palette_memory().len();
        if palette_offset + palette_bytes > palette_bank_len {
            return Err(TextureError::PaletteOverflow {
                id,
                required: palette_bytes,
                available: palette_bank_len.saturating_sub(palette_offset),
            });
        }

        device.texture_memory()[texel_offset..texel_offset + texel_bytes]
            .copy_from_slice(pixels.texel_bytes());
        if palette_bytes > 0 {
            device.palette_memory()[palette_offset..palette_offset + palette_bytes]
                .copy_from_slice(pixels.palette_bytes());
        }

        let desc = TextureDesc {
            width,
            height,
            format,
            texel_offset,
            palette_offset,
            palette_len: palette.len(),
        };

        device.bind_texture(Some(id));
        device.declare_texture(id, &desc)?;

        self.texel_cursor = texel.cursor;
        self.palette_cursor = pal.cursor;
        self.slots.insert(id, desc);

        log::debug!(
            "texture {:?}: {width}x{height} {:?} at +{texel_offset} ({} of {bank_len} bytes used)",
            id,
            format,
            self.texel_cursor
        );

        Ok(desc)
    }
}

/// Where an upload lands in one bank, and the bank's cursor afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    offset: usize,
    cursor: usize,
}

/// Picks a region of `bytes` in a bump-allocated bank.
///
/// `prev` is the id's current region. It is reused when the data fits, and
/// grown in place when it is the last allocation; otherwise the region is
/// taken at `cursor`.
fn place(prev: Option<(usize, usize)>, bytes: usize, cursor: usize) -> Placement {
    match prev {
        Some((offset, len)) if bytes <= len => Placement { offset, cursor },
        Some((offset, len)) if offset + len == cursor => Placement {
            offset,
            cursor: offset + bytes,
        },
        _ => Placement {
            offset: cursor,
            cursor: cursor + bytes,
        },
    }
}
