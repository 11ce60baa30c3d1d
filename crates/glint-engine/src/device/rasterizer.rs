use glam::Mat4;

use crate::batch::Vertex;
use crate::fixed::{Fixed, Precision};
use crate::paint::Color;
use crate::texture::{TextureDesc, TextureId};

use super::{DeviceError, MatrixMode};

/// Primitive type of a bulk submission.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    #[default]
    Quads,
}

/// Static description of what a backend can do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Accepts a whole vertex array in one call (`draw_arrays`).
    ///
    /// Devices without it are fed through the immediate-mode path.
    pub array_draw: bool,

    /// Size of the texel bank in bytes.
    pub texture_bank_bytes: usize,

    /// Size of the palette bank in bytes.
    pub palette_bank_bytes: usize,

    /// Maximum number of `push_matrix` levels per matrix mode.
    pub projection_stack_depth: usize,
    pub modelview_stack_depth: usize,
}

impl Default for Capabilities {
    /// The handheld's fixed-function unit: one 128 KiB texture bank, a 16 KiB
    /// palette bank, immediate-mode submission only.
    fn default() -> Self {
        Self {
            array_draw: false,
            texture_bank_bytes: 128 * 1024,
            palette_bank_bytes: 16 * 1024,
            projection_stack_depth: 1,
            modelview_stack_depth: 31,
        }
    }
}

/// The fixed-function rasterizer, as seen by the frame submitter.
///
/// Vertex data crosses this boundary in fixed point only. A backend sees
/// exactly one precision profile per renderer, fixed by the renderer's type.
///
/// Per-vertex immediate calls are infallible, matching the command FIFO of the
/// real device; errors surface from `end`, `draw_arrays`, `flush` and
/// `wait_vblank`.
pub trait Rasterizer {
    fn capabilities(&self) -> Capabilities;

    /// One-time hardware bring-up (video mode, banks, texturing enabled).
    fn init(&mut self) -> Result<(), DeviceError>;

    /// Clears color and depth for the next frame.
    fn clear(&mut self, color: Color);

    // ── transform stack ───────────────────────────────────────────────────

    fn set_matrix_mode(&mut self, mode: MatrixMode);
    fn load_matrix(&mut self, m: &Mat4);
    fn mult_matrix(&mut self, m: &Mat4);
    fn push_matrix(&mut self) -> Result<(), DeviceError>;
    fn pop_matrix(&mut self) -> Result<(), DeviceError>;

    // ── immediate-mode submission ─────────────────────────────────────────

    fn begin(&mut self, primitive: Primitive);
    fn color(&mut self, color: Color);
    fn tex_coord<P: Precision>(&mut self, u: Fixed<P>, v: Fixed<P>);
    fn vertex<P: Precision>(&mut self, x: Fixed<P>, y: Fixed<P>, z: Fixed<P>);
    fn end(&mut self) -> Result<(), DeviceError>;

    // ── array submission ──────────────────────────────────────────────────

    /// Submits `vertices` as one primitive list.
    ///
    /// Only called when `capabilities().array_draw` is set.
    fn draw_arrays<P: Precision>(
        &mut self,
        primitive: Primitive,
        vertices: &[Vertex<P>],
    ) -> Result<(), DeviceError> {
        let _ = (primitive, vertices);
        Err(DeviceError::Unsupported("array draw"))
    }

    /// Kicks the command queue so the geometry is rendered this frame.
    fn flush(&mut self) -> Result<(), DeviceError>;

    /// Blocks until the display's vertical blank.
    fn wait_vblank(&mut self) -> Result<(), DeviceError>;

    // ── texture memory ────────────────────────────────────────────────────

    /// The texel bank, `capabilities().texture_bank_bytes` long.
    fn texture_memory(&mut self) -> &mut [u8];

    /// The palette bank, `capabilities().palette_bank_bytes` long.
    fn palette_memory(&mut self) -> &mut [u8];

    /// Tags a region of the texel bank with size and format under `id`.
    fn declare_texture(&mut self, id: TextureId, desc: &TextureDesc) -> Result<(), DeviceError>;

    /// Selects the texture used by subsequent submissions; `None` disables texturing.
    fn bind_texture(&mut self, id: Option<TextureId>);
}
