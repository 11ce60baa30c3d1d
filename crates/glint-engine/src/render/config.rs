use crate::coords::Viewport;
use crate::device::Primitive;
use crate::paint::Color;

/// How a frame's batch is handed to the rasterizer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum SubmitMode {
    /// Array submission when the device supports it, immediate otherwise.
    #[default]
    Auto,
    /// Always per-vertex immediate commands.
    Immediate,
    /// Always one `draw_arrays` call. Falls back to immediate (with a warning)
    /// on devices without array support.
    Array,
}

/// Renderer configuration.
///
/// Defaults describe the handheld: a 256x192 screen, quad lists, automatic
/// submit path selection and a black clear color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Logical screen size used for the init-time orthographic projection.
    pub viewport: Viewport,

    pub submit_mode: SubmitMode,

    /// Primitive every batch is submitted as. Quads expand to four vertices in
    /// `Quads` mode and six in `Triangles` mode.
    pub primitive: Primitive,

    /// Color issued with the hardware clear at `begin_frame`.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::HANDHELD,
            submit_mode: SubmitMode::Auto,
            primitive: Primitive::Quads,
            clear_color: Color::BLACK,
        }
    }
}
