use glam::Mat4;

use crate::batch::Vertex;
use crate::fixed::{Fixed, Precision};
use crate::paint::Color;
use crate::texture::{TextureDesc, TextureId};

use super::{Capabilities, DeviceError, MatrixMode, MatrixStack, Primitive, Rasterizer};

/// One hardware command as seen by [`HeadlessRasterizer`].
///
/// Fixed-point values are recorded raw, exactly as they would be written to
/// the device's command FIFO.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Init,
    Clear(Color),
    SetMatrixMode(MatrixMode),
    LoadMatrix(Mat4),
    MultMatrix(Mat4),
    PushMatrix,
    PopMatrix,
    Begin(Primitive),
    Color(Color),
    TexCoord([i32; 2]),
    Vertex([i32; 3]),
    End,
    DrawArrays { primitive: Primitive, count: usize },
    Flush,
    WaitVBlank,
    DeclareTexture(TextureId, TextureDesc),
    BindTexture(Option<TextureId>),
}

/// A rasterizer with no display.
///
/// Records every command, owns real texel/palette banks sized from its
/// [`Capabilities`], and counts vertical blanks instead of waiting for them.
/// Serves as the hardware double in tests and as a dry-run target for tools.
#[derive(Debug)]
pub struct HeadlessRasterizer {
    caps: Capabilities,
    commands: Vec<DeviceCommand>,
    matrices: MatrixStack,
    texture_bank: Vec<u8>,
    palette_bank: Vec<u8>,
    pending_vertices: usize,
    submitted_vertices: u64,
    vblanks: u64,
    fail_next_flush: Option<DeviceError>,
}

impl HeadlessRasterizer {
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::default())
    }

    pub fn with_capabilities(caps: Capabilities) -> Self {
        Self {
            caps,
            commands: Vec::new(),
            matrices: MatrixStack::from_capabilities(&caps),
            texture_bank: vec![0; caps.texture_bank_bytes],
            palette_bank: vec![0; caps.palette_bank_bytes],
            pending_vertices: 0,
            submitted_vertices: 0,
            vblanks: 0,
            fail_next_flush: None,
        }
    }

    /// Commands recorded since construction or the last `take_commands`.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Total vertices that reached a `flush`.
    pub fn vertices_submitted(&self) -> u64 {
        self.submitted_vertices
    }

    pub fn vblank_count(&self) -> u64 {
        self.vblanks
    }

    pub fn matrices(&self) -> &MatrixStack {
        &self.matrices
    }

    /// Makes the next `flush` fail with `err`, to exercise error paths.
    pub fn fail_next_flush(&mut self, err: DeviceError) {
        self.fail_next_flush = Some(err);
    }
}

impl Default for HeadlessRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for HeadlessRasterizer {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn init(&mut self) -> Result<(), DeviceError> {
        self.commands.push(DeviceCommand::Init);
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DeviceCommand::Clear(color));
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.matrices.set_mode(mode);
        self.commands.push(DeviceCommand::SetMatrixMode(mode));
    }

    fn load_matrix(&mut self, m: &Mat4) {
        self.matrices.load(m);
        self.commands.push(DeviceCommand::LoadMatrix(*m));
    }

    fn mult_matrix(&mut self, m: &Mat4) {
        self.matrices.mult(m);
        self.commands.push(DeviceCommand::MultMatrix(*m));
    }

    fn push_matrix(&mut self) -> Result<(), DeviceError> {
        self.matrices.push()?;
        self.commands.push(DeviceCommand::PushMatrix);
        Ok(())
    }

    fn pop_matrix(&mut self) -> Result<(), DeviceError> {
        self.matrices.pop()?;
        self.commands.push(DeviceCommand::PopMatrix);
        Ok(())
    }

    fn begin(&mut self, primitive: Primitive) {
        self.commands.push(DeviceCommand::Begin(primitive));
    }

    fn color(&mut self, color: Color) {
        self.commands.push(DeviceCommand::Color(color));
    }

    fn tex_coord<P: Precision>(&mut self, u: Fixed<P>, v: Fixed<P>) {
        self.commands.push(DeviceCommand::TexCoord([u.raw(), v.raw()]));
    }

    fn vertex<P: Precision>(&mut self, x: Fixed<P>, y: Fixed<P>, z: Fixed<P>) {
        self.pending_vertices += 1;
        self.commands
            .push(DeviceCommand::Vertex([x.raw(), y.raw(), z.raw()]));
    }

    fn end(&mut self) -> Result<(), DeviceError> {
        self.commands.push(DeviceCommand::End);
        Ok(())
    }

    fn draw_arrays<P: Precision>(
        &mut self,
        primitive: Primitive,
        vertices: &[Vertex<P>],
    ) -> Result<(), DeviceError> {
        if !self.caps.array_draw {
            return Err(DeviceError::Unsupported("array draw"));
        }
        self.pending_vertices += vertices.len();
        self.commands.push(DeviceCommand::DrawArrays {
            primitive,
            count: vertices.len(),
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        if let Some(err) = self.fail_next_flush.take() {
            self.pending_vertices = 0;
            return Err(err);
        }
        self.submitted_vertices += self.pending_vertices as u64;
        self.pending_vertices = 0;
        self.commands.push(DeviceCommand::Flush);
        Ok(())
    }

    fn wait_vblank(&mut self) -> Result<(), DeviceError> {
        self.vblanks += 1;
        self.commands.push(DeviceCommand::WaitVBlank);
        Ok(())
    }

    fn texture_memory(&mut self) -> &mut [u8] {
        &mut self.texture_bank
    }

    fn palette_memory(&mut self) -> &mut [u8] {
        &mut self.palette_bank
    }

    fn declare_texture(&mut self, id: TextureId, desc: &TextureDesc) -> Result<(), DeviceError> {
        self.commands.push(DeviceCommand::DeclareTexture(id, *desc));
        Ok(())
    }

    fn bind_texture(&mut self, id: Option<TextureId>) {
        self.commands.push(DeviceCommand::BindTexture(id));
    }
}
