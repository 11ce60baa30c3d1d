use glam::Mat4;

use crate::batch::{BatchBuffer, Vertex, MAX_VERTICES};
use crate::coords::{Rect, Vec2, Vec3, Viewport};
use crate::device::{DeviceError, MatrixMode, Primitive, Rasterizer};
use crate::fixed::{DefaultPrecision, Precision};
use crate::paint::Color;
use crate::texture::{
    PixelSource, TextureDesc, TextureError, TextureId, TextureMemory, TextureRegistry,
};

use super::{FrameReport, FrameState, RendererConfig, SubmitMode, SubmitPath};

/// Corner order of a quad expanded to two triangles: TL, TR, BR / TL, BR, BL.
const QUAD_AS_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Batches vertices for one rasterizer and submits them once per frame.
///
/// - `R` is the hardware backend.
/// - `P` is the fixed-point profile every queued value is converted to.
/// - `N` is the batch capacity in vertices.
///
/// Every pipeline operation takes `&mut self`: the batch has exactly one
/// writer (the queue calls) and one reader (`end_frame`), never concurrently.
#[derive(Debug)]
pub struct Renderer<R: Rasterizer, P: Precision = DefaultPrecision, const N: usize = MAX_VERTICES> {
    device: R,
    config: RendererConfig,
    path: SubmitPath,
    batch: BatchBuffer<P, N>,
    textures: TextureMemory,
    state: FrameState,
    initialized: bool,
    frame_index: u64,
    overflow_warned: bool,
}

impl<R: Rasterizer, P: Precision, const N: usize> Renderer<R, P, N> {
    pub fn new(device: R, mut config: RendererConfig) -> Self {
        if !config.viewport.is_valid() {
            log::warn!(
                "renderer: invalid viewport {:?}, using {:?}",
                config.viewport,
                Viewport::HANDHELD
            );
            config.viewport = Viewport::HANDHELD;
        }

        let path = resolve_path(config.submit_mode, device.capabilities().array_draw);

        Self {
            device,
            config,
            path,
            batch: BatchBuffer::new(),
            textures: TextureMemory::new(),
            state: FrameState::Idle,
            initialized: false,
            frame_index: 0,
            overflow_warned: false,
        }
    }

    /// Brings up the device and installs the screen projection.
    ///
    /// Projection becomes an orthographic mapping of `0..width` x `0..height`
    /// (top-left origin) with depth `-1..1`; modelview is left selected and
    /// set to identity. Subsequent calls do nothing.
    pub fn init(&mut self) -> Result<(), DeviceError> {
        if self.initialized {
            return Ok(());
        }

        self.device.init()?;

        let vp = self.config.viewport;
        let ortho = Mat4::orthographic_rh_gl(0.0, vp.width, vp.height, 0.0, -1.0, 1.0);
        self.device.set_matrix_mode(MatrixMode::Projection);
        self.device.load_matrix(&ortho);
        self.device.set_matrix_mode(MatrixMode::ModelView);
        self.device.load_matrix(&Mat4::IDENTITY);

        self.initialized = true;

        log::debug!(
            "renderer: init {}x{} viewport, {} profile, capacity {}, {:?} path, {:?}",
            vp.width,
            vp.height,
            P::NAME,
            N,
            self.path,
            self.config.primitive,
        );

        Ok(())
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    /// Starts recording a frame: empties the batch and clears the screen.
    ///
    /// Calling it while already recording discards what was queued so far.
    pub fn begin_frame(&mut self) {
        self.batch.reset();
        self.device.clear(self.config.clear_color);
        self.state = FrameState::Recording;
    }

    /// Queues one vertex. Returns `false` if the batch is full.
    pub fn queue_vertex(&mut self, position: Vec3, texcoord: Vec2, color: Color) -> bool {
        self.debug_assert_recording();
        self.batch.append(Vertex::from_f32(position, texcoord, color))
    }

    /// Queues a screen-space quad at depth 0.
    pub fn queue_quad(&mut self, rect: Rect, uv: Rect, color: Color) -> bool {
        self.queue_quad_z(rect, 0.0, uv, color)
    }

    /// Queues a quad at depth `z`, corners in top-left, top-right,
    /// bottom-right, bottom-left order.
    ///
    /// The quad is written whole or not at all: four slots in quads mode, six
    /// in triangles mode.
    pub fn queue_quad_z(&mut self, rect: Rect, z: f32, uv: Rect, color: Color) -> bool {
        self.debug_assert_recording();

        let pos = rect.corners();
        let tex = uv.corners();
        let corner = |i: usize| Vertex::from_f32(Vec3::from_xy(pos[i], z), tex[i], color);

        match self.config.primitive {
            Primitive::Quads => self
                .batch
                .append_all(&[corner(0), corner(1), corner(2), corner(3)]),
            Primitive::Triangles => self.batch.append_all(&QUAD_AS_TRIANGLES.map(corner)),
        }
    }

    /// Queues a triangle.
    ///
    /// In quads mode it becomes a degenerate quad whose last corner repeats
    /// the third, which the rasterizer draws as the triangle alone.
    pub fn queue_triangle(
        &mut self,
        positions: [Vec3; 3],
        texcoords: [Vec2; 3],
        color: Color,
    ) -> bool {
        self.debug_assert_recording();

        let v = |i: usize| Vertex::from_f32(positions[i], texcoords[i], color);

        match self.config.primitive {
            Primitive::Triangles => self.batch.append_all(&[v(0), v(1), v(2)]),
            Primitive::Quads => self.batch.append_all(&[v(0), v(1), v(2), v(2)]),
        }
    }

    /// Submits the frame's batch, flushes and waits for vertical blank.
    ///
    /// An empty batch submits nothing and does not wait. The batch is reset
    /// and the renderer returns to `Idle` whether or not the device succeeds.
    pub fn end_frame(&mut self) -> Result<FrameReport, DeviceError> {
        debug_assert_eq!(
            self.state,
            FrameState::Recording,
            "end_frame called outside begin_frame/end_frame"
        );

        self.frame_index += 1;
        let mut report = FrameReport {
            frame_index: self.frame_index,
            submitted: self.batch.count(),
            dropped: self.batch.dropped(),
            path: None,
        };

        if report.dropped > 0 {
            if self.overflow_warned {
                log::debug!(
                    "frame {}: dropped {} vertices (capacity {})",
                    report.frame_index,
                    report.dropped,
                    N
                );
            } else {
                log::warn!(
                    "frame {}: batch full, dropped {} vertices (capacity {}); logging further drops at debug",
                    report.frame_index,
                    report.dropped,
                    N
                );
                self.overflow_warned = true;
            }
        }

        if report.is_empty() {
            self.batch.reset();
            self.state = FrameState::Idle;
            return Ok(report);
        }

        self.state = FrameState::Flushing;
        let result = submit(
            &mut self.device,
            self.path,
            self.config.primitive,
            self.batch.as_slice(),
        );
        self.batch.reset();
        self.state = FrameState::Idle;

        result?;
        report.path = Some(self.path);
        Ok(report)
    }

    /// Alias of [`Renderer::end_frame`].
    #[inline]
    pub fn draw_buffered(&mut self) -> Result<FrameReport, DeviceError> {
        self.end_frame()
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Uploads a texture into the device's texture bank and binds it.
    ///
    /// Rejected while a frame is recording, since the queued batch may still
    /// reference the region being overwritten.
    pub fn upload_texture(
        &mut self,
        id: TextureId,
        width: u32,
        height: u32,
        pixels: PixelSource<'_>,
    ) -> Result<TextureDesc, TextureError> {
        if self.state != FrameState::Idle {
            return Err(TextureError::FrameInProgress);
        }
        self.textures.upload(&mut self.device, id, width, height, pixels)
    }

    /// Uploads `pixels` for `id`, sized from the engine's registry.
    pub fn update_texture<T: TextureRegistry + ?Sized>(
        &mut self,
        registry: &T,
        id: TextureId,
        pixels: PixelSource<'_>,
    ) -> Result<TextureDesc, TextureError> {
        let (Some(width), Some(height)) = (registry.width(id), registry.height(id)) else {
            return Err(TextureError::Unknown(id));
        };
        self.upload_texture(id, width, height, pixels)
    }

    /// Selects the texture for the next submission; `None` draws untextured.
    ///
    /// Binding applies to the whole batch, not to the quads queued after it.
    pub fn bind_texture(&mut self, id: Option<TextureId>) -> Result<(), TextureError> {
        if let Some(id) = id {
            if self.textures.get(id).is_none() {
                return Err(TextureError::Unknown(id));
            }
        }
        self.device.bind_texture(id);
        Ok(())
    }

    /// Forgets every uploaded texture and unbinds, so the banks can be
    /// refilled from the start.
    pub fn clear_textures(&mut self) -> Result<(), TextureError> {
        if self.state != FrameState::Idle {
            return Err(TextureError::FrameInProgress);
        }
        self.textures.clear();
        self.device.bind_texture(None);
        log::debug!("renderer: texture banks cleared");
        Ok(())
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureDesc> {
        self.textures.get(id)
    }

    // ── matrices ──────────────────────────────────────────────────────────

    pub fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.device.set_matrix_mode(mode);
    }

    pub fn load_matrix(&mut self, m: &Mat4) {
        self.device.load_matrix(m);
    }

    pub fn mult_matrix(&mut self, m: &Mat4) {
        self.device.mult_matrix(m);
    }

    pub fn push_matrix(&mut self) -> Result<(), DeviceError> {
        self.device.push_matrix()
    }

    pub fn pop_matrix(&mut self) -> Result<(), DeviceError> {
        self.device.pop_matrix()
    }

    // ── accessors ─────────────────────────────────────────────────────────

    /// Vertices queued in the current frame.
    #[inline]
    pub fn count(&self) -> usize {
        self.batch.count()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn submit_path(&self) -> SubmitPath {
        self.path
    }

    #[inline]
    pub fn device(&self) -> &R {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut R {
        &mut self.device
    }

    #[inline]
    fn debug_assert_recording(&self) {
        debug_assert_eq!(
            self.state,
            FrameState::Recording,
            "geometry queued outside begin_frame/end_frame"
        );
    }
}

fn resolve_path(mode: SubmitMode, array_draw: bool) -> SubmitPath {
    match mode {
        SubmitMode::Immediate => SubmitPath::Immediate,
        SubmitMode::Auto if array_draw => SubmitPath::Array,
        SubmitMode::Auto => SubmitPath::Immediate,
        SubmitMode::Array if array_draw => SubmitPath::Array,
        SubmitMode::Array => {
            log::warn!("renderer: array submission unsupported, using immediate mode");
            SubmitPath::Immediate
        }
    }
}

/// One bulk submission followed by flush and vertical-blank wait.
fn submit<R: Rasterizer, P: Precision>(
    device: &mut R,
    path: SubmitPath,
    primitive: Primitive,
    vertices: &[Vertex<P>],
) -> Result<(), DeviceError> {
    match path {
        SubmitPath::Array => device.draw_arrays(primitive, vertices)?,
        SubmitPath::Immediate => {
            device.begin(primitive);
            for v in vertices {
                let [x, y, z] = v.position();
                let [s, t] = v.texcoord();
                device.color(v.color());
                device.tex_coord(s, t);
                device.vertex(x, y, z);
            }
            device.end()?;
        }
    }

    device.flush()?;
    device.wait_vblank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Capabilities, DeviceCommand, HeadlessRasterizer};
    use crate::fixed::{Q12_4, Q16_16};
    use crate::texture::TextureTable;

    type Small = Renderer<HeadlessRasterizer, Q12_4, 8>;

    fn recording<const N: usize>(config: RendererConfig) -> Renderer<HeadlessRasterizer, Q12_4, N> {
        let mut r = Renderer::new(HeadlessRasterizer::new(), config);
        r.init().unwrap();
        r.begin_frame();
        r.device_mut().take_commands();
        r
    }

    fn quad(x: f32) -> Rect {
        Rect::new(x, 0.0, 8.0, 8.0)
    }

    fn triangles() -> RendererConfig {
        RendererConfig {
            primitive: Primitive::Triangles,
            ..RendererConfig::default()
        }
    }

    fn array_device() -> HeadlessRasterizer {
        HeadlessRasterizer::with_capabilities(Capabilities {
            array_draw: true,
            ..Capabilities::default()
        })
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn three_quads_into_eight_slots() {
        let mut r: Small = recording(RendererConfig::default());

        assert!(r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE));
        assert!(r.queue_quad(quad(8.0), Rect::UNIT, Color::WHITE));
        assert!(!r.queue_quad(quad(16.0), Rect::UNIT, Color::WHITE));
        assert_eq!(r.count(), 8);

        let report = r.end_frame().unwrap();
        assert_eq!(report.submitted, 8);
        assert_eq!(report.dropped, 4);
        assert_eq!(r.device().vertices_submitted(), 8);
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn vertices_up_to_capacity_are_kept() {
        let mut r: Small = recording(RendererConfig::default());
        for i in 0..5 {
            assert!(r.queue_vertex(Vec3::new(i as f32, 0.0, 0.0), Vec2::zero(), Color::WHITE));
        }
        assert_eq!(r.count(), 5);
    }

    #[test]
    fn vertices_past_capacity_are_dropped() {
        let mut r: Small = recording(RendererConfig::default());
        let accepted = (0..11)
            .filter(|_| r.queue_vertex(Vec3::new(1.0, 1.0, 0.0), Vec2::zero(), Color::WHITE))
            .count();
        assert_eq!(accepted, 8);
        assert_eq!(r.count(), 8);
    }

    #[test]
    fn quad_rejected_with_three_slots_left() {
        let mut r: Small = recording(RendererConfig::default());
        for _ in 0..5 {
            r.queue_vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::zero(), Color::WHITE);
        }
        assert!(!r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE));
        assert_eq!(r.count(), 5);
    }

    #[test]
    fn quads_fill_in_multiples_of_four() {
        let mut r = recording::<4096>(RendererConfig::default());
        for i in 0..10 {
            r.queue_quad(quad(i as f32), Rect::UNIT, Color::WHITE);
            assert_eq!(r.count() % 4, 0);
        }
        assert_eq!(r.count(), 40);
    }

    #[test]
    fn invalid_viewport_falls_back_to_handheld() {
        let r: Small = Renderer::new(
            HeadlessRasterizer::new(),
            RendererConfig {
                viewport: Viewport::new(0.0, f32::NAN),
                ..RendererConfig::default()
            },
        );
        assert_eq!(r.config().viewport, Viewport::HANDHELD);
    }

    #[test]
    fn default_capacity_is_max_vertices() {
        let r: Renderer<HeadlessRasterizer> =
            Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        assert_eq!(r.capacity(), MAX_VERTICES);
    }

    #[test]
    fn overflow_is_reported_every_frame() {
        let mut r: Small = recording(RendererConfig::default());
        for _ in 0..3 {
            r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
        }
        assert!(r.end_frame().unwrap().overflowed());

        r.begin_frame();
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
        let report = r.end_frame().unwrap();
        assert!(!report.overflowed());
        assert_eq!(report.frame_index, 2);
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn begin_frame_twice_leaves_batch_empty() {
        let mut r: Small = recording(RendererConfig::default());
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);

        r.begin_frame();
        assert_eq!(r.count(), 0);
        r.begin_frame();
        assert_eq!(r.count(), 0);
        assert_eq!(r.state(), FrameState::Recording);
    }

    #[test]
    fn begin_frame_clears_with_configured_color() {
        let red = Color::rgb(255, 0, 0);
        let mut r: Small = Renderer::new(
            HeadlessRasterizer::new(),
            RendererConfig {
                clear_color: red,
                ..RendererConfig::default()
            },
        );
        r.begin_frame();
        assert_eq!(r.device().commands(), &[DeviceCommand::Clear(red)]);
    }

    #[test]
    fn empty_frame_touches_nothing() {
        let mut r: Small = recording(RendererConfig::default());

        let report = r.end_frame().unwrap();

        assert!(report.is_empty());
        assert_eq!(report.path, None);
        assert!(r.device().commands().is_empty());
        assert_eq!(r.device().vblank_count(), 0);
        assert_eq!(r.state(), FrameState::Idle);
    }

    #[test]
    fn end_frame_returns_to_idle() {
        let mut r: Small = recording(RendererConfig::default());
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
        r.draw_buffered().unwrap();
        assert_eq!(r.state(), FrameState::Idle);
        assert_eq!(r.device().vblank_count(), 1);
    }

    #[test]
    fn device_failure_still_resets_batch() {
        let mut r: Small = recording(RendererConfig::default());
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
        r.device_mut().fail_next_flush(DeviceError::SurfaceLost);

        assert_eq!(r.end_frame(), Err(DeviceError::SurfaceLost));
        assert_eq!(r.count(), 0);
        assert_eq!(r.state(), FrameState::Idle);
        assert_eq!(r.device().vblank_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside begin_frame")]
    fn queue_outside_frame_panics_in_debug() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
    }

    // ── submission ────────────────────────────────────────────────────────

    #[test]
    fn immediate_submission_streams_quad_in_winding_order() {
        let mut r: Small = recording(RendererConfig::default());
        let c = Color::rgb(10, 20, 30);
        r.queue_quad(Rect::new(0.0, 0.0, 2.0, 1.0), Rect::UNIT, c);
        r.end_frame().unwrap();

        let one = 4096;
        let mut expected = vec![DeviceCommand::Begin(Primitive::Quads)];
        for (pos, uv) in [
            ([0, 0, 0], [0, 0]),
            ([2 * one, 0, 0], [one, 0]),
            ([2 * one, one, 0], [one, one]),
            ([0, one, 0], [0, one]),
        ] {
            expected.push(DeviceCommand::Color(c));
            expected.push(DeviceCommand::TexCoord(uv));
            expected.push(DeviceCommand::Vertex(pos));
        }
        expected.extend([DeviceCommand::End, DeviceCommand::Flush, DeviceCommand::WaitVBlank]);

        assert_eq!(r.device().commands(), expected.as_slice());
    }

    #[test]
    fn queue_uses_floor_conversion() {
        let mut r: Small = recording(RendererConfig::default());
        r.queue_vertex(Vec3::new(-0.5, 1.0 / 8192.0, 0.0), Vec2::zero(), Color::WHITE);
        r.end_frame().unwrap();
        assert!(r
            .device()
            .commands()
            .contains(&DeviceCommand::Vertex([-2048, 0, 0])));
    }

    #[test]
    fn q16_profile_scales_by_65536() {
        let mut r: Renderer<HeadlessRasterizer, Q16_16, 8> =
            Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        r.begin_frame();
        r.queue_vertex(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 0.5), Color::WHITE);
        r.end_frame().unwrap();

        let cmds = r.device().commands();
        assert!(cmds.contains(&DeviceCommand::Vertex([65536, 0, 0])));
        assert!(cmds.contains(&DeviceCommand::TexCoord([65536, 32768])));
    }

    #[test]
    fn array_capable_device_gets_one_draw_call() {
        let mut r: Small = Renderer::new(array_device(), RendererConfig::default());
        assert_eq!(r.submit_path(), SubmitPath::Array);

        r.begin_frame();
        r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE);
        r.queue_quad(quad(8.0), Rect::UNIT, Color::WHITE);
        let report = r.end_frame().unwrap();

        assert_eq!(report.path, Some(SubmitPath::Array));
        assert_eq!(
            r.device().commands(),
            &[
                DeviceCommand::Clear(Color::BLACK),
                DeviceCommand::DrawArrays {
                    primitive: Primitive::Quads,
                    count: 8
                },
                DeviceCommand::Flush,
                DeviceCommand::WaitVBlank,
            ]
        );
        assert_eq!(r.device().vertices_submitted(), 8);
    }

    #[test]
    fn immediate_mode_can_be_forced() {
        let r: Small = Renderer::new(
            array_device(),
            RendererConfig {
                submit_mode: SubmitMode::Immediate,
                ..RendererConfig::default()
            },
        );
        assert_eq!(r.submit_path(), SubmitPath::Immediate);
    }

    #[test]
    fn array_mode_falls_back_without_support() {
        let r: Small = Renderer::new(
            HeadlessRasterizer::new(),
            RendererConfig {
                submit_mode: SubmitMode::Array,
                ..RendererConfig::default()
            },
        );
        assert_eq!(r.submit_path(), SubmitPath::Immediate);
    }

    // ── triangles ─────────────────────────────────────────────────────────

    #[test]
    fn triangles_mode_expands_quad_to_six() {
        let mut r: Small = recording(triangles());
        assert!(r.queue_quad(Rect::new(0.0, 0.0, 1.0, 1.0), Rect::UNIT, Color::WHITE));
        assert_eq!(r.count(), 6);
        r.end_frame().unwrap();

        let one = 4096;
        let verts: Vec<[i32; 3]> = r
            .device()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Vertex(p) => Some(*p),
                _ => None,
            })
            .collect();
        let (tl, tr, br, bl) = ([0, 0, 0], [one, 0, 0], [one, one, 0], [0, one, 0]);
        assert_eq!(verts, vec![tl, tr, br, tl, br, bl]);
        assert_eq!(r.device().commands()[0], DeviceCommand::Begin(Primitive::Triangles));
    }

    #[test]
    fn triangles_mode_rejects_quad_without_six_slots() {
        let mut r: Small = recording(triangles());
        assert!(r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE));
        assert!(!r.queue_quad(quad(0.0), Rect::UNIT, Color::WHITE));
        assert_eq!(r.count(), 6);
    }

    #[test]
    fn triangle_in_quads_mode_is_degenerate_quad() {
        let mut r: Small = recording(RendererConfig::default());
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert!(r.queue_triangle(p, [Vec2::zero(); 3], Color::WHITE));
        assert_eq!(r.count(), 4);

        let mut t: Small = recording(triangles());
        assert!(t.queue_triangle(p, [Vec2::zero(); 3], Color::WHITE));
        assert_eq!(t.count(), 3);
    }

    // ── init and matrices ─────────────────────────────────────────────────

    #[test]
    fn init_installs_screen_projection_once() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        r.init().unwrap();
        r.init().unwrap();

        let cmds = r.device().commands();
        assert_eq!(cmds.iter().filter(|c| **c == DeviceCommand::Init).count(), 1);

        let m = r.device().matrices();
        assert_eq!(m.mode(), MatrixMode::ModelView);
        assert_eq!(m.current(MatrixMode::ModelView), Mat4::IDENTITY);

        // Top-left pixel maps to NDC (-1, 1), bottom-right to (1, -1).
        let proj = m.current(MatrixMode::Projection);
        let tl = proj.project_point3(glam::Vec3::new(0.0, 0.0, 0.0));
        let br = proj.project_point3(glam::Vec3::new(256.0, 192.0, 0.0));
        assert!((tl.x + 1.0).abs() < 1e-5 && (tl.y - 1.0).abs() < 1e-5);
        assert!((br.x - 1.0).abs() < 1e-5 && (br.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn matrix_calls_reach_device() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        let t = Mat4::from_translation(glam::Vec3::new(4.0, 2.0, 0.0));
        r.push_matrix().unwrap();
        r.mult_matrix(&t);
        assert_eq!(r.device().matrices().current(MatrixMode::ModelView), t);
        r.pop_matrix().unwrap();
        assert_eq!(
            r.device().matrices().current(MatrixMode::ModelView),
            Mat4::IDENTITY
        );
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn upload_rejected_while_recording() {
        let mut r: Small = recording(RendererConfig::default());
        let texels = [0u16; 64];
        assert_eq!(
            r.upload_texture(TextureId(1), 8, 8, PixelSource::Direct(&texels)),
            Err(TextureError::FrameInProgress)
        );
    }

    #[test]
    fn update_texture_sizes_from_registry() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        let mut registry = TextureTable::new();
        registry.insert(TextureId(2), 16, 8);
        let texels = [0u16; 128];

        let desc = r
            .update_texture(&registry, TextureId(2), PixelSource::Direct(&texels))
            .unwrap();
        assert_eq!((desc.width, desc.height), (16, 8));
        assert_eq!(r.texture(TextureId(2)), Some(&desc));

        assert_eq!(
            r.update_texture(&registry, TextureId(9), PixelSource::Direct(&texels)),
            Err(TextureError::Unknown(TextureId(9)))
        );
    }

    #[test]
    fn bind_requires_uploaded_texture() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        assert_eq!(
            r.bind_texture(Some(TextureId(3))),
            Err(TextureError::Unknown(TextureId(3)))
        );
        assert_eq!(r.bind_texture(None), Ok(()));
    }

    #[test]
    fn growing_one_texture_does_not_exhaust_the_bank() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());

        for (w, h) in [(64, 64), (128, 128), (128, 256), (256, 256)] {
            let texels = vec![0u16; w * h];
            let desc = r
                .upload_texture(TextureId(1), w as u32, h as u32, PixelSource::Direct(&texels))
                .unwrap();
            assert_eq!(desc.texel_offset, 0);
        }
    }

    #[test]
    fn clear_textures_frees_the_banks() {
        let mut r: Small = Renderer::new(HeadlessRasterizer::new(), RendererConfig::default());
        let full = vec![0u16; 256 * 256];
        let small = [0u16; 64];

        r.upload_texture(TextureId(1), 256, 256, PixelSource::Direct(&full))
            .unwrap();
        assert!(matches!(
            r.upload_texture(TextureId(2), 8, 8, PixelSource::Direct(&small)),
            Err(TextureError::BankOverflow { .. })
        ));

        r.clear_textures().unwrap();
        assert_eq!(r.texture(TextureId(1)), None);
        assert_eq!(
            r.bind_texture(Some(TextureId(1))),
            Err(TextureError::Unknown(TextureId(1)))
        );

        let desc = r
            .upload_texture(TextureId(2), 8, 8, PixelSource::Direct(&small))
            .unwrap();
        assert_eq!(desc.texel_offset, 0);
    }

    #[test]
    fn clear_textures_rejected_while_recording() {
        let mut r: Small = recording(RendererConfig::default());
        assert_eq!(r.clear_textures(), Err(TextureError::FrameInProgress));
    }
}
