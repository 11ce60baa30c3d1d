use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::device::Primitive;
use crate::paint::Color;
use crate::texture::TextureId;

/// Vertex as uploaded to the preview's vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct PreviewVertex {
    pub clip: [f32; 4],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl PreviewVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x4, // clip
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PreviewVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// A contiguous run of staged vertices drawn with one texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct DrawRun {
    pub texture: Option<TextureId>,
    pub vertices: Range<u32>,
}

/// CPU side of the preview: turns rasterizer commands into a triangle list.
///
/// Every `begin`/`end` pair (or array submission) becomes one [`DrawRun`]
/// with the texture bound when it opened. The clip transform is latched at
/// `open_run`; matrix changes inside a run do not apply until the next one.
#[derive(Debug)]
pub(super) struct Stage {
    transform: Mat4,
    bound: Option<TextureId>,
    color: [f32; 4],
    uv: [f32; 2],
    primitive: Option<Primitive>,
    corners: Vec<PreviewVertex>,
    vertices: Vec<PreviewVertex>,
    runs: Vec<DrawRun>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            bound: None,
            color: Color::WHITE.to_f32_rgba(),
            uv: [0.0; 2],
            primitive: None,
            corners: Vec::with_capacity(4),
            vertices: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Drops the staged frame. Bound texture and current color survive.
    pub fn clear(&mut self) {
        self.primitive = None;
        self.corners.clear();
        self.vertices.clear();
        self.runs.clear();
    }

    pub fn bind(&mut self, texture: Option<TextureId>) {
        self.bound = texture;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color.to_f32_rgba();
    }

    pub fn set_uv(&mut self, u: f32, v: f32) {
        self.uv = [u, v];
    }

    pub fn open_run(&mut self, primitive: Primitive, transform: Mat4) {
        self.primitive = Some(primitive);
        self.transform = transform;
        self.corners.clear();
        let start = self.vertices.len() as u32;
        self.runs.push(DrawRun {
            texture: self.bound,
            vertices: start..start,
        });
    }

    /// Transforms and stages one vertex with the current color and uv.
    ///
    /// Quads are emitted as two triangles, TL, TR, BR and TL, BR, BL, once
    /// their fourth corner arrives.
    pub fn vertex(&mut self, x: f32, y: f32, z: f32) {
        let v = PreviewVertex {
            clip: (self.transform * Vec4::new(x, y, z, 1.0)).to_array(),
            uv: self.uv,
            color: self.color,
        };

        match self.primitive {
            Some(Primitive::Triangles) => self.vertices.push(v),
            Some(Primitive::Quads) => {
                self.corners.push(v);
                if self.corners.len() == 4 {
                    let c = &self.corners;
                    self.vertices
                        .extend_from_slice(&[c[0], c[1], c[2], c[0], c[2], c[3]]);
                    self.corners.clear();
                }
            }
            None => log::trace!("preview: vertex outside begin/end ignored"),
        }
    }

    /// Closes the open run. A partial quad is discarded.
    pub fn close_run(&mut self) {
        self.primitive = None;
        self.corners.clear();
        let end = self.vertices.len() as u32;
        if let Some(run) = self.runs.last_mut() {
            run.vertices.end = end;
        }
    }

    pub fn vertices(&self) -> &[PreviewVertex] {
        &self.vertices
    }

    pub fn runs(&self) -> &[DrawRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(v: &PreviewVertex) -> (f32, f32) {
        (v.clip[0], v.clip[1])
    }

    fn unit_quad(stage: &mut Stage) {
        stage.vertex(0.0, 0.0, 0.0); // TL
        stage.vertex(1.0, 0.0, 0.0); // TR
        stage.vertex(1.0, 1.0, 0.0); // BR
        stage.vertex(0.0, 1.0, 0.0); // BL
    }

    // ── triangulation ─────────────────────────────────────────────────────

    #[test]
    fn quad_becomes_two_triangles() {
        let mut stage = Stage::new();
        stage.open_run(Primitive::Quads, Mat4::IDENTITY);
        unit_quad(&mut stage);
        stage.close_run();

        let got: Vec<_> = stage.vertices().iter().map(xy).collect();
        assert_eq!(
            got,
            [
                (0.0, 0.0),
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
            ]
        );
    }

    #[test]
    fn partial_quad_is_dropped_at_close() {
        let mut stage = Stage::new();
        stage.open_run(Primitive::Quads, Mat4::IDENTITY);
        unit_quad(&mut stage);
        stage.vertex(5.0, 5.0, 0.0);
        stage.vertex(6.0, 5.0, 0.0);
        stage.close_run();

        assert_eq!(stage.vertices().len(), 6);
        assert_eq!(stage.runs()[0].vertices, 0..6);
    }

    #[test]
    fn triangles_pass_through() {
        let mut stage = Stage::new();
        stage.open_run(Primitive::Triangles, Mat4::IDENTITY);
        stage.vertex(0.0, 0.0, 0.0);
        stage.vertex(1.0, 0.0, 0.0);
        stage.vertex(0.0, 1.0, 0.0);
        stage.close_run();

        assert_eq!(stage.vertices().len(), 3);
    }

    #[test]
    fn vertex_outside_run_is_ignored() {
        let mut stage = Stage::new();
        stage.vertex(1.0, 1.0, 0.0);
        assert!(stage.is_empty());
        assert!(stage.runs().is_empty());
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn transform_is_latched_when_run_opens() {
        let mut stage = Stage::new();
        let shift = Mat4::from_translation(glam::Vec3::new(10.0, 20.0, 0.0));
        stage.open_run(Primitive::Triangles, shift);
        stage.vertex(1.0, 2.0, 0.5);
        stage.close_run();

        assert_eq!(stage.vertices()[0].clip, [11.0, 22.0, 0.5, 1.0]);
    }

    #[test]
    fn color_and_uv_apply_to_following_vertices() {
        let mut stage = Stage::new();
        stage.open_run(Primitive::Triangles, Mat4::IDENTITY);
        stage.vertex(0.0, 0.0, 0.0);
        stage.set_color(Color::BLACK);
        stage.set_uv(0.5, 0.25);
        stage.vertex(1.0, 0.0, 0.0);
        stage.close_run();

        let v = stage.vertices();
        assert_eq!(v[0].color, Color::WHITE.to_f32_rgba());
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[1].color, Color::BLACK.to_f32_rgba());
        assert_eq!(v[1].uv, [0.5, 0.25]);
    }

    // ── runs ──────────────────────────────────────────────────────────────

    #[test]
    fn each_run_records_texture_bound_at_open() {
        let mut stage = Stage::new();

        stage.bind(Some(TextureId(1)));
        stage.open_run(Primitive::Quads, Mat4::IDENTITY);
        unit_quad(&mut stage);
        stage.bind(Some(TextureId(2)));
        stage.close_run();

        stage.open_run(Primitive::Triangles, Mat4::IDENTITY);
        stage.vertex(0.0, 0.0, 0.0);
        stage.vertex(1.0, 0.0, 0.0);
        stage.vertex(0.0, 1.0, 0.0);
        stage.close_run();

        assert_eq!(
            stage.runs(),
            &[
                DrawRun {
                    texture: Some(TextureId(1)),
                    vertices: 0..6,
                },
                DrawRun {
                    texture: Some(TextureId(2)),
                    vertices: 6..9,
                },
            ]
        );
    }

    #[test]
    fn clear_drops_runs_but_keeps_binding() {
        let mut stage = Stage::new();
        stage.bind(Some(TextureId(3)));
        stage.open_run(Primitive::Quads, Mat4::IDENTITY);
        unit_quad(&mut stage);
        stage.close_run();

        stage.clear();
        assert!(stage.is_empty());
        assert!(stage.runs().is_empty());

        stage.open_run(Primitive::Quads, Mat4::IDENTITY);
        stage.close_run();
        assert_eq!(stage.runs()[0].texture, Some(TextureId(3)));
        assert!(stage.runs()[0].vertices.is_empty());
    }
}
