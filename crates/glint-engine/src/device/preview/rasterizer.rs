use std::collections::HashMap;

use anyhow::Result;
use glam::Mat4;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::batch::Vertex;
use crate::coords::Viewport;
use crate::device::{Capabilities, DeviceError, MatrixMode, MatrixStack, Primitive, Rasterizer};
use crate::fixed::{Fixed, Precision};
use crate::paint::Color;
use crate::texture::{TextureDesc, TextureId};
use crate::time::{VBlankConfig, VBlankPacer};

use super::decode::{decode_rgba8, letterbox};
use super::stage::{PreviewVertex, Stage};
use super::{Gpu, GpuInit, SurfaceErrorAction};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Preview backend configuration.
#[derive(Debug, Clone)]
pub struct PreviewInit {
    pub gpu: GpuInit,
    pub vblank: VBlankConfig,

    /// Emulated screen; the window shows it letterboxed at this aspect ratio.
    pub screen: Viewport,

    /// Reported to the renderer. Desktop GPUs take whole arrays, so array
    /// submission is on unless immediate mode is being exercised.
    pub capabilities: Capabilities,
}

impl Default for PreviewInit {
    fn default() -> Self {
        Self {
            gpu: GpuInit::default(),
            vblank: VBlankConfig::default(),
            screen: Viewport::HANDHELD,
            capabilities: Capabilities {
                array_draw: true,
                ..Capabilities::default()
            },
        }
    }
}

struct GpuTexture {
    size: (u32, u32),
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Rasterizer emulation on a desktop GPU.
///
/// Fixed-point vertices are turned back into floats, transformed by the
/// emulated matrix stack and staged as triangles; `flush` draws the frame in
/// one render pass and `wait_vblank` presents it on the emulated blank.
/// Textures are decoded out of the emulated banks when declared.
pub struct PreviewRasterizer<'w> {
    window: &'w Window,
    gpu: Gpu<'w>,
    caps: Capabilities,
    screen: Viewport,

    matrices: MatrixStack,
    texture_bank: Vec<u8>,
    palette_bank: Vec<u8>,

    clear_color: Color,
    stage: Stage,
    presentable: Option<wgpu::SurfaceTexture>,
    pacer: VBlankPacer,

    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    depth: Option<(PhysicalSize<u32>, wgpu::TextureView)>,
}

impl<'w> PreviewRasterizer<'w> {
    /// Brings up wgpu for `window`.
    pub fn new(window: &'w Window, init: PreviewInit) -> Result<Self> {
        let PreviewInit {
            gpu,
            vblank,
            screen,
            capabilities: caps,
        } = init;

        let gpu = pollster::block_on(Gpu::new(window, gpu))?;
        let device = gpu.device();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glint batch bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glint texel sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let pipeline = create_pipeline(device, gpu.surface_format(), &bind_group_layout);
        let white = create_texture(&gpu, &bind_group_layout, &sampler, (1, 1), &[255; 4]);

        Ok(Self {
            window,
            caps,
            screen,
            matrices: MatrixStack::from_capabilities(&caps),
            texture_bank: vec![0; caps.texture_bank_bytes],
            palette_bank: vec![0; caps.palette_bank_bytes],
            clear_color: Color::BLACK,
            stage: Stage::new(),
            presentable: None,
            pacer: VBlankPacer::new(vblank),
            pipeline,
            bind_group_layout,
            sampler,
            white,
            textures: HashMap::new(),
            vbo: None,
            vbo_capacity: 0,
            depth: None,
            gpu,
        })
    }

    /// Reconfigures the surface after the window was resized.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
        self.depth = None;
    }

    /// Re-anchors vblank pacing, e.g. after the window was hidden, so the
    /// pause is not reported as missed blanks.
    pub fn resume_pacing(&mut self) {
        self.pacer.reset();
    }

    // ── gpu ───────────────────────────────────────────────────────────────

    fn ensure_vertex_capacity(&mut self, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let cap = required.next_power_of_two().max(1024);
        self.vbo = Some(self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("glint batch vbo"),
            size: (cap * std::mem::size_of::<PreviewVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = cap;
    }

    fn ensure_depth(&mut self) {
        let size = self.gpu.size();
        if matches!(&self.depth, Some((s, _)) if *s == size) {
            return;
        }

        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("glint depth"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some((size, view));
    }

    fn render(&mut self) -> Result<(), DeviceError> {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(DeviceError::OutOfMemory),
                    action => {
                        log::debug!("preview: frame skipped ({action:?})");
                        Ok(())
                    }
                };
            }
        };

        self.ensure_depth();
        if !self.stage.is_empty() {
            self.ensure_vertex_capacity(self.stage.vertices().len());
            if let Some(vbo) = self.vbo.as_ref() {
                self.gpu
                    .queue()
                    .write_buffer(vbo, 0, bytemuck::cast_slice(self.stage.vertices()));
            }
        }

        let size = self.gpu.size();
        let (vx, vy, vw, vh) = letterbox(
            (size.width, size.height),
            (self.screen.width, self.screen.height),
        );
        let [r, g, b, _] = self.clear_color.to_f32_rgba();

        {
            let Some((_, depth_view)) = self.depth.as_ref() else {
                return Ok(());
            };

            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glint batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vbo) = self.vbo.as_ref().filter(|_| !self.stage.is_empty()) {
                rpass.set_viewport(vx, vy, vw, vh, 0.0, 1.0);
                rpass.set_pipeline(&self.pipeline);
                rpass.set_vertex_buffer(0, vbo.slice(..));

                for run in self.stage.runs().iter().filter(|r| !r.vertices.is_empty()) {
                    let tex = run
                        .texture
                        .and_then(|id| self.textures.get(&id))
                        .unwrap_or(&self.white);
                    rpass.set_bind_group(0, &tex.bind_group, &[]);
                    rpass.draw(run.vertices.clone(), 0..1);
                }
            }
        }

        self.window.pre_present_notify();
        self.presentable = Some(self.gpu.submit(frame));
        Ok(())
    }
}

impl Rasterizer for PreviewRasterizer<'_> {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn init(&mut self) -> Result<(), DeviceError> {
        log::debug!(
            "preview: {}x{} screen, {} KiB texture bank",
            self.screen.width,
            self.screen.height,
            self.caps.texture_bank_bytes / 1024
        );
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.stage.clear();
    }

    fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.matrices.set_mode(mode);
    }

    fn load_matrix(&mut self, m: &Mat4) {
        self.matrices.load(m);
    }

    fn mult_matrix(&mut self, m: &Mat4) {
        self.matrices.mult(m);
    }

    fn push_matrix(&mut self) -> Result<(), DeviceError> {
        self.matrices.push()
    }

    fn pop_matrix(&mut self) -> Result<(), DeviceError> {
        self.matrices.pop()
    }

    fn begin(&mut self, primitive: Primitive) {
        self.stage.open_run(primitive, self.matrices.combined());
    }

    fn color(&mut self, color: Color) {
        self.stage.set_color(color);
    }

    fn tex_coord<P: Precision>(&mut self, u: Fixed<P>, v: Fixed<P>) {
        self.stage.set_uv(u.to_f32(), v.to_f32());
    }

    fn vertex<P: Precision>(&mut self, x: Fixed<P>, y: Fixed<P>, z: Fixed<P>) {
        self.stage.vertex(x.to_f32(), y.to_f32(), z.to_f32());
    }

    fn end(&mut self) -> Result<(), DeviceError> {
        self.stage.close_run();
        Ok(())
    }

    fn draw_arrays<P: Precision>(
        &mut self,
        primitive: Primitive,
        vertices: &[Vertex<P>],
    ) -> Result<(), DeviceError> {
        self.stage.open_run(primitive, self.matrices.combined());
        for v in vertices {
            let [x, y, z] = v.position();
            let [s, t] = v.texcoord();
            self.stage.set_color(v.color());
            self.stage.set_uv(s.to_f32(), t.to_f32());
            self.stage.vertex(x.to_f32(), y.to_f32(), z.to_f32());
        }
        self.stage.close_run();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        let result = self.render();
        self.stage.clear();
        result
    }

    fn wait_vblank(&mut self) -> Result<(), DeviceError> {
        self.pacer.wait();
        if let Some(frame) = self.presentable.take() {
            frame.present();
        }
        Ok(())
    }

    fn texture_memory(&mut self) -> &mut [u8] {
        &mut self.texture_bank
    }

    fn palette_memory(&mut self) -> &mut [u8] {
        &mut self.palette_bank
    }

    fn declare_texture(&mut self, id: TextureId, desc: &TextureDesc) -> Result<(), DeviceError> {
        let rgba = decode_rgba8(desc, &self.texture_bank, &self.palette_bank);
        let size = (desc.width, desc.height);

        match self.textures.get(&id) {
            Some(existing) if existing.size == size => {
                write_rgba(&self.gpu, &existing.texture, size, &rgba);
            }
            _ => {
                let tex = create_texture(
                    &self.gpu,
                    &self.bind_group_layout,
                    &self.sampler,
                    size,
                    &rgba,
                );
                self.textures.insert(id, tex);
            }
        }

        log::trace!("preview: texture {id:?} decoded ({}x{})", size.0, size.1);
        Ok(())
    }

    fn bind_texture(&mut self, id: Option<TextureId>) {
        self.stage.bind(id);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glint batch shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("glint batch pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glint batch pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[PreviewVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_texture(
    gpu: &Gpu<'_>,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    size: (u32, u32),
    rgba: &[u8],
) -> GpuTexture {
    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("glint texture"),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_rgba(gpu, &texture, size, rgba);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("glint texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        size,
        texture,
        bind_group,
    }
}

fn write_rgba(gpu: &Gpu<'_>, texture: &wgpu::Texture, size: (u32, u32), rgba: &[u8]) {
    gpu.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(size.0 * 4),
            rows_per_image: Some(size.1),
        },
        wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
    );
}
