use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use glint_engine::coords::{Rect, Vec2};
use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::paint::Color;
use glint_engine::texture::{direct_texel, PixelSource, TextureId};
use glint_engine::window::{PreviewRenderer, Runtime, RuntimeConfig};

const ATLAS: TextureId = TextureId(1);
const ATLAS_SIZE: u32 = 16;
const TILE: f32 = 8.0;
const SPRITE: f32 = 16.0;
const SPRITES_PER_PRESS: usize = 64;

// Atlas cells, 8x8 texels each, in a 2x2 grid.
const GRASS: usize = 0;
const STONE: usize = 1;
const WATER: usize = 2;
const BALL: usize = 3;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("glint studio: space adds sprites, escape quits");

    Runtime::run(
        RuntimeConfig {
            title: "glint studio".to_string(),
            ..RuntimeConfig::default()
        },
        Studio::new(),
    )
}

struct Sprite {
    pos: Vec2,
    vel: Vec2,
    tint: Color,
}

struct Studio {
    sprites: Vec<Sprite>,
    rng: u32,
    spawn: bool,
    scroll: f32,
}

impl Studio {
    fn new() -> Self {
        let mut studio = Self {
            sprites: Vec::new(),
            rng: 0x2545_F491,
            spawn: false,
            scroll: 0.0,
        };
        studio.spawn_sprites(SPRITES_PER_PRESS);
        studio
    }

    fn next(&mut self) -> f32 {
        // xorshift32
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 17;
        self.rng ^= self.rng << 5;
        (self.rng >> 8) as f32 / (1u32 << 24) as f32
    }

    fn spawn_sprites(&mut self, n: usize) {
        for _ in 0..n {
            let pos = Vec2::new(self.next() * (256.0 - SPRITE), self.next() * (192.0 - SPRITE));
            let vel = Vec2::new(self.next() * 120.0 - 60.0, self.next() * 120.0 - 60.0);
            let tint = Color::rgb(
                128 + (self.next() * 127.0) as u8,
                128 + (self.next() * 127.0) as u8,
                128 + (self.next() * 127.0) as u8,
            );
            self.sprites.push(Sprite { pos, vel, tint });
        }
        log::info!("glint studio: {} sprites", self.sprites.len());
    }
}

impl App for Studio {
    fn on_start(&mut self, renderer: &mut PreviewRenderer<'_>) -> Result<()> {
        let texels = build_atlas();
        renderer.upload_texture(ATLAS, ATLAS_SIZE, ATLAS_SIZE, PixelSource::Direct(&texels))?;
        renderer.bind_texture(Some(ATLAS))?;
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
                    PhysicalKey::Code(KeyCode::Space) => self.spawn = true,
                    _ => {}
                }
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if std::mem::take(&mut self.spawn) {
            self.spawn_sprites(SPRITES_PER_PRESS);
        }

        if let Some(report) = ctx.last_report.filter(|r| r.overflowed()) {
            log::debug!(
                "glint studio: last frame dropped {} of {} vertices",
                report.dropped,
                report.submitted + report.dropped
            );
        }

        let dt = ctx.time.dt;
        self.scroll = (self.scroll + dt * 8.0) % TILE;

        // Background: one quad per tile, scrolled by a sub-tile offset.
        for row in 0..=24 {
            for col in 0..32 {
                let kind = match (row * 7 + col * 3) % 11 {
                    0 => WATER,
                    1 | 2 => STONE,
                    _ => GRASS,
                };
                let (x, y) = (col as f32 * TILE, row as f32 * TILE - self.scroll);
                let rect = Rect::new(x, y, TILE, TILE);
                ctx.renderer.queue_quad_z(rect, -0.5, cell(kind), Color::WHITE);
            }
        }

        for s in &mut self.sprites {
            s.pos = s.pos + s.vel * dt;
            if s.pos.x < 0.0 || s.pos.x > 256.0 - SPRITE {
                s.vel.x = -s.vel.x;
                s.pos.x = s.pos.x.clamp(0.0, 256.0 - SPRITE);
            }
            if s.pos.y < 0.0 || s.pos.y > 192.0 - SPRITE {
                s.vel.y = -s.vel.y;
                s.pos.y = s.pos.y.clamp(0.0, 192.0 - SPRITE);
            }
            ctx.sprite(s.pos, Vec2::new(SPRITE, SPRITE), cell(BALL), s.tint);
        }

        AppControl::Continue
    }
}

/// Texture-space rect of an atlas cell.
fn cell(index: usize) -> Rect {
    Rect::new((index % 2) as f32 * 0.5, (index / 2) as f32 * 0.5, 0.5, 0.5)
}

/// 16x16 direct-color atlas: grass, stone, water and a ball with a
/// transparent surround.
fn build_atlas() -> Vec<u16> {
    let size = ATLAS_SIZE as usize;
    let mut texels = vec![0u16; size * size];

    for y in 0..size {
        for x in 0..size {
            let (cx, cy) = (x % 8, y % 8);
            let checker = (cx + cy) % 2 == 0;
            let kind = (y / 8) * 2 + x / 8;

            let texel = match kind {
                GRASS => direct_texel(
                    if checker { Color::rgb(56, 160, 64) } else { Color::rgb(48, 136, 56) },
                    true,
                ),
                STONE => {
                    let mortar = cx == 0 || cy == 0;
                    let color = if mortar {
                        Color::rgb(96, 96, 104)
                    } else {
                        Color::rgb(144, 144, 152)
                    };
                    direct_texel(color, true)
                }
                WATER => {
                    let crest = (cx + 2 * cy) % 5 == 0;
                    let color = if crest {
                        Color::rgb(120, 184, 248)
                    } else {
                        Color::rgb(40, 96, 200)
                    };
                    direct_texel(color, true)
                }
                _ => {
                    let (dx, dy) = (cx as f32 - 3.5, cy as f32 - 3.5);
                    direct_texel(Color::WHITE, dx * dx + dy * dy <= 12.5)
                }
            };
            texels[y * size + x] = texel;
        }
    }

    texels
}
