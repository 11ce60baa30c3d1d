use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::preview::{PreviewInit, PreviewRasterizer};
use crate::device::{DeviceError, Rasterizer};
use crate::render::{FrameReport, Renderer, RendererConfig};
use crate::time::FrameClock;

/// The renderer the runtime hands to apps.
pub type PreviewRenderer<'w> = Renderer<PreviewRasterizer<'w>>;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Initial window size as a multiple of the emulated screen.
    pub scale: u32,

    pub renderer: RendererConfig,
    pub preview: PreviewInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            scale: 3,
            renderer: RendererConfig::default(),
            preview: PreviewInit::default(),
        }
    }
}

/// Entry point for the preview runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the preview window and runs `app` until it exits or the window
    /// is closed.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            app,
            entry: None,
            last_report: None,
            occluded: false,
            exit_requested: false,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[not_covariant]
    renderer: PreviewRenderer<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    app: A,

    entry: Option<WindowEntry>,
    last_report: Option<FrameReport>,
    occluded: bool,
    exit_requested: bool,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let screen = self.config.renderer.viewport;
        let scale = self.config.scale.max(1) as f64;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                screen.width as f64 * scale,
                screen.height as f64 * scale,
            ))
            .with_min_inner_size(LogicalSize::new(screen.width as f64, screen.height as f64));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let preview = PreviewInit {
            screen,
            ..self.config.preview.clone()
        };
        let renderer_config = self.config.renderer;

        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            renderer_builder: |w| {
                let device = PreviewRasterizer::new(w, preview)?;
                let mut renderer = Renderer::new(device, renderer_config);
                renderer.init()?;
                Ok::<_, anyhow::Error>(renderer)
            },
        }
        .try_build()?;

        let app = &mut self.app;
        entry
            .with_renderer_mut(|r| app.on_start(r))
            .context("app failed to start")?;

        Ok(entry)
    }

    fn redraw(&mut self) -> AppControl {
        let Some(entry) = self.entry.as_mut() else {
            return AppControl::Exit;
        };
        let (app, last_report) = (&mut self.app, &mut self.last_report);

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let renderer = fields.renderer;

            renderer.begin_frame();
            let control = {
                let mut ctx = FrameCtx {
                    renderer: &mut *renderer,
                    time,
                    last_report: *last_report,
                };
                app.on_frame(&mut ctx)
            };

            match finish_frame(renderer) {
                Ok(report) => {
                    *last_report = Some(report);
                    control
                }
                Err(DeviceError::OutOfMemory) => {
                    log::error!("preview: device out of memory, stopping");
                    AppControl::Exit
                }
                Err(err) => {
                    log::warn!("preview: frame {} failed: {err}", time.frame_index);
                    control
                }
            }
        })
    }
}

/// Ends the frame on `renderer`.
///
/// `end_frame` submits nothing for an empty batch; the display still gets a
/// cleared frame and the loop still waits for the blank.
fn finish_frame<R: Rasterizer>(renderer: &mut Renderer<R>) -> Result<FrameReport, DeviceError> {
    let report = renderer.end_frame()?;
    if report.is_empty() {
        let device = renderer.device_mut();
        device.flush()?;
        device.wait_vblank()?;
    }
    Ok(report)
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err.context("failed to open preview window")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Pacing happens inside finish_frame (emulated vblank); keep redrawing
        // while visible.
        event_loop.set_control_flow(ControlFlow::Wait);
        if self.occluded {
            return;
        }
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.exit_requested = true;
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_renderer_mut(|r| r.device_mut().resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_renderer_mut(|r| r.device_mut().resize(new_size));
                }
            }

            WindowEvent::Occluded(occluded) => {
                self.occluded = *occluded;
                if !*occluded {
                    if let Some(entry) = self.entry.as_mut() {
                        entry.with_mut(|fields| {
                            fields.clock.reset();
                            fields.renderer.device_mut().resume_pacing();
                        });
                        entry.with_window(|w| w.request_redraw());
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.exit_requested = true;
                }
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
