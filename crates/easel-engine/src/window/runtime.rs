use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Rect, Vec2};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::raster::PixmapContext;
use crate::surface::{Renderer, RendererOptions, ResizeOptions, SharedPlacement};
use crate::time::ManualScheduler;

/// Renderer owned by a window: CPU pixmap, refreshes delivered by the event loop.
pub type WindowRenderer = Renderer<PixmapContext, ManualScheduler>;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Resize the renderer's buffer whenever the window's drawable size changes.
    pub track_window_size: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            track_window_size: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives a [`WindowRenderer`] inside it.
    ///
    /// `setup` runs once, after the window and renderer exist; it typically
    /// loads fonts and calls `run_loop`. Each display refresh delivers the
    /// renderer's pending frame and presents the pixmap. Returns when the
    /// window is closed, or with the first setup/GPU error.
    pub fn run<F>(config: RuntimeConfig, gpu_init: GpuInit, setup: F) -> Result<()>
    where
        F: FnOnce(&mut WindowRenderer) -> Result<()> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, setup);

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
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<F> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    setup: Option<F>,

    entry: Option<WindowEntry>,
    renderer: Option<WindowRenderer>,
    placement: SharedPlacement,

    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<F> AppState<F>
where
    F: FnOnce(&mut WindowRenderer) -> Result<()> + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, setup: F) -> Self {
        Self {
            config,
            gpu_init,
            setup: Some(setup),
            entry: None,
            renderer: None,
            placement: SharedPlacement::new(),
            error: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))?;

        let mut renderer: WindowRenderer = Renderer::new(RendererOptions {
            target: Some(Box::new(self.placement.clone())),
            initial_size: Some(buffer_size(size)),
            ..RendererOptions::default()
        });

        if let Some(setup) = self.setup.take() {
            setup(&mut renderer).context("sketch setup failed")?;
        }

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn close_window(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.stop_loop();
        }
        self.renderer = None;
        self.entry = None;
        self.exit_requested = true;
        event_loop.exit();
    }

    fn surface_resized(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));

        if self.config.track_window_size && new_size.width > 0 && new_size.height > 0 {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.resize(&buffer_size(new_size));
            }
        }

        entry.with_window(|w| w.request_redraw());
    }

    /// Delivers the pending frame (if any) and presents the current pixmap.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(renderer)) = (self.entry.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        if let Some(handle) = renderer.scheduler_mut().take_pending() {
            renderer.on_frame(handle, Instant::now());
        }

        if let Some(placement) = self.placement.take() {
            entry.with_window(|w| apply_placement(w, placement));
        }

        let info = renderer.info();
        let pixels = renderer.context().pixels();

        let action = entry.with_mut(|fields| {
            fields.window.pre_present_notify();
            fields
                .gpu
                .present_rgba8(pixels, info.width, info.height)
                .err()
                .map(|err| {
                    log::debug!("surface error: {err}");
                    fields.gpu.handle_surface_error(err)
                })
        });

        match action {
            None | Some(SurfaceErrorAction::SkipFrame) => {}
            Some(SurfaceErrorAction::Reconfigured) => entry.with_window(|w| w.request_redraw()),
            Some(SurfaceErrorAction::Fatal) => {
                self.fail(event_loop, anyhow::anyhow!("surface out of memory"));
            }
        }
    }
}

impl<F> ApplicationHandler for AppState<F>
where
    F: FnOnce(&mut WindowRenderer) -> Result<()> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.open_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // A pending frame means the loop wants the next refresh; FIFO
        // presentation paces the redraws to the display.
        if let (Some(entry), Some(renderer)) = (&self.entry, &self.renderer) {
            if renderer.scheduler().pending().is_some() {
                entry.with_window(|w| w.request_redraw());
            }
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

        match event {
            WindowEvent::CloseRequested => self.close_window(event_loop),

            WindowEvent::Resized(new_size) => self.surface_resized(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.surface_resized(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn buffer_size(size: PhysicalSize<u32>) -> ResizeOptions {
    ResizeOptions::new(
        Vec2::zero(),
        Vec2::new(size.width as f32, size.height as f32),
    )
}

/// Moves/resizes the window to a placement in physical pixels.
fn apply_placement(window: &Window, placement: Rect) {
    let size = PhysicalSize::new(
        placement.size.x.round().max(1.0) as u32,
        placement.size.y.round().max(1.0) as u32,
    );
    let _ = window.request_inner_size(size);
    window.set_outer_position(PhysicalPosition::new(
        placement.origin.x.round() as i32,
        placement.origin.y.round() as i32,
    ));
    log::debug!("window placed at {placement:?}");
}
