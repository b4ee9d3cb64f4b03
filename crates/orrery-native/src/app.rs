//! winit application handler: window, renderer and the per-frame loop.

use std::sync::Arc;
use std::time::Instant;

use orrery_engine::{Game, Renderer};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::error::{FrameError, StartupError};
use crate::gpu::WgpuRenderer;
use crate::keymap;
use crate::runner::GameRunner;

pub struct App<G: Game> {
    runner: GameRunner<G>,
    start: Instant,
    window: Option<Arc<Window>>,
    renderer: Option<WgpuRenderer>,
    startup_error: Option<StartupError>,
}

impl<G: Game> App<G> {
    pub fn new(game: G) -> Self {
        Self {
            runner: GameRunner::new(game),
            start: Instant::now(),
            window: None,
            renderer: None,
            startup_error: None,
        }
    }

    /// The error that stopped startup, if any.
    pub fn take_startup_error(&mut self) -> Option<StartupError> {
        self.startup_error.take()
    }

    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), StartupError> {
        let config = self.runner.config().clone();
        let attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let resources = self.runner.resources()?;
        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), &resources))?;

        if config.capture_cursor {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
            if let Err(e) = grabbed {
                log::warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        }

        let (width, height) = renderer.size();
        self.runner.resize(width, height);
        let now = self.elapsed();
        self.runner.init(now);

        log::info!(
            "{} started: {width}x{height}, {} backend",
            config.title,
            renderer.backend()
        );
        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.elapsed();
        let plan = self.runner.tick(now);
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match renderer.draw(plan) {
            Ok(()) => {}
            Err(FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                renderer.reconfigure();
            }
            Err(FrameError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(FrameError::Surface(wgpu::SurfaceError::Timeout)) => {
                log::warn!("Surface timeout, skipping frame");
            }
            Err(e) => {
                log::error!("Frame failed: {e}");
                event_loop.exit();
                return;
            }
        }

        if self.runner.close_requested() {
            log::info!("Close requested, exiting");
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl<G: Game> ApplicationHandler for App<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            log::error!("Startup failed: {e}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.runner.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(input) = keymap::key_event(code, event.state, event.repeat) {
                        self.runner.push_input(input);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.runner.push_input(keymap::scroll(delta));
            }
            WindowEvent::Focused(false) => {
                self.runner.release_keys();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.runner.is_initialized() {
                self.runner.push_input(keymap::mouse_motion(dx, dy));
            }
        }
    }
}
