//! Desktop runner for orrery games: winit window, wgpu backend, asset loading.

pub mod app;
pub mod error;
pub mod gpu;
pub mod keymap;
pub mod runner;

pub use app::App;
pub use error::{FrameError, StartupError};
pub use gpu::WgpuRenderer;
pub use runner::GameRunner;

use orrery_engine::Game;
use winit::event_loop::{ControlFlow, EventLoop};

/// Open a window and run `game` until it closes or asks to quit.
pub fn run<G: Game + 'static>(game: G) -> Result<(), StartupError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(game);
    event_loop.run_app(&mut app)?;

    match app.take_startup_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
