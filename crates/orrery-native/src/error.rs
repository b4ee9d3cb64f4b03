use orrery_engine::EngineError;

/// Failures that stop the program before (or instead of) the first frame.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("HDR render target is incomplete: {0}")]
    RenderTarget(String),

    #[error("GPU resource `{label}` rejected: {reason}")]
    Resource { label: String, reason: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Failures while drawing one frame. Surface errors are usually recoverable.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error(transparent)]
    Surface(#[from] wgpu::SurfaceError),

    #[error(transparent)]
    Uniform(#[from] EngineError),

    #[error("draw `{draw}` references unknown {what} {id}")]
    Missing {
        draw: &'static str,
        what: &'static str,
        id: u32,
    },

    #[error("pipeline for draw `{draw}` rejected: {reason}")]
    Pipeline { draw: &'static str, reason: String },
}
