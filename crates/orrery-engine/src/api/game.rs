use glam::{Mat4, Vec3};

use crate::assets::resources::ResourceSet;
use crate::core::time::FrameClock;
use crate::error::EngineError;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
use crate::renderer::pass::FramePlan;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in physical pixels (default: 1280).
    pub width: u32,
    /// Initial window height in physical pixels (default: 720).
    pub height: u32,
    /// Near clip plane distance (default: 0.1).
    pub near: f32,
    /// Far clip plane distance (default: 300).
    pub far: f32,
    /// Where the camera starts (default: (0, 35, 0)).
    pub camera_position: Vec3,
    /// Hide and lock the cursor so mouse motion drives the camera.
    pub capture_cursor: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: String::from("orrery"),
            width: 1280,
            height: 720,
            near: 0.1,
            far: 300.0,
            camera_position: Vec3::new(0.0, 35.0, 0.0),
            capture_cursor: true,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Declare every program, mesh and texture the game draws with.
    /// Called once, before the backend creates GPU resources.
    fn resources(&self) -> Result<ResourceSet, EngineError>;

    /// Setup initial state.
    fn init(&mut self, ctx: &mut EngineContext);

    /// Per-frame tick: apply input, advance the simulation.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Describe the frame as an ordered list of passes.
    /// `plan` arrives cleared; the game only reads its own state here.
    fn render(&self, ctx: &EngineContext, plan: &mut FramePlan);
}

/// Mutable engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub camera: Camera3D,
    pub clock: FrameClock,
    viewport: (u32, u32),
    near: f32,
    far: f32,
    close_requested: bool,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            camera: Camera3D::new(config.camera_position),
            clock: FrameClock::new(),
            viewport: (config.width.max(1), config.height.max(1)),
            near: config.near,
            far: config.far,
            close_requested: false,
        }
    }

    /// Ask the runner to exit after the current frame.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Record a new drawable size. Zero-sized (minimized) viewports are ignored
    /// so the aspect ratio stays finite.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Camera projection for the current viewport and clip planes.
    pub fn projection(&self) -> Mat4 {
        self.camera.projection_matrix(self.aspect(), self.near, self.far)
    }
}
