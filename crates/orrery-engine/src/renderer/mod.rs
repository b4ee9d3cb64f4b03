pub mod camera;
pub mod instance;
pub mod mesh;
pub mod pass;
pub mod traits;
pub mod uniforms;

// Re-export key types for convenient access
pub use pass::{FramePlan, Pass, PassTarget, DrawCommand, DrawState};
pub use traits::Renderer;
