pub mod api;
pub mod core;
pub mod error;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{ProgramId, MeshId, TextureId};
pub use error::EngineError;
pub use core::time::FrameClock;
pub use core::rng::Rng;
pub use renderer::camera::{Camera3D, CameraMovement};
pub use renderer::instance::ModelInstance;
pub use renderer::mesh::{MeshData, MeshVertex, Topology, VertexLayout, uv_sphere};
pub use renderer::pass::{
    CullMode, DepthMode, DrawCommand, DrawState, FramePlan, Pass, PassTarget,
};
pub use renderer::traits::Renderer;
pub use renderer::uniforms::{UniformField, UniformKind, UniformLayout, UniformSet, UniformValue};
pub use input::queue::{InputEvent, InputQueue, Key};
pub use assets::manifest::{AssetManifest, CubemapDescriptor, ModelDescriptor, TextureDescriptor};
pub use assets::resources::{
    Material, MeshDesc, MeshSource, ProgramDesc, ResourceSet, TextureDesc, TextureLayout,
    TextureSource,
};
pub use systems::lighting::{Attenuation, PointLight, SpotLight};
