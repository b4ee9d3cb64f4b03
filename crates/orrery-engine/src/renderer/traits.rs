//! Renderer trait for GPU backends.
//!
//! The engine itself never touches a graphics API. Backends (the wgpu one in
//! `orrery-native`, or a recording backend in tests) consume a [`FramePlan`]
//! and turn it into real draw calls.

use super::pass::FramePlan;

/// Renderer trait for GPU backends.
///
/// # Example Implementation
///
/// ```ignore
/// struct WgpuRenderer {
///     device: wgpu::Device,
///     queue: wgpu::Queue,
///     // ...
/// }
///
/// impl Renderer for WgpuRenderer {
///     type Error = wgpu::SurfaceError;
///
///     fn backend(&self) -> &'static str { "wgpu" }
///
///     fn draw(&mut self, plan: &FramePlan) -> Result<(), Self::Error> {
///         // Encode passes in order...
///     }
///
///     fn resize(&mut self, width: u32, height: u32) {
///         // Reconfigure surface, recreate offscreen targets...
///     }
/// }
/// ```
pub trait Renderer {
    type Error;

    /// Backend identifier (e.g., "wgpu", "recording")
    fn backend(&self) -> &'static str;

    /// Replay one frame plan, pass by pass, draw by draw.
    fn draw(&mut self, plan: &FramePlan) -> Result<(), Self::Error>;

    /// Handle window resize. Recreates swap chain and intermediate targets.
    fn resize(&mut self, width: u32, height: u32);
}
