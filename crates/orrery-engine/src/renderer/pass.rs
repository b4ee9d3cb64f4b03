//! Frame plans: the ordered list of passes a game produces each frame.
//!
//! A game never talks to the GPU. It fills a [`FramePlan`] with passes
//! (target + clear) and draw commands (program, mesh, state, textures,
//! uniforms, instances); the backend replays the plan in order. Program-wide
//! uniforms are set once per frame and merged under each draw's own values.

use std::collections::HashMap;

use crate::api::types::{MeshId, ProgramId, TextureId};
use crate::renderer::instance::ModelInstance;
use crate::renderer::uniforms::{UniformSet, UniformValue};

/// Render target of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassTarget {
    /// Offscreen RGBA16F color + depth, sampled later as [`TextureId::HDR_COLOR`].
    Hdr,
    /// The window surface. No depth attachment.
    Screen,
}

/// Depth test / write configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthMode {
    /// Test `<`, write depth.
    #[default]
    Less,
    /// Test `<=`, leave depth untouched (skyboxes).
    LessEqualReadOnly,
    /// No depth test at all.
    Disabled,
}

/// Which faces are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    #[default]
    None,
    Back,
    Front,
}

/// Fixed-function state for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawState {
    pub depth: DepthMode,
    pub cull: CullMode,
}

impl DrawState {
    pub const OPAQUE: Self = Self { depth: DepthMode::Less, cull: CullMode::None };
    pub const SKYBOX: Self = Self { depth: DepthMode::LessEqualReadOnly, cull: CullMode::None };
    pub const FULLSCREEN: Self = Self { depth: DepthMode::Disabled, cull: CullMode::None };

    pub fn with_cull(mut self, cull: CullMode) -> Self {
        self.cull = cull;
        self
    }
}

/// One draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub label: &'static str,
    pub program: ProgramId,
    pub mesh: MeshId,
    pub state: DrawState,
    /// Texture slot bindings. Empty means "use the mesh's own material".
    pub textures: Vec<(u32, TextureId)>,
    /// Per-draw uniforms, applied over the program's frame uniforms.
    pub uniforms: UniformSet,
    /// Per-instance model matrices for instanced programs.
    pub instances: Vec<ModelInstance>,
}

impl DrawCommand {
    pub fn new(label: &'static str, program: ProgramId, mesh: MeshId) -> Self {
        Self {
            label,
            program,
            mesh,
            state: DrawState::OPAQUE,
            textures: Vec::new(),
            uniforms: UniformSet::new(),
            instances: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: DrawState) -> Self {
        self.state = state;
        self
    }

    /// Bind `texture` at `slot`, replacing any earlier binding of that slot.
    pub fn with_texture(mut self, slot: u32, texture: TextureId) -> Self {
        self.textures.retain(|(s, _)| *s != slot);
        self.textures.push((slot, texture));
        self.textures.sort_by_key(|(s, _)| *s);
        self
    }

    pub fn with_uniform(mut self, name: &'static str, value: impl Into<UniformValue>) -> Self {
        self.uniforms.set(name, value);
        self
    }

    pub fn with_instances(mut self, instances: Vec<ModelInstance>) -> Self {
        self.instances = instances;
        self
    }

    pub fn texture_at(&self, slot: u32) -> Option<TextureId> {
        self.textures.iter().find(|(s, _)| *s == slot).map(|(_, t)| *t)
    }
}

/// A render pass: target, clear, and ordered draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    pub label: &'static str,
    pub target: PassTarget,
    pub clear_color: [f32; 4],
    pub draws: Vec<DrawCommand>,
}

impl Pass {
    /// Depth is cleared on every pass that has a depth attachment.
    pub fn clears_depth(&self) -> bool {
        self.target == PassTarget::Hdr
    }

    pub fn draw(&mut self, command: DrawCommand) -> &mut Self {
        self.draws.push(command);
        self
    }
}

/// The full description of one frame.
#[derive(Debug, Clone, Default)]
pub struct FramePlan {
    passes: Vec<Pass>,
    program_uniforms: HashMap<ProgramId, UniformSet>,
}

impl FramePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass and return it for filling.
    pub fn begin_pass(
        &mut self,
        label: &'static str,
        target: PassTarget,
        clear_color: [f32; 4],
    ) -> &mut Pass {
        self.passes.push(Pass {
            label,
            target,
            clear_color,
            draws: Vec::new(),
        });
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    /// Frame-wide uniforms for `program` (camera, lights, post settings).
    pub fn program_uniforms_mut(&mut self, program: ProgramId) -> &mut UniformSet {
        self.program_uniforms.entry(program).or_default()
    }

    pub fn program_uniforms(&self, program: ProgramId) -> Option<&UniformSet> {
        self.program_uniforms.get(&program)
    }

    /// Program uniforms with the draw's own values layered on top.
    pub fn resolved_uniforms(&self, draw: &DrawCommand) -> UniformSet {
        let mut set = self.program_uniforms.get(&draw.program).cloned().unwrap_or_default();
        set.merge(&draw.uniforms);
        set
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn draw_count(&self) -> usize {
        self.passes.iter().map(|p| p.draws.len()).sum()
    }

    pub fn clear(&mut self) {
        self.passes.clear();
        self.program_uniforms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIT: ProgramId = ProgramId(1);

    #[test]
    fn passes_keep_declaration_order() {
        let mut plan = FramePlan::new();
        plan.begin_pass("scene", PassTarget::Hdr, [0.0; 4])
            .draw(DrawCommand::new("a", LIT, MeshId(0)))
            .draw(DrawCommand::new("b", LIT, MeshId(1)));
        plan.begin_pass("post", PassTarget::Screen, [1.0; 4])
            .draw(DrawCommand::new("c", LIT, MeshId(2)));

        let labels: Vec<_> = plan
            .passes()
            .iter()
            .flat_map(|p| p.draws.iter().map(|d| d.label))
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(plan.draw_count(), 3);
        assert!(plan.passes()[0].clears_depth());
        assert!(!plan.passes()[1].clears_depth());
    }

    #[test]
    fn draw_uniforms_override_program_uniforms() {
        let mut plan = FramePlan::new();
        plan.program_uniforms_mut(LIT).set("i", 0).set("exposure", 2.0f32);
        let draw = DrawCommand::new("cube", LIT, MeshId(0)).with_uniform("i", 1);
        let set = plan.resolved_uniforms(&draw);
        assert_eq!(set.get("i"), Some(UniformValue::Int(1)));
        assert_eq!(set.get("exposure"), Some(UniformValue::Float(2.0)));
    }

    #[test]
    fn texture_slots_replace_and_sort() {
        let draw = DrawCommand::new("rocks", LIT, MeshId(0))
            .with_texture(1, TextureId(7))
            .with_texture(0, TextureId(3))
            .with_texture(1, TextureId(8));
        assert_eq!(draw.textures, vec![(0, TextureId(3)), (1, TextureId(8))]);
        assert_eq!(draw.texture_at(1), Some(TextureId(8)));
        assert_eq!(draw.texture_at(2), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut plan = FramePlan::new();
        plan.program_uniforms_mut(LIT).set("hdr", true);
        plan.begin_pass("scene", PassTarget::Hdr, [0.0; 4]);
        plan.clear();
        assert!(plan.passes().is_empty());
        assert!(plan.program_uniforms(LIT).is_none());
    }
}
