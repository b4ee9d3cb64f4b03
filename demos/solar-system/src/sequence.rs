//! Builds the per-frame pass list: the scene into the HDR target, then the
//! post-processed quad onto the screen.

use glam::{Mat3, Mat4, Vec3};
use orrery_engine::{
    CullMode, DrawCommand, DrawState, EngineContext, FramePlan, ModelInstance, PassTarget,
    TextureId, UniformSet,
};

use crate::orbit::BodyTransforms;
use crate::resources::*;
use crate::state::RenderState;

const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Shattle pass order: outer faces first, then the inside.
const SHATTLE_FACES: [(i32, CullMode); 2] = [(0, CullMode::Back), (1, CullMode::Front)];

/// Drop the translation so the skybox stays centred on the viewer.
pub fn skybox_view(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

fn camera_uniforms(set: &mut UniformSet, projection: Mat4, view: Mat4) {
    set.set("projection", projection).set("view", view);
}

fn lit_uniforms(set: &mut UniformSet, state: &RenderState, camera_position: Vec3) {
    set.set("viewPosition", camera_position)
        .set("FlashLight", state.flashlight);
    state.point_light.write_uniforms(set);
    state.spot_light.write_uniforms(set);
}

/// Frame-wide uniforms shared by every draw of a program.
fn program_uniforms(plan: &mut FramePlan, ctx: &EngineContext, state: &RenderState) {
    let projection = ctx.projection();
    let view = ctx.camera.view_matrix();
    let eye = ctx.camera.position;

    camera_uniforms(plan.program_uniforms_mut(SUN_PROGRAM), projection, view);

    for program in [PLANET_PROGRAM, ROCK_PROGRAM] {
        let set = plan.program_uniforms_mut(program);
        camera_uniforms(set, projection, view);
        lit_uniforms(set, state, eye);
    }

    camera_uniforms(plan.program_uniforms_mut(SKYBOX_PROGRAM), projection, skybox_view(view));

    let set = plan.program_uniforms_mut(SHATTLE_PROGRAM);
    camera_uniforms(set, projection, view);
    set.set("viewPosition", eye);

    let (hdr, invert, grey) = state.effect_flags();
    plan.program_uniforms_mut(POST_PROGRAM)
        .set("hdr", hdr)
        .set("exposure", state.exposure)
        .set("invert", invert)
        .set("greyScale", grey);
}

/// Fill `plan` with this frame's passes.
pub fn build_frame(
    plan: &mut FramePlan,
    ctx: &EngineContext,
    state: &RenderState,
    bodies: &BodyTransforms,
) {
    program_uniforms(plan, ctx, state);

    let scene = plan.begin_pass("scene", PassTarget::Hdr, CLEAR);

    scene.draw(DrawCommand::new("skybox", SKYBOX_PROGRAM, SKYBOX_MESH)
        .with_state(DrawState::SKYBOX)
        .with_texture(0, SPACE));

    // Loaded models carry their own diffuse map as slot 0.
    scene
        .draw(DrawCommand::new("sun", SUN_PROGRAM, SUN_MESH).with_uniform("model", bodies.sun))
        .draw(DrawCommand::new("earth", PLANET_PROGRAM, EARTH_MESH).with_uniform("model", bodies.earth))
        .draw(DrawCommand::new("moon", PLANET_PROGRAM, MOON_MESH).with_uniform("model", bodies.moon))
        .draw(DrawCommand::new("saturn", PLANET_PROGRAM, SATURN_MESH).with_uniform("model", bodies.saturn));

    let instances: Vec<ModelInstance> = bodies.asteroids.iter().copied().map(ModelInstance::from).collect();
    scene.draw(DrawCommand::new("asteroids", ROCK_PROGRAM, ROCK_MESH)
        .with_state(DrawState::OPAQUE.with_cull(CullMode::Back))
        .with_texture(0, ROCK_DIFFUSE)
        .with_texture(1, ROCK_SPECULAR)
        .with_instances(instances));

    let shattle_model = Mat4::from_translation(state.shattle_position);
    for (face, cull) in SHATTLE_FACES {
        scene.draw(DrawCommand::new("shattle", SHATTLE_PROGRAM, SHATTLE_MESH)
            .with_state(DrawState::OPAQUE.with_cull(cull))
            .with_texture(0, GLASS)
            .with_uniform("model", shattle_model)
            .with_uniform("i", face));
    }

    plan.begin_pass("post", PassTarget::Screen, CLEAR)
        .draw(DrawCommand::new("post", POST_PROGRAM, QUAD_MESH)
            .with_state(DrawState::FULLSCREEN)
            .with_texture(0, TextureId::HDR_COLOR));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{AsteroidField, SceneParameters, ASTEROID_SEED};
    use crate::orbit;
    use crate::state::PostEffect;
    use orrery_engine::{DepthMode, GameConfig, Rng, UniformLayout, UniformValue};

    fn frame(state: &RenderState) -> (FramePlan, EngineContext) {
        let mut params = SceneParameters::default();
        let field = AsteroidField::generate(&params, &mut Rng::new(ASTEROID_SEED), 0.0);
        let bodies = orbit::advance(&mut params, &field, 3.0);
        let ctx = EngineContext::new(&GameConfig::default());
        let mut plan = FramePlan::new();
        build_frame(&mut plan, &ctx, state, &bodies);
        (plan, ctx)
    }

    #[test]
    fn pass_and_draw_order() {
        let (plan, _) = frame(&RenderState::new());
        let passes = plan.passes();
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].target, PassTarget::Hdr);
        assert_eq!(passes[1].target, PassTarget::Screen);

        let labels: Vec<_> = passes[0].draws.iter().map(|d| d.label).collect();
        assert_eq!(
            labels,
            ["skybox", "sun", "earth", "moon", "saturn", "asteroids", "shattle", "shattle"]
        );
        assert_eq!(passes[1].draws[0].texture_at(0), Some(TextureId::HDR_COLOR));
    }

    #[test]
    fn skybox_state_and_view() {
        let (plan, ctx) = frame(&RenderState::new());
        let sky = &plan.passes()[0].draws[0];
        assert_eq!(sky.state.depth, DepthMode::LessEqualReadOnly);
        let view = plan.resolved_uniforms(sky).get("view");
        let Some(UniformValue::Mat4(view)) = view else {
            panic!("skybox view missing");
        };
        assert!(view.w_axis.truncate().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(view.x_axis.abs_diff_eq(ctx.camera.view_matrix().x_axis, 1e-6));
    }

    #[test]
    fn shattle_drawn_outside_then_inside() {
        let (plan, _) = frame(&RenderState::new());
        let draws = &plan.passes()[0].draws;
        let (outer, inner) = (&draws[6], &draws[7]);
        assert_eq!(outer.state.cull, CullMode::Back);
        assert_eq!(inner.state.cull, CullMode::Front);
        assert_eq!(outer.uniforms.get("i"), Some(UniformValue::Int(0)));
        assert_eq!(inner.uniforms.get("i"), Some(UniformValue::Int(1)));
    }

    #[test]
    fn asteroids_are_instanced_and_culled() {
        let (plan, _) = frame(&RenderState::new());
        let rocks = &plan.passes()[0].draws[5];
        assert_eq!(rocks.instances.len(), 200);
        assert_eq!(rocks.state.cull, CullMode::Back);
        assert_eq!(rocks.texture_at(1), Some(ROCK_SPECULAR));
    }

    #[test]
    fn post_flags_follow_state() {
        let mut state = RenderState::new();
        state.toggle_effect(PostEffect::Greyscale);
        let (plan, _) = frame(&state);
        let post = plan.program_uniforms(POST_PROGRAM).unwrap();
        assert_eq!(post.get("greyScale"), Some(UniformValue::Int(1)));
        assert_eq!(post.get("hdr"), Some(UniformValue::Int(0)));
        assert_eq!(post.get("exposure"), Some(UniformValue::Float(1.0)));
    }

    #[test]
    fn every_draw_fills_its_layout() {
        let manifest = load_manifest("").unwrap();
        let resources = declare(&manifest).unwrap();
        let (plan, _) = frame(&RenderState::new());
        let mut buf = vec![0u8; 512];
        for pass in plan.passes() {
            for draw in &pass.draws {
                let program = resources.find_program(draw.program).unwrap();
                let layout: UniformLayout = program.layout().unwrap();
                let set = plan.resolved_uniforms(draw);
                layout.write(&set, &mut buf).unwrap();
                assert_eq!(set.len(), program.uniforms.len(), "{}", draw.label);
            }
        }
    }
}
