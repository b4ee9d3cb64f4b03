//! Solar system flythrough.
//!
//! A textured sun, Earth with its moon, and Saturn with a tumbling asteroid
//! belt, seen through a free-flying camera with a flashlight and a glass
//! "shattle" cube that rides along. The scene renders into an HDR target
//! and is post-processed onto the screen.

use orrery_engine::*;

use crate::bodies::{AsteroidField, SceneParameters, ASTEROID_SEED};
use crate::controls;
use crate::orbit::{self, BodyTransforms};
use crate::resources;
use crate::sequence;
use crate::state::RenderState;

pub struct SolarSystem {
    asset_root: String,
    params: SceneParameters,
    field: AsteroidField,
    bodies: BodyTransforms,
    state: RenderState,
}

impl SolarSystem {
    /// `asset_root` is the directory the manifest paths are relative to.
    pub fn new(asset_root: impl Into<String>) -> Self {
        let mut params = SceneParameters::default();
        let field = AsteroidField::default();
        let bodies = orbit::advance(&mut params, &field, 0.0);
        Self {
            asset_root: asset_root.into(),
            params,
            field,
            bodies,
            state: RenderState::new(),
        }
    }

    pub fn params(&self) -> &SceneParameters {
        &self.params
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn asteroid_count(&self) -> usize {
        self.field.len()
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            title: String::from("Solar System"),
            ..GameConfig::default()
        }
    }

    fn resources(&self) -> Result<ResourceSet, EngineError> {
        let manifest = resources::load_manifest(&self.asset_root)?;
        resources::declare(&manifest)
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        // Rock tumble rates scale with the clock at startup.
        let seed_time = ctx.clock.elapsed();
        let mut rng = Rng::new(ASTEROID_SEED);
        self.field = AsteroidField::generate(&self.params, &mut rng, seed_time);
        self.bodies = orbit::advance(&mut self.params, &self.field, seed_time);
        log::info!(
            "Solar system ready: {} asteroids around Saturn (seed time {:.3}s)",
            self.field.len(),
            seed_time
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        controls::handle_input(ctx, input, &mut self.state, &self.params);
        self.bodies = orbit::advance(&mut self.params, &self.field, ctx.clock.elapsed());
        orbit::track_camera(&mut self.state, &ctx.camera);
    }

    fn render(&self, ctx: &EngineContext, plan: &mut FramePlan) {
        sequence::build_frame(plan, ctx, &self.state, &self.bodies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn started() -> (SolarSystem, EngineContext) {
        let mut game = SolarSystem::new("assets");
        let mut ctx = EngineContext::new(&game.config());
        ctx.clock.advance(0.25);
        game.init(&mut ctx);
        (game, ctx)
    }

    #[test]
    fn init_fills_the_belt() {
        let (game, _) = started();
        assert_eq!(game.asteroid_count(), 200);
    }

    #[test]
    fn resources_declare_cleanly() {
        let game = SolarSystem::new("/opt/orrery/assets");
        let set = game.resources().unwrap();
        assert_eq!(set.programs.len(), 6);
    }

    #[test]
    fn update_moves_planets_and_flashlight() {
        let (mut game, mut ctx) = started();
        let input = InputQueue::new();
        ctx.clock.advance(10.0);
        game.update(&mut ctx, &input);

        let t = 10.0;
        let p = game.params();
        let expected = Vec3::new(55.0 * (t * p.earth_rotation_speed).cos(), 0.0, 55.0 * (t * p.earth_rotation_speed).sin());
        assert!(p.earth_position.abs_diff_eq(expected, 1e-3));
        assert_eq!(game.state().spot_light.position, ctx.camera.position);
        assert_eq!(game.state().shattle_position, ctx.camera.position);
    }

    #[test]
    fn preset_uses_previous_frame_positions() {
        let (mut game, mut ctx) = started();
        let before = game.params().earth_position;

        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key: Key::F1, repeat: false });
        ctx.clock.advance(5.0);
        game.update(&mut ctx, &input);

        assert!(ctx.camera.position.abs_diff_eq(before - Vec3::new(0.0, 0.0, 5.0), 1e-4));
        assert!(!game.params().earth_position.abs_diff_eq(before, 1e-3));
    }

    #[test]
    fn render_produces_two_passes() {
        let (mut game, mut ctx) = started();
        ctx.clock.advance(1.0);
        game.update(&mut ctx, &InputQueue::new());
        let mut plan = FramePlan::new();
        game.render(&ctx, &mut plan);
        assert_eq!(plan.passes().len(), 2);
        assert_eq!(plan.draw_count(), 9);
    }
}
