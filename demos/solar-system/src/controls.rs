//! Keyboard and mouse handling.
//!
//! Discrete events (toggles, look, zoom) are applied first, in arrival
//! order; held keys (movement, sprint, camera presets, quit) are polled
//! after, once per frame, using the frame delta.

use glam::Vec3;
use orrery_engine::renderer::camera;
use orrery_engine::{Camera3D, CameraMovement, EngineContext, InputEvent, InputQueue, Key};

use crate::bodies::SceneParameters;
use crate::state::{PostEffect, RenderState, EXPOSURE_STEP};

/// Movement speed while Left Shift is held.
pub const SPRINT_SPEED: f32 = 15.0;
/// Movement speed otherwise.
pub const WALK_SPEED: f32 = camera::SPEED;

/// Fixed viewpoints on the F-keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    /// F1: five units in front of Earth.
    EarthFront,
    /// F2: ten units above Earth.
    EarthAbove,
    /// F3: thirty units in front of Saturn.
    SaturnFront,
    /// F4: forty units above Saturn.
    SaturnAbove,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 4] = [
        CameraPreset::EarthFront,
        CameraPreset::EarthAbove,
        CameraPreset::SaturnFront,
        CameraPreset::SaturnAbove,
    ];

    pub fn key(self) -> Key {
        match self {
            CameraPreset::EarthFront => Key::F1,
            CameraPreset::EarthAbove => Key::F2,
            CameraPreset::SaturnFront => Key::F3,
            CameraPreset::SaturnAbove => Key::F4,
        }
    }

    /// `(camera position, look target)` for the current body positions.
    pub fn placement(self, params: &SceneParameters) -> (Vec3, Vec3) {
        let earth = params.earth_position;
        let saturn = params.saturn_position;
        match self {
            CameraPreset::EarthFront => (earth - Vec3::new(0.0, 0.0, 5.0), earth),
            CameraPreset::EarthAbove => (earth + Vec3::new(0.0, 10.0, 0.0), earth),
            CameraPreset::SaturnFront => (saturn - Vec3::new(0.0, 0.0, 30.0), saturn),
            CameraPreset::SaturnAbove => (saturn + Vec3::new(0.0, 40.0, 0.0), saturn),
        }
    }

    /// Jump the camera. Its front becomes `target - position`, unnormalized.
    pub fn apply(self, camera: &mut Camera3D, params: &SceneParameters) {
        let (position, target) = self.placement(params);
        camera.look_at(position, target);
    }
}

/// Apply discrete input events: post-effect keys, shattle anchor, exposure,
/// flashlight, mouse look and scroll zoom.
pub fn apply_events(ctx: &mut EngineContext, input: &InputQueue, state: &mut RenderState) {
    for event in input.iter() {
        match *event {
            InputEvent::KeyDown { key, repeat: false } => match key {
                Key::Digit1 => state.toggle_effect(PostEffect::Hdr),
                Key::Digit2 => state.toggle_effect(PostEffect::Invert),
                Key::Digit3 => state.toggle_effect(PostEffect::Greyscale),
                Key::Enter => state.toggle_anchor(),
                Key::Q => state.adjust_exposure(-EXPOSURE_STEP),
                Key::E => state.adjust_exposure(EXPOSURE_STEP),
                Key::F => state.toggle_flashlight(),
                _ => {}
            },
            InputEvent::MouseMotion { dx, dy } => ctx.camera.process_mouse_movement(dx, dy),
            InputEvent::Scroll { dy } => ctx.camera.process_mouse_scroll(dy),
            _ => {}
        }
    }
}

/// Poll held keys: quit, sprint, WASD movement and camera presets.
/// Presets read the body positions of the previous frame.
pub fn poll_held(ctx: &mut EngineContext, input: &InputQueue, params: &SceneParameters) {
    if input.is_held(Key::Escape) {
        ctx.request_close();
    }

    let dt = ctx.clock.delta();
    let camera = &mut ctx.camera;
    camera.movement_speed = if input.is_held(Key::ShiftLeft) { SPRINT_SPEED } else { WALK_SPEED };

    for (key, dir) in [
        (Key::W, CameraMovement::Forward),
        (Key::S, CameraMovement::Backward),
        (Key::A, CameraMovement::Left),
        (Key::D, CameraMovement::Right),
    ] {
        if input.is_held(key) {
            camera.process_keyboard(dir, dt);
        }
    }

    for preset in CameraPreset::ALL {
        if input.is_held(preset.key()) {
            preset.apply(camera, params);
        }
    }
}

/// Full per-frame input step.
pub fn handle_input(
    ctx: &mut EngineContext,
    input: &InputQueue,
    state: &mut RenderState,
    params: &SceneParameters,
) {
    apply_events(ctx, input, state);
    poll_held(ctx, input, params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::GameConfig;

    fn setup() -> (EngineContext, InputQueue, RenderState, SceneParameters) {
        (
            EngineContext::new(&GameConfig::default()),
            InputQueue::new(),
            RenderState::new(),
            SceneParameters::default(),
        )
    }

    fn press(q: &mut InputQueue, key: Key) {
        q.push(InputEvent::KeyDown { key, repeat: false });
        q.push(InputEvent::KeyUp { key });
    }

    #[test]
    fn mode_keys_are_exclusive() {
        let (mut ctx, mut q, mut state, params) = setup();
        press(&mut q, Key::Digit1);
        press(&mut q, Key::Digit2);
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(state.effect_flags(), (false, true, false));

        q.drain();
        press(&mut q, Key::Digit3);
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(state.effect_flags(), (false, false, true));
    }

    #[test]
    fn key_repeat_does_not_retoggle() {
        let (mut ctx, mut q, mut state, params) = setup();
        q.push(InputEvent::KeyDown { key: Key::F, repeat: false });
        q.push(InputEvent::KeyDown { key: Key::F, repeat: true });
        q.push(InputEvent::KeyDown { key: Key::F, repeat: true });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert!(state.spot_light.is_lit());
    }

    #[test]
    fn exposure_keys() {
        let (mut ctx, mut q, mut state, params) = setup();
        for _ in 0..50 {
            press(&mut q, Key::Q);
        }
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(state.exposure, 0.0);

        q.drain();
        press(&mut q, Key::E);
        press(&mut q, Key::E);
        handle_input(&mut ctx, &q, &mut state, &params);
        assert!((state.exposure - 0.06).abs() < 1e-6);
    }

    #[test]
    fn earth_preset_ignores_prior_camera() {
        let (mut ctx, mut q, mut state, mut params) = setup();
        params.earth_position = Vec3::new(30.0, 0.0, 46.0);
        ctx.camera.position = Vec3::new(-80.0, 3.0, 7.0);
        ctx.camera.process_mouse_movement(123.0, -45.0);

        q.push(InputEvent::KeyDown { key: Key::F1, repeat: false });
        handle_input(&mut ctx, &q, &mut state, &params);

        let expected = params.earth_position - Vec3::new(0.0, 0.0, 5.0);
        assert!(ctx.camera.position.abs_diff_eq(expected, 1e-5));
        assert!(ctx.camera.front.abs_diff_eq(params.earth_position - expected, 1e-5));
    }

    #[test]
    fn saturn_above_preset() {
        let (mut ctx, mut q, mut state, params) = setup();
        q.push(InputEvent::KeyDown { key: Key::F4, repeat: false });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert!(ctx.camera.position.abs_diff_eq(Vec3::new(100.0, 40.0, 0.0), 1e-5));
        assert!(ctx.camera.front.abs_diff_eq(Vec3::new(0.0, -40.0, 0.0), 1e-5));
        assert!(ctx.camera.view_matrix().is_finite());
    }

    #[test]
    fn shift_sprints_and_release_walks() {
        let (mut ctx, mut q, mut state, params) = setup();
        ctx.clock.advance(1.0);
        q.push(InputEvent::KeyDown { key: Key::ShiftLeft, repeat: false });
        q.push(InputEvent::KeyDown { key: Key::W, repeat: false });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(ctx.camera.movement_speed, SPRINT_SPEED);
        // One second forward along -Z from (0, 35, 0)
        assert!(ctx.camera.position.abs_diff_eq(Vec3::new(0.0, 35.0, -15.0), 1e-4));

        q.drain();
        q.push(InputEvent::KeyUp { key: Key::ShiftLeft });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(ctx.camera.movement_speed, WALK_SPEED);
    }

    #[test]
    fn escape_requests_close() {
        let (mut ctx, mut q, mut state, params) = setup();
        q.push(InputEvent::KeyDown { key: Key::Escape, repeat: false });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert!(ctx.close_requested());
    }

    #[test]
    fn mouse_and_scroll_drive_camera() {
        let (mut ctx, mut q, mut state, params) = setup();
        q.push(InputEvent::MouseMotion { dx: 0.0, dy: 100.0 });
        q.push(InputEvent::Scroll { dy: 5.0 });
        handle_input(&mut ctx, &q, &mut state, &params);
        assert!((ctx.camera.pitch - 10.0).abs() < 1e-4);
        assert!((ctx.camera.zoom - 40.0).abs() < 1e-6);
    }

    #[test]
    fn enter_freezes_shattle() {
        let (mut ctx, mut q, mut state, params) = setup();
        press(&mut q, Key::Enter);
        handle_input(&mut ctx, &q, &mut state, &params);
        assert_eq!(state.anchor, crate::state::ShattleAnchor::Frozen);
    }
}
