//! Toggle and light state shared by the input handler, the frame updater and
//! the render sequencer. Owned by the game; nothing here is global.

use glam::Vec3;
use orrery_engine::{Attenuation, PointLight, SpotLight};

/// Exposure change per Q/E press.
pub const EXPOSURE_STEP: f32 = 0.03;
pub const INITIAL_EXPOSURE: f32 = 1.0;

/// Spot light cone half-angles, degrees.
pub const FLASHLIGHT_INNER_DEG: f32 = 12.5;
pub const FLASHLIGHT_OUTER_DEG: f32 = 15.0;

/// Post-process mode. At most one is active, so the three
/// "hdr / invert / greyscale" flags can never be set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostEffect {
    #[default]
    None,
    /// Exposure tone mapping.
    Hdr,
    Invert,
    Greyscale,
}

/// Whether the shattle cube rides with the camera or stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShattleAnchor {
    FollowCamera,
    Frozen,
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub effect: PostEffect,
    pub exposure: f32,
    /// The flashlight flag as the shaders see it. See [`RenderState::toggle_flashlight`].
    pub flashlight: bool,
    pub anchor: ShattleAnchor,
    pub shattle_position: Vec3,
    pub point_light: PointLight,
    pub spot_light: SpotLight,
}

impl RenderState {
    pub fn new() -> Self {
        let attenuation = Attenuation::new(1.0, 0.09, 0.032);
        Self {
            effect: PostEffect::None,
            exposure: INITIAL_EXPOSURE,
            flashlight: true,
            anchor: ShattleAnchor::FollowCamera,
            shattle_position: Vec3::ZERO,
            point_light: PointLight::new(Vec3::ZERO)
                .with_colors(Vec3::splat(0.8), Vec3::splat(6.0), Vec3::splat(2.0))
                .with_attenuation(attenuation),
            spot_light: SpotLight::with_cone_degrees(FLASHLIGHT_INNER_DEG, FLASHLIGHT_OUTER_DEG)
                .with_attenuation(attenuation),
        }
    }

    /// Select `effect`, or switch post-processing off if it is already selected.
    pub fn toggle_effect(&mut self, effect: PostEffect) {
        self.effect = if self.effect == effect { PostEffect::None } else { effect };
        log::debug!("Post effect: {:?}", self.effect);
    }

    /// `(hdr, invert, greyScale)` as the post shader expects them.
    pub fn effect_flags(&self) -> (bool, bool, bool) {
        (
            self.effect == PostEffect::Hdr,
            self.effect == PostEffect::Invert,
            self.effect == PostEffect::Greyscale,
        )
    }

    /// Add `delta` to the exposure, never going below zero.
    pub fn adjust_exposure(&mut self, delta: f32) {
        self.exposure = (self.exposure + delta).max(0.0);
        log::debug!("Exposure: {:.2}", self.exposure);
    }

    /// Flip the flashlight.
    ///
    /// The new spot color is chosen from the flag's value *before* the flip:
    /// a set flag turns the light on and clears the flag, a clear flag turns
    /// it off and sets the flag. The flag therefore reads inverted relative
    /// to the light, starting from "flag set, light dark".
    pub fn toggle_flashlight(&mut self) {
        let intensity = if self.flashlight { 1.0 } else { 0.0 };
        self.spot_light.set_intensity(intensity);
        self.flashlight = !self.flashlight;
        log::debug!("Flashlight lit: {}", self.spot_light.is_lit());
    }

    pub fn toggle_anchor(&mut self) {
        self.anchor = match self.anchor {
            ShattleAnchor::FollowCamera => ShattleAnchor::Frozen,
            ShattleAnchor::Frozen => ShattleAnchor::FollowCamera,
        };
        log::debug!("Shattle anchor: {:?}", self.anchor);
    }

    /// Move the shattle with the camera while following.
    pub fn track_shattle(&mut self, camera_position: Vec3) {
        if self.anchor == ShattleAnchor::FollowCamera {
            self.shattle_position = camera_position;
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(state: &RenderState) -> usize {
        let (a, b, c) = state.effect_flags();
        [a, b, c].iter().filter(|f| **f).count()
    }

    #[test]
    fn one_then_two_leaves_only_invert() {
        for start in [PostEffect::None, PostEffect::Hdr, PostEffect::Invert, PostEffect::Greyscale] {
            let mut s = RenderState::new();
            s.effect = start;
            s.toggle_effect(PostEffect::Hdr);
            s.toggle_effect(PostEffect::Invert);
            // Starting from Invert, pressing 1 then 2 lands on Invert; from Hdr, 1 clears then 2 sets
            assert_eq!(s.effect, PostEffect::Invert, "from {start:?}");
            assert_eq!(active(&s), 1);
            assert_eq!(s.effect_flags(), (false, true, false));
        }
    }

    #[test]
    fn same_key_twice_turns_effect_off() {
        let mut s = RenderState::new();
        s.toggle_effect(PostEffect::Greyscale);
        assert_eq!(s.effect_flags(), (false, false, true));
        s.toggle_effect(PostEffect::Greyscale);
        assert_eq!(s.effect, PostEffect::None);
        assert_eq!(active(&s), 0);
    }

    #[test]
    fn exposure_never_negative() {
        let mut s = RenderState::new();
        for _ in 0..100 {
            s.adjust_exposure(-EXPOSURE_STEP);
            assert!(s.exposure >= 0.0);
        }
        assert_eq!(s.exposure, 0.0);
        s.adjust_exposure(EXPOSURE_STEP);
        assert!((s.exposure - EXPOSURE_STEP).abs() < 1e-6);
    }

    #[test]
    fn flashlight_first_press_lights_and_clears_flag() {
        let mut s = RenderState::new();
        assert!(s.flashlight);
        assert!(!s.spot_light.is_lit());
        s.toggle_flashlight();
        assert!(!s.flashlight);
        assert_eq!(s.spot_light.diffuse, Vec3::ONE);
        assert_eq!(s.spot_light.specular, Vec3::ONE);
    }

    #[test]
    fn flashlight_two_presses_restore_color() {
        let mut s = RenderState::new();
        s.toggle_flashlight();
        let lit = s.spot_light;
        s.toggle_flashlight();
        s.toggle_flashlight();
        assert_eq!(s.spot_light, lit);

        let mut s = RenderState::new();
        let dark = s.spot_light;
        s.toggle_flashlight();
        s.toggle_flashlight();
        assert_eq!(s.spot_light, dark);
        assert!(s.flashlight);
    }

    #[test]
    fn spot_ambient_stays_dark() {
        let mut s = RenderState::new();
        s.toggle_flashlight();
        assert_eq!(s.spot_light.ambient, Vec3::ZERO);
        assert!(s.spot_light.outer_cut_off < s.spot_light.cut_off);
    }

    #[test]
    fn frozen_shattle_stays_put() {
        let mut s = RenderState::new();
        s.track_shattle(Vec3::new(1.0, 2.0, 3.0));
        s.toggle_anchor();
        s.track_shattle(Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(s.shattle_position, Vec3::new(1.0, 2.0, 3.0));
        s.toggle_anchor();
        s.track_shattle(Vec3::new(9.0, 9.0, 9.0));
        assert_eq!(s.shattle_position, Vec3::splat(9.0));
    }
}
