//! Scene constants: body scales, orbital distances and speeds, plus the
//! asteroid belt generated once at startup.
//!
//! Distances are in world units, angular speeds in radians per second.

use glam::Vec3;
use orrery_engine::Rng;

/// Fixed seed so every run lays out the same belt.
pub const ASTEROID_SEED: u64 = 0x5A7_0000_0200;

/// Immutable-after-init description of the scene.
/// `earth_position` and `saturn_position` are the only fields that move;
/// the frame updater rewrites them every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParameters {
    pub sun_scale: f32,
    pub sun_rotation_speed: f32,

    pub earth_scale: f32,
    pub earth_position: Vec3,
    pub earth_rotation_speed: f32,
    pub earth_distance: f32,

    pub moon_scale: f32,
    /// Declared for completeness; the moon spins at a fixed 0.7 rad/s.
    pub moon_rotation_speed: f32,

    pub saturn_scale: f32,
    pub saturn_position: Vec3,
    pub saturn_rotation_speed: f32,
    pub saturn_distance: f32,

    pub asteroid_count: usize,
    /// Mean belt radius around Saturn.
    pub belt_radius: f32,
    /// Radial jitter bound, integer steps in `[-radial_offset, radial_offset]`.
    pub radial_offset: i32,
    /// Vertical jitter bound, integer steps in `[-vertical_offset, vertical_offset]`.
    pub vertical_offset: i32,
}

impl Default for SceneParameters {
    fn default() -> Self {
        let earth_position = Vec3::new(55.0, 0.0, 0.0);
        let saturn_position = Vec3::new(100.0, 0.0, 0.0);
        Self {
            sun_scale: 2.0,
            sun_rotation_speed: 0.03,

            earth_scale: 0.6,
            earth_position,
            earth_rotation_speed: 0.04,
            earth_distance: earth_position.x,

            moon_scale: 0.2,
            moon_rotation_speed: 0.3,

            saturn_scale: 1.35,
            saturn_position,
            saturn_rotation_speed: 0.01,
            saturn_distance: saturn_position.x,

            asteroid_count: 200,
            belt_radius: 20.0,
            radial_offset: 3,
            vertical_offset: 1,
        }
    }
}

// ── Asteroid belt ────────────────────────────────────────────────────

/// Per-asteroid jitter, one entry per asteroid, never resized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AsteroidField {
    /// Belt radius plus integer jitter.
    pub radius: Vec<f32>,
    /// Integer vertical displacement.
    pub vertical: Vec<f32>,
    /// Spin rate seed in radians per second.
    pub phase: Vec<f32>,
}

impl AsteroidField {
    /// Roll the belt.
    ///
    /// `seed_time` is the clock reading at startup: each spin seed is
    /// `radians(seed_time · k · 0.1)` for a random integer `k` in `[0, 100]`,
    /// so a belt generated at time zero does not spin.
    pub fn generate(params: &SceneParameters, rng: &mut Rng, seed_time: f32) -> Self {
        let n = params.asteroid_count;
        let mut field = Self {
            radius: Vec::with_capacity(n),
            vertical: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let dr = rng.range_inclusive(-params.radial_offset, params.radial_offset);
            let dy = rng.range_inclusive(-params.vertical_offset, params.vertical_offset);
            let k = rng.range_inclusive(0, 100);
            field.radius.push(params.belt_radius + dr as f32);
            field.vertical.push(dy as f32);
            field.phase.push((seed_time * k as f32 * 0.1).to_radians());
        }
        log::debug!("Generated {n} asteroids around r={}", params.belt_radius);
        field
    }

    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }
}
