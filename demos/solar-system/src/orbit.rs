//! Per-frame placement of every body. Pure functions of the elapsed time and
//! the scene parameters; no engine state is touched except through
//! [`advance`], which stores the new body positions back into the parameters.

use glam::{Mat4, Vec3};
use orrery_engine::Camera3D;

use crate::bodies::{AsteroidField, SceneParameters};
use crate::state::RenderState;

/// Moon orbit radius around Earth (world units).
pub const MOON_ORBIT_RADIUS: f32 = 3.0;
/// Self-rotation rates in radians per second.
pub const EARTH_SPIN: f32 = 0.5;
pub const MOON_SPIN: f32 = 0.7;
pub const SATURN_SPIN: f32 = 0.1;
/// Uniform scale applied to each rock.
pub const ASTEROID_SCALE: f32 = 0.8;
/// Fixed skew axis the rocks tumble around (normalized before use).
pub const ASTEROID_SPIN_AXIS: Vec3 = Vec3::new(0.4, 0.6, 0.8);
/// Orbit rate multiplier shared by all rocks before the per-index stagger.
const ASTEROID_ORBIT_RATE: f32 = 0.1;

/// Model matrices for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTransforms {
    pub sun: Mat4,
    pub earth: Mat4,
    pub moon: Mat4,
    pub saturn: Mat4,
    pub asteroids: Vec<Mat4>,
}

/// Point on a circle of radius `distance` in the XZ plane.
fn circular(distance: f32, speed: f32, t: f32) -> Vec3 {
    Vec3::new(distance * (t * speed).cos(), 0.0, distance * (t * speed).sin())
}

pub fn earth_position(params: &SceneParameters, t: f32) -> Vec3 {
    circular(params.earth_distance, params.earth_rotation_speed, t)
}

pub fn saturn_position(params: &SceneParameters, t: f32) -> Vec3 {
    circular(params.saturn_distance, params.saturn_rotation_speed, t)
}

/// The moon circles Earth at unit angular speed.
pub fn moon_position(earth: Vec3, t: f32) -> Vec3 {
    earth + circular(MOON_ORBIT_RADIUS, 1.0, t)
}

/// The sun sits at the origin, scaled, spinning about -Y.
pub fn sun_transform(params: &SceneParameters, t: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(params.sun_scale))
        * Mat4::from_axis_angle(Vec3::NEG_Y, params.sun_rotation_speed * t)
}

pub fn earth_transform(params: &SceneParameters, earth: Vec3, t: f32) -> Mat4 {
    Mat4::from_translation(earth)
        * Mat4::from_scale(Vec3::splat(params.earth_scale))
        * Mat4::from_rotation_y(EARTH_SPIN * t)
}

pub fn moon_transform(params: &SceneParameters, earth: Vec3, t: f32) -> Mat4 {
    Mat4::from_translation(moon_position(earth, t))
        * Mat4::from_scale(Vec3::splat(params.moon_scale))
        * Mat4::from_rotation_y(MOON_SPIN * t)
}

pub fn saturn_transform(params: &SceneParameters, saturn: Vec3, t: f32) -> Mat4 {
    Mat4::from_translation(saturn)
        * Mat4::from_scale(Vec3::splat(params.saturn_scale))
        * Mat4::from_rotation_y(SATURN_SPIN * t)
}

/// Offset of asteroid `i` from Saturn's centre.
///
/// The angle is `t · 0.1 · (2π / N) · i`, so higher indices sweep faster;
/// the belt smears into a spiral over time instead of orbiting rigidly.
pub fn asteroid_offset(field: &AsteroidField, i: usize, t: f32) -> Vec3 {
    let n = field.len().max(1) as f32;
    let theta = t * ASTEROID_ORBIT_RATE * (std::f32::consts::TAU / n) * i as f32;
    Vec3::new(
        field.radius[i] * theta.cos(),
        field.vertical[i],
        field.radius[i] * theta.sin(),
    )
}

pub fn asteroid_transform(field: &AsteroidField, i: usize, saturn: Vec3, t: f32) -> Mat4 {
    Mat4::from_translation(saturn + asteroid_offset(field, i, t))
        * Mat4::from_scale(Vec3::splat(ASTEROID_SCALE))
        * Mat4::from_axis_angle(ASTEROID_SPIN_AXIS.normalize(), t * field.phase[i])
}

/// Compute every body's transform at time `t` and record the new Earth and
/// Saturn positions in `params`.
pub fn advance(params: &mut SceneParameters, field: &AsteroidField, t: f32) -> BodyTransforms {
    params.earth_position = earth_position(params, t);
    params.saturn_position = saturn_position(params, t);

    let earth = params.earth_position;
    let saturn = params.saturn_position;
    BodyTransforms {
        sun: sun_transform(params, t),
        earth: earth_transform(params, earth, t),
        moon: moon_transform(params, earth, t),
        saturn: saturn_transform(params, saturn, t),
        asteroids: (0..field.len())
            .map(|i| asteroid_transform(field, i, saturn, t))
            .collect(),
    }
}

/// Point the flashlight along the camera and keep the shattle in tow.
pub fn track_camera(state: &mut RenderState, camera: &Camera3D) {
    state.spot_light.aim(camera.position, camera.front);
    state.track_shattle(camera.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::ASTEROID_SEED;
    use orrery_engine::Rng;

    const EPS: f32 = 1e-3;

    fn field() -> AsteroidField {
        AsteroidField::generate(&SceneParameters::default(), &mut Rng::new(ASTEROID_SEED), 1.5)
    }

    #[test]
    fn earth_stays_on_its_circle() {
        let p = SceneParameters::default();
        for i in 0..50 {
            let t = i as f32 * 7.3;
            let e = earth_position(&p, t);
            assert!(e.y.abs() < EPS);
            assert!((e.length() - p.earth_distance).abs() < EPS, "t={t}: {e}");
        }
    }

    #[test]
    fn moon_stays_three_units_from_earth() {
        let p = SceneParameters::default();
        for i in 0..50 {
            let t = i as f32 * 3.1;
            let e = earth_position(&p, t);
            let m = moon_position(e, t);
            assert!(((m - e).length() - MOON_ORBIT_RADIUS).abs() < EPS, "t={t}");
        }
    }

    #[test]
    fn time_zero_layout() {
        let mut p = SceneParameters::default();
        let f = field();
        let frame = advance(&mut p, &f, 0.0);
        assert!(p.earth_position.abs_diff_eq(Vec3::new(55.0, 0.0, 0.0), EPS));
        assert!(p.saturn_position.abs_diff_eq(Vec3::new(100.0, 0.0, 0.0), EPS));
        assert!(frame.sun.abs_diff_eq(Mat4::from_scale(Vec3::splat(2.0)), 1e-6));
        assert_eq!(frame.asteroids.len(), 200);
    }

    #[test]
    fn transforms_place_bodies() {
        let mut p = SceneParameters::default();
        let t = 12.0;
        let frame = advance(&mut p, &field(), t);
        let origin = |m: &Mat4| m.transform_point3(Vec3::ZERO);
        assert!(origin(&frame.earth).abs_diff_eq(p.earth_position, EPS));
        assert!(origin(&frame.saturn).abs_diff_eq(p.saturn_position, EPS));
        assert!(origin(&frame.moon).abs_diff_eq(moon_position(p.earth_position, t), EPS));
        assert!(origin(&frame.sun).abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn asteroids_ride_with_saturn() {
        let mut p = SceneParameters::default();
        let f = field();
        let t = 40.0;
        let frame = advance(&mut p, &f, t);
        for (i, m) in frame.asteroids.iter().enumerate() {
            let pos = m.transform_point3(Vec3::ZERO);
            let rel = pos - p.saturn_position;
            let planar = Vec3::new(rel.x, 0.0, rel.z).length();
            assert!((planar - f.radius[i]).abs() < EPS, "asteroid {i}");
            assert!((rel.y - f.vertical[i]).abs() < EPS);
        }
    }

    #[test]
    fn first_asteroid_never_moves_along_belt() {
        let f = field();
        let a = asteroid_offset(&f, 0, 0.0);
        let b = asteroid_offset(&f, 0, 1000.0);
        assert!(a.abs_diff_eq(b, EPS));
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let f = field();
        let mut p1 = SceneParameters::default();
        let mut p2 = SceneParameters::default();
        assert_eq!(advance(&mut p1, &f, 9.25), advance(&mut p2, &f, 9.25));
    }

    #[test]
    fn flashlight_follows_camera() {
        let mut state = RenderState::new();
        let mut cam = Camera3D::new(Vec3::new(0.0, 35.0, 0.0));
        cam.look_along(Vec3::new(1.0, 0.0, 0.0));
        track_camera(&mut state, &cam);
        assert_eq!(state.spot_light.position, cam.position);
        assert_eq!(state.spot_light.direction, cam.front);
        assert_eq!(state.shattle_position, cam.position);
    }
}
