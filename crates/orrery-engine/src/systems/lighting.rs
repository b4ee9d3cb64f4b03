//! Point and spot light blocks for Phong-lit 3D programs.
//!
//! Lights are plain values. Games keep them in their own state, mutate them
//! per frame (spot light follows the camera, colors follow toggles) and write
//! them into a program's frame uniforms under the `pointLight.*` /
//! `spotLight.*` names the shaders declare.

use glam::Vec3;

use crate::renderer::uniforms::{UniformField, UniformKind, UniformSet};

/// Distance falloff: `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }

    /// Light reaching distance `d`, as a multiplier in (0, 1].
    pub fn factor(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }
}

impl Default for Attenuation {
    /// Roughly a 50-unit reach.
    fn default() -> Self {
        Self::new(1.0, 0.09, 0.032)
    }
}

/// Omnidirectional light with quadratic falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// Uniform members in shader declaration order.
    pub const FIELDS: [UniformField; 7] = [
        UniformField::new("pointLight.position", UniformKind::Vec3),
        UniformField::new("pointLight.ambient", UniformKind::Vec3),
        UniformField::new("pointLight.diffuse", UniformKind::Vec3),
        UniformField::new("pointLight.specular", UniformKind::Vec3),
        UniformField::new("pointLight.constant", UniformKind::Float),
        UniformField::new("pointLight.linear", UniformKind::Float),
        UniformField::new("pointLight.quadratic", UniformKind::Float),
    ];

    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            attenuation: Attenuation::default(),
        }
    }

    pub fn with_colors(mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn write_uniforms(&self, set: &mut UniformSet) {
        set.set("pointLight.position", self.position)
            .set("pointLight.ambient", self.ambient)
            .set("pointLight.diffuse", self.diffuse)
            .set("pointLight.specular", self.specular)
            .set("pointLight.constant", self.attenuation.constant)
            .set("pointLight.linear", self.attenuation.linear)
            .set("pointLight.quadratic", self.attenuation.quadratic);
    }
}

/// Cone-limited light with a soft edge between `cut_off` and `outer_cut_off`.
/// Both cut-offs are cosines, so a wider cone has the smaller value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    pub cut_off: f32,
    pub outer_cut_off: f32,
}

impl SpotLight {
    /// Uniform members in shader declaration order.
    pub const FIELDS: [UniformField; 10] = [
        UniformField::new("spotLight.position", UniformKind::Vec3),
        UniformField::new("spotLight.direction", UniformKind::Vec3),
        UniformField::new("spotLight.ambient", UniformKind::Vec3),
        UniformField::new("spotLight.diffuse", UniformKind::Vec3),
        UniformField::new("spotLight.specular", UniformKind::Vec3),
        UniformField::new("spotLight.constant", UniformKind::Float),
        UniformField::new("spotLight.linear", UniformKind::Float),
        UniformField::new("spotLight.quadratic", UniformKind::Float),
        UniformField::new("spotLight.cutOff", UniformKind::Float),
        UniformField::new("spotLight.outerCutOff", UniformKind::Float),
    ];

    /// A dark spot light with the given cone half-angles in degrees.
    /// The angles may be passed in either order; the wider one becomes the outer edge.
    pub fn with_cone_degrees(inner: f32, outer: f32) -> Self {
        let (inner, outer) = if inner <= outer { (inner, outer) } else { (outer, inner) };
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            attenuation: Attenuation::default(),
            cut_off: inner.to_radians().cos(),
            outer_cut_off: outer.to_radians().cos(),
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    /// Place the light at `position` shining along `direction`.
    pub fn aim(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        self.direction = direction;
    }

    /// Set diffuse and specular to a grey of `intensity`. Ambient is left alone.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.diffuse = Vec3::splat(intensity);
        self.specular = Vec3::splat(intensity);
    }

    /// Whether any light is emitted at all.
    pub fn is_lit(&self) -> bool {
        self.diffuse != Vec3::ZERO || self.specular != Vec3::ZERO || self.ambient != Vec3::ZERO
    }

    pub fn write_uniforms(&self, set: &mut UniformSet) {
        set.set("spotLight.position", self.position)
            .set("spotLight.direction", self.direction)
            .set("spotLight.ambient", self.ambient)
            .set("spotLight.diffuse", self.diffuse)
            .set("spotLight.specular", self.specular)
            .set("spotLight.constant", self.attenuation.constant)
            .set("spotLight.linear", self.attenuation.linear)
            .set("spotLight.quadratic", self.attenuation.quadratic)
            .set("spotLight.cutOff", self.cut_off)
            .set("spotLight.outerCutOff", self.outer_cut_off);
    }
}
