use glam::{Mat4, Vec3};

/// Default yaw in degrees (looking down -Z).
pub const YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const PITCH: f32 = 0.0;
/// Default movement speed in world units per second.
pub const SPEED: f32 = 2.5;
/// Degrees of rotation per unit of mouse motion.
pub const SENSITIVITY: f32 = 0.1;
/// Default vertical field of view in degrees.
pub const ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

/// Direction of a keyboard-driven camera translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-flying perspective camera driven by Euler angles.
/// Produces the view and projection matrices for every 3D pass.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    /// Viewing direction. Usually unit length; camera presets may store an
    /// un-normalized direction (see [`Camera3D::look_along`]).
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees, kept within ±89.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl Camera3D {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// View matrix looking from `position` along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        let dir = self.front.try_normalize().unwrap_or(Vec3::NEG_Z);
        Mat4::look_to_rh(self.position, dir, self.up)
    }

    /// Perspective projection with a 0..1 depth range.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, near, far)
    }

    /// Translate along the camera basis. `dt` is the frame delta in seconds.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let forward = self.front.try_normalize().unwrap_or(Vec3::NEG_Z);
        match direction {
            CameraMovement::Forward => self.position += forward * velocity,
            CameraMovement::Backward => self.position -= forward * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Rotate by a mouse delta. Positive `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch + dy * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrow or widen the field of view. Positive `dy` zooms in.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Point the camera along `direction`, storing it as `front` unchanged.
    ///
    /// Yaw and pitch are derived from the direction so later mouse motion
    /// continues from the new heading. When the direction is parallel to
    /// world-up the previous right vector is kept.
    pub fn look_along(&mut self, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else {
            return;
        };
        self.front = direction;
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        if let Some(right) = dir.cross(self.world_up).try_normalize() {
            self.right = right;
        }
        self.up = self.right.cross(dir).try_normalize().unwrap_or(self.world_up);
    }

    /// Move to `position` and look at `target`.
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.look_along(target - position);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
