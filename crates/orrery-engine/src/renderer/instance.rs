use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-instance vertex data: one column-major model matrix.
/// 16 floats = 64 bytes stride, bound as vertex attributes 3..=6.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelInstance {
    pub model: [[f32; 4]; 4],
}

impl ModelInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for ModelInstance {
    fn default() -> Self {
        Mat4::IDENTITY.into()
    }
}

impl From<Mat4> for ModelInstance {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn instance_stride() {
        assert_eq!(std::mem::size_of::<ModelInstance>(), ModelInstance::STRIDE_BYTES);
    }

    #[test]
    fn matrix_round_trip_keeps_translation() {
        let m = Mat4::from_translation(Vec3::new(100.0, 1.0, -2.0));
        let inst = ModelInstance::from(m);
        assert_eq!(inst.model[3], [100.0, 1.0, -2.0, 1.0]);
        assert_eq!(inst.matrix(), m);
    }
}
