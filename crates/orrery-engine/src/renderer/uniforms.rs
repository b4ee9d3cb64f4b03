//! Typed uniform values and per-program uniform layouts.
//!
//! Games address uniforms by their shader-facing names (`"pointLight.position"`,
//! `"exposure"`, ...). Each program declares its uniform block as an ordered
//! field list; [`UniformLayout`] turns that list into a name→offset table once,
//! at registration time, so per-frame writes are a lookup plus a copy.
//!
//! Offsets follow the WGSL uniform address-space rules for a flat struct of
//! `i32`, `f32`, `vec3<f32>` and `mat4x4<f32>` members.

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::error::EngineError;

/// Scalar/vector/matrix kind of a uniform member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Int,
    Float,
    Vec3,
    Mat4,
}

impl UniformKind {
    /// Required alignment in bytes.
    pub const fn align(self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec3 | UniformKind::Mat4 => 16,
        }
    }

    /// Size in bytes.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Float => 4,
            UniformKind::Vec3 => 12,
            UniformKind::Mat4 => 64,
        }
    }
}

/// A single uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Write the value's bytes at the start of `out`.
    fn write_bytes(&self, out: &mut [u8]) {
        match self {
            UniformValue::Int(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            UniformValue::Float(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            UniformValue::Vec3(v) => {
                out[..12].copy_from_slice(bytemuck::cast_slice(&v.to_array()))
            }
            UniformValue::Mat4(m) => {
                out[..64].copy_from_slice(bytemuck::cast_slice(&m.to_cols_array()))
            }
        }
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Int(v as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

/// Named uniform values in insertion order.
/// Setting a name twice replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    values: Vec<(&'static str, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<UniformValue>) -> &mut Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// Copy every value from `other`, overriding same-named entries.
    pub fn merge(&mut self, other: &UniformSet) {
        for (name, value) in &other.values {
            self.set(name, *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One member of a program's uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformField {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformField {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Byte layout of a program's uniform block, resolved once per program.
#[derive(Debug, Clone)]
pub struct UniformLayout {
    program: &'static str,
    slots: HashMap<&'static str, (usize, UniformKind)>,
    size: usize,
}

impl UniformLayout {
    /// Resolve offsets for `fields`, declared in shader struct order.
    pub fn new(program: &'static str, fields: &[UniformField]) -> Result<Self, EngineError> {
        let mut slots = HashMap::with_capacity(fields.len());
        let mut cursor = 0usize;
        for field in fields {
            let offset = align_to(cursor, field.kind.align());
            if slots.insert(field.name, (offset, field.kind)).is_some() {
                return Err(EngineError::DuplicateUniform {
                    name: field.name.to_string(),
                    program,
                });
            }
            cursor = offset + field.kind.size();
        }
        Ok(Self {
            program,
            slots,
            // Struct size rounds up to its largest member alignment (16 for uniform blocks)
            size: align_to(cursor.max(16), 16),
        })
    }

    /// Block size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.slots.get(name).map(|(offset, _)| *offset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Pack `set` into `out`. Fields absent from `set` keep their bytes.
    pub fn write(&self, set: &UniformSet, out: &mut [u8]) -> Result<(), EngineError> {
        if out.len() < self.size {
            return Err(EngineError::UniformBufferTooSmall {
                program: self.program,
                needed: self.size,
                available: out.len(),
            });
        }
        for (name, value) in set.iter() {
            let (offset, kind) = self.slots.get(name).copied().ok_or_else(|| {
                EngineError::UnknownUniform {
                    name: name.to_string(),
                    program: self.program,
                }
            })?;
            if value.kind() != kind {
                return Err(EngineError::UniformKindMismatch {
                    name: name.to_string(),
                    expected: kind,
                    actual: value.kind(),
                });
            }
            value.write_bytes(&mut out[offset..offset + kind.size()]);
        }
        Ok(())
    }
}

fn align_to(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_layout() -> UniformLayout {
        UniformLayout::new(
            "lit",
            &[
                UniformField::new("model", UniformKind::Mat4),
                UniformField::new("viewPosition", UniformKind::Vec3),
                UniformField::new("pointLight.constant", UniformKind::Float),
                UniformField::new("pointLight.position", UniformKind::Vec3),
                UniformField::new("FlashLight", UniformKind::Int),
            ],
        )
        .unwrap()
    }

    #[test]
    fn offsets_follow_uniform_alignment() {
        let layout = lit_layout();
        assert_eq!(layout.offset_of("model"), Some(0));
        assert_eq!(layout.offset_of("viewPosition"), Some(64));
        // A scalar packs into the vec3's trailing four bytes
        assert_eq!(layout.offset_of("pointLight.constant"), Some(76));
        assert_eq!(layout.offset_of("pointLight.position"), Some(80));
        assert_eq!(layout.offset_of("FlashLight"), Some(92));
        assert_eq!(layout.size(), 96);
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = UniformLayout::new(
            "dup",
            &[
                UniformField::new("i", UniformKind::Int),
                UniformField::new("i", UniformKind::Int),
            ],
        );
        assert!(matches!(err, Err(EngineError::DuplicateUniform { .. })));
    }

    #[test]
    fn write_packs_values() {
        let layout = lit_layout();
        let mut set = UniformSet::new();
        set.set("pointLight.position", Vec3::new(1.0, 2.0, 3.0))
            .set("FlashLight", true)
            .set("pointLight.constant", 1.0f32);

        let mut bytes = vec![0u8; layout.size()];
        layout.write(&set, &mut bytes).unwrap();

        let floats: &[f32] = bytemuck::cast_slice(&bytes);
        assert_eq!(&floats[20..23], &[1.0, 2.0, 3.0]);
        assert_eq!(floats[19], 1.0);
        let ints: &[i32] = bytemuck::cast_slice(&bytes);
        assert_eq!(ints[23], 1);
    }

    #[test]
    fn write_rejects_unknown_name() {
        let layout = lit_layout();
        let mut set = UniformSet::new();
        set.set("exposure", 1.0f32);
        let mut bytes = vec![0u8; layout.size()];
        let err = layout.write(&set, &mut bytes);
        assert!(matches!(err, Err(EngineError::UnknownUniform { .. })));
    }

    #[test]
    fn write_rejects_kind_mismatch() {
        let layout = lit_layout();
        let mut set = UniformSet::new();
        set.set("viewPosition", 3.0f32);
        let mut bytes = vec![0u8; layout.size()];
        let err = layout.write(&set, &mut bytes);
        assert!(matches!(err, Err(EngineError::UniformKindMismatch { .. })));
    }

    #[test]
    fn write_rejects_short_buffer() {
        let layout = lit_layout();
        let mut bytes = vec![0u8; 16];
        let err = layout.write(&UniformSet::new(), &mut bytes);
        assert!(matches!(err, Err(EngineError::UniformBufferTooSmall { .. })));
    }

    #[test]
    fn set_replaces_and_merges() {
        let mut base = UniformSet::new();
        base.set("exposure", 1.0f32).set("hdr", false);
        let mut over = UniformSet::new();
        over.set("hdr", true).set("i", 1);
        base.merge(&over);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get("hdr"), Some(UniformValue::Int(1)));
        assert_eq!(base.get("exposure"), Some(UniformValue::Float(1.0)));
    }
}
