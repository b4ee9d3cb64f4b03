use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Vertex format shared by every pipeline: position, normal, texture coords.
/// 8 floats = 32 bytes stride. Meshes that lack normals or UVs carry zeros.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

/// Primitive assembly for a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    TriangleStrip,
}

/// Where each attribute sits inside an interleaved float array.
/// Offsets and stride are in floats, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: usize,
    pub position: usize,
    pub normal: Option<usize>,
    pub uv: Option<usize>,
}

impl VertexLayout {
    /// `[x y z]`
    pub const POSITION: Self = Self { stride: 3, position: 0, normal: None, uv: None };
    /// `[x y z u v]`
    pub const POSITION_UV: Self = Self { stride: 5, position: 0, normal: None, uv: Some(3) };
    /// `[x y z nx ny nz u v]`
    pub const POSITION_NORMAL_UV: Self =
        Self { stride: 8, position: 0, normal: Some(3), uv: Some(6) };
    /// `[x y z u v nx ny nz]`
    pub const POSITION_UV_NORMAL: Self =
        Self { stride: 8, position: 0, normal: Some(5), uv: Some(3) };
}

/// CPU-side geometry, uploaded once by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    /// Index buffer. `None` draws the vertices in order.
    pub indices: Option<Vec<u32>>,
    pub topology: Topology,
}

impl MeshData {
    /// Unpack an interleaved float array. A trailing partial vertex is dropped.
    pub fn from_interleaved(data: &[f32], layout: VertexLayout) -> Self {
        let vertices = data
            .chunks_exact(layout.stride)
            .map(|v| {
                let position = [v[layout.position], v[layout.position + 1], v[layout.position + 2]];
                let normal = layout.normal.map_or([0.0; 3], |n| [v[n], v[n + 1], v[n + 2]]);
                let uv = layout.uv.map_or([0.0; 2], |t| [v[t], v[t + 1]]);
                MeshVertex { position, normal, uv }
            })
            .collect();
        Self {
            vertices,
            indices: None,
            topology: Topology::TriangleList,
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Number of vertices (or indices, when indexed) one draw consumes.
    pub fn element_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertices.len() as u32,
        }
    }
}

/// Unit-radius UV sphere with outward normals.
/// Used as the stand-in when a model file cannot be loaded.
pub fn uv_sphere(segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for y in 0..=rings {
        let v = y as f32 / rings as f32;
        let theta = v * PI;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let phi = u * TAU;
            let n = [phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            vertices.push(MeshVertex::new(n, n, [u, 1.0 - v]));
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for y in 0..rings {
        for x in 0..segments {
            let i0 = y * stride + x;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            // Counter-clockwise seen from outside
            indices.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
        }
    }

    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::TriangleList,
    }
}
