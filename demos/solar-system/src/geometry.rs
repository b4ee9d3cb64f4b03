//! Static meshes built in code: the rock, the shattle cube, the skybox cube
//! and the fullscreen quad.

use glam::Vec3;
use orrery_engine::{MeshData, MeshVertex, Topology, VertexLayout};

/// Irregular four-faced rock. `[x y z u v nx ny nz]` per vertex.
#[rustfmt::skip]
const ROCK_VERTICES: [f32; 96] = [
    // front
    -0.5, -0.5,  0.5,   0.0, 0.0,    0.0,   0.25,  1.0,
     0.5, -0.5,  0.5,   1.0, 0.0,    0.0,   0.25,  1.0,
     0.0,  0.5,  0.25,  0.5, 1.0,    0.0,   0.25,  1.0,
    // right
     0.5, -0.5,  0.5,   1.0, 0.0,    1.0,   0.375, -0.5,
     0.0, -0.5, -0.5,   0.5, 0.3,    1.0,   0.375, -0.5,
     0.0,  0.5,  0.25,  0.5, 1.0,    1.0,   0.375, -0.5,
    // left
     0.0, -0.5, -0.5,   0.5, 0.3,   -1.0,  -0.375, -0.5,
    -0.5, -0.5,  0.5,   0.0, 0.0,   -1.0,  -0.375, -0.5,
     0.0,  0.5,  0.25,  0.5, 1.0,   -1.0,  -0.375, -0.5,
    // bottom
    -0.5, -0.5,  0.5,   0.0, 0.0,    0.0,  -1.0,   0.0,
     0.0, -0.5, -0.5,   0.5, 0.3,    0.0,  -1.0,   0.0,
     0.5, -0.5,  0.5,   1.0, 0.0,    0.0,  -1.0,   0.0,
];

#[rustfmt::skip]
const ROCK_INDICES: [u32; 12] = [
    0, 1, 2,
    3, 4, 5,
    6, 7, 8,
    9, 10, 11,
];

/// Fullscreen strip in clip space. `[x y z u v]`, v up.
#[rustfmt::skip]
const QUAD_VERTICES: [f32; 20] = [
    -1.0,  1.0, 0.0,   0.0, 1.0,
    -1.0, -1.0, 0.0,   0.0, 0.0,
     1.0,  1.0, 0.0,   1.0, 1.0,
     1.0, -1.0, 0.0,   1.0, 0.0,
];

/// Cube faces as (outward normal, u axis, v axis) with `u × v = normal`.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// The 12-vertex, 4-triangle rock drawn for every asteroid.
pub fn rock() -> MeshData {
    MeshData::from_interleaved(&ROCK_VERTICES, VertexLayout::POSITION_UV_NORMAL)
        .with_indices(ROCK_INDICES.to_vec())
}

/// Axis-aligned cube of edge `size` centred on the origin: 36 vertices,
/// counter-clockwise seen from outside, one full UV square per face.
pub fn cube(size: f32) -> MeshData {
    let half = size * 0.5;
    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in CUBE_FACES {
        let corner = |a: f32, b: f32| {
            let p = (n + u * (2.0 * a - 1.0) + v * (2.0 * b - 1.0)) * half;
            MeshVertex::new(p.to_array(), n.to_array(), [a, b])
        };
        let (c00, c10, c11, c01) = (corner(0.0, 0.0), corner(1.0, 0.0), corner(1.0, 1.0), corner(0.0, 1.0));
        vertices.extend_from_slice(&[c00, c10, c11, c11, c01, c00]);
    }
    MeshData {
        vertices,
        indices: None,
        topology: Topology::TriangleList,
    }
}

/// Unit shattle cube (edge 1).
pub fn shattle_cube() -> MeshData {
    cube(1.0)
}

/// Skybox cube spanning ±1. Sampled by direction, so normals and UVs go unused.
pub fn skybox_cube() -> MeshData {
    cube(2.0)
}

/// Four-vertex strip covering the viewport.
pub fn fullscreen_quad() -> MeshData {
    MeshData::from_interleaved(&QUAD_VERTICES, VertexLayout::POSITION_UV)
        .with_topology(Topology::TriangleStrip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: &MeshVertex) -> Vec3 {
        Vec3::from_array(v.position)
    }

    #[test]
    fn rock_is_four_triangles() {
        let rock = rock();
        assert_eq!(rock.vertices.len(), 12);
        assert_eq!(rock.element_count(), 12);
        assert_eq!(rock.vertices[3].normal, [1.0, 0.375, -0.5]);
        assert_eq!(rock.vertices[4].uv, [0.5, 0.3]);
    }

    #[test]
    fn rock_faces_wind_outward() {
        let rock = rock();
        let idx = rock.indices.unwrap();
        for tri in idx.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| pos(&rock.vertices[tri[k] as usize]));
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Rock is roughly centred on (0, -0.1, 0.1)
            assert!(n.dot(centroid - Vec3::new(0.0, -0.1, 0.1)) > 0.0, "triangle {tri:?}");
        }
    }

    #[test]
    fn cube_has_36_outward_vertices() {
        let cube = shattle_cube();
        assert_eq!(cube.vertices.len(), 36);
        assert!(cube.indices.is_none());
        for tri in cube.vertices.chunks(3) {
            let [a, b, c] = [pos(&tri[0]), pos(&tri[1]), pos(&tri[2])];
            let n = (b - a).cross(c - a).normalize();
            let face = Vec3::from_array(tri[0].normal);
            assert!(n.abs_diff_eq(face, 1e-5), "{n} vs {face}");
            assert!(((a + b + c) / 3.0).dot(face) > 0.0);
        }
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn skybox_spans_unit_clip_cube() {
        let sky = skybox_cube();
        assert_eq!(sky.vertices.len(), 36);
        for v in &sky.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 1.0).abs() < 1e-6));
        }
    }

    #[test]
    fn quad_is_a_strip() {
        let quad = fullscreen_quad();
        assert_eq!(quad.topology, Topology::TriangleStrip);
        assert_eq!(quad.element_count(), 4);
        assert_eq!(quad.vertices[0].uv, [0.0, 1.0]);
    }
}
