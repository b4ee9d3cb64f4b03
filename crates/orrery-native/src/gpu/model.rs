//! OBJ model loading.

use std::path::Path;

use orrery_engine::{uv_sphere, MeshData, MeshVertex, Topology};

const FALLBACK_SEGMENTS: u32 = 32;
const FALLBACK_RINGS: u32 = 16;

/// Geometry from one OBJ file plus the diffuse map its first material names.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub mesh: MeshData,
    /// Resolved against the OBJ's directory.
    pub diffuse: Option<String>,
}

/// Merge every object in the file into one indexed triangle list.
/// Missing normals point away from the origin; missing UVs are zero.
pub fn mesh_from_models(models: &[tobj::Model]) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        for i in 0..count {
            let p = [mesh.positions[3 * i], mesh.positions[3 * i + 1], mesh.positions[3 * i + 2]];
            let n = if mesh.normals.len() >= 3 * (i + 1) {
                [mesh.normals[3 * i], mesh.normals[3 * i + 1], mesh.normals[3 * i + 2]]
            } else {
                glam::Vec3::from_array(p).normalize_or_zero().to_array()
            };
            let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                [mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(MeshVertex::new(p, n, uv));
        }
        indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::TriangleList,
    }
}

/// Load `path` as triangulated, single-index geometry.
pub fn load_obj(path: &str) -> Result<LoadedModel, tobj::LoadError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("Materials for {path} unavailable: {e}");
        Vec::new()
    });
    let dir = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    let diffuse = models
        .iter()
        .filter_map(|m| m.mesh.material_id)
        .chain(0..materials.len())
        .find_map(|id| materials.get(id)?.diffuse_texture.clone())
        .map(|tex| dir.join(tex).to_string_lossy().into_owned());

    let mesh = mesh_from_models(&models);
    if mesh.vertices.is_empty() {
        return Err(tobj::LoadError::GenericFailure);
    }
    Ok(LoadedModel { mesh, diffuse })
}

/// Load `path`, or log a warning and stand in a unit UV sphere.
pub fn load_or_sphere(path: &str) -> LoadedModel {
    match load_obj(path) {
        Ok(model) => {
            log::info!(
                "Loaded model {path}: {} vertices, {} indices",
                model.mesh.vertices.len(),
                model.mesh.element_count()
            );
            model
        }
        Err(e) => {
            log::warn!("Could not load model {path}: {e}; using a sphere");
            LoadedModel {
                mesh: uv_sphere(FALLBACK_SEGMENTS, FALLBACK_RINGS),
                diffuse: None,
            }
        }
    }
}
