//! Resource declarations a game hands to the backend once at startup.
//!
//! Everything here is data: shader source text, uniform field lists, mesh
//! arrays or model paths, image paths. The backend owns the GPU objects built
//! from it and the game refers to them only through the typed ids.

use std::collections::HashSet;

use crate::api::types::{MeshId, ProgramId, TextureId};
use crate::assets::manifest::AssetManifest;
use crate::error::EngineError;
use crate::renderer::mesh::MeshData;
use crate::renderer::uniforms::{UniformField, UniformLayout};

/// Dimensionality of a texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureLayout {
    Planar,
    Cube,
}

/// A shader program: one WGSL module with `vs_main` and `fs_main` entry points.
#[derive(Debug, Clone)]
pub struct ProgramDesc {
    pub id: ProgramId,
    pub label: &'static str,
    pub source: &'static str,
    /// Uniform block members in shader declaration order.
    pub uniforms: Vec<UniformField>,
    /// Texture slots in binding order.
    pub textures: Vec<TextureLayout>,
    /// Model matrices come from a per-instance vertex buffer instead of the `model` uniform.
    pub instanced: bool,
}

impl ProgramDesc {
    pub fn new(id: ProgramId, label: &'static str, source: &'static str) -> Self {
        Self {
            id,
            label,
            source,
            uniforms: Vec::new(),
            textures: Vec::new(),
            instanced: false,
        }
    }

    pub fn with_uniforms(mut self, fields: &[UniformField]) -> Self {
        self.uniforms.extend_from_slice(fields);
        self
    }

    pub fn with_textures(mut self, layouts: &[TextureLayout]) -> Self {
        self.textures.extend_from_slice(layouts);
        self
    }

    pub fn instanced(mut self) -> Self {
        self.instanced = true;
        self
    }

    /// Resolve the uniform byte layout.
    pub fn layout(&self) -> Result<UniformLayout, EngineError> {
        UniformLayout::new(self.label, &self.uniforms)
    }
}

/// Default texture bindings for a mesh, used when a draw binds none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub textures: Vec<(u32, TextureId)>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, slot: u32, texture: TextureId) -> Self {
        self.textures.retain(|(s, _)| *s != slot);
        self.textures.push((slot, texture));
        self
    }
}

/// Where a mesh's geometry comes from.
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// Geometry built in code.
    Static(MeshData),
    /// An OBJ file. Its material's diffuse map becomes slot 0 when no
    /// [`Material`] is declared.
    Model { path: String },
}

#[derive(Debug, Clone)]
pub struct MeshDesc {
    pub id: MeshId,
    pub label: &'static str,
    pub source: MeshSource,
    pub material: Material,
}

impl MeshDesc {
    pub fn from_data(id: MeshId, label: &'static str, data: MeshData) -> Self {
        Self {
            id,
            label,
            source: MeshSource::Static(data),
            material: Material::default(),
        }
    }

    /// Declare the manifest model `name`.
    pub fn from_manifest(
        id: MeshId,
        manifest: &AssetManifest,
        name: &'static str,
    ) -> Result<Self, EngineError> {
        let model = manifest.model(name)?;
        Ok(Self {
            id,
            label: name,
            source: MeshSource::Model {
                path: manifest.resolve(&model.path),
            },
            material: Material::default(),
        })
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Image file(s) backing a texture.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    Image { path: String, flip_vertically: bool },
    /// Faces in +X, -X, +Y, -Y, +Z, -Z order. Never flipped.
    Cubemap { faces: [String; 6] },
}

impl TextureSource {
    pub fn layout(&self) -> TextureLayout {
        match self {
            TextureSource::Image { .. } => TextureLayout::Planar,
            TextureSource::Cubemap { .. } => TextureLayout::Cube,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub id: TextureId,
    pub label: &'static str,
    pub source: TextureSource,
}

impl TextureDesc {
    /// Declare the manifest texture `name`.
    pub fn from_manifest(
        id: TextureId,
        manifest: &AssetManifest,
        name: &'static str,
    ) -> Result<Self, EngineError> {
        let texture = manifest.texture(name)?;
        Ok(Self {
            id,
            label: name,
            source: TextureSource::Image {
                path: manifest.resolve(&texture.path),
                flip_vertically: texture.flip_vertically,
            },
        })
    }

    /// Declare the manifest cube map `name`.
    pub fn cubemap_from_manifest(
        id: TextureId,
        manifest: &AssetManifest,
        name: &'static str,
    ) -> Result<Self, EngineError> {
        let cubemap = manifest.cubemap(name)?;
        let faces: [String; 6] = std::array::from_fn(|i| manifest.resolve(&cubemap.faces[i]));
        Ok(Self {
            id,
            label: name,
            source: TextureSource::Cubemap { faces },
        })
    }

    pub fn layout(&self) -> TextureLayout {
        self.source.layout()
    }
}

/// Everything a game draws with.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    pub programs: Vec<ProgramDesc>,
    pub meshes: Vec<MeshDesc>,
    pub textures: Vec<TextureDesc>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, desc: ProgramDesc) -> Self {
        self.programs.push(desc);
        self
    }

    pub fn mesh(mut self, desc: MeshDesc) -> Self {
        self.meshes.push(desc);
        self
    }

    pub fn texture(mut self, desc: TextureDesc) -> Self {
        self.textures.push(desc);
        self
    }

    /// Check ids are unique, the render-target id is not redeclared, every
    /// material references a declared texture, and every program's uniform
    /// layout resolves.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        for p in &self.programs {
            if !seen.insert(p.id) {
                return Err(EngineError::DuplicateResource { kind: "program", id: p.id.0 });
            }
            p.layout()?;
        }

        let mut seen = HashSet::new();
        for t in &self.textures {
            if t.id.is_render_target() || !seen.insert(t.id) {
                return Err(EngineError::DuplicateResource { kind: "texture", id: t.id.0 });
            }
        }

        let mut meshes = HashSet::new();
        for m in &self.meshes {
            if !meshes.insert(m.id) {
                return Err(EngineError::DuplicateResource { kind: "mesh", id: m.id.0 });
            }
            for (_, tex) in &m.material.textures {
                if !seen.contains(tex) {
                    return Err(EngineError::MissingTexture { mesh: m.label, texture: tex.0 });
                }
            }
        }
        Ok(())
    }

    pub fn find_program(&self, id: ProgramId) -> Option<&ProgramDesc> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn find_mesh(&self, id: MeshId) -> Option<&MeshDesc> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn find_texture(&self, id: TextureId) -> Option<&TextureDesc> {
        self.textures.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mesh::uv_sphere;
    use crate::renderer::uniforms::UniformKind;

    fn manifest() -> AssetManifest {
        AssetManifest::from_json(
            r#"{
                "root": "res",
                "models": [ { "name": "moon", "path": "moon.obj" } ],
                "textures": [ { "name": "glass", "path": "glass.jpg" } ],
                "cubemaps": [ { "name": "space", "faces": ["1","2","3","4","5","6"] } ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn manifest_paths_are_resolved() {
        let m = manifest();
        let mesh = MeshDesc::from_manifest(MeshId(0), &m, "moon").unwrap();
        assert!(matches!(mesh.source, MeshSource::Model { ref path } if path == "res/moon.obj"));

        let tex = TextureDesc::from_manifest(TextureId(0), &m, "glass").unwrap();
        assert_eq!(tex.layout(), TextureLayout::Planar);

        let sky = TextureDesc::cubemap_from_manifest(TextureId(1), &m, "space").unwrap();
        match sky.source {
            TextureSource::Cubemap { faces } => assert_eq!(faces[5], "res/6"),
            other => panic!("expected a cubemap, got {other:?}"),
        }
    }

    #[test]
    fn valid_set_passes() {
        let m = manifest();
        let set = ResourceSet::new()
            .program(
                ProgramDesc::new(ProgramId(0), "shattle", "")
                    .with_uniforms(&[UniformField::new("i", UniformKind::Int)])
                    .with_textures(&[TextureLayout::Planar]),
            )
            .texture(TextureDesc::from_manifest(TextureId(0), &m, "glass").unwrap())
            .mesh(
                MeshDesc::from_data(MeshId(0), "ball", uv_sphere(8, 4))
                    .with_material(Material::new().with_texture(0, TextureId(0))),
            );
        set.validate().unwrap();
        assert!(set.find_program(ProgramId(0)).is_some());
        assert!(set.find_mesh(MeshId(1)).is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let set = ResourceSet::new()
            .mesh(MeshDesc::from_data(MeshId(3), "a", MeshData::default()))
            .mesh(MeshDesc::from_data(MeshId(3), "b", MeshData::default()));
        assert!(matches!(
            set.validate(),
            Err(EngineError::DuplicateResource { kind: "mesh", id: 3 })
        ));
    }

    #[test]
    fn render_target_id_is_reserved() {
        let set = ResourceSet::new().texture(TextureDesc {
            id: TextureId::HDR_COLOR,
            label: "hdr",
            source: TextureSource::Image { path: String::new(), flip_vertically: false },
        });
        assert!(matches!(set.validate(), Err(EngineError::DuplicateResource { .. })));
    }

    #[test]
    fn material_needs_declared_texture() {
        let set = ResourceSet::new().mesh(
            MeshDesc::from_data(MeshId(0), "rock", MeshData::default())
                .with_material(Material::new().with_texture(1, TextureId(9))),
        );
        assert!(matches!(
            set.validate(),
            Err(EngineError::MissingTexture { mesh: "rock", texture: 9 })
        ));
    }

    #[test]
    fn bad_uniform_layout_fails_validation() {
        let set = ResourceSet::new().program(ProgramDesc::new(ProgramId(0), "p", "").with_uniforms(&[
            UniformField::new("i", UniformKind::Int),
            UniformField::new("i", UniformKind::Float),
        ]));
        assert!(matches!(set.validate(), Err(EngineError::DuplicateUniform { .. })));
    }
}
