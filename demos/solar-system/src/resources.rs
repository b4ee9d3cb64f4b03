//! Programs, meshes and textures the demo draws with, and the uniform block
//! each program declares.

use orrery_engine::{
    AssetManifest, EngineError, MeshDesc, MeshId, PointLight, ProgramDesc, ProgramId,
    ResourceSet, SpotLight, TextureDesc, TextureId, TextureLayout, UniformField, UniformKind,
};

use crate::geometry;

// ── Programs ─────────────────────────────────────────────────────────

pub const SUN_PROGRAM: ProgramId = ProgramId(0);
pub const PLANET_PROGRAM: ProgramId = ProgramId(1);
pub const SKYBOX_PROGRAM: ProgramId = ProgramId(2);
pub const ROCK_PROGRAM: ProgramId = ProgramId(3);
pub const SHATTLE_PROGRAM: ProgramId = ProgramId(4);
pub const POST_PROGRAM: ProgramId = ProgramId(5);

// ── Meshes ───────────────────────────────────────────────────────────

pub const SUN_MESH: MeshId = MeshId(0);
pub const EARTH_MESH: MeshId = MeshId(1);
pub const MOON_MESH: MeshId = MeshId(2);
pub const SATURN_MESH: MeshId = MeshId(3);
pub const ROCK_MESH: MeshId = MeshId(4);
pub const SHATTLE_MESH: MeshId = MeshId(5);
pub const SKYBOX_MESH: MeshId = MeshId(6);
pub const QUAD_MESH: MeshId = MeshId(7);

// ── Textures ─────────────────────────────────────────────────────────

pub const ROCK_DIFFUSE: TextureId = TextureId(0);
pub const ROCK_SPECULAR: TextureId = TextureId(1);
pub const GLASS: TextureId = TextureId(2);
pub const SPACE: TextureId = TextureId(3);

/// Asset names, embedded at compile time.
pub const MANIFEST_JSON: &str = include_str!("../assets/manifest.json");

// ── Uniform blocks ───────────────────────────────────────────────────

const PROJECTION: UniformField = UniformField::new("projection", UniformKind::Mat4);
const VIEW: UniformField = UniformField::new("view", UniformKind::Mat4);
const MODEL: UniformField = UniformField::new("model", UniformKind::Mat4);
const VIEW_POSITION: UniformField = UniformField::new("viewPosition", UniformKind::Vec3);
const FLASHLIGHT: UniformField = UniformField::new("FlashLight", UniformKind::Int);

fn lit_fields(instanced: bool) -> Vec<UniformField> {
    let mut fields = vec![PROJECTION, VIEW];
    if !instanced {
        fields.push(MODEL);
    }
    fields.extend([VIEW_POSITION, FLASHLIGHT]);
    fields.extend_from_slice(&PointLight::FIELDS);
    fields.extend_from_slice(&SpotLight::FIELDS);
    fields
}

pub fn sun_uniforms() -> Vec<UniformField> {
    vec![PROJECTION, VIEW, MODEL]
}

pub fn planet_uniforms() -> Vec<UniformField> {
    lit_fields(false)
}

pub fn rock_uniforms() -> Vec<UniformField> {
    lit_fields(true)
}

pub fn skybox_uniforms() -> Vec<UniformField> {
    vec![PROJECTION, VIEW]
}

pub fn shattle_uniforms() -> Vec<UniformField> {
    vec![
        PROJECTION,
        VIEW,
        MODEL,
        VIEW_POSITION,
        UniformField::new("i", UniformKind::Int),
    ]
}

pub fn post_uniforms() -> Vec<UniformField> {
    vec![
        UniformField::new("hdr", UniformKind::Int),
        UniformField::new("exposure", UniformKind::Float),
        UniformField::new("invert", UniformKind::Int),
        UniformField::new("greyScale", UniformKind::Int),
    ]
}

/// Parse the embedded manifest and point it at `asset_root`.
pub fn load_manifest(asset_root: &str) -> Result<AssetManifest, EngineError> {
    let mut manifest = AssetManifest::from_json(MANIFEST_JSON)?;
    if manifest.root.is_empty() {
        manifest.root = asset_root.to_string();
    } else {
        manifest.root = format!("{}/{}", asset_root.trim_end_matches('/'), manifest.root);
    }
    Ok(manifest)
}

/// Everything the backend must create before the first frame.
pub fn declare(manifest: &AssetManifest) -> Result<ResourceSet, EngineError> {
    use TextureLayout::{Cube, Planar};

    let set = ResourceSet::new()
        .program(
            ProgramDesc::new(SUN_PROGRAM, "sun", include_str!("../shaders/sun.wgsl"))
                .with_uniforms(&sun_uniforms())
                .with_textures(&[Planar]),
        )
        .program(
            ProgramDesc::new(PLANET_PROGRAM, "planet", include_str!("../shaders/planet.wgsl"))
                .with_uniforms(&planet_uniforms())
                .with_textures(&[Planar]),
        )
        .program(
            ProgramDesc::new(SKYBOX_PROGRAM, "skybox", include_str!("../shaders/skybox.wgsl"))
                .with_uniforms(&skybox_uniforms())
                .with_textures(&[Cube]),
        )
        .program(
            ProgramDesc::new(ROCK_PROGRAM, "rocks", include_str!("../shaders/rocks.wgsl"))
                .with_uniforms(&rock_uniforms())
                .with_textures(&[Planar, Planar])
                .instanced(),
        )
        .program(
            ProgramDesc::new(SHATTLE_PROGRAM, "shattle", include_str!("../shaders/shattle.wgsl"))
                .with_uniforms(&shattle_uniforms())
                .with_textures(&[Planar]),
        )
        .program(
            ProgramDesc::new(POST_PROGRAM, "post", include_str!("../shaders/post.wgsl"))
                .with_uniforms(&post_uniforms())
                .with_textures(&[Planar]),
        )
        .mesh(MeshDesc::from_manifest(SUN_MESH, manifest, "sun")?)
        .mesh(MeshDesc::from_manifest(EARTH_MESH, manifest, "earth")?)
        .mesh(MeshDesc::from_manifest(MOON_MESH, manifest, "moon")?)
        .mesh(MeshDesc::from_manifest(SATURN_MESH, manifest, "saturn")?)
        .mesh(MeshDesc::from_data(ROCK_MESH, "rock", geometry::rock()))
        .mesh(MeshDesc::from_data(SHATTLE_MESH, "shattle", geometry::shattle_cube()))
        .mesh(MeshDesc::from_data(SKYBOX_MESH, "skybox", geometry::skybox_cube()))
        .mesh(MeshDesc::from_data(QUAD_MESH, "quad", geometry::fullscreen_quad()))
        .texture(TextureDesc::from_manifest(ROCK_DIFFUSE, manifest, "rock_diffuse")?)
        .texture(TextureDesc::from_manifest(ROCK_SPECULAR, manifest, "rock_specular")?)
        .texture(TextureDesc::from_manifest(GLASS, manifest, "glass")?)
        .texture(TextureDesc::cubemap_from_manifest(SPACE, manifest, "space")?);

    set.validate()?;
    Ok(set)
}
