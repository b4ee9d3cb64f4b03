use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Asset manifest naming every model, texture and cubemap a game loads.
/// Parsed from JSON at startup; paths are relative to `root`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Directory the relative paths below are resolved against.
    #[serde(default)]
    pub root: String,
    /// OBJ models.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    /// 2D image textures.
    #[serde(default)]
    pub textures: Vec<TextureDescriptor>,
    /// Six-face cube maps.
    #[serde(default)]
    pub cubemaps: Vec<CubemapDescriptor>,
}

/// Describes a single OBJ model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Human-readable name (e.g., "earth").
    pub name: String,
    /// Relative path to the .obj file. Materials are looked up next to it.
    pub path: String,
}

/// Describes a single 2D texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    pub name: String,
    pub path: String,
    /// Flip rows on load so v=0 is the bottom of the image (default: true).
    #[serde(default = "default_flip")]
    pub flip_vertically: bool,
}

/// Describes a cube map as six face images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubemapDescriptor {
    pub name: String,
    /// Face paths in +X, -X, +Y, -Y, +Z, -Z order (right, left, top, bottom, front, back).
    pub faces: Vec<String>,
}

fn default_flip() -> bool {
    true
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Join `relative` onto the manifest root.
    pub fn resolve(&self, relative: &str) -> String {
        if self.root.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", self.root.trim_end_matches('/'), relative)
        }
    }

    pub fn model(&self, name: &str) -> Result<&ModelDescriptor, EngineError> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))
    }

    pub fn texture(&self, name: &str) -> Result<&TextureDescriptor, EngineError> {
        self.textures
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))
    }

    /// Look up a cube map; it must list exactly six faces.
    pub fn cubemap(&self, name: &str) -> Result<&CubemapDescriptor, EngineError> {
        let cubemap = self
            .cubemaps
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| EngineError::UnknownAsset(name.to_string()))?;
        if cubemap.faces.len() != 6 {
            return Err(EngineError::CubemapFaces {
                name: cubemap.name.clone(),
                count: cubemap.faces.len(),
            });
        }
        Ok(cubemap)
    }
}
