use crate::renderer::uniforms::UniformKind;

/// Errors raised while declaring resources or resolving uniform values.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("uniform `{name}` is not declared by program `{program}`")]
    UnknownUniform { name: String, program: &'static str },

    #[error("uniform `{name}` expects {expected:?}, got {actual:?}")]
    UniformKindMismatch {
        name: String,
        expected: UniformKind,
        actual: UniformKind,
    },

    #[error("uniform `{name}` declared twice in program `{program}`")]
    DuplicateUniform { name: String, program: &'static str },

    #[error("uniform block for `{program}` needs {needed} bytes, buffer has {available}")]
    UniformBufferTooSmall {
        program: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("asset `{0}` is missing from the manifest")]
    UnknownAsset(String),

    #[error("cubemap `{name}` needs 6 faces, manifest lists {count}")]
    CubemapFaces { name: String, count: usize },

    #[error("duplicate {kind} id {id}")]
    DuplicateResource { kind: &'static str, id: u32 },

    #[error("mesh `{mesh}` references undeclared texture {texture}")]
    MissingTexture { mesh: &'static str, texture: u32 },

    #[error("malformed asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
