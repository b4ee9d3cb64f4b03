/// Handle for a shader program declared by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Handle for a mesh (static geometry or a loaded model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Handle for a 2D texture or cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Color attachment of the offscreen HDR target.
    /// Owned by the backend and recreated on resize; games may only sample it.
    pub const HDR_COLOR: TextureId = TextureId(u32::MAX);

    pub fn is_render_target(self) -> bool {
        self == Self::HDR_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hdr_color_is_reserved() {
        assert!(TextureId::HDR_COLOR.is_render_target());
        assert!(!TextureId(0).is_render_target());
    }
}
