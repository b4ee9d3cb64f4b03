pub mod manifest;
pub mod resources;
