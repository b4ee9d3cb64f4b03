pub mod bodies;
pub mod controls;
pub mod game;
pub mod geometry;
pub mod orbit;
pub mod resources;
pub mod sequence;
pub mod state;

pub use game::SolarSystem;
