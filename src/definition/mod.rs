//! Data-driven effect definitions (JSON) and the texture registry they populate.

pub mod builder;
pub mod model;
pub mod textures;
