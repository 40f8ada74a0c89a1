//! Boundary to the external rendering backend.
//!
//! The scene only guarantees draw order and world transforms; rasterisation is the
//! backend's job.

/// Render target trait, render states and a recording target.
pub mod target;
