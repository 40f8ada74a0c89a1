//! Effect templates and their playback against a [`crate::Scene`].

pub mod effect;
pub mod handlers;
pub mod instance;
pub mod manager;
