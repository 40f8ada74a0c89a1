/// Keyframe tracks and their interpolation rules.
pub mod keyframes;
