//! Scene graph: layered batches of drawables with reference-counted handles.

/// Batch type.
pub mod batch;
/// Drawable primitives.
pub mod drawable;
/// Scene and options.
pub mod graph;
/// Counted batch handles.
pub mod handle;
pub(crate) mod store;
