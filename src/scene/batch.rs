use crate::{
    foundation::core::{Affine, Layer, Vec2},
    scene::drawable::Drawable,
    scene::store::BatchId,
};

/// Transform-bearing group of drawables owned by a [`crate::Scene`].
///
/// Element indices are stable for the lifetime of the batch; effect handlers address
/// elements by index.
#[derive(Clone, Debug)]
pub struct Batch {
    layer: Layer,
    seq: u64,
    elements: Vec<Drawable>,
    local: Affine,
    pub(crate) parent: Option<BatchId>,
}

impl Batch {
    pub(crate) fn new(layer: Layer, seq: u64) -> Self {
        Self {
            layer,
            seq,
            elements: Vec::new(),
            local: Affine::IDENTITY,
            parent: None,
        }
    }

    /// Draw-order bucket.
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Creation sequence number; strictly increasing across the scene's lifetime.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Parent batch whose final transform this batch composes with.
    pub fn parent(&self) -> Option<BatchId> {
        self.parent
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Drawable] {
        &self.elements
    }

    /// Mutable elements in insertion order.
    pub fn elements_mut(&mut self) -> &mut [Drawable] {
        &mut self.elements
    }

    /// Element at `index`.
    pub fn element(&self, index: usize) -> Option<&Drawable> {
        self.elements.get(index)
    }

    /// Mutable element at `index`.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut Drawable> {
        self.elements.get_mut(index)
    }

    /// Append an element and return its index.
    pub fn create_element(&mut self, element: impl Into<Drawable>) -> usize {
        self.elements.push(element.into());
        self.elements.len() - 1
    }

    /// Replace every element.
    pub fn assign_elements(&mut self, elements: impl IntoIterator<Item = Drawable>) {
        self.elements.clear();
        self.elements.extend(elements);
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Return `true` when the batch has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Local transform, applied before the parent's final transform.
    pub fn local_transform(&self) -> Affine {
        self.local
    }

    /// Overwrite the local transform.
    pub fn set_local_transform(&mut self, local: Affine) {
        self.local = local;
    }

    /// Translate the local transform by `delta`.
    pub fn move_by(&mut self, delta: Vec2) {
        self.local = Affine::translate(delta) * self.local;
    }

    /// Scale the local transform about the current element centroid.
    ///
    /// The pivot is recomputed on every call from the live element positions.
    pub fn scale(&mut self, factor: Vec2) {
        let pivot = self.centroid();
        self.local = self.local
            * Affine::translate(pivot)
            * Affine::scale_non_uniform(factor.x, factor.y)
            * Affine::translate(-pivot);
    }

    /// Mean element position, or zero for an empty batch.
    pub fn centroid(&self) -> Vec2 {
        if self.elements.is_empty() {
            return Vec2::ZERO;
        }
        let sum = self
            .elements
            .iter()
            .fold(Vec2::ZERO, |acc, e| acc + e.position());
        sum / self.elements.len() as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/batch.rs"]
mod tests;
