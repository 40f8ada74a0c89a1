use std::rc::{Rc, Weak};

use crate::{
    foundation::core::{Layer, Vec2},
    scene::batch::Batch,
    scene::graph::{Scene, SceneShared},
    scene::store::BatchId,
};

/// Reference-counted accessor to a [`Batch`] inside a [`Scene`].
///
/// Lifecycle:
/// - created by [`Scene::create_batch`] and friends with one reference;
/// - `clone` adds a reference, Rust moves transfer it unchanged;
/// - `drop` (or [`ItemHandle::reset`]) removes one, and the batch is deleted once the
///   count reaches zero *and* [`ItemHandle::delete_later`] was requested.
///
/// The count only triggers deletion; the scene keeps owning the storage. Every access
/// re-resolves the generation-checked id, so a handle to a deleted batch simply stops
/// being [valid](ItemHandle::is_valid).
pub struct ItemHandle {
    scene: Weak<SceneShared>,
    id: Option<BatchId>,
}

impl ItemHandle {
    /// Handle bound to nothing.
    pub fn unbound() -> Self {
        Self {
            scene: Weak::new(),
            id: None,
        }
    }

    /// Wrap a reference that was already counted for `id`.
    pub(crate) fn adopt(shared: &Rc<SceneShared>, id: BatchId) -> Self {
        Self {
            scene: Rc::downgrade(shared),
            id: Some(id),
        }
    }

    fn shared(&self) -> Option<(Rc<SceneShared>, BatchId)> {
        Some((self.scene.upgrade()?, self.id?))
    }

    /// Batch id, if bound.
    pub fn id(&self) -> Option<BatchId> {
        self.id
    }

    /// Return `true` when the handle was bound to a scene batch at some point.
    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    /// Return `true` while the scene is alive and the batch still exists.
    pub fn is_valid(&self) -> bool {
        self.shared().is_some_and(|(shared, id)| shared.exists(id))
    }

    /// Scene owning the batch.
    pub fn scene(&self) -> Option<Scene> {
        self.scene.upgrade().map(|shared| Scene { shared })
    }

    /// Request (or cancel) deletion once the last handle is released.
    ///
    /// Returns `false` when the batch no longer exists.
    pub fn delete_later(&self, value: bool) -> bool {
        self.shared()
            .is_some_and(|(shared, id)| shared.set_delete_later(id, value))
    }

    /// Whether deletion was requested.
    pub fn is_delete_later(&self) -> bool {
        self.shared()
            .and_then(|(shared, id)| shared.ref_state(id))
            .is_some_and(|s| s.delete_later)
    }

    /// Current reference count, `0` when invalid.
    pub fn refcount(&self) -> u32 {
        self.shared()
            .and_then(|(shared, id)| shared.ref_state(id))
            .map_or(0, |s| s.count)
    }

    /// Layer of the batch.
    pub fn layer(&self) -> Option<Layer> {
        self.with(Batch::layer)
    }

    /// Run `f` on the batch.
    pub fn with<R>(&self, f: impl FnOnce(&Batch) -> R) -> Option<R> {
        let (shared, id) = self.shared()?;
        let store = shared.store();
        store.get(id).map(f)
    }

    /// Run `f` on the batch mutably.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Batch) -> R) -> Option<R> {
        let (shared, id) = self.shared()?;
        let mut store = shared.store_mut();
        store.get_mut(id).map(f)
    }

    /// Translate the batch's local transform.
    pub fn move_by(&self, delta: Vec2) -> bool {
        self.with_mut(|b| b.move_by(delta)).is_some()
    }

    /// Scale the batch about its element centroid.
    pub fn scale(&self, factor: Vec2) -> bool {
        self.with_mut(|b| b.scale(factor)).is_some()
    }

    /// Release this reference now and become unbound.
    pub fn reset(&mut self) {
        *self = Self::unbound();
    }
}

impl Default for ItemHandle {
    fn default() -> Self {
        Self::unbound()
    }
}

impl Clone for ItemHandle {
    fn clone(&self) -> Self {
        if let Some((shared, id)) = self.shared() {
            shared.retain(id);
        }
        Self {
            scene: self.scene.clone(),
            id: self.id,
        }
    }
}

impl Drop for ItemHandle {
    fn drop(&mut self) {
        if let Some((shared, id)) = self.shared() {
            shared.release(id);
        }
    }
}

impl std::fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemHandle")
            .field("id", &self.id)
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/handle.rs"]
mod tests;
