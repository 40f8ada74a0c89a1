use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

use crate::{
    foundation::core::{Affine, Layer},
    foundation::error::{FxError, FxResult},
    render::target::{RenderStates, RenderTarget},
    scene::batch::Batch,
    scene::drawable::Drawable,
    scene::handle::ItemHandle,
    scene::store::{BatchId, BatchStore, RefState, RefTable},
};

fn default_max_parent_depth() -> usize {
    64
}

/// Tunables for a [`Scene`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneOptions {
    /// Longest parent chain followed when composing transforms.
    #[serde(default = "default_max_parent_depth")]
    pub max_parent_depth: usize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            max_parent_depth: default_max_parent_depth(),
        }
    }
}

pub(crate) struct SceneShared {
    store: RefCell<BatchStore>,
    refs: RefCell<RefTable>,
    // Deletions triggered while `store` was borrowed; applied on the next access.
    pending: RefCell<Vec<BatchId>>,
    options: SceneOptions,
}

impl SceneShared {
    pub(crate) fn store(&self) -> Ref<'_, BatchStore> {
        if !self.pending.borrow().is_empty()
            && let Ok(mut store) = self.store.try_borrow_mut()
        {
            self.flush_pending(&mut store);
        }
        self.store.borrow()
    }

    pub(crate) fn store_mut(&self) -> RefMut<'_, BatchStore> {
        let mut store = self.store.borrow_mut();
        self.flush_pending(&mut store);
        store
    }

    fn flush_pending(&self, store: &mut BatchStore) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for id in pending {
            self.delete_locked(store, id);
        }
    }

    /// Batches whose deletion is queued count as gone.
    pub(crate) fn exists(&self, id: BatchId) -> bool {
        self.refs
            .borrow()
            .get(id)
            .is_some_and(|state| !state.is_doomed())
    }

    pub(crate) fn ref_state(&self, id: BatchId) -> Option<RefState> {
        self.refs.borrow().get(id).copied()
    }

    /// Add one reference; `false` when the batch no longer exists.
    pub(crate) fn retain(&self, id: BatchId) -> bool {
        match self.refs.borrow_mut().get_mut(id) {
            Some(state) if !state.is_doomed() => {
                state.count += 1;
                true
            }
            _ => false,
        }
    }

    /// Drop one reference, deleting the batch when it was the last one and
    /// deletion was requested.
    pub(crate) fn release(&self, id: BatchId) {
        let doomed = match self.refs.borrow_mut().get_mut(id) {
            Some(state) if state.count > 0 => {
                state.count -= 1;
                state.is_doomed()
            }
            _ => false,
        };
        if doomed {
            self.delete_or_defer(id);
        }
    }

    pub(crate) fn set_delete_later(&self, id: BatchId, value: bool) -> bool {
        match self.refs.borrow_mut().get_mut(id) {
            Some(state) => {
                state.delete_later = value;
                true
            }
            None => false,
        }
    }

    fn delete_or_defer(&self, id: BatchId) {
        match self.store.try_borrow_mut() {
            Ok(mut store) => {
                self.delete_locked(&mut store, id);
            }
            Err(_) => {
                tracing::trace!(?id, "store busy, deferring batch deletion");
                self.pending.borrow_mut().push(id);
            }
        }
    }

    /// Remove `id` and release the parent links it held, cascading as needed.
    fn delete_locked(&self, store: &mut BatchStore, id: BatchId) -> bool {
        let mut worklist = vec![id];
        let mut removed_first = false;
        while let Some(next) = worklist.pop() {
            let Some(batch) = store.remove(next) else {
                continue;
            };
            self.refs.borrow_mut().remove(next);
            removed_first |= next == id;
            tracing::debug!(id = ?next, layer = batch.layer(), "batch deleted");

            if let Some(parent) = batch.parent() {
                let mut refs = self.refs.borrow_mut();
                if let Some(state) = refs.get_mut(parent)
                    && state.count > 0
                {
                    state.count -= 1;
                    if state.is_doomed() {
                        worklist.push(parent);
                    }
                }
            }
        }
        removed_first
    }
}

/// Owner of every [`Batch`], keyed by generation-checked [`BatchId`]s.
///
/// `Scene` is a cheap, clonable handle to shared single-threaded storage; clones
/// observe the same batches. Batch access is closure-scoped. Calling back into the
/// scene from inside such a closure (or from an effect handler) panics, except for
/// handle clone/drop, which are always safe.
#[derive(Clone)]
pub struct Scene {
    pub(crate) shared: Rc<SceneShared>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("batches", &self.batch_count())
            .field("options", &self.shared.options)
            .finish()
    }
}

impl Scene {
    /// Empty scene with default options.
    pub fn new() -> Self {
        Self::with_options(SceneOptions::default())
    }

    /// Empty scene with explicit options.
    pub fn with_options(options: SceneOptions) -> Self {
        Self {
            shared: Rc::new(SceneShared {
                store: RefCell::new(BatchStore::default()),
                refs: RefCell::new(RefTable::new()),
                pending: RefCell::new(Vec::new()),
                options,
            }),
        }
    }

    /// Options the scene was built with.
    pub fn options(&self) -> &SceneOptions {
        &self.shared.options
    }

    /// Allocate an empty batch at `layer`.
    pub fn create_batch(&self, layer: Layer) -> ItemHandle {
        self.create_batch_with(layer, std::iter::empty())
    }

    /// Allocate a batch at `layer` holding `elements`.
    pub fn create_batch_with(
        &self,
        layer: Layer,
        elements: impl IntoIterator<Item = Drawable>,
    ) -> ItemHandle {
        let id = self.shared.store_mut().insert(layer, elements);
        self.shared.refs.borrow_mut().insert(
            id,
            RefState {
                count: 1,
                delete_later: false,
            },
        );
        tracing::debug!(?id, layer, "batch created");
        ItemHandle::adopt(&self.shared, id)
    }

    /// Allocate a one-element batch.
    pub fn create_element(&self, layer: Layer, element: impl Into<Drawable>) -> ItemHandle {
        self.create_batch_with(layer, std::iter::once(element.into()))
    }

    /// Remove a batch immediately, bypassing reference counting.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn delete_item(&self, id: BatchId) -> bool {
        let mut store = self.shared.store_mut();
        self.shared.delete_locked(&mut store, id)
    }

    /// [`Scene::delete_item`] for the batch behind `handle`.
    pub fn delete_handle(&self, handle: &ItemHandle) -> bool {
        handle.id().is_some_and(|id| self.delete_item(id))
    }

    /// Counted handle to `id`; invalid when the batch does not exist.
    pub fn get_batch(&self, id: BatchId) -> ItemHandle {
        if self.shared.retain(id) {
            ItemHandle::adopt(&self.shared, id)
        } else {
            ItemHandle::unbound()
        }
    }

    /// Return `true` while `id` resolves.
    pub fn contains(&self, id: BatchId) -> bool {
        self.shared.exists(id)
    }

    /// Run `f` on the batch behind `id`.
    pub fn with_batch<R>(&self, id: BatchId, f: impl FnOnce(&Batch) -> R) -> Option<R> {
        let store = self.shared.store();
        store.get(id).map(f)
    }

    /// Run `f` on the batch behind `id` mutably.
    pub fn with_batch_mut<R>(&self, id: BatchId, f: impl FnOnce(&mut Batch) -> R) -> Option<R> {
        let mut store = self.shared.store_mut();
        store.get_mut(id).map(f)
    }

    /// Link `child` under `parent` (or detach with `None`).
    ///
    /// The link holds a reference on the parent. Self-links and cycles are rejected.
    pub fn set_parent(&self, child: BatchId, parent: Option<BatchId>) -> FxResult<()> {
        let previous = {
            let mut store = self.shared.store_mut();
            if !store.contains(child) {
                return Err(FxError::scene("set_parent: unknown child batch"));
            }
            if let Some(parent) = parent {
                if !store.contains(parent) {
                    return Err(FxError::scene("set_parent: unknown parent batch"));
                }
                if store.is_ancestor_or_self(child, parent) {
                    return Err(FxError::scene(
                        "set_parent: link would make a batch its own ancestor",
                    ));
                }
                self.shared.retain(parent);
            }
            let batch = store
                .get_mut(child)
                .ok_or_else(|| FxError::scene("set_parent: unknown child batch"))?;
            std::mem::replace(&mut batch.parent, parent)
        };

        if let Some(previous) = previous {
            self.shared.release(previous);
        }
        Ok(())
    }

    /// World transform of `id`: its local transform composed with its parent chain.
    pub fn final_transform(&self, id: BatchId) -> Option<Affine> {
        self.shared
            .store()
            .final_transform(id, self.shared.options.max_parent_depth)
    }

    /// Reference count of `id`.
    pub fn refcount(&self, id: BatchId) -> Option<u32> {
        self.shared.ref_state(id).map(|s| s.count)
    }

    /// Whether deletion was requested for `id`.
    pub fn is_delete_later(&self, id: BatchId) -> Option<bool> {
        self.shared.ref_state(id).map(|s| s.delete_later)
    }

    /// Number of live batches.
    pub fn batch_count(&self) -> usize {
        self.shared.store().len()
    }

    /// Total elements across all batches.
    pub fn elements_count(&self) -> usize {
        self.shared.store().elements_count()
    }

    /// Number of live batches on `layer`.
    pub fn layer_usage(&self, layer: Layer) -> u64 {
        self.shared.store().layer_usage(layer)
    }

    /// Layers in use, ascending.
    pub fn layers(&self) -> Vec<Layer> {
        self.shared.store().layers().collect()
    }

    /// Render every batch: layers ascending, batches in creation order, elements in
    /// insertion order.
    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T, states: &RenderStates) {
        let store = self.shared.store();
        let max_depth = self.shared.options.max_parent_depth;
        let mut ordered: Vec<_> = store.iter_ordered().collect();
        // Stable: creation order survives within a layer.
        ordered.sort_by_key(|(_, batch)| batch.layer());
        for (id, batch) in ordered {
            let Some(world) = store.final_transform(id, max_depth) else {
                continue;
            };
            let base = states.transform * world;
            for element in batch.elements() {
                target.draw(element, base * element.transform().to_affine());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
