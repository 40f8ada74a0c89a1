use std::collections::BTreeMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::{
    foundation::core::{Affine, Layer},
    scene::batch::Batch,
    scene::drawable::Drawable,
};

slotmap::new_key_type! {
    /// Generation-checked batch identifier. A deleted id never resolves again.
    pub struct BatchId;
}

/// Deletion-trigger bookkeeping kept beside (not inside) the batch arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RefState {
    pub(crate) count: u32,
    pub(crate) delete_later: bool,
}

impl RefState {
    /// Unreferenced and marked for deletion.
    pub(crate) fn is_doomed(self) -> bool {
        self.count == 0 && self.delete_later
    }
}

pub(crate) type RefTable = SecondaryMap<BatchId, RefState>;

/// Arena of batches plus creation order and per-layer usage counters.
#[derive(Default)]
pub(crate) struct BatchStore {
    batches: SlotMap<BatchId, Batch>,
    order: BTreeMap<u64, BatchId>,
    layers_usage: BTreeMap<Layer, u64>,
    next_seq: u64,
}

impl BatchStore {
    pub(crate) fn insert(
        &mut self,
        layer: Layer,
        elements: impl IntoIterator<Item = Drawable>,
    ) -> BatchId {
        let seq = self.next_seq;
        self.next_seq += 1;

        let mut batch = Batch::new(layer, seq);
        batch.assign_elements(elements);
        let id = self.batches.insert(batch);
        self.order.insert(seq, id);
        *self.layers_usage.entry(layer).or_insert(0) += 1;
        id
    }

    pub(crate) fn remove(&mut self, id: BatchId) -> Option<Batch> {
        let batch = self.batches.remove(id)?;
        self.order.remove(&batch.seq());
        if let Some(count) = self.layers_usage.get_mut(&batch.layer()) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.layers_usage.remove(&batch.layer());
            }
        }
        Some(batch)
    }

    pub(crate) fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: BatchId) -> Option<&mut Batch> {
        self.batches.get_mut(id)
    }

    pub(crate) fn contains(&self, id: BatchId) -> bool {
        self.batches.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.batches.len()
    }

    pub(crate) fn elements_count(&self) -> usize {
        self.batches.values().map(Batch::len).sum()
    }

    pub(crate) fn layer_usage(&self, layer: Layer) -> u64 {
        self.layers_usage.get(&layer).copied().unwrap_or(0)
    }

    pub(crate) fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.layers_usage.keys().copied()
    }

    /// Batches in creation order.
    pub(crate) fn iter_ordered(&self) -> impl Iterator<Item = (BatchId, &Batch)> + '_ {
        self.order
            .values()
            .filter_map(|&id| self.batches.get(id).map(|b| (id, b)))
    }

    /// Compose local transforms up the parent chain, at most `max_depth` parents deep.
    ///
    /// Missing parents end the walk.
    pub(crate) fn final_transform(&self, id: BatchId, max_depth: usize) -> Option<Affine> {
        let batch = self.batches.get(id)?;
        let mut acc = batch.local_transform();
        let mut cursor = batch.parent;
        let mut depth = 0;
        while let Some(parent_id) = cursor {
            if depth == max_depth {
                tracing::warn!(?id, max_depth, "parent chain truncated");
                break;
            }
            let Some(parent) = self.batches.get(parent_id) else {
                break;
            };
            acc = parent.local_transform() * acc;
            cursor = parent.parent;
            depth += 1;
        }
        Some(acc)
    }

    /// Return `true` when `ancestor` is reachable by walking parents from `from`.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: BatchId, from: BatchId) -> bool {
        let mut cursor = Some(from);
        let mut steps = 0usize;
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            if steps > self.batches.len() {
                // Pre-existing cycle; treat as reachable.
                return true;
            }
            cursor = self.batches.get(id).and_then(|b| b.parent);
            steps += 1;
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
