use super::*;
use crate::foundation::core::{Point, Vec2};

#[test]
fn insert_tracks_layer_usage_and_order() {
    let mut store = BatchStore::default();
    let a = store.insert(2, []);
    let b = store.insert(1, []);
    let c = store.insert(2, []);

    assert_eq!(store.layer_usage(2), 2);
    assert_eq!(store.layer_usage(1), 1);
    assert_eq!(store.layers().collect::<Vec<_>>(), vec![1, 2]);

    let order: Vec<BatchId> = store.iter_ordered().map(|(id, _)| id).collect();
    assert_eq!(order, vec![a, b, c]);
}

#[test]
fn remove_is_idempotent_and_generation_checked() {
    let mut store = BatchStore::default();
    let a = store.insert(0, []);
    assert!(store.remove(a).is_some());
    assert!(store.remove(a).is_none());
    assert_eq!(store.layer_usage(0), 0);
    assert_eq!(store.layers().count(), 0);

    // Slot reuse must not resurrect the stale id.
    let b = store.insert(0, []);
    assert!(!store.contains(a));
    assert!(store.contains(b));
}

#[test]
fn final_transform_composes_parent_chain() {
    let mut store = BatchStore::default();
    let root = store.insert(0, []);
    let child = store.insert(0, []);
    store.get_mut(root).unwrap().move_by(Vec2::new(10.0, 0.0));
    store.get_mut(child).unwrap().move_by(Vec2::new(0.0, 5.0));
    store.get_mut(child).unwrap().parent = Some(root);

    let t = store.final_transform(child, 8).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(10.0, 5.0));

    // Depth zero ignores parents entirely.
    let t = store.final_transform(child, 0).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(0.0, 5.0));
}

#[test]
fn final_transform_stops_at_missing_parent() {
    let mut store = BatchStore::default();
    let root = store.insert(0, []);
    let child = store.insert(0, []);
    store.get_mut(child).unwrap().parent = Some(root);
    store.get_mut(root).unwrap().move_by(Vec2::new(1.0, 1.0));
    store.remove(root);
    let t = store.final_transform(child, 8).unwrap();
    assert_eq!(t, Affine::IDENTITY);
}

#[test]
fn ancestor_walk_detects_links() {
    let mut store = BatchStore::default();
    let a = store.insert(0, []);
    let b = store.insert(0, []);
    let c = store.insert(0, []);
    store.get_mut(b).unwrap().parent = Some(a);
    store.get_mut(c).unwrap().parent = Some(b);
    assert!(store.is_ancestor_or_self(a, c));
    assert!(store.is_ancestor_or_self(c, c));
    assert!(!store.is_ancestor_or_self(c, a));
}
