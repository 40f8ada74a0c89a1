use super::*;
use crate::foundation::core::Rgba8;
use crate::scene::drawable::circle_at;

#[test]
fn copy_then_release_follows_refcount() {
    let scene = Scene::new();
    let h1 = scene.create_batch(0);
    let id = h1.id().unwrap();
    assert_eq!(h1.refcount(), 1);

    let h2 = h1.clone();
    assert_eq!(h1.refcount(), 2);
    assert!(h1.delete_later(true));

    drop(h2);
    assert_eq!(h1.refcount(), 1);
    assert!(scene.get_batch(id).is_valid());

    drop(h1);
    assert!(!scene.get_batch(id).is_valid());
    assert!(!scene.contains(id));
}

#[test]
fn never_deleted_without_delete_later() {
    let scene = Scene::new();
    let id = {
        let h = scene.create_batch(0);
        let copies: Vec<ItemHandle> = (0..4).map(|_| h.clone()).collect();
        drop(copies);
        h.id().unwrap()
    };
    assert!(scene.contains(id));
    assert_eq!(scene.refcount(id), Some(0));
}

#[test]
fn delete_later_can_be_cancelled() {
    let scene = Scene::new();
    let h = scene.create_batch(0);
    let id = h.id().unwrap();
    h.delete_later(true);
    h.delete_later(false);
    drop(h);
    assert!(scene.contains(id));
}

#[test]
fn reset_releases_like_drop() {
    let scene = Scene::new();
    let mut h = scene.create_batch(0);
    let id = h.id().unwrap();
    h.delete_later(true);
    h.reset();
    assert!(!h.is_bound());
    assert!(!scene.contains(id));
}

#[test]
fn moved_handle_keeps_the_single_reference() {
    let scene = Scene::new();
    let h = scene.create_batch(0);
    let moved = h;
    assert_eq!(moved.refcount(), 1);
    let taken = {
        let mut slot = moved;
        std::mem::take(&mut slot)
    };
    assert_eq!(taken.refcount(), 1);
}

#[test]
fn stale_handle_reports_invalid_after_direct_delete() {
    let scene = Scene::new();
    let h = scene.create_batch(0);
    let copy = h.clone();
    assert!(scene.delete_handle(&h));
    assert!(!h.is_valid());
    assert!(!copy.is_valid());
    assert_eq!(h.refcount(), 0);
    assert_eq!(h.with(|b| b.len()), None);
    assert!(!h.move_by(Vec2::new(1.0, 0.0)));
    drop(copy);
    drop(h);
    assert_eq!(scene.batch_count(), 0);
}

#[test]
fn handle_survives_unrelated_structural_changes() {
    let scene = Scene::new();
    let h = scene.create_element(0, circle_at(Vec2::new(1.0, 1.0), 1.0, Rgba8::WHITE));
    let others: Vec<ItemHandle> = (0..32).map(|i| scene.create_batch(i % 3)).collect();
    for o in others.iter().step_by(2) {
        scene.delete_handle(o);
    }
    assert_eq!(h.with(|b| b.elements()[0].position()), Some(Vec2::new(1.0, 1.0)));
    assert_eq!(h.layer(), Some(0));
}

#[test]
fn unbound_handle_is_inert() {
    let h = ItemHandle::default();
    assert!(!h.is_valid());
    assert!(!h.delete_later(true));
    assert!(h.scene().is_none());
    let copy = h.clone();
    assert!(!copy.is_bound());
}

#[test]
fn handle_outliving_scene_is_harmless() {
    let h = {
        let scene = Scene::new();
        let h = scene.create_batch(0);
        h.delete_later(true);
        h
    };
    assert!(!h.is_valid());
    drop(h);
}

#[test]
fn drop_inside_batch_access_is_deferred() {
    let scene = Scene::new();
    let keep = scene.create_batch(0);
    let doomed = scene.create_batch(0);
    let doomed_id = doomed.id().unwrap();
    doomed.delete_later(true);

    keep.with_mut(move |_batch| drop(doomed));
    // The release was queued while the store was borrowed and applied afterwards.
    assert!(!scene.contains(doomed_id));
    assert_eq!(scene.batch_count(), 1);
}
