use super::*;
use crate::{
    foundation::core::{Point, Rgba8, Vec2},
    render::target::DrawList,
    scene::drawable::circle_at,
};

fn dot(x: f64, y: f64) -> Drawable {
    circle_at(Vec2::new(x, y), 1.0, Rgba8::WHITE)
}

fn drawn_positions(list: &DrawList) -> Vec<Vec2> {
    list.commands.iter().map(|c| c.element.position()).collect()
}

#[test]
fn create_batch_updates_counters() {
    let scene = Scene::new();
    let a = scene.create_batch(1);
    let b = scene.create_batch_with(1, vec![dot(0.0, 0.0), dot(1.0, 0.0)]);
    let _c = scene.create_element(-2, dot(5.0, 5.0));

    assert_eq!(scene.batch_count(), 3);
    assert_eq!(scene.elements_count(), 3);
    assert_eq!(scene.layer_usage(1), 2);
    assert_eq!(scene.layers(), vec![-2, 1]);
    assert_ne!(a.id(), b.id());
    assert!(a.with(Batch::seq) < b.with(Batch::seq));
}

#[test]
fn delete_item_is_silent_for_unknown_ids() {
    let scene = Scene::new();
    let h = scene.create_batch(4);
    let id = h.id().unwrap();
    assert!(scene.delete_item(id));
    assert!(!scene.delete_item(id));
    assert_eq!(scene.layer_usage(4), 0);
    assert!(scene.layers().is_empty());
}

#[test]
fn get_batch_for_missing_id_is_invalid() {
    let scene = Scene::new();
    let h = scene.create_batch(0);
    let id = h.id().unwrap();
    scene.delete_item(id);
    let again = scene.get_batch(id);
    assert!(!again.is_valid());
    assert!(!again.is_bound());
}

#[test]
fn draw_orders_by_layer_then_creation_then_insertion() {
    let scene = Scene::new();
    let _top = scene.create_batch_with(5, vec![dot(50.0, 0.0), dot(51.0, 0.0)]);
    let _bottom_a = scene.create_element(-1, dot(-10.0, 0.0));
    let _mid = scene.create_element(0, dot(0.0, 0.0));
    let _bottom_b = scene.create_element(-1, dot(-11.0, 0.0));

    let mut list = DrawList::new();
    scene.draw(&mut list, &RenderStates::default());
    assert_eq!(
        drawn_positions(&list),
        vec![
            Vec2::new(-10.0, 0.0),
            Vec2::new(-11.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(51.0, 0.0),
        ]
    );
}

#[test]
fn draw_applies_states_parent_and_local_transforms() {
    let scene = Scene::new();
    let parent = scene.create_batch(0);
    parent.move_by(Vec2::new(100.0, 0.0));
    let child = scene.create_element(1, dot(1.0, 2.0));
    child.move_by(Vec2::new(0.0, 10.0));
    scene
        .set_parent(child.id().unwrap(), parent.id())
        .unwrap();

    let states = RenderStates {
        transform: Affine::translate(Vec2::new(0.0, 1000.0)),
    };
    let mut list = DrawList::new();
    scene.draw(&mut list, &states);
    assert_eq!(list.len(), 1);
    // Circle origin sits at its centre, so the centre maps to the composed offset.
    let centre = list.commands[0].transform * Point::new(1.0, 1.0);
    assert_eq!(centre, Point::new(101.0, 1012.0));
}

#[test]
fn set_parent_rejects_self_and_cycles() {
    let scene = Scene::new();
    let a = scene.create_batch(0);
    let b = scene.create_batch(0);
    let c = scene.create_batch(0);
    let (a_id, b_id, c_id) = (a.id().unwrap(), b.id().unwrap(), c.id().unwrap());

    assert!(scene.set_parent(a_id, Some(a_id)).is_err());
    scene.set_parent(b_id, Some(a_id)).unwrap();
    scene.set_parent(c_id, Some(b_id)).unwrap();
    assert!(scene.set_parent(a_id, Some(c_id)).is_err());

    // Re-parenting elsewhere is fine and releases the old link.
    scene.set_parent(c_id, Some(a_id)).unwrap();
    assert_eq!(scene.refcount(b_id), Some(1));
    assert_eq!(scene.refcount(a_id), Some(3));
    scene.set_parent(c_id, None).unwrap();
    assert_eq!(scene.refcount(a_id), Some(2));
}

#[test]
fn parent_link_keeps_parent_alive() {
    let scene = Scene::new();
    let parent = scene.create_batch(0);
    let parent_id = parent.id().unwrap();
    let child = scene.create_batch(0);
    scene.set_parent(child.id().unwrap(), Some(parent_id)).unwrap();

    parent.delete_later(true);
    drop(parent);
    assert!(scene.contains(parent_id), "child still references its parent");

    child.delete_later(true);
    drop(child);
    assert!(!scene.contains(parent_id));
    assert_eq!(scene.batch_count(), 0);
}

#[test]
fn set_parent_with_unknown_ids_fails() {
    let scene = Scene::new();
    let a = scene.create_batch(0);
    let gone = scene.create_batch(0);
    let gone_id = gone.id().unwrap();
    scene.delete_item(gone_id);
    assert!(scene.set_parent(a.id().unwrap(), Some(gone_id)).is_err());
    assert!(scene.set_parent(gone_id, a.id()).is_err());
}

#[test]
fn parent_depth_is_bounded_by_options() {
    let scene = Scene::with_options(SceneOptions {
        max_parent_depth: 1,
    });
    let root = scene.create_batch(0);
    root.move_by(Vec2::new(100.0, 0.0));
    let mid = scene.create_batch(0);
    mid.move_by(Vec2::new(10.0, 0.0));
    let leaf = scene.create_batch(0);
    leaf.move_by(Vec2::new(1.0, 0.0));
    scene.set_parent(mid.id().unwrap(), root.id()).unwrap();
    scene.set_parent(leaf.id().unwrap(), mid.id()).unwrap();

    let t = scene.final_transform(leaf.id().unwrap()).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(11.0, 0.0));
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: SceneOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, SceneOptions::default());
    let opts: SceneOptions = serde_json::from_str(r#"{"max_parent_depth": 3}"#).unwrap();
    assert_eq!(opts.max_parent_depth, 3);
}
