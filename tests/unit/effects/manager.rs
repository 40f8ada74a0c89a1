use super::*;
use crate::animation::keyframes::KeyframeTrack;
use crate::effects::handlers::HandlerKind;
use crate::foundation::core::{Affine, Rgba8};
use crate::render::target::{DrawList, RenderStates};
use crate::scene::drawable::circle_at;
use std::cell::Cell;

fn counter_effect(duration: f64, calls: &Rc<Cell<u32>>) -> Effect {
    let calls = Rc::clone(calls);
    let mut effect = Effect::new(duration);
    effect.push_element(circle_at(Vec2::new(1.0, 1.0), 1.0, Rgba8::WHITE));
    effect.add_handler("count", HandlerKind::custom(move |_, _| calls.set(calls.get() + 1)));
    effect
}

#[test]
fn play_unknown_creates_nothing() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    assert!(!manager.play("nope", 0, Vec2::ZERO, Vec2::new(1.0, 1.0)));
    assert_eq!(scene.batch_count(), 0);
    assert_eq!(manager.running_count(), 0);
}

#[test]
fn instance_runs_until_duration_then_disappears() {
    let scene = Scene::new();
    let calls = Rc::new(Cell::new(0));
    let mut manager = EffectManager::new(&scene);
    manager.add_effect("counter", counter_effect(1.0, &calls));

    assert!(manager.play("counter", 0, Vec2::ZERO, Vec2::new(1.0, 1.0)));
    assert_eq!(scene.batch_count(), 1);

    for _ in 0..3 {
        manager.update(0.25);
    }
    assert_eq!(calls.get(), 3);
    assert_eq!(manager.running_count(), 1);

    manager.update(0.25);
    assert_eq!(calls.get(), 4);
    assert_eq!(manager.running_count(), 0);
    assert_eq!(scene.batch_count(), 0);

    manager.update(0.25);
    assert_eq!(calls.get(), 4);
}

#[test]
fn extra_handle_keeps_finished_batch_alive() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    manager.add_effect("flash", counter_effect(0.5, &Rc::default()));
    manager.play("flash", 2, Vec2::ZERO, Vec2::new(1.0, 1.0));

    let held = manager.running()[0].batch().clone();
    manager.update(1.0);
    manager.update(1.0);
    assert_eq!(manager.running_count(), 0);
    assert!(held.is_valid());

    drop(held);
    assert_eq!(scene.batch_count(), 0);
}

#[test]
fn play_applies_offset_and_scale() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    let mut effect = Effect::new(1.0);
    effect.push_element(circle_at(Vec2::new(10.0, 0.0), 1.0, Rgba8::WHITE));
    effect.push_element(circle_at(Vec2::new(20.0, 0.0), 1.0, Rgba8::WHITE));
    manager.add_effect("pair", effect);

    manager.play("pair", 0, Vec2::new(100.0, 50.0), Vec2::new(2.0, 2.0));
    let id = manager.running()[0].batch_id().unwrap();
    let local = scene.final_transform(id).unwrap();

    // Centroid (15, 0) stays fixed under the scale, then the offset applies.
    let expected = Affine::translate((100.0, 50.0))
        * Affine::translate((15.0, 0.0))
        * Affine::scale(2.0)
        * Affine::translate((-15.0, 0.0));
    assert_eq!(local, expected);

    let mut list = DrawList::new();
    scene.draw(&mut list, &RenderStates::default());
    assert_eq!(list.len(), 2);
}

#[test]
fn running_instances_keep_old_definition() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    manager.add_effect("fx", Effect::new(1.0));
    manager.play("fx", 0, Vec2::ZERO, Vec2::new(1.0, 1.0));

    assert!(manager.effect_mut("fx").is_none());
    manager.add_effect("fx", Effect::new(9.0));
    assert!(manager.effect_mut("fx").is_some());
    assert_eq!(manager.running()[0].duration(), 1.0);
    assert_eq!(manager.effect("fx").unwrap().duration(), 9.0);

    assert!(manager.remove_effect("fx"));
    assert!(!manager.contains_effect("fx"));
    manager.update(0.5);
    assert_eq!(manager.running_count(), 1);
}

#[test]
fn position_track_moves_elements_over_time() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    let mut effect = Effect::new(2.0);
    effect.push_element(circle_at(Vec2::ZERO, 1.0, Rgba8::WHITE));
    let mut track = KeyframeTrack::new();
    track
        .push_linear(Vec2::new(0.0, 0.0), 0.0)
        .push_linear(Vec2::new(40.0, 0.0), 1.0);
    effect.add_handler("slide", HandlerKind::Position(track));
    manager.add_effect("slide", effect);
    manager.play("slide", 0, Vec2::ZERO, Vec2::new(1.0, 1.0));

    manager.update(0.5);
    manager.update(0.5);
    // Second call samples at elapsed 0.5 of 2.0 seconds.
    let x = manager.running()[0]
        .batch()
        .with(|b| b.elements()[0].position().x)
        .unwrap();
    assert_eq!(x, 10.0);
}

#[test]
fn stop_all_releases_everything() {
    let scene = Scene::new();
    let mut manager = EffectManager::new(&scene);
    manager.add_effect("a", Effect::default());
    for layer in 0..4 {
        manager.play("a", layer, Vec2::ZERO, Vec2::new(1.0, 1.0));
    }
    assert_eq!(scene.batch_count(), 4);
    manager.stop_all();
    assert_eq!(manager.running_count(), 0);
    assert_eq!(scene.batch_count(), 0);
    assert_eq!(manager.effect_names().collect::<Vec<_>>(), ["a"]);
}
