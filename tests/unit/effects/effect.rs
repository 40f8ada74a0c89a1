use super::*;
use crate::animation::keyframes::{Key, KeyframeTrack};
use crate::effects::handlers::GravityInit;
use crate::foundation::core::{Rgba8, Vec2};
use crate::scene::drawable::circle_at;

#[test]
fn default_effect_is_endless() {
    let effect = Effect::default();
    assert_eq!(effect.duration(), DURATION_ENDLESS);
    assert!(effect.elements().is_empty());
    assert_eq!(effect.handler_count(), 0);
}

#[test]
fn add_handler_replaces_by_name() {
    let mut effect = Effect::new(1.0);
    effect
        .add_handler("spin", HandlerKind::Rotation(KeyframeTrack::new()))
        .set_affected_indices([1]);
    effect.add_handler("spin", HandlerKind::Gravity(GravityInit::default()));

    assert_eq!(effect.handler_count(), 1);
    let handler = effect.get_handler("spin").unwrap();
    assert_eq!(handler.kind().name(), "gravity");
    assert!(handler.affects_all());
    assert!(effect.get_handler("missing").is_none());
}

#[test]
fn handlers_iterate_in_name_order() {
    let mut effect = Effect::new(1.0);
    for name in ["zeta", "alpha", "mid"] {
        effect.add_handler(name, HandlerKind::custom(|_, _| {}));
    }
    let names: Vec<&str> = effect.handlers().map(|(n, _)| n).collect();
    assert_eq!(names, ["alpha", "mid", "zeta"]);
    assert!(effect.remove_handler("mid").is_some());
    assert_eq!(effect.handler_count(), 2);
}

#[test]
fn push_element_returns_index() {
    let mut effect = Effect::new(2.0);
    assert_eq!(effect.push_element(circle_at(Vec2::ZERO, 1.0, Rgba8::WHITE)), 0);
    assert_eq!(effect.push_element(circle_at(Vec2::ZERO, 2.0, Rgba8::WHITE)), 1);
    effect.elements_mut().pop();
    assert_eq!(effect.elements().len(), 1);
}

#[test]
fn validate_rejects_bad_duration_and_unsorted_tracks() {
    assert!(Effect::new(-1.0).validate().is_err());
    assert!(Effect::new(f64::NAN).validate().is_err());
    assert!(Effect::new(0.0).validate().is_ok());
    assert!(Effect::new(DURATION_ENDLESS).validate().is_ok());

    let mut effect = Effect::new(1.0);
    let track = KeyframeTrack::from_keys(vec![
        Key::new(Vec2::ZERO, 0.8, Default::default()),
        Key::new(Vec2::ZERO, 0.2, Default::default()),
    ]);
    effect.add_handler("move", HandlerKind::Position(track));
    let err = effect.validate().unwrap_err().to_string();
    assert!(err.contains("move"), "{err}");
}
