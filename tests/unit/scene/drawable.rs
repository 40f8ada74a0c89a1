use super::*;

#[test]
fn element_affine_applies_origin_before_position() {
    let t = ElementTransform {
        position: Vec2::new(10.0, 5.0),
        origin: Vec2::new(2.0, 2.0),
        ..ElementTransform::default()
    };
    assert_eq!(t.to_affine() * Point::new(2.0, 2.0), Point::new(10.0, 5.0));
}

#[test]
fn element_affine_scales_about_origin() {
    let t = ElementTransform {
        origin: Vec2::new(1.0, 1.0),
        scale: Vec2::new(2.0, 3.0),
        ..ElementTransform::default()
    };
    assert_eq!(t.to_affine() * Point::new(2.0, 2.0), Point::new(2.0, 3.0));
}

#[test]
fn common_accessors_work_for_every_kind() {
    let mut all: Vec<Drawable> = vec![
        Sprite::default().into(),
        Text::default().into(),
        Circle::default().into(),
        Convex::default().into(),
        Rectangle::default().into(),
    ];
    for d in &mut all {
        d.set_position(Vec2::new(1.0, 2.0));
        d.move_by(Vec2::new(1.0, 1.0));
        d.set_rotation(45.0);
        d.set_color(Rgba8::rgba(1, 2, 3, 4));
        assert_eq!(d.position(), Vec2::new(2.0, 3.0));
        assert_eq!(d.transform().rotation_deg, 45.0);
        assert_eq!(d.color(), Rgba8::rgba(1, 2, 3, 4));
    }
    let kinds: Vec<&str> = all.iter().map(Drawable::kind).collect();
    assert_eq!(kinds, ["sprite", "text", "circle", "convex", "rect"]);
}

#[test]
fn circle_at_centres_origin() {
    let c = circle_at(Vec2::new(5.0, 5.0), 2.0, Rgba8::WHITE);
    let Drawable::Circle(circle) = &c else {
        panic!("expected circle");
    };
    assert_eq!(circle.transform.origin, Vec2::new(2.0, 2.0));
    assert_eq!(c.position(), Vec2::new(5.0, 5.0));
}
