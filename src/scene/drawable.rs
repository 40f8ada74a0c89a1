use crate::foundation::core::{Affine, Point, Rgba8, Vec2};

/// Opaque reference to a texture registered in a [`crate::TextureCache`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct TextureId(pub u32);

/// Integer texel rectangle `(left, top, width, height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

/// Per-element transform: `T(position) * R(rotation) * S(scale) * T(-origin)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementTransform {
    /// Position of the origin in batch space.
    pub position: Vec2,
    /// Local pivot for rotation and scale.
    pub origin: Vec2,
    /// Non-uniform scale.
    pub scale: Vec2,
    /// Rotation in degrees, clockwise in screen space.
    pub rotation_deg: f64,
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
        }
    }
}

impl ElementTransform {
    /// Matrix mapping element-local coordinates into batch space.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.position)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-self.origin)
    }
}

/// Textured quad.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sprite {
    /// Placement.
    pub transform: ElementTransform,
    /// Source texture.
    pub texture: Option<TextureId>,
    /// Modulation colour.
    pub color: Rgba8,
    /// Texel region; `None` covers the whole texture.
    pub source_rect: Option<IntRect>,
}

/// Text run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Text {
    /// Placement.
    pub transform: ElementTransform,
    /// Displayed string.
    pub string: String,
    /// Character size in pixels.
    pub character_size: u32,
    /// Glyph colour.
    pub fill_color: Rgba8,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            transform: ElementTransform::default(),
            string: String::new(),
            character_size: 30,
            fill_color: Rgba8::WHITE,
        }
    }
}

/// Regular polygon approximating a circle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    /// Placement.
    pub transform: ElementTransform,
    /// Radius in local units.
    pub radius: f64,
    /// Number of outline points.
    pub point_count: u32,
    /// Fill colour.
    pub fill_color: Rgba8,
    /// Optional fill texture.
    pub texture: Option<TextureId>,
    /// Texel region of the fill texture.
    pub texture_rect: Option<IntRect>,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            transform: ElementTransform::default(),
            radius: 0.0,
            point_count: 30,
            fill_color: Rgba8::WHITE,
            texture: None,
            texture_rect: None,
        }
    }
}

/// Convex polygon.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Convex {
    /// Placement.
    pub transform: ElementTransform,
    /// Outline in local coordinates.
    pub points: Vec<Point>,
    /// Fill colour.
    pub fill_color: Rgba8,
    /// Optional fill texture.
    pub texture: Option<TextureId>,
}

/// Axis-aligned rectangle in local coordinates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rectangle {
    /// Placement.
    pub transform: ElementTransform,
    /// Width and height.
    pub size: Vec2,
    /// Fill colour.
    pub fill_color: Rgba8,
    /// Optional fill texture.
    pub texture: Option<TextureId>,
    /// Texel region of the fill texture.
    pub texture_rect: Option<IntRect>,
}

/// Closed set of renderable primitives held by a batch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Drawable {
    /// Textured quad.
    Sprite(Sprite),
    /// Text run.
    Text(Text),
    /// Circle.
    Circle(Circle),
    /// Convex polygon.
    Convex(Convex),
    /// Rectangle.
    Rect(Rectangle),
}

impl Drawable {
    /// Kind name used in logs and definitions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Text(_) => "text",
            Self::Circle(_) => "circle",
            Self::Convex(_) => "convex",
            Self::Rect(_) => "rect",
        }
    }

    /// Placement shared by every kind.
    pub fn transform(&self) -> &ElementTransform {
        match self {
            Self::Sprite(d) => &d.transform,
            Self::Text(d) => &d.transform,
            Self::Circle(d) => &d.transform,
            Self::Convex(d) => &d.transform,
            Self::Rect(d) => &d.transform,
        }
    }

    /// Mutable placement shared by every kind.
    pub fn transform_mut(&mut self) -> &mut ElementTransform {
        match self {
            Self::Sprite(d) => &mut d.transform,
            Self::Text(d) => &mut d.transform,
            Self::Circle(d) => &mut d.transform,
            Self::Convex(d) => &mut d.transform,
            Self::Rect(d) => &mut d.transform,
        }
    }

    /// Position in batch space.
    pub fn position(&self) -> Vec2 {
        self.transform().position
    }

    /// Place the element.
    pub fn set_position(&mut self, position: Vec2) {
        self.transform_mut().position = position;
    }

    /// Offset the element.
    pub fn move_by(&mut self, delta: Vec2) {
        self.transform_mut().position += delta;
    }

    /// Set the non-uniform scale.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.transform_mut().scale = scale;
    }

    /// Set the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.transform_mut().rotation_deg = degrees;
    }

    /// Primary colour (fill or modulation).
    pub fn color(&self) -> Rgba8 {
        match self {
            Self::Sprite(d) => d.color,
            Self::Text(d) => d.fill_color,
            Self::Circle(d) => d.fill_color,
            Self::Convex(d) => d.fill_color,
            Self::Rect(d) => d.fill_color,
        }
    }

    /// Replace the primary colour.
    pub fn set_color(&mut self, color: Rgba8) {
        match self {
            Self::Sprite(d) => d.color = color,
            Self::Text(d) => d.fill_color = color,
            Self::Circle(d) => d.fill_color = color,
            Self::Convex(d) => d.fill_color = color,
            Self::Rect(d) => d.fill_color = color,
        }
    }

    /// Texture bound to the element, if the kind supports one.
    pub fn texture(&self) -> Option<TextureId> {
        match self {
            Self::Sprite(d) => d.texture,
            Self::Circle(d) => d.texture,
            Self::Convex(d) => d.texture,
            Self::Rect(d) => d.texture,
            Self::Text(_) => None,
        }
    }
}

impl From<Sprite> for Drawable {
    fn from(v: Sprite) -> Self {
        Self::Sprite(v)
    }
}

impl From<Text> for Drawable {
    fn from(v: Text) -> Self {
        Self::Text(v)
    }
}

impl From<Circle> for Drawable {
    fn from(v: Circle) -> Self {
        Self::Circle(v)
    }
}

impl From<Convex> for Drawable {
    fn from(v: Convex) -> Self {
        Self::Convex(v)
    }
}

impl From<Rectangle> for Drawable {
    fn from(v: Rectangle) -> Self {
        Self::Rect(v)
    }
}

/// Circle of `radius` centred on `center`, with its origin at the centre.
pub fn circle_at(center: Vec2, radius: f64, fill_color: Rgba8) -> Drawable {
    Drawable::Circle(Circle {
        transform: ElementTransform {
            position: center,
            origin: Vec2::new(radius, radius),
            ..ElementTransform::default()
        },
        radius,
        fill_color,
        ..Circle::default()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/drawable.rs"]
mod tests;
