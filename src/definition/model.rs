//! Serde document types for effect definitions.
//!
//! Vectors are written as `[x, y]` arrays and colours as `#rrggbb` / `#rrggbbaa`
//! strings. Every top-level key is required.

use std::collections::BTreeMap;

use crate::{
    animation::keyframes::{Interpolation, LeadIn},
    definition::textures::TextureDef,
    foundation::core::Rgba8,
};

/// `[x, y]`.
pub type XY = [f64; 2];

/// Complete effect document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectDefinition {
    /// Name the effect is registered under.
    pub name: String,
    /// Lifetime in seconds, or `"endless"`.
    pub duration: DurationDef,
    /// Handlers, keyed by their `name` field.
    pub animations: Vec<AnimationDef>,
    /// Textures referenced by templates.
    pub textures: BTreeMap<String, TextureDef>,
    /// Reusable drawable descriptions.
    pub templates: BTreeMap<String, TemplateDef>,
    /// Elements instantiated in order.
    pub primitives: Vec<PrimitiveDef>,
}

/// Effect lifetime.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DurationDef {
    /// Seconds.
    Seconds(f64),
    /// Named duration; only `"endless"` is accepted.
    Keyword(String),
}

/// One handler description, tagged by `type`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnimationDef {
    /// Keyed element position.
    Position(KeyedAnimationDef<XY>),
    /// Keyed element scale.
    Scale(KeyedAnimationDef<XY>),
    /// Keyed element rotation in degrees.
    Rotation(KeyedAnimationDef<f64>),
    /// Pairwise attraction.
    Gravity(GravityAnimationDef),
}

impl AnimationDef {
    /// Handler name.
    pub fn name(&self) -> &str {
        match self {
            Self::Position(a) | Self::Scale(a) => &a.name,
            Self::Rotation(a) => &a.name,
            Self::Gravity(a) => &a.name,
        }
    }

    /// Element selection.
    pub fn apply_to(&self) -> Option<&ApplyTo> {
        match self {
            Self::Position(a) | Self::Scale(a) => a.apply_to.as_ref(),
            Self::Rotation(a) => a.apply_to.as_ref(),
            Self::Gravity(a) => a.apply_to.as_ref(),
        }
    }
}

/// Keyframed handler body.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyedAnimationDef<T> {
    /// Handler name.
    pub name: String,
    /// Keys sorted by time.
    pub keys: Vec<KeyDef<T>>,
    /// Element selection; all elements when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<ApplyTo>,
    /// Behaviour before the first key.
    #[serde(default)]
    pub lead_in: LeadIn,
}

/// One key. `type` defaults to `bezier` when `in` or `out` is present, else `linear`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyDef<T> {
    /// Normalized time.
    pub time: f64,
    /// Value at `time`.
    pub value: T,
    /// Interpolation of the segment ending here.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    /// Incoming bezier control point.
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub ease_in: Option<XY>,
    /// Outgoing bezier control point.
    #[serde(rename = "out", default, skip_serializing_if = "Option::is_none")]
    pub ease_out: Option<XY>,
}

/// Gravity handler body; missing masses and velocities default per element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GravityAnimationDef {
    /// Handler name.
    pub name: String,
    /// Mass per element index.
    #[serde(default)]
    pub masses: Vec<f64>,
    /// Initial velocity per element index.
    #[serde(default)]
    pub velocities: Vec<XY>,
    /// Element selection; all elements when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<ApplyTo>,
}

/// `"all"` or a list of element indices.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ApplyTo {
    /// Keyword; only `"all"` is accepted.
    Keyword(String),
    /// Indices visited in order.
    Indices(Vec<usize>),
}

/// Drawable description, tagged by `type`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateDef {
    /// Textured quad.
    Sprite(SpriteDef),
    /// Circle.
    Circle(CircleDef),
    /// Rectangle.
    Rect(RectDef),
}

impl TemplateDef {
    /// Texture name referenced by the template.
    pub fn texture(&self) -> Option<&str> {
        match self {
            Self::Sprite(d) => d.texture.as_deref(),
            Self::Circle(d) => d.texture.as_deref(),
            Self::Rect(d) => d.texture.as_deref(),
        }
    }
}

/// Sprite fields.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpriteDef {
    /// Texture name from the document's `textures` map.
    pub texture: Option<String>,
    /// Modulation colour.
    pub color: Option<Rgba8>,
    /// `[left, top, width, height]`.
    pub source_rect: Option<[i32; 4]>,
    /// Element position.
    pub position: Option<XY>,
    /// Local pivot.
    pub origin: Option<XY>,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
}

/// Circle fields.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CircleDef {
    /// Texture name from the document's `textures` map.
    pub texture: Option<String>,
    /// Fill colour.
    pub fill_color: Option<Rgba8>,
    /// Element position.
    pub position: Option<XY>,
    /// Local pivot.
    pub origin: Option<XY>,
    /// Radius.
    pub radius: Option<f64>,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
    /// Outline point count.
    pub point_count: Option<u32>,
}

/// Rectangle fields.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RectDef {
    /// Texture name from the document's `textures` map.
    pub texture: Option<String>,
    /// Fill colour.
    pub fill_color: Option<Rgba8>,
    /// Element position.
    pub position: Option<XY>,
    /// Width and height.
    pub size: Option<XY>,
    /// Local pivot.
    pub origin: Option<XY>,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
}

/// Instantiate the named template as the next element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrimitiveDef {
    /// Template name.
    pub template: String,
}
