use std::{collections::BTreeMap, path::Path};

use anyhow::Context;

use crate::{
    animation::keyframes::{Interpolation, Key, KeyframeTrack},
    definition::{
        model::{
            AnimationDef, ApplyTo, CircleDef, DurationDef, EffectDefinition, KeyDef,
            KeyedAnimationDef, RectDef, SpriteDef, TemplateDef, XY,
        },
        textures::TextureCache,
    },
    effects::{
        effect::{DURATION_ENDLESS, Effect},
        handlers::{GravityInit, HandlerKind},
    },
    foundation::{
        core::{Rgba8, Vec2},
        error::{FxError, FxResult},
    },
    scene::drawable::{Circle, Drawable, ElementTransform, IntRect, Rectangle, Sprite, TextureId},
};

/// Effect built from a definition, ready for [`crate::EffectManager::add_effect`].
#[derive(Clone, Debug)]
pub struct BuiltEffect {
    /// Name from the document.
    pub name: String,
    /// Built template.
    pub effect: Effect,
}

impl EffectDefinition {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> FxResult<Self> {
        serde_json::from_str(json).map_err(|e| FxError::serde(format!("effect definition: {e}")))
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot open effect file '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Build the effect, registering its textures in `textures`.
    ///
    /// Every reference is checked before anything is registered, so a failed build
    /// leaves `textures` untouched.
    #[tracing::instrument(level = "debug", skip(self, textures), fields(name = %self.name))]
    pub fn build(&self, textures: &mut TextureCache) -> FxResult<BuiltEffect> {
        let mut effect = Effect::new(self.duration.seconds()?);

        for anim in &self.animations {
            let name = anim.name();
            let kind = match anim {
                AnimationDef::Position(a) => HandlerKind::Position(build_track(a, xy)),
                AnimationDef::Scale(a) => HandlerKind::Scale(build_track(a, xy)),
                AnimationDef::Rotation(a) => HandlerKind::Rotation(build_track(a, |v| *v)),
                AnimationDef::Gravity(g) => HandlerKind::Gravity(GravityInit {
                    masses: g.masses.clone(),
                    velocities: g.velocities.iter().map(xy).collect(),
                }),
            };
            let handler = effect.add_handler(name, kind);
            if let Some(indices) = resolve_apply_to(name, anim.apply_to())? {
                handler.set_affected_indices(indices);
            }
        }
        effect.validate()?;

        for (template_name, template) in &self.templates {
            if let Some(texture) = template.texture()
                && !self.textures.contains_key(texture)
            {
                return Err(FxError::definition(format!(
                    "template '{template_name}': cannot find texture '{texture}'"
                )));
            }
        }
        let primitives = self
            .primitives
            .iter()
            .map(|p| {
                self.templates.get(&p.template).ok_or_else(|| {
                    FxError::definition(format!("cannot find template '{}'", p.template))
                })
            })
            .collect::<FxResult<Vec<_>>>()?;

        let ids: BTreeMap<&str, TextureId> = self
            .textures
            .iter()
            .map(|(name, def)| (name.as_str(), textures.load(def.clone())))
            .collect();
        for template in primitives {
            effect.push_element(template.to_drawable(&ids)?);
        }

        tracing::debug!(
            elements = effect.elements().len(),
            handlers = effect.handler_count(),
            "effect built"
        );
        Ok(BuiltEffect {
            name: self.name.clone(),
            effect,
        })
    }
}

impl DurationDef {
    /// Lifetime in seconds; `"endless"` maps to [`DURATION_ENDLESS`].
    pub fn seconds(&self) -> FxResult<f64> {
        match self {
            Self::Seconds(s) => Ok(*s),
            Self::Keyword(k) if k == "endless" => Ok(DURATION_ENDLESS),
            Self::Keyword(k) => Err(FxError::definition(format!("invalid duration '{k}'"))),
        }
    }
}

impl TemplateDef {
    fn to_drawable(&self, ids: &BTreeMap<&str, TextureId>) -> FxResult<Drawable> {
        let texture = self
            .texture()
            .map(|name| {
                ids.get(name)
                    .copied()
                    .ok_or_else(|| FxError::definition(format!("cannot find texture '{name}'")))
            })
            .transpose()?;

        Ok(match self {
            Self::Sprite(SpriteDef {
                color,
                source_rect,
                position,
                origin,
                rotation,
                ..
            }) => Sprite {
                transform: placement(*position, *origin, *rotation),
                texture,
                color: color.unwrap_or(Rgba8::WHITE),
                source_rect: source_rect.map(|[left, top, width, height]| IntRect {
                    left,
                    top,
                    width,
                    height,
                }),
            }
            .into(),
            Self::Circle(CircleDef {
                fill_color,
                position,
                origin,
                radius,
                rotation,
                point_count,
                ..
            }) => Circle {
                transform: placement(*position, *origin, *rotation),
                radius: radius.unwrap_or(0.0),
                point_count: point_count.unwrap_or(Circle::default().point_count),
                fill_color: fill_color.unwrap_or(Rgba8::WHITE),
                texture,
                texture_rect: None,
            }
            .into(),
            Self::Rect(RectDef {
                fill_color,
                position,
                size,
                origin,
                rotation,
                ..
            }) => Rectangle {
                transform: placement(*position, *origin, *rotation),
                size: size.map_or(Vec2::ZERO, |v| xy(&v)),
                fill_color: fill_color.unwrap_or(Rgba8::WHITE),
                texture,
                texture_rect: None,
            }
            .into(),
        })
    }
}

fn xy(v: &XY) -> Vec2 {
    Vec2::new(v[0], v[1])
}

fn placement(position: Option<XY>, origin: Option<XY>, rotation: Option<f64>) -> ElementTransform {
    ElementTransform {
        position: position.map_or(Vec2::ZERO, |v| xy(&v)),
        origin: origin.map_or(Vec2::ZERO, |v| xy(&v)),
        rotation_deg: rotation.unwrap_or(0.0),
        ..ElementTransform::default()
    }
}

fn build_key<D, T>(key: &KeyDef<D>, value: impl Fn(&D) -> T) -> Key<T> {
    let interpolation = key.interpolation.unwrap_or(
        if key.ease_in.is_some() || key.ease_out.is_some() {
            Interpolation::Bezier
        } else {
            Interpolation::Linear
        },
    );
    Key {
        value: value(&key.value),
        time: key.time,
        interpolation,
        ease_in: key.ease_in.as_ref().map_or(Vec2::ZERO, xy),
        ease_out: key.ease_out.as_ref().map_or(Vec2::ZERO, xy),
    }
}

fn build_track<D, T>(anim: &KeyedAnimationDef<D>, value: impl Fn(&D) -> T) -> KeyframeTrack<T> {
    let keys = anim.keys.iter().map(|k| build_key(k, &value)).collect();
    KeyframeTrack::from_keys(keys).with_lead_in(anim.lead_in)
}

fn resolve_apply_to(handler: &str, apply_to: Option<&ApplyTo>) -> FxResult<Option<Vec<usize>>> {
    match apply_to {
        None => Ok(None),
        Some(ApplyTo::Keyword(k)) if k == "all" => Ok(None),
        Some(ApplyTo::Keyword(k)) => Err(FxError::definition(format!(
            "animation '{handler}': invalid apply_to '{k}'"
        ))),
        Some(ApplyTo::Indices(indices)) => Ok(Some(indices.clone())),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/builder.rs"]
mod tests;
