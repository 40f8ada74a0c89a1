//! flarefx is a real-time visual-effects engine.
//!
//! It keeps a layered scene of element batches and plays keyframed particle
//! effects into it, frame by frame.
//!
//! # Pipeline overview
//!
//! 1. **Define**: build an [`Effect`] in code or load an [`EffectDefinition`] from JSON
//! 2. **Register**: hand it to an [`EffectManager`] under a name
//! 3. **Play**: `play(name, layer, position, scale)` copies the effect into a new batch
//! 4. **Update**: `update(dt)` runs every handler over every running instance and
//!    releases instances that timed out
//! 5. **Draw**: [`Scene::draw`] walks batches by layer, then creation order, and hands
//!    each element with its world transform to a [`RenderTarget`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: scenes and handles are `Rc`-based and deliberately `!Send`.
//! - **Counted handles**: a batch marked delete-later disappears when its last
//!   [`ItemHandle`] is dropped; batches are never deleted implicitly otherwise.
//! - **No IO in the core**: textures are ids; pixels belong to the backend.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod definition;
mod effects;
mod foundation;
mod render;
mod scene;

pub use animation::keyframes::{CubicEase, Interpolation, Key, KeyframeTrack, LeadIn, Lerp};
pub use definition::builder::BuiltEffect;
pub use definition::model::{
    AnimationDef, ApplyTo, CircleDef, DurationDef, EffectDefinition, GravityAnimationDef, KeyDef,
    KeyedAnimationDef, PrimitiveDef, RectDef, SpriteDef, TemplateDef, XY,
};
pub use definition::textures::{TextureCache, TextureDef};
pub use effects::effect::{DURATION_ENDLESS, Effect};
pub use effects::handlers::{
    CustomHandler, FrameState, GravityInit, GravityState, Handler, HandlerKind, HandlerState,
};
pub use effects::instance::{EffectInstance, InstancePhase};
pub use effects::manager::EffectManager;
pub use foundation::core::{Affine, Layer, Point, Rgba8, Vec2};
pub use foundation::error::{FxError, FxResult};
pub use render::target::{DrawCommand, DrawList, RenderStates, RenderTarget};
pub use scene::batch::Batch;
pub use scene::drawable::{
    Circle, Convex, Drawable, ElementTransform, IntRect, Rectangle, Sprite, Text, TextureId,
    circle_at,
};
pub use scene::graph::{Scene, SceneOptions};
pub use scene::handle::ItemHandle;
pub use scene::store::BatchId;
