use crate::foundation::{
    core::{Point, Vec2},
    error::{FxError, FxResult},
    math,
};

/// Values a [`KeyframeTrack`] can interpolate.
pub trait Lerp: Sized {
    /// Blend `a` towards `b` by `t` (`0` is `a`, `1` is `b`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        math::lerp(*a, *b, t)
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        math::lerp(f64::from(*a), f64::from(*b), t) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

/// How the segment ending at a key is interpolated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Step: keep the previous key's value until this key's segment is left.
    Hold,
    /// Straight blend.
    #[default]
    Linear,
    /// Cubic curve on the keys' control offsets; only their `y` shapes the blend.
    Bezier,
}

/// A CSS-style cubic timing curve from `(0,0)` to `(1,1)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicEase {
    /// First control point.
    pub p1: Vec2,
    /// Second control point.
    pub p2: Vec2,
}

impl CubicEase {
    /// `cubic-bezier(0, 0, 1, 1)`.
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// CSS `ease`.
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    /// CSS `ease-in`.
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    /// CSS `ease-out`.
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);

    /// Build a curve from raw control coordinates.
    pub const fn new(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> Self {
        Self {
            p1: Vec2::new(p1x, p1y),
            p2: Vec2::new(p2x, p2y),
        }
    }

    /// Map progress in `[0, 1]` through the curve.
    pub fn apply(self, x: f64) -> f64 {
        math::cubic_bezier_ease(self.p1, self.p2, x)
    }
}

/// One timed value in a [`KeyframeTrack`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Key<T> {
    /// Value reached at `time`.
    pub value: T,
    /// Position on the track's time axis.
    pub time: f64,
    /// Interpolation of the segment that ends at this key.
    pub interpolation: Interpolation,
    /// Control offset used when this key ends a bezier segment.
    pub ease_in: Vec2,
    /// Control offset used when this key starts a bezier segment.
    pub ease_out: Vec2,
}

impl<T> Key<T> {
    /// Key with zero control offsets.
    pub fn new(value: T, time: f64, interpolation: Interpolation) -> Self {
        Self {
            value,
            time,
            interpolation,
            ease_in: Vec2::ZERO,
            ease_out: Vec2::ZERO,
        }
    }

    fn is_bezier(&self) -> bool {
        self.interpolation == Interpolation::Bezier
    }
}

/// Behaviour of lookups that land before (or on) the first key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadIn {
    /// Return the first key's value.
    #[default]
    Clamp,
    /// Interpolate from an implicit linear key `{default value, time 0}`.
    FromDefault,
}

/// Ordered, timed keys producing a value for any query time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeTrack<T> {
    keys: Vec<Key<T>>, // sorted by time
    #[serde(default)]
    lead_in: LeadIn,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            lead_in: LeadIn::Clamp,
        }
    }
}

impl<T> KeyframeTrack<T> {
    /// Empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track built from already ordered keys.
    pub fn from_keys(keys: Vec<Key<T>>) -> Self {
        Self {
            keys,
            lead_in: LeadIn::Clamp,
        }
    }

    /// Set the lead-in behaviour.
    pub fn with_lead_in(mut self, lead_in: LeadIn) -> Self {
        self.lead_in = lead_in;
        self
    }

    /// Current lead-in behaviour.
    pub fn lead_in(&self) -> LeadIn {
        self.lead_in
    }

    /// Keys in time order.
    pub fn keys(&self) -> &[Key<T>] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Return `true` when the track has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Append a key. Keys must be pushed in non-decreasing time order.
    pub fn push(&mut self, key: Key<T>) -> &mut Self {
        self.keys.push(key);
        self
    }

    /// Append a step key.
    pub fn push_hold(&mut self, value: T, time: f64) -> &mut Self {
        self.push(Key::new(value, time, Interpolation::Hold))
    }

    /// Append a linear key.
    pub fn push_linear(&mut self, value: T, time: f64) -> &mut Self {
        self.push(Key::new(value, time, Interpolation::Linear))
    }

    /// Append a bezier key whose incoming side is straight.
    pub fn push_linear_to_bezier(&mut self, value: T, time: f64, ease_out: Vec2) -> &mut Self {
        self.push(Key {
            ease_in: Vec2::ZERO,
            ease_out,
            ..Key::new(value, time, Interpolation::Bezier)
        })
    }

    /// Append a bezier key whose outgoing side is straight.
    pub fn push_bezier_to_linear(&mut self, value: T, time: f64, ease_in: Vec2) -> &mut Self {
        self.push(Key {
            ease_in,
            ease_out: Vec2::new(1.0, 1.0),
            ..Key::new(value, time, Interpolation::Bezier)
        })
    }

    /// Append a bezier key with both control offsets.
    pub fn push_bezier(&mut self, value: T, time: f64, ease_in: Vec2, ease_out: Vec2) -> &mut Self {
        self.push(Key {
            ease_in,
            ease_out,
            ..Key::new(value, time, Interpolation::Bezier)
        })
    }

    /// Rescale key times so the last key sits at `1.0`.
    ///
    /// Tracks whose last key is at time zero (or not finite) are left untouched.
    pub fn normalize_time(&mut self) {
        let Some(max) = self.keys.last().map(|k| k.time) else {
            return;
        };
        if !max.is_finite() || max == 0.0 {
            return;
        }
        for key in &mut self.keys {
            key.time /= max;
        }
    }

    /// Check that key times are finite and non-decreasing.
    pub fn validate(&self) -> FxResult<()> {
        if self.keys.iter().any(|k| !k.time.is_finite()) {
            return Err(FxError::animation("key times must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(FxError::animation("keys must be sorted by time"));
        }
        Ok(())
    }
}

impl<T> KeyframeTrack<T>
where
    T: Lerp + Clone + Default,
{
    /// Value of the track at time `t`.
    ///
    /// Queries past the last key clamp to its value; queries before the first key
    /// follow [`LeadIn`].
    pub fn lookup(&self, t: f64) -> T {
        let keys = match self.keys.as_slice() {
            [] => return T::default(),
            [only] => return only.value.clone(),
            keys => keys,
        };

        let idx = keys.partition_point(|k| k.time < t);
        let Some(k2) = keys.get(idx) else {
            return keys[keys.len() - 1].value.clone();
        };

        if idx == 0 {
            return match self.lead_in {
                LeadIn::Clamp => k2.value.clone(),
                LeadIn::FromDefault => {
                    let origin = Key::new(T::default(), 0.0, Interpolation::Linear);
                    interpolate(&origin, k2, t)
                }
            };
        }

        interpolate(&keys[idx - 1], k2, t)
    }
}

fn interpolate<T>(k1: &Key<T>, k2: &Key<T>, t: f64) -> T
where
    T: Lerp + Clone,
{
    if k2.interpolation == Interpolation::Hold {
        return k1.value.clone();
    }

    let u = math::inverse_lerp(k1.time, k2.time, t).clamp(0.0, 1.0);
    let straight = Vec2::new(1.0, 1.0);
    let controls = match (k1.is_bezier(), k2.is_bezier()) {
        (false, false) => None,
        (false, true) => Some((Vec2::ZERO, k2.ease_in)),
        (true, false) => Some((k1.ease_out, straight)),
        (true, true) => Some((k1.ease_out, k2.ease_in)),
    };
    // The curve's y at parameter `u` is the blend fraction; x is not solved for.
    let f = controls.map_or(u, |(p1, p2)| math::bezier3(0.0, p1.y, p2.y, 1.0, u));
    T::lerp(&k1.value, &k2.value, f)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
