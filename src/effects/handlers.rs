use std::rc::Rc;

use crate::{
    animation::keyframes::KeyframeTrack,
    foundation::core::Vec2,
    foundation::math,
    scene::drawable::Drawable,
};

/// Per-call dispatch state handed to handlers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Step being applied, in seconds.
    pub timestep: f64,
    /// `timestep / duration`.
    pub timestep_coef: f64,
    /// Time accumulated before this step.
    pub elapsed: f64,
    /// `elapsed / duration`; not clamped, may exceed `1.0` slightly.
    pub time_elapsed_coef: f64,
    /// Index of the element being updated.
    pub idx: usize,
    /// Number of elements in the batch.
    pub element_count: usize,
}

/// Host-authored update.
///
/// Receives the whole element list; [`FrameState::idx`] names the element being
/// visited, so siblings can be read or written as well.
pub type CustomHandler = Rc<dyn Fn(&mut [Drawable], &FrameState)>;

/// Initial bodies for the pairwise gravity handler.
///
/// Elements past the end of either list default to mass `1.0` and zero velocity.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GravityInit {
    /// Mass per element index.
    #[serde(default)]
    pub masses: Vec<f64>,
    /// Initial velocity per element index.
    #[serde(default)]
    pub velocities: Vec<Vec2>,
}

/// What a handler does to each element it visits.
#[derive(Clone)]
pub enum HandlerKind {
    /// Write the track's value as the element position.
    Position(KeyframeTrack<Vec2>),
    /// Write the track's value as the element scale.
    Scale(KeyframeTrack<Vec2>),
    /// Write the track's value as the element rotation in degrees.
    Rotation(KeyframeTrack<f64>),
    /// O(n²) pairwise attraction between the batch's elements.
    Gravity(GravityInit),
    /// Arbitrary callback.
    Custom(CustomHandler),
}

impl HandlerKind {
    /// Wrap a closure that only touches the visited element.
    pub fn custom(f: impl Fn(&mut Drawable, &FrameState) + 'static) -> Self {
        Self::Custom(Rc::new(move |elements: &mut [Drawable], frame: &FrameState| {
            f(&mut elements[frame.idx], frame)
        }))
    }

    /// Wrap a closure that sees every element of the batch.
    pub fn custom_batch(f: impl Fn(&mut [Drawable], &FrameState) + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position(_) => "position",
            Self::Scale(_) => "scale",
            Self::Rotation(_) => "rotation",
            Self::Gravity(_) => "gravity",
            Self::Custom(_) => "custom",
        }
    }

    pub(crate) fn initial_state(&self) -> HandlerState {
        match self {
            Self::Gravity(init) => HandlerState::Gravity(GravityState {
                masses: init.masses.clone(),
                velocities: init.velocities.clone(),
            }),
            _ => HandlerState::Stateless,
        }
    }

    fn apply(&self, elements: &mut [Drawable], state: &mut HandlerState, frame: &FrameState) {
        let idx = frame.idx;
        match (self, state) {
            (Self::Position(track), _) => {
                elements[idx].set_position(track.lookup(frame.time_elapsed_coef));
            }
            (Self::Scale(track), _) => {
                elements[idx].set_scale(track.lookup(frame.time_elapsed_coef));
            }
            (Self::Rotation(track), _) => {
                elements[idx].set_rotation(track.lookup(frame.time_elapsed_coef));
            }
            (Self::Gravity(_), HandlerState::Gravity(gravity)) => {
                gravity.step(elements, idx, frame.timestep);
            }
            (Self::Gravity(_), HandlerState::Stateless) => {}
            (Self::Custom(f), _) => f(elements, frame),
        }
    }
}

impl std::fmt::Debug for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position(t) => f.debug_tuple("Position").field(t).finish(),
            Self::Scale(t) => f.debug_tuple("Scale").field(t).finish(),
            Self::Rotation(t) => f.debug_tuple("Rotation").field(t).finish(),
            Self::Gravity(g) => f.debug_tuple("Gravity").field(g).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Simulation state owned by an effect instance for one of its handlers.
#[derive(Clone, Debug, PartialEq)]
pub enum HandlerState {
    /// Handler keeps nothing between frames.
    Stateless,
    /// Gravity bodies.
    Gravity(GravityState),
}

/// Live masses and velocities for a gravity handler, keyed by element index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GravityState {
    /// Mass per element.
    pub masses: Vec<f64>,
    /// Velocity per element.
    pub velocities: Vec<Vec2>,
}

impl GravityState {
    fn ensure_len(&mut self, n: usize) {
        if self.masses.len() < n {
            self.masses.resize(n, 1.0);
        }
        if self.velocities.len() < n {
            self.velocities.resize(n, Vec2::ZERO);
        }
    }

    /// Accelerate element `idx` towards every other element and move it.
    pub fn step(&mut self, bodies: &mut [Drawable], idx: usize, timestep: f64) {
        self.ensure_len(bodies.len());
        let here = bodies[idx].position();

        let accel = bodies
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != idx)
            .fold(Vec2::ZERO, |acc, (j, body)| {
                acc + math::unit_or_zero(body.position() - here) * self.masses[j]
            });

        let velocity = &mut self.velocities[idx];
        *velocity += accel * timestep;
        bodies[idx].move_by(*velocity * timestep);
    }
}

/// A handler plus the set of element indices it visits.
#[derive(Clone, Debug)]
pub struct Handler {
    kind: HandlerKind,
    affects_all: bool,
    affected_indices: Vec<usize>,
}

impl Handler {
    /// Handler visiting every element.
    pub fn new(kind: HandlerKind) -> Self {
        Self {
            kind,
            affects_all: true,
            affected_indices: Vec::new(),
        }
    }

    /// Behaviour.
    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    /// Mutable behaviour.
    pub fn kind_mut(&mut self) -> &mut HandlerKind {
        &mut self.kind
    }

    /// Restrict the handler to `indices`, visited in the given order.
    pub fn set_affected_indices(&mut self, indices: impl IntoIterator<Item = usize>) -> &mut Self {
        self.affects_all = false;
        self.affected_indices = indices.into_iter().collect();
        self
    }

    /// Switch between visiting every element and the stored index list.
    pub fn set_affects_all(&mut self, value: bool) -> &mut Self {
        self.affects_all = value;
        self
    }

    /// Whether every element is visited.
    pub fn affects_all(&self) -> bool {
        self.affects_all
    }

    /// Stored index list (ignored while [`Handler::affects_all`] is set).
    pub fn affected_indices(&self) -> &[usize] {
        &self.affected_indices
    }

    /// Invoke the handler on every element it affects.
    pub(crate) fn dispatch(
        &self,
        elements: &mut [Drawable],
        state: &mut HandlerState,
        mut frame: FrameState,
    ) {
        frame.element_count = elements.len();
        if self.affects_all {
            for idx in 0..elements.len() {
                frame.idx = idx;
                self.kind.apply(elements, state, &frame);
            }
        } else {
            for &idx in &self.affected_indices {
                if idx >= elements.len() {
                    tracing::trace!(idx, len = elements.len(), "affected index out of range");
                    continue;
                }
                frame.idx = idx;
                self.kind.apply(elements, state, &frame);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/handlers.rs"]
mod tests;
