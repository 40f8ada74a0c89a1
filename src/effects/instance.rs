use std::rc::Rc;

use crate::{
    effects::{
        effect::Effect,
        handlers::{FrameState, GravityState, HandlerState},
    },
    foundation::core::{Layer, Vec2},
    scene::{graph::Scene, handle::ItemHandle, store::BatchId},
};

/// Lifecycle of a played effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstancePhase {
    /// Handlers run on every update.
    Running,
    /// Timed out or cancelled; waiting to release its batch.
    Finished,
    /// Batch handle dropped.
    Released,
}

#[derive(Clone, Copy, Debug)]
enum Event {
    Tick(f64),
    Cancel,
    Release,
}

/// One playing copy of an [`Effect`], owning a batch in the scene.
#[derive(Debug)]
pub struct EffectInstance {
    effect: Rc<Effect>,
    batch: ItemHandle,
    states: Vec<HandlerState>,
    elapsed: f64,
    duration: f64,
    phase: InstancePhase,
}

impl EffectInstance {
    /// Copy `effect`'s elements into a new batch on `layer`.
    ///
    /// The batch is marked delete-later, so it disappears once this instance
    /// and every other handle to it are gone.
    pub(crate) fn spawn(scene: &Scene, layer: Layer, effect: Rc<Effect>) -> Self {
        let batch = scene.create_batch_with(layer, effect.elements().iter().cloned());
        batch.delete_later(true);
        let states = effect
            .handlers()
            .map(|(_, handler)| handler.kind().initial_state())
            .collect();
        let duration = effect.duration();
        Self {
            effect,
            batch,
            states,
            elapsed: 0.0,
            duration,
            phase: InstancePhase::Running,
        }
    }

    /// Template this instance was played from.
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Handle to the instance's batch.
    pub fn batch(&self) -> &ItemHandle {
        &self.batch
    }

    /// Id of the instance's batch while it is still held.
    pub fn batch_id(&self) -> Option<BatchId> {
        self.batch.id()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> InstancePhase {
        self.phase
    }

    /// Seconds accumulated so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds this instance lives for.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Override the duration of this instance only.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    /// `elapsed / duration`, or `0.0` for endless instances.
    pub fn progress(&self) -> f64 {
        normalized(self.elapsed, self.duration)
    }

    /// Whether elapsed time reached the duration.
    pub fn is_timed_out(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Gravity simulation state of the handler called `name`.
    pub fn gravity_state(&self, name: &str) -> Option<&GravityState> {
        let pos = self.effect.handlers().position(|(n, _)| n == name)?;
        match self.states.get(pos)? {
            HandlerState::Gravity(g) => Some(g),
            HandlerState::Stateless => None,
        }
    }

    /// Number of elements in the instance's batch, `0` once released.
    pub fn elements_count(&self) -> usize {
        self.batch.with(|b| b.len()).unwrap_or(0)
    }

    /// Translate the instance's batch.
    pub fn move_by(&self, delta: Vec2) -> bool {
        self.batch.move_by(delta)
    }

    /// Scale the instance's batch about its element centroid.
    pub fn scale(&self, factor: Vec2) -> bool {
        self.batch.scale(factor)
    }

    /// Advance by `timestep` seconds.
    pub fn update(&mut self, timestep: f64) -> InstancePhase {
        self.transition(Event::Tick(timestep))
    }

    /// Stop running handlers; the batch is kept until [`EffectInstance::release`].
    pub fn cancel(&mut self) -> InstancePhase {
        self.transition(Event::Cancel)
    }

    /// Drop the batch handle.
    pub fn release(&mut self) -> InstancePhase {
        self.transition(Event::Release)
    }

    fn transition(&mut self, event: Event) -> InstancePhase {
        use InstancePhase::*;

        let next = match (self.phase, event) {
            (Running, Event::Tick(dt)) => {
                if self.is_timed_out() || !self.advance(dt) || self.is_timed_out() {
                    Finished
                } else {
                    Running
                }
            }
            (Running, Event::Cancel) => Finished,
            (Running | Finished, Event::Release) => {
                self.batch.reset();
                Released
            }
            (phase, _) => phase,
        };
        if next != self.phase {
            tracing::trace!(
                from = ?self.phase,
                to = ?next,
                elapsed = self.elapsed,
                "instance phase"
            );
        }
        self.phase = next;
        next
    }

    /// Run every handler once; false when the batch vanished underneath us.
    fn advance(&mut self, timestep: f64) -> bool {
        let Self {
            effect,
            batch,
            states,
            elapsed,
            duration,
            ..
        } = self;

        let frame = FrameState {
            timestep,
            timestep_coef: normalized(timestep, *duration),
            elapsed: *elapsed,
            time_elapsed_coef: normalized(*elapsed, *duration),
            idx: 0,
            element_count: 0,
        };

        let ran = batch
            .with_mut(|b| {
                let elements = b.elements_mut();
                for ((_, handler), state) in effect.handlers().zip(states.iter_mut()) {
                    handler.dispatch(elements, state, frame);
                }
            })
            .is_some();

        if ran {
            *elapsed += timestep;
        }
        ran
    }
}

fn normalized(t: f64, duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        t / duration
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/instance.rs"]
mod tests;
