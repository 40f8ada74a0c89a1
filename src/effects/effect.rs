use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    effects::handlers::{Handler, HandlerKind},
    foundation::error::{FxError, FxResult},
    scene::drawable::Drawable,
};

/// Duration of an effect that never times out on its own.
pub const DURATION_ENDLESS: f64 = f64::INFINITY;

/// Reusable effect template: elements, named handlers and a duration.
///
/// Handlers run in name order. Playing an effect copies the elements into a fresh
/// batch, so edits made here after [`crate::EffectManager::play`] do not reach
/// running instances.
#[derive(Clone, Debug)]
pub struct Effect {
    elements: Vec<Drawable>,
    handlers: BTreeMap<String, Handler>,
    duration: f64,
}

impl Default for Effect {
    fn default() -> Self {
        Self::new(DURATION_ENDLESS)
    }
}

impl Effect {
    /// Empty effect lasting `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            elements: Vec::new(),
            handlers: BTreeMap::new(),
            duration,
        }
    }

    /// Insert or replace the handler called `name`.
    pub fn add_handler(&mut self, name: impl Into<String>, kind: HandlerKind) -> &mut Handler {
        let name = name.into();
        tracing::trace!(name = %name, kind = kind.name(), "add handler");
        match self.handlers.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(Handler::new(kind));
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(Handler::new(kind)),
        }
    }

    /// Handler called `name`, if any.
    pub fn get_handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    /// Mutable handler called `name`, if any.
    pub fn get_handler_mut(&mut self, name: &str) -> Option<&mut Handler> {
        self.handlers.get_mut(name)
    }

    /// Drop the handler called `name`, returning it.
    pub fn remove_handler(&mut self, name: &str) -> Option<Handler> {
        self.handlers.remove(name)
    }

    /// Handlers in dispatch order.
    pub fn handlers(&self) -> impl ExactSizeIterator<Item = (&str, &Handler)> {
        self.handlers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Template elements copied into each played batch.
    pub fn elements(&self) -> &[Drawable] {
        &self.elements
    }

    /// Mutable template elements.
    pub fn elements_mut(&mut self) -> &mut Vec<Drawable> {
        &mut self.elements
    }

    /// Append an element and return its index.
    pub fn push_element(&mut self, element: impl Into<Drawable>) -> usize {
        self.elements.push(element.into());
        self.elements.len() - 1
    }

    /// Seconds before an instance times out.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Set the duration used by instances played from now on.
    pub fn set_duration(&mut self, duration: f64) -> &mut Self {
        self.duration = duration;
        self
    }

    /// Reject durations that cannot drive normalized time and malformed tracks.
    pub fn validate(&self) -> FxResult<()> {
        if self.duration.is_nan() || self.duration < 0.0 {
            return Err(FxError::definition(format!(
                "effect duration must be non-negative, got {}",
                self.duration
            )));
        }
        for (name, handler) in &self.handlers {
            let checked = match handler.kind() {
                HandlerKind::Position(t) | HandlerKind::Scale(t) => t.validate(),
                HandlerKind::Rotation(t) => t.validate(),
                HandlerKind::Gravity(g) => {
                    if g.masses.iter().any(|m| !m.is_finite()) {
                        Err(FxError::definition("gravity masses must be finite"))
                    } else {
                        Ok(())
                    }
                }
                HandlerKind::Custom(_) => Ok(()),
            };
            checked.map_err(|e| FxError::definition(format!("handler '{name}': {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect.rs"]
mod tests;
