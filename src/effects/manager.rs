use std::{collections::BTreeMap, rc::Rc};

use crate::{
    effects::{
        effect::Effect,
        instance::{EffectInstance, InstancePhase},
    },
    foundation::core::{Layer, Vec2},
    scene::graph::Scene,
};

/// Named effect library plus the instances currently playing in a scene.
#[derive(Debug)]
pub struct EffectManager {
    scene: Scene,
    effects: BTreeMap<String, Rc<Effect>>,
    running: Vec<EffectInstance>,
}

impl EffectManager {
    /// Manager spawning batches into `scene`.
    pub fn new(scene: &Scene) -> Self {
        Self {
            scene: scene.clone(),
            effects: BTreeMap::new(),
            running: Vec::new(),
        }
    }

    /// Scene instances are spawned into.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Register `effect` under `name`, replacing any previous definition.
    ///
    /// Instances already playing keep the definition they were started with.
    pub fn add_effect(&mut self, name: impl Into<String>, effect: Effect) {
        let name = name.into();
        tracing::debug!(
            name = %name,
            elements = effect.elements().len(),
            handlers = effect.handler_count(),
            "effect registered"
        );
        self.effects.insert(name, Rc::new(effect));
    }

    /// Unregister `name`; running instances are unaffected.
    pub fn remove_effect(&mut self, name: &str) -> bool {
        self.effects.remove(name).is_some()
    }

    /// Whether `name` is registered.
    pub fn contains_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Registered effect called `name`.
    pub fn effect(&self, name: &str) -> Option<&Effect> {
        self.effects.get(name).map(Rc::as_ref)
    }

    /// Edit a registered effect.
    ///
    /// Returns `None` while instances of it are still playing.
    pub fn effect_mut(&mut self, name: &str) -> Option<&mut Effect> {
        self.effects.get_mut(name).and_then(Rc::get_mut)
    }

    /// Names of registered effects, sorted.
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// Start an instance of `name` on `layer`, translated by `position` and scaled by
    /// `scale` about its element centroid.
    ///
    /// Returns `false` and creates nothing when `name` is unknown.
    pub fn play(&mut self, name: &str, layer: Layer, position: Vec2, scale: Vec2) -> bool {
        let Some(effect) = self.effects.get(name) else {
            tracing::debug!(name, "play: unknown effect");
            return false;
        };
        let instance = EffectInstance::spawn(&self.scene, layer, Rc::clone(effect));
        instance.move_by(position);
        instance.scale(scale);
        tracing::debug!(name, layer, batch = ?instance.batch_id(), "effect started");
        self.running.push(instance);
        true
    }

    /// Advance every running instance by `timestep` seconds.
    ///
    /// Instances that time out during this call release their batch before it returns.
    #[tracing::instrument(level = "trace", skip(self), fields(running = self.running.len()))]
    pub fn update(&mut self, timestep: f64) {
        self.running.retain_mut(|instance| match instance.update(timestep) {
            InstancePhase::Running => true,
            InstancePhase::Finished | InstancePhase::Released => {
                instance.release();
                tracing::trace!(elapsed = instance.elapsed(), "effect finished");
                false
            }
        });
    }

    /// Cancel and release every running instance.
    pub fn stop_all(&mut self) {
        for mut instance in self.running.drain(..) {
            instance.cancel();
            instance.release();
        }
    }

    /// Number of instances still playing.
    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Instances still playing, in start order.
    pub fn running(&self) -> &[EffectInstance] {
        &self.running
    }

    /// Mutable access to playing instances.
    pub fn running_mut(&mut self) -> &mut [EffectInstance] {
        &mut self.running
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/manager.rs"]
mod tests;
