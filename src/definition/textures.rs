use std::collections::BTreeMap;

use crate::scene::drawable::TextureId;

fn default_smooth() -> bool {
    true
}

/// Texture file plus sampling flags; identical definitions share one [`TextureId`].
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TextureDef {
    /// Image path, resolved by the rendering backend.
    pub path: String,
    /// Bilinear filtering.
    #[serde(default = "default_smooth")]
    pub smooth: bool,
    /// Treat texels as sRGB.
    #[serde(default)]
    pub srgb: bool,
    /// Repeat outside `[0, 1]` texture coordinates.
    #[serde(default)]
    pub repeated: bool,
}

impl TextureDef {
    /// Definition with default flags (smooth, linear, clamped).
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            smooth: true,
            srgb: false,
            repeated: false,
        }
    }
}

/// Registry deduplicating texture definitions into ids.
///
/// Pixels are never decoded here; a backend maps ids to GPU or CPU images.
#[derive(Clone, Debug, Default)]
pub struct TextureCache {
    ids: BTreeMap<TextureDef, TextureId>,
    defs: Vec<TextureDef>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `def`, registering it on first use.
    pub fn load(&mut self, def: TextureDef) -> TextureId {
        if let Some(&id) = self.ids.get(&def) {
            return id;
        }
        let id = TextureId(self.defs.len() as u32);
        tracing::debug!(?id, path = %def.path, "texture registered");
        self.defs.push(def.clone());
        self.ids.insert(def, id);
        id
    }

    /// Definition behind `id`.
    pub fn get(&self, id: TextureId) -> Option<&TextureDef> {
        self.defs.get(id.0 as usize)
    }

    /// Id already assigned to `def`, without registering it.
    pub fn find(&self, def: &TextureDef) -> Option<TextureId> {
        self.ids.get(def).copied()
    }

    /// Number of distinct textures.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Registered textures in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &TextureDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (TextureId(i as u32), def))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/textures.rs"]
mod tests;
