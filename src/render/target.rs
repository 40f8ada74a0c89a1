use crate::{foundation::core::Affine, scene::drawable::Drawable};

/// Global state applied to a whole draw pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStates {
    /// Transform prepended to every batch's world transform.
    pub transform: Affine,
}

impl Default for RenderStates {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
        }
    }
}

/// Sink for drawables in final draw order.
pub trait RenderTarget {
    /// Draw one element with its fully composed transform.
    fn draw(&mut self, element: &Drawable, transform: Affine);
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DrawCommand {
    /// Element as it was at draw time.
    pub element: Drawable,
    /// Composed element-to-target transform.
    pub transform: Affine,
}

/// Target that records draw calls instead of rasterising them.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct DrawList {
    /// Commands in submission order.
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Return `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderTarget for DrawList {
    fn draw(&mut self, element: &Drawable, transform: Affine) {
        self.commands.push(DrawCommand {
            element: element.clone(),
            transform,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
