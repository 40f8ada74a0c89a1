use crate::foundation::error::{FxError, FxResult};

pub use kurbo::{Affine, Point, Vec2};

/// Integer draw-order bucket. Lower layers render first.
pub type Layer = i32;

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Build a colour from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> FxResult<Self> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| FxError::definition(format!("colour '{s}' must start with '#'")))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(FxError::definition(format!(
                "colour '{s}' must have 6 or 8 hex digits"
            )));
        }

        let channel = |i: usize| -> FxResult<u8> {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| FxError::definition(format!("colour '{s}' is not valid hex")))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// Format as `#rrggbb`, appending alpha only when it is not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj { r: u8, g: u8, b: u8, a: u8 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self { r, g, b, a }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
