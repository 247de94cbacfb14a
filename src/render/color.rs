//! Colors and the named palette.

use serde::{Deserialize, Serialize};

/// An RGBA8 color. Serialized as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha. Only zero versus non-zero matters when drawing.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Color from all four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque color from `0xRRGGBB`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Channels in memory order.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Whether drawing this color writes a pixel.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.a > 0
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

/// Named colors used for terrain, entities and text.
///
/// Defaults are Crayola crayon colors. A sprite atlas may ship its own
/// palette; any names it sets override these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Palette {
    pub timberwolf: Color,
    pub gray: Color,
    pub black: Color,
    pub asparagus: Color,
    pub chestnut: Color,
    pub wild_blue_yonder: Color,
    pub aquamarine: Color,
    pub forest_green: Color,
    pub pine_green: Color,
    pub outer_space: Color,
    pub tumbleweed: Color,
    pub beaver: Color,
    pub violet_purple: Color,
    pub manatee: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            timberwolf: Color::from_hex(0x00DB_D7D2),
            gray: Color::from_hex(0x008B_8680),
            black: Color::BLACK,
            asparagus: Color::from_hex(0x0087_A96B),
            chestnut: Color::from_hex(0x00BC_5D58),
            wild_blue_yonder: Color::from_hex(0x00A2_ADD0),
            aquamarine: Color::from_hex(0x0078_DBE2),
            forest_green: Color::from_hex(0x006D_AE81),
            pine_green: Color::from_hex(0x0015_8078),
            outer_space: Color::from_hex(0x0041_4A4C),
            tumbleweed: Color::from_hex(0x00DE_AA88),
            beaver: Color::from_hex(0x009F_8170),
            violet_purple: Color::from_hex(0x0092_6EAE),
            manatee: Color::from_hex(0x0097_9AAA),
        }
    }
}
