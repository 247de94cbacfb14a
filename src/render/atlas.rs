//! Sprite and font atlases: one RGBA image plus JSON metadata each.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AssetError;
use crate::render::Palette;

/// A rectangle of atlas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Build a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rectangle lies entirely inside `image`.
    #[must_use]
    pub fn fits(&self, image: &RgbaImage) -> bool {
        u64::from(self.x) + u64::from(self.w) <= u64::from(image.width())
            && u64::from(self.y) + u64::from(self.h) <= u64::from(image.height())
    }
}

#[derive(Deserialize)]
struct FrameEntry {
    frame: Rect,
}

#[derive(Deserialize)]
struct SpriteMeta {
    frames: HashMap<String, FrameEntry>,
    sprites: HashMap<String, Vec<String>>,
    #[serde(default)]
    palette: Option<Palette>,
}

/// A sprite sheet: named sprites, each a list of animation frames.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    image: RgbaImage,
    sprites: HashMap<String, Vec<Rect>>,
    palette: Option<Palette>,
}

impl SpriteAtlas {
    /// Load a sprite sheet from a PNG and its metadata file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, or the
    /// metadata is inconsistent with the image.
    pub fn load(image_path: impl AsRef<Path>, meta_path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let image = image::open(image_path.as_ref())?.to_rgba8();
        let meta = fs::read_to_string(meta_path.as_ref())?;
        let atlas = Self::from_json(image, &meta)?;
        debug!(
            path = %image_path.as_ref().display(),
            sprites = atlas.sprites.len(),
            "loaded sprite atlas"
        );
        Ok(atlas)
    }

    /// Build a sprite sheet from a decoded image and metadata JSON.
    ///
    /// Each sprite lists frame file names that are looked up in `frames`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a sprite names a frame that
    /// is not listed, or a frame lies outside the image.
    pub fn from_json(image: RgbaImage, json: &str) -> Result<Self, AssetError> {
        let meta: SpriteMeta = serde_json::from_str(json)?;
        let mut sprites = HashMap::with_capacity(meta.sprites.len());
        for (name, files) in meta.sprites {
            let frames = files
                .iter()
                .map(|file| {
                    meta.frames
                        .get(file)
                        .map(|entry| entry.frame)
                        .ok_or_else(|| AssetError::MissingSprite { name: file.clone() })
                })
                .collect::<Result<Vec<_>, _>>()?;
            sprites.insert(name, frames);
        }
        Self::from_parts(image, sprites, meta.palette)
    }

    /// Build a sprite sheet from already resolved parts.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::FrameOutOfBounds`] if any frame lies outside the
    /// image.
    pub fn from_parts(
        image: RgbaImage,
        sprites: HashMap<String, Vec<Rect>>,
        palette: Option<Palette>,
    ) -> Result<Self, AssetError> {
        if let Some((name, _)) = sprites
            .iter()
            .find(|(_, frames)| frames.iter().any(|r| !r.fits(&image)))
        {
            return Err(AssetError::FrameOutOfBounds { name: name.clone() });
        }
        Ok(Self {
            image,
            sprites,
            palette,
        })
    }

    /// Source rectangle of one frame of a sprite.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::MissingSprite`] for an unknown name and
    /// [`AssetError::MissingFrame`] for a frame index past the end.
    pub fn frame(&self, name: &str, frame: usize) -> Result<Rect, AssetError> {
        let frames = self.sprites.get(name).ok_or_else(|| AssetError::MissingSprite {
            name: name.to_string(),
        })?;
        frames.get(frame).copied().ok_or_else(|| AssetError::MissingFrame {
            name: name.to_string(),
            frame,
        })
    }

    /// Number of frames in a sprite, if it exists.
    #[must_use]
    pub fn frame_count(&self, name: &str) -> Option<usize> {
        self.sprites.get(name).map(Vec::len)
    }

    /// The sheet image.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Palette shipped with the sheet, if any.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }
}

#[derive(Deserialize)]
struct FontMeta {
    characters: HashMap<String, [u32; 4]>,
}

/// A bitmap font: one glyph rectangle per character.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    image: RgbaImage,
    glyphs: HashMap<char, Rect>,
}

impl FontAtlas {
    /// Horizontal advance of a space.
    pub const SPACE_WIDTH: i32 = 4;
    /// Distance between baselines.
    pub const LINE_HEIGHT: i32 = 9;

    /// Load a font from a PNG and its metadata file.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, or a glyph
    /// lies outside the image.
    pub fn load(image_path: impl AsRef<Path>, meta_path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let image = image::open(image_path.as_ref())?.to_rgba8();
        let meta = fs::read_to_string(meta_path.as_ref())?;
        let font = Self::from_json(image, &meta)?;
        debug!(glyphs = font.glyphs.len(), "loaded font atlas");
        Ok(font)
    }

    /// Build a font from a decoded image and metadata JSON.
    ///
    /// Keys longer than one character are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a glyph lies outside the
    /// image.
    pub fn from_json(image: RgbaImage, json: &str) -> Result<Self, AssetError> {
        let meta: FontMeta = serde_json::from_str(json)?;
        let mut glyphs = HashMap::with_capacity(meta.characters.len());
        for (key, [x, y, w, h]) in meta.characters {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    glyphs.insert(c, Rect::new(x, y, w, h));
                }
                _ => warn!(key = %key, "skipping font entry that is not a single character"),
            }
        }
        Self::from_parts(image, glyphs)
    }

    /// Build a font from already resolved glyphs.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::FrameOutOfBounds`] if any glyph lies outside the
    /// image.
    pub fn from_parts(image: RgbaImage, glyphs: HashMap<char, Rect>) -> Result<Self, AssetError> {
        if let Some((c, _)) = glyphs.iter().find(|(_, r)| !r.fits(&image)) {
            return Err(AssetError::FrameOutOfBounds {
                name: c.to_string(),
            });
        }
        Ok(Self { image, glyphs })
    }

    /// Glyph rectangle for a character, if the font has one.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<Rect> {
        self.glyphs.get(&c).copied()
    }

    /// The glyph sheet image.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sheet() -> RgbaImage {
        RgbaImage::from_pixel(16, 8, Rgba([255, 0, 0, 255]))
    }

    const SPRITES: &str = r#"{
        "frames": {
            "sheep_0.png": {"frame": {"x": 0, "y": 0, "w": 8, "h": 8}},
            "sheep_1.png": {"frame": {"x": 8, "y": 0, "w": 8, "h": 8}}
        },
        "sprites": {"sheep": ["sheep_0.png", "sheep_1.png"]},
        "palette": {"black": [1, 1, 1, 255]}
    }"#;

    #[test]
    fn test_sprite_frames() {
        let atlas = SpriteAtlas::from_json(sheet(), SPRITES).unwrap();
        assert_eq!(atlas.frame_count("sheep"), Some(2));
        assert_eq!(atlas.frame("sheep", 1).unwrap(), Rect::new(8, 0, 8, 8));
        assert_eq!(atlas.palette().unwrap().black, crate::render::Color::rgb(1, 1, 1));
    }

    #[test]
    fn test_missing_sprite_and_frame() {
        let atlas = SpriteAtlas::from_json(sheet(), SPRITES).unwrap();
        assert!(matches!(
            atlas.frame("wolf", 0),
            Err(AssetError::MissingSprite { .. })
        ));
        assert!(matches!(
            atlas.frame("sheep", 2),
            Err(AssetError::MissingFrame { frame: 2, .. })
        ));
    }

    #[test]
    fn test_frame_out_of_bounds() {
        let json = r#"{"frames": {"a": {"frame": {"x": 12, "y": 0, "w": 8, "h": 8}}},
                       "sprites": {"a": ["a"]}}"#;
        assert!(matches!(
            SpriteAtlas::from_json(sheet(), json),
            Err(AssetError::FrameOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_sprite_lists_unknown_file() {
        let json = r#"{"frames": {}, "sprites": {"a": ["nope"]}}"#;
        assert!(matches!(
            SpriteAtlas::from_json(sheet(), json),
            Err(AssetError::MissingSprite { .. })
        ));
    }

    #[test]
    fn test_font_glyphs() {
        let json = r#"{"characters": {"a": [0, 0, 3, 5], "bc": [0, 0, 1, 1]}}"#;
        let font = FontAtlas::from_json(sheet(), json).unwrap();
        assert_eq!(font.glyph('a'), Some(Rect::new(0, 0, 3, 5)));
        assert_eq!(font.glyph('b'), None);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            FontAtlas::from_json(sheet(), "{"),
            Err(AssetError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("sprites.png");
        let meta = dir.path().join("sprites.json");
        sheet().save(&png).unwrap();
        fs::write(&meta, SPRITES).unwrap();

        let atlas = SpriteAtlas::load(&png, &meta).unwrap();
        assert_eq!(atlas.image().dimensions(), (16, 8));

        let missing = SpriteAtlas::load(dir.path().join("nope.png"), &meta);
        assert!(missing.is_err());
    }
}
