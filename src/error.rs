//! Error types for asset loading and sprite drawing.

use std::fmt;
use std::io;

/// Failure to load an atlas or draw from it.
#[derive(Debug)]
pub enum AssetError {
    /// Reading an atlas file failed.
    Io(io::Error),
    /// Decoding an atlas image failed.
    Image(image::ImageError),
    /// Parsing atlas metadata failed.
    Json(serde_json::Error),
    /// The sprite sheet has no sprite by this name.
    MissingSprite {
        /// Requested sprite name.
        name: String,
    },
    /// The sprite exists but has fewer frames than requested.
    MissingFrame {
        /// Sprite name.
        name: String,
        /// Requested frame index.
        frame: usize,
    },
    /// A metadata rectangle reaches outside the atlas image.
    FrameOutOfBounds {
        /// Frame or glyph that is out of bounds.
        name: String,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "asset read failed: {e}"),
            AssetError::Image(e) => write!(f, "atlas image decode failed: {e}"),
            AssetError::Json(e) => write!(f, "atlas metadata parse failed: {e}"),
            AssetError::MissingSprite { name } => write!(f, "no sprite named '{name}'"),
            AssetError::MissingFrame { name, frame } => {
                write!(f, "sprite '{name}' has no frame {frame}")
            }
            AssetError::FrameOutOfBounds { name } => {
                write!(f, "atlas rectangle '{name}' lies outside the image")
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(e) => Some(e),
            AssetError::Image(e) => Some(e),
            AssetError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Image(e)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Json(e)
    }
}
