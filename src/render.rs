//! Software rendering: colors, atlases and the rasterizer.

mod atlas;
mod color;
mod renderer;

pub use atlas::{FontAtlas, Rect, SpriteAtlas};
pub use color::{Color, Palette};
pub use renderer::{
    BlitOptions, FrameSink, Renderer, TEXT_DEPTH, TextAlign, TextStyle, fit_viewport,
};
