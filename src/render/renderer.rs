//! Software rasterizer with a depth buffer.
//!
//! Each frame follows the same protocol: [`Renderer::clear`], any number of
//! draw calls, then [`Renderer::update`] to hand the pixels to a
//! [`FrameSink`]. Depth is a painter's-order key: a write lands when its depth
//! is greater than or equal to what is already there, so callers pass the
//! world y coordinate to have lower objects cover higher ones.

// Float coordinates are truncated toward zero, like integer pixel snapping
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::sync::Arc;

use glam::IVec2;
use image::{Rgba, RgbaImage};

use crate::error::AssetError;
use crate::geom::{clip_segment, fill_circle, line};
use crate::render::{Color, FontAtlas, Rect, SpriteAtlas};

/// Depth used for text so it lands on top of the scene.
pub const TEXT_DEPTH: f32 = 10_000.0;

/// Receives a finished frame.
pub trait FrameSink {
    /// Error raised when presenting fails.
    type Error;

    /// Show one frame of `width × height` RGBA8 pixels, row-major.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn present(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), Self::Error>;
}

/// Horizontal anchoring of text relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the right edge.
    Right,
    /// `x` is the middle.
    Center,
}

/// How [`Renderer::text`] lays out and colors a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Anchoring.
    pub align: TextAlign,
    /// Glyph color.
    pub color: Color,
    /// Drop shadow color, drawn one pixel down and down-right.
    pub shadow: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            align: TextAlign::Left,
            color: Color::BLACK,
            shadow: None,
        }
    }
}

/// Options for [`Renderer::draw_image`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitOptions {
    /// Mirror horizontally within the destination rectangle.
    pub flip_x: bool,
    /// Depth written with every pixel.
    pub depth: f32,
    /// Paint every opaque source pixel in this color instead.
    pub tint: Option<Color>,
}

impl Default for BlitOptions {
    fn default() -> Self {
        Self {
            flip_x: false,
            depth: f32::NEG_INFINITY,
            tint: None,
        }
    }
}

/// Largest integer scale that keeps both sides of a window at least
/// `min_pixels` game pixels, and the viewport it gives.
///
/// Windows smaller than `min_pixels` get a scale of one.
#[must_use]
pub fn fit_viewport(window_w: u32, window_h: u32, min_pixels: u32) -> (u32, u32, u32) {
    let min = min_pixels.max(1);
    let scale = (window_w / min).min(window_h / min).max(1);
    (window_w / scale, window_h / scale, scale)
}

/// Off-screen RGBA8 frame with a depth buffer, camera and optional atlases.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    depth: Vec<f32>,
    camera: IVec2,
    clear_color: Color,
    sprites: Option<Arc<SpriteAtlas>>,
    font: Option<Arc<FontAtlas>>,
}

impl Renderer {
    /// Create a cleared renderer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut renderer = Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            depth: Vec::new(),
            camera: IVec2::ZERO,
            clear_color: Color::BLACK,
            sprites: None,
            font: None,
        };
        renderer.resize(width, height);
        renderer
    }

    /// Reallocate both buffers for a new size and clear them.
    pub fn resize(&mut self, width: u32, height: u32) {
        let count = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.pixels = vec![0; count * 4];
        self.depth = vec![f32::NEG_INFINITY; count];
        self.clear();
    }

    /// Fill every pixel with the clear color and reset depth to `-inf`.
    pub fn clear(&mut self) {
        let c = self.clear_color.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
        self.depth.fill(f32::NEG_INFINITY);
    }

    /// Hand the current frame to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates the sink's error.
    pub fn update<S: FrameSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.present(self.width, self.height, &self.pixels)
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Depth buffer, one value per pixel.
    #[must_use]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Screen-space pixel, `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Copy of the frame as an image.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(self.pixel(x, y).unwrap_or_default().to_array())
        })
    }

    /// Color used by [`Renderer::clear`].
    #[must_use]
    pub const fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Change the clear color. Takes effect on the next clear.
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Attach or detach the sprite atlas.
    pub fn set_sprites(&mut self, atlas: Option<Arc<SpriteAtlas>>) {
        self.sprites = atlas;
    }

    /// Attach or detach the font.
    pub fn set_font(&mut self, font: Option<Arc<FontAtlas>>) {
        self.font = font;
    }

    /// The attached sprite atlas.
    #[must_use]
    pub fn sprites(&self) -> Option<&SpriteAtlas> {
        self.sprites.as_deref()
    }

    /// The attached font.
    #[must_use]
    pub fn font(&self) -> Option<&FontAtlas> {
        self.font.as_deref()
    }

    /// Center the view on a world position.
    pub fn camera(&mut self, x: f32, y: f32) {
        self.camera = IVec2::new(
            (x as i32).saturating_sub((self.width / 2) as i32),
            (y as i32).saturating_sub((self.height / 2) as i32),
        );
    }

    /// Set the top-left world position of the view directly.
    pub fn set_camera_offset(&mut self, offset: IVec2) {
        self.camera = offset;
    }

    /// Top-left world position of the view.
    #[must_use]
    pub const fn camera_offset(&self) -> IVec2 {
        self.camera
    }

    /// World-space bounds of the view, inclusive, padded by one pixel.
    fn view_bounds(&self) -> (IVec2, IVec2) {
        let size = IVec2::new(self.width as i32, self.height as i32);
        let min = self.camera.saturating_sub(IVec2::ONE);
        (min, self.camera.saturating_add(size))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let sx = usize::try_from(x.checked_sub(self.camera.x)?).ok()?;
        let sy = usize::try_from(y.checked_sub(self.camera.y)?).ok()?;
        (sx < self.width as usize && sy < self.height as usize)
            .then_some(sy * self.width as usize + sx)
    }

    /// Write a pixel at a world position if `depth` is at least the stored depth.
    ///
    /// Positions outside the view after the camera offset are dropped.
    pub fn set(&mut self, x: i32, y: i32, color: Color, depth: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.depth[i] <= depth {
            self.depth[i] = depth;
            self.pixels[i * 4..i * 4 + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Bresenham line, both endpoints included.
    ///
    /// Segments reaching far outside the view are clipped first.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color, depth: f32) {
        let from = IVec2::new(x0 as i32, y0 as i32);
        let to = IVec2::new(x1 as i32, y1 as i32);
        let (min, max) = self.view_bounds();
        let Some((from, to)) = clip_segment(from, to, min, max) else {
            return;
        };
        for p in line(from, to) {
            self.set(p.x, p.y, color, depth);
        }
    }

    /// Filled axis-aligned rectangle. Non-positive sizes draw nothing.
    pub fn rectfill(&mut self, x: f32, y: f32, w: i32, h: i32, color: Color, depth: f32) {
        let (min, max) = self.view_bounds();
        let (x, y) = (x as i32, y as i32);
        let (x0, x1) = (x.max(min.x), x.saturating_add(w).min(max.x));
        let (y0, y1) = (y.max(min.y), y.saturating_add(h).min(max.y));
        for yy in y0..y1 {
            for xx in x0..x1 {
                self.set(xx, yy, color, depth);
            }
        }
    }

    /// Filled circle by the midpoint algorithm.
    pub fn circfill(&mut self, x: f32, y: f32, r: f32, color: Color, depth: f32) {
        let (x, y, r) = (x as i32, y as i32, r as i32);
        let (min, max) = self.view_bounds();
        let reach = |c: i32, lo: i32, hi: i32| {
            let (c, r) = (i64::from(c), i64::from(r));
            c + r >= i64::from(lo) && c - r <= i64::from(hi)
        };
        if !reach(x, min.x, max.x) || !reach(y, min.y, max.y) {
            return;
        }
        fill_circle(x, y, r, |px, py| {
            self.set(px, py, color, depth);
        });
    }

    /// Copy a rectangle of `source` to `(dx, dy)`, skipping transparent pixels.
    ///
    /// Source pixels outside the image are skipped.
    pub fn draw_image(&mut self, source: &RgbaImage, src: Rect, dx: i32, dy: i32, opts: BlitOptions) {
        let w = src.w as i32;
        for y in 0..src.h {
            for x in 0..src.w {
                let Some(&Rgba([r, g, b, a])) =
                    source.get_pixel_checked(src.x.saturating_add(x), src.y.saturating_add(y))
                else {
                    continue;
                };
                if a == 0 {
                    continue;
                }
                let color = opts.tint.unwrap_or(Color::rgba(r, g, b, a));
                let (x, y) = (x as i32, y as i32);
                let tx = dx.saturating_add(if opts.flip_x { w - 1 - x } else { x });
                self.set(tx, dy.saturating_add(y), color, opts.depth);
            }
        }
    }

    /// Draw one frame of a named sprite with its top-left at `(x, y)`.
    ///
    /// Does nothing when no sprite atlas is attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the sprite or frame does not exist.
    pub fn spr(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        frame: usize,
        flip_x: bool,
        depth: f32,
    ) -> Result<(), AssetError> {
        let Some(atlas) = self.sprites.clone() else {
            return Ok(());
        };
        let rect = atlas.frame(name, frame)?;
        let opts = BlitOptions {
            flip_x,
            depth,
            tint: None,
        };
        self.draw_image(atlas.image(), rect, x as i32, y as i32, opts);
        Ok(())
    }

    /// Draw a string with the attached font. Does nothing without a font.
    ///
    /// Characters the font lacks are skipped without advancing.
    pub fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let Some(font) = self.font.clone() else {
            return;
        };

        let (mut x, y) = (x as i32, y as i32);
        match style.align {
            TextAlign::Left => {}
            TextAlign::Right => x = x.saturating_sub(self.text_width(text)),
            TextAlign::Center => x = x.saturating_sub(self.text_width(text).div_euclid(2)),
        }

        let glyph_opts = |tint| BlitOptions {
            flip_x: false,
            depth: TEXT_DEPTH,
            tint: Some(tint),
        };
        for c in text.chars() {
            if c == ' ' {
                x = x.saturating_add(FontAtlas::SPACE_WIDTH);
                continue;
            }
            let Some(rect) = font.glyph(c) else {
                continue;
            };
            if let Some(shadow) = style.shadow {
                let below = y.saturating_add(1);
                self.draw_image(font.image(), rect, x, below, glyph_opts(shadow));
                self.draw_image(font.image(), rect, x.saturating_add(1), below, glyph_opts(shadow));
            }
            self.draw_image(font.image(), rect, x, y, glyph_opts(style.color));
            x = x.saturating_add(rect.w as i32 + 1);
        }
    }

    /// Advance width of a string: glyph width plus one per glyph, and
    /// [`FontAtlas::SPACE_WIDTH`] per space. Zero without a font.
    #[must_use]
    pub fn text_width(&self, text: &str) -> i32 {
        let Some(font) = self.font.as_deref() else {
            return 0;
        };
        text.chars()
            .map(|c| {
                if c == ' ' {
                    FontAtlas::SPACE_WIDTH
                } else {
                    font.glyph(c).map_or(0, |r| r.w as i32 + 1)
                }
            })
            .sum()
    }
}
