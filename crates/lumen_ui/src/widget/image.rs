//! Textured rectangle.

use std::any::Any;

use super::{RenderContext, Widget};
use crate::element::ElementCore;
use crate::geometry::{Rect, Vec2};
use crate::render::{GlyphSource, TextureId};
use crate::style::{Color, Theme};

/// How the texture is mapped onto the element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Fill the box, ignoring aspect ratio.
    #[default]
    Stretch,
    /// Largest aspect-preserving rect inside the box, centered.
    Fit,
    /// Cover the box, cropping the texture symmetrically.
    Fill,
    /// Repeat at native texture size from the top-left corner.
    Tile,
}

/// Image widget.
///
/// Without a bound texture it draws the framed placeholder and reports it
/// on the debug channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    texture: Option<TextureId>,
    texture_size: Vec2,
    mode: ImageScaleMode,
    tint: Color,
    placeholder_fill: Color,
    placeholder_frame: Color,
}

impl Image {
    /// Image without a texture, placeholder colors from the default theme.
    #[must_use]
    pub fn new() -> Self {
        Self::themed(&Theme::default())
    }

    /// Image without a texture, placeholder colors from `theme`.
    #[must_use]
    pub fn themed(theme: &Theme) -> Self {
        Self {
            texture: None,
            texture_size: Vec2::ZERO,
            mode: ImageScaleMode::Stretch,
            tint: Color::WHITE,
            placeholder_fill: theme.placeholder_fill,
            placeholder_frame: theme.placeholder_frame,
        }
    }

    /// Builder: binds a texture of the given pixel size.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureId, size: Vec2) -> Self {
        self.texture = Some(texture);
        self.texture_size = size.non_negative();
        self
    }

    /// Builder: sets the scale mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ImageScaleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: sets the tint.
    #[must_use]
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Bound texture.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Scale mode.
    #[must_use]
    pub fn mode(&self) -> ImageScaleMode {
        self.mode
    }

    /// Binds or unbinds a texture on a live element.
    pub fn set_texture(&mut self, core: &mut ElementCore, texture: Option<(TextureId, Vec2)>) {
        self.texture = texture.map(|(id, _)| id);
        self.texture_size = texture.map_or(Vec2::ZERO, |(_, size)| size.non_negative());
        core.mark_layout_dirty();
    }

    /// Changes the scale mode.
    pub fn set_mode(&mut self, core: &mut ElementCore, mode: ImageScaleMode) {
        if mode != self.mode {
            self.mode = mode;
            core.mark_render_dirty();
        }
    }

    /// Destination rect and UV range for a box of `size`.
    #[must_use]
    pub fn mapping(&self, size: Vec2) -> (Rect, Vec2, Vec2) {
        let full = Rect::from_pos_size(Vec2::ZERO, size);
        let tex = self.texture_size;
        if tex.x <= 0.0 || tex.y <= 0.0 {
            return (full, Vec2::ZERO, Vec2::ONE);
        }
        match self.mode {
            ImageScaleMode::Stretch => (full, Vec2::ZERO, Vec2::ONE),
            ImageScaleMode::Fit => {
                let scale = (size.x / tex.x).min(size.y / tex.y);
                let drawn = tex * scale;
                let pos = (size - drawn) * 0.5;
                (Rect::from_pos_size(pos, drawn), Vec2::ZERO, Vec2::ONE)
            }
            ImageScaleMode::Fill => {
                let scale = (size.x / tex.x).max(size.y / tex.y);
                if scale <= 0.0 {
                    return (full, Vec2::ZERO, Vec2::ONE);
                }
                let span = Vec2::new(size.x / (tex.x * scale), size.y / (tex.y * scale));
                let uv_min = (Vec2::ONE - span) * 0.5;
                (full, uv_min, uv_min + span)
            }
            ImageScaleMode::Tile => (full, Vec2::ZERO, Vec2::new(size.x / tex.x, size.y / tex.y)),
        }
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Image {
    fn kind(&self) -> &'static str {
        "image"
    }

    fn render(&self, core: &ElementCore, ctx: &mut RenderContext<'_>) {
        ctx.fill(core.color());
        let size = ctx.size();
        match self.texture {
            Some(texture) => {
                let (rect, uv_min, uv_max) = self.mapping(size);
                ctx.textured(rect, uv_min, uv_max, self.tint, texture);
            }
            None => {
                tracing::debug!(element = %core.id(), "image has no texture; drawing placeholder");
                ctx.placeholder(
                    Rect::from_pos_size(Vec2::ZERO, size),
                    self.placeholder_fill,
                    self.placeholder_frame,
                );
            }
        }
    }

    fn intrinsic_size(&self, _core: &ElementCore, _glyphs: &dyn GlyphSource) -> Option<Vec2> {
        self.texture.map(|_| self.texture_size)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementRef;
    use crate::layout::LayoutEngine;
    use crate::render::testing::{Command, CommandLog};

    fn textured(mode: ImageScaleMode) -> Image {
        Image::new()
            .with_texture(TextureId(3), Vec2::new(100.0, 50.0))
            .with_mode(mode)
    }

    #[test]
    fn test_fit_letterboxes() {
        let (rect, uv_min, uv_max) = textured(ImageScaleMode::Fit).mapping(Vec2::new(200.0, 200.0));
        assert_eq!(rect, Rect::new(0.0, 50.0, 200.0, 100.0));
        assert_eq!((uv_min, uv_max), (Vec2::ZERO, Vec2::ONE));
    }

    #[test]
    fn test_fill_crops_symmetrically() {
        let (rect, uv_min, uv_max) = textured(ImageScaleMode::Fill).mapping(Vec2::new(100.0, 100.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!((uv_min.x - 0.25).abs() < 1e-6);
        assert!((uv_max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv_min.y, 0.0);
        assert_eq!(uv_max.y, 1.0);
    }

    #[test]
    fn test_tile_repeats_uv() {
        let (_, _, uv_max) = textured(ImageScaleMode::Tile).mapping(Vec2::new(300.0, 100.0));
        assert_eq!(uv_max, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn test_missing_texture_draws_placeholder() {
        let e = ElementRef::new(Image::new());
        e.set_size(Vec2::new(20.0, 20.0));
        LayoutEngine::new().layout(&e);

        let mut log = CommandLog::default();
        e.render(&mut log);
        let theme = Theme::default();
        let colors = log.fill_colors();
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], theme.placeholder_fill);
        assert!(colors[1..].iter().all(|c| *c == theme.placeholder_frame));
    }

    #[test]
    fn test_texture_emits_textured_rect() {
        let e = ElementRef::new(textured(ImageScaleMode::Stretch));
        LayoutEngine::new().layout(&e);
        assert_eq!(e.computed_size(), Vec2::new(100.0, 50.0));

        let mut log = CommandLog::default();
        e.render(&mut log);
        assert!(matches!(
            log.commands.as_slice(),
            [Command::Textured { texture: TextureId(3), .. }]
        ));
    }
}
