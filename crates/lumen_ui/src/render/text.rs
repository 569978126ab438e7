//! Glyph lookup seam for the external font subsystem.
//!
//! The batcher never rasterizes. It asks a [`GlyphSource`] for an atlas
//! texture and per-glyph metrics and emits one textured quad per glyph.

use super::{FontId, TextureId};
use crate::geometry::Vec2;

/// Placement of one glyph inside its atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Offset of the glyph box from the pen position.
    pub offset: Vec2,
    /// Size of the glyph box.
    pub size: Vec2,
    /// Pen advance after this glyph.
    pub advance: f32,
    /// Atlas UV of the top-left corner.
    pub uv_min: Vec2,
    /// Atlas UV of the bottom-right corner.
    pub uv_max: Vec2,
}

/// Font atlas provider.
pub trait GlyphSource {
    /// Atlas texture of `font`, or `None` while it is not loaded.
    fn atlas(&self, font: FontId) -> Option<TextureId>;

    /// Metrics of `ch` at pixel `size`; `None` for characters with no glyph.
    fn glyph(&self, font: FontId, ch: char, size: f32) -> Option<Glyph>;

    /// Distance between baselines.
    fn line_height(&self, font: FontId, size: f32) -> f32;

    /// Extent of `text`, honoring newlines.
    fn measure(&self, font: FontId, text: &str, size: f32) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        let line_height = self.line_height(font, size);
        let mut width = 0.0_f32;
        let mut lines = 0_u32;
        for line in text.split('\n') {
            lines += 1;
            let w: f32 = line
                .chars()
                .filter_map(|ch| self.glyph(font, ch, size))
                .map(|g| g.advance)
                .sum();
            width = width.max(w);
        }
        Vec2::new(width, line_height * lines as f32)
    }
}

/// Fixed-pitch metrics over a 16×16 cell atlas indexed by code point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceGlyphs {
    /// Atlas texture; `None` renders placeholders.
    pub atlas: Option<TextureId>,
    /// Advance as a fraction of the pixel size.
    pub advance_ratio: f32,
    /// Line height as a fraction of the pixel size.
    pub line_ratio: f32,
}

impl MonospaceGlyphs {
    const CELLS: u32 = 16;

    /// Metrics backed by `atlas`.
    #[must_use]
    pub fn with_atlas(atlas: TextureId) -> Self {
        Self {
            atlas: Some(atlas),
            ..Self::default()
        }
    }
}

impl Default for MonospaceGlyphs {
    fn default() -> Self {
        Self {
            atlas: None,
            advance_ratio: 0.6,
            line_ratio: 1.2,
        }
    }
}

impl GlyphSource for MonospaceGlyphs {
    fn atlas(&self, _font: FontId) -> Option<TextureId> {
        self.atlas
    }

    fn glyph(&self, _font: FontId, ch: char, size: f32) -> Option<Glyph> {
        if ch.is_control() {
            return None;
        }
        let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        let advance = size * self.advance_ratio;
        let code = u32::from(ch) % (Self::CELLS * Self::CELLS);
        let cell = 1.0 / Self::CELLS as f32;
        let uv_min = Vec2::new((code % Self::CELLS) as f32 * cell, (code / Self::CELLS) as f32 * cell);
        Some(Glyph {
            offset: Vec2::ZERO,
            size: Vec2::new(advance, size * self.line_ratio),
            advance,
            uv_min,
            uv_max: uv_min + Vec2::splat(cell),
        })
    }

    fn line_height(&self, _font: FontId, size: f32) -> f32 {
        if size.is_finite() {
            size.max(0.0) * self.line_ratio
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let glyphs = MonospaceGlyphs::default();
        let size = glyphs.measure(FontId(0), "abcd", 10.0);
        assert!((size.x - 24.0).abs() < 1e-4);
        assert!((size.y - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_measure_multiline_uses_widest() {
        let glyphs = MonospaceGlyphs::default();
        let size = glyphs.measure(FontId(0), "ab\nabcde\n", 10.0);
        assert!((size.x - 30.0).abs() < 1e-4);
        assert!((size.y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_glyph_cells() {
        let glyphs = MonospaceGlyphs::with_atlas(TextureId(7));
        let g = glyphs.glyph(FontId(0), 'A', 16.0).unwrap();
        // 'A' = 65 = row 4, column 1.
        assert_eq!(g.uv_min, Vec2::new(1.0 / 16.0, 4.0 / 16.0));
        assert!(glyphs.glyph(FontId(0), '\n', 16.0).is_none());
        assert_eq!(glyphs.atlas(FontId(3)), Some(TextureId(7)));
    }
}
