//! Draw-list batching.
//!
//! ```text
//! ┌──────────────┐  commands   ┌─────────┐  batches   ┌───────────────┐
//! │ element tree │ ──────────► │ Batcher │ ─────────► │ RenderBackend │
//! └──────────────┘             └─────────┘            └───────────────┘
//!                                   │ quads
//!                                   ▼
//!                              ┌───────────┐
//!                              │ FrameRing │  N slots, fenced per frame
//!                              └───────────┘
//! ```
//!
//! Elements talk to an abstract [`BatchRecorder`]; the [`Batcher`] is the
//! implementation that coalesces contiguous primitives sharing pipeline,
//! textures, scissor and blend/depth state into [`Batch`]es.

mod backend;
mod batcher;
mod pipeline;
mod ring;
mod scissor;
mod text;
mod vertex;

pub mod testing;

pub use backend::RenderBackend;
pub use batcher::{Batch, BatchState, Batcher, BatcherStats};
pub use pipeline::{PipelineCache, PipelineId, PipelineKey, PipelineKind};
pub use ring::FrameRing;
pub use scissor::ScissorGuard;
pub use text::{Glyph, GlyphSource, MonospaceGlyphs};
pub use vertex::UiVertex;

use crate::geometry::{Mat4, Rect, Vec2};
use crate::style::Color;

/// Opaque texture handle owned by the external texture loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Opaque font handle owned by the external font manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u32);

/// Font selection for a text command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font family / atlas.
    pub font: FontId,
    /// Pixel size.
    pub size: f32,
}

impl TextStyle {
    /// Default font at `size`.
    #[must_use]
    pub const fn sized(size: f32) -> Self {
        Self { font: FontId(0), size }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::sized(14.0)
    }
}

/// Color blending of subsequent primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// No blending.
    Opaque,
    /// Straight alpha.
    #[default]
    Alpha,
    /// src + dst.
    Additive,
}

/// Sink for draw commands emitted by elements.
///
/// `begin` is called once per frame before any primitive and `end` after
/// the last; scissor push/pop must balance in between.
pub trait BatchRecorder {
    /// Starts a frame.
    fn begin(&mut self);

    /// Finishes a frame.
    fn end(&mut self);

    /// Screen-space axis-aligned rectangle.
    fn add_rect(&mut self, rect: Rect, color: Color);

    /// Quad of `size` at `transform` (rotation and scale allowed).
    fn add_quad(&mut self, transform: &Mat4, size: Vec2, color: Color);

    /// Textured screen-space rectangle.
    fn add_textured_rect(
        &mut self,
        rect: Rect,
        uv_min: Vec2,
        uv_max: Vec2,
        color: Color,
        texture: TextureId,
    );

    /// Text with its top-left corner at `origin`.
    fn add_text(&mut self, origin: Vec2, text: &str, color: Color, style: &TextStyle);

    /// Intersects the active scissor with `rect` and pushes the result.
    fn push_scissor_rect(&mut self, rect: Rect);

    /// Restores the previous scissor.
    fn pop_scissor_rect(&mut self);

    /// Sets the blend mode of subsequent primitives.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Enables or disables depth testing of subsequent primitives.
    fn set_depth_test(&mut self, enabled: bool);

    /// Sets the screen viewport.
    fn set_viewport(&mut self, rect: Rect);

    /// Extent of `text` in pixels.
    fn measure_text(&self, text: &str, style: &TextStyle) -> Vec2 {
        MonospaceGlyphs::default().measure(style.font, text, style.size)
    }
}

/// Draws the stand-in for a missing texture or font: a translucent fill
/// framed by a 1px outline.
pub fn draw_placeholder<R: BatchRecorder + ?Sized>(recorder: &mut R, rect: Rect, fill: Color, frame: Color) {
    recorder.add_rect(rect, fill);
    let t = 1.0_f32.min(rect.width * 0.5).min(rect.height * 0.5).max(0.0);
    if t <= 0.0 {
        return;
    }
    recorder.add_rect(Rect::new(rect.x, rect.y, rect.width, t), frame);
    recorder.add_rect(Rect::new(rect.x, rect.bottom() - t, rect.width, t), frame);
    recorder.add_rect(Rect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t), frame);
    recorder.add_rect(Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t), frame);
}
