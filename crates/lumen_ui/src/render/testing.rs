//! Test doubles for the render seams.

use super::{
    Batch, BatchRecorder, BatchState, BlendMode, FontId, Glyph, GlyphSource, RenderBackend, TextStyle,
    TextureId, UiVertex,
};
use crate::geometry::{Mat4, Rect, Vec2};
use crate::style::Color;

/// One recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `begin`.
    Begin,
    /// `end`.
    End,
    /// `add_rect`.
    Rect {
        /// Screen rectangle.
        rect: Rect,
        /// Fill.
        color: Color,
    },
    /// `add_quad`.
    Quad {
        /// World transform.
        transform: Mat4,
        /// Local size.
        size: Vec2,
        /// Fill.
        color: Color,
    },
    /// `add_textured_rect`.
    Textured {
        /// Screen rectangle.
        rect: Rect,
        /// UV top-left.
        uv_min: Vec2,
        /// UV bottom-right.
        uv_max: Vec2,
        /// Tint.
        color: Color,
        /// Texture.
        texture: TextureId,
    },
    /// `add_text`.
    Text {
        /// Top-left.
        origin: Vec2,
        /// Content.
        text: String,
        /// Color.
        color: Color,
        /// Pixel size.
        size: f32,
    },
    /// `push_scissor_rect`.
    PushScissor(Rect),
    /// `pop_scissor_rect`.
    PopScissor,
    /// `set_blend_mode`.
    Blend(BlendMode),
    /// `set_depth_test`.
    DepthTest(bool),
    /// `set_viewport`.
    Viewport(Rect),
}

/// Recorder that keeps every command verbatim.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    /// Commands in call order.
    pub commands: Vec<Command>,
}

impl CommandLog {
    /// Pushes minus pops seen so far.
    #[must_use]
    pub fn scissor_depth(&self) -> i64 {
        self.commands.iter().fold(0, |depth, c| match c {
            Command::PushScissor(_) => depth + 1,
            Command::PopScissor => depth - 1,
            _ => depth,
        })
    }

    /// Colors of solid quads and rects in emission order.
    #[must_use]
    pub fn fill_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Rect { color, .. } | Command::Quad { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// Text strings in emission order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl BatchRecorder for CommandLog {
    fn begin(&mut self) {
        self.commands.push(Command::Begin);
    }

    fn end(&mut self) {
        self.commands.push(Command::End);
    }

    fn add_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(Command::Rect { rect, color });
    }

    fn add_quad(&mut self, transform: &Mat4, size: Vec2, color: Color) {
        self.commands.push(Command::Quad {
            transform: *transform,
            size,
            color,
        });
    }

    fn add_textured_rect(&mut self, rect: Rect, uv_min: Vec2, uv_max: Vec2, color: Color, texture: TextureId) {
        self.commands.push(Command::Textured {
            rect,
            uv_min,
            uv_max,
            color,
            texture,
        });
    }

    fn add_text(&mut self, origin: Vec2, text: &str, color: Color, style: &TextStyle) {
        self.commands.push(Command::Text {
            origin,
            text: text.to_owned(),
            color,
            size: style.size,
        });
    }

    fn push_scissor_rect(&mut self, rect: Rect) {
        self.commands.push(Command::PushScissor(rect));
    }

    fn pop_scissor_rect(&mut self) {
        self.commands.push(Command::PopScissor);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(Command::Blend(mode));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(Command::DepthTest(enabled));
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.commands.push(Command::Viewport(rect));
    }
}

/// Glyph source with no atlas whose advance is twice the pixel size and
/// whose line height equals it. Wider than [`MonospaceGlyphs`](super::MonospaceGlyphs).
#[derive(Debug, Clone, Copy, Default)]
pub struct WideGlyphs;

impl GlyphSource for WideGlyphs {
    fn atlas(&self, _font: FontId) -> Option<TextureId> {
        None
    }

    fn glyph(&self, _font: FontId, _ch: char, size: f32) -> Option<Glyph> {
        Some(Glyph {
            offset: Vec2::ZERO,
            size: Vec2::splat(size),
            advance: size * 2.0,
            uv_min: Vec2::ZERO,
            uv_max: Vec2::ONE,
        })
    }

    fn line_height(&self, _font: FontId, size: f32) -> f32 {
        size
    }
}

/// A batch as seen by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    /// State key.
    pub state: BatchState,
    /// Bound textures.
    pub textures: Vec<TextureId>,
    /// Ring slot.
    pub slot: usize,
    /// Primitives in the batch.
    pub primitive_count: u32,
    /// Vertices referenced by the batch, in index order (6 per quad).
    pub vertices: Vec<UiVertex>,
}

/// A submitted frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    /// Frame index.
    pub frame: u64,
    /// Draws in submission order.
    pub draws: Vec<RecordedDraw>,
}

/// Backend that records submissions and completes frames after a
/// configurable latency.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Finished frames.
    pub frames: Vec<RecordedFrame>,
    current: Option<RecordedFrame>,
    latency: u64,
    last_submitted: Option<u64>,
}

impl RecordingBackend {
    /// Backend whose frames complete as soon as they are submitted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that lags `frames` frames behind submission.
    #[must_use]
    pub fn with_latency(frames: u64) -> Self {
        Self {
            latency: frames,
            ..Self::default()
        }
    }

    /// Most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, frame: u64) {
        self.current = Some(RecordedFrame {
            frame,
            draws: Vec::new(),
        });
    }

    fn draw_batch(&mut self, batch: &Batch, vertices: &[UiVertex], indices: &[u32]) {
        let start = batch.first_index as usize;
        let end = start + batch.index_count as usize;
        let referenced = indices
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .filter_map(|&i| vertices.get(i as usize).copied())
            .collect();
        if let Some(frame) = self.current.as_mut() {
            frame.draws.push(RecordedDraw {
                state: batch.state,
                textures: batch.textures.clone(),
                slot: batch.slot,
                primitive_count: batch.primitive_count,
                vertices: referenced,
            });
        }
    }

    fn end_frame(&mut self, frame: u64) {
        if let Some(done) = self.current.take() {
            self.frames.push(done);
        }
        self.last_submitted = Some(frame);
    }

    fn completed_frame(&self) -> Option<u64> {
        self.last_submitted.and_then(|f| f.checked_sub(self.latency))
    }
}
