//! The draw-list batcher.
//!
//! Primitives are recorded in draw order. A primitive joins the open batch
//! only when it shares pipeline kind, scissor, blend and depth state and
//! lives in the same ring slot, and (for textured kinds) its texture is
//! already bound or a binding slot is free. Anything else starts a new
//! batch, so painter's order is preserved exactly.

use std::rc::Rc;
use std::sync::Arc;

use super::pipeline::{PipelineCache, PipelineId, PipelineKey, PipelineKind};
use super::ring::FrameRing;
use super::text::{GlyphSource, MonospaceGlyphs};
use super::vertex::UiVertex;
use super::{draw_placeholder, BatchRecorder, BlendMode, RenderBackend, TextStyle, TextureId};
use crate::config::UiConfig;
use crate::geometry::{Mat4, Rect, Vec2};
use crate::style::Color;

/// State shared by every primitive of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchState {
    /// Shader family.
    pub kind: PipelineKind,
    /// Active scissor, screen space.
    pub scissor: Option<Rect>,
    /// Blend mode.
    pub blend: BlendMode,
    /// Depth test.
    pub depth_test: bool,
}

/// A contiguous run of quads drawn with one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// State key.
    pub state: BatchState,
    /// Cached pipeline for `state`.
    pub pipeline: PipelineId,
    /// Bound textures; a vertex's `tex_index` points in here.
    pub textures: Vec<TextureId>,
    /// Ring slot holding the vertices.
    pub slot: usize,
    /// First index in the slot's index buffer.
    pub first_index: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Number of quads.
    pub primitive_count: u32,
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatcherStats {
    /// Quads written.
    pub primitives: u32,
    /// Batches produced.
    pub batches: u32,
    /// Quads discarded by viewport/scissor culling.
    pub culled: u32,
    /// Quads lost to ring exhaustion.
    pub dropped: u32,
    /// Mid-frame slot changes.
    pub slot_rotations: u32,
    /// Placeholders drawn for missing fonts.
    pub placeholders: u32,
}

/// Batching implementation of [`BatchRecorder`].
pub struct Batcher {
    ring: FrameRing,
    batches: Vec<Batch>,
    /// Whether the last batch may still be extended.
    open: bool,
    scissor_stack: Vec<Rect>,
    viewport: Rect,
    blend: BlendMode,
    depth_test: bool,
    max_textures: usize,
    culling: bool,
    stats: BatcherStats,
    glyphs: Rc<dyn GlyphSource>,
    pipelines: Arc<PipelineCache>,
    frame: u64,
    recording: bool,
    placeholder_frame: Color,
}

impl Batcher {
    /// Creates a batcher sized by `config`.
    #[must_use]
    pub fn new(config: &UiConfig) -> Self {
        Self {
            ring: FrameRing::new(config.frame_slots, config.slot_quad_capacity),
            batches: Vec::with_capacity(64),
            open: false,
            scissor_stack: Vec::with_capacity(16),
            viewport: Rect::new(0.0, 0.0, config.screen_width, config.screen_height),
            blend: BlendMode::default(),
            depth_test: false,
            max_textures: config.max_texture_slots.max(1),
            culling: config.culling,
            stats: BatcherStats::default(),
            glyphs: Rc::new(MonospaceGlyphs::default()),
            pipelines: Arc::new(PipelineCache::new()),
            frame: 0,
            recording: false,
            placeholder_frame: config.theme.placeholder_frame,
        }
    }

    /// Replaces the glyph source.
    #[must_use]
    pub fn with_glyph_source(mut self, glyphs: Rc<dyn GlyphSource>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Shares a pipeline cache with other renderers.
    #[must_use]
    pub fn with_pipeline_cache(mut self, pipelines: Arc<PipelineCache>) -> Self {
        self.pipelines = pipelines;
        self
    }

    /// Swaps the glyph source in place.
    pub fn set_glyph_source(&mut self, glyphs: Rc<dyn GlyphSource>) {
        self.glyphs = glyphs;
    }

    /// Glyph source text is drawn and measured with.
    #[must_use]
    pub fn glyph_source(&self) -> &Rc<dyn GlyphSource> {
        &self.glyphs
    }

    /// Enables or disables culling.
    pub fn set_culling(&mut self, enabled: bool) {
        self.culling = enabled;
    }

    /// Batches of the last recorded frame.
    #[must_use]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Counters of the last recorded frame.
    #[must_use]
    pub fn stats(&self) -> BatcherStats {
        self.stats
    }

    /// Index of the frame being (or last) recorded.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The vertex ring.
    #[must_use]
    pub fn ring(&self) -> &FrameRing {
        &self.ring
    }

    /// Shared pipeline cache.
    #[must_use]
    pub fn pipelines(&self) -> &Arc<PipelineCache> {
        &self.pipelines
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Active scissor.
    #[must_use]
    pub fn scissor(&self) -> Option<Rect> {
        self.scissor_stack.last().copied()
    }

    /// Closes the open batch; the next primitive starts a new one.
    pub fn flush(&mut self) {
        self.open = false;
    }

    /// Releases ring slots of frames the backend has finished.
    pub fn retire(&mut self, completed: Option<u64>) {
        self.ring.retire(completed);
    }

    /// Hands the recorded batches to `backend` and fences their slots.
    ///
    /// Returns the submitted frame index.
    pub fn submit(&mut self, backend: &mut dyn RenderBackend) -> u64 {
        let frame = self.frame;
        backend.begin_frame(frame);
        for batch in &self.batches {
            let (vertices, indices) = self.ring.slot_data(batch.slot);
            backend.draw_batch(batch, vertices, indices);
        }
        backend.end_frame(frame);
        self.ring.submit(frame);
        self.ring.retire(backend.completed_frame());
        frame
    }

    fn is_visible(&self, bounds: Rect) -> bool {
        let clip = match self.scissor_stack.last() {
            Some(scissor) => match self.viewport.intersection(scissor) {
                Some(clip) => clip,
                None => return false,
            },
            None => self.viewport,
        };
        bounds.intersects(&clip)
    }

    /// Finds or opens a batch for `state` and returns the vertex texture index.
    fn bind(&mut self, state: BatchState, slot: usize, texture: Option<TextureId>) -> u32 {
        if self.open {
            if let Some(last) = self.batches.last_mut() {
                if last.state == state && last.slot == slot {
                    match texture {
                        None => return 0,
                        Some(t) => {
                            if let Some(i) = last.textures.iter().position(|&b| b == t) {
                                return i as u32;
                            }
                            if last.textures.len() < self.max_textures {
                                last.textures.push(t);
                                return (last.textures.len() - 1) as u32;
                            }
                        }
                    }
                }
            }
        }

        let pipeline = self.pipelines.get_or_create(PipelineKey {
            kind: state.kind,
            blend: state.blend,
            depth_test: state.depth_test,
        });
        self.batches.push(Batch {
            state,
            pipeline,
            textures: texture.into_iter().collect(),
            slot,
            first_index: self.ring.index_cursor(),
            index_count: 0,
            primitive_count: 0,
        });
        self.open = true;
        0
    }

    fn emit(
        &mut self,
        kind: PipelineKind,
        texture: Option<TextureId>,
        corners: [Vec2; 4],
        uv: (Vec2, Vec2),
        color: Color,
    ) {
        if self.culling && !self.is_visible(Rect::bounding(&corners)) {
            self.stats.culled += 1;
            return;
        }

        if !self.ring.has_room(1) {
            self.flush();
            if self.ring.rotate().is_some() {
                self.stats.slot_rotations += 1;
            } else {
                if self.stats.dropped == 0 {
                    tracing::warn!(frame = self.frame, "vertex ring exhausted; dropping primitives");
                }
                self.stats.dropped += 1;
                return;
            }
        }
        let Some(slot) = self.ring.current() else {
            self.stats.dropped += 1;
            return;
        };

        let state = BatchState {
            kind,
            scissor: self.scissor_stack.last().copied(),
            blend: self.blend,
            depth_test: self.depth_test,
        };
        let tex_index = self.bind(state, slot, texture);
        let vertices = UiVertex::quad(corners, uv.0, uv.1, color, tex_index);
        if self.ring.push_quad(vertices).is_none() {
            self.stats.dropped += 1;
            return;
        }
        if let Some(batch) = self.batches.last_mut() {
            batch.index_count += 6;
            batch.primitive_count += 1;
        }
        self.stats.primitives += 1;
    }

    fn rect_corners(rect: Rect) -> [Vec2; 4] {
        [
            Vec2::new(rect.x, rect.y),
            Vec2::new(rect.right(), rect.y),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(rect.x, rect.bottom()),
        ]
    }
}

impl BatchRecorder for Batcher {
    fn begin(&mut self) {
        if self.recording {
            tracing::warn!(frame = self.frame, "begin called twice without end");
        }
        self.frame += 1;
        self.batches.clear();
        self.scissor_stack.clear();
        self.open = false;
        self.blend = BlendMode::default();
        self.depth_test = false;
        self.stats = BatcherStats::default();
        self.recording = true;
        if self.ring.begin_frame().is_none() {
            tracing::warn!(frame = self.frame, "every ring slot is still in flight");
        }
    }

    fn end(&mut self) {
        self.flush();
        if !self.scissor_stack.is_empty() {
            tracing::warn!(depth = self.scissor_stack.len(), "unbalanced scissor stack at end of frame");
            self.scissor_stack.clear();
        }
        if self.stats.dropped > 0 {
            tracing::warn!(frame = self.frame, dropped = self.stats.dropped, "primitives dropped this frame");
        }
        self.stats.batches = self.batches.len() as u32;
        self.recording = false;
    }

    fn add_rect(&mut self, rect: Rect, color: Color) {
        self.emit(
            PipelineKind::Colored,
            None,
            Self::rect_corners(rect),
            (Vec2::ZERO, Vec2::ONE),
            color,
        );
    }

    fn add_quad(&mut self, transform: &Mat4, size: Vec2, color: Color) {
        self.emit(
            PipelineKind::Colored,
            None,
            transform.transform_quad(size),
            (Vec2::ZERO, Vec2::ONE),
            color,
        );
    }

    fn add_textured_rect(&mut self, rect: Rect, uv_min: Vec2, uv_max: Vec2, color: Color, texture: TextureId) {
        self.emit(
            PipelineKind::Textured,
            Some(texture),
            Self::rect_corners(rect),
            (uv_min, uv_max),
            color,
        );
    }

    fn add_text(&mut self, origin: Vec2, text: &str, color: Color, style: &TextStyle) {
        let Some(atlas) = self.glyphs.atlas(style.font) else {
            let extent = self.glyphs.measure(style.font, text, style.size);
            tracing::debug!(font = style.font.0, "font atlas missing; drawing placeholder");
            self.stats.placeholders += 1;
            let frame = self.placeholder_frame;
            draw_placeholder(self, Rect::from_pos_size(origin, extent), color.scale_alpha(0.25), frame);
            return;
        };

        let line_height = self.glyphs.line_height(style.font, style.size);
        let mut pen = origin;
        for ch in text.chars() {
            if ch == '\n' {
                pen = Vec2::new(origin.x, pen.y + line_height);
                continue;
            }
            let Some(glyph) = self.glyphs.glyph(style.font, ch, style.size) else {
                continue;
            };
            if !ch.is_whitespace() {
                let rect = Rect::from_pos_size(pen + glyph.offset, glyph.size);
                self.emit(
                    PipelineKind::Text,
                    Some(atlas),
                    Self::rect_corners(rect),
                    (glyph.uv_min, glyph.uv_max),
                    color,
                );
            }
            pen.x += glyph.advance;
        }
    }

    fn push_scissor_rect(&mut self, rect: Rect) {
        let clipped = match self.scissor_stack.last() {
            Some(top) => top
                .intersection(&rect)
                .unwrap_or(Rect::new(rect.x, rect.y, 0.0, 0.0)),
            None => rect,
        };
        self.scissor_stack.push(clipped);
    }

    fn pop_scissor_rect(&mut self) {
        if self.scissor_stack.pop().is_none() {
            tracing::warn!("scissor pop without matching push");
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> Vec2 {
        self.glyphs.measure(style.font, text, style.size)
    }
}
