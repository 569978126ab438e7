//! Frame driver that owns the tree.
//!
//! ```text
//!  input snapshot ─► route ─► widget update ─► layout (dirty only)
//!                                                     │
//!  backend ◄─ present ◄─ batcher ◄─ render ◄──────────┘
//! ```

use std::rc::Rc;

use crate::config::UiConfig;
use crate::dirty::DirtyTracker;
use crate::element::ElementRef;
use crate::error::UiResult;
use crate::event::EventBus;
use crate::geometry::{Rect, Vec2};
use crate::input::InputSnapshot;
use crate::layout::{LayoutProperties, LayoutStats};
use crate::render::{BatchRecorder, Batcher, GlyphSource, RenderBackend};
use crate::router::{self, InputRouter};
use crate::style::Theme;
use crate::widget;

/// Counters for one update/render cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Batches produced.
    pub batches: u32,
    /// Quads written.
    pub primitives: u32,
    /// Quads culled.
    pub culled: u32,
    /// Quads lost to ring exhaustion.
    pub dropped: u32,
    /// Elements entered by the last layout pass.
    pub layout_visited: usize,
    /// Elements that were render-dirty when the frame was drawn.
    pub render_dirty: usize,
}

/// Owns the root element and everything needed to drive a frame.
///
/// Single-threaded: `update` and `render` run in sequence on the UI thread.
pub struct UiContext {
    config: UiConfig,
    root: ElementRef,
    input: InputSnapshot,
    router: InputRouter,
    events: EventBus,
    dirty: DirtyTracker,
    batcher: Batcher,
    stats: FrameStats,
    shut_down: bool,
}

impl UiContext {
    /// Creates a context with a screen-sized root.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`](crate::UiError::InvalidConfig) if
    /// `config` fails validation.
    pub fn new(config: UiConfig) -> UiResult<Self> {
        config.validate()?;
        let root = ElementRef::plain();
        root.set_name("root");
        root.set_layout_properties(LayoutProperties::absolute());
        root.set_size(Vec2::new(config.screen_width, config.screen_height));

        tracing::debug!(
            width = config.screen_width,
            height = config.screen_height,
            slots = config.frame_slots,
            "ui context created"
        );

        Ok(Self {
            batcher: Batcher::new(&config),
            config,
            root,
            input: InputSnapshot::new(),
            router: InputRouter::new(),
            events: EventBus::new(),
            dirty: DirtyTracker::new(),
            stats: FrameStats::default(),
            shut_down: false,
        })
    }

    /// Builder: replaces the glyph source used for text. Layout measures
    /// with the same source the batcher draws with.
    #[must_use]
    pub fn with_glyph_source(mut self, glyphs: Rc<dyn GlyphSource>) -> Self {
        self.dirty.set_glyph_source(Rc::clone(&glyphs));
        self.batcher.set_glyph_source(glyphs);
        self.dirty.mark_dirty_recursive(&self.root);
        self
    }

    /// Root element. Attach content here.
    #[must_use]
    pub fn root(&self) -> &ElementRef {
        &self.root
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Default colors.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Cross-element notifications.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Snapshot consumed by the next `update`.
    #[must_use]
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// Feed platform input here between frames.
    pub fn input_mut(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }

    /// Hover and press state.
    #[must_use]
    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Dirty bookkeeping.
    pub fn dirty_tracker(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Draw-list batcher.
    #[must_use]
    pub fn batcher(&self) -> &Batcher {
        &self.batcher
    }

    /// Counters of the last update/render cycle.
    #[must_use]
    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Resizes the root and the viewport.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidConfig`](crate::UiError::InvalidConfig) for a
    /// negative or non-finite dimension. The current size is kept.
    pub fn set_screen_size(&mut self, width: f32, height: f32) -> UiResult<()> {
        UiConfig {
            screen_width: width,
            screen_height: height,
            ..self.config.clone()
        }
        .validate()?;
        tracing::debug!(width, height, "screen resized");
        self.config.screen_width = width;
        self.config.screen_height = height;
        self.root.set_size(Vec2::new(width, height));
        self.batcher.set_viewport(Rect::new(0.0, 0.0, width, height));
        Ok(())
    }

    /// Builds a detached element from the widget registry.
    ///
    /// # Errors
    ///
    /// [`UiError::UnknownElementType`](crate::UiError::UnknownElementType)
    /// for unregistered names.
    pub fn create_element(&self, name: &str) -> UiResult<ElementRef> {
        widget::create_element(name, self)
    }

    /// Routes input, advances widgets by `dt` seconds and lays out dirty
    /// subtrees. Consumes the input snapshot's edges.
    pub fn update(&mut self, dt: f32) -> LayoutStats {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.router.route(&self.root, &self.input, &self.events);
        self.root.update(dt);
        let layout = self.dirty.recalculate_only_dirty(&self.root);
        self.stats.layout_visited = layout.visited;
        self.input.begin_frame();
        layout
    }

    /// Records the tree into the batcher.
    pub fn render(&mut self) -> FrameStats {
        self.stats.render_dirty = self.dirty.collect_render_dirty(&self.root).len();

        self.batcher.begin();
        self.batcher
            .set_viewport(Rect::new(0.0, 0.0, self.config.screen_width, self.config.screen_height));
        self.root.render(&mut self.batcher);
        self.batcher.end();

        let batch = self.batcher.stats();
        self.stats.batches = batch.batches;
        self.stats.primitives = batch.primitives;
        self.stats.culled = batch.culled;
        self.stats.dropped = batch.dropped;
        self.stats
    }

    /// Hands the recorded batches to `backend`. Returns the frame index.
    pub fn present(&mut self, backend: &mut dyn RenderBackend) -> u64 {
        self.batcher.submit(backend)
    }

    /// Topmost element under `point`; the root for empty space inside the
    /// screen.
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> Option<ElementRef> {
        router::hit_test(&self.root, point)
    }

    /// Returns true if anything changed since the last render.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        let mut dirty = false;
        self.root
            .walk(&mut |e: &ElementRef| dirty |= e.is_dirty() || e.is_layout_dirty());
        dirty
    }

    /// Detaches all content and drops subscriptions. Called on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for child in self.root.children() {
            let _ = self.root.remove_child(&child);
        }
        self.router.reset();
        self.events.clear();
        self.dirty.take_scope();
        tracing::debug!(frame = self.batcher.frame(), "ui context shut down");
    }
}

impl Drop for UiContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{RecordingBackend, WideGlyphs};
    use crate::render::TextStyle;
    use crate::style::Color;
    use crate::widget::{Label, Panel};

    fn context() -> UiContext {
        UiContext::new(UiConfig::with_screen_size(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = UiConfig {
            frame_slots: 0,
            ..UiConfig::default()
        };
        assert!(UiContext::new(config).is_err());
    }

    #[test]
    fn test_update_cleans_layout() {
        let mut ctx = context();
        let panel = ElementRef::new(Panel::new());
        panel.set_size(Vec2::new(100.0, 50.0));
        ctx.root().add_child(&panel).unwrap();
        assert!(ctx.root().is_layout_dirty());

        ctx.update(0.0);
        assert!(!ctx.root().is_layout_dirty());
        assert_eq!(ctx.root().computed_size(), Vec2::new(800.0, 600.0));
        assert_eq!(panel.computed_size(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_render_and_present() {
        let mut ctx = context();
        let panel = ElementRef::new(Panel::new());
        panel.set_size(Vec2::new(100.0, 50.0));
        ctx.root().add_child(&panel).unwrap();
        ctx.update(0.0);
        assert!(ctx.needs_redraw());

        let stats = ctx.render();
        assert_eq!(stats.primitives, 1);
        assert_eq!(stats.batches, 1);
        assert!(!ctx.needs_redraw());

        let mut backend = RecordingBackend::new();
        let frame = ctx.present(&mut backend);
        assert_eq!(backend.last_frame().map(|f| f.frame), Some(frame));

        panel.set_color(Color::RED);
        assert!(ctx.needs_redraw());
    }

    #[test]
    fn test_hit_test_falls_back_to_root() {
        let mut ctx = context();
        let panel = ElementRef::new(Panel::new());
        panel.set_size(Vec2::new(10.0, 10.0));
        ctx.root().add_child(&panel).unwrap();
        ctx.update(0.0);

        assert_eq!(ctx.hit_test(Vec2::new(5.0, 5.0)), Some(panel));
        assert_eq!(ctx.hit_test(Vec2::new(400.0, 300.0)).as_ref(), Some(ctx.root()));
    }

    #[test]
    fn test_layout_measures_with_installed_glyphs() {
        let mut ctx = context().with_glyph_source(Rc::new(WideGlyphs));
        let style = TextStyle::sized(10.0);
        let label = ElementRef::new(Label::new("hello").with_style(style));
        ctx.root().add_child(&label).unwrap();
        ctx.update(0.0);

        let drawn = ctx.batcher().measure_text("hello", &style);
        assert_eq!(drawn, Vec2::new(100.0, 10.0));
        assert_eq!(label.computed_size(), drawn);
    }

    #[test]
    fn test_hidden_content_stops_requesting_redraws() {
        let mut ctx = context();
        let panel = ElementRef::new(Panel::new());
        panel.set_size(Vec2::new(40.0, 40.0));
        ctx.root().add_child(&panel).unwrap();
        ctx.update(0.0);
        ctx.render();
        assert!(!ctx.needs_redraw());

        panel.set_visible(false);
        assert!(ctx.needs_redraw());
        ctx.update(0.0);
        let stats = ctx.render();
        assert_eq!(stats.primitives, 0);
        assert!(!ctx.needs_redraw());
        assert!(!panel.is_dirty());
    }

    #[test]
    fn test_shutdown_releases_content() {
        let mut ctx = context();
        let panel = ElementRef::plain();
        ctx.root().add_child(&panel).unwrap();
        ctx.shutdown();
        assert!(panel.parent().is_none());
        assert_eq!(ctx.root().child_count(), 0);
    }

    #[test]
    fn test_resize_relayouts_root() {
        let mut ctx = context();
        ctx.update(0.0);
        ctx.set_screen_size(1024.0, 768.0).unwrap();
        ctx.update(0.0);
        assert_eq!(ctx.root().computed_size(), Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn test_resize_rejects_invalid_dimensions() {
        let mut ctx = context();
        ctx.set_screen_size(640.0, 480.0).unwrap();
        for (w, h) in [(-1.0, 10.0), (f32::NAN, 10.0), (10.0, f32::INFINITY)] {
            let err = ctx.set_screen_size(w, h).unwrap_err();
            assert!(matches!(err, crate::UiError::InvalidConfig(_)));
        }
        ctx.update(0.0);
        assert_eq!(ctx.root().computed_size(), Vec2::new(640.0, 480.0));
        assert_eq!(ctx.config().screen_width, 640.0);
    }
}
