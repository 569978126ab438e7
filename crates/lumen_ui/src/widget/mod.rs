//! Widget behaviors attached to elements.
//!
//! An element owns one boxed [`Widget`]; the widget receives the element's
//! [`ElementCore`] in every hook and never sees the tree. Containers such as
//! [`StackPanel`] and [`Grid`] only set layout properties; the layout engine
//! does the work.

mod button;
mod containers;
mod image;
mod label;
mod panel;
mod registry;

pub use button::{Button, ButtonColors, ButtonState};
pub use containers::{Grid, StackPanel};
pub use image::{Image, ImageScaleMode};
pub use label::{Label, TextAlign};
pub use panel::Panel;
pub use registry::{create_element, register_element_type, registered_types, ElementFactory};

use std::any::Any;

use crate::element::{ElementCore, MouseEvent};
use crate::geometry::{Mat4, Rect, Vec2};
use crate::render::{draw_placeholder, BatchRecorder, GlyphSource, TextStyle, TextureId};
use crate::style::Color;

/// Response from a widget's pointer hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetResponse {
    /// Widget was clicked.
    pub clicked: bool,
    /// Widget changed its visual state.
    pub state_changed: bool,
}

/// Base trait for all widgets.
///
/// Every hook has a default, so a widget only overrides what it needs.
/// The default `render` fills the element's box with [`Widget::render_color`].
pub trait Widget: Any {
    /// Type name used in diagnostics and by the registry.
    fn kind(&self) -> &'static str;

    /// Runs once when the widget is wrapped in an element.
    fn init(&mut self, _core: &mut ElementCore) {}

    /// Advances time-based state.
    fn update(&mut self, _core: &mut ElementCore, _dt: f32) {}

    /// Emits the element's own draw commands. Children are drawn afterwards
    /// by the element.
    fn render(&self, core: &ElementCore, ctx: &mut RenderContext<'_>) {
        ctx.fill(self.render_color(core));
    }

    /// Reacts to a routed pointer event.
    fn on_mouse_event(&mut self, _core: &mut ElementCore, _event: &MouseEvent) -> WidgetResponse {
        WidgetResponse::default()
    }

    /// Called after the element's enabled bit flips.
    fn on_enabled_changed(&mut self, _core: &mut ElementCore, _enabled: bool) {}

    /// Color the element currently draws its background with.
    fn render_color(&self, core: &ElementCore) -> Color {
        core.color()
    }

    /// Size the content asks for when a declared axis is 0. Text is
    /// measured with `glyphs`, the source the frame is drawn with.
    fn intrinsic_size(&self, _core: &ElementCore, _glyphs: &dyn GlyphSource) -> Option<Vec2> {
        None
    }

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Widget of plain elements: draws its color, lays out its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseElement;

impl Widget for BaseElement {
    fn kind(&self) -> &'static str {
        "element"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Drawing surface handed to [`Widget::render`].
///
/// Coordinates are local to the element; the world transform and the
/// inherited opacity are applied here.
pub struct RenderContext<'a> {
    recorder: &'a mut dyn BatchRecorder,
    world: Mat4,
    size: Vec2,
    opacity: f32,
}

impl<'a> RenderContext<'a> {
    /// Creates a context for one element.
    pub fn new(recorder: &'a mut dyn BatchRecorder, world: Mat4, size: Vec2, opacity: f32) -> Self {
        Self {
            recorder,
            world,
            size,
            opacity,
        }
    }

    /// Element size from layout.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Local-to-screen transform.
    #[must_use]
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Inherited opacity including the element's own.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Screen-space box of the element.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.world.transform_rect(self.size)
    }

    fn fold(&self, color: Color) -> Option<Color> {
        let color = color.scale_alpha(self.opacity);
        (!color.is_transparent()).then_some(color)
    }

    /// Fills the whole element.
    pub fn fill(&mut self, color: Color) {
        self.fill_local_rect(Rect::from_pos_size(Vec2::ZERO, self.size), color);
    }

    /// Fills a rectangle in local coordinates. Fully transparent fills emit
    /// nothing.
    pub fn fill_local_rect(&mut self, rect: Rect, color: Color) {
        let Some(color) = self.fold(color) else {
            return;
        };
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let transform = self.world * Mat4::translation(rect.x, rect.y);
        self.recorder.add_quad(&transform, rect.size(), color);
    }

    /// Draws text with its top-left corner at a local point.
    pub fn text(&mut self, origin: Vec2, text: &str, color: Color, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(color) = self.fold(color) {
            let origin = self.world.transform_point(origin);
            self.recorder.add_text(origin, text, color, style);
        }
    }

    /// Draws a textured rectangle given in local coordinates.
    pub fn textured(&mut self, rect: Rect, uv_min: Vec2, uv_max: Vec2, tint: Color, texture: TextureId) {
        if let Some(tint) = self.fold(tint) {
            let screen = (self.world * Mat4::translation(rect.x, rect.y)).transform_rect(rect.size());
            self.recorder.add_textured_rect(screen, uv_min, uv_max, tint, texture);
        }
    }

    /// Draws the framed missing-asset rectangle over a local rect.
    pub fn placeholder(&mut self, rect: Rect, fill: Color, frame: Color) {
        let screen = (self.world * Mat4::translation(rect.x, rect.y)).transform_rect(rect.size());
        draw_placeholder(
            &mut *self.recorder,
            screen,
            fill.scale_alpha(self.opacity),
            frame.scale_alpha(self.opacity),
        );
    }

    /// Size `text` would occupy.
    #[must_use]
    pub fn measure_text(&self, text: &str, style: &TextStyle) -> Vec2 {
        self.recorder.measure_text(text, style)
    }
}
