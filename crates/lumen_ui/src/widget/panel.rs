//! Solid background with an optional border.

use std::any::Any;

use super::{RenderContext, Widget};
use crate::element::ElementCore;
use crate::geometry::Rect;
use crate::style::{Color, Theme};

/// Panel widget.
///
/// The border is drawn inside the element's box on top of the background
/// and does not shrink the content area. With
/// `LayoutProperties::proportional_borders` set, the width is
/// `border_proportion × min(width, height)` instead of `border_width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    background: Color,
    border_width: f32,
    border_color: Color,
}

impl Panel {
    /// Panel with the default theme's background and no border.
    #[must_use]
    pub fn new() -> Self {
        Self::themed(&Theme::default())
    }

    /// Panel with `theme`'s background and border color, no border width.
    #[must_use]
    pub fn themed(theme: &Theme) -> Self {
        Self {
            background: theme.panel_background,
            border_width: 0.0,
            border_color: theme.panel_border,
        }
    }

    /// Builder: sets a uniform border.
    #[must_use]
    pub fn with_border(mut self, width: f32, color: Color) -> Self {
        self.border_width = sanitize_width(width);
        self.border_color = color;
        self
    }

    /// Builder: sets the initial background.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Changes the border on a live element.
    pub fn set_border(&mut self, core: &mut ElementCore, width: f32, color: Color) {
        let width = sanitize_width(width);
        if width != self.border_width || color != self.border_color {
            self.border_width = width;
            self.border_color = color;
            core.mark_render_dirty();
        }
    }

    /// Uniform border width in pixels.
    #[must_use]
    pub fn border_width(&self) -> f32 {
        self.border_width
    }

    /// Border color.
    #[must_use]
    pub fn border_color(&self) -> Color {
        self.border_color
    }

    /// Border width that will be drawn for `core`, clamped so opposite edges
    /// never overlap.
    #[must_use]
    pub fn effective_border(&self, core: &ElementCore) -> f32 {
        let size = core.computed_size();
        let min_side = size.x.min(size.y);
        let layout = core.layout();
        let width = if layout.proportional_borders {
            sanitize_width(layout.border_proportion) * min_side
        } else {
            self.border_width
        };
        width.min(min_side * 0.5).max(0.0)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

impl Widget for Panel {
    fn kind(&self) -> &'static str {
        "panel"
    }

    fn init(&mut self, core: &mut ElementCore) {
        core.set_color(self.background);
    }

    fn render(&self, core: &ElementCore, ctx: &mut RenderContext<'_>) {
        ctx.fill(core.color());

        let t = self.effective_border(core);
        if t <= 0.0 || self.border_color.is_transparent() {
            return;
        }
        let size = ctx.size();
        let color = self.border_color;
        ctx.fill_local_rect(Rect::new(0.0, 0.0, size.x, t), color);
        ctx.fill_local_rect(Rect::new(0.0, size.y - t, size.x, t), color);
        ctx.fill_local_rect(Rect::new(0.0, t, t, size.y - 2.0 * t), color);
        ctx.fill_local_rect(Rect::new(size.x - t, t, t, size.y - 2.0 * t), color);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
