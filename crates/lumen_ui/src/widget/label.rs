//! Static text.

use std::any::Any;

use super::{RenderContext, Widget};
use crate::element::ElementCore;
use crate::geometry::Vec2;
use crate::render::{GlyphSource, TextStyle};
use crate::style::{Color, Theme};

/// Placement of text inside the label's box on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Left or top.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

impl TextAlign {
    fn offset(self, available: f32, extent: f32) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Center => (available - extent) * 0.5,
            Self::End => available - extent,
        }
    }
}

/// Label widget. Draws its background color (transparent by default) and
/// one text command aligned inside the box.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    style: TextStyle,
    color: Color,
    horizontal: TextAlign,
    vertical: TextAlign,
}

impl Label {
    /// Label showing `text` in the default theme's color.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::themed(text, &Theme::default())
    }

    /// Label showing `text` in `theme`'s label color.
    #[must_use]
    pub fn themed(text: impl Into<String>, theme: &Theme) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            color: theme.label_text,
            horizontal: TextAlign::Start,
            vertical: TextAlign::Start,
        }
    }

    /// Builder: sets font and size.
    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: sets the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: sets the alignment on both axes.
    #[must_use]
    pub fn aligned(mut self, horizontal: TextAlign, vertical: TextAlign) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Text shown.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font and size.
    #[must_use]
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Replaces the text. The intrinsic size changes, so layout is redone.
    pub fn set_text(&mut self, core: &mut ElementCore, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            core.mark_layout_dirty();
        }
    }

    /// Replaces font and size.
    pub fn set_style(&mut self, core: &mut ElementCore, style: TextStyle) {
        if style != self.style {
            self.style = style;
            core.mark_layout_dirty();
        }
    }

    /// Changes the text color.
    pub fn set_text_color(&mut self, core: &mut ElementCore, color: Color) {
        if color != self.color {
            self.color = color;
            core.mark_render_dirty();
        }
    }

    /// Changes the alignment.
    pub fn set_alignment(&mut self, core: &mut ElementCore, horizontal: TextAlign, vertical: TextAlign) {
        self.horizontal = horizontal;
        self.vertical = vertical;
        core.mark_render_dirty();
    }
}

impl Widget for Label {
    fn kind(&self) -> &'static str {
        "label"
    }

    fn render(&self, core: &ElementCore, ctx: &mut RenderContext<'_>) {
        ctx.fill(core.color());
        if self.text.is_empty() {
            return;
        }
        let extent = ctx.measure_text(&self.text, &self.style);
        let size = ctx.size();
        let origin = Vec2::new(
            self.horizontal.offset(size.x, extent.x),
            self.vertical.offset(size.y, extent.y),
        );
        ctx.text(origin, &self.text, self.color, &self.style);
    }

    fn intrinsic_size(&self, _core: &ElementCore, glyphs: &dyn GlyphSource) -> Option<Vec2> {
        Some(glyphs.measure(self.style.font, &self.text, self.style.size))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
