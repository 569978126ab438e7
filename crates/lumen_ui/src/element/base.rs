//! State shared by every element regardless of widget type.

use super::{ElementFlags, ElementId};
use crate::geometry::{sanitize_offset, Mat4, Rect, Vec2};
use crate::layout::{LayoutPhase, LayoutProperties};
use crate::style::Color;

/// Geometry, style and dirty bits of one element.
///
/// Setters record what they invalidate in [`ElementFlags`]. Geometry,
/// visibility and layout property changes set both dirty bits; color and
/// opacity set only `DIRTY_RENDER`. Upward propagation of `DIRTY_LAYOUT`
/// is done by [`ElementRef`](super::ElementRef), which knows the parent.
#[derive(Debug)]
pub struct ElementCore {
    id: ElementId,
    name: String,
    position: Vec2,
    size: Vec2,
    scale: Vec2,
    rotation: f32,
    opacity: f32,
    color: Color,
    layout: LayoutProperties,
    flags: ElementFlags,
    /// Parent-local rectangle computed by the last layout pass.
    layout_rect: Rect,
    phase: LayoutPhase,
    /// World transform cached by the last render pass.
    world: Mat4,
}

impl ElementCore {
    /// Creates the state of a new element with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            name: String::new(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            opacity: 1.0,
            color: Color::TRANSPARENT,
            layout: LayoutProperties::default(),
            flags: ElementFlags::DEFAULT,
            layout_rect: Rect::ZERO,
            phase: LayoutPhase::LayoutDirty,
            world: Mat4::IDENTITY,
        }
    }

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Name used by lookups.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared local offset.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Declared size; a 0 axis asks layout for the natural size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Size assigned by the last layout pass.
    #[must_use]
    pub fn computed_size(&self) -> Vec2 {
        self.layout_rect.size()
    }

    /// Parent-local rectangle assigned by the last layout pass.
    #[must_use]
    pub fn layout_rect(&self) -> Rect {
        self.layout_rect
    }

    /// Scale about the local origin.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Rotation about Z in radians.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Own opacity in [0, 1].
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Base color (ARGB).
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Layout inputs.
    #[must_use]
    pub fn layout(&self) -> &LayoutProperties {
        &self.layout
    }

    /// State bits.
    #[must_use]
    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// Layout state machine position.
    #[must_use]
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// World transform cached by the last render pass.
    #[must_use]
    pub fn cached_world_transform(&self) -> Mat4 {
        self.world
    }

    /// Transform from this element's space to its parent's.
    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_parts(self.layout_rect.position(), self.rotation, self.scale)
    }

    /// Returns true if the element is visible.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.has(ElementFlags::VISIBLE)
    }

    /// Returns true if the element accepts input.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.flags.has(ElementFlags::ENABLED)
    }

    /// Returns true if the pointer is over the element.
    #[inline]
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.flags.has(ElementFlags::HOVERED)
    }

    /// Returns true while a press on the element is held.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.flags.has(ElementFlags::PRESSED)
    }

    /// Returns true if appearance changed since the last render.
    #[inline]
    #[must_use]
    pub fn is_render_dirty(&self) -> bool {
        self.flags.has(ElementFlags::DIRTY_RENDER)
    }

    /// Returns true if layout inputs changed since the last layout pass.
    #[inline]
    #[must_use]
    pub fn is_layout_dirty(&self) -> bool {
        self.flags.has(ElementFlags::DIRTY_LAYOUT)
    }

    /// Marks the element as needing layout (and redraw).
    pub fn mark_layout_dirty(&mut self) {
        self.flags.set(ElementFlags::DIRTY_LAYOUT | ElementFlags::DIRTY_RENDER);
        self.phase = LayoutPhase::LayoutDirty;
    }

    /// Marks the element as needing redraw.
    pub fn mark_render_dirty(&mut self) {
        self.flags.set(ElementFlags::DIRTY_RENDER);
    }

    /// Sets the lookup name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the declared offset. Non-finite components become 0.
    pub fn set_position(&mut self, position: Vec2) {
        let position = Vec2::new(sanitize_offset(position.x), sanitize_offset(position.y));
        if position != self.position {
            self.position = position;
            self.mark_layout_dirty();
        }
    }

    /// Sets the declared size. Negative or non-finite components become 0.
    pub fn set_size(&mut self, size: Vec2) {
        let size = size.non_negative();
        if size != self.size {
            self.size = size;
            self.mark_layout_dirty();
        }
    }

    /// Sets the scale. Non-finite components become 1.
    pub fn set_scale(&mut self, scale: Vec2) {
        let fix = |v: f32| if v.is_finite() { v } else { 1.0 };
        let scale = Vec2::new(fix(scale.x), fix(scale.y));
        if scale != self.scale {
            self.scale = scale;
            self.mark_layout_dirty();
        }
    }

    /// Sets the rotation in radians. Non-finite becomes 0.
    pub fn set_rotation(&mut self, radians: f32) {
        let radians = sanitize_offset(radians);
        if radians != self.rotation {
            self.rotation = radians;
            self.mark_layout_dirty();
        }
    }

    /// Shows or hides the element.
    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.is_visible() {
            self.flags.assign(ElementFlags::VISIBLE, visible);
            self.mark_layout_dirty();
        }
    }

    /// Replaces the layout inputs.
    pub fn set_layout(&mut self, layout: LayoutProperties) {
        if layout != self.layout {
            self.layout = layout;
            self.mark_layout_dirty();
        }
    }

    /// Edits the layout inputs in place.
    pub fn update_layout(&mut self, edit: impl FnOnce(&mut LayoutProperties)) {
        let mut layout = self.layout.clone();
        edit(&mut layout);
        self.set_layout(layout);
    }

    /// Sets the base color.
    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.mark_render_dirty();
        }
    }

    /// Sets the opacity, clamped to [0, 1]; NaN becomes 0.
    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        if opacity != self.opacity {
            self.opacity = opacity;
            self.mark_render_dirty();
        }
    }

    pub(crate) fn set_enabled_flag(&mut self, enabled: bool) {
        self.flags.assign(ElementFlags::ENABLED, enabled);
        if !enabled {
            self.flags.clear(ElementFlags::HOVERED | ElementFlags::PRESSED);
        }
        self.mark_render_dirty();
    }

    pub(crate) fn set_pointer_flag(&mut self, flag: u32, on: bool) {
        self.flags.assign(flag, on);
    }

    pub(crate) fn set_phase(&mut self, phase: LayoutPhase) {
        self.phase = phase;
    }

    /// Stores the rectangle chosen by layout; returns true if it changed.
    pub(crate) fn apply_layout_rect(&mut self, rect: Rect) -> bool {
        if rect == self.layout_rect {
            return false;
        }
        self.layout_rect = rect;
        self.mark_render_dirty();
        true
    }

    pub(crate) fn finish_layout(&mut self) {
        self.flags.clear(ElementFlags::DIRTY_LAYOUT);
        self.phase = LayoutPhase::Clean;
    }

    pub(crate) fn finish_render(&mut self, world: Mat4) {
        self.world = world;
        self.flags.clear(ElementFlags::DIRTY_RENDER);
    }

    pub(crate) fn skip_render(&mut self) {
        self.flags.clear(ElementFlags::DIRTY_RENDER);
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.flags.clear(ElementFlags::DIRTY_LAYOUT | ElementFlags::DIRTY_RENDER);
        self.phase = LayoutPhase::Clean;
    }
}

impl Default for ElementCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HorizontalAlignment;

    fn clean() -> ElementCore {
        let mut core = ElementCore::new();
        core.clear_dirty();
        core
    }

    #[test]
    fn test_geometry_setters_mark_layout() {
        let mut core = clean();
        core.set_size(Vec2::new(10.0, 10.0));
        assert!(core.is_layout_dirty());
        assert!(core.is_render_dirty());
        assert_eq!(core.phase(), LayoutPhase::LayoutDirty);
    }

    #[test]
    fn test_color_marks_render_only() {
        let mut core = clean();
        core.set_color(Color::from_argb(0xFF12_3456));
        assert!(core.is_render_dirty());
        assert!(!core.is_layout_dirty());
    }

    #[test]
    fn test_unchanged_values_stay_clean() {
        let mut core = clean();
        core.set_position(Vec2::ZERO);
        core.set_opacity(1.0);
        core.update_layout(|_| {});
        assert!(!core.is_layout_dirty());
        assert!(!core.is_render_dirty());
    }

    #[test]
    fn test_degenerate_inputs_are_sanitized() {
        let mut core = clean();
        core.set_size(Vec2::new(-5.0, f32::NAN));
        assert_eq!(core.size(), Vec2::ZERO);
        core.set_opacity(3.0);
        assert_eq!(core.opacity(), 1.0);
        core.set_scale(Vec2::new(f32::INFINITY, 2.0));
        assert_eq!(core.scale(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_layout_edit() {
        let mut core = clean();
        core.update_layout(|l| l.horizontal_align = HorizontalAlignment::Center);
        assert_eq!(core.layout().horizontal_align, HorizontalAlignment::Center);
        assert!(core.is_layout_dirty());
    }
}
