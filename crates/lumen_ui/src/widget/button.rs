//! Clickable button with per-state colors.

use std::any::Any;

use super::{RenderContext, Widget, WidgetResponse};
use crate::animation::{ColorTransition, Easing};
use crate::element::{ElementCore, MouseEvent, MouseEventKind};
use crate::geometry::Vec2;
use crate::render::{GlyphSource, TextStyle};
use crate::style::{Color, Theme};

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Idle.
    #[default]
    Normal,
    /// Pointer over the button.
    Hover,
    /// Press held.
    Pressed,
    /// Ignores input.
    Disabled,
}

/// Background color per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    /// Idle.
    pub normal: Color,
    /// Hovered.
    pub hover: Color,
    /// Pressed.
    pub pressed: Color,
    /// Disabled.
    pub disabled: Color,
}

impl ButtonColors {
    /// Colors taken from `theme`.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            normal: theme.button_normal,
            hover: theme.button_hover,
            pressed: theme.button_pressed,
            disabled: theme.button_disabled,
        }
    }

    /// Color for `state`.
    #[must_use]
    pub fn for_state(&self, state: ButtonState) -> Color {
        match state {
            ButtonState::Normal => self.normal,
            ButtonState::Hover => self.hover,
            ButtonState::Pressed => self.pressed,
            ButtonState::Disabled => self.disabled,
        }
    }
}

impl Default for ButtonColors {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

/// Button widget.
///
/// ```text
///  Normal ──enter──► Hover ──down──► Pressed
///    ▲                 ▲               │
///    │                 └──up inside────┤ (click)
///    └──────leave / up outside─────────┘
/// ```
///
/// Disabled buttons never see pointer events; the element absorbs them.
#[derive(Debug, Clone)]
pub struct Button {
    text: String,
    state: ButtonState,
    colors: ButtonColors,
    text_color: Color,
    text_style: TextStyle,
    transition: ColorTransition,
    clicks: u32,
}

/// Padding around the label used for the intrinsic size.
const TEXT_PADDING: Vec2 = Vec2::new(16.0, 8.0);

impl Button {
    /// Button labelled `text` with the default theme.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::themed(text, &Theme::default())
    }

    /// Button labelled `text` colored from `theme`.
    #[must_use]
    pub fn themed(text: impl Into<String>, theme: &Theme) -> Self {
        let colors = ButtonColors::from_theme(theme);
        Self {
            text: text.into(),
            state: ButtonState::Normal,
            colors,
            text_color: theme.button_text,
            text_style: TextStyle::default(),
            transition: ColorTransition::new(colors.normal).with_duration(0.0),
            clicks: 0,
        }
    }

    /// Builder: blends between state colors over `duration` seconds.
    #[must_use]
    pub fn with_transition(mut self, duration: f32, easing: Easing) -> Self {
        self.transition = ColorTransition::new(self.colors.normal)
            .with_duration(duration)
            .with_easing(easing);
        self
    }

    /// Builder: sets the label style.
    #[must_use]
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Builder: sets the state colors.
    #[must_use]
    pub fn with_colors(mut self, colors: ButtonColors) -> Self {
        self.colors = colors;
        self.transition.snap(colors.for_state(self.state));
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clicks received so far.
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.clicks
    }

    /// Replaces the label.
    pub fn set_text(&mut self, core: &mut ElementCore, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            core.mark_layout_dirty();
        }
    }

    /// Replaces the state colors and jumps to the current state's color.
    pub fn set_colors(&mut self, core: &mut ElementCore, colors: ButtonColors) {
        self.colors = colors;
        self.transition.snap(colors.for_state(self.state));
        core.mark_render_dirty();
    }

    fn enter_state(&mut self, core: &mut ElementCore, state: ButtonState) -> bool {
        if state == self.state {
            return false;
        }
        self.state = state;
        self.transition.set_target(self.colors.for_state(state));
        core.mark_render_dirty();
        true
    }
}

impl Widget for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn update(&mut self, core: &mut ElementCore, dt: f32) {
        if self.transition.update(dt) {
            core.mark_render_dirty();
        }
    }

    fn render(&self, core: &ElementCore, ctx: &mut RenderContext<'_>) {
        ctx.fill(self.render_color(core));
        if !self.text.is_empty() {
            let extent = ctx.measure_text(&self.text, &self.text_style);
            let origin = (ctx.size() - extent) * 0.5;
            ctx.text(origin, &self.text, self.text_color, &self.text_style);
        }
    }

    fn on_mouse_event(&mut self, core: &mut ElementCore, event: &MouseEvent) -> WidgetResponse {
        let next = match event.kind {
            MouseEventKind::Enter if self.state == ButtonState::Normal => ButtonState::Hover,
            MouseEventKind::Enter | MouseEventKind::Click => self.state,
            MouseEventKind::Leave => ButtonState::Normal,
            MouseEventKind::Down => ButtonState::Pressed,
            MouseEventKind::Up if event.inside => ButtonState::Hover,
            MouseEventKind::Up => ButtonState::Normal,
        };
        let clicked = event.kind == MouseEventKind::Click;
        if clicked {
            self.clicks += 1;
        }
        WidgetResponse {
            clicked,
            state_changed: self.enter_state(core, next),
        }
    }

    fn on_enabled_changed(&mut self, core: &mut ElementCore, enabled: bool) {
        let state = if enabled { ButtonState::Normal } else { ButtonState::Disabled };
        self.enter_state(core, state);
    }

    fn render_color(&self, _core: &ElementCore) -> Color {
        self.transition.value()
    }

    fn intrinsic_size(&self, _core: &ElementCore, glyphs: &dyn GlyphSource) -> Option<Vec2> {
        let text = glyphs.measure(self.text_style.font, &self.text, self.text_style.size);
        Some(text + TEXT_PADDING)
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
    use crate::render::MonospaceGlyphs;

    fn event(kind: MouseEventKind, inside: bool) -> MouseEvent {
        MouseEvent::new(kind, Vec2::ZERO, inside)
    }

    fn state(e: &ElementRef) -> ButtonState {
        e.read_widget::<Button, _>(|b, _| b.state()).unwrap()
    }

    #[test]
    fn test_press_release_inside_clicks() {
        let e = ElementRef::new(Button::new("OK"));
        let colors = ButtonColors::default();

        e.dispatch_mouse(&event(MouseEventKind::Enter, true));
        assert_eq!(state(&e), ButtonState::Hover);
        assert_eq!(e.render_color(), colors.hover);

        e.dispatch_mouse(&event(MouseEventKind::Down, true));
        assert_eq!(state(&e), ButtonState::Pressed);
        assert_eq!(e.render_color(), colors.pressed);

        e.dispatch_mouse(&event(MouseEventKind::Up, true));
        let response = e.dispatch_mouse(&event(MouseEventKind::Click, true));
        assert!(response.clicked);
        assert_eq!(state(&e), ButtonState::Hover);
        assert_eq!(e.read_widget::<Button, _>(|b, _| b.click_count()), Some(1));
    }

    #[test]
    fn test_release_outside_returns_to_normal() {
        let e = ElementRef::new(Button::new("OK"));
        e.dispatch_mouse(&event(MouseEventKind::Enter, true));
        e.dispatch_mouse(&event(MouseEventKind::Down, true));
        e.dispatch_mouse(&event(MouseEventKind::Up, false));
        assert_eq!(state(&e), ButtonState::Normal);
    }

    #[test]
    fn test_leave_clears_pressed() {
        let e = ElementRef::new(Button::new("OK"));
        e.dispatch_mouse(&event(MouseEventKind::Down, true));
        e.dispatch_mouse(&event(MouseEventKind::Leave, false));
        assert_eq!(state(&e), ButtonState::Normal);
        assert!(!e.core().is_pressed());
    }

    #[test]
    fn test_disabled_absorbs_events() {
        let e = ElementRef::new(Button::new("OK"));
        e.set_enabled(false);
        assert_eq!(state(&e), ButtonState::Disabled);
        assert_eq!(e.render_color(), ButtonColors::default().disabled);

        let response = e.dispatch_mouse(&event(MouseEventKind::Click, true));
        assert!(!response.clicked);
        e.dispatch_mouse(&event(MouseEventKind::Enter, true));
        assert_eq!(state(&e), ButtonState::Disabled);

        e.set_enabled(true);
        assert_eq!(state(&e), ButtonState::Normal);
    }

    #[test]
    fn test_transition_blends_over_updates() {
        let e = ElementRef::new(Button::new("OK").with_transition(0.1, Easing::Linear));
        let colors = ButtonColors::default();
        e.dispatch_mouse(&event(MouseEventKind::Enter, true));
        assert_eq!(e.render_color(), colors.normal);

        e.update(0.05);
        let mid = e.render_color();
        assert_ne!(mid, colors.normal);
        assert_ne!(mid, colors.hover);

        e.update(0.05);
        assert_eq!(e.render_color(), colors.hover);
    }

    #[test]
    fn test_intrinsic_size_includes_padding() {
        let button = Button::new("ab");
        let size = button
            .intrinsic_size(&ElementCore::new(), &MonospaceGlyphs::default())
            .unwrap();
        assert!(size.x > TEXT_PADDING.x);
        assert!(size.y > TEXT_PADDING.y);
    }
}
