//! Pointer events delivered to elements.

use std::rc::Rc;

use super::ElementRef;
use crate::geometry::Vec2;
use crate::input::MouseButton;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Pointer moved onto the element.
    Enter,
    /// Pointer moved off the element.
    Leave,
    /// Button pressed over the element.
    Down,
    /// Button released after a press on the element.
    Up,
    /// Press and release both happened over the element.
    Click,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Event kind.
    pub kind: MouseEventKind,
    /// Pointer position, screen space.
    pub position: Vec2,
    /// Button involved; `Left` for enter/leave.
    pub button: MouseButton,
    /// Whether the pointer is over the receiving element.
    pub inside: bool,
}

impl MouseEvent {
    /// Event of `kind` at `position` for the left button.
    #[must_use]
    pub fn new(kind: MouseEventKind, position: Vec2, inside: bool) -> Self {
        Self {
            kind,
            position,
            button: MouseButton::Left,
            inside,
        }
    }
}

/// Callback attached to an element.
pub type MouseHandler = Rc<dyn Fn(&ElementRef, &MouseEvent)>;

/// Per-kind handler lists.
#[derive(Default)]
pub(crate) struct Handlers {
    enter: Vec<MouseHandler>,
    leave: Vec<MouseHandler>,
    down: Vec<MouseHandler>,
    up: Vec<MouseHandler>,
    click: Vec<MouseHandler>,
}

impl Handlers {
    pub(crate) fn list_mut(&mut self, kind: MouseEventKind) -> &mut Vec<MouseHandler> {
        match kind {
            MouseEventKind::Enter => &mut self.enter,
            MouseEventKind::Leave => &mut self.leave,
            MouseEventKind::Down => &mut self.down,
            MouseEventKind::Up => &mut self.up,
            MouseEventKind::Click => &mut self.click,
        }
    }

    pub(crate) fn list(&self, kind: MouseEventKind) -> &[MouseHandler] {
        match kind {
            MouseEventKind::Enter => &self.enter,
            MouseEventKind::Leave => &self.leave,
            MouseEventKind::Down => &self.down,
            MouseEventKind::Up => &self.up,
            MouseEventKind::Click => &self.click,
        }
    }
}
