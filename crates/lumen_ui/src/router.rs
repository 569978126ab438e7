//! Pointer routing from the input snapshot to elements.
//!
//! Per update, in this order:
//!
//! 1. hit-test the pointer (topmost wins, clip-aware)
//! 2. leave on the old hover target, enter on the new one
//! 3. left press: remember the target, send down
//! 4. left release: send up to the press target, and click if the pointer
//!    is still over it
//!
//! Every dispatched event is also published on the [`EventBus`] as a
//! [`PointerEvent`].

use crate::element::{ElementId, ElementRef, MouseEvent, MouseEventKind, WeakElement};
use crate::event::EventBus;
use crate::geometry::Vec2;
use crate::input::{InputSnapshot, MouseButton};

/// Bus notification for one routed pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: MouseEventKind,
    /// Receiving element.
    pub target: ElementId,
    /// Pointer position, screen space.
    pub position: Vec2,
}

/// Topmost element under `point`, or `root` itself when the point is inside
/// the root but over no child.
#[must_use]
pub fn hit_test(root: &ElementRef, point: Vec2) -> Option<ElementRef> {
    root.hit_test_children(point)
        .or_else(|| root.hit_test(point).then(|| root.clone()))
}

/// Hover and press tracking across frames.
#[derive(Debug, Default)]
pub struct InputRouter {
    hovered: WeakElement,
    press_target: WeakElement,
}

impl InputRouter {
    /// Creates a router with nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Element under the pointer after the last route.
    #[must_use]
    pub fn hovered(&self) -> Option<ElementRef> {
        self.hovered.upgrade()
    }

    /// Element that received the current left press, if still held.
    #[must_use]
    pub fn press_target(&self) -> Option<ElementRef> {
        self.press_target.upgrade()
    }

    /// Forgets hover and press state.
    pub fn reset(&mut self) {
        self.hovered = WeakElement::default();
        self.press_target = WeakElement::default();
    }

    /// Dispatches this frame's pointer events. Returns how many were sent.
    pub fn route(&mut self, root: &ElementRef, input: &InputSnapshot, bus: &EventBus) -> usize {
        let position = input.mouse_position();
        let hit = hit_test(root, position);
        let mut sent = 0;

        let previous = self.hovered.upgrade();
        if previous != hit {
            if let Some(old) = &previous {
                sent += dispatch(old, MouseEventKind::Leave, position, false, bus);
            }
            if let Some(new) = &hit {
                sent += dispatch(new, MouseEventKind::Enter, position, true, bus);
            }
            self.hovered = hit.as_ref().map(ElementRef::downgrade).unwrap_or_default();
        }

        // A press released before this update still reports Down first.
        if input.press_count(MouseButton::Left) > 0 {
            if let Some(target) = &hit {
                self.press_target = target.downgrade();
                sent += dispatch(target, MouseEventKind::Down, position, true, bus);
            }
        }

        if input.mouse_released(MouseButton::Left) {
            let target = std::mem::take(&mut self.press_target).upgrade();
            if let Some(target) = target {
                let inside = hit.as_ref() == Some(&target);
                sent += dispatch(&target, MouseEventKind::Up, position, inside, bus);
                if inside {
                    sent += dispatch(&target, MouseEventKind::Click, position, true, bus);
                }
            }
        }

        sent
    }
}

fn dispatch(
    element: &ElementRef,
    kind: MouseEventKind,
    position: Vec2,
    inside: bool,
    bus: &EventBus,
) -> usize {
    let target = element.id();
    tracing::trace!(element = %target, ?kind, "pointer event");
    element.dispatch_mouse(&MouseEvent::new(kind, position, inside));
    bus.publish(&PointerEvent {
        kind,
        target,
        position,
    });
    1
}
