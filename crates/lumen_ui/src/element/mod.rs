//! The element tree.
//!
//! Parents own their children through shared handles; children point back
//! through a weak link that is used for lookup and dirty propagation only.
//! Removing a child drops the parent's handle but leaves outstanding
//! [`ElementRef`]s valid (the subtree becomes an orphan).

mod base;
mod events;
mod flags;

pub use base::ElementCore;
pub use events::{MouseEvent, MouseEventKind, MouseHandler};
pub use flags::ElementFlags;

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use events::Handlers;

use crate::error::{UiError, UiResult};
use crate::geometry::{Mat4, Rect, Vec2};
use crate::layout::{LayoutPhase, LayoutProperties};
use crate::render::{BatchRecorder, GlyphSource, ScissorGuard};
use crate::style::Color;
use crate::widget::{BaseElement, RenderContext, Widget, WidgetResponse};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn new() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct ElementNode {
    pub(crate) core: ElementCore,
    pub(crate) widget: Box<dyn Widget>,
    parent: Weak<RefCell<ElementNode>>,
    children: Vec<ElementRef>,
    handlers: Handlers,
}

/// Shared handle to an element.
#[derive(Clone)]
pub struct ElementRef(Rc<RefCell<ElementNode>>);

/// Non-owning handle to an element.
#[derive(Clone, Default)]
pub struct WeakElement(Weak<RefCell<ElementNode>>);

impl WeakElement {
    /// Upgrades to a shared handle if the element is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ElementRef> {
        self.0.upgrade().map(ElementRef)
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(e) => write!(f, "WeakElement({e:?})"),
            None => f.write_str("WeakElement(dropped)"),
        }
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ElementRef {}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(node) => write!(
                f,
                "{}({}{}{})",
                node.widget.kind(),
                node.core.id(),
                if node.core.name().is_empty() { "" } else { " " },
                node.core.name()
            ),
            Err(_) => f.write_str("Element(<borrowed>)"),
        }
    }
}

impl ElementRef {
    /// Wraps `widget` in a new detached element and runs its `init` hook.
    pub fn new(widget: impl Widget) -> Self {
        Self::from_boxed(Box::new(widget))
    }

    /// Like [`ElementRef::new`] for an already boxed widget.
    #[must_use]
    pub fn from_boxed(mut widget: Box<dyn Widget>) -> Self {
        let mut core = ElementCore::new();
        widget.init(&mut core);
        Self(Rc::new(RefCell::new(ElementNode {
            core,
            widget,
            parent: Weak::new(),
            children: Vec::new(),
            handlers: Handlers::default(),
        })))
    }

    /// A plain element that draws its color and lays out its children.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(BaseElement)
    }

    /// Non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    /// Read access to the shared state.
    ///
    /// # Panics
    ///
    /// Panics if the element is mutably borrowed, which only happens from
    /// inside its own widget hooks.
    #[must_use]
    pub fn core(&self) -> Ref<'_, ElementCore> {
        Ref::map(self.0.borrow(), |n| &n.core)
    }

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.0.borrow().core.id()
    }

    /// Lookup name.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.borrow().core.name().to_owned()
    }

    /// Widget type name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.0.borrow().widget.kind()
    }

    /// Parent, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<ElementRef> {
        self.0.borrow().parent.upgrade().map(ElementRef)
    }

    /// Children in insertion (paint) order.
    #[must_use]
    pub fn children(&self) -> Vec<ElementRef> {
        self.0.borrow().children.clone()
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Attaches `child` as the last child, detaching it from any previous
    /// parent first.
    ///
    /// # Errors
    ///
    /// [`UiError::SelfParent`] if `child` is `self`, and
    /// [`UiError::CycleDetected`] if `child` is an ancestor of `self`.
    /// The tree is left untouched in both cases.
    pub fn add_child(&self, child: &ElementRef) -> UiResult<()> {
        if self == child {
            let id = self.id();
            tracing::warn!(element = %id, "rejected add_child: element cannot adopt itself");
            return Err(UiError::SelfParent(id));
        }
        let mut ancestor = self.parent();
        while let Some(a) = ancestor {
            if a == *child {
                let (parent, child) = (self.id(), child.id());
                tracing::warn!(%parent, %child, "rejected add_child: would create a cycle");
                return Err(UiError::CycleDetected { parent, child });
            }
            ancestor = a.parent();
        }

        child.remove_from_parent();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        child.mark_layout_dirty();
        Ok(())
    }

    /// Detaches `child`.
    ///
    /// # Errors
    ///
    /// [`UiError::NotAChild`] if `child` is not a direct child of `self`.
    pub fn remove_child(&self, child: &ElementRef) -> UiResult<()> {
        let removed = {
            let mut node = self.0.borrow_mut();
            let index = node.children.iter().position(|c| c == child);
            index.map(|i| node.children.remove(i))
        };
        match removed {
            Some(child) => {
                child.0.borrow_mut().parent = Weak::new();
                self.mark_layout_dirty();
                Ok(())
            }
            None => Err(UiError::NotAChild {
                parent: self.id(),
                child: child.id(),
            }),
        }
    }

    /// Detaches `self` from its parent. Returns false if it had none.
    pub fn remove_from_parent(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.remove_child(self).is_ok(),
            None => false,
        }
    }

    /// Depth-first search (self first) for an element named `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ElementRef> {
        self.find(&|core| core.name() == name)
    }

    /// Depth-first search (self first) for `id`.
    #[must_use]
    pub fn find_by_id(&self, id: ElementId) -> Option<ElementRef> {
        self.find(&|core| core.id() == id)
    }

    fn find(&self, pred: &dyn Fn(&ElementCore) -> bool) -> Option<ElementRef> {
        if pred(&self.0.borrow().core) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|c| c.find(pred))
    }

    /// Calls `visit` on `self` and every descendant, pre-order.
    pub fn walk(&self, visit: &mut dyn FnMut(&ElementRef)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Mutates the shared state, then propagates layout dirtiness upward if
    /// the mutation set it.
    pub fn modify<R>(&self, edit: impl FnOnce(&mut ElementCore) -> R) -> R {
        let (result, layout_dirty) = {
            let mut node = self.0.borrow_mut();
            let result = edit(&mut node.core);
            (result, node.core.is_layout_dirty())
        };
        if layout_dirty {
            self.propagate_layout_dirty();
        }
        result
    }

    /// Runs `edit` on the widget if it is a `W`.
    ///
    /// Returns `None` when the widget has another type.
    pub fn with_widget<W: Widget, R>(&self, edit: impl FnOnce(&mut W, &mut ElementCore) -> R) -> Option<R> {
        let (result, layout_dirty) = {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            let widget = node.widget.as_any_mut().downcast_mut::<W>()?;
            let result = edit(widget, &mut node.core);
            (result, node.core.is_layout_dirty())
        };
        if layout_dirty {
            self.propagate_layout_dirty();
        }
        Some(result)
    }

    /// Reads the widget if it is a `W`.
    pub fn read_widget<W: Widget, R>(&self, read: impl FnOnce(&W, &ElementCore) -> R) -> Option<R> {
        let node = self.0.borrow();
        let widget = node.widget.as_any().downcast_ref::<W>()?;
        Some(read(widget, &node.core))
    }

    /// Returns true if the widget is a `W`.
    #[must_use]
    pub fn is<W: Widget>(&self) -> bool {
        let node = self.0.borrow();
        let any: &dyn Any = node.widget.as_any();
        any.is::<W>()
    }

    /// Marks `self` layout-dirty and every ancestor up to the root.
    pub fn mark_layout_dirty(&self) {
        self.0.borrow_mut().core.mark_layout_dirty();
        self.propagate_layout_dirty();
    }

    /// Marks `self` render-dirty.
    pub fn mark_render_dirty(&self) {
        self.0.borrow_mut().core.mark_render_dirty();
    }

    fn propagate_layout_dirty(&self) {
        let mut ancestor = self.parent();
        while let Some(a) = ancestor {
            a.0.borrow_mut().core.mark_layout_dirty();
            ancestor = a.parent();
        }
    }

    /// Sets the lookup name.
    pub fn set_name(&self, name: impl Into<String>) {
        self.modify(|c| c.set_name(name));
    }

    /// Sets the declared local offset.
    pub fn set_position(&self, position: Vec2) {
        self.modify(|c| c.set_position(position));
    }

    /// Sets the declared size.
    pub fn set_size(&self, size: Vec2) {
        self.modify(|c| c.set_size(size));
    }

    /// Sets the scale.
    pub fn set_scale(&self, scale: Vec2) {
        self.modify(|c| c.set_scale(scale));
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&self, radians: f32) {
        self.modify(|c| c.set_rotation(radians));
    }

    /// Shows or hides the subtree.
    pub fn set_visible(&self, visible: bool) {
        self.modify(|c| c.set_visible(visible));
    }

    /// Replaces the layout inputs.
    pub fn set_layout_properties(&self, layout: LayoutProperties) {
        self.modify(|c| c.set_layout(layout));
    }

    /// Edits the layout inputs in place.
    pub fn update_layout(&self, edit: impl FnOnce(&mut LayoutProperties)) {
        self.modify(|c| c.update_layout(edit));
    }

    /// Sets the base color.
    pub fn set_color(&self, color: Color) {
        self.modify(|c| c.set_color(color));
    }

    /// Alias of [`ElementRef::set_color`].
    pub fn set_background_color(&self, color: Color) {
        self.set_color(color);
    }

    /// Sets the own opacity.
    pub fn set_opacity(&self, opacity: f32) {
        self.modify(|c| c.set_opacity(opacity));
    }

    /// Enables or disables input; disabled elements absorb pointer events.
    pub fn set_enabled(&self, enabled: bool) {
        let layout_dirty = {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            if node.core.is_enabled() == enabled {
                return;
            }
            node.core.set_enabled_flag(enabled);
            node.widget.on_enabled_changed(&mut node.core, enabled);
            node.core.is_layout_dirty()
        };
        if layout_dirty {
            self.propagate_layout_dirty();
        }
    }

    /// Color the element currently draws with.
    #[must_use]
    pub fn render_color(&self) -> Color {
        let node = self.0.borrow();
        node.widget.render_color(&node.core)
    }

    /// Returns true if appearance changed since the last render.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.0.borrow().core.is_render_dirty()
    }

    /// Returns true if layout inputs changed since the last layout pass.
    #[must_use]
    pub fn is_layout_dirty(&self) -> bool {
        self.0.borrow().core.is_layout_dirty()
    }

    /// Returns true if the element is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.0.borrow().core.is_visible()
    }

    /// Returns true if the element accepts input.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.borrow().core.is_enabled()
    }

    /// Parent-local rectangle from the last layout pass.
    #[must_use]
    pub fn layout_rect(&self) -> Rect {
        self.0.borrow().core.layout_rect()
    }

    /// Size from the last layout pass.
    #[must_use]
    pub fn computed_size(&self) -> Vec2 {
        self.0.borrow().core.computed_size()
    }

    /// Transform from local space to screen space, through every ancestor.
    #[must_use]
    pub fn world_transform(&self) -> Mat4 {
        let local = self.0.borrow().core.local_transform();
        match self.parent() {
            Some(parent) => parent.world_transform() * local,
            None => local,
        }
    }

    /// Screen position of the local origin.
    #[must_use]
    pub fn absolute_position(&self) -> Vec2 {
        self.world_transform().translation_part()
    }

    /// Screen-space axis-aligned box.
    #[must_use]
    pub fn absolute_rect(&self) -> Rect {
        self.world_transform().transform_rect(self.computed_size())
    }

    /// Returns true if `point` is inside the element's screen box and not
    /// cut away by any clipping ancestor.
    #[must_use]
    pub fn hit_test(&self, point: Vec2) -> bool {
        if !self.is_visible() || !self.absolute_rect().contains(point) {
            return false;
        }
        let mut ancestor = self.parent();
        while let Some(a) = ancestor {
            if !a.is_visible() {
                return false;
            }
            if a.core().layout().clip_content && !a.absolute_rect().contains(point) {
                return false;
            }
            ancestor = a.parent();
        }
        true
    }

    /// Topmost descendant under `point`, honoring clip rectangles.
    #[must_use]
    pub fn hit_test_children(&self, point: Vec2) -> Option<ElementRef> {
        let (world, clip_self) = {
            let node = self.0.borrow();
            let world = self.world_transform();
            let clip = node.core.layout().clip_content;
            (world, clip.then(|| world.transform_rect(node.core.computed_size())))
        };
        if clip_self.is_some_and(|r| !r.contains(point)) {
            return None;
        }
        self.children()
            .iter()
            .rev()
            .find_map(|child| child.pick(point, &world))
    }

    fn pick(&self, point: Vec2, parent_world: &Mat4) -> Option<ElementRef> {
        let (world, inside, clip, children) = {
            let node = self.0.borrow();
            if !node.core.is_visible() {
                return None;
            }
            let world = *parent_world * node.core.local_transform();
            let inside = world.transform_rect(node.core.computed_size()).contains(point);
            (world, inside, node.core.layout().clip_content, node.children.clone())
        };
        if clip && !inside {
            return None;
        }
        children
            .iter()
            .rev()
            .find_map(|child| child.pick(point, &world))
            .or_else(|| inside.then(|| self.clone()))
    }

    /// Advances widget state by `dt` seconds, self then children.
    pub fn update(&self, dt: f32) {
        let (children, layout_dirty) = {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            node.widget.update(&mut node.core, dt);
            (node.children.clone(), node.core.is_layout_dirty())
        };
        if layout_dirty {
            self.propagate_layout_dirty();
        }
        for child in &children {
            child.update(dt);
        }
    }

    /// Emits draw commands for the subtree.
    ///
    /// Skipped entirely when invisible or when the inherited opacity is 0.
    /// A clipping element scissors its children; the scissor is popped on
    /// every exit path.
    pub fn render(&self, recorder: &mut dyn BatchRecorder) {
        let (parent_world, parent_opacity) = match self.parent() {
            Some(parent) => (parent.world_transform(), parent.effective_opacity()),
            None => (Mat4::IDENTITY, 1.0),
        };
        self.render_node(recorder, &parent_world, parent_opacity);
    }

    /// Product of the opacity chain up to the root.
    #[must_use]
    pub fn effective_opacity(&self) -> f32 {
        let own = self.0.borrow().core.opacity();
        match self.parent() {
            Some(parent) => parent.effective_opacity() * own,
            None => own,
        }
    }

    /// Nothing under a hidden or fully transparent element is drawn, so the
    /// whole subtree counts as rendered.
    fn skip_render(&self) {
        self.walk(&mut |e: &ElementRef| e.with_core_mut(ElementCore::skip_render));
    }

    fn render_node(&self, recorder: &mut dyn BatchRecorder, parent_world: &Mat4, parent_opacity: f32) {
        let (world, opacity, clip, children) = {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            let opacity = parent_opacity * node.core.opacity();
            if !node.core.is_visible() || opacity <= 0.0 {
                drop(guard);
                self.skip_render();
                return;
            }
            let world = *parent_world * node.core.local_transform();
            let size = node.core.computed_size();
            {
                let mut ctx = RenderContext::new(&mut *recorder, world, size, opacity);
                node.widget.render(&node.core, &mut ctx);
            }
            node.core.finish_render(world);
            let clip = node
                .core
                .layout()
                .clip_content
                .then(|| world.transform_rect(size));
            (world, opacity, clip, node.children.clone())
        };

        match clip {
            Some(rect) => {
                let mut guard = ScissorGuard::push(recorder, rect);
                for child in &children {
                    child.render_node(&mut *guard, &world, opacity);
                }
            }
            None => {
                for child in &children {
                    child.render_node(recorder, &world, opacity);
                }
            }
        }
    }

    /// Delivers a pointer event: updates hover/press bits, runs the widget
    /// hook, then the attached handlers. Disabled elements absorb events.
    pub fn dispatch_mouse(&self, event: &MouseEvent) -> WidgetResponse {
        let (response, handlers, layout_dirty) = {
            let mut guard = self.0.borrow_mut();
            let node = &mut *guard;
            if !node.core.is_enabled() {
                return WidgetResponse::default();
            }
            match event.kind {
                MouseEventKind::Enter => node.core.set_pointer_flag(ElementFlags::HOVERED, true),
                MouseEventKind::Leave => {
                    node.core
                        .set_pointer_flag(ElementFlags::HOVERED | ElementFlags::PRESSED, false);
                }
                MouseEventKind::Down => node.core.set_pointer_flag(ElementFlags::PRESSED, true),
                MouseEventKind::Up => node.core.set_pointer_flag(ElementFlags::PRESSED, false),
                MouseEventKind::Click => {}
            }
            let response = node.widget.on_mouse_event(&mut node.core, event);
            let handlers = node.handlers.list(event.kind).to_vec();
            (response, handlers, node.core.is_layout_dirty())
        };
        if layout_dirty {
            self.propagate_layout_dirty();
        }
        for handler in &handlers {
            handler(self, event);
        }
        response
    }

    fn add_handler(&self, kind: MouseEventKind, handler: MouseHandler) {
        self.0.borrow_mut().handlers.list_mut(kind).push(handler);
    }

    /// Called when the pointer enters.
    pub fn on_mouse_enter(&self, handler: impl Fn(&ElementRef, &MouseEvent) + 'static) {
        self.add_handler(MouseEventKind::Enter, Rc::new(handler));
    }

    /// Called when the pointer leaves.
    pub fn on_mouse_leave(&self, handler: impl Fn(&ElementRef, &MouseEvent) + 'static) {
        self.add_handler(MouseEventKind::Leave, Rc::new(handler));
    }

    /// Called on left-button press.
    pub fn on_mouse_down(&self, handler: impl Fn(&ElementRef, &MouseEvent) + 'static) {
        self.add_handler(MouseEventKind::Down, Rc::new(handler));
    }

    /// Called on release of a press that started here.
    pub fn on_mouse_up(&self, handler: impl Fn(&ElementRef, &MouseEvent) + 'static) {
        self.add_handler(MouseEventKind::Up, Rc::new(handler));
    }

    /// Called when press and release both land on the element.
    pub fn on_click(&self, handler: impl Fn(&ElementRef, &MouseEvent) + 'static) {
        self.add_handler(MouseEventKind::Click, Rc::new(handler));
    }

    pub(crate) fn intrinsic_size(&self, glyphs: &dyn GlyphSource) -> Option<Vec2> {
        let node = self.0.borrow();
        node.widget.intrinsic_size(&node.core, glyphs)
    }

    pub(crate) fn with_core<R>(&self, read: impl FnOnce(&ElementCore) -> R) -> R {
        read(&self.0.borrow().core)
    }

    pub(crate) fn with_core_mut<R>(&self, edit: impl FnOnce(&mut ElementCore) -> R) -> R {
        edit(&mut self.0.borrow_mut().core)
    }

    pub(crate) fn set_phase(&self, phase: LayoutPhase) {
        self.0.borrow_mut().core.set_phase(phase);
    }

    /// Clears both dirty bits on `self` only.
    pub(crate) fn clear_dirty(&self) {
        self.0.borrow_mut().core.clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutEngine, LayoutType};
    use crate::render::testing::{Command, CommandLog};
    use std::cell::Cell;

    fn sized(x: f32, y: f32, w: f32, h: f32) -> ElementRef {
        let e = ElementRef::plain();
        e.set_position(Vec2::new(x, y));
        e.set_size(Vec2::new(w, h));
        e
    }

    fn layout(root: &ElementRef) {
        LayoutEngine::new().layout_full(root);
    }

    #[test]
    fn test_add_child_is_exclusive() {
        let a = ElementRef::plain();
        let b = ElementRef::plain();
        let c = ElementRef::plain();
        a.add_child(&c).unwrap();
        b.add_child(&c).unwrap();
        b.add_child(&c).unwrap();

        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
        assert_eq!(c.parent(), Some(b.clone()));
    }

    #[test]
    fn test_cycles_are_rejected_without_mutation() {
        let a = ElementRef::plain();
        let b = ElementRef::plain();
        a.add_child(&b).unwrap();

        assert_eq!(a.add_child(&a), Err(UiError::SelfParent(a.id())));
        assert!(matches!(b.add_child(&a), Err(UiError::CycleDetected { .. })));
        assert_eq!(a.children(), vec![b.clone()]);
        assert!(a.parent().is_none());
    }

    #[test]
    fn test_remove_child_orphans_but_keeps_handle() {
        let parent = ElementRef::plain();
        let child = ElementRef::plain();
        child.set_name("kept");
        parent.add_child(&child).unwrap();

        parent.remove_child(&child).unwrap();
        assert!(child.parent().is_none());
        assert_eq!(child.name(), "kept");
        assert!(matches!(parent.remove_child(&child), Err(UiError::NotAChild { .. })));
        assert!(!child.remove_from_parent());
    }

    #[test]
    fn test_layout_dirty_propagates_to_root() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        let mid = ElementRef::plain();
        let leaf = ElementRef::plain();
        root.add_child(&mid).unwrap();
        mid.add_child(&leaf).unwrap();
        layout(&root);
        assert!(!root.is_layout_dirty());

        leaf.set_rotation(0.5);
        assert!(leaf.is_layout_dirty());
        assert!(mid.is_layout_dirty());
        assert!(root.is_layout_dirty());
    }

    #[test]
    fn test_color_only_mutation_is_render_dirty() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        let panel = ElementRef::plain();
        root.add_child(&panel).unwrap();
        layout(&root);
        root.walk(&mut |e: &ElementRef| e.clear_dirty());

        panel.set_background_color(Color::from_argb(0xFF12_3456));
        assert_eq!(panel.render_color(), Color::from_argb(0xFF12_3456));
        assert!(panel.is_dirty());
        assert!(!panel.is_layout_dirty());
        assert!(!root.is_layout_dirty());
    }

    #[test]
    fn test_world_transform_composes() {
        let root = sized(0.0, 0.0, 200.0, 200.0);
        let a = sized(10.0, 20.0, 50.0, 50.0);
        let b = sized(5.0, 5.0, 10.0, 10.0);
        root.add_child(&a).unwrap();
        a.add_child(&b).unwrap();
        a.set_scale(Vec2::new(2.0, 2.0));
        layout(&root);

        assert_eq!(b.absolute_position(), Vec2::new(20.0, 30.0));
        assert_eq!(b.absolute_rect(), Rect::new(20.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn test_hit_test_respects_ancestor_clip() {
        let root = sized(0.0, 0.0, 400.0, 400.0);
        let parent = sized(0.0, 0.0, 100.0, 100.0);
        parent.update_layout(|l| l.clip_content = true);
        let child = sized(110.0, 10.0, 50.0, 50.0);
        root.add_child(&parent).unwrap();
        parent.add_child(&child).unwrap();
        layout(&root);

        let p = Vec2::new(120.0, 20.0);
        assert!(!child.hit_test(p));
        assert_eq!(root.hit_test_children(p), None);

        parent.update_layout(|l| l.clip_content = false);
        layout(&root);
        assert!(child.hit_test(p));
        assert_eq!(root.hit_test_children(p), Some(child));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        let under = sized(0.0, 0.0, 50.0, 50.0);
        let over = sized(25.0, 25.0, 50.0, 50.0);
        root.add_child(&under).unwrap();
        root.add_child(&over).unwrap();
        layout(&root);

        assert_eq!(root.hit_test_children(Vec2::new(30.0, 30.0)), Some(over.clone()));
        assert_eq!(root.hit_test_children(Vec2::new(10.0, 10.0)), Some(under));
        over.set_visible(false);
        layout(&root);
        assert_ne!(root.hit_test_children(Vec2::new(60.0, 60.0)), Some(over));
    }

    #[test]
    fn test_render_folds_opacity_and_clips() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        root.set_color(Color::from_argb(0xFF00_0000));
        root.set_opacity(0.5);
        root.update_layout(|l| {
            l.layout_type = LayoutType::None;
            l.clip_content = true;
        });
        let child = sized(10.0, 10.0, 10.0, 10.0);
        child.set_color(Color::WHITE);
        root.add_child(&child).unwrap();
        layout(&root);

        let mut log = CommandLog::default();
        root.render(&mut log);

        assert_eq!(log.fill_colors(), vec![Color::from_argb(0x8000_0000), Color::WHITE.with_alpha(0x80)]);
        assert!(matches!(log.commands[1], Command::PushScissor(_)));
        assert_eq!(log.scissor_depth(), 0);
        assert!(!child.is_dirty());
    }

    #[test]
    fn test_invisible_or_transparent_subtrees_skip() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        let child = sized(0.0, 0.0, 10.0, 10.0);
        child.set_color(Color::WHITE);
        root.add_child(&child).unwrap();
        layout(&root);

        root.set_opacity(0.0);
        let mut log = CommandLog::default();
        root.render(&mut log);
        assert!(log.commands.is_empty());

        root.set_opacity(1.0);
        child.set_visible(false);
        root.render(&mut log);
        assert!(log.fill_colors().is_empty());
    }

    #[test]
    fn test_skipped_subtrees_are_no_longer_render_dirty() {
        let root = sized(0.0, 0.0, 100.0, 100.0);
        let mid = sized(0.0, 0.0, 50.0, 50.0);
        let leaf = sized(0.0, 0.0, 10.0, 10.0);
        root.add_child(&mid).unwrap();
        mid.add_child(&leaf).unwrap();
        layout(&root);

        mid.set_opacity(0.0);
        leaf.set_color(Color::RED);
        assert!(mid.is_dirty() && leaf.is_dirty());
        root.render(&mut CommandLog::default());
        assert!(!mid.is_dirty());
        assert!(!leaf.is_dirty());

        mid.set_opacity(1.0);
        mid.set_visible(false);
        layout(&root);
        root.render(&mut CommandLog::default());
        assert!(!mid.is_dirty());
    }

    #[test]
    fn test_disabled_elements_absorb_events() {
        let e = sized(0.0, 0.0, 10.0, 10.0);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        e.on_click(move |_, _| counter.set(counter.get() + 1));

        let click = MouseEvent::new(MouseEventKind::Click, Vec2::ZERO, true);
        e.dispatch_mouse(&click);
        e.set_enabled(false);
        e.dispatch_mouse(&click);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_handlers_may_mutate_tree() {
        let root = ElementRef::plain();
        let button = ElementRef::plain();
        root.add_child(&button).unwrap();
        button.on_click(|el, _| {
            if let Some(parent) = el.parent() {
                let _ = parent.remove_child(el);
            }
        });

        button.dispatch_mouse(&MouseEvent::new(MouseEventKind::Click, Vec2::ZERO, true));
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn test_find_by_name_and_id() {
        let root = ElementRef::plain();
        let a = ElementRef::plain();
        let b = ElementRef::plain();
        b.set_name("target");
        root.add_child(&a).unwrap();
        a.add_child(&b).unwrap();

        assert_eq!(root.find_by_name("target"), Some(b.clone()));
        assert_eq!(root.find_by_id(b.id()), Some(b));
        assert_eq!(root.find_by_name("missing"), None);
    }
}
