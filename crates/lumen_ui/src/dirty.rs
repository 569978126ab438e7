//! Dirty-flag bookkeeping around the layout engine.
//!
//! The bits themselves live on each element (see
//! [`ElementFlags`](crate::element::ElementFlags)); this module adds the
//! scope of explicitly marked elements and the recalculation entry point.

use std::rc::Rc;

use crate::element::{ElementRef, WeakElement};
use crate::layout::{LayoutEngine, LayoutStats};
use crate::render::GlyphSource;

/// Tracks which elements were marked and drives incremental layout.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    scope: Vec<WeakElement>,
    engine: LayoutEngine,
}

impl DirtyTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Measures intrinsic text sizes with `glyphs` from now on.
    pub fn set_glyph_source(&mut self, glyphs: Rc<dyn GlyphSource>) {
        self.engine.set_glyph_source(glyphs);
    }

    /// Marks `element` (and its ancestors) layout-dirty.
    pub fn mark_dirty(&mut self, element: &ElementRef) {
        element.mark_layout_dirty();
        self.scope.push(element.downgrade());
    }

    /// Marks `element` and every descendant layout-dirty.
    pub fn mark_dirty_recursive(&mut self, element: &ElementRef) {
        element.walk(&mut |e: &ElementRef| self.mark_dirty(e));
    }

    /// Returns true if `element` needs layout.
    #[must_use]
    pub fn is_dirty(&self, element: &ElementRef) -> bool {
        element.is_layout_dirty()
    }

    /// Lays out the dirty subtrees under `root`, then any marked element
    /// that was detached from `root` since it was marked.
    ///
    /// Afterwards no element in scope is layout-dirty.
    pub fn recalculate_only_dirty(&mut self, root: &ElementRef) -> LayoutStats {
        let mut stats = self.engine.layout(root);
        for weak in std::mem::take(&mut self.scope) {
            let Some(element) = weak.upgrade() else {
                continue;
            };
            if element.is_layout_dirty() {
                let tree_root = tree_root(&element);
                let extra = self.engine.layout(&tree_root);
                stats.visited += extra.visited;
                stats.arranged += extra.arranged;
            }
        }
        stats
    }

    /// Clears both dirty bits on every element under `root` without laying
    /// anything out.
    pub fn clear_all_dirty_flags(&mut self, root: &ElementRef) {
        root.walk(&mut |e: &ElementRef| e.clear_dirty());
        self.scope.clear();
    }

    /// Elements under `root` whose appearance changed since the last
    /// render, in paint order.
    #[must_use]
    pub fn collect_render_dirty(&self, root: &ElementRef) -> Vec<ElementRef> {
        let mut dirty = Vec::new();
        root.walk(&mut |e: &ElementRef| {
            if e.is_dirty() {
                dirty.push(e.clone());
            }
        });
        dirty
    }

    /// Marked elements still alive, draining the scope.
    pub fn take_scope(&mut self) -> Vec<ElementRef> {
        std::mem::take(&mut self.scope)
            .iter()
            .filter_map(WeakElement::upgrade)
            .collect()
    }

    /// Number of marks recorded since the last recalculation.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scope.len()
    }
}

fn tree_root(element: &ElementRef) -> ElementRef {
    let mut current = element.clone();
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}
