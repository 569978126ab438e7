//! Tree walker that feeds the layout strategies.

use super::{
    AbsoluteLayout, Arrangement, FlexLayout, GridLayout, LayoutItem, LayoutProperties,
    LayoutStrategy, LayoutType, StackLayout,
};
use std::fmt;
use std::rc::Rc;

use crate::element::ElementRef;
use crate::geometry::{sanitize_extent, sanitize_offset, Rect, Vec2};
use crate::render::{GlyphSource, MonospaceGlyphs};

/// Per-subtree layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    /// Inputs changed since the last pass.
    #[default]
    LayoutDirty,
    /// Children's natural sizes are being collected.
    Measuring,
    /// Child rectangles are being assigned.
    Arranging,
    /// Rectangles match the inputs.
    Clean,
}

/// Counters from the last layout call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Elements whose subtree was entered.
    pub visited: usize,
    /// Containers whose children were arranged.
    pub arranged: usize,
}

/// Assigns every element its parent-local rectangle.
///
/// Incremental by default: a subtree is entered only when its root is
/// layout-dirty or its own rectangle changed size in this pass. A detached
/// root is placed at its declared position with its natural size.
///
/// Text extents come from the engine's [`GlyphSource`]; share the one the
/// batcher draws with so boxes match the rendered text.
pub struct LayoutEngine {
    stats: LayoutStats,
    glyphs: Rc<dyn GlyphSource>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            stats: LayoutStats::default(),
            glyphs: Rc::new(MonospaceGlyphs::default()),
        }
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine").field("stats", &self.stats).finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Creates an engine measuring text with [`MonospaceGlyphs`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: measures text with `glyphs`.
    #[must_use]
    pub fn with_glyph_source(mut self, glyphs: Rc<dyn GlyphSource>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Swaps the glyph source used for intrinsic text sizes.
    pub fn set_glyph_source(&mut self, glyphs: Rc<dyn GlyphSource>) {
        self.glyphs = glyphs;
    }

    /// Lays out the dirty parts of the tree under `root`.
    pub fn layout(&mut self, root: &ElementRef) -> LayoutStats {
        self.run(root, false)
    }

    /// Lays out every element under `root`.
    pub fn layout_full(&mut self, root: &ElementRef) -> LayoutStats {
        self.run(root, true)
    }

    /// Counters from the last call.
    #[must_use]
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    fn run(&mut self, root: &ElementRef, force: bool) -> LayoutStats {
        self.stats = LayoutStats::default();
        let mut force = force;
        if root.parent().is_none() {
            let rect = sanitize_rect(Rect::from_pos_size(
                root.with_core(|c| c.position()),
                natural_size(root, &*self.glyphs),
            ));
            force |= root.with_core_mut(|c| c.apply_layout_rect(rect));
        }
        self.visit(root, force);
        tracing::trace!(
            visited = self.stats.visited,
            arranged = self.stats.arranged,
            full = force,
            "layout pass complete"
        );
        self.stats
    }

    fn visit(&mut self, element: &ElementRef, force: bool) {
        if !force && !element.is_layout_dirty() {
            return;
        }
        self.stats.visited += 1;

        let children = element.children();
        if children.is_empty() {
            element.with_core_mut(|c| c.finish_layout());
            return;
        }

        element.set_phase(LayoutPhase::Measuring);
        let items: Vec<LayoutItem> = children
            .iter()
            .map(|c| measure_item(c, &*self.glyphs))
            .collect();

        element.set_phase(LayoutPhase::Arranging);
        let (props, content) = element.with_core(|c| {
            let own = Rect::from_pos_size(Vec2::ZERO, c.layout_rect().size());
            (c.layout().clone(), own.deflate(c.layout().padding))
        });
        let arrangement = arrange(&props, content, &items);
        self.stats.arranged += 1;

        for (child, rect) in children.iter().zip(arrangement.rects) {
            let rect = sanitize_rect(rect);
            let resized = child.with_core_mut(|c| {
                let before = c.layout_rect().size();
                c.apply_layout_rect(rect);
                before != rect.size()
            });
            self.visit(child, force || resized);
        }

        element.with_core_mut(|c| c.finish_layout());
    }
}

fn arrange(props: &LayoutProperties, content: Rect, items: &[LayoutItem]) -> Arrangement {
    match props.layout_type {
        LayoutType::None => Arrangement {
            rects: items
                .iter()
                .map(|item| Rect::from_pos_size(item.position, item.size))
                .collect(),
            extent: items
                .iter()
                .filter(|item| item.visible)
                .fold(Vec2::ZERO, |acc, item| acc.max(item.position + item.size)),
        },
        LayoutType::Absolute => AbsoluteLayout.arrange(content, items),
        LayoutType::Stack => stack_for(props).arrange(content, items),
        LayoutType::Grid => GridLayout::from_props(props).arrange(content, items),
        LayoutType::Flex => FlexLayout::from_props(props).arrange(content, items),
    }
}

fn stack_for(props: &LayoutProperties) -> StackLayout {
    StackLayout {
        direction: props.stack_direction,
        spacing: props.stack_spacing,
    }
}

fn measure_item(child: &ElementRef, glyphs: &dyn GlyphSource) -> LayoutItem {
    let size = natural_size(child, glyphs);
    child.with_core(|c| LayoutItem::from_props(c.layout(), size, c.position(), c.is_visible()))
}

/// Declared size per axis, falling back to the widget's intrinsic size or,
/// for stacking containers, to the space their children ask for.
pub(crate) fn natural_size(element: &ElementRef, glyphs: &dyn GlyphSource) -> Vec2 {
    let (declared, props) = element.with_core(|c| (c.size(), c.layout().clone()));
    if declared.x > 0.0 && declared.y > 0.0 {
        return declared;
    }

    let fallback = element.intrinsic_size(glyphs).unwrap_or_else(|| {
        let items = || {
            element
                .children()
                .iter()
                .map(|c| measure_item(c, glyphs))
                .collect::<Vec<_>>()
        };
        let padding = Vec2::new(props.padding.horizontal(), props.padding.vertical());
        match props.layout_type {
            LayoutType::Stack => stack_for(&props).desired_size(&items()) + padding,
            LayoutType::Flex => FlexLayout::from_props(&props).desired_size(&items()) + padding,
            _ => Vec2::ZERO,
        }
    });

    Vec2::new(
        if declared.x > 0.0 { declared.x } else { fallback.x },
        if declared.y > 0.0 { declared.y } else { fallback.y },
    )
    .non_negative()
}

fn sanitize_rect(rect: Rect) -> Rect {
    Rect::new(
        sanitize_offset(rect.x),
        sanitize_offset(rect.y),
        sanitize_extent(rect.width),
        sanitize_extent(rect.height),
    )
}
