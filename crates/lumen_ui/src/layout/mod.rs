//! Layout engine and its strategies.
//!
//! ```text
//!  LayoutDirty ──► Measuring ──► Arranging ──► Clean
//!       ▲                                        │
//!       └──────────── mutation ◄─────────────────┘
//! ```
//!
//! Every strategy is a pure function from a container's content rectangle
//! and its children's [`LayoutItem`]s to child rectangles in the
//! container's local space. The [`LayoutEngine`] walks the tree and feeds
//! the strategies; it only enters subtrees whose `layoutDirty` bit is set
//! or whose size changed.

mod absolute;
mod engine;
mod flex;
mod grid;
mod props;
mod stack;

pub use absolute::AbsoluteLayout;
pub use engine::{LayoutEngine, LayoutPhase, LayoutStats};
pub use flex::FlexLayout;
pub use grid::{resolve_tracks, GridLayout};
pub use props::{
    AlignItems, AlignSelf, AxisAlignment, FlexDirection, FlexWrap, GridUnit, HorizontalAlignment,
    JustifyContent, LayoutProperties, LayoutType, StackDirection, VerticalAlignment,
};
pub use stack::StackLayout;

use crate::geometry::{sanitize_extent, sanitize_offset, Rect, Thickness, Vec2};

/// What a strategy needs to know about one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    /// Natural size (declared, or intrinsic where the declared axis is 0).
    pub size: Vec2,
    /// Declared local offset.
    pub position: Vec2,
    /// Outer margin.
    pub margin: Thickness,
    /// Horizontal alignment.
    pub horizontal_align: HorizontalAlignment,
    /// Vertical alignment.
    pub vertical_align: VerticalAlignment,
    /// Grid row.
    pub grid_row: u32,
    /// Grid column.
    pub grid_column: u32,
    /// Grid row span.
    pub grid_row_span: u32,
    /// Grid column span.
    pub grid_column_span: u32,
    /// Flex order.
    pub order: i32,
    /// Flex grow factor.
    pub flex_grow: f32,
    /// Flex shrink factor.
    pub flex_shrink: f32,
    /// Flex basis.
    pub flex_basis: Option<f32>,
    /// Flex cross-axis override.
    pub align_self: AlignSelf,
    /// Minimum size for flex sizing.
    pub min_size: Vec2,
    /// Maximum size for flex sizing.
    pub max_size: Vec2,
    /// Hidden items take no space.
    pub visible: bool,
}

impl LayoutItem {
    /// Visible item of the given natural size with default properties.
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self::from_props(&LayoutProperties::default(), size, Vec2::ZERO, true)
    }

    /// Extracts the child-side properties.
    #[must_use]
    pub fn from_props(props: &LayoutProperties, size: Vec2, position: Vec2, visible: bool) -> Self {
        Self {
            size: size.non_negative(),
            position: Vec2::new(sanitize_offset(position.x), sanitize_offset(position.y)),
            margin: props.margin,
            horizontal_align: props.horizontal_align,
            vertical_align: props.vertical_align,
            grid_row: props.grid_row,
            grid_column: props.grid_column,
            grid_row_span: props.grid_row_span,
            grid_column_span: props.grid_column_span,
            order: props.order,
            flex_grow: sanitize_extent(props.flex_grow),
            flex_shrink: sanitize_extent(props.flex_shrink),
            flex_basis: props.flex_basis.map(sanitize_extent),
            align_self: props.align_self,
            min_size: props.min_size.non_negative(),
            max_size: Vec2::new(
                if props.max_size.x.is_nan() { f32::INFINITY } else { props.max_size.x.max(0.0) },
                if props.max_size.y.is_nan() { f32::INFINITY } else { props.max_size.y.max(0.0) },
            ),
            visible,
        }
    }

    /// Builder: sets the margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Thickness) -> Self {
        self.margin = margin;
        self
    }

    /// Builder: sets both alignments.
    #[must_use]
    pub fn with_alignment(mut self, h: HorizontalAlignment, v: VerticalAlignment) -> Self {
        self.horizontal_align = h;
        self.vertical_align = v;
        self
    }

    /// Rectangle used for hidden items: declared position and natural size.
    #[must_use]
    pub fn hidden_rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Output of a strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    /// One rectangle per input item, in input order, container-local.
    pub rects: Vec<Rect>,
    /// Content extent consumed, measured from the content origin.
    pub extent: Vec2,
}

/// A way of arranging children inside a content rectangle.
pub trait LayoutStrategy {
    /// Arranges `items` inside `content`. Never fails; degenerate input
    /// degrades to zero sizes.
    fn arrange(&self, content: Rect, items: &[LayoutItem]) -> Arrangement;
}

/// Places a child on one axis inside `[start, start + extent)`.
///
/// Returns `(position, size)`. Margins sit outside the child; Stretch
/// fills the slot minus margins and clamps at 0.
#[must_use]
pub fn place_on_axis(
    align: AxisAlignment,
    start: f32,
    extent: f32,
    natural: f32,
    margin_start: f32,
    margin_end: f32,
) -> (f32, f32) {
    let extent = sanitize_extent(extent);
    let natural = sanitize_extent(natural);
    let margin_start = sanitize_offset(margin_start);
    let margin_end = sanitize_offset(margin_end);

    match align {
        AxisAlignment::Stretch => (
            start + margin_start,
            sanitize_extent(extent - margin_start - margin_end),
        ),
        AxisAlignment::Start => (start + margin_start, natural),
        AxisAlignment::End => (start + extent - margin_end - natural, natural),
        AxisAlignment::Center => {
            let slot = extent - margin_start - margin_end;
            (start + margin_start + (slot - natural) * 0.5, natural)
        }
    }
}

/// Places an item in a slot on both axes using its own alignment and margin.
#[must_use]
pub fn place_in_slot(slot: Rect, item: &LayoutItem) -> Rect {
    let (x, width) = place_on_axis(
        item.horizontal_align.into(),
        slot.x,
        slot.width,
        item.size.x,
        item.margin.left,
        item.margin.right,
    );
    let (y, height) = place_on_axis(
        item.vertical_align.into(),
        slot.y,
        slot.height,
        item.size.y,
        item.margin.top,
        item.margin.bottom,
    );
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_clamps_to_zero() {
        let (pos, size) = place_on_axis(AxisAlignment::Stretch, 0.0, 100.0, 10.0, 80.0, 80.0);
        assert_eq!(pos, 80.0);
        assert_eq!(size, 0.0);
    }

    #[test]
    fn test_end_and_center() {
        assert_eq!(place_on_axis(AxisAlignment::End, 0.0, 100.0, 20.0, 0.0, 10.0), (70.0, 20.0));
        assert_eq!(place_on_axis(AxisAlignment::Center, 0.0, 100.0, 20.0, 0.0, 0.0), (40.0, 20.0));
    }

    #[test]
    fn test_non_finite_natural_size() {
        let (_, size) = place_on_axis(AxisAlignment::Start, 0.0, 100.0, f32::NAN, 0.0, 0.0);
        assert_eq!(size, 0.0);
    }
}
