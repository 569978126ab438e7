//! Per-element layout property bundle.

use crate::geometry::{Thickness, Vec2};

/// Strategy a container uses to arrange its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutType {
    /// Children keep their declared position and size verbatim.
    #[default]
    None,
    /// Declared position and size plus alignment and margin clamping.
    Absolute,
    /// Sequential along one axis.
    Stack,
    /// Rows and columns resolved from [`GridUnit`] definitions.
    Grid,
    /// CSS-flexbox subset.
    Flex,
}

/// Horizontal placement of a child inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Anchored to the left edge.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Anchored to the right edge.
    Right,
    /// Fills the slot minus margins.
    Stretch,
}

/// Vertical placement of a child inside its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Anchored to the top edge.
    #[default]
    Top,
    /// Centered.
    Center,
    /// Anchored to the bottom edge.
    Bottom,
    /// Fills the slot minus margins.
    Stretch,
}

/// Axis-neutral alignment used by the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlignment {
    /// Low edge.
    Start,
    /// Middle.
    Center,
    /// High edge.
    End,
    /// Fill.
    Stretch,
}

impl From<HorizontalAlignment> for AxisAlignment {
    fn from(a: HorizontalAlignment) -> Self {
        match a {
            HorizontalAlignment::Left => Self::Start,
            HorizontalAlignment::Center => Self::Center,
            HorizontalAlignment::Right => Self::End,
            HorizontalAlignment::Stretch => Self::Stretch,
        }
    }
}

impl From<VerticalAlignment> for AxisAlignment {
    fn from(a: VerticalAlignment) -> Self {
        match a {
            VerticalAlignment::Top => Self::Start,
            VerticalAlignment::Center => Self::Center,
            VerticalAlignment::Bottom => Self::End,
            VerticalAlignment::Stretch => Self::Stretch,
        }
    }
}

/// Main axis of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackDirection {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    #[default]
    Vertical,
}

/// Size descriptor of a grid row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridUnit {
    /// Exact pixels.
    Fixed(f32),
    /// Equal share of what remains after fixed units.
    Auto,
    /// Weighted share of what remains after fixed and auto units.
    Star(f32),
}

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    /// Left to right.
    #[default]
    Row,
    /// Right to left.
    RowReverse,
    /// Top to bottom.
    Column,
    /// Bottom to top.
    ColumnReverse,
}

impl FlexDirection {
    /// Returns true for row directions.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Returns true for reversed directions.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// Main-axis distribution of free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    /// Pack at the start.
    #[default]
    FlexStart,
    /// Pack at the end.
    FlexEnd,
    /// Pack in the middle.
    Center,
    /// First and last item on the edges, equal gaps between.
    SpaceBetween,
    /// Equal space around each item (half-size gaps on the edges).
    SpaceAround,
    /// Equal gaps everywhere, edges included.
    SpaceEvenly,
}

/// Cross-axis placement of items in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    /// Cross start.
    FlexStart,
    /// Cross end.
    FlexEnd,
    /// Middle of the line.
    Center,
    /// Fill the line minus margins.
    #[default]
    Stretch,
}

/// Per-item override of [`AlignItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    /// Use the container's `align_items`.
    #[default]
    Auto,
    /// Cross start.
    FlexStart,
    /// Cross end.
    FlexEnd,
    /// Middle of the line.
    Center,
    /// Fill the line minus margins.
    Stretch,
}

impl AlignSelf {
    /// Resolves against the container default.
    #[must_use]
    pub const fn resolve(self, items: AlignItems) -> AlignItems {
        match self {
            Self::Auto => items,
            Self::FlexStart => AlignItems::FlexStart,
            Self::FlexEnd => AlignItems::FlexEnd,
            Self::Center => AlignItems::Center,
            Self::Stretch => AlignItems::Stretch,
        }
    }
}

/// Line breaking of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    /// Single line.
    #[default]
    Nowrap,
    /// Break into lines stacked along the cross axis.
    Wrap,
    /// Break into lines stacked in reverse cross order.
    WrapReverse,
}

/// Layout inputs of one element, both as a container and as a child.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProperties {
    /// How this element arranges its children.
    pub layout_type: LayoutType,
    /// Horizontal placement inside the parent's slot.
    pub horizontal_align: HorizontalAlignment,
    /// Vertical placement inside the parent's slot.
    pub vertical_align: VerticalAlignment,
    /// Space outside this element's box.
    pub margin: Thickness,
    /// Space inside this element's box, around its children.
    pub padding: Thickness,

    /// Stack main axis.
    pub stack_direction: StackDirection,
    /// Gap between stacked children.
    pub stack_spacing: f32,

    /// Column count used when `column_definitions` is empty.
    pub grid_columns: u32,
    /// Row count used when `row_definitions` is empty.
    pub grid_rows: u32,
    /// Gap between grid tracks.
    pub grid_spacing: f32,
    /// Row of this element inside a parent grid.
    pub grid_row: u32,
    /// Column of this element inside a parent grid.
    pub grid_column: u32,
    /// Rows spanned inside a parent grid.
    pub grid_row_span: u32,
    /// Columns spanned inside a parent grid.
    pub grid_column_span: u32,
    /// Explicit row sizes.
    pub row_definitions: Vec<GridUnit>,
    /// Explicit column sizes.
    pub column_definitions: Vec<GridUnit>,

    /// Flex main axis.
    pub flex_direction: FlexDirection,
    /// Flex main-axis distribution.
    pub justify_content: JustifyContent,
    /// Flex cross-axis placement.
    pub align_items: AlignItems,
    /// Flex line breaking.
    pub flex_wrap: FlexWrap,
    /// Flex gap between items and between lines.
    pub gap: f32,
    /// Sort key inside a parent flex container.
    pub order: i32,
    /// Share of positive free space.
    pub flex_grow: f32,
    /// Share of negative free space, weighted by basis.
    pub flex_shrink: f32,
    /// Main-axis starting size; `None` uses the declared size.
    pub flex_basis: Option<f32>,
    /// Cross-axis override.
    pub align_self: AlignSelf,
    /// Lower bound applied by flex sizing.
    pub min_size: Vec2,
    /// Upper bound applied by flex sizing.
    pub max_size: Vec2,

    /// Scissor descendants to this element's rectangle.
    pub clip_content: bool,
    /// Derive border width from the element's shorter side.
    pub proportional_borders: bool,
    /// Fraction of the shorter side used as border width.
    pub border_proportion: f32,
}

impl Default for LayoutProperties {
    fn default() -> Self {
        Self {
            layout_type: LayoutType::None,
            horizontal_align: HorizontalAlignment::Left,
            vertical_align: VerticalAlignment::Top,
            margin: Thickness::ZERO,
            padding: Thickness::ZERO,
            stack_direction: StackDirection::Vertical,
            stack_spacing: 0.0,
            grid_columns: 1,
            grid_rows: 1,
            grid_spacing: 0.0,
            grid_row: 0,
            grid_column: 0,
            grid_row_span: 1,
            grid_column_span: 1,
            row_definitions: Vec::new(),
            column_definitions: Vec::new(),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            flex_wrap: FlexWrap::Nowrap,
            gap: 0.0,
            order: 0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: None,
            align_self: AlignSelf::Auto,
            min_size: Vec2::ZERO,
            max_size: Vec2::splat(f32::INFINITY),
            clip_content: false,
            proportional_borders: false,
            border_proportion: 0.0,
        }
    }
}

impl LayoutProperties {
    /// Free-positioned container.
    #[must_use]
    pub fn absolute() -> Self {
        Self {
            layout_type: LayoutType::Absolute,
            ..Self::default()
        }
    }

    /// Stack container.
    #[must_use]
    pub fn stack(direction: StackDirection, spacing: f32) -> Self {
        Self {
            layout_type: LayoutType::Stack,
            stack_direction: direction,
            stack_spacing: spacing,
            ..Self::default()
        }
    }

    /// Grid container with explicit definitions.
    #[must_use]
    pub fn grid(columns: Vec<GridUnit>, rows: Vec<GridUnit>) -> Self {
        Self {
            layout_type: LayoutType::Grid,
            column_definitions: columns,
            row_definitions: rows,
            ..Self::default()
        }
    }

    /// Flex container.
    #[must_use]
    pub fn flex(direction: FlexDirection) -> Self {
        Self {
            layout_type: LayoutType::Flex,
            flex_direction: direction,
            ..Self::default()
        }
    }

    /// Sets both alignments.
    #[must_use]
    pub fn with_alignment(mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        self.horizontal_align = horizontal;
        self.vertical_align = vertical;
        self
    }

    /// Sets the margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Thickness) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Thickness) -> Self {
        self.padding = padding;
        self
    }

    /// Places this element in a grid cell.
    #[must_use]
    pub fn in_cell(mut self, row: u32, column: u32) -> Self {
        self.grid_row = row;
        self.grid_column = column;
        self
    }

    /// Sets grid spans.
    #[must_use]
    pub fn with_span(mut self, rows: u32, columns: u32) -> Self {
        self.grid_row_span = rows;
        self.grid_column_span = columns;
        self
    }

    /// Sets the flex grow/shrink factors.
    #[must_use]
    pub fn with_flex(mut self, grow: f32, shrink: f32) -> Self {
        self.flex_grow = grow;
        self.flex_shrink = shrink;
        self
    }
}
