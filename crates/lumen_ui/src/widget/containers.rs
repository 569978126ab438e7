//! Layout-only containers.

use std::any::Any;

use super::Widget;
use crate::element::ElementCore;
use crate::layout::{GridUnit, LayoutType, StackDirection};

/// Stacks its children along one axis.
///
/// Draws its color like a plain element (transparent unless set). The
/// constructor values seed the element's layout on attach; afterwards the
/// layout properties are the only copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPanel {
    direction: StackDirection,
    spacing: f32,
}

impl StackPanel {
    /// Stack with the given axis and gap.
    #[must_use]
    pub fn new(direction: StackDirection, spacing: f32) -> Self {
        Self { direction, spacing }
    }

    /// Vertical stack.
    #[must_use]
    pub fn vertical(spacing: f32) -> Self {
        Self::new(StackDirection::Vertical, spacing)
    }

    /// Horizontal stack.
    #[must_use]
    pub fn horizontal(spacing: f32) -> Self {
        Self::new(StackDirection::Horizontal, spacing)
    }

    /// Main axis.
    #[must_use]
    pub fn direction(core: &ElementCore) -> StackDirection {
        core.layout().stack_direction
    }

    /// Gap between children.
    #[must_use]
    pub fn spacing(core: &ElementCore) -> f32 {
        core.layout().stack_spacing
    }

    /// Changes the main axis.
    pub fn set_direction(core: &mut ElementCore, direction: StackDirection) {
        core.update_layout(|l| l.stack_direction = direction);
    }

    /// Changes the gap between children.
    pub fn set_spacing(core: &mut ElementCore, spacing: f32) {
        core.update_layout(|l| l.stack_spacing = spacing);
    }
}

impl Default for StackPanel {
    fn default() -> Self {
        Self::vertical(0.0)
    }
}

impl Widget for StackPanel {
    fn kind(&self) -> &'static str {
        "stackpanel"
    }

    fn init(&mut self, core: &mut ElementCore) {
        let (direction, spacing) = (self.direction, self.spacing);
        core.update_layout(|l| {
            l.layout_type = LayoutType::Stack;
            l.stack_direction = direction;
            l.stack_spacing = spacing;
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Places children in cells resolved from row and column definitions.
///
/// Like [`StackPanel`], the definitions live in the element's layout
/// properties once attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    columns: Vec<GridUnit>,
    rows: Vec<GridUnit>,
    spacing: f32,
}

impl Grid {
    /// Grid with explicit definitions. Empty lists mean one star track.
    #[must_use]
    pub fn new(columns: Vec<GridUnit>, rows: Vec<GridUnit>) -> Self {
        Self {
            columns,
            rows,
            spacing: 0.0,
        }
    }

    /// Builder: sets the gap between tracks.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Column definitions.
    #[must_use]
    pub fn columns(core: &ElementCore) -> &[GridUnit] {
        &core.layout().column_definitions
    }

    /// Row definitions.
    #[must_use]
    pub fn rows(core: &ElementCore) -> &[GridUnit] {
        &core.layout().row_definitions
    }

    /// Gap between tracks.
    #[must_use]
    pub fn spacing(core: &ElementCore) -> f32 {
        core.layout().grid_spacing
    }

    /// Replaces the column definitions.
    pub fn set_columns(core: &mut ElementCore, columns: Vec<GridUnit>) {
        core.update_layout(|l| {
            l.grid_columns = columns.len().max(1) as u32;
            l.column_definitions = columns;
        });
    }

    /// Replaces the row definitions.
    pub fn set_rows(core: &mut ElementCore, rows: Vec<GridUnit>) {
        core.update_layout(|l| {
            l.grid_rows = rows.len().max(1) as u32;
            l.row_definitions = rows;
        });
    }

    /// Changes the gap between tracks.
    pub fn set_spacing(core: &mut ElementCore, spacing: f32) {
        core.update_layout(|l| l.grid_spacing = spacing);
    }
}

impl Widget for Grid {
    fn kind(&self) -> &'static str {
        "grid"
    }

    fn init(&mut self, core: &mut ElementCore) {
        let spacing = self.spacing;
        let columns = std::mem::take(&mut self.columns);
        let rows = std::mem::take(&mut self.rows);
        core.update_layout(|l| {
            l.layout_type = LayoutType::Grid;
            l.grid_spacing = spacing;
        });
        Self::set_columns(core, columns);
        Self::set_rows(core, rows);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
