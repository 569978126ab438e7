//! Grid tracks resolved from fixed, auto and star units.

use super::{place_in_slot, Arrangement, GridUnit, LayoutItem, LayoutProperties, LayoutStrategy};
use crate::geometry::{sanitize_extent, Rect, Vec2};

/// Resolves track sizes along one axis for an available length `available`.
///
/// 1. Fixed units take their pixels; `R = available - fixed`.
/// 2. If `R <= 0`, every track gets an equal share of `available`.
/// 3. Auto units each take `R / auto_count`.
/// 4. Star units split what is left by weight; with a zero total weight
///    they split it evenly.
///
/// Flexible tracks are snapped to whole pixels left to right and the last
/// flexible track absorbs the residual, so the sum equals `available`
/// whenever any flexible track (or the fallback) is involved.
#[must_use]
pub fn resolve_tracks(defs: &[GridUnit], available: f32) -> Vec<f32> {
    if defs.is_empty() {
        return Vec::new();
    }
    let available = sanitize_extent(available);

    let fixed: f32 = defs
        .iter()
        .map(|d| match d {
            GridUnit::Fixed(px) => sanitize_extent(*px),
            _ => 0.0,
        })
        .sum();
    let remaining = available - fixed;

    if remaining <= 0.0 {
        let share = available / defs.len() as f32;
        return snap_with_residual(&vec![share; defs.len()], &vec![true; defs.len()], available);
    }

    let auto_count = defs.iter().filter(|d| matches!(d, GridUnit::Auto)).count();
    let star_count = defs.iter().filter(|d| matches!(d, GridUnit::Star(_))).count();
    let star_weight: f32 = defs
        .iter()
        .map(|d| match d {
            GridUnit::Star(w) => sanitize_extent(*w),
            _ => 0.0,
        })
        .sum();

    let auto_share = if auto_count > 0 { remaining / auto_count as f32 } else { 0.0 };
    let after_auto = sanitize_extent(remaining - auto_share * auto_count as f32);

    let exact: Vec<f32> = defs
        .iter()
        .map(|d| match d {
            GridUnit::Fixed(px) => sanitize_extent(*px),
            GridUnit::Auto => auto_share,
            GridUnit::Star(w) if star_weight > 0.0 => sanitize_extent(*w) / star_weight * after_auto,
            GridUnit::Star(_) => after_auto / star_count as f32,
        })
        .collect();
    let flexible: Vec<bool> = defs.iter().map(|d| !matches!(d, GridUnit::Fixed(_))).collect();

    if flexible.iter().any(|f| *f) {
        snap_with_residual(&exact, &flexible, available)
    } else {
        exact
    }
}

/// Floors flexible sizes except the last flexible one, which receives
/// `total - sum(others)`.
fn snap_with_residual(exact: &[f32], flexible: &[bool], total: f32) -> Vec<f32> {
    let last_flexible = flexible.iter().rposition(|f| *f);
    let mut sizes: Vec<f32> = exact
        .iter()
        .zip(flexible)
        .map(|(size, flex)| if *flex { size.floor() } else { *size })
        .collect();

    if let Some(last) = last_flexible {
        let others: f32 = sizes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != last)
            .map(|(_, s)| *s)
            .sum();
        sizes[last] = sanitize_extent(total - others);
    }
    sizes
}

/// Grid strategy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLayout {
    /// Column definitions.
    pub columns: Vec<GridUnit>,
    /// Row definitions.
    pub rows: Vec<GridUnit>,
    /// Gap between tracks.
    pub spacing: f32,
}

impl GridLayout {
    /// Creates a grid with explicit definitions.
    #[must_use]
    pub fn new(columns: Vec<GridUnit>, rows: Vec<GridUnit>, spacing: f32) -> Self {
        Self { columns, rows, spacing }
    }

    /// Builds the strategy from container properties. Missing definitions
    /// become `grid_columns` / `grid_rows` equal star tracks.
    #[must_use]
    pub fn from_props(props: &LayoutProperties) -> Self {
        let defaults = |count: u32| vec![GridUnit::Star(1.0); count.max(1) as usize];
        Self {
            columns: if props.column_definitions.is_empty() {
                defaults(props.grid_columns)
            } else {
                props.column_definitions.clone()
            },
            rows: if props.row_definitions.is_empty() {
                defaults(props.grid_rows)
            } else {
                props.row_definitions.clone()
            },
            spacing: props.grid_spacing,
        }
    }

    fn tracks(defs: &[GridUnit], length: f32, spacing: f32) -> (Vec<f32>, Vec<f32>) {
        if defs.is_empty() {
            return (vec![length], vec![0.0]);
        }
        let gaps = spacing * defs.len().saturating_sub(1) as f32;
        let sizes = resolve_tracks(defs, length - gaps);
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut cursor = 0.0;
        for size in &sizes {
            offsets.push(cursor);
            cursor += size + spacing;
        }
        (sizes, offsets)
    }

    fn span(sizes: &[f32], offsets: &[f32], start: u32, span: u32, spacing: f32) -> (f32, f32) {
        let start = (start as usize).min(sizes.len() - 1);
        let span = (span.max(1) as usize).min(sizes.len() - start);
        let length: f32 = sizes[start..start + span].iter().sum::<f32>() + spacing * (span - 1) as f32;
        (offsets[start], length)
    }
}

impl LayoutStrategy for GridLayout {
    fn arrange(&self, content: Rect, items: &[LayoutItem]) -> Arrangement {
        let spacing = sanitize_extent(self.spacing);
        let (col_sizes, col_offsets) = Self::tracks(&self.columns, content.width, spacing);
        let (row_sizes, row_offsets) = Self::tracks(&self.rows, content.height, spacing);

        let rects = items
            .iter()
            .map(|item| {
                if !item.visible {
                    return item.hidden_rect();
                }
                let (x, width) = Self::span(&col_sizes, &col_offsets, item.grid_column, item.grid_column_span, spacing);
                let (y, height) = Self::span(&row_sizes, &row_offsets, item.grid_row, item.grid_row_span, spacing);
                let cell = Rect::new(content.x + x, content.y + y, width, height);
                place_in_slot(cell, item)
            })
            .collect();

        let total = |sizes: &[f32]| sizes.iter().sum::<f32>() + spacing * sizes.len().saturating_sub(1) as f32;
        Arrangement {
            rects,
            extent: Vec2::new(total(&col_sizes), total(&row_sizes)),
        }
    }
}
