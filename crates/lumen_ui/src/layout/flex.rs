//! CSS-flexbox subset.

use super::{
    place_on_axis, AlignItems, Arrangement, AxisAlignment, FlexDirection, FlexWrap, JustifyContent,
    LayoutItem, LayoutProperties, LayoutStrategy,
};
use crate::geometry::{sanitize_extent, Rect, Vec2};

/// Flex strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexLayout {
    /// Main axis and its orientation.
    pub direction: FlexDirection,
    /// Main-axis distribution.
    pub justify_content: JustifyContent,
    /// Default cross-axis placement.
    pub align_items: AlignItems,
    /// Line breaking.
    pub wrap: FlexWrap,
    /// Gap between items and between lines.
    pub gap: f32,
}

/// Working state of one item during sizing.
#[derive(Debug, Clone, Copy)]
struct FlexEntry {
    index: usize,
    basis: f32,
    target: f32,
    min: f32,
    max: f32,
    grow: f32,
    shrink: f32,
    margin_main: (f32, f32),
    margin_cross: (f32, f32),
    cross: f32,
    frozen: bool,
}

impl FlexEntry {
    fn outer_basis(&self) -> f32 {
        self.basis + self.margin_main.0 + self.margin_main.1
    }

    fn outer_target(&self) -> f32 {
        self.target + self.margin_main.0 + self.margin_main.1
    }
}

impl FlexLayout {
    /// Creates a row container with defaults elsewhere.
    #[must_use]
    pub fn row() -> Self {
        Self::default()
    }

    /// Builds the strategy from container properties.
    #[must_use]
    pub fn from_props(props: &LayoutProperties) -> Self {
        Self {
            direction: props.flex_direction,
            justify_content: props.justify_content,
            align_items: props.align_items,
            wrap: props.flex_wrap,
            gap: props.gap,
        }
    }

    /// Builder: sets `justify_content`.
    #[must_use]
    pub fn justify(mut self, justify: JustifyContent) -> Self {
        self.justify_content = justify;
        self
    }

    /// Builder: sets the wrap mode.
    #[must_use]
    pub fn wrapping(mut self, wrap: FlexWrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder: sets the gap.
    #[must_use]
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Natural size of a single unwrapped line, excluding padding.
    #[must_use]
    pub fn desired_size(&self, items: &[LayoutItem]) -> Vec2 {
        let entries = self.entries(items);
        let gap = sanitize_extent(self.gap);
        let main = entries.iter().map(FlexEntry::outer_basis).sum::<f32>()
            + gap * entries.len().saturating_sub(1) as f32;
        let cross = entries
            .iter()
            .map(|e| e.cross + e.margin_cross.0 + e.margin_cross.1)
            .fold(0.0_f32, f32::max);
        if self.direction.is_row() {
            Vec2::new(main, cross)
        } else {
            Vec2::new(cross, main)
        }
    }

    fn entries(&self, items: &[LayoutItem]) -> Vec<FlexEntry> {
        let row = self.direction.is_row();
        let reverse = self.direction.is_reverse();
        let mut order: Vec<usize> = (0..items.len()).filter(|&i| items[i].visible).collect();
        order.sort_by_key(|&i| items[i].order);

        order
            .into_iter()
            .map(|index| {
                let item = &items[index];
                let (natural_main, natural_cross) = if row {
                    (item.size.x, item.size.y)
                } else {
                    (item.size.y, item.size.x)
                };
                let (min, max) = if row {
                    (item.min_size.x, item.max_size.x)
                } else {
                    (item.min_size.y, item.max_size.y)
                };
                let max = max.max(min);
                let (m_start, m_end, c_start, c_end) = if row {
                    (item.margin.left, item.margin.right, item.margin.top, item.margin.bottom)
                } else {
                    (item.margin.top, item.margin.bottom, item.margin.left, item.margin.right)
                };
                let margin_main = if reverse { (m_end, m_start) } else { (m_start, m_end) };
                let basis = item.flex_basis.unwrap_or(natural_main).clamp(min, max);
                FlexEntry {
                    index,
                    basis,
                    target: basis,
                    min,
                    max,
                    grow: item.flex_grow,
                    shrink: item.flex_shrink,
                    margin_main,
                    margin_cross: (c_start, c_end),
                    cross: natural_cross,
                    frozen: false,
                }
            })
            .collect()
    }

    fn break_lines(&self, entries: &[FlexEntry], main_len: f32, gap: f32) -> Vec<std::ops::Range<usize>> {
        if entries.is_empty() {
            return Vec::new();
        }
        if self.wrap == FlexWrap::Nowrap {
            return vec![0..entries.len()];
        }
        let mut lines = Vec::new();
        let mut start = 0;
        let mut used = 0.0_f32;
        for (i, entry) in entries.iter().enumerate() {
            let outer = entry.outer_basis();
            if i > start && used + gap + outer > main_len {
                lines.push(start..i);
                start = i;
                used = outer;
            } else {
                used += if i > start { gap + outer } else { outer };
            }
        }
        lines.push(start..entries.len());
        lines
    }

    /// Grows or shrinks a line in place, freezing items that hit their
    /// min/max bounds and redistributing the rest.
    fn resolve_line(line: &mut [FlexEntry], main_len: f32, gap: f32) {
        let gaps = gap * line.len().saturating_sub(1) as f32;
        let initial_free = main_len - gaps - line.iter().map(FlexEntry::outer_basis).sum::<f32>();
        let growing = initial_free > 0.0;
        if initial_free == 0.0 {
            return;
        }

        for _ in 0..=line.len() {
            let frozen_used: f32 = line.iter().filter(|e| e.frozen).map(FlexEntry::outer_target).sum();
            let unfrozen_used: f32 = line.iter().filter(|e| !e.frozen).map(FlexEntry::outer_basis).sum();
            let free = main_len - gaps - frozen_used - unfrozen_used;

            let total: f32 = line
                .iter()
                .filter(|e| !e.frozen)
                .map(|e| if growing { e.grow } else { e.shrink * e.basis })
                .sum();
            if total <= 0.0 {
                break;
            }

            let mut violated = false;
            for entry in line.iter_mut().filter(|e| !e.frozen) {
                let weight = if growing { entry.grow } else { entry.shrink * entry.basis };
                let target = entry.basis + free * weight / total;
                let clamped = sanitize_extent(target.clamp(entry.min, entry.max));
                entry.target = clamped;
                if (clamped - target).abs() > f32::EPSILON {
                    entry.frozen = true;
                    violated = true;
                }
            }
            if !violated {
                break;
            }
        }
    }

    fn justify_offsets(&self, free: f32, count: usize) -> (f32, f32) {
        let positive = free.max(0.0);
        let n = count as f32;
        match self.justify_content {
            JustifyContent::FlexStart => (0.0, 0.0),
            JustifyContent::FlexEnd => (free, 0.0),
            JustifyContent::Center => (free * 0.5, 0.0),
            JustifyContent::SpaceBetween if count > 1 => (0.0, positive / (n - 1.0)),
            JustifyContent::SpaceBetween => (0.0, 0.0),
            JustifyContent::SpaceAround => (positive / n * 0.5, positive / n),
            JustifyContent::SpaceEvenly => (positive / (n + 1.0), positive / (n + 1.0)),
        }
    }
}

impl LayoutStrategy for FlexLayout {
    fn arrange(&self, content: Rect, items: &[LayoutItem]) -> Arrangement {
        let row = self.direction.is_row();
        let reverse = self.direction.is_reverse();
        let (main_len, cross_len) = if row {
            (content.width, content.height)
        } else {
            (content.height, content.width)
        };
        let gap = sanitize_extent(self.gap);

        let mut rects: Vec<Rect> = items.iter().map(LayoutItem::hidden_rect).collect();
        let mut entries = self.entries(items);
        let lines = self.break_lines(&entries, main_len, gap);

        for range in &lines {
            Self::resolve_line(&mut entries[range.clone()], main_len, gap);
        }

        let line_cross: Vec<f32> = if self.wrap == FlexWrap::Nowrap {
            lines.iter().map(|_| cross_len).collect()
        } else {
            lines
                .iter()
                .map(|range| {
                    entries[range.clone()]
                        .iter()
                        .map(|e| e.cross + e.margin_cross.0 + e.margin_cross.1)
                        .fold(0.0_f32, f32::max)
                })
                .collect()
        };

        let mut cross_cursor = 0.0_f32;
        let mut main_extent = 0.0_f32;
        for (line_index, range) in lines.iter().enumerate() {
            let line = &entries[range.clone()];
            let this_cross = line_cross[line_index];
            let line_start = if self.wrap == FlexWrap::WrapReverse {
                cross_len - cross_cursor - this_cross
            } else {
                cross_cursor
            };

            let used: f32 = line.iter().map(FlexEntry::outer_target).sum::<f32>()
                + gap * line.len().saturating_sub(1) as f32;
            main_extent = main_extent.max(used);
            let (leading, between) = self.justify_offsets(main_len - used, line.len());

            let mut cursor = leading;
            for entry in line {
                let logical = cursor + entry.margin_main.0;
                cursor = logical + entry.target + entry.margin_main.1 + gap + between;
                let main_pos = if reverse {
                    main_len - logical - entry.target
                } else {
                    logical
                };

                let align = match items[entry.index].align_self.resolve(self.align_items) {
                    AlignItems::FlexStart => AxisAlignment::Start,
                    AlignItems::FlexEnd => AxisAlignment::End,
                    AlignItems::Center => AxisAlignment::Center,
                    AlignItems::Stretch => AxisAlignment::Stretch,
                };
                let (cross_pos, cross_size) = place_on_axis(
                    align,
                    line_start,
                    this_cross,
                    entry.cross,
                    entry.margin_cross.0,
                    entry.margin_cross.1,
                );

                rects[entry.index] = if row {
                    Rect::new(content.x + main_pos, content.y + cross_pos, entry.target, cross_size)
                } else {
                    Rect::new(content.x + cross_pos, content.y + main_pos, cross_size, entry.target)
                };
            }

            cross_cursor += this_cross + gap;
        }

        let cross_extent = sanitize_extent(cross_cursor - gap);
        let extent = if row {
            Vec2::new(main_extent, cross_extent)
        } else {
            Vec2::new(cross_extent, main_extent)
        };
        Arrangement { rects, extent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Thickness;
    use crate::layout::AlignSelf;

    fn items(widths: &[f32]) -> Vec<LayoutItem> {
        widths.iter().map(|w| LayoutItem::new(Vec2::new(*w, 20.0))).collect()
    }

    #[test]
    fn test_space_evenly() {
        let flex = FlexLayout::row().justify(JustifyContent::SpaceEvenly);
        let result = flex.arrange(Rect::new(0.0, 0.0, 700.0, 50.0), &items(&[100.0, 100.0, 100.0]));
        let xs: Vec<f32> = result.rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![100.0, 300.0, 500.0]);
    }

    #[test]
    fn test_space_between_and_around() {
        let between = FlexLayout::row().justify(JustifyContent::SpaceBetween);
        let result = between.arrange(Rect::new(0.0, 0.0, 300.0, 50.0), &items(&[50.0, 50.0]));
        assert_eq!(result.rects[1].x, 250.0);

        let around = FlexLayout::row().justify(JustifyContent::SpaceAround);
        let result = around.arrange(Rect::new(0.0, 0.0, 300.0, 50.0), &items(&[50.0, 50.0]));
        assert_eq!(result.rects[0].x, 50.0);
        assert_eq!(result.rects[1].x, 200.0);
    }

    #[test]
    fn test_grow_distributes_free_space() {
        let mut list = items(&[100.0, 100.0]);
        list[0].flex_grow = 1.0;
        list[1].flex_grow = 3.0;
        let result = FlexLayout::row().arrange(Rect::new(0.0, 0.0, 600.0, 50.0), &list);
        assert_eq!(result.rects[0].width, 200.0);
        assert_eq!(result.rects[1].width, 400.0);
        assert_eq!(result.rects[1].x, 200.0);
    }

    #[test]
    fn test_shrink_never_negative() {
        let mut list = items(&[100.0, 100.0]);
        list[0].flex_shrink = 10.0;
        list[1].flex_shrink = 0.0;
        let result = FlexLayout::row().arrange(Rect::new(0.0, 0.0, 50.0, 50.0), &list);
        assert!(result.rects[0].width >= 0.0);
        assert_eq!(result.rects[1].width, 100.0);
    }

    #[test]
    fn test_shrink_respects_min_size() {
        let mut list = items(&[100.0, 100.0]);
        list[0].min_size = Vec2::new(80.0, 0.0);
        let result = FlexLayout::row().arrange(Rect::new(0.0, 0.0, 100.0, 50.0), &list);
        assert_eq!(result.rects[0].width, 80.0);
        assert!((result.rects[1].width - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_gap_consumes_main_axis_before_grow() {
        let mut list = items(&[0.0, 0.0]);
        list[0].flex_grow = 1.0;
        list[1].flex_grow = 1.0;
        let flex = FlexLayout::row().with_gap(20.0);
        let result = flex.arrange(Rect::new(0.0, 0.0, 220.0, 50.0), &list);
        assert_eq!(result.rects[0].width, 100.0);
        assert_eq!(result.rects[1].x, 120.0);
    }

    #[test]
    fn test_order_and_wrap() {
        let mut list = items(&[60.0, 60.0, 60.0]);
        list[0].order = 2;
        let flex = FlexLayout::row().wrapping(FlexWrap::Wrap);
        let result = flex.arrange(Rect::new(0.0, 0.0, 130.0, 100.0), &list);

        // Item 0 sorts last and wraps onto the second line.
        assert_eq!(result.rects[1].x, 0.0);
        assert_eq!(result.rects[2].x, 60.0);
        assert_eq!(result.rects[0].x, 0.0);
        assert_eq!(result.rects[0].y, 20.0);
        assert_eq!(result.extent.y, 40.0);
    }

    #[test]
    fn test_row_reverse() {
        let flex = FlexLayout {
            direction: FlexDirection::RowReverse,
            ..FlexLayout::row()
        };
        let result = flex.arrange(Rect::new(0.0, 0.0, 200.0, 50.0), &items(&[50.0, 30.0]));
        assert_eq!(result.rects[0].x, 150.0);
        assert_eq!(result.rects[1].x, 120.0);
    }

    #[test]
    fn test_align_self_overrides_stretch() {
        let mut list = items(&[50.0, 50.0]);
        list[1].align_self = AlignSelf::Center;
        list[0].margin = Thickness::new(0.0, 5.0, 0.0, 5.0);
        let result = FlexLayout::row().arrange(Rect::new(0.0, 0.0, 200.0, 100.0), &list);
        assert_eq!(result.rects[0].y, 5.0);
        assert_eq!(result.rects[0].height, 90.0);
        assert_eq!(result.rects[1].y, 40.0);
        assert_eq!(result.rects[1].height, 20.0);
    }

    #[test]
    fn test_column_direction() {
        let flex = FlexLayout {
            direction: FlexDirection::Column,
            align_items: AlignItems::FlexStart,
            ..FlexLayout::row()
        };
        let result = flex.arrange(Rect::new(10.0, 10.0, 100.0, 200.0), &items(&[30.0, 40.0]));
        assert_eq!(result.rects[0], Rect::new(10.0, 10.0, 30.0, 20.0));
        assert_eq!(result.rects[1], Rect::new(10.0, 30.0, 40.0, 20.0));
    }

    #[test]
    fn test_column_reverse_mirrors_main_axis_and_margins() {
        let flex = FlexLayout {
            direction: FlexDirection::ColumnReverse,
            align_items: AlignItems::FlexStart,
            ..FlexLayout::row()
        };
        let mut list = items(&[30.0, 40.0]);
        list[0].margin = Thickness::new(0.0, 4.0, 0.0, 6.0);
        let result = flex.arrange(Rect::new(0.0, 0.0, 100.0, 200.0), &list);

        // The bottom margin leads when the column runs upward.
        assert_eq!(result.rects[0], Rect::new(0.0, 174.0, 30.0, 20.0));
        assert_eq!(result.rects[1], Rect::new(0.0, 150.0, 40.0, 20.0));
        assert_eq!(result.extent, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_row_reverse_swaps_horizontal_margins() {
        let flex = FlexLayout {
            direction: FlexDirection::RowReverse,
            ..FlexLayout::row()
        };
        let mut list = items(&[50.0, 30.0]);
        list[0].margin = Thickness::new(5.0, 0.0, 10.0, 0.0);
        let result = flex.arrange(Rect::new(0.0, 0.0, 200.0, 50.0), &list);
        assert_eq!(result.rects[0].x, 140.0);
        assert_eq!(result.rects[1].x, 105.0);
    }

    #[test]
    fn test_wrap_reverse_stacks_lines_from_cross_end() {
        let flex = FlexLayout {
            align_items: AlignItems::FlexStart,
            ..FlexLayout::row().wrapping(FlexWrap::WrapReverse)
        };
        let mut list = items(&[60.0, 60.0, 60.0]);
        list[2].margin = Thickness::new(0.0, 3.0, 0.0, 2.0);
        let result = flex.arrange(Rect::new(0.0, 0.0, 130.0, 100.0), &list);

        assert_eq!(result.rects[0], Rect::new(0.0, 80.0, 60.0, 20.0));
        assert_eq!(result.rects[1], Rect::new(60.0, 80.0, 60.0, 20.0));
        // Second line is 25 tall including margins and sits above the first.
        assert_eq!(result.rects[2], Rect::new(0.0, 58.0, 60.0, 20.0));
        assert_eq!(result.extent.y, 45.0);
    }
}
