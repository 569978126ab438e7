//! Sequential stacking along one axis.

use super::{place_on_axis, Arrangement, LayoutItem, LayoutStrategy, StackDirection};
use crate::geometry::{sanitize_extent, Rect, Vec2};

/// Stack strategy.
///
/// Measure: each visible child's main-axis extent is its natural size plus
/// main-axis margins. Arrange: children are placed back to back from the
/// padded origin with `spacing` between them; the cross axis honors each
/// child's own alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLayout {
    /// Main axis.
    pub direction: StackDirection,
    /// Gap between consecutive visible children.
    pub spacing: f32,
}

impl StackLayout {
    /// Creates a horizontal stack.
    #[must_use]
    pub fn horizontal(spacing: f32) -> Self {
        Self {
            direction: StackDirection::Horizontal,
            spacing,
        }
    }

    /// Creates a vertical stack.
    #[must_use]
    pub fn vertical(spacing: f32) -> Self {
        Self {
            direction: StackDirection::Vertical,
            spacing,
        }
    }

    /// Main-axis extents of visible items (measure phase).
    #[must_use]
    pub fn measure(&self, items: &[LayoutItem]) -> Vec<f32> {
        items
            .iter()
            .filter(|item| item.visible)
            .map(|item| match self.direction {
                StackDirection::Horizontal => item.size.x + item.margin.horizontal(),
                StackDirection::Vertical => item.size.y + item.margin.vertical(),
            })
            .map(sanitize_extent)
            .collect()
    }

    /// Natural size of the whole stack, excluding the container's padding.
    #[must_use]
    pub fn desired_size(&self, items: &[LayoutItem]) -> Vec2 {
        let main: f32 = self.measure(items).iter().sum();
        let count = items.iter().filter(|i| i.visible).count();
        let gaps = sanitize_extent(self.spacing) * count.saturating_sub(1) as f32;
        let cross = items
            .iter()
            .filter(|item| item.visible)
            .map(|item| match self.direction {
                StackDirection::Horizontal => item.size.y + item.margin.vertical(),
                StackDirection::Vertical => item.size.x + item.margin.horizontal(),
            })
            .fold(0.0_f32, f32::max);

        match self.direction {
            StackDirection::Horizontal => Vec2::new(main + gaps, cross),
            StackDirection::Vertical => Vec2::new(cross, main + gaps),
        }
    }
}

impl LayoutStrategy for StackLayout {
    fn arrange(&self, content: Rect, items: &[LayoutItem]) -> Arrangement {
        let spacing = sanitize_extent(self.spacing);
        let mut rects = Vec::with_capacity(items.len());
        let mut cursor = 0.0_f32;
        let mut cross_extent = 0.0_f32;
        let mut placed = 0usize;

        for item in items {
            if !item.visible {
                rects.push(item.hidden_rect());
                continue;
            }
            if placed > 0 {
                cursor += spacing;
            }
            placed += 1;

            let rect = match self.direction {
                StackDirection::Horizontal => {
                    let x = content.x + cursor + item.margin.left;
                    let (y, height) = place_on_axis(
                        item.vertical_align.into(),
                        content.y,
                        content.height,
                        item.size.y,
                        item.margin.top,
                        item.margin.bottom,
                    );
                    cursor += item.margin.left + item.size.x + item.margin.right;
                    cross_extent = cross_extent.max(height + item.margin.vertical());
                    Rect::new(x, y, item.size.x, height)
                }
                StackDirection::Vertical => {
                    let y = content.y + cursor + item.margin.top;
                    let (x, width) = place_on_axis(
                        item.horizontal_align.into(),
                        content.x,
                        content.width,
                        item.size.x,
                        item.margin.left,
                        item.margin.right,
                    );
                    cursor += item.margin.top + item.size.y + item.margin.bottom;
                    cross_extent = cross_extent.max(width + item.margin.horizontal());
                    Rect::new(x, y, width, item.size.y)
                }
            };
            rects.push(rect);
        }

        let extent = match self.direction {
            StackDirection::Horizontal => Vec2::new(cursor, cross_extent),
            StackDirection::Vertical => Vec2::new(cross_extent, cursor),
        };
        Arrangement { rects, extent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Thickness;
    use crate::layout::{HorizontalAlignment, VerticalAlignment};

    #[test]
    fn test_layout_horizontal() {
        let layout = StackLayout::horizontal(10.0);
        let bounds = Rect::new(0.0, 0.0, 200.0, 50.0);
        let items = [
            LayoutItem::new(Vec2::new(30.0, 20.0)),
            LayoutItem::new(Vec2::new(40.0, 20.0)),
            LayoutItem::new(Vec2::new(30.0, 20.0)),
        ];

        let result = layout.arrange(bounds, &items);

        assert_eq!(result.rects.len(), 3);
        assert_eq!(result.rects[0].x, 0.0);
        assert_eq!(result.rects[1].x, 40.0); // 30 + 10 gap
        assert_eq!(result.rects[2].x, 90.0); // 40 + 40 + 10 gap
        assert_eq!(result.extent.x, 120.0);
    }

    #[test]
    fn test_consumed_length_matches_measure() {
        let layout = StackLayout::vertical(4.0);
        let items = [
            LayoutItem::new(Vec2::new(10.0, 20.0)).with_margin(Thickness::new(0.0, 2.0, 0.0, 3.0)),
            LayoutItem::new(Vec2::new(10.0, 15.0)),
            LayoutItem::new(Vec2::new(10.0, 5.0)).with_margin(Thickness::uniform(1.0)),
        ];
        let result = layout.arrange(Rect::new(5.0, 5.0, 100.0, 100.0), &items);

        let measured: f32 = layout.measure(&items).iter().sum::<f32>() + 4.0 * 2.0;
        assert_eq!(result.extent.y, measured);
        let last = result.rects[2];
        assert_eq!(last.bottom() + 1.0 - 5.0, measured);
    }

    #[test]
    fn test_cross_axis_stretch_minus_margins() {
        let layout = StackLayout::vertical(0.0);
        let item = LayoutItem::new(Vec2::new(10.0, 10.0))
            .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Top)
            .with_margin(Thickness::new(5.0, 0.0, 15.0, 0.0));
        let result = layout.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &[item]);
        assert_eq!(result.rects[0], Rect::new(5.0, 0.0, 80.0, 10.0));
    }

    #[test]
    fn test_hidden_children_take_no_space() {
        let layout = StackLayout::vertical(10.0);
        let mut hidden = LayoutItem::new(Vec2::new(10.0, 50.0));
        hidden.visible = false;
        let items = [LayoutItem::new(Vec2::new(10.0, 10.0)), hidden, LayoutItem::new(Vec2::new(10.0, 10.0))];
        let result = layout.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &items);
        assert_eq!(result.rects[2].y, 20.0);
    }
}
