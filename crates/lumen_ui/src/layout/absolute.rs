//! Free positioning with alignment and margin clamping.

use super::{place_in_slot, Arrangement, LayoutItem, LayoutStrategy};
use crate::geometry::{Rect, Vec2};

/// Children keep their declared position and size; alignment picks the
/// anchor inside the content rectangle and the declared position is added
/// as an offset from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLayout;

impl LayoutStrategy for AbsoluteLayout {
    fn arrange(&self, content: Rect, items: &[LayoutItem]) -> Arrangement {
        let mut extent = Vec2::ZERO;
        let rects = items
            .iter()
            .map(|item| {
                if !item.visible {
                    return item.hidden_rect();
                }
                let rect = place_in_slot(content, item).translate(item.position);
                extent = extent.max(Vec2::new(
                    rect.right() + item.margin.right - content.x,
                    rect.bottom() + item.margin.bottom - content.y,
                ));
                rect
            })
            .collect();

        Arrangement { rects, extent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Thickness;
    use crate::layout::{HorizontalAlignment, VerticalAlignment};

    #[test]
    fn test_position_is_offset() {
        let item = LayoutItem {
            position: Vec2::new(15.0, 25.0),
            ..LayoutItem::new(Vec2::new(10.0, 10.0))
        };
        let result = AbsoluteLayout.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &[item]);
        assert_eq!(result.rects[0], Rect::new(15.0, 25.0, 10.0, 10.0));
    }

    #[test]
    fn test_margins_exceeding_space_clamp() {
        let item = LayoutItem::new(Vec2::new(30.0, 30.0))
            .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Stretch)
            .with_margin(Thickness::uniform(80.0));
        let result = AbsoluteLayout.arrange(Rect::new(0.0, 0.0, 100.0, 100.0), &[item]);
        assert_eq!(result.rects[0].size(), Vec2::ZERO);
    }

    #[test]
    fn test_right_bottom_anchor() {
        let item = LayoutItem::new(Vec2::new(20.0, 10.0))
            .with_alignment(HorizontalAlignment::Right, VerticalAlignment::Bottom)
            .with_margin(Thickness::uniform(5.0));
        let result = AbsoluteLayout.arrange(Rect::new(0.0, 0.0, 100.0, 50.0), &[item]);
        assert_eq!(result.rects[0], Rect::new(75.0, 35.0, 20.0, 10.0));
    }
}
