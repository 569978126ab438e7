//! # End-to-End Scenarios
//!
//! Each test drives a full `UiContext` the way an application would:
//! 1. Absolute-layout clamp
//! 2. Hit test respects clipping
//! 3. Layout-dirty propagation
//! 4. Background-color mutation
//! 5. Grid star distribution
//! 6. Flex justify space-evenly
//!
//! Run with: cargo test --test scenarios

use lumen_ui::layout::{
    FlexDirection, GridUnit, HorizontalAlignment, JustifyContent, LayoutType, VerticalAlignment,
};
use lumen_ui::{
    Color, ElementRef, Grid, LayoutProperties, Panel, Thickness, UiConfig, UiContext, Vec2,
};

fn context() -> UiContext {
    UiContext::new(UiConfig::with_screen_size(1280.0, 720.0)).unwrap()
}

fn panel(position: Vec2, size: Vec2) -> ElementRef {
    let e = ElementRef::new(Panel::new());
    e.set_position(position);
    e.set_size(size);
    e
}

fn settle(ctx: &mut UiContext) {
    for _ in 0..4 {
        ctx.update(0.0);
        if !ctx.root().is_layout_dirty() {
            return;
        }
    }
    panic!("layout did not settle");
}

#[test]
fn absolute_layout_clamps_stretch_to_zero() {
    let mut ctx = context();
    let parent = panel(Vec2::ZERO, Vec2::new(100.0, 100.0));
    parent.set_layout_properties(LayoutProperties::absolute());
    let child = ElementRef::new(Panel::new());
    child.set_layout_properties(
        LayoutProperties::default()
            .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Stretch)
            .with_margin(Thickness::uniform(80.0)),
    );
    ctx.root().add_child(&parent).unwrap();
    parent.add_child(&child).unwrap();

    settle(&mut ctx);
    assert_eq!(child.computed_size(), Vec2::ZERO);
}

#[test]
fn hit_test_respects_clipping() {
    let mut ctx = context();
    let parent = panel(Vec2::ZERO, Vec2::new(100.0, 100.0));
    parent.update_layout(|l| l.clip_content = true);
    let child = panel(Vec2::new(110.0, 10.0), Vec2::new(50.0, 50.0));
    ctx.root().add_child(&parent).unwrap();
    parent.add_child(&child).unwrap();

    settle(&mut ctx);
    let hit = ctx.hit_test(Vec2::new(120.0, 20.0));
    assert_eq!(hit.as_ref(), Some(ctx.root()));
    assert!(!child.hit_test(Vec2::new(120.0, 20.0)));
}

#[test]
fn layout_dirty_propagates_and_clears() {
    let mut ctx = context();
    let outer = panel(Vec2::ZERO, Vec2::new(300.0, 300.0));
    outer.set_layout_properties(LayoutProperties::absolute());
    let inner = panel(Vec2::ZERO, Vec2::new(100.0, 100.0));
    ctx.root().add_child(&outer).unwrap();
    outer.add_child(&inner).unwrap();
    settle(&mut ctx);
    assert!(!ctx.root().is_layout_dirty());

    inner.update_layout(|l| l.horizontal_align = HorizontalAlignment::Center);
    assert!(ctx.root().is_layout_dirty());

    ctx.update(0.0);
    assert!(!ctx.root().is_layout_dirty());
    assert_eq!(inner.layout_rect().x, 100.0);
}

#[test]
fn background_color_mutation_is_render_only() {
    let mut ctx = context();
    let p = ctx.create_element("panel").unwrap();
    p.set_size(Vec2::new(10.0, 10.0));
    ctx.root().add_child(&p).unwrap();
    settle(&mut ctx);
    ctx.render();
    assert!(!p.is_dirty());

    p.set_background_color(Color::from_argb(0xFF12_3456));
    assert_eq!(p.render_color(), Color::from_argb(0xFF12_3456));
    assert!(p.is_dirty());
    assert!(!p.is_layout_dirty());
}

#[test]
fn grid_star_distribution() {
    let mut ctx = context();
    let grid = ElementRef::new(Grid::new(
        vec![GridUnit::Fixed(100.0), GridUnit::Star(1.0), GridUnit::Star(2.0)],
        vec![GridUnit::Star(1.0)],
    ));
    grid.set_size(Vec2::new(700.0, 100.0));
    let cells: Vec<ElementRef> = (0..3)
        .map(|column| {
            let cell = ElementRef::plain();
            cell.set_layout_properties(
                LayoutProperties::default()
                    .with_alignment(HorizontalAlignment::Stretch, VerticalAlignment::Stretch)
                    .in_cell(0, column),
            );
            grid.add_child(&cell).unwrap();
            cell
        })
        .collect();
    ctx.root().add_child(&grid).unwrap();
    settle(&mut ctx);

    let widths: Vec<f32> = cells.iter().map(|c| c.computed_size().x).collect();
    assert_eq!(widths, vec![100.0, 200.0, 400.0]);
    assert_eq!(widths.iter().sum::<f32>(), 700.0);
    assert_eq!(cells[2].layout_rect().x, 300.0);
}

#[test]
fn flex_justify_space_evenly() {
    let mut ctx = context();
    let row = ElementRef::plain();
    row.set_size(Vec2::new(700.0, 50.0));
    row.set_layout_properties(LayoutProperties::flex(FlexDirection::Row));
    row.update_layout(|l| {
        l.justify_content = JustifyContent::SpaceEvenly;
        l.gap = 0.0;
    });
    assert_eq!(row.core().layout().layout_type, LayoutType::Flex);
    let items: Vec<ElementRef> = (0..3)
        .map(|_| {
            let item = panel(Vec2::ZERO, Vec2::new(100.0, 50.0));
            row.add_child(&item).unwrap();
            item
        })
        .collect();
    ctx.root().add_child(&row).unwrap();
    settle(&mut ctx);

    let xs: Vec<f32> = items.iter().map(|i| i.layout_rect().x).collect();
    assert_eq!(xs, vec![100.0, 300.0, 500.0]);
}
