//! # Frame Pipeline
//!
//! Drives complete frames through `UiContext` into a recording backend:
//! input routing, widget state, batching, ring-slot fencing.
//!
//! Run with: cargo test --test frame_pipeline

use std::cell::Cell;
use std::rc::Rc;

use lumen_ui::layout::StackDirection;
use lumen_ui::render::testing::RecordingBackend;
use lumen_ui::{
    Button, ButtonState, ElementRef, Label, MouseButton, MouseEventKind, Panel, PointerEvent,
    StackPanel, UiConfig, UiContext, Vec2,
};

fn context(config: UiConfig) -> UiContext {
    UiContext::new(config).unwrap()
}

#[test]
fn clicking_a_button_updates_state_and_publishes() {
    let mut ctx = context(UiConfig::with_screen_size(400.0, 300.0));
    let button = ElementRef::new(Button::new("Save"));
    button.set_position(Vec2::new(20.0, 20.0));
    button.set_size(Vec2::new(100.0, 30.0));
    ctx.root().add_child(&button).unwrap();
    ctx.update(0.0);

    let clicks = Rc::new(Cell::new(0));
    let seen = Rc::clone(&clicks);
    let target = button.id();
    ctx.events().subscribe(move |e: &PointerEvent| {
        if e.kind == MouseEventKind::Click && e.target == target {
            seen.set(seen.get() + 1);
        }
    });

    ctx.input_mut().set_mouse_position(Vec2::new(50.0, 30.0));
    ctx.input_mut().press_button(MouseButton::Left);
    ctx.update(0.016);
    assert_eq!(
        button.read_widget(|b: &Button, _| b.state()),
        Some(ButtonState::Pressed)
    );

    ctx.input_mut().release_button(MouseButton::Left);
    ctx.update(0.016);
    assert_eq!(clicks.get(), 1);
    assert_eq!(
        button.read_widget(|b: &Button, _| (b.state(), b.click_count())),
        Some((ButtonState::Hover, 1))
    );

    ctx.input_mut().set_mouse_position(Vec2::new(300.0, 200.0));
    ctx.update(0.016);
    assert_eq!(ctx.router().hovered().as_ref(), Some(ctx.root()));
    assert_eq!(
        button.read_widget(|b: &Button, _| b.state()),
        Some(ButtonState::Normal)
    );
}

#[test]
fn presented_frame_carries_clip_state() {
    let mut ctx = context(UiConfig::with_screen_size(400.0, 300.0));
    let clip = ElementRef::new(Panel::new());
    clip.set_position(Vec2::new(10.0, 10.0));
    clip.set_size(Vec2::new(100.0, 100.0));
    clip.update_layout(|l| l.clip_content = true);
    let list = ElementRef::new(StackPanel::new(StackDirection::Vertical, 4.0));
    list.set_size(Vec2::new(100.0, 300.0));
    for i in 0..3 {
        let label = ElementRef::new(Label::new(format!("row {i}")));
        label.set_size(Vec2::new(100.0, 20.0));
        list.add_child(&label).unwrap();
    }
    ctx.root().add_child(&clip).unwrap();
    clip.add_child(&list).unwrap();

    ctx.update(0.0);
    let stats = ctx.render();
    assert_eq!(stats.dropped, 0);
    assert!(stats.primitives > 0);

    let mut backend = RecordingBackend::new();
    let frame = ctx.present(&mut backend);
    let recorded = backend.last_frame().unwrap();
    assert_eq!(recorded.frame, frame);
    assert_eq!(recorded.draws.len() as u32, stats.batches);

    let total: u32 = recorded.draws.iter().map(|d| d.primitive_count).sum();
    assert_eq!(total, stats.primitives);
    for draw in &recorded.draws {
        assert_eq!(draw.vertices.len() as u32, draw.primitive_count * 6);
    }
    assert!(recorded
        .draws
        .iter()
        .any(|d| d.state.scissor.is_some_and(|s| s.x == 10.0 && s.width == 100.0)));
}

#[test]
fn fenced_slots_drop_primitives_until_retired() {
    let config = UiConfig {
        frame_slots: 2,
        ..UiConfig::with_screen_size(200.0, 200.0)
    };
    let mut ctx = context(config);
    let panel = ElementRef::new(Panel::new());
    panel.set_size(Vec2::new(50.0, 50.0));
    ctx.root().add_child(&panel).unwrap();
    ctx.update(0.0);

    let mut backend = RecordingBackend::with_latency(10);
    for _ in 0..2 {
        assert_eq!(ctx.render().dropped, 0);
        ctx.present(&mut backend);
    }
    let starved = ctx.render();
    assert_eq!(starved.primitives, 0);
    assert!(starved.dropped > 0);

    let mut fast = RecordingBackend::new();
    ctx.present(&mut fast);
    assert_eq!(ctx.render().dropped, 0);
}

#[test]
fn invisible_and_transparent_subtrees_emit_nothing() {
    let mut ctx = context(UiConfig::with_screen_size(200.0, 200.0));
    let hidden = ElementRef::new(Panel::new());
    hidden.set_size(Vec2::new(50.0, 50.0));
    hidden.set_visible(false);
    let faded = ElementRef::new(Panel::new());
    faded.set_size(Vec2::new(50.0, 50.0));
    faded.set_opacity(0.0);
    let child = ElementRef::new(Panel::new());
    child.set_size(Vec2::new(10.0, 10.0));
    faded.add_child(&child).unwrap();
    ctx.root().add_child(&hidden).unwrap();
    ctx.root().add_child(&faded).unwrap();

    ctx.update(0.0);
    assert_eq!(ctx.render().primitives, 0);
}

#[test]
fn quick_tap_between_updates_still_clicks() {
    let mut ctx = context(UiConfig::with_screen_size(200.0, 200.0));
    let button = ElementRef::new(Button::new("Ok"));
    button.set_size(Vec2::new(80.0, 30.0));
    ctx.root().add_child(&button).unwrap();
    ctx.update(0.0);

    ctx.input_mut().set_mouse_position(Vec2::new(10.0, 10.0));
    ctx.input_mut().press_button(MouseButton::Left);
    ctx.input_mut().release_button(MouseButton::Left);
    ctx.update(0.016);

    assert_eq!(
        button.read_widget(|b: &Button, _| (b.state(), b.click_count())),
        Some((ButtonState::Hover, 1))
    );
}
