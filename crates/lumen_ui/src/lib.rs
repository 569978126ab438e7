//! # LUMEN UI Core
//!
//! Retained-mode 2D interface core:
//! - Element tree with weak parent links
//! - Dirty bits so only changed subtrees are laid out
//! - Absolute, Stack, Grid and Flex layout strategies
//! - Clip-aware hit testing and pointer routing
//! - Quad batching into a frame-slotted ring buffer
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        UI PIPELINE                          │
//! ├────────────────────────────────────────────────────────────┤
//! │  InputSnapshot → InputRouter → Element tree → LayoutEngine │
//! │       ↓               ↓              ↓              ↓      │
//! │   Hit Testing    Enter/Click     Render walk     Batcher   │
//! │                                                     ↓      │
//! │                                              RenderBackend │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never talks to a GPU. Batches and ring-slot data go to a
//! [`RenderBackend`]; text metrics come from a [`GlyphSource`].
//!
//! ## Example
//!
//! ```
//! use lumen_ui::{Button, ElementRef, UiConfig, UiContext, Vec2};
//!
//! let mut ctx = UiContext::new(UiConfig::with_screen_size(640.0, 480.0)).unwrap();
//! let ok = ElementRef::new(Button::new("OK"));
//! ok.set_size(Vec2::new(80.0, 24.0));
//! ctx.root().add_child(&ok).unwrap();
//!
//! ctx.update(1.0 / 60.0);
//! let stats = ctx.render();
//! assert!(stats.primitives > 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod config;
pub mod context;
pub mod dirty;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod render;
pub mod router;
pub mod style;
pub mod widget;

pub use animation::{ColorTransition, Easing};
pub use config::UiConfig;
pub use context::{FrameStats, UiContext};
pub use dirty::DirtyTracker;
pub use element::{ElementCore, ElementFlags, ElementId, ElementRef, MouseEvent, MouseEventKind, WeakElement};
pub use error::{UiError, UiResult};
pub use event::{EventBus, SubscriptionId};
pub use geometry::{Mat4, Rect, Thickness, Vec2};
pub use input::{InputSnapshot, Key, KeyState, Modifiers, MouseButton};
pub use layout::{LayoutEngine, LayoutProperties, LayoutType};
pub use render::{BatchRecorder, Batcher, GlyphSource, RenderBackend, TextStyle, TextureId};
pub use router::{InputRouter, PointerEvent};
pub use style::{Color, Theme};
pub use widget::{
    Button, ButtonState, Grid, Image, ImageScaleMode, Label, Panel, StackPanel, TextAlign, Widget,
    WidgetResponse,
};
