//! Process-wide name → factory table.
//!
//! Initialized on first use with the built-in palette. Lookups are
//! case-insensitive.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::{Button, Grid, Image, Label, Panel, StackPanel};
use crate::context::UiContext;
use crate::element::ElementRef;
use crate::error::{UiError, UiResult};
use crate::render::TextStyle;

/// Builds an element for a context.
pub type ElementFactory = Arc<dyn Fn(&UiContext) -> ElementRef + Send + Sync>;

static REGISTRY: OnceLock<RwLock<HashMap<String, ElementFactory>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, ElementFactory>> {
    REGISTRY.get_or_init(|| RwLock::new(builtins()))
}

fn builtins() -> HashMap<String, ElementFactory> {
    let mut map: HashMap<String, ElementFactory> = HashMap::new();
    map.insert(
        "panel".into(),
        Arc::new(|ctx: &UiContext| ElementRef::new(Panel::themed(ctx.theme()))),
    );
    map.insert(
        "button".into(),
        Arc::new(|ctx: &UiContext| {
            ElementRef::new(
                Button::themed("", ctx.theme()).with_text_style(TextStyle::sized(ctx.config().default_font_size)),
            )
        }),
    );
    map.insert(
        "label".into(),
        Arc::new(|ctx: &UiContext| {
            ElementRef::new(
                Label::themed("", ctx.theme()).with_style(TextStyle::sized(ctx.config().default_font_size)),
            )
        }),
    );
    map.insert(
        "image".into(),
        Arc::new(|ctx: &UiContext| ElementRef::new(Image::themed(ctx.theme()))),
    );
    map.insert(
        "stackpanel".into(),
        Arc::new(|_: &UiContext| ElementRef::new(StackPanel::default())),
    );
    map.insert("grid".into(), Arc::new(|_: &UiContext| ElementRef::new(Grid::default())));
    map
}

/// Registers or replaces the factory for `name`.
pub fn register_element_type(
    name: &str,
    factory: impl Fn(&UiContext) -> ElementRef + Send + Sync + 'static,
) {
    let key = name.to_ascii_lowercase();
    if registry().write().insert(key, Arc::new(factory)).is_some() {
        tracing::debug!(name, "replaced element factory");
    }
}

/// Builds a detached element of type `name`.
///
/// # Errors
///
/// [`UiError::UnknownElementType`] when nothing is registered under `name`.
pub fn create_element(name: &str, ctx: &UiContext) -> UiResult<ElementRef> {
    let factory = registry().read().get(&name.to_ascii_lowercase()).cloned();
    match factory {
        Some(factory) => Ok(factory(ctx)),
        None => {
            tracing::warn!(name, "unknown element type");
            Err(UiError::UnknownElementType(name.to_owned()))
        }
    }
}

/// Registered type names, sorted.
#[must_use]
pub fn registered_types() -> Vec<String> {
    let mut names: Vec<String> = registry().read().keys().cloned().collect();
    names.sort();
    names
}
