//! Applies the DOM side of resize effects to the wrapper element.

use gloo_timers::callback::Timeout;
use rte_core::{Dimensions, Size};
use rte_editor::{ResizeEffect, VisualClass};
use web_sys::{Element, HtmlElement};

/// Class toggled while the handles should be visible.
pub const HANDLES_VISIBLE: &str = "show-handles";

fn px(value: f64) -> String {
    format!("{value}px")
}

pub fn set_size(el: &HtmlElement, dims: Dimensions) {
    let style = el.style();
    if let Err(err) = style.set_property("width", &px(dims.width)) {
        log::warn!("set width: {err:?}");
    }
    if let Some(h) = dims.height
        && let Err(err) = style.set_property("height", &px(h))
    {
        log::warn!("set height: {err:?}");
    }
}

fn toggle_class(el: &HtmlElement, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        log::warn!("toggle {class}: {err:?}");
    }
}

/// Rendered size of the element; `None` before layout.
pub fn rendered_size(el: &HtmlElement) -> Option<Size> {
    let rect = el.get_bounding_client_rect();
    let size = Size::new(rect.width(), rect.height());
    (size.width > 0.0).then_some(size)
}

/// Live maximum width: the configured container, else the element's parent.
pub fn container_width(el: &HtmlElement, container: Option<&Element>) -> Option<f64> {
    let parent = el.parent_element();
    measured_width(container.or(parent.as_ref()).map(Element::client_width))
}

/// `clientWidth` is zero for elements that are not laid out.
fn measured_width(client_width: Option<i32>) -> Option<f64> {
    client_width.map(f64::from).filter(|w| *w > 0.0)
}

/// Apply one DOM effect. Document effects are ignored here.
pub fn apply(el: &HtmlElement, effect: &ResizeEffect) {
    match effect {
        ResizeEffect::SetStyle(dims) => set_size(el, *dims),
        ResizeEffect::AddClass(class) => toggle_class(el, class.as_str(), true),
        ResizeEffect::RemoveClass(class) => toggle_class(el, class.as_str(), false),
        ResizeEffect::RemoveClassAfter { class, delay_ms } => remove_later(el, *class, *delay_ms),
        ResizeEffect::ShowHandles(on) => toggle_class(el, HANDLES_VISIBLE, *on),
        ResizeEffect::Commit(_) | ResizeEffect::RestoreNodeSelection | ResizeEffect::SelectNode => {}
    }
}

fn remove_later(el: &HtmlElement, class: VisualClass, delay_ms: u32) {
    let el = el.clone();
    let _ = Timeout::new(delay_ms, move || toggle_class(&el, class.as_str(), false)).forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unmeasured_container_gives_no_bound() {
        assert_eq!(measured_width(Some(720)), Some(720.0));
        assert_eq!(measured_width(Some(0)), None);
        assert_eq!(measured_width(None), None);
    }
}
