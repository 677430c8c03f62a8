//! Window-level pointer listeners for one media wrapper.
//!
//! A drag has to keep tracking once the pointer leaves the element, so
//! moves and releases are observed on the window. The same listeners stay
//! registered while the handles are shown, so that a release anywhere else
//! on the page can hide them (touch input has no leave event).

use rte_editor::InputEvent;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{EventTarget, MouseEvent, Node, TouchEvent, Window};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

pub struct ListenerGuard {
    target: EventTarget,
    listeners: Vec<(&'static str, Listener)>,
    attached: bool,
}

/// First touch of a touch list, or the origin when it is empty.
fn touch_point(list: &web_sys::TouchList) -> (f64, f64) {
    list.get(0)
        .map(|t| (f64::from(t.client_x()), f64::from(t.client_y())))
        .unwrap_or((0.0, 0.0))
}

fn released_inside(event: &web_sys::Event, wrapper: &Node) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Node>().ok())
        .is_some_and(|node| wrapper.contains(Some(&node)))
}

/// Hit-test the release point. A touch event's target is where the touch
/// started, not where it ended.
fn point_inside(x: f64, y: f64, wrapper: &Node) -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.element_from_point(x as f32, y as f32))
        .is_some_and(|el| {
            let node: &Node = &el;
            wrapper.contains(Some(node))
        })
}

/// Translate a window event into an engine event.
pub fn to_input_event(event: &web_sys::Event, wrapper: &Node) -> Option<InputEvent> {
    match event.type_().as_str() {
        "mousemove" => {
            let e = event.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::pointer_move(f64::from(e.client_x()), f64::from(e.client_y())))
        }
        "mouseup" => {
            let e = event.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::pointer_up(
                f64::from(e.client_x()),
                f64::from(e.client_y()),
                released_inside(event, wrapper),
            ))
        }
        "touchmove" => {
            let e = event.dyn_ref::<TouchEvent>()?;
            let (x, y) = touch_point(&e.touches());
            Some(InputEvent::pointer_move(x, y))
        }
        "touchend" => {
            let e = event.dyn_ref::<TouchEvent>()?;
            let (x, y) = touch_point(&e.changed_touches());
            Some(InputEvent::pointer_up(x, y, point_inside(x, y, wrapper)))
        }
        "touchcancel" => Some(InputEvent::PointerCancel),
        "blur" => Some(InputEvent::FocusLost),
        _ => None,
    }
}

/// What to do with a wrapper's window listeners after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerChange {
    Attach,
    Reattach,
    Detach,
    Keep,
}

/// Listeners are wanted while a drag runs or the handles are shown.
/// `attached` is `None` when no guard exists yet.
pub fn listener_change(dragging: bool, handles_visible: bool, attached: Option<bool>) -> ListenerChange {
    match (dragging || handles_visible, attached) {
        (true, None) => ListenerChange::Attach,
        (true, Some(false)) => ListenerChange::Reattach,
        (false, Some(true)) => ListenerChange::Detach,
        _ => ListenerChange::Keep,
    }
}

impl ListenerGuard {
    const EVENTS: [&'static str; 6] = [
        "mousemove",
        "mouseup",
        "touchmove",
        "touchend",
        "touchcancel",
        "blur",
    ];

    /// Register `on_event` for every drag-related window event.
    pub fn attach<F>(window: &Window, on_event: F) -> Result<Self, wasm_bindgen::JsValue>
    where
        F: Fn(web_sys::Event) + Clone + 'static,
    {
        let target: EventTarget = window.clone().into();
        let mut listeners = Vec::with_capacity(Self::EVENTS.len());
        for name in Self::EVENTS {
            let cb = on_event.clone();
            let closure: Listener = Closure::new(move |e: web_sys::Event| cb(e));
            target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            listeners.push((name, closure));
        }
        log::debug!("window listeners attached");
        Ok(Self {
            target,
            listeners,
            attached: true,
        })
    }

    /// Register the existing closures again after a `detach`.
    pub fn reattach(&mut self) -> Result<(), wasm_bindgen::JsValue> {
        if self.attached {
            return Ok(());
        }
        for (name, closure) in &self.listeners {
            self.target
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        }
        self.attached = true;
        log::debug!("window listeners reattached");
        Ok(())
    }

    /// Remove the listeners but keep the closures alive.
    ///
    /// Safe to call from inside one of the listeners: the closure that is
    /// running is only freed when the guard is dropped.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for (name, closure) in &self.listeners {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {name} listener: {err:?}");
            }
        }
        self.attached = false;
        log::debug!("window listeners detached");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}
