//! WASM bridge for RTE. Exposes the resize and floating-menu engines to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page keeps owning the
//! document: commits and selection requests go back through JS callbacks,
//! selection state comes in as JSON snapshots.

mod attrs;
mod dom;
mod listeners;
mod snapshot;

use js_sys::Function;
use listeners::{ListenerChange, ListenerGuard};
use rte_core::{Alignment, FloatingConfig, HandleKind, ResizeConfig, parse_key_combo};
use rte_editor::{
    DocumentEvent, FloatingPositioner, InputEvent, LinkBubble, Measurements, MenuKind,
    PositionEstimate, ResizeEffect, ResizeEngine, ShortcutMap,
};
use serde_json::json;
use snapshot::SelectionSnapshot;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

// ─── Resizable media ─────────────────────────────────────────────────────

struct MediaInner {
    engine: RefCell<ResizeEngine>,
    element: HtmlElement,
    /// Editor content column; the wrapper's parent when unset.
    container: RefCell<Option<Element>>,
    on_commit: Function,
    on_select: RefCell<Option<Function>>,
    editable: Cell<bool>,
    node_selected: Cell<bool>,
    align: Cell<Option<Alignment>>,
    listeners: RefCell<Option<ListenerGuard>>,
}

impl MediaInner {
    fn measurements(&self) -> Measurements {
        Measurements {
            rendered: dom::rendered_size(&self.element),
            container_width: dom::container_width(&self.element, self.container.borrow().as_ref()),
            editable: self.editable.get(),
            node_selected: self.node_selected.get(),
        }
    }

    fn call_select(&self) {
        if let Some(f) = self.on_select.borrow().as_ref()
            && let Err(err) = f.call0(&JsValue::NULL)
        {
            log::warn!("select callback failed: {err:?}");
        }
    }

    fn commit(&self, dims: rte_core::Dimensions) {
        let payload = match serde_json::to_string(&dims) {
            Ok(s) => s,
            Err(err) => {
                log::warn!("resize dropped: {err}");
                return;
            }
        };
        if let Err(err) = self.on_commit.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
            log::warn!("resize dropped: commit callback failed: {err:?}");
        }
    }
}

/// Run one event through the engine and carry out its effects.
///
/// The engine borrow is released before any JS callback runs, so callbacks
/// may call back into the bridge.
fn dispatch(inner: &Rc<MediaInner>, event: &InputEvent) -> bool {
    let m = inner.measurements();
    let effects = inner.engine.borrow_mut().handle(event, &m);
    sync_listeners(inner);

    let handled = !effects.is_empty();
    for effect in &effects {
        match effect {
            ResizeEffect::Commit(dims) => inner.commit(*dims),
            ResizeEffect::RestoreNodeSelection | ResizeEffect::SelectNode => inner.call_select(),
            other => dom::apply(&inner.element, other),
        }
    }
    handled
}

/// Attach, re-register, or drop the window listeners to match the engine.
///
/// A guard is only created when none exists, so this never frees a closure
/// while one of them is running.
fn sync_listeners(inner: &Rc<MediaInner>) {
    let (dragging, visible) = {
        let engine = inner.engine.borrow();
        (engine.is_dragging(), engine.handles_visible())
    };
    let mut slot = inner.listeners.borrow_mut();
    let change = listeners::listener_change(dragging, visible, slot.as_ref().map(ListenerGuard::is_attached));
    let result = match change {
        ListenerChange::Attach => new_guard(inner).map(|guard| *slot = Some(guard)),
        ListenerChange::Reattach => slot.as_mut().map_or(Ok(()), ListenerGuard::reattach),
        ListenerChange::Detach => {
            if let Some(guard) = slot.as_mut() {
                guard.detach();
            }
            Ok(())
        }
        ListenerChange::Keep => Ok(()),
    };
    if let Err(err) = result {
        log::warn!("window listeners not updated: {err:?}");
    }
}

fn new_guard(inner: &Rc<MediaInner>) -> Result<ListenerGuard, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let weak = Rc::downgrade(inner);
    ListenerGuard::attach(&window, move |event: web_sys::Event| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let Some(input) = listeners::to_input_event(&event, &inner.element) else {
            return;
        };
        // hover keeps the listeners up; idle moves need no layout reads
        if matches!(input, InputEvent::PointerMove { .. }) && !inner.engine.borrow().is_dragging() {
            return;
        }
        dispatch(&inner, &input);
    })
}

/// A resizable image, video, or iframe wrapper.
///
/// The page renders the handles and forwards their `mousedown` /
/// `touchstart` to [`ResizableMedia::handle_down`]. Moves and releases are
/// tracked on the window while a drag runs or the handles are shown.
#[wasm_bindgen]
pub struct ResizableMedia {
    inner: Rc<MediaInner>,
}

impl ResizableMedia {
    fn build(
        element: HtmlElement,
        config: ResizeConfig,
        attrs: rte_core::NodeAttrs,
        on_commit: Function,
    ) -> Self {
        if let Some(dims) = attrs.dimensions() {
            dom::set_size(&element, dims);
        }
        Self {
            inner: Rc::new(MediaInner {
                engine: RefCell::new(ResizeEngine::new(config, attrs.dimensions())),
                element,
                container: RefCell::new(None),
                on_commit,
                on_select: RefCell::new(None),
                editable: Cell::new(true),
                node_selected: Cell::new(false),
                align: Cell::new(attrs.align),
                listeners: RefCell::new(None),
            }),
        }
    }
}

#[wasm_bindgen]
impl ResizableMedia {
    /// Create a controller with the preset for `kind` (`image`, `video`,
    /// `iframe`). `on_commit` receives `{"width":..,"height":..}` as JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: HtmlElement,
        kind: &str,
        attrs_json: &str,
        on_commit: Function,
    ) -> Result<ResizableMedia, JsValue> {
        console_error_panic_hook_setup();
        let parsed = attrs::parse_attrs(attrs_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let (config, node_attrs) = attrs::preset(kind, &parsed)
            .ok_or_else(|| JsValue::from_str(&format!("unknown media kind `{kind}`")))?;
        Ok(Self::build(element, config, node_attrs, on_commit))
    }

    /// Create a controller from an explicit JSON `ResizeConfig`.
    pub fn with_config(
        element: HtmlElement,
        config_json: &str,
        attrs_json: &str,
        on_commit: Function,
    ) -> Result<ResizableMedia, JsValue> {
        console_error_panic_hook_setup();
        let config: ResizeConfig =
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let node_attrs =
            attrs::parse_attrs(attrs_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::build(element, config, node_attrs, on_commit))
    }

    /// Callback invoked when the node should become node-selected.
    pub fn set_on_select(&self, f: Function) {
        *self.inner.on_select.borrow_mut() = Some(f);
    }

    pub fn set_editable(&self, editable: bool) {
        self.inner.editable.set(editable);
    }

    pub fn set_node_selected(&self, selected: bool) {
        self.inner.node_selected.set(selected);
    }

    /// Element whose width bounds a resize, normally the editor's content
    /// column. Defaults to the wrapper's parent.
    pub fn set_container(&self, container: Element) {
        *self.inner.container.borrow_mut() = Some(container);
    }

    /// Re-read node attributes after a document change.
    /// Returns `false` if the JSON is malformed.
    pub fn sync_attrs(&self, attrs_json: &str) -> bool {
        let node_attrs = match attrs::parse_attrs(attrs_json) {
            Ok(a) => a,
            Err(err) => {
                log::warn!("sync_attrs: {err}");
                return false;
            }
        };
        let mut engine = self.inner.engine.borrow_mut();
        engine.sync_attrs(node_attrs.width, node_attrs.height);
        if let Some(align) = node_attrs.align {
            engine.config_mut().align = align;
        }
        self.inner.align.set(node_attrs.align);
        true
    }

    /// Drag start on a handle (`left`, `top-right`, ...).
    /// Returns `false` if the handle is unknown or not enabled.
    pub fn handle_down(&self, handle: &str, x: f64, y: f64) -> bool {
        let Some(handle) = HandleKind::from_name(handle) else {
            return false;
        };
        dispatch(&self.inner, &InputEvent::handle_down(handle, x, y))
    }

    pub fn pointer_enter(&self) {
        dispatch(&self.inner, &InputEvent::PointerEnter);
    }

    /// `related_handle` is the handle name when the pointer moved onto one.
    pub fn pointer_leave(&self, related_handle: Option<String>) {
        let related = related_handle.as_deref().and_then(HandleKind::from_name);
        dispatch(&self.inner, &InputEvent::PointerLeave { related });
    }

    pub fn media_click(&self) {
        dispatch(&self.inner, &InputEvent::MediaClick);
    }

    pub fn is_resizing(&self) -> bool {
        self.inner.engine.borrow().is_dragging()
    }

    /// Handle names to render, as a JSON array.
    pub fn handles(&self) -> String {
        let names: Vec<&str> = self
            .inner
            .engine
            .borrow()
            .config()
            .handles
            .handles()
            .iter()
            .map(|h| h.as_str())
            .collect();
        json!(names).to_string()
    }

    /// Layout class for the wrapper (`mx-auto`, `ml-auto`, ...).
    pub fn alignment_class(&self) -> String {
        rte_editor::align::alignment_class(self.inner.align.get()).to_string()
    }

    /// Tear down: end any drag and release the window listeners.
    pub fn destroy(&self) {
        let effects = self.inner.engine.borrow_mut().unmount();
        for effect in &effects {
            dom::apply(&self.inner.element, effect);
        }
        if let Some(guard) = self.inner.listeners.borrow_mut().as_mut() {
            guard.detach();
        }
    }
}

// ─── Floating menus ──────────────────────────────────────────────────────

enum Menu {
    Plain(FloatingPositioner),
    Link(LinkBubble),
}

/// Position controller for a floating toolbar or bubble menu.
#[wasm_bindgen]
pub struct FloatingMenu {
    menu: Menu,
    last: Option<SelectionSnapshot>,
}

#[wasm_bindgen]
impl FloatingMenu {
    /// `kind` is `toolbar`, `text`, or `link`. `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, config_json: &str) -> Result<FloatingMenu, JsValue> {
        console_error_panic_hook_setup();
        let config: FloatingConfig = if config_json.trim().is_empty() {
            FloatingConfig::default()
        } else {
            serde_json::from_str(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let menu = match kind {
            "toolbar" => Menu::Plain(FloatingPositioner::new(MenuKind::FloatingToolbar, config)),
            "text" => Menu::Plain(FloatingPositioner::new(MenuKind::TextBubble, config)),
            "link" => Menu::Link(LinkBubble::new(config)),
            other => return Err(JsValue::from_str(&format!("unknown menu kind `{other}`"))),
        };
        Ok(Self { menu, last: None })
    }

    /// Report the rendered size of the menu element.
    pub fn set_measured(&mut self, width: f64, height: f64) {
        let size = rte_core::Size::new(width, height);
        match &mut self.menu {
            Menu::Plain(p) => p.set_measured(size),
            Menu::Link(l) => l.positioner_mut().set_measured(size),
        }
    }

    /// Recompute from a selection snapshot (see `SelectionSnapshot`).
    ///
    /// `transaction` marks a document change rather than a selection move.
    /// Returns `{"visible":false}` or `{"visible":true,"x":..,"y":..,"estimated":..}`.
    pub fn update(&mut self, snapshot_json: &str, transaction: bool) -> String {
        let snap = match SelectionSnapshot::from_json(snapshot_json) {
            Ok(s) => s,
            Err(err) => return json!({ "visible": false, "error": err.to_string() }).to_string(),
        };
        let event = if transaction {
            DocumentEvent::Transaction
        } else {
            DocumentEvent::SelectionUpdate
        };
        let pos = match &mut self.menu {
            Menu::Plain(p) => p.on_event(event, &snap),
            Menu::Link(l) => l.on_event(event, &snap),
        };
        self.last = Some(snap);
        position_json(pos)
    }

    /// URL of the link under the last snapshot, normalised for opening.
    pub fn link_url(&self) -> Option<String> {
        let Menu::Link(bubble) = &self.menu else {
            return None;
        };
        let href = bubble.href(self.last.as_ref()?)?;
        rte_editor::normalize_link_url(&href)
    }

    /// Selection the link bubble was opened on, as `{"from":..,"to":..}`.
    pub fn saved_selection(&self) -> Option<String> {
        let Menu::Link(bubble) = &self.menu else {
            return None;
        };
        bubble
            .saved_selection()
            .map(|s| json!({ "from": s.from, "to": s.to }).to_string())
    }
}

fn position_json(pos: Option<PositionEstimate>) -> String {
    match pos {
        Some(p) => json!({
            "visible": true,
            "x": p.x,
            "y": p.y,
            "estimated": p.estimated,
        })
        .to_string(),
        None => json!({ "visible": false }).to_string(),
    }
}

// ─── Shortcuts & helpers ─────────────────────────────────────────────────

fn shortcut_map() -> &'static ShortcutMap {
    static MAP: OnceLock<ShortcutMap> = OnceLock::new();
    MAP.get_or_init(ShortcutMap::default)
}

/// Resolve a `KeyboardEvent` to an action name, or `undefined`.
#[wasm_bindgen]
pub fn resolve_shortcut(key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> Option<String> {
    shortcut_map()
        .resolve(key, ctrl, shift, alt, meta)
        .map(|a| a.as_str().to_string())
}

/// Validate a key combo. Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_key_combo(combo: &str) -> String {
    match parse_key_combo(combo) {
        Ok(_) => json!({ "ok": true }).to_string(),
        Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

#[wasm_bindgen]
pub fn normalize_link(url: &str) -> Option<String> {
    rte_editor::normalize_link_url(url)
}

/// Layout class for an alignment name; unknown or missing means centered.
#[wasm_bindgen]
pub fn alignment_class(align: Option<String>) -> String {
    let align = align.as_deref().and_then(Alignment::from_name);
    rte_editor::align::alignment_class(align).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("RTE WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
