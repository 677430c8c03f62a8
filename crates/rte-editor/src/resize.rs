//! Pointer-driven resize engine for embedded media.
//!
//! A drag is an explicit state machine:
//!
//! ```text
//!            HandleDown                 PointerUp / PointerCancel / FocusLost
//!   Idle ───────────────▶ Dragging ─────────────────────────────────────▶ Idle
//!                          │    ▲
//!                          └────┘ PointerMove
//! ```
//!
//! The engine is pure: every transition returns the `ResizeEffect`s the
//! caller must carry out (inline style, CSS classes, handle visibility,
//! commit, selection). `MediaNodeView` applies the document-side effects;
//! the WASM bridge applies the DOM-side ones.
//!
//! ## Size math
//!
//! | Handle | Width | Height |
//! |--------|-------|--------|
//! | `left` / `right` | `±dx × (2 if centered else 1)` | unchanged |
//! | `top` / `bottom` | from height via aspect ratio, else unchanged | `∓dy` / `±dy` |
//! | corners | `±dx` | `±dy` |
//!
//! With an aspect ratio `r`, height is always `width / r` after clamping.

use crate::input::InputEvent;
use rte_core::{Dimensions, HandleKind, ResizeConfig, Size};

/// CSS classes the engine toggles on the wrapper element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualClass {
    /// Present for the whole drag.
    Resizing,
    /// Flashed on each move for smooth visual feedback.
    Preview,
}

impl VisualClass {
    pub fn as_str(self) -> &'static str {
        match self {
            VisualClass::Resizing => "is-resizing",
            VisualClass::Preview => "resizing-preview",
        }
    }
}

/// Side effects produced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEffect {
    /// Write width/height into the wrapper's inline style right away.
    SetStyle(Dimensions),
    AddClass(VisualClass),
    RemoveClass(VisualClass),
    /// Remove a class after a delay, whatever the drag does meanwhile.
    RemoveClassAfter { class: VisualClass, delay_ms: u32 },
    ShowHandles(bool),
    /// Persist the final size on the node.
    Commit(Dimensions),
    /// Put the node selection back after the commit.
    RestoreNodeSelection,
    /// Select the node (media click).
    SelectNode,
}

/// Snapshot taken at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub handle: HandleKind,
    pub initial_width: f64,
    pub initial_height: Option<f64>,
    pub initial_x: f64,
    /// Only recorded for handles that move vertically.
    pub initial_y: Option<f64>,
    /// Whether the node was node-selected when the drag began.
    pub was_node_selected: bool,
    /// Last size computed by a move; `None` until the pointer moves.
    pub current: Option<Dimensions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(ResizeSession),
}

/// What the host knows about the element when an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    /// Rendered wrapper size; `None` or zero when not laid out yet.
    pub rendered: Option<Size>,
    /// Rendered width of the editor content column.
    pub container_width: Option<f64>,
    pub editable: bool,
    /// Whether the node is currently node-selected.
    pub node_selected: bool,
}

pub struct ResizeEngine {
    config: ResizeConfig,
    state: ResizeState,
    /// Last explicit width: the node attribute, then the live drag value.
    width: Option<f64>,
    height: Option<f64>,
    show_handles: bool,
    mounted: bool,
}

impl ResizeEngine {
    pub fn new(config: ResizeConfig, initial: Option<Dimensions>) -> Self {
        Self {
            config,
            state: ResizeState::Idle,
            width: initial.map(|d| d.width),
            height: initial.and_then(|d| d.height),
            show_handles: false,
            mounted: true,
        }
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ResizeConfig {
        &mut self.config
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Dragging(session) => Some(session),
            ResizeState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    pub fn width(&self) -> Option<f64> {
        self.width
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn handles_visible(&self) -> bool {
        self.show_handles
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Pick up attribute changes made elsewhere (undo, another client).
    /// Ignored mid-drag: the live value wins until the drag ends.
    pub fn sync_attrs(&mut self, width: Option<f64>, height: Option<f64>) {
        if self.is_dragging() {
            return;
        }
        self.width = width;
        self.height = height;
    }

    /// Tear down. Any event delivered afterwards is dropped.
    pub fn unmount(&mut self) -> Vec<ResizeEffect> {
        self.mounted = false;
        self.show_handles = false;
        match std::mem::take(&mut self.state) {
            ResizeState::Dragging(_) => vec![ResizeEffect::RemoveClass(VisualClass::Resizing)],
            ResizeState::Idle => vec![],
        }
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: &InputEvent, m: &Measurements) -> Vec<ResizeEffect> {
        if !self.mounted {
            log::trace!("resize event after unmount dropped: {event:?}");
            return vec![];
        }

        match event {
            InputEvent::HandleDown { handle, x, y } => self.start_drag(*handle, *x, *y, m),
            InputEvent::PointerMove { x, y } => self.update(*x, *y, m),
            InputEvent::PointerUp { inside_wrapper, .. } => {
                let mut effects = vec![];
                if (!inside_wrapper || !m.editable) && self.show_handles {
                    self.show_handles = false;
                    effects.push(ResizeEffect::ShowHandles(false));
                }
                effects.extend(self.end_drag());
                effects
            }
            InputEvent::PointerCancel | InputEvent::FocusLost => self.end_drag(),
            InputEvent::PointerEnter => {
                if m.editable && !self.show_handles {
                    self.show_handles = true;
                    return vec![ResizeEffect::ShowHandles(true)];
                }
                vec![]
            }
            InputEvent::PointerLeave { related } => {
                if related.is_some() || self.is_dragging() {
                    return vec![];
                }
                if m.editable && self.show_handles {
                    self.show_handles = false;
                    return vec![ResizeEffect::ShowHandles(false)];
                }
                vec![]
            }
            InputEvent::MediaClick => {
                if m.editable && !self.is_dragging() {
                    vec![ResizeEffect::SelectNode]
                } else {
                    vec![]
                }
            }
        }
    }

    fn start_drag(&mut self, handle: HandleKind, x: f64, y: f64, m: &Measurements) -> Vec<ResizeEffect> {
        if self.is_dragging() {
            return vec![];
        }
        if !self.config.handles.contains(handle) {
            log::debug!("handle `{}` not enabled, ignoring drag", handle.as_str());
            return vec![];
        }

        let rendered = m.rendered.filter(|s| s.width > 0.0);
        let initial_width = rendered
            .map(|s| s.width)
            .or(self.width)
            .unwrap_or(self.config.min_width);
        let initial_height = rendered
            .map(|s| s.height)
            .filter(|h| *h > 0.0)
            .or(self.height);
        let initial_y = (handle.axes().sign_y != 0.0).then_some(y);

        log::debug!(
            "resize start: handle={} width={initial_width} height={initial_height:?}",
            handle.as_str()
        );

        self.state = ResizeState::Dragging(ResizeSession {
            handle,
            initial_width,
            initial_height,
            initial_x: x,
            initial_y,
            was_node_selected: m.node_selected,
            current: None,
        });
        vec![ResizeEffect::AddClass(VisualClass::Resizing)]
    }

    fn update(&mut self, x: f64, y: f64, m: &Measurements) -> Vec<ResizeEffect> {
        let ResizeState::Dragging(session) = &mut self.state else {
            return vec![];
        };

        let dims = compute_size(session, &self.config, m.container_width, x, y);
        session.current = Some(dims);
        self.width = Some(dims.width);
        if dims.height.is_some() {
            self.height = dims.height;
        }
        log::trace!("resize move: {dims:?}");

        let mut effects = vec![ResizeEffect::SetStyle(dims)];
        if self.config.enable_preview {
            effects.push(ResizeEffect::AddClass(VisualClass::Preview));
            effects.push(ResizeEffect::RemoveClassAfter {
                class: VisualClass::Preview,
                delay_ms: self.config.preview_delay_ms,
            });
        }
        effects
    }

    fn end_drag(&mut self) -> Vec<ResizeEffect> {
        let ResizeState::Dragging(session) = std::mem::take(&mut self.state) else {
            return vec![];
        };

        let mut effects = vec![ResizeEffect::RemoveClass(VisualClass::Resizing)];
        if let Some(dims) = commit_dimensions(&session, &self.config) {
            log::debug!("resize commit: {dims:?}");
            self.width = Some(dims.width);
            if dims.height.is_some() {
                self.height = dims.height;
            }
            effects.push(ResizeEffect::Commit(dims));
        } else {
            log::debug!("resize end without size change");
        }
        if session.was_node_selected {
            effects.push(ResizeEffect::RestoreNodeSelection);
        }
        effects
    }
}

// ─── Size math ────────────────────────────────────────────────────────────

/// Upper width bound: the rendered container when known, else the config.
pub fn effective_max_width(config: &ResizeConfig, container_width: Option<f64>) -> f64 {
    container_width
        .filter(|w| *w > 0.0)
        .unwrap_or(config.max_width)
}

/// Clamp a raw width to the configured absolute and relative bounds.
pub fn clamp_width(
    width: f64,
    initial_width: f64,
    config: &ResizeConfig,
    container_width: Option<f64>,
) -> f64 {
    let max = effective_max_width(config, container_width);
    let mut w = width.max(config.min_width).min(max);
    if let Some(ratio) = config.min_ratio {
        w = w.max(initial_width * ratio);
    }
    if let Some(ratio) = config.max_ratio {
        w = w.min(initial_width * ratio);
    }
    w
}

fn clamp_height(height: f64, config: &ResizeConfig) -> f64 {
    let mut h = height;
    if let Some(min) = config.min_height {
        h = h.max(min);
    }
    if let Some(max) = config.max_height {
        h = h.min(max);
    }
    h.max(0.0)
}

fn locked_ratio(config: &ResizeConfig) -> Option<f64> {
    config.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0)
}

/// Size for a pointer at `(x, y)` during `session`.
pub fn compute_size(
    session: &ResizeSession,
    config: &ResizeConfig,
    container_width: Option<f64>,
    x: f64,
    y: f64,
) -> Dimensions {
    let axes = session.handle.axes();
    let dx = x - session.initial_x;
    let dy = session.initial_y.map_or(0.0, |iy| y - iy);
    let ratio = locked_ratio(config);

    let mut width = session.initial_width;
    let mut height = session.initial_height;

    if axes.corner {
        width += axes.sign_x * dx;
        height = Some(session.initial_height.unwrap_or(0.0) + axes.sign_y * dy);
    } else if axes.sign_x != 0.0 {
        width += axes.sign_x * dx * config.align.width_multiplier();
    } else {
        let h = clamp_height(session.initial_height.unwrap_or(0.0) + axes.sign_y * dy, config);
        height = Some(h);
        if let Some(r) = ratio {
            width = h * r;
        }
    }

    let width = clamp_width(width, session.initial_width, config, container_width);
    let height = match ratio {
        Some(r) => Some(width / r),
        None => height.map(|h| clamp_height(h, config)),
    };
    Dimensions { width, height }
}

/// Final size to persist, or `None` when the drag left the size unchanged.
///
/// Values are rounded to whole pixels. Edge and corner drags commit on a
/// width change; `top`/`bottom` drags commit on a height change. With an
/// aspect ratio the height is re-derived from the rounded width; otherwise
/// it is only reported when it changed.
pub fn commit_dimensions(session: &ResizeSession, config: &ResizeConfig) -> Option<Dimensions> {
    let current = session.current?;
    let width = current.width.round();
    let initial_height = session.initial_height.map(f64::round);
    let height = match locked_ratio(config) {
        Some(r) => Some((width / r).round()),
        None => current.height.map(f64::round),
    };

    let width_changed = width != session.initial_width.round();
    let changed = if session.handle.axes().sign_x == 0.0 {
        width_changed || (height.is_some() && height != initial_height)
    } else {
        width_changed
    };
    if !changed {
        return None;
    }

    let height = match locked_ratio(config) {
        Some(_) => height,
        None => height.filter(|h| initial_height != Some(*h)),
    };
    Some(Dimensions { width, height })
}
