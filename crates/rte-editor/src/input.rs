//! Input abstraction layer.
//!
//! Normalizes mouse and touch events coming from a media node view into a
//! single `InputEvent` enum consumed by the resize engine. Handle presses
//! arrive from the handle elements themselves; moves and releases arrive
//! from window-level listeners so a drag keeps tracking outside the element.

use rte_core::HandleKind;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down / touch start on a resize handle.
    HandleDown { handle: HandleKind, x: f64, y: f64 },

    /// Window-level mouse move / touch move.
    PointerMove { x: f64, y: f64 },

    /// Window-level mouse up / touch end.
    ///
    /// `inside_wrapper` tells whether the release target lies inside the
    /// node view's wrapper element.
    PointerUp {
        x: f64,
        y: f64,
        inside_wrapper: bool,
    },

    /// The platform aborted the gesture (`pointercancel`).
    PointerCancel,

    /// The wrapper lost focus to something outside it mid-drag.
    FocusLost,

    /// Mouse entered the wrapper, or a touch started on it.
    PointerEnter,

    /// Mouse left the wrapper. `related` is set when the pointer moved
    /// onto one of the view's own handles.
    PointerLeave { related: Option<HandleKind> },

    /// Click on the media element itself.
    MediaClick,
}

impl InputEvent {
    pub fn handle_down(handle: HandleKind, x: f64, y: f64) -> Self {
        Self::HandleDown { handle, x, y }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn pointer_up(x: f64, y: f64, inside_wrapper: bool) -> Self {
        Self::PointerUp {
            x,
            y,
            inside_wrapper,
        }
    }

    /// Touch events report a list of touches; the first one drives the drag.
    /// An empty list maps to the origin, like a touch with no coordinates.
    pub fn touch_move(touches: &[(f64, f64)]) -> Self {
        let (x, y) = touches.first().copied().unwrap_or((0.0, 0.0));
        Self::PointerMove { x, y }
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::HandleDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Whether this event ends a drag session.
    pub fn ends_drag(&self) -> bool {
        matches!(
            self,
            Self::PointerUp { .. } | Self::PointerCancel | Self::FocusLost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_uses_first_point() {
        assert_eq!(
            InputEvent::touch_move(&[(12.0, 30.0), (90.0, 90.0)]),
            InputEvent::pointer_move(12.0, 30.0)
        );
        assert_eq!(
            InputEvent::touch_move(&[]).position(),
            Some((0.0, 0.0))
        );
    }

    #[test]
    fn drag_terminators() {
        assert!(InputEvent::pointer_up(0.0, 0.0, true).ends_drag());
        assert!(InputEvent::PointerCancel.ends_drag());
        assert!(InputEvent::FocusLost.ends_drag());
        assert!(!InputEvent::pointer_move(1.0, 1.0).ends_drag());
    }
}
