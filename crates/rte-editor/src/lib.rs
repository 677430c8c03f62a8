pub mod align;
pub mod floating;
pub mod host;
pub mod input;
pub mod node_view;
pub mod resize;
pub mod shortcuts;

pub use floating::{
    DocumentEvent, FloatingPositioner, LinkBubble, MenuKind, PositionEstimate, VisibilityRule,
    compute_position, normalize_link_url,
};
pub use host::{DocumentHost, EditorHost, HostError};
pub use input::{InputEvent, Modifiers};
pub use node_view::MediaNodeView;
pub use resize::{Measurements, ResizeEffect, ResizeEngine, ResizeSession, ResizeState, VisualClass};
pub use shortcuts::{EditorAction, ShortcutMap};
