//! Floating toolbar and bubble-menu positioning.
//!
//! A `FloatingPositioner` is recomputed on every selection update and every
//! document transaction. It decides visibility from the menu's rule and
//! places the menu centred above the selection, never closer than
//! `padding` to the viewport top.
//!
//! The menu's own size is only known after it has rendered once, so the
//! first placement after appearing uses a fallback box and is flagged
//! `estimated`. The next recomputation after [`FloatingPositioner::set_measured`]
//! settles on the real size.

use crate::host::EditorHost;
use rte_core::{FloatingConfig, Rect, Selection, Size};
use smallvec::SmallVec;

/// Screen position of a floating element's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionEstimate {
    pub x: f64,
    pub y: f64,
    /// Computed from the fallback size rather than a measured one.
    pub estimated: bool,
}

/// Document notifications that trigger a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    SelectionUpdate,
    Transaction,
}

/// When a menu may appear, on top of the non-empty selection requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityRule {
    /// Hidden while any of these block types or marks is active.
    HideWhenActive(SmallVec<[&'static str; 4]>),
    /// Shown only while this block type or mark is active.
    RequireActive(&'static str),
}

impl VisibilityRule {
    pub fn allows(&self, host: &impl EditorHost) -> bool {
        match self {
            VisibilityRule::HideWhenActive(names) => !names.iter().any(|n| host.is_active(n)),
            VisibilityRule::RequireActive(name) => host.is_active(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// General formatting toolbar.
    FloatingToolbar,
    /// Text formatting bubble.
    TextBubble,
    /// Link editing bubble.
    LinkBubble,
}

impl MenuKind {
    pub fn rule(self) -> VisibilityRule {
        match self {
            MenuKind::FloatingToolbar => VisibilityRule::HideWhenActive(SmallVec::from_slice(&["link"])),
            MenuKind::TextBubble => VisibilityRule::HideWhenActive(SmallVec::from_slice(&[
                "link", "video", "image", "code",
            ])),
            MenuKind::LinkBubble => VisibilityRule::RequireActive("link"),
        }
    }
}

/// Top-left corner for a `size` box centred above the selection.
///
/// `start` and `end` are the screen rectangles of the selection bounds.
pub fn compute_position(start: Rect, end: Rect, size: Size, padding: f64) -> (f64, f64) {
    let x = (start.x0 + end.x0) / 2.0 - size.width / 2.0;
    let y = (start.y0 - size.height - padding).max(padding);
    (x, y)
}

pub struct FloatingPositioner {
    rule: VisibilityRule,
    config: FloatingConfig,
    measured: Option<Size>,
    position: Option<PositionEstimate>,
}

impl FloatingPositioner {
    pub fn new(kind: MenuKind, config: FloatingConfig) -> Self {
        Self::with_rule(kind.rule(), config)
    }

    pub fn with_rule(rule: VisibilityRule, config: FloatingConfig) -> Self {
        Self {
            rule,
            config,
            measured: None,
            position: None,
        }
    }

    pub fn position(&self) -> Option<PositionEstimate> {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }

    /// Record the rendered size of the menu. Zero sizes count as unmeasured.
    pub fn set_measured(&mut self, size: Size) {
        self.measured = (size.width > 0.0 && size.height > 0.0).then_some(size);
    }

    pub fn measured(&self) -> Option<Size> {
        self.measured
    }

    pub fn on_event(&mut self, event: DocumentEvent, host: &impl EditorHost) -> Option<PositionEstimate> {
        log::trace!("floating recompute on {event:?}");
        self.recompute(host)
    }

    pub fn recompute(&mut self, host: &impl EditorHost) -> Option<PositionEstimate> {
        let sel = host.selection();
        if sel.is_empty() || !self.rule.allows(host) {
            self.position = None;
            return None;
        }

        let (size, estimated) = match self.measured {
            Some(size) => (size, false),
            None => (
                Size::new(self.config.fallback_width, self.config.fallback_height),
                true,
            ),
        };
        let start = host.coords_at_pos(sel.from);
        let end = host.coords_at_pos(sel.to);
        let (x, y) = compute_position(start, end, size, self.config.padding);

        self.position = Some(PositionEstimate { x, y, estimated });
        self.position
    }

    /// Forget the placement, e.g. when the menu is torn down.
    pub fn reset(&mut self) {
        self.position = None;
        self.measured = None;
    }
}

// ─── Link bubble ─────────────────────────────────────────────────────────

/// Link-editing bubble: a positioner plus the selection it was opened on.
///
/// Editing the URL moves focus into an input, which collapses the document
/// selection. The last non-empty selection is kept so the edit can be
/// applied to the link that was selected.
pub struct LinkBubble {
    positioner: FloatingPositioner,
    saved_selection: Option<Selection>,
}

impl LinkBubble {
    pub fn new(config: FloatingConfig) -> Self {
        Self {
            positioner: FloatingPositioner::new(MenuKind::LinkBubble, config),
            saved_selection: None,
        }
    }

    pub fn positioner(&self) -> &FloatingPositioner {
        &self.positioner
    }

    pub fn positioner_mut(&mut self) -> &mut FloatingPositioner {
        &mut self.positioner
    }

    pub fn saved_selection(&self) -> Option<Selection> {
        self.saved_selection
    }

    pub fn on_event(&mut self, event: DocumentEvent, host: &impl EditorHost) -> Option<PositionEstimate> {
        let sel = host.selection();
        if !sel.is_empty() && host.is_active("link") {
            self.saved_selection = Some(sel);
        }
        self.positioner.on_event(event, host)
    }

    /// URL of the link under the selection.
    pub fn href(&self, host: &impl EditorHost) -> Option<String> {
        host.link_href()
    }

    /// Put the saved selection back before applying an edit.
    pub fn restore_selection(&self, host: &mut impl EditorHost) -> bool {
        match self.saved_selection {
            Some(sel) => {
                host.set_text_selection(sel);
                true
            }
            None => false,
        }
    }
}

/// URL to open for a link: trimmed, with `https://` added when no
/// `http`/`https` scheme is present. Empty input yields `None`.
pub fn normalize_link_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("https://{url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DocumentHost;
    use pretty_assertions::assert_eq;
    use rte_core::{Block, Document, Mark, Point, TextRun};

    fn host() -> DocumentHost {
        let mut doc = Document::new();
        doc.metrics.origin = Point::new(20.0, 100.0);
        doc.push(Block::paragraph(vec![
            TextRun::plain("plain "),
            TextRun::marked(
                "linked",
                Mark::Link {
                    href: "example.com".into(),
                },
            ),
        ]));
        DocumentHost::new(doc)
    }

    #[test]
    fn midpoint_minus_half_width() {
        let start = Rect::new(100.0, 200.0, 100.0, 220.0);
        let end = Rect::new(300.0, 200.0, 300.0, 220.0);
        let (x, y) = compute_position(start, end, Size::new(160.0, 40.0), 8.0);
        assert_eq!((x, y), (120.0, 152.0));
    }

    #[test]
    fn y_clamped_to_padding() {
        let at_top = Rect::new(0.0, 10.0, 0.0, 30.0);
        let (_, y) = compute_position(at_top, at_top, Size::new(160.0, 40.0), 8.0);
        assert_eq!(y, 8.0);
    }

    #[test]
    fn fallback_then_measured() {
        let mut host = host();
        host.doc.set_selection(Selection::text(1, 5));
        let mut menu = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());

        let first = menu.on_event(DocumentEvent::SelectionUpdate, &host).unwrap();
        assert!(first.estimated);
        // start x = 20, end x = 20 + 4 * 8 = 52 → midpoint 36
        assert_eq!(first.x, 36.0 - 80.0);
        assert_eq!(first.y, 100.0 - 40.0 - 8.0);

        menu.set_measured(Size::new(200.0, 50.0));
        let settled = menu.on_event(DocumentEvent::Transaction, &host).unwrap();
        assert!(!settled.estimated);
        assert_eq!(settled.x, 36.0 - 100.0);
        assert_eq!(settled.y, 100.0 - 50.0 - 8.0);
    }

    #[test]
    fn zero_measurement_keeps_fallback() {
        let mut menu = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());
        menu.set_measured(Size::ZERO);
        assert_eq!(menu.measured(), None);
    }

    #[test]
    fn collapsed_selection_hides() {
        let mut host = host();
        host.doc.set_selection(Selection::text(1, 5));
        let mut menu = FloatingPositioner::new(MenuKind::TextBubble, FloatingConfig::default());
        assert!(menu.recompute(&host).is_some());

        host.doc.set_selection(Selection::caret(3));
        assert_eq!(menu.on_event(DocumentEvent::SelectionUpdate, &host), None);
        assert!(!menu.is_visible());
    }

    #[test]
    fn text_bubble_hides_over_links() {
        let mut host = host();
        // "linked" spans 7..13
        host.doc.set_selection(Selection::text(8, 11));
        let mut bubble = FloatingPositioner::new(MenuKind::TextBubble, FloatingConfig::default());
        assert_eq!(bubble.recompute(&host), None);

        let mut link = LinkBubble::new(FloatingConfig::default());
        assert!(link.on_event(DocumentEvent::SelectionUpdate, &host).is_some());
        assert_eq!(link.href(&host), Some("example.com".to_string()));
        assert_eq!(link.saved_selection(), Some(Selection::text(8, 11)));
    }

    #[test]
    fn link_bubble_restores_saved_selection() {
        let mut host = host();
        let mut link = LinkBubble::new(FloatingConfig::default());
        assert!(!link.restore_selection(&mut host));

        host.doc.set_selection(Selection::text(8, 11));
        link.on_event(DocumentEvent::SelectionUpdate, &host);
        host.doc.set_selection(Selection::caret(0));
        assert_eq!(link.on_event(DocumentEvent::SelectionUpdate, &host), None);

        assert!(link.restore_selection(&mut host));
        assert_eq!(host.doc.selection, Selection::text(8, 11));
    }

    #[test]
    fn link_urls() {
        assert_eq!(normalize_link_url("example.com"), Some("https://example.com".into()));
        assert_eq!(normalize_link_url(" http://a.b "), Some("http://a.b".into()));
        assert_eq!(normalize_link_url("https://a.b"), Some("https://a.b".into()));
        assert_eq!(normalize_link_url("   "), None);
    }
}
