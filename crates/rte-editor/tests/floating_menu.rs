//! Integration tests: floating toolbar and bubble menus (rte-editor).
//!
//! Feeds selection updates and transactions through positioners backed by
//! a `DocumentHost` and checks visibility and placement.

use pretty_assertions::assert_eq;
use rte_core::*;
use rte_editor::align::set_align;
use rte_editor::{DocumentEvent, DocumentHost, FloatingPositioner, LinkBubble, MenuKind};

/// Layout: "Hello world" at y=300, an image, then "code" in a code span.
fn host() -> DocumentHost {
    let mut doc = Document::new();
    doc.metrics.origin = Point::new(40.0, 300.0);
    doc.push(Block::paragraph(vec![TextRun::plain("Hello world")]));
    doc.push(Block::image("cat.png", NodeAttrs::default()));
    doc.push(Block::paragraph(vec![TextRun::marked("code", Mark::Code)]));
    DocumentHost::new(doc)
}

#[test]
fn toolbar_tracks_selection_and_settles() {
    let mut host = host();
    let mut toolbar = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());

    // "Hello" = positions 1..6
    host.doc.set_selection(Selection::text(1, 6));
    let first = toolbar.on_event(DocumentEvent::SelectionUpdate, &host).unwrap();
    assert!(first.estimated);
    assert_eq!(first.x, (40.0 + 80.0) / 2.0 - 80.0);
    assert_eq!(first.y, 300.0 - 40.0 - 8.0);

    toolbar.set_measured(Size::new(240.0, 36.0));
    let settled = toolbar.on_event(DocumentEvent::Transaction, &host).unwrap();
    assert!(!settled.estimated);
    assert_eq!(settled.x, 60.0 - 120.0);
    assert_eq!(settled.y, 300.0 - 36.0 - 8.0);
}

#[test]
fn collapse_hides_on_next_recompute() {
    let mut host = host();
    let mut bubble = FloatingPositioner::new(MenuKind::TextBubble, FloatingConfig::default());

    host.doc.set_selection(Selection::text(2, 9));
    assert!(bubble.on_event(DocumentEvent::SelectionUpdate, &host).is_some());

    host.doc.set_selection(Selection::caret(9));
    assert_eq!(bubble.on_event(DocumentEvent::SelectionUpdate, &host), None);
}

#[test]
fn text_bubble_excluded_over_image_and_code() {
    let mut host = host();
    let mut bubble = FloatingPositioner::new(MenuKind::TextBubble, FloatingConfig::default());
    let mut toolbar = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());

    // image at 13
    assert!(host.doc.select_node(13));
    assert_eq!(bubble.recompute(&host), None);
    assert!(toolbar.recompute(&host).is_some());

    // "code" text = 15..19
    host.doc.set_selection(Selection::text(15, 19));
    assert_eq!(bubble.recompute(&host), None);
}

#[test]
fn menu_never_above_padding() {
    let mut host = host();
    host.doc.metrics.origin = Point::new(0.0, 0.0);
    let config = FloatingConfig {
        padding: 12.0,
        ..FloatingConfig::default()
    };
    let mut toolbar = FloatingPositioner::new(MenuKind::FloatingToolbar, config);

    for (from, to) in [(1, 3), (1, 12), (15, 19)] {
        host.doc.set_selection(Selection::text(from, to));
        let pos = toolbar.recompute(&host).unwrap();
        assert!(pos.y >= 12.0, "{from}..{to}: {pos:?}");
    }
}

#[test]
fn transaction_moves_menu_with_content() {
    let mut host = host();
    let mut toolbar = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());

    // select "code" below the image (24px line + 240px media)
    host.doc.set_selection(Selection::text(15, 19));
    let before = toolbar.recompute(&host).unwrap();

    // the image above gets an explicit height; selection is unchanged
    let image = host.doc.block_at(13).map(|(idx, _)| host.doc.graph[idx].id).unwrap();
    host.doc.update_attrs(
        image,
        &AttrPatch {
            height: Some(100.0),
            ..AttrPatch::default()
        },
    );
    let after = toolbar.on_event(DocumentEvent::Transaction, &host).unwrap();
    assert_eq!(before.y - after.y, 140.0);
}

#[test]
fn link_bubble_only_inside_links() {
    let mut doc = Document::new();
    doc.push(Block::paragraph(vec![
        TextRun::plain("read "),
        TextRun::marked(
            "the docs",
            Mark::Link {
                href: "https://docs.example".into(),
            },
        ),
    ]));
    let mut host = DocumentHost::new(doc);
    let mut bubble = LinkBubble::new(FloatingConfig::default());

    host.doc.set_selection(Selection::text(1, 5));
    assert_eq!(bubble.on_event(DocumentEvent::SelectionUpdate, &host), None);

    host.doc.set_selection(Selection::text(7, 12));
    assert!(bubble.on_event(DocumentEvent::SelectionUpdate, &host).is_some());
    assert_eq!(bubble.href(&host).as_deref(), Some("https://docs.example"));
}

#[test]
fn align_then_toolbar_follows_node_selection() {
    let mut host = host();
    let mut toolbar = FloatingPositioner::new(MenuKind::FloatingToolbar, FloatingConfig::default());
    assert!(host.doc.select_node(13));

    assert!(set_align(&mut host, Alignment::Right, "image"));
    // selection is still the image node, so the toolbar stays up
    assert_eq!(host.doc.selection, Selection::node(13, 1));
    assert!(toolbar.on_event(DocumentEvent::Transaction, &host).is_some());
}
