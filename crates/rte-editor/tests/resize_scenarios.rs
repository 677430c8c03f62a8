//! Integration tests: media resize through a node view (rte-editor).
//!
//! Drives `MediaNodeView` with pointer sequences against a `DocumentHost`
//! and checks both the DOM effects and the persisted node attributes.

use pretty_assertions::assert_eq;
use rte_core::*;
use rte_editor::resize::{clamp_width, compute_size};
use rte_editor::{DocumentHost, InputEvent, MediaNodeView, ResizeEffect, ResizeSession, VisualClass};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Paragraph "caption" (size 9), then the media block at position 9.
fn host_with(block: Block) -> (DocumentHost, NodeId) {
    let mut doc = Document::new();
    doc.push(Block::paragraph(vec![TextRun::plain("caption")]));
    let id = block.id;
    doc.push(block);
    let mut config = EditorConfig::default();
    config.enable_iframe = true;
    (DocumentHost::with_config(doc, config), id)
}

fn drag(
    view: &mut MediaNodeView,
    host: &mut DocumentHost,
    handle: HandleKind,
    dx: f64,
    dy: f64,
    rendered: Size,
) -> Vec<ResizeEffect> {
    let rendered = Some(rendered);
    let mut effects = view.dispatch(host, &InputEvent::handle_down(handle, 100.0, 100.0), rendered);
    effects.extend(view.dispatch(host, &InputEvent::pointer_move(100.0 + dx, 100.0 + dy), rendered));
    effects.extend(view.dispatch(
        host,
        &InputEvent::pointer_up(100.0 + dx, 100.0 + dy, true),
        rendered,
    ));
    effects
}

fn attrs(host: &DocumentHost, id: NodeId) -> NodeAttrs {
    host.doc.get_by_id(id).unwrap().attrs.clone()
}

// ─── Edge handles ───────────────────────────────────────────────────────

#[test]
fn right_handle_left_aligned_iframe() {
    init_logs();
    let (mut host, id) = host_with(Block::iframe(
        "https://example.com/embed",
        NodeAttrs {
            width: Some(300.0),
            height: Some(150.0),
            align: Some(Alignment::Left),
            ..NodeAttrs::default()
        },
    ));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    let effects = drag(&mut view, &mut host, HandleKind::Right, 50.0, 0.0, Size::new(300.0, 150.0));

    assert_eq!(effects.first(), Some(&ResizeEffect::AddClass(VisualClass::Resizing)));
    assert_eq!(effects.last(), Some(&ResizeEffect::RemoveClass(VisualClass::Resizing)));
    let a = attrs(&host, id);
    assert_eq!(a.width, Some(350.0));
    // 300×150 locks a 2:1 ratio
    assert_eq!(a.height, Some(175.0));
}

#[test]
fn right_handle_centered_doubles_delta() {
    let (mut host, id) = host_with(Block::iframe(
        "https://example.com/embed",
        NodeAttrs {
            width: Some(300.0),
            height: Some(150.0),
            align: Some(Alignment::Center),
            ..NodeAttrs::default()
        },
    ));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    drag(&mut view, &mut host, HandleKind::Right, 50.0, 0.0, Size::new(300.0, 150.0));

    assert_eq!(attrs(&host, id).width, Some(400.0));
    assert_eq!(attrs(&host, id).height, Some(200.0));
}

#[test]
fn edge_drag_width_capped_by_container() {
    let (mut host, id) = host_with(Block::iframe("https://example.com/embed", NodeAttrs::default()));
    host.doc.metrics.content_width = Some(700.0);
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    drag(&mut view, &mut host, HandleKind::Right, 900.0, 0.0, Size::new(640.0, 360.0));

    assert_eq!(attrs(&host, id).width, Some(700.0));
    assert_eq!(attrs(&host, id).height, Some((700.0f64 * 360.0 / 640.0).round()));
}

#[test]
fn bottom_handle_resizes_iframe_through_ratio() {
    let (mut host, id) = host_with(Block::iframe("https://example.com/embed", NodeAttrs::default()));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    drag(&mut view, &mut host, HandleKind::Bottom, 0.0, -90.0, Size::new(640.0, 360.0));

    assert_eq!(attrs(&host, id).width, Some(480.0));
    assert_eq!(attrs(&host, id).height, Some(270.0));
}

#[test]
fn bottom_handle_stops_at_iframe_min_height() {
    let (mut host, id) = host_with(Block::iframe("https://example.com/embed", NodeAttrs::default()));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    drag(&mut view, &mut host, HandleKind::Bottom, 0.0, -300.0, Size::new(640.0, 360.0));

    // 150px tall at 16:9
    assert_eq!(attrs(&host, id).width, Some(267.0));
    assert_eq!(attrs(&host, id).height, Some(150.0));
}

// ─── Corner handles ─────────────────────────────────────────────────────

#[test]
fn top_left_corner_shrinks_image() {
    let (mut host, id) = host_with(Block::image("cat.png", NodeAttrs::default()));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    let effects = drag(&mut view, &mut host, HandleKind::TopLeft, 40.0, 25.0, Size::new(500.0, 300.0));

    assert!(effects.contains(&ResizeEffect::SetStyle(Dimensions::new(460.0, Some(275.0)))));
    assert!(effects.contains(&ResizeEffect::RemoveClassAfter {
        class: VisualClass::Preview,
        delay_ms: 100,
    }));
    let a = attrs(&host, id);
    assert_eq!((a.width, a.height), (Some(460.0), Some(275.0)));
}

#[test]
fn video_corner_keeps_aspect_ratio() {
    let (mut host, id) = host_with(Block::video(
        "clip.mp4",
        NodeAttrs {
            width: Some(640.0),
            height: Some(360.0),
            ..NodeAttrs::default()
        },
    ));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();

    drag(&mut view, &mut host, HandleKind::BottomLeft, -37.0, 200.0, Size::new(640.0, 360.0));

    let a = attrs(&host, id);
    assert_eq!(a.width, Some(677.0));
    assert_eq!(a.height, Some((677.0f64 * 9.0 / 16.0).round()));
}

// ─── No-op drags ────────────────────────────────────────────────────────

#[test]
fn zero_movement_drag_leaves_attrs_untouched() {
    let (mut host, id) = host_with(Block::image(
        "cat.png",
        NodeAttrs {
            width: Some(320.0),
            ..NodeAttrs::default()
        },
    ));
    let before = attrs(&host, id);
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();
    let rendered = Some(Size::new(320.0, 200.0));

    view.dispatch(&mut host, &InputEvent::handle_down(HandleKind::BottomRight, 5.0, 5.0), rendered);
    let effects = view.dispatch(&mut host, &InputEvent::pointer_up(5.0, 5.0, true), rendered);

    assert_eq!(effects, vec![ResizeEffect::RemoveClass(VisualClass::Resizing)]);
    assert_eq!(attrs(&host, id), before);
}

#[test]
fn read_only_document_drops_commit() {
    let (mut host, id) = host_with(Block::image("cat.png", NodeAttrs::default()));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();
    let rendered = Some(Size::new(400.0, 300.0));

    view.dispatch(&mut host, &InputEvent::handle_down(HandleKind::BottomRight, 0.0, 0.0), rendered);
    host.doc.editable = false;
    view.dispatch(&mut host, &InputEvent::pointer_move(50.0, 50.0), rendered);
    let effects = view.dispatch(&mut host, &InputEvent::pointer_up(50.0, 50.0, true), rendered);

    assert!(effects.contains(&ResizeEffect::RemoveClass(VisualClass::Resizing)));
    assert_eq!(attrs(&host, id).width, None);
}

#[test]
fn unmount_mid_drag_drops_pointer_up() {
    let (mut host, id) = host_with(Block::image("cat.png", NodeAttrs::default()));
    let mut view = MediaNodeView::for_block(host.doc.get_by_id(id).unwrap()).unwrap();
    let rendered = Some(Size::new(400.0, 300.0));

    view.dispatch(&mut host, &InputEvent::handle_down(HandleKind::BottomRight, 0.0, 0.0), rendered);
    view.dispatch(&mut host, &InputEvent::pointer_move(80.0, 0.0), rendered);
    view.unmount();
    let effects = view.dispatch(&mut host, &InputEvent::pointer_up(80.0, 0.0, true), rendered);

    assert!(effects.is_empty());
    assert_eq!(attrs(&host, id).width, None);
}

// ─── Clamping properties ────────────────────────────────────────────────

#[test]
fn clamp_holds_across_pointer_range() {
    let config = ResizeConfig {
        min_ratio: Some(0.5),
        max_ratio: Some(2.0),
        handles: HandleSet::All,
        ..ResizeConfig::default()
    };
    for handle in HandleKind::ALL {
        let session = ResizeSession {
            handle,
            initial_width: 300.0,
            initial_height: Some(200.0),
            initial_x: 0.0,
            initial_y: Some(0.0),
            was_node_selected: false,
            current: None,
        };
        let mut x = -2000.0;
        while x <= 2000.0 {
            let dims = compute_size(&session, &config, Some(640.0), x, x / 2.0);
            assert!(dims.width >= 150.0 && dims.width <= 600.0, "{handle:?} {x}: {dims:?}");
            assert!(dims.width >= config.min_width);
            x += 97.0;
        }
    }
    assert_eq!(clamp_width(10.0, 300.0, &config, Some(640.0)), 150.0);
}

#[test]
fn aspect_locked_height_follows_width() {
    let config = ResizeConfig {
        aspect_ratio: Some(4.0 / 3.0),
        handles: HandleSet::All,
        ..ResizeConfig::default()
    };
    for handle in HandleKind::ALL {
        let session = ResizeSession {
            handle,
            initial_width: 400.0,
            initial_height: Some(300.0),
            initial_x: 0.0,
            initial_y: Some(0.0),
            was_node_selected: false,
            current: None,
        };
        let dims = compute_size(&session, &config, None, 33.0, -71.0);
        let height = dims.height.unwrap();
        assert!((height - dims.width * 3.0 / 4.0).abs() < 1e-9, "{handle:?}");
    }
}
