//! Selection snapshot sent by the page on every selection update or
//! transaction, used as the `EditorHost` for the floating menus.

use rte_core::{AttrPatch, NodeAttrs, NodeId, Rect, Selection, SelectionKind};
use rte_editor::{EditorHost, HostError};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Coords {
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
}

impl Coords {
    fn rect(self) -> Rect {
        Rect::new(self.left, self.top, self.left, self.bottom.max(self.top))
    }
}

/// ```json
/// { "from": 3, "to": 9, "node": false, "editable": true,
///   "active": ["bold"], "href": null,
///   "start": {"left": 10, "top": 40}, "end": {"left": 90, "top": 40} }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionSnapshot {
    pub from: usize,
    pub to: usize,
    /// Whether this is a node selection.
    pub node: bool,
    pub editable: bool,
    /// Names of block types and marks active for the selection.
    pub active: Vec<String>,
    pub href: Option<String>,
    pub start: Coords,
    pub end: Coords,
}

impl SelectionSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl EditorHost for SelectionSnapshot {
    fn is_editable(&self) -> bool {
        self.editable
    }

    fn selection(&self) -> Selection {
        let mut sel = Selection::text(self.from, self.to);
        if self.node {
            sel.kind = SelectionKind::Node;
        }
        sel
    }

    fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|a| a == name)
    }

    fn coords_at_pos(&self, pos: usize) -> Rect {
        if pos == self.from {
            self.start.rect()
        } else {
            self.end.rect()
        }
    }

    fn container_width(&self) -> Option<f64> {
        None
    }

    fn has_extension(&self, _name: &str) -> bool {
        false
    }

    fn node_pos(&self, _id: NodeId) -> Option<usize> {
        None
    }

    fn node_size(&self, _id: NodeId) -> Option<usize> {
        None
    }

    fn node_attrs(&self, _id: NodeId) -> Option<NodeAttrs> {
        None
    }

    fn node_has_content(&self, _id: NodeId) -> bool {
        false
    }

    fn selected_node(&self, _extension: &str) -> Option<NodeId> {
        None
    }

    fn link_href(&self) -> Option<String> {
        self.href.clone()
    }

    fn update_attributes(&mut self, id: NodeId, _patch: &AttrPatch) -> Result<(), HostError> {
        Err(HostError::UnknownNode(id))
    }

    fn set_node_selection(&mut self, _pos: usize) -> bool {
        false
    }

    fn set_text_selection(&mut self, selection: Selection) {
        self.from = selection.from;
        self.to = selection.to;
        self.node = selection.is_node();
    }
}
