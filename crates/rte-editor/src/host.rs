//! The seam between the engines and the document-editing engine they sit on.
//!
//! The resize and floating-menu engines never touch a document directly:
//! they read selection state and screen coordinates through `EditorHost`
//! and propose attribute updates through it. `DocumentHost` implements the
//! trait over the in-memory [`Document`] so everything runs natively.

use rte_core::{
    AttrPatch, BlockKind, Document, EditorConfig, NodeAttrs, NodeId, Rect, Selection,
    SelectionKind,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("editor is read-only")]
    NotEditable,
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("extension `{0}` is not available")]
    UnknownExtension(String),
    #[error("update rejected: {0}")]
    Rejected(String),
}

pub trait EditorHost {
    fn is_editable(&self) -> bool;

    fn selection(&self) -> Selection;

    /// Whether a block type or mark is active for the current selection.
    fn is_active(&self, name: &str) -> bool;

    /// Screen rectangle of a document position.
    fn coords_at_pos(&self, pos: usize) -> Rect;

    /// Rendered width of the editor's content column, if laid out.
    fn container_width(&self) -> Option<f64>;

    fn has_extension(&self, name: &str) -> bool;

    fn node_pos(&self, id: NodeId) -> Option<usize>;

    fn node_size(&self, id: NodeId) -> Option<usize>;

    fn node_attrs(&self, id: NodeId) -> Option<NodeAttrs>;

    /// Whether the node holds content of its own (e.g. caption text).
    fn node_has_content(&self, id: NodeId) -> bool;

    /// The node of type `extension` covered by the current selection.
    fn selected_node(&self, extension: &str) -> Option<NodeId>;

    /// `href` of the link under the selection.
    fn link_href(&self) -> Option<String>;

    fn update_attributes(&mut self, id: NodeId, patch: &AttrPatch) -> Result<(), HostError>;

    fn set_node_selection(&mut self, pos: usize) -> bool;

    fn set_text_selection(&mut self, selection: Selection);
}

/// [`EditorHost`] over an in-memory [`Document`].
pub struct DocumentHost {
    pub doc: Document,
    pub config: EditorConfig,
}

impl DocumentHost {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            config: EditorConfig::default(),
        }
    }

    pub fn with_config(doc: Document, config: EditorConfig) -> Self {
        Self { doc, config }
    }
}

impl EditorHost for DocumentHost {
    fn is_editable(&self) -> bool {
        self.doc.editable
    }

    fn selection(&self) -> Selection {
        self.doc.selection
    }

    fn is_active(&self, name: &str) -> bool {
        self.doc.is_active(name)
    }

    fn coords_at_pos(&self, pos: usize) -> Rect {
        self.doc.coords_at_pos(pos)
    }

    fn container_width(&self) -> Option<f64> {
        self.doc.metrics.content_width
    }

    fn has_extension(&self, name: &str) -> bool {
        match name {
            "paragraph" => true,
            "link" => self.config.enable_link,
            "image" | "video" | "iframe" => self.config.media_enabled(name),
            _ => false,
        }
    }

    fn node_pos(&self, id: NodeId) -> Option<usize> {
        self.doc.pos_of(id)
    }

    fn node_size(&self, id: NodeId) -> Option<usize> {
        self.doc.get_by_id(id).map(|b| b.node_size())
    }

    fn node_attrs(&self, id: NodeId) -> Option<NodeAttrs> {
        self.doc.get_by_id(id).map(|b| b.attrs.clone())
    }

    fn node_has_content(&self, id: NodeId) -> bool {
        self.doc.get_by_id(id).is_some_and(|b| b.has_content())
    }

    fn selected_node(&self, extension: &str) -> Option<NodeId> {
        let sel = self.doc.selection;
        let blocks = if sel.kind == SelectionKind::Node {
            self.doc.block_at(sel.from).into_iter().collect()
        } else {
            self.doc.blocks_in(sel.from, sel.to)
        };
        blocks
            .into_iter()
            .map(|(idx, _)| &self.doc.graph[idx])
            .find(|b| b.kind.name() == extension)
            .map(|b| b.id)
    }

    fn link_href(&self) -> Option<String> {
        match self.doc.active_mark("link") {
            Some(rte_core::Mark::Link { href }) => Some(href.clone()),
            _ => None,
        }
    }

    fn update_attributes(&mut self, id: NodeId, patch: &AttrPatch) -> Result<(), HostError> {
        if !self.doc.editable {
            return Err(HostError::NotEditable);
        }
        let block = self.doc.get_by_id(id).ok_or(HostError::UnknownNode(id))?;
        if matches!(block.kind, BlockKind::Root | BlockKind::Paragraph { .. }) {
            return Err(HostError::Rejected(format!(
                "`{}` has no media attributes",
                block.kind.name()
            )));
        }
        let extension = block.kind.name();
        if !self.has_extension(extension) {
            return Err(HostError::UnknownExtension(extension.to_string()));
        }
        self.doc.update_attrs(id, patch);
        Ok(())
    }

    fn set_node_selection(&mut self, pos: usize) -> bool {
        self.doc.select_node(pos)
    }

    fn set_text_selection(&mut self, selection: Selection) {
        self.doc.set_selection(selection);
    }
}
