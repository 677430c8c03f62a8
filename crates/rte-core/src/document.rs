//! In-memory block document.
//!
//! A flat tree (root → blocks) stored in a `StableDiGraph`, addressed the
//! way rich-text engines address content: every block occupies a range of
//! integer positions, selections are `[from, to]` position pairs, and the
//! view can report the screen rectangle of any position.
//!
//! This is not a rich-text engine. It models just enough of one (block
//! sizes, marks, node attributes, a single-column line layout) to drive
//! the resize and floating-menu engines natively and in tests.

use crate::id::NodeId;
use crate::model::*;
use kurbo::{Point, Rect};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// Single-column layout parameters used by [`Document::coords_at_pos`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Top-left corner of the content area in screen coordinates.
    pub origin: Point,
    pub char_width: f64,
    pub line_height: f64,
    /// Height used for media blocks without a `height` attribute.
    pub media_height: f64,
    /// Rendered width of the content column, once known.
    pub content_width: Option<f64>,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            char_width: 8.0,
            line_height: 24.0,
            media_height: 240.0,
            content_width: None,
        }
    }
}

pub struct Document {
    pub graph: StableDiGraph<Block, ()>,
    pub root: NodeIndex,
    pub id_index: HashMap<NodeId, NodeIndex>,
    pub selection: Selection,
    pub editable: bool,
    pub metrics: TextMetrics,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = NodeId::intern("doc");
        let root = graph.add_node(Block::new(root_id, BlockKind::Root));

        let mut id_index = HashMap::new();
        id_index.insert(root_id, root);

        Self {
            graph,
            root,
            id_index,
            selection: Selection::default(),
            editable: true,
            metrics: TextMetrics::default(),
        }
    }

    /// Append a block at the end of the document.
    pub fn push(&mut self, block: Block) -> NodeIndex {
        let id = block.id;
        let idx = self.graph.add_node(block);
        self.graph.add_edge(self.root, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Block> {
        let idx = self.id_index.remove(&id)?;
        log::trace!("remove block {id}");
        let removed = self.graph.remove_node(idx);
        self.clamp_selection();
        removed
    }

    pub fn get_by_id(&self, id: NodeId) -> Option<&Block> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Top-level blocks in document order.
    ///
    /// Sorted by `NodeIndex`, which is insertion order for a stable graph.
    pub fn blocks(&self) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(self.root, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Total size of the document content in positions.
    pub fn content_size(&self) -> usize {
        self.blocks()
            .into_iter()
            .map(|idx| self.graph[idx].node_size())
            .sum()
    }

    /// `(index, start position)` for every block.
    fn block_starts(&self) -> Vec<(NodeIndex, usize)> {
        let mut pos = 0;
        self.blocks()
            .into_iter()
            .map(|idx| {
                let start = pos;
                pos += self.graph[idx].node_size();
                (idx, start)
            })
            .collect()
    }

    /// Start position of a block.
    pub fn pos_of(&self, id: NodeId) -> Option<usize> {
        let target = self.index_of(id)?;
        self.block_starts()
            .into_iter()
            .find(|(idx, _)| *idx == target)
            .map(|(_, start)| start)
    }

    /// Block containing `pos`, with its start position.
    ///
    /// The position right after the last block resolves to the last block.
    pub fn block_at(&self, pos: usize) -> Option<(NodeIndex, usize)> {
        let starts = self.block_starts();
        for &(idx, start) in &starts {
            if pos >= start && pos < start + self.graph[idx].node_size() {
                return Some((idx, start));
            }
        }
        starts
            .last()
            .copied()
            .filter(|(idx, start)| pos == start + self.graph[*idx].node_size())
    }

    /// Blocks overlapping the selection (the containing block when collapsed).
    pub fn blocks_in(&self, from: usize, to: usize) -> Vec<(NodeIndex, usize)> {
        if from == to {
            return self.block_at(from).into_iter().collect();
        }
        self.block_starts()
            .into_iter()
            .filter(|&(idx, start)| start < to && start + self.graph[idx].node_size() > from)
            .collect()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.clamp_selection();
    }

    /// Select the whole block starting at `pos`. Returns `false` if no block
    /// starts there.
    pub fn select_node(&mut self, pos: usize) -> bool {
        let Some((idx, start)) = self.block_at(pos) else {
            return false;
        };
        if start != pos {
            log::debug!("no block starts at {pos}");
            return false;
        }
        self.selection = Selection::node(start, self.graph[idx].node_size());
        true
    }

    fn clamp_selection(&mut self) {
        let size = self.content_size();
        let sel = &mut self.selection;
        sel.from = sel.from.min(size);
        sel.to = sel.to.min(size);
    }

    /// Whether a block type or mark is active for the current selection.
    ///
    /// Block names (`image`, `paragraph`, ...) are active when every block
    /// touched by the selection has that type. Mark names (`link`, `code`,
    /// ...) are active when every text run intersecting the selection
    /// carries the mark.
    pub fn is_active(&self, name: &str) -> bool {
        let Selection { from, to, kind } = self.selection;

        if matches!(name, "paragraph" | "image" | "video" | "iframe") {
            let blocks = if kind == SelectionKind::Node {
                self.block_at(from).into_iter().collect()
            } else {
                self.blocks_in(from, to)
            };
            return !blocks.is_empty()
                && blocks
                    .iter()
                    .all(|(idx, _)| self.graph[*idx].kind.name() == name);
        }

        if kind == SelectionKind::Node {
            return false;
        }

        let mut seen = false;
        for (idx, start) in self.blocks_in(from, to) {
            let BlockKind::Paragraph { runs } = &self.graph[idx].kind else {
                continue;
            };
            let mut run_start = start + 1;
            for run in runs {
                let run_end = run_start + run.len();
                let touches = if from == to {
                    run_start < from && from <= run_end
                } else {
                    run_start < to && run_end > from
                };
                if touches && !run.is_empty() {
                    if !run.has_mark(name) {
                        return false;
                    }
                    seen = true;
                }
                run_start = run_end;
            }
        }
        seen
    }

    /// First mark named `name` in the current selection.
    pub fn active_mark(&self, name: &str) -> Option<&Mark> {
        let Selection { from, to, .. } = self.selection;
        for (idx, start) in self.blocks_in(from, to) {
            let BlockKind::Paragraph { runs } = &self.graph[idx].kind else {
                continue;
            };
            let mut run_start = start + 1;
            for run in runs {
                let run_end = run_start + run.len();
                if run_start <= to && run_end >= from
                    && let Some(mark) = run.marks.iter().find(|m| m.name() == name)
                {
                    return Some(mark);
                }
                run_start = run_end;
            }
        }
        None
    }

    // ─── Attributes ──────────────────────────────────────────────────────

    /// Apply an attribute patch. Returns `false` for unknown blocks.
    pub fn update_attrs(&mut self, id: NodeId, patch: &AttrPatch) -> bool {
        match self.get_by_id_mut(id) {
            Some(block) => {
                log::trace!("update {id}: {patch:?}");
                block.attrs.apply(patch);
                true
            }
            None => false,
        }
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    fn block_height(&self, block: &Block) -> f64 {
        match &block.kind {
            BlockKind::Paragraph { .. } | BlockKind::Root => self.metrics.line_height,
            _ => block.attrs.height.unwrap_or(self.metrics.media_height),
        }
    }

    /// Screen rectangle of a position: a zero-width caret box.
    ///
    /// Positions past the end resolve to the end of the last block.
    pub fn coords_at_pos(&self, pos: usize) -> Rect {
        let m = &self.metrics;
        let pos = pos.min(self.content_size());
        let mut top = m.origin.y;

        for (idx, start) in self.block_starts() {
            let block = &self.graph[idx];
            let size = block.node_size();
            let height = self.block_height(block);
            let last = start + size == self.content_size();
            if pos < start + size || (last && pos == start + size) {
                let left = match &block.kind {
                    BlockKind::Paragraph { .. } => {
                        let offset = pos.saturating_sub(start + 1).min(block.kind.text_len());
                        m.origin.x + offset as f64 * m.char_width
                    }
                    _ => m.origin.x,
                };
                return Rect::new(left, top, left, top + height);
            }
            top += height;
        }

        Rect::new(m.origin.x, m.origin.y, m.origin.x, m.origin.y + m.line_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        doc.push(Block::paragraph(vec![TextRun::plain("hello")]));
        let image = Block::image(
            "cat.png",
            NodeAttrs {
                width: Some(300.0),
                height: Some(200.0),
                ..NodeAttrs::default()
            },
        );
        let image_id = image.id;
        doc.push(image);
        doc.push(Block::paragraph(vec![
            TextRun::plain("see "),
            TextRun::marked(
                "docs",
                Mark::Link {
                    href: "example.com".into(),
                },
            ),
        ]));
        (doc, image_id)
    }

    #[test]
    fn positions_follow_block_sizes() {
        let (doc, image_id) = sample();
        // "hello" paragraph = 7, image = 1, "see docs" paragraph = 10
        assert_eq!(doc.content_size(), 18);
        assert_eq!(doc.pos_of(image_id), Some(7));
        let (idx, start) = doc.block_at(7).unwrap();
        assert_eq!(start, 7);
        assert_eq!(doc.graph[idx].id, image_id);
    }

    #[test]
    fn select_node_requires_block_start() {
        let (mut doc, _) = sample();
        assert!(doc.select_node(7));
        assert_eq!(doc.selection, Selection::node(7, 1));
        assert!(doc.is_active("image"));
        assert!(!doc.select_node(3));
    }

    #[test]
    fn link_mark_active_only_inside_link() {
        let (mut doc, _) = sample();
        // second paragraph starts at 8; text at 9; "docs" covers 13..17
        doc.set_selection(Selection::text(14, 16));
        assert!(doc.is_active("link"));
        doc.set_selection(Selection::text(10, 16));
        assert!(!doc.is_active("link"));
        doc.set_selection(Selection::text(1, 4));
        assert!(!doc.is_active("link"));
        assert!(doc.is_active("paragraph"));
    }

    #[test]
    fn coords_advance_by_char_width() {
        let (doc, _) = sample();
        let a = doc.coords_at_pos(1);
        let b = doc.coords_at_pos(4);
        assert_eq!(b.x0 - a.x0, 24.0);
        assert_eq!(a.y0, 0.0);
        // third block sits under the 24px line and the 200px image
        let c = doc.coords_at_pos(10);
        assert_eq!(c.y0, 224.0);
    }

    #[test]
    fn update_attrs_unknown_block() {
        let (mut doc, image_id) = sample();
        assert!(doc.update_attrs(image_id, &AttrPatch::align(Alignment::Right)));
        assert_eq!(
            doc.get_by_id(image_id).unwrap().attrs.align,
            Some(Alignment::Right)
        );
        assert!(!doc.update_attrs(NodeId::intern("missing"), &AttrPatch::default()));
    }
}
