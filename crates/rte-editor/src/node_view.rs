//! Node view for a resizable media block.
//!
//! Owns one `ResizeEngine` per mounted media element and applies the
//! document-side effects it produces (commit, node selection) to an
//! `EditorHost`. DOM-side effects are handed back to the caller.

use crate::host::EditorHost;
use crate::input::InputEvent;
use crate::resize::{Measurements, ResizeEffect, ResizeEngine};
use rte_core::{
    Alignment, AttrPatch, Block, BlockKind, NodeAttrs, NodeId, ResizeConfig, Size,
};

pub struct MediaNodeView {
    id: NodeId,
    extension: &'static str,
    engine: ResizeEngine,
}

impl MediaNodeView {
    pub fn new(id: NodeId, extension: &'static str, config: ResizeConfig, attrs: &NodeAttrs) -> Self {
        Self {
            id,
            extension,
            engine: ResizeEngine::new(config, attrs.dimensions()),
        }
    }

    /// View for a media block with the preset matching its type.
    ///
    /// Blocks without an alignment attribute render centered, so they also
    /// resize symmetrically. Returns `None` for non-media blocks.
    pub fn for_block(block: &Block) -> Option<Self> {
        let attrs = &block.attrs;
        let align = attrs.align.unwrap_or(Alignment::Center);
        let config = match &block.kind {
            BlockKind::Image { .. } => ResizeConfig::image(align),
            BlockKind::Video { .. } => ResizeConfig::video(align, attrs.width, attrs.height),
            BlockKind::Iframe { .. } => ResizeConfig::iframe(align, attrs.width, attrs.height),
            BlockKind::Root | BlockKind::Paragraph { .. } => return None,
        };
        Some(Self::new(block.id, block.kind.name(), config, attrs))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn extension(&self) -> &'static str {
        self.extension
    }

    pub fn engine(&self) -> &ResizeEngine {
        &self.engine
    }

    /// Whether the current selection is a node selection on this block.
    pub fn is_node_selected(&self, host: &impl EditorHost) -> bool {
        let sel = host.selection();
        sel.is_node() && host.node_pos(self.id) == Some(sel.from)
    }

    pub fn measurements(&self, host: &impl EditorHost, rendered: Option<Size>) -> Measurements {
        Measurements {
            rendered,
            container_width: host.container_width(),
            editable: host.is_editable(),
            node_selected: self.is_node_selected(host),
        }
    }

    /// Run an event through the engine and apply its document effects.
    ///
    /// Returns the effects the DOM layer still has to carry out. A commit
    /// the host rejects is dropped with a warning.
    pub fn dispatch(
        &mut self,
        host: &mut impl EditorHost,
        event: &InputEvent,
        rendered: Option<Size>,
    ) -> Vec<ResizeEffect> {
        let m = self.measurements(host, rendered);
        let effects = self.engine.handle(event, &m);

        let mut dom = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                ResizeEffect::Commit(dims) => {
                    if let Err(err) = host.update_attributes(self.id, &AttrPatch::size(dims)) {
                        log::warn!("{} {}: resize dropped: {err}", self.extension, self.id);
                    }
                }
                ResizeEffect::RestoreNodeSelection | ResizeEffect::SelectNode => {
                    self.select(host);
                }
                other => dom.push(other),
            }
        }
        dom
    }

    fn select(&self, host: &mut impl EditorHost) {
        match host.node_pos(self.id) {
            Some(pos) => {
                if !host.set_node_selection(pos) {
                    log::debug!("cannot select {} at {pos}", self.id);
                }
            }
            None => log::debug!("{} no longer in document", self.id),
        }
    }

    /// Re-read persisted attributes after a document change.
    pub fn sync_from_host(&mut self, host: &impl EditorHost) {
        let Some(attrs) = host.node_attrs(self.id) else {
            return;
        };
        self.engine.sync_attrs(attrs.width, attrs.height);
        if let Some(align) = attrs.align {
            self.engine.config_mut().align = align;
        }
    }

    /// Hide an empty caption once the selection leaves the block.
    ///
    /// Returns `true` when the caption was hidden.
    pub fn on_selection_update(&mut self, host: &mut impl EditorHost) -> bool {
        let Some(attrs) = host.node_attrs(self.id) else {
            return false;
        };
        if !attrs.show_caption || host.node_has_content(self.id) {
            return false;
        }
        let (Some(pos), Some(size)) = (host.node_pos(self.id), host.node_size(self.id)) else {
            return false;
        };
        if !host.selection().is_outside(pos, pos + size) {
            return false;
        }
        let patch = AttrPatch {
            show_caption: Some(false),
            ..AttrPatch::default()
        };
        match host.update_attributes(self.id, &patch) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}: caption not hidden: {err}", self.id);
                false
            }
        }
    }

    pub fn unmount(&mut self) -> Vec<ResizeEffect> {
        self.engine.unmount()
    }
}
