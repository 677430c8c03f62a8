//! Alignment commands for media blocks.
//!
//! Alignment is stored as the `data-align` attribute of the selected media
//! node. A node without the attribute counts as left-aligned for the
//! active-state check, but renders centered.

use crate::host::EditorHost;
use rte_core::{Alignment, AttrPatch, KeyCombo, ParseError, parse_key_combo};

/// Layout class applied to the media wrapper.
pub fn alignment_class(align: Option<Alignment>) -> &'static str {
    match align {
        Some(Alignment::Left) => "mr-auto",
        Some(Alignment::Right) => "ml-auto",
        Some(Alignment::Full) => "w-full",
        Some(Alignment::Center) | None => "mx-auto",
    }
}

pub fn label(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "Align left",
        Alignment::Center => "Align center",
        Alignment::Right => "Align right",
        Alignment::Full => "Align justify",
    }
}

pub fn shortcut_keys(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "alt+shift+l",
        Alignment::Center => "alt+shift+e",
        Alignment::Right => "alt+shift+r",
        Alignment::Full => "alt+shift+j",
    }
}

pub fn shortcut(align: Alignment) -> Result<KeyCombo, ParseError> {
    parse_key_combo(shortcut_keys(align))
}

fn available(host: &impl EditorHost, extension: &str) -> bool {
    host.is_editable() && host.has_extension(extension)
}

/// Whether the selection covers a node of type `extension` that can take
/// the alignment.
pub fn can_set_align(host: &impl EditorHost, extension: &str) -> bool {
    available(host, extension) && host.selected_node(extension).is_some()
}

pub fn is_align_active(host: &impl EditorHost, align: Alignment, extension: &str) -> bool {
    if !available(host, extension) {
        return false;
    }
    let current = host
        .selected_node(extension)
        .and_then(|id| host.node_attrs(id))
        .and_then(|attrs| attrs.align)
        .unwrap_or(Alignment::Left);
    current == align
}

/// Apply `align` to the selected `extension` node.
///
/// A node selection is re-applied after the update so the node stays
/// selected. Returns `false` when nothing was updated.
pub fn set_align(host: &mut impl EditorHost, align: Alignment, extension: &str) -> bool {
    if !can_set_align(host, extension) {
        return false;
    }
    let Some(id) = host.selected_node(extension) else {
        return false;
    };
    let sel = host.selection();

    if let Err(err) = host.update_attributes(id, &AttrPatch::align(align)) {
        log::warn!("set_align({}) on {id}: {err}", align.as_str());
        return false;
    }
    if sel.is_node() {
        host.set_node_selection(sel.from);
    }
    log::debug!("{extension} {id} aligned {}", align.as_str());
    true
}

pub fn should_show_align_button(host: &impl EditorHost, extension: &str, hide_when_unavailable: bool) -> bool {
    if !available(host, extension) {
        return false;
    }
    !hide_when_unavailable || can_set_align(host, extension)
}

/// State of one alignment button in a toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignButton {
    pub align: Alignment,
    pub extension: &'static str,
    pub hide_when_unavailable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignButtonState {
    pub visible: bool,
    pub enabled: bool,
    pub active: bool,
    pub label: &'static str,
    pub shortcut: &'static str,
}

impl AlignButton {
    pub fn new(align: Alignment, extension: &'static str) -> Self {
        Self {
            align,
            extension,
            hide_when_unavailable: false,
        }
    }

    pub fn state(&self, host: &impl EditorHost) -> AlignButtonState {
        AlignButtonState {
            visible: should_show_align_button(host, self.extension, self.hide_when_unavailable),
            enabled: can_set_align(host, self.extension),
            active: is_align_active(host, self.align, self.extension),
            label: label(self.align),
            shortcut: shortcut_keys(self.align),
        }
    }

    pub fn press(&self, host: &mut impl EditorHost) -> bool {
        set_align(host, self.align, self.extension)
    }
}
