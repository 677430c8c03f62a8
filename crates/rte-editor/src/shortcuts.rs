//! Keyboard shortcut mapping.
//!
//! Maps key combos to semantic `EditorAction`s. Bindings are written in
//! `Mod+Shift+z` notation and parsed once; `Mod` is ⌘ on macOS and Ctrl
//! elsewhere, so either modifier triggers it.

use crate::input::Modifiers;
use rte_core::{Alignment, KeyCombo, ParseError, parse_key_combo};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    // ── Marks ──
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,

    // ── Blocks ──
    /// Heading level 1–6.
    Heading(u8),
    BulletList,
    OrderedList,
    CodeBlock,
    Blockquote,
    Table,
    HorizontalRule,
    Image,

    // ── History ──
    Undo,
    Redo,

    // ── Media alignment ──
    Align(Alignment),
}

impl EditorAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorAction::Bold => "bold",
            EditorAction::Italic => "italic",
            EditorAction::Underline => "underline",
            EditorAction::Strike => "strike",
            EditorAction::Code => "code",
            EditorAction::Link => "link",
            EditorAction::Heading(1) => "heading1",
            EditorAction::Heading(2) => "heading2",
            EditorAction::Heading(3) => "heading3",
            EditorAction::Heading(4) => "heading4",
            EditorAction::Heading(5) => "heading5",
            EditorAction::Heading(_) => "heading6",
            EditorAction::BulletList => "bulletList",
            EditorAction::OrderedList => "orderedList",
            EditorAction::CodeBlock => "codeBlock",
            EditorAction::Blockquote => "blockquote",
            EditorAction::Table => "table",
            EditorAction::HorizontalRule => "horizontalRule",
            EditorAction::Image => "image",
            EditorAction::Undo => "undo",
            EditorAction::Redo => "redo",
            EditorAction::Align(Alignment::Left) => "alignLeft",
            EditorAction::Align(Alignment::Center) => "alignCenter",
            EditorAction::Align(Alignment::Right) => "alignRight",
            EditorAction::Align(Alignment::Full) => "alignJustify",
        }
    }
}

/// Default bindings.
pub const DEFAULT_BINDINGS: &[(&str, EditorAction)] = &[
    ("Mod+b", EditorAction::Bold),
    ("Mod+i", EditorAction::Italic),
    ("Mod+u", EditorAction::Underline),
    ("Mod+Shift+s", EditorAction::Strike),
    ("Mod+Alt+1", EditorAction::Heading(1)),
    ("Mod+Alt+2", EditorAction::Heading(2)),
    ("Mod+Alt+3", EditorAction::Heading(3)),
    ("Mod+Alt+4", EditorAction::Heading(4)),
    ("Mod+Alt+5", EditorAction::Heading(5)),
    ("Mod+Alt+6", EditorAction::Heading(6)),
    ("Mod+z", EditorAction::Undo),
    ("Mod+Shift+z", EditorAction::Redo),
    ("Mod+Shift+8", EditorAction::BulletList),
    ("Mod+Shift+7", EditorAction::OrderedList),
    ("Mod+e", EditorAction::Code),
    ("Mod+Shift+c", EditorAction::CodeBlock),
    ("Mod+Shift+b", EditorAction::Blockquote),
    ("Mod+Shift+t", EditorAction::Table),
    ("Mod+Shift+_", EditorAction::HorizontalRule),
    ("Mod+k", EditorAction::Link),
    ("Mod+Shift+i", EditorAction::Image),
    ("alt+shift+l", EditorAction::Align(Alignment::Left)),
    ("alt+shift+e", EditorAction::Align(Alignment::Center)),
    ("alt+shift+r", EditorAction::Align(Alignment::Right)),
    ("alt+shift+j", EditorAction::Align(Alignment::Full)),
];

/// Resolves key events into editor actions.
///
/// Later bindings take precedence over earlier ones, so [`bind`] can
/// override a default.
///
/// [`bind`]: ShortcutMap::bind
pub struct ShortcutMap {
    bindings: Vec<(KeyCombo, EditorAction)>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(combo, action)| match parse_key_combo(combo) {
                Ok(parsed) => Some((parsed, *action)),
                Err(err) => {
                    log::error!("default binding for {}: {err}", action.as_str());
                    None
                }
            })
            .collect();
        Self { bindings }
    }
}

impl ShortcutMap {
    pub fn empty() -> Self {
        Self { bindings: vec![] }
    }

    /// Add a binding, e.g. `bind("Mod+Shift+x", EditorAction::Strike)`.
    pub fn bind(&mut self, combo: &str, action: EditorAction) -> Result<(), ParseError> {
        let parsed = parse_key_combo(combo)?;
        self.bindings.push((parsed, action));
        Ok(())
    }

    /// Combo currently bound to an action.
    pub fn combo_for(&self, action: EditorAction) -> Option<&KeyCombo> {
        self.bindings
            .iter()
            .rev()
            .find(|(_, a)| *a == action)
            .map(|(combo, _)| combo)
    }

    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"_"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        &self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<EditorAction> {
        self.bindings
            .iter()
            .rev()
            .find(|(combo, _)| combo.matches(key, ctrl, shift, alt, meta))
            .map(|(_, action)| *action)
    }

    pub fn resolve_event(&self, key: &str, mods: Modifiers) -> Option<EditorAction> {
        self.resolve(key, mods.ctrl, mods.shift, mods.alt, mods.meta)
    }
}
