//! Value types shared by the document, the resize engine, and the menus.
//!
//! Everything here is plain data: alignment and handle enums, the
//! attribute bag persisted on media blocks, inline marks, and selections.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Alignment ───────────────────────────────────────────────────────────

/// Horizontal placement of a media block inside the text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Full,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Full => "full",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "full" | "justify" => Some(Alignment::Full),
            _ => None,
        }
    }

    /// Factor applied to horizontal pointer deltas on edge handles.
    ///
    /// A centered block grows on both sides at once, so each pixel of
    /// pointer travel has to add two pixels of width to keep the handle
    /// under the pointer.
    pub fn width_multiplier(self) -> f64 {
        match self {
            Alignment::Center => 2.0,
            _ => 1.0,
        }
    }
}

// ─── Resize handles ──────────────────────────────────────────────────────

/// One of the draggable affordances around a resizable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleKind {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Direction table entry for a handle.
///
/// `sign_x`/`sign_y` are the factors applied to pointer deltas: `-1` when
/// moving the pointer in the positive direction shrinks the element, `0`
/// when the axis is not driven by this handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleAxes {
    pub sign_x: f64,
    pub sign_y: f64,
    pub corner: bool,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::Left,
        HandleKind::Right,
        HandleKind::Top,
        HandleKind::Bottom,
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
    ];

    pub const fn axes(self) -> HandleAxes {
        let (sign_x, sign_y, corner) = match self {
            HandleKind::Left => (-1.0, 0.0, false),
            HandleKind::Right => (1.0, 0.0, false),
            HandleKind::Top => (0.0, -1.0, false),
            HandleKind::Bottom => (0.0, 1.0, false),
            HandleKind::TopLeft => (-1.0, -1.0, true),
            HandleKind::TopRight => (1.0, -1.0, true),
            HandleKind::BottomLeft => (-1.0, 1.0, true),
            HandleKind::BottomRight => (1.0, 1.0, true),
        };
        HandleAxes {
            sign_x,
            sign_y,
            corner,
        }
    }

    /// Whether the handle sits on a vertical edge (`left` / `right`).
    pub fn is_horizontal_edge(self) -> bool {
        matches!(self, HandleKind::Left | HandleKind::Right)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandleKind::Left => "left",
            HandleKind::Right => "right",
            HandleKind::Top => "top",
            HandleKind::Bottom => "bottom",
            HandleKind::TopLeft => "top-left",
            HandleKind::TopRight => "top-right",
            HandleKind::BottomLeft => "bottom-left",
            HandleKind::BottomRight => "bottom-right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        HandleKind::ALL.into_iter().find(|h| h.as_str() == name)
    }
}

/// Which handles a node view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSet {
    /// Left and right edges.
    #[default]
    Both,
    Left,
    Right,
    Corners,
    /// Right edge, bottom edge and bottom-right corner.
    Embed,
    All,
}

impl HandleSet {
    pub fn handles(self) -> SmallVec<[HandleKind; 8]> {
        match self {
            HandleSet::Both => SmallVec::from_slice(&[HandleKind::Left, HandleKind::Right]),
            HandleSet::Left => SmallVec::from_slice(&[HandleKind::Left]),
            HandleSet::Right => SmallVec::from_slice(&[HandleKind::Right]),
            HandleSet::Corners => SmallVec::from_slice(&[
                HandleKind::TopLeft,
                HandleKind::TopRight,
                HandleKind::BottomLeft,
                HandleKind::BottomRight,
            ]),
            HandleSet::Embed => SmallVec::from_slice(&[
                HandleKind::Right,
                HandleKind::Bottom,
                HandleKind::BottomRight,
            ]),
            HandleSet::All => SmallVec::from_slice(&HandleKind::ALL),
        }
    }

    pub fn contains(self, handle: HandleKind) -> bool {
        self.handles().contains(&handle)
    }
}

// ─── Dimensions & attributes ─────────────────────────────────────────────

/// Pixel size proposed to (or persisted by) the document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: Option<f64>) -> Self {
        Self { width, height }
    }
}

/// Attributes persisted on a media block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttrs {
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(rename = "data-align")]
    pub align: Option<Alignment>,
    pub show_caption: bool,
}

impl NodeAttrs {
    pub fn apply(&mut self, patch: &AttrPatch) {
        if let Some(w) = patch.width {
            self.width = Some(w);
        }
        if let Some(h) = patch.height {
            self.height = Some(h);
        }
        if let Some(a) = patch.align {
            self.align = Some(a);
        }
        if let Some(c) = patch.show_caption {
            self.show_caption = c;
        }
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.width.map(|w| Dimensions::new(w, self.height))
    }
}

/// Partial update to [`NodeAttrs`]. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub align: Option<Alignment>,
    pub show_caption: Option<bool>,
}

impl AttrPatch {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.align.is_none()
            && self.show_caption.is_none()
    }

    pub fn size(dims: Dimensions) -> Self {
        Self {
            width: Some(dims.width),
            height: dims.height,
            ..Self::default()
        }
    }

    pub fn align(align: Alignment) -> Self {
        Self {
            align: Some(align),
            ..Self::default()
        }
    }
}

// ─── Inline content ──────────────────────────────────────────────────────

/// Inline formatting applied to a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link { href: String },
}

impl Mark {
    pub fn name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
            Mark::Strike => "strike",
            Mark::Code => "code",
            Mark::Link { .. } => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub marks: SmallVec<[Mark; 2]>,
}

impl TextRun {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            marks: SmallVec::new(),
        }
    }

    pub fn marked(text: &str, mark: Mark) -> Self {
        let mut run = Self::plain(text);
        run.marks.push(mark);
        run
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_mark(&self, name: &str) -> bool {
        self.marks.iter().any(|m| m.name() == name)
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────

/// Block-level content of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Root,
    Paragraph { runs: Vec<TextRun> },
    Image { src: String, alt: String, caption: String },
    Video { src: String },
    Iframe { src: String },
}

impl BlockKind {
    /// Extension name the host editor registers for this block type.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Root => "doc",
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Image { .. } => "image",
            BlockKind::Video { .. } => "video",
            BlockKind::Iframe { .. } => "iframe",
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(
            self,
            BlockKind::Image { .. } | BlockKind::Video { .. } | BlockKind::Iframe { .. }
        )
    }

    pub fn text_len(&self) -> usize {
        match self {
            BlockKind::Paragraph { runs } => runs.iter().map(TextRun::len).sum(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: NodeId,
    pub kind: BlockKind,
    pub attrs: NodeAttrs,
}

impl Block {
    pub fn new(id: NodeId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            attrs: NodeAttrs::default(),
        }
    }

    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Self::new(NodeId::fresh("paragraph"), BlockKind::Paragraph { runs })
    }

    pub fn image(src: &str, attrs: NodeAttrs) -> Self {
        Self {
            id: NodeId::fresh("image"),
            kind: BlockKind::Image {
                src: src.to_string(),
                alt: String::new(),
                caption: String::new(),
            },
            attrs,
        }
    }

    pub fn video(src: &str, attrs: NodeAttrs) -> Self {
        Self {
            id: NodeId::fresh("video"),
            kind: BlockKind::Video {
                src: src.to_string(),
            },
            attrs,
        }
    }

    pub fn iframe(src: &str, attrs: NodeAttrs) -> Self {
        Self {
            id: NodeId::fresh("iframe"),
            kind: BlockKind::Iframe {
                src: src.to_string(),
            },
            attrs,
        }
    }

    /// Width of the block in document positions.
    ///
    /// Paragraphs take an opening and a closing token around their text;
    /// media blocks are atoms of size one.
    pub fn node_size(&self) -> usize {
        match &self.kind {
            BlockKind::Root => 0,
            BlockKind::Paragraph { .. } => self.kind.text_len() + 2,
            _ => 1,
        }
    }

    /// Whether the block carries caption text of its own.
    pub fn has_content(&self) -> bool {
        matches!(&self.kind, BlockKind::Image { caption, .. } if !caption.is_empty())
    }
}

// ─── Selection ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    #[default]
    Text,
    /// A whole block is selected (e.g. after clicking an image).
    Node,
}

/// Document selection as a `[from, to]` position range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
    pub kind: SelectionKind,
}

impl Selection {
    pub fn text(from: usize, to: usize) -> Self {
        Self {
            from: from.min(to),
            to: from.max(to),
            kind: SelectionKind::Text,
        }
    }

    pub fn caret(pos: usize) -> Self {
        Self::text(pos, pos)
    }

    pub fn node(pos: usize, size: usize) -> Self {
        Self {
            from: pos,
            to: pos + size,
            kind: SelectionKind::Node,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn is_node(&self) -> bool {
        self.kind == SelectionKind::Node
    }

    /// True when the selection lies completely before or after `[start, end]`.
    pub fn is_outside(&self, start: usize, end: usize) -> bool {
        self.to < start || self.from > end
    }
}

// ─── Key combos ──────────────────────────────────────────────────────────

/// A parsed keyboard shortcut such as `Mod+Shift+z`.
///
/// `primary` is the platform command key: it matches either Ctrl or Meta.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyCombo {
    pub key: String,
    pub primary: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyCombo {
    /// Match a `KeyboardEvent` against this combo.
    ///
    /// Modifiers must match exactly, except that `primary` accepts either
    /// Ctrl or Meta. The key comparison ignores ASCII case.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        if !self.key.eq_ignore_ascii_case(key) {
            return false;
        }
        if self.shift != shift || self.alt != alt {
            return false;
        }
        if self.primary {
            (ctrl || meta) && (!self.ctrl || ctrl) && (!self.meta || meta)
        } else {
            self.ctrl == ctrl && self.meta == meta
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_table_signs() {
        let tl = HandleKind::TopLeft.axes();
        assert_eq!((tl.sign_x, tl.sign_y, tl.corner), (-1.0, -1.0, true));
        let br = HandleKind::BottomRight.axes();
        assert_eq!((br.sign_x, br.sign_y, br.corner), (1.0, 1.0, true));
        let left = HandleKind::Left.axes();
        assert_eq!((left.sign_x, left.sign_y, left.corner), (-1.0, 0.0, false));
    }

    #[test]
    fn handle_names_roundtrip() {
        for h in HandleKind::ALL {
            assert_eq!(HandleKind::from_name(h.as_str()), Some(h));
        }
        assert_eq!(HandleKind::from_name("middle"), None);
    }

    #[test]
    fn handle_sets() {
        assert_eq!(HandleSet::Corners.handles().len(), 4);
        assert_eq!(HandleSet::All.handles().len(), 8);
        assert!(HandleSet::Both.contains(HandleKind::Left));
        assert!(!HandleSet::Both.contains(HandleKind::TopLeft));
        assert!(!HandleSet::Right.contains(HandleKind::Left));
        assert!(HandleSet::Embed.contains(HandleKind::Bottom));
        assert!(!HandleSet::Embed.contains(HandleKind::Top));
    }

    #[test]
    fn center_alignment_doubles() {
        assert_eq!(Alignment::Center.width_multiplier(), 2.0);
        assert_eq!(Alignment::Left.width_multiplier(), 1.0);
        assert_eq!(Alignment::Full.width_multiplier(), 1.0);
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut attrs = NodeAttrs {
            width: Some(300.0),
            height: Some(200.0),
            align: Some(Alignment::Center),
            show_caption: true,
        };
        attrs.apply(&AttrPatch {
            width: Some(350.0),
            ..AttrPatch::default()
        });
        assert_eq!(attrs.width, Some(350.0));
        assert_eq!(attrs.height, Some(200.0));
        assert_eq!(attrs.align, Some(Alignment::Center));
        assert!(attrs.show_caption);
    }

    #[test]
    fn selection_outside_range() {
        let sel = Selection::text(20, 25);
        assert!(sel.is_outside(5, 10));
        assert!(!sel.is_outside(18, 22));
        assert!(Selection::caret(3).is_empty());
        assert!(Selection::node(4, 1).is_node());
    }

    #[test]
    fn key_combo_primary_accepts_ctrl_or_meta() {
        let combo = KeyCombo {
            key: "z".into(),
            primary: true,
            ..KeyCombo::default()
        };
        assert!(combo.matches("z", true, false, false, false));
        assert!(combo.matches("Z", false, false, false, true));
        assert!(!combo.matches("z", false, false, false, false));
        assert!(!combo.matches("z", true, true, false, false));
    }
}
