//! Configuration supplied by the embedding component.
//!
//! Every struct derives `Deserialize` with camelCase field names and
//! per-field defaults, so a page can hand over a partial JSON object.

use crate::model::{Alignment, HandleSet};
use serde::{Deserialize, Serialize};

// ─── Resize ───────────────────────────────────────────────────────────────

/// Constraints for one resizable media element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeConfig {
    /// Smallest width a drag can produce. Default: **96**.
    pub min_width: f64,

    /// Largest width when the container has not been measured. Default: **800**.
    pub max_width: f64,

    /// Optional height bounds for drags that change height independently.
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,

    /// `width / height`. When set, height always follows width.
    pub aspect_ratio: Option<f64>,

    /// Bounds relative to the width at drag start (e.g. `0.5` … `2.0`).
    pub min_ratio: Option<f64>,
    pub max_ratio: Option<f64>,

    /// Alignment of the element; centered elements resize symmetrically.
    pub align: Alignment,

    pub handles: HandleSet,

    /// Flash a `resizing-preview` class on every move. Default: **false**.
    pub enable_preview: bool,

    /// How long the preview class stays on, in milliseconds. Default: **100**.
    pub preview_delay_ms: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_width: 96.0,
            max_width: 800.0,
            min_height: None,
            max_height: None,
            aspect_ratio: None,
            min_ratio: None,
            max_ratio: None,
            align: Alignment::Left,
            handles: HandleSet::Both,
            enable_preview: false,
            preview_delay_ms: 100,
        }
    }
}

/// Width used by video blocks without a usable `width` attribute.
pub const DEFAULT_VIDEO_WIDTH: f64 = 400.0;

/// Default iframe box.
pub const DEFAULT_IFRAME_WIDTH: f64 = 640.0;
pub const DEFAULT_IFRAME_HEIGHT: f64 = 360.0;

impl ResizeConfig {
    /// Images: corner handles, live preview, free height.
    pub fn image(align: Alignment) -> Self {
        Self {
            min_width: 200.0,
            max_width: 800.0,
            align,
            handles: HandleSet::Corners,
            enable_preview: true,
            ..Self::default()
        }
    }

    /// Videos: corner handles with the aspect ratio locked when both
    /// dimensions are known.
    pub fn video(align: Alignment, width: Option<f64>, height: Option<f64>) -> Self {
        let width = width.unwrap_or(DEFAULT_VIDEO_WIDTH);
        let aspect_ratio = height.filter(|h| *h > 0.0).map(|h| width / h);
        Self {
            min_width: 200.0,
            max_width: 800.0,
            aspect_ratio,
            align,
            handles: HandleSet::Corners,
            enable_preview: true,
            ..Self::default()
        }
    }

    /// Iframes: right edge, bottom edge and bottom-right corner, with the
    /// aspect ratio locked. Only the content column bounds the width once
    /// it has been measured.
    pub fn iframe(align: Alignment, width: Option<f64>, height: Option<f64>) -> Self {
        let width = width.unwrap_or(DEFAULT_IFRAME_WIDTH);
        let height = height.unwrap_or(DEFAULT_IFRAME_HEIGHT);
        Self {
            min_width: 200.0,
            min_height: Some(150.0),
            aspect_ratio: (height > 0.0).then(|| width / height),
            align,
            handles: HandleSet::Embed,
            ..Self::default()
        }
    }
}

// ─── Floating menus ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FloatingConfig {
    /// Gap between the menu and the selection, and the minimum distance
    /// from the viewport top. Default: **8**.
    pub padding: f64,

    /// Size assumed before the menu has been measured. Default: **160×40**.
    pub fallback_width: f64,
    pub fallback_height: f64,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            padding: 8.0,
            fallback_width: 160.0,
            fallback_height: 40.0,
        }
    }
}

// ─── Editor features ─────────────────────────────────────────────────────

/// Feature toggles for the editor shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub placeholder: String,
    pub enable_history: bool,
    pub enable_images: bool,
    pub enable_videos: bool,
    pub enable_tables: bool,
    pub enable_code_block: bool,
    pub enable_blockquote: bool,
    pub enable_lists: bool,
    pub enable_text_align: bool,
    pub enable_font_family: bool,
    pub enable_font_size: bool,
    pub enable_typography: bool,
    pub enable_color: bool,
    pub enable_highlight: bool,
    pub enable_iframe: bool,
    pub enable_indent: bool,
    pub enable_line_height: bool,
    pub enable_link: bool,
    pub enable_bubble_menu: bool,
    pub enable_floating_menu: bool,
    pub enable_floating_toolbar: bool,
    pub enable_toolbar: bool,
    pub enable_status_bar: bool,
    pub min_height: String,
    pub max_height: String,
    /// Largest accepted upload, in bytes. Default: 5 MiB.
    pub max_file_size: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: "Write something...".to_string(),
            enable_history: true,
            enable_images: true,
            enable_videos: true,
            enable_tables: true,
            enable_code_block: true,
            enable_blockquote: true,
            enable_lists: true,
            enable_text_align: true,
            enable_font_family: true,
            enable_font_size: true,
            enable_typography: true,
            enable_color: true,
            enable_highlight: true,
            enable_iframe: false,
            enable_indent: true,
            enable_line_height: false,
            enable_link: true,
            enable_bubble_menu: true,
            enable_floating_menu: true,
            enable_floating_toolbar: false,
            enable_toolbar: true,
            enable_status_bar: false,
            min_height: "200px".to_string(),
            max_height: "600px".to_string(),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl EditorConfig {
    /// Whether a media extension is enabled by name.
    pub fn media_enabled(&self, extension: &str) -> bool {
        match extension {
            "image" => self.enable_images,
            "video" => self.enable_videos,
            "iframe" => self.enable_iframe,
            _ => false,
        }
    }
}
