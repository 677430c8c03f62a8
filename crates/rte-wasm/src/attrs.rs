//! JSON attribute and config decoding for the bridge.
//!
//! Node attributes arrive as the host editor serialises them: `width` may be
//! a number or a CSS string such as `"400px"`, alignment lives under
//! `data-align`.

use rte_core::config::{DEFAULT_IFRAME_HEIGHT, DEFAULT_IFRAME_WIDTH, DEFAULT_VIDEO_WIDTH};
use rte_core::{Alignment, NodeAttrs, ResizeConfig, parse_length};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAttrs {
    width: Option<Value>,
    height: Option<Value>,
    #[serde(rename = "data-align")]
    align: Option<String>,
    show_caption: Option<bool>,
}

/// A pixel dimension from a number or a `"400px"` string.
pub fn parse_dimension(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v >= 0.0),
        Value::String(s) => match parse_length(s) {
            Ok(v) => Some(v),
            Err(err) => {
                log::debug!("{err}");
                None
            }
        },
        _ => None,
    }
}

/// Decode node attributes. Unknown or malformed fields are ignored.
pub fn parse_attrs(json: &str) -> Result<NodeAttrs, serde_json::Error> {
    let raw: RawAttrs = if json.trim().is_empty() {
        RawAttrs::default()
    } else {
        serde_json::from_str(json)?
    };
    Ok(NodeAttrs {
        width: raw.width.as_ref().and_then(parse_dimension),
        height: raw.height.as_ref().and_then(parse_dimension),
        align: raw.align.as_deref().and_then(Alignment::from_name),
        show_caption: raw.show_caption.unwrap_or(false),
    })
}

/// Resize preset for a media kind, filled from its attributes.
///
/// Missing sizes fall back to the kind's defaults (400 for videos,
/// 640×360 for iframes); a missing alignment means centered.
pub fn preset(kind: &str, attrs: &NodeAttrs) -> Option<(ResizeConfig, NodeAttrs)> {
    let align = attrs.align.unwrap_or(Alignment::Center);
    let mut attrs = attrs.clone();
    let config = match kind {
        "image" => ResizeConfig::image(align),
        "video" => {
            attrs.width = attrs.width.or(Some(DEFAULT_VIDEO_WIDTH));
            ResizeConfig::video(align, attrs.width, attrs.height)
        }
        "iframe" => {
            attrs.width = attrs.width.or(Some(DEFAULT_IFRAME_WIDTH));
            attrs.height = attrs.height.or(Some(DEFAULT_IFRAME_HEIGHT));
            ResizeConfig::iframe(align, attrs.width, attrs.height)
        }
        _ => return None,
    };
    Some((config, attrs))
}
