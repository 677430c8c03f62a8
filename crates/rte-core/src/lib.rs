pub mod config;
pub mod document;
pub mod id;
pub mod model;
pub mod parser;

pub use config::{EditorConfig, FloatingConfig, ResizeConfig};
pub use document::{Document, TextMetrics};
pub use id::NodeId;
pub use model::*;
pub use parser::{ParseError, parse_key_combo, parse_length};

// Re-export geometry and graph types so downstream crates share one version
pub use kurbo::{Point, Rect, Size};
pub use petgraph::graph::NodeIndex;
