//! Export module for handing family graphs and layouts to external tools.
//!
//! - **DOT**: Graphviz rendering of the relationship graph, one rank per generation
//! - **JSON**: computed layout (positions and connector segments) for renderers

pub mod dot;
pub mod json;

pub use dot::{export_dot, export_dot_styled, DotOptions};
pub use json::{export_layout_json, layout_to_value};
