//! Layout configuration.

use crate::levels::LevelOptions;
use serde::{Deserialize, Serialize};

/// Geometry constants used by the layout stages.
///
/// All distances are in the renderer's units (pixels in practice). Missing
/// fields fall back to the defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Width used when a node has no usable measured width
    pub default_node_width: f64,
    /// Height used when a node has no usable measured height, and the
    /// minimum row height
    pub default_node_height: f64,
    /// Gap between the bottom of one generation row and the top of the next
    pub vertical_spacing: f64,
    /// Minimum horizontal gap between neighbours in a row
    pub sibling_spacing: f64,
    /// Distance between a child's top edge and the bus or offset line above it
    pub connector_drop: f64,
    /// Horizontal offsets up to this distance are drawn without an offset segment
    pub center_tolerance: f64,
    /// Options for the level assignment stage
    pub levels: LevelOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            default_node_width: 150.0,
            default_node_height: 80.0,
            vertical_spacing: 100.0,
            sibling_spacing: 30.0,
            connector_drop: 40.0,
            center_tolerance: 1.0,
            levels: LevelOptions::default(),
        }
    }
}

impl LayoutOptions {
    /// Set the default node size.
    pub fn with_default_node_size(mut self, width: f64, height: f64) -> Self {
        self.default_node_width = width;
        self.default_node_height = height;
        self
    }

    /// Set the vertical gap between rows.
    pub fn with_vertical_spacing(mut self, spacing: f64) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the minimum horizontal gap between neighbours.
    pub fn with_sibling_spacing(mut self, spacing: f64) -> Self {
        self.sibling_spacing = spacing;
        self
    }

    /// Set the connector drop length.
    pub fn with_connector_drop(mut self, drop: f64) -> Self {
        self.connector_drop = drop;
        self
    }

    /// Set the centering tolerance.
    pub fn with_center_tolerance(mut self, tolerance: f64) -> Self {
        self.center_tolerance = tolerance;
        self
    }

    /// Set the level assignment options.
    pub fn with_levels(mut self, levels: LevelOptions) -> Self {
        self.levels = levels;
        self
    }
}
