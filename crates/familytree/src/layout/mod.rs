//! Diagram layout.
//!
//! - [`coordinates`]: row grouping, sibling order, x/y placement, overlap pass
//! - [`connectors`]: spouse, parent-child and sibling bus segments
//! - [`measure`]: sizes, points and the [`NodeMeasure`] seam for renderers
//!
//! [`compute_layout`] runs level assignment, coordinates and connectors in
//! order over a normalized graph.

pub mod connectors;
pub mod coordinates;
pub mod measure;
mod options;

pub use connectors::{connectors, Segment, SegmentKind};
pub use coordinates::{group_by_level, layout_positions, resolve_overlaps, sibling_order, Positions};
pub use measure::{resolve_size, DefaultSizes, NodeMeasure, Point, Rect, Size};
pub use options::LayoutOptions;

use crate::graph::FamilyGraph;
use crate::levels::{assign_levels, LevelAssignment};
use crate::person::PersonId;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// Complete layout of a family graph.
///
/// Serializes to `{ "positions": {...}, "connectors": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FamilyLayout {
    /// Generation levels the layout was built from
    #[serde(skip)]
    pub levels: LevelAssignment,
    /// Top-left corner of every node
    pub positions: Positions,
    /// Resolved node sizes
    #[serde(skip)]
    pub sizes: BTreeMap<PersonId, Size>,
    /// Connector segments in drawing order
    pub connectors: Vec<Segment>,
}

impl FamilyLayout {
    /// Box of a placed node.
    pub fn rect(&self, id: &str) -> Option<Rect> {
        let origin = self.positions.get(id)?;
        let size = self.sizes.get(id)?;
        Some(Rect::from_point_size(*origin, *size))
    }

    /// Enclosing rectangle of all node boxes, `None` if nothing is placed.
    pub fn bounds(&self) -> Option<Rect> {
        self.positions
            .keys()
            .filter_map(|id| self.rect(id))
            .reduce(|acc, r| acc.union(&r))
    }

    /// True if no node was placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out a family graph.
///
/// The graph should be normalized; a stale graph is laid out as it is.
pub fn compute_layout(
    graph: &FamilyGraph,
    measure: &dyn NodeMeasure,
    options: &LayoutOptions,
) -> FamilyLayout {
    if graph.is_empty() {
        info!("Empty family graph, skipping layout");
        return FamilyLayout::default();
    }
    if graph.is_stale() {
        warn!("Laying out a graph with edits since the last normalization");
    }
    info!("Computing layout for {} persons", graph.len());

    let levels = assign_levels(graph, &options.levels);
    let positions = layout_positions(graph, &levels, measure, options);
    let segments = connectors(graph, &positions, measure, options);
    let sizes = positions
        .keys()
        .map(|id| (id.clone(), resolve_size(measure, id, options)))
        .collect();

    info!(
        "Layout complete: {} nodes, {} connector segments",
        positions.len(),
        segments.len()
    );

    FamilyLayout {
        levels,
        positions,
        sizes,
        connectors: segments,
    }
}
