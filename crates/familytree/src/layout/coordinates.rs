//! Node coordinates.
//!
//! Rows are generations. Y grows by the tallest node of the previous row plus
//! the vertical spacing. The first row is packed left to right; in later rows
//! each person is centered under its placed parents, and a single
//! left-to-right pass then pushes apart neighbours that sit too close.

use super::measure::{resolve_size, NodeMeasure, Point, Size};
use super::options::LayoutOptions;
use crate::graph::FamilyGraph;
use crate::levels::LevelAssignment;
use crate::person::{Person, PersonId};
use log::{debug, trace, warn};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Top-left corner of every placed node, by id.
pub type Positions = BTreeMap<PersonId, Point>;

/// Ordering of persons within a row.
///
/// Persons with a birth order come first, by birth order; then persons with a
/// birth date, by date; ties and everything else by id.
pub fn sibling_order(a: &Person, b: &Person) -> Ordering {
    let key = |p: &Person| {
        (
            p.birth_order.is_none(),
            p.birth_order,
            p.birth_date.is_none(),
            p.birth_date,
        )
    };
    key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
}

/// Ids grouped by level, each row sorted with [`sibling_order`].
///
/// Persons without a level are left out.
pub fn group_by_level(
    graph: &FamilyGraph,
    levels: &LevelAssignment,
) -> BTreeMap<i32, Vec<PersonId>> {
    let mut rows: BTreeMap<i32, Vec<&Person>> = BTreeMap::new();
    for person in graph.persons() {
        match levels.level(&person.id) {
            Some(level) => rows.entry(level).or_default().push(person),
            None => warn!(
                "Person {} has no generation level, leaving it out of the layout",
                person.id
            ),
        }
    }

    rows.into_iter()
        .map(|(level, mut row)| {
            row.sort_by(|a, b| sibling_order(a, b));
            (level, row.into_iter().map(|p| p.id.clone()).collect())
        })
        .collect()
}

/// Compute the top-left position of every person that has a level.
pub fn layout_positions(
    graph: &FamilyGraph,
    levels: &LevelAssignment,
    measure: &dyn NodeMeasure,
    options: &LayoutOptions,
) -> Positions {
    let rows = group_by_level(graph, levels);
    let mut positions = Positions::new();
    let mut row_y = 0.0;

    for (index, (level, row)) in rows.iter().enumerate() {
        let sizes: Vec<Size> = row
            .iter()
            .map(|id| resolve_size(measure, id, options))
            .collect();

        let mut cursor = 0.0;
        for (id, size) in row.iter().zip(&sizes) {
            let centered = if index == 0 {
                None
            } else {
                parent_center(graph, id, &positions, measure, options)
            };
            let x = match centered {
                Some(center) => {
                    trace!("Centering {id} under parents at x={center}");
                    center - size.width / 2.0
                }
                None => cursor,
            };
            positions.insert(id.clone(), Point::new(x, row_y));
            cursor = x + size.width + options.sibling_spacing;
        }

        resolve_overlaps(row, &mut positions, &sizes, options.sibling_spacing);

        let row_height = sizes
            .iter()
            .map(|s| s.height)
            .fold(options.default_node_height, f64::max);
        debug!("Placed level {level}: {} persons at y={row_y}", row.len());
        row_y += row_height + options.vertical_spacing;
    }

    positions
}

/// Mean center-x of the already placed parents of `id`.
fn parent_center(
    graph: &FamilyGraph,
    id: &str,
    positions: &Positions,
    measure: &dyn NodeMeasure,
    options: &LayoutOptions,
) -> Option<f64> {
    let centers: Vec<f64> = graph
        .parents(id)
        .into_iter()
        .filter_map(|parent| {
            positions
                .get(parent)
                .map(|p| p.x + resolve_size(measure, parent, options).width / 2.0)
        })
        .collect();

    if centers.is_empty() {
        None
    } else {
        Some(centers.iter().sum::<f64>() / centers.len() as f64)
    }
}

/// Single left-to-right pass over a row.
///
/// Whenever a node's left edge is closer than `spacing` to the previous
/// node's right edge, that node and every node after it move right by the
/// difference. `sizes` is parallel to `row`. Earlier nodes never move.
pub fn resolve_overlaps(row: &[PersonId], positions: &mut Positions, sizes: &[Size], spacing: f64) {
    let mut shift = 0.0;
    let mut previous_right: Option<f64> = None;

    for (id, size) in row.iter().zip(sizes) {
        let Some(point) = positions.get_mut(id) else {
            continue;
        };
        point.x += shift;
        if let Some(right) = previous_right {
            let min_left = right + spacing;
            if point.x < min_left {
                let offset = min_left - point.x;
                trace!("Shifting {id} and following nodes right by {offset}");
                point.x += offset;
                shift += offset;
            }
        }
        previous_right = Some(point.x + size.width);
    }
}
