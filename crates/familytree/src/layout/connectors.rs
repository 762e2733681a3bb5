//! Connector line geometry.
//!
//! Derives straight segments from computed positions: one spouse line per
//! couple, and for every family a drop from the parents, an optional offset
//! segment when the children are not centered, a sibling bus for several
//! children and a short drop into each child.

use super::coordinates::Positions;
use super::measure::{resolve_size, NodeMeasure, Rect};
use super::options::LayoutOptions;
use crate::graph::FamilyGraph;
use crate::person::{Person, PersonId};
use crate::relationships::couple_key;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of a connector segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    /// Horizontal line between two spouses
    Spouse,
    /// Vertical drop from parents toward children, or into a child
    ParentChildVertical,
    /// Horizontal offset from the parents' x to the children's middle
    ParentChildHorizontal,
    /// Horizontal bus spanning the children's centers
    SiblingHorizontal,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentKind::Spouse => "spouse",
            SegmentKind::ParentChildVertical => "parent-child-vertical",
            SegmentKind::ParentChildHorizontal => "parent-child-horizontal",
            SegmentKind::SiblingHorizontal => "sibling-horizontal",
        };
        write!(f, "{name}")
    }
}

/// A straight connector segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x
    pub x2: f64,
    /// End y
    pub y2: f64,
    /// Persons the segment belongs to
    pub persons: Vec<PersonId>,
}

impl Segment {
    fn new(
        kind: SegmentKind,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        persons: Vec<PersonId>,
    ) -> Self {
        Self {
            kind,
            x1,
            y1,
            x2,
            y2,
            persons,
        }
    }

    /// True if both ends share the same y.
    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    /// True if both ends share the same x.
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }
}

/// Generate connector segments for positioned persons.
///
/// Persons are visited in id order. Each visit emits the person's not yet
/// drawn spouse lines, each followed by the connectors of that couple's
/// common children, and then the connectors of the children it has without a
/// registered spouse. Persons missing from `positions` are skipped.
pub fn connectors(
    graph: &FamilyGraph,
    positions: &Positions,
    measure: &dyn NodeMeasure,
    options: &LayoutOptions,
) -> Vec<Segment> {
    let rect = |id: &str| {
        positions
            .get(id)
            .map(|p| Rect::from_point_size(*p, resolve_size(measure, id, options)))
    };

    let mut segments = Vec::new();
    let mut drawn_couples: HashSet<(PersonId, PersonId)> = HashSet::new();

    for person in graph.persons() {
        for spouse_id in &person.spouse_ids {
            if *spouse_id == person.id || !graph.contains(spouse_id) {
                continue;
            }
            if !drawn_couples.insert(couple_key(&person.id, spouse_id)) {
                continue;
            }
            let (Some(own), Some(other)) = (rect(&person.id), rect(spouse_id)) else {
                continue;
            };

            let ((left_id, left), (right_id, right)) = if own.x <= other.x {
                ((person.id.as_str(), own), (spouse_id.as_str(), other))
            } else {
                ((spouse_id.as_str(), other), (person.id.as_str(), own))
            };

            let y = left.center_y().min(right.center_y());
            trace!("Spouse line {left_id} - {right_id} at y={y}");
            segments.push(Segment::new(
                SegmentKind::Spouse,
                (left.right(), y),
                (right.x, y),
                vec![left_id.to_string(), right_id.to_string()],
            ));

            let common = common_children(graph, left_id, right_id);
            if !common.is_empty() {
                let origin = ((left.right() + right.x) / 2.0, y);
                family_connectors(&mut segments, &common, origin, &rect, options);
            }
        }

        let single: Vec<&str> = graph
            .children(&person.id)
            .iter()
            .map(String::as_str)
            .filter(|child| is_single_parent_child(graph, person, child))
            .collect();
        if !single.is_empty() {
            if let Some(parent) = rect(&person.id) {
                let origin = (parent.center_x(), parent.bottom());
                family_connectors(&mut segments, &single, origin, &rect, options);
            }
        }
    }

    debug!("Generated {} connector segments", segments.len());
    segments
}

/// Check whether either person lists the other as a spouse.
fn are_spouses(graph: &FamilyGraph, a: &str, b: &str) -> bool {
    graph.person(a).is_some_and(|p| p.is_spouse_of(b))
        || graph.person(b).is_some_and(|p| p.is_spouse_of(a))
}

/// Children whose father and mother are exactly this couple, in index order.
fn common_children<'g>(graph: &'g FamilyGraph, a: &str, b: &str) -> Vec<&'g str> {
    let mut seen = HashSet::new();
    graph
        .children(a)
        .iter()
        .chain(graph.children(b))
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .filter(|id| {
            graph.person(id).is_some_and(|child| {
                let father = child.father_id.as_deref();
                let mother = child.mother_id.as_deref();
                (father == Some(a) && mother == Some(b)) || (father == Some(b) && mother == Some(a))
            })
        })
        .collect()
}

/// True if `child` is drawn from `parent` alone: the other parent is unknown,
/// missing from the graph, or not a registered spouse.
fn is_single_parent_child(graph: &FamilyGraph, parent: &Person, child: &str) -> bool {
    let Some(child) = graph.person(child) else {
        return false;
    };
    let other = if child.father_id.as_deref() == Some(parent.id.as_str()) {
        child.mother_id.as_deref()
    } else {
        child.father_id.as_deref()
    };
    match other {
        None => true,
        Some(other) if other == parent.id => true,
        Some(other) => !(graph.contains(other) && are_spouses(graph, &parent.id, other)),
    }
}

struct ChildAnchor<'a> {
    id: &'a str,
    center_x: f64,
    top: f64,
}

fn family_connectors<F>(
    segments: &mut Vec<Segment>,
    children: &[&str],
    (origin_x, origin_y): (f64, f64),
    rect: &F,
    options: &LayoutOptions,
) where
    F: Fn(&str) -> Option<Rect>,
{
    let mut anchors: Vec<ChildAnchor<'_>> = children
        .iter()
        .filter_map(|&id| {
            rect(id).map(|r| ChildAnchor {
                id,
                center_x: r.center_x(),
                top: r.y,
            })
        })
        .collect();
    if anchors.is_empty() {
        return;
    }
    let placed: Vec<PersonId> = anchors.iter().map(|a| a.id.to_string()).collect();

    if let [child] = anchors.as_slice() {
        let bend_y = child.top - options.connector_drop;
        let persons = vec![child.id.to_string()];

        segments.push(Segment::new(
            SegmentKind::ParentChildVertical,
            (origin_x, origin_y),
            (origin_x, bend_y),
            persons.clone(),
        ));
        if (origin_x - child.center_x).abs() > options.center_tolerance {
            segments.push(Segment::new(
                SegmentKind::ParentChildHorizontal,
                (origin_x, bend_y),
                (child.center_x, bend_y),
                persons.clone(),
            ));
        }
        segments.push(Segment::new(
            SegmentKind::ParentChildVertical,
            (child.center_x, bend_y),
            (child.center_x, child.top),
            persons,
        ));
        return;
    }

    anchors.sort_by(|a, b| a.center_x.total_cmp(&b.center_x));
    let leftmost = anchors[0].center_x;
    let rightmost = anchors[anchors.len() - 1].center_x;
    let middle = (leftmost + rightmost) / 2.0;
    let top = anchors.iter().map(|a| a.top).fold(f64::INFINITY, f64::min);
    let bus_y = top - options.connector_drop;

    segments.push(Segment::new(
        SegmentKind::ParentChildVertical,
        (origin_x, origin_y),
        (origin_x, bus_y),
        placed.clone(),
    ));
    if (origin_x - middle).abs() > options.center_tolerance {
        segments.push(Segment::new(
            SegmentKind::ParentChildHorizontal,
            (origin_x, bus_y),
            (middle, bus_y),
            placed.clone(),
        ));
    }
    segments.push(Segment::new(
        SegmentKind::SiblingHorizontal,
        (leftmost, bus_y),
        (rightmost, bus_y),
        placed,
    ));
    for anchor in &anchors {
        segments.push(Segment::new(
            SegmentKind::ParentChildVertical,
            (anchor.center_x, bus_y),
            (anchor.center_x, anchor.top),
            vec![anchor.id.to_string()],
        ));
    }
}
