//! # familytree
//!
//! Relationship normalization, generation levels and diagram layout for family trees.
//!
//! ## Core Principles
//!
//! - **Facts Only**: persons store parent and spouse references; children are derived
//! - **Tolerant Input**: dangling references are ignored, cycles never hang the pipeline
//! - **Deterministic Output**: the same graph always lays out to the same geometry
//! - **Zero Rendering**: positions and segments out, painting is up to the caller
//!
//! ## Architecture
//!
//! familytree is organized as a pipeline:
//!
//! ```text
//! Document (JSON records)
//!     ↓
//! FamilyGraph (persons, edits, queries)
//!     ↓
//! normalize (children index, inferred spouses)
//!     ↓
//! assign_levels (generation per person)
//!     ↓
//! layout (coordinates, connector segments)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use familytree::{compute_layout, DefaultSizes, FamilyGraph, LayoutOptions};
//!
//! let json = r#"{
//!     "title": "Smiths",
//!     "persons": {
//!         "f": { "name": "Frank", "gender": "M" },
//!         "m": { "name": "Mary", "gender": "F" },
//!         "c": { "name": "Carl", "father_id": "f", "mother_id": "m", "birth_date": "1990" }
//!     }
//! }"#;
//!
//! let report = FamilyGraph::from_json_str(json).unwrap();
//! let graph = report.graph;
//! assert_eq!(graph.children("f"), ["c".to_string()]);
//! assert!(graph.spouses("f").contains(&"m".to_string()));
//!
//! let layout = compute_layout(&graph, &DefaultSizes, &LayoutOptions::default());
//! assert_eq!(layout.levels.level("c"), Some(1));
//! assert_eq!(layout.positions["c"].y, 180.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod algorithms;
pub mod document;
pub mod error;
pub mod export;
pub mod graph;
pub mod helpers;
pub mod layout;
pub mod levels;
pub mod person;
pub mod query;
pub mod relationships;

// Re-export main types
pub use document::{FamilyDocument, LoadReport, LoadWarning};
pub use error::{FamilyTreeError, Result};
pub use graph::{ChildIndex, FamilyGraph, Relationship};
pub use layout::{
    compute_layout, DefaultSizes, FamilyLayout, LayoutOptions, NodeMeasure, Point, Positions, Rect,
    Segment, SegmentKind, Size,
};
pub use levels::{
    assign_levels, ConflictKind, LevelAssignment, LevelConflict, LevelOptions, SpouseConflictPolicy,
};
pub use person::{parse_date, Gender, ParentRole, Person, PersonId, PersonRecord, ValidationErrors};
pub use query::PersonQuery;
pub use relationships::{normalize, NormalizeReport};
