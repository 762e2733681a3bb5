//! Core graph types and operations.
//!
//! This module defines the person store:
//! - [`FamilyGraph`]: persons by id, edit operations and relationship queries
//! - [`ChildIndex`]: children derived from parent references
//! - [`Relationship`]: pairwise relationship labels

mod family_graph;
mod index;
mod relation;

pub use family_graph::FamilyGraph;
pub use index::ChildIndex;
pub use relation::Relationship;
