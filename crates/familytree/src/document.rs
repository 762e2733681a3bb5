//! Document boundary: loading and saving family graphs as JSON.
//!
//! A document maps ids to loose [`PersonRecord`]s. Loading validates each
//! record: invalid fields are dropped, records without a name are skipped, and
//! both are reported as a [`LoadWarning`]. The graph is normalized once at the
//! end. Only a document that cannot be parsed at all is an error.

use crate::error::{FamilyTreeError, Result};
use crate::graph::FamilyGraph;
use crate::person::{PersonId, PersonRecord, ValidationErrors};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Serialized form of a family graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyDocument {
    /// Graph title
    pub title: String,
    /// Graph description
    pub description: String,
    /// Person records keyed by id
    pub persons: BTreeMap<String, PersonRecord>,
}

/// A record that was loaded differently than written, or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// The record's own id differs from its map key; the key was used
    IdMismatch {
        /// Map key, used as the id
        key: String,
        /// Id found inside the record
        record_id: String,
    },
    /// The record has no name and was skipped
    Invalid {
        /// Map key of the record
        key: String,
        /// Field problems
        errors: ValidationErrors,
    },
    /// The person was loaded without its invalid fields
    FieldsDropped {
        /// Map key of the record
        key: String,
        /// Problems of the dropped fields
        errors: ValidationErrors,
    },
    /// A person with the same id was already loaded; the record was skipped
    Duplicate {
        /// The repeated id
        id: PersonId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::IdMismatch { key, record_id } => {
                write!(f, "record '{key}' carries id '{record_id}', using '{key}'")
            }
            LoadWarning::Invalid { key, errors } => write!(f, "record '{key}' skipped: {errors}"),
            LoadWarning::FieldsDropped { key, errors } => {
                write!(f, "record '{key}' loaded without invalid fields: {errors}")
            }
            LoadWarning::Duplicate { id } => write!(f, "duplicate person '{id}' skipped"),
        }
    }
}

/// Result of loading a document.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// The normalized graph
    pub graph: FamilyGraph,
    /// Problems found while loading, in key order
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    /// True if every record loaded as written.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl FamilyGraph {
    /// Build a normalized graph from a document.
    pub fn from_document(document: FamilyDocument) -> LoadReport {
        info!("Loading family document with {} records", document.persons.len());

        let mut graph = FamilyGraph::with_title(document.title, document.description);
        let mut warnings = Vec::new();

        for (key, record) in document.persons {
            let foreign_id = record.id.as_deref().filter(|id| !id.is_empty() && *id != key);
            if let Some(record_id) = foreign_id {
                warn!("Record {key} carries id {record_id}, using the key");
                warnings.push(LoadWarning::IdMismatch {
                    key: key.clone(),
                    record_id: record_id.to_string(),
                });
            }

            let person = match record.into_person(Some(&key)) {
                Ok((person, dropped)) if dropped.is_empty() => person,
                Ok((person, dropped)) => {
                    warn!("Dropping invalid fields of record {key}: {dropped}");
                    warnings.push(LoadWarning::FieldsDropped {
                        key,
                        errors: dropped,
                    });
                    person
                }
                Err(errors) => {
                    warn!("Skipping record {key} without a name: {errors}");
                    warnings.push(LoadWarning::Invalid { key, errors });
                    continue;
                }
            };

            let id = person.id.clone();
            if !graph.add_person(person) {
                warnings.push(LoadWarning::Duplicate { id });
            }
        }

        graph.normalize();
        info!(
            "Loaded {} persons with {} warnings",
            graph.len(),
            warnings.len()
        );
        LoadReport { graph, warnings }
    }

    /// Parse a JSON document and build a normalized graph.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::Parse`] if the text is not a valid document.
    pub fn from_json_str(json: &str) -> Result<LoadReport> {
        let document: FamilyDocument = serde_json::from_str(json)
            .map_err(|e| FamilyTreeError::parse("Invalid family document", Some(e)))?;
        Ok(Self::from_document(document))
    }

    /// Convert to a document, emitting `children_ids` from the derived index.
    pub fn to_document(&self) -> FamilyDocument {
        let persons = self
            .persons()
            .map(|p| (p.id.clone(), p.to_record(self.children(&p.id))))
            .collect();
        FamilyDocument {
            title: self.title().to_string(),
            description: self.description().to_string(),
            persons,
        }
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::Serialization`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_document()).map_err(|e| {
            FamilyTreeError::serialization("Failed to serialize family document", Some(e))
        })
    }
}
