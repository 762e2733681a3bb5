//! Pairwise relationship labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direct relationship of one person to another, as seen from the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    /// Both ids name the same person
    SamePerson,
    /// The second person is a registered spouse of the first
    Spouse,
    /// The second person is the first's father
    Father,
    /// The second person is the first's mother
    Mother,
    /// The second person is a child of the first
    Child,
    /// The two share a father or a mother
    Sibling,
    /// No direct relationship
    Unrelated,
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Relationship::SamePerson => "same-person",
            Relationship::Spouse => "spouse",
            Relationship::Father => "father",
            Relationship::Mother => "mother",
            Relationship::Child => "child",
            Relationship::Sibling => "sibling",
            Relationship::Unrelated => "unrelated",
        };
        write!(f, "{label}")
    }
}
