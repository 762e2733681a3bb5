//! Relationship normalization.
//!
//! Rebuilds the derived children index from parent references and adds spouse
//! links implied by shared children. Spouse links are only ever added here,
//! never removed, so a link deleted by an edit comes back on the next pass if
//! the two persons still share a child.

use crate::graph::{ChildIndex, FamilyGraph};
use crate::person::PersonId;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Summary of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Number of parent→child links in the rebuilt index
    pub child_links: usize,
    /// Couples (sorted ids) that gained at least one spouse link in this pass
    pub inferred_couples: Vec<(PersonId, PersonId)>,
}

/// Unordered couple key: the two ids in sorted order.
pub fn couple_key(a: &str, b: &str) -> (PersonId, PersonId) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Normalize the graph's derived relationships.
///
/// Runs in O(N) over persons and is idempotent: a second call changes nothing
/// and reports no inferred couples. Dangling parent references are skipped.
pub fn normalize(graph: &mut FamilyGraph) -> NormalizeReport {
    info!("Normalizing relationships for {} persons", graph.len());

    let index = ChildIndex::build(graph.persons_map());

    let mut seen: HashSet<(PersonId, PersonId)> = HashSet::new();
    let mut couples: Vec<(PersonId, PersonId)> = Vec::new();
    for person in graph.persons() {
        let (Some(father), Some(mother)) =
            (person.father_id.as_deref(), person.mother_id.as_deref())
        else {
            continue;
        };
        if father == mother || !graph.contains(father) || !graph.contains(mother) {
            continue;
        }
        if seen.insert(couple_key(father, mother)) {
            couples.push((father.to_string(), mother.to_string()));
        }
    }

    let mut inferred_couples = Vec::new();
    for (father, mother) in couples {
        let father_added = graph
            .person_entry_mut(&father)
            .is_some_and(|p| p.add_spouse(mother.as_str()));
        let mother_added = graph
            .person_entry_mut(&mother)
            .is_some_and(|p| p.add_spouse(father.as_str()));

        if father_added || mother_added {
            debug!("Inferred spouse link {father} <-> {mother} from a shared child");
            inferred_couples.push(couple_key(&father, &mother));
        }
    }

    let report = NormalizeReport {
        child_links: index.link_count(),
        inferred_couples,
    };
    graph.install_children(index);

    info!(
        "Normalization complete: {} child links, {} inferred couples",
        report.child_links,
        report.inferred_couples.len()
    );
    report
}
