//! Derived children-by-parent index.

use crate::person::{Person, PersonId};
use std::collections::{BTreeMap, HashMap};

/// Children of every parent, derived from the persons' `father_id`/`mother_id`.
///
/// The index is a pure function of the facts it is built from. It is never
/// edited piecemeal except to drop a removed person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildIndex {
    by_parent: HashMap<PersonId, Vec<PersonId>>,
}

impl ChildIndex {
    /// Build the index from a person map.
    ///
    /// Persons are visited in map order; a child is listed under each parent
    /// that exists in `persons`, once, in first-seen order.
    pub fn build(persons: &BTreeMap<PersonId, Person>) -> Self {
        let mut by_parent: HashMap<PersonId, Vec<PersonId>> = HashMap::new();

        for (child_id, person) in persons {
            for parent_id in person.parent_ids() {
                if !persons.contains_key(parent_id) {
                    continue;
                }
                let children = by_parent.entry(parent_id.to_string()).or_default();
                if !children.iter().any(|c| c == child_id) {
                    children.push(child_id.clone());
                }
            }
        }

        Self { by_parent }
    }

    /// Children of a parent, empty if none.
    pub fn children_of(&self, parent_id: &str) -> &[PersonId] {
        self.by_parent
            .get(parent_id)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of parent→child links.
    pub fn link_count(&self) -> usize {
        self.by_parent.values().map(Vec::len).sum()
    }

    /// Number of persons with at least one child.
    pub fn parent_count(&self) -> usize {
        self.by_parent.len()
    }

    pub(crate) fn remove_person(&mut self, id: &str) {
        self.by_parent.remove(id);
        for children in self.by_parent.values_mut() {
            children.retain(|c| c != id);
        }
        self.by_parent.retain(|_, children| !children.is_empty());
    }
}
