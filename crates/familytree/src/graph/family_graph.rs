//! Main FamilyGraph interface: person store, edit operations and queries.

use super::index::ChildIndex;
use super::relation::Relationship;
use crate::error::{FamilyTreeError, Result};
use crate::person::{ParentRole, Person, PersonId};
use log::{debug, trace, warn};
use std::collections::BTreeMap;

/// The family graph.
///
/// Holds person facts keyed by id plus the derived [`ChildIndex`]. Every edit
/// marks the graph stale; [`normalize`](Self::normalize) rebuilds the derived
/// state and clears the flag. Queries that read children or inferred spouses
/// see the state of the last normalization.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    title: String,
    description: String,
    persons: BTreeMap<PersonId, Person>,
    children: ChildIndex,
    stale: bool,
}

impl FamilyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with a title and description.
    pub fn with_title(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Graph title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the graph title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Graph description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the graph description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Add a person.
    ///
    /// Returns `false` and leaves the graph untouched if the id is already
    /// taken; the first writer wins.
    pub fn add_person(&mut self, person: Person) -> bool {
        if self.persons.contains_key(&person.id) {
            warn!("Person {} already exists, ignoring duplicate", person.id);
            return false;
        }
        debug!("Adding person: id={}, name={}", person.id, person.name);
        self.persons.insert(person.id.clone(), person);
        self.stale = true;
        true
    }

    /// Get a person by ID.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::PersonNotFound`] if the person doesn't exist.
    pub fn get_person(&self, id: &str) -> Result<&Person> {
        self.persons.get(id).ok_or_else(|| FamilyTreeError::not_found(id))
    }

    /// Get a person by ID, `None` if missing.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.persons.get(id)
    }

    /// Check if a person exists.
    pub fn contains(&self, id: &str) -> bool {
        self.persons.contains_key(id)
    }

    /// Number of persons.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// True if the graph has no persons.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Iterate over persons in id order.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// Iterate over ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.persons.keys().map(String::as_str)
    }

    /// Replace a person's facts.
    ///
    /// The stored id is kept even if `person.id` differs. Returns `false` if no
    /// person has that id.
    pub fn update_person(&mut self, id: &str, mut person: Person) -> bool {
        let Some(slot) = self.persons.get_mut(id) else {
            warn!("Cannot update missing person {id}");
            return false;
        };
        if person.id != id {
            warn!("Updated person carries id {}, keeping {id}", person.id);
            person.id = id.to_string();
        }
        debug!("Updating person: id={id}");
        *slot = person;
        self.stale = true;
        true
    }

    /// Remove a person and every reference to it.
    ///
    /// Clears matching `father_id`/`mother_id`, drops the id from all
    /// `spouse_ids` and from the children index. Returns `false` if missing.
    pub fn remove_person(&mut self, id: &str) -> bool {
        if self.persons.remove(id).is_none() {
            warn!("Cannot remove missing person {id}");
            return false;
        }
        debug!("Removing person: id={id}");

        for person in self.persons.values_mut() {
            if person.father_id.as_deref() == Some(id) {
                trace!("Clearing father of {}", person.id);
                person.father_id = None;
            }
            if person.mother_id.as_deref() == Some(id) {
                trace!("Clearing mother of {}", person.id);
                person.mother_id = None;
            }
            if person.remove_spouse(id) {
                trace!("Removing spouse {id} from {}", person.id);
            }
        }

        self.children.remove_person(id);
        self.stale = true;
        true
    }

    /// Set the father or mother of a child.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::PersonNotFound`] if either person is missing
    /// and [`FamilyTreeError::InvalidOperation`] if both ids are the same.
    pub fn set_parent(&mut self, child_id: &str, parent_id: &str, role: ParentRole) -> Result<()> {
        self.get_person(parent_id)?;
        self.get_person(child_id)?;
        if child_id == parent_id {
            return Err(FamilyTreeError::invalid(format!(
                "{child_id} cannot be their own {role}"
            )));
        }

        debug!("Setting {role} of {child_id} to {parent_id}");
        let child = self.person_mut(child_id)?;
        *child.parent_slot(role) = Some(parent_id.to_string());
        self.stale = true;
        Ok(())
    }

    /// Clear the father or mother of a child.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::PersonNotFound`] if the child is missing.
    pub fn clear_parent(&mut self, child_id: &str, role: ParentRole) -> Result<()> {
        debug!("Clearing {role} of {child_id}");
        let child = self.person_mut(child_id)?;
        *child.parent_slot(role) = None;
        self.stale = true;
        Ok(())
    }

    /// Register two persons as each other's spouse.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::PersonNotFound`] if either person is missing
    /// and [`FamilyTreeError::InvalidOperation`] if both ids are the same.
    pub fn add_spouse(&mut self, a: &str, b: &str) -> Result<()> {
        self.get_person(a)?;
        self.get_person(b)?;
        if a == b {
            return Err(FamilyTreeError::invalid(format!(
                "{a} cannot be their own spouse"
            )));
        }

        debug!("Adding spouse link {a} <-> {b}");
        self.person_mut(a)?.add_spouse(b);
        self.person_mut(b)?.add_spouse(a);
        self.stale = true;
        Ok(())
    }

    /// Remove the spouse link between two persons, in both directions.
    ///
    /// A shared child re-creates the link on the next normalization.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyTreeError::PersonNotFound`] if either person is missing.
    pub fn remove_spouse(&mut self, a: &str, b: &str) -> Result<()> {
        self.get_person(a)?;
        self.get_person(b)?;

        debug!("Removing spouse link {a} <-> {b}");
        self.person_mut(a)?.remove_spouse(b);
        self.person_mut(b)?.remove_spouse(a);
        self.stale = true;
        Ok(())
    }

    /// Rebuild derived relationships.
    ///
    /// See [`crate::relationships::normalize`].
    pub fn normalize(&mut self) -> crate::relationships::NormalizeReport {
        crate::relationships::normalize(self)
    }

    /// True if an edit happened since the last normalization.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The derived children index.
    pub fn child_index(&self) -> &ChildIndex {
        &self.children
    }

    /// Existing parents of a person, father first.
    pub fn parents(&self, id: &str) -> Vec<&str> {
        self.person(id)
            .map(|p| p.parent_ids().filter(|pid| self.contains(pid)).collect())
            .unwrap_or_default()
    }

    /// Children of a person according to the last normalization.
    pub fn children(&self, id: &str) -> &[PersonId] {
        self.children.children_of(id)
    }

    /// Registered spouse ids of a person (may include dangling ids).
    pub fn spouses(&self, id: &str) -> &[PersonId] {
        self.person(id)
            .map(|p| p.spouse_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Persons sharing a father or a mother with `id`, in id order.
    pub fn siblings(&self, id: &str) -> Vec<&str> {
        let Some(person) = self.person(id) else {
            return Vec::new();
        };
        if person.father_id.is_none() && person.mother_id.is_none() {
            return Vec::new();
        }

        self.persons
            .values()
            .filter(|other| other.id != id)
            .filter(|other| {
                (person.father_id.is_some() && person.father_id == other.father_id)
                    || (person.mother_id.is_some() && person.mother_id == other.mother_id)
            })
            .map(|other| other.id.as_str())
            .collect()
    }

    /// Check whether a person has no existing father and no existing mother.
    pub fn is_root(&self, id: &str) -> bool {
        self.person(id)
            .map(|p| p.parent_ids().all(|pid| !self.contains(pid)))
            .unwrap_or(false)
    }

    /// Root persons in id order.
    pub fn roots(&self) -> Vec<&str> {
        self.ids().filter(|id| self.is_root(id)).collect()
    }

    /// Direct relationship of `b` to `a`.
    ///
    /// Returns `None` if either person is missing (unless the ids are equal).
    pub fn relationship(&self, a: &str, b: &str) -> Option<Relationship> {
        if a == b {
            return Some(Relationship::SamePerson);
        }
        let first = self.person(a)?;
        let second = self.person(b)?;

        let label = if first.is_spouse_of(b) {
            Relationship::Spouse
        } else if first.father_id.as_deref() == Some(b) {
            Relationship::Father
        } else if first.mother_id.as_deref() == Some(b) {
            Relationship::Mother
        } else if second.father_id.as_deref() == Some(a) || second.mother_id.as_deref() == Some(a) {
            Relationship::Child
        } else if self.siblings(a).contains(&b) {
            Relationship::Sibling
        } else {
            Relationship::Unrelated
        };
        Some(label)
    }

    /// Create a new query builder for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use familytree::{FamilyGraph, Gender, Person};
    ///
    /// let mut graph = FamilyGraph::new();
    /// graph.add_person(Person::with_id("a", "Anna").gender(Gender::Female));
    /// graph.add_person(Person::with_id("b", "Bert").gender(Gender::Male));
    ///
    /// let women = graph.query().gender(Gender::Female).execute();
    /// assert_eq!(women.len(), 1);
    /// ```
    pub fn query(&self) -> crate::query::PersonQuery<'_> {
        crate::query::PersonQuery::new(self)
    }

    /// Export to Graphviz DOT with default styling.
    pub fn export_dot(&self) -> String {
        crate::export::export_dot(self)
    }

    pub(crate) fn persons_map(&self) -> &BTreeMap<PersonId, Person> {
        &self.persons
    }

    pub(crate) fn person_entry_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.persons.get_mut(id)
    }

    pub(crate) fn install_children(&mut self, index: ChildIndex) {
        self.children = index;
        self.stale = false;
    }

    fn person_mut(&mut self, id: &str) -> Result<&mut Person> {
        self.persons
            .get_mut(id)
            .ok_or_else(|| FamilyTreeError::not_found(id))
    }
}
