//! Convenience helpers for building family graphs.
//!
//! Higher-level shortcuts over the [`FamilyGraph`] edit operations, used to
//! keep tests, demos and benchmarks short.

use crate::error::{FamilyTreeError, Result};
use crate::graph::FamilyGraph;
use crate::person::{Gender, ParentRole, Person, PersonId};

/// Add a person with a generated id.
///
/// # Returns
///
/// The id of the created person.
pub fn add_person(graph: &mut FamilyGraph, name: &str, gender: Gender) -> PersonId {
    let person = Person::new(name).gender(gender);
    let id = person.id.clone();
    graph.add_person(person);
    id
}

/// Add a child and link it to its parents.
///
/// # Arguments
///
/// * `graph` - The family graph
/// * `name` - Child name
/// * `gender` - Child gender
/// * `father` - Optional father id
/// * `mother` - Optional mother id
///
/// # Errors
///
/// Returns [`FamilyTreeError::PersonNotFound`] if a named parent doesn't
/// exist. The child is not added in that case.
pub fn add_child(
    graph: &mut FamilyGraph,
    name: &str,
    gender: Gender,
    father: Option<&str>,
    mother: Option<&str>,
) -> Result<PersonId> {
    if let Some(missing) = [father, mother].into_iter().flatten().find(|id| !graph.contains(id)) {
        return Err(FamilyTreeError::not_found(missing));
    }

    let id = add_person(graph, name, gender);
    if let Some(father) = father {
        graph.set_parent(&id, father, ParentRole::Father)?;
    }
    if let Some(mother) = mother {
        graph.set_parent(&id, mother, ParentRole::Mother)?;
    }
    Ok(id)
}

/// Register two persons as spouses.
///
/// # Errors
///
/// See [`FamilyGraph::add_spouse`].
pub fn marry(graph: &mut FamilyGraph, a: &str, b: &str) -> Result<()> {
    graph.add_spouse(a, b)
}

/// Add a couple and return `(husband, wife)` ids.
pub fn add_couple(
    graph: &mut FamilyGraph,
    husband: &str,
    wife: &str,
) -> Result<(PersonId, PersonId)> {
    let h = add_person(graph, husband, Gender::Male);
    let w = add_person(graph, wife, Gender::Female);
    marry(graph, &h, &w)?;
    Ok((h, w))
}
