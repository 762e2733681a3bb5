//! Query builder for fluent person queries.
//!
//! Provides a fluent interface for filtering the persons of a graph by
//! gender, name, dates and position in the tree.

use crate::graph::FamilyGraph;
use crate::person::{Gender, Person};
use chrono::NaiveDate;

/// A filter predicate that can be applied to persons.
type FilterFn<'a> = Box<dyn Fn(&Person) -> bool + 'a>;

/// Fluent query builder over the persons of a graph.
///
/// Filters are combined with AND. Results come back in id order.
///
/// # Examples
///
/// ```
/// use familytree::{FamilyGraph, Gender, Person};
/// use chrono::NaiveDate;
///
/// let mut graph = FamilyGraph::new();
/// graph.add_person(Person::with_id("a", "Anna Berg").gender(Gender::Female)
///     .born(NaiveDate::from_ymd_opt(1950, 3, 1).unwrap()));
/// graph.add_person(Person::with_id("b", "Bert Berg").gender(Gender::Male)
///     .born(NaiveDate::from_ymd_opt(1948, 7, 9).unwrap()));
///
/// // Find all women named Berg born after 1949
/// let results = graph.query()
///     .gender(Gender::Female)
///     .name_contains("berg")
///     .born_after(NaiveDate::from_ymd_opt(1949, 1, 1).unwrap())
///     .execute();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].id, "a");
/// ```
pub struct PersonQuery<'a> {
    graph: &'a FamilyGraph,
    filters: Vec<FilterFn<'a>>,
    limit_value: Option<usize>,
}

impl<'a> PersonQuery<'a> {
    /// Create a new query builder for the given graph.
    pub fn new(graph: &'a FamilyGraph) -> Self {
        Self {
            graph,
            filters: Vec::new(),
            limit_value: None,
        }
    }

    /// Filter persons by gender.
    pub fn gender(mut self, gender: Gender) -> Self {
        self.filters.push(Box::new(move |person| person.gender == gender));
        self
    }

    /// Filter persons by name containing a substring (case-insensitive).
    pub fn name_contains(mut self, substring: &str) -> Self {
        let substring = substring.to_lowercase();
        self.filters.push(Box::new(move |person| {
            person.name.to_lowercase().contains(&substring)
        }));
        self
    }

    /// Filter persons born strictly after a date. Persons without a birth date never match.
    pub fn born_after(mut self, date: NaiveDate) -> Self {
        self.filters
            .push(Box::new(move |person| person.birth_date.is_some_and(|d| d > date)));
        self
    }

    /// Filter persons born strictly before a date. Persons without a birth date never match.
    pub fn born_before(mut self, date: NaiveDate) -> Self {
        self.filters
            .push(Box::new(move |person| person.birth_date.is_some_and(|d| d < date)));
        self
    }

    /// Filter persons without a death date.
    pub fn living(mut self) -> Self {
        self.filters.push(Box::new(|person| person.death_date.is_none()));
        self
    }

    /// Filter persons with no existing parent.
    pub fn roots_only(mut self) -> Self {
        let graph = self.graph;
        self.filters.push(Box::new(move |person| graph.is_root(&person.id)));
        self
    }

    /// Filter persons with at least one child in the derived index.
    pub fn has_children(mut self) -> Self {
        let graph = self.graph;
        self.filters
            .push(Box::new(move |person| !graph.children(&person.id).is_empty()));
        self
    }

    /// Filter persons using a custom predicate function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use familytree::FamilyGraph;
    /// # let graph = FamilyGraph::new();
    /// // Persons with a note attached
    /// let results = graph.query()
    ///     .custom(|person| person.note.is_some())
    ///     .execute();
    /// # assert!(results.is_empty());
    /// ```
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Person) -> bool + 'a,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Limit the number of results returned.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_value = Some(n);
        self
    }

    /// Execute the query and return matching persons in id order.
    pub fn execute(&self) -> Vec<&'a Person> {
        let limit = self.limit_value.unwrap_or(usize::MAX);
        let graph = self.graph;
        graph
            .persons()
            .filter(|person| self.matches_filters(person))
            .take(limit)
            .collect()
    }

    /// Count the number of matching persons without allocating a result vector.
    ///
    /// The limit is ignored.
    pub fn count(&self) -> usize {
        self.graph
            .persons()
            .filter(|person| self.matches_filters(person))
            .count()
    }

    /// Check if any person matches the query (short-circuits on first match).
    pub fn exists(&self) -> bool {
        self.graph.persons().any(|person| self.matches_filters(person))
    }

    /// Check if a person matches all filters.
    fn matches_filters(&self, person: &Person) -> bool {
        self.filters.iter().all(|filter| filter(person))
    }
}
