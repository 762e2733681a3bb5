//! Unit tests for the fluent person query builder.

use chrono::NaiveDate;
use familytree::{FamilyGraph, Gender, Person};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Grandparents G1 + G2, their children Anna and Bert, Bert's son Carl,
// and an undated stranger
fn create_family() -> FamilyGraph {
    let mut graph = FamilyGraph::new();
    graph.add_person(
        Person::with_id("g1", "Gustav Lind")
            .gender(Gender::Male)
            .born(date(1920, 5, 1))
            .died(date(1990, 1, 1)),
    );
    graph.add_person(
        Person::with_id("g2", "Greta Lind")
            .gender(Gender::Female)
            .born(date(1922, 8, 14))
            .died(date(2001, 6, 3)),
    );
    graph.add_person(
        Person::with_id("anna", "Anna Lind")
            .gender(Gender::Female)
            .born(date(1950, 3, 1))
            .father("g1")
            .mother("g2"),
    );
    graph.add_person(
        Person::with_id("bert", "Bert Lind")
            .gender(Gender::Male)
            .born(date(1952, 11, 20))
            .father("g1")
            .mother("g2"),
    );
    graph.add_person(
        Person::with_id("carl", "Carl Lind")
            .gender(Gender::Male)
            .born(date(1980, 2, 2))
            .father("bert"),
    );
    graph.add_person(Person::with_id("x", "Xavier Stone"));
    graph.normalize();
    graph
}

fn ids(persons: Vec<&Person>) -> Vec<&str> {
    persons.into_iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_empty_query_returns_everyone_in_id_order() {
    let graph = create_family();

    let results = graph.query().execute();

    assert_eq!(ids(results), vec!["anna", "bert", "carl", "g1", "g2", "x"]);
}

#[test]
fn test_gender_filter() {
    let graph = create_family();

    let results = graph.query().gender(Gender::Male).execute();

    assert_eq!(ids(results), vec!["bert", "carl", "g1"]);
}

#[test]
fn test_name_contains_is_case_insensitive() {
    let graph = create_family();

    assert_eq!(graph.query().name_contains("LIND").count(), 5);
    assert_eq!(ids(graph.query().name_contains("stone").execute()), vec!["x"]);
    assert!(!graph.query().name_contains("nobody").exists());
}

#[test]
fn test_birth_date_bounds_are_strict() {
    let graph = create_family();

    let after = graph.query().born_after(date(1950, 3, 1)).execute();
    assert_eq!(ids(after), vec!["bert", "carl"]);

    let before = graph.query().born_before(date(1950, 3, 1)).execute();
    assert_eq!(ids(before), vec!["g1", "g2"]);
}

#[test]
fn test_undated_persons_never_match_date_filters() {
    let graph = create_family();

    let results = graph
        .query()
        .custom(|p| p.id == "x")
        .born_before(date(3000, 1, 1))
        .execute();

    assert!(results.is_empty());
}

#[test]
fn test_living_filter() {
    let graph = create_family();

    let results = graph.query().living().execute();

    assert_eq!(ids(results), vec!["anna", "bert", "carl", "x"]);
}

#[test]
fn test_structural_filters() {
    let graph = create_family();

    assert_eq!(ids(graph.query().roots_only().execute()), vec!["g1", "g2", "x"]);
    assert_eq!(ids(graph.query().has_children().execute()), vec!["bert", "g1", "g2"]);
}

#[test]
fn test_combined_filters() {
    let graph = create_family();

    let results = graph
        .query()
        .gender(Gender::Female)
        .has_children()
        .born_after(date(1900, 1, 1))
        .execute();

    assert_eq!(ids(results), vec!["g2"]);
}

#[test]
fn test_limit_and_count() {
    let graph = create_family();
    let query = graph.query().gender(Gender::Male).limit(2);

    assert_eq!(ids(query.execute()), vec!["bert", "carl"]);
    // Count ignores the limit
    assert_eq!(query.count(), 3);
    assert!(query.exists());
}

#[test]
fn test_query_on_empty_graph() {
    let graph = FamilyGraph::new();

    assert!(graph.query().execute().is_empty());
    assert_eq!(graph.query().living().count(), 0);
    assert!(!graph.query().exists());
}
