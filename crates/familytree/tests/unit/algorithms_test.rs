//! Unit tests for traversal algorithms, cycle detection and builder helpers.

use familytree::algorithms::{ancestors, descendants, find_parent_cycles};
use familytree::helpers::{add_child, add_couple, add_person, marry};
use familytree::{FamilyGraph, FamilyTreeError, Gender, Person};

fn person(id: &str) -> Person {
    Person::with_id(id, id.to_uppercase())
}

// G is the grandfather; P is his son, married to M; K1 and K2 are their children
fn create_lineage() -> FamilyGraph {
    let mut graph = FamilyGraph::new();
    graph.add_person(person("g"));
    graph.add_person(person("p").father("g"));
    graph.add_person(person("m"));
    graph.add_person(person("k1").father("p").mother("m"));
    graph.add_person(person("k2").father("p").mother("m"));
    graph.normalize();
    graph
}

#[test]
fn test_ancestors_breadth_first() {
    let graph = create_lineage();

    let result = ancestors(&graph, "k1", None).unwrap();

    assert_eq!(result, vec!["p".to_string(), "m".to_string(), "g".to_string()]);
}

#[test]
fn test_ancestors_with_depth_limit() {
    let graph = create_lineage();

    let result = ancestors(&graph, "k1", Some(1)).unwrap();
    assert_eq!(result, vec!["p".to_string(), "m".to_string()]);

    assert!(ancestors(&graph, "k1", Some(0)).unwrap().is_empty());
}

#[test]
fn test_descendants() {
    let graph = create_lineage();

    let all = descendants(&graph, "g", None).unwrap();
    assert_eq!(all, vec!["p".to_string(), "k1".to_string(), "k2".to_string()]);

    let direct = descendants(&graph, "g", Some(1)).unwrap();
    assert_eq!(direct, vec!["p".to_string()]);

    assert!(descendants(&graph, "k2", None).unwrap().is_empty());
}

#[test]
fn test_traversal_of_missing_person_fails() {
    let graph = create_lineage();

    assert!(matches!(
        ancestors(&graph, "ghost", None),
        Err(FamilyTreeError::PersonNotFound { .. })
    ));
    assert!(descendants(&graph, "ghost", None).is_err());
}

#[test]
fn test_traversal_terminates_on_cycle() {
    let mut graph = FamilyGraph::new();
    graph.add_person(person("a").father("b"));
    graph.add_person(person("b").father("a"));
    graph.normalize();

    assert_eq!(ancestors(&graph, "a", None).unwrap(), vec!["b".to_string()]);
    assert_eq!(descendants(&graph, "a", None).unwrap(), vec!["b".to_string()]);
}

#[test]
fn test_find_parent_cycles() {
    let mut graph = FamilyGraph::new();
    graph.add_person(person("a").father("b"));
    graph.add_person(person("b").father("c"));
    graph.add_person(person("c").father("a"));
    graph.add_person(person("d").father("a"));
    graph.add_person(person("s").father("s"));
    graph.add_person(person("z"));

    let cycles = find_parent_cycles(&graph);

    assert_eq!(
        cycles,
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["s".to_string()],
        ]
    );
}

#[test]
fn test_find_parent_cycles_on_long_chain() {
    let mut graph = FamilyGraph::new();
    let len = 50_000;
    for i in 0..len {
        let father = format!("p{:05}", (i + 1) % len);
        graph.add_person(Person::with_id(format!("p{i:05}"), "Link").father(father));
    }

    let cycles = find_parent_cycles(&graph);

    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), len);
}

#[test]
fn test_acyclic_graph_has_no_cycles() {
    let graph = create_lineage();
    assert!(find_parent_cycles(&graph).is_empty());
}

#[test]
fn test_helpers_build_linked_family() {
    let mut graph = FamilyGraph::new();

    let (h, w) = add_couple(&mut graph, "Hans", "Wilma").unwrap();
    let kid = add_child(&mut graph, "Kim", Gender::Unknown, Some(&h), Some(&w)).unwrap();
    graph.normalize();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.get_person(&h).unwrap().gender, Gender::Male);
    assert!(graph.spouses(&w).contains(&h));
    assert_eq!(graph.children(&h), [kid.clone()]);
    assert_eq!(graph.parents(&kid), vec![h.as_str(), w.as_str()]);
}

#[test]
fn test_add_child_with_missing_parent_adds_nothing() {
    let mut graph = FamilyGraph::new();
    let f = add_person(&mut graph, "Frank", Gender::Male);

    let result = add_child(&mut graph, "Kid", Gender::Female, Some(&f), Some("ghost"));

    assert!(matches!(result, Err(FamilyTreeError::PersonNotFound { .. })));
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_marry_requires_both_persons() {
    let mut graph = FamilyGraph::new();
    let a = add_person(&mut graph, "A", Gender::Unknown);

    assert!(marry(&mut graph, &a, "ghost").is_err());
    assert!(graph.spouses(&a).is_empty());
}
