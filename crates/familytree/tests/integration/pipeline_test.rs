//! End-to-end tests: load, normalize, assign levels, lay out and export.

use familytree::export::{export_dot, export_layout_json};
use familytree::helpers::add_child;
use familytree::{
    compute_layout, DefaultSizes, FamilyGraph, FamilyLayout, Gender, LayoutOptions, Person,
    SegmentKind,
};

// G + H have P and Q; T's daughter S married P; P + S have K
const THREE_GENERATIONS: &str = r#"{
  "title": "Three generations",
  "persons": {
    "g": { "name": "Gustav", "gender": "M" },
    "h": { "name": "Hanna", "gender": "F" },
    "t": { "name": "Tove", "gender": "F" },
    "p": { "name": "Paul", "gender": "M", "father_id": "g", "mother_id": "h", "birth_order": 1,
           "spouse_ids": ["s"] },
    "q": { "name": "Quinn", "father_id": "g", "mother_id": "h", "birth_order": 2 },
    "s": { "name": "Sara", "gender": "F", "mother_id": "t" },
    "k": { "name": "Kim", "father_id": "p", "mother_id": "s" }
  }
}"#;

fn load() -> FamilyGraph {
    let report = FamilyGraph::from_json_str(THREE_GENERATIONS).unwrap();
    assert!(report.is_clean());
    report.graph
}

fn layout(graph: &FamilyGraph) -> FamilyLayout {
    compute_layout(graph, &DefaultSizes, &LayoutOptions::default())
}

#[test]
fn test_three_generation_levels() {
    let graph = load();

    let layout = layout(&graph);
    let levels = &layout.levels;

    for id in ["g", "h", "t"] {
        assert_eq!(levels.level(id), Some(0), "{id}");
    }
    for id in ["p", "q", "s"] {
        assert_eq!(levels.level(id), Some(1), "{id}");
    }
    assert_eq!(levels.level("k"), Some(2));
    assert!(levels.conflicts().is_empty());
    // The one-sided spouse entry was completed by the shared child
    assert!(graph.spouses("s").contains(&"p".to_string()));
}

#[test]
fn test_three_generation_positions() {
    let graph = load();

    let layout = layout(&graph);
    let x = |id: &str| layout.positions[id].x;
    let y = |id: &str| layout.positions[id].y;

    assert_eq!((x("g"), x("h"), x("t")), (0.0, 180.0, 360.0));
    assert_eq!((x("p"), x("q"), x("s")), (90.0, 270.0, 540.0));
    assert_eq!(x("k"), 315.0);
    assert_eq!((y("g"), y("p"), y("k")), (0.0, 180.0, 360.0));
}

#[test]
fn test_three_generation_connectors() {
    let graph = load();

    let layout = layout(&graph);
    let spouse_lines: Vec<_> = layout
        .connectors
        .iter()
        .filter(|s| s.kind == SegmentKind::Spouse)
        .collect();

    assert_eq!(spouse_lines.len(), 2);
    let ps = spouse_lines
        .iter()
        .find(|s| s.persons == vec!["p".to_string(), "s".to_string()])
        .unwrap();
    assert_eq!((ps.x1, ps.x2, ps.y1), (240.0, 540.0, 220.0));

    // K hangs straight down from the middle of the P-S line
    let into_k: Vec<_> = layout
        .connectors
        .iter()
        .filter(|s| s.persons == vec!["k".to_string()])
        .collect();
    assert_eq!(into_k.len(), 2);
    assert!(into_k.iter().all(|s| s.x1 == 390.0 && s.x2 == 390.0));
    assert_eq!(into_k[1].y2, 360.0);
}

#[test]
fn test_exports_of_loaded_document() {
    let graph = load();

    let json = export_layout_json(&layout(&graph)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["positions"]["k"]["x"], 315.0);
    assert_eq!(value["positions"].as_object().unwrap().len(), 7);

    let dot = export_dot(&graph);
    assert!(dot.contains("label=\"Three generations\";"));
    assert!(dot.contains("/* generation 2 */ \"k\";"));
    assert_eq!(dot.matches("[dir=none, style=dashed]").count(), 2);
}

#[test]
fn test_edit_then_relayout() {
    let mut graph = load();

    graph.add_person(Person::with_id("r", "Rut").father("q"));
    assert!(graph.is_stale());
    graph.normalize();

    let layout = layout(&graph);

    assert_eq!(layout.levels.level("r"), Some(2));
    // Centered under Q (center 345), then pushed right of K
    assert_eq!(layout.positions["r"].x, 495.0);
    assert_eq!(layout.positions["r"].y, 360.0);
}

#[test]
fn test_remove_person_then_relayout() {
    let mut graph = load();

    assert!(graph.remove_person("s"));
    graph.normalize();
    let layout = layout(&graph);

    assert_eq!(layout.positions.len(), 6);
    assert_eq!(graph.get_person("k").unwrap().mother_id, None);
    assert!(layout.connectors.iter().all(|s| !s.persons.contains(&"s".to_string())));
    // K now hangs from P alone
    assert_eq!(layout.levels.level("k"), Some(2));
    assert_eq!(layout.positions["k"].x, layout.positions["p"].x);
}

#[test]
fn test_helper_built_family_lays_out() {
    let mut graph = FamilyGraph::new();
    let root = graph.add_person(Person::with_id("root", "Root").gender(Gender::Male));
    assert!(root);
    let a = add_child(&mut graph, "A", Gender::Female, Some("root"), None).unwrap();
    let b = add_child(&mut graph, "B", Gender::Male, Some("root"), None).unwrap();
    let grandchild = add_child(&mut graph, "C", Gender::Unknown, None, Some(&a)).unwrap();
    graph.normalize();

    let layout = layout(&graph);

    assert_eq!(layout.levels.level(&b), Some(1));
    assert_eq!(layout.levels.level(&grandchild), Some(2));
    assert_eq!(layout.positions.len(), 4);
    assert!(layout.bounds().is_some());
}

#[test]
fn test_save_reload_gives_same_layout() {
    let graph = load();
    let reloaded = FamilyGraph::from_json_str(&graph.to_json_string().unwrap())
        .unwrap()
        .graph;

    assert_eq!(layout(&graph), layout(&reloaded));
}
