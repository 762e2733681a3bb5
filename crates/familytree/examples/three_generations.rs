//! Three-generation family example.
//!
//! Builds a small family with the helper functions, loads a second one from
//! JSON, and prints levels, positions and connectors for both. The DOT and
//! layout JSON exports are written to the output/ directory.

use familytree::export::{export_dot, export_layout_json};
use familytree::helpers::{add_child, add_couple, add_person, marry};
use familytree::{compute_layout, DefaultSizes, FamilyGraph, Gender, LayoutOptions};
use std::fs;

const DOCUMENT: &str = r#"{
  "title": "The Berg family",
  "persons": {
    "erik":  { "name": "Erik Berg",  "gender": "M", "birth_date": "1931" },
    "ingrid":{ "name": "Ingrid Berg","gender": "F", "birth_date": "1934-02-11" },
    "lars":  { "name": "Lars Berg",  "gender": "M", "father_id": "erik", "mother_id": "ingrid", "birth_order": 1 },
    "maja":  { "name": "Maja Berg",  "gender": "F", "father_id": "erik", "mother_id": "ingrid", "birth_order": 2 },
    "nora":  { "name": "Nora Dahl",  "gender": "F", "spouse_ids": ["lars"] },
    "olle":  { "name": "Olle Berg",  "gender": "M", "father_id": "lars", "mother_id": "nora" }
  }
}"#;

fn print_layout(graph: &FamilyGraph) {
    let layout = compute_layout(graph, &DefaultSizes, &LayoutOptions::default());

    for (level, ids) in layout.levels.generations() {
        let names: Vec<&str> = ids
            .iter()
            .filter_map(|id| graph.person(id).map(|p| p.name.as_str()))
            .collect();
        println!("   Generation {level}: {}", names.join(", "));
    }
    for conflict in layout.levels.conflicts() {
        println!(
            "   ! {} kept level {} ({} proposed {})",
            conflict.person, conflict.kept, conflict.via, conflict.rejected
        );
    }

    println!();
    for (id, point) in &layout.positions {
        let name = graph.person(id).map_or(id.as_str(), |p| p.name.as_str());
        println!("   {name:<12} x={:>7.1} y={:>6.1}", point.x, point.y);
    }

    println!();
    for segment in &layout.connectors {
        println!(
            "   {:<24} ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            segment.kind.to_string(),
            segment.x1,
            segment.y1,
            segment.x2,
            segment.y2
        );
    }
}

fn main() -> familytree::Result<()> {
    println!("=== Building a Family ===\n");

    let mut graph = FamilyGraph::with_title("Built with helpers", "");
    let (anton, berit) = add_couple(&mut graph, "Anton", "Berit")?;
    let carl = add_child(&mut graph, "Carl", Gender::Male, Some(&anton), Some(&berit))?;
    let _dora = add_child(&mut graph, "Dora", Gender::Female, Some(&anton), Some(&berit))?;
    let eva = add_person(&mut graph, "Eva", Gender::Female);
    marry(&mut graph, &carl, &eva)?;
    let _frej = add_child(&mut graph, "Frej", Gender::Male, Some(&carl), Some(&eva))?;

    let report = graph.normalize();
    println!(
        "✓ {} persons, {} child links, {} inferred couples\n",
        graph.len(),
        report.child_links,
        report.inferred_couples.len()
    );
    print_layout(&graph);

    println!("\n=== Loading a Document ===\n");

    let loaded = FamilyGraph::from_json_str(DOCUMENT)?;
    for warning in &loaded.warnings {
        println!("   ! {warning}");
    }
    let graph = loaded.graph;
    println!("✓ Loaded '{}' with {} persons\n", graph.title(), graph.len());
    print_layout(&graph);

    println!("\n=== Exporting ===\n");

    let layout = compute_layout(&graph, &DefaultSizes, &LayoutOptions::default());
    fs::create_dir_all("output").expect("Failed to create output directory");
    fs::write("output/family.dot", export_dot(&graph)).expect("Failed to write DOT file");
    println!("   ✓ Saved to output/family.dot");
    println!("   → Render with: dot -Tpng output/family.dot -o output/family.png");
    fs::write("output/layout.json", export_layout_json(&layout)?)
        .expect("Failed to write layout JSON");
    println!("   ✓ Saved to output/layout.json");

    Ok(())
}
