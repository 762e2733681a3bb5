//! DOT format export for Graphviz visualization.
//!
//! Persons become filled boxes colored by gender. Parent links are directed
//! edges, spouse links are dashed edges without arrowheads, and every
//! generation is pinned to its own rank.

use crate::graph::FamilyGraph;
use crate::levels::{assign_levels, LevelAssignment, LevelOptions};
use crate::person::{Gender, Person};
use crate::relationships::couple_key;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Options for styling DOT export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotOptions {
    /// Node fill colors by gender (hex color codes)
    pub gender_colors: HashMap<Gender, String>,
    /// Graph layout direction: TB, LR, BT, RL
    pub rankdir: String,
    /// Node shape (box, ellipse, record, ...)
    pub node_shape: String,
    /// Append birth and death dates to node labels
    pub show_dates: bool,
    /// Group each generation into a `rank=same` subgraph
    pub rank_by_generation: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        let mut gender_colors = HashMap::new();
        gender_colors.insert(Gender::Male, "#90CAF9".to_string());
        gender_colors.insert(Gender::Female, "#F48FB1".to_string());
        gender_colors.insert(Gender::Unknown, "#E0E0E0".to_string());

        DotOptions {
            gender_colors,
            rankdir: "TB".to_string(),
            node_shape: "box".to_string(),
            show_dates: true,
            rank_by_generation: true,
        }
    }
}

/// Export graph to Graphviz DOT format
///
/// Levels are assigned with default options.
pub fn export_dot(graph: &FamilyGraph) -> String {
    let levels = assign_levels(graph, &LevelOptions::default());
    export_dot_styled(graph, &levels, &DotOptions::default())
}

/// Export graph to Graphviz DOT format with precomputed levels and custom styling
pub fn export_dot_styled(
    graph: &FamilyGraph,
    levels: &LevelAssignment,
    options: &DotOptions,
) -> String {
    let mut output = String::new();

    // Header
    output.push_str("digraph family_tree {\n");
    output.push_str(&format!("    rankdir={};\n", options.rankdir));
    if !graph.title().is_empty() {
        output.push_str(&format!("    label=\"{}\";\n", escape_dot_label(graph.title())));
    }
    output.push_str(&format!("    node [shape={}, style=filled];\n\n", options.node_shape));

    // Persons
    for person in graph.persons() {
        let color = options
            .gender_colors
            .get(&person.gender)
            .map(|s| s.as_str())
            .unwrap_or("#FFFFFF");

        output.push_str(&format!(
            "    \"{}\" [label=\"{}\", fillcolor=\"{color}\"];\n",
            escape_dot_label(&person.id),
            node_label(person, options.show_dates)
        ));
    }

    // Generations
    if options.rank_by_generation {
        output.push('\n');
        for (level, ids) in levels.generations() {
            let members: Vec<String> = ids
                .iter()
                .filter(|id| graph.contains(id))
                .map(|id| format!("\"{}\";", escape_dot_label(id)))
                .collect();
            if members.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "    {{ rank=same; /* generation {level} */ {} }}\n",
                members.join(" ")
            ));
        }
    }

    output.push('\n');

    // Parent -> child edges
    for person in graph.persons() {
        for parent_id in graph.parents(&person.id) {
            output.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape_dot_label(parent_id),
                escape_dot_label(&person.id)
            ));
        }
    }

    // Spouse edges, one per couple
    let mut seen = HashSet::new();
    for person in graph.persons() {
        for spouse_id in &person.spouse_ids {
            if *spouse_id == person.id || !graph.contains(spouse_id) {
                continue;
            }
            if !seen.insert(couple_key(&person.id, spouse_id)) {
                continue;
            }
            output.push_str(&format!(
                "    \"{}\" -> \"{}\" [dir=none, style=dashed];\n",
                escape_dot_label(&person.id),
                escape_dot_label(spouse_id)
            ));
        }
    }

    output.push_str("}\n");
    output
}

fn node_label(person: &Person, show_dates: bool) -> String {
    let mut label = escape_dot_label(&person.name);
    if show_dates && (person.birth_date.is_some() || person.death_date.is_some()) {
        let birth = person.birth_date.map(|d| d.to_string()).unwrap_or_default();
        let death = person.death_date.map(|d| d.to_string()).unwrap_or_default();
        label.push_str(&format!("\\n{birth} - {death}"));
    }
    label
}

/// Escape special characters for DOT labels and quoted ids
pub fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
