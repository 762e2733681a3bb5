//! Graph traversal and diagnostics.
//!
//! Provides ancestor/descendant BFS and parent-cycle detection (Tarjan's SCC)
//! over the parent relation. All traversals tolerate cyclic data.

use crate::error::{FamilyTreeError, Result};
use crate::graph::FamilyGraph;
use crate::person::PersonId;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};

/// Which way to walk the parent relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Child to parents
    Up,
    /// Parent to children
    Down,
}

/// Ancestors of a person within `max_depth` generations.
///
/// # Parameters
/// - `graph`: The graph to traverse
/// - `start`: Starting person
/// - `max_depth`: Optional maximum depth (None for unlimited)
///
/// # Returns
/// Ancestor ids in breadth-first order, excluding the start person
///
/// # Errors
///
/// Returns [`FamilyTreeError::PersonNotFound`] if `start` doesn't exist.
pub fn ancestors(
    graph: &FamilyGraph,
    start: &str,
    max_depth: Option<usize>,
) -> Result<Vec<PersonId>> {
    bfs(graph, start, Direction::Up, max_depth)
}

/// Descendants of a person within `max_depth` generations.
///
/// Reads children from the derived index, so the graph should be normalized.
///
/// # Errors
///
/// Returns [`FamilyTreeError::PersonNotFound`] if `start` doesn't exist.
pub fn descendants(
    graph: &FamilyGraph,
    start: &str,
    max_depth: Option<usize>,
) -> Result<Vec<PersonId>> {
    bfs(graph, start, Direction::Down, max_depth)
}

fn bfs(
    graph: &FamilyGraph,
    start: &str,
    direction: Direction,
    max_depth: Option<usize>,
) -> Result<Vec<PersonId>> {
    if !graph.contains(start) {
        return Err(FamilyTreeError::not_found(start));
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        let neighbors: Vec<&str> = match direction {
            Direction::Up => graph.parents(current),
            Direction::Down => graph
                .children(current)
                .iter()
                .map(String::as_str)
                .filter(|id| graph.contains(id))
                .collect(),
        };

        for neighbor in neighbors {
            if visited.insert(neighbor) {
                result.push(neighbor.to_string());
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    Ok(result)
}

/// Find cycles in the parent relation using Tarjan's algorithm.
///
/// A cycle means somebody is, through some chain of parents, their own
/// ancestor. Each returned group is a strongly connected component of more
/// than one person, or a single person listed as their own parent. Groups are
/// sorted internally and ordered by their first id.
pub fn find_parent_cycles(graph: &FamilyGraph) -> Vec<Vec<PersonId>> {
    let mut tarjan = Tarjan::new(graph);

    // Process all persons to handle disconnected components
    for id in graph.ids() {
        if !tarjan.indices.contains_key(id) {
            tarjan.strongconnect(id);
        }
    }

    let mut cycles: Vec<Vec<PersonId>> = tarjan
        .components
        .into_iter()
        .filter(|scc| match scc.as_slice() {
            [single] => graph.parents(single).contains(single),
            _ => true,
        })
        .map(|scc| {
            let mut ids: Vec<PersonId> = scc.into_iter().map(str::to_string).collect();
            ids.sort();
            ids
        })
        .collect();
    cycles.sort();

    if cycles.is_empty() {
        debug!("No parent cycles found");
    } else {
        warn!("Found {} parent cycles", cycles.len());
    }
    cycles
}

struct Tarjan<'g> {
    graph: &'g FamilyGraph,
    index: usize,
    indices: HashMap<&'g str, usize>,
    lowlinks: HashMap<&'g str, usize>,
    stack: Vec<&'g str>,
    on_stack: HashSet<&'g str>,
    components: Vec<Vec<&'g str>>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g FamilyGraph) -> Self {
        Self {
            graph,
            index: 0,
            indices: HashMap::new(),
            lowlinks: HashMap::new(),
            stack: Vec::new(),
            on_stack: HashSet::new(),
            components: Vec::new(),
        }
    }

    /// Iterative Tarjan visit from `root`.
    ///
    /// Uses an explicit frame stack so long parent chains cannot overflow the
    /// call stack.
    fn strongconnect(&mut self, root: &'g str) {
        let graph = self.graph;
        self.visit(root);
        // Each frame is a person and the parents it still has to look at
        let mut frames: Vec<(&'g str, Vec<&'g str>)> = vec![(root, graph.parents(root))];

        while let Some((v, pending)) = frames.last_mut() {
            let v = *v;
            if let Some(w) = pending.pop() {
                if !self.indices.contains_key(w) {
                    self.visit(w);
                    frames.push((w, graph.parents(w)));
                } else if self.on_stack.contains(w) {
                    let w_index = self.indices.get(w).copied().unwrap_or(usize::MAX);
                    self.lower(v, w_index);
                }
                continue;
            }

            frames.pop();
            if let Some((child, _)) = frames.last() {
                let child = *child;
                let v_low = self.lowlinks.get(v).copied().unwrap_or(usize::MAX);
                self.lower(child, v_low);
            }

            // v is the root of a component: pop it off the stack
            if self.lowlinks.get(v) == self.indices.get(v) {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack.remove(w);
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }

    fn visit(&mut self, v: &'g str) {
        self.indices.insert(v, self.index);
        self.lowlinks.insert(v, self.index);
        self.index += 1;
        self.stack.push(v);
        self.on_stack.insert(v);
    }

    fn lower(&mut self, v: &'g str, candidate: usize) {
        if let Some(low) = self.lowlinks.get_mut(v) {
            *low = (*low).min(candidate);
        }
    }
}
