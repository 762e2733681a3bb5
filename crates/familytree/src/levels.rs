//! Generation level assignment.
//!
//! Breadth-first propagation from the root persons: children sit one level
//! below their parent, spouses share a level. The first assignment a child
//! receives is kept. Spouses on different levels are pulled to the smaller
//! one. Every person is dequeued at most `visit_cap_factor × N` times, which
//! bounds the work on cyclic data. Persons no root reaches end up on level 0.

use crate::graph::FamilyGraph;
use crate::person::{Person, PersonId};
use log::{info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// How a spouse conflict that lowers the person being processed is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpouseConflictPolicy {
    /// Re-enqueue whichever side was lowered and skip stale queue entries.
    #[default]
    Symmetric,
    /// Lower the current person in place without re-enqueueing it, and never
    /// re-enqueue a person that was already processed.
    Legacy,
}

/// Options for [`assign_levels`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelOptions {
    /// Spouse conflict handling
    pub spouse_conflict: SpouseConflictPolicy,
    /// Per-person dequeue cap as a multiple of the person count
    pub visit_cap_factor: usize,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            spouse_conflict: SpouseConflictPolicy::Symmetric,
            visit_cap_factor: 3,
        }
    }
}

impl LevelOptions {
    /// Options reproducing the legacy asymmetric spouse handling.
    pub fn legacy() -> Self {
        Self {
            spouse_conflict: SpouseConflictPolicy::Legacy,
            ..Default::default()
        }
    }

    /// Set the spouse conflict policy.
    pub fn with_spouse_conflict(mut self, policy: SpouseConflictPolicy) -> Self {
        self.spouse_conflict = policy;
        self
    }

    /// Set the dequeue cap factor (minimum 1).
    pub fn with_visit_cap_factor(mut self, factor: usize) -> Self {
        self.visit_cap_factor = factor.max(1);
        self
    }
}

/// Which relation produced a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A parent proposed a level for an already-assigned child; the existing level was kept.
    Child,
    /// Two spouses disagreed; the person was lowered to the spouse's level.
    Spouse,
}

/// A level disagreement recorded during propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConflict {
    /// Person whose level was contested
    pub person: PersonId,
    /// Level the person ended up with after this conflict
    pub kept: i32,
    /// Level that was rejected or replaced
    pub rejected: i32,
    /// Neighbour (parent or spouse) that caused the conflict
    pub via: PersonId,
    /// Relation through which the conflict arose
    pub kind: ConflictKind,
}

/// Result of [`assign_levels`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelAssignment {
    levels: BTreeMap<PersonId, i32>,
    conflicts: Vec<LevelConflict>,
    defaulted: Vec<PersonId>,
    capped: Vec<PersonId>,
}

impl LevelAssignment {
    /// Level of a person.
    pub fn level(&self, id: &str) -> Option<i32> {
        self.levels.get(id).copied()
    }

    /// All levels by id.
    pub fn levels(&self) -> &BTreeMap<PersonId, i32> {
        &self.levels
    }

    /// Conflicts in the order they were found.
    pub fn conflicts(&self) -> &[LevelConflict] {
        &self.conflicts
    }

    /// Check if any conflict involves `id`.
    pub fn has_conflict(&self, id: &str) -> bool {
        self.conflicts.iter().any(|c| c.person == id)
    }

    /// Persons no root reached, placed on level 0.
    pub fn defaulted(&self) -> &[PersonId] {
        &self.defaulted
    }

    /// Persons that hit the dequeue cap.
    pub fn capped(&self) -> &[PersonId] {
        &self.capped
    }

    /// Deepest level, `None` when empty.
    pub fn max_level(&self) -> Option<i32> {
        self.levels.values().copied().max()
    }

    /// Number of assigned persons.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True if nobody has a level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Ids grouped by level, ascending, ids in id order within a level.
    pub fn generations(&self) -> BTreeMap<i32, Vec<PersonId>> {
        let mut groups: BTreeMap<i32, Vec<PersonId>> = BTreeMap::new();
        for (id, level) in &self.levels {
            groups.entry(*level).or_default().push(id.clone());
        }
        groups
    }
}

/// Assign a generation level to every person of the graph.
///
/// Reads children from the graph's derived index, so the graph should be
/// normalized first.
pub fn assign_levels(graph: &FamilyGraph, options: &LevelOptions) -> LevelAssignment {
    if graph.is_empty() {
        return LevelAssignment::default();
    }
    info!("Assigning generation levels for {} persons", graph.len());

    let mut run = Propagation::new(graph, options);

    for root in graph.roots() {
        run.levels.insert(root.to_string(), 0);
        run.queue.push_back((root.to_string(), 0));
    }

    while let Some((current, level)) = run.queue.pop_front() {
        run.process(current, level);
    }

    let Propagation {
        mut levels,
        conflicts,
        capped,
        ..
    } = run;

    let mut defaulted = Vec::new();
    for id in graph.ids() {
        if !levels.contains_key(id) {
            warn!("Person {id} is unreachable from any root, defaulting to level 0");
            levels.insert(id.to_string(), 0);
            defaulted.push(id.to_string());
        }
    }

    info!(
        "Level assignment complete: {} levels, {} conflicts, {} defaulted",
        levels.values().copied().max().map_or(0, |m| m + 1),
        conflicts.len(),
        defaulted.len()
    );

    LevelAssignment {
        levels,
        conflicts,
        defaulted,
        capped,
    }
}

struct Propagation<'a> {
    graph: &'a FamilyGraph,
    policy: SpouseConflictPolicy,
    cap: usize,
    levels: BTreeMap<PersonId, i32>,
    visits: HashMap<PersonId, usize>,
    queue: VecDeque<(PersonId, i32)>,
    conflicts: Vec<LevelConflict>,
    capped: Vec<PersonId>,
    processed: HashSet<PersonId>,
}

impl<'a> Propagation<'a> {
    fn new(graph: &'a FamilyGraph, options: &LevelOptions) -> Self {
        Self {
            graph,
            policy: options.spouse_conflict,
            cap: graph.len().saturating_mul(options.visit_cap_factor.max(1)),
            levels: BTreeMap::new(),
            visits: HashMap::new(),
            queue: VecDeque::new(),
            conflicts: Vec::new(),
            capped: Vec::new(),
            processed: HashSet::new(),
        }
    }

    fn process(&mut self, current: PersonId, level: i32) {
        let stale = self.levels.get(&current) != Some(&level);
        if self.policy == SpouseConflictPolicy::Symmetric && stale {
            trace!("Skipping stale queue entry {current}@{level}");
            return;
        }

        let visits = self.visits.entry(current.clone()).or_insert(0);
        *visits += 1;
        if *visits > self.cap {
            warn!(
                "Person {current} dequeued {} times, possible parent cycle; \
                 not propagating further",
                *visits
            );
            if !self.capped.contains(&current) {
                self.capped.push(current);
            }
            return;
        }

        let graph = self.graph;
        let Some(person) = graph.person(&current) else {
            return;
        };

        match self.policy {
            SpouseConflictPolicy::Legacy => {
                self.propagate_to_children(&current, level);
                self.propagate_to_spouses(person, level);
            }
            SpouseConflictPolicy::Symmetric => {
                let level = self.propagate_to_spouses(person, level);
                self.propagate_to_children(&current, level);
            }
        }
        self.processed.insert(current);
    }

    fn propagate_to_children(&mut self, current: &str, level: i32) {
        let graph = self.graph;
        let child_level = level + 1;

        for child in graph.children(current) {
            if !graph.contains(child) {
                continue;
            }
            match self.levels.get(child).copied() {
                None => {
                    trace!("Child {child} gets level {child_level} from {current}");
                    self.levels.insert(child.clone(), child_level);
                    self.enqueue(child, child_level);
                }
                Some(existing) if existing != child_level => {
                    warn!(
                        "Level conflict for child {child}: keeping {existing}, \
                         {current} proposed {child_level}"
                    );
                    self.conflicts.push(LevelConflict {
                        person: child.clone(),
                        kept: existing,
                        rejected: child_level,
                        via: current.to_string(),
                        kind: ConflictKind::Child,
                    });
                }
                Some(_) => {}
            }
        }
    }

    /// Returns the level of `person` after spouse adjustments.
    fn propagate_to_spouses(&mut self, person: &Person, level: i32) -> i32 {
        let current = person.id.as_str();
        let mut own_level = level;
        let mut lowered_self = false;

        for spouse in &person.spouse_ids {
            if spouse == current || !self.graph.contains(spouse) {
                continue;
            }
            match self.levels.get(spouse).copied() {
                None => {
                    trace!("Spouse {spouse} gets level {own_level} from {current}");
                    self.levels.insert(spouse.clone(), own_level);
                    self.enqueue(spouse, own_level);
                }
                Some(spouse_level) if spouse_level > own_level => {
                    trace!("Lowering spouse {spouse} from {spouse_level} to {own_level}");
                    self.levels.insert(spouse.clone(), own_level);
                    self.conflicts.push(LevelConflict {
                        person: spouse.clone(),
                        kept: own_level,
                        rejected: spouse_level,
                        via: current.to_string(),
                        kind: ConflictKind::Spouse,
                    });
                    self.enqueue(spouse, own_level);
                }
                Some(spouse_level) if spouse_level < own_level => {
                    trace!(
                        "Lowering {current} from {own_level} to {spouse_level} \
                         to match spouse {spouse}"
                    );
                    self.levels.insert(current.to_string(), spouse_level);
                    self.conflicts.push(LevelConflict {
                        person: current.to_string(),
                        kept: spouse_level,
                        rejected: own_level,
                        via: spouse.clone(),
                        kind: ConflictKind::Spouse,
                    });
                    if self.policy == SpouseConflictPolicy::Symmetric {
                        own_level = spouse_level;
                        lowered_self = true;
                    }
                }
                Some(_) => {}
            }
        }

        if lowered_self {
            self.enqueue(current, own_level);
        }
        own_level
    }

    fn enqueue(&mut self, id: &str, level: i32) {
        if self.policy == SpouseConflictPolicy::Legacy && self.processed.contains(id) {
            trace!("{id} already processed, not re-enqueueing");
            return;
        }
        if self.visits.get(id).copied().unwrap_or(0) < self.cap {
            self.queue.push_back((id.to_string(), level));
        }
    }
}
