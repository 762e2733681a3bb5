//! Property-based invariant tests over generated families.
//!
//! Families are generated in two flavours: acyclic ones, where parents always
//! come earlier in the id order, and arbitrary ones, where parent and spouse
//! references may point anywhere (self, cycles, anything).
//!
//! 1. Normalization is idempotent.
//! 2. Every child is listed exactly once under each existing parent.
//! 3. Two distinct existing parents of a child end up as mutual spouses.
//! 4. Level assignment terminates and covers every person.
//! 5. In acyclic families, an unconflicted child sits one level below its parents.
//! 6. In acyclic families, spouses share a level.
//! 7. Nodes of a row never overlap.
//! 8. Removing a person scrubs every reference to it.

use familytree::{
    assign_levels, compute_layout, FamilyGraph, LayoutOptions, LevelOptions, Person, Size,
};
use proptest::prelude::*;
use std::collections::HashMap;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Per person: father, mother and spouse picks, each reduced modulo the
/// allowed range.
type FamilySpec = Vec<(Option<u8>, Option<u8>, Option<u8>)>;

fn family_strategy() -> impl Strategy<Value = FamilySpec> {
    prop::collection::vec(
        (
            prop::option::of(any::<u8>()),
            prop::option::of(any::<u8>()),
            prop::option::of(any::<u8>()),
        ),
        1..24,
    )
}

fn id(i: usize) -> String {
    format!("p{i:02}")
}

fn pick(raw: Option<u8>, index: usize, len: usize, acyclic: bool) -> Option<usize> {
    let raw = usize::from(raw?);
    if acyclic {
        (index > 0).then(|| raw % index)
    } else {
        Some(raw % len)
    }
}

fn build(spec: &FamilySpec, acyclic: bool) -> FamilyGraph {
    let len = spec.len();
    let mut graph = FamilyGraph::new();

    for (i, (father, mother, _)) in spec.iter().enumerate() {
        let mut person = Person::with_id(id(i), format!("Person {i}"));
        if let Some(f) = pick(*father, i, len, acyclic) {
            person = person.father(id(f));
        }
        if let Some(m) = pick(*mother, i, len, acyclic) {
            person = person.mother(id(m));
        }
        graph.add_person(person);
    }

    for (i, (_, _, spouse)) in spec.iter().enumerate() {
        if let Some(s) = pick(*spouse, i, len, acyclic) {
            if s != i {
                graph.add_spouse(&id(i), &id(s)).unwrap();
            }
        }
    }

    graph.normalize();
    graph
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Normalization is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalize_idempotent(spec in family_strategy()) {
        let mut graph = build(&spec, false);
        let persons: Vec<Person> = graph.persons().cloned().collect();
        let index = graph.child_index().clone();

        let second = graph.normalize();

        prop_assert!(second.inferred_couples.is_empty());
        prop_assert_eq!(persons, graph.persons().cloned().collect::<Vec<_>>());
        prop_assert_eq!(&index, graph.child_index());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Children index matches the parent references
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn each_child_listed_once_per_parent(spec in family_strategy()) {
        let graph = build(&spec, false);

        for person in graph.persons() {
            for parent in graph.parents(&person.id) {
                let hits = graph.children(parent).iter().filter(|c| **c == person.id).count();
                prop_assert_eq!(hits, 1, "{} under {}", person.id, parent);
            }
        }
        for parent in graph.ids() {
            for child in graph.children(parent) {
                let child = graph.get_person(child).unwrap();
                prop_assert!(child.parent_ids().any(|p| p == parent));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Shared children make couples
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shared_child_parents_are_spouses(spec in family_strategy()) {
        let graph = build(&spec, false);

        for person in graph.persons() {
            let (Some(father), Some(mother)) =
                (person.father_id.as_deref(), person.mother_id.as_deref())
            else {
                continue;
            };
            if father == mother || !graph.contains(father) || !graph.contains(mother) {
                continue;
            }
            prop_assert!(graph.spouses(father).iter().any(|s| s == mother));
            prop_assert!(graph.spouses(mother).iter().any(|s| s == father));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Level assignment terminates on any input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn levels_cover_every_person(spec in family_strategy()) {
        let graph = build(&spec, false);

        for options in [LevelOptions::default(), LevelOptions::legacy()] {
            let levels = assign_levels(&graph, &options);
            prop_assert_eq!(levels.len(), graph.len());
            prop_assert!(levels.levels().values().all(|l| *l >= 0));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Children sit one level below their parents
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unconflicted_child_is_one_below_parent(spec in family_strategy()) {
        let graph = build(&spec, true);

        let levels = assign_levels(&graph, &LevelOptions::default());

        prop_assert!(levels.defaulted().is_empty());
        prop_assert!(levels.capped().is_empty());
        for parent in graph.ids() {
            for child in graph.children(parent) {
                if levels.has_conflict(child) {
                    continue;
                }
                prop_assert_eq!(levels.level(child), levels.level(parent).map(|l| l + 1));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Spouses share a level
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spouses_share_level(spec in family_strategy()) {
        let graph = build(&spec, true);

        let levels = assign_levels(&graph, &LevelOptions::default());

        for person in graph.persons() {
            for spouse in graph.spouses(&person.id) {
                prop_assert_eq!(levels.level(&person.id), levels.level(spouse));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. No overlap within a row
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rows_never_overlap(
        spec in family_strategy(),
        widths in prop::collection::vec(20.0f64..400.0, 24),
    ) {
        let graph = build(&spec, false);
        let sizes: HashMap<String, Size> = (0..spec.len())
            .map(|i| (id(i), Size::new(widths[i], 60.0)))
            .collect();
        let options = LayoutOptions::default();

        let layout = compute_layout(&graph, &sizes, &options);

        for row in layout.levels.generations().values() {
            let mut boxes: Vec<_> = row.iter().filter_map(|id| layout.rect(id)).collect();
            boxes.sort_by(|a, b| a.x.total_cmp(&b.x));
            for pair in boxes.windows(2) {
                prop_assert!(
                    pair[1].x >= pair[0].right() + options.sibling_spacing - 1e-6,
                    "{:?} overlaps {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
        for segment in &layout.connectors {
            prop_assert!(segment.persons.iter().all(|p| graph.contains(p)));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Removal scrubs references
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removal_scrubs_references(spec in family_strategy(), victim in any::<u8>()) {
        let mut graph = build(&spec, false);
        let target = id(usize::from(victim) % spec.len());

        prop_assert!(graph.remove_person(&target));
        graph.normalize();

        prop_assert!(!graph.contains(&target));
        prop_assert!(graph.children(&target).is_empty());
        for person in graph.persons() {
            prop_assert!(person.parent_ids().all(|p| p != target));
            prop_assert!(person.spouse_ids.iter().all(|s| *s != target));
            prop_assert!(graph.children(&person.id).iter().all(|c| *c != target));
        }
    }
}
