use std::collections::{BTreeMap, BTreeSet};

use pb_sim::AreaName;
use serde::Serialize;
use tracing::debug;

use crate::controller::{Controller, FiberHistory};
use crate::language::LEX;

/// How the dependency graph is reconstructed after simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadoutStrategy {
    /// Traverse the language's static read-out table.
    FixedMap,
    /// Traverse the pruned and reduced activated-fiber history.
    FiberBased,
    /// Reserved; selecting it is an explicit error.
    Natural,
}

/// One edge of the parse: `head` governs `dependent` through the relation
/// named after the area the dependent was read out of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub head: &'static str,
    pub dependent: &'static str,
    pub relation: AreaName,
}

/// Keep only history edges the language's read-out table allows. Areas
/// missing from the table contribute nothing.
pub fn prune_history(
    history: &FiberHistory,
    readout: &BTreeMap<AreaName, Vec<AreaName>>,
) -> FiberHistory {
    let mut pruned = FiberHistory::new();
    for (&from, targets) in history {
        let Some(allowed) = readout.get(from) else {
            continue;
        };
        for &to in targets {
            if allowed.contains(&to) {
                pruned.entry(from).or_default().insert(to);
            }
        }
    }
    pruned
}

/// Drop A→B when another target C of A also reaches B: the direct edge is
/// a shortcut implied by the intermediate relation (VERB→ADJ is redundant
/// when VERB→PRED and PRED→ADJ both hold). Edges into the lexical area are
/// never dropped.
pub fn transitive_reduction(adjacency: &mut FiberHistory) {
    let areas: Vec<AreaName> = adjacency.keys().copied().collect();
    for area in areas {
        let targets: Vec<AreaName> = adjacency[area].iter().copied().collect();
        for &b in &targets {
            if b == LEX {
                continue;
            }
            let shortcut = targets
                .iter()
                .any(|&c| c != b && adjacency.get(c).is_some_and(|t| t.contains(b)));
            if shortcut
                && let Some(set) = adjacency.get_mut(area)
            {
                set.remove(b);
            }
        }
    }
}

/// Recursively reconstruct dependency triples from the root area over the
/// given adjacency. Each visited area is projected into its targets, its
/// word identified in the lexical area, and every non-lexical target read
/// back into the lexical area for the dependent word. Unresolved words
/// omit their edge; traversal continues regardless.
pub fn extract(controller: &mut Controller, adjacency: &FiberHistory) -> Vec<Dependency> {
    let mut dependencies = Vec::new();
    let mut visited = BTreeSet::new();
    let root = controller.spec().root;
    walk(controller, root, adjacency, &mut visited, &mut dependencies);
    dependencies
}

fn walk(
    controller: &mut Controller,
    area: AreaName,
    adjacency: &FiberHistory,
    visited: &mut BTreeSet<AreaName>,
    dependencies: &mut Vec<Dependency>,
) {
    if !visited.insert(area) {
        // the reduced graph is expected to be acyclic; guard anyway
        return;
    }
    let Some(targets) = adjacency.get(area) else {
        return;
    };
    if targets.is_empty() {
        return;
    }

    controller.project_for_readout(area, targets);
    let head = controller.resolve_word(LEX);

    for &to in targets {
        if to == LEX {
            continue;
        }
        controller.project_for_readout(to, &BTreeSet::from([LEX]));
        let dependent = controller.resolve_word(LEX);
        match (head, dependent) {
            (Some(head), Some(dependent)) => {
                dependencies.push(Dependency {
                    head,
                    dependent,
                    relation: to,
                });
            }
            _ => debug!(area, to, "word unresolved; dependency omitted"),
        }
    }

    for &to in targets {
        if to != LEX {
            walk(controller, to, adjacency, visited, dependencies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{ADJ, ADVERB, OBJ, PRED, SUBJ, VERB};

    fn history(edges: &[(AreaName, &[AreaName])]) -> FiberHistory {
        edges
            .iter()
            .map(|(from, tos)| (*from, tos.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_prune_keeps_only_allowed_targets() {
        let full = history(&[(VERB, &[LEX, SUBJ, ADVERB]), (SUBJ, &[LEX, VERB])]);
        let readout = BTreeMap::from([(VERB, vec![LEX, SUBJ]), (SUBJ, vec![LEX])]);
        let pruned = prune_history(&full, &readout);
        assert_eq!(pruned[VERB], BTreeSet::from([LEX, SUBJ]));
        assert_eq!(pruned[SUBJ], BTreeSet::from([LEX]));
    }

    #[test]
    fn test_prune_drops_areas_missing_from_table() {
        let full = history(&[(ADVERB, &[LEX]), (VERB, &[LEX])]);
        let readout = BTreeMap::from([(VERB, vec![LEX])]);
        let pruned = prune_history(&full, &readout);
        assert!(!pruned.contains_key(ADVERB));
    }

    #[test]
    fn test_transitive_reduction_removes_shortcut() {
        let mut adj = history(&[(VERB, &[PRED, ADJ]), (PRED, &[ADJ])]);
        transitive_reduction(&mut adj);
        assert_eq!(adj[VERB], BTreeSet::from([PRED]));
        assert_eq!(adj[PRED], BTreeSet::from([ADJ]));
    }

    #[test]
    fn test_transitive_reduction_spares_lex() {
        // LEX is reachable both directly and through SUBJ, but stays
        let mut adj = history(&[(VERB, &[LEX, SUBJ]), (SUBJ, &[LEX])]);
        transitive_reduction(&mut adj);
        assert_eq!(adj[VERB], BTreeSet::from([LEX, SUBJ]));
    }

    #[test]
    fn test_transitive_reduction_keeps_independent_edges() {
        let mut adj = history(&[(VERB, &[SUBJ, OBJ]), (SUBJ, &[LEX]), (OBJ, &[LEX])]);
        transitive_reduction(&mut adj);
        assert_eq!(adj[VERB], BTreeSet::from([SUBJ, OBJ]));
    }

    #[test]
    fn test_dependency_serializes() {
        let dep = Dependency {
            head: "chase",
            dependent: "cats",
            relation: SUBJ,
        };
        let json = serde_json::to_string(&dep).unwrap();
        assert!(json.contains("\"relation\":\"SUBJ\""));
        assert!(json.contains("\"head\":\"chase\""));
    }
}
