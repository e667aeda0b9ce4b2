use std::collections::{HashMap, VecDeque};

use super::index::RelationshipIndex;

pub(super) type Generations<'a> = HashMap<&'a str, usize>;

/// Multi-source BFS from every root. The first parent to reach a child fixes
/// its generation; persons no root reaches stay at 0.
pub(super) fn bfs_generations<'a>(index: &RelationshipIndex<'a>) -> Generations<'a> {
    let mut generations: Generations<'a> = HashMap::with_capacity(index.len());
    let mut queue = VecDeque::new();
    for root in index.roots() {
        generations.insert(root, 0);
        queue.push_back(root);
    }

    while let Some(current) = queue.pop_front() {
        let depth = generations.get(current).copied().unwrap_or(0);
        for &child in index.children_of(current) {
            if !generations.contains_key(child) {
                generations.insert(child, depth + 1);
                queue.push_back(child);
            }
        }
    }

    for id in index.ids() {
        generations.entry(id).or_insert(0);
    }
    generations
}

/// Pulls both partners of every spouse pair to the shallower generation
/// until nothing moves. Values only decrease and stop at 0, so the loop
/// terminates.
///
/// The pull ignores the partner's own parent edges: someone who married
/// into the family at generation 0 lifts their spouse to generation 0 too.
pub(super) fn equalize_spouses<'a>(index: &RelationshipIndex<'a>, generations: &mut Generations<'a>) {
    let mut passes = 0usize;
    loop {
        let mut changed = false;
        for &(a, b) in index.spouse_pairs() {
            let ga = generations.get(a).copied().unwrap_or(0);
            let gb = generations.get(b).copied().unwrap_or(0);
            if ga != gb {
                let shallow = ga.min(gb);
                generations.insert(a, shallow);
                generations.insert(b, shallow);
                changed = true;
            }
        }
        passes += 1;
        if !changed {
            break;
        }
    }
    tracing::trace!(passes, "layout.generations.equalized");
}

pub(super) fn assign_generations<'a>(index: &RelationshipIndex<'a>) -> Generations<'a> {
    let mut generations = bfs_generations(index);
    equalize_spouses(index, &mut generations);
    generations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyGraph, Person};

    fn graph(ids: &[&str]) -> FamilyGraph {
        let mut graph = FamilyGraph::new();
        for id in ids {
            graph.add_person(Person::new(*id));
        }
        graph
    }

    #[test]
    fn children_sit_one_generation_below_parents() {
        let mut g = graph(&["grandpa", "dad", "kid"]);
        g.add_parent("grandpa", "dad");
        g.add_parent("dad", "kid");
        let index = RelationshipIndex::build(&g);
        let generations = assign_generations(&index);
        assert_eq!(generations["grandpa"], 0);
        assert_eq!(generations["dad"], 1);
        assert_eq!(generations["kid"], 2);
    }

    #[test]
    fn first_reaching_parent_wins() {
        // kid is reached from mom (gen 0) before dad's line gets there.
        let mut g = graph(&["mom", "grandma", "dad", "kid"]);
        g.add_parent("grandma", "dad");
        g.add_parent("mom", "kid");
        g.add_parent("dad", "kid");
        let index = RelationshipIndex::build(&g);
        let generations = bfs_generations(&index);
        assert_eq!(generations["kid"], 1);
        assert_eq!(generations["dad"], 1);
    }

    #[test]
    fn spouse_pulls_partner_to_shallower_generation() {
        let mut g = graph(&["grandma", "son", "wife", "baby"]);
        g.add_parent("grandma", "son");
        g.add_parent("son", "baby");
        g.add_parent("wife", "baby");
        g.add_spouses("son", "wife");
        let index = RelationshipIndex::build(&g);
        let generations = assign_generations(&index);
        assert_eq!(generations["son"], 0);
        assert_eq!(generations["wife"], 0);
        assert_eq!(generations["baby"], 1);
    }

    #[test]
    fn equalization_reaches_fixed_point_along_chains() {
        let mut g = graph(&["r", "a", "b", "c", "d"]);
        g.add_parent("r", "a");
        g.add_parent("a", "b");
        g.add_parent("b", "c");
        g.add_spouses("c", "b");
        g.add_spouses("b", "d");
        let index = RelationshipIndex::build(&g);
        let generations = assign_generations(&index);
        assert_eq!(generations["d"], 0);
        assert_eq!(generations["b"], 0);
        assert_eq!(generations["c"], 0);
    }

    #[test]
    fn unreachable_cycle_defaults_to_zero() {
        let mut g = graph(&["root", "x", "y"]);
        g.add_parent("x", "y");
        g.add_parent("y", "x");
        let index = RelationshipIndex::build(&g);
        let generations = assign_generations(&index);
        assert_eq!(generations["x"], 0);
        assert_eq!(generations["y"], 0);
        assert_eq!(generations["root"], 0);
    }
}
