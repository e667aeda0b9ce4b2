use std::collections::HashMap;

use crate::config::LayoutConfig;

use super::error::LayoutError;
use super::index::RelationshipIndex;

pub(super) type SubtreeWidths<'a> = HashMap<&'a str, f32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Entered and not yet finished, i.e. on the current descent path.
    Active,
    Done,
}

enum Frame<'a> {
    Enter(&'a str),
    Exit(&'a str),
}

/// Width of the box group a person is placed in: alone, or as a couple.
/// Widths are measured before placement, when every spouse is still free.
pub(super) fn unit_width(index: &RelationshipIndex<'_>, id: &str, config: &LayoutConfig) -> f32 {
    if index.spouses_of(id).is_empty() {
        config.node_width
    } else {
        config.couple_width()
    }
}

/// Horizontal room each person's descendants need, memoised per person.
///
/// The descent runs on an explicit stack so deep pedigrees cannot overflow
/// the call stack, and a child that is still on the descent path fails the
/// pass with the loop it closes.
pub(super) fn compute_subtree_widths<'a>(
    index: &RelationshipIndex<'a>,
    config: &LayoutConfig,
) -> Result<SubtreeWidths<'a>, LayoutError> {
    let mut widths: SubtreeWidths<'a> = HashMap::with_capacity(index.len());
    let mut marks: HashMap<&'a str, Mark> = HashMap::with_capacity(index.len());
    let mut path: Vec<&'a str> = Vec::new();
    let mut stack: Vec<Frame<'a>> = Vec::new();

    // Every person is a start point, not only roots: a loop with no root
    // above it would otherwise go unnoticed.
    for start in index.ids() {
        if marks.contains_key(start) {
            continue;
        }
        stack.push(Frame::Enter(start));
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(id) => {
                    if marks.contains_key(id) {
                        continue;
                    }
                    marks.insert(id, Mark::Active);
                    path.push(id);
                    stack.push(Frame::Exit(id));
                    for &child in index.children_of(id).iter().rev() {
                        match marks.get(child) {
                            Some(Mark::Active) => return Err(cycle_error(&path, child)),
                            Some(Mark::Done) => {}
                            None => stack.push(Frame::Enter(child)),
                        }
                    }
                }
                Frame::Exit(id) => {
                    path.pop();
                    marks.insert(id, Mark::Done);
                    let width = measure(index, id, &widths, config);
                    widths.insert(id, width);
                }
            }
        }
    }

    Ok(widths)
}

fn measure(
    index: &RelationshipIndex<'_>,
    id: &str,
    widths: &SubtreeWidths<'_>,
    config: &LayoutConfig,
) -> f32 {
    let unit = unit_width(index, id, config);
    let children = index.distinct_children(id);
    if children.is_empty() {
        return unit;
    }
    let band: f32 = children
        .iter()
        .map(|child| widths.get(*child).copied().unwrap_or(config.node_width))
        .sum::<f32>()
        + config.sibling_gap * (children.len() - 1) as f32;
    unit.max(band)
}

fn cycle_error(path: &[&str], repeated: &str) -> LayoutError {
    let start = path.iter().position(|id| *id == repeated).unwrap_or(0);
    let mut cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
    cycle.push(repeated.to_string());
    LayoutError::Cycle { path: cycle }
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
    fn leaf_width_depends_on_spouse() {
        let mut g = graph(&["single", "a", "b"]);
        g.add_spouses("a", "b");
        let index = RelationshipIndex::build(&g);
        let widths = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap();
        assert_eq!(widths["single"], 140.0);
        assert_eq!(widths["a"], 308.0);
        assert_eq!(widths["b"], 308.0);
    }

    #[test]
    fn parent_width_sums_children_with_gaps() {
        let mut g = graph(&["p", "c1", "c2", "c3"]);
        g.add_parent("p", "c1");
        g.add_parent("p", "c2");
        g.add_parent("p", "c3");
        g.add_parent("p", "c2");
        let index = RelationshipIndex::build(&g);
        let widths = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap();
        assert_eq!(widths["p"], 140.0 * 3.0 + 32.0 * 2.0);
    }

    #[test]
    fn couple_wider_than_single_child() {
        let mut g = graph(&["p", "q", "c"]);
        g.add_spouses("p", "q");
        g.add_parent("p", "c");
        let index = RelationshipIndex::build(&g);
        let widths = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap();
        assert_eq!(widths["p"], 308.0);
        assert_eq!(widths["c"], 140.0);
    }

    #[test]
    fn reports_two_person_cycle() {
        let mut g = graph(&["a", "b"]);
        g.add_parent("a", "b");
        g.add_parent("b", "a");
        let index = RelationshipIndex::build(&g);
        let err = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Cycle {
                path: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn reports_self_parenting() {
        let mut g = graph(&["a"]);
        g.add_parent("a", "a");
        let index = RelationshipIndex::build(&g);
        let err = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Cycle {
                path: vec!["a".into(), "a".into()]
            }
        );
    }

    #[test]
    fn shared_descendants_are_not_cycles() {
        // Diamond: two siblings share a child.
        let mut g = graph(&["top", "left", "right", "bottom"]);
        g.add_parent("top", "left");
        g.add_parent("top", "right");
        g.add_parent("left", "bottom");
        g.add_parent("right", "bottom");
        let index = RelationshipIndex::build(&g);
        assert!(compute_subtree_widths(&index, &LayoutConfig::default()).is_ok());
    }

    #[test]
    fn deep_lineage_does_not_overflow() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("p{i}")).collect();
        let mut g = FamilyGraph::new();
        for id in &ids {
            g.add_person(Person::new(id.as_str()));
        }
        for pair in ids.windows(2) {
            g.add_parent(&pair[0], &pair[1]);
        }
        let index = RelationshipIndex::build(&g);
        let widths = compute_subtree_widths(&index, &LayoutConfig::default()).unwrap();
        assert_eq!(widths["p0"], 140.0);
    }
}
