use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::ir::FamilyGraph;

use super::generation::bfs_generations;
use super::index::RelationshipIndex;
use super::types::{FamilyLayout, Position};
use super::{build_layout, Placed};

/// Placeholder layout that never fails: BFS generations without spouse
/// equalisation, each generation row filled left to right in input order.
///
/// Meant for graphs [`compute_layout`](super::compute_layout) rejects.
pub fn compute_grid_layout(graph: &FamilyGraph, config: &LayoutConfig) -> FamilyLayout {
    let index = RelationshipIndex::build(graph);
    let generations = bfs_generations(&index);

    let mut row_fill: HashMap<usize, usize> = HashMap::new();
    let mut positions: HashMap<&str, Position> = HashMap::with_capacity(index.len());
    for id in index.ids() {
        let generation = generations.get(id).copied().unwrap_or(0);
        let slot = row_fill.entry(generation).or_insert(0);
        positions.insert(
            id,
            Position::new(
                *slot as f32 * config.grid_spacing_x,
                generation as f32 * config.grid_spacing_y,
            ),
        );
        *slot += 1;
    }

    tracing::debug!(persons = index.len(), "layout.grid.completed");
    build_layout(
        &index,
        Placed {
            positions: &positions,
            generations: &generations,
            widths: None,
        },
        graph,
        config,
    )
}
