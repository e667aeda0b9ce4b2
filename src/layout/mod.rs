mod error;
mod generation;
mod grid;
mod index;
mod placement;
mod routing;
pub(crate) mod types;
mod width;

pub use error::LayoutError;
pub use grid::compute_grid_layout;
pub use routing::{
    PositionSource, anchor_point, path_data, route_edge, route_parent_child, route_spouse_sibling,
    side_hints,
};
pub use types::*;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::LayoutConfig;
use crate::ir::{FamilyGraph, RelationshipKind};

use generation::{Generations, assign_generations};
use index::RelationshipIndex;
use placement::place_persons;
use width::{SubtreeWidths, compute_subtree_widths};

/// Positions every person of `graph` and records one connector per
/// relationship whose endpoints both exist.
///
/// Fails only when parent/child edges form a cycle; see
/// [`compute_grid_layout`] for a picture of such graphs.
pub fn compute_layout(graph: &FamilyGraph, config: &LayoutConfig) -> Result<FamilyLayout, LayoutError> {
    let index = RelationshipIndex::build(graph);
    let generations = assign_generations(&index);
    let widths = compute_subtree_widths(&index, config)?;
    let placement = place_persons(&index, &generations, &widths, config);

    let layout = build_layout(
        &index,
        Placed {
            positions: &placement.positions,
            generations: &generations,
            widths: Some(&widths),
        },
        graph,
        config,
    );
    debug!(
        persons = layout.nodes.len(),
        edges = layout.edges.len(),
        generations = generations.values().max().map_or(0, |g| g + 1),
        width = layout.width,
        height = layout.height,
        "layout.pass.completed"
    );
    Ok(layout)
}

/// Everything a finished pass hands to [`build_layout`].
struct Placed<'p, 'a> {
    positions: &'p HashMap<&'a str, Position>,
    generations: &'p Generations<'a>,
    /// Absent for the grid fallback, which never measures subtrees.
    widths: Option<&'p SubtreeWidths<'a>>,
}

fn build_layout(
    index: &RelationshipIndex<'_>,
    placed: Placed<'_, '_>,
    graph: &FamilyGraph,
    config: &LayoutConfig,
) -> FamilyLayout {
    let mut nodes = BTreeMap::new();
    for person in index.persons() {
        let id = person.id.as_str();
        let pos = placed
            .positions
            .get(id)
            .copied()
            .unwrap_or(Position::new(0.0, 0.0));
        let subtree_width = placed
            .widths
            .and_then(|widths| widths.get(id).copied())
            .unwrap_or(config.node_width);
        nodes.insert(
            person.id.clone(),
            PersonLayout {
                id: person.id.clone(),
                x: pos.x,
                y: pos.y,
                width: config.node_width,
                height: config.node_height,
                generation: placed.generations.get(id).copied().unwrap_or(0),
                subtree_width,
                name: person.display_name(),
                detail: person.lifespan(),
                avatar: person.avatar().map(str::to_string),
            },
        );
    }

    let mut layout = FamilyLayout {
        nodes,
        edges: Vec::new(),
        width: 0.0,
        height: 0.0,
    };
    layout.edges = build_edges(index, graph, &layout);
    if let Some((min_x, min_y, max_x, max_y)) = layout.bounds() {
        layout.width = max_x - min_x;
        layout.height = max_y - min_y;
    }
    layout
}

fn build_edges(index: &RelationshipIndex<'_>, graph: &FamilyGraph, layout: &FamilyLayout) -> Vec<EdgeLayout> {
    let mut edges = Vec::with_capacity(graph.relationships.len());
    for rel in &graph.relationships {
        if !index.contains(&rel.source) || !index.contains(&rel.target) {
            continue;
        }
        if let Some((parent, child)) = rel.parent_child() {
            edges.push(EdgeLayout {
                id: rel.id.clone(),
                from: parent.to_string(),
                to: child.to_string(),
                relationship: rel.kind,
                kind: EdgeKind::ParentChild,
                style: ConnectorStyle::Lineage,
                source_side: Side::Bottom,
                target_side: Side::Top,
                spouse: drop_spouse(index, parent, child).map(str::to_string),
            });
            continue;
        }
        if rel.source == rel.target {
            continue;
        }
        let (source_side, target_side) =
            side_hints(layout.position(&rel.source), layout.position(&rel.target));
        let style = if rel.kind == RelationshipKind::Spouse {
            ConnectorStyle::Spouse
        } else {
            ConnectorStyle::Sibling
        };
        edges.push(EdgeLayout {
            id: rel.id.clone(),
            from: rel.source.clone(),
            to: rel.target.clone(),
            relationship: rel.kind,
            kind: EdgeKind::SpouseSibling,
            style,
            source_side,
            target_side,
            spouse: None,
        });
    }
    edges
}

/// The partner whose position moves a lineage connector's drop point: the
/// parent's spouse who is also a parent of `child`, else the first spouse.
fn drop_spouse<'a>(index: &RelationshipIndex<'a>, parent: &str, child: &str) -> Option<&'a str> {
    let spouses = index.spouses_of(parent);
    let parents = index.parents_of(child);
    spouses
        .iter()
        .copied()
        .find(|spouse| parents.contains(spouse))
        .or_else(|| spouses.first().copied())
}
