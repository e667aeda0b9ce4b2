use crate::config::LayoutConfig;
use crate::layout::{ConnectorStyle, EdgeKind, FamilyLayout, Side, route_edge};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub generation: usize,
    pub subtree_width: f32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub kind: EdgeKind,
    pub relationship: String,
    pub style: ConnectorStyle,
    pub from: String,
    pub to: String,
    pub source_side: Side,
    pub target_side: Side,
    pub spouse: Option<String>,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    /// Snapshot of `layout` with every connector routed against its current
    /// positions.
    pub fn from_layout(layout: &FamilyLayout, config: &LayoutConfig) -> Self {
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.id.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                generation: node.generation,
                subtree_width: node.subtree_width,
                name: node.name.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                kind: edge.kind,
                relationship: edge.relationship.as_str().to_string(),
                style: edge.style,
                from: edge.from.clone(),
                to: edge.to.clone(),
                source_side: edge.source_side,
                target_side: edge.target_side,
                spouse: edge.spouse.clone(),
                points: route_edge(edge, layout, config)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(x, y)| [x, y])
                    .collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &FamilyLayout,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, config);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => println!("{}", dump.to_json_string()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyGraph, Person};
    use crate::layout::compute_layout;

    #[test]
    fn dump_carries_generations_and_routes() {
        let mut graph = FamilyGraph::new();
        graph.add_person(Person::new("p"));
        graph.add_person(Person::new("q"));
        graph.add_person(Person::new("c"));
        graph.add_spouses("p", "q");
        graph.add_parent("p", "c");
        let config = LayoutConfig::default();
        let layout = compute_layout(&graph, &config).unwrap();
        let dump = LayoutDump::from_layout(&layout, &config);

        let child = dump.nodes.iter().find(|node| node.id == "c").unwrap();
        assert_eq!(child.generation, 1);
        let lineage = dump.edges.iter().find(|edge| edge.from == "p").unwrap();
        assert_eq!(lineage.spouse.as_deref(), Some("q"));
        assert_eq!(lineage.points.len(), 5);

        let json = dump.to_json_string().unwrap();
        assert!(json.contains("\"kind\": \"ParentChild\""));
        assert!(json.contains("\"relationship\": \"spouse\""));
    }
}
