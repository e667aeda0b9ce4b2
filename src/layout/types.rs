use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::RelationshipKind;

/// Top-left corner of a person box in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct PersonLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub generation: usize,
    pub subtree_width: f32,
    pub name: String,
    pub detail: Option<String>,
    pub avatar: Option<String>,
}

impl PersonLayout {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Which connector renderer draws an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    ParentChild,
    SpouseSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectorStyle {
    Lineage,
    Spouse,
    Sibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct EdgeLayout {
    pub id: String,
    /// Parent for lineage edges, otherwise the relationship's source.
    pub from: String,
    pub to: String,
    pub relationship: RelationshipKind,
    pub kind: EdgeKind,
    pub style: ConnectorStyle,
    pub source_side: Side,
    pub target_side: Side,
    /// Spouse of `from` whose live position moves the bus drop point.
    pub spouse: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyLayout {
    pub nodes: BTreeMap<String, PersonLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl FamilyLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.nodes.get(id).map(PersonLayout::position)
    }

    /// Moves one person the way a manual drag does. Connectors follow on the
    /// next render because they are routed from live positions.
    pub fn move_person(&mut self, id: &str, x: f32, y: f32) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.x = x;
        node.y = y;
        true
    }

    /// `(min_x, min_y, max_x, max_y)` over the current node boxes.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let mut iter = self.nodes.values();
        let first = iter.next()?;
        let mut bounds = (first.x, first.y, first.x + first.width, first.y + first.height);
        for node in iter {
            bounds.0 = bounds.0.min(node.x);
            bounds.1 = bounds.1.min(node.y);
            bounds.2 = bounds.2.max(node.x + node.width);
            bounds.3 = bounds.3.max(node.y + node.height);
        }
        Some(bounds)
    }

    pub fn positions(&self) -> BTreeMap<String, Position> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.position()))
            .collect()
    }
}
