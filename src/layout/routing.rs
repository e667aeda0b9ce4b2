use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;

use super::types::{EdgeKind, EdgeLayout, FamilyLayout, Position, Side};

/// Read access to the current position snapshot. Routing only ever reads
/// positions, so anything that can answer "where is this person now" works:
/// a finished layout, a map the caller keeps while dragging, etc.
pub trait PositionSource {
    fn position_of(&self, id: &str) -> Option<Position>;
}

impl PositionSource for FamilyLayout {
    fn position_of(&self, id: &str) -> Option<Position> {
        self.position(id)
    }
}

impl PositionSource for BTreeMap<String, Position> {
    fn position_of(&self, id: &str) -> Option<Position> {
        self.get(id).copied()
    }
}

impl PositionSource for HashMap<String, Position> {
    fn position_of(&self, id: &str) -> Option<Position> {
        self.get(id).copied()
    }
}

impl<T: PositionSource + ?Sized> PositionSource for &T {
    fn position_of(&self, id: &str) -> Option<Position> {
        (**self).position_of(id)
    }
}

/// Point on the box edge where a connector attaches: the middle of `side`.
pub fn anchor_point(pos: Position, side: Side, config: &LayoutConfig) -> (f32, f32) {
    let cx = pos.x + config.node_width / 2.0;
    let cy = pos.y + config.node_height / 2.0;
    match side {
        Side::Top => (cx, pos.y),
        Side::Bottom => (cx, pos.y + config.node_height),
        Side::Left => (pos.x, cy),
        Side::Right => (pos.x + config.node_width, cy),
    }
}

/// Bus connector from a parent's bottom anchor to a child's top anchor.
///
/// The vertical drop leaves from the middle of the couple when the parent's
/// spouse is positioned, so siblings from both partners share one bus.
pub fn route_parent_child(
    parent_anchor: (f32, f32),
    child_anchor: (f32, f32),
    spouse_center_x: Option<f32>,
) -> Vec<(f32, f32)> {
    let (sx, sy) = parent_anchor;
    let (tx, ty) = child_anchor;
    let drop_x = match spouse_center_x {
        Some(spouse_x) => (sx + spouse_x) / 2.0,
        None => sx,
    };
    let bus_y = sy + (ty - sy) * 0.5;
    vec![(sx, sy), (drop_x, sy), (drop_x, bus_y), (tx, bus_y), (tx, ty)]
}

/// Z-shaped elbow between two side anchors, breaking at the horizontal
/// midpoint.
pub fn route_spouse_sibling(source: (f32, f32), target: (f32, f32)) -> Vec<(f32, f32)> {
    let mid_x = (source.0 + target.0) / 2.0;
    vec![source, (mid_x, source.1), (mid_x, target.1), target]
}

/// Sides for a horizontal connector: the left endpoint attaches on its right,
/// the right endpoint on its left. A missing position counts the source as
/// the left one.
pub fn side_hints(source: Option<Position>, target: Option<Position>) -> (Side, Side) {
    let source_is_left = match (source, target) {
        (Some(a), Some(b)) => a.x <= b.x,
        _ => true,
    };
    if source_is_left {
        (Side::Right, Side::Left)
    } else {
        (Side::Left, Side::Right)
    }
}

/// Routes one edge against the given snapshot. `None` when either endpoint
/// has no position.
pub fn route_edge<P: PositionSource + ?Sized>(
    edge: &EdgeLayout,
    positions: &P,
    config: &LayoutConfig,
) -> Option<Vec<(f32, f32)>> {
    let from = positions.position_of(&edge.from)?;
    let to = positions.position_of(&edge.to)?;
    let source = anchor_point(from, edge.source_side, config);
    let target = anchor_point(to, edge.target_side, config);
    match edge.kind {
        EdgeKind::ParentChild => {
            let spouse_center = edge
                .spouse
                .as_deref()
                .and_then(|id| positions.position_of(id))
                .map(|pos| pos.x + config.node_width / 2.0);
            Some(route_parent_child(source, target, spouse_center))
        }
        EdgeKind::SpouseSibling => Some(route_spouse_sibling(source, target)),
    }
}

/// SVG path data for a polyline.
pub fn path_data(points: &[(f32, f32)]) -> String {
    let mut out = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        let cmd = if idx == 0 { 'M' } else { 'L' };
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{cmd} {x:.2} {y:.2}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RelationshipKind;
    use crate::layout::types::ConnectorStyle;

    fn lineage(spouse: Option<&str>) -> EdgeLayout {
        EdgeLayout {
            id: "e1".into(),
            from: "p".into(),
            to: "c".into(),
            relationship: RelationshipKind::Parent,
            kind: EdgeKind::ParentChild,
            style: ConnectorStyle::Lineage,
            source_side: Side::Bottom,
            target_side: Side::Top,
            spouse: spouse.map(str::to_string),
        }
    }

    #[test]
    fn drop_point_sits_between_partners() {
        let points = route_parent_child((0.0, 80.0), (200.0, 160.0), Some(108.0));
        assert_eq!(points.len(), 5);
        assert_eq!(points[1].0, 54.0);
        assert_eq!(points[2].0, 54.0);
        assert_eq!(points[2].1, 120.0);
        assert_eq!(points[3], (200.0, 120.0));
        assert_eq!(points[4], (200.0, 160.0));
    }

    #[test]
    fn drop_point_without_spouse_is_parent_center() {
        let points = route_parent_child((70.0, 80.0), (70.0, 160.0), None);
        assert!(points.iter().all(|(x, _)| *x == 70.0));
    }

    #[test]
    fn elbow_breaks_at_midpoint() {
        let points = route_spouse_sibling((140.0, 40.0), (308.0, 60.0));
        assert_eq!(
            points,
            vec![(140.0, 40.0), (224.0, 40.0), (224.0, 60.0), (308.0, 60.0)]
        );
    }

    #[test]
    fn side_hints_follow_horizontal_order() {
        let left = Some(Position::new(0.0, 0.0));
        let right = Some(Position::new(200.0, 0.0));
        assert_eq!(side_hints(left, right), (Side::Right, Side::Left));
        assert_eq!(side_hints(right, left), (Side::Left, Side::Right));
        assert_eq!(side_hints(None, left), (Side::Right, Side::Left));
    }

    #[test]
    fn spouse_position_is_read_live() {
        let config = LayoutConfig::default();
        let mut positions: BTreeMap<String, Position> = BTreeMap::new();
        positions.insert("p".into(), Position::new(0.0, 0.0));
        positions.insert("s".into(), Position::new(168.0, 0.0));
        positions.insert("c".into(), Position::new(84.0, 160.0));
        let edge = lineage(Some("s"));

        let before = route_edge(&edge, &positions, &config).unwrap();
        assert_eq!(before[1].0, (70.0 + 238.0) / 2.0);

        positions.insert("s".into(), Position::new(400.0, 0.0));
        let after = route_edge(&edge, &positions, &config).unwrap();
        assert_eq!(after[1].0, (70.0 + 470.0) / 2.0);
        assert_eq!(after[0], before[0]);
    }

    #[test]
    fn unpositioned_spouse_falls_back_to_parent_center() {
        let config = LayoutConfig::default();
        let mut positions: HashMap<String, Position> = HashMap::new();
        positions.insert("p".into(), Position::new(0.0, 0.0));
        positions.insert("c".into(), Position::new(0.0, 160.0));
        let points = route_edge(&lineage(Some("gone")), &positions, &config).unwrap();
        assert_eq!(points[1].0, 70.0);
    }

    #[test]
    fn missing_endpoint_routes_nothing() {
        let config = LayoutConfig::default();
        let positions: HashMap<String, Position> = HashMap::new();
        assert!(route_edge(&lineage(None), &positions, &config).is_none());
    }

    #[test]
    fn path_data_formats_polyline() {
        assert_eq!(path_data(&[(0.0, 0.0), (1.5, 2.0)]), "M 0.00 0.00 L 1.50 2.00");
    }
}
