use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;

use super::generation::Generations;
use super::index::RelationshipIndex;
use super::types::Position;
use super::width::SubtreeWidths;

pub(super) struct Placement<'a> {
    pub(super) positions: HashMap<&'a str, Position>,
}

/// A person with children whose descendants are still being placed.
struct Family<'a> {
    id: &'a str,
    /// First spouse that was free when the family was entered.
    spouse: Option<&'a str>,
    children: Vec<&'a str>,
    next: usize,
    first_center: Option<f32>,
    last_center: f32,
    /// Cursor when the family was entered; nothing it places goes left of it.
    start: f32,
    /// Length of the placement order when the family was entered.
    mark: usize,
}

impl Family<'_> {
    fn record(&mut self, center: f32) {
        if self.first_center.is_none() {
            self.first_center = Some(center);
        }
        self.last_center = center;
    }
}

enum Entered<'a> {
    /// Already positioned, or a leaf placed on the spot.
    Placed(f32),
    Family(Family<'a>),
}

struct PlacementContext<'c, 'a> {
    index: &'c RelationshipIndex<'a>,
    generations: &'c Generations<'a>,
    widths: &'c SubtreeWidths<'a>,
    config: &'c LayoutConfig,
    positions: HashMap<&'a str, Position>,
    placed: HashSet<&'a str>,
    order: Vec<&'a str>,
    /// Right edge of the rightmost box on each generation row.
    row_right: HashMap<usize, f32>,
    cursor: f32,
}

impl<'c, 'a> PlacementContext<'c, 'a> {
    fn generation_of(&self, id: &str) -> usize {
        self.generations.get(id).copied().unwrap_or(0)
    }

    fn row_y(&self, id: &str) -> f32 {
        self.generation_of(id) as f32 * self.config.level_height
    }

    fn set(&mut self, id: &'a str, x: f32) {
        let y = self.row_y(id);
        self.positions.insert(id, Position::new(x, y));
        self.order.push(id);
        let row = self.generation_of(id);
        let edge = self.row_right.entry(row).or_insert(f32::NEG_INFINITY);
        *edge = edge.max(x + self.config.node_width);
    }

    fn center_of(&self, id: &str) -> f32 {
        self.positions.get(id).map_or(0.0, |pos| pos.x) + self.config.node_width / 2.0
    }

    fn free_spouses(&self, id: &str) -> Vec<&'a str> {
        let mut free: Vec<&'a str> = Vec::new();
        for &spouse in self.index.spouses_of(id) {
            if !self.placed.contains(spouse) && !free.contains(&spouse) {
                free.push(spouse);
            }
        }
        free
    }

    fn enter(&mut self, id: &'a str) -> Entered<'a> {
        if self.placed.contains(id) {
            return Entered::Placed(self.center_of(id));
        }
        self.placed.insert(id);

        let spouses = self.free_spouses(id);
        let children = self.index.distinct_children(id);
        if children.is_empty() {
            return Entered::Placed(self.place_leaf(id, &spouses));
        }

        let start = self.cursor;
        let unit = if spouses.is_empty() {
            self.config.node_width
        } else {
            self.config.couple_width()
        };
        let band: f32 = children
            .iter()
            .map(|child| {
                self.widths
                    .get(*child)
                    .copied()
                    .unwrap_or(self.config.node_width)
            })
            .sum::<f32>()
            + self.config.sibling_gap * (children.len() - 1) as f32;
        if unit > band {
            // Children narrower than the couple above them start indented
            // so the centred couple stays inside this subtree's slot.
            self.cursor += (unit - band) / 2.0;
        }

        Entered::Family(Family {
            id,
            spouse: spouses.first().copied(),
            children,
            next: 0,
            first_center: None,
            last_center: 0.0,
            start,
            mark: self.order.len(),
        })
    }

    fn place_leaf(&mut self, id: &'a str, spouses: &[&'a str]) -> f32 {
        let x = self.cursor;
        self.set(id, x);
        let gap = if spouses.is_empty() {
            self.config.sibling_gap
        } else {
            self.config.partner_gap
        };
        self.cursor += self.config.node_width + gap;
        for &spouse in spouses {
            self.placed.insert(spouse);
            let at = self.cursor;
            self.set(spouse, at);
            self.cursor += self.config.node_width + self.config.sibling_gap;
        }
        x + self.config.node_width / 2.0
    }

    fn finish(&mut self, family: Family<'a>) -> f32 {
        let first = family.first_center.unwrap_or(family.last_center);
        let mid = (first + family.last_center) / 2.0;
        // A child's subtree may have claimed the spouse in the meantime.
        let spouse = family.spouse.filter(|spouse| !self.placed.contains(spouse));
        let unit = if spouse.is_some() {
            self.config.couple_width()
        } else {
            self.config.node_width
        };

        let mut left = mid - unit / 2.0;
        if left < family.start {
            let shift = family.start - left;
            for id in &self.order[family.mark..] {
                if let Some(pos) = self.positions.get_mut(id) {
                    pos.x += shift;
                    let row = self.generations.get(id).copied().unwrap_or(0);
                    let edge = self.row_right.entry(row).or_insert(f32::NEG_INFINITY);
                    *edge = edge.max(pos.x + self.config.node_width);
                }
            }
            self.cursor += shift;
            left = family.start;
        }

        // A partner's pull can lift descendants onto this row; the couple
        // goes to their right instead of on top of them.
        let row = self.generation_of(family.id);
        if let Some(&edge) = self.row_right.get(&row) {
            let floor = edge + self.config.sibling_gap;
            if left < floor {
                tracing::debug!(
                    person = family.id,
                    row,
                    shift = floor - left,
                    "layout.placement.row_clamped"
                );
                left = floor;
            }
        }

        self.set(family.id, left);
        if let Some(spouse) = spouse {
            self.placed.insert(spouse);
            self.set(spouse, left + self.config.node_width + self.config.partner_gap);
        }
        self.cursor = self.cursor.max(left + unit + self.config.sibling_gap);
        left + unit / 2.0
    }

    /// Depth-first placement of one root's descendants, leftmost child first.
    /// Runs on an explicit stack of open families.
    fn place_from(&mut self, root: &'a str) {
        let mut stack = match self.enter(root) {
            Entered::Placed(_) => return,
            Entered::Family(family) => vec![family],
        };

        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            if top.next < top.children.len() {
                let child = top.children[top.next];
                top.next += 1;
                match self.enter(child) {
                    Entered::Placed(center) => {
                        if let Some(parent) = stack.last_mut() {
                            parent.record(center);
                        }
                    }
                    Entered::Family(family) => stack.push(family),
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let center = self.finish(done);
            match stack.last_mut() {
                Some(parent) => parent.record(center),
                None => break,
            }
        }
    }
}

/// Assigns every person a top-left position: roots in input order, each
/// root's descendants depth-first, stragglers appended on their own rows.
pub(super) fn place_persons<'a>(
    index: &RelationshipIndex<'a>,
    generations: &Generations<'a>,
    widths: &SubtreeWidths<'a>,
    config: &LayoutConfig,
) -> Placement<'a> {
    let mut ctx = PlacementContext {
        index,
        generations,
        widths,
        config,
        positions: HashMap::with_capacity(index.len()),
        placed: HashSet::with_capacity(index.len()),
        order: Vec::with_capacity(index.len()),
        row_right: HashMap::new(),
        cursor: 0.0,
    };

    for root in index.roots() {
        if !ctx.placed.contains(root) {
            ctx.place_from(root);
        }
    }

    let stragglers: Vec<&'a str> = index.ids().filter(|id| !ctx.placed.contains(id)).collect();
    if !stragglers.is_empty() {
        tracing::debug!(count = stragglers.len(), "layout.placement.stragglers");
    }
    for id in stragglers {
        ctx.placed.insert(id);
        let at = ctx.cursor;
        ctx.set(id, at);
        ctx.cursor += config.node_width + config.sibling_gap;
    }

    Placement {
        positions: ctx.positions,
    }
}
