use std::collections::HashMap;

use tracing::debug;

use crate::ir::{FamilyGraph, Person, RelationshipKind};

/// Adjacency maps derived from the raw relationship list.
///
/// Lists keep edge input order and keep duplicates; the backend stores every
/// relationship twice (a row and its inverse) and consumers are expected to
/// cope. Sibling edges are not indexed because placement never uses them.
pub(super) struct RelationshipIndex<'a> {
    persons: Vec<&'a Person>,
    lookup: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<&'a str>>,
    parents: HashMap<&'a str, Vec<&'a str>>,
    spouses: HashMap<&'a str, Vec<&'a str>>,
    spouse_pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> RelationshipIndex<'a> {
    pub(super) fn build(graph: &'a FamilyGraph) -> Self {
        let mut persons = Vec::with_capacity(graph.persons.len());
        let mut lookup = HashMap::with_capacity(graph.persons.len());
        for person in &graph.persons {
            if lookup.contains_key(person.id.as_str()) {
                debug!(person = %person.id, "layout.person.duplicate");
                continue;
            }
            lookup.insert(person.id.as_str(), persons.len());
            persons.push(person);
        }

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut spouses: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut spouse_pairs = Vec::new();

        for rel in &graph.relationships {
            if !lookup.contains_key(rel.source.as_str()) || !lookup.contains_key(rel.target.as_str())
            {
                debug!(
                    edge = %rel.id,
                    source = %rel.source,
                    target = %rel.target,
                    "layout.edge.dangling"
                );
                continue;
            }
            if let Some((parent, child)) = rel.parent_child() {
                children.entry(parent).or_default().push(child);
                parents.entry(child).or_default().push(parent);
                continue;
            }
            if rel.kind == RelationshipKind::Spouse {
                if rel.source == rel.target {
                    debug!(edge = %rel.id, "layout.edge.self_spouse");
                    continue;
                }
                let (a, b) = (rel.source.as_str(), rel.target.as_str());
                spouses.entry(a).or_default().push(b);
                spouses.entry(b).or_default().push(a);
                spouse_pairs.push((a, b));
            }
        }

        Self {
            persons,
            lookup,
            children,
            parents,
            spouses,
            spouse_pairs,
        }
    }

    pub(super) fn persons(&self) -> &[&'a Person] {
        &self.persons
    }

    pub(super) fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.persons.iter().map(|person| person.id.as_str())
    }

    pub(super) fn len(&self) -> usize {
        self.persons.len()
    }

    pub(super) fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    pub(super) fn children_of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn parents_of(&self, id: &str) -> &[&'a str] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn spouses_of(&self, id: &str) -> &[&'a str] {
        self.spouses.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(super) fn spouse_pairs(&self) -> &[(&'a str, &'a str)] {
        &self.spouse_pairs
    }

    /// Children with repeats removed, first occurrence wins.
    pub(super) fn distinct_children(&self, id: &str) -> Vec<&'a str> {
        let mut out: Vec<&'a str> = Vec::new();
        for &child in self.children_of(id) {
            if !out.contains(&child) {
                out.push(child);
            }
        }
        out
    }

    /// Persons without any parent edge, in input order.
    pub(super) fn roots(&self) -> Vec<&'a str> {
        self.ids()
            .filter(|id| self.parents_of(id).is_empty())
            .collect()
    }
}
