use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::ir::{FamilyGraph, Person, Relationship, RelationshipKind};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid family graph JSON: {0}")]
    Syntax(String),
    #[error("invalid family graph document: {0}")]
    Document(String),
    #[error("expected a `persons` or `nodes` list at the top level")]
    UnknownShape,
    #[error("relationship {edge} has unknown type '{kind}'")]
    UnknownRelationship { edge: String, kind: String },
    #[error("relationship {edge} is missing its {end} person id")]
    MissingEndpoint { edge: String, end: &'static str },
    #[error("person at position {index} has an empty id")]
    EmptyPersonId { index: usize },
}

#[derive(Debug, Deserialize)]
struct RecordsDocument {
    persons: Vec<Person>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Deserialize)]
struct RelationshipRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "person_id")]
    source: String,
    #[serde(alias = "related_person_id")]
    target: String,
    #[serde(alias = "relationship_type", alias = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct FlowDocument {
    nodes: Vec<FlowNode>,
    #[serde(default)]
    edges: Vec<FlowEdge>,
}

#[derive(Debug, Deserialize)]
struct FlowNode {
    id: String,
    #[serde(default)]
    data: Option<FlowNodeData>,
}

#[derive(Debug, Default, Deserialize)]
struct FlowNodeData {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    patronymic: Option<String>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    death_date: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    avatar_thumb_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlowEdge {
    #[serde(default)]
    id: Option<String>,
    source: String,
    target: String,
    #[serde(default, rename = "type")]
    edge_type: Option<String>,
    #[serde(default)]
    data: Option<FlowEdgeData>,
}

#[derive(Debug, Default, Deserialize)]
struct FlowEdgeData {
    #[serde(default)]
    relationship_type: Option<String>,
}

/// Parses a family graph from JSON, falling back to JSON5 for hand-written
/// files with comments or trailing commas.
///
/// Two shapes are accepted: the records export (`persons` plus
/// `relationships`) and the tree-nodes response (`nodes` plus `edges`).
pub fn parse_family_graph(input: &str) -> Result<FamilyGraph, ParseError> {
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(strict) => json5::from_str(input).map_err(|_| ParseError::Syntax(strict.to_string()))?,
    };

    let graph = if value.get("persons").is_some() {
        records_graph(serde_json::from_value(value).map_err(invalid_document)?)?
    } else if value.get("nodes").is_some() {
        flow_graph(serde_json::from_value(value).map_err(invalid_document)?)?
    } else {
        return Err(ParseError::UnknownShape);
    };

    if let Some(index) = graph.persons.iter().position(|p| p.id.trim().is_empty()) {
        return Err(ParseError::EmptyPersonId { index });
    }
    Ok(graph)
}

fn invalid_document(err: serde_json::Error) -> ParseError {
    ParseError::Document(err.to_string())
}

fn records_graph(doc: RecordsDocument) -> Result<FamilyGraph, ParseError> {
    let mut relationships = Vec::with_capacity(doc.relationships.len());
    for (idx, record) in doc.relationships.into_iter().enumerate() {
        relationships.push(build_relationship(
            idx,
            record.id,
            record.source,
            record.target,
            Some(record.kind),
        )?);
    }
    Ok(FamilyGraph {
        persons: doc.persons,
        relationships,
    })
}

fn flow_graph(doc: FlowDocument) -> Result<FamilyGraph, ParseError> {
    let persons = doc
        .nodes
        .into_iter()
        .map(|node| {
            let data = node.data.unwrap_or_default();
            Person {
                id: node.id,
                first_name: data.first_name,
                last_name: data.last_name,
                patronymic: data.patronymic,
                birth_date: data.birth_date,
                death_date: data.death_date,
                avatar_url: data.avatar_url,
                avatar_thumb_url: data.avatar_thumb_url,
            }
        })
        .collect();
    let mut relationships = Vec::with_capacity(doc.edges.len());
    for (idx, edge) in doc.edges.into_iter().enumerate() {
        let kind = edge
            .data
            .and_then(|data| data.relationship_type)
            .or(edge.edge_type);
        relationships.push(build_relationship(
            idx,
            edge.id,
            edge.source,
            edge.target,
            kind,
        )?);
    }
    Ok(FamilyGraph {
        persons,
        relationships,
    })
}

fn build_relationship(
    idx: usize,
    id: Option<String>,
    source: String,
    target: String,
    kind: Option<String>,
) -> Result<Relationship, ParseError> {
    let id = id
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| format!("e{idx}"));
    let raw_kind = kind.unwrap_or_default();
    let kind =
        RelationshipKind::from_token(&raw_kind).ok_or_else(|| ParseError::UnknownRelationship {
            edge: id.clone(),
            kind: raw_kind.clone(),
        })?;
    if source.trim().is_empty() {
        return Err(ParseError::MissingEndpoint { edge: id, end: "source" });
    }
    if target.trim().is_empty() {
        return Err(ParseError::MissingEndpoint { edge: id, end: "target" });
    }
    Ok(Relationship {
        id,
        source,
        target,
        kind,
    })
}
