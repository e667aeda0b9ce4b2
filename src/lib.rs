#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{FamilyGraph, Person, Relationship, RelationshipKind};
pub use layout::{FamilyLayout, LayoutError, compute_grid_layout, compute_layout};
pub use layout_dump::LayoutDump;
pub use parser::{ParseError, parse_family_graph};
pub use render::render_svg;
pub use theme::Theme;

/// Theme and geometry for the one-call rendering helpers.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn print() -> Self {
        Self {
            theme: Theme::print(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Parses a family graph document and renders it with the modern theme.
pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::modern())
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let graph = parse_family_graph(input)?;
    let layout = compute_layout(&graph, &options.layout)?;
    Ok(render_svg(&layout, &options.theme, &options.layout))
}

/// Parses a family graph document and returns its layout dump as pretty JSON.
pub fn layout_json(input: &str, config: &LayoutConfig) -> anyhow::Result<String> {
    let graph = parse_family_graph(input)?;
    let layout = compute_layout(&graph, config)?;
    LayoutDump::from_layout(&layout, config).to_json_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "persons": [
            {"id": "1", "first_name": "Ivan", "last_name": "Petrov"},
            {"id": "2", "first_name": "Maria", "last_name": "Petrova"},
            {"id": "3", "first_name": "Olga"}
        ],
        "relationships": [
            {"person_id": "1", "related_person_id": "2", "relationship_type": "spouse"},
            {"person_id": "1", "related_person_id": "3", "relationship_type": "parent"}
        ]
    }"#;

    #[test]
    fn renders_document() {
        let svg = render(DOC).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Olga"));
    }

    #[test]
    fn print_theme_changes_palette() {
        let svg = render_with_options(DOC, RenderOptions::print()).unwrap();
        assert!(svg.contains(&Theme::print().parent_child_stroke));
    }

    #[test]
    fn layout_json_lists_every_person() {
        let json = layout_json(DOC, &LayoutConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn cycles_surface_as_errors() {
        let doc = r#"{"persons": [{"id": "a"}, {"id": "b"}],
            "relationships": [
                {"source": "a", "target": "b", "type": "parent"},
                {"source": "b", "target": "a", "type": "parent"}
            ]}"#;
        let err = render(doc).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }
}
