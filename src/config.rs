use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry of the family tree layout, in abstract layout units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Vertical distance between two generation rows.
    pub level_height: f32,
    /// Horizontal gap between neighbouring subtrees and unrelated people.
    pub sibling_gap: f32,
    /// Horizontal gap between the two halves of a couple.
    pub partner_gap: f32,
    pub grid_spacing_x: f32,
    pub grid_spacing_y: f32,
    pub diagram_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 80.0,
            level_height: 160.0,
            sibling_gap: 32.0,
            partner_gap: 28.0,
            grid_spacing_x: 200.0,
            grid_spacing_y: 200.0,
            diagram_padding: 24.0,
        }
    }
}

impl LayoutConfig {
    /// Width of a person placed together with a spouse.
    pub fn couple_width(&self) -> f32 {
        self.node_width * 2.0 + self.partner_gap
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    detail_font_size: Option<f32>,
    text_color: Option<String>,
    detail_text_color: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    avatar_fill: Option<String>,
    background: Option<String>,
    parent_child_stroke: Option<String>,
    spouse_stroke: Option<String>,
    sibling_stroke: Option<String>,
    sibling_dasharray: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    level_height: Option<f32>,
    sibling_gap: Option<f32>,
    partner_gap: Option<f32>,
    grid_spacing_x: Option<f32>,
    grid_spacing_y: Option<f32>,
    diagram_padding: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{theme_name}'"))?;
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.detail_font_size {
            config.theme.detail_font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.detail_text_color {
            config.theme.detail_text_color = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.avatar_fill {
            config.theme.avatar_fill = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
        if let Some(v) = vars.parent_child_stroke {
            config.theme.parent_child_stroke = v;
        }
        if let Some(v) = vars.spouse_stroke {
            config.theme.spouse_stroke = v;
        }
        if let Some(v) = vars.sibling_stroke {
            config.theme.sibling_stroke = v;
        }
        if let Some(v) = vars.sibling_dasharray {
            config.theme.sibling_dasharray = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_width {
            target.node_width = v;
        }
        if let Some(v) = layout.node_height {
            target.node_height = v;
        }
        if let Some(v) = layout.level_height {
            target.level_height = v;
        }
        if let Some(v) = layout.sibling_gap {
            target.sibling_gap = v;
        }
        if let Some(v) = layout.partner_gap {
            target.partner_gap = v;
        }
        if let Some(v) = layout.grid_spacing_x {
            target.grid_spacing_x = v;
        }
        if let Some(v) = layout.grid_spacing_y {
            target.grid_spacing_y = v;
        }
        if let Some(v) = layout.diagram_padding {
            target.diagram_padding = v;
        }
        validate_layout(target)?;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}

fn validate_layout(layout: &LayoutConfig) -> anyhow::Result<()> {
    let sizes = [
        ("nodeWidth", layout.node_width),
        ("nodeHeight", layout.node_height),
        ("levelHeight", layout.level_height),
        ("gridSpacingX", layout.grid_spacing_x),
        ("gridSpacingY", layout.grid_spacing_y),
    ];
    for (name, value) in sizes {
        if !value.is_finite() || value <= 0.0 {
            anyhow::bail!("layout.{name} must be a positive number, got {value}");
        }
    }
    let gaps = [
        ("siblingGap", layout.sibling_gap),
        ("partnerGap", layout.partner_gap),
        ("diagramPadding", layout.diagram_padding),
    ];
    for (name, value) in gaps {
        if !value.is_finite() || value < 0.0 {
            anyhow::bail!("layout.{name} must not be negative, got {value}");
        }
    }
    Ok(())
}
