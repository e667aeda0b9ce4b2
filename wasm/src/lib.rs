use family_tree_renderer::{LayoutConfig, RenderOptions, Theme, layout_json, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    level_height: Option<f32>,
}

fn build_render_options(options: TreeRenderOptions) -> RenderOptions {
    let theme = options
        .theme
        .as_deref()
        .and_then(Theme::by_name)
        .unwrap_or_default();
    let mut render_options = RenderOptions::modern().with_theme(theme);

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    apply_geometry(&mut render_options.layout, &options);
    render_options
}

fn apply_geometry(layout: &mut LayoutConfig, options: &TreeRenderOptions) {
    if let Some(width) = options.node_width.filter(|w| *w > 0.0) {
        layout.node_width = width;
    }
    if let Some(height) = options.node_height.filter(|h| *h > 0.0) {
        layout.node_height = height;
    }
    if let Some(level) = options.level_height.filter(|l| *l > 0.0) {
        layout.level_height = level;
    }
}

fn parse_options(options_json: Option<String>) -> Result<TreeRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str::<TreeRenderOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(TreeRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_family_tree_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = build_render_options(parse_options(options_json)?);
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Positions and routed connectors as JSON, for clients that draw their own cards.
#[wasm_bindgen]
pub fn layout_family_tree(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let mut layout = LayoutConfig::default();
    apply_geometry(&mut layout, &options);
    layout_json(input, &layout).map_err(|error| JsValue::from_str(&error.to_string()))
}
