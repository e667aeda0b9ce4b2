use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{ConnectorStyle, EdgeLayout, FamilyLayout, PersonLayout, path_data, route_edge};
use crate::text_metrics;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

const CARD_RADIUS: f32 = 8.0;
const AVATAR_RADIUS: f32 = 16.0;
const AVATAR_INSET: f32 = 12.0;
const TEXT_GAP: f32 = 10.0;
const TEXT_RIGHT_PAD: f32 = 8.0;
const MIN_CANVAS: f32 = 200.0;

/// Renders a positioned family tree. Connectors are routed from the node
/// positions currently stored in `layout`, so a moved person drags its
/// connectors along.
pub fn render_svg(layout: &FamilyLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let pad = config.diagram_padding;
    let (min_x, min_y, max_x, max_y) = layout.bounds().unwrap_or((0.0, 0.0, 0.0, 0.0));
    let width = (max_x - min_x + pad * 2.0).max(MIN_CANVAS);
    let height = (max_y - min_y + pad * 2.0).max(MIN_CANVAS);
    let (dx, dy) = (pad - min_x, pad - min_y);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"lineage-arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.parent_child_stroke
    ));
    for (idx, node) in layout.nodes.values().enumerate() {
        if node.avatar.is_some() {
            let (cx, cy) = avatar_center(node);
            svg.push_str(&format!(
                "<clipPath id=\"avatar-{idx}\"><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{AVATAR_RADIUS}\"/></clipPath>",
                cx + dx,
                cy + dy
            ));
        }
    }
    svg.push_str("</defs>");

    svg.push_str(&format!("<g transform=\"translate({dx:.2} {dy:.2})\">"));
    for edge in unique_edges(&layout.edges) {
        let Some(points) = route_edge(edge, layout, config) else {
            continue;
        };
        svg.push_str(&connector_svg(edge, &points, theme));
    }
    svg.push_str("</g>");

    for (idx, node) in layout.nodes.values().enumerate() {
        svg.push_str(&card_svg(idx, node, dx, dy, theme));
    }

    svg.push_str("</svg>");
    svg
}

/// Drops edges that only mirror an earlier one: the reverse row of a
/// symmetric relationship, or a `child` row restating a `parent` row.
pub fn unique_edges(edges: &[EdgeLayout]) -> Vec<&EdgeLayout> {
    let mut seen: HashSet<(ConnectorStyle, &str, &str)> = HashSet::new();
    let mut out = Vec::with_capacity(edges.len());
    for edge in edges {
        let (a, b) = if edge.relationship.is_symmetric() && edge.from > edge.to {
            (edge.to.as_str(), edge.from.as_str())
        } else {
            (edge.from.as_str(), edge.to.as_str())
        };
        if seen.insert((edge.style, a, b)) {
            out.push(edge);
        }
    }
    out
}

fn connector_svg(edge: &EdgeLayout, points: &[(f32, f32)], theme: &Theme) -> String {
    let d = path_data(points);
    match edge.style {
        ConnectorStyle::Lineage => format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#lineage-arrow)\"/>",
            theme.parent_child_stroke, theme.parent_child_stroke_width
        ),
        ConnectorStyle::Spouse => format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            theme.spouse_stroke, theme.spouse_stroke_width
        ),
        ConnectorStyle::Sibling => format!(
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-dasharray=\"{}\"/>",
            theme.sibling_stroke, theme.sibling_stroke_width, theme.sibling_dasharray
        ),
    }
}

fn avatar_center(node: &PersonLayout) -> (f32, f32) {
    (node.x + AVATAR_INSET + AVATAR_RADIUS, node.y + node.height / 2.0)
}

fn card_svg(idx: usize, node: &PersonLayout, dx: f32, dy: f32, theme: &Theme) -> String {
    let x = node.x + dx;
    let y = node.y + dy;
    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"person\" data-id=\"{}\">",
        escape_xml(&node.id)
    ));
    out.push_str(&format!(
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CARD_RADIUS}\" ry=\"{CARD_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
        node.width, node.height, theme.node_fill, theme.node_border
    ));

    let (cx, cy) = avatar_center(node);
    let (cx, cy) = (cx + dx, cy + dy);
    out.push_str(&format!(
        "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{AVATAR_RADIUS}\" fill=\"{}\"/>",
        theme.avatar_fill
    ));
    if let Some(url) = &node.avatar {
        let size = AVATAR_RADIUS * 2.0;
        out.push_str(&format!(
            "<image href=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{size}\" height=\"{size}\" preserveAspectRatio=\"xMidYMid slice\" clip-path=\"url(#avatar-{idx})\"/>",
            escape_xml(url),
            cx - AVATAR_RADIUS,
            cy - AVATAR_RADIUS
        ));
    }

    let text_x = cx + AVATAR_RADIUS + TEXT_GAP;
    let text_width = (x + node.width - TEXT_RIGHT_PAD - text_x).max(0.0);
    let name = text_metrics::fit_text(&node.name, text_width, theme.font_size, &theme.font_family);
    let name_y = match node.detail {
        Some(_) => cy - 2.0,
        None => cy + theme.font_size * 0.35,
    };
    out.push_str(&format!(
        "<text x=\"{text_x:.2}\" y=\"{name_y:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.text_color,
        escape_xml(&name)
    ));
    if let Some(detail) = &node.detail {
        let detail_y = cy + theme.detail_font_size + 2.0;
        out.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{detail_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            escape_xml(&theme.font_family),
            theme.detail_font_size,
            theme.detail_text_color,
            escape_xml(detail)
        ));
    }
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
