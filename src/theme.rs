use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub detail_font_size: f32,
    pub text_color: String,
    pub detail_text_color: String,
    pub node_fill: String,
    pub node_border: String,
    pub avatar_fill: String,
    pub background: String,
    pub parent_child_stroke: String,
    pub parent_child_stroke_width: f32,
    pub spouse_stroke: String,
    pub spouse_stroke_width: f32,
    pub sibling_stroke: String,
    pub sibling_stroke_width: f32,
    pub sibling_dasharray: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            detail_font_size: 11.0,
            text_color: "#1E293B".to_string(),
            detail_text_color: "#64748B".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_border: "#E2E8F0".to_string(),
            avatar_fill: "#E2E8F0".to_string(),
            background: "#F7F9FC".to_string(),
            parent_child_stroke: "#6366F1".to_string(),
            parent_child_stroke_width: 2.0,
            spouse_stroke: "#374151".to_string(),
            spouse_stroke_width: 2.0,
            sibling_stroke: "#94A3B8".to_string(),
            sibling_stroke_width: 1.5,
            sibling_dasharray: "4 3".to_string(),
        }
    }

    /// Monochrome palette for printed charts.
    pub fn print() -> Self {
        Self {
            font_family: "Georgia, \"Times New Roman\", serif".to_string(),
            font_size: 13.0,
            detail_font_size: 11.0,
            text_color: "#000000".to_string(),
            detail_text_color: "#444444".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_border: "#333333".to_string(),
            avatar_fill: "#DDDDDD".to_string(),
            background: "#FFFFFF".to_string(),
            parent_child_stroke: "#222222".to_string(),
            parent_child_stroke_width: 1.6,
            spouse_stroke: "#000000".to_string(),
            spouse_stroke_width: 2.2,
            sibling_stroke: "#777777".to_string(),
            sibling_stroke_width: 1.0,
            sibling_dasharray: "4 3".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" | "default" => Some(Self::modern()),
            "print" | "mono" => Some(Self::print()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
