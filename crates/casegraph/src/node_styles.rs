use colorous::Color;
use serde::{Deserialize, Serialize};

const fn rgb(hex: u32) -> Color {
    Color {
        r: (hex >> 16) as u8,
        g: (hex >> 8) as u8,
        b: hex as u8,
    }
}

const HOSPITAL: Color = rgb(0xef4444);
const PHYSICIAN: Color = rgb(0x22c55e);
const BUSINESS_OWNER: Color = rgb(0x3b82f6);
const HEALTHCARE_PRO: Color = rgb(0x8b5cf6);
const BUSINESS_ENTITY: Color = rgb(0xa855f7);

pub const FALLBACK_NODE_COLOR: Color = rgb(0x6b7280);
pub const FALLBACK_EDGE_COLOR: Color = rgb(0x374151);
pub const HIGHLIGHT_COLOR: Color = rgb(0xffffff);

/// Category colours, checked in order.
const CATEGORY_COLORS: [(&str, Color); 8] = [
    ("Hospital", HOSPITAL),
    ("Individual - Physician", PHYSICIAN),
    ("Individual - Business Owner/Executive", BUSINESS_OWNER),
    ("Individual - Business Owner", BUSINESS_OWNER),
    ("Individual - Licensed Healthcare Professional", HEALTHCARE_PRO),
    ("Business Entity - Surgeon Brokerage", BUSINESS_ENTITY),
    ("Business Entity - Medical Services", BUSINESS_ENTITY),
    ("Business Entity - Outpatient Treatment Center", BUSINESS_ENTITY),
];

/// Relationship colours, checked in order against the edge label.
const CONNECTION_COLORS: [(&str, Color); 5] = [
    ("Shared Principals/Officers", rgb(0x6b7280)),
    ("Documented Business Transactions", rgb(0xf59e0b)),
    ("Shared Entity Ownership", rgb(0x10b981)),
    ("Shared Business Partnership", rgb(0x8b5cf6)),
    ("Shared Entity", rgb(0x3b82f6)),
];

const LABEL_MAX_CHARS: usize = 20;
const EDGE_WIDTH: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Diamond,
    Square,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub color: String,
    pub highlight_color: String,
    pub shape: NodeShape,
    pub size: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub color: String,
    pub width: f32,
}

pub fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Colour for a category. A table key matches when either string contains
/// the other; an empty category matches nothing.
pub fn category_color(category: &str) -> Color {
    if category.is_empty() {
        return FALLBACK_NODE_COLOR;
    }
    CATEGORY_COLORS
        .iter()
        .find(|(key, _)| category.contains(key) || key.contains(category))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_NODE_COLOR)
}

pub fn connection_color(label: &str) -> Color {
    CONNECTION_COLORS
        .iter()
        .find(|(key, _)| label.contains(key))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_EDGE_COLOR)
}

/// Style hints for a node. Total over all category strings.
pub fn node_style(category: &str) -> NodeStyle {
    let (shape, size, font_size) = if category == "Hospital" {
        (NodeShape::Diamond, 35.0, 14.0)
    } else if category.contains("Business Entity") {
        (NodeShape::Square, 25.0, 11.0)
    } else {
        (NodeShape::Dot, 20.0, 11.0)
    };
    NodeStyle {
        color: hex(category_color(category)),
        highlight_color: hex(HIGHLIGHT_COLOR),
        shape,
        size,
        font_size,
    }
}

pub fn edge_style(label: &str) -> EdgeStyle {
    EdgeStyle {
        color: hex(connection_color(label)),
        width: EDGE_WIDTH,
    }
}

/// Node caption: names over 20 characters are cut and suffixed with "...".
pub fn display_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let mut label: String = name.chars().take(LABEL_MAX_CHARS).collect();
        label.push_str("...");
        label
    } else {
        name.to_string()
    }
}
