use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pdfchat_core::node::DocumentNode;

/// Page and typography defaults for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderStyles {
    /// Page width in points (A4 by default).
    pub page_width: f32,

    /// Page height in points.
    pub page_height: f32,

    /// Page margins in points, used when the document sets none.
    pub margins: Margins,

    /// Body font size in points.
    pub base_font_size: f32,

    /// Line height as a multiple of the largest font size on the line.
    pub line_spacing: f32,

    /// Extra space below every block, in points.
    pub block_spacing: f32,

    /// Colour of placeholder text.
    pub placeholder_color: Rgb,

    /// Underline placeholder text.
    pub underline_placeholders: bool,
}

impl Default for RenderStyles {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margins: Margins::uniform(40.0),
            base_font_size: 12.0,
            line_spacing: 1.25,
            block_spacing: 4.0,
            placeholder_color: Rgb(0.0, 0.35, 0.8),
            underline_placeholders: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// Parse the `number | [horizontal, vertical] | [left, top, right, bottom]`
    /// margin shorthand.
    pub fn from_node(node: &DocumentNode) -> Option<Self> {
        if let Some(v) = node.as_f64() {
            return Some(Self::uniform(v as f32));
        }
        let values: Vec<f32> = node
            .as_sequence()?
            .iter()
            .map(|n| n.as_f64().map(|v| v as f32))
            .collect::<Option<_>>()?;
        match values.as_slice() {
            [h, v] => Some(Self {
                left: *h,
                top: *v,
                right: *h,
                bottom: *v,
            }),
            [left, top, right, bottom] => Some(Self {
                left: *left,
                top: *top,
                right: *right,
                bottom: *bottom,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    /// Parse `#rrggbb`, `#rgb` or a handful of colour names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return None,
            };
            let channel = |i: usize| {
                u8::from_str_radix(expanded.get(i..i + 2)?, 16)
                    .ok()
                    .map(|v| v as f32 / 255.0)
            };
            return Some(Rgb(channel(0)?, channel(2)?, channel(4)?));
        }
        match text.to_lowercase().as_str() {
            "black" => Some(Rgb::BLACK),
            "white" => Some(Rgb(1.0, 1.0, 1.0)),
            "red" => Some(Rgb(0.8, 0.0, 0.0)),
            "green" => Some(Rgb(0.0, 0.5, 0.0)),
            "blue" => Some(Rgb(0.0, 0.0, 0.8)),
            "gray" | "grey" => Some(Rgb(0.5, 0.5, 0.5)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Resolved style of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub bold: bool,
    pub italics: bool,
    pub color: Rgb,
    pub underline: bool,
}

impl TextStyle {
    pub fn base(styles: &RenderStyles) -> Self {
        Self {
            font_size: styles.base_font_size,
            bold: false,
            italics: false,
            color: Rgb::BLACK,
            underline: false,
        }
    }

    /// Apply the style attributes present on `attrs`, leaving the rest
    /// inherited.
    pub fn apply(mut self, attrs: &DocumentNode) -> Self {
        if let Some(size) = attrs.get("fontSize").and_then(DocumentNode::as_f64) {
            self.font_size = size as f32;
        }
        if let Some(bold) = attrs.get("bold").and_then(DocumentNode::as_bool) {
            self.bold = bold;
        }
        if let Some(italics) = attrs.get("italics").and_then(DocumentNode::as_bool) {
            self.italics = italics;
        }
        if let Some(color) = attrs
            .get("color")
            .and_then(DocumentNode::as_text)
            .and_then(Rgb::parse)
        {
            self.color = color;
        }
        if let Some(decoration) = attrs.get("decoration").and_then(DocumentNode::as_text) {
            self.underline = decoration == "underline";
        }
        self
    }
}

/// Named styles declared by the document (`styles` and `defaultStyle`).
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    named: BTreeMap<String, DocumentNode>,
    default_style: Option<DocumentNode>,
}

impl StyleSheet {
    pub fn from_document(root: &DocumentNode) -> Self {
        let named = match root.get("styles") {
            Some(DocumentNode::Mapping(fields)) => fields.clone(),
            _ => BTreeMap::new(),
        };
        Self {
            named,
            default_style: root.get("defaultStyle").cloned(),
        }
    }

    /// The root style: render defaults with `defaultStyle` applied.
    pub fn root_style(&self, styles: &RenderStyles) -> TextStyle {
        let base = TextStyle::base(styles);
        match &self.default_style {
            Some(attrs) => base.apply(attrs),
            None => base,
        }
    }

    /// Resolve the style of a node: named styles from its `style` key (a
    /// name or a list of names) first, then its inline attributes.
    pub fn resolve(&self, inherited: TextStyle, node: &DocumentNode) -> TextStyle {
        let mut style = inherited;
        for name in style_names(node) {
            if let Some(attrs) = self.named.get(name) {
                style = style.apply(attrs);
            }
        }
        style.apply(node)
    }

    /// Alignment from named styles and inline attributes.
    pub fn alignment(&self, node: &DocumentNode) -> Option<Alignment> {
        let from_attrs = |attrs: &DocumentNode| {
            attrs
                .get("alignment")
                .and_then(DocumentNode::as_text)
                .map(|a| match a {
                    "center" => Alignment::Center,
                    "right" => Alignment::Right,
                    _ => Alignment::Left,
                })
        };
        let mut alignment = None;
        for name in style_names(node) {
            if let Some(a) = self.named.get(name).and_then(from_attrs) {
                alignment = Some(a);
            }
        }
        from_attrs(node).or(alignment)
    }

    /// Block margin from named styles and inline attributes.
    pub fn margin(&self, node: &DocumentNode) -> Option<Margins> {
        let mut margin = None;
        for name in style_names(node) {
            if let Some(m) = self
                .named
                .get(name)
                .and_then(|attrs| attrs.get("margin"))
                .and_then(Margins::from_node)
            {
                margin = Some(m);
            }
        }
        node.get("margin").and_then(Margins::from_node).or(margin)
    }
}

fn style_names(node: &DocumentNode) -> Vec<&str> {
    match node.get("style") {
        Some(DocumentNode::Leaf(name)) => vec![name.as_str()],
        Some(DocumentNode::Sequence(items)) => items.iter().filter_map(DocumentNode::as_text).collect(),
        _ => Vec::new(),
    }
}
