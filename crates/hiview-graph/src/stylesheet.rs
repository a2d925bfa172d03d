//! Immutable style-sheet descriptors handed to the renderer.
//!
//! Every transformation here takes a sheet by reference and returns a new one.

use crate::legend::LegendUpdate;
use crate::palette::{StyleColors, category_color};
use crate::preset::{NodeColorMapping, resolve_style_preset};
use hiview_core::{Color, NodeData, StyleMode, tags};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const BACKGROUND_COLOR: &str = "background-color";
pub const BACKGROUND_OPACITY: &str = "background-opacity";
pub const TEXT_BACKGROUND_COLOR: &str = "text-background-color";
pub const TEXT_BACKGROUND_OPACITY: &str = "text-background-opacity";
pub const TEXT_OUTLINE_WIDTH: &str = "text-outline-width";
pub const LINE_COLOR: &str = "line-color";
pub const Z_INDEX: &str = "z-index";
pub const SHAPE: &str = "shape";
pub const LABEL: &str = "label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    RoundRectangle,
}

/// Ellipse for genes that sit in more than one group, rounded box otherwise.
pub fn pleio_shape(node: &NodeData) -> NodeShape {
    match node.attribute_int(tags::PLEIO) {
        Some(count) if count > 1 => NodeShape::Ellipse,
        _ => NodeShape::RoundRectangle,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Selector {
    Node,
    Edge,
    /// Nodes whose attribute is present.
    NodeWith(String),
    /// Nodes whose attribute text equals the value.
    NodeWhere { attribute: String, value: String },
}

impl Selector {
    pub fn matches_node(&self, node: &NodeData) -> bool {
        match self {
            Selector::Node => true,
            Selector::Edge => false,
            Selector::NodeWith(attribute) => node.attribute(attribute).is_some(),
            Selector::NodeWhere { attribute, value } => {
                node.attribute_text(attribute).as_deref() == Some(value.as_str())
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Node => write!(f, "node"),
            Selector::Edge => write!(f, "edge"),
            Selector::NodeWith(attribute) => write!(f, "node[{attribute}]"),
            Selector::NodeWhere { attribute, value } => {
                write!(f, "node[{attribute} = \"{value}\"]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Color(Color),
    Number(f32),
    Text(String),
    /// Read from the element's own data field.
    Data(String),
    /// Computed per node by a style preset.
    NodeColors(NodeColorMapping),
    PleioShape,
}

impl StyleValue {
    pub fn data(field: &str) -> Self {
        StyleValue::Data(field.to_string())
    }

    /// Color this value takes for `node`, if it describes one.
    pub fn color_for(&self, node: &NodeData) -> Option<Color> {
        match self {
            StyleValue::Color(color) => Some(*color),
            StyleValue::Data(field) if field == "color" => node.color,
            StyleValue::NodeColors(mapping) => match mapping {
                NodeColorMapping::DataColor => node.color,
                NodeColorMapping::Categorical(mapping) => Some(mapping.color_for(node)),
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: Selector,
    pub properties: BTreeMap<String, StyleValue>,
}

impl StyleRule {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: StyleValue) -> Self {
        self.properties.insert(property.to_string(), value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.properties.get(property)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    pub rules: Vec<StyleRule>,
}

impl StyleSheet {
    /// Nodes drawn in their group color and labelled by name.
    pub fn base() -> Self {
        Self {
            rules: vec![
                StyleRule::new(Selector::Node)
                    .with(BACKGROUND_COLOR, StyleValue::data("color"))
                    .with(LABEL, StyleValue::data("name")),
            ],
        }
    }

    pub fn find(&self, selector: &Selector) -> Option<&StyleRule> {
        self.rules.iter().find(|rule| &rule.selector == selector)
    }

    pub fn with_rule(&self, rule: StyleRule) -> StyleSheet {
        let mut sheet = self.clone();
        sheet.rules.push(rule);
        sheet
    }

    /// Background color of `node` after every matching rule, later rules winning.
    pub fn node_background(&self, node: &NodeData) -> Option<Color> {
        self.rules
            .iter()
            .filter(|rule| rule.selector.matches_node(node))
            .filter_map(|rule| rule.get(BACKGROUND_COLOR))
            .filter_map(|value| value.color_for(node))
            .last()
    }

    pub fn node_shape(&self, node: &NodeData) -> Option<NodeShape> {
        self.rules
            .iter()
            .filter(|rule| rule.selector.matches_node(node))
            .filter_map(|rule| rule.get(SHAPE))
            .filter_map(|value| match value {
                StyleValue::PleioShape => Some(pleio_shape(node)),
                _ => None,
            })
            .last()
    }
}

/// One rule per distinct value of `attribute`, colored by sorted position.
pub fn attribute_color_rules<S: AsRef<str>>(attribute: &str, values: &[S]) -> Vec<StyleRule> {
    let sorted: BTreeSet<&str> = values.iter().map(AsRef::as_ref).collect();
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let color = category_color(index);
            StyleRule::new(Selector::NodeWhere {
                attribute: attribute.to_string(),
                value: value.to_string(),
            })
            .with(TEXT_BACKGROUND_COLOR, StyleValue::Color(color))
            .with(TEXT_BACKGROUND_OPACITY, StyleValue::Number(1.0))
            .with(TEXT_OUTLINE_WIDTH, StyleValue::Number(0.5))
            .with(BACKGROUND_OPACITY, StyleValue::Number(1.0))
            .with(BACKGROUND_COLOR, StyleValue::Color(color))
        })
        .collect()
}

/// Adds the attribute-value rules followed by the pleio shape rule.
pub fn with_attribute_color_mapping<S: AsRef<str>>(
    sheet: &StyleSheet,
    attribute: &str,
    values: &[S],
) -> StyleSheet {
    let mut next = sheet.clone();
    next.rules.extend(attribute_color_rules(attribute, values));
    next.rules.push(
        StyleRule::new(Selector::NodeWith(tags::PLEIO.to_string()))
            .with(BACKGROUND_OPACITY, StyleValue::Number(0.9))
            .with(TEXT_BACKGROUND_OPACITY, StyleValue::Number(0.0))
            .with(SHAPE, StyleValue::PleioShape),
    );
    next
}

/// Sheet whose edge rule reads each edge's own `color` and `zIndex`.
pub fn with_edge_color_mapping(sheet: &StyleSheet) -> StyleSheet {
    sheet.with_rule(
        StyleRule::new(Selector::Edge)
            .with(LINE_COLOR, StyleValue::data("color"))
            .with(Z_INDEX, StyleValue::data("zIndex")),
    )
}

/// Points the `node` rule's background at the preset for `mode`.
///
/// Returns the new sheet and the legend table the preset registers. A sheet
/// without a `node` rule gets one appended.
pub fn apply_node_coloring(
    mode: StyleMode,
    sheet: &StyleSheet,
    colors: &StyleColors,
) -> (StyleSheet, Option<LegendUpdate>) {
    let preset = resolve_style_preset(mode, colors);
    let value = match preset.mapping {
        NodeColorMapping::DataColor => StyleValue::data("color"),
        mapping => StyleValue::NodeColors(mapping),
    };

    let mut next = sheet.clone();
    match next.rules.iter_mut().find(|rule| rule.selector == Selector::Node) {
        Some(rule) => {
            rule.properties.insert(BACKGROUND_COLOR.to_string(), value);
        }
        None => next
            .rules
            .push(StyleRule::new(Selector::Node).with(BACKGROUND_COLOR, value)),
    }
    (next, preset.legend)
}
