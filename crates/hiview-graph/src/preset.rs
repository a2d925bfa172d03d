//! Node color presets for the selectable style modes.

use crate::diagnostic::StyleError;
use crate::legend::{LegendEntry, LegendUpdate};
use crate::palette::{StyleColors, accent_color};
use hiview_core::{Color, NodeData, StyleMode, tags};
use serde::{Deserialize, Serialize};
use tracing::debug;

const BAIT_PREY_VALUES: [&str; 2] = ["bait", "prey"];
const EVIDENCE_VALUES: [&str; 4] = ["Codependency", "Coabundance", "Coexpression", "Physical"];
const CURATED: &str = "Curated";

/// How a style mode turns a node's attributes into a color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeColorMapping {
    /// Read the `color` already assigned by group styling.
    DataColor,
    Categorical(CategoricalMapping),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchRule {
    /// Attribute text must equal one of the listed values.
    Exact,
    /// Any truthy attribute value counts as a match for the first entry.
    Truthy,
}

/// Value table for one attribute. Nodes without a match get `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalMapping {
    pub mode: StyleMode,
    pub attribute: String,
    pub rule: MatchRule,
    pub values: Vec<LegendEntry>,
    pub fallback: Color,
    /// Whether a missing attribute means the node lacks data for this mode,
    /// rather than simply being a negative.
    pub strict: bool,
}

impl CategoricalMapping {
    /// Color for `node`, or an error when a strict mode finds no attribute.
    pub fn try_color_for(&self, node: &NodeData) -> Result<Color, StyleError> {
        match self.rule {
            MatchRule::Truthy => Ok(if node.attribute_truthy(&self.attribute) {
                self.values.first().map_or(self.fallback, |entry| entry.color)
            } else {
                self.fallback
            }),
            MatchRule::Exact => match node.attribute_text(&self.attribute) {
                Some(text) => Ok(self
                    .values
                    .iter()
                    .find(|entry| entry.value == text)
                    .map_or(self.fallback, |entry| entry.color)),
                None if self.strict => Err(StyleError::MissingGroupData {
                    mode: self.mode,
                    node: node.id.clone(),
                }),
                None => Ok(self.fallback),
            },
        }
    }

    pub fn color_for(&self, node: &NodeData) -> Color {
        self.try_color_for(node).unwrap_or(self.fallback)
    }
}

impl NodeColorMapping {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, NodeColorMapping::DataColor)
    }

    /// Color a node would be drawn with under this mapping.
    pub fn resolve(&self, node: &NodeData) -> Result<Option<Color>, StyleError> {
        match self {
            NodeColorMapping::DataColor => Ok(node.color),
            NodeColorMapping::Categorical(mapping) => mapping.try_color_for(node).map(Some),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StylePreset {
    pub mapping: NodeColorMapping,
    /// Legend table this mode registers; `None` for membership, whose legend
    /// comes from group styling.
    pub legend: Option<LegendUpdate>,
}

pub fn resolve_style_preset(mode: StyleMode, colors: &StyleColors) -> StylePreset {
    debug!(mode = %mode, "Resolving style preset");
    let neutral = colors.neutral;
    let accent = colors.accent;

    let (attribute, rule, values, legend_values, strict) = match mode {
        StyleMode::Membership => {
            return StylePreset {
                mapping: NodeColorMapping::DataColor,
                legend: None,
            };
        }
        StyleMode::BaitPrey => {
            let values = vec![
                LegendEntry::new(BAIT_PREY_VALUES[0], accent_color(1)),
                LegendEntry::new(BAIT_PREY_VALUES[1], accent_color(3)),
            ];
            let mut legend = values.clone();
            legend.push(LegendEntry::new("none", neutral));
            (tags::APMS_TYPE, MatchRule::Exact, values, legend, true)
        }
        StyleMode::DominantEvidence => {
            let values: Vec<LegendEntry> = EVIDENCE_VALUES
                .iter()
                .enumerate()
                .map(|(i, value)| LegendEntry::new(*value, accent_color(i + 1)))
                .collect();
            (tags::DOMINANT_DATA_TYPE, MatchRule::Exact, values.clone(), values, true)
        }
        StyleMode::Pleiotropy => {
            let values = vec![LegendEntry::new(tags::PLEIO, accent)];
            let legend = vec![values[0].clone(), LegendEntry::new("none", neutral)];
            (tags::PLEIO, MatchRule::Truthy, values, legend, false)
        }
        StyleMode::Curation => {
            let values = vec![LegendEntry::new(CURATED, accent)];
            let legend = vec![values[0].clone(), LegendEntry::new("Uncurated", neutral)];
            (tags::CURATED_TYPE, MatchRule::Exact, values, legend, false)
        }
    };

    StylePreset {
        mapping: NodeColorMapping::Categorical(CategoricalMapping {
            mode,
            attribute: attribute.to_string(),
            rule,
            values,
            fallback: neutral,
            strict,
        }),
        legend: Some(LegendUpdate::node_colors(mode, legend_values)),
    }
}
