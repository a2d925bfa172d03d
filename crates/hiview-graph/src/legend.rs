//! Accumulated legend of every value-to-color mapping in effect.

use hiview_core::{Color, StyleMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub value: String,
    pub color: Color,
}

impl LegendEntry {
    pub fn new(value: impl Into<String>, color: Color) -> Self {
        Self {
            value: value.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Group name to group color.
    pub colors: BTreeMap<String, Color>,
    /// Group name to display label.
    pub names: BTreeMap<String, String>,
    /// Per style mode, the value-to-color table it registered.
    pub node_colors: BTreeMap<StyleMode, Vec<LegendEntry>>,
}

/// Partial legend produced by one style computation.
///
/// Merging replaces only the slices that are present and adds style-mode
/// tables next to the ones already registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendUpdate {
    pub colors: Option<BTreeMap<String, Color>>,
    pub names: Option<BTreeMap<String, String>>,
    pub node_colors: BTreeMap<StyleMode, Vec<LegendEntry>>,
}

impl LegendUpdate {
    pub fn colors(colors: BTreeMap<String, Color>) -> Self {
        Self {
            colors: Some(colors),
            ..Self::default()
        }
    }

    pub fn node_colors(mode: StyleMode, entries: Vec<LegendEntry>) -> Self {
        Self {
            node_colors: BTreeMap::from([(mode, entries)]),
            ..Self::default()
        }
    }

    pub fn with_names(mut self, names: BTreeMap<String, String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_none() && self.names.is_none() && self.node_colors.is_empty()
    }
}

impl Legend {
    pub fn merge(&mut self, update: LegendUpdate) {
        if let Some(colors) = update.colors {
            self.colors = colors;
        }
        if let Some(names) = update.names {
            self.names = names;
        }
        self.node_colors.extend(update.node_colors);
    }

    pub fn merged(&self, update: LegendUpdate) -> Legend {
        let mut legend = self.clone();
        legend.merge(update);
        legend
    }

    pub fn node_colors_for(&self, mode: StyleMode) -> Option<&[LegendEntry]> {
        self.node_colors.get(&mode).map(Vec::as_slice)
    }
}
