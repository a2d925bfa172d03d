//! One full group-styling pass over an element list.

use crate::diagnostic::Diagnostic;
use crate::group::TopGroupSet;
use crate::legend::LegendUpdate;
use crate::palette::StyleColors;
use crate::preset::{NodeColorMapping, resolve_style_preset};
use crate::style::{GroupColorMap, assign_edge_colors, assign_node_colors, build_group_color_map, color_node};
use hiview_core::{EdgeElement, NodeElement, StyleMode};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Metadata key listing the focused groups, separated by `|`.
pub const METADATA_GROUP_KEY: &str = "Group";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyledNetwork {
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
    pub group_colors: GroupColorMap,
    /// Group colors plus group labels from the top-group set.
    pub legend: LegendUpdate,
    pub diagnostics: Vec<Diagnostic>,
}

/// Colors nodes by base group and edges by membership. Inputs are untouched.
pub fn style_network(
    nodes: &[NodeElement],
    edges: &[EdgeElement],
    top_groups: &TopGroupSet,
    colors: &StyleColors,
) -> StyledNetwork {
    let (group_colors, ambiguity) = build_group_color_map(nodes, &top_groups.names(), colors);
    let id2node = assign_node_colors(nodes, &group_colors);
    let (edges, mut diagnostics) =
        assign_edge_colors(&id2node, &group_colors, edges, group_colors.parent(), colors);
    if let Some(ambiguity) = ambiguity {
        diagnostics.insert(0, ambiguity);
    }

    let nodes: Vec<NodeElement> = nodes
        .iter()
        .map(|node| color_node(node, &group_colors))
        .collect();
    let legend = LegendUpdate::colors(group_colors.colors().clone())
        .with_names(top_groups.labels().clone());

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        groups = group_colors.len(),
        diagnostics = diagnostics.len(),
        "Styled network"
    );
    StyledNetwork {
        nodes,
        edges,
        group_colors,
        legend,
        diagnostics,
    }
}

/// Nodes that fall back to the neutral color under `mode` for lack of data.
pub fn style_mode_diagnostics(
    mode: StyleMode,
    nodes: &[NodeElement],
    colors: &StyleColors,
) -> Vec<Diagnostic> {
    let NodeColorMapping::Categorical(mapping) = resolve_style_preset(mode, colors).mapping else {
        return Vec::new();
    };
    let diagnostics: Vec<Diagnostic> = nodes
        .iter()
        .filter_map(|node| mapping.try_color_for(&node.data).err())
        .map(Diagnostic::from)
        .collect();
    if !diagnostics.is_empty() {
        debug!(mode = %mode, missing = diagnostics.len(), "Nodes without style data");
    }
    diagnostics
}

/// Copies of `edges` with pleiotropic edges hidden unless `show` is set.
pub fn with_pleio_edge_visibility(edges: &[EdgeElement], show: bool) -> Vec<EdgeElement> {
    edges
        .iter()
        .map(|edge| {
            let mut edge = edge.clone();
            edge.data.hidden = edge.data.is_pleio && !show;
            edge
        })
        .collect()
}

/// Focus groups named in network metadata, e.g. `{"Group": "X|Y"}`.
pub fn focus_groups_from_metadata(metadata: &Value) -> BTreeSet<String> {
    metadata
        .get(METADATA_GROUP_KEY)
        .and_then(Value::as_str)
        .map(|groups| {
            groups
                .split('|')
                .filter(|group| !group.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
