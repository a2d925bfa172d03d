//! Cached results of the last derive passes.
//!
//! Each slice follows its own update rule: positions are replaced wholesale,
//! the legend is merged, and the pleiotropy set is written once per loaded
//! network.

use hiview_core::{EdgeElement, GroupPositions, LeafPositions, NodeElement, StyleMode, TreeNodeId};
use hiview_graph::{
    Diagnostic, Legend, LegendUpdate, PleioSet, StyleColors, StyleSheet, TopGroupSet,
    apply_node_coloring, with_edge_color_mapping, with_pleio_edge_visibility,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    focus: Option<TreeNodeId>,
    top_groups: TopGroupSet,
    positions: LeafPositions,
    group_positions: GroupPositions,
    pleio: Option<PleioSet>,
    legend: Legend,
    style_mode: StyleMode,
    style_sheet: StyleSheet,
    nodes: Vec<NodeElement>,
    edges: Vec<EdgeElement>,
    diagnostics: Vec<Diagnostic>,
    last_selected: Option<String>,
    show_pleio_edges: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(StyleMode::default(), true)
    }
}

/// Output of one focus pass, committed to [`ViewState`] in a single step.
#[derive(Debug, Clone)]
pub struct FocusUpdate {
    pub focus: TreeNodeId,
    pub top_groups: TopGroupSet,
    pub positions: LeafPositions,
    pub group_positions: GroupPositions,
    pub pleio: PleioSet,
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
    pub legend: LegendUpdate,
    pub diagnostics: Vec<Diagnostic>,
}

impl ViewState {
    pub fn new(style_mode: StyleMode, show_pleio_edges: bool) -> Self {
        Self {
            focus: None,
            top_groups: TopGroupSet::default(),
            positions: LeafPositions::new(),
            group_positions: GroupPositions::new(),
            pleio: None,
            legend: Legend::default(),
            style_mode,
            style_sheet: mode_sheet(style_mode, &StyleColors::default()),
            nodes: Vec::new(),
            edges: Vec::new(),
            diagnostics: Vec::new(),
            last_selected: None,
            show_pleio_edges,
        }
    }

    pub fn focus(&self) -> Option<TreeNodeId> {
        self.focus
    }

    pub fn top_groups(&self) -> &TopGroupSet {
        &self.top_groups
    }

    pub fn positions(&self) -> &LeafPositions {
        &self.positions
    }

    pub fn group_positions(&self) -> &GroupPositions {
        &self.group_positions
    }

    pub fn pleio(&self) -> Option<&PleioSet> {
        self.pleio.as_ref()
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn style_mode(&self) -> StyleMode {
        self.style_mode
    }

    pub fn style_sheet(&self) -> &StyleSheet {
        &self.style_sheet
    }

    pub fn nodes(&self) -> &[NodeElement] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeElement] {
        &self.edges
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn show_pleio_edges(&self) -> bool {
        self.show_pleio_edges
    }

    pub fn set_positions(&mut self, positions: LeafPositions) {
        self.positions = positions;
    }

    pub fn set_group_positions(&mut self, group_positions: GroupPositions) {
        self.group_positions = group_positions;
    }

    /// Stores `pleio` unless a set is already cached for this network.
    /// Returns whether the value was taken.
    pub fn set_pleio(&mut self, pleio: PleioSet) -> bool {
        if self.pleio.is_some() {
            debug!("Pleiotropy already computed for this network, keeping it");
            return false;
        }
        self.pleio = Some(pleio);
        true
    }

    pub fn merge_legend(&mut self, update: LegendUpdate) {
        self.legend.merge(update);
    }

    pub fn set_style(&mut self, mode: StyleMode, sheet: StyleSheet) {
        self.style_mode = mode;
        self.style_sheet = sheet;
    }

    /// Replaces diagnostics of the style-mode pass, keeping group-styling ones.
    pub fn set_style_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics
            .retain(|diagnostic| !matches!(diagnostic, Diagnostic::MissingGroupData { .. }));
        self.diagnostics.extend(diagnostics);
    }

    pub fn apply_focus(&mut self, update: FocusUpdate) {
        self.focus = Some(update.focus);
        self.top_groups = update.top_groups;
        self.set_positions(update.positions);
        self.set_group_positions(update.group_positions);
        self.set_pleio(update.pleio);
        self.nodes = update.nodes;
        self.edges = with_pleio_edge_visibility(&update.edges, self.show_pleio_edges);
        self.merge_legend(update.legend);
        self.diagnostics = update.diagnostics;
    }

    /// Records a selection. Returns `false` when `id` repeats the last one.
    pub fn select(&mut self, id: &str) -> bool {
        if self.last_selected.as_deref() == Some(id) {
            return false;
        }
        self.last_selected = Some(id.to_string());
        true
    }

    pub fn set_show_pleio_edges(&mut self, show: bool) {
        self.show_pleio_edges = show;
        self.edges = with_pleio_edge_visibility(&self.edges, show);
    }

    /// Drops everything derived from the loaded network. The style mode, its
    /// sheet and edge visibility are viewer preferences and survive.
    pub fn clear(&mut self) {
        let style_sheet = std::mem::take(&mut self.style_sheet);
        *self = Self::new(self.style_mode, self.show_pleio_edges);
        self.style_sheet = style_sheet;
        debug!("View state cleared");
    }
}

/// Sheet drawing nodes the way `mode` colors them, with edges colored by
/// their styled data.
pub fn mode_sheet(mode: StyleMode, colors: &StyleColors) -> StyleSheet {
    let (sheet, _) = apply_node_coloring(mode, &StyleSheet::base(), colors);
    with_edge_color_mapping(&sheet)
}
