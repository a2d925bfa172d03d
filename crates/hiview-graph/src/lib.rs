pub mod diagnostic;
pub mod group;
pub mod legend;
pub mod membership;
pub mod network;
pub mod palette;
pub mod pleio;
pub mod preset;
pub mod style;
pub mod stylesheet;
pub mod walker;

pub use diagnostic::{Diagnostic, StyleError};
pub use group::{GroupResolver, LayoutSource, NoLayout, Resolution, SELECTED_SUFFIX, TopGroupSet};
pub use legend::{Legend, LegendEntry, LegendUpdate};
pub use membership::{group_edge_color, group_members, member_info};
pub use network::{
    StyledNetwork, focus_groups_from_metadata, style_mode_diagnostics, style_network,
    with_pleio_edge_visibility,
};
pub use palette::{StyleColors, accent_color, category_color};
pub use pleio::{PleioSet, detect_pleiotropy, occurrence_counts};
pub use preset::{CategoricalMapping, NodeColorMapping, StylePreset, resolve_style_preset};
pub use style::{
    EdgeClass, GroupColorMap, assign_edge_colors, assign_node_colors, build_group_color_map,
    classify_edge,
};
pub use stylesheet::{
    NodeShape, Selector, StyleRule, StyleSheet, StyleValue, apply_node_coloring,
    attribute_color_rules, pleio_shape, with_attribute_color_mapping, with_edge_color_mapping,
};
pub use walker::{DEFAULT_MAX_DEPTH, TreeWalker, Visit};
