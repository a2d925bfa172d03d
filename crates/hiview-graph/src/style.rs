//! Group-membership coloring for nodes and edges.
//!
//! Groups are colored in sorted order so the same network always gets the
//! same palette. The one base group outside the focus set (the parent group)
//! is painted neutral gray. Edges inside a group take the group color, edges
//! across groups are gray, and pleiotropic edges are drawn white on top.

use crate::diagnostic::Diagnostic;
use crate::palette::{StyleColors, category_color};
use hiview_core::{Color, EdgeElement, NodeElement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub const Z_CROSS_GROUP: i32 = 0;
pub const Z_MEMBER: i32 = 999;
pub const Z_PLEIO: i32 = 9900;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupColorMap {
    colors: BTreeMap<String, Color>,
    parent: Option<String>,
}

impl GroupColorMap {
    pub fn get(&self, group: &str) -> Option<Color> {
        self.colors.get(group).copied()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn colors(&self) -> &BTreeMap<String, Color> {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// How an edge ended up colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeClass {
    CrossGroup,
    Member,
    Pleiotropic,
}

/// Builds the group palette from the distinct `baseGroup` values on `nodes`.
///
/// The parent group is the first (sorted) base group missing from
/// `focus_groups`. When several qualify, an
/// [`Diagnostic::AmbiguousParentGroup`] is returned with the choice made.
pub fn build_group_color_map(
    nodes: &[NodeElement],
    focus_groups: &BTreeSet<String>,
    colors: &StyleColors,
) -> (GroupColorMap, Option<Diagnostic>) {
    let groups: BTreeSet<&str> = nodes
        .iter()
        .map(|node| node.data.base_group.as_str())
        .collect();
    let candidates: Vec<&str> = groups
        .iter()
        .copied()
        .filter(|group| !focus_groups.contains(*group))
        .collect();
    let parent = candidates.first().map(|group| group.to_string());

    let diagnostic = match (candidates.len() > 1, parent.as_ref()) {
        (true, Some(chosen)) => {
            warn!(
                candidates = ?candidates,
                chosen = %chosen,
                "More than one group qualifies as the parent group"
            );
            Some(Diagnostic::AmbiguousParentGroup {
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
                chosen: chosen.clone(),
            })
        }
        _ => None,
    };

    let mut map = BTreeMap::new();
    let mut index = 0;
    for group in &groups {
        if parent.as_deref() == Some(*group) {
            map.insert(group.to_string(), colors.parent_group);
        } else {
            map.insert(group.to_string(), category_color(index));
            index += 1;
        }
    }
    debug!(groups = map.len(), parent = ?parent, "Built group color map");

    (
        GroupColorMap {
            colors: map,
            parent,
        },
        diagnostic,
    )
}

/// Copy of `node` carrying its group color.
pub fn color_node(node: &NodeElement, group_colors: &GroupColorMap) -> NodeElement {
    let mut styled = node.clone();
    styled.data.color = group_colors.get(&node.data.base_group);
    styled
}

/// Styled copies of `nodes`, keyed by node id for edge lookups.
pub fn assign_node_colors(
    nodes: &[NodeElement],
    group_colors: &GroupColorMap,
) -> BTreeMap<String, NodeElement> {
    nodes
        .iter()
        .map(|node| (node.data.id.clone(), color_node(node, group_colors)))
        .collect()
}

/// Classifies an edge by the base groups of its endpoints. Unknown endpoints
/// make the edge cross-group.
pub fn classify_edge(
    edge: &EdgeElement,
    id2node: &BTreeMap<String, NodeElement>,
    parent: Option<&str>,
) -> EdgeClass {
    if edge.data.is_pleio {
        return EdgeClass::Pleiotropic;
    }
    match shared_group(edge, id2node, parent) {
        Some(_) => EdgeClass::Member,
        None => EdgeClass::CrossGroup,
    }
}

/// The base group both endpoints belong to, unless it is the parent group.
fn shared_group<'n>(
    edge: &EdgeElement,
    id2node: &'n BTreeMap<String, NodeElement>,
    parent: Option<&str>,
) -> Option<&'n str> {
    let group_of = |id: &str| id2node.get(id).map(|node| node.data.base_group.as_str());
    match (group_of(&edge.data.source), group_of(&edge.data.target)) {
        (Some(source), Some(target)) if source == target && Some(source) != parent => Some(source),
        _ => None,
    }
}

/// Styled copies of `edges`; inputs are left untouched.
pub fn assign_edge_colors(
    id2node: &BTreeMap<String, NodeElement>,
    group_colors: &GroupColorMap,
    edges: &[EdgeElement],
    parent: Option<&str>,
    colors: &StyleColors,
) -> (Vec<EdgeElement>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let styled = edges
        .iter()
        .map(|edge| {
            for endpoint in [&edge.data.source, &edge.data.target] {
                if !id2node.contains_key(endpoint) {
                    diagnostics.push(Diagnostic::DanglingEdgeEndpoint {
                        edge: edge.data.id.clone(),
                        endpoint: endpoint.clone(),
                    });
                }
            }
            style_edge(edge, id2node, group_colors, parent, colors)
        })
        .collect();
    if !diagnostics.is_empty() {
        warn!(count = diagnostics.len(), "Edges reference unknown nodes");
    }
    (styled, diagnostics)
}

fn style_edge(
    edge: &EdgeElement,
    id2node: &BTreeMap<String, NodeElement>,
    group_colors: &GroupColorMap,
    parent: Option<&str>,
    colors: &StyleColors,
) -> EdgeElement {
    let mut styled = edge.clone();
    let data = &mut styled.data;

    let member_color =
        shared_group(edge, id2node, parent).and_then(|group| group_colors.get(group));
    match member_color {
        Some(color) => {
            data.is_member = Some(true);
            data.color = Some(color);
            data.z_index = Some(Z_MEMBER);
        }
        None => {
            data.is_member = Some(false);
            data.color = Some(colors.cross_group_edge);
            data.z_index = Some(Z_CROSS_GROUP);
        }
    }

    if edge.data.is_pleio {
        data.color = Some(colors.pleio_edge);
        data.z_index = Some(Z_PLEIO);
    }
    styled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::CATEGORY10;
    use proptest::prelude::*;

    fn focus(groups: &[&str]) -> BTreeSet<String> {
        groups.iter().map(|g| g.to_string()).collect()
    }

    fn nodes(groups: &[(&str, &str)]) -> Vec<NodeElement> {
        groups
            .iter()
            .map(|(id, group)| NodeElement::new(*id, *id, *group))
            .collect()
    }

    #[test]
    fn test_parent_group_is_gray_and_palette_sorted() {
        let nodes = nodes(&[("1", "Z"), ("2", "Y"), ("3", "X")]);
        let colors = StyleColors::default();
        let (map, diagnostic) = build_group_color_map(&nodes, &focus(&["X", "Y"]), &colors);

        assert_eq!(map.parent(), Some("Z"));
        assert_eq!(map.get("Z"), Some(colors.parent_group));
        assert_eq!(map.get("X"), Some(CATEGORY10[0]));
        assert_eq!(map.get("Y"), Some(CATEGORY10[1]));
        assert!(diagnostic.is_none());
    }

    #[test]
    fn test_ambiguous_parent_picks_first_sorted_and_reports() {
        let nodes = nodes(&[("1", "W"), ("2", "V"), ("3", "X")]);
        let (map, diagnostic) =
            build_group_color_map(&nodes, &focus(&["X"]), &StyleColors::default());
        assert_eq!(map.parent(), Some("V"));
        assert_eq!(
            diagnostic,
            Some(Diagnostic::AmbiguousParentGroup {
                candidates: vec!["V".into(), "W".into()],
                chosen: "V".into(),
            })
        );
        // W is not the parent, so it still gets a palette entry.
        assert_eq!(map.get("W"), Some(CATEGORY10[0]));
        assert_eq!(map.get("X"), Some(CATEGORY10[1]));
    }

    #[test]
    fn test_no_parent_when_all_groups_in_focus() {
        let nodes = nodes(&[("1", "X"), ("2", "Y")]);
        let (map, diagnostic) =
            build_group_color_map(&nodes, &focus(&["X", "Y"]), &StyleColors::default());
        assert_eq!(map.parent(), None);
        assert!(diagnostic.is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_inputs_are_a_no_op() {
        let (map, diagnostic) =
            build_group_color_map(&[], &focus(&["X"]), &StyleColors::default());
        assert!(map.is_empty());
        assert!(diagnostic.is_none());
        let id2node = assign_node_colors(&[], &map);
        assert!(id2node.is_empty());
        let (edges, diags) =
            assign_edge_colors(&id2node, &map, &[], None, &StyleColors::default());
        assert!(edges.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_node_colors_follow_group() {
        let nodes = nodes(&[("1", "X"), ("2", "Z")]);
        let (map, _) = build_group_color_map(&nodes, &focus(&["X"]), &StyleColors::default());
        let id2node = assign_node_colors(&nodes, &map);
        assert_eq!(id2node["1"].data.color, Some(CATEGORY10[0]));
        assert_eq!(id2node["2"].data.color, Some(StyleColors::default().parent_group));
        assert!(nodes[0].data.color.is_none());
    }

    #[test]
    fn test_member_edge_and_pleio_override() {
        let colors = StyleColors::default();
        let nodes = nodes(&[("a", "X"), ("b", "X"), ("p", "Z")]);
        let (map, _) = build_group_color_map(&nodes, &focus(&["X"]), &colors);
        let id2node = assign_node_colors(&nodes, &map);

        let plain = EdgeElement::new("e1", "a", "b");
        let flagged = EdgeElement::new("e2", "a", "b").pleiotropic();
        let (styled, diags) =
            assign_edge_colors(&id2node, &map, &[plain, flagged], map.parent(), &colors);
        assert!(diags.is_empty());

        assert_eq!(styled[0].data.is_member, Some(true));
        assert_eq!(styled[0].data.z_index, Some(Z_MEMBER));
        assert_eq!(styled[0].data.color, map.get("X"));

        assert_eq!(styled[1].data.color, Some(Color::WHITE));
        assert_eq!(styled[1].data.z_index, Some(Z_PLEIO));
    }

    #[test]
    fn test_edges_touching_parent_are_cross_group() {
        let colors = StyleColors::default();
        let nodes = nodes(&[("p1", "Z"), ("p2", "Z"), ("a", "X")]);
        let (map, _) = build_group_color_map(&nodes, &focus(&["X"]), &colors);
        let id2node = assign_node_colors(&nodes, &map);
        let edges = vec![EdgeElement::new("e1", "p1", "p2"), EdgeElement::new("e2", "a", "p1")];
        let (styled, _) = assign_edge_colors(&id2node, &map, &edges, map.parent(), &colors);
        for edge in &styled {
            assert_eq!(edge.data.is_member, Some(false));
            assert_eq!(edge.data.color, Some(colors.cross_group_edge));
            assert_eq!(edge.data.z_index, Some(Z_CROSS_GROUP));
        }
    }

    #[test]
    fn test_dangling_endpoint_is_cross_group_with_diagnostic() {
        let colors = StyleColors::default();
        let nodes = nodes(&[("a", "X")]);
        let (map, _) = build_group_color_map(&nodes, &focus(&["X"]), &colors);
        let id2node = assign_node_colors(&nodes, &map);
        let (styled, diags) = assign_edge_colors(
            &id2node,
            &map,
            &[EdgeElement::new("e1", "a", "ghost")],
            map.parent(),
            &colors,
        );
        assert_eq!(styled[0].data.z_index, Some(Z_CROSS_GROUP));
        assert_eq!(
            diags,
            vec![Diagnostic::DanglingEdgeEndpoint {
                edge: "e1".into(),
                endpoint: "ghost".into()
            }]
        );
    }

    fn group_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(String::from)
    }

    proptest! {
        #[test]
        fn prop_group_color_map_is_order_independent(
            groups in prop::collection::vec(group_strategy(), 1..12),
            focus_groups in prop::collection::btree_set(group_strategy(), 0..4),
        ) {
            let forward: Vec<NodeElement> = groups
                .iter()
                .enumerate()
                .map(|(i, g)| NodeElement::new(i.to_string(), "g", g.clone()))
                .collect();
            let mut reversed = forward.clone();
            reversed.reverse();
            let colors = StyleColors::default();
            let (a, _) = build_group_color_map(&forward, &focus_groups, &colors);
            let (b, _) = build_group_color_map(&reversed, &focus_groups, &colors);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_edge_class_decides_final_style(
            source_group in group_strategy(),
            target_group in group_strategy(),
            focus_groups in prop::collection::btree_set(group_strategy(), 0..4),
            is_pleio in any::<bool>(),
        ) {
            let colors = StyleColors::default();
            let nodes = vec![
                NodeElement::new("s", "s", source_group.clone()),
                NodeElement::new("t", "t", target_group.clone()),
            ];
            let (map, _) = build_group_color_map(&nodes, &focus_groups, &colors);
            let id2node = assign_node_colors(&nodes, &map);
            let mut edge = EdgeElement::new("e", "s", "t");
            edge.data.is_pleio = is_pleio;

            let (styled, _) = assign_edge_colors(&id2node, &map, &[edge.clone()], map.parent(), &colors);
            let data = &styled[0].data;
            match classify_edge(&edge, &id2node, map.parent()) {
                EdgeClass::Pleiotropic => {
                    prop_assert!(is_pleio);
                    prop_assert_eq!(data.color, Some(colors.pleio_edge));
                    prop_assert_eq!(data.z_index, Some(Z_PLEIO));
                }
                EdgeClass::Member => {
                    prop_assert!(!is_pleio);
                    prop_assert_eq!(&source_group, &target_group);
                    prop_assert_eq!(data.color, map.get(&source_group));
                    prop_assert_eq!(data.z_index, Some(Z_MEMBER));
                }
                EdgeClass::CrossGroup => {
                    prop_assert!(!is_pleio);
                    prop_assert_eq!(data.color, Some(colors.cross_group_edge));
                    prop_assert_eq!(data.z_index, Some(Z_CROSS_GROUP));
                }
            }
        }
    }
}
