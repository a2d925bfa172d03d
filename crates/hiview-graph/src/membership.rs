//! Lookups between genes, the leaves they occupy, and explicit group flags.

use crate::palette::category_color;
use hiview_core::{Color, EdgeElement, LeafKey, LeafPositions, NodeElement, tags};
use std::collections::{BTreeMap, BTreeSet};

/// For each node's gene symbol, the leaf keys it occupies in `positions`.
pub fn group_members(
    nodes: &[NodeElement],
    positions: &LeafPositions,
) -> BTreeMap<String, Vec<LeafKey>> {
    nodes
        .iter()
        .map(|node| {
            let gene = node.data.name.as_str();
            let keys = positions
                .keys()
                .filter(|key| key.gene == gene)
                .cloned()
                .collect();
            (gene.to_string(), keys)
        })
        .collect()
}

/// Node ids per group id, read from truthy `Group:<id>` attributes.
pub fn member_info(nodes: &[NodeElement]) -> BTreeMap<String, BTreeSet<String>> {
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in nodes {
        for key in node.data.attributes.keys() {
            let Some(group_id) = key.strip_prefix(tags::GROUP_PREFIX) else {
                continue;
            };
            if node.data.attribute_truthy(key) {
                groups
                    .entry(group_id.to_string())
                    .or_default()
                    .insert(node.data.id.clone());
            }
        }
    }
    groups
}

/// Palette color of the first group, by group id order, holding both endpoints.
pub fn group_edge_color(
    edge: &EdgeElement,
    groups: &BTreeMap<String, BTreeSet<String>>,
) -> Option<Color> {
    groups
        .values()
        .position(|members| {
            members.contains(&edge.data.source) && members.contains(&edge.data.target)
        })
        .map(category_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::CATEGORY10;
    use hiview_core::LeafPosition;

    fn leaf(base: &str) -> LeafPosition {
        LeafPosition {
            x: 0.0,
            y: 0.0,
            base: base.into(),
            base_name: base.into(),
            is_root_member: false,
        }
    }

    #[test]
    fn test_group_members_match_whole_gene_symbol() {
        let mut positions = LeafPositions::new();
        positions.insert(LeafKey::new("HLA", "X"), leaf("X"));
        positions.insert(LeafKey::new("HLA-A", "X"), leaf("X"));
        positions.insert(LeafKey::new("HLA-A", "Y"), leaf("Y"));

        let nodes = vec![
            NodeElement::new("1", "HLA", "X"),
            NodeElement::new("2", "HLA-A", "X"),
            NodeElement::new("3", "TP53", "X"),
        ];
        let members = group_members(&nodes, &positions);
        assert_eq!(members["HLA"], vec![LeafKey::new("HLA", "X")]);
        assert_eq!(
            members["HLA-A"],
            vec![LeafKey::new("HLA-A", "X"), LeafKey::new("HLA-A", "Y")]
        );
        assert!(members["TP53"].is_empty());
    }

    #[test]
    fn test_member_info_collects_truthy_flags() {
        let nodes = vec![
            NodeElement::new("1", "a", "X")
                .with_attribute("Group:7", true)
                .with_attribute("Group:3", 1),
            NodeElement::new("2", "b", "X")
                .with_attribute("Group:7", true)
                .with_attribute("Group:3", false),
            NodeElement::new("3", "c", "X").with_attribute("Other", true),
        ];
        let groups = member_info(&nodes);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["3", "7"]);
        assert_eq!(groups["3"], BTreeSet::from(["1".to_string()]));
        assert_eq!(groups["7"], BTreeSet::from(["1".to_string(), "2".to_string()]));
    }

    #[test]
    fn test_group_edge_color_uses_first_shared_group() {
        let groups = BTreeMap::from([
            ("1".to_string(), BTreeSet::from(["a".to_string()])),
            ("2".to_string(), BTreeSet::from(["a".to_string(), "b".to_string()])),
            ("3".to_string(), BTreeSet::from(["a".to_string(), "b".to_string()])),
        ]);
        assert_eq!(
            group_edge_color(&EdgeElement::new("e", "a", "b"), &groups),
            Some(CATEGORY10[1])
        );
        assert_eq!(group_edge_color(&EdgeElement::new("e", "a", "z"), &groups), None);
    }
}
