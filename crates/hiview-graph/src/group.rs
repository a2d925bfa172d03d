//! Base-group resolution for leaves under the focused subtree.
//!
//! The top-group cut is taken from the focused node's immediate non-gene
//! children. Every leaf is then tagged with its nearest ancestor from that cut
//! (its base group), falling back to the root of the whole hierarchy when no
//! ancestor belongs to the cut.

use crate::walker::TreeWalker;
use hiview_core::{
    GroupPosition, GroupPositions, HierarchyTree, LeafKey, LeafPosition, LeafPositions,
    TreeError, TreeNodeId, Vec2,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

pub const SELECTED_SUFFIX: &str = " (Selected)";

/// Group names that form the current top-level cut, with their labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGroupSet {
    labels: BTreeMap<String, String>,
}

impl TopGroupSet {
    pub fn from_focus(tree: &HierarchyTree, focus: TreeNodeId) -> Result<Self, TreeError> {
        let mut labels = BTreeMap::new();
        for child in tree.children_of(focus)? {
            let node = tree.node(*child)?;
            if !node.node_type.is_gene() {
                labels.insert(node.name.clone(), node.label.clone());
            }
        }
        Ok(Self { labels })
    }

    pub fn from_pairs<I, N, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(name, label)| (name.into(), label.into()))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.labels.keys().cloned().collect()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Source of layout coordinates computed by an external layout engine.
pub trait LayoutSource {
    fn coordinates(&self, node: TreeNodeId) -> Option<Vec2>;
}

impl LayoutSource for HashMap<TreeNodeId, Vec2> {
    fn coordinates(&self, node: TreeNodeId) -> Option<Vec2> {
        self.get(&node).copied()
    }
}

impl LayoutSource for BTreeMap<TreeNodeId, Vec2> {
    fn coordinates(&self, node: TreeNodeId) -> Option<Vec2> {
        self.get(&node).copied()
    }
}

/// Layout with no coordinates; every node sits at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayout;

impl LayoutSource for NoLayout {
    fn coordinates(&self, _node: TreeNodeId) -> Option<Vec2> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub top_groups: TopGroupSet,
    pub positions: LeafPositions,
}

#[derive(Debug, Clone, Copy)]
pub struct GroupResolver<'a> {
    walker: TreeWalker<'a>,
}

impl<'a> GroupResolver<'a> {
    pub fn new(tree: &'a HierarchyTree) -> Self {
        Self {
            walker: TreeWalker::new(tree),
        }
    }

    pub fn with_walker(walker: TreeWalker<'a>) -> Self {
        Self { walker }
    }

    pub fn top_groups(&self, focus: TreeNodeId) -> Result<TopGroupSet, TreeError> {
        TopGroupSet::from_focus(self.walker.tree(), focus)
    }

    /// Nearest strict ancestor of `node` in the cut; the hierarchy root when
    /// none qualifies; `node` itself when it is the root.
    pub fn base_group(&self, node: TreeNodeId, top: &TopGroupSet) -> Result<TreeNodeId, TreeError> {
        let tree = self.walker.tree();
        let ancestors = self.walker.ancestors(node)?;
        let in_cut = ancestors.iter().copied().find(|ancestor| {
            tree.get(*ancestor)
                .is_some_and(|candidate| top.contains(&candidate.name))
        });
        Ok(in_cut.or(ancestors.last().copied()).unwrap_or(node))
    }

    pub fn resolve_positions(
        &self,
        focus: TreeNodeId,
        layout: &dyn LayoutSource,
    ) -> Result<LeafPositions, TreeError> {
        Ok(self.resolve(focus, layout)?.positions)
    }

    pub fn resolve(
        &self,
        focus: TreeNodeId,
        layout: &dyn LayoutSource,
    ) -> Result<Resolution, TreeError> {
        let tree = self.walker.tree();
        let top_groups = self.top_groups(focus)?;
        let mut positions = LeafPositions::new();
        let mut bases: HashMap<TreeNodeId, TreeNodeId> = HashMap::new();

        self.walker.descend(focus, |visit| {
            let Some(parent) = visit.parent else {
                bases.insert(visit.node, self.base_group(visit.node, &top_groups)?);
                return Ok(());
            };
            let parent_node = tree.node(parent)?;
            let base = if top_groups.contains(&parent_node.name) {
                parent
            } else {
                match bases.get(&parent) {
                    Some(base) => *base,
                    None => self.base_group(visit.node, &top_groups)?,
                }
            };
            bases.insert(visit.node, base);

            let node = tree.node(visit.node)?;
            if !node.is_leaf() {
                return Ok(());
            }

            let base_node = tree.node(base)?;
            let base_in_cut = top_groups.contains(&base_node.name);
            let mut base_name = top_groups
                .label(&base_node.name)
                .unwrap_or(&base_node.label)
                .to_string();
            if !base_in_cut {
                base_name.push_str(SELECTED_SUFFIX);
            }
            let coords = layout.coordinates(visit.node).unwrap_or_default();
            positions.insert(
                LeafKey::new(node.label.clone(), parent_node.name.clone()),
                LeafPosition {
                    x: coords.x,
                    y: coords.y,
                    base: base_node.name.clone(),
                    base_name,
                    is_root_member: !top_groups.contains(&parent_node.name),
                },
            );
            Ok(())
        })?;

        debug!(
            focus = %focus,
            top_groups = top_groups.len(),
            leaves = positions.len(),
            "Resolved leaf positions"
        );
        Ok(Resolution {
            top_groups,
            positions,
        })
    }

    /// Coordinates of each top-level group under `focus`.
    pub fn group_positions(
        &self,
        focus: TreeNodeId,
        layout: &dyn LayoutSource,
    ) -> Result<GroupPositions, TreeError> {
        let tree = self.walker.tree();
        let mut groups = GroupPositions::new();
        for child in tree.children_of(focus)? {
            let node = tree.node(*child)?;
            if node.node_type.is_gene() {
                continue;
            }
            let coords = layout.coordinates(*child).unwrap_or_default();
            groups.insert(
                node.name.clone(),
                GroupPosition {
                    x: coords.x,
                    y: coords.y,
                    label: node.label.clone(),
                },
            );
        }
        Ok(groups)
    }
}
