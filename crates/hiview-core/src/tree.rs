//! Arena storage for the ontology hierarchy.
//!
//! Nodes live in a flat `Vec` addressed by [`TreeNodeId`]; each node keeps the
//! index of its parent and the ordered indices of its children. Trees built
//! through [`HierarchyTree::add_child`] or [`HierarchyTree::from_nested`] are
//! well formed by construction. [`HierarchyTree::from_links`] accepts raw
//! parent links as they arrive from an exchange file and may therefore hold
//! dangling parents or cycles; walkers must guard against both.

use crate::{NodeType, TreeError, TreeNodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Attributes of a node before it is placed in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
    /// Stable key used for group lookups.
    pub name: String,
}

impl NodeSpec {
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<NodeType>,
        label: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            label: label.into(),
            name: name.into(),
        }
    }

    /// A group node whose id, label and name are all `name`.
    pub fn group(name: &str) -> Self {
        Self::new(name, NodeType::Group("Assembly".into()), name, name)
    }

    /// A gene leaf whose id, label and name are all `label`.
    pub fn gene(label: &str) -> Self {
        Self::new(label, NodeType::Gene, label, label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
    pub name: String,
    parent: Option<TreeNodeId>,
    children: Vec<TreeNodeId>,
}

impl HierarchyNode {
    fn from_spec(spec: NodeSpec, parent: Option<TreeNodeId>) -> Self {
        Self {
            id: spec.id,
            node_type: spec.node_type,
            label: spec.label,
            name: spec.name,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<TreeNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[TreeNodeId] {
        &self.children
    }

    /// A node without children is a leaf whatever its declared type.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Nested record form of a hierarchy, as handed over by the network loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedNode {
    pub id: String,
    #[serde(alias = "NodeType")]
    pub node_type: NodeType,
    #[serde(alias = "Label")]
    pub label: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<NestedNode>,
}

impl NestedNode {
    fn spec(&self) -> NodeSpec {
        NodeSpec::new(
            self.id.clone(),
            self.node_type.clone(),
            self.label.clone(),
            self.name.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyTree {
    nodes: Vec<HierarchyNode>,
    root: Option<TreeNodeId>,
}

impl HierarchyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(spec: NodeSpec) -> (Self, TreeNodeId) {
        let mut tree = Self::new();
        let root = TreeNodeId(0);
        tree.nodes.push(HierarchyNode::from_spec(spec, None));
        tree.root = Some(root);
        (tree, root)
    }

    pub fn add_root(&mut self, spec: NodeSpec) -> Result<TreeNodeId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::MultipleRoots);
        }
        let id = TreeNodeId(self.nodes.len());
        self.nodes.push(HierarchyNode::from_spec(spec, None));
        self.root = Some(id);
        Ok(id)
    }

    pub fn add_child(&mut self, parent: TreeNodeId, spec: NodeSpec) -> Result<TreeNodeId, TreeError> {
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::UnknownNode { node: parent });
        }
        let id = TreeNodeId(self.nodes.len());
        self.nodes.push(HierarchyNode::from_spec(spec, Some(parent)));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Builds an arena from raw parent links without validating them.
    ///
    /// The first entry without a parent becomes the root. Children are listed
    /// in entry order. Links pointing outside the arena are kept so that
    /// walkers can report them.
    pub fn from_links(entries: Vec<(NodeSpec, Option<TreeNodeId>)>) -> Self {
        let mut tree = Self::new();
        for (index, (spec, parent)) in entries.into_iter().enumerate() {
            if parent.is_none() && tree.root.is_none() {
                tree.root = Some(TreeNodeId(index));
            }
            tree.nodes.push(HierarchyNode::from_spec(spec, parent));
        }
        for index in 0..tree.nodes.len() {
            if let Some(parent) = tree.nodes[index].parent {
                if parent.0 < tree.nodes.len() {
                    tree.nodes[parent.0].children.push(TreeNodeId(index));
                }
            }
        }
        tree
    }

    pub fn from_nested(root: &NestedNode) -> Self {
        let (mut tree, root_id) = Self::with_root(root.spec());
        let mut stack: Vec<(&NestedNode, TreeNodeId)> = vec![(root, root_id)];
        while let Some((nested, id)) = stack.pop() {
            for child in &nested.children {
                let child_id = TreeNodeId(tree.nodes.len());
                tree.nodes.push(HierarchyNode::from_spec(child.spec(), Some(id)));
                tree.nodes[id.0].children.push(child_id);
                stack.push((child, child_id));
            }
        }
        tree
    }

    pub fn root(&self) -> Option<TreeNodeId> {
        self.root
    }

    pub fn require_root(&self) -> Result<TreeNodeId, TreeError> {
        self.root.ok_or(TreeError::EmptyTree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: TreeNodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn get(&self, id: TreeNodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: TreeNodeId) -> Result<&HierarchyNode, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode { node: id })
    }

    /// Parent of `id`, checked against the arena.
    ///
    /// `Ok(None)` only for the root. A parentless non-root node or a link
    /// pointing outside the arena is reported as [`TreeError::MissingParent`].
    pub fn parent_of(&self, id: TreeNodeId) -> Result<Option<TreeNodeId>, TreeError> {
        let node = self.node(id)?;
        match node.parent {
            None if self.root == Some(id) => Ok(None),
            None => Err(TreeError::MissingParent { node: id }),
            Some(parent) if self.contains(parent) => Ok(Some(parent)),
            Some(_) => Err(TreeError::MissingParent { node: id }),
        }
    }

    pub fn children_of(&self, id: TreeNodeId) -> Result<&[TreeNodeId], TreeError> {
        Ok(self.node(id)?.children())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TreeNodeId, &HierarchyNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (TreeNodeId(index), node))
    }

    /// Checks the structural invariants: a single root, a resolvable parent
    /// for every other node, and parent chains that end at the root.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.require_root()?;
        let mut reaches_root: HashSet<TreeNodeId> = HashSet::from([root]);
        for (id, _) in self.iter() {
            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            let mut current = id;
            while !reaches_root.contains(&current) {
                if !seen.insert(current) {
                    return Err(TreeError::Cycle { node: current });
                }
                chain.push(current);
                current = match self.parent_of(current)? {
                    Some(parent) => parent,
                    None => break,
                };
            }
            reaches_root.extend(chain);
        }
        Ok(())
    }
}
