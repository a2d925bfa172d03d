use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod color;
pub mod element;
pub mod error;
pub mod node_type;
pub mod style_mode;
pub mod tree;

pub use color::{Color, ColorParseError};
pub use element::{EdgeData, EdgeElement, NodeData, NodeElement, tags};
pub use error::TreeError;
pub use node_type::NodeType;
pub use style_mode::StyleMode;
pub use tree::{HierarchyNode, HierarchyTree, NestedNode, NodeSpec};

/// Stable index of a node inside a [`HierarchyTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TreeNodeId(pub usize);

impl fmt::Display for TreeNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Composite key of a leaf occurrence: the gene label plus the name of the
/// group that immediately encloses it.
///
/// The same gene shows up once per enclosing group, which is what pleiotropy
/// detection counts on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeafKey {
    pub gene: String,
    pub group: String,
}

impl LeafKey {
    pub fn new(gene: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for LeafKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.gene, self.group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafPosition {
    pub x: f32,
    pub y: f32,
    /// Name of the resolved base group.
    pub base: String,
    /// Display label of the base group, suffixed with `" (Selected)"` when the
    /// base lies outside the current top-group cut.
    pub base_name: String,
    /// The leaf sits directly under the focused root instead of under one of
    /// the displayed subgroups.
    pub is_root_member: bool,
}

/// Leaf positions ordered by key so repeated passes iterate identically.
pub type LeafPositions = BTreeMap<LeafKey, LeafPosition>;

/// Layout coordinates of a top-level group, as relayed from the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPosition {
    pub x: f32,
    pub y: f32,
    pub label: String,
}

pub type GroupPositions = BTreeMap<String, GroupPosition>;
