use crate::TreeNodeId;
use thiserror::Error;

/// Structural problems found while walking a hierarchy.
///
/// Any of these aborts the pass that hit it; callers keep whatever they had
/// cached before.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Hierarchy has no root node")]
    EmptyTree,
    #[error("Hierarchy already has a root; cannot add another")]
    MultipleRoots,
    #[error("Unknown hierarchy node: {node}")]
    UnknownNode { node: TreeNodeId },
    #[error("Node {node} has no parent but is not the root")]
    MissingParent { node: TreeNodeId },
    #[error("Cycle detected at node {node}")]
    Cycle { node: TreeNodeId },
    #[error("Hierarchy deeper than the traversal limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl TreeError {
    /// The node the error was raised at, when there is one.
    pub fn node(&self) -> Option<TreeNodeId> {
        match self {
            TreeError::UnknownNode { node }
            | TreeError::MissingParent { node }
            | TreeError::Cycle { node } => Some(*node),
            TreeError::EmptyTree | TreeError::MultipleRoots | TreeError::DepthExceeded { .. } => {
                None
            }
        }
    }
}
