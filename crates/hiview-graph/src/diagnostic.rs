use hiview_core::StyleMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("Node {node} carries no attribute for style mode {mode}")]
    MissingGroupData { mode: StyleMode, node: String },
}

/// Non-fatal findings reported alongside styling results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// More than one base group sits outside the focus set; `chosen` was
    /// treated as the parent group.
    AmbiguousParentGroup {
        candidates: Vec<String>,
        chosen: String,
    },
    /// A style mode fell back to the neutral color for this node.
    MissingGroupData { mode: StyleMode, node: String },
    /// An edge references a node id that is not in the node list.
    DanglingEdgeEndpoint { edge: String, endpoint: String },
}

impl From<StyleError> for Diagnostic {
    fn from(err: StyleError) -> Self {
        match err {
            StyleError::MissingGroupData { mode, node } => {
                Diagnostic::MissingGroupData { mode, node }
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousParentGroup { candidates, chosen } => write!(
                f,
                "ambiguous parent group: {} candidates ({}), using {}",
                candidates.len(),
                candidates.join(", "),
                chosen
            ),
            Diagnostic::MissingGroupData { mode, node } => {
                write!(f, "node {node} has no data for style mode {mode}")
            }
            Diagnostic::DanglingEdgeEndpoint { edge, endpoint } => {
                write!(f, "edge {edge} points at unknown node {endpoint}")
            }
        }
    }
}
