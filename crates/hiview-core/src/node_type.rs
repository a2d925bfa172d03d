use serde::{Deserialize, Serialize};
use std::fmt;

pub const GENE_TYPE: &str = "Gene";

/// Declared type of a hierarchy node. Anything that is not `"Gene"` is a group
/// type (assembly, subsystem, term, ...) and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Gene,
    Group(String),
}

impl NodeType {
    pub fn is_gene(&self) -> bool {
        matches!(self, NodeType::Gene)
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Gene => GENE_TYPE,
            NodeType::Group(kind) => kind,
        }
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        if value == GENE_TYPE {
            NodeType::Gene
        } else {
            NodeType::Group(value)
        }
    }
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        NodeType::from(value.to_string())
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
