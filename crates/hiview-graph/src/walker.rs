//! Guarded traversal over a [`HierarchyTree`].
//!
//! Every walk carries a visited set and a depth bound, so a malformed arena
//! (cyclic parent links, unreachable loops) ends in a [`TreeError`] instead of
//! spinning forever.

use hiview_core::{HierarchyNode, HierarchyTree, TreeError, TreeNodeId};
use std::collections::HashSet;

pub const DEFAULT_MAX_DEPTH: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    tree: &'a HierarchyTree,
    max_depth: usize,
}

/// A node reached during a downward walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: TreeNodeId,
    pub parent: Option<TreeNodeId>,
    pub depth: usize,
}

impl<'a> TreeWalker<'a> {
    pub fn new(tree: &'a HierarchyTree) -> Self {
        Self {
            tree,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn tree(&self) -> &'a HierarchyTree {
        self.tree
    }

    pub fn node(&self, id: TreeNodeId) -> Result<&'a HierarchyNode, TreeError> {
        self.tree.node(id)
    }

    pub fn is_leaf(&self, id: TreeNodeId) -> Result<bool, TreeError> {
        Ok(self.tree.node(id)?.is_leaf())
    }

    /// Pre-order walk of the subtree under `start`, children in their stored
    /// order. `start` itself is visited first with `parent: None`.
    pub fn descend<F>(&self, start: TreeNodeId, mut visit: F) -> Result<(), TreeError>
    where
        F: FnMut(Visit) -> Result<(), TreeError>,
    {
        self.tree.node(start)?;
        let mut visited: HashSet<TreeNodeId> = HashSet::new();
        let mut stack = vec![Visit {
            node: start,
            parent: None,
            depth: 0,
        }];
        while let Some(current) = stack.pop() {
            if current.depth > self.max_depth {
                return Err(TreeError::DepthExceeded {
                    limit: self.max_depth,
                });
            }
            if !visited.insert(current.node) {
                return Err(TreeError::Cycle { node: current.node });
            }
            visit(current)?;
            let children = self.tree.children_of(current.node)?;
            for child in children.iter().rev() {
                self.tree.node(*child)?;
                stack.push(Visit {
                    node: *child,
                    parent: Some(current.node),
                    depth: current.depth + 1,
                });
            }
        }
        Ok(())
    }

    /// All leaves under `start` in pre-order.
    pub fn leaves(&self, start: TreeNodeId) -> Result<Vec<TreeNodeId>, TreeError> {
        let mut leaves = Vec::new();
        self.descend(start, |visit| {
            if self.tree.node(visit.node)?.is_leaf() {
                leaves.push(visit.node);
            }
            Ok(())
        })?;
        Ok(leaves)
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: TreeNodeId) -> Result<Vec<TreeNodeId>, TreeError> {
        let mut chain = Vec::new();
        self.walk_up(id, |ancestor| {
            chain.push(ancestor);
            false
        })?;
        Ok(chain)
    }

    /// First strict ancestor of `id` accepted by `stop`, or `None` once the
    /// root has been passed without a match.
    pub fn find_ancestor<P>(&self, id: TreeNodeId, mut stop: P) -> Result<Option<TreeNodeId>, TreeError>
    where
        P: FnMut(&HierarchyNode) -> bool,
    {
        let mut found = None;
        self.walk_up(id, |ancestor| match self.tree.get(ancestor) {
            Some(node) if stop(node) => {
                found = Some(ancestor);
                true
            }
            _ => false,
        })?;
        Ok(found)
    }

    fn walk_up<F>(&self, id: TreeNodeId, mut step: F) -> Result<(), TreeError>
    where
        F: FnMut(TreeNodeId) -> bool,
    {
        let mut seen: HashSet<TreeNodeId> = HashSet::from([id]);
        let mut current = id;
        while let Some(parent) = self.tree.parent_of(current)? {
            if !seen.insert(parent) {
                return Err(TreeError::Cycle { node: parent });
            }
            if seen.len() > self.max_depth + 1 {
                return Err(TreeError::DepthExceeded {
                    limit: self.max_depth,
                });
            }
            if step(parent) {
                break;
            }
            current = parent;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiview_core::NodeSpec;

    fn chain(depth: usize) -> (HierarchyTree, TreeNodeId) {
        let (mut tree, mut current) = HierarchyTree::with_root(NodeSpec::group("G0"));
        for i in 1..=depth {
            current = tree
                .add_child(current, NodeSpec::group(&format!("G{i}")))
                .unwrap();
        }
        (tree, current)
    }

    #[test]
    fn test_leaves_in_preorder() {
        let (mut tree, root) = HierarchyTree::with_root(NodeSpec::group("Root"));
        let x = tree.add_child(root, NodeSpec::group("X")).unwrap();
        let a = tree.add_child(x, NodeSpec::gene("a")).unwrap();
        let b = tree.add_child(root, NodeSpec::gene("b")).unwrap();
        let c = tree.add_child(x, NodeSpec::gene("c")).unwrap();

        let leaves = TreeWalker::new(&tree).leaves(root).unwrap();
        assert_eq!(leaves, vec![a, c, b]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, leaf) = chain(3);
        let names: Vec<String> = TreeWalker::new(&tree)
            .ancestors(leaf)
            .unwrap()
            .into_iter()
            .map(|id| tree.node(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["G2", "G1", "G0"]);
    }

    #[test]
    fn test_find_ancestor_stops_at_first_match() {
        let (tree, leaf) = chain(4);
        let walker = TreeWalker::new(&tree);
        let found = walker
            .find_ancestor(leaf, |node| node.name.starts_with('G'))
            .unwrap()
            .unwrap();
        assert_eq!(tree.node(found).unwrap().name, "G3");
        assert_eq!(walker.find_ancestor(leaf, |_| false).unwrap(), None);
    }

    #[test]
    fn test_depth_limit_is_enforced() {
        let (tree, leaf) = chain(10);
        let walker = TreeWalker::new(&tree).with_max_depth(5);
        assert_eq!(
            walker.ancestors(leaf),
            Err(TreeError::DepthExceeded { limit: 5 })
        );
        assert_eq!(
            walker.leaves(tree.root().unwrap()),
            Err(TreeError::DepthExceeded { limit: 5 })
        );
    }

    #[test]
    fn test_cycle_is_reported_not_looped() {
        let tree = HierarchyTree::from_links(vec![
            (NodeSpec::group("Root"), None),
            (NodeSpec::group("A"), Some(TreeNodeId(2))),
            (NodeSpec::group("B"), Some(TreeNodeId(1))),
        ]);
        let walker = TreeWalker::new(&tree);
        assert!(matches!(
            walker.ancestors(TreeNodeId(1)),
            Err(TreeError::Cycle { .. })
        ));
        assert!(matches!(
            walker.leaves(TreeNodeId(1)),
            Err(TreeError::Cycle { .. })
        ));
    }

    #[test]
    fn test_dangling_parent_surfaces_as_missing_parent() {
        let tree = HierarchyTree::from_links(vec![
            (NodeSpec::group("Root"), None),
            (NodeSpec::gene("a"), Some(TreeNodeId(5))),
        ]);
        assert_eq!(
            TreeWalker::new(&tree).ancestors(TreeNodeId(1)),
            Err(TreeError::MissingParent { node: TreeNodeId(1) })
        );
    }
}
