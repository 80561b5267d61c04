//! Recursive directory-tree snapshot returned by `GET /api/get_dirs`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One directory and its subdirectories, in server order.
pub struct DirectoryTreeNode {
    /// Directory base name.
    pub name: String,
    /// Root-relative slash-joined path.
    pub path: String,
    /// Ordered child directories.
    #[serde(default)]
    pub children: Vec<DirectoryTreeNode>,
}

impl DirectoryTreeNode {
    /// Builds a leaf node.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Builds a node with children.
    pub fn with_children(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<DirectoryTreeNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    /// Returns the number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}
