//! Destination pickers populated from the live directory tree.

use fm_host::{ApiError, DirectoryTreeNode};

/// Label of the synthetic root option.
pub const ROOT_OPTION_LABEL: &str = "Top level";

const INDENT_PER_LEVEL: usize = 4;
const LEAF_MARKER: &str = "└─ ";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One selectable destination.
pub struct DestinationOption {
    /// Indented display label.
    pub label: String,
    /// Root-relative path submitted when chosen; empty for the root.
    pub value: String,
    /// Nesting depth, `0` for the root option and top-level directories.
    pub depth: usize,
}

/// Flattens `tree` depth-first behind a leading root option.
///
/// Top-level directories are unindented; deeper ones are indented four spaces per level and
/// prefixed with a leaf marker. Values are always the canonical path.
pub fn flatten_directory_tree(tree: &[DirectoryTreeNode]) -> Vec<DestinationOption> {
    let mut options = vec![DestinationOption {
        label: ROOT_OPTION_LABEL.to_string(),
        value: String::new(),
        depth: 0,
    }];
    push_nodes(tree, 0, &mut options);
    options
}

fn push_nodes(nodes: &[DirectoryTreeNode], depth: usize, out: &mut Vec<DestinationOption>) {
    for node in nodes {
        let label = if depth == 0 {
            node.name.clone()
        } else {
            format!(
                "{}{LEAF_MARKER}{}",
                " ".repeat(depth * INDENT_PER_LEVEL),
                node.name
            )
        };
        out.push(DestinationOption {
            label,
            value: node.path.clone(),
            depth,
        });
        push_nodes(&node.children, depth + 1, out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which dialog a picker belongs to.
pub enum PickerKind {
    /// Move-destination dialog.
    Move,
    /// Upload-destination dialog.
    Upload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Picker state refreshed from the server on every opening.
pub struct DestinationPicker {
    generation: u64,
    /// `true` while the tree request for the current generation is outstanding.
    pub loading: bool,
    /// Flattened options; holds only the root option until a tree arrives.
    pub options: Vec<DestinationOption>,
    /// Chosen path.
    pub selected: String,
}

impl DestinationPicker {
    /// Starts a new opening with `default_selected` preselected and returns its generation.
    pub fn open(&mut self, default_selected: &str) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.options = flatten_directory_tree(&[]);
        self.selected = default_selected.to_string();
        self.generation
    }

    /// Applies a tree response.
    ///
    /// Responses for an older opening are ignored and `Ok(false)` is returned. A failed request
    /// for the current opening clears the loading flag and hands the error back.
    pub fn apply(
        &mut self,
        generation: u64,
        result: Result<Vec<DirectoryTreeNode>, ApiError>,
    ) -> Result<bool, ApiError> {
        if generation != self.generation {
            return Ok(false);
        }
        self.loading = false;
        let tree = result?;
        self.options = flatten_directory_tree(&tree);
        Ok(true)
    }
}
