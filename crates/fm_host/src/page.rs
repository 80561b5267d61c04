//! Page-scoped immutable context handed to every controller and transport.

use crate::path::normalize_relative_path;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Context fixed for the lifetime of one rendered page.
pub struct PageContext {
    /// Directory being viewed, root-relative; empty for the root and on the admin page.
    pub current_path: String,
    /// Anti-forgery token attached to every request.
    pub csrf_token: String,
}

impl PageContext {
    /// Builds a context, normalizing `current_path`.
    pub fn new(current_path: &str, csrf_token: impl Into<String>) -> Self {
        Self {
            current_path: normalize_relative_path(current_path),
            csrf_token: csrf_token.into(),
        }
    }

    /// Returns `true` when the root directory is being viewed.
    pub fn is_root(&self) -> bool {
        self.current_path.is_empty()
    }
}
