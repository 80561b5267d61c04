//! Leptos components for the file manager's directory and admin pages.
//!
//! [`DirectoryViewProvider`] and [`AdminProvider`] own the headless `fm_runtime` state in signals
//! and run reducer-emitted effects through an explicit effect queue. [`DirectoryPage`] and
//! [`AdminPage`] render that state with the shared primitives and dispatch every user input back
//! as a reducer action.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod components;
pub mod effect_executor;
mod host_ui;
pub mod primitives;
pub mod runtime_context;

pub use components::{AdminPage, DirectoryPage};
pub use runtime_context::{
    use_admin, use_directory_view, AdminContext, AdminProvider, DirectoryViewContext,
    DirectoryViewProvider,
};
