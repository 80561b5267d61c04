//! Browser (`wasm32`) implementations of the [`fm_host`] service contracts.
//!
//! Requests described by `fm_host::http` are executed over `XMLHttpRequest` so uploads can report
//! byte-level progress. Page-scoped data (anti-forgery token, current directory, admin bootstrap)
//! is read from the DOM.
//!
//! Bridge bindings live under `bridge/`:
//! - `bridge::interop` (wasm transport and DOM reads, plus the non-wasm "unsupported" shim)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod api;
mod bridge;
pub mod page;

pub use api::{WebAdminApi, WebFileManagerApi};
pub use page::{
    read_admin_bootstrap, read_page_context, PageDataError, ADMIN_BOOTSTRAP_ELEMENT_ID,
    CSRF_META_NAME,
};
