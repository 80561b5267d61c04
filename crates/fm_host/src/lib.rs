//! Typed contracts and shared models of the web file manager.
//!
//! This crate is the API-first boundary between the page controllers in `fm_runtime` and the
//! browser transport in `fm_host_web`. It owns the listing/tree/user models, the request and
//! response payloads, transport-neutral request descriptions, and the service traits together
//! with no-op and in-memory adapters.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod http;
pub mod listing;
pub mod memory;
pub mod page;
pub mod path;
pub mod service;
pub mod tree;
pub mod users;
pub mod wire;

pub use error::{ApiError, UNKNOWN_ERROR_MESSAGE};
pub use http::{
    decode_response, directory_url, download_url, encode_path, view_url, HttpRequest, HttpResponse,
    Method, RequestBody,
};
pub use listing::{
    format_size_bytes, is_previewable, preview_kind, sort_listing, EntrySize, ListingEntry,
    PreviewKind, SIZE_PLACEHOLDER,
};
pub use memory::{MemoryAdminApi, MemoryFileManagerApi};
pub use page::PageContext;
pub use path::{
    breadcrumbs, file_name, is_same_or_descendant, join_relative_path, normalize_relative_path,
    parent_relative_path, Breadcrumb,
};
pub use service::{AdminApi, ApiFuture, FileManagerApi, NoopFileManagerApi};
pub use tree::DirectoryTreeNode;
pub use users::{Permission, PermissionSet, UserId, UserRecord, UserRole, UserSummary};
pub use wire::{
    AddUserRequest, AddUserResponse, AdminBootstrap, CreateFolderRequest, CreateFolderResponse,
    DeleteRequest, DeleteResponse, DirSizeResponse, EditUserRequest, ErrorBody, ListDirResponse,
    MessageResponse, MoveRequest, MoveResponse, RenameRequest, UploadBody, UploadPayload,
    UploadProgress, UploadProgressSink, UploadRequest, UserResponse,
};
