//! Headless controllers for the file manager's directory and admin pages.
//!
//! State lives in plain structs ([`DirectoryViewState`], [`AdminState`]). User input and request
//! completions are expressed as actions and applied by pure reducers that return effect intents.
//! The [`executor`] turns request intents into service calls. Nothing here touches the DOM, so
//! every controller is testable natively.

pub mod alerts;
pub mod executor;
pub mod model;
pub mod reducer;
pub mod tree;
pub mod upload;

pub use alerts::{Alert, AlertCategory, AlertId, AlertSlot};
pub use executor::{run_admin_request, run_upload, run_view_request};
pub use model::*;
pub use reducer::{
    reduce_admin, reduce_directory_view, AdminAction, AdminEffect, AdminError, AdminRequest,
    ViewAction, ViewEffect, ViewError, ViewRequest,
};
pub use tree::{flatten_directory_tree, DestinationOption, DestinationPicker, PickerKind};
pub use upload::{UploadPhase, UploadSession, UploadSessionId};
