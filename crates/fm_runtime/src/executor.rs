//! Runs request intents against the service traits and maps each outcome to its completion
//! action.
//!
//! The executor is host-agnostic: the UI layer spawns these futures on the browser event loop,
//! tests drive them with `block_on` against the in-memory services.

use std::rc::Rc;

use fm_host::{AdminApi, FileManagerApi, UploadProgress, UploadRequest};

use crate::{
    reducer::{AdminAction, AdminRequest, ViewAction, ViewRequest},
    upload::UploadSessionId,
};

/// Executes one directory-page request and returns the action reporting its outcome.
pub async fn run_view_request(api: &dyn FileManagerApi, request: ViewRequest) -> ViewAction {
    match request {
        ViewRequest::DirectoryTree { picker, generation } => ViewAction::DirectoryTreeLoaded {
            picker,
            generation,
            result: api.directory_tree().await,
        },
        ViewRequest::DirectorySize { name, path } => ViewAction::DirSizeCompleted {
            name,
            result: api.directory_size(&path).await.map(|response| response.size),
        },
        ViewRequest::ListDirectory { path } => {
            ViewAction::ListingRefreshed(api.list_directory(&path).await)
        }
        ViewRequest::CreateFolder(request) => {
            ViewAction::CreateFolderCompleted(api.create_folder(&request).await)
        }
        ViewRequest::Rename(request) => {
            let result = api.rename(&request).await;
            ViewAction::RenameCompleted {
                old_name: request.old_name,
                new_name: request.new_name,
                result,
            }
        }
        ViewRequest::Delete(request) => ViewAction::DeleteCompleted(api.delete(&request).await),
        ViewRequest::Move(request) => ViewAction::MoveCompleted(api.move_items(&request).await),
    }
}

/// Sends an upload batch, reporting progress through `dispatch` while bytes are sent, and
/// returns the completion action.
pub async fn run_upload(
    api: &dyn FileManagerApi,
    session: UploadSessionId,
    request: UploadRequest,
    dispatch: Rc<dyn Fn(ViewAction)>,
) -> ViewAction {
    let sink = Rc::new(move |progress: UploadProgress| {
        dispatch(ViewAction::UploadProgressed { session, progress });
    });
    ViewAction::UploadCompleted {
        session,
        result: api.upload(request, sink).await,
    }
}

/// Executes one admin-page request and returns the action reporting its outcome.
pub async fn run_admin_request(api: &dyn AdminApi, request: AdminRequest) -> AdminAction {
    match request {
        AdminRequest::ToggleRegistration { enabled, previous } => {
            AdminAction::RegistrationCompleted {
                previous,
                result: api.toggle_registration(enabled).await,
            }
        }
        AdminRequest::AddUser(request) => {
            AdminAction::AddUserCompleted(api.add_user(&request).await)
        }
        AdminRequest::EditUser(request) => AdminAction::EditUserCompleted {
            id: request.id,
            result: api.edit_user(&request).await,
        },
        AdminRequest::DeleteUser(id) => AdminAction::DeleteUserCompleted {
            id,
            result: api.delete_user(id).await,
        },
        AdminRequest::FetchUser(id) => AdminAction::UserRefreshed {
            id,
            result: api.fetch_user(id).await,
        },
    }
}
