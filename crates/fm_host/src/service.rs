//! File-manager service contracts and no-op adapter.

use std::{future::Future, pin::Pin};

use crate::{
    error::ApiError,
    tree::DirectoryTreeNode,
    users::{UserId, UserRecord},
    wire::{
        AddUserRequest, AddUserResponse, CreateFolderRequest, CreateFolderResponse,
        DeleteRequest, DeleteResponse, DirSizeResponse, EditUserRequest, ListDirResponse,
        MessageResponse, MoveRequest, MoveResponse, RenameRequest, UploadProgressSink,
        UploadRequest,
    },
};

/// Object-safe boxed future used by the service traits.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Directory-listing endpoints used by the directory page.
pub trait FileManagerApi {
    /// Fetches the full directory tree.
    fn directory_tree<'a>(&'a self) -> ApiFuture<'a, Result<Vec<DirectoryTreeNode>, ApiError>>;

    /// Computes the recursive size of one directory.
    fn directory_size<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<DirSizeResponse, ApiError>>;

    /// Lists one directory.
    fn list_directory<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<ListDirResponse, ApiError>>;

    /// Creates a folder.
    fn create_folder<'a>(
        &'a self,
        request: &'a CreateFolderRequest,
    ) -> ApiFuture<'a, Result<CreateFolderResponse, ApiError>>;

    /// Renames an entry.
    fn rename<'a>(
        &'a self,
        request: &'a RenameRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>>;

    /// Deletes a batch of entries.
    fn delete<'a>(
        &'a self,
        request: &'a DeleteRequest,
    ) -> ApiFuture<'a, Result<DeleteResponse, ApiError>>;

    /// Moves a batch of entries.
    fn move_items<'a>(
        &'a self,
        request: &'a MoveRequest,
    ) -> ApiFuture<'a, Result<MoveResponse, ApiError>>;

    /// Uploads files, reporting byte-level progress through `progress`.
    fn upload<'a>(
        &'a self,
        request: UploadRequest,
        progress: UploadProgressSink,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>>;
}

/// User-management endpoints used by the admin page.
pub trait AdminApi {
    /// Enables or disables self-service registration.
    fn toggle_registration<'a>(
        &'a self,
        enabled: bool,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>>;

    /// Creates an account.
    fn add_user<'a>(
        &'a self,
        request: &'a AddUserRequest,
    ) -> ApiFuture<'a, Result<AddUserResponse, ApiError>>;

    /// Updates an account.
    fn edit_user<'a>(
        &'a self,
        request: &'a EditUserRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>>;

    /// Deletes an account and its files.
    fn delete_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<MessageResponse, ApiError>>;

    /// Fetches the current server view of one account.
    fn fetch_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<UserRecord, ApiError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op service adapter for unsupported targets and baseline tests.
pub struct NoopFileManagerApi;

impl NoopFileManagerApi {
    fn unsupported(op: &str) -> ApiError {
        ApiError::Unsupported(format!("file manager api unavailable: {op}"))
    }
}

impl FileManagerApi for NoopFileManagerApi {
    fn directory_tree<'a>(&'a self) -> ApiFuture<'a, Result<Vec<DirectoryTreeNode>, ApiError>> {
        Box::pin(async { Err(Self::unsupported("directory_tree")) })
    }

    fn directory_size<'a>(
        &'a self,
        _path: &'a str,
    ) -> ApiFuture<'a, Result<DirSizeResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("directory_size")) })
    }

    fn list_directory<'a>(
        &'a self,
        _path: &'a str,
    ) -> ApiFuture<'a, Result<ListDirResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("list_directory")) })
    }

    fn create_folder<'a>(
        &'a self,
        _request: &'a CreateFolderRequest,
    ) -> ApiFuture<'a, Result<CreateFolderResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("create_folder")) })
    }

    fn rename<'a>(
        &'a self,
        _request: &'a RenameRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("rename")) })
    }

    fn delete<'a>(
        &'a self,
        _request: &'a DeleteRequest,
    ) -> ApiFuture<'a, Result<DeleteResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("delete")) })
    }

    fn move_items<'a>(
        &'a self,
        _request: &'a MoveRequest,
    ) -> ApiFuture<'a, Result<MoveResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("move_items")) })
    }

    fn upload<'a>(
        &'a self,
        _request: UploadRequest,
        _progress: UploadProgressSink,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("upload")) })
    }
}

impl AdminApi for NoopFileManagerApi {
    fn toggle_registration<'a>(
        &'a self,
        _enabled: bool,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("toggle_registration")) })
    }

    fn add_user<'a>(
        &'a self,
        _request: &'a AddUserRequest,
    ) -> ApiFuture<'a, Result<AddUserResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("add_user")) })
    }

    fn edit_user<'a>(
        &'a self,
        _request: &'a EditUserRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("edit_user")) })
    }

    fn delete_user<'a>(&'a self, _id: UserId) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async { Err(Self::unsupported("delete_user")) })
    }

    fn fetch_user<'a>(&'a self, _id: UserId) -> ApiFuture<'a, Result<UserRecord, ApiError>> {
        Box::pin(async { Err(Self::unsupported("fetch_user")) })
    }
}
