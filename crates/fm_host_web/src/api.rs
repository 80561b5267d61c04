//! Browser service adapters executing `fm_host::http` request descriptions.

use fm_host::{
    decode_response, http, AddUserRequest, AddUserResponse, AdminApi, ApiError, ApiFuture,
    CreateFolderRequest, CreateFolderResponse, DeleteRequest, DeleteResponse, DirSizeResponse,
    DirectoryTreeNode, EditUserRequest, FileManagerApi, HttpRequest, ListDirResponse,
    MessageResponse, MoveRequest, MoveResponse, PageContext, RenameRequest, UploadProgressSink,
    UploadRequest, UserId, UserRecord, UserResponse,
};
use serde::de::DeserializeOwned;

async fn execute<T: DeserializeOwned>(request: HttpRequest) -> Result<T, ApiError> {
    let response = crate::bridge::send(request, None).await?;
    decode_response(&response)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Directory endpoints over `XMLHttpRequest`, signed with the page's anti-forgery token.
pub struct WebFileManagerApi {
    csrf_token: String,
}

impl WebFileManagerApi {
    /// Builds an adapter for the page described by `page`.
    pub fn new(page: &PageContext) -> Self {
        Self {
            csrf_token: page.csrf_token.clone(),
        }
    }
}

impl FileManagerApi for WebFileManagerApi {
    fn directory_tree<'a>(&'a self) -> ApiFuture<'a, Result<Vec<DirectoryTreeNode>, ApiError>> {
        Box::pin(async move { execute(http::directory_tree(&self.csrf_token)).await })
    }

    fn directory_size<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<DirSizeResponse, ApiError>> {
        Box::pin(async move { execute(http::directory_size(&self.csrf_token, path)).await })
    }

    fn list_directory<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<ListDirResponse, ApiError>> {
        Box::pin(async move { execute(http::list_directory(&self.csrf_token, path)).await })
    }

    fn create_folder<'a>(
        &'a self,
        request: &'a CreateFolderRequest,
    ) -> ApiFuture<'a, Result<CreateFolderResponse, ApiError>> {
        Box::pin(async move { execute(http::create_folder(&self.csrf_token, request)).await })
    }

    fn rename<'a>(
        &'a self,
        request: &'a RenameRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move { execute(http::rename(&self.csrf_token, request)).await })
    }

    fn delete<'a>(
        &'a self,
        request: &'a DeleteRequest,
    ) -> ApiFuture<'a, Result<DeleteResponse, ApiError>> {
        Box::pin(async move { execute(http::delete(&self.csrf_token, request)).await })
    }

    fn move_items<'a>(
        &'a self,
        request: &'a MoveRequest,
    ) -> ApiFuture<'a, Result<MoveResponse, ApiError>> {
        Box::pin(async move { execute(http::move_items(&self.csrf_token, request)).await })
    }

    fn upload<'a>(
        &'a self,
        request: UploadRequest,
        progress: UploadProgressSink,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            let http_request = http::upload(&self.csrf_token, request);
            let response = crate::bridge::send(http_request, Some(progress)).await?;
            if response.is_success() && response.body.trim().is_empty() {
                return Ok(MessageResponse {
                    message: String::new(),
                });
            }
            decode_response(&response)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Admin endpoints over `XMLHttpRequest`, signed with the page's anti-forgery token.
pub struct WebAdminApi {
    csrf_token: String,
}

impl WebAdminApi {
    /// Builds an adapter for the page described by `page`.
    pub fn new(page: &PageContext) -> Self {
        Self {
            csrf_token: page.csrf_token.clone(),
        }
    }
}

impl AdminApi for WebAdminApi {
    fn toggle_registration<'a>(
        &'a self,
        enabled: bool,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move { execute(http::toggle_registration(&self.csrf_token, enabled)).await })
    }

    fn add_user<'a>(
        &'a self,
        request: &'a AddUserRequest,
    ) -> ApiFuture<'a, Result<AddUserResponse, ApiError>> {
        Box::pin(async move { execute(http::add_user(&self.csrf_token, request)).await })
    }

    fn edit_user<'a>(
        &'a self,
        request: &'a EditUserRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move { execute(http::edit_user(&self.csrf_token, request)).await })
    }

    fn delete_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move { execute(http::delete_user(&self.csrf_token, id)).await })
    }

    fn fetch_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<UserRecord, ApiError>> {
        Box::pin(async move {
            let response: UserResponse = execute(http::fetch_user(&self.csrf_token, id)).await?;
            Ok(response.user)
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::rc::Rc;

    use fm_host::UploadPayload;
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_builds_report_unsupported_transport() {
        let page = PageContext::new("docs", "tok");
        let api = WebFileManagerApi::new(&page);
        let err = block_on(api.list_directory("docs")).expect_err("no browser");
        assert!(matches!(
            err,
            ApiError::Unsupported(ref message) if message.contains("/api/list_dir/docs")
        ));

        let err = block_on(api.upload(
            UploadRequest {
                destination_path: "docs".into(),
                files: vec![UploadPayload::from_bytes("a.txt", vec![1])],
            },
            Rc::new(|_: fm_host::UploadProgress| {}),
        ))
        .expect_err("no browser");
        assert!(matches!(err, ApiError::Unsupported(_)));

        let admin = WebAdminApi::new(&page);
        assert!(matches!(
            block_on(admin.fetch_user(UserId(1))),
            Err(ApiError::Unsupported(_))
        ));
    }
}
