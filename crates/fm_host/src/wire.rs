//! Request and response payloads of the file-manager HTTP endpoints.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    listing::ListingEntry,
    users::{PermissionSet, UserId, UserRecord, UserRole, UserSummary},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /create_folder`.
pub struct CreateFolderRequest {
    /// Directory the folder is created in.
    pub current_path: String,
    /// New folder name.
    pub folder_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /rename`.
pub struct RenameRequest {
    /// Directory holding the entry.
    pub current_path: String,
    /// Existing name.
    pub old_name: String,
    /// Requested name.
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /delete`.
pub struct DeleteRequest {
    /// Directory holding the entries.
    pub current_path: String,
    /// Names to delete.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /move`.
pub struct MoveRequest {
    /// Directory holding the entries.
    pub current_path: String,
    /// Names to move.
    pub items: Vec<String>,
    /// Root-relative destination directory (empty for the root).
    pub destination_folder: String,
}

#[derive(Debug, Clone, PartialEq)]
/// File content attached to an upload.
pub enum UploadBody {
    /// In-memory bytes.
    Bytes(Vec<u8>),
    /// Browser file handle picked from a file input.
    #[cfg(target_arch = "wasm32")]
    BrowserFile(web_sys::File),
}

#[derive(Debug, Clone, PartialEq)]
/// One file of an upload batch.
pub struct UploadPayload {
    /// File name reported to the server.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Content.
    pub body: UploadBody,
}

impl UploadPayload {
    /// Builds a payload from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            body: UploadBody::Bytes(bytes),
        }
    }

    /// Wraps a browser file handle.
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser_file(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            size_bytes: file.size() as u64,
            body: UploadBody::BrowserFile(file),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// `POST /upload/` (multipart).
pub struct UploadRequest {
    /// Root-relative destination directory.
    pub destination_path: String,
    /// Files to send as repeated `files[]` parts.
    pub files: Vec<UploadPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Byte-level progress of an in-flight upload.
pub struct UploadProgress {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total bytes, when the transport can compute it.
    pub total: Option<u64>,
}

impl UploadProgress {
    /// Rounded completion percentage, or `None` when the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total?;
        if total == 0 {
            return Some(100);
        }
        let ratio = (self.loaded.min(total) as f64 / total as f64) * 100.0;
        Some(ratio.round().clamp(0.0, 100.0) as u8)
    }
}

/// Callback receiving upload progress events.
pub type UploadProgressSink = Rc<dyn Fn(UploadProgress)>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /admin/add_user`.
pub struct AddUserRequest {
    /// Login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Account role.
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// `POST /admin/edit_user/{id}`.
pub struct EditUserRequest {
    /// Target account.
    pub id: UserId,
    /// New login name.
    pub username: String,
    /// New password; `None` keeps the current one.
    pub password: Option<String>,
    /// New role.
    pub role: UserRole,
    /// New permission flags.
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body carrying only a status message.
pub struct MessageResponse {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `POST /create_folder`.
pub struct CreateFolderResponse {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// The created entry.
    pub item: ListingEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `POST /delete`.
pub struct DeleteResponse {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// Names actually deleted.
    #[serde(default)]
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `POST /move`.
pub struct MoveResponse {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// Names actually moved.
    #[serde(default)]
    pub moved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `GET /api/get_dir_size/{path}`.
pub struct DirSizeResponse {
    /// Preformatted recursive size.
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `GET /api/list_dir/{path}`.
pub struct ListDirResponse {
    /// Listed directory.
    #[serde(default)]
    pub path: String,
    /// Entries of the directory.
    pub entries: Vec<ListingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `POST /admin/add_user`.
pub struct AddUserResponse {
    /// Human-readable status.
    #[serde(default)]
    pub message: String,
    /// The new account.
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Success body of `GET /admin/user/{id}`.
pub struct UserResponse {
    /// Current server view of the account.
    pub user: UserRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Initial admin-page data embedded by the server as JSON.
pub struct AdminBootstrap {
    /// Whether self-registration is currently open.
    #[serde(default)]
    pub registration_enabled: bool,
    /// Accounts listed in the user table.
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Failure body shared by every endpoint.
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_percent_rounds_and_requires_total() {
        let progress = |loaded, total| UploadProgress { loaded, total };
        assert_eq!(progress(0, Some(200)).percent(), Some(0));
        assert_eq!(progress(1, Some(200)).percent(), Some(1));
        assert_eq!(progress(199, Some(200)).percent(), Some(100));
        assert_eq!(progress(50, None).percent(), None);
        assert_eq!(progress(500, Some(200)).percent(), Some(100));
        assert_eq!(progress(0, Some(0)).percent(), Some(100));
    }

    #[test]
    fn delete_response_tolerates_missing_lists() {
        let response: DeleteResponse =
            serde_json::from_str(r#"{"message":"done"}"#).expect("deserialize");
        assert!(response.deleted.is_empty());
    }
}
