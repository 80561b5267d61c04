//! Transport-neutral HTTP request descriptions and response decoding.
//!
//! Concrete transports (`fm_host_web` in the browser) only have to execute an [`HttpRequest`]
//! and hand back an [`HttpResponse`]. URL layout, form encoding, and JSON decoding live here and
//! are tested off-browser.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    path::normalize_relative_path,
    users::UserId,
    wire::{
        AddUserRequest, CreateFolderRequest, DeleteRequest, EditUserRequest, ErrorBody,
        MoveRequest, RenameRequest, UploadPayload, UploadRequest,
    },
};

/// Form field carrying the anti-forgery token.
pub const CSRF_FIELD: &str = "csrf_token";
/// Header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Repeated form field naming selected entries.
pub const ITEMS_FIELD: &str = "items[]";
/// Repeated multipart field carrying uploaded files.
pub const FILES_FIELD: &str = "files[]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// HTTP method.
pub enum Method {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
}

impl Method {
    /// Method token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
/// Request body.
pub enum RequestBody {
    /// No body.
    Empty,
    /// `application/x-www-form-urlencoded` pairs, in order, repeated names allowed.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` text fields plus named file parts.
    Multipart {
        /// Text fields.
        fields: Vec<(String, String)>,
        /// File parts as `(field name, payload)`.
        files: Vec<(String, UploadPayload)>,
    },
}

#[derive(Debug, Clone)]
/// A fully described request ready for a transport.
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Unencoded root-relative URL (`/view/docs/a b.txt`); transports URI-encode it.
    pub url: String,
    /// Anti-forgery token sent as [`CSRF_HEADER`].
    pub csrf_token: String,
    /// Body.
    pub body: RequestBody,
}

impl HttpRequest {
    fn get(url: String, csrf_token: &str) -> Self {
        Self {
            method: Method::Get,
            url,
            csrf_token: csrf_token.to_string(),
            body: RequestBody::Empty,
        }
    }

    fn post_form(url: String, csrf_token: &str, mut fields: Vec<(String, String)>) -> Self {
        fields.push((CSRF_FIELD.to_string(), csrf_token.to_string()));
        Self {
            method: Method::Post,
            url,
            csrf_token: csrf_token.to_string(),
            body: RequestBody::Form(fields),
        }
    }

    /// Returns the form fields of a form or multipart body.
    pub fn form_fields(&self) -> &[(String, String)] {
        match &self.body {
            RequestBody::Empty => &[],
            RequestBody::Form(fields) | RequestBody::Multipart { fields, .. } => fields,
        }
    }

    /// Returns every value sent under `name`, in order.
    pub fn field_values(&self, name: &str) -> Vec<&str> {
        self.form_fields()
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw response handed back by a transport.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response text.
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decodes a JSON success body, or maps a non-2xx response to [`ApiError::Rejected`].
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] for non-2xx statuses (with the `error` field when the body has
/// one) and [`ApiError::Decode`] when a 2xx body does not match `T`.
pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .map(|body| body.error);
        return Err(ApiError::Rejected {
            status: response.status,
            message,
        });
    }
    serde_json::from_str(&response.body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn bool_token(value: bool) -> String {
    value.to_string()
}

/// Bytes escaped inside one path segment; everything `encodeURIComponent` escapes.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalizes `path` and percent-encodes each segment, keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    normalize_relative_path(path)
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn field(name: &str, value: impl Into<String>) -> (String, String) {
    (name.to_string(), value.into())
}

/// `GET /{path}`: the directory page for `path`.
pub fn directory_url(path: &str) -> String {
    format!("/{}", encode_path(path))
}

/// `GET /view/{path}`: embeddable preview document.
pub fn view_url(path: &str) -> String {
    format!("/view/{}", encode_path(path))
}

/// `GET /download/{path}`: file bytes as an attachment.
pub fn download_url(path: &str) -> String {
    format!("/download/{}", encode_path(path))
}

/// `GET /api/get_dirs`.
pub fn directory_tree(csrf_token: &str) -> HttpRequest {
    HttpRequest::get("/api/get_dirs".to_string(), csrf_token)
}

/// `GET /api/get_dir_size/{path}`.
pub fn directory_size(csrf_token: &str, path: &str) -> HttpRequest {
    HttpRequest::get(
        format!("/api/get_dir_size/{}", encode_path(path)),
        csrf_token,
    )
}

/// `GET /api/list_dir/{path}`.
pub fn list_directory(csrf_token: &str, path: &str) -> HttpRequest {
    HttpRequest::get(
        format!("/api/list_dir/{}", encode_path(path)),
        csrf_token,
    )
}

/// `POST /create_folder`.
pub fn create_folder(csrf_token: &str, request: &CreateFolderRequest) -> HttpRequest {
    HttpRequest::post_form(
        "/create_folder".to_string(),
        csrf_token,
        vec![
            field("current_path", request.current_path.as_str()),
            field("folder_name", request.folder_name.as_str()),
        ],
    )
}

/// `POST /rename`.
pub fn rename(csrf_token: &str, request: &RenameRequest) -> HttpRequest {
    HttpRequest::post_form(
        "/rename".to_string(),
        csrf_token,
        vec![
            field("current_path", request.current_path.as_str()),
            field("old_name", request.old_name.as_str()),
            field("new_name", request.new_name.as_str()),
        ],
    )
}

/// `POST /delete`.
pub fn delete(csrf_token: &str, request: &DeleteRequest) -> HttpRequest {
    let mut fields = vec![field("current_path", request.current_path.as_str())];
    fields.extend(
        request
            .items
            .iter()
            .map(|item| field(ITEMS_FIELD, item.as_str())),
    );
    HttpRequest::post_form("/delete".to_string(), csrf_token, fields)
}

/// `POST /move`.
pub fn move_items(csrf_token: &str, request: &MoveRequest) -> HttpRequest {
    let mut fields = vec![field("current_path", request.current_path.as_str())];
    fields.extend(
        request
            .items
            .iter()
            .map(|item| field(ITEMS_FIELD, item.as_str())),
    );
    fields.push(field(
        "destination_folder",
        request.destination_folder.as_str(),
    ));
    HttpRequest::post_form("/move".to_string(), csrf_token, fields)
}

/// `POST /upload/` as multipart.
pub fn upload(csrf_token: &str, request: UploadRequest) -> HttpRequest {
    let fields = vec![
        field("destination_path", request.destination_path),
        field(CSRF_FIELD, csrf_token),
    ];
    let files = request
        .files
        .into_iter()
        .map(|file| (FILES_FIELD.to_string(), file))
        .collect();
    HttpRequest {
        method: Method::Post,
        url: "/upload/".to_string(),
        csrf_token: csrf_token.to_string(),
        body: RequestBody::Multipart { fields, files },
    }
}

/// `POST /admin/toggle_registration`.
pub fn toggle_registration(csrf_token: &str, enabled: bool) -> HttpRequest {
    HttpRequest::post_form(
        "/admin/toggle_registration".to_string(),
        csrf_token,
        vec![field("enabled", bool_token(enabled))],
    )
}

/// `POST /admin/add_user`.
pub fn add_user(csrf_token: &str, request: &AddUserRequest) -> HttpRequest {
    HttpRequest::post_form(
        "/admin/add_user".to_string(),
        csrf_token,
        vec![
            field("username", request.username.as_str()),
            field("password", request.password.as_str()),
            field("role", request.role.as_str()),
        ],
    )
}

/// `POST /admin/edit_user/{id}`.
pub fn edit_user(csrf_token: &str, request: &EditUserRequest) -> HttpRequest {
    let mut fields = vec![field("username", request.username.as_str())];
    if let Some(password) = request.password.as_deref() {
        fields.push(field("password", password));
    }
    fields.push(field("role", request.role.as_str()));
    fields.extend(crate::users::Permission::ALL.iter().map(|permission| {
        field(
            permission.field_name(),
            bool_token(request.permissions.get(*permission)),
        )
    }));
    HttpRequest::post_form(
        format!("/admin/edit_user/{}", request.id),
        csrf_token,
        fields,
    )
}

/// `POST /admin/delete_user/{id}`.
pub fn delete_user(csrf_token: &str, id: UserId) -> HttpRequest {
    HttpRequest::post_form(format!("/admin/delete_user/{id}"), csrf_token, Vec::new())
}

/// `GET /admin/user/{id}`.
pub fn fetch_user(csrf_token: &str, id: UserId) -> HttpRequest {
    HttpRequest::get(format!("/admin/user/{id}"), csrf_token)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        users::{Permission, PermissionSet, UserRole},
        wire::{DeleteResponse, MessageResponse},
    };

    #[test]
    fn delete_request_repeats_items_field_and_appends_token() {
        let request = delete(
            "tok",
            &DeleteRequest {
                current_path: "docs".to_string(),
                items: vec!["a.txt".to_string(), "b.txt".to_string()],
            },
        );

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "/delete");
        assert_eq!(request.field_values(ITEMS_FIELD), vec!["a.txt", "b.txt"]);
        assert_eq!(request.field_values("current_path"), vec!["docs"]);
        assert_eq!(request.field_values(CSRF_FIELD), vec!["tok"]);
        assert_eq!(request.csrf_token, "tok");
    }

    #[test]
    fn move_request_carries_destination_even_for_root() {
        let request = move_items(
            "tok",
            &MoveRequest {
                current_path: "docs".to_string(),
                items: vec!["a.txt".to_string()],
                destination_folder: String::new(),
            },
        );
        assert_eq!(request.field_values("destination_folder"), vec![""]);
    }

    #[test]
    fn edit_user_omits_empty_password_and_encodes_flags() {
        let mut permissions = PermissionSet::all_granted();
        permissions.set(Permission::Delete, false);
        let request = edit_user(
            "tok",
            &EditUserRequest {
                id: UserId(4),
                username: "mia".to_string(),
                password: None,
                role: UserRole::User,
                permissions,
            },
        );

        assert_eq!(request.url, "/admin/edit_user/4");
        assert!(request.field_values("password").is_empty());
        assert_eq!(request.field_values("can_delete"), vec!["false"]);
        assert_eq!(request.field_values("can_upload"), vec!["true"]);
        assert_eq!(request.field_values("role"), vec!["user"]);
    }

    #[test]
    fn upload_request_is_multipart_with_repeated_files() {
        let request = upload(
            "tok",
            UploadRequest {
                destination_path: "media".to_string(),
                files: vec![
                    UploadPayload::from_bytes("a.png", vec![1, 2, 3]),
                    UploadPayload::from_bytes("b.png", vec![4]),
                ],
            },
        );

        match &request.body {
            RequestBody::Multipart { files, .. } => {
                let names: Vec<(&str, &str)> = files
                    .iter()
                    .map(|(field, file)| (field.as_str(), file.name.as_str()))
                    .collect();
                assert_eq!(names, vec![(FILES_FIELD, "a.png"), (FILES_FIELD, "b.png")]);
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
        assert_eq!(request.field_values("destination_path"), vec!["media"]);
    }

    #[test]
    fn urls_normalize_paths() {
        assert_eq!(view_url("/docs/a.txt"), "/view/docs/a.txt");
        assert_eq!(download_url("docs//a.txt"), "/download/docs/a.txt");
        assert_eq!(directory_url(""), "/");
        assert_eq!(directory_size("t", "docs/").url, "/api/get_dir_size/docs");
    }

    #[test]
    fn urls_escape_reserved_characters_per_segment() {
        assert_eq!(view_url("docs/a#b.txt"), "/view/docs/a%23b.txt");
        assert_eq!(download_url("docs/100%?.txt"), "/download/docs/100%25%3F.txt");
        assert_eq!(
            directory_size("t", "docs/q#1").url,
            "/api/get_dir_size/docs/q%231"
        );
        assert_eq!(list_directory("t", "a&b/c d").url, "/api/list_dir/a%26b/c%20d");
        assert_eq!(directory_url("r\u{e9}sum\u{e9}"), "/r%C3%A9sum%C3%A9");
        assert_eq!(encode_path("it's (1)!.txt"), "it's%20(1)!.txt");
    }

    #[test]
    fn decode_maps_error_bodies_and_bad_json() {
        let rejected = decode_response::<MessageResponse>(&HttpResponse {
            status: 400,
            body: r#"{"error":"name already exists"}"#.to_string(),
        })
        .expect_err("400 should fail");
        assert_eq!(rejected, ApiError::rejected(400, "name already exists"));

        let opaque = decode_response::<MessageResponse>(&HttpResponse {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        })
        .expect_err("502 should fail");
        assert_eq!(
            opaque,
            ApiError::Rejected {
                status: 502,
                message: None
            }
        );

        let decode = decode_response::<DeleteResponse>(&HttpResponse {
            status: 200,
            body: "not json".to_string(),
        })
        .expect_err("bad body should fail");
        assert!(matches!(decode, ApiError::Decode(_)));

        let ok = decode_response::<DeleteResponse>(&HttpResponse {
            status: 200,
            body: r#"{"message":"ok","deleted":["a.txt"]}"#.to_string(),
        })
        .expect("decode");
        assert_eq!(ok.deleted, vec!["a.txt".to_string()]);
    }
}
