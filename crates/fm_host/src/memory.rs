//! In-memory service adapters mirroring the server's observable semantics.
//!
//! Used by controller and executor tests to run complete request/reconcile cycles without a
//! browser or a live backend.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use crate::{
    error::ApiError,
    listing::{format_size_bytes, sort_listing, ListingEntry},
    path::{file_name, is_same_or_descendant, join_relative_path, normalize_relative_path},
    service::{AdminApi, ApiFuture, FileManagerApi},
    tree::DirectoryTreeNode,
    users::{PermissionSet, UserId, UserRecord, UserRole, UserSummary},
    wire::{
        AddUserRequest, AddUserResponse, CreateFolderRequest, CreateFolderResponse,
        DeleteRequest, DeleteResponse, DirSizeResponse, EditUserRequest, ListDirResponse,
        MessageResponse, MoveRequest, MoveResponse, RenameRequest, UploadProgress,
        UploadProgressSink, UploadRequest,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Directory,
    File { size_bytes: u64 },
}

#[derive(Debug, Default)]
struct FsInner {
    nodes: BTreeMap<String, NodeKind>,
    fail_next: Option<ApiError>,
    calls: Vec<&'static str>,
}

impl FsInner {
    fn begin(&mut self, op: &'static str) -> Result<(), ApiError> {
        self.calls.push(op);
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.nodes.get(path) == Some(&NodeKind::Directory)
    }

    fn children_of(&self, dir: &str) -> Vec<(String, NodeKind)> {
        self.nodes
            .iter()
            .filter(|(path, _)| parent_of(path) == dir)
            .map(|(path, kind)| (path.clone(), *kind))
            .collect()
    }

    fn subtree_keys(&self, root: &str) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|path| is_same_or_descendant(path, root))
            .cloned()
            .collect()
    }

    fn relocate(&mut self, from: &str, to: &str) {
        for key in self.subtree_keys(from) {
            if let Some(kind) = self.nodes.remove(&key) {
                let suffix = &key[from.len()..];
                self.nodes.insert(format!("{to}{suffix}"), kind);
            }
        }
    }

    fn entry(path: &str, kind: NodeKind) -> ListingEntry {
        match kind {
            NodeKind::Directory => ListingEntry::directory(file_name(path), path),
            NodeKind::File { size_bytes } => ListingEntry::file(file_name(path), path, size_bytes),
        }
    }

    fn tree(&self, dir: &str) -> Vec<DirectoryTreeNode> {
        let mut dirs: Vec<String> = self
            .children_of(dir)
            .into_iter()
            .filter(|(_, kind)| *kind == NodeKind::Directory)
            .map(|(path, _)| path)
            .collect();
        dirs.sort_by(|a, b| file_name(a).cmp(file_name(b)));
        dirs.into_iter()
            .map(|path| {
                DirectoryTreeNode::with_children(file_name(&path), path.clone(), self.tree(&path))
            })
            .collect()
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::rejected(404, format!("'{what}' does not exist"))
}

fn valid_entry_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[derive(Debug, Clone, Default)]
/// In-memory directory tree implementing [`FileManagerApi`].
pub struct MemoryFileManagerApi {
    inner: Rc<RefCell<FsInner>>,
}

impl MemoryFileManagerApi {
    /// Creates an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory (and any missing ancestors).
    pub fn with_dir(self, path: &str) -> Self {
        self.insert_dir_all(&normalize_relative_path(path));
        self
    }

    /// Adds a file of `size_bytes` (and any missing ancestor directories).
    pub fn with_file(self, path: &str, size_bytes: u64) -> Self {
        let path = normalize_relative_path(path);
        self.insert_dir_all(parent_of(&path));
        self.inner
            .borrow_mut()
            .nodes
            .insert(path, NodeKind::File { size_bytes });
        self
    }

    fn insert_dir_all(&self, path: &str) {
        let mut acc = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            acc = join_relative_path(&acc, segment);
            self.inner
                .borrow_mut()
                .nodes
                .entry(acc.clone())
                .or_insert(NodeKind::Directory);
        }
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.inner.borrow_mut().fail_next = Some(err);
    }

    /// Returns `true` when `path` exists.
    pub fn exists(&self, path: &str) -> bool {
        let path = normalize_relative_path(path);
        path.is_empty() || self.inner.borrow().nodes.contains_key(&path)
    }

    /// Operation names received so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.borrow().calls.clone()
    }

    fn list_now(&self, path: &str) -> Result<ListDirResponse, ApiError> {
        let inner = self.inner.borrow();
        if !inner.is_dir(path) {
            return Err(not_found(path));
        }
        let mut entries: Vec<ListingEntry> = inner
            .children_of(path)
            .into_iter()
            .map(|(child, kind)| FsInner::entry(&child, kind))
            .collect();
        sort_listing(&mut entries);
        Ok(ListDirResponse {
            path: path.to_string(),
            entries,
        })
    }
}

impl FileManagerApi for MemoryFileManagerApi {
    fn directory_tree<'a>(&'a self) -> ApiFuture<'a, Result<Vec<DirectoryTreeNode>, ApiError>> {
        Box::pin(async move {
            self.inner.borrow_mut().begin("directory_tree")?;
            Ok(self.inner.borrow().tree(""))
        })
    }

    fn directory_size<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<DirSizeResponse, ApiError>> {
        Box::pin(async move {
            self.inner.borrow_mut().begin("directory_size")?;
            let path = normalize_relative_path(path);
            let inner = self.inner.borrow();
            if !inner.is_dir(&path) {
                return Err(ApiError::rejected(400, "Not a directory"));
            }
            let total: u64 = inner
                .nodes
                .iter()
                .filter(|(key, _)| is_same_or_descendant(key, &path))
                .map(|(_, kind)| match kind {
                    NodeKind::File { size_bytes } => *size_bytes,
                    NodeKind::Directory => 0,
                })
                .sum();
            Ok(DirSizeResponse {
                size: format_size_bytes(total),
            })
        })
    }

    fn list_directory<'a>(
        &'a self,
        path: &'a str,
    ) -> ApiFuture<'a, Result<ListDirResponse, ApiError>> {
        Box::pin(async move {
            self.inner.borrow_mut().begin("list_directory")?;
            self.list_now(&normalize_relative_path(path))
        })
    }

    fn create_folder<'a>(
        &'a self,
        request: &'a CreateFolderRequest,
    ) -> ApiFuture<'a, Result<CreateFolderResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin("create_folder")?;
            let parent = normalize_relative_path(&request.current_path);
            let name = request.folder_name.trim();
            if name.is_empty() {
                return Err(ApiError::rejected(400, "Folder name cannot be empty"));
            }
            if !valid_entry_name(name) {
                return Err(ApiError::rejected(400, format!("Invalid folder name '{name}'")));
            }
            if !inner.is_dir(&parent) {
                return Err(not_found(&parent));
            }
            let path = join_relative_path(&parent, name);
            if inner.nodes.contains_key(&path) {
                return Err(ApiError::rejected(409, format!("'{name}' already exists")));
            }
            inner.nodes.insert(path.clone(), NodeKind::Directory);
            Ok(CreateFolderResponse {
                message: format!("Folder '{name}' created"),
                item: FsInner::entry(&path, NodeKind::Directory),
            })
        })
    }

    fn rename<'a>(
        &'a self,
        request: &'a RenameRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin("rename")?;
            let parent = normalize_relative_path(&request.current_path);
            let new_name = request.new_name.trim();
            if !valid_entry_name(new_name) {
                return Err(ApiError::rejected(400, "Invalid new name"));
            }
            let from = join_relative_path(&parent, &request.old_name);
            if !inner.nodes.contains_key(&from) {
                return Err(not_found(&request.old_name));
            }
            let to = join_relative_path(&parent, new_name);
            if inner.nodes.contains_key(&to) {
                return Err(ApiError::rejected(
                    409,
                    format!("'{new_name}' already exists"),
                ));
            }
            inner.relocate(&from, &to);
            Ok(MessageResponse {
                message: format!("Renamed '{}' to '{new_name}'", request.old_name),
            })
        })
    }

    fn delete<'a>(
        &'a self,
        request: &'a DeleteRequest,
    ) -> ApiFuture<'a, Result<DeleteResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin("delete")?;
            if request.items.is_empty() {
                return Err(ApiError::rejected(400, "No items selected"));
            }
            let parent = normalize_relative_path(&request.current_path);
            let mut deleted = Vec::new();
            for name in &request.items {
                let path = join_relative_path(&parent, name);
                match inner.nodes.get(&path).copied() {
                    Some(NodeKind::File { .. }) => {
                        inner.nodes.remove(&path);
                        deleted.push(name.clone());
                    }
                    Some(NodeKind::Directory) if inner.children_of(&path).is_empty() => {
                        inner.nodes.remove(&path);
                        deleted.push(name.clone());
                    }
                    _ => {}
                }
            }
            Ok(DeleteResponse {
                message: format!("Deleted {} item(s)", deleted.len()),
                deleted,
            })
        })
    }

    fn move_items<'a>(
        &'a self,
        request: &'a MoveRequest,
    ) -> ApiFuture<'a, Result<MoveResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin("move_items")?;
            if request.items.is_empty() {
                return Err(ApiError::rejected(400, "No items selected"));
            }
            let parent = normalize_relative_path(&request.current_path);
            let destination = normalize_relative_path(&request.destination_folder);
            if !inner.is_dir(&destination) {
                return Err(ApiError::rejected(
                    400,
                    "Destination is not a valid folder",
                ));
            }
            let mut moved = Vec::new();
            for name in &request.items {
                let from = join_relative_path(&parent, name);
                let to = join_relative_path(&destination, name);
                if !inner.nodes.contains_key(&from)
                    || is_same_or_descendant(&destination, &from)
                    || inner.nodes.contains_key(&to)
                {
                    continue;
                }
                inner.relocate(&from, &to);
                moved.push(name.clone());
            }
            Ok(MoveResponse {
                message: format!("Moved {} item(s)", moved.len()),
                moved,
            })
        })
    }

    fn upload<'a>(
        &'a self,
        request: UploadRequest,
        progress: UploadProgressSink,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            self.inner.borrow_mut().begin("upload")?;
            if request.files.is_empty() {
                return Err(ApiError::rejected(400, "No file part"));
            }
            let destination = normalize_relative_path(&request.destination_path);
            if !self.inner.borrow().is_dir(&destination) {
                return Err(not_found(&destination));
            }
            let total: u64 = request.files.iter().map(|file| file.size_bytes).sum();
            let mut loaded = 0;
            progress(UploadProgress {
                loaded,
                total: Some(total),
            });
            for file in &request.files {
                loaded += file.size_bytes;
                let path = join_relative_path(&destination, file_name(&file.name));
                self.inner.borrow_mut().nodes.insert(
                    path,
                    NodeKind::File {
                        size_bytes: file.size_bytes,
                    },
                );
                progress(UploadProgress {
                    loaded,
                    total: Some(total),
                });
            }
            Ok(MessageResponse {
                message: "Upload succeeded".to_string(),
            })
        })
    }
}

#[derive(Debug, Default)]
struct AdminInner {
    users: BTreeMap<UserId, UserRecord>,
    passwords: BTreeMap<UserId, String>,
    next_id: i64,
    registration_enabled: bool,
    fail_next: Option<ApiError>,
}

impl AdminInner {
    fn begin(&mut self) -> Result<(), ApiError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.username == username && Some(user.id) != except)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory account store implementing [`AdminApi`].
pub struct MemoryAdminApi {
    inner: Rc<RefCell<AdminInner>>,
}

impl MemoryAdminApi {
    /// Creates an empty store with registration disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account with explicit permissions.
    pub fn with_user(self, record: UserRecord) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.next_id = inner.next_id.max(record.id.0);
            inner.passwords.insert(record.id, String::new());
            inner.users.insert(record.id, record);
        }
        self
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        self.inner.borrow_mut().fail_next = Some(err);
    }

    /// Current registration flag.
    pub fn registration_enabled(&self) -> bool {
        self.inner.borrow().registration_enabled
    }

    /// Current accounts ordered by id.
    pub fn users(&self) -> Vec<UserRecord> {
        self.inner.borrow().users.values().cloned().collect()
    }

    /// Ids whose stored password equals `password`.
    pub fn users_with_password(&self, password: &str) -> BTreeSet<UserId> {
        self.inner
            .borrow()
            .passwords
            .iter()
            .filter(|(_, stored)| stored.as_str() == password)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl AdminApi for MemoryAdminApi {
    fn toggle_registration<'a>(
        &'a self,
        enabled: bool,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin()?;
            inner.registration_enabled = enabled;
            Ok(MessageResponse {
                message: if enabled {
                    "Registration enabled".to_string()
                } else {
                    "Registration disabled".to_string()
                },
            })
        })
    }

    fn add_user<'a>(
        &'a self,
        request: &'a AddUserRequest,
    ) -> ApiFuture<'a, Result<AddUserResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin()?;
            let username = request.username.trim();
            if username.is_empty() || request.password.is_empty() {
                return Err(ApiError::rejected(
                    400,
                    "Username and password are required",
                ));
            }
            if inner.username_taken(username, None) {
                return Err(ApiError::rejected(
                    409,
                    format!("Username '{username}' already exists"),
                ));
            }
            inner.next_id += 1;
            let id = UserId(inner.next_id);
            let summary = UserSummary {
                id,
                username: username.to_string(),
                role: request.role,
            };
            inner
                .users
                .insert(id, UserRecord::from_new_user(summary.clone()));
            inner.passwords.insert(id, request.password.clone());
            Ok(AddUserResponse {
                message: format!("User '{username}' added"),
                user: summary,
            })
        })
    }

    fn edit_user<'a>(
        &'a self,
        request: &'a EditUserRequest,
    ) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin()?;
            let username = request.username.trim();
            if username.is_empty() {
                return Err(ApiError::rejected(400, "Username is required"));
            }
            if !inner.users.contains_key(&request.id) {
                return Err(ApiError::rejected(404, "User not found"));
            }
            if inner.username_taken(username, Some(request.id)) {
                return Err(ApiError::rejected(
                    409,
                    format!("Username '{username}' already exists"),
                ));
            }
            if let Some(password) = request.password.as_ref() {
                inner.passwords.insert(request.id, password.clone());
            }
            let record = UserRecord {
                id: request.id,
                username: username.to_string(),
                role: request.role,
                permissions: request.permissions,
            };
            inner.users.insert(request.id, record);
            Ok(MessageResponse {
                message: format!("User '{username}' updated"),
            })
        })
    }

    fn delete_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<MessageResponse, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin()?;
            let Some(record) = inner.users.remove(&id) else {
                return Err(ApiError::rejected(404, "User not found"));
            };
            inner.passwords.remove(&id);
            Ok(MessageResponse {
                message: format!("User '{}' deleted", record.username),
            })
        })
    }

    fn fetch_user<'a>(&'a self, id: UserId) -> ApiFuture<'a, Result<UserRecord, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.begin()?;
            inner
                .users
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::rejected(404, "User not found"))
        })
    }
}

impl MemoryAdminApi {
    /// Seeds an account with every permission granted.
    pub fn with_default_user(self, id: i64, username: &str, role: UserRole) -> Self {
        self.with_user(UserRecord {
            id: UserId(id),
            username: username.to_string(),
            role,
            permissions: PermissionSet::all_granted(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::wire::UploadPayload;

    fn names(response: &ListDirResponse) -> Vec<&str> {
        response.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn listing_is_directories_first_and_scoped_to_parent() {
        let api = MemoryFileManagerApi::new()
            .with_file("b.txt", 10)
            .with_file("docs/inner.md", 5)
            .with_dir("archive");

        let root = block_on(api.list_directory("")).expect("list root");
        assert_eq!(names(&root), vec!["archive", "docs", "b.txt"]);
        let docs = block_on(api.list_directory("docs")).expect("list docs");
        assert_eq!(names(&docs), vec!["inner.md"]);
        assert!(docs.entries[0].previewable);
    }

    #[test]
    fn delete_skips_non_empty_directories() {
        let api = MemoryFileManagerApi::new()
            .with_file("a.txt", 1)
            .with_file("full/x.txt", 1)
            .with_dir("empty");

        let response = block_on(api.delete(&DeleteRequest {
            current_path: String::new(),
            items: vec!["a.txt".into(), "full".into(), "empty".into()],
        }))
        .expect("delete");

        assert_eq!(response.deleted, vec!["a.txt".to_string(), "empty".to_string()]);
        assert!(api.exists("full/x.txt"));
    }

    #[test]
    fn move_skips_self_nesting_and_collisions() {
        let api = MemoryFileManagerApi::new()
            .with_file("a.txt", 1)
            .with_file("dest/a.txt", 1)
            .with_file("b.txt", 2)
            .with_dir("dest/sub");

        let response = block_on(api.move_items(&MoveRequest {
            current_path: String::new(),
            items: vec!["a.txt".into(), "b.txt".into(), "dest".into()],
            destination_folder: "dest/sub".into(),
        }))
        .expect("move");

        assert_eq!(response.moved, vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert!(api.exists("dest/sub/b.txt"));
        assert!(api.exists("dest"));
    }

    #[test]
    fn create_folder_rejects_duplicates_and_blank_names() {
        let api = MemoryFileManagerApi::new().with_dir("docs");
        let duplicate = block_on(api.create_folder(&CreateFolderRequest {
            current_path: String::new(),
            folder_name: "docs".into(),
        }))
        .expect_err("duplicate");
        assert_eq!(duplicate.status(), Some(409));

        let blank = block_on(api.create_folder(&CreateFolderRequest {
            current_path: String::new(),
            folder_name: "  ".into(),
        }))
        .expect_err("blank");
        assert_eq!(blank.status(), Some(400));
    }

    #[test]
    fn tree_and_sizes_are_recursive() {
        let api = MemoryFileManagerApi::new()
            .with_file("docs/a.txt", 1024)
            .with_file("docs/old/b.txt", 512)
            .with_dir("media");

        let tree = block_on(api.directory_tree()).expect("tree");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children[0].path, "docs/old");

        let size = block_on(api.directory_size("docs")).expect("size");
        assert_eq!(size.size, "1.50 KB");
    }

    #[test]
    fn upload_reports_monotonic_progress() {
        let api = MemoryFileManagerApi::new().with_dir("media");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        block_on(api.upload(
            UploadRequest {
                destination_path: "media".into(),
                files: vec![
                    UploadPayload::from_bytes("a.png", vec![0; 30]),
                    UploadPayload::from_bytes("b.png", vec![0; 70]),
                ],
            },
            Rc::new(move |p: UploadProgress| sink_seen.borrow_mut().push(p.percent())),
        ))
        .expect("upload");

        assert_eq!(*seen.borrow(), vec![Some(0), Some(30), Some(100)]);
        assert!(api.exists("media/b.png"));
    }

    #[test]
    fn fail_next_applies_once() {
        let api = MemoryFileManagerApi::new();
        api.fail_next(ApiError::Transport("offline".into()));
        assert!(block_on(api.directory_tree()).is_err());
        assert!(block_on(api.directory_tree()).is_ok());
        assert_eq!(api.calls(), vec!["directory_tree", "directory_tree"]);
    }

    #[test]
    fn admin_store_enforces_unique_usernames_and_default_grants() {
        let admin = MemoryAdminApi::new().with_default_user(1, "admin", UserRole::Admin);
        let added = block_on(admin.add_user(&AddUserRequest {
            username: "mia".into(),
            password: "pw".into(),
            role: UserRole::User,
        }))
        .expect("add");
        assert_eq!(added.user.id, UserId(2));

        let duplicate = block_on(admin.add_user(&AddUserRequest {
            username: "admin".into(),
            password: "pw".into(),
            role: UserRole::User,
        }))
        .expect_err("duplicate");
        assert_eq!(duplicate.status(), Some(409));

        let fetched = block_on(admin.fetch_user(UserId(2))).expect("fetch");
        assert_eq!(fetched.permissions, PermissionSet::all_granted());
    }
}
