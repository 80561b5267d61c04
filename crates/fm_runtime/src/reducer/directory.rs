//! Directory page: selection, folder mutations, previews, sizes, uploads, and refresh-diff.

use std::collections::{BTreeMap, BTreeSet};

use fm_host::{
    is_previewable, ApiError, CreateFolderRequest, CreateFolderResponse, DeleteRequest,
    DeleteResponse, DirectoryTreeNode, ListDirResponse, ListingEntry, MessageResponse,
    MoveRequest, MoveResponse, RenameRequest, UploadPayload, UploadProgress, UploadRequest,
};
use thiserror::Error;

use crate::{
    alerts::{AlertCategory, AlertId},
    model::{ActionClass, DirSizeState, DirectoryViewState, ListingRow, RenameDialog},
    reducer::{message_or, show_alert},
    tree::PickerKind,
    upload::{UploadSession, UploadSessionId},
};

pub const EMPTY_FOLDER_NAME_MESSAGE: &str = "Please enter a folder name.";
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one item.";
pub const NO_UPLOAD_FILES_MESSAGE: &str = "Please select files to upload first.";
pub const REFRESH_FAILED_MESSAGE: &str =
    "The listing could not be refreshed. Reload the page to see the latest files.";
const UPLOAD_SUCCEEDED_MESSAGE: &str = "Upload succeeded";

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_directory_view`].
pub enum ViewAction {
    /// Header checkbox changed.
    ToggleSelectAll { checked: bool },
    /// One row checkbox changed.
    ToggleRow { name: String, checked: bool },
    SetCreateFolderInput(String),
    SubmitCreateFolder,
    CreateFolderCompleted(Result<CreateFolderResponse, ApiError>),
    /// Open the rename dialog for a row, prefilled with its name.
    OpenRename { name: String },
    SetRenameInput(String),
    SubmitRename,
    CancelRename,
    RenameCompleted {
        old_name: String,
        new_name: String,
        result: Result<MessageResponse, ApiError>,
    },
    /// Ask for confirmation before deleting the selection.
    RequestDelete,
    CancelDelete,
    ConfirmDelete,
    DeleteCompleted(Result<DeleteResponse, ApiError>),
    OpenMoveDialog,
    CloseMoveDialog,
    SelectMoveDestination(String),
    ConfirmMove,
    MoveCompleted(Result<MoveResponse, ApiError>),
    /// A destination-picker tree request finished.
    DirectoryTreeLoaded {
        picker: PickerKind,
        generation: u64,
        result: Result<Vec<DirectoryTreeNode>, ApiError>,
    },
    OpenPreview { name: String },
    ClosePreview,
    RequestDirSize { name: String },
    DirSizeCompleted {
        name: String,
        result: Result<String, ApiError>,
    },
    OpenUploadDialog,
    CloseUploadDialog,
    SelectUploadDestination(String),
    SetUploadFiles(Vec<UploadPayload>),
    StartUpload,
    UploadProgressed {
        session: UploadSessionId,
        progress: UploadProgress,
    },
    UploadCompleted {
        session: UploadSessionId,
        result: Result<MessageResponse, ApiError>,
    },
    /// Re-fetch the current directory and diff it into the table.
    RefreshListing,
    ListingRefreshed(Result<ListDirResponse, ApiError>),
    DismissAlert,
    AlertExpired(AlertId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request intents run by the executor.
pub enum ViewRequest {
    DirectoryTree { picker: PickerKind, generation: u64 },
    DirectorySize { name: String, path: String },
    ListDirectory { path: String },
    CreateFolder(CreateFolderRequest),
    Rename(RenameRequest),
    Delete(DeleteRequest),
    Move(MoveRequest),
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_directory_view`].
pub enum ViewEffect {
    /// Run one request and dispatch its completion action.
    Request(ViewRequest),
    /// Send an upload batch, dispatching progress and completion for `session`.
    Upload {
        session: UploadSessionId,
        request: UploadRequest,
    },
    /// Dispatch `action` after `delay_ms`.
    DispatchAfter {
        delay_ms: u32,
        action: Box<ViewAction>,
    },
    /// Move keyboard focus into the rename input.
    FocusRenameInput,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions referencing rows that cannot take them.
pub enum ViewError {
    /// No row with this name is listed.
    #[error("no listed entry named `{0}`")]
    RowNotFound(String),
    /// The row is a file but the action needs a directory.
    #[error("`{0}` is not a directory")]
    NotADirectory(String),
}

/// Applies a [`ViewAction`] to the directory page state and collects resulting side effects.
///
/// Completion actions reconcile the table against the server's answer: rows are inserted,
/// patched, or removed according to what the server reports, never what was requested.
///
/// # Errors
///
/// Returns [`ViewError`] when a user action references a row that is not listed or cannot take
/// the action. State is left unchanged in that case.
pub fn reduce_directory_view(
    state: &mut DirectoryViewState,
    action: ViewAction,
) -> Result<Vec<ViewEffect>, ViewError> {
    let mut effects = Vec::new();
    match action {
        ViewAction::ToggleSelectAll { checked } => {
            for row in &mut state.rows {
                row.checked = checked;
            }
        }
        ViewAction::ToggleRow { name, checked } => {
            state
                .row_mut(&name)
                .ok_or(ViewError::RowNotFound(name))?
                .checked = checked;
        }
        ViewAction::SetCreateFolderInput(value) => {
            state.create_folder_input = value;
        }
        ViewAction::SubmitCreateFolder => {
            if state.is_pending(ActionClass::CreateFolder) {
                return Ok(effects);
            }
            let folder_name = state.create_folder_input.trim().to_string();
            if folder_name.is_empty() {
                alert(state, &mut effects, AlertCategory::Warning, EMPTY_FOLDER_NAME_MESSAGE);
                return Ok(effects);
            }
            state.in_flight.insert(ActionClass::CreateFolder);
            effects.push(ViewEffect::Request(ViewRequest::CreateFolder(
                CreateFolderRequest {
                    current_path: state.page.current_path.clone(),
                    folder_name,
                },
            )));
        }
        ViewAction::CreateFolderCompleted(result) => {
            state.in_flight.remove(&ActionClass::CreateFolder);
            match result {
                Ok(response) => {
                    let name = response.item.name.clone();
                    upsert_row(state, response.item);
                    state.create_folder_input.clear();
                    let message = message_or(response.message, &format!("Folder '{name}' created"));
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => alert_failure(state, &mut effects, &err),
            }
        }
        ViewAction::OpenRename { name } => {
            if state.row(&name).is_none() {
                return Err(ViewError::RowNotFound(name));
            }
            state.rename = Some(RenameDialog {
                original: name.clone(),
                input: name,
            });
            effects.push(ViewEffect::FocusRenameInput);
        }
        ViewAction::SetRenameInput(value) => {
            if let Some(dialog) = state.rename.as_mut() {
                dialog.input = value;
            }
        }
        ViewAction::SubmitRename => {
            if state.is_pending(ActionClass::Rename) {
                return Ok(effects);
            }
            let Some(dialog) = state.rename.take() else {
                return Ok(effects);
            };
            let new_name = dialog.input.trim().to_string();
            if new_name.is_empty() || new_name == dialog.original {
                return Ok(effects);
            }
            state.in_flight.insert(ActionClass::Rename);
            effects.push(ViewEffect::Request(ViewRequest::Rename(RenameRequest {
                current_path: state.page.current_path.clone(),
                old_name: dialog.original,
                new_name,
            })));
        }
        ViewAction::CancelRename => {
            state.rename = None;
        }
        ViewAction::RenameCompleted {
            old_name,
            new_name,
            result,
        } => {
            state.in_flight.remove(&ActionClass::Rename);
            match result {
                Ok(response) => {
                    let path = state.path_of(&new_name);
                    if let Some(row) = state.row_mut(&old_name) {
                        let is_dir = row.entry.is_dir;
                        row.entry.previewable = is_previewable(&new_name, is_dir);
                        row.entry.name = new_name.clone();
                        row.entry.path = path;
                        // A size reply still in flight is keyed by the old name.
                        if row.dir_size == DirSizeState::Pending {
                            row.dir_size = DirSizeState::NotRequested;
                        }
                    }
                    state.sort_rows();
                    let message = message_or(
                        response.message,
                        &format!("Renamed '{old_name}' to '{new_name}'"),
                    );
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => alert_failure(state, &mut effects, &err),
            }
        }
        ViewAction::RequestDelete => {
            if !state.selection_actions_enabled() {
                alert(state, &mut effects, AlertCategory::Warning, EMPTY_SELECTION_MESSAGE);
                return Ok(effects);
            }
            state.delete_confirm_open = true;
        }
        ViewAction::CancelDelete => {
            state.delete_confirm_open = false;
        }
        ViewAction::ConfirmDelete => {
            state.delete_confirm_open = false;
            if state.is_pending(ActionClass::Delete) {
                return Ok(effects);
            }
            let items = state.selected_names();
            if items.is_empty() {
                alert(state, &mut effects, AlertCategory::Warning, EMPTY_SELECTION_MESSAGE);
                return Ok(effects);
            }
            state.in_flight.insert(ActionClass::Delete);
            effects.push(ViewEffect::Request(ViewRequest::Delete(DeleteRequest {
                current_path: state.page.current_path.clone(),
                items,
            })));
        }
        ViewAction::DeleteCompleted(result) => {
            state.in_flight.remove(&ActionClass::Delete);
            match result {
                Ok(response) => {
                    remove_rows(state, &response.deleted);
                    let message = message_or(
                        response.message,
                        &format!("Deleted {} item(s)", response.deleted.len()),
                    );
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => alert_failure(state, &mut effects, &err),
            }
        }
        ViewAction::OpenMoveDialog => {
            if !state.selection_actions_enabled() {
                alert(state, &mut effects, AlertCategory::Warning, EMPTY_SELECTION_MESSAGE);
                return Ok(effects);
            }
            state.move_dialog.open = true;
            let generation = state.move_dialog.picker.open("");
            effects.push(ViewEffect::Request(ViewRequest::DirectoryTree {
                picker: PickerKind::Move,
                generation,
            }));
        }
        ViewAction::CloseMoveDialog => {
            state.move_dialog.open = false;
        }
        ViewAction::SelectMoveDestination(path) => {
            state.move_dialog.picker.selected = path;
        }
        ViewAction::ConfirmMove => {
            if !state.move_dialog.open || state.is_pending(ActionClass::Move) {
                return Ok(effects);
            }
            let items = state.selected_names();
            if items.is_empty() {
                alert(state, &mut effects, AlertCategory::Warning, EMPTY_SELECTION_MESSAGE);
                return Ok(effects);
            }
            state.move_dialog.open = false;
            state.in_flight.insert(ActionClass::Move);
            effects.push(ViewEffect::Request(ViewRequest::Move(MoveRequest {
                current_path: state.page.current_path.clone(),
                items,
                destination_folder: state.move_dialog.picker.selected.clone(),
            })));
        }
        ViewAction::MoveCompleted(result) => {
            state.in_flight.remove(&ActionClass::Move);
            match result {
                Ok(response) => {
                    remove_rows(state, &response.moved);
                    let message = message_or(
                        response.message,
                        &format!("Moved {} item(s)", response.moved.len()),
                    );
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => alert_failure(state, &mut effects, &err),
            }
        }
        ViewAction::DirectoryTreeLoaded {
            picker,
            generation,
            result,
        } => {
            let target = match picker {
                PickerKind::Move => &mut state.move_dialog.picker,
                PickerKind::Upload => &mut state.upload.picker,
            };
            if let Err(err) = target.apply(generation, result) {
                let message = format!("Could not load folders: {}", err.alert_message());
                alert(state, &mut effects, AlertCategory::Danger, message);
            }
        }
        ViewAction::OpenPreview { name } => {
            let row = state
                .row(&name)
                .ok_or_else(|| ViewError::RowNotFound(name.clone()))?;
            let Some(kind) = row.preview_kind() else {
                return Ok(effects);
            };
            let src = state.preview_src_for(&name);
            state.preview.open = true;
            state.preview.src = src;
            state.preview.title = name;
            state.preview.kind = Some(kind);
        }
        ViewAction::ClosePreview => {
            state.preview = Default::default();
        }
        ViewAction::RequestDirSize { name } => {
            let path = state.path_of(&name);
            let row = state
                .row_mut(&name)
                .ok_or_else(|| ViewError::RowNotFound(name.clone()))?;
            if !row.entry.is_dir {
                return Err(ViewError::NotADirectory(name));
            }
            if matches!(
                row.dir_size,
                DirSizeState::Pending | DirSizeState::Computed(_)
            ) {
                return Ok(effects);
            }
            row.dir_size = DirSizeState::Pending;
            effects.push(ViewEffect::Request(ViewRequest::DirectorySize { name, path }));
        }
        ViewAction::DirSizeCompleted { name, result } => {
            if let Some(row) = state
                .row_mut(&name)
                .filter(|row| row.dir_size == DirSizeState::Pending)
            {
                row.dir_size = match result {
                    Ok(size) => DirSizeState::Computed(size),
                    Err(_) => DirSizeState::Failed,
                };
            }
        }
        ViewAction::OpenUploadDialog => {
            state.upload.open = true;
            state.upload.files.clear();
            let current = state.page.current_path.clone();
            let generation = state.upload.picker.open(&current);
            effects.push(ViewEffect::Request(ViewRequest::DirectoryTree {
                picker: PickerKind::Upload,
                generation,
            }));
        }
        ViewAction::CloseUploadDialog => {
            state.upload.open = false;
        }
        ViewAction::SelectUploadDestination(path) => {
            state.upload.picker.selected = path;
        }
        ViewAction::SetUploadFiles(files) => {
            state.upload.files = files;
        }
        ViewAction::StartUpload => {
            if state.is_pending(ActionClass::Upload) {
                return Ok(effects);
            }
            if state.upload.files.is_empty() {
                alert(state, &mut effects, AlertCategory::Warning, NO_UPLOAD_FILES_MESSAGE);
                return Ok(effects);
            }
            state.upload.sessions_started += 1;
            let session = UploadSessionId(state.upload.sessions_started);
            let destination = state.upload.picker.selected.clone();
            let files = std::mem::take(&mut state.upload.files);
            state.upload.session = Some(UploadSession::start(
                session,
                files.iter().map(|file| file.name.clone()).collect(),
                destination.clone(),
            ));
            state.in_flight.insert(ActionClass::Upload);
            effects.push(ViewEffect::Upload {
                session,
                request: UploadRequest {
                    destination_path: destination,
                    files,
                },
            });
        }
        ViewAction::UploadProgressed { session, progress } => {
            if let Some(active) = state.upload.session.as_mut().filter(|s| s.id == session) {
                active.record(progress);
            }
        }
        ViewAction::UploadCompleted { session, result } => {
            let Some(active) = state.upload.session.as_mut().filter(|s| s.id == session) else {
                return Ok(effects);
            };
            state.in_flight.remove(&ActionClass::Upload);
            match result {
                Ok(response) => {
                    active.complete();
                    state.upload.open = false;
                    let message = message_or(response.message, UPLOAD_SUCCEEDED_MESSAGE);
                    alert(state, &mut effects, AlertCategory::Success, message);
                    effects.push(ViewEffect::DispatchAfter {
                        delay_ms: state.settings.upload_refresh_delay_ms,
                        action: Box::new(ViewAction::RefreshListing),
                    });
                }
                Err(err) => {
                    active.fail();
                    let message = format!("Upload failed: {}", err.alert_message());
                    alert(state, &mut effects, AlertCategory::Danger, message);
                }
            }
        }
        ViewAction::RefreshListing => {
            effects.push(ViewEffect::Request(ViewRequest::ListDirectory {
                path: state.page.current_path.clone(),
            }));
        }
        ViewAction::ListingRefreshed(result) => match result {
            Ok(response) => {
                diff_listing(state, response.entries);
                state.listing_loaded = true;
            }
            Err(_) => alert(state, &mut effects, AlertCategory::Warning, REFRESH_FAILED_MESSAGE),
        },
        ViewAction::DismissAlert => {
            state.alert.dismiss();
        }
        ViewAction::AlertExpired(id) => {
            state.alert.expire(id);
        }
    }
    Ok(effects)
}

fn alert(
    state: &mut DirectoryViewState,
    effects: &mut Vec<ViewEffect>,
    category: AlertCategory,
    message: impl Into<String>,
) {
    if let Some((delay_ms, id)) = show_alert(&mut state.alert, &state.settings, category, message)
    {
        effects.push(ViewEffect::DispatchAfter {
            delay_ms,
            action: Box::new(ViewAction::AlertExpired(id)),
        });
    }
}

fn alert_failure(state: &mut DirectoryViewState, effects: &mut Vec<ViewEffect>, err: &ApiError) {
    alert(state, effects, AlertCategory::Danger, err.alert_message());
}

fn upsert_row(state: &mut DirectoryViewState, entry: ListingEntry) {
    match state.row_mut(&entry.name) {
        Some(row) => row.entry = entry,
        None => state.rows.push(ListingRow::new(entry)),
    }
    state.sort_rows();
}

fn remove_rows(state: &mut DirectoryViewState, names: &[String]) {
    let gone: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    state
        .rows
        .retain(|row| !gone.contains(row.entry.name.as_str()));
}

/// Reconciles the table with a fresh listing while keeping checkbox state and computed sizes.
fn diff_listing(state: &mut DirectoryViewState, entries: Vec<ListingEntry>) {
    let mut fresh: BTreeMap<String, ListingEntry> = entries
        .into_iter()
        .map(|entry| (entry.name.clone(), entry))
        .collect();
    state.rows.retain_mut(|row| match fresh.remove(&row.entry.name) {
        Some(entry) => {
            if entry.is_dir != row.entry.is_dir {
                row.dir_size = DirSizeState::NotRequested;
            }
            row.entry = entry;
            true
        }
        None => false,
    });
    state.rows.extend(fresh.into_values().map(ListingRow::new));
    state.sort_rows();
}

#[cfg(test)]
mod tests {
    use fm_host::{PageContext, PreviewKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{RuntimeSettings, PREVIEW_BLANK_SRC},
        upload::UploadPhase,
    };

    fn state_with(entries: Vec<ListingEntry>) -> DirectoryViewState {
        DirectoryViewState::new(
            PageContext::new("docs", "tok"),
            entries,
            RuntimeSettings::default(),
        )
    }

    fn sample_state() -> DirectoryViewState {
        state_with(vec![
            ListingEntry::directory("old", "docs/old"),
            ListingEntry::file("a.txt", "docs/a.txt", 10),
            ListingEntry::file("b.txt", "docs/b.txt", 20),
        ])
    }

    fn reduce(state: &mut DirectoryViewState, action: ViewAction) -> Vec<ViewEffect> {
        reduce_directory_view(state, action).expect("reduce")
    }

    fn check(state: &mut DirectoryViewState, name: &str, checked: bool) {
        reduce(
            state,
            ViewAction::ToggleRow {
                name: name.into(),
                checked,
            },
        );
    }

    fn names(state: &DirectoryViewState) -> Vec<&str> {
        state.rows.iter().map(ListingRow::name).collect()
    }

    fn assert_selection_invariants(state: &DirectoryViewState) {
        let all = !state.rows.is_empty() && state.rows.iter().all(|row| row.checked);
        assert_eq!(state.select_all_checked(), all);
        assert_eq!(
            state.selection_actions_enabled(),
            state.selection_count() > 0
        );
    }

    #[test]
    fn select_all_tracks_every_toggle_sequence() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::ToggleSelectAll { checked: true });
        assert!(state.select_all_checked());
        assert_selection_invariants(&state);

        check(&mut state, "a.txt", false);
        assert!(!state.select_all_checked());
        assert!(state.selection_actions_enabled());
        assert_selection_invariants(&state);

        check(&mut state, "a.txt", true);
        assert!(state.select_all_checked());

        reduce(&mut state, ViewAction::ToggleSelectAll { checked: false });
        assert_eq!(state.selection_count(), 0);
        assert!(!state.selection_actions_enabled());
        assert_selection_invariants(&state);
    }

    #[test]
    fn toggling_unknown_row_is_an_error_without_changes() {
        let mut state = sample_state();
        let before = state.clone();
        let err = reduce_directory_view(
            &mut state,
            ViewAction::ToggleRow {
                name: "missing".into(),
                checked: true,
            },
        )
        .expect_err("missing row");
        assert_eq!(err, ViewError::RowNotFound("missing".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn create_folder_inserts_returned_entry_and_hides_placeholder() {
        let mut state = state_with(Vec::new());
        assert!(state.shows_empty_placeholder());

        reduce(&mut state, ViewAction::SetCreateFolderInput("  new  ".into()));
        let effects = reduce(&mut state, ViewAction::SubmitCreateFolder);
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::CreateFolder(
                CreateFolderRequest {
                    current_path: "docs".into(),
                    folder_name: "new".into(),
                }
            ))]
        );
        assert!(state.is_pending(ActionClass::CreateFolder));
        assert!(reduce(&mut state, ViewAction::SubmitCreateFolder).is_empty());

        let effects = reduce(
            &mut state,
            ViewAction::CreateFolderCompleted(Ok(CreateFolderResponse {
                message: "Folder 'new' created".into(),
                item: ListingEntry::directory("new", "docs/new"),
            })),
        );
        assert_eq!(names(&state), vec!["new"]);
        assert!(!state.shows_empty_placeholder());
        assert!(state.create_folder_input.is_empty());
        assert!(!state.is_pending(ActionClass::CreateFolder));
        let alert = state.alert.current().expect("alert");
        assert_eq!(alert.category, AlertCategory::Success);
        assert_eq!(
            effects,
            vec![ViewEffect::DispatchAfter {
                delay_ms: 5_000,
                action: Box::new(ViewAction::AlertExpired(alert.id)),
            }]
        );
    }

    #[test]
    fn empty_folder_name_warns_without_request() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::SetCreateFolderInput("   ".into()));
        let effects = reduce(&mut state, ViewAction::SubmitCreateFolder);
        assert!(effects.is_empty());
        let alert = state.alert.current().expect("alert");
        assert_eq!(alert.category, AlertCategory::Warning);
        assert_eq!(alert.message, EMPTY_FOLDER_NAME_MESSAGE);
    }

    #[test]
    fn failed_create_folder_leaves_table_unchanged() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::SetCreateFolderInput("old".into()));
        reduce(&mut state, ViewAction::SubmitCreateFolder);
        let effects = reduce(
            &mut state,
            ViewAction::CreateFolderCompleted(Err(ApiError::rejected(409, "'old' already exists"))),
        );
        assert!(effects.is_empty());
        assert_eq!(names(&state), vec!["old", "a.txt", "b.txt"]);
        let alert = state.alert.current().expect("alert");
        assert_eq!(alert.category, AlertCategory::Danger);
        assert_eq!(alert.message, "'old' already exists");
    }

    #[test]
    fn rename_recomputes_preview_eligibility_and_keeps_size() {
        let mut state = state_with(vec![ListingEntry::file("notes.txt", "docs/notes.txt", 2048)]);
        let effects = reduce(
            &mut state,
            ViewAction::OpenRename {
                name: "notes.txt".into(),
            },
        );
        assert_eq!(effects, vec![ViewEffect::FocusRenameInput]);
        reduce(&mut state, ViewAction::SetRenameInput("notes.md".into()));
        let effects = reduce(&mut state, ViewAction::SubmitRename);
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::Rename(RenameRequest {
                current_path: "docs".into(),
                old_name: "notes.txt".into(),
                new_name: "notes.md".into(),
            }))]
        );

        let ok = |message: &str| -> Result<MessageResponse, ApiError> {
            Ok(MessageResponse {
                message: message.into(),
            })
        };
        reduce(
            &mut state,
            ViewAction::RenameCompleted {
                old_name: "notes.txt".into(),
                new_name: "notes.md".into(),
                result: ok("Renamed"),
            },
        );
        let row = state.row("notes.md").expect("renamed row");
        assert!(row.entry.previewable);
        assert_eq!(row.entry.path, "docs/notes.md");
        assert_eq!(row.size_text(), "2.00 KB");

        reduce(
            &mut state,
            ViewAction::RenameCompleted {
                old_name: "notes.md".into(),
                new_name: "notes.bin".into(),
                result: ok("Renamed"),
            },
        );
        let row = state.row("notes.bin").expect("renamed row");
        assert!(!row.entry.previewable);
        assert_eq!(row.preview_kind(), None);
    }

    #[test]
    fn rename_to_same_or_empty_name_closes_silently() {
        let mut state = sample_state();
        for input in ["a.txt", "   "] {
            reduce(
                &mut state,
                ViewAction::OpenRename {
                    name: "a.txt".into(),
                },
            );
            reduce(&mut state, ViewAction::SetRenameInput(input.into()));
            assert!(reduce(&mut state, ViewAction::SubmitRename).is_empty());
            assert!(state.rename.is_none());
            assert!(state.alert.current().is_none());
        }
    }

    #[test]
    fn delete_removes_only_server_confirmed_rows() {
        let mut state = sample_state();
        check(&mut state, "a.txt", true);
        check(&mut state, "b.txt", true);
        reduce(&mut state, ViewAction::RequestDelete);
        assert!(state.delete_confirm_open);

        let effects = reduce(&mut state, ViewAction::ConfirmDelete);
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::Delete(DeleteRequest {
                current_path: "docs".into(),
                items: vec!["a.txt".into(), "b.txt".into()],
            }))]
        );

        reduce(
            &mut state,
            ViewAction::DeleteCompleted(Ok(DeleteResponse {
                message: "Deleted 1 item(s)".into(),
                deleted: vec!["a.txt".into()],
            })),
        );
        assert_eq!(names(&state), vec!["old", "b.txt"]);
        assert!(state.row("b.txt").expect("kept").checked);
        assert_selection_invariants(&state);
    }

    #[test]
    fn removing_last_unchecked_row_makes_select_all_checked() {
        let mut state = sample_state();
        check(&mut state, "old", true);
        check(&mut state, "a.txt", true);
        assert!(!state.select_all_checked());

        reduce(
            &mut state,
            ViewAction::MoveCompleted(Ok(MoveResponse {
                message: String::new(),
                moved: vec!["b.txt".into()],
            })),
        );
        assert!(state.select_all_checked());
        assert_selection_invariants(&state);
    }

    #[test]
    fn delete_and_move_require_a_selection() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::RequestDelete);
        assert!(!state.delete_confirm_open);
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some(EMPTY_SELECTION_MESSAGE)
        );
        assert!(reduce(&mut state, ViewAction::OpenMoveDialog).is_empty());
        assert!(!state.move_dialog.open);
    }

    #[test]
    fn move_dialog_fetches_tree_per_opening_and_submits_selected_destination() {
        let mut state = sample_state();
        check(&mut state, "a.txt", true);
        let effects = reduce(&mut state, ViewAction::OpenMoveDialog);
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::DirectoryTree {
                picker: PickerKind::Move,
                generation: 1,
            })]
        );
        reduce(&mut state, ViewAction::CloseMoveDialog);
        reduce(&mut state, ViewAction::OpenMoveDialog);

        reduce(
            &mut state,
            ViewAction::DirectoryTreeLoaded {
                picker: PickerKind::Move,
                generation: 1,
                result: Ok(vec![DirectoryTreeNode::leaf("stale", "stale")]),
            },
        );
        assert_eq!(state.move_dialog.picker.options.len(), 1);
        reduce(
            &mut state,
            ViewAction::DirectoryTreeLoaded {
                picker: PickerKind::Move,
                generation: 2,
                result: Ok(vec![DirectoryTreeNode::leaf("media", "media")]),
            },
        );
        assert_eq!(state.move_dialog.picker.options[1].value, "media");

        reduce(&mut state, ViewAction::SelectMoveDestination("media".into()));
        let effects = reduce(&mut state, ViewAction::ConfirmMove);
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::Move(MoveRequest {
                current_path: "docs".into(),
                items: vec!["a.txt".into()],
                destination_folder: "media".into(),
            }))]
        );
        assert!(!state.move_dialog.open);
    }

    #[test]
    fn preview_opens_view_url_and_resets_on_close() {
        let mut state = state_with(vec![
            ListingEntry::file("photo.PNG", "docs/photo.PNG", 1),
            ListingEntry::file("data.bin", "docs/data.bin", 1),
        ]);
        reduce(
            &mut state,
            ViewAction::OpenPreview {
                name: "photo.PNG".into(),
            },
        );
        assert!(state.preview.open);
        assert_eq!(state.preview.src, "/view/docs/photo.PNG");
        assert_eq!(state.preview.kind, Some(PreviewKind::Image));

        reduce(&mut state, ViewAction::ClosePreview);
        assert!(!state.preview.open);
        assert_eq!(state.preview.src, PREVIEW_BLANK_SRC);

        reduce(
            &mut state,
            ViewAction::OpenPreview {
                name: "data.bin".into(),
            },
        );
        assert!(!state.preview.open);
    }

    #[test]
    fn directory_size_lifecycle() {
        let mut state = sample_state();
        let effects = reduce(
            &mut state,
            ViewAction::RequestDirSize { name: "old".into() },
        );
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::DirectorySize {
                name: "old".into(),
                path: "docs/old".into(),
            })]
        );
        assert!(reduce(&mut state, ViewAction::RequestDirSize { name: "old".into() }).is_empty());

        reduce(
            &mut state,
            ViewAction::DirSizeCompleted {
                name: "old".into(),
                result: Err(ApiError::rejected(500, "boom")),
            },
        );
        let row = state.row("old").expect("row");
        assert_eq!(row.size_text(), "Calculation failed");
        assert_eq!(row.size_trigger(), crate::model::SizeTrigger::Ready);

        reduce(&mut state, ViewAction::RequestDirSize { name: "old".into() });
        reduce(
            &mut state,
            ViewAction::DirSizeCompleted {
                name: "old".into(),
                result: Ok("1.00 MB".into()),
            },
        );
        let row = state.row("old").expect("row");
        assert_eq!(row.size_text(), "1.00 MB");
        assert_eq!(row.size_trigger(), crate::model::SizeTrigger::Hidden);
        assert!(reduce(&mut state, ViewAction::RequestDirSize { name: "old".into() }).is_empty());

        assert_eq!(
            reduce_directory_view(
                &mut state,
                ViewAction::RequestDirSize {
                    name: "a.txt".into()
                }
            ),
            Err(ViewError::NotADirectory("a.txt".into()))
        );
    }

    #[test]
    fn renaming_a_folder_mid_size_request_re_enables_its_trigger() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::RequestDirSize { name: "old".into() });
        reduce(
            &mut state,
            ViewAction::RenameCompleted {
                old_name: "old".into(),
                new_name: "new".into(),
                result: Ok(MessageResponse {
                    message: "Renamed".into(),
                }),
            },
        );
        let row = state.row("new").expect("renamed row");
        assert_eq!(row.size_trigger(), crate::model::SizeTrigger::Ready);

        // The late reply for the old name lands on nothing.
        reduce(
            &mut state,
            ViewAction::DirSizeCompleted {
                name: "old".into(),
                result: Ok("1.00 KB".into()),
            },
        );
        assert_eq!(state.row("new").expect("row").size_text(), "-");

        let effects = reduce(&mut state, ViewAction::RequestDirSize { name: "new".into() });
        assert_eq!(
            effects,
            vec![ViewEffect::Request(ViewRequest::DirectorySize {
                name: "new".into(),
                path: "docs/new".into(),
            })]
        );
    }

    #[test]
    fn size_reply_for_a_row_not_awaiting_one_is_ignored() {
        let mut state = sample_state();
        reduce(
            &mut state,
            ViewAction::DirSizeCompleted {
                name: "old".into(),
                result: Ok("3.00 KB".into()),
            },
        );
        let row = state.row("old").expect("row");
        assert_eq!(row.dir_size, DirSizeState::NotRequested);
        assert_eq!(row.size_trigger(), crate::model::SizeTrigger::Ready);
    }

    #[test]
    fn upload_sessions_restart_progress_and_schedule_refresh() {
        let mut state = sample_state();
        let effects = reduce(&mut state, ViewAction::OpenUploadDialog);
        assert_eq!(state.upload.picker.selected, "docs");
        assert_eq!(effects.len(), 1);

        assert!(reduce(&mut state, ViewAction::StartUpload).is_empty());
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some(NO_UPLOAD_FILES_MESSAGE)
        );

        let file = UploadPayload::from_bytes("c.txt", vec![1, 2, 3]);
        reduce(&mut state, ViewAction::SetUploadFiles(vec![file.clone()]));
        let effects = reduce(&mut state, ViewAction::StartUpload);
        assert_eq!(
            effects,
            vec![ViewEffect::Upload {
                session: UploadSessionId(1),
                request: UploadRequest {
                    destination_path: "docs".into(),
                    files: vec![file.clone()],
                },
            }]
        );
        let progress = |loaded| UploadProgress {
            loaded,
            total: Some(100),
        };
        reduce(
            &mut state,
            ViewAction::UploadProgressed {
                session: UploadSessionId(1),
                progress: progress(60),
            },
        );
        reduce(
            &mut state,
            ViewAction::UploadProgressed {
                session: UploadSessionId(1),
                progress: progress(40),
            },
        );
        assert_eq!(state.upload.session.as_ref().map(|s| s.percent()), Some(60));

        let effects = reduce(
            &mut state,
            ViewAction::UploadCompleted {
                session: UploadSessionId(1),
                result: Ok(MessageResponse {
                    message: String::new(),
                }),
            },
        );
        let session = state.upload.session.as_ref().expect("session");
        assert_eq!(session.percent(), 100);
        assert_eq!(session.phase(), UploadPhase::Completed);
        assert!(effects.contains(&ViewEffect::DispatchAfter {
            delay_ms: 1_000,
            action: Box::new(ViewAction::RefreshListing),
        }));

        reduce(&mut state, ViewAction::OpenUploadDialog);
        reduce(&mut state, ViewAction::SetUploadFiles(vec![file]));
        reduce(&mut state, ViewAction::StartUpload);
        let session = state.upload.session.as_ref().expect("session");
        assert_eq!(session.id, UploadSessionId(2));
        assert_eq!(session.percent(), 0);
    }

    #[test]
    fn failed_upload_hides_progress_and_reports_reason() {
        let mut state = sample_state();
        reduce(&mut state, ViewAction::OpenUploadDialog);
        reduce(
            &mut state,
            ViewAction::SetUploadFiles(vec![UploadPayload::from_bytes("c.txt", vec![1])]),
        );
        reduce(&mut state, ViewAction::StartUpload);
        reduce(
            &mut state,
            ViewAction::UploadCompleted {
                session: UploadSessionId(1),
                result: Err(ApiError::Transport("offline".into())),
            },
        );
        let session = state.upload.session.as_ref().expect("session");
        assert!(!session.shows_progress());
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some("Upload failed: Unknown error")
        );
        assert!(!state.is_pending(ActionClass::Upload));
    }

    #[test]
    fn refresh_diff_keeps_selection_and_computed_sizes() {
        let mut state = sample_state();
        check(&mut state, "b.txt", true);
        reduce(&mut state, ViewAction::RequestDirSize { name: "old".into() });
        reduce(
            &mut state,
            ViewAction::DirSizeCompleted {
                name: "old".into(),
                result: Ok("4.00 KB".into()),
            },
        );

        reduce(
            &mut state,
            ViewAction::ListingRefreshed(Ok(ListDirResponse {
                path: "docs".into(),
                entries: vec![
                    ListingEntry::file("b.txt", "docs/b.txt", 99),
                    ListingEntry::file("c.txt", "docs/c.txt", 1),
                    ListingEntry::directory("old", "docs/old"),
                ],
            })),
        );

        assert_eq!(names(&state), vec!["old", "b.txt", "c.txt"]);
        assert!(state.row("b.txt").expect("b").checked);
        assert_eq!(state.row("b.txt").expect("b").size_text(), "99.00 B");
        assert_eq!(state.row("old").expect("old").size_text(), "4.00 KB");
        assert!(!state.row("c.txt").expect("c").checked);
        assert_selection_invariants(&state);
    }

    #[test]
    fn stale_alert_expiry_does_not_dismiss_newer_alert() {
        let mut state = sample_state();
        reduce(
            &mut state,
            ViewAction::CreateFolderCompleted(Ok(CreateFolderResponse {
                message: "created".into(),
                item: ListingEntry::directory("x", "docs/x"),
            })),
        );
        let first = state.alert.current().expect("alert").id;
        reduce(
            &mut state,
            ViewAction::DeleteCompleted(Err(ApiError::rejected(403, "Permission denied"))),
        );
        reduce(&mut state, ViewAction::AlertExpired(first));
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some("Permission denied")
        );
        reduce(&mut state, ViewAction::DismissAlert);
        assert!(state.alert.current().is_none());
    }
}
